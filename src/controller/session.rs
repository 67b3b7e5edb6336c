use std::time::Instant;

use super::{Dispatched, Dispatcher, Intent, RoundController};
use crate::model::*;
use crate::operator::Operator;
use crate::render::Render;
use crate::util::connection::{Connection, Message};
use crate::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Idle,    // 変化なし
    Updated, // 状態が変化して描画済み
    Closed,  // 接続終了
}

// 接続, 状態機械, 描画, 操作の入力元をまとめたイベントループの1ステップ分の処理
// 1回のstep()で処理する受信メッセージは最大1件
#[derive(Debug)]
pub struct Session<C: Connection> {
    conn: C,
    ctrl: RoundController,
    dispatcher: Dispatcher,
    render: Box<dyn Render>,
    operator: Option<Box<dyn Operator>>,
    sent: usize,
}

impl<C: Connection> Session<C> {
    pub fn new(
        conn: C,
        ctrl: RoundController,
        render: Box<dyn Render>,
        operator: Option<Box<dyn Operator>>,
    ) -> Self {
        Self {
            conn,
            ctrl,
            dispatcher: Dispatcher::new(),
            render,
            operator,
            sent: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> &ClientState {
        self.ctrl.state()
    }

    #[inline]
    pub fn conn(&self) -> &C {
        &self.conn
    }

    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    // 送信したメッセージの数
    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn step(&mut self, now: Instant) -> Step {
        let mut updated = false;

        match self.conn.recv() {
            Message::Open => updated = true,
            Message::Text(text) => {
                let res = self.dispatcher.dispatch(&mut self.ctrl, &text, now);
                updated = res == Dispatched::Applied;
            }
            Message::NoMessage => {}
            Message::Close | Message::NoConnection => return Step::Closed,
        }

        if let Some(msg) = self.ctrl.poll_timer(now) {
            self.send(msg);
            updated = true;
        }

        if updated {
            debug!("state:\n{}", self.ctrl.state());
            self.render.render(self.ctrl.state());
        }

        if self.apply_operator() {
            self.render.render(self.ctrl.state());
            updated = true;
        }

        if updated {
            Step::Updated
        } else {
            Step::Idle
        }
    }

    // 操作を適用して状態が変化した場合true
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        let before = (self.ctrl.phase(), self.ctrl.state().round_result.is_some());
        if let Some(msg) = self.ctrl.apply_intent(intent) {
            self.send(msg);
            return true;
        }
        // 送信を伴わない状態変化 (最終結果を閉じる等)
        let after = (self.ctrl.phase(), self.ctrl.state().round_result.is_some());
        if before == after {
            debug!("intent rejected: {:?}", intent);
        }
        before != after
    }

    fn apply_operator(&mut self) -> bool {
        let intent = match self.operator.as_mut() {
            Some(op) => op.select_intent(self.ctrl.state()),
            None => None,
        };
        match intent {
            Some(i) => self.apply_intent(i),
            None => false,
        }
    }

    fn send(&mut self, msg: ClientMessage) {
        info!("send: {}", msg);
        self.conn.send(&msg.encode());
        self.sent += 1;
    }
}
