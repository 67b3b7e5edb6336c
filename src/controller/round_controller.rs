use std::time::{Duration, Instant};

use crate::model::*;
use crate::util::timer::OneShotTimer;
use crate::{debug, info, warn};

// 操作側(Operator)からの入力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Discard(i32), // 手牌のindex, -1はツモ牌
    Ron,
    Skip,
    DismissRoundResult, // 局結果を手動で閉じる
    DismissGameResult,  // 最終結果を閉じる
}

// 局の同期状態機械
// サーバからのメッセージを適用し, 操作の可否を判定して送信メッセージを生成する
#[derive(Debug)]
pub struct RoundController {
    state: ClientState,
    timer: OneShotTimer,
    result_duration: Duration,
}

impl RoundController {
    pub fn new(result_duration: Duration) -> Self {
        Self {
            state: ClientState::new(),
            timer: OneShotTimer::new(),
            result_duration,
        }
    }

    #[inline]
    pub fn state(&self) -> &ClientState {
        &self.state
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_timer_pending(&self) -> bool {
        self.timer.is_pending()
    }

    // メッセージを適用した場合true, 現在の状態で無効なメッセージは無視してfalse
    pub fn handle_message(&mut self, msg: &ServerMessage, now: Instant) -> bool {
        use ServerMessage::*;
        let applied = match msg {
            Start(info) | Next(info) => self.on_round_begin(info),
            Discard(info) => self.on_discard(info),
            Drawn(info) => self.on_drawn(info),
            DiscardOther(info) => self.on_discard_other(info),
            Ron(rows) => self.on_round_end(RoundEndKind::Win, rows, now),
            Skip => self.on_skip(),
            DrawnRound(info) => self.on_round_end(RoundEndKind::Draw, &info.ron_info, now),
            Result(standings) => self.on_result(standings),
            Unknown(t) => {
                debug!("unknown message type ignored: {}", t);
                false
            }
        };

        if !applied {
            if let Some(k) = msg.kind() {
                debug!("'{}' ignored in {:?}", k, self.state.phase);
            }
        }
        applied
    }

    fn on_round_begin(&mut self, info: &PlayInfo) -> bool {
        if self.state.phase == Phase::GameEnd {
            return false;
        }
        // 局結果の表示中に次局が始まった場合はタイマーを破棄 (nextを二重に送らない)
        self.timer.cancel();
        self.state.load_round(info);
        info!("round begin: {}", self.state.round);
        true
    }

    fn on_discard(&mut self, info: &HandInfo) -> bool {
        if !self.state.phase.is_in_round() {
            return false;
        }
        self.state.set_hand(&info.hands, info.drawn_tile);
        self.state.reaction_return = None;
        self.state.phase = Phase::TurnIdle;
        true
    }

    fn on_drawn(&mut self, info: &DrawnInfo) -> bool {
        if !self.state.phase.is_in_round() {
            return false;
        }
        self.state.set_hand(&info.hands, info.drawn_tile);
        if info.discarded_tile_up != NO_TILE {
            self.push_discard(Position::Up, info.discarded_tile_up);
        }
        self.state.reaction_return = None;
        self.state.phase = if self.state.hand.has_drawn() {
            Phase::SelfDrawn
        } else {
            Phase::TurnIdle
        };
        true
    }

    fn on_discard_other(&mut self, info: &DiscardedTileInfo) -> bool {
        if !self.state.phase.is_in_round() {
            return false;
        }
        let position = match Position::from_seat(info.player_position) {
            Some(p) => p,
            None => return false,
        };
        if info.discarded_tile != NO_TILE {
            self.push_discard(position, info.discarded_tile);
        }
        if info.can_ron && self.state.phase != Phase::ReactionWindow {
            self.state.reaction_return = Some(self.state.phase);
            self.state.phase = Phase::ReactionWindow;
        }
        true
    }

    fn on_skip(&mut self) -> bool {
        if self.state.phase != Phase::ReactionWindow {
            return false;
        }
        self.close_reaction();
        true
    }

    fn on_round_end(&mut self, kind: RoundEndKind, rows: &[RonInfo; SEAT], now: Instant) -> bool {
        if !self.state.phase.is_in_round() {
            return false;
        }
        self.state.set_points(rows);
        self.state.reaction_return = None;
        self.state.round_result = Some(RoundResult { kind, rows: *rows });
        self.state.phase = Phase::RoundEnd(kind);
        self.timer.schedule(now, self.result_duration);
        info!("round end: {}", kind.title());
        true
    }

    fn on_result(&mut self, standings: &[ResultInfo; SEAT]) -> bool {
        if self.state.phase == Phase::GameEnd {
            return false;
        }
        self.timer.cancel();
        self.state.round_result = None;
        self.state.reaction_return = None;
        self.state.standings = Some(*standings);
        self.state.phase = Phase::GameEnd;
        info!("game end");
        true
    }

    fn push_discard(&mut self, position: Position, tile: TileId) {
        if self.state.seat_mut(position).pile.push(tile).is_none() {
            warn!("discard pile of '{}' is full: {} dropped", position, tile);
        }
    }

    fn close_reaction(&mut self) {
        self.state.phase = self.state.reaction_return.take().unwrap_or(Phase::TurnIdle);
    }

    // 操作を適用して送信するメッセージを返却
    // 現在の状態で無効な操作の場合はNone (何も送信しない)
    pub fn apply_intent(&mut self, intent: Intent) -> Option<ClientMessage> {
        match intent {
            Intent::Discard(target) => self.discard(target),
            Intent::Ron => self.react(ClientMessage::ron()),
            Intent::Skip => self.react(ClientMessage::skip()),
            Intent::DismissRoundResult => self.dismiss_round_result(),
            Intent::DismissGameResult => {
                self.dismiss_game_result();
                None
            }
        }
    }

    fn discard(&mut self, target: i32) -> Option<ClientMessage> {
        if !self.state.may_discard() || !self.state.hand.is_valid_target(target) {
            return None;
        }
        let tile = self.state.hand.take(target)?;
        self.push_discard(Position::Own, tile);
        // 二重送信防止のため確認が来るまで打牌不可
        self.state.phase = Phase::SelfDiscarding;
        Some(ClientMessage::discard(target))
    }

    fn react(&mut self, msg: ClientMessage) -> Option<ClientMessage> {
        if !self.state.may_react() {
            return None;
        }
        self.close_reaction();
        Some(msg)
    }

    fn dismiss_round_result(&mut self) -> Option<ClientMessage> {
        self.state.round_result.take()?;
        // タイマーが既に発火していればnextは送信済み
        if self.timer.cancel() {
            Some(ClientMessage::next())
        } else {
            None
        }
    }

    fn dismiss_game_result(&mut self) {
        if self.state.phase == Phase::GameEnd {
            self.state = ClientState::new();
        }
    }

    // 局結果の表示時間が経過していれば結果を閉じてnextを返却
    pub fn poll_timer(&mut self, now: Instant) -> Option<ClientMessage> {
        if !self.timer.fire(now) {
            return None;
        }
        self.state.round_result = None;
        Some(ClientMessage::next())
    }
}

#[cfg(test)]
fn play_info(hands: Vec<TileId>, drawn_tile: TileId) -> PlayInfo {
    PlayInfo {
        player_ids: [0, 3, 2, 1],
        round: RoundInfo::default(),
        winds: [Wind::East, Wind::South, Wind::West, Wind::North],
        points: [25000; SEAT],
        player_info: HandInfo { hands, drawn_tile },
    }
}

#[cfg(test)]
fn started(hands: Vec<TileId>, drawn_tile: TileId) -> (RoundController, Instant) {
    let now = Instant::now();
    let mut ctrl = RoundController::new(Duration::from_millis(ROUND_RESULT_DURATION_MS));
    assert!(ctrl.handle_message(&ServerMessage::Start(play_info(hands, drawn_tile)), now));
    (ctrl, now)
}

#[cfg(test)]
fn ron_rows() -> [RonInfo; SEAT] {
    [
        RonInfo { point: 29000, point_diff: 4000 },
        RonInfo { point: 21000, point_diff: -4000 },
        RonInfo { point: 25000, point_diff: 0 },
        RonInfo { point: 25000, point_diff: 0 },
    ]
}

#[test]
fn test_start_turn_idle() {
    let (ctrl, _) = started(vec![13, 9, 5, 1], NO_TILE);
    assert_eq!(ctrl.phase(), Phase::TurnIdle);
    assert_eq!(ctrl.state().hand.tiles, vec![1, 5, 9, 13]);
    assert!(!ctrl.state().may_discard());
}

#[test]
fn test_discard_flow() {
    let (mut ctrl, now) = started(vec![2, 6], 40);
    assert_eq!(ctrl.phase(), Phase::SelfDrawn);

    let msg = ctrl.apply_intent(Intent::Discard(0));
    assert_eq!(msg, Some(ClientMessage::discard(0)));
    let st = ctrl.state();
    assert_eq!(st.hand.tiles, vec![6]);
    assert_eq!(st.hand.drawn, NO_TILE);
    assert_eq!(st.seat(Position::Own).pile.tile_at(0), Some(2));
    assert_eq!(st.phase, Phase::SelfDiscarding);

    // 確認待ちの間は再度打牌できない
    assert_eq!(ctrl.apply_intent(Intent::Discard(0)), None);
    assert_eq!(ctrl.apply_intent(Intent::Discard(-1)), None);

    let confirm = ServerMessage::Discard(HandInfo {
        hands: vec![40, 6],
        drawn_tile: NO_TILE,
    });
    assert!(ctrl.handle_message(&confirm, now));
    assert_eq!(ctrl.phase(), Phase::TurnIdle);
    assert_eq!(ctrl.state().hand.tiles, vec![6, 40]);
}

#[test]
fn test_discard_drawn_tile() {
    let (mut ctrl, _) = started(vec![2, 6], 40);
    assert_eq!(ctrl.apply_intent(Intent::Discard(-1)), Some(ClientMessage::discard(-1)));
    assert_eq!(ctrl.state().hand.tiles, vec![2, 6]);
    assert_eq!(ctrl.state().seat(Position::Own).pile.tiles(), &[40]);
}

#[test]
fn test_discard_invalid_target() {
    let (mut ctrl, _) = started(vec![2, 6], 40);
    assert_eq!(ctrl.apply_intent(Intent::Discard(2)), None);
    assert_eq!(ctrl.apply_intent(Intent::Discard(-5)), None);
    assert_eq!(ctrl.phase(), Phase::SelfDrawn);
    assert!(ctrl.state().seat(Position::Own).pile.is_empty());
}

#[test]
fn test_drawn() {
    let (mut ctrl, now) = started(vec![2, 6], NO_TILE);
    let drawn = ServerMessage::Drawn(DrawnInfo {
        hands: vec![6, 2],
        drawn_tile: 50,
        discarded_tile_up: 100,
    });
    assert!(ctrl.handle_message(&drawn, now));
    let st = ctrl.state();
    assert_eq!(st.phase, Phase::SelfDrawn);
    assert_eq!(st.hand.drawn, 50);
    assert_eq!(st.seat(Position::Up).pile.tile_at(3), Some(100));
}

#[test]
fn test_discard_other_no_reaction() {
    let (mut ctrl, now) = started(vec![2, 6], NO_TILE);
    let msg = ServerMessage::DiscardOther(DiscardedTileInfo {
        player_position: 2,
        discarded_tile: 8,
        can_ron: false,
    });
    assert!(ctrl.handle_message(&msg, now));
    assert_eq!(ctrl.phase(), Phase::TurnIdle);
    let pile = &ctrl.state().seat(Position::Opposite).pile;
    assert_eq!(pile.slot_of(0), Some(23));
    assert_eq!(pile.tile_at(23), Some(8));
}

#[test]
fn test_reaction_window() {
    let (mut ctrl, now) = started(vec![2, 6], NO_TILE);
    let msg = ServerMessage::DiscardOther(DiscardedTileInfo {
        player_position: 1,
        discarded_tile: 8,
        can_ron: true,
    });
    assert!(ctrl.handle_message(&msg, now));
    assert_eq!(ctrl.phase(), Phase::ReactionWindow);
    assert!(ctrl.state().may_react());
    assert!(!ctrl.state().may_discard());

    // サーバからのskipで元の状態に戻る
    assert!(ctrl.handle_message(&ServerMessage::Skip, now));
    assert_eq!(ctrl.phase(), Phase::TurnIdle);
    assert!(!ctrl.handle_message(&ServerMessage::Skip, now));

    assert!(ctrl.handle_message(&msg, now));
    assert_eq!(ctrl.apply_intent(Intent::Ron), Some(ClientMessage::ron()));
    assert_eq!(ctrl.phase(), Phase::TurnIdle);
    assert_eq!(ctrl.apply_intent(Intent::Skip), None);
}

#[test]
fn test_ron_and_timer() {
    let (mut ctrl, now) = started(vec![2, 6], NO_TILE);
    assert!(ctrl.handle_message(&ServerMessage::Ron(ron_rows()), now));
    assert_eq!(ctrl.phase(), Phase::RoundEnd(RoundEndKind::Win));
    assert_eq!(ctrl.state().points(), [29000, 21000, 25000, 25000]);
    assert!(ctrl.state().round_result.is_some());
    // 終了後の局内メッセージは無視
    assert!(!ctrl.handle_message(&ServerMessage::Ron(ron_rows()), now));

    let later = now + Duration::from_millis(ROUND_RESULT_DURATION_MS);
    assert_eq!(ctrl.poll_timer(now), None);
    assert_eq!(ctrl.poll_timer(later), Some(ClientMessage::next()));
    assert!(ctrl.state().round_result.is_none());
    // 発火後の手動クローズではnextを送らない
    assert_eq!(ctrl.apply_intent(Intent::DismissRoundResult), None);
    assert_eq!(ctrl.poll_timer(later), None);
}

#[test]
fn test_manual_dismiss_cancels_timer() {
    let (mut ctrl, now) = started(vec![2, 6], NO_TILE);
    let draw = ServerMessage::DrawnRound(DrawnRoundInfo { ron_info: ron_rows() });
    assert!(ctrl.handle_message(&draw, now));
    assert_eq!(ctrl.phase(), Phase::RoundEnd(RoundEndKind::Draw));

    assert_eq!(ctrl.apply_intent(Intent::DismissRoundResult), Some(ClientMessage::next()));
    assert!(!ctrl.is_timer_pending());
    assert_eq!(ctrl.poll_timer(now + Duration::from_secs(10)), None);
    assert_eq!(ctrl.apply_intent(Intent::DismissRoundResult), None);
}

#[test]
fn test_next_round() {
    let (mut ctrl, now) = started(vec![2, 6], NO_TILE);
    let msg = ServerMessage::DiscardOther(DiscardedTileInfo {
        player_position: 3,
        discarded_tile: 8,
        can_ron: false,
    });
    ctrl.handle_message(&msg, now);
    ctrl.handle_message(&ServerMessage::Ron(ron_rows()), now);

    // 他のクライアントのnextで先に次局が始まった場合
    assert!(ctrl.handle_message(&ServerMessage::Next(play_info(vec![1], 9)), now));
    assert_eq!(ctrl.phase(), Phase::SelfDrawn);
    assert!(ctrl.state().seats.iter().all(|s| s.pile.is_empty()));
    assert!(!ctrl.is_timer_pending());
    assert_eq!(ctrl.poll_timer(now + Duration::from_secs(10)), None);
}

#[test]
fn test_game_end() {
    let (mut ctrl, now) = started(vec![2, 6], NO_TILE);
    let standings = [
        ResultInfo { order: 1, point: 49 },
        ResultInfo { order: 4, point: -34 },
        ResultInfo { order: 2, point: 5 },
        ResultInfo { order: 3, point: -20 },
    ];
    assert!(ctrl.handle_message(&ServerMessage::Result(standings), now));
    assert_eq!(ctrl.phase(), Phase::GameEnd);
    assert!(!ctrl.handle_message(&ServerMessage::Start(play_info(vec![1], NO_TILE)), now));
    assert_eq!(ctrl.phase(), Phase::GameEnd);

    ctrl.apply_intent(Intent::DismissGameResult);
    assert_eq!(ctrl.phase(), Phase::AwaitingStart);
    assert!(ctrl.handle_message(&ServerMessage::Start(play_info(vec![1], NO_TILE)), now));
}

#[test]
fn test_awaiting_start_ignores_round_messages() {
    let now = Instant::now();
    let mut ctrl = RoundController::new(Duration::from_millis(10));
    let before = ctrl.state().clone();
    let msgs = [
        ServerMessage::Discard(HandInfo { hands: vec![1], drawn_tile: NO_TILE }),
        ServerMessage::Skip,
        ServerMessage::Ron(ron_rows()),
        ServerMessage::Unknown("debug".to_string()),
    ];
    for m in &msgs {
        assert!(!ctrl.handle_message(m, now));
    }
    assert_eq!(ctrl.state(), &before);
}

#[test]
fn test_unknown_type_keeps_state() {
    let now = Instant::now();
    let can_ron = ServerMessage::DiscardOther(DiscardedTileInfo {
        player_position: 1,
        discarded_tile: 8,
        can_ron: true,
    });
    let standings = [
        ResultInfo { order: 1, point: 10 },
        ResultInfo { order: 2, point: 0 },
        ResultInfo { order: 3, point: 0 },
        ResultInfo { order: 4, point: -10 },
    ];

    let mut ctrls = vec![RoundController::new(Duration::from_millis(10))];
    ctrls.push(started(vec![2, 6], NO_TILE).0);
    ctrls.push(started(vec![2, 6], 40).0);
    let (mut c, _) = started(vec![2, 6], 40);
    c.apply_intent(Intent::Discard(0));
    ctrls.push(c);
    let (mut c, _) = started(vec![2, 6], NO_TILE);
    c.handle_message(&can_ron, now);
    ctrls.push(c);
    let (mut c, _) = started(vec![2, 6], NO_TILE);
    c.handle_message(&ServerMessage::Ron(ron_rows()), now);
    ctrls.push(c);
    let (mut c, _) = started(vec![2, 6], NO_TILE);
    c.handle_message(&ServerMessage::Result(standings), now);
    ctrls.push(c);

    let phases: Vec<Phase> = ctrls.iter().map(|c| c.phase()).collect();
    assert_eq!(
        phases,
        vec![
            Phase::AwaitingStart,
            Phase::TurnIdle,
            Phase::SelfDrawn,
            Phase::SelfDiscarding,
            Phase::ReactionWindow,
            Phase::RoundEnd(RoundEndKind::Win),
            Phase::GameEnd,
        ]
    );
    for mut c in ctrls {
        let before = c.state().clone();
        let pending = c.is_timer_pending();
        assert!(!c.handle_message(&ServerMessage::Unknown("chat".to_string()), now));
        assert_eq!(c.state(), &before);
        assert_eq!(c.is_timer_pending(), pending);
    }
}

#[test]
fn test_only_drawn_enters_self_drawn() {
    let now = Instant::now();
    let msgs = [
        ServerMessage::Discard(HandInfo { hands: vec![2, 6], drawn_tile: 40 }),
        ServerMessage::DiscardOther(DiscardedTileInfo {
            player_position: 3,
            discarded_tile: 8,
            can_ron: false,
        }),
        ServerMessage::DiscardOther(DiscardedTileInfo {
            player_position: 2,
            discarded_tile: 9,
            can_ron: true,
        }),
        ServerMessage::Skip,
        ServerMessage::Ron(ron_rows()),
        ServerMessage::DrawnRound(DrawnRoundInfo { ron_info: ron_rows() }),
        ServerMessage::Unknown("chat".to_string()),
    ];
    for m in &msgs {
        let (mut ctrl, _) = started(vec![2, 6], NO_TILE);
        ctrl.handle_message(m, now);
        assert_ne!(ctrl.phase(), Phase::SelfDrawn, "{:?}", m);
    }

    let (mut ctrl, _) = started(vec![2, 6], NO_TILE);
    let drawn = ServerMessage::Drawn(DrawnInfo {
        hands: vec![2, 6],
        drawn_tile: 40,
        discarded_tile_up: NO_TILE,
    });
    assert!(ctrl.handle_message(&drawn, now));
    assert_eq!(ctrl.phase(), Phase::SelfDrawn);
}
