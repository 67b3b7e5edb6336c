use std::time::Instant;

use super::RoundController;
use crate::model::*;
use crate::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Applied, // 状態に反映
    Ignored, // 現在の状態では無効 または未対応のtype
    Dropped, // デコード失敗
}

// 受信テキストをデコードしてRoundControllerに渡す
// 不正なメッセージは警告を出して破棄し, 状態は変更しない
#[derive(Debug, Default)]
pub struct Dispatcher {
    pub received: usize,
    pub applied: usize,
    pub ignored: usize,
    pub dropped: usize,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, ctrl: &mut RoundController, text: &str, now: Instant) -> Dispatched {
        self.received += 1;
        let msg = match ServerMessage::decode(text) {
            Ok(m) => m,
            Err(e) => {
                warn!("{}", e);
                self.dropped += 1;
                return Dispatched::Dropped;
            }
        };
        debug!("recv: {}", text);

        if ctrl.handle_message(&msg, now) {
            self.applied += 1;
            Dispatched::Applied
        } else {
            self.ignored += 1;
            Dispatched::Ignored
        }
    }
}

#[test]
fn test_dispatch() {
    use std::time::Duration;

    let now = Instant::now();
    let mut ctrl = RoundController::new(Duration::from_millis(ROUND_RESULT_DURATION_MS));
    let mut dsp = Dispatcher::new();

    let start = r#"{"type":"start","values":{
        "playerIds":[0,1,2,3],
        "round":{"wind":1,"round":1},
        "winds":[1,2,3,4],
        "points":[25000,25000,25000,25000],
        "playerInfo":{"hands":[3,2,1],"drawnTile":-1}}}"#;
    assert_eq!(dsp.dispatch(&mut ctrl, start, now), Dispatched::Applied);
    assert_eq!(ctrl.phase(), Phase::TurnIdle);

    assert_eq!(dsp.dispatch(&mut ctrl, "not json", now), Dispatched::Dropped);
    let bad_seat = r#"{"type":"discardOther","values":{"playerPosition":7,"discardedTile":4,"canRon":false}}"#;
    assert_eq!(dsp.dispatch(&mut ctrl, bad_seat, now), Dispatched::Dropped);
    assert_eq!(dsp.dispatch(&mut ctrl, r#"{"type":"chat","values":{}}"#, now), Dispatched::Ignored);
    assert_eq!(dsp.dispatch(&mut ctrl, r#"{"type":"skip"}"#, now), Dispatched::Ignored);
    assert_eq!(ctrl.phase(), Phase::TurnIdle);
    assert!(ctrl.state().seats.iter().all(|s| s.pile.is_empty()));

    assert_eq!(dsp.received, 5);
    assert_eq!(dsp.applied, 1);
    assert_eq!(dsp.ignored, 2);
    assert_eq!(dsp.dropped, 2);
}
