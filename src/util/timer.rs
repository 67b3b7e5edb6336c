use std::time::{Duration, Instant};

// 単発のキャンセル可能なタイマー
// イベントループからfire()をポーリングして使用する
// 一度発火したタイマー, キャンセルされたタイマーは再度schedule()するまで発火しない
#[derive(Debug, Default)]
pub struct OneShotTimer {
    deadline: Option<Instant>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    // 発火待ちのタイマーを無効化した場合にtrue
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    // 期限を過ぎていれば一度だけtrueを返却
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[test]
fn test_fire_once() {
    let t0 = Instant::now();
    let mut timer = OneShotTimer::new();
    assert!(!timer.fire(t0));

    timer.schedule(t0, Duration::from_millis(2000));
    assert!(timer.is_pending());
    assert!(!timer.fire(t0 + Duration::from_millis(1999)));
    assert!(timer.fire(t0 + Duration::from_millis(2000)));
    assert!(!timer.fire(t0 + Duration::from_millis(3000)));
    assert!(!timer.is_pending());
}

#[test]
fn test_cancel() {
    let t0 = Instant::now();
    let mut timer = OneShotTimer::new();
    timer.schedule(t0, Duration::from_millis(10));
    assert!(timer.cancel());
    assert!(!timer.cancel());
    assert!(!timer.fire(t0 + Duration::from_secs(1)));
}
