//! End-to-end flows through the session loop with a scripted connection.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use mahjong_client::app::{load_envelopes, replay};
use mahjong_client::controller::*;
use mahjong_client::model::*;
use mahjong_client::operator::{create_operator, Manual};
use mahjong_client::render::NullRender;
use mahjong_client::util::connection::{NullConnection, QueueConnection};
use proptest::prelude::*;
use serde_json::{json, Value};

fn start(kind: &str, hands: &[TileId], drawn: TileId) -> String {
    json!({
        "type": kind,
        "values": {
            "playerIds": [0, 3, 2, 1],
            "round": {"wind": 1, "round": 1, "subRound": 0},
            "winds": [1, 2, 3, 4],
            "points": [25000, 25000, 25000, 25000],
            "playerInfo": {"hands": hands, "drawnTile": drawn},
        }
    })
    .to_string()
}

fn discard_other(position: usize, tile: TileId, can_ron: bool) -> String {
    json!({
        "type": "discardOther",
        "values": {"playerPosition": position, "discardedTile": tile, "canRon": can_ron}
    })
    .to_string()
}

fn ron() -> String {
    json!({
        "type": "ron",
        "values": [
            {"point": 33000, "pointDiff": 8000},
            {"point": 17000, "pointDiff": -8000},
            {"point": 25000, "pointDiff": 0},
            {"point": 25000, "pointDiff": 0},
        ]
    })
    .to_string()
}

fn sent_json(conn: &QueueConnection) -> Vec<Value> {
    conn.sent()
        .iter()
        .map(|s| serde_json::from_str(s).unwrap())
        .collect()
}

fn run(session: &mut Session<QueueConnection>, now: Instant) {
    while session.step(now) != Step::Closed {}
}

#[test]
fn tsumogiri_plays_through_a_round() {
    let texts = vec![
        start("start", &[13, 9, 5, 1], 40),
        json!({"type": "discard", "values": {"hands": [1, 5, 9, 13], "drawnTile": -1}}).to_string(),
        discard_other(1, 60, false),
        discard_other(2, 64, true),
        json!({"type": "skip", "values": {}}).to_string(),
        json!({
            "type": "drawn",
            "values": {"hands": [1, 5, 9, 13], "drawnTile": 44, "discardedTileUp": 68}
        })
        .to_string(),
    ];
    let op = create_operator("Tsumogiri").unwrap();
    let ctrl = RoundController::new(Duration::from_millis(ROUND_RESULT_DURATION_MS));
    let conn = QueueConnection::new(texts);
    let mut session = Session::new(conn, ctrl, Box::new(NullRender), Some(op));
    run(&mut session, Instant::now());

    let sent = sent_json(session.conn());
    assert_eq!(
        sent,
        vec![
            json!({"operation": "discard", "target": -1}),
            json!({"operation": "skip", "target": -1}),
            json!({"operation": "discard", "target": -1}),
        ]
    );

    let st = session.state();
    assert_eq!(st.seat(Position::Own).pile.tiles(), &[40, 44]);
    assert_eq!(st.seat(Position::Down).pile.tile_at(20), Some(60));
    assert_eq!(st.seat(Position::Opposite).pile.tile_at(23), Some(64));
    assert_eq!(st.seat(Position::Up).pile.tile_at(3), Some(68));
    assert_eq!(st.phase, Phase::SelfDiscarding);
    // 自分のskipで既に閉じているのでサーバのskipは無視
    assert_eq!(session.dispatcher().applied, 5);
    assert_eq!(session.dispatcher().ignored, 1);
}

#[test]
fn round_end_sends_next_once_from_timer() {
    let t0 = Instant::now();
    let texts = vec![
        start("start", &[1, 5], -1),
        ron(),
        json!({"type": "debug", "values": {}}).to_string(),
    ];
    let ctrl = RoundController::new(Duration::from_millis(ROUND_RESULT_DURATION_MS));
    let mut session = Session::new(QueueConnection::new(texts), ctrl, Box::new(NullRender), None);

    assert_eq!(session.step(t0), Step::Updated); // open
    assert_eq!(session.step(t0), Step::Updated); // start
    assert_eq!(session.step(t0), Step::Updated); // ron
    assert_eq!(session.state().phase, Phase::RoundEnd(RoundEndKind::Win));
    assert_eq!(session.state().points(), [33000, 17000, 25000, 25000]);
    assert_eq!(session.sent(), 0);

    let t1 = t0 + Duration::from_millis(ROUND_RESULT_DURATION_MS);
    assert_eq!(session.step(t1), Step::Updated); // 未対応のtype + タイマー発火
    assert!(session.state().round_result.is_none());
    assert!(!session.apply_intent(Intent::DismissRoundResult));
    assert_eq!(session.step(t1), Step::Closed);
    assert_eq!(sent_json(session.conn()), vec![json!({"operation": "next", "target": -1})]);
}

#[test]
fn round_end_manual_dismiss_then_timer() {
    let t0 = Instant::now();
    let texts = vec![start("start", &[1, 5], -1), ron(), start("next", &[2, 6], 10)];
    let ctrl = RoundController::new(Duration::from_millis(ROUND_RESULT_DURATION_MS));
    let mut session = Session::new(QueueConnection::new(texts), ctrl, Box::new(NullRender), None);

    for _ in 0..3 {
        session.step(t0);
    }
    assert!(session.apply_intent(Intent::DismissRoundResult));
    assert!(!session.apply_intent(Intent::DismissRoundResult));

    // タイマーはキャンセル済み
    let t1 = t0 + Duration::from_secs(5);
    assert_eq!(session.step(t1), Step::Updated); // next
    assert_eq!(session.state().phase, Phase::SelfDrawn);
    assert_eq!(sent_json(session.conn()), vec![json!({"operation": "next", "target": -1})]);
}

#[test]
fn manual_input_is_checked_against_current_state() {
    let t0 = Instant::now();
    let texts = vec![
        start("start", &[1, 5], -1),
        discard_other(3, 8, true),
        json!({"type": "skip", "values": {}}).to_string(),
        json!({"type": "chat", "values": {}}).to_string(),
    ];
    let (tx, rx) = mpsc::channel();
    let op = Box::new(Manual::from_receiver(rx));
    let ctrl = RoundController::new(Duration::from_millis(ROUND_RESULT_DURATION_MS));
    let mut session = Session::new(QueueConnection::new(texts), ctrl, Box::new(NullRender), Some(op));

    assert_eq!(session.step(t0), Step::Updated); // open
    assert_eq!(session.step(t0), Step::Updated); // start
    assert_eq!(session.step(t0), Step::Updated); // discardOther (ron可能)
    assert_eq!(session.state().phase, Phase::ReactionWindow);
    // 入力待ちでもループは止まらない
    assert_eq!(session.step(t0), Step::Updated); // skip
    assert_eq!(session.state().phase, Phase::TurnIdle);

    // ウィンドウが閉じた後の入力は送信しない
    tx.send("r\n".to_string()).unwrap();
    assert_eq!(session.step(t0), Step::Idle); // chat
    assert_eq!(session.sent(), 0);
    assert_eq!(session.state().phase, Phase::TurnIdle);
    assert_eq!(session.step(t0), Step::Closed);
}

#[test]
fn manual_dismisses_round_result() {
    let t0 = Instant::now();
    let texts = vec![
        start("start", &[1, 5], -1),
        ron(),
        json!({"type": "debug", "values": {}}).to_string(),
    ];
    let (tx, rx) = mpsc::channel();
    let op = Box::new(Manual::from_receiver(rx));
    let ctrl = RoundController::new(Duration::from_millis(ROUND_RESULT_DURATION_MS));
    let mut session = Session::new(QueueConnection::new(texts), ctrl, Box::new(NullRender), Some(op));

    for _ in 0..3 {
        session.step(t0);
    }
    assert!(session.state().round_result.is_some());
    tx.send("n\n".to_string()).unwrap();
    assert_eq!(session.step(t0), Step::Updated);
    assert!(session.state().round_result.is_none());
    assert_eq!(sent_json(session.conn()), vec![json!({"operation": "next", "target": -1})]);

    // タイマーはキャンセル済み
    let t1 = t0 + Duration::from_millis(ROUND_RESULT_DURATION_MS);
    assert_eq!(session.step(t1), Step::Closed);
    assert_eq!(session.sent(), 1);
}

#[test]
fn malformed_messages_are_dropped() {
    let texts = vec![
        "{".to_string(),
        start("start", &[1, 5], -1),
        discard_other(9, 8, false),
        json!({"type": "discard", "values": {"hands": [1, 999], "drawnTile": -1}}).to_string(),
        json!({"type": "debug", "values": {}}).to_string(),
    ];
    let ctrl = RoundController::new(Duration::from_millis(10));
    let mut session = Session::new(QueueConnection::new(texts), ctrl, Box::new(NullRender), None);
    run(&mut session, Instant::now());

    let d = session.dispatcher();
    assert_eq!(d.received, 5);
    assert_eq!(d.applied, 1);
    assert_eq!(d.dropped, 3);
    assert_eq!(d.ignored, 1);
    assert_eq!(session.state().hand.tiles, vec![1, 5]);
}

#[test]
fn null_connection_closes_immediately() {
    let ctrl = RoundController::new(Duration::from_millis(10));
    let mut session = Session::new(NullConnection, ctrl, Box::new(NullRender), None);
    assert_eq!(session.step(Instant::now()), Step::Closed);
    assert_eq!(session.state().phase, Phase::AwaitingStart);
}

#[test]
fn replay_dismisses_round_results() {
    let lines = [
        start("start", &[1, 5], -1),
        ron(),
        start("next", &[2, 6], -1),
        json!({"type": "drawnRound", "values": {"ronInfo": [
            {"point": 34500, "pointDiff": 1500}, {"point": 15500, "pointDiff": -1500},
            {"point": 26500, "pointDiff": 1500}, {"point": 23500, "pointDiff": -1500}]}})
        .to_string(),
        json!({"type": "result", "values": [
            {"order": 1, "point": 54}, {"order": 4, "point": -44},
            {"order": 2, "point": 6}, {"order": 3, "point": -16}]})
        .to_string(),
    ]
    .join("\n");
    let texts = load_envelopes(&lines).unwrap();
    let session = replay(texts, Box::new(NullRender), 0.0);

    let st = session.state();
    assert_eq!(st.phase, Phase::GameEnd);
    assert_eq!(st.points(), [34500, 15500, 26500, 23500]);
    assert_eq!(st.standings.map(|s| s[0].order), Some(1));
    // 局結果ごとに1回ずつ
    assert_eq!(session.conn().sent().len(), 2);
}

// 受信メッセージと操作のランダムな列
#[derive(Debug, Clone)]
enum Event {
    Start(Vec<TileId>, TileId),
    Discard(Vec<TileId>),
    Drawn(TileId, TileId),
    DiscardOther(usize, TileId, bool),
    Skip,
    Ron,
    Result,
    Garbage,
    Unknown,
    Tick(u64),
    Intent(Intent),
}

fn event() -> impl Strategy<Value = Event> {
    let tile = 0..=TILE_ID_MAX;
    let hand = prop::collection::vec(0..=TILE_ID_MAX, 0..14);
    prop_oneof![
        (hand.clone(), -1..=TILE_ID_MAX).prop_map(|(h, d)| Event::Start(h, d)),
        hand.prop_map(Event::Discard),
        (-1..=TILE_ID_MAX, -1..=TILE_ID_MAX).prop_map(|(d, u)| Event::Drawn(d, u)),
        (0usize..4, tile, any::<bool>()).prop_map(|(p, t, r)| Event::DiscardOther(p, t, r)),
        Just(Event::Skip),
        Just(Event::Ron),
        Just(Event::Result),
        prop_oneof![Just(Event::Garbage), Just(Event::Unknown)],
        (0u64..3000).prop_map(Event::Tick),
        prop_oneof![
            (-2i32..15).prop_map(Intent::Discard),
            Just(Intent::Ron),
            Just(Intent::Skip),
            Just(Intent::DismissRoundResult),
            Just(Intent::DismissGameResult),
        ]
        .prop_map(Event::Intent),
    ]
}

fn to_text(ev: &Event) -> Option<String> {
    Some(match ev {
        Event::Start(h, d) => start("start", h, *d),
        Event::Discard(h) => {
            json!({"type": "discard", "values": {"hands": h, "drawnTile": -1}}).to_string()
        }
        Event::Drawn(d, u) => json!({
            "type": "drawn",
            "values": {"hands": [], "drawnTile": d, "discardedTileUp": u}
        })
        .to_string(),
        Event::DiscardOther(p, t, r) => discard_other(*p, *t, *r),
        Event::Skip => json!({"type": "skip"}).to_string(),
        Event::Ron => ron(),
        Event::Result => json!({"type": "result", "values": [
            {"order": 1, "point": 1}, {"order": 2, "point": 0},
            {"order": 3, "point": 0}, {"order": 4, "point": -1}]})
        .to_string(),
        Event::Garbage => "{\"type\":".to_string(),
        Event::Unknown => json!({"type": "chat", "values": {}}).to_string(),
        Event::Tick(_) | Event::Intent(_) => return None,
    })
}

proptest! {
    #[test]
    fn controller_invariants(events in prop::collection::vec(event(), 0..200)) {
        let mut ctrl = RoundController::new(Duration::from_millis(ROUND_RESULT_DURATION_MS));
        let mut dsp = Dispatcher::new();
        let mut now = Instant::now();
        let mut round_ends = 0;
        let mut nexts = 0;

        for ev in &events {
            let before = ctrl.phase();
            let mut outbound = None;
            match ev {
                Event::Tick(ms) => {
                    now += Duration::from_millis(*ms);
                    outbound = ctrl.poll_timer(now);
                }
                Event::Intent(i) => {
                    let may_discard = ctrl.state().may_discard();
                    let may_react = ctrl.state().may_react();
                    outbound = ctrl.apply_intent(*i);
                    if let Some(m) = &outbound {
                        match m.operation {
                            Operation::Discard => prop_assert!(may_discard),
                            Operation::Ron | Operation::Skip => prop_assert!(may_react),
                            Operation::Next => {}
                        }
                    }
                }
                _ => {
                    let text = to_text(ev).unwrap();
                    let prev = ctrl.state().clone();
                    let res = dsp.dispatch(&mut ctrl, &text, now);
                    let entered = matches!(ctrl.phase(), Phase::RoundEnd(_))
                        && !matches!(before, Phase::RoundEnd(_));
                    if res == Dispatched::Applied && entered {
                        round_ends += 1;
                    }
                    if matches!(ev, Event::Garbage) {
                        prop_assert_eq!(res, Dispatched::Dropped);
                        prop_assert_eq!(ctrl.phase(), before);
                    }
                    // 未対応のtypeは状態を変えない
                    if matches!(ev, Event::Unknown) {
                        prop_assert_eq!(res, Dispatched::Ignored);
                        prop_assert_eq!(ctrl.state(), &prev);
                    }
                    // TurnIdleからSelfDrawnに入るのはdrawn (または局の置き換え) のみ
                    if before == Phase::TurnIdle && ctrl.phase() == Phase::SelfDrawn {
                        prop_assert!(matches!(ev, Event::Drawn(..) | Event::Start(..)), "{:?}", ev);
                    }
                }
            }
            if let Some(m) = outbound {
                if m.operation == Operation::Next {
                    nexts += 1;
                }
            }

            let st = ctrl.state();
            prop_assert!(nexts <= round_ends);
            prop_assert!(!st.may_discard() || st.hand.has_drawn());
            prop_assert!(st.seats.iter().all(|s| s.pile.len() <= HO_SIZE));
            // タイマー待ちの間は必ず局結果を表示中
            prop_assert!(!ctrl.is_timer_pending() || st.round_result.is_some());
            let mut sorted = st.hand.tiles.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&st.hand.tiles, &sorted);
        }
    }
}
