use std::fmt::Write;

use super::*;
use crate::util::misc::signed_or_blank;

// 端末へのテキスト描画
#[derive(Debug)]
pub struct TextRender {
    show_edges: bool,
}

impl TextRender {
    pub fn new(show_edges: bool) -> Self {
        Self { show_edges }
    }

    pub fn format(&self, state: &ClientState) -> String {
        let mut buf = String::new();
        match state.phase {
            Phase::AwaitingStart => {
                buf.push_str("waiting for start...\n");
            }
            Phase::GameEnd => {
                if let Some(standings) = &state.standings {
                    format_standings(&mut buf, state, standings);
                }
            }
            _ => {
                self.format_round(&mut buf, state);
                if let Some(res) = &state.round_result {
                    format_round_result(&mut buf, state, res);
                }
            }
        }
        buf
    }

    fn format_round(&self, buf: &mut String, state: &ClientState) {
        writeln!(buf, "[{}] {:?}", state.round, state.phase).ok();
        for seat in &state.seats {
            let wind = seat.wind.map(|w| w.kanji()).unwrap_or('-');
            writeln!(buf, "{:<8} {} {:>6}", seat.position.tag(), wind, seat.point).ok();
        }

        for seat in &state.seats {
            writeln!(buf, "{} ({}):", seat.position.tag(), seat.pile.len()).ok();
            self.format_pile(buf, &seat.pile);
        }

        write!(buf, "hand: ").ok();
        for (i, &t) in state.hand.tiles.iter().enumerate() {
            write!(buf, "{}:{} ", i, tile_symbol(t)).ok();
        }
        if state.hand.has_drawn() {
            write!(buf, "| d:{}", tile_symbol(state.hand.drawn)).ok();
        }
        buf.push('\n');
        let glyphs: String = state.hand.tiles.iter().map(|&t| tile_unicode(t)).collect();
        writeln!(buf, "      {}", glyphs).ok();

        if state.may_react() {
            buf.push_str("ron? (r: ron, s: skip)\n");
        }
    }

    // マスの番号順に1行HO_ROW_SIZEマスずつ, HO_COLUMN_SIZE行で表示
    // show_edgesの場合は各マスの縁の種類を並べて表示
    fn format_pile(&self, buf: &mut String, pile: &DiscardPile) {
        let edges = pile.edge_classes();
        for row in 0..HO_COLUMN_SIZE {
            let slots = row * HO_ROW_SIZE..(row + 1) * HO_ROW_SIZE;
            buf.push_str("  ");
            for slot in slots.clone() {
                let t = pile.tile_at(slot).unwrap_or(NO_TILE);
                write!(buf, "{} ", tile_symbol(t)).ok();
            }
            if self.show_edges {
                buf.push_str("  ");
                for slot in slots {
                    write!(buf, "{:<13}", edges[slot].tag().unwrap_or(".")).ok();
                }
            }
            buf.push('\n');
        }
    }
}

impl Render for TextRender {
    fn render(&mut self, state: &ClientState) {
        println!("{}", self.format(state));
    }
}

fn format_round_result(buf: &mut String, state: &ClientState, res: &RoundResult) {
    writeln!(buf, "== {} ==", res.kind.title()).ok();
    for (seat, r) in state.seats.iter().zip(res.rows.iter()) {
        writeln!(
            buf,
            "{:<8} {:>6} {:>6}",
            seat.position.tag(),
            r.point,
            signed_or_blank(r.point_diff)
        )
        .ok();
    }
}

fn format_standings(buf: &mut String, state: &ClientState, standings: &[ResultInfo; SEAT]) {
    buf.push_str("== result ==\n");
    for (seat, r) in state.seats.iter().zip(standings.iter()) {
        let order = if r.order == 0 {
            "-".to_string()
        } else {
            r.order.to_string()
        };
        let point = if r.point > 0 {
            format!("+{}", r.point)
        } else {
            r.point.to_string()
        };
        writeln!(buf, "{:<8} {} {:>5}", seat.position.tag(), order, point).ok();
    }
}

#[test]
fn test_format_round_result() {
    let mut state = ClientState::new();
    state.phase = Phase::RoundEnd(RoundEndKind::Draw);
    state.round_result = Some(RoundResult {
        kind: RoundEndKind::Draw,
        rows: [
            RonInfo { point: 26500, point_diff: 1500 },
            RonInfo { point: 23500, point_diff: -1500 },
            RonInfo { point: 25000, point_diff: 0 },
            RonInfo { point: 25000, point_diff: 0 },
        ],
    });
    let out = TextRender::new(false).format(&state);
    assert!(out.contains("== 流局 =="));
    assert!(out.contains("+1500"));
    assert!(out.contains("-1500"));
    assert!(!out.contains("+0"));
}

#[test]
fn test_format_pile_edges() {
    let mut state = ClientState::new();
    state.phase = Phase::TurnIdle;
    for t in [0, 4, 8, 12, 16, 20, 24] {
        state.seat_mut(Position::Own).pile.push(t);
    }
    let out = TextRender::new(true).format(&state);
    assert!(out.contains("m1"));
    assert!(out.contains("middle"));
    assert!(out.contains("bottom-parts"));

    let out = TextRender::new(false).format(&state);
    assert!(!out.contains("middle"));
}

#[test]
fn test_format_standings() {
    let mut state = ClientState::new();
    state.phase = Phase::GameEnd;
    state.standings = Some([
        ResultInfo { order: 1, point: 49 },
        ResultInfo { order: 0, point: 0 },
        ResultInfo { order: 2, point: 5 },
        ResultInfo { order: 3, point: -20 },
    ]);
    let out = TextRender::new(false).format(&state);
    assert!(out.contains("+49"));
    assert!(out.contains("-20"));
    assert!(out.contains(" - "));
}

#[test]
fn test_format_pile_rows() {
    let mut pile = DiscardPile::new(Position::Own);
    for t in [0, 4, 8, 12, 16, 20, 24] {
        pile.push(t);
    }
    let mut buf = String::new();
    TextRender::new(false).format_pile(&mut buf, &pile);
    let rows: Vec<Vec<&str>> = buf.lines().map(|l| l.split_whitespace().collect()).collect();
    assert_eq!(rows.len(), HO_COLUMN_SIZE);
    assert!(rows.iter().all(|r| r.len() == HO_ROW_SIZE));
    // 7枚目は2行目の先頭
    assert_eq!(rows[0][5], tile_symbol(20));
    assert_eq!(rows[1][0], tile_symbol(24));
    assert_eq!(rows[1][1], "--");
}
