use super::*;
use crate::util::misc::vec_to_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEndKind {
    Win,  // 和了
    Draw, // 流局
}

impl RoundEndKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Win => "和了",
            Self::Draw => "流局",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingStart,           // 局情報なし
    TurnIdle,                // 局進行中 ツモ牌なし
    SelfDrawn,               // ツモ牌あり 打牌可能
    SelfDiscarding,          // 打牌を送信済み サーバの確認待ち
    ReactionWindow,          // 他家の打牌に対してロン/スキップを選択中
    RoundEnd(RoundEndKind),  // 局終了 結果表示中
    GameEnd,                 // ゲーム終了 最終結果表示中
}

impl Phase {
    // 局の途中 (局情報が読み込まれていて局が終了していない)
    pub fn is_in_round(self) -> bool {
        matches!(
            self,
            Self::TurnIdle | Self::SelfDrawn | Self::SelfDiscarding | Self::ReactionWindow
        )
    }
}

// 自分の手牌 (常に昇順) とツモ牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    pub tiles: Vec<TileId>,
    pub drawn: TileId,
}

impl Hand {
    pub fn new(mut tiles: Vec<TileId>, drawn: TileId) -> Self {
        tiles.sort_unstable();
        Self { tiles, drawn }
    }

    #[inline]
    pub fn has_drawn(&self) -> bool {
        self.drawn != NO_TILE
    }

    // 打牌対象として有効か (手牌のindexまたは-1でツモ牌)
    pub fn is_valid_target(&self, target: i32) -> bool {
        if target == -1 {
            self.has_drawn()
        } else {
            target >= 0 && (target as usize) < self.tiles.len()
        }
    }

    // 打牌 手牌から取り除いた牌を返却 ツモ牌は手牌に加えずに破棄する
    // (打牌後の手牌はサーバからのdiscardで上書きされる)
    pub fn take(&mut self, target: i32) -> Option<TileId> {
        if !self.is_valid_target(target) {
            return None;
        }
        let tile = if target == -1 {
            self.drawn
        } else {
            self.tiles.remove(target as usize)
        };
        self.drawn = NO_TILE;
        Some(tile)
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self {
            tiles: vec![],
            drawn: NO_TILE,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tiles: Vec<String> = self.tiles.iter().map(|&t| tile_symbol(t)).collect();
        write!(f, "{}", tiles.join(" "))?;
        if self.has_drawn() {
            write!(f, " | {}", tile_symbol(self.drawn))?;
        }
        Ok(())
    }
}

// 各座席の表示情報
#[derive(Debug, Clone, PartialEq)]
pub struct SeatView {
    pub position: Position,
    pub player_id: PlayerId,
    pub wind: Option<Wind>,
    pub point: Point,
    pub pile: DiscardPile,
}

impl SeatView {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            player_id: -1,
            wind: None,
            point: 0,
            pile: DiscardPile::new(position),
        }
    }
}

impl fmt::Display for SeatView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wind = match self.wind {
            Some(w) => w.to_string(),
            None => "-".to_string(),
        };
        write!(
            f,
            "{:<8} id: {:>2}, wind: {}, point: {:>6}, discards: [{}]",
            self.position.tag(),
            self.player_id,
            wind,
            self.point,
            self.pile,
        )
    }
}

// 局結果の表示内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub kind: RoundEndKind,
    pub rows: [RonInfo; SEAT],
}

// クライアントが保持する局の状態
// 状態を変更するのはRoundControllerのみで, 描画側は参照のみ
#[derive(Debug, Clone, PartialEq)]
pub struct ClientState {
    pub phase: Phase,
    pub round: RoundInfo,
    pub seats: [SeatView; SEAT],
    pub hand: Hand,
    // ReactionWindowを閉じた時に戻るフェーズ
    pub reaction_return: Option<Phase>,
    // 局結果 表示中のみSome
    pub round_result: Option<RoundResult>,
    // 最終結果 表示中のみSome
    pub standings: Option<[ResultInfo; SEAT]>,
}

impl ClientState {
    pub fn new() -> Self {
        Self {
            phase: Phase::AwaitingStart,
            round: RoundInfo::default(),
            seats: [
                SeatView::new(Position::Own),
                SeatView::new(Position::Down),
                SeatView::new(Position::Opposite),
                SeatView::new(Position::Up),
            ],
            hand: Hand::default(),
            reaction_return: None,
            round_result: None,
            standings: None,
        }
    }

    // 打牌可能 (ツモ牌を保持していてロン/スキップの選択中でない)
    pub fn may_discard(&self) -> bool {
        self.phase == Phase::SelfDrawn && self.hand.has_drawn()
    }

    // ロン/スキップの選択が可能
    pub fn may_react(&self) -> bool {
        self.phase == Phase::ReactionWindow
    }

    #[inline]
    pub fn seat(&self, position: Position) -> &SeatView {
        &self.seats[position.seat()]
    }

    #[inline]
    pub fn seat_mut(&mut self, position: Position) -> &mut SeatView {
        &mut self.seats[position.seat()]
    }

    pub fn points(&self) -> [Point; SEAT] {
        let mut points = [0; SEAT];
        for s in 0..SEAT {
            points[s] = self.seats[s].point;
        }
        points
    }

    pub fn set_points(&mut self, rows: &[RonInfo; SEAT]) {
        for (seat, r) in self.seats.iter_mut().zip(rows.iter()) {
            seat.point = r.point;
        }
    }

    pub fn clear_piles(&mut self) {
        for seat in &mut self.seats {
            seat.pile.clear();
        }
    }

    // 局情報を丸ごと置き換え (start, next)
    pub fn load_round(&mut self, info: &PlayInfo) {
        self.round = info.round;
        for (s, seat) in self.seats.iter_mut().enumerate() {
            seat.player_id = info.player_ids[s];
            seat.wind = Some(info.winds[s]);
            seat.point = info.points[s];
        }
        self.set_hand(&info.player_info.hands, info.player_info.drawn_tile);
        self.clear_piles();
        self.reaction_return = None;
        self.round_result = None;
        self.standings = None;
        self.phase = if self.hand.has_drawn() {
            Phase::SelfDrawn
        } else {
            Phase::TurnIdle
        };
    }

    pub fn set_hand(&mut self, tiles: &[TileId], drawn: TileId) {
        self.hand = Hand::new(tiles.to_vec(), drawn);
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "round: {}, phase: {:?}", self.round, self.phase)?;
        writeln!(f, "points: {}", vec_to_string(&self.points()))?;
        for seat in &self.seats {
            writeln!(f, "{}", seat)?;
        }
        write!(f, "hand: {}", self.hand)
    }
}

#[test]
fn test_hand_take() {
    let mut hand = Hand::new(vec![6, 2], 40);
    assert_eq!(hand.tiles, vec![2, 6]);
    assert!(hand.is_valid_target(1));
    assert!(!hand.is_valid_target(2));
    assert!(!hand.is_valid_target(-2));
    assert_eq!(hand.take(0), Some(2));
    assert_eq!(hand.tiles, vec![6]);
    assert_eq!(hand.drawn, NO_TILE);
    // ツモ牌なし
    assert_eq!(hand.take(-1), None);
}

#[test]
fn test_load_round() {
    let info = PlayInfo {
        player_ids: [0, 3, 2, 1],
        round: RoundInfo::default(),
        winds: [Wind::South, Wind::West, Wind::North, Wind::East],
        points: [26000, 25000, 24000, 25000],
        player_info: HandInfo {
            hands: vec![13, 1, 9, 5],
            drawn_tile: 77,
        },
    };
    let mut state = ClientState::new();
    state.seat_mut(Position::Up).pile.push(4);
    state.load_round(&info);

    assert_eq!(state.phase, Phase::SelfDrawn);
    assert!(state.may_discard());
    assert_eq!(state.hand.tiles, vec![1, 5, 9, 13]);
    assert_eq!(state.points(), [26000, 25000, 24000, 25000]);
    assert_eq!(state.seat(Position::Up).wind, Some(Wind::East));
    assert!(state.seat(Position::Up).pile.is_empty());
}
