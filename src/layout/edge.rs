use crate::model::*;

// 河の各マスの描画用の縁の種類 (見た目のみでゲーム状態には影響しない)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    None,        // 変更なし
    Middle,      // 中間の牌
    Bottom,      // 手前側の端の牌
    BottomParts, // 空きマスだが内側の隣が埋まっている (端の継ぎ目のみ描画)
}

impl EdgeClass {
    pub fn tag(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Middle => Some("middle"),
            Self::Bottom => Some("bottom"),
            Self::BottomParts => Some("bottom-parts"),
        }
    }
}

// 河の占有状態のみから決定する純粋関数
pub fn edge_class(position: Position, pile: &DiscardPile, slot: usize) -> EdgeClass {
    match position {
        Position::Own => edge_class_vertical(pile, slot),
        Position::Up => edge_class_horizontal(pile, slot),
        Position::Down | Position::Opposite => EdgeClass::None,
    }
}

fn has(pile: &DiscardPile, slot: Option<usize>) -> bool {
    slot.map_or(false, |s| pile.is_occupied(s))
}

// 自分の河: 6枚ずつの行に区切った縦向きの帯
fn edge_class_vertical(pile: &DiscardPile, i: usize) -> EdgeClass {
    let row_head = i - i % HO_ROW_SIZE;
    let next_row_head = Some(row_head + HO_ROW_SIZE);
    let upper = i.checked_sub(HO_ROW_SIZE);
    let below = Some(i + HO_ROW_SIZE);

    if !has(pile, next_row_head) {
        if pile.is_occupied(i) {
            EdgeClass::Bottom
        } else if has(pile, Some(row_head)) && has(pile, upper) {
            EdgeClass::BottomParts
        } else {
            EdgeClass::None
        }
    } else if pile.is_occupied(i) || !has(pile, below) {
        EdgeClass::Middle
    } else {
        EdgeClass::None
    }
}

// 上家の河: 横向き 列方向の隣(HO_COLUMN_SIZEマス手前)を見る
fn edge_class_horizontal(pile: &DiscardPile, i: usize) -> EdgeClass {
    let occupied = pile.is_occupied(i);
    if occupied && i >= HO_SIZE - HO_COLUMN_SIZE {
        EdgeClass::Bottom
    } else if !occupied && has(pile, i.checked_sub(HO_COLUMN_SIZE)) {
        EdgeClass::BottomParts
    } else {
        EdgeClass::Middle
    }
}

#[cfg(test)]
fn pile_with(position: Position, n: usize) -> DiscardPile {
    let mut pile = DiscardPile::new(position);
    for i in 0..n {
        pile.push(i as TileId);
    }
    pile
}

#[test]
fn test_edge_own_empty() {
    let pile = pile_with(Position::Own, 0);
    assert!(pile.edge_classes().iter().all(|&e| e == EdgeClass::None));
}

#[test]
fn test_edge_own_first_row() {
    let pile = pile_with(Position::Own, 1);
    assert_eq!(pile.edge_class(0), EdgeClass::Bottom);
    for i in 1..HO_SIZE {
        assert_eq!(pile.edge_class(i), EdgeClass::None, "slot {}", i);
    }
}

#[test]
fn test_edge_own_second_row() {
    let pile = pile_with(Position::Own, 7);
    for i in 0..6 {
        assert_eq!(pile.edge_class(i), EdgeClass::Middle, "slot {}", i);
    }
    assert_eq!(pile.edge_class(6), EdgeClass::Bottom);
    for i in 7..12 {
        assert_eq!(pile.edge_class(i), EdgeClass::BottomParts, "slot {}", i);
    }
    for i in 12..HO_SIZE {
        assert_eq!(pile.edge_class(i), EdgeClass::None, "slot {}", i);
    }
}

#[test]
fn test_edge_up() {
    let pile = pile_with(Position::Up, 1); // slot 3
    assert_eq!(pile.edge_class(3), EdgeClass::Middle);
    assert_eq!(pile.edge_class(7), EdgeClass::BottomParts);
    assert_eq!(pile.edge_class(0), EdgeClass::Middle);

    let pile = pile_with(Position::Up, 5); // slots 3, 7, 11, 15, 19
    assert_eq!(pile.edge_class(19), EdgeClass::Middle);
    assert_eq!(pile.edge_class(23), EdgeClass::BottomParts);

    let pile = pile_with(Position::Up, 6); // + slot 23
    assert_eq!(pile.edge_class(23), EdgeClass::Bottom);
}

#[test]
fn test_edge_down_opposite() {
    for p in [Position::Down, Position::Opposite] {
        let pile = pile_with(p, 10);
        assert!(pile.edge_classes().iter().all(|&e| e == EdgeClass::None));
    }
    assert_eq!(EdgeClass::BottomParts.tag(), Some("bottom-parts"));
    assert_eq!(EdgeClass::None.tag(), None);
}
