use super::*;
use crate::layout::{edge_class, slot_for, EdgeClass};

// 河 (捨て牌)
// tilesは捨てた順, slotsは共通座標系(HO_SIZEマス)上の配置
// 配置はlayout::slot_forで捨てた順から一意に決まる
#[derive(Debug, Clone, PartialEq)]
pub struct DiscardPile {
    position: Position,
    tiles: Vec<TileId>,
    slots: [Option<TileId>; HO_SIZE],
}

impl DiscardPile {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            tiles: vec![],
            slots: [None; HO_SIZE],
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.tiles.len() >= HO_SIZE
    }

    // 捨てた順の牌一覧
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    // 牌を追加して配置したslotを返却 (満杯の場合はNone)
    pub fn push(&mut self, tile: TileId) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let slot = slot_for(self.position, self.tiles.len());
        debug_assert!(self.slots[slot].is_none());
        self.slots[slot] = Some(tile);
        self.tiles.push(tile);
        Some(slot)
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.slots = [None; HO_SIZE];
    }

    pub fn slot_of(&self, order: usize) -> Option<usize> {
        if order < self.tiles.len() {
            Some(slot_for(self.position, order))
        } else {
            None
        }
    }

    pub fn tile_at(&self, slot: usize) -> Option<TileId> {
        self.slots.get(slot).copied().flatten()
    }

    #[inline]
    pub fn is_occupied(&self, slot: usize) -> bool {
        self.tile_at(slot).is_some()
    }

    pub fn edge_class(&self, slot: usize) -> EdgeClass {
        edge_class(self.position, self, slot)
    }

    pub fn edge_classes(&self) -> [EdgeClass; HO_SIZE] {
        let mut res = [EdgeClass::None; HO_SIZE];
        for (slot, e) in res.iter_mut().enumerate() {
            *e = self.edge_class(slot);
        }
        res
    }
}

impl fmt::Display for DiscardPile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tiles: Vec<String> = self.tiles.iter().map(|&t| tile_symbol(t)).collect();
        write!(f, "{}", tiles.join(" "))
    }
}

#[test]
fn test_push_and_clear() {
    let mut pile = DiscardPile::new(Position::Opposite);
    assert_eq!(pile.push(8), Some(23));
    assert_eq!(pile.push(12), Some(22));
    assert_eq!(pile.tiles(), &[8, 12]);
    assert_eq!(pile.tile_at(23), Some(8));
    assert_eq!(pile.slot_of(1), Some(22));
    assert_eq!(pile.slot_of(2), None);
    assert!(!pile.is_occupied(0));
    assert_eq!(pile.to_string(), "m3 m4");

    pile.clear();
    assert!(pile.is_empty());
    assert!(!pile.is_occupied(23));
}

#[test]
fn test_full_pile() {
    let mut pile = DiscardPile::new(Position::Down);
    for i in 0..HO_SIZE {
        assert!(pile.push(i as TileId).is_some());
    }
    assert!(pile.is_full());
    // 全マスが埋まる
    assert!((0..HO_SIZE).all(|s| pile.is_occupied(s)));
    assert_eq!(pile.push(100), None);
    assert_eq!(pile.len(), HO_SIZE);
}
