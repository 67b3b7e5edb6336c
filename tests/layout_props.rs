//! Property tests for the discard layout and edge classes.

use std::collections::HashSet;

use mahjong_client::layout::{edge_class, slot_for, EdgeClass};
use mahjong_client::model::*;
use proptest::prelude::*;

fn position() -> impl Strategy<Value = Position> {
    prop::sample::select(Position::ALL.to_vec())
}

fn filled(position: Position, n: usize) -> DiscardPile {
    let mut pile = DiscardPile::new(position);
    for i in 0..n {
        pile.push(i as TileId * 4);
    }
    pile
}

#[test]
fn full_pile_is_a_bijection() {
    for &p in &Position::ALL {
        let slots: HashSet<usize> = (0..HO_SIZE).map(|n| slot_for(p, n)).collect();
        assert_eq!(slots.len(), HO_SIZE, "{:?}", p);
        assert!(slots.iter().all(|&s| s < HO_SIZE), "{:?}", p);
    }
}

proptest! {
    #[test]
    fn own_slot_is_order(n in 0..HO_SIZE) {
        prop_assert_eq!(slot_for(Position::Own, n), n);
    }

    #[test]
    fn opposite_mirrors_own(n in 0..HO_SIZE) {
        prop_assert_eq!(slot_for(Position::Opposite, n), HO_SIZE - 1 - n);
    }

    #[test]
    fn occupied_slots_match_layout(p in position(), n in 0..=HO_SIZE) {
        let pile = filled(p, n);
        prop_assert_eq!(pile.len(), n);
        let expected: HashSet<usize> = (0..n).map(|i| slot_for(p, i)).collect();
        let occupied: HashSet<usize> = (0..HO_SIZE).filter(|&s| pile.is_occupied(s)).collect();
        prop_assert_eq!(occupied, expected);
        for i in 0..n {
            prop_assert_eq!(pile.slot_of(i), Some(slot_for(p, i)));
            prop_assert_eq!(pile.tile_at(slot_for(p, i)), Some(i as TileId * 4));
        }
    }

    #[test]
    fn full_pile_rejects_more(p in position(), extra in 1usize..5) {
        let mut pile = filled(p, HO_SIZE);
        let before = pile.clone();
        for _ in 0..extra {
            prop_assert_eq!(pile.push(0), None);
        }
        prop_assert_eq!(pile, before);
    }

    #[test]
    fn edge_class_depends_on_occupancy_only(p in position(), n in 0..=HO_SIZE, t in 0..=TILE_ID_MAX) {
        // 牌の種類が違っても占有状態が同じなら結果は同じ
        let a = filled(p, n);
        let mut b = DiscardPile::new(p);
        for _ in 0..n {
            b.push(t);
        }
        for slot in 0..HO_SIZE {
            prop_assert_eq!(edge_class(p, &a, slot), edge_class(p, &b, slot));
        }
    }

    #[test]
    fn edge_class_by_position(p in position(), n in 0..=HO_SIZE) {
        let pile = filled(p, n);
        for (slot, e) in pile.edge_classes().iter().enumerate() {
            match p {
                Position::Down | Position::Opposite => prop_assert_eq!(*e, EdgeClass::None),
                Position::Own => {
                    if pile.is_occupied(slot) {
                        prop_assert!(*e == EdgeClass::Middle || *e == EdgeClass::Bottom);
                    }
                }
                Position::Up => prop_assert!(*e != EdgeClass::None),
            }
        }
    }

    #[test]
    fn other_seat_discard_keeps_edges(counts in prop::array::uniform4(0..HO_SIZE), seat in 0..SEAT) {
        let mut state = ClientState::new();
        for (s, &n) in counts.iter().enumerate() {
            for i in 0..n {
                state.seats[s].pile.push(i as TileId);
            }
        }
        let before: Vec<_> = state.seats.iter().map(|s| s.pile.edge_classes()).collect();
        state.seats[seat].pile.push(100);
        for (s, e) in before.iter().enumerate() {
            if s != seat {
                prop_assert_eq!(&state.seats[s].pile.edge_classes(), e);
            }
        }
    }
}
