use crate::model::*;

// 捨てた順(order)から河の共通座標系(6行x4列=24マス)上のマスを決定
// 4座席の河は同じ座標系を共有するので, 各式は卓上の向きに合わせた固定値
// orderはHO_SIZE未満であること
pub fn slot_for(position: Position, order: usize) -> usize {
    debug_assert!(order < HO_SIZE);
    let n = order;
    match position {
        // 先頭から順に埋める
        Position::Own => n,
        // 末尾側から列方向を逆に進み, 6枚ごとに次の行へ
        Position::Down => {
            let m = n + 1;
            let row = (m + HO_ROW_SIZE - 1) / HO_ROW_SIZE; // ceil(m / 6)
            (HO_SIZE - 1 - (m % HO_ROW_SIZE) * HO_COLUMN_SIZE + row) % HO_SIZE
        }
        // 自分の河を180度回転
        Position::Opposite => HO_SIZE - 1 - n,
        // 4マス飛ばしで埋め, 6枚ごとに1つずらす
        Position::Up => (n * HO_COLUMN_SIZE + 3) % HO_SIZE - n / HO_ROW_SIZE,
    }
}

#[test]
fn test_slot_own() {
    for n in 0..HO_SIZE {
        assert_eq!(slot_for(Position::Own, n), n);
    }
}

#[test]
fn test_slot_down() {
    let slots: Vec<usize> = (0..HO_SIZE).map(|n| slot_for(Position::Down, n)).collect();
    assert_eq!(
        slots,
        vec![
            20, 16, 12, 8, 4, 0, //
            21, 17, 13, 9, 5, 1, //
            22, 18, 14, 10, 6, 2, //
            23, 19, 15, 11, 7, 3,
        ]
    );
}

#[test]
fn test_slot_opposite() {
    assert_eq!(slot_for(Position::Opposite, 0), 23);
    assert_eq!(slot_for(Position::Opposite, 23), 0);
}

#[test]
fn test_slot_up() {
    let slots: Vec<usize> = (0..HO_SIZE).map(|n| slot_for(Position::Up, n)).collect();
    assert_eq!(
        slots,
        vec![
            3, 7, 11, 15, 19, 23, //
            2, 6, 10, 14, 18, 22, //
            1, 5, 9, 13, 17, 21, //
            0, 4, 8, 12, 16, 20,
        ]
    );
}
