use super::*;

// 牌IDから牌の種類(0~33)を取得 NO_TILEや範囲外の場合はNone
#[inline]
pub fn tile_kind(id: TileId) -> Option<usize> {
    if is_tile(id) {
        Some(id as usize / TILE_COPY)
    } else {
        None
    }
}

#[inline]
pub fn is_tile(id: TileId) -> bool {
    (0..=TILE_ID_MAX).contains(&id)
}

// 牌譜表記 (m1~m9, p1~p9, s1~s9, z1~z7)
// z5: 白, z6: 發, z7: 中
pub fn tile_symbol(id: TileId) -> String {
    match tile_kind(id) {
        Some(k) => format!("{}{}", ['m', 'p', 's', 'z'][k / 9], k % 9 + 1),
        None => "--".to_string(),
    }
}

pub fn tile_unicode(id: TileId) -> char {
    let k = match tile_kind(id) {
        Some(k) => k as u32,
        None => return '\u{1F02B}', // 裏向き
    };
    let code = match k / 9 {
        0 => 0x1F007 + k,           // 萬子
        1 => 0x1F019 + (k - 9),     // 筒子
        2 => 0x1F010 + (k - 18),    // 索子
        _ => match k - 27 {
            0..=3 => 0x1F000 + (k - 27), // 東南西北
            4 => 0x1F006,                // 白
            5 => 0x1F005,                // 發
            _ => 0x1F004,                // 中
        },
    };
    char::from_u32(code).unwrap_or('?')
}

#[test]
fn test_tile_kind() {
    assert_eq!(tile_kind(0), Some(0));
    assert_eq!(tile_kind(3), Some(0));
    assert_eq!(tile_kind(8), Some(2));
    assert_eq!(tile_kind(40), Some(10));
    assert_eq!(tile_kind(TILE_ID_MAX), Some(TILE_KIND - 1));
    assert_eq!(tile_kind(NO_TILE), None);
    assert_eq!(tile_kind(136), None);
}

#[test]
fn test_tile_symbol() {
    assert_eq!(tile_symbol(0), "m1");
    assert_eq!(tile_symbol(35), "m9");
    assert_eq!(tile_symbol(36), "p1");
    assert_eq!(tile_symbol(72), "s1");
    assert_eq!(tile_symbol(108), "z1");
    assert_eq!(tile_symbol(135), "z7");
    assert_eq!(tile_symbol(NO_TILE), "--");
    assert_eq!(tile_unicode(0), '🀇');
    assert_eq!(tile_unicode(124), '🀆');
    assert_eq!(tile_unicode(132), '🀄');
}
