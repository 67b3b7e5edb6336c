pub type Seat = usize; // 自分から見た相対座席 (0: 自分, 1: 下家, 2: 対面, 3: 上家)
pub type TileId = i32; // 牌ID (0~135), 種類 = ID / 4
pub type Point = i32;
pub type PlayerId = i32;

pub const SEAT: usize = 4; // 座席数
pub const NO_TILE: TileId = -1; // 牌なし, 非公開
pub const TILE_ID_MAX: TileId = 135;
pub const TILE_KIND: usize = 34; // 牌の種類 (萬子, 筒子, 索子 各9種 + 字牌7種)
pub const TILE_COPY: usize = 4; // 各牌の枚数

// 河 (全座席で共通の6行x4列の座標系)
pub const HO_ROW_SIZE: usize = 6;
pub const HO_COLUMN_SIZE: usize = 4;
pub const HO_SIZE: usize = HO_ROW_SIZE * HO_COLUMN_SIZE;

// 局結果の表示時間 (経過後に自動でnextを送信)
pub const ROUND_RESULT_DURATION_MS: u64 = 2000;
