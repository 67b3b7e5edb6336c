// 河の配置 (座席ごとのマス割り当てと描画用の縁の判定)
mod edge;
mod slot;

pub use edge::{edge_class, EdgeClass};
pub use slot::slot_for;
