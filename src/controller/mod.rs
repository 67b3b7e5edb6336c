// サーバとの同期 (受信メッセージの適用, 操作の検証, 局結果のタイマー)
mod dispatcher;
mod round_controller;
mod session;

pub use dispatcher::{Dispatched, Dispatcher};
pub use round_controller::{Intent, RoundController};
pub use session::{Session, Step};
