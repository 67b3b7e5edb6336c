// mainから直接呼び出すアプリケーションの動作モード(C, R)のモジュール

mod client;
mod replay;

pub use client::ClientApp;
pub use replay::{load_envelopes, replay, ReplayApp};

use crate::util::log;

// -v, -q によるログレベルの変更
fn apply_log_level(verbose: bool, quiet: bool) {
    if quiet {
        log::set_level(log::LEVEL_WARN);
    } else if verbose {
        log::set_level(log::LEVEL_DEBUG);
    }
}
