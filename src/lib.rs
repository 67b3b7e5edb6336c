#![warn(rust_2018_idioms)]
// 構造的な意味合いや一貫性を保つために以下の警告は無効化
#![allow(clippy::useless_format)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::new_without_default)]

pub mod app;
pub mod controller;
pub mod layout;
pub mod model;
pub mod operator;
pub mod render;
pub mod util;
