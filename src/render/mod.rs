mod text;

use std::fmt;

use crate::model::*;

pub use text::TextRender;

// 状態の描画 描画側は状態を参照するのみで変更しない
pub trait Render: Send {
    fn render(&mut self, _state: &ClientState) {}
}

impl fmt::Debug for dyn Render {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Render")
    }
}

// 何も描画しない
#[derive(Debug, Default)]
pub struct NullRender;

impl Render for NullRender {}
