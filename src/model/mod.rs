// クライアント側のデータモデル
mod define;
mod discard;
mod error;
mod message;
mod position;
mod state;
mod tile;
mod wind;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use define::*;
pub use discard::*;
pub use error::*;
pub use message::*;
pub use position::*;
pub use state::*;
pub use tile::*;
pub use wind::*;
