use super::*;

#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// エンベロープ({type, values})として解釈できない
    Envelope { message: String },
    /// valuesの形式が不正
    Payload { kind: MessageKind, message: String },
    /// 座席位置が範囲外
    InvalidSeat { kind: MessageKind, position: Seat },
    /// 牌IDが範囲外
    InvalidTile { kind: MessageKind, tile: TileId },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope { message } => write!(f, "malformed envelope: {}", message),
            Self::Payload { kind, message } => {
                write!(f, "malformed '{}' payload: {}", kind, message)
            }
            Self::InvalidSeat { kind, position } => {
                write!(f, "invalid seat position in '{}': {}", kind, position)
            }
            Self::InvalidTile { kind, tile } => {
                write!(f, "invalid tile id in '{}': {}", kind, tile)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}
