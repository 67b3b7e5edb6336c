use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::*;

// 受信メッセージの外枠
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub values: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Start,
    Next,
    Discard,
    Drawn,
    DiscardOther,
    Ron,
    Skip,
    DrawnRound,
    Result,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Next => "next",
            Self::Discard => "discard",
            Self::Drawn => "drawn",
            Self::DiscardOther => "discardOther",
            Self::Ron => "ron",
            Self::Skip => "skip",
            Self::DrawnRound => "drawnRound",
            Self::Result => "result",
        }
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "start" => Self::Start,
            "next" => Self::Next,
            "discard" => Self::Discard,
            "drawn" => Self::Drawn,
            "discardOther" => Self::DiscardOther,
            "ron" => Self::Ron,
            "skip" => Self::Skip,
            "drawnRound" => Self::DrawnRound,
            "result" => Self::Result,
            _ => return Err(format!("unknown message type: {}", s)),
        })
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn no_tile() -> TileId {
    NO_TILE
}

// 自分の手牌のスナップショット
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandInfo {
    pub hands: Vec<TileId>,
    #[serde(default = "no_tile")]
    pub drawn_tile: TileId,
}

// start, next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayInfo {
    pub player_ids: [PlayerId; SEAT],
    pub round: RoundInfo,
    pub winds: [Wind; SEAT],
    pub points: [Point; SEAT],
    pub player_info: HandInfo,
}

// drawn: 自分のツモと上家の捨て牌
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnInfo {
    pub hands: Vec<TileId>,
    #[serde(default = "no_tile")]
    pub drawn_tile: TileId,
    #[serde(default = "no_tile")]
    pub discarded_tile_up: TileId,
}

// discardOther: 他家の打牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardedTileInfo {
    pub player_position: Seat,
    pub discarded_tile: TileId,
    #[serde(default)]
    pub can_ron: bool,
}

// ron, drawnRound: 局終了時の各座席の点数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RonInfo {
    pub point: Point,
    #[serde(default)]
    pub point_diff: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnRoundInfo {
    pub ron_info: [RonInfo; SEAT],
}

// result: 最終順位 (order == 0 は順位なし)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultInfo {
    pub order: usize,
    pub point: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    Start(PlayInfo),
    Next(PlayInfo),
    Discard(HandInfo),
    Drawn(DrawnInfo),
    DiscardOther(DiscardedTileInfo),
    Ron([RonInfo; SEAT]),
    Skip,
    DrawnRound(DrawnRoundInfo),
    Result([ResultInfo; SEAT]),
    Unknown(String), // 未対応のtype 無視する
}

impl ServerMessage {
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let env: Envelope = serde_json::from_str(text).map_err(|e| ProtocolError::Envelope {
            message: e.to_string(),
        })?;
        Self::from_envelope(env)
    }

    pub fn from_envelope(env: Envelope) -> Result<Self, ProtocolError> {
        use MessageKind as K;

        let kind = match env.type_.parse::<MessageKind>() {
            Ok(k) => k,
            Err(_) => return Ok(Self::Unknown(env.type_)),
        };

        let v = env.values;
        let msg = match kind {
            K::Start => Self::Start(payload(kind, v)?),
            K::Next => Self::Next(payload(kind, v)?),
            K::Discard => Self::Discard(payload(kind, v)?),
            K::Drawn => Self::Drawn(payload(kind, v)?),
            K::DiscardOther => Self::DiscardOther(payload(kind, v)?),
            K::Ron => Self::Ron(payload(kind, v)?),
            K::Skip => Self::Skip,
            K::DrawnRound => Self::DrawnRound(payload(kind, v)?),
            K::Result => Self::Result(payload(kind, v)?),
        };
        msg.validate(kind)?;
        Ok(msg)
    }

    pub fn kind(&self) -> Option<MessageKind> {
        Some(match self {
            Self::Start(_) => MessageKind::Start,
            Self::Next(_) => MessageKind::Next,
            Self::Discard(_) => MessageKind::Discard,
            Self::Drawn(_) => MessageKind::Drawn,
            Self::DiscardOther(_) => MessageKind::DiscardOther,
            Self::Ron(_) => MessageKind::Ron,
            Self::Skip => MessageKind::Skip,
            Self::DrawnRound(_) => MessageKind::DrawnRound,
            Self::Result(_) => MessageKind::Result,
            Self::Unknown(_) => return None,
        })
    }

    // 牌IDと座席位置の範囲チェック
    fn validate(&self, kind: MessageKind) -> Result<(), ProtocolError> {
        let check_hand = |hands: &[TileId], drawn: TileId| -> Result<(), ProtocolError> {
            if let Some(&t) = hands.iter().find(|&&t| !is_tile(t)) {
                return Err(ProtocolError::InvalidTile { kind, tile: t });
            }
            check_tile_or_none(kind, drawn)
        };

        match self {
            Self::Start(p) | Self::Next(p) => {
                check_hand(&p.player_info.hands, p.player_info.drawn_tile)
            }
            Self::Discard(h) => check_hand(&h.hands, h.drawn_tile),
            Self::Drawn(d) => {
                check_hand(&d.hands, d.drawn_tile)?;
                check_tile_or_none(kind, d.discarded_tile_up)
            }
            Self::DiscardOther(d) => {
                if d.player_position >= SEAT {
                    return Err(ProtocolError::InvalidSeat {
                        kind,
                        position: d.player_position,
                    });
                }
                check_tile_or_none(kind, d.discarded_tile)
            }
            _ => Ok(()),
        }
    }
}

fn payload<T: DeserializeOwned>(kind: MessageKind, v: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(v).map_err(|e| ProtocolError::Payload {
        kind,
        message: e.to_string(),
    })
}

fn check_tile_or_none(kind: MessageKind, tile: TileId) -> Result<(), ProtocolError> {
    if tile == NO_TILE || is_tile(tile) {
        Ok(())
    } else {
        Err(ProtocolError::InvalidTile { kind, tile })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Discard,
    Ron,
    Skip,
    Next,
}

// 送信メッセージ targetは手牌のindex (ツモ牌の場合や対象がない場合は-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMessage {
    pub operation: Operation,
    pub target: i32,
}

impl ClientMessage {
    pub fn discard(target: i32) -> Self {
        Self {
            operation: Operation::Discard,
            target,
        }
    }

    pub fn ron() -> Self {
        Self {
            operation: Operation::Ron,
            target: -1,
        }
    }

    pub fn skip() -> Self {
        Self {
            operation: Operation::Skip,
            target: -1,
        }
    }

    pub fn next() -> Self {
        Self {
            operation: Operation::Next,
            target: -1,
        }
    }

    pub fn encode(&self) -> String {
        json!({
            "operation": self.operation,
            "target": self.target,
        })
        .to_string()
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

#[test]
fn test_decode_start() {
    let text = r#"{"type":"start","values":{
        "playerIds":[0,3,2,1],
        "round":{"wind":1,"round":1,"subRound":0},
        "winds":[1,2,3,4],
        "points":[25000,25000,25000,25000],
        "playerInfo":{"playerId":0,"wind":1,"hands":[13,9,5,1],"drawnTile":-1,"canRon":false}
    }}"#;
    match ServerMessage::decode(text).unwrap() {
        ServerMessage::Start(p) => {
            assert_eq!(p.player_ids, [0, 3, 2, 1]);
            assert_eq!(p.winds, [Wind::East, Wind::South, Wind::West, Wind::North]);
            assert_eq!(p.player_info.hands, vec![13, 9, 5, 1]);
            assert_eq!(p.player_info.drawn_tile, NO_TILE);
        }
        m => panic!("unexpected: {:?}", m),
    }
}

#[test]
fn test_decode_unknown_and_skip() {
    let m = ServerMessage::decode(r#"{"type":"chat","values":{"text":"hi"}}"#).unwrap();
    assert_eq!(m, ServerMessage::Unknown("chat".to_string()));
    assert_eq!(m.kind(), None);

    let m = ServerMessage::decode(r#"{"type":"skip"}"#).unwrap();
    assert_eq!(m, ServerMessage::Skip);
}

#[test]
fn test_decode_errors() {
    assert!(matches!(
        ServerMessage::decode("not json"),
        Err(ProtocolError::Envelope { .. })
    ));
    assert!(matches!(
        ServerMessage::decode(r#"{"values":{}}"#),
        Err(ProtocolError::Envelope { .. })
    ));
    // 4座席分ない
    assert!(matches!(
        ServerMessage::decode(r#"{"type":"ron","values":[{"point":1,"pointDiff":0}]}"#),
        Err(ProtocolError::Payload { kind: MessageKind::Ron, .. })
    ));
    assert!(matches!(
        ServerMessage::decode(
            r#"{"type":"discardOther","values":{"playerPosition":4,"discardedTile":8,"canRon":false}}"#
        ),
        Err(ProtocolError::InvalidSeat { position: 4, .. })
    ));
    assert!(matches!(
        ServerMessage::decode(r#"{"type":"discard","values":{"hands":[1,200],"drawnTile":-1}}"#),
        Err(ProtocolError::InvalidTile { tile: 200, .. })
    ));
}

#[test]
fn test_decode_drawn_round() {
    let text = r#"{"type":"drawnRound","values":{"ronInfo":[
        {"point":26500,"pointDiff":1500},{"point":23500,"pointDiff":-1500},
        {"point":26500,"pointDiff":1500},{"point":23500,"pointDiff":-1500}]}}"#;
    match ServerMessage::decode(text).unwrap() {
        ServerMessage::DrawnRound(d) => assert_eq!(d.ron_info[1].point_diff, -1500),
        m => panic!("unexpected: {:?}", m),
    }
}

#[test]
fn test_encode_client_message() {
    let v: Value = serde_json::from_str(&ClientMessage::discard(3).encode()).unwrap();
    assert_eq!(v, json!({"operation": "discard", "target": 3}));
    let v: Value = serde_json::from_str(&ClientMessage::next().encode()).unwrap();
    assert_eq!(v, json!({"operation": "next", "target": -1}));
}
