use std::collections::VecDeque;
use std::fmt;
use std::net::TcpStream;

use super::misc::Res;
use crate::{error, info, warn};

#[derive(Debug, PartialEq, Eq)]
pub enum Message {
    Open,
    Text(String),
    Close,
    NoMessage,
    NoConnection,
}

pub trait Connection: Send {
    // 送信は投げっぱなし (送達確認, 再送は行わない)
    fn send(&mut self, _msg: &str);
    // ノンブロッキング 受信するものがなければMessage::NoMessageを返却
    fn recv(&mut self) -> Message;
}

impl fmt::Debug for dyn Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Connection")
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn send(&mut self, msg: &str) {
        (**self).send(msg)
    }

    fn recv(&mut self) -> Message {
        (**self).recv()
    }
}

// websocket (client)
type WsStream = websocket::sync::Client<TcpStream>;
pub struct WsConnection {
    stream: Option<WsStream>,
    is_new: bool,
}

impl WsConnection {
    pub fn connect(url: &str) -> Res<Self> {
        let stream = websocket::ClientBuilder::new(url)?.connect_insecure()?;
        stream.set_nonblocking(true)?;
        Ok(Self {
            stream: Some(stream),
            is_new: true,
        })
    }
}

impl Connection for WsConnection {
    fn send(&mut self, msg: &str) {
        if let Some(stream) = self.stream.as_mut() {
            stream
                .send_message(&websocket::OwnedMessage::Text(msg.to_string()))
                .ok();
        }
    }

    fn recv(&mut self) -> Message {
        let stream = match self.stream.as_mut() {
            Some(s) => s,
            None => return Message::NoConnection,
        };

        if self.is_new {
            self.is_new = false;
            match stream.peer_addr() {
                Ok(addr) => info!("ws connection opened to: {}", addr),
                Err(_) => info!("ws connection opened"),
            }
            return Message::Open;
        }

        loop {
            use websocket::OwnedMessage;
            match stream.recv_message() {
                Ok(msg) => match msg {
                    OwnedMessage::Close(_) => {
                        let msg = OwnedMessage::Close(None);
                        stream.send_message(&msg).ok();
                        break;
                    }
                    OwnedMessage::Ping(ping) => {
                        let msg = OwnedMessage::Pong(ping);
                        stream.send_message(&msg).ok();
                    }
                    OwnedMessage::Text(text) => {
                        return Message::Text(text);
                    }
                    _ => {
                        warn!("ws unhandled message: {:?}", msg);
                    }
                },
                Err(e) => {
                    use websocket::WebSocketError;
                    match &e {
                        WebSocketError::NoDataAvailable => return Message::NoMessage,
                        WebSocketError::IoError(io)
                            if io.kind() == std::io::ErrorKind::WouldBlock =>
                        {
                            return Message::NoMessage
                        }
                        _ => error!("ws error: {}", e),
                    }
                    break;
                }
            }
        }

        self.stream = None;
        info!("ws connection closed");
        Message::Close
    }
}

// メッセージチャネルが利用できない場合のダミー (ローカル表示のみ)
#[derive(Debug, Default)]
pub struct NullConnection;

impl Connection for NullConnection {
    fn send(&mut self, _msg: &str) {}

    fn recv(&mut self) -> Message {
        Message::NoConnection
    }
}

// 事前に用意したテキストを順に返却し, 送信されたテキストを記録する
// リプレイとテストで使用
#[derive(Debug, Default)]
pub struct QueueConnection {
    inbound: VecDeque<String>,
    outbound: Vec<String>,
    is_new: bool,
}

impl QueueConnection {
    pub fn new(inbound: Vec<String>) -> Self {
        Self {
            inbound: inbound.into(),
            outbound: vec![],
            is_new: true,
        }
    }

    pub fn sent(&self) -> &[String] {
        &self.outbound
    }
}

impl Connection for QueueConnection {
    fn send(&mut self, msg: &str) {
        self.outbound.push(msg.to_string());
    }

    fn recv(&mut self) -> Message {
        if self.is_new {
            self.is_new = false;
            return Message::Open;
        }
        match self.inbound.pop_front() {
            Some(t) => Message::Text(t),
            None => Message::Close,
        }
    }
}

#[test]
fn test_queue_connection() {
    let mut conn = QueueConnection::new(vec!["a".to_string()]);
    assert_eq!(conn.recv(), Message::Open);
    assert_eq!(conn.recv(), Message::Text("a".to_string()));
    assert_eq!(conn.recv(), Message::Close);
    conn.send("b");
    assert_eq!(conn.sent(), &["b".to_string()]);
}

#[test]
fn test_null_connection() {
    let mut conn = NullConnection;
    conn.send("ignored");
    assert_eq!(conn.recv(), Message::NoConnection);
}
