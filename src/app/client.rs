use std::time::{Duration, Instant};

use crate::controller::{RoundController, Session, Step};
use crate::model::*;
use crate::operator::create_operator;
use crate::render::{NullRender, Render, TextRender};
use crate::util::connection::{Connection, NullConnection, WsConnection};
use crate::util::misc::*;
use crate::{error, info, warn};

// [App]
#[derive(Debug)]
pub struct ClientApp {
    addr: String,
    operator: String,
    duration_ms: u64,
    edges: bool,
    quiet: bool,
    verbose: bool,
}

impl ClientApp {
    pub fn new(args: Vec<String>) -> Self {
        let mut app = Self {
            addr: "ws://127.0.0.1:8080/ws".to_string(),
            operator: "Manual".to_string(),
            duration_ms: ROUND_RESULT_DURATION_MS,
            edges: false,
            quiet: false,
            verbose: false,
        };

        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-a" => app.addr = next_value(&mut it, s),
                "-o" => app.operator = next_value(&mut it, s),
                "-w" => app.duration_ms = next_value(&mut it, s),
                "-e" => app.edges = true,
                "-q" => app.quiet = true,
                "-v" => app.verbose = true,
                opt => {
                    error!("unknown option: {}", opt);
                    std::process::exit(0);
                }
            }
        }

        app
    }

    pub fn run(&mut self) {
        super::apply_log_level(self.verbose, self.quiet);

        let operator = create_operator(&self.operator).unwrap_or_else(error_exit);
        info!("operator: {:?}", operator);

        let conn: Box<dyn Connection> = match WsConnection::connect(&self.addr) {
            Ok(c) => Box::new(c),
            Err(e) => {
                warn!("failed to connect to {}: {}", self.addr, e);
                Box::new(NullConnection)
            }
        };
        let render: Box<dyn Render> = if self.quiet {
            Box::new(NullRender)
        } else {
            Box::new(TextRender::new(self.edges))
        };

        let ctrl = RoundController::new(Duration::from_millis(self.duration_ms));
        let mut session = Session::new(conn, ctrl, render, Some(operator));

        // 接続がない場合も初期状態を一度だけ描画する
        if session.step(Instant::now()) == Step::Closed {
            if !self.quiet {
                TextRender::new(self.edges).render(session.state());
            }
            info!("no connection. local-only mode");
            return;
        }

        loop {
            match session.step(Instant::now()) {
                Step::Closed => break,
                Step::Updated => {}
                Step::Idle => sleep(0.01),
            }
        }

        let d = session.dispatcher();
        info!(
            "session closed. received: {}, applied: {}, ignored: {}, dropped: {}, sent: {}",
            d.received,
            d.applied,
            d.ignored,
            d.dropped,
            session.sent(),
        );
    }
}
