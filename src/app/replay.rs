use std::time::{Duration, Instant};

use crate::controller::{Intent, RoundController, Session, Step};
use crate::model::ROUND_RESULT_DURATION_MS;
use crate::render::{NullRender, Render, TextRender};
use crate::util::connection::QueueConnection;
use crate::util::misc::*;
use crate::{debug, error, info};

// 受信メッセージを記録したファイルを再生してローカルで表示する
#[derive(Debug)]
pub struct ReplayApp {
    file_path: String,
    pause: f64,
    edges: bool,
    quiet: bool,
    verbose: bool,
}

impl ReplayApp {
    pub fn new(args: Vec<String>) -> Self {
        use std::process::exit;

        let mut app = Self {
            file_path: String::new(),
            pause: 0.0,
            edges: false,
            quiet: false,
            verbose: false,
        };

        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-f" => app.file_path = next_value(&mut it, s),
                "-p" => app.pause = next_value(&mut it, s),
                "-e" => app.edges = true,
                "-q" => app.quiet = true,
                "-v" => app.verbose = true,
                opt => {
                    error!("unknown option: {}", opt);
                    exit(0);
                }
            }
        }

        if app.file_path.is_empty() {
            error!("file(-f) not specified");
            exit(0);
        }

        app
    }

    pub fn run(&mut self) {
        super::apply_log_level(self.verbose, self.quiet);

        let contents = std::fs::read_to_string(&self.file_path).unwrap_or_else(error_exit);
        let texts = load_envelopes(&contents).unwrap_or_else(error_exit);
        info!("source file: {} ({} messages)", self.file_path, texts.len());

        let render: Box<dyn Render> = if self.quiet {
            Box::new(NullRender)
        } else {
            Box::new(TextRender::new(self.edges))
        };
        let mut session = replay(texts, render, self.pause);

        let d = session.dispatcher();
        info!(
            "replay finished. applied: {}, ignored: {}, dropped: {}",
            d.applied,
            d.ignored,
            d.dropped,
        );
        for msg in session.conn().sent() {
            debug!("outbound: {}", msg);
        }
    }
}

// 記録されたメッセージを順に適用する
// 局結果は表示後すぐに閉じる (タイマーを待たない)
pub fn replay(
    texts: Vec<String>,
    render: Box<dyn Render>,
    pause: f64,
) -> Session<QueueConnection> {
    let ctrl = RoundController::new(Duration::from_millis(ROUND_RESULT_DURATION_MS));
    let mut session = Session::new(QueueConnection::new(texts), ctrl, render, None);
    loop {
        match session.step(Instant::now()) {
            Step::Closed => break,
            Step::Updated => {
                if session.state().round_result.is_some() {
                    session.apply_intent(Intent::DismissRoundResult);
                }
                if pause > 0.0 {
                    sleep(pause);
                }
            }
            Step::Idle => {}
        }
    }
    session
}

// JSON配列 または1行に1つのエンベロープ
pub fn load_envelopes(contents: &str) -> Res<Vec<String>> {
    let trimmed = contents.trim_start();
    if trimmed.starts_with('[') {
        let values: Vec<serde_json::Value> = serde_json::from_str(trimmed)?;
        Ok(values.iter().map(|v| v.to_string()).collect())
    } else {
        Ok(contents
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect())
    }
}

#[test]
fn test_load_envelopes() {
    let arr = r#"[{"type":"skip"}, {"type":"chat","values":{}}]"#;
    let texts = load_envelopes(arr).unwrap();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("skip"));

    let lines = "{\"type\":\"skip\"}\n\n  {\"type\":\"next\",\"values\":{}}\n";
    let texts = load_envelopes(lines).unwrap();
    assert_eq!(texts, vec![r#"{"type":"skip"}"#, r#"{"type":"next","values":{}}"#]);

    assert!(load_envelopes("[1, 2").is_err());
}
