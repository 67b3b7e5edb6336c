use std::sync::mpsc;

use super::*;
use crate::error;
use crate::util::misc::{print_prompt, spawn_stdin_reader};

pub struct ManualBuilder;

impl OperatorBuilder for ManualBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "Manual".to_string(),
            args: vec![Arg::bool("hint", true)],
        }
    }

    fn create(&self, config: Config) -> Box<dyn Operator> {
        Box::new(Manual::from_config(config))
    }
}

// 標準入力からの操作
// 入力は別スレッドで読み込み, select_intentでは受信済みの行のみ処理する
// 入力は処理時点の状態で解釈するので, 入力中に状態が変わった場合はコントローラ側で破棄される
#[derive(Debug)]
pub struct Manual {
    config: Config,
    hint: bool,
    input: Option<mpsc::Receiver<String>>,
    hinted: Option<(Phase, bool)>, // ヒントを表示済みの状態
}

impl Manual {
    pub fn from_config(config: Config) -> Self {
        let hint = config.args[0].value.as_bool();
        Self {
            config,
            hint,
            input: None,
            hinted: None,
        }
    }

    // 標準入力の代わりにチャネルから入力を受け取る
    pub fn from_receiver(rx: mpsc::Receiver<String>) -> Self {
        let mut m = Self::from_config(ManualBuilder.get_default_config());
        m.hint = false;
        m.input = Some(rx);
        m
    }

    fn print_hint(&mut self, state: &ClientState) {
        let key = (state.phase, state.round_result.is_some());
        if !self.hint || self.hinted == Some(key) {
            return;
        }
        self.hinted = Some(key);

        if state.may_discard() {
            println!(
                "[Discard] 0~{}: hand index, d: drawn tile",
                state.hand.tiles.len().saturating_sub(1)
            );
        } else if state.may_react() {
            println!("[Reaction] r: ron, s: skip");
        } else if state.round_result.is_some() {
            println!("[Round Result] n: next");
        } else if state.phase == Phase::GameEnd {
            println!("[Result] n: close");
        } else {
            return;
        }
        print_prompt();
    }
}

impl Operator for Manual {
    fn select_intent(&mut self, state: &ClientState) -> Option<Intent> {
        self.print_hint(state);

        let rx = self.input.get_or_insert_with(spawn_stdin_reader);
        let buf = match rx.try_recv() {
            Ok(buf) => buf,
            Err(_) => return None, // 未入力 または入力終了
        };

        let cmd = buf.trim();
        let intent = parse_command(cmd, state);
        if intent.is_none() && !cmd.is_empty() {
            error!("invalid input: {}", cmd);
        }
        intent
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

fn parse_command(cmd: &str, state: &ClientState) -> Option<Intent> {
    match cmd {
        "" => None,
        "d" => Some(Intent::Discard(-1)),
        "r" => Some(Intent::Ron),
        "s" => Some(Intent::Skip),
        "n" => {
            if state.round_result.is_some() {
                Some(Intent::DismissRoundResult)
            } else {
                Some(Intent::DismissGameResult)
            }
        }
        _ => cmd.parse::<i32>().ok().filter(|&i| i >= 0).map(Intent::Discard),
    }
}

#[test]
fn test_parse_command() {
    let mut state = ClientState::new();
    assert_eq!(parse_command("", &state), None);
    assert_eq!(parse_command("d", &state), Some(Intent::Discard(-1)));
    assert_eq!(parse_command("3", &state), Some(Intent::Discard(3)));
    assert_eq!(parse_command("-1", &state), None);
    assert_eq!(parse_command("x", &state), None);
    assert_eq!(parse_command("r", &state), Some(Intent::Ron));
    assert_eq!(parse_command("s", &state), Some(Intent::Skip));
    assert_eq!(parse_command("n", &state), Some(Intent::DismissGameResult));

    state.round_result = Some(RoundResult {
        kind: RoundEndKind::Win,
        rows: [RonInfo::default(); SEAT],
    });
    assert_eq!(parse_command("n", &state), Some(Intent::DismissRoundResult));
}

#[test]
fn test_manual_polls_input() {
    let (tx, rx) = mpsc::channel();
    let mut op = Manual::from_receiver(rx);
    let mut state = ClientState::new();
    state.phase = Phase::ReactionWindow;

    // 入力がなければブロックせずにNone
    assert_eq!(op.select_intent(&state), None);

    tx.send("r\n".to_string()).unwrap();
    assert_eq!(op.select_intent(&state), Some(Intent::Ron));
    assert_eq!(op.select_intent(&state), None);

    state.phase = Phase::RoundEnd(RoundEndKind::Draw);
    state.round_result = Some(RoundResult {
        kind: RoundEndKind::Draw,
        rows: [RonInfo::default(); SEAT],
    });
    tx.send("n\n".to_string()).unwrap();
    assert_eq!(op.select_intent(&state), Some(Intent::DismissRoundResult));

    // 送信側が閉じてもNone
    drop(tx);
    assert_eq!(op.select_intent(&state), None);
}
