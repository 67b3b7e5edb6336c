use std::fmt;
use std::sync::mpsc;
use std::thread;

use crate::error;

pub type Res<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn next_value<T>(it: &mut std::slice::Iter<'_, String>, opt: &str) -> T
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let n = it
        .next()
        .unwrap_or_else(|| error_exit(format!("{}: value missing", opt)));
    n.parse()
        .unwrap_or_else(|e| error_exit(format!("{}: {} '{}'", opt, e, n)))
}

pub fn sleep(sec: f64) {
    std::thread::sleep(std::time::Duration::from_millis((sec * 1000.0) as u64));
}

// 標準入力を別スレッドで1行ずつ読み込んでチャネルに送る
// 受信側はtry_recv()でポーリングする (イベントループをブロックしない)
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        loop {
            let mut buf = String::new();
            match stdin.read_line(&mut buf) {
                Ok(0) => break, // EOF
                Ok(_) => {
                    if tx.send(buf).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("stdin error: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

pub fn print_prompt() {
    use std::io::{stdout, Write};
    print!("> ");
    stdout().flush().ok();
}

pub fn error_exit<T: fmt::Display, U>(t: T) -> U {
    error!("{}", t);
    std::process::exit(1);
}

pub fn vec_to_string<T: fmt::Display>(v: &[T]) -> String {
    let vs: Vec<String> = v.iter().map(|x| format!("{}", x)).collect();
    "[".to_string() + &vs.join(", ") + "]"
}

// 0の場合は空文字, それ以外は符号付きで表示
pub fn signed_or_blank(v: i32) -> String {
    if v == 0 {
        String::new()
    } else {
        format!("{:+}", v)
    }
}

#[test]
fn test_format() {
    assert_eq!(vec_to_string(&[1, 5, 9]), "[1, 5, 9]");
    assert_eq!(vec_to_string::<i32>(&[]), "[]");
    assert_eq!(signed_or_blank(0), "");
    assert_eq!(signed_or_blank(4000), "+4000");
    assert_eq!(signed_or_blank(-1000), "-1000");
}
