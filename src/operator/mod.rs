mod manual;
mod random;
mod tsumogiri;

pub use manual::Manual;

use std::fmt;

use crate::controller::Intent;
use crate::model::*;
use crate::util::variant::*;

#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub args: Vec<Arg>,
}

// 操作の入力元 (人間またはbot)
pub trait Operator: Send {
    // 現在の状態に対する操作を選択
    // 操作がない場合, 入力待ちの場合はNone (次のポーリングで再度呼び出される)
    // 無効な操作を返した場合はコントローラ側で破棄される
    fn select_intent(&mut self, state: &ClientState) -> Option<Intent>;

    // Operatorの詳細表示用
    fn get_config(&self) -> &Config;
}

impl fmt::Debug for dyn Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conf = self.get_config();
        let arg_str = conf
            .args
            .iter()
            .map(|a| format!("{}={}", a.name, a.value))
            .collect::<Vec<String>>()
            .join(",");
        write!(f, "{}({})", conf.name, arg_str)
    }
}

trait OperatorBuilder {
    fn get_default_config(&self) -> Config;
    fn create(&self, config: Config) -> Box<dyn Operator>;
}

// "Name(arg1,arg2)" 形式の文字列からOperatorを生成
// 省略または空の引数はデフォルト値を使用
pub fn create_operator(exp: &str) -> Result<Box<dyn Operator>, String> {
    let builders: Vec<Box<dyn OperatorBuilder>> = vec![
        Box::new(manual::ManualBuilder {}),
        Box::new(random::RandomBuilder {}),
        Box::new(tsumogiri::TsumogiriBuilder {}),
    ];

    let name: &str;
    let args: Vec<&str>;
    let paren_left = exp.find('(');
    let paren_right = exp.rfind(')');
    if let (Some(l), Some(r)) = (paren_left, paren_right) {
        if r < l {
            return Err(format!("invalid paren: {}", exp));
        }
        args = exp[l + 1..r].split(',').map(|a| a.trim()).collect();
        name = &exp[..l];
    } else {
        args = vec![];
        name = exp;
    }

    for b in &builders {
        let mut conf = b.get_default_config();
        if name != conf.name {
            continue;
        }

        if conf.args.len() < args.len() && !(args.len() == 1 && args[0].is_empty()) {
            return Err(format!(
                "expected {} arguments for {}. but {} arguments are provided.",
                conf.args.len(),
                name,
                args.len(),
            ));
        }

        for (i, &a) in args.iter().enumerate() {
            if !a.is_empty() {
                conf.args[i].value = conf.args[i]
                    .value
                    .parse_as(a)
                    .map_err(|e| format!("{}: {}", e, a))?;
            }
        }
        return Ok(b.create(conf));
    }

    Err(format!("unknown operator name: {}", name))
}

#[test]
fn test_create_operator() {
    let op = create_operator("Random(7,0.25)").unwrap();
    assert_eq!(format!("{:?}", op), "Random(seed=7,ron_rate=0.25)");

    let op = create_operator("Random(,1)").unwrap();
    assert_eq!(format!("{:?}", op), "Random(seed=0,ron_rate=1)");

    let op = create_operator("Tsumogiri()").unwrap();
    assert_eq!(format!("{:?}", op), "Tsumogiri()");
    assert!(create_operator("Manual").is_ok());

    assert!(create_operator("Unknown").is_err());
    assert!(create_operator("Random(1,2,3)").is_err());
    assert!(create_operator("Random(x)").is_err());
    assert!(create_operator("Random)1(").is_err());
}
