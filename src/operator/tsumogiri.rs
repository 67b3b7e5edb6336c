use super::*;

pub struct TsumogiriBuilder;

impl OperatorBuilder for TsumogiriBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "Tsumogiri".to_string(),
            args: vec![],
        }
    }

    fn create(&self, config: Config) -> Box<dyn Operator> {
        Box::new(Tsumogiri::from_config(config))
    }
}

// ツモ切りのみ行い, ロンはすべて見送る
#[derive(Debug, Clone)]
pub struct Tsumogiri {
    config: Config,
}

impl Tsumogiri {
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }
}

impl Operator for Tsumogiri {
    fn select_intent(&mut self, state: &ClientState) -> Option<Intent> {
        if state.may_discard() {
            Some(Intent::Discard(-1))
        } else if state.may_react() {
            Some(Intent::Skip)
        } else {
            None
        }
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

#[test]
fn test_tsumogiri() {
    let mut op = Tsumogiri::from_config(TsumogiriBuilder.get_default_config());
    let mut state = ClientState::new();
    assert_eq!(op.select_intent(&state), None);

    state.phase = Phase::SelfDrawn;
    state.set_hand(&[1, 2], 9);
    assert_eq!(op.select_intent(&state), Some(Intent::Discard(-1)));

    state.phase = Phase::ReactionWindow;
    assert_eq!(op.select_intent(&state), Some(Intent::Skip));
}
