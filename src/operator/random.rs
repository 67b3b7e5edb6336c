use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::warn;

pub struct RandomBuilder;

impl OperatorBuilder for RandomBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "Random".to_string(),
            args: vec![Arg::int("seed", 0), Arg::float("ron_rate", 0.5)],
        }
    }

    fn create(&self, config: Config) -> Box<dyn Operator> {
        Box::new(Random::from_config(config))
    }
}

// 手牌とツモ牌からランダムに打牌し, ron_rateの確率でロンする
#[derive(Debug, Clone)]
pub struct Random {
    config: Config,
    rng: StdRng,
    ron_rate: f64,
}

impl Random {
    pub fn from_config(config: Config) -> Self {
        let args = &config.args;
        let seed = args[0].value.as_int() as u64;
        let rate = args[1].value.as_float() as f64;
        // NaNや無限大はgen_boolに渡せない
        let ron_rate = if rate.is_finite() {
            rate.clamp(0.0, 1.0)
        } else {
            warn!("invalid ron_rate: {}, use 0.5", rate);
            0.5
        };
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            ron_rate,
        }
    }
}

impl Operator for Random {
    fn select_intent(&mut self, state: &ClientState) -> Option<Intent> {
        if state.may_discard() {
            // -1はツモ牌
            let n = state.hand.tiles.len() as i32;
            Some(Intent::Discard(self.rng.gen_range(-1..n)))
        } else if state.may_react() {
            if self.rng.gen_bool(self.ron_rate) {
                Some(Intent::Ron)
            } else {
                Some(Intent::Skip)
            }
        } else {
            None
        }
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

#[test]
fn test_random_discard_in_range() {
    let mut op = Random::from_config(RandomBuilder.get_default_config());
    let mut state = ClientState::new();
    state.phase = Phase::SelfDrawn;
    state.set_hand(&[1, 2, 3], 9);
    for _ in 0..100 {
        match op.select_intent(&state) {
            Some(Intent::Discard(t)) => assert!(state.hand.is_valid_target(t)),
            i => panic!("unexpected: {:?}", i),
        }
    }
}

#[test]
fn test_random_ron_rate() {
    let mut conf = RandomBuilder.get_default_config();
    conf.args[1].value = Variant::Float(1.0);
    let mut op = Random::from_config(conf);
    let mut state = ClientState::new();
    state.phase = Phase::ReactionWindow;
    assert_eq!(op.select_intent(&state), Some(Intent::Ron));

    state.phase = Phase::RoundEnd(RoundEndKind::Win);
    assert_eq!(op.select_intent(&state), None);
}

#[test]
fn test_random_non_finite_rate() {
    for exp in ["Random(1,NaN)", "Random(1,inf)", "Random(1,-inf)"] {
        let mut op = create_operator(exp).unwrap();
        let mut state = ClientState::new();
        state.phase = Phase::ReactionWindow;
        for _ in 0..20 {
            let i = op.select_intent(&state);
            assert!(matches!(i, Some(Intent::Ron) | Some(Intent::Skip)), "{}: {:?}", exp, i);
        }
    }
}
