use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Wind {
    East = 1,
    South = 2,
    West = 3,
    North = 4,
}

impl Wind {
    pub fn kanji(self) -> char {
        match self {
            Self::East => '東',
            Self::South => '南',
            Self::West => '西',
            Self::North => '北',
        }
    }
}

impl TryFrom<u8> for Wind {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Ok(match v {
            1 => Self::East,
            2 => Self::South,
            3 => Self::West,
            4 => Self::North,
            _ => return Err(format!("invalid wind code: {}", v)),
        })
    }
}

impl From<Wind> for u8 {
    fn from(w: Wind) -> Self {
        w as u8
    }
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kanji())
    }
}

// 場風, 局, 本場
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundInfo {
    pub wind: Wind,
    pub round: usize,
    #[serde(default)]
    pub sub_round: usize,
}

impl Default for RoundInfo {
    fn default() -> Self {
        Self {
            wind: Wind::East,
            round: 1,
            sub_round: 0,
        }
    }
}

impl fmt::Display for RoundInfo {
    // 例: 東一局, 南四局 2本場
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NUMS: [&str; 4] = ["一", "二", "三", "四"];
        match self.round.checked_sub(1).and_then(|i| NUMS.get(i)) {
            Some(n) => write!(f, "{}{}局", self.wind, n)?,
            None => write!(f, "{}{}局", self.wind, self.round)?,
        }
        if self.sub_round > 0 {
            write!(f, " {}本場", self.sub_round)?;
        }
        Ok(())
    }
}

#[test]
fn test_wind_serde() {
    let w: Wind = serde_json::from_str("3").unwrap();
    assert_eq!(w, Wind::West);
    assert_eq!(serde_json::to_string(&Wind::North).unwrap(), "4");
    assert!(serde_json::from_str::<Wind>("0").is_err());
    assert!(serde_json::from_str::<Wind>("5").is_err());
}

#[test]
fn test_round_display() {
    let r: RoundInfo = serde_json::from_str(r#"{"wind":1,"round":1,"subRound":0}"#).unwrap();
    assert_eq!(r.to_string(), "東一局");
    let r = RoundInfo {
        wind: Wind::South,
        round: 4,
        sub_round: 2,
    };
    assert_eq!(r.to_string(), "南四局 2本場");
}
