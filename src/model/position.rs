use super::*;

// 自分を基準にした座席位置
// 各座席の河の配置規則(layout)はこのenumで切り替える
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Own,      // 自分
    Down,     // 下家 (右)
    Opposite, // 対面
    Up,       // 上家 (左)
}

impl Position {
    pub const ALL: [Position; SEAT] = [
        Position::Own,
        Position::Down,
        Position::Opposite,
        Position::Up,
    ];

    pub fn from_seat(seat: Seat) -> Option<Self> {
        Self::ALL.get(seat).copied()
    }

    #[inline]
    pub fn seat(self) -> Seat {
        match self {
            Self::Own => 0,
            Self::Down => 1,
            Self::Opposite => 2,
            Self::Up => 3,
        }
    }

    // 描画用のタグ
    pub fn tag(self) -> &'static str {
        match self {
            Self::Own => "self",
            Self::Down => "down",
            Self::Opposite => "opposite",
            Self::Up => "up",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[test]
fn test_position_seat() {
    for (s, p) in Position::ALL.iter().enumerate() {
        assert_eq!(p.seat(), s);
        assert_eq!(Position::from_seat(s), Some(*p));
    }
    assert_eq!(Position::from_seat(SEAT), None);
    assert_eq!(Position::Own.to_string(), "self");
}
