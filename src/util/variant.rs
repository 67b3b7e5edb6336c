use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Int(i32),
    Float(f32),
    Bool(bool),
}

impl Variant {
    pub fn as_int(&self) -> i32 {
        if let &Self::Int(v) = self {
            return v;
        }
        panic!("not an int: {}", self);
    }

    pub fn as_float(&self) -> f32 {
        if let &Self::Float(v) = self {
            return v;
        }
        panic!("not a float: {}", self);
    }

    pub fn as_bool(&self) -> bool {
        if let &Self::Bool(v) = self {
            return v;
        }
        panic!("not a bool: {}", self);
    }

    // 型はselfに合わせてvalueをパース
    pub fn parse_as(&self, value: &str) -> Result<Variant, String> {
        Ok(match self {
            Self::Int(_) => Self::Int(value.parse::<i32>().map_err(|e| e.to_string())?),
            Self::Float(_) => Self::Float(value.parse::<f32>().map_err(|e| e.to_string())?),
            Self::Bool(_) => Self::Bool(value.parse::<bool>().map_err(|e| e.to_string())?),
        })
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Arg {
    pub name: String,
    pub value: Variant,
}

impl Arg {
    pub fn int(name: &str, value: i32) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Int(value),
        }
    }

    pub fn float(name: &str, value: f32) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Float(value),
        }
    }

    pub fn bool(name: &str, value: bool) -> Self {
        Self {
            name: name.to_string(),
            value: Variant::Bool(value),
        }
    }
}

#[test]
fn test_parse_as() {
    assert_eq!(Variant::Int(0).parse_as("7"), Ok(Variant::Int(7)));
    assert_eq!(Variant::Float(0.0).parse_as("0.5"), Ok(Variant::Float(0.5)));
    assert_eq!(Variant::Bool(false).parse_as("true"), Ok(Variant::Bool(true)));
    assert!(Variant::Int(0).parse_as("x").is_err());
}
