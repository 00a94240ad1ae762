use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape of a raw cell string, used to pick the typed setter on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Empty,
    Integer,
    Decimal,
    Text,
}

/// Classify raw cell text.
///
/// * `Empty`   - zero length
/// * `Integer` - optional leading `-`, then one or more ASCII digits
/// * `Decimal` - optional leading `-`, exactly one `.`, every other char a digit
/// * `Text`    - anything else
///
/// The check is purely lexical. A string can classify as numeric and still fail
/// to parse (`i64` overflow, a lone `.`); see [`LiteralValue::from_raw`].
pub fn classify(raw: &str) -> ValueKind {
    if raw.is_empty() {
        return ValueKind::Empty;
    }
    let body = raw.strip_prefix('-').unwrap_or(raw);
    if body.is_empty() {
        return ValueKind::Text;
    }
    let mut dots = 0usize;
    for b in body.bytes() {
        match b {
            b'0'..=b'9' => {}
            b'.' => dots += 1,
            _ => return ValueKind::Text,
        }
    }
    match dots {
        0 => ValueKind::Integer,
        1 => ValueKind::Decimal,
        _ => ValueKind::Text,
    }
}

/// A typed cell value as written to or read from a document.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Empty,
}

impl LiteralValue {
    /// Re-type raw cell text the way a copied cell is written: numbers become
    /// numbers, everything else stays text. A numeric-looking string that does
    /// not parse is kept verbatim as text.
    pub fn from_raw(raw: &str) -> Self {
        match classify(raw) {
            ValueKind::Empty => LiteralValue::Empty,
            ValueKind::Integer => raw
                .parse::<i64>()
                .map(LiteralValue::Int)
                .unwrap_or_else(|_| LiteralValue::Text(raw.to_string())),
            ValueKind::Decimal => raw
                .parse::<f64>()
                .map(LiteralValue::Number)
                .unwrap_or_else(|_| LiteralValue::Text(raw.to_string())),
            ValueKind::Text => LiteralValue::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            LiteralValue::Empty => true,
            LiteralValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            LiteralValue::Int(_) => ValueKind::Integer,
            LiteralValue::Number(_) => ValueKind::Decimal,
            LiteralValue::Empty => ValueKind::Empty,
            LiteralValue::Text(_) | LiteralValue::Boolean(_) => ValueKind::Text,
        }
    }
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(i) => write!(f, "{i}"),
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::Text(s) => write!(f, "{s}"),
            LiteralValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            LiteralValue::Empty => Ok(()),
        }
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Int(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::Text(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::Text(value.to_string())
    }
}
