//! SQL values used for quoting and bind parameters.

use serde::{Deserialize, Serialize};

/// A value handed to the adapter for quoting or binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// A value that already knows its quoted form (for example a record
    /// standing in for its id).
    Quoted {
        /// The SQL fragment to emit verbatim.
        quoted_id: String,
    },
}

impl Value {
    /// Returns the base SQL literal for this value.
    ///
    /// This is the dialect-independent quoting; dialects layer their own
    /// rules on top of it.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("'t'")
                } else {
                    String::from("'f'")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Self::Quoted { quoted_id } => quoted_id.clone(),
        }
    }

    /// Converts the value to an integer the way a lenient string-to-int
    /// conversion would: leading digits are kept, anything unparseable is 0.
    #[must_use]
    pub fn to_integer_lossy(&self) -> i64 {
        match self {
            Self::Null | Self::Blob(_) => 0,
            Self::Bool(b) => i64::from(*b),
            Self::Int(n) => *n,
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(f) => f.trunc() as i64,
            Self::Text(s) => leading_integer(s),
            Self::Quoted { quoted_id } => leading_integer(quoted_id),
        }
    }

    /// Renders the value as a bare integer literal.
    ///
    /// Text keeps its leading digits verbatim, so keys wider than `i64` (a
    /// `FIXED(38)` column, say) are not altered.
    #[must_use]
    pub fn to_integer_literal(&self) -> String {
        match self {
            Self::Text(s) | Self::Quoted { quoted_id: s } => match leading_digits(s) {
                (true, digits) => format!("-{digits}"),
                (false, digits) => digits.to_string(),
            },
            other => other.to_integer_lossy().to_string(),
        }
    }

    /// Returns the integer held by this value, if it has one.
    ///
    /// Text must parse as a whole; floats must be integral.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Text(s) => write!(f, "{s}"),
            other => write!(f, "{}", other.to_sql_inline()),
        }
    }
}

/// Splits the leading `[+-]digits` run off `s`, returning whether it is
/// negative and the digits without leading zeros ("0" when there are none).
fn leading_digits(s: &str) -> (bool, &str) {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = rest[..end].trim_start_matches('0');
    if digits.is_empty() {
        (false, "0")
    } else {
        (negative, digits)
    }
}

/// Leading integer of `s`, saturating at the `i64` bounds.
fn leading_integer(s: &str) -> i64 {
    let (negative, digits) = leading_digits(s);
    match digits.parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
