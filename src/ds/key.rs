use super::*;
use std::fmt;

/// A key in a [`Map`](crate::Map).
///
/// Maps in an object graph are not always keyed by strings, so a key can be any primitive.
/// Text formats can only carry string keys, and [`Display`](fmt::Display) gives the string
/// form that JSON and XML write out.
///
/// Keys order by variant first (`Null < Bool < Num < Str`) and then by value.
///
/// # Example
/// ```rust
/// # use objser::*;
/// assert_eq!(Key::from("gain").to_string(), "gain");
/// assert_eq!(Key::from(3).to_string(), "3");
/// assert_eq!(Key::from(true).to_string(), "true");
/// assert_eq!(Key::Null.to_string(), "null");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Key {
    Null,
    Bool(bool),
    Num(Number),
    Str(String),
}

impl Key {
    /// The key is a string.
    pub fn str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Convert into a string key, leaving string keys untouched.
    pub fn into_string_key(self) -> Key {
        match self {
            Key::Str(_) => self,
            other => Key::Str(other.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => f.write_str("null"),
            Key::Bool(b) => write!(f, "{}", b),
            Key::Num(n) => write!(f, "{}", n),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

macro_rules! from_num {
    ( $( $t:ty ),* ) => {
        $(
            impl From<$t> for Key {
                fn from(x: $t) -> Self {
                    Key::Num(Number::from(x))
                }
            }
        )*
    };
}

from_num!(usize, u8, u16, u32, u64, u128, isize, i8, i16, i32, i64, i128, f32, f64);

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Null => Value::Null,
            Key::Bool(b) => Value::Bool(b),
            Key::Num(n) => Value::Num(n),
            Key::Str(s) => Value::Str(s),
        }
    }
}
