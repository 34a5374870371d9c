use super::*;
use crate::{List, Map};
use std::any::Any;

/// A node in an object graph.
///
/// `Value` captures primitive types (null, booleans, numbers, strings), which act as leaves,
/// along with nested structures (sequences and maps), and [`Obj`]ects of any Rust type.
///
/// Encoding replaces every `Obj` with a `Map` stamped with class metadata, producing a _document_
/// made only of primitives, sequences, and maps. Decoding does the reverse.
///
/// # Examples
/// Use the methods to quickly see the data if the type is known.
/// ```rust
/// # use objser::*;
/// let value = Value::from("Hi");
/// assert_eq!(value.str(), Some("Hi"));
/// assert_eq!(value.int(), None);
///
/// let value = Value::from(vec![Value::from(1), Value::Null]);
/// assert_eq!(value.seq().map(|s| s.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence of a value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A numerical value. See [`Number`].
    Num(Number),
    /// A string value.
    Str(String),
    /// An ordered sequence of values.
    Seq(List),
    /// A mapping of keys to values.
    Map(Map),
    /// A typed object. See [`Obj`].
    Obj(Obj),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

/// Constructors.
impl Value {
    /// Wrap `object` as a [`Value::Obj`].
    ///
    /// # Example
    /// ```rust
    /// # use objser::*;
    /// #[derive(Debug, Clone, PartialEq)]
    /// struct Electrode(&'static str);
    ///
    /// let value = Value::new_obj(Electrode("Cz"));
    /// assert_eq!(value.downcast_ref::<Electrode>(), Some(&Electrode("Cz")));
    /// ```
    pub fn new_obj<T: Object>(object: T) -> Self {
        Value::Obj(Obj::new(object))
    }

    /// A new map value from key-value pairs.
    ///
    /// # Example
    /// ```rust
    /// # use objser::*;
    /// let value = Value::new_map(vec![("a", Value::from(1)), ("b", Value::from(2))]);
    /// assert_eq!(value.map().and_then(|m| m.get_num("b")), Some(Number::from(2)));
    /// ```
    pub fn new_map<I, K>(iter: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Convenience methods for accessing values straight from the [`Value`] enum.
impl Value {
    /// `Value` is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `Value` is a boolean value.
    pub fn bool(&self) -> Option<bool> {
        match self {
            Value::Bool(val) => Some(*val),
            _ => None,
        }
    }

    /// `Value` is a number.
    pub fn num(&self) -> Option<Number> {
        match self {
            Value::Num(val) => Some(*val),
            _ => None,
        }
    }

    /// `Value` is a number, or a string holding one.
    ///
    /// Text formats such as XML do not keep numbers apart from strings, so readers of decoded
    /// documents should prefer this over [`num`](Value::num).
    ///
    /// # Example
    /// ```rust
    /// # use objser::*;
    /// assert_eq!(Value::from(3).number(), Some(Number::from(3)));
    /// assert_eq!(Value::from("3.5").number(), Some(Number::from(3.5)));
    /// assert_eq!(Value::from("three").number(), None);
    /// ```
    pub fn number(&self) -> Option<Number> {
        match self {
            Value::Num(val) => Some(*val),
            Value::Str(s) => Number::parse(s).ok(),
            _ => None,
        }
    }

    /// `Value` is a boolean, or a string spelling one (`true`/`false`, any case).
    pub fn boolean(&self) -> Option<bool> {
        match self {
            Value::Bool(val) => Some(*val),
            Value::Str(s) => parse_bool(s),
            _ => None,
        }
    }

    /// `Value` is an unsigned integer.
    pub fn uint(&self) -> Option<u128> {
        self.num().and_then(|n| n.as_u128().ok())
    }

    /// `Value` is a signed integer. A positive integer can be both signed and unsigned.
    pub fn int(&self) -> Option<i128> {
        self.num().and_then(|n| n.as_i128().ok())
    }

    /// `Value` is a number, represented as a float.
    pub fn float(&self) -> Option<f64> {
        self.num().map(|n| n.as_f64())
    }

    /// `Value` is a string.
    pub fn str(&self) -> Option<&str> {
        match self {
            Value::Str(val) => Some(val.as_str()),
            _ => None,
        }
    }

    /// `Value` is a sequence.
    pub fn seq(&self) -> Option<&List> {
        match self {
            Value::Seq(val) => Some(val),
            _ => None,
        }
    }

    /// `Value` is a sequence. Can be altered.
    pub fn seq_mut(&mut self) -> Option<&mut List> {
        match self {
            Value::Seq(val) => Some(val),
            _ => None,
        }
    }

    /// `Value` is a map.
    pub fn map(&self) -> Option<&Map> {
        match self {
            Value::Map(val) => Some(val),
            _ => None,
        }
    }

    /// `Value` is a map. Can be altered.
    pub fn map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(val) => Some(val),
            _ => None,
        }
    }

    /// `Value` is an object.
    pub fn obj(&self) -> Option<&Obj> {
        match self {
            Value::Obj(val) => Some(val),
            _ => None,
        }
    }

    /// `Value` is an object of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.obj().and_then(Obj::downcast_ref)
    }

    /// `Value` is an object of type `T`. Can be altered.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self {
            Value::Obj(val) => val.downcast_mut(),
            _ => None,
        }
    }

    /// Take the object out of the value as `T`, returning the value unchanged otherwise.
    pub fn downcast<T: Any>(self) -> Result<T, Value> {
        match self {
            Value::Obj(obj) => obj.downcast().map_err(Value::Obj),
            x => Err(x),
        }
    }

    /// The value tree holds no objects, so a text format can write it directly.
    ///
    /// # Example
    /// ```rust
    /// # use objser::*;
    /// assert!(Value::new_map(vec![("a", Value::from(1))]).is_document());
    /// assert!(!Value::from(vec![Value::new_obj(1u8)]).is_document());
    /// ```
    pub fn is_document(&self) -> bool {
        match self {
            Value::Obj(_) => false,
            Value::Seq(seq) => seq.iter().all(Value::is_document),
            Value::Map(map) => map.values().all(Value::is_document),
            _ => true,
        }
    }
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Num(n)
    }
}

impl From<List> for Value {
    fn from(seq: List) -> Self {
        Value::Seq(seq)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Obj> for Value {
    fn from(obj: Obj) -> Self {
        Value::Obj(obj)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

macro_rules! from_num {
    ( $( $t:ty ),* ) => {
        $(
            impl From<$t> for Value {
                fn from(x: $t) -> Self {
                    Value::Num(Number::from(x))
                }
            }
        )*
    };
}

from_num!(usize, u8, u16, u32, u64, u128, isize, i8, i16, i32, i64, i128, f32, f64);
