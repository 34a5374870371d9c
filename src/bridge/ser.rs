use crate::{Key, List, Map, Value};
use serde::{ser, Serialize};
use std::{error, fmt};

type Res = Result<Value, Error>;

/// Serializer to pass to [`Serialize::serialize`] to turn a type into a [`Value`].
///
/// There is no data associated with the `Serializer`; it only implements `serde`'s `Serializer`
/// trait. The mapping onto the value tree is:
///
/// | Rust                      | `Value`                        |
/// | ------------------------- | ------------------------------ |
/// | `()`, unit struct, `None` | `Null`                         |
/// | `Some(x)`, newtype struct | `x`                            |
/// | char, string              | `Str`                          |
/// | bytes                     | `Seq` of numbers               |
/// | tuple, sequence           | `Seq`                          |
/// | struct, map               | `Map`                          |
/// | unit variant              | `Str` of the variant name      |
/// | other variants            | `Map` of variant name to data  |
///
/// # Example
/// ```rust
/// # use objser::*;
/// use objser::bridge::Serializer;
/// use serde::Serialize;
///
/// let value = ("Hello!", 3.14).serialize(Serializer);
/// assert_eq!(value, Ok(Value::from(vec![Value::from("Hello!"), Value::from(3.14)])));
/// ```
pub struct Serializer;

impl ser::Serializer for Serializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SeqLike;
    type SerializeTuple = SeqLike;
    type SerializeTupleStruct = SeqLike;
    type SerializeTupleVariant = SeqLike;
    type SerializeMap = MapLike;
    type SerializeStruct = CntrLike;
    type SerializeStructVariant = CntrLike;

    fn serialize_bool(self, v: bool) -> Res {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Res {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Res {
        Ok(Value::Seq(v.iter().map(|b| Value::from(*b)).collect()))
    }

    fn serialize_none(self) -> Res {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, v: &T) -> Res {
        v.serialize(self)
    }

    fn serialize_unit(self) -> Res {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Res {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, variant: &'static str) -> Res {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _: &'static str, value: &T) -> Res {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Res {
        Ok(Value::new_map(Some((variant, value.serialize(self)?))))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqLike, Error> {
        Ok(SeqLike {
            variant: None,
            seq: List::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqLike, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _: &'static str, len: usize) -> Result<SeqLike, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqLike, Error> {
        Ok(SeqLike {
            variant: Some(variant),
            seq: List::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapLike, Error> {
        Ok(MapLike {
            key: None,
            map: Map::new(),
        })
    }

    fn serialize_struct(self, _: &'static str, _len: usize) -> Result<CntrLike, Error> {
        Ok(CntrLike {
            variant: None,
            map: Map::new(),
        })
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<CntrLike, Error> {
        Ok(CntrLike {
            variant: Some(variant),
            map: Map::new(),
        })
    }

    fn collect_str<T: ?Sized>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: std::fmt::Display,
    {
        self.serialize_str(&value.to_string())
    }
}

/// Serialization error.
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// An implementor of `Serialize` called `serialize_value` before `serialize_key` when
    /// serializing a map. Only happens if the implementor does not follow `serde`'s guidance.
    NoKeyAvailable,
    /// A map key serialized to a sequence or map. Keys must be primitives.
    KeyNotPrimitive,
    /// A map was required, but the type serialized to something else.
    NotAMap {
        /// The Rust type name.
        type_name: &'static str,
    },
    /// Some `Serialize` implementor error occurred.
    Message(String),
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoKeyAvailable => {
                write!(f, "no key was available when trying to serialize map value")
            }
            Error::KeyNotPrimitive => write!(f, "map keys must be primitive values"),
            Error::NotAMap { type_name } => {
                write!(f, "`{}` does not serialize to a map", type_name)
            }
            Error::Message(s) => write!(f, "custom error: {}", s),
        }
    }
}

fn into_key(value: Value) -> Result<Key, Error> {
    match value {
        Value::Null => Ok(Key::Null),
        Value::Bool(b) => Ok(Key::Bool(b)),
        Value::Num(n) => Ok(Key::Num(n)),
        Value::Str(s) => Ok(Key::Str(s)),
        _ => Err(Error::KeyNotPrimitive),
    }
}

fn wrap(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(variant) => Value::new_map(Some((variant, value))),
        None => value,
    }
}

pub struct SeqLike {
    variant: Option<&'static str>,
    seq: List,
}

impl ser::SerializeSeq for SeqLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.seq.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(wrap(self.variant, Value::Seq(self.seq)))
    }
}

impl ser::SerializeTuple for SeqLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Res {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Res {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SeqLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Res {
        ser::SerializeSeq::end(self)
    }
}

pub struct MapLike {
    key: Option<Key>,
    map: Map,
}

impl ser::SerializeMap for MapLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Error> {
        self.key = Some(into_key(key.serialize(Serializer)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        let key = self.key.take().ok_or(Error::NoKeyAvailable)?;
        self.map.insert(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn serialize_entry<K, V>(&mut self, key: &K, value: &V) -> Result<(), Error>
    where
        K: ?Sized + Serialize,
        V: ?Sized + Serialize,
    {
        let key = into_key(key.serialize(Serializer)?)?;
        self.map.insert(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(Value::Map(self.map))
    }
}

pub struct CntrLike {
    variant: Option<&'static str>,
    map: Map,
}

impl ser::SerializeStruct for CntrLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        self.map.insert(Key::from(key), value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(wrap(self.variant, Value::Map(self.map)))
    }
}

impl ser::SerializeStructVariant for CntrLike {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        ser::SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Res {
        ser::SerializeStruct::end(self)
    }
}
