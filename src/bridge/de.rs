use crate::ds::parse_bool;
use crate::{Key, Number, Value};
use serde::de::{
    self,
    value::{MapDeserializer, SeqDeserializer},
    IntoDeserializer, Unexpected, Visitor,
};
use std::convert::TryInto;
use std::{error, fmt};

type Res<T> = Result<T, Error>;

/// Deserializer to pass to [`Deserialize::deserialize`] to decode a [`Value`] into a type.
///
/// `Deserializer` _consumes_ the value. Since a `Value` owns all its data, only owned types can be
/// decoded out of it.
///
/// Leaves read back from XML are always strings. To let those feed typed fields, requests for
/// booleans and numbers accept a string that parses as one.
///
/// [`Value::decode`] can be used for convenience.
///
/// # Examples
/// ```rust
/// # use objser::*;
/// use objser::bridge::Deserializer;
/// use serde::Deserialize;
///
/// let value = Value::from(vec![Value::from("8"), Value::from("true")]);
/// let pair = <(u8, bool)>::deserialize(Deserializer(value));
/// assert_eq!(pair, Ok((8, true)));
/// ```
///
/// Objects cannot be decoded through `serde`.
/// ```rust
/// # use objser::*;
/// let value = Value::new_obj(5u8);
/// assert!(value.decode::<u8>().is_err());
/// ```
///
/// [`Deserialize::deserialize`]: serde::de::Deserialize::deserialize
pub struct Deserializer(pub Value);

macro_rules! coerce_num {
    ( $( $method:ident )* ) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Res<V::Value> {
                match self.0 {
                    Value::Str(s) => match Number::parse(&s) {
                        Ok(n) => {
                            de::Deserializer::deserialize_any(Deserializer(Value::Num(n)), visitor)
                        }
                        Err(_) => Err(de::Error::invalid_type(Unexpected::Str(&s), &visitor)),
                    },
                    x => de::Deserializer::deserialize_any(Deserializer(x), visitor),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Res<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.0 {
            Value::Null => visitor.visit_unit(),
            Value::Bool(v) => visitor.visit_bool(v),
            Value::Num(num) => {
                // serde casts integers from a 64 bit basis, but only widens to 128 bit.
                // Visit a 128 bit integer only when it will not fit in 64 bits.
                match num {
                    Number::Uint(v) => match v.try_into() {
                        Ok(v) => visitor.visit_u64(v),
                        Err(_) => visitor.visit_u128(v),
                    },
                    Number::Int(v) => match v.try_into() {
                        Ok(v) => visitor.visit_i64(v),
                        Err(_) => visitor.visit_i128(v),
                    },
                    Number::Float(v) => visitor.visit_f64(v),
                }
            }
            Value::Str(v) => visitor.visit_string(v),
            Value::Seq(seq) => visitor.visit_seq(SeqDeserializer::new(seq.into_iter())),
            Value::Map(map) => visitor.visit_map(MapDeserializer::new(map.into_iter())),
            Value::Obj(obj) => Err(de::Error::invalid_type(
                Unexpected::Other(obj.type_name()),
                &visitor,
            )),
        }
    }

    serde::forward_to_deserialize_any! {
        str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }

    coerce_num! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
        deserialize_f32 deserialize_f64
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Res<V::Value> {
        match self.0 {
            Value::Str(s) => match parse_bool(&s) {
                Some(b) => visitor.visit_bool(b),
                None => Err(de::Error::invalid_type(Unexpected::Str(&s), &visitor)),
            },
            x => de::Deserializer::deserialize_any(Deserializer(x), visitor),
        }
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Res<V::Value> {
        match self.0 {
            Value::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(de::Error::invalid_type(Unexpected::Str(&s), &"char")),
                }
            }
            x => Err(de::Error::invalid_type(unexp_err(&x), &"char")),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Res<V::Value> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            x => visitor.visit_some(Deserializer(x)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Res<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Res<V::Value> {
        match self.0 {
            Value::Str(variant) => visitor.visit_enum(Variant {
                name: Key::Str(variant),
                data: Value::Null,
            }),
            Value::Map(map) if map.len() == 1 => match map.into_iter().next() {
                Some((name, data)) => visitor.visit_enum(Variant { name, data }),
                None => Err(Error::Message(String::from("enum map is empty"))),
            },
            x => Err(de::Error::invalid_type(unexp_err(&x), &"enum variant")),
        }
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = Deserializer;
    fn into_deserializer(self) -> Deserializer {
        Deserializer(self)
    }
}

impl<'de> IntoDeserializer<'de, Error> for Key {
    type Deserializer = Deserializer;
    fn into_deserializer(self) -> Deserializer {
        Deserializer(Value::from(self))
    }
}

struct Variant {
    name: Key,
    data: Value,
}

impl<'de> de::EnumAccess<'de> for Variant {
    type Error = Error;
    type Variant = Deserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.name.into_deserializer())
            .map(|v| (v, Deserializer(self.data)))
    }
}

impl<'de> de::VariantAccess<'de> for Deserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        unexp_matching(self.0, &"unit variant", |val| match val {
            Value::Null => Ok(Ok(())),
            x => Err(x),
        })
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        unexp_matching(self.0, &"tuple variant", |val| match val {
            Value::Seq(v) => Ok(if v.len() == len {
                visitor.visit_seq(SeqDeserializer::new(v.into_iter()))
            } else {
                let msg = format!("a sequence with {} element(s) was expected", len);
                Err(de::Error::invalid_length(v.len(), &msg.as_str()))
            }),
            x => Err(x),
        })
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        unexp_matching(self.0, &"struct variant", |val| match val {
            Value::Map(map) => Ok(visitor.visit_map(MapDeserializer::new(map.into_iter()))),
            x => Err(x),
        })
    }
}

////// FUNCTIONS ///////////////////////////////////////////////////////////////

fn unexp_err(val: &Value) -> Unexpected<'_> {
    match val {
        Value::Null => Unexpected::Unit,
        Value::Bool(v) => Unexpected::Bool(*v),
        Value::Num(n) => match n {
            Number::Uint(n) => Unexpected::Unsigned((*n).try_into().unwrap_or_default()),
            Number::Int(n) => Unexpected::Signed((*n).try_into().unwrap_or_default()),
            Number::Float(n) => Unexpected::Float(*n),
        },
        Value::Str(v) => Unexpected::Str(v.as_str()),
        Value::Seq(_) => Unexpected::Seq,
        Value::Map(_) => Unexpected::Map,
        Value::Obj(obj) => Unexpected::Other(obj.type_name()),
    }
}

fn unexp_matching<T, E, F, S>(val: Value, expected: &S, matchfn: F) -> Result<T, E>
where
    F: FnOnce(Value) -> Result<Result<T, E>, Value>,
    E: de::Error,
    S: de::Expected,
{
    match matchfn(val) {
        Ok(x) => x,
        Err(val) => Err(de::Error::invalid_type(unexp_err(&val), expected)),
    }
}

////// ERROR ///////////////////////////////////////////////////////////////////

/// Deserialization error.
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// A message from the `Deserialize` implementor or the mismatch checks.
    Message(String),
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Message(s) => write!(f, "custom error: {}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn dec<T: de::DeserializeOwned>(value: Value) -> Res<T> {
        <T as de::Deserialize>::deserialize(Deserializer(value))
    }

    #[test]
    fn integer_widths() {
        assert_eq!(dec::<u8>(Value::from(200)), Ok(200));
        assert!(dec::<u8>(Value::from(300)).is_err());
        assert_eq!(dec::<i128>(Value::from(i128::MIN)), Ok(i128::MIN));
        assert_eq!(dec::<u128>(Value::from(u128::MAX)), Ok(u128::MAX));
        assert_eq!(dec::<f32>(Value::from(2)), Ok(2.0));
    }

    #[test]
    fn strings_coerce_to_scalars() {
        assert_eq!(dec::<u16>(Value::from("512")), Ok(512));
        assert_eq!(dec::<f64>(Value::from("-0.5")), Ok(-0.5));
        assert_eq!(dec::<bool>(Value::from("False")), Ok(false));
        assert!(dec::<u16>(Value::from("many")).is_err());
        assert!(dec::<bool>(Value::from("on")).is_err());
        assert_eq!(dec::<String>(Value::from("512")), Ok("512".to_string()));
    }

    #[test]
    fn every_numeric_width_reads_text() {
        macro_rules! t {
            ( $( $t:ty ),* ) => {
                $(
                    assert_eq!(dec::<$t>(Value::from("7")), Ok(7 as $t));
                    assert_eq!(dec::<$t>(Value::from(7)), Ok(7 as $t));
                    assert!(dec::<$t>(Value::from("seven")).is_err());
                )*
            };
        }

        t!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64);
    }

    #[test]
    fn chars() {
        assert_eq!(dec::<char>(Value::from("x")), Ok('x'));
        assert!(dec::<char>(Value::from("xy")).is_err());
        assert!(dec::<char>(Value::from(1)).is_err());
    }

    #[test]
    fn options() {
        assert_eq!(dec::<Option<u8>>(Value::Null), Ok(None));
        assert_eq!(dec::<Option<u8>>(Value::from(1)), Ok(Some(1)));
    }

    #[derive(Debug, PartialEq, serde_derive::Deserialize)]
    enum Filter {
        Off,
        Low(f64),
        Band(f64, f64),
        Notch { at: u32 },
    }

    #[test]
    fn enum_shapes() {
        assert_eq!(dec::<Filter>(Value::from("Off")), Ok(Filter::Off));
        assert_eq!(
            dec::<Filter>(Value::new_map(Some(("Low", Value::from(3.0))))),
            Ok(Filter::Low(3.0))
        );
        assert_eq!(
            dec::<Filter>(Value::new_map(Some((
                "Band",
                Value::from(vec![Value::from(1.0), Value::from(2.0)])
            )))),
            Ok(Filter::Band(1.0, 2.0))
        );
        assert_eq!(
            dec::<Filter>(Value::new_map(Some((
                "Notch",
                Value::new_map(Some(("at", Value::from("50"))))
            )))),
            Ok(Filter::Notch { at: 50 })
        );
        assert!(dec::<Filter>(Value::Seq(vec![])).is_err());
    }

    #[test]
    fn maps_with_non_string_keys() {
        let value = Value::new_map(vec![(1, Value::from("a")), (2, Value::from("b"))]);
        let map = dec::<BTreeMap<u8, String>>(value).unwrap();
        assert_eq!(map.get(&2).map(String::as_str), Some("b"));
    }
}
