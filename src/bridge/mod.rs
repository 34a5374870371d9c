//! [`Serializer`] and [`Deserializer`] for converting between `serde` types and [`Value`].
//!
//! Any type that implements [`Serialize`] can be turned into a `Value`, and any type that
//! implements [`Deserialize`] can be read back out of one. This gives `serde`-derived types the
//! object contract without hand-written methods; see
//! [`Registration::serde`](crate::Registration::serde).
//!
//! # Examples
//! ```rust
//! # use objser::*;
//! let data = (100, "Hello, world!".to_string(), 3.14);
//!
//! let value = Value::enc(&data).unwrap();
//! assert_eq!(value.seq().map(|s| s.len()), Some(3));
//!
//! let back = value.decode::<(u32, String, f32)>();
//! assert_eq!(back, Ok(data));
//! ```
//!
//! Map-shaped types can go straight to and from a [`Map`].
//! ```rust
//! # use objser::*;
//! use std::collections::BTreeMap;
//!
//! let mut bands = BTreeMap::new();
//! bands.insert("alpha".to_string(), 10.0);
//!
//! let map = bridge::to_map(&bands).unwrap();
//! assert_eq!(map.get_num("alpha"), Some(Number::from(10.0)));
//! assert!(bridge::to_map(&[1, 2]).is_err());
//! ```
use crate::{Map, Value};
use serde::de::DeserializeOwned;

mod de;
mod ser;

pub use self::de::{Deserializer, Error as DeError};
pub use self::ser::{Error as SerError, Serializer};
pub use serde::{Deserialize, Serialize};

/// Encode `T` into a [`Value`].
pub fn to_value<T: ?Sized + Serialize>(data: &T) -> Result<Value, SerError> {
    data.serialize(Serializer)
}

/// Encode `T`, which must serialize to a map.
pub fn to_map<T: ?Sized + Serialize>(data: &T) -> Result<Map, SerError> {
    match to_value(data)? {
        Value::Map(map) => Ok(map),
        _ => Err(SerError::NotAMap {
            type_name: std::any::type_name::<T>(),
        }),
    }
}

/// Decode a [`Value`] into `T`.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, DeError> {
    <T as Deserialize>::deserialize(Deserializer(value))
}

/// Decode a [`Map`] into `T`.
pub fn from_map<T: DeserializeOwned>(map: Map) -> Result<T, DeError> {
    from_value(Value::Map(map))
}

impl Value {
    /// Encode `T` into a `Value`.
    ///
    /// Convenience function for `data.serialize(Serializer)`.
    pub fn enc<T: ?Sized + Serialize>(data: &T) -> Result<Self, SerError> {
        to_value(data)
    }

    /// Attempt to decode a `Value` into type `T`.
    ///
    /// Convenience function for `<T as Deserialize>::deserialize(Deserializer(self))`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, DeError> {
        from_value(self)
    }
}
