use super::*;
use crate::{DecodeError, Map};
use std::any::Any;
use std::convert::TryFrom;

/// Field access on a [`Map`] keyed by names.
///
/// `Map` is keyed by [`Key`], which makes lookups by `&str` awkward. These methods are the
/// intended way for [`Serializable`](crate::Serializable) and
/// [`Deserializable`](crate::Deserializable) implementations to read and write their fields.
///
/// The `get_*` readers are lenient about numbers and booleans stored as text, since that is how
/// they come back from XML. The `req_*` readers fail with a [`DecodeError`] naming the field.
///
/// # Example
/// ```rust
/// # use objser::*;
/// let mut map = Map::new();
/// map.insert_field("name", "alpha");
/// map.insert_field("low", "8");
///
/// assert_eq!(map.get_str("name"), Some("alpha"));
/// assert_eq!(map.req_f64("low"), Ok(8.0));
/// assert_eq!(map.req_f64("high"), Err(DecodeError::MissingField("high".into())));
/// assert!(map.list("bands").is_empty());
/// ```
pub trait MapExt {
    /// Borrow the value stored under `name`.
    fn field(&self, name: &str) -> Option<&Value>;

    /// Mutably borrow the value stored under `name`.
    fn field_mut(&mut self, name: &str) -> Option<&mut Value>;

    /// Store `value` under `name`, returning what was there.
    fn insert_field<V: Into<Value>>(&mut self, name: &str, value: V) -> Option<Value>;

    /// Remove the value stored under `name`.
    fn remove_field(&mut self, name: &str) -> Option<Value>;

    /// The field holds a number, or text that parses as one.
    fn get_num(&self, name: &str) -> Option<Number> {
        self.field(name).and_then(Value::number)
    }

    /// The field holds a boolean, or text that spells one.
    fn get_bool(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(Value::boolean)
    }

    /// The field holds a string.
    fn get_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::str)
    }

    /// The field holds a map.
    fn get_map(&self, name: &str) -> Option<&Map> {
        self.field(name).and_then(Value::map)
    }

    /// The field holds an object of type `T`.
    fn get_obj<T: Any>(&self, name: &str) -> Option<&T> {
        self.field(name).and_then(Value::downcast_ref)
    }

    /// The field read as a list.
    ///
    /// An absent field is an empty list, and a lone value is a list of one. This smooths over
    /// formats that cannot tell a single child from a list of one.
    fn list(&self, name: &str) -> &[Value] {
        match self.field(name) {
            None => &[],
            Some(Value::Seq(seq)) => seq.as_slice(),
            Some(value) => std::slice::from_ref(value),
        }
    }

    /// The field must be present.
    fn req(&self, name: &str) -> Result<&Value, DecodeError> {
        self.field(name)
            .ok_or_else(|| DecodeError::MissingField(name.to_string()))
    }

    /// The field must be a number.
    fn req_f64(&self, name: &str) -> Result<f64, DecodeError> {
        self.req(name)?
            .number()
            .map(|n| n.as_f64())
            .ok_or_else(|| DecodeError::invalid_field(name, "a number"))
    }

    /// The field must be an integer that fits in an `i64`.
    fn req_i64(&self, name: &str) -> Result<i64, DecodeError> {
        self.req(name)?
            .number()
            .and_then(|n| n.as_i128().ok())
            .and_then(|n| i64::try_from(n).ok())
            .ok_or_else(|| DecodeError::invalid_field(name, "an integer"))
    }

    /// The field must be a boolean.
    fn req_bool(&self, name: &str) -> Result<bool, DecodeError> {
        self.req(name)?
            .boolean()
            .ok_or_else(|| DecodeError::invalid_field(name, "a boolean"))
    }

    /// The field must be a string.
    fn req_str(&self, name: &str) -> Result<&str, DecodeError> {
        self.req(name)?
            .str()
            .ok_or_else(|| DecodeError::invalid_field(name, "a string"))
    }

    /// The field must be an object of type `T`.
    fn req_obj<T: Any>(&self, name: &str) -> Result<&T, DecodeError> {
        self.req(name)?
            .downcast_ref()
            .ok_or_else(|| DecodeError::invalid_field(name, std::any::type_name::<T>()))
    }
}

impl MapExt for Map {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(&Key::from(name))
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.get_mut(&Key::from(name))
    }

    fn insert_field<V: Into<Value>>(&mut self, name: &str, value: V) -> Option<Value> {
        self.insert(Key::from(name), value.into())
    }

    fn remove_field(&mut self, name: &str) -> Option<Value> {
        self.shift_remove(&Key::from(name))
    }
}
