use super::*;
use crate::bridge::SerError;
use crate::class::class_key;
use std::{error, fmt};

/// Replaces objects in a [`Value`] tree with their class-stamped maps.
///
/// An `Encoder` only borrows its registry and hooks, so it is cheap to build for each call.
/// See the [module documentation](crate::encode) for an example.
pub struct Encoder<'r> {
    registry: &'r Registry,
    hooks: &'r Hooks,
    flags: EncodeFlags,
}

impl<'r> Encoder<'r> {
    /// An encoder with default flags.
    pub fn new(registry: &'r Registry, hooks: &'r Hooks) -> Self {
        Self {
            registry,
            hooks,
            flags: EncodeFlags::default(),
        }
    }

    /// Replace the flags.
    pub fn flags(mut self, flags: EncodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Encode a copy of `value`, leaving the input untouched.
    pub fn encode(&self, value: &Value) -> Result<Value, EncodeError> {
        Ok(match value {
            Value::Obj(obj) => match self.encode_object(obj)? {
                Some(map) => Value::Map(map),
                None => Value::Obj(obj.clone()),
            },
            Value::Seq(seq) => Value::Seq(
                seq.iter()
                    .map(|v| self.encode(v))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| self.encode(v).map(|v| (k.clone(), v)))
                    .collect::<Result<_, _>>()?,
            ),
            x => x.clone(),
        })
    }

    /// Encode `value` in place.
    pub fn encode_in_place(&self, value: &mut Value) -> Result<(), EncodeError> {
        match value {
            Value::Obj(obj) => {
                if let Some(map) = self.encode_object(obj)? {
                    *value = Value::Map(map);
                }
            }
            Value::Seq(seq) => {
                for v in seq {
                    self.encode_in_place(v)?;
                }
            }
            Value::Map(map) => {
                for v in map.values_mut() {
                    self.encode_in_place(v)?;
                }
            }
            _ => (),
        }

        Ok(())
    }

    /// Convert a single object into its encoded map.
    ///
    /// Returns `Ok(None)` if there is no hook or serializer for the object's type, unless the
    /// encoder is [strict](EncodeFlags::STRICT).
    pub fn encode_object(&self, obj: &Obj) -> Result<Option<Map>, EncodeError> {
        let type_id = obj.type_id();

        let map = match self.hooks.serializer(type_id) {
            Some(hook) => hook(obj.as_object()),
            None => None,
        };

        let map = match (map, self.registry.serializer(type_id)) {
            (Some(map), _) => Some(map),
            (None, Some(serialize)) => Some(serialize(obj.as_object())?),
            (None, None) => None,
        };

        let mut map = match map {
            Some(map) => map,
            None if self.flags.contains(EncodeFlags::STRICT) => {
                return Err(EncodeError::Unconvertible {
                    type_name: obj.type_name(),
                })
            }
            None => return Ok(None),
        };

        // only the contents, the map itself is stamped below
        for v in map.values_mut() {
            self.encode_in_place(v)?;
        }

        if !self.flags.contains(EncodeFlags::NO_METADATA) {
            let class = self
                .registry
                .class_of(type_id)
                .cloned()
                .unwrap_or_else(|| ClassMeta::from_type_name(obj.type_name()));

            if map.insert(class_key(), Value::Map(class.to_map())).is_some() {
                log::warn!(
                    "encoded map of '{}' already holds the '{}' key, overwriting",
                    class,
                    CLASS_KEY
                );
            }
        }

        Ok(Some(map))
    }
}

/// Encoding error.
#[derive(Debug, PartialEq, Clone)]
pub enum EncodeError {
    /// A strict encoder met an object it has no hook or serializer for.
    Unconvertible {
        /// The Rust type name.
        type_name: &'static str,
    },
    /// A type registered through `serde` did not serialize to a map.
    NotAMap {
        /// The Rust type name.
        type_name: &'static str,
    },
    /// A `serde` serialization failed.
    Serde(String),
}

impl From<SerError> for EncodeError {
    fn from(err: SerError) -> Self {
        match err {
            SerError::NotAMap { type_name } => EncodeError::NotAMap { type_name },
            e => EncodeError::Serde(e.to_string()),
        }
    }
}

impl error::Error for EncodeError {}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Unconvertible { type_name } => {
                write!(f, "no serialize hook or method for `{}`", type_name)
            }
            EncodeError::NotAMap { type_name } => {
                write!(f, "`{}` did not serialize to a map", type_name)
            }
            EncodeError::Serde(s) => write!(f, "serde error: {}", s),
        }
    }
}
