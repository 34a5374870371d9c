//! Per-type serialize and deserialize functions that override a type's own.
//!
//! Hooks teach the engine about types the application cannot (or does not want to) implement
//! [`Serializable`](crate::Serializable) for, such as types from other crates. They are keyed by
//! the exact [`TypeId`], so a hook for a type never applies to wrappers of it.
//!
//! A decode hook fills a default-constructed instance, so the type must be registered as
//! constructible in the [`Registry`](crate::Registry).
//!
//! # Example
//! ```rust
//! # use objser::*;
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Color(u8, u8, u8);
//!
//! let hooks = Hooks::new()
//!     .on_serialize(|c: &Color| {
//!         let mut map = Map::new();
//!         map.insert_field("rgb", format!("{},{},{}", c.0, c.1, c.2));
//!         map
//!     })
//!     .on_deserialize(|c: &mut Color, map: &Map| {
//!         let rgb = map.req_str("rgb")?;
//!         let parts: Vec<u8> = rgb.split(',').filter_map(|s| s.parse().ok()).collect();
//!         match parts.as_slice() {
//!             [r, g, b] => *c = Color(*r, *g, *b),
//!             _ => return Err(DecodeError::invalid_field("rgb", "three components")),
//!         }
//!         Ok(())
//!     });
//!
//! assert!(hooks.serializer(std::any::TypeId::of::<Color>()).is_some());
//! assert!(hooks.deserializer(std::any::TypeId::of::<u8>()).is_none());
//! ```
use crate::{DecodeError, Map, Object};
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

/// A type-erased serialize hook. Returning `None` defers to the type's own serializer.
pub type SerializeHook = Arc<dyn Fn(&dyn Object) -> Option<Map> + Send + Sync>;

/// A type-erased deserialize hook, which fills a default-constructed instance.
pub type DeserializeHook = Arc<dyn Fn(&mut dyn Object, &Map) -> Result<(), DecodeError> + Send + Sync>;

/// Serialize hooks keyed by exact type.
pub type SerializeHooks = HashMap<TypeId, SerializeHook>;

/// Deserialize hooks keyed by exact type.
pub type DeserializeHooks = HashMap<TypeId, DeserializeHook>;

/// A pair of hook tables. Cheap to clone.
#[derive(Clone, Default)]
pub struct Hooks {
    serialize: SerializeHooks,
    deserialize: DeserializeHooks,
}

static SHARED: Lazy<Hooks> = Lazy::new(Hooks::new);

impl Hooks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default, which is empty.
    pub fn shared() -> &'static Hooks {
        &SHARED
    }

    /// Encode `T` with `f`.
    pub fn on_serialize<T, F>(mut self, f: F) -> Self
    where
        T: Object,
        F: Fn(&T) -> Map + Send + Sync + 'static,
    {
        let hook: SerializeHook =
            Arc::new(move |obj: &dyn Object| obj.as_any().downcast_ref::<T>().map(&f));
        self.serialize.insert(TypeId::of::<T>(), hook);
        self
    }

    /// Decode `T` with `f`.
    pub fn on_deserialize<T, F>(mut self, f: F) -> Self
    where
        T: Object,
        F: Fn(&mut T, &Map) -> Result<(), DecodeError> + Send + Sync + 'static,
    {
        let hook: DeserializeHook = Arc::new(move |obj: &mut dyn Object, map: &Map| {
            match obj.as_any_mut().downcast_mut::<T>() {
                Some(t) => f(t, map),
                None => Err(DecodeError::Message(format!(
                    "deserialize hook for `{}` given a `{}`",
                    std::any::type_name::<T>(),
                    Object::type_name(&*obj)
                ))),
            }
        });
        self.deserialize.insert(TypeId::of::<T>(), hook);
        self
    }

    /// The serialize hook for an exact type.
    pub fn serializer(&self, type_id: TypeId) -> Option<&SerializeHook> {
        self.serialize.get(&type_id)
    }

    /// The deserialize hook for an exact type.
    pub fn deserializer(&self, type_id: TypeId) -> Option<&DeserializeHook> {
        self.deserialize.get(&type_id)
    }

    /// There is a hook of either kind for `T`.
    pub fn handles<T: Any>(&self) -> bool {
        let id = TypeId::of::<T>();
        self.serialize.contains_key(&id) || self.deserialize.contains_key(&id)
    }

    /// A new set holding the hooks of both. `other` wins where both have a hook for a type.
    pub fn merge(&self, other: &Hooks) -> Hooks {
        let mut hooks = self.clone();
        hooks
            .serialize
            .extend(other.serialize.iter().map(|(k, v)| (*k, Arc::clone(v))));
        hooks
            .deserialize
            .extend(other.deserialize.iter().map(|(k, v)| (*k, Arc::clone(v))));
        hooks
    }

    /// Split into the two tables.
    pub fn into_tables(self) -> (SerializeHooks, DeserializeHooks) {
        (self.serialize, self.deserialize)
    }
}

impl From<(SerializeHooks, DeserializeHooks)> for Hooks {
    fn from((serialize, deserialize): (SerializeHooks, DeserializeHooks)) -> Self {
        Self {
            serialize,
            deserialize,
        }
    }
}

impl From<SerializeHooks> for Hooks {
    fn from(serialize: SerializeHooks) -> Self {
        Self {
            serialize,
            deserialize: DeserializeHooks::new(),
        }
    }
}

impl BitOr for Hooks {
    type Output = Hooks;

    fn bitor(self, rhs: Hooks) -> Hooks {
        self.merge(&rhs)
    }
}

impl<'a> BitOr<&'a Hooks> for &'a Hooks {
    type Output = Hooks;

    fn bitor(self, rhs: &'a Hooks) -> Hooks {
        self.merge(rhs)
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("serialize", &self.serialize.len())
            .field("deserialize", &self.deserialize.len())
            .finish()
    }
}
