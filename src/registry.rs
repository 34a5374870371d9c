//! The explicit table of encodable types.
//!
//! Decoding needs to turn a class identifier back into a concrete Rust type and build a default
//! instance of it. Rust has no runtime module lookup, so every type that should survive a round
//! trip is registered once at startup. A registration records:
//!
//! - the [`ClassMeta`] the type is written out as,
//! - how to construct a blank instance,
//! - and the type's native serialize/deserialize functions, if it has any.
//!
//! Types the application does not own can be registered as merely
//! [constructible](Registration::default_constructible) and handled entirely by
//! [`Hooks`](crate::Hooks).
//!
//! # Example
//! ```rust
//! # use objser::*;
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Block {
//!     duration: f64,
//! }
//!
//! impl Serializable for Block {
//!     fn serialize(&self) -> Map {
//!         let mut map = Map::new();
//!         map.insert_field("duration", self.duration);
//!         map
//!     }
//! }
//!
//! impl Deserializable for Block {
//!     fn deserialize(&mut self, map: &Map) -> Result<(), DecodeError> {
//!         self.duration = map.req_f64("duration")?;
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.insert(Registration::<Block>::new().named("designer", "Block").serializable().deserializable());
//!
//! assert_eq!(registry.class_for::<Block>(), ClassMeta::new("designer", "Block"));
//! assert!(registry.contains::<Block>());
//! ```
use crate::bridge;
use crate::{ClassMeta, DecodeError, EncodeError, Map, Object};
use once_cell::sync::{Lazy, OnceCell};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;

/// A type that can describe itself as a [`Map`].
///
/// Nested objects may be placed in the map as [`Value::Obj`](crate::Value::Obj); the encoder
/// converts them as well.
pub trait Serializable {
    /// The fields of `self`.
    fn serialize(&self) -> Map;
}

/// A type that populates a default-constructed instance of itself from a [`Map`].
///
/// The map has already been decoded, so nested objects arrive as
/// [`Value::Obj`](crate::Value::Obj). The reserved class key is removed beforehand.
pub trait Deserializable {
    /// Fill `self` from `map`.
    fn deserialize(&mut self, map: &Map) -> Result<(), DecodeError>;
}

/// A type that builds itself from a [`Map`], the factory counterpart of [`Deserializable`].
pub trait FromMap: Sized {
    /// Build an instance from `map`.
    fn from_map(map: &Map) -> Result<Self, DecodeError>;
}

pub(crate) type ConstructFn = fn() -> Box<dyn Object>;
pub(crate) type SerializeFn = fn(&dyn Object) -> Result<Map, EncodeError>;

#[derive(Clone, Copy)]
pub(crate) enum DeserializeFn {
    InPlace(fn(&mut dyn Object, &Map) -> Result<(), DecodeError>),
    Factory(fn(&Map) -> Result<Box<dyn Object>, DecodeError>),
}

#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) class: ClassMeta,
    pub(crate) type_name: &'static str,
    pub(crate) construct: Option<ConstructFn>,
    pub(crate) serialize: Option<SerializeFn>,
    pub(crate) deserialize: Option<DeserializeFn>,
}

impl Entry {
    /// A blank instance, the way a no-argument constructor would make it.
    pub(crate) fn construct(&self) -> Result<Box<dyn Object>, DecodeError> {
        self.construct
            .map(|ctor| ctor())
            .ok_or_else(|| DecodeError::NotConstructible(self.class.clone()))
    }
}

/// A description of one type for the [`Registry`].
///
/// Start with [`new`](Registration::new) and opt into each capability the type has. The bounds
/// on each method check at compile time that the type really has it.
pub struct Registration<T> {
    entry: Entry,
    marker: PhantomData<fn() -> T>,
}

impl<T: Object> Default for Registration<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Object> Registration<T> {
    /// A registration with the class derived from the Rust type path and no capabilities.
    pub fn new() -> Self {
        Self {
            entry: Entry {
                class: ClassMeta::of::<T>(),
                type_name: std::any::type_name::<T>(),
                construct: None,
                serialize: None,
                deserialize: None,
            },
            marker: PhantomData,
        }
    }

    /// Pin the class identifier instead of deriving it from the Rust type path.
    pub fn named<M, Q>(mut self, module: M, qualified_name: Q) -> Self
    where
        M: Into<std::borrow::Cow<'static, str>>,
        Q: Into<std::borrow::Cow<'static, str>>,
    {
        self.entry.class = ClassMeta::new(module, qualified_name);
        self
    }

    /// Blank instances are made with [`Default`].
    pub fn default_constructible(mut self) -> Self
    where
        T: Default,
    {
        self.entry.construct = Some(construct::<T>);
        self
    }

    /// Encode with the type's [`Serializable`] implementation.
    pub fn serializable(mut self) -> Self
    where
        T: Serializable,
    {
        self.entry.serialize = Some(serialize_native::<T>);
        self
    }

    /// Decode by populating a default instance with [`Deserializable`].
    pub fn deserializable(mut self) -> Self
    where
        T: Deserializable + Default,
    {
        self.entry.construct = Some(construct::<T>);
        self.entry.deserialize = Some(DeserializeFn::InPlace(deserialize_in_place::<T>));
        self
    }

    /// Decode with the type's [`FromMap`] factory.
    pub fn from_map(mut self) -> Self
    where
        T: FromMap,
    {
        self.entry.deserialize = Some(DeserializeFn::Factory(factory::<T>));
        self
    }

    /// Encode and decode through the type's `serde` implementations.
    ///
    /// The type must serialize as a map (a struct or map type).
    pub fn serde(mut self) -> Self
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        self.entry.serialize = Some(serialize_serde::<T>);
        self.entry.deserialize = Some(DeserializeFn::Factory(factory_serde::<T>));
        self
    }

    /// The class identifier this registration writes.
    pub fn class(&self) -> &ClassMeta {
        &self.entry.class
    }
}

fn construct<T: Object + Default>() -> Box<dyn Object> {
    Box::new(T::default())
}

fn serialize_native<T: Object + Serializable>(obj: &dyn Object) -> Result<Map, EncodeError> {
    obj.as_any()
        .downcast_ref::<T>()
        .map(<T as Serializable>::serialize)
        .ok_or(EncodeError::Unconvertible {
            type_name: obj.type_name(),
        })
}

fn serialize_serde<T: Object + serde::Serialize>(obj: &dyn Object) -> Result<Map, EncodeError> {
    let t = obj
        .as_any()
        .downcast_ref::<T>()
        .ok_or(EncodeError::Unconvertible {
            type_name: obj.type_name(),
        })?;
    bridge::to_map(t).map_err(EncodeError::from)
}

fn deserialize_in_place<T: Object + Deserializable>(
    obj: &mut dyn Object,
    map: &Map,
) -> Result<(), DecodeError> {
    match obj.as_any_mut().downcast_mut::<T>() {
        Some(t) => <T as Deserializable>::deserialize(t, map),
        None => Err(DecodeError::NotDeserializable(ClassMeta::of::<T>())),
    }
}

fn factory<T: Object + FromMap>(map: &Map) -> Result<Box<dyn Object>, DecodeError> {
    T::from_map(map).map(|t| Box::new(t) as Box<dyn Object>)
}

fn factory_serde<T: Object + serde::de::DeserializeOwned>(
    map: &Map,
) -> Result<Box<dyn Object>, DecodeError> {
    bridge::from_map::<T>(map.clone())
        .map(|t| Box::new(t) as Box<dyn Object>)
        .map_err(DecodeError::from)
}

/// The table of types an encoder can stamp and a decoder can rebuild.
///
/// Registries are built once at initialization and then only read. A registry can be installed
/// process-wide with [`install`], after which [`Registry::global`] returns it.
#[derive(Clone, Default)]
pub struct Registry {
    entries: HashMap<TypeId, Entry>,
    classes: HashMap<ClassMeta, TypeId>,
}

static GLOBAL: OnceCell<Registry> = OnceCell::new();
static EMPTY: Lazy<Registry> = Lazy::new(Registry::new);

/// Install `registry` as the process-wide registry.
///
/// This can only happen once; later calls hand the registry back as the error.
pub fn install(registry: Registry) -> Result<(), Registry> {
    GLOBAL.set(registry)
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, or an empty one if none was [`install`]ed.
    pub fn global() -> &'static Registry {
        GLOBAL.get().unwrap_or(&EMPTY)
    }

    /// Add a type.
    ///
    /// Registering the same type again replaces its entry. A class identifier already held by a
    /// different type is taken over, with a warning, and the other type is unregistered.
    pub fn insert<T: Object>(&mut self, registration: Registration<T>) -> &mut Self {
        let type_id = TypeId::of::<T>();
        let entry = registration.entry;

        if let Some(old) = self.entries.remove(&type_id) {
            self.classes.remove(&old.class);
        }

        if let Some(other) = self.classes.remove(&entry.class) {
            if let Some(other) = self.entries.remove(&other) {
                log::warn!(
                    "class '{}' reassigned from `{}` to `{}`",
                    entry.class,
                    other.type_name,
                    entry.type_name
                );
            }
        }

        log::debug!("registered `{}` as '{}'", entry.type_name, entry.class);

        self.classes.insert(entry.class.clone(), type_id);
        self.entries.insert(type_id, entry);
        self
    }

    /// Add a type that is [`Default`], [`Serializable`], and [`Deserializable`], the common case.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Object + Default + Serializable + Deserializable,
    {
        self.insert(Registration::<T>::new().serializable().deserializable())
    }

    /// `T` is registered.
    pub fn contains<T: Any>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// The number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No types are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the registered class identifiers.
    pub fn classes(&self) -> impl Iterator<Item = &ClassMeta> {
        self.classes.keys()
    }

    /// The class identifier of a registered type.
    pub fn class_of(&self, type_id: TypeId) -> Option<&ClassMeta> {
        self.entries.get(&type_id).map(|e| &e.class)
    }

    /// The class identifier `T` is written as: its registered one, else the derived one.
    pub fn class_for<T: ?Sized + Any>(&self) -> ClassMeta {
        self.class_of(TypeId::of::<T>())
            .cloned()
            .unwrap_or_else(ClassMeta::of::<T>)
    }

    pub(crate) fn serializer(&self, type_id: TypeId) -> Option<SerializeFn> {
        self.entries.get(&type_id).and_then(|e| e.serialize)
    }

    /// Find the entry for a class identifier.
    ///
    /// Fails with [`DecodeError::ModuleNotFound`] if no registered class lives in the module,
    /// and with [`DecodeError::ClassNotFound`] if the module is known but the name is not.
    pub(crate) fn resolve(&self, class: &ClassMeta) -> Result<(TypeId, &Entry), DecodeError> {
        let found = self
            .classes
            .get(class)
            .and_then(|id| self.entries.get(id).map(|e| (*id, e)));

        match found {
            Some(x) => Ok(x),
            None if self.classes.keys().any(|c| c.module() == class.module()) => {
                Err(DecodeError::ClassNotFound(class.clone()))
            }
            None => Err(DecodeError::ModuleNotFound(class.module().to_string())),
        }
    }
}
