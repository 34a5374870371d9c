//! Object-aware serialization of object graphs.
//!
//! `objser` converts a tree of values, which can hold arbitrary typed objects, into a structured
//! textual document (JSON or XML) and back. Each encoded object is stamped with _class metadata_,
//! which the decoder uses to rebuild an instance of the original type. Consuming code writes at
//! most two methods per type, or teaches the engine about foreign types through [`Hooks`].
//!
//! The pieces, leaf-first:
//!
//! - [`Value`]: the tree being (de)serialized. Primitives, sequences, maps, and [`Obj`]ects.
//! - [`Registry`]: the explicit table mapping a stable class identifier to a Rust type.
//! - [`Hooks`]: per-type serialize/deserialize functions which take precedence over the type's
//!   own [`Serializable`]/[`Deserializable`] implementations.
//! - [`Encoder`] and [`Decoder`]: the format-agnostic cores.
//! - [`json`], [`xml`], and [`mime`]: the text adapters. Each is behind a feature flag.
//!
//! # Example
//! ```rust
//! # #[cfg(feature = "json")] {
//! use objser::*;
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Threshold {
//!     level: f64,
//! }
//!
//! impl Serializable for Threshold {
//!     fn serialize(&self) -> Map {
//!         let mut map = Map::new();
//!         map.insert_field("level", self.level);
//!         map
//!     }
//! }
//!
//! impl Deserializable for Threshold {
//!     fn deserialize(&mut self, map: &Map) -> Result<(), DecodeError> {
//!         self.level = map.req_f64("level")?;
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register::<Threshold>();
//!
//! let codec = json::JsonCodec::new(&registry);
//! let text = codec.to_string(&Value::new_obj(Threshold { level: 0.5 })).unwrap();
//! let back = codec.from_str(&text).unwrap();
//!
//! assert_eq!(back.downcast_ref::<Threshold>(), Some(&Threshold { level: 0.5 }));
//! # }
//! ```
#![warn(missing_docs)]

pub mod bridge;
mod class;
pub mod ds;
pub mod encode;
pub mod hooks;
pub mod registry;

#[cfg(feature = "geometry")]
pub mod geometry;
#[cfg(feature = "json")]
pub mod json;
#[cfg(feature = "mime")]
pub mod mime;
#[cfg(feature = "xml")]
pub mod xml;

use indexmap::IndexMap;

pub use class::{
    ClassMeta, CLASS_KEY, MODULE_KEY, QUALNAME_KEY, XML_MODULE_ATTR, XML_QUALNAME_ATTR,
};
pub use ds::{Key, MapExt, Number, Obj, Object, Value};
pub use encode::{DecodeError, Decoder, EncodeError, EncodeFlags, Encoder};
pub use hooks::Hooks;
pub use registry::{Deserializable, FromMap, Registration, Registry, Serializable};

/// An ordered list of values, the backing store of [`Value::Seq`].
pub type List = Vec<Value>;

/// A keyed collection of values, the backing store of [`Value::Map`].
///
/// Keys keep the order they were inserted in, which is also the order they are written out in.
/// Equality ignores order.
pub type Map = IndexMap<Key, Value>;
