//! [`Encoder`] and [`Decoder`] for converting between object graphs and documents.
//!
//! A _document_ is a [`Value`] tree without any [`Obj`]ects, which a text format can write
//! directly. Encoding replaces every object with a map of its fields, stamped with the object's
//! [`ClassMeta`] under the reserved [`CLASS_KEY`]. Decoding finds those stamped maps and rebuilds
//! the objects through the [`Registry`].
//!
//! For each object the encoder first looks for a hook in [`Hooks`], then for the type's own
//! serializer in the registry. An object with neither is left as it is, for the text format to
//! reject (or [`EncodeFlags::STRICT`] rejects it straight away).
//!
//! # Examples
//! ```rust
//! # use objser::*;
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Block {
//!     trials: u32,
//! }
//!
//! impl Serializable for Block {
//!     fn serialize(&self) -> Map {
//!         let mut map = Map::new();
//!         map.insert_field("trials", self.trials);
//!         map
//!     }
//! }
//!
//! impl Deserializable for Block {
//!     fn deserialize(&mut self, map: &Map) -> Result<(), DecodeError> {
//!         self.trials = map.req_i64("trials")? as u32;
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.insert(Registration::<Block>::new().named("designer", "Block").serializable().deserializable());
//! let hooks = Hooks::new();
//!
//! let value = Value::new_map(vec![("a", Value::new_obj(Block { trials: 20 }))]);
//!
//! let doc = Encoder::new(&registry, &hooks).encode(&value).unwrap();
//! assert!(doc.is_document());
//!
//! let block = doc.map().and_then(|m| m.get_map("a")).unwrap();
//! assert_eq!(block.get_num("trials"), Some(Number::from(20)));
//! assert_eq!(
//!     block.field(CLASS_KEY).and_then(ClassMeta::from_value),
//!     Some(ClassMeta::new("designer", "Block"))
//! );
//!
//! let back = Decoder::new(&registry, &hooks).decode(&doc).unwrap();
//! assert_eq!(back, value);
//! ```
//!
//! Encoding and decoding can also happen in place.
//! ```rust
//! # use objser::*;
//! let registry = Registry::new();
//! let hooks = Hooks::new();
//!
//! let mut value = Value::new_map(vec![("plain", Value::from(1))]);
//! let copy = value.clone();
//!
//! Encoder::new(&registry, &hooks).encode_in_place(&mut value).unwrap();
//! Decoder::new(&registry, &hooks).decode_in_place(&mut value).unwrap();
//! assert_eq!(value, copy);
//! ```
//!
//! [`ClassMeta`]: crate::ClassMeta
//! [`CLASS_KEY`]: crate::CLASS_KEY
//! [`Hooks`]: crate::Hooks
//! [`Obj`]: crate::Obj
//! [`Registry`]: crate::Registry
//! [`Value`]: crate::Value
use crate::*;

mod decoder;
mod encoder;

pub use self::decoder::{DecodeError, Decoder};
pub use self::encoder::{EncodeError, Encoder};

bitflags::bitflags! {
    /// Switches for the [`Encoder`].
    pub struct EncodeFlags: u8 {
        /// Do not stamp class metadata. The output can no longer be decoded back into objects.
        const NO_METADATA = 0b0000_0001;
        /// Fail on an object that has no hook and no serializer, instead of leaving it in place.
        const STRICT = 0b0000_0010;
    }
}

impl Default for EncodeFlags {
    fn default() -> Self {
        EncodeFlags::empty()
    }
}
