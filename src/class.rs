use crate::{Key, Map, MapExt, Value};
use std::borrow::Cow;
use std::fmt;

/// The reserved key class metadata is stored under in an encoded object's map.
///
/// Payload data must never use this key.
pub const CLASS_KEY: &str = "__class__";
/// The module entry of the class metadata map.
pub const MODULE_KEY: &str = "module";
/// The qualified name entry of the class metadata map.
pub const QUALNAME_KEY: &str = "qualified_name";
/// The attribute key carrying the module once metadata is relocated for XML.
pub const XML_MODULE_ATTR: &str = "@__class__.__module__";
/// The attribute key carrying the qualified name once metadata is relocated for XML.
pub const XML_QUALNAME_ATTR: &str = "@__class__.__qualname__";

/// The identity of an encoded type: a module path and a name within it.
///
/// This pair is stamped onto every encoded object and looked up in the
/// [`Registry`](crate::Registry) when decoding. Renaming the identifier of a registered type
/// breaks every document written with the old one, so pin it with
/// [`Registration::named`](crate::Registration::named) for types whose path may move.
///
/// # Example
/// ```rust
/// # use objser::*;
/// let class = ClassMeta::from_type_name("app::blocks::Block");
/// assert_eq!(class.module(), "app::blocks");
/// assert_eq!(class.qualified_name(), "Block");
/// assert_eq!(class.to_string(), "app::blocks.Block");
///
/// let generic = ClassMeta::from_type_name("app::Pair<core::option::Option<u8>>");
/// assert_eq!(generic.module(), "app");
/// assert_eq!(generic.qualified_name(), "Pair<core::option::Option<u8>>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassMeta {
    module: Cow<'static, str>,
    qualified_name: Cow<'static, str>,
}

impl ClassMeta {
    /// A class identifier from its parts.
    pub fn new<M, Q>(module: M, qualified_name: Q) -> Self
    where
        M: Into<Cow<'static, str>>,
        Q: Into<Cow<'static, str>>,
    {
        Self {
            module: module.into(),
            qualified_name: qualified_name.into(),
        }
    }

    /// The identifier Rust gives `T`. See [`from_type_name`](ClassMeta::from_type_name).
    pub fn of<T: ?Sized>() -> Self {
        Self::from_type_name(std::any::type_name::<T>())
    }

    /// Split a Rust type path at its last `::` that is outside generic brackets.
    pub fn from_type_name(type_name: &'static str) -> Self {
        let mut depth = 0usize;
        let mut split = None;
        let bytes = type_name.as_bytes();

        for (idx, b) in bytes.iter().enumerate() {
            match b {
                b'<' | b'(' | b'[' => depth += 1,
                b'>' | b')' | b']' => depth = depth.saturating_sub(1),
                b':' if depth == 0 && bytes.get(idx + 1) == Some(&b':') => split = Some(idx),
                _ => (),
            }
        }

        match split {
            Some(idx) => Self::new(&type_name[..idx], &type_name[idx + 2..]),
            None => Self::new("", type_name),
        }
    }

    /// The module path.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The name within the module.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The metadata map stamped onto encoded objects.
    pub fn to_map(&self) -> Map {
        let mut map = Map::new();
        map.insert_field(MODULE_KEY, self.module());
        map.insert_field(QUALNAME_KEY, self.qualified_name());
        map
    }

    /// Read the metadata map back. Returns `None` if either entry is missing or not a string.
    pub fn from_map(map: &Map) -> Option<Self> {
        let module = map.get_str(MODULE_KEY)?;
        let qualified_name = map.get_str(QUALNAME_KEY)?;
        Some(Self::new(module.to_string(), qualified_name.to_string()))
    }

    /// Read class metadata from a value. See [`from_map`](ClassMeta::from_map).
    pub fn from_value(value: &Value) -> Option<Self> {
        value.map().and_then(Self::from_map)
    }
}

impl fmt::Display for ClassMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            f.write_str(&self.qualified_name)
        } else {
            write!(f, "{}.{}", self.module, self.qualified_name)
        }
    }
}

/// The reserved key as a map [`Key`].
pub(crate) fn class_key() -> Key {
    Key::from(CLASS_KEY)
}
