//! Carry encoded objects in clipboard and drag payloads.
//!
//! Requires the _mime_ feature.
//!
//! A payload is the JSON encoding of a value, escaped to base91 so it survives carriers that
//! only pass printable bytes, and stored under a MIME tag naming the type:
//!
//! `application/x-pyobject+json;type="<module>.<qualified_name>"`
//!
//! Any holder of tagged byte payloads can act as a [`Carrier`]. [`MimeData`] is the in-memory
//! one.
//!
//! # Example
//! ```rust
//! # use objser::*;
//! use objser::mime::{self, MimeData};
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Marker(i64);
//!
//! impl Serializable for Marker {
//!     fn serialize(&self) -> Map {
//!         let mut map = Map::new();
//!         map.insert_field("at", self.0);
//!         map
//!     }
//! }
//!
//! impl Deserializable for Marker {
//!     fn deserialize(&mut self, map: &Map) -> Result<(), DecodeError> {
//!         self.0 = map.req_i64("at")?;
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.insert(Registration::<Marker>::new().named("trace", "Marker").serializable().deserializable());
//!
//! let codec = json::JsonCodec::new(&registry);
//! let tag = mime::tag_for::<Marker>(&registry);
//! assert_eq!(tag, r#"application/x-pyobject+json;type="trace.Marker""#);
//!
//! let mut data = MimeData::new();
//! mime::dump(&codec, &Value::new_obj(Marker(12)), &mut data, &tag).unwrap();
//! assert!(mime::accepts::<Marker>(&registry, &data));
//!
//! let back = mime::load(&codec, &data, &tag).unwrap().unwrap();
//! assert_eq!(back.downcast_ref::<Marker>(), Some(&Marker(12)));
//! ```
use crate::json::{self, JsonCodec};
use crate::*;
use nom::{
    bytes::complete::{tag as literal, take_till1},
    character::complete::{char, space0},
    combinator::{all_consuming, map},
    sequence::{delimited, preceded, tuple},
    IResult,
};
use std::collections::BTreeMap;
use std::{error, fmt};

/// The media type every object payload is tagged with, before its `type` parameter.
pub const MEDIA_TYPE: &str = "application/x-pyobject+json";

/// A holder of byte payloads keyed by MIME tag, such as a clipboard or drag event.
pub trait Carrier {
    /// The tags present.
    fn formats(&self) -> Vec<String>;

    /// The payload stored under `tag`.
    fn data(&self, tag: &str) -> Option<&[u8]>;

    /// Store `bytes` under `tag`, replacing what was there.
    fn set_data(&mut self, tag: &str, bytes: Vec<u8>);

    /// A payload is stored under `tag`.
    fn has_format(&self, tag: &str) -> bool {
        self.data(tag).is_some()
    }
}

/// An in-memory [`Carrier`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MimeData {
    payloads: BTreeMap<String, Vec<u8>>,
}

impl MimeData {
    /// An empty carrier.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Carrier for MimeData {
    fn formats(&self) -> Vec<String> {
        self.payloads.keys().cloned().collect()
    }

    fn data(&self, tag: &str) -> Option<&[u8]> {
        self.payloads.get(tag).map(Vec::as_slice)
    }

    fn set_data(&mut self, tag: &str, bytes: Vec<u8>) {
        self.payloads.insert(tag.to_string(), bytes);
    }
}

////// FUNCTIONS ////

/// The tag for payloads of `class`.
pub fn tag(class: &ClassMeta) -> String {
    format!("{};type=\"{}\"", MEDIA_TYPE, class)
}

/// The tag for payloads of `T`, using its registered class when it has one.
pub fn tag_for<T: Object>(registry: &Registry) -> String {
    tag(&registry.class_for::<T>())
}

/// Read the class back out of a tag.
///
/// The type parameter is split at its last `.`.
///
/// # Example
/// ```rust
/// # use objser::*;
/// let class = mime::parse_tag(r#"application/x-pyobject+json; type="app::blocks.Block""#).unwrap();
/// assert_eq!(class, ClassMeta::new("app::blocks", "Block"));
///
/// assert!(mime::parse_tag("text/plain").is_err());
/// ```
pub fn parse_tag(s: &str) -> Result<ClassMeta, TagError> {
    match all_consuming(tag_parser)(s) {
        Ok((_, class)) => Ok(class),
        Err(_) => Err(TagError(s.to_string())),
    }
}

fn tag_parser(i: &str) -> IResult<&str, ClassMeta> {
    let param = preceded(
        tuple((space0, char(';'), space0, literal("type="))),
        delimited(char('"'), take_till1(|c| c == '"'), char('"')),
    );

    map(preceded(literal(MEDIA_TYPE), param), |ty: &str| {
        match ty.rfind('.') {
            Some(idx) => ClassMeta::new(ty[..idx].to_string(), ty[idx + 1..].to_string()),
            None => ClassMeta::new("", ty.to_string()),
        }
    })(i)
}

/// Encode `value` as JSON with `codec` and store it in `carrier` under `tag`.
pub fn dump<C: Carrier + ?Sized>(
    codec: &JsonCodec,
    value: &Value,
    carrier: &mut C,
    tag: &str,
) -> Result<(), Error> {
    let json = codec.to_vec(value)?;
    let mut bytes = Vec::with_capacity(json.len() * 5 / 4 + 2);
    base91::iter_encode(json.into_iter(), |b| bytes.push(b));
    log::debug!("storing {} byte payload under {}", bytes.len(), tag);
    carrier.set_data(tag, bytes);
    Ok(())
}

/// Decode the payload stored under `tag`. An absent tag is `Ok(None)`.
pub fn load<C: Carrier + ?Sized>(
    codec: &JsonCodec,
    carrier: &C,
    tag: &str,
) -> Result<Option<Value>, Error> {
    let bytes = match carrier.data(tag) {
        Some(b) => b,
        None => return Ok(None),
    };

    let json = base91::slice_decode(bytes);
    codec.from_slice(&json).map(Some).map_err(Error::from)
}

/// `carrier` holds a payload tagged for `T`.
pub fn accepts<T: Object>(registry: &Registry, carrier: &dyn Carrier) -> bool {
    let class = registry.class_for::<T>();
    carrier
        .formats()
        .iter()
        .filter_map(|f| parse_tag(f).ok())
        .any(|c| c == class)
}

////// ERROR ////

/// A string that is not an object payload tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TagError(pub String);

impl error::Error for TagError {}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a {} tag", self.0, MEDIA_TYPE)
    }
}

/// Payload error.
#[derive(Debug)]
pub enum Error {
    /// Encoding or decoding the JSON failed.
    Json(json::Error),
}

impl From<json::Error> for Error {
    fn from(err: json::Error) -> Self {
        Error::Json(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Json(e) => write!(f, "payload is not valid object JSON: {}", e),
        }
    }
}
