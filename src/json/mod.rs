//! Encode object graphs to JSON and back.
//!
//! Requires the _json_ feature.
//!
//! [`JsonCodec`] does both directions in a single pass. While writing, every [`Obj`] met in the
//! tree goes through [`Encoder::encode_object`]. While reading, every completed JSON object goes
//! through [`Decoder::decode_map`] before its parent continues, so nested objects are rebuilt
//! first.
//!
//! # Examples
//! ```rust
//! # use objser::*;
//! use objser::json::{JsonCodec, JsonOptions};
//!
//! let registry = Registry::new();
//! let codec = JsonCodec::new(&registry);
//!
//! let value = Value::new_map(vec![
//!     ("rate", Value::from(256)),
//!     ("labels", Value::from(vec![Value::from("Fz"), Value::from("Cz")])),
//! ]);
//!
//! let s = codec.to_string(&value).unwrap();
//! assert_eq!(s, r#"{"rate": 256, "labels": ["Fz", "Cz"]}"#);
//! assert_eq!(codec.from_str(&s).unwrap(), value);
//!
//! let pretty = codec.with_options(JsonOptions::pretty()).to_string(&value).unwrap();
//! assert_eq!(pretty, "{\n    \"rate\": 256,\n    \"labels\": [\n        \"Fz\",\n        \"Cz\"\n    ]\n}");
//! ```
//!
//! An object nobody knows how to encode fails with `serde_json`'s own error.
//! ```rust
//! # use objser::*;
//! #[derive(Debug, Clone, PartialEq)]
//! struct Socket;
//!
//! let registry = Registry::new();
//! let err = json::JsonCodec::new(&registry)
//!     .to_string(&Value::new_obj(Socket))
//!     .unwrap_err();
//! assert!(err.to_string().contains("is not JSON serializable"));
//! ```
use crate::*;
use std::cell::RefCell;
use std::{error, fmt, io};

mod de;
mod format;
mod ser;

use self::de::{DecodeCtx, Seed};
use self::format::Styled;
use self::ser::{EncodeCtx, Encoded};

/// Output style for [`JsonCodec`].
#[derive(Clone, Debug, PartialEq)]
pub struct JsonOptions {
    /// Put each item on its own line, indented by this string per level.
    /// _Default is `None`._
    pub indent: Option<String>,

    /// Written between items of arrays and objects.
    /// _Default is `", "`._
    pub item_separator: String,

    /// Written between an object key and its value.
    /// _Default is `": "`._
    pub key_separator: String,

    /// Escape every non-ASCII character as `\uXXXX`.
    /// _Default is true._
    pub ensure_ascii: bool,

    /// Stamp encoded objects with class metadata. Without it the output cannot be decoded back
    /// into objects.
    /// _Default is true._
    pub emit_metadata: bool,

    /// Write object members in key order instead of insertion order.
    /// _Default is false._
    pub sort_keys: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            indent: None,
            item_separator: String::from(", "),
            key_separator: String::from(": "),
            ensure_ascii: true,
            emit_metadata: true,
            sort_keys: false,
        }
    }
}

impl JsonOptions {
    /// Four space indentation, the style documents are saved in.
    pub fn pretty() -> Self {
        Self {
            indent: Some(String::from("    ")),
            item_separator: String::from(","),
            ..Self::default()
        }
    }

    /// No whitespace at all.
    pub fn compact() -> Self {
        Self {
            item_separator: String::from(","),
            key_separator: String::from(":"),
            ..Self::default()
        }
    }
}

/// Encodes and decodes JSON text against a [`Registry`] and [`Hooks`].
///
/// The codec borrows both and is cheap to build per call.
#[derive(Clone)]
pub struct JsonCodec<'r> {
    registry: &'r Registry,
    hooks: &'r Hooks,
    options: JsonOptions,
}

impl<'r> JsonCodec<'r> {
    /// A codec using the [shared](Hooks::shared) hooks and default options.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            hooks: Hooks::shared(),
            options: JsonOptions::default(),
        }
    }

    /// Use `hooks` instead of the shared ones.
    pub fn with_hooks(mut self, hooks: &'r Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replace the output options.
    pub fn with_options(mut self, options: JsonOptions) -> Self {
        self.options = options;
        self
    }

    /// The output options.
    pub fn options(&self) -> &JsonOptions {
        &self.options
    }

    /// The registry objects are resolved against.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// The hooks in use.
    pub fn hooks(&self) -> &'r Hooks {
        self.hooks
    }

    fn encoder(&self) -> Encoder<'r> {
        let flags = if self.options.emit_metadata {
            EncodeFlags::empty()
        } else {
            EncodeFlags::NO_METADATA
        };
        Encoder::new(self.registry, self.hooks).flags(flags)
    }

    /// Write `value` as JSON to `writer`.
    pub fn to_writer<W: io::Write>(&self, writer: W, value: &Value) -> Result<(), Error> {
        use serde::Serialize;

        let ctx = EncodeCtx {
            encoder: self.encoder(),
            sort_keys: self.options.sort_keys,
            error: RefCell::new(None),
        };
        let mut ser = serde_json::Serializer::with_formatter(writer, Styled::new(&self.options));

        Encoded { value, ctx: &ctx }
            .serialize(&mut ser)
            .map_err(|e| ctx.error.take().unwrap_or(Error::Syntax(e)))
    }

    /// Encode `value` as JSON bytes.
    pub fn to_vec(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::with_capacity(128);
        self.to_writer(&mut buf, value)?;
        Ok(buf)
    }

    /// Encode `value` as a JSON string.
    pub fn to_string(&self, value: &Value) -> Result<String, Error> {
        let buf = self.to_vec(value)?;
        String::from_utf8(buf)
            .map_err(|e| Error::Syntax(<serde_json::Error as serde::ser::Error>::custom(e)))
    }

    fn read<'de, R: serde_json::de::Read<'de>>(&self, read: R) -> Result<Value, Error> {
        use serde::de::DeserializeSeed;

        let ctx = DecodeCtx {
            decoder: Decoder::new(self.registry, self.hooks),
            error: RefCell::new(None),
        };
        let mut de = serde_json::Deserializer::new(read);

        let value = Seed { ctx: &ctx }
            .deserialize(&mut de)
            .map_err(|e| ctx.error.take().unwrap_or(Error::Syntax(e)))?;
        de.end()?;
        Ok(value)
    }

    /// Decode a JSON string.
    pub fn from_str(&self, s: &str) -> Result<Value, Error> {
        self.read(serde_json::de::StrRead::new(s))
    }

    /// Decode JSON bytes.
    pub fn from_slice(&self, v: &[u8]) -> Result<Value, Error> {
        self.read(serde_json::de::SliceRead::new(v))
    }

    /// Decode JSON read from `reader`.
    pub fn from_reader<R: io::Read>(&self, reader: R) -> Result<Value, Error> {
        self.read(serde_json::de::IoRead::new(reader))
    }
}

/// Encode with the process-wide [`Registry`] and the shared [`Hooks`], in the default style.
pub fn to_string(value: &Value) -> Result<String, Error> {
    JsonCodec::new(Registry::global()).to_string(value)
}

/// Decode with the process-wide [`Registry`] and the shared [`Hooks`].
pub fn from_str(s: &str) -> Result<Value, Error> {
    JsonCodec::new(Registry::global()).from_str(s)
}

/// JSON encoding or decoding error.
#[derive(Debug)]
pub enum Error {
    /// `serde_json` failed: malformed text, I/O, or an object that could not be encoded.
    Syntax(serde_json::Error),
    /// The encoder failed.
    Encode(EncodeError),
    /// The decoder failed.
    Decode(DecodeError),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Syntax(err)
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Error::Encode(err)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Syntax(e) => Some(e),
            Error::Encode(e) => Some(e),
            Error::Decode(e) => Some(e),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(e) => write!(f, "{}", e),
            Error::Encode(e) => write!(f, "encoding failed: {}", e),
            Error::Decode(e) => write!(f, "decoding failed: {}", e),
        }
    }
}
