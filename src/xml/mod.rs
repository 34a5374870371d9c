//! Encode object graphs to XML and back.
//!
//! Requires the _xml_ feature.
//!
//! XML has no native notion of sequences, numbers, or non-string keys, so it goes through the
//! usual dictionary mapping:
//!
//! - a document is a map with exactly one key, the root element;
//! - keys starting with `@` are attributes, and the `#text` key is the element text;
//! - a sequence is the element repeated, and `Null` is an empty element;
//! - every leaf is text. Use [`Value::number`] and [`Value::boolean`] (or the lenient
//!   [`MapExt`] readers) to read typed leaves back.
//!
//! The class metadata of encoded objects travels as the two attributes
//! `__class__.__module__` and `__class__.__qualname__`.
//!
//! A parser cannot tell a single child from a list of one. Names listed in
//! [`XmlOptions::force_list`] always decode as sequences. [`MapExt::list`] smooths over the
//! rest.
//!
//! # Example
//! ```rust
//! # use objser::*;
//! use objser::xml::XmlCodec;
//!
//! let registry = Registry::new();
//! let codec = XmlCodec::new(&registry);
//!
//! let value = Value::new_map(vec![(
//!     "montage",
//!     Value::new_map(vec![
//!         ("@name", Value::from("10-20")),
//!         ("channel", Value::from(vec![Value::from("Fz"), Value::from("Cz")])),
//!     ]),
//! )]);
//!
//! let s = codec.to_string(&value).unwrap();
//! assert_eq!(s, r#"<montage name="10-20"><channel>Fz</channel><channel>Cz</channel></montage>"#);
//! assert_eq!(codec.from_str(&s).unwrap(), value);
//! ```
use crate::class::class_key;
use crate::*;
use std::collections::BTreeSet;
use std::{error, fmt, io};

mod read;
mod write;

/// Input and output settings for [`XmlCodec`].
#[derive(Clone, Debug, PartialEq)]
pub struct XmlOptions {
    /// Element names that always decode as sequences, even when they occur once.
    /// _Default is empty._
    pub force_list: BTreeSet<String>,

    /// Indent nested elements with `count` repetitions of the `char` byte.
    /// _Default is `None`._
    pub indent: Option<(u8, usize)>,

    /// Write an `<?xml ...?>` declaration.
    /// _Default is false._
    pub declaration: bool,

    /// The key prefix marking attributes.
    /// _Default is `"@"`._
    pub attr_prefix: String,

    /// The key holding the text of an element that also has attributes or children.
    /// _Default is `"#text"`._
    pub text_key: String,

    /// Stamp encoded objects with class metadata.
    /// _Default is true._
    pub emit_metadata: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            force_list: BTreeSet::new(),
            indent: None,
            declaration: false,
            attr_prefix: String::from("@"),
            text_key: String::from("#text"),
            emit_metadata: true,
        }
    }
}

impl XmlOptions {
    /// Two space indentation and a declaration.
    pub fn pretty() -> Self {
        Self {
            indent: Some((b' ', 2)),
            declaration: true,
            ..Self::default()
        }
    }

    /// Add names to [`force_list`](XmlOptions::force_list).
    pub fn with_force_list<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.force_list.extend(names.into_iter().map(Into::into));
        self
    }

    fn module_attr(&self) -> Key {
        Key::Str(format!("{}__class__.__module__", self.attr_prefix))
    }

    fn qualname_attr(&self) -> Key {
        Key::Str(format!("{}__class__.__qualname__", self.attr_prefix))
    }
}

/// Encodes and decodes XML text against a [`Registry`] and [`Hooks`].
#[derive(Clone)]
pub struct XmlCodec<'r> {
    registry: &'r Registry,
    hooks: &'r Hooks,
    options: XmlOptions,
}

impl<'r> XmlCodec<'r> {
    /// A codec using the [shared](Hooks::shared) hooks and default options.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            hooks: Hooks::shared(),
            options: XmlOptions::default(),
        }
    }

    /// Use `hooks` instead of the shared ones.
    pub fn with_hooks(mut self, hooks: &'r Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replace the options.
    pub fn with_options(mut self, options: XmlOptions) -> Self {
        self.options = options;
        self
    }

    /// The options.
    pub fn options(&self) -> &XmlOptions {
        &self.options
    }

    /// Encode `value`, which must be a map with a single key naming the root element.
    pub fn to_writer<W: io::Write>(&self, writer: W, value: &Value) -> Result<W, Error> {
        let flags = if self.options.emit_metadata {
            EncodeFlags::empty()
        } else {
            EncodeFlags::NO_METADATA
        };
        let mut doc = Encoder::new(self.registry, self.hooks)
            .flags(flags)
            .encode(value)?;

        prepare(&mut doc, &self.options);

        match &doc {
            Value::Map(map) if map.len() == 1 => match map.iter().next() {
                Some((k, v)) => write::write(writer, (k.str().unwrap_or_default(), v), &self.options),
                None => Err(Error::RootCount(0)),
            },
            Value::Map(map) => Err(Error::RootCount(map.len())),
            _ => Err(Error::RootCount(0)),
        }
    }

    /// Encode `value` as an XML string. See [`to_writer`](XmlCodec::to_writer).
    pub fn to_string(&self, value: &Value) -> Result<String, Error> {
        let buf = self.to_writer(Vec::with_capacity(128), value)?;
        String::from_utf8(buf).map_err(|e| Error::from(e.utf8_error()))
    }

    /// Encode `value` as the content of a root element named `root`.
    ///
    /// # Example
    /// ```rust
    /// # use objser::*;
    /// let registry = Registry::new();
    /// let s = xml::XmlCodec::new(&registry)
    ///     .to_string_rooted("gain", &Value::from(2.5))
    ///     .unwrap();
    /// assert_eq!(s, "<gain>2.5</gain>");
    /// ```
    pub fn to_string_rooted(&self, root: &str, value: &Value) -> Result<String, Error> {
        let mut map = Map::new();
        map.insert_field(root, value.clone());
        self.to_string(&Value::Map(map))
    }

    /// Decode an XML string.
    pub fn from_str(&self, s: &str) -> Result<Value, Error> {
        let mut value = read::read(s, &self.options)?;
        restore(&mut value, &self.options);
        Decoder::new(self.registry, self.hooks).decode_in_place(&mut value)?;
        Ok(value)
    }

    /// Decode UTF-8 XML bytes.
    pub fn from_slice(&self, v: &[u8]) -> Result<Value, Error> {
        self.from_str(std::str::from_utf8(v)?)
    }
}

/// Stringify every key and move class metadata into attributes.
fn prepare(value: &mut Value, opts: &XmlOptions) {
    match value {
        Value::Seq(seq) => seq.iter_mut().for_each(|v| prepare(v, opts)),
        Value::Map(map) => {
            let meta = map.shift_remove(&class_key());

            *map = std::mem::take(map)
                .into_iter()
                .map(|(k, mut v)| {
                    prepare(&mut v, opts);
                    (k.into_string_key(), v)
                })
                .collect();

            match meta.as_ref().and_then(ClassMeta::from_value) {
                Some(class) => {
                    map.insert(opts.module_attr(), Value::from(class.module()));
                    map.insert(opts.qualname_attr(), Value::from(class.qualified_name()));
                }
                None => {
                    if let Some(meta) = meta {
                        map.insert(class_key(), meta);
                    }
                }
            }
        }
        _ => (),
    }
}

/// Turn metadata attributes back into the reserved key.
fn restore(value: &mut Value, opts: &XmlOptions) {
    match value {
        Value::Seq(seq) => seq.iter_mut().for_each(|v| restore(v, opts)),
        Value::Map(map) => {
            map.values_mut().for_each(|v| restore(v, opts));

            let module = opts.module_attr();
            let qualname = opts.qualname_attr();
            let found = matches!(
                (map.get(&module), map.get(&qualname)),
                (Some(Value::Str(_)), Some(Value::Str(_)))
            );

            if found {
                let module = map.shift_remove(&module).unwrap_or_default();
                let qualname = map.shift_remove(&qualname).unwrap_or_default();
                let mut meta = Map::new();
                meta.insert_field(MODULE_KEY, module);
                meta.insert_field(QUALNAME_KEY, qualname);
                map.insert(class_key(), Value::Map(meta));
            }
        }
        _ => (),
    }
}

/// XML encoding or decoding error.
#[derive(Debug)]
pub enum Error {
    /// `quick-xml` failed to read or write.
    Syntax(quick_xml::Error),
    /// The text ended with elements still open.
    UnexpectedEof,
    /// The document does not have exactly one root key.
    RootCount(usize),
    /// An object was left unconverted by the encoder.
    Unserializable {
        /// The Rust type name.
        type_name: &'static str,
    },
    /// An attribute or text key holds a sequence or map.
    NotALeaf(String),
    /// The encoder failed.
    Encode(EncodeError),
    /// The decoder failed.
    Decode(DecodeError),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::UnexpectedEof(_) => Error::UnexpectedEof,
            e => Error::Syntax(e),
        }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Syntax(quick_xml::Error::from(err))
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
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(e) => write!(f, "{}", e),
            Error::UnexpectedEof => write!(f, "unexpected end of XML, an element is unclosed"),
            Error::RootCount(n) => {
                write!(f, "an XML document needs exactly one root, found {}", n)
            }
            Error::Unserializable { type_name } => {
                write!(f, "cannot serialize object of type `{}` to XML", type_name)
            }
            Error::NotALeaf(key) => {
                write!(f, "'{}' must hold a primitive to be written as text", key)
            }
            Error::Encode(e) => write!(f, "encoding failed: {}", e),
            Error::Decode(e) => write!(f, "decoding failed: {}", e),
        }
    }
}
