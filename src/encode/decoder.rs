use super::*;
use crate::bridge::DeError;
use crate::class::class_key;
use crate::registry::DeserializeFn;
use std::{error, fmt};

/// Rebuilds objects from the class-stamped maps in a document.
///
/// Decoding works bottom-up: by the time an object's deserializer sees its map, any objects
/// nested inside are already rebuilt. A map without the reserved [`CLASS_KEY`] stays a map.
///
/// An object is rebuilt with, in order of preference:
/// 1. a deserialize hook for its type, applied to a default instance;
/// 2. the type's [`Deserializable`] implementation, applied to a default instance;
/// 3. the type's [`FromMap`] factory.
///
/// See the [module documentation](crate::encode) for an example.
pub struct Decoder<'r> {
    registry: &'r Registry,
    hooks: &'r Hooks,
}

impl<'r> Decoder<'r> {
    /// A decoder over `registry` and `hooks`.
    pub fn new(registry: &'r Registry, hooks: &'r Hooks) -> Self {
        Self { registry, hooks }
    }

    /// Decode a copy of `value`, leaving the input untouched.
    pub fn decode(&self, value: &Value) -> Result<Value, DecodeError> {
        match value {
            Value::Seq(seq) => seq
                .iter()
                .map(|v| self.decode(v))
                .collect::<Result<_, _>>()
                .map(Value::Seq),
            Value::Map(map) => {
                let map = map
                    .iter()
                    .map(|(k, v)| self.decode(v).map(|v| (k.clone(), v)))
                    .collect::<Result<_, _>>()?;
                self.decode_map(map)
            }
            x => Ok(x.clone()),
        }
    }

    /// Decode `value` in place.
    ///
    /// On failure `value` is left partially decoded.
    pub fn decode_in_place(&self, value: &mut Value) -> Result<(), DecodeError> {
        match value {
            Value::Seq(seq) => {
                for v in seq {
                    self.decode_in_place(v)?;
                }
            }
            Value::Map(map) => {
                for v in map.values_mut() {
                    self.decode_in_place(v)?;
                }

                if map.contains_key(&class_key()) {
                    let map = std::mem::take(map);
                    *value = self.decode_map(map)?;
                }
            }
            _ => (),
        }

        Ok(())
    }

    /// Rebuild the object a single map describes. The map's values must already be decoded.
    ///
    /// A map without the reserved key is handed back as [`Value::Map`].
    pub fn decode_map(&self, mut map: Map) -> Result<Value, DecodeError> {
        let meta = match map.shift_remove(&class_key()) {
            Some(meta) => meta,
            None => return Ok(Value::Map(map)),
        };

        let class = ClassMeta::from_value(&meta)
            .ok_or_else(|| DecodeError::MalformedMetadata(format!("{:?}", meta)))?;

        let (type_id, entry) = self.registry.resolve(&class)?;

        log::trace!("reconstructing '{}' as `{}`", class, entry.type_name);

        let obj = match (self.hooks.deserializer(type_id), entry.deserialize) {
            (Some(hook), _) => {
                let mut obj = entry.construct()?;
                hook(&mut *obj, &map)?;
                obj
            }
            (None, Some(DeserializeFn::InPlace(deserialize))) => {
                let mut obj = entry.construct()?;
                deserialize(&mut *obj, &map)?;
                obj
            }
            (None, Some(DeserializeFn::Factory(from_map))) => from_map(&map)?,
            (None, None) => return Err(DecodeError::NotDeserializable(class)),
        };

        Ok(Value::Obj(Obj::from_boxed(obj)))
    }
}

/// Decoding error.
#[derive(Debug, PartialEq, Clone)]
pub enum DecodeError {
    /// No registered class lives in the module.
    ModuleNotFound(String),
    /// The module is known, but has no class by this name.
    ClassNotFound(ClassMeta),
    /// The class has a deserialize hook or method that needs a default instance, but the type was
    /// not registered as constructible.
    NotConstructible(ClassMeta),
    /// The class has no deserialize hook, method, or factory.
    NotDeserializable(ClassMeta),
    /// The reserved key does not hold a `module`/`qualified_name` map.
    MalformedMetadata(String),
    /// A required field is absent.
    MissingField(String),
    /// A field holds the wrong kind of value.
    InvalidField {
        /// The field name.
        field: String,
        /// What was expected.
        expected: String,
    },
    /// Any other failure.
    Message(String),
}

impl DecodeError {
    /// A field holds the wrong kind of value.
    pub fn invalid_field(field: &str, expected: &str) -> Self {
        DecodeError::InvalidField {
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }

    /// A free-form failure.
    pub fn msg<T: fmt::Display>(msg: T) -> Self {
        DecodeError::Message(msg.to_string())
    }
}

impl From<DeError> for DecodeError {
    fn from(err: DeError) -> Self {
        match err {
            DeError::Message(s) => DecodeError::Message(s),
        }
    }
}

impl error::Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::ModuleNotFound(m) => write!(f, "no module named '{}'", m),
            DecodeError::ClassNotFound(c) => {
                write!(
                    f,
                    "module '{}' has no class '{}'",
                    c.module(),
                    c.qualified_name()
                )
            }
            DecodeError::NotConstructible(c) => {
                write!(f, "'{}' has no default constructor", c)
            }
            DecodeError::NotDeserializable(c) => {
                write!(f, "'{}' has no deserialize hook or method", c)
            }
            DecodeError::MalformedMetadata(s) => {
                write!(f, "malformed class metadata: {}", s)
            }
            DecodeError::MissingField(name) => write!(f, "missing field '{}'", name),
            DecodeError::InvalidField { field, expected } => {
                write!(f, "field '{}' should be {}", field, expected)
            }
            DecodeError::Message(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Marker {
        at: f64,
    }

    impl Deserializable for Marker {
        fn deserialize(&mut self, map: &Map) -> Result<(), DecodeError> {
            self.at = map.req_f64("at")?;
            Ok(())
        }
    }

    impl FromMap for Marker {
        fn from_map(map: &Map) -> Result<Self, DecodeError> {
            Ok(Marker {
                at: -map.req_f64("at")?,
            })
        }
    }

    fn stamped(class: &ClassMeta, at: f64) -> Map {
        let mut map = Map::new();
        map.insert_field("at", at);
        map.insert_field(CLASS_KEY, class.to_map());
        map
    }

    #[test]
    fn plain_maps_pass_through() {
        let registry = Registry::new();
        let hooks = Hooks::new();
        let mut map = Map::new();
        map.insert_field("at", 1.0);

        let decoded = Decoder::new(&registry, &hooks).decode_map(map.clone());
        assert_eq!(decoded, Ok(Value::Map(map)));
    }

    #[test]
    fn instance_method_before_factory() {
        let class = ClassMeta::of::<Marker>();
        let hooks = Hooks::new();

        let mut registry = Registry::new();
        registry.insert(Registration::<Marker>::new().from_map());
        let v = Decoder::new(&registry, &hooks).decode_map(stamped(&class, 2.0));
        assert_eq!(v.unwrap().downcast_ref::<Marker>(), Some(&Marker { at: -2.0 }));

        registry.insert(Registration::<Marker>::new().deserializable());
        let v = Decoder::new(&registry, &hooks).decode_map(stamped(&class, 2.0));
        assert_eq!(v.unwrap().downcast_ref::<Marker>(), Some(&Marker { at: 2.0 }));
    }

    #[test]
    fn failures_are_named() {
        let class = ClassMeta::of::<Marker>();
        let hooks = Hooks::new();
        let mut registry = Registry::new();

        let dec = |registry: &Registry, map| Decoder::new(registry, &hooks).decode_map(map);

        assert_eq!(
            dec(&registry, stamped(&class, 1.0)),
            Err(DecodeError::ModuleNotFound(class.module().to_string()))
        );

        registry.insert(Registration::<Marker>::new().default_constructible());
        assert_eq!(
            dec(&registry, stamped(&class, 1.0)),
            Err(DecodeError::NotDeserializable(class.clone()))
        );

        let mut bad = Map::new();
        bad.insert_field(CLASS_KEY, "Marker");
        assert!(matches!(
            dec(&registry, bad),
            Err(DecodeError::MalformedMetadata(_))
        ));
    }

    #[test]
    fn hook_needs_constructor() {
        let class = ClassMeta::of::<Marker>();
        let hooks = Hooks::new().on_deserialize(|m: &mut Marker, _: &Map| {
            m.at = 9.0;
            Ok(())
        });
        let mut registry = Registry::new();
        registry.insert(Registration::<Marker>::new().from_map());

        let dec = Decoder::new(&registry, &hooks);
        assert_eq!(
            dec.decode_map(stamped(&class, 1.0)),
            Err(DecodeError::NotConstructible(class.clone()))
        );

        registry.insert(Registration::<Marker>::new().default_constructible());
        let dec = Decoder::new(&registry, &hooks);
        assert_eq!(
            dec.decode_map(stamped(&class, 1.0))
                .unwrap()
                .downcast::<Marker>()
                .ok(),
            Some(Marker { at: 9.0 })
        );
    }
}
