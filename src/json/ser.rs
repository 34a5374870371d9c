use super::*;
use serde::ser::{self, Error as _, SerializeMap, SerializeSeq};
use std::cell::RefCell;

/// Carries the encoder through a `serde_json` serialization and keeps the first structured error.
pub(super) struct EncodeCtx<'a> {
    pub(super) encoder: Encoder<'a>,
    pub(super) sort_keys: bool,
    pub(super) error: RefCell<Option<Error>>,
}

/// A [`Value`] walked by `serde`. Objects are converted as they are met.
pub(super) struct Encoded<'a> {
    pub(super) value: &'a Value,
    pub(super) ctx: &'a EncodeCtx<'a>,
}

impl Encoded<'_> {
    fn child<'b>(&'b self, value: &'b Value) -> Encoded<'b> {
        Encoded {
            value,
            ctx: self.ctx,
        }
    }
}

impl ser::Serialize for Encoded<'_> {
    fn serialize<S: ser::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => s.serialize_unit(),
            Value::Bool(b) => s.serialize_bool(*b),
            Value::Num(Number::Uint(n)) => match u64::try_from(*n) {
                Ok(n) => s.serialize_u64(n),
                Err(_) => s.serialize_u128(*n),
            },
            Value::Num(Number::Int(n)) => match i64::try_from(*n) {
                Ok(n) => s.serialize_i64(n),
                Err(_) => s.serialize_i128(*n),
            },
            Value::Num(Number::Float(n)) if !n.is_finite() => Err(S::Error::custom(format!(
                "out of range float value `{}` is not JSON compliant",
                n
            ))),
            Value::Num(Number::Float(n)) => s.serialize_f64(*n),
            Value::Str(v) => s.serialize_str(v),
            Value::Seq(seq) => {
                let mut state = s.serialize_seq(Some(seq.len()))?;
                for v in seq {
                    state.serialize_element(&self.child(v))?;
                }
                state.end()
            }
            Value::Map(map) => {
                let mut entries: Vec<(&Key, &Value)> = map.iter().collect();
                if self.ctx.sort_keys {
                    entries.sort_by(|a, b| a.0.cmp(b.0));
                }

                let mut state = s.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    // JSON only has string keys
                    match k {
                        Key::Str(k) => state.serialize_key(k)?,
                        k => state.serialize_key(&k.to_string())?,
                    }
                    state.serialize_value(&self.child(v))?;
                }
                state.end()
            }
            Value::Obj(obj) => match self.ctx.encoder.encode_object(obj) {
                Ok(Some(map)) => {
                    let value = Value::Map(map);
                    ser::Serialize::serialize(&self.child(&value), s)
                }
                Ok(None) => Err(S::Error::custom(format!(
                    "Object of type `{}` is not JSON serializable",
                    obj.type_name()
                ))),
                Err(e) => {
                    let msg = e.to_string();
                    self.ctx.error.borrow_mut().get_or_insert(Error::Encode(e));
                    Err(S::Error::custom(msg))
                }
            },
        }
    }
}
