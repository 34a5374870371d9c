//! Toolkit-style geometry values, encoded entirely through [`Hooks`].
//!
//! Requires the _geometry_ feature.
//!
//! These types have no [`Serializable`] or [`Deserializable`] implementations, in the same way a
//! foreign GUI toolkit's types would not. [`hooks`] teaches the engine how to handle them and
//! [`register`] makes them resolvable.
//!
//! # Example
//! ```rust
//! # #[cfg(feature = "json")] {
//! # use objser::*;
//! use objser::geometry::{self, Point};
//!
//! let mut registry = Registry::new();
//! geometry::register(&mut registry);
//! let hooks = geometry::hooks();
//!
//! let codec = json::JsonCodec::new(&registry).with_hooks(&hooks);
//! let s = codec.to_string(&Value::new_obj(Point { x: 3, y: -4 })).unwrap();
//! assert_eq!(s, r#"{"x": 3, "y": -4, "__class__": {"module": "geometry", "qualified_name": "Point"}}"#);
//!
//! let back = codec.from_str(&s).unwrap();
//! assert_eq!(back.downcast_ref::<Point>(), Some(&Point { x: 3, y: -4 }));
//! # }
//! ```
use crate::*;
use std::convert::TryFrom;

/// The module every geometry class is registered under.
pub const MODULE: &str = "geometry";

/// An integer point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A floating point point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[allow(missing_docs)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

/// An integer size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// A floating point size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[allow(missing_docs)]
pub struct SizeF {
    pub width: f64,
    pub height: f64,
}

/// Hooks encoding points as `{x, y}` and sizes as `{width, height}`.
///
/// Decoding accepts numbers or numeric strings, so values read back from XML work.
pub fn hooks() -> Hooks {
    Hooks::new()
        .on_serialize(|p: &Point| pair("x", p.x, "y", p.y))
        .on_deserialize(|p: &mut Point, map: &Map| {
            p.x = req_i32(map, "x")?;
            p.y = req_i32(map, "y")?;
            Ok(())
        })
        .on_serialize(|p: &PointF| pair("x", p.x, "y", p.y))
        .on_deserialize(|p: &mut PointF, map: &Map| {
            p.x = map.req_f64("x")?;
            p.y = map.req_f64("y")?;
            Ok(())
        })
        .on_serialize(|s: &Size| pair("width", s.width, "height", s.height))
        .on_deserialize(|s: &mut Size, map: &Map| {
            s.width = req_i32(map, "width")?;
            s.height = req_i32(map, "height")?;
            Ok(())
        })
        .on_serialize(|s: &SizeF| pair("width", s.width, "height", s.height))
        .on_deserialize(|s: &mut SizeF, map: &Map| {
            s.width = map.req_f64("width")?;
            s.height = map.req_f64("height")?;
            Ok(())
        })
}

/// Register the geometry types as default constructible under [`MODULE`].
pub fn register(registry: &mut Registry) -> &mut Registry {
    registry
        .insert(Registration::<Point>::new().named(MODULE, "Point").default_constructible())
        .insert(Registration::<PointF>::new().named(MODULE, "PointF").default_constructible())
        .insert(Registration::<Size>::new().named(MODULE, "Size").default_constructible())
        .insert(Registration::<SizeF>::new().named(MODULE, "SizeF").default_constructible())
}

fn pair<V: Into<Value>>(a: &str, va: V, b: &str, vb: V) -> Map {
    let mut map = Map::new();
    map.insert_field(a, va);
    map.insert_field(b, vb);
    map
}

fn req_i32(map: &Map, name: &str) -> Result<i32, DecodeError> {
    let x = map.req_i64(name)?;
    i32::try_from(x).map_err(|_| DecodeError::invalid_field(name, "a 32-bit integer"))
}
