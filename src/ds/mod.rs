//! The value tree: [`Value`], its map [`Key`]s, [`Number`]s, and type-erased [`Obj`]ects.
mod key;
mod map;
mod num;
mod obj;
mod val;

pub use self::key::Key;
pub use self::map::MapExt;
pub use self::num::{IntoIntError, Number, ParseNumberError};
pub use self::obj::{Obj, Object};
pub use self::val::Value;

pub(crate) use self::val::parse_bool;
