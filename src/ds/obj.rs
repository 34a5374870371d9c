use std::any::{Any, TypeId};
use std::fmt;

/// A dynamically typed object that can live in a [`Value`](crate::Value) tree.
///
/// `Object` is implemented for every `'static` type that is `Clone + PartialEq + Debug`, so it
/// never needs implementing by hand. It provides the type erasure the engine needs: the exact
/// runtime type (for hook and registry dispatch), downcasting, cloning, and equality.
pub trait Object: Any + fmt::Debug {
    /// Upcast to [`Any`].
    fn as_any(&self) -> &dyn Any;
    /// Upcast to mutable [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Upcast a box to [`Any`].
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    /// Clone into a new box.
    fn clone_object(&self) -> Box<dyn Object>;
    /// Equality against another object. Objects of different types are never equal.
    fn eq_object(&self, other: &dyn Object) -> bool;
    /// The Rust type name, as given by [`std::any::type_name`].
    fn type_name(&self) -> &'static str;
}

impl<T> Object for T
where
    T: Any + Clone + PartialEq + fmt::Debug,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn eq_object(&self, other: &dyn Object) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// An owned, type-erased [`Object`].
///
/// # Example
/// ```rust
/// # use objser::*;
/// #[derive(Debug, Clone, PartialEq)]
/// struct Marker(u8);
///
/// let obj = Obj::new(Marker(3));
/// assert!(obj.is::<Marker>());
/// assert_eq!(obj.downcast_ref::<Marker>(), Some(&Marker(3)));
/// assert_eq!(obj.downcast::<u8>().is_err(), true);
/// ```
pub struct Obj(Box<dyn Object>);

impl Obj {
    /// Erase `object` into an `Obj`.
    pub fn new<T: Object>(object: T) -> Self {
        Obj(Box::new(object))
    }

    /// Wrap an already boxed object.
    pub fn from_boxed(object: Box<dyn Object>) -> Self {
        Obj(object)
    }

    /// The exact runtime type of the object.
    pub fn type_id(&self) -> TypeId {
        Any::type_id(self.as_object().as_any())
    }

    /// The Rust type name of the object.
    pub fn type_name(&self) -> &'static str {
        self.as_object().type_name()
    }

    /// The object is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.as_object().as_any().is::<T>()
    }

    /// Borrow the object as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object().as_any().downcast_ref()
    }

    /// Mutably borrow the object as `T`.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_object_mut().as_any_mut().downcast_mut()
    }

    /// Take the object out as `T`, or return `self` if it is another type.
    pub fn downcast<T: Any>(self) -> Result<T, Obj> {
        if self.is::<T>() {
            match self.0.into_any().downcast::<T>() {
                Ok(t) => Ok(*t),
                Err(_) => unreachable!("type was checked"),
            }
        } else {
            Err(self)
        }
    }

    /// The erased object.
    pub fn as_object(&self) -> &dyn Object {
        &*self.0
    }

    /// The erased object, mutably.
    pub fn as_object_mut(&mut self) -> &mut dyn Object {
        &mut *self.0
    }
}

impl Clone for Obj {
    fn clone(&self) -> Self {
        Obj(self.as_object().clone_object())
    }
}

impl PartialEq for Obj {
    fn eq(&self, other: &Obj) -> bool {
        self.as_object().eq_object(other.as_object())
    }
}

impl fmt::Debug for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_object(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Gain(f64);

    #[derive(Debug, Clone, PartialEq)]
    struct Offset(f64);

    #[test]
    fn exact_type_identity() {
        let obj = Obj::new(Gain(1.5));
        assert_eq!(obj.type_id(), TypeId::of::<Gain>());
        assert_ne!(obj.type_id(), TypeId::of::<Obj>());
        assert!(obj.type_name().ends_with("Gain"));
    }

    #[test]
    fn equality_is_typed() {
        assert_eq!(Obj::new(Gain(1.0)), Obj::new(Gain(1.0)));
        assert_ne!(Obj::new(Gain(1.0)), Obj::new(Gain(2.0)));
        assert_ne!(Obj::new(Gain(1.0)), Obj::new(Offset(1.0)));
    }

    #[test]
    fn clone_is_deep() {
        let mut a = Obj::new(Gain(1.0));
        let b = a.clone();
        if let Some(g) = a.downcast_mut::<Gain>() {
            g.0 = 4.0;
        }
        assert_eq!(b.downcast_ref::<Gain>(), Some(&Gain(1.0)));
        assert_eq!(a.downcast::<Gain>().ok(), Some(Gain(4.0)));
    }
}
