//! The shape of an arbitrary Python object.
//!
//! Python objects don't carry a host-side type tag. The shape of an object is derived on demand
//! by checking a fixed sequence of predicates: scalars first, followed by tuples, lists, dicts,
//! objects that export a buffer and, finally, callables. An object can satisfy more than one of
//! these predicates, e.g. `bytes` are scalars that also export a buffer; the first match is its
//! primary shape. Nothing is cached, the shape is derived again whenever it's requested.

use std::fmt;

use super::{
    buffer::Buffer,
    callable::Callable,
    dict::Dict,
    handle::Handle,
    list::List,
    scalar::{Scalar, ScalarKind},
    tuple::Tuple,
    Managed,
};
use crate::{data::types::typecheck as check, error::PyrsResult};

/// The primary shape of a Python object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar(ScalarKind),
    Tuple,
    List,
    Dict,
    Buffer,
    Callable,
}

impl Shape {
    pub(crate) fn of(handle: &Handle) -> Option<Self> {
        let ptr = handle.as_ptr();

        unsafe {
            if let Some(kind) = ScalarKind::of(ptr) {
                Some(Shape::Scalar(kind))
            } else if check::is_tuple(ptr) {
                Some(Shape::Tuple)
            } else if check::is_list(ptr) {
                Some(Shape::List)
            } else if check::is_dict(ptr) {
                Some(Shape::Dict)
            } else if check::is_buffer(ptr) {
                Some(Shape::Buffer)
            } else if check::is_callable(ptr) {
                Some(Shape::Callable)
            } else {
                None
            }
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar(kind) => write!(f, "Scalar({})", kind),
            Shape::Tuple => f.write_str("Tuple"),
            Shape::List => f.write_str("List"),
            Shape::Dict => f.write_str("Dict"),
            Shape::Buffer => f.write_str("Buffer"),
            Shape::Callable => f.write_str("Callable"),
        }
    }
}

/// A handle downcast to the view of its primary shape.
#[derive(Clone, Debug)]
pub enum Variant {
    Scalar(Scalar),
    Tuple(Tuple),
    List(List),
    Dict(Dict),
    Buffer(Buffer),
    Callable(Callable),
    /// The object has none of the known shapes, e.g. `None` or a module.
    Opaque(Handle),
}

impl Variant {
    pub(crate) fn resolve(handle: &Handle) -> PyrsResult<Self> {
        let variant = match Shape::of(handle) {
            Some(Shape::Scalar(_)) => Variant::Scalar(handle.cast()?),
            Some(Shape::Tuple) => Variant::Tuple(handle.cast()?),
            Some(Shape::List) => Variant::List(handle.cast()?),
            Some(Shape::Dict) => Variant::Dict(handle.cast()?),
            Some(Shape::Buffer) => Variant::Buffer(handle.cast()?),
            Some(Shape::Callable) => Variant::Callable(handle.cast()?),
            None => Variant::Opaque(handle.clone()),
        };

        Ok(variant)
    }

    /// Returns the shape of this variant, `None` for opaque objects.
    pub fn shape(&self) -> Option<Shape> {
        match self {
            Variant::Scalar(s) => Some(Shape::Scalar(s.kind())),
            Variant::Tuple(_) => Some(Shape::Tuple),
            Variant::List(_) => Some(Shape::List),
            Variant::Dict(_) => Some(Shape::Dict),
            Variant::Buffer(_) => Some(Shape::Buffer),
            Variant::Callable(_) => Some(Shape::Callable),
            Variant::Opaque(_) => None,
        }
    }

    /// Returns the handle of the wrapped object.
    pub fn as_handle(&self) -> &Handle {
        match self {
            Variant::Scalar(s) => s.as_handle(),
            Variant::Tuple(t) => t.as_handle(),
            Variant::List(l) => l.as_handle(),
            Variant::Dict(d) => d.as_handle(),
            Variant::Buffer(b) => b.as_handle(),
            Variant::Callable(c) => c.as_handle(),
            Variant::Opaque(h) => h,
        }
    }

    /// Convert this variant back to a handle.
    pub fn into_handle(self) -> Handle {
        match self {
            Variant::Scalar(s) => s.into_handle(),
            Variant::Tuple(t) => t.into_handle(),
            Variant::List(l) => l.into_handle(),
            Variant::Dict(d) => d.into_handle(),
            Variant::Buffer(b) => b.into_handle(),
            Variant::Callable(c) => c.into_handle(),
            Variant::Opaque(h) => h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_display_their_kind() {
        assert_eq!(Shape::Scalar(ScalarKind::Int).to_string(), "Scalar(int)");
        assert_eq!(Shape::Buffer.to_string(), "Buffer");
        assert_ne!(Shape::Scalar(ScalarKind::Bool), Shape::Scalar(ScalarKind::Int));
    }
}
