//! Dict keys.
//!
//! Methods of [`Dict`] that take a key accept anything that implements [`ToKey`]. Strings and
//! integers are converted to new Python objects, managed types are used as is. Keys are always
//! compared by Python's own equality and hash.
//!
//! [`Dict`]: crate::data::managed::dict::Dict

use crate::{convert::into_python::IntoPython, data::managed::handle::Handle, error::PyrsResult};

/// Trait implemented by types that can be used as a key of a `Dict`.
pub trait ToKey {
    /// Convert `self` to a Python object.
    fn to_key(&self) -> PyrsResult<Handle>;
}

impl ToKey for str {
    #[inline]
    fn to_key(&self) -> PyrsResult<Handle> {
        self.into_python()
    }
}

impl ToKey for String {
    #[inline]
    fn to_key(&self) -> PyrsResult<Handle> {
        self.as_str().into_python()
    }
}

impl ToKey for i64 {
    #[inline]
    fn to_key(&self) -> PyrsResult<Handle> {
        (*self).into_python()
    }
}

macro_rules! impl_to_key_managed {
    ($type:ty) => {
        impl $crate::convert::to_key::ToKey for $type {
            #[inline]
            fn to_key(&self) -> $crate::error::PyrsResult<$crate::data::managed::handle::Handle> {
                Ok($crate::data::managed::Managed::as_handle(self).clone())
            }
        }
    };
}

pub(crate) use impl_to_key_managed;

impl_to_key_managed!(Handle);
