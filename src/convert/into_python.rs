//! Convert Rust data to Python objects.
//!
//! The [`IntoPython`] trait is implemented for primitive types, strings, byte slices and all
//! managed types. Converting a managed type returns its handle without creating a new object.

use pyo3_ffi as ffi;

use crate::{
    data::managed::{handle::Handle, scalar::Scalar, Managed},
    error::PyrsResult,
};

/// Trait implemented by types that can be converted to a Python object.
///
/// Converting data requires that the current thread holds the interpreter lock.
pub trait IntoPython {
    /// Convert `self` to a Python object.
    fn into_python(self) -> PyrsResult<Handle>;
}

macro_rules! impl_into_python {
    ($($type:ty),+ => $ctor:ident as $as:ty) => {
        $(
            impl IntoPython for $type {
                #[inline]
                fn into_python(self) -> PyrsResult<Handle> {
                    unsafe { Handle::from_owned(ffi::$ctor(self as $as)) }
                }
            }
        )+
    };
}

impl_into_python!(i8, i16, i32, i64, isize => PyLong_FromLongLong as std::os::raw::c_longlong);
impl_into_python!(u8, u16, u32, u64, usize => PyLong_FromUnsignedLongLong as std::os::raw::c_ulonglong);
impl_into_python!(f32, f64 => PyFloat_FromDouble as f64);

impl IntoPython for bool {
    #[inline]
    fn into_python(self) -> PyrsResult<Handle> {
        Ok(Scalar::from_bool(self).into_handle())
    }
}

impl IntoPython for () {
    #[inline]
    fn into_python(self) -> PyrsResult<Handle> {
        Ok(Handle::none())
    }
}

impl IntoPython for &str {
    #[inline]
    fn into_python(self) -> PyrsResult<Handle> {
        Handle::new_str(self)
    }
}

impl IntoPython for String {
    #[inline]
    fn into_python(self) -> PyrsResult<Handle> {
        Handle::new_str(&self)
    }
}

impl IntoPython for &String {
    #[inline]
    fn into_python(self) -> PyrsResult<Handle> {
        Handle::new_str(self)
    }
}

impl IntoPython for std::borrow::Cow<'_, str> {
    #[inline]
    fn into_python(self) -> PyrsResult<Handle> {
        Handle::new_str(&self)
    }
}

/// Converted to `bytes`.
impl IntoPython for &[u8] {
    fn into_python(self) -> PyrsResult<Handle> {
        unsafe {
            Handle::from_owned(ffi::PyBytes_FromStringAndSize(
                self.as_ptr().cast(),
                self.len() as ffi::Py_ssize_t,
            ))
        }
    }
}

/// Converted to `bytes`.
impl IntoPython for Vec<u8> {
    #[inline]
    fn into_python(self) -> PyrsResult<Handle> {
        self.as_slice().into_python()
    }
}

/// `None` is converted to Python's `None`.
impl<T: IntoPython> IntoPython for Option<T> {
    #[inline]
    fn into_python(self) -> PyrsResult<Handle> {
        match self {
            Some(value) => value.into_python(),
            None => Ok(Handle::none()),
        }
    }
}

macro_rules! impl_into_python_managed {
    ($type:ty) => {
        impl $crate::convert::into_python::IntoPython for $type {
            #[inline]
            fn into_python(self) -> $crate::error::PyrsResult<$crate::data::managed::handle::Handle> {
                Ok($crate::data::managed::Managed::into_handle(self))
            }
        }

        impl $crate::convert::into_python::IntoPython for &$type {
            #[inline]
            fn into_python(self) -> $crate::error::PyrsResult<$crate::data::managed::handle::Handle> {
                Ok($crate::data::managed::Managed::as_handle(self).clone())
            }
        }
    };
}

pub(crate) use impl_into_python_managed;

impl_into_python_managed!(Handle);
