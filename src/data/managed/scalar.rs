//! Scalars: booleans, integers, floats, strings, bytes and bytearrays.
//!
//! The scalar kinds are checked in the order listed above, the kind of a scalar is the first
//! kind that matches. Booleans are also integers and integers are accepted as floats, so
//! [`Scalar::is_int`] returns `true` for `True` and [`Scalar::is_float`] for `1`.

use std::{fmt, ptr::NonNull};

use pyo3_ffi as ffi;

use super::{handle::Handle, Managed};
use crate::{
    catch::take_exception_or,
    convert::into_python::IntoPython,
    data::types::typecheck::{self as check, impl_python_typecheck},
    error::{PyrsError, PyrsResult, TypeError},
};

/// The kind of a [`Scalar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    ByteArray,
}

impl ScalarKind {
    pub(crate) unsafe fn of(ptr: *mut ffi::PyObject) -> Option<Self> {
        if check::is_bool(ptr) {
            Some(ScalarKind::Bool)
        } else if check::is_int(ptr) {
            Some(ScalarKind::Int)
        } else if check::is_float(ptr) {
            Some(ScalarKind::Float)
        } else if check::is_str(ptr) {
            Some(ScalarKind::Str)
        } else if check::is_bytes(ptr) {
            Some(ScalarKind::Bytes)
        } else if check::is_bytearray(ptr) {
            Some(ScalarKind::ByteArray)
        } else {
            None
        }
    }

    /// Returns the name of the Python type of this kind.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Str => "str",
            ScalarKind::Bytes => "bytes",
            ScalarKind::ByteArray => "bytearray",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A boolean, integer, float, string, bytes or bytearray object.
#[derive(Clone)]
pub struct Scalar(Handle);

impl_view!(Scalar);
impl_python_typecheck!(Scalar, "Scalar", check::is_scalar);

impl Scalar {
    /// Convert a Rust value to a new scalar.
    pub fn new<T: IntoPython>(value: T) -> PyrsResult<Self> {
        value.into_python()?.cast()
    }

    /// Returns `True`.
    pub fn true_value() -> Self {
        Scalar::from_bool(true)
    }

    /// Returns `False`.
    pub fn false_value() -> Self {
        Scalar::from_bool(false)
    }

    /// Returns `True` or `False`.
    pub fn from_bool(value: bool) -> Self {
        unsafe {
            let b = if value { ffi::Py_True() } else { ffi::Py_False() };
            ffi::Py_INCREF(b);
            Scalar(Handle::wrap_non_null(NonNull::new_unchecked(b)))
        }
    }

    /// Create a new `int`.
    pub fn from_int(value: i64) -> PyrsResult<Self> {
        Ok(Scalar(value.into_python()?))
    }

    /// Create a new `float`.
    pub fn from_float(value: f64) -> PyrsResult<Self> {
        Ok(Scalar(value.into_python()?))
    }

    /// Create a new `str`.
    pub fn from_str(value: &str) -> PyrsResult<Self> {
        Ok(Scalar(value.into_python()?))
    }

    /// Create a new `bytes` object.
    pub fn from_bytes(value: &[u8]) -> PyrsResult<Self> {
        Ok(Scalar(value.into_python()?))
    }

    /// Create a new `bytearray`.
    pub fn from_bytearray(value: &[u8]) -> PyrsResult<Self> {
        unsafe {
            let obj = ffi::PyByteArray_FromStringAndSize(
                value.as_ptr().cast(),
                value.len() as ffi::Py_ssize_t,
            );
            Ok(Scalar(Handle::from_owned(obj)?))
        }
    }

    /// Returns the kind of this scalar.
    pub fn kind(&self) -> ScalarKind {
        // A `Scalar` only exists if its typecheck succeeded, which matches exactly the types
        // that `ScalarKind::of` recognizes.
        match unsafe { ScalarKind::of(self.0.as_ptr()) } {
            Some(kind) => kind,
            None => {
                debug_assert!(false, "scalar of unrecognized kind");
                ScalarKind::ByteArray
            }
        }
    }

    /// Returns `true` if this scalar is `True`.
    pub fn is_true(&self) -> bool {
        unsafe { self.0.as_ptr() == ffi::Py_True() }
    }

    /// Returns `true` if this scalar is `False`.
    pub fn is_false(&self) -> bool {
        unsafe { self.0.as_ptr() == ffi::Py_False() }
    }

    pub fn is_bool(&self) -> bool {
        unsafe { check::is_bool(self.0.as_ptr()) }
    }

    /// Returns `true` for integers and booleans.
    pub fn is_int(&self) -> bool {
        unsafe { check::is_int(self.0.as_ptr()) }
    }

    /// Returns `true` for floats, integers and booleans.
    pub fn is_float(&self) -> bool {
        unsafe { check::is_float(self.0.as_ptr()) }
    }

    pub fn is_str(&self) -> bool {
        unsafe { check::is_str(self.0.as_ptr()) }
    }

    pub fn is_bytes(&self) -> bool {
        unsafe { check::is_bytes(self.0.as_ptr()) }
    }

    pub fn is_bytearray(&self) -> bool {
        unsafe { check::is_bytearray(self.0.as_ptr()) }
    }

    pub fn to_bool(&self) -> PyrsResult<bool> {
        self.0.unbox::<bool>()
    }

    pub fn to_int(&self) -> PyrsResult<i64> {
        self.0.unbox::<i64>()
    }

    /// Converts floats, integers and booleans to `f64`.
    pub fn to_float(&self) -> PyrsResult<f64> {
        self.0.unbox::<f64>()
    }

    /// Copies the content of a `str`.
    pub fn to_string_value(&self) -> PyrsResult<String> {
        self.0.unbox::<String>()
    }

    /// Copies the content of a `bytes` object.
    pub fn to_bytes(&self) -> PyrsResult<Vec<u8>> {
        self.expect_kind(ScalarKind::Bytes)?;

        unsafe {
            let data = ffi::PyBytes_AsString(self.0.as_ptr());
            let len = ffi::PyBytes_Size(self.0.as_ptr());
            copy_bytes(data, len)
        }
    }

    /// Copies the content of a `bytearray`.
    pub fn to_bytearray(&self) -> PyrsResult<Vec<u8>> {
        self.expect_kind(ScalarKind::ByteArray)?;

        unsafe {
            let data = ffi::PyByteArray_AsString(self.0.as_ptr());
            let len = ffi::PyByteArray_Size(self.0.as_ptr());
            copy_bytes(data, len)
        }
    }

    fn expect_kind(&self, kind: ScalarKind) -> PyrsResult<()> {
        if self.kind() != kind {
            Err(TypeError::TypeMismatch {
                expected: kind.name().into(),
                found: self.type_name(),
            })?
        }

        Ok(())
    }
}

unsafe fn copy_bytes(data: *mut std::os::raw::c_char, len: ffi::Py_ssize_t) -> PyrsResult<Vec<u8>> {
    if data.is_null() || len < 0 {
        Err(PyrsError::Exception(take_exception_or("failed to access bytes")))?
    }

    Ok(std::slice::from_raw_parts(data.cast::<u8>(), len as usize).to_vec())
}
