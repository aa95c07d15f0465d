//! Convert Python objects to Rust data.
//!
//! Objects are unboxed with [`Handle::unbox`], which checks the shape of the object before it
//! calls [`Unbox::unbox`]. Integers are unboxed as `f64` if requested, but floats can't be
//! unboxed as integers.
//!
//! [`Handle::unbox`]: crate::data::managed::handle::Handle::unbox

use pyo3_ffi as ffi;

use crate::{
    catch::take_exception_or,
    data::managed::handle::Handle,
    error::{PyrsError, PyrsResult},
};

/// Trait implemented by types that Python objects can be unboxed to.
///
/// Safety: `unbox` must only be called for objects whose shape has been checked with the
/// `Typecheck` implementation of `Self`.
pub unsafe trait Unbox {
    /// The type of the unboxed data.
    type Output;

    /// Unbox the object.
    ///
    /// Safety: the shape of the object must have been checked, the current thread must hold the
    /// interpreter lock.
    unsafe fn unbox(handle: &Handle) -> PyrsResult<Self::Output>;
}

unsafe impl Unbox for bool {
    type Output = bool;

    #[inline]
    unsafe fn unbox(handle: &Handle) -> PyrsResult<bool> {
        Ok(handle.as_ptr() == ffi::Py_True())
    }
}

unsafe impl Unbox for i64 {
    type Output = i64;

    unsafe fn unbox(handle: &Handle) -> PyrsResult<i64> {
        let value = ffi::PyLong_AsLongLong(handle.as_ptr());
        if value == -1 && !ffi::PyErr_Occurred().is_null() {
            Err(PyrsError::Exception(take_exception_or("integer overflow")))?
        }

        Ok(value as i64)
    }
}

unsafe impl Unbox for i32 {
    type Output = i32;

    unsafe fn unbox(handle: &Handle) -> PyrsResult<i32> {
        let value = i64::unbox(handle)?;
        i32::try_from(value).map_err(|e| PyrsError::other(e).into())
    }
}

unsafe impl Unbox for f64 {
    type Output = f64;

    unsafe fn unbox(handle: &Handle) -> PyrsResult<f64> {
        let value = ffi::PyFloat_AsDouble(handle.as_ptr());
        if value == -1.0 && !ffi::PyErr_Occurred().is_null() {
            Err(PyrsError::Exception(take_exception_or("float conversion failed")))?
        }

        Ok(value)
    }
}

unsafe impl Unbox for String {
    type Output = String;

    #[inline]
    unsafe fn unbox(handle: &Handle) -> PyrsResult<String> {
        handle.to_utf8()
    }
}
