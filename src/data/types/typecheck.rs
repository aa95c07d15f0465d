//! Trait for checking the shape of Python objects.
//!
//! The shape of an object can be checked with [`Handle::is`], this method must be used in
//! combination with a type that implements the [`Typecheck`] trait. Most types that implement
//! this trait also implement [`Managed`] or [`Unbox`], for these types the typecheck indicates
//! whether or not it's valid to cast the handle to or unbox it as that type.
//!
//! Some checks overlap: every `bool` is also an `int`, and every `int` is accepted wherever a
//! `float` is expected. Checking for `f64` therefore succeeds for booleans and integers too.
//!
//! [`Handle::is`]: crate::data::managed::handle::Handle::is
//! [`Managed`]: crate::data::managed::Managed
//! [`Unbox`]: crate::convert::unbox::Unbox

use pyo3_ffi as ffi;

use crate::data::managed::handle::Handle;

/// This trait is used in combination with [`Handle::is`] to check if an object has some shape.
///
/// Safety: If this trait is implemented for some type which also implements `Unbox`, the trait
/// method `typecheck` must only return `true` if it's guaranteed that `Unbox::unbox` can safely
/// be called for that object.
///
/// [`Handle::is`]: crate::data::managed::handle::Handle::is
pub unsafe trait Typecheck {
    /// The name of the shape, used in error messages.
    const NAME: &'static str;

    /// Returns whether the object has the shape implied by `Self`.
    fn typecheck(handle: &Handle) -> bool;
}

macro_rules! impl_python_typecheck {
    ($type:ty, $name:expr, $check:expr) => {
        unsafe impl $crate::data::types::typecheck::Typecheck for $type {
            const NAME: &'static str = $name;

            #[inline]
            fn typecheck(handle: &$crate::data::managed::handle::Handle) -> bool {
                unsafe { $check(handle.as_ptr()) }
            }
        }
    };
}

pub(crate) use impl_python_typecheck;

pub(crate) unsafe fn is_bool(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyBool_Check(ptr) != 0
}

pub(crate) unsafe fn is_int(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyLong_Check(ptr) != 0
}

pub(crate) unsafe fn is_float(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyFloat_Check(ptr) != 0 || is_int(ptr)
}

pub(crate) unsafe fn is_str(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyUnicode_Check(ptr) != 0
}

pub(crate) unsafe fn is_bytes(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyBytes_Check(ptr) != 0
}

pub(crate) unsafe fn is_bytearray(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyByteArray_Check(ptr) != 0
}

pub(crate) unsafe fn is_scalar(ptr: *mut ffi::PyObject) -> bool {
    is_float(ptr) || is_str(ptr) || is_bytes(ptr) || is_bytearray(ptr)
}

pub(crate) unsafe fn is_tuple(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyTuple_Check(ptr) != 0
}

pub(crate) unsafe fn is_list(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyList_Check(ptr) != 0
}

pub(crate) unsafe fn is_dict(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyDict_Check(ptr) != 0
}

pub(crate) unsafe fn is_buffer(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyObject_CheckBuffer(ptr) != 0
}

pub(crate) unsafe fn is_callable(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyCallable_Check(ptr) != 0
}

pub(crate) unsafe fn is_module(ptr: *mut ffi::PyObject) -> bool {
    ffi::PyModule_Check(ptr) != 0
}

impl_python_typecheck!(bool, "bool", is_bool);
impl_python_typecheck!(i64, "int", is_int);
impl_python_typecheck!(i32, "int", is_int);
impl_python_typecheck!(f64, "float", is_float);
impl_python_typecheck!(String, "str", is_str);
