//! Capture Python exceptions.
//!
//! Functions from the Python C API report failure through a return value, typically a null
//! pointer or `-1`, and leave an exception pending in the current thread state. Every call made
//! by pyrs checks that return value, if it indicates an error the pending exception is taken
//! with [`take_exception`] and converted to an [`Exception`]. Taking an exception clears the
//! error indicator, so no exception remains pending after a pyrs method has returned.

use std::{ffi::CStr, ptr::null_mut};

use pyo3_ffi as ffi;

use crate::error::{Exception, PyrsError, PyrsResult, CANNOT_DISPLAY_TYPE, CANNOT_DISPLAY_VALUE};

/// Take the pending exception and convert it to an [`Exception`].
///
/// Returns `None` if no exception is pending.
///
/// Safety: the current thread must hold the interpreter lock.
pub(crate) unsafe fn take_exception() -> Option<Exception> {
    if ffi::PyErr_Occurred().is_null() {
        return None;
    }

    let mut ty = null_mut();
    let mut value = null_mut();
    let mut traceback = null_mut();

    #[allow(deprecated)]
    {
        ffi::PyErr_Fetch(&mut ty, &mut value, &mut traceback);
        ffi::PyErr_NormalizeException(&mut ty, &mut value, &mut traceback);
    }

    let type_name = if ty.is_null() {
        String::from(CANNOT_DISPLAY_TYPE)
    } else {
        let name = ffi::PyObject_GetAttrString(ty, b"__name__\0".as_ptr().cast());
        string_or(name, CANNOT_DISPLAY_TYPE)
    };

    let message = if value.is_null() {
        String::new()
    } else {
        string_or(ffi::PyObject_Str(value), CANNOT_DISPLAY_VALUE)
    };

    ffi::Py_XDECREF(ty);
    ffi::Py_XDECREF(value);
    ffi::Py_XDECREF(traceback);

    Some(Exception::new(type_name, message))
}

/// Take the pending exception, an `Exception` with the given message is returned if the error
/// indicator hasn't been set.
///
/// Safety: the current thread must hold the interpreter lock.
pub(crate) unsafe fn take_exception_or(msg: &str) -> Exception {
    take_exception().unwrap_or_else(|| Exception::new("SystemError", msg))
}

/// Converts a `-1` status code to the pending exception.
///
/// Safety: the current thread must hold the interpreter lock.
#[inline]
pub(crate) unsafe fn check_status(status: std::os::raw::c_int) -> PyrsResult<()> {
    if status == -1 {
        Err(PyrsError::Exception(take_exception_or(
            "error return without exception set",
        )))?
    }

    Ok(())
}

/// Converts an owned `str` object to a `String` and decrements its reference count. Any error
/// is cleared and replaced with `fallback`.
///
/// Safety: the current thread must hold the interpreter lock, `obj` must be null or an owned
/// reference.
pub(crate) unsafe fn string_or(obj: *mut ffi::PyObject, fallback: &str) -> String {
    if obj.is_null() {
        ffi::PyErr_Clear();
        return String::from(fallback);
    }

    let s = match utf8(obj) {
        Some(s) => s,
        None => {
            ffi::PyErr_Clear();
            String::from(fallback)
        }
    };

    ffi::Py_DECREF(obj);
    s
}

/// Copies the content of a `str` object. Returns `None` if the object isn't a `str` or can't be
/// encoded as UTF-8, in which case an exception is pending.
///
/// Safety: the current thread must hold the interpreter lock, `obj` must be a valid reference.
pub(crate) unsafe fn utf8(obj: *mut ffi::PyObject) -> Option<String> {
    let mut size: ffi::Py_ssize_t = 0;
    let data = ffi::PyUnicode_AsUTF8AndSize(obj, &mut size);
    if data.is_null() {
        return None;
    }

    let bytes = std::slice::from_raw_parts(data.cast::<u8>(), size as usize);
    Some(String::from_utf8_lossy(bytes).into_owned())
}

/// Converts a C string owned by Python to a `String`.
///
/// Safety: `ptr` must be null or point to a nul-terminated string.
pub(crate) unsafe fn c_string(ptr: *const std::os::raw::c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}
