//! Reference-counted handles to Python objects.
//!
//! A [`Handle`] owns one strong reference to a Python object. Cloning a handle is cheap and
//! doesn't call into Python: all clones share an atomically counted cell that owns that single
//! reference, which is released when the last clone is dropped. Because the reference count of
//! the Python object is only changed once per cell, a handle can be cloned and dropped on
//! threads that don't hold the interpreter lock. The final drop briefly takes the lock to
//! release the reference.
//!
//! Two handles alias the same object if [`Handle::is_same`] returns `true`, which compares the
//! underlying references rather than the cells.

use std::{os::raw::c_int, ptr::NonNull, sync::Arc};

use pyo3_ffi as ffi;

use super::{
    private::ManagedPriv,
    variant::{Shape, Variant},
    Managed,
};
use crate::{
    catch::{take_exception_or, utf8},
    convert::{into_python::IntoPython, unbox::Unbox},
    data::types::typecheck::Typecheck,
    error::{PyrsError, PyrsResult, TypeError},
    private::Private,
    runtime::state,
};

/// Rich comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl CompareOp {
    pub(crate) fn as_raw(self) -> c_int {
        match self {
            CompareOp::Lt => ffi::Py_LT,
            CompareOp::Le => ffi::Py_LE,
            CompareOp::Eq => ffi::Py_EQ,
            CompareOp::Ne => ffi::Py_NE,
            CompareOp::Gt => ffi::Py_GT,
            CompareOp::Ge => ffi::Py_GE,
        }
    }
}

struct Owned(NonNull<ffi::PyObject>);

// The reference is only dereferenced while the interpreter lock is held.
unsafe impl Send for Owned {}
unsafe impl Sync for Owned {}

impl Drop for Owned {
    fn drop(&mut self) {
        if !state::is_init() {
            tracing::trace!("Python is not running, leaking object");
            return;
        }

        unsafe {
            let gstate = ffi::PyGILState_Ensure();
            ffi::Py_DECREF(self.0.as_ptr());
            ffi::PyGILState_Release(gstate);
        }
    }
}

/// A reference-counted handle to a Python object.
#[derive(Clone)]
pub struct Handle {
    owned: Arc<Owned>,
}

impl Handle {
    /// Returns a handle to `None`.
    pub fn none() -> Self {
        unsafe {
            let none = ffi::Py_None();
            ffi::Py_INCREF(none);
            Handle::wrap_non_null(NonNull::new_unchecked(none))
        }
    }

    /// Convert a Rust value to a new Python object.
    pub fn new<T: IntoPython>(value: T) -> PyrsResult<Self> {
        value.into_python()
    }

    /// Take ownership of a new reference. A null pointer is converted to the pending exception.
    ///
    /// Safety: `ptr` must be null or a new reference, the current thread must hold the
    /// interpreter lock.
    #[inline]
    pub(crate) unsafe fn from_owned(ptr: *mut ffi::PyObject) -> PyrsResult<Self> {
        match NonNull::new(ptr) {
            Some(ptr) => Ok(Handle::wrap_non_null(ptr)),
            None => Err(PyrsError::Exception(take_exception_or(
                "error return without exception set",
            )))?,
        }
    }

    /// Increment the reference count of a borrowed reference and take ownership of it. A null
    /// pointer is converted to the pending exception.
    ///
    /// Safety: `ptr` must be null or a borrowed reference, the current thread must hold the
    /// interpreter lock.
    #[inline]
    pub(crate) unsafe fn from_borrowed(ptr: *mut ffi::PyObject) -> PyrsResult<Self> {
        if !ptr.is_null() {
            ffi::Py_INCREF(ptr);
        }

        Handle::from_owned(ptr)
    }

    #[inline]
    pub(crate) unsafe fn wrap_non_null(ptr: NonNull<ffi::PyObject>) -> Self {
        Handle {
            owned: Arc::new(Owned(ptr)),
        }
    }

    /// Create a new `str` object.
    pub(crate) fn new_str(s: &str) -> PyrsResult<Self> {
        unsafe {
            Handle::from_owned(ffi::PyUnicode_FromStringAndSize(
                s.as_ptr().cast(),
                s.len() as ffi::Py_ssize_t,
            ))
        }
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut ffi::PyObject {
        self.owned.0.as_ptr()
    }

    /// Copies the content of a `str` object.
    pub(crate) fn to_utf8(&self) -> PyrsResult<String> {
        unsafe {
            match utf8(self.as_ptr()) {
                Some(s) => Ok(s),
                None => Err(PyrsError::Exception(take_exception_or("not a str")))?,
            }
        }
    }

    /// Returns `true` if `self` and `other` refer to the same Python object.
    #[inline]
    pub fn is_same<M: Managed>(&self, other: &M) -> bool {
        self.as_ptr() == other.as_handle().as_ptr()
    }

    /// Returns the reference count of the Python object.
    pub fn ref_count(&self) -> isize {
        unsafe { ffi::Py_REFCNT(self.as_ptr()) as isize }
    }

    /// Returns the number of clones of this handle that currently exist, including `self`.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.owned)
    }

    /// Returns `true` if the object has the shape `T`.
    #[inline]
    pub fn is<T: Typecheck>(&self) -> bool {
        T::typecheck(self)
    }

    /// Downcast this handle to `T`. The shape of the object is checked first, if the check fails
    /// a [`TypeError::TypeMismatch`] is returned.
    ///
    /// The returned view shares the underlying reference with `self`.
    pub fn cast<T: Managed + Typecheck>(&self) -> PyrsResult<T> {
        if !self.is::<T>() {
            Err(TypeError::TypeMismatch {
                expected: T::NAME.into(),
                found: self.type_name(),
            })?
        }

        T::wrap(self.clone(), Private)
    }

    /// Convert this object to a Rust value. Fails with a [`TypeError::TypeMismatch`] if the
    /// object doesn't have the shape `T`.
    pub fn unbox<T: Unbox + Typecheck>(&self) -> PyrsResult<T::Output> {
        if !self.is::<T>() {
            Err(TypeError::TypeMismatch {
                expected: T::NAME.into(),
                found: self.type_name(),
            })?
        }

        unsafe { T::unbox(self) }
    }

    /// Returns the primary shape of this object, or `None` if it has none of the known shapes.
    ///
    /// The shapes are checked in a fixed order: scalar, tuple, list, dict, buffer, callable.
    /// The first shape that matches is returned.
    pub fn shape(&self) -> Option<Shape> {
        Shape::of(self)
    }

    /// Downcast this handle to the view that corresponds to its primary shape.
    ///
    /// The shape is derived again every time this method is called.
    pub fn resolve(&self) -> PyrsResult<Variant> {
        Variant::resolve(self)
    }
}

impl ManagedPriv for Handle {
    #[inline]
    fn wrap(handle: Handle, _: Private) -> PyrsResult<Self> {
        Ok(handle)
    }

    #[inline]
    fn handle(&self, _: Private) -> &Handle {
        self
    }

    #[inline]
    fn unwrap_handle(self, _: Private) -> Handle {
        self
    }
}

impl Managed for Handle {}

impl_debug!(Handle);
impl_display!(Handle);
impl_compare!(Handle);

unsafe impl Typecheck for Handle {
    const NAME: &'static str = "object";

    #[inline]
    fn typecheck(_: &Handle) -> bool {
        true
    }
}
