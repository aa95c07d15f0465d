//! Managed types for Python data.
//!
//! Every object owned by Python is accessed through a [`Handle`], a reference-counted pointer
//! that can be cloned and dropped freely. Cloning a handle never touches Python, all clones of a
//! handle share one strong Python reference that's released when the last clone is dropped.
//!
//! A handle can be downcast to a typed view with [`Handle::cast`] after the object's shape has
//! been checked. Views like [`Tuple`], [`List`] and [`Dict`] wrap a handle and provide the
//! operations that are valid for that shape. All managed types implement the [`Managed`] trait,
//! which provides the operations that are valid for every object: attribute access, rich
//! comparisons, hashing and string conversion.
//!
//! Except for cloning and dropping, every operation calls into Python and requires that the
//! calling thread holds the interpreter lock. That's the case for the thread that started the
//! runtime until a [`Ticket`] is acquired; after that, a thread must lock the ticket first.
//!
//! [`Handle`]: crate::data::managed::handle::Handle
//! [`Handle::cast`]: crate::data::managed::handle::Handle::cast
//! [`Tuple`]: crate::data::managed::tuple::Tuple
//! [`List`]: crate::data::managed::list::List
//! [`Dict`]: crate::data::managed::dict::Dict
//! [`Ticket`]: crate::runtime::ticket::Ticket

macro_rules! impl_debug {
    ($type:ty) => {
        impl ::std::fmt::Debug for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match <Self as $crate::data::managed::Managed>::repr(self) {
                    Ok(s) => f.write_str(&s),
                    Err(e) => f.write_fmt(format_args!("<Cannot display value: {}>", e)),
                }
            }
        }
    };
}

macro_rules! impl_display {
    ($type:ty) => {
        impl ::std::fmt::Display for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let s = <Self as $crate::data::managed::Managed>::display_string_or(
                    self,
                    $crate::error::CANNOT_DISPLAY_VALUE,
                );
                f.write_str(&s)
            }
        }
    };
}

macro_rules! impl_compare {
    ($type:ty) => {
        impl<M: $crate::data::managed::Managed> ::std::cmp::PartialEq<M> for $type {
            fn eq(&self, other: &M) -> bool {
                <Self as $crate::data::managed::Managed>::compare(
                    self,
                    other,
                    $crate::data::managed::handle::CompareOp::Eq,
                )
                .unwrap_or(false)
            }
        }

        impl<M: $crate::data::managed::Managed> ::std::cmp::PartialOrd<M> for $type {
            fn partial_cmp(&self, other: &M) -> Option<::std::cmp::Ordering> {
                use $crate::data::managed::{handle::CompareOp, Managed};

                if self.compare(other, CompareOp::Eq).ok()? {
                    Some(::std::cmp::Ordering::Equal)
                } else if self.compare(other, CompareOp::Lt).ok()? {
                    Some(::std::cmp::Ordering::Less)
                } else if self.compare(other, CompareOp::Gt).ok()? {
                    Some(::std::cmp::Ordering::Greater)
                } else {
                    None
                }
            }

            fn lt(&self, other: &M) -> bool {
                <Self as $crate::data::managed::Managed>::compare(
                    self,
                    other,
                    $crate::data::managed::handle::CompareOp::Lt,
                )
                .unwrap_or(false)
            }

            fn le(&self, other: &M) -> bool {
                <Self as $crate::data::managed::Managed>::compare(
                    self,
                    other,
                    $crate::data::managed::handle::CompareOp::Le,
                )
                .unwrap_or(false)
            }

            fn gt(&self, other: &M) -> bool {
                <Self as $crate::data::managed::Managed>::compare(
                    self,
                    other,
                    $crate::data::managed::handle::CompareOp::Gt,
                )
                .unwrap_or(false)
            }

            fn ge(&self, other: &M) -> bool {
                <Self as $crate::data::managed::Managed>::compare(
                    self,
                    other,
                    $crate::data::managed::handle::CompareOp::Ge,
                )
                .unwrap_or(false)
            }
        }
    };
}

// Implements the std traits and conversions shared by all views that wrap a single handle.
macro_rules! impl_view {
    ($type:ident) => {
        impl $crate::data::managed::private::ManagedPriv for $type {
            #[inline]
            fn wrap(
                handle: $crate::data::managed::handle::Handle,
                _: $crate::private::Private,
            ) -> $crate::error::PyrsResult<Self> {
                Ok($type(handle))
            }

            #[inline]
            fn handle(&self, _: $crate::private::Private) -> &$crate::data::managed::handle::Handle {
                &self.0
            }

            #[inline]
            fn unwrap_handle(
                self,
                _: $crate::private::Private,
            ) -> $crate::data::managed::handle::Handle {
                self.0
            }
        }

        impl $crate::data::managed::Managed for $type {}

        impl_debug!($type);
        impl_display!($type);
        impl_compare!($type);
        $crate::convert::into_python::impl_into_python_managed!($type);
        $crate::convert::to_key::impl_to_key_managed!($type);
    };
}

pub mod buffer;
pub mod callable;
pub mod dict;
pub mod handle;
pub mod list;
pub mod module;
pub mod scalar;
pub mod tuple;
pub mod variant;

use std::ptr::null_mut;

use pyo3_ffi as ffi;

use self::{dict::Dict, handle::CompareOp, handle::Handle};
use crate::{
    catch::{check_status, string_or, take_exception_or},
    error::{AccessError, PyrsError, PyrsResult, CANNOT_DISPLAY_TYPE},
    private::Private,
};

/// Trait implemented by all managed types.
///
/// Except for [`Managed::as_handle`] and [`Managed::into_handle`], the methods of this trait
/// call into Python and require that the current thread holds the interpreter lock.
pub trait Managed: private::ManagedPriv + Clone + Send + Sync {
    /// Returns the handle that this data wraps.
    #[inline]
    fn as_handle(&self) -> &Handle {
        self.handle(Private)
    }

    /// Convert this data to the handle it wraps.
    #[inline]
    fn into_handle(self) -> Handle {
        self.unwrap_handle(Private)
    }

    /// Returns the name of the type of this object, e.g. `int` or `list`.
    fn type_name(&self) -> String {
        unsafe {
            let ty = ffi::Py_TYPE(self.as_handle().as_ptr()).cast::<ffi::PyObject>();
            let name = ffi::PyObject_GetAttrString(ty, b"__name__\0".as_ptr().cast());
            string_or(name, CANNOT_DISPLAY_TYPE)
        }
    }

    /// Returns `true` if this object is `None`.
    #[inline]
    fn is_none(&self) -> bool {
        unsafe { self.as_handle().as_ptr() == ffi::Py_None() }
    }

    /// Convert this object to a string by calling `str`.
    fn display_string(&self) -> PyrsResult<String> {
        unsafe {
            let s = Handle::from_owned(ffi::PyObject_Str(self.as_handle().as_ptr()))?;
            s.to_utf8()
        }
    }

    /// Convert this object to a string by calling `str`, or return some default value.
    fn display_string_or<S: Into<String>>(&self, default: S) -> String {
        self.display_string().unwrap_or_else(|_| default.into())
    }

    /// Convert this object to a string by calling `repr`.
    fn repr(&self) -> PyrsResult<String> {
        unsafe {
            let s = Handle::from_owned(ffi::PyObject_Repr(self.as_handle().as_ptr()))?;
            s.to_utf8()
        }
    }

    /// Returns the hash of this object, fails if the object is unhashable.
    fn hash(&self) -> PyrsResult<isize> {
        unsafe {
            let hash = ffi::PyObject_Hash(self.as_handle().as_ptr());
            if hash == -1 && !ffi::PyErr_Occurred().is_null() {
                Err(PyrsError::Exception(take_exception_or("unhashable object")))?
            }

            Ok(hash as isize)
        }
    }

    /// Compare this object with `other` using Python's rich comparison protocol.
    fn compare<M: Managed>(&self, other: &M, op: CompareOp) -> PyrsResult<bool> {
        unsafe {
            let res = ffi::PyObject_RichCompareBool(
                self.as_handle().as_ptr(),
                other.as_handle().as_ptr(),
                op.as_raw(),
            );
            check_status(res)?;
            Ok(res == 1)
        }
    }

    /// Returns the attribute `name`.
    ///
    /// If the attribute doesn't exist an [`AccessError::AttributeNotFound`] is returned.
    fn get_attr(&self, name: &str) -> PyrsResult<Handle> {
        unsafe {
            let key = Handle::new_str(name)?;
            let attr = ffi::PyObject_GetAttr(self.as_handle().as_ptr(), key.as_ptr());
            if attr.is_null() {
                let exc = take_exception_or("failed to get attribute");
                if exc.type_name() == "AttributeError" {
                    Err(AccessError::AttributeNotFound {
                        type_name: self.type_name(),
                        name: name.into(),
                    })?
                }

                Err(PyrsError::Exception(exc))?
            }

            Handle::from_owned(attr)
        }
    }

    /// Set the attribute `name` to `value`.
    fn set_attr<V: Managed>(&self, name: &str, value: &V) -> PyrsResult<()> {
        unsafe {
            let key = Handle::new_str(name)?;
            check_status(ffi::PyObject_SetAttr(
                self.as_handle().as_ptr(),
                key.as_ptr(),
                value.as_handle().as_ptr(),
            ))
        }
    }

    /// Returns `true` if this object has an attribute named `name`. Never fails, any error that
    /// occurs while looking up the attribute is discarded.
    fn has_attr(&self, name: &str) -> bool {
        unsafe {
            let key = match Handle::new_str(name) {
                Ok(key) => key,
                Err(_) => return false,
            };

            let res = ffi::PyObject_HasAttr(self.as_handle().as_ptr(), key.as_ptr());
            res == 1
        }
    }

    /// Delete the attribute `name`.
    fn del_attr(&self, name: &str) -> PyrsResult<()> {
        unsafe {
            let key = Handle::new_str(name)?;
            check_status(ffi::PyObject_SetAttr(
                self.as_handle().as_ptr(),
                key.as_ptr(),
                null_mut(),
            ))
        }
    }

    /// Returns the attributes of this object, i.e. its `__dict__`.
    fn attributes(&self) -> PyrsResult<Dict> {
        self.get_attr("__dict__")?.cast::<Dict>()
    }

    /// Merge `attrs` into the attributes of this object by setting every name in `attrs` to its
    /// associated value.
    ///
    /// This doesn't replace `__dict__`: attributes that aren't mentioned in `attrs` keep their
    /// current value. All keys must be strings.
    fn set_attributes(&self, attrs: &Dict) -> PyrsResult<()> {
        for (name, value) in attrs.to_vec()? {
            let name = name.unbox::<String>()?;
            self.set_attr(&name, &value)?;
        }

        Ok(())
    }
}

pub(crate) mod private {
    use crate::{data::managed::handle::Handle, error::PyrsResult, private::Private};

    pub trait ManagedPriv: Sized {
        // Wrap a handle whose shape has been checked. Buffers acquire their view here.
        fn wrap(handle: Handle, _: Private) -> PyrsResult<Self>;

        fn handle(&self, _: Private) -> &Handle;

        fn unwrap_handle(self, _: Private) -> Handle;
    }
}
