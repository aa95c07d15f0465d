//! Dicts.
//!
//! Keys are compared with Python's own equality and hash. Anything that implements [`ToKey`]
//! can be used as a key, which includes string slices and every managed type.
//!
//! [`Dict::set`] inserts or silently overwrites. [`Dict::get`] and [`Dict::delete`] fail with
//! [`AccessError::KeyNotFound`] if the key is missing, [`Dict::contains`] never fails.

use std::ptr::null_mut;

use pyo3_ffi as ffi;

use super::{handle::Handle, list::List, Managed};
use crate::{
    catch::{check_status, take_exception},
    convert::to_key::ToKey,
    data::types::typecheck::{impl_python_typecheck, is_dict},
    error::{AccessError, PyrsError, PyrsResult, CANNOT_DISPLAY_VALUE},
};

/// A Python dict.
#[derive(Clone)]
pub struct Dict(Handle);

impl_view!(Dict);
impl_python_typecheck!(Dict, "Dict", is_dict);

impl Dict {
    /// Create a new empty dict.
    pub fn new() -> PyrsResult<Self> {
        unsafe { Ok(Dict(Handle::from_owned(ffi::PyDict_New())?)) }
    }

    /// Create a new dict that contains the given key-value pairs. Later pairs overwrite earlier
    /// pairs with an equal key.
    pub fn from_pairs<'a, K, V, I>(pairs: I) -> PyrsResult<Self>
    where
        K: ToKey + ?Sized + 'a,
        V: Managed + 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        let dict = Dict::new()?;
        for (key, value) in pairs {
            dict.set(key, value)?;
        }

        Ok(dict)
    }

    /// Returns the number of items in the dict.
    pub fn len(&self) -> usize {
        unsafe { ffi::PyDict_Size(self.0.as_ptr()) as usize }
    }

    /// Returns `true` if the dict has no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set the value associated with `key` to `value`, an existing value is overwritten.
    pub fn set<K: ToKey + ?Sized, V: Managed>(&self, key: &K, value: &V) -> PyrsResult<()> {
        let key = key.to_key()?;
        unsafe {
            check_status(ffi::PyDict_SetItem(
                self.0.as_ptr(),
                key.as_ptr(),
                value.as_handle().as_ptr(),
            ))
        }
    }

    /// Returns the value associated with `key`.
    pub fn get<K: ToKey + ?Sized>(&self, key: &K) -> PyrsResult<Handle> {
        let key = key.to_key()?;
        unsafe {
            let value = ffi::PyDict_GetItemWithError(self.0.as_ptr(), key.as_ptr());
            if value.is_null() {
                if let Some(exc) = take_exception() {
                    Err(PyrsError::Exception(exc))?
                }

                Err(key_not_found(&key))?
            }

            Handle::from_borrowed(value)
        }
    }

    /// Remove `key` and its value from the dict.
    pub fn delete<K: ToKey + ?Sized>(&self, key: &K) -> PyrsResult<()> {
        let key = key.to_key()?;
        if !self.contains(&key) {
            Err(key_not_found(&key))?
        }

        unsafe { check_status(ffi::PyDict_DelItem(self.0.as_ptr(), key.as_ptr())) }
    }

    /// Returns `true` if the dict contains `key`. Keys that can't be hashed are never
    /// contained.
    pub fn contains<K: ToKey + ?Sized>(&self, key: &K) -> bool {
        let key = match key.to_key() {
            Ok(key) => key,
            Err(_) => return false,
        };

        unsafe {
            match ffi::PyDict_Contains(self.0.as_ptr(), key.as_ptr()) {
                1 => true,
                0 => false,
                _ => {
                    ffi::PyErr_Clear();
                    false
                }
            }
        }
    }

    /// Returns a list of the keys in traversal order.
    pub fn keys(&self) -> PyrsResult<List> {
        unsafe { Handle::from_owned(ffi::PyDict_Keys(self.0.as_ptr()))?.cast() }
    }

    /// Returns a list of the values in traversal order.
    pub fn values(&self) -> PyrsResult<List> {
        unsafe { Handle::from_owned(ffi::PyDict_Values(self.0.as_ptr()))?.cast() }
    }

    /// Returns all key-value pairs in traversal order.
    pub fn to_vec(&self) -> PyrsResult<Vec<(Handle, Handle)>> {
        let mut pairs = Vec::with_capacity(self.len());
        let mut pos: ffi::Py_ssize_t = 0;
        let mut key = null_mut();
        let mut value = null_mut();

        unsafe {
            while ffi::PyDict_Next(self.0.as_ptr(), &mut pos, &mut key, &mut value) != 0 {
                pairs.push((Handle::from_borrowed(key)?, Handle::from_borrowed(value)?));
            }
        }

        Ok(pairs)
    }
}

fn key_not_found(key: &Handle) -> AccessError {
    AccessError::KeyNotFound {
        key: key.repr().unwrap_or_else(|_| CANNOT_DISPLAY_VALUE.into()),
    }
}
