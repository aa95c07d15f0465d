//! Lists.
//!
//! Indices are validated against the current length before every indexed operation. Reading
//! and overwriting accept indices in `[0, len)`, inserting accepts `[0, len]`. Negative indices
//! are rejected rather than counted from the end.

use pyo3_ffi as ffi;

use super::{handle::Handle, tuple::Tuple, Managed};
use crate::{
    catch::check_status,
    convert::into_python::IntoPython,
    data::types::typecheck::{impl_python_typecheck, is_list},
    error::{AccessError, PyrsResult},
};

/// A Python list.
#[derive(Clone)]
pub struct List(Handle);

impl_view!(List);
impl_python_typecheck!(List, "List", is_list);

impl List {
    /// Create a new list that contains `values`.
    pub fn new<M: Managed>(values: &[M]) -> PyrsResult<Self> {
        unsafe {
            let list = Handle::from_owned(ffi::PyList_New(values.len() as ffi::Py_ssize_t))?;
            for (i, value) in values.iter().enumerate() {
                let item = value.as_handle().as_ptr();
                // PyList_SetItem steals a reference.
                ffi::Py_INCREF(item);
                check_status(ffi::PyList_SetItem(
                    list.as_ptr(),
                    i as ffi::Py_ssize_t,
                    item,
                ))?;
            }

            Ok(List(list))
        }
    }

    /// Create a new list by converting every item of `values` to a Python object.
    pub fn from_values<I>(values: I) -> PyrsResult<Self>
    where
        I: IntoIterator,
        I::Item: IntoPython,
    {
        let values = values
            .into_iter()
            .map(IntoPython::into_python)
            .collect::<PyrsResult<Vec<_>>>()?;

        List::new(&values)
    }

    /// Create a new empty list.
    pub fn empty() -> PyrsResult<Self> {
        List::new::<Handle>(&[])
    }

    /// Returns the number of elements in the list.
    pub fn len(&self) -> usize {
        unsafe { ffi::PyList_Size(self.0.as_ptr()) as usize }
    }

    /// Returns `true` if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `idx`.
    pub fn get(&self, idx: isize) -> PyrsResult<Handle> {
        self.check_index(idx, self.len())?;

        unsafe {
            Handle::from_borrowed(ffi::PyList_GetItem(
                self.0.as_ptr(),
                idx as ffi::Py_ssize_t,
            ))
        }
    }

    /// Replace the element at `idx` with `value`.
    pub fn set<M: Managed>(&self, idx: isize, value: &M) -> PyrsResult<()> {
        self.check_index(idx, self.len())?;

        unsafe {
            let item = value.as_handle().as_ptr();
            // PyList_SetItem steals a reference.
            ffi::Py_INCREF(item);
            check_status(ffi::PyList_SetItem(
                self.0.as_ptr(),
                idx as ffi::Py_ssize_t,
                item,
            ))
        }
    }

    /// Insert `value` before the element at `idx`, `idx` can be equal to the length of the
    /// list to insert it at the end.
    pub fn insert<M: Managed>(&self, idx: isize, value: &M) -> PyrsResult<()> {
        self.check_index(idx, self.len() + 1)?;

        unsafe {
            check_status(ffi::PyList_Insert(
                self.0.as_ptr(),
                idx as ffi::Py_ssize_t,
                value.as_handle().as_ptr(),
            ))
        }
    }

    /// Add `value` to the end of the list.
    pub fn append<M: Managed>(&self, value: &M) -> PyrsResult<()> {
        unsafe {
            check_status(ffi::PyList_Append(
                self.0.as_ptr(),
                value.as_handle().as_ptr(),
            ))
        }
    }

    /// Sort the list in place. Fails if the elements can't be compared with each other.
    pub fn sort(&self) -> PyrsResult<()> {
        unsafe { check_status(ffi::PyList_Sort(self.0.as_ptr())) }
    }

    /// Reverse the list in place.
    pub fn reverse(&self) -> PyrsResult<()> {
        unsafe { check_status(ffi::PyList_Reverse(self.0.as_ptr())) }
    }

    /// Returns a new list with the elements in `[start, end)`. Bounds larger than the length
    /// of the list are clamped, negative bounds are rejected.
    pub fn slice(&self, start: isize, end: isize) -> PyrsResult<List> {
        let len = self.len();
        if start < 0 {
            Err(AccessError::IndexOutOfRange { idx: start, len })?
        }

        if end < 0 {
            Err(AccessError::IndexOutOfRange { idx: end, len })?
        }

        unsafe {
            let slice = ffi::PyList_GetSlice(
                self.0.as_ptr(),
                start as ffi::Py_ssize_t,
                end as ffi::Py_ssize_t,
            );
            Ok(List(Handle::from_owned(slice)?))
        }
    }

    /// Returns a tuple with the current elements of the list.
    pub fn to_tuple(&self) -> PyrsResult<Tuple> {
        unsafe { Handle::from_owned(ffi::PyList_AsTuple(self.0.as_ptr()))?.cast() }
    }

    /// Returns all elements of the list in order.
    pub fn to_vec(&self) -> PyrsResult<Vec<Handle>> {
        (0..self.len() as isize).map(|i| self.get(i)).collect()
    }

    fn check_index(&self, idx: isize, bound: usize) -> PyrsResult<()> {
        if idx < 0 || idx as usize >= bound {
            Err(AccessError::IndexOutOfRange {
                idx,
                len: self.len(),
            })?
        }

        Ok(())
    }
}
