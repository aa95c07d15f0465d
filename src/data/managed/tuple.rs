//! Tuples.
//!
//! The arity of a tuple is fixed when it's created. Indices are validated before the tuple is
//! accessed, negative indices are rejected rather than counted from the end.

use pyo3_ffi as ffi;

use super::{handle::Handle, Managed};
use crate::{
    catch::check_status,
    convert::into_python::IntoPython,
    data::types::typecheck::{is_tuple, impl_python_typecheck},
    error::{AccessError, PyrsResult},
};

/// A Python tuple.
#[derive(Clone)]
pub struct Tuple(Handle);

impl_view!(Tuple);
impl_python_typecheck!(Tuple, "Tuple", is_tuple);

impl Tuple {
    /// Create a new tuple that contains `values`.
    pub fn new<M: Managed>(values: &[M]) -> PyrsResult<Self> {
        unsafe {
            let tuple = Handle::from_owned(ffi::PyTuple_New(values.len() as ffi::Py_ssize_t))?;
            for (i, value) in values.iter().enumerate() {
                let item = value.as_handle().as_ptr();
                // PyTuple_SetItem steals a reference.
                ffi::Py_INCREF(item);
                check_status(ffi::PyTuple_SetItem(
                    tuple.as_ptr(),
                    i as ffi::Py_ssize_t,
                    item,
                ))?;
            }

            Ok(Tuple(tuple))
        }
    }

    /// Create a new tuple by converting every item of `values` to a Python object.
    pub fn from_values<I>(values: I) -> PyrsResult<Self>
    where
        I: IntoIterator,
        I::Item: IntoPython,
    {
        let values = values
            .into_iter()
            .map(IntoPython::into_python)
            .collect::<PyrsResult<Vec<_>>>()?;

        Tuple::new(&values)
    }

    /// Returns a new empty tuple.
    pub fn empty() -> PyrsResult<Self> {
        Tuple::new::<Handle>(&[])
    }

    /// Returns the number of elements in the tuple.
    pub fn len(&self) -> usize {
        unsafe { ffi::PyTuple_Size(self.0.as_ptr()) as usize }
    }

    /// Returns `true` if the tuple has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `idx`, fails with [`AccessError::IndexOutOfRange`] if
    /// `idx` is not in `[0, len)`.
    pub fn get(&self, idx: isize) -> PyrsResult<Handle> {
        let len = self.len();
        if idx < 0 || idx as usize >= len {
            Err(AccessError::IndexOutOfRange { idx, len })?
        }

        unsafe {
            Handle::from_borrowed(ffi::PyTuple_GetItem(
                self.0.as_ptr(),
                idx as ffi::Py_ssize_t,
            ))
        }
    }

    /// Returns all elements of the tuple in order.
    pub fn to_vec(&self) -> PyrsResult<Vec<Handle>> {
        (0..self.len() as isize).map(|i| self.get(i)).collect()
    }
}
