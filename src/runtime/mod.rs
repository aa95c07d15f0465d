//! Start the Python runtime and coordinate access to it.
//!
//! Python is embedded with a [`RuntimeBuilder`], which returns a [`Python`] instance that owns
//! the runtime. The runtime can only be started once per process; it's finalized when this
//! instance is dropped.
//!
//! The interpreter is single-threaded: only the thread that holds the interpreter lock may use
//! it. After startup the initializing thread holds that lock. If other threads need access to
//! Python, the initializing thread must acquire a [`Ticket`]. Acquiring a ticket suspends the
//! initializing thread's implicit right to use the runtime, after which every thread, including
//! the initializing one, must lock the ticket before it calls into Python. Releasing the ticket
//! hands the implicit right back to the thread that acquired it.
//!
//! [`RuntimeBuilder`]: crate::runtime::builder::RuntimeBuilder
//! [`Python`]: crate::runtime::python::Python
//! [`Ticket`]: crate::runtime::ticket::Ticket

pub mod builder;
pub mod python;
pub mod state;
pub mod ticket;

use std::path::Path;

use pyo3_ffi as ffi;

use crate::{
    catch::take_exception_or,
    convert::into_python::IntoPython,
    error::{PyrsError, PyrsResult, RuntimeError},
};

/// Returns an error if Python isn't running.
#[inline]
pub(crate) fn ensure_active() -> PyrsResult<()> {
    if !state::is_init() {
        Err(RuntimeError::Inactive)?
    }

    Ok(())
}

/// Appends `path` to `sys.path`.
///
/// Safety: the current thread must hold the interpreter lock.
pub(crate) unsafe fn append_module_directory(path: &Path) -> PyrsResult<()> {
    ensure_active()?;

    let sys_path = ffi::PySys_GetObject(b"path\0".as_ptr().cast());
    if sys_path.is_null() || ffi::PyList_Check(sys_path) == 0 {
        Err(PyrsError::Exception(take_exception_or("sys.path is not a list")))?
    }

    let entry = path.to_string_lossy().into_python()?;
    if ffi::PyList_Append(sys_path, entry.as_ptr()) != 0 {
        Err(PyrsError::Exception(take_exception_or(
            "failed to extend sys.path",
        )))?
    }

    Ok(())
}
