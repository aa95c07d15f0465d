//! The embedded Python runtime.

use std::{ffi::CStr, marker::PhantomData, path::Path};

use pyo3_ffi as ffi;

use super::{
    append_module_directory, state,
    ticket::{self, Ticket},
};
use crate::{data::managed::module::Module, error::PyrsResult};

/// An instance of the embedded Python runtime.
///
/// This instance is created by [`RuntimeBuilder::start`]. It can't be shared with or sent to
/// other threads, the runtime is finalized when it's dropped.
///
/// [`RuntimeBuilder::start`]: crate::runtime::builder::RuntimeBuilder::start
pub struct Python {
    _not_send_sync: PhantomData<*mut ()>,
}

impl Python {
    pub(crate) fn new() -> Self {
        Python {
            _not_send_sync: PhantomData,
        }
    }

    /// Returns the version string of the embedded interpreter.
    pub fn version(&self) -> String {
        unsafe { CStr::from_ptr(ffi::Py_GetVersion()) }
            .to_string_lossy()
            .into_owned()
    }

    /// Append `path` to `sys.path`, modules in that directory can be imported afterwards.
    ///
    /// The current thread must hold the interpreter lock.
    pub fn add_module_directory<P: AsRef<Path>>(&self, path: P) -> PyrsResult<()> {
        unsafe { append_module_directory(path.as_ref()) }
    }

    /// Import the module `name`.
    ///
    /// The current thread must hold the interpreter lock.
    pub fn import(&self, name: &str) -> PyrsResult<Module> {
        Module::import(name)
    }

    /// Acquire the exclusive-access ticket, see [`Ticket::acquire`].
    pub fn acquire_ticket(&self) -> PyrsResult<Ticket> {
        Ticket::acquire()
    }
}

impl Drop for Python {
    fn drop(&mut self) {
        if ticket::is_live() {
            tracing::warn!("a ticket is still alive, Python is not finalized");
            return;
        }

        state::set_pending_exit();
        let status = unsafe { ffi::Py_FinalizeEx() };
        state::set_exit();

        if status == 0 {
            tracing::debug!("finalized Python");
        } else {
            tracing::warn!(status, "errors occurred while finalizing Python");
        }
    }
}
