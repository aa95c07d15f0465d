//! Python modules.
//!
//! Modules are imported by name from the module search path with [`Module::import`], or created
//! from source code with [`Module::from_source`]. If a module can't be found or raises an
//! exception while it's executed, an [`IOError::ModuleLoadFailure`] is returned that contains
//! the original exception.

use std::ffi::CString;

use pyo3_ffi as ffi;

use super::{callable::Callable, handle::Handle, Managed};
use crate::{
    call::Call,
    catch::take_exception_or,
    convert::into_python::IntoPython,
    data::types::typecheck::{impl_python_typecheck, is_module},
    error::{Exception, IOError, PyrsResult},
    runtime::ensure_active,
};

/// A Python module.
#[derive(Clone)]
pub struct Module(Handle);

impl_view!(Module);
impl_python_typecheck!(Module, "Module", is_module);

impl Module {
    /// Import the module `name`, e.g. `os.path`.
    pub fn import(name: &str) -> PyrsResult<Self> {
        ensure_active()?;

        let module = unsafe {
            let name_obj = Handle::new_str(name)?;
            Handle::from_owned(ffi::PyImport_Import(name_obj.as_ptr()))
        };

        match module {
            Ok(module) => {
                tracing::debug!(name, "imported module");
                Ok(Module(module))
            }
            Err(e) => Err(load_failure(name, e.exception().cloned()).into()),
        }
    }

    /// Compile `source` and execute it as a new module named `name`. The module is added to
    /// `sys.modules`, so it can be imported by other modules afterwards.
    pub fn from_source(name: &str, source: &str) -> PyrsResult<Self> {
        ensure_active()?;

        let c_name = match CString::new(name) {
            Ok(c_name) => c_name,
            Err(_) => Err(load_failure(
                name,
                Some(Exception::new("ValueError", "embedded null byte")),
            ))?,
        };

        let filename = format!("<{}>", name);
        let code = Module::builtins()?
            .function("compile")?
            .call3(
                &source.into_python()?,
                &filename.into_python()?,
                &"exec".into_python()?,
            )
            .map_err(|e| load_failure(name, e.exception().cloned()))?;

        let module = unsafe {
            Handle::from_owned(ffi::PyImport_ExecCodeModule(
                c_name.as_ptr(),
                code.as_ptr(),
            ))
        };

        match module {
            Ok(module) => {
                tracing::debug!(name, "created module from source");
                Ok(Module(module))
            }
            Err(e) => Err(load_failure(name, e.exception().cloned()).into()),
        }
    }

    /// Returns the `builtins` module.
    pub fn builtins() -> PyrsResult<Self> {
        Module::import("builtins")
    }

    /// Returns the name of this module.
    pub fn name(&self) -> PyrsResult<String> {
        self.get_attr("__name__")?.unbox::<String>()
    }

    /// Returns the global `name` of this module.
    pub fn global(&self, name: &str) -> PyrsResult<Handle> {
        self.get_attr(name)
    }

    /// Returns the global `name` of this module, which must be callable.
    pub fn function(&self, name: &str) -> PyrsResult<Callable> {
        self.get_attr(name)?.cast()
    }

    /// Set the global `name` of this module to `value`.
    pub fn set_global<M: Managed>(&self, name: &str, value: &M) -> PyrsResult<()> {
        self.set_attr(name, value)
    }
}

fn load_failure(name: &str, cause: Option<Exception>) -> IOError {
    let cause = cause.unwrap_or_else(|| unsafe { take_exception_or("failed to load module") });
    tracing::debug!(name, %cause, "failed to load module");

    IOError::ModuleLoadFailure {
        name: name.into(),
        cause,
    }
}
