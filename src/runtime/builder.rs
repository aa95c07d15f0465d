//! Configure and start the Python runtime.
//!
//! A [`RuntimeBuilder`] collects the startup options. Without any options the interpreter is
//! started with its default configuration. If an executable or extra search paths are provided,
//! the runtime is configured through Python's initialization configuration instead, which is
//! how a virtual environment can be selected. In both cases the current working directory is
//! appended to `sys.path`, followed by the module directories.

use std::{
    ffi::CString,
    mem::MaybeUninit,
    os::raw::c_int,
    path::{Path, PathBuf},
    ptr::addr_of_mut,
};

use pyo3_ffi as ffi;

use super::{append_module_directory, python::Python, state};
use crate::{
    catch::c_string,
    error::{PyrsError, PyrsResult, RuntimeError},
};

/// Builder to configure and start the Python runtime.
#[derive(Clone, Debug, Default)]
pub struct RuntimeBuilder {
    executable: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
    module_directories: Vec<PathBuf>,
    install_signal_handlers: bool,
}

impl RuntimeBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        RuntimeBuilder::default()
    }

    /// Use `path` as the path of the Python executable. The standard library and site-packages
    /// are located relative to it, so this selects a specific installation or virtual
    /// environment.
    pub fn executable<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Add `path` to the module search path during startup, similar to setting `PYTHONPATH`.
    pub fn search_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Append `path` to `sys.path` after the runtime has started.
    pub fn module_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.module_directories.push(path.into());
        self
    }

    /// Install Python's signal handlers. Disabled by default.
    pub fn install_signal_handlers(mut self, install: bool) -> Self {
        self.install_signal_handlers = install;
        self
    }

    /// Initialize Python.
    ///
    /// This method can be called once per process, an error is returned if Python has already
    /// been initialized. After this method returns the current thread holds the interpreter
    /// lock.
    ///
    /// Safety: this method must not be called concurrently with other code that initializes
    /// or uses Python without going through pyrs.
    pub unsafe fn start(self) -> PyrsResult<Python> {
        if !state::can_init() {
            Err(RuntimeError::AlreadyInitialized)?
        }

        let configured = self.executable.is_some() || !self.search_paths.is_empty();
        let res = if configured {
            self.init_from_config()
        } else {
            ffi::Py_InitializeEx(self.install_signal_handlers as c_int);
            Ok(())
        };

        if let Err(e) = res {
            state::reset_init();
            return Err(e);
        }

        let python = Python::new();
        tracing::debug!(version = %python.version(), configured, "started Python");

        append_module_directory(Path::new("."))?;
        for dir in self.module_directories.iter() {
            append_module_directory(dir)?;
        }

        Ok(python)
    }

    unsafe fn init_from_config(&self) -> PyrsResult<()> {
        let mut config = MaybeUninit::<ffi::PyConfig>::uninit();
        let config = config.as_mut_ptr();
        ffi::PyConfig_InitPythonConfig(config);
        (*config).install_signal_handlers = self.install_signal_handlers as c_int;

        let res = self
            .configure(config)
            .and_then(|_| check_status(ffi::Py_InitializeFromConfig(config)));

        ffi::PyConfig_Clear(config);
        res
    }

    unsafe fn configure(&self, config: *mut ffi::PyConfig) -> PyrsResult<()> {
        if let Some(executable) = self.executable.as_ref() {
            let executable = path_to_cstring(executable)?;
            check_status(ffi::PyConfig_SetBytesString(
                config,
                addr_of_mut!((*config).executable),
                executable.as_ptr(),
            ))?;
        }

        if !self.search_paths.is_empty() {
            let joined = std::env::join_paths(&self.search_paths).map_err(PyrsError::other)?;
            let joined = path_to_cstring(Path::new(&joined))?;
            check_status(ffi::PyConfig_SetBytesString(
                config,
                addr_of_mut!((*config).pythonpath_env),
                joined.as_ptr(),
            ))?;
        }

        Ok(())
    }
}

fn check_status(status: ffi::PyStatus) -> PyrsResult<()> {
    if unsafe { ffi::PyStatus_Exception(status) } != 0 {
        let msg = unsafe { c_string(status.err_msg) }.unwrap_or_else(|| "unknown error".into());
        Err(RuntimeError::InitFailed { msg })?
    }

    Ok(())
}

fn path_to_cstring(path: &Path) -> PyrsResult<CString> {
    CString::new(path_bytes(path)).map_err(|e| PyrsError::other(e).into())
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn path_bytes(path: &Path) -> Vec<u8> {
            use std::os::unix::ffi::OsStrExt;
            path.as_os_str().as_bytes().to_vec()
        }
    } else {
        fn path_bytes(path: &Path) -> Vec<u8> {
            path.to_string_lossy().as_bytes().to_vec()
        }
    }
}
