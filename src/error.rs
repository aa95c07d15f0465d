//! Everything related to errors.

use std::{error::Error as StdErr, sync::Arc};

use thiserror::Error;

pub(crate) static CANNOT_DISPLAY_TYPE: &'static str = "<Cannot display type>";
pub(crate) static CANNOT_DISPLAY_VALUE: &'static str = "<Cannot display value>";

/// Alias that is used for most `Result`s in this crate.
pub type PyrsResult<T> = Result<T, Box<PyrsError>>;

/// Runtime errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("runtime can only be initialized once")]
    AlreadyInitialized,
    #[error("failed to initialize Python: {msg}")]
    InitFailed { msg: String },
    #[error("Python has not been initialized yet")]
    Inactive,
    #[error("a ticket already exists")]
    TicketExists,
    #[error("attempt to use the released object")]
    ReleasedResourceUse,
    #[error("the current thread does not hold the lock")]
    NotLocked,
    #[error("the current thread already holds the lock")]
    AlreadyLocked,
    #[error("a ticket can only be released by the thread that acquired it")]
    WrongThread,
}

/// IO errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IOError {
    #[error("failed to load module {name}: {cause}")]
    ModuleLoadFailure { name: String, cause: Exception },
}

/// Type errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("expected a {expected}, got a {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("buffer is read-only")]
    NotWritable,
    #[error("element type with size {size} is incompatible with buffer format {format}")]
    IncompatibleElement { format: String, size: usize },
}

/// Data access errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("index {idx} is out-of-bounds for a sequence of length {len}")]
    IndexOutOfRange { idx: isize, len: usize },
    #[error("index {idx:?} is invalid for a buffer with shape {shape:?}")]
    InvalidIndex { idx: Vec<usize>, shape: Vec<usize> },
    #[error("key {key} not found")]
    KeyNotFound { key: String },
    #[error("{type_name} has no attribute named {name}")]
    AttributeNotFound { type_name: String, name: String },
    #[error("buffer strides are incompatible with its element size")]
    IncompatibleStrides,
}

/// Python exception converted to a string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{type_name}: {message}")]
pub struct Exception {
    type_name: String,
    message: String,
}

impl Exception {
    pub(crate) fn new<T: Into<String>, M: Into<String>>(type_name: T, message: M) -> Self {
        Exception {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Returns the name of the exception type, e.g. `ZeroDivisionError`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns a reference to the error message.
    pub fn get_message(&self) -> &str {
        &self.message
    }
}

/// All different errors.
#[derive(Debug, Error, Clone)]
pub enum PyrsError {
    #[error("Other: {0}")]
    Other(Arc<dyn StdErr + 'static + Send + Sync>),
    #[error("Exception: {0}")]
    Exception(Exception),
    #[error("Invocation failure: {0}")]
    InvocationFailure(Exception),
    #[error("Runtime error: {0}")]
    RuntimeError(RuntimeError),
    #[error("Type error: {0}")]
    TypeError(TypeError),
    #[error("IO error: {0}")]
    IOError(IOError),
    #[error("Access error: {0}")]
    AccessError(AccessError),
}

impl PyrsError {
    /// Convert an arbitrary error to `PyrsError::Other`.
    #[inline]
    pub fn other<E: StdErr + 'static + Send + Sync>(reason: E) -> Self {
        PyrsError::Other(Arc::new(reason))
    }

    /// Convert an arbitrary error to `Err(PyrsError::Other)`.
    #[inline]
    pub fn other_error<T, E: StdErr + 'static + Send + Sync>(reason: E) -> Result<T, Self> {
        Err(Self::other(reason))
    }

    /// Returns the Python exception if this error was caused by one.
    pub fn exception(&self) -> Option<&Exception> {
        match self {
            PyrsError::Exception(e) | PyrsError::InvocationFailure(e) => Some(e),
            PyrsError::IOError(IOError::ModuleLoadFailure { cause, .. }) => Some(cause),
            _ => None,
        }
    }

    /// Returns `true` if this is a [`TypeError::TypeMismatch`].
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, PyrsError::TypeError(TypeError::TypeMismatch { .. }))
    }

    /// Returns `true` if this is an [`AccessError::IndexOutOfRange`].
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, PyrsError::AccessError(AccessError::IndexOutOfRange { .. }))
    }

    /// Returns `true` if this is an [`AccessError::KeyNotFound`].
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, PyrsError::AccessError(AccessError::KeyNotFound { .. }))
    }

    /// Returns `true` if this is a [`PyrsError::InvocationFailure`].
    pub fn is_invocation_failure(&self) -> bool {
        matches!(self, PyrsError::InvocationFailure(_))
    }

    /// Returns `true` if this is a [`RuntimeError::ReleasedResourceUse`].
    pub fn is_released_resource_use(&self) -> bool {
        matches!(
            self,
            PyrsError::RuntimeError(RuntimeError::ReleasedResourceUse)
        )
    }

    /// Returns `true` if this is an [`IOError::ModuleLoadFailure`].
    pub fn is_module_load_failure(&self) -> bool {
        matches!(self, PyrsError::IOError(IOError::ModuleLoadFailure { .. }))
    }
}

macro_rules! impl_from {
    ($type:ident) => {
        impl From<$type> for PyrsError {
            #[inline]
            fn from(e: $type) -> Self {
                PyrsError::$type(e)
            }
        }

        impl From<$type> for Box<PyrsError> {
            #[inline]
            fn from(e: $type) -> Self {
                Box::new(PyrsError::from(e))
            }
        }
    };
}

impl_from!(RuntimeError);
impl_from!(TypeError);
impl_from!(IOError);
impl_from!(AccessError);
impl_from!(Exception);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_resource_message() {
        let err: Box<PyrsError> = RuntimeError::ReleasedResourceUse.into();
        assert!(err.is_released_resource_use());
        assert_eq!(
            err.to_string(),
            "Runtime error: attempt to use the released object"
        );
    }

    #[test]
    fn exception_is_exposed() {
        let exc = Exception::new("ZeroDivisionError", "division by zero");
        assert_eq!(exc.to_string(), "ZeroDivisionError: division by zero");

        let err = PyrsError::InvocationFailure(exc.clone());
        assert!(err.is_invocation_failure());
        assert_eq!(err.exception(), Some(&exc));

        let err: PyrsError = IOError::ModuleLoadFailure {
            name: "missing".into(),
            cause: exc.clone(),
        }
        .into();
        assert!(err.is_module_load_failure());
        assert_eq!(err.exception().map(Exception::type_name), Some("ZeroDivisionError"));
    }

    #[test]
    fn access_errors_display_context() {
        let err: PyrsError = AccessError::IndexOutOfRange { idx: -1, len: 3 }.into();
        assert!(err.is_index_out_of_range());
        assert_eq!(
            err.to_string(),
            "Access error: index -1 is out-of-bounds for a sequence of length 3"
        );

        let err: PyrsError = AccessError::KeyNotFound {
            key: "'missing'".into(),
        }
        .into();
        assert!(err.is_key_not_found());
    }
}
