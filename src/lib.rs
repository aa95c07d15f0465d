//! pyrs embeds Python in Rust applications.
//!
//! The crate is a thin, safe layer over the CPython C API. It lets a Rust program hold, inspect,
//! mutate and call Python objects, and share the single interpreter between threads.
//!
//! # Overview
//!
//!  - Start and finalize the interpreter, and configure its module search path.
//!  - Import modules, or create them from source code.
//!  - Hold Python objects as reference-counted [`Handle`]s that can be cloned and dropped on any
//!    thread.
//!  - Check the shape of an object and downcast it to a [`Scalar`], [`Tuple`], [`List`],
//!    [`Dict`], [`Buffer`] or [`Callable`].
//!  - Access the memory exported by objects like `array.array` and NumPy arrays. The `ndarray`
//!    feature can be enabled to borrow that memory as an `ArrayView`.
//!  - Call Python functions with positional and keyword arguments. Exceptions are converted to
//!    errors.
//!  - Use Python from multiple threads with a [`Ticket`].
//!
//! # Prerequisites
//!
//! Python 3.8 or later must be installed, including its development files. The interpreter that
//! is linked is located by `pyo3-ffi`, the `PYO3_PYTHON` environment variable can be set to
//! select a specific one.
//!
//! # Tutorial
//!
//! The runtime is started with a [`RuntimeBuilder`], which returns a [`Python`] instance. The
//! runtime is finalized when this instance is dropped.
//!
//! ```no_run
//! use pyrs::prelude::*;
//!
//! # fn main() -> PyrsResult<()> {
//! let python = unsafe { RuntimeBuilder::new().module_directory("scripts").start()? };
//!
//! // Import `scripts/calc.py` and call its `multiply` function.
//! let calc = python.import("calc")?;
//! let multiply = calc.function("multiply")?;
//! let result = multiply.call2(&Scalar::from_int(4)?, &Scalar::from_int(5)?)?;
//! assert_eq!(result.unbox::<i64>()?, 20);
//! # Ok(())
//! # }
//! ```
//!
//! Every object that Python returns is a [`Handle`]. Its shape can be checked with
//! [`Handle::is`] and it can be downcast with [`Handle::cast`]:
//!
//! ```no_run
//! use pyrs::prelude::*;
//!
//! # fn main() -> PyrsResult<()> {
//! # let python = unsafe { RuntimeBuilder::new().start()? };
//! let values = List::from_values([3i64, 1, 2])?.into_handle();
//! assert!(values.is::<List>());
//! assert!(!values.is::<Dict>());
//!
//! let values = values.cast::<List>()?;
//! values.sort()?;
//! assert_eq!(values.get(0)?.unbox::<i64>()?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Threads
//!
//! Python objects can only be used by the thread that holds the interpreter lock. Initially
//! that's the thread that started the runtime. To use Python from other threads a [`Ticket`]
//! must be acquired, see the [`runtime::ticket`] module for more information.
//!
//! [`Handle`]: crate::data::managed::handle::Handle
//! [`Handle::is`]: crate::data::managed::handle::Handle::is
//! [`Handle::cast`]: crate::data::managed::handle::Handle::cast
//! [`Scalar`]: crate::data::managed::scalar::Scalar
//! [`Tuple`]: crate::data::managed::tuple::Tuple
//! [`List`]: crate::data::managed::list::List
//! [`Dict`]: crate::data::managed::dict::Dict
//! [`Buffer`]: crate::data::managed::buffer::Buffer
//! [`Callable`]: crate::data::managed::callable::Callable
//! [`RuntimeBuilder`]: crate::runtime::builder::RuntimeBuilder
//! [`Python`]: crate::runtime::python::Python
//! [`Ticket`]: crate::runtime::ticket::Ticket

#![forbid(rustdoc::broken_intra_doc_links)]

pub mod call;
pub(crate) mod catch;
pub mod convert;
pub mod data;
pub mod error;
#[cfg(feature = "prelude")]
pub mod prelude;
pub(crate) mod private;
pub mod runtime;
