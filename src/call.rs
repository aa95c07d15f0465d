//! Call Python functions.
//!
//! The [`Call`] trait provides methods to call the implementor with some number of positional
//! arguments. It's implemented by [`Handle`], [`Callable`] and [`WithKeywords`]. Every object
//! can potentially be called, so calling a `Handle` is allowed; if the object isn't callable
//! the call fails like any other call that raises an exception.
//!
//! Keyword arguments can be provided with [`Callable::with_keywords`], which returns a
//! [`WithKeywords`] that passes those keyword arguments every time it's called.
//!
//! A function that returns nothing returns `None`, calling [`Managed::is_none`] on the result
//! is always valid. If the function raises an exception, the call fails with
//! [`PyrsError::InvocationFailure`], which contains the type and message of that exception.
//!
//! [`Handle`]: crate::data::managed::handle::Handle
//! [`Callable`]: crate::data::managed::callable::Callable
//! [`Callable::with_keywords`]: crate::data::managed::callable::Callable::with_keywords
//! [`Managed::is_none`]: crate::data::managed::Managed::is_none
//! [`PyrsError::InvocationFailure`]: crate::error::PyrsError::InvocationFailure

use std::ptr::null_mut;

use pyo3_ffi as ffi;
use smallvec::SmallVec;

use crate::{
    catch::take_exception_or,
    data::managed::{callable::Callable, dict::Dict, handle::Handle, Managed},
    error::{PyrsError, PyrsResult},
};

/// A callable object and the keyword arguments it's called with.
#[derive(Clone, Debug)]
pub struct WithKeywords {
    func: Callable,
    keywords: Dict,
}

impl WithKeywords {
    pub(crate) fn new(func: Callable, keywords: Dict) -> Self {
        WithKeywords { func, keywords }
    }

    /// Returns the function.
    pub fn function(&self) -> &Callable {
        &self.func
    }

    /// Returns the keyword arguments.
    pub fn keywords(&self) -> &Dict {
        &self.keywords
    }
}

/// Trait implemented by types that can be called as a Python function.
///
/// Calling a function requires that the current thread holds the interpreter lock.
pub trait Call: private::CallPriv {
    /// Call a function with no arguments.
    fn call0(&self) -> PyrsResult<Handle> {
        self.invoke(&[])
    }

    /// Call a function with one argument.
    fn call1<A0: Managed>(&self, arg0: &A0) -> PyrsResult<Handle> {
        self.invoke(&[arg0.as_handle()])
    }

    /// Call a function with two arguments.
    fn call2<A0: Managed, A1: Managed>(&self, arg0: &A0, arg1: &A1) -> PyrsResult<Handle> {
        self.invoke(&[arg0.as_handle(), arg1.as_handle()])
    }

    /// Call a function with three arguments.
    fn call3<A0: Managed, A1: Managed, A2: Managed>(
        &self,
        arg0: &A0,
        arg1: &A1,
        arg2: &A2,
    ) -> PyrsResult<Handle> {
        self.invoke(&[arg0.as_handle(), arg1.as_handle(), arg2.as_handle()])
    }

    /// Call a function with an arbitrary number of arguments.
    fn call<M: Managed>(&self, args: &[M]) -> PyrsResult<Handle> {
        let args: SmallVec<[&Handle; 8]> = args.iter().map(Managed::as_handle).collect();
        self.invoke(&args)
    }
}

impl Call for Handle {}

impl Call for Callable {}

impl Call for WithKeywords {}

// Build the argument tuple and call `func`.
fn invoke(func: &Handle, args: &[&Handle], keywords: Option<&Dict>) -> PyrsResult<Handle> {
    unsafe {
        let tuple = Handle::from_owned(ffi::PyTuple_New(args.len() as ffi::Py_ssize_t))?;
        for (i, arg) in args.iter().enumerate() {
            let item = arg.as_ptr();
            // PyTuple_SetItem steals a reference.
            ffi::Py_INCREF(item);
            ffi::PyTuple_SetItem(tuple.as_ptr(), i as ffi::Py_ssize_t, item);
        }

        let keywords = keywords.map_or(null_mut(), |kw| kw.as_handle().as_ptr());
        let res = ffi::PyObject_Call(func.as_ptr(), tuple.as_ptr(), keywords);
        if res.is_null() {
            let exc = take_exception_or("failed to run function");
            tracing::trace!(%exc, "call failed");
            Err(PyrsError::InvocationFailure(exc))?
        }

        Handle::from_owned(res)
    }
}

mod private {
    use super::{invoke, WithKeywords};
    use crate::{
        data::managed::{callable::Callable, handle::Handle, Managed},
        error::PyrsResult,
    };

    pub trait CallPriv {
        fn invoke(&self, args: &[&Handle]) -> PyrsResult<Handle>;
    }

    impl CallPriv for Handle {
        fn invoke(&self, args: &[&Handle]) -> PyrsResult<Handle> {
            invoke(self, args, None)
        }
    }

    impl CallPriv for Callable {
        fn invoke(&self, args: &[&Handle]) -> PyrsResult<Handle> {
            invoke(self.as_handle(), args, None)
        }
    }

    impl CallPriv for WithKeywords {
        fn invoke(&self, args: &[&Handle]) -> PyrsResult<Handle> {
            invoke(
                self.function().as_handle(),
                args,
                Some(self.keywords()),
            )
        }
    }
}
