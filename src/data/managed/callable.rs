//! Callable objects: functions, methods, classes and every object that implements `__call__`.

use super::{dict::Dict, handle::Handle};
use crate::{
    call::WithKeywords,
    data::types::typecheck::{impl_python_typecheck, is_callable},
};

/// A callable Python object.
///
/// The methods to call it are provided by the [`Call`] trait.
///
/// [`Call`]: crate::call::Call
#[derive(Clone)]
pub struct Callable(Handle);

impl_view!(Callable);
impl_python_typecheck!(Callable, "Callable", is_callable);

impl Callable {
    /// Provide keyword arguments for this function. The returned value can be called with the
    /// methods of the [`Call`] trait.
    ///
    /// [`Call`]: crate::call::Call
    pub fn with_keywords(&self, keywords: &Dict) -> WithKeywords {
        WithKeywords::new(self.clone(), keywords.clone())
    }
}
