//! Shapes of Python objects.

pub mod typecheck;
