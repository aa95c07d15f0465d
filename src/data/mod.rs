//! Python data.
//!
//! Objects owned by Python are accessed through the types in the [`managed`] module. The
//! [`types`] module contains the machinery that decides which of these types an arbitrary
//! object can be converted to.

pub mod managed;
pub mod types;
