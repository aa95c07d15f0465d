//! Conversions between Rust and Python data.

pub mod into_python;
pub mod to_key;
pub mod unbox;
