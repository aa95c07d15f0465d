//! Reexports structs and traits you're likely to need.

pub use crate::{
    call::{Call, WithKeywords},
    convert::{into_python::IntoPython, to_key::ToKey, unbox::Unbox},
    data::{
        managed::{
            buffer::{Buffer, Element},
            callable::Callable,
            dict::Dict,
            handle::{CompareOp, Handle},
            list::List,
            module::Module,
            scalar::{Scalar, ScalarKind},
            tuple::Tuple,
            variant::{Shape, Variant},
            Managed,
        },
        types::typecheck::Typecheck,
    },
    error::{PyrsError, PyrsResult},
    runtime::{
        builder::RuntimeBuilder,
        python::Python,
        ticket::{Ticket, TicketGuard, TicketState},
    },
};
