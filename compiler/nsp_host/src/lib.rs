//! Reference host for the nsp engine.
//!
//! A small Lisp host: a reader for unit sources, a global registry with
//! separate value and function cells, an evaluator, and a [`Runtime`] that
//! loads units through the engine. It exists to drive the engine end to
//! end; it is not a complete Lisp.

mod error;
mod eval;
mod reader;
mod registry;
mod runtime;
mod value;

pub use error::{EvalError, EvalErrorKind, HostError};
pub use eval::Interpreter;
pub use reader::{read_all, ReadError, ReadErrorKind};
pub use registry::Registry;
pub use runtime::{LoadReport, Runtime};
pub use value::{Builtin, Function, Lambda, Value, ValueDisplay};
