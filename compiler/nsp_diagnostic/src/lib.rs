//! Diagnostic system for namespace and host errors.
//!
//! - Error codes for searchability (`nspc explain E2007`)
//! - Clear messages (what went wrong)
//! - Notes naming the identifiers involved (old and new full names,
//!   the namespace being built, the source module)
//! - Suggestions (how to fix)

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
