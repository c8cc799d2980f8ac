//! Identifiers and form trees shared by the nsp engine and its hosts.
//!
//! - [`Name`] / [`StringInterner`]: 32-bit interned identifiers
//! - [`Form`]: the tree the reader produces and the engine rewrites
//! - [`FormVisitorMut`]: in-place traversal used by the rewriter
//! - [`UnitId`]: identity of one compilation-unit load

mod form;
mod interner;
mod name;
mod unit;
pub mod visitor;

pub use form::{Form, FormDisplay};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use unit::UnitId;
pub use visitor::{walk_form_mut, FormVisitorMut};
