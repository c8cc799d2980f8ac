//! Compile-time namespacing engine.
//!
//! Source units use short names; the names actually bound in the host are
//! long and prefixed. As a unit loads, the engine sees each top-level form,
//! registers what it defines, and rewrites identifiers in place:
//!
//! - exported `x` in namespace `n` becomes `n-x`
//! - private `x` becomes `n--x`
//! - imported names map to their source's public names
//!
//! # Architecture
//!
//! - [`SymbolTable`] / [`Status`]: per-namespace short-to-full mapping and
//!   the provenance lattice deciding when one mapping may replace another
//! - [`ContextStack`]: namespaces under construction, nested because an
//!   import can load another namespaced unit mid-definition
//! - [`Engine::import_from`]: explicit and implicit module resolution
//! - [`rewrite`] / [`Engine::post_expansion`]: in-place substitution
//! - [`Directive`]: the declarative forms units write
//! - [`GlobalRegistry`] / [`UnitLoader`]: what the host must provide

mod config;
mod context;
mod directive;
mod engine;
mod error;
mod host;
mod import;
mod module;
mod rewrite;
mod symbol_table;

#[cfg(test)]
mod test_host;

pub use config::{Definers, DirectiveNames, EngineConfig, DEFAULT_SEPARATOR};
pub use context::{Context, ContextStack};
pub use directive::Directive;
pub use engine::{Engine, Processed};
pub use error::NamespaceError;
pub use host::{GlobalRegistry, Host, LoadStatus, UnitLoader};
pub use import::{discover_members, ImportOptions, ImportSpec};
pub use module::Module;
pub use rewrite::rewrite;
pub use symbol_table::{DefineOutcome, Entry, Status, SymbolTable, TableError};
