//! Collaborator interfaces the engine needs from its host.
//!
//! The engine never parses or evaluates anything. It asks the host three
//! things: what names are globally bound (implicit module discovery),
//! which module value a name is bound to (explicit modules), and to load
//! a unit before importing from it.

use nsp_ir::Name;

use crate::{Engine, Module, NamespaceError};

/// The host's global identifier registry.
pub trait GlobalRegistry {
    /// True if `name` has any global binding.
    fn is_bound(&self, name: Name) -> bool;

    /// The module value `name` is bound to, if any.
    fn module(&self, name: Name) -> Option<&Module>;

    /// Bind `name` to a module value.
    fn bind_module(&mut self, name: Name, module: Module);

    /// Every currently bound name, in any order.
    fn bound_names(&self) -> Vec<Name>;
}

/// What [`UnitLoader::require`] found.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LoadStatus {
    /// The unit was loaded by this call.
    Loaded,
    /// The unit had been loaded before.
    AlreadyLoaded,
    /// No unit by that name exists.
    NotFound,
}

impl LoadStatus {
    /// True unless the unit does not exist.
    #[inline]
    pub fn is_available(self) -> bool {
        !matches!(self, LoadStatus::NotFound)
    }
}

/// Loads compilation units on demand.
pub trait UnitLoader {
    /// Ensure `unit` has been loaded. Idempotent.
    ///
    /// The loader runs the unit's forms back through `engine`, which is
    /// how a nested namespace gets opened and closed while an import is
    /// being resolved. A failing load is reported as
    /// [`NamespaceError::UnitLoadFailed`] (or the nested engine error).
    fn require(&mut self, engine: &mut Engine, unit: Name) -> Result<LoadStatus, NamespaceError>;
}

/// Everything the engine needs from a host.
pub trait Host: GlobalRegistry + UnitLoader {}

impl<T: GlobalRegistry + UnitLoader + ?Sized> Host for T {}
