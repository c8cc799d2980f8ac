//! Module registry entries.

use nsp_ir::Name;

/// A namespace module: its prefix and the short names it exports.
///
/// Built when a namespace opens, bound globally under the namespace name,
/// and never changed afterwards. Exports keep declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    prefix: Name,
    exports: Vec<Name>,
}

impl Module {
    /// An empty module for `prefix`.
    pub fn new(prefix: Name) -> Self {
        Module {
            prefix,
            exports: Vec::new(),
        }
    }

    /// Record an exported short name. Returns `false` if it was already exported.
    pub(crate) fn add_export(&mut self, short: Name) -> bool {
        if self.exports.contains(&short) {
            return false;
        }
        self.exports.push(short);
        true
    }

    /// The namespace prefix (the namespace name).
    #[inline]
    pub fn prefix(&self) -> Name {
        self.prefix
    }

    /// Exported short names in declaration order.
    pub fn exports(&self) -> &[Name] {
        &self.exports
    }

    /// True if `short` is in the export set.
    pub fn exports_name(&self, short: Name) -> bool {
        self.exports.contains(&short)
    }
}
