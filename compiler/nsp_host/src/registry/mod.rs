//! Global identifier registry: value cells and function cells.
//!
//! Module values live in value cells, so a namespace name is an ordinary
//! bound symbol whose value is a [`Module`].

use rustc_hash::FxHashMap;

use nsp_engine::Module;
use nsp_ir::Name;

use crate::value::{Function, Value};

#[derive(Clone, Debug, Default)]
pub struct Registry {
    values: FxHashMap<Name, Value>,
    functions: FxHashMap<Name, Function>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, name: Name) -> Option<&Value> {
        self.values.get(&name)
    }

    pub fn set_value(&mut self, name: Name, value: Value) {
        self.values.insert(name, value);
    }

    pub fn has_value(&self, name: Name) -> bool {
        self.values.contains_key(&name)
    }

    pub fn function(&self, name: Name) -> Option<&Function> {
        self.functions.get(&name)
    }

    pub fn set_function(&mut self, name: Name, function: Function) {
        self.functions.insert(name, function);
    }

    /// The module bound to `name`, if its value cell holds one.
    pub fn module(&self, name: Name) -> Option<&Module> {
        match self.values.get(&name) {
            Some(Value::Module(module)) => Some(module),
            _ => None,
        }
    }

    /// True if either cell of `name` is set.
    pub fn is_bound(&self, name: Name) -> bool {
        self.values.contains_key(&name) || self.functions.contains_key(&name)
    }

    /// Every name with at least one cell set, deduplicated.
    pub fn names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self
            .values
            .keys()
            .chain(self.functions.keys())
            .copied()
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
