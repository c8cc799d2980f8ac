//! Namespace contexts and the stack that nests them.
//!
//! A [`Context`] exists only while its namespace is being built. Loading
//! one unit can trigger loading another (through an import), which opens
//! and closes its own namespace before control comes back, so contexts
//! live on a [`ContextStack`] whose top is the active one.

use nsp_ir::{Name, StringInterner, UnitId};

use crate::module::Module;
use crate::symbol_table::SymbolTable;

/// A namespace under construction.
#[derive(Clone, Debug)]
pub struct Context {
    name: Name,
    unit: UnitId,
    module: Module,
    table: SymbolTable,
    public_prefix: String,
    private_prefix: String,
}

impl Context {
    pub(crate) fn new(
        name: Name,
        unit: UnitId,
        module: Module,
        table: SymbolTable,
        interner: &StringInterner,
        separator: &str,
    ) -> Self {
        let text = interner.lookup(name);
        Context {
            name,
            unit,
            module,
            table,
            public_prefix: format!("{text}{separator}"),
            private_prefix: format!("{text}{separator}{separator}"),
        }
    }

    /// Namespace name (also the module prefix).
    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    /// The load that opened this namespace.
    #[inline]
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut SymbolTable {
        &mut self.table
    }

    pub(crate) fn replace_table(&mut self, table: SymbolTable) {
        self.table = table;
    }

    /// `name` followed by one separator.
    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// `name` followed by two separators.
    pub fn private_prefix(&self) -> &str {
        &self.private_prefix
    }

    /// Full private name for `short`.
    pub(crate) fn private_name(&self, short: Name, interner: &StringInterner) -> Name {
        interner.intern_owned(format!("{}{}", self.private_prefix, interner.lookup(short)))
    }
}

/// Stack of open namespaces. The last element is active.
#[derive(Clone, Debug, Default)]
pub struct ContextStack {
    contexts: Vec<Context>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, context: Context) {
        self.contexts.push(context);
    }

    pub(crate) fn pop(&mut self) -> Option<Context> {
        self.contexts.pop()
    }

    /// The most recently opened, not yet closed context.
    #[inline]
    pub fn active(&self) -> Option<&Context> {
        self.contexts.last()
    }

    #[inline]
    pub(crate) fn active_mut(&mut self) -> Option<&mut Context> {
        self.contexts.last_mut()
    }

    /// The active context if it was opened by `unit`.
    pub(crate) fn active_for_mut(&mut self, unit: UnitId) -> Option<&mut Context> {
        self.contexts.last_mut().filter(|context| context.unit == unit)
    }

    /// Pop every context belonging to `unit` from the top of the stack.
    ///
    /// Stops at the first context from another unit. Returned in pop order.
    pub(crate) fn pop_unit(&mut self, unit: UnitId) -> Vec<Context> {
        let mut popped = Vec::new();
        while self.active().is_some_and(|context| context.unit == unit) {
            if let Some(context) = self.contexts.pop() {
                popped.push(context);
            }
        }
        popped
    }

    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Contexts from outermost to active.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Context> {
        self.contexts.iter()
    }
}
