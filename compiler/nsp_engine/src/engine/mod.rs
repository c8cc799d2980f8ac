//! The namespacing engine.
//!
//! [`Engine`] owns the context stack and is threaded explicitly through
//! every operation. Hosts drive it one top-level form at a time through
//! [`Engine::process_form`] and call [`Engine::unwind_unit`] when a unit's
//! load ends.

use nsp_ir::{Form, Name, SharedInterner, UnitId};

use crate::config::{EngineConfig, Heads};
use crate::context::{Context, ContextStack};
use crate::directive::Directive;
use crate::error::from_table_error;
use crate::host::Host;
use crate::module::Module;
use crate::symbol_table::{Status, SymbolTable};
use crate::NamespaceError;

/// What the host should do with a processed form.
#[derive(Debug)]
pub enum Processed {
    /// An ordinary form, possibly rewritten; evaluate it.
    Evaluate,
    /// A directive that the engine has executed. Not to be evaluated.
    ///
    /// For [`Directive::Close`], `closed` holds the context the closing
    /// hook popped, if any.
    Directive {
        directive: Directive,
        closed: Option<Context>,
    },
}

/// Compile-time namespacing engine.
pub struct Engine {
    pub(crate) interner: SharedInterner,
    pub(crate) config: EngineConfig,
    pub(crate) heads: Heads,
    pub(crate) contexts: ContextStack,
}

impl Engine {
    pub fn new(interner: SharedInterner, config: EngineConfig) -> Self {
        let heads = Heads::resolve(&config, &interner);
        Engine {
            interner,
            config,
            heads,
            contexts: ContextStack::new(),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The namespace currently being built.
    pub fn active(&self) -> Option<&Context> {
        self.contexts.active()
    }

    /// Number of open namespaces.
    pub fn depth(&self) -> usize {
        self.contexts.depth()
    }

    pub fn contexts(&self) -> &ContextStack {
        &self.contexts
    }

    /// Open namespace `name` for `unit`, exporting `exports`.
    ///
    /// Exports are deduplicated in declaration order and each becomes a
    /// `Defined` entry for its public name. The module is bound globally
    /// under `name` before the context is pushed. Nothing changes when the
    /// export list is empty.
    pub fn open_namespace<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        unit: UnitId,
        name: Name,
        exports: &[Name],
    ) -> Result<(), NamespaceError> {
        let interner = &self.interner;
        let mut module = Module::new(name);
        for &short in exports {
            module.add_export(short);
        }
        if module.exports().is_empty() {
            return Err(NamespaceError::EmptyExport {
                namespace: interner.lookup(name).to_owned(),
            });
        }

        let separator = self.config.effective_separator();
        let mut context = Context::new(
            name,
            unit,
            module.clone(),
            SymbolTable::new(),
            interner,
            separator,
        );
        for &short in module.exports() {
            let full = interner.intern_owned(format!(
                "{}{}",
                context.public_prefix(),
                interner.lookup(short)
            ));
            context
                .table_mut()
                .define_full(short, full, Status::Defined)
                .map_err(|err| from_table_error(err, name, interner))?;
        }

        host.bind_module(name, module);
        self.contexts.push(context);
        tracing::debug!(
            namespace = self.interner.lookup(name),
            %unit,
            depth = self.contexts.depth(),
            "namespace opened"
        );
        Ok(())
    }

    /// Register `names` as private in the active namespace ahead of their
    /// definitions, so earlier forms can already refer to them.
    pub fn declare_forward_private(&mut self, names: &[Name]) -> Result<(), NamespaceError> {
        let Some(context) = self.contexts.active_mut() else {
            return Err(NamespaceError::NoActiveNamespace {
                operation: "declare-private",
            });
        };
        let interner = &self.interner;
        let mut table = context.table().clone();
        for &short in names {
            let private = context.private_name(short, interner);
            table
                .register_private_if_absent(short, private)
                .map_err(|err| from_table_error(err, context.name(), interner))?;
        }
        context.replace_table(table);
        Ok(())
    }

    /// Closing hook.
    ///
    /// Pops the active context only when its module prefix is `name` and it
    /// was opened by `unit`; otherwise does nothing.
    pub fn close(&mut self, unit: UnitId, name: Name) -> Option<Context> {
        let active = self.contexts.active()?;
        if active.module().prefix() != name || active.unit() != unit {
            return None;
        }
        let context = self.contexts.pop()?;
        tracing::debug!(
            namespace = self.interner.lookup(name),
            %unit,
            depth = self.contexts.depth(),
            "namespace closed"
        );
        Some(context)
    }

    /// Pop every context `unit` left open.
    ///
    /// Hosts call this when a unit's load ends, successfully or not, so an
    /// aborted nested load never leaves its namespace active for the unit
    /// that imported it.
    pub fn unwind_unit(&mut self, unit: UnitId) -> Vec<Context> {
        let popped = self.contexts.pop_unit(unit);
        for context in &popped {
            tracing::debug!(
                namespace = self.interner.lookup(context.name()),
                %unit,
                "namespace unwound"
            );
        }
        popped
    }

    /// Load-pipeline entry: handle one top-level form of `unit`.
    ///
    /// Directives are executed and reported back; they are never rewritten.
    /// Every other form goes through [`Engine::post_expansion`].
    pub fn process_form<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        unit: UnitId,
        form: &mut Form,
    ) -> Result<Processed, NamespaceError> {
        let Some(directive) = Directive::parse(form, &self.heads, &self.interner)? else {
            self.post_expansion(unit, form)?;
            return Ok(Processed::Evaluate);
        };

        let mut closed = None;
        match &directive {
            Directive::OpenNamespace { name, exports } => {
                self.open_namespace(host, unit, *name, exports)?;
            }
            Directive::Import { source, options } => {
                self.require_own_context(unit, "import")?;
                self.import_from(host, *source, options.clone())?;
            }
            Directive::DeclarePrivate(names) => {
                self.require_own_context(unit, "declare-private")?;
                self.declare_forward_private(names)?;
            }
            Directive::Close(name) => {
                closed = self.close(unit, *name);
            }
        }
        Ok(Processed::Directive { directive, closed })
    }

    /// Directives only act on a namespace their own unit opened.
    fn require_own_context(
        &mut self,
        unit: UnitId,
        operation: &'static str,
    ) -> Result<(), NamespaceError> {
        match self.contexts.active_for_mut(unit) {
            Some(_) => Ok(()),
            None => Err(NamespaceError::NoActiveNamespace { operation }),
        }
    }
}
