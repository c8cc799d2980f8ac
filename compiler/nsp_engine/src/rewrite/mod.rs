//! Form rewriting and the post-expansion hook.
//!
//! [`rewrite`] substitutes, in place, every identifier that has an entry
//! in a symbol table. Identifiers with no entry are left exactly as they
//! were; literals are never visited. Quoted identifiers are rewritten like
//! any other position, which is what makes `#'private-fn` and
//! `(defalias 'short ...)` refer to the renamed definition.

use nsp_ir::{Form, FormVisitorMut, Name, UnitId};

use crate::config::Heads;
use crate::error::from_table_error;
use crate::symbol_table::{SymbolTable, TableError};
use crate::{Engine, NamespaceError};

struct Rewriter<'t> {
    table: &'t mut SymbolTable,
    substitutions: usize,
}

impl FormVisitorMut for Rewriter<'_> {
    type Error = TableError;

    fn visit_symbol(&mut self, name: &mut Name) -> Result<(), TableError> {
        if let Some(full) = self.table.resolve(*name)? {
            if full != *name {
                *name = full;
                self.substitutions += 1;
            }
        }
        Ok(())
    }
}

/// Rewrite `form` in place against `table`.
///
/// Returns the number of substituted positions. Wildcard entries that are
/// hit become `WildcardUsed`; the first ambiguous reference aborts the
/// walk, leaving later positions untouched.
pub fn rewrite(table: &mut SymbolTable, form: &mut Form) -> Result<usize, TableError> {
    let mut rewriter = Rewriter {
        table,
        substitutions: 0,
    };
    rewriter.visit_form(form)?;
    Ok(rewriter.substitutions)
}

impl Heads {
    /// The name a top-level definition form introduces, if any.
    ///
    /// `(defun NAME ...)` for direct definers, `(defalias 'NAME ...)` for
    /// quoted-target definers. Anything else (including a computed target)
    /// introduces nothing.
    pub(crate) fn defined_name(&self, form: &Form) -> Option<Name> {
        let [head, target, ..] = form.as_list()? else {
            return None;
        };
        let head = head.as_symbol()?;
        if self.direct_definers.contains(&head) {
            target.as_symbol()
        } else if self.quoted_definers.contains(&head) {
            target.unwrap_head(self.quote)?.as_symbol()
        } else {
            None
        }
    }
}

impl Engine {
    /// Post-expansion hook for one top-level form produced by `unit`.
    ///
    /// Forms from a load other than the one that opened the active
    /// namespace pass through untouched, as does everything when no
    /// namespace is open. Otherwise a definition form first registers its
    /// name as private (unless exported), then the whole form is rewritten.
    pub fn post_expansion(&mut self, unit: UnitId, form: &mut Form) -> Result<usize, NamespaceError> {
        let Some(context) = self.contexts.active_for_mut(unit) else {
            return Ok(0);
        };
        let namespace = context.name();
        let interner = &self.interner;

        if let Some(short) = self.heads.defined_name(form) {
            let private = context.private_name(short, interner);
            let outcome = context
                .table_mut()
                .register_private_if_absent(short, private)
                .map_err(|err| from_table_error(err, namespace, interner))?;
            tracing::trace!(
                namespace = interner.lookup(namespace),
                short = interner.lookup(short),
                ?outcome,
                "definition seen"
            );
        }

        let substitutions = rewrite(context.table_mut(), form)
            .map_err(|err| from_table_error(err, namespace, interner))?;
        tracing::trace!(
            namespace = interner.lookup(namespace),
            substitutions,
            "form rewritten"
        );
        Ok(substitutions)
    }
}
