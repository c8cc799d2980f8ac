//! Engine errors.
//!
//! Every failure the engine can raise while a unit loads. Names are carried
//! as rendered strings so an error stays readable after the interner that
//! produced it is gone.

use std::fmt;

use nsp_diagnostic::{Diagnostic, ErrorCode};
use nsp_ir::{Name, StringInterner};

use crate::symbol_table::TableError;

/// A fatal namespace error. Local to the load of the offending unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamespaceError {
    /// `namespace` with no exported names.
    EmptyExport { namespace: String },
    /// The status lattice refused to re-map a short name.
    RedefinitionConflict {
        namespace: String,
        short: String,
        old: String,
        new: String,
    },
    /// Import or private registration with no open namespace.
    NoActiveNamespace { operation: &'static str },
    /// Import source is neither a module nor a loadable unit.
    UnknownSource { source: String },
    /// A requested symbol is not exported by the source.
    UnexportedSymbol { source: String, symbol: String },
    /// `:prefix` given for a source that is a registered module.
    IllegalPrefixOverride { source: String, prefix: String },
    /// A reference resolved to a still-ambiguous wildcard import.
    AmbiguousReference { namespace: String, short: String },
    /// A directive form has the wrong shape.
    MalformedDirective { directive: String, reason: String },
    /// The host failed to load an imported unit.
    UnitLoadFailed { unit: String, message: String },
}

impl NamespaceError {
    /// The diagnostic code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            NamespaceError::EmptyExport { .. } => ErrorCode::E2001,
            NamespaceError::RedefinitionConflict { .. } => ErrorCode::E2002,
            NamespaceError::NoActiveNamespace { .. } => ErrorCode::E2003,
            NamespaceError::UnknownSource { .. } => ErrorCode::E2004,
            NamespaceError::UnexportedSymbol { .. } => ErrorCode::E2005,
            NamespaceError::IllegalPrefixOverride { .. } => ErrorCode::E2006,
            NamespaceError::AmbiguousReference { .. } => ErrorCode::E2007,
            NamespaceError::MalformedDirective { .. } => ErrorCode::E2008,
            NamespaceError::UnitLoadFailed { .. } => ErrorCode::E2009,
        }
    }

    /// Convert into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            NamespaceError::EmptyExport { .. } => {
                diag.with_suggestion("list at least one name after `:export`")
            }
            NamespaceError::RedefinitionConflict {
                namespace, old, new, ..
            } => diag
                .with_note(format!("in namespace `{namespace}`"))
                .with_note(format!("existing mapping: `{old}`"))
                .with_note(format!("rejected mapping: `{new}`"))
                .with_suggestion("import one of the names under an alias"),
            NamespaceError::NoActiveNamespace { .. } => {
                diag.with_suggestion("open a namespace with `namespace` first")
            }
            NamespaceError::UnknownSource { .. } => {
                diag.with_note("the source is neither a namespace module nor a loadable unit")
            }
            NamespaceError::UnexportedSymbol { source, .. } => {
                diag.with_note(format!("while importing from `{source}`"))
            }
            NamespaceError::IllegalPrefixOverride { .. } => {
                diag.with_suggestion("remove `:prefix`; namespace modules know their own prefix")
            }
            NamespaceError::AmbiguousReference { namespace, .. } => diag
                .with_note(format!("in namespace `{namespace}`"))
                .with_suggestion("import the intended name explicitly with `:symbols`"),
            NamespaceError::MalformedDirective { reason, .. } => diag.with_note(reason.clone()),
            NamespaceError::UnitLoadFailed { message, .. } => diag.with_note(message.clone()),
        }
    }
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceError::EmptyExport { namespace } => {
                write!(f, "namespace `{namespace}` exports no names")
            }
            NamespaceError::RedefinitionConflict { short, old, new, .. } => write!(
                f,
                "`{short}` already maps to `{old}` and cannot be redefined as `{new}`"
            ),
            NamespaceError::NoActiveNamespace { operation } => {
                write!(f, "`{operation}` used outside of any namespace")
            }
            NamespaceError::UnknownSource { source } => {
                write!(f, "cannot import from unknown source `{source}`")
            }
            NamespaceError::UnexportedSymbol { source, symbol } => {
                write!(f, "`{symbol}` is not exported by `{source}`")
            }
            NamespaceError::IllegalPrefixOverride { source, prefix } => write!(
                f,
                "`:prefix {prefix}` is not allowed when importing from namespace module `{source}`"
            ),
            NamespaceError::AmbiguousReference { short, .. } => write!(
                f,
                "`{short}` is ambiguous: it was wildcard-imported from more than one source"
            ),
            NamespaceError::MalformedDirective { directive, reason } => {
                write!(f, "malformed `{directive}` form: {reason}")
            }
            NamespaceError::UnitLoadFailed { unit, message } => {
                write!(f, "failed to load unit `{unit}`: {message}")
            }
        }
    }
}

impl std::error::Error for NamespaceError {}

/// Render a symbol table refusal raised inside `namespace`.
#[cold]
pub(crate) fn from_table_error(
    error: TableError,
    namespace: Name,
    interner: &StringInterner,
) -> NamespaceError {
    let text = |name: Name| interner.lookup(name).to_owned();
    match error {
        TableError::Conflict {
            short,
            existing,
            incoming,
        } => NamespaceError::RedefinitionConflict {
            namespace: text(namespace),
            short: text(short),
            old: text(existing.full_name),
            new: text(incoming.full_name),
        },
        TableError::Ambiguous { short } => NamespaceError::AmbiguousReference {
            namespace: text(namespace),
            short: text(short),
        },
    }
}
