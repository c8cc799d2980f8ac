//! Import resolution.
//!
//! A source is either an *explicit* module (its name is bound to a
//! [`Module`](crate::Module), whose export list is authoritative) or an
//! *implicit* one: a loadable unit that never used the engine, whose
//! members are discovered from the global registry by naming convention
//! (`PREFIX` + separator + `rest`, with no further separator in `rest`).
//!
//! Imports are staged into a copy of the active table and committed only
//! when every entry was accepted.

use nsp_ir::{Name, StringInterner};

use crate::error::from_table_error;
use crate::host::Host;
use crate::symbol_table::Status;
use crate::{Engine, NamespaceError};

/// One entry of an explicit symbol list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ImportSpec {
    /// Import `name` under the same short name.
    Bare(Name),
    /// Import the source's `source` under the local short name `local`.
    Aliased { source: Name, local: Name },
}

impl ImportSpec {
    /// Short name as known by the source.
    #[inline]
    pub fn source(self) -> Name {
        match self {
            ImportSpec::Bare(name) | ImportSpec::Aliased { source: name, .. } => name,
        }
    }

    /// Short name installed in the importing namespace.
    #[inline]
    pub fn local(self) -> Name {
        match self {
            ImportSpec::Bare(name) | ImportSpec::Aliased { local: name, .. } => name,
        }
    }
}

/// Options of one import request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// `None` imports every member as a wildcard.
    pub symbols: Option<Vec<ImportSpec>>,
    /// Naming prefix override; only legal for implicit sources.
    pub prefix: Option<Name>,
}

impl ImportOptions {
    /// Import every member.
    pub fn wildcard() -> Self {
        Self::default()
    }

    /// Import exactly `specs`.
    pub fn symbols(specs: Vec<ImportSpec>) -> Self {
        ImportOptions {
            symbols: Some(specs),
            prefix: None,
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: Name) -> Self {
        self.prefix = Some(prefix);
        self
    }
}

/// Where a source's members come from.
enum Source {
    Explicit { prefix: Name, exports: Vec<Name> },
    Implicit { prefix: Name, members: Vec<Name> },
}

impl Engine {
    /// Import from `source` into the active namespace.
    ///
    /// Returns the number of entries installed. The source unit is always
    /// required from the host first, so its definitions exist before
    /// members are validated or discovered.
    pub fn import_from<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        source: Name,
        options: ImportOptions,
    ) -> Result<usize, NamespaceError> {
        if self.contexts.active().is_none() {
            return Err(NamespaceError::NoActiveNamespace { operation: "import" });
        }

        let status = host.require(self, source)?;
        let interner = self.interner.clone();
        let separator = self.config.effective_separator().to_owned();

        let resolved = match host.module(source) {
            Some(module) => {
                if let Some(prefix) = options.prefix {
                    return Err(NamespaceError::IllegalPrefixOverride {
                        source: interner.lookup(source).to_owned(),
                        prefix: interner.lookup(prefix).to_owned(),
                    });
                }
                Source::Explicit {
                    prefix: module.prefix(),
                    exports: module.exports().to_vec(),
                }
            }
            None if !status.is_available() => {
                return Err(NamespaceError::UnknownSource {
                    source: interner.lookup(source).to_owned(),
                });
            }
            None => {
                let prefix = options.prefix.unwrap_or(source);
                let members = discover_members(
                    &host.bound_names(),
                    &interner,
                    interner.lookup(prefix),
                    &separator,
                );
                Source::Implicit { prefix, members }
            }
        };

        let (prefix, wildcard_members) = match &resolved {
            Source::Explicit { prefix, exports } => (*prefix, exports),
            Source::Implicit { prefix, members } => (*prefix, members),
        };
        let prefix_text = interner.lookup(prefix);
        let full_name = |short: Name| {
            interner.intern_owned(format!(
                "{prefix_text}{separator}{}",
                interner.lookup(short)
            ))
        };

        let mut staged = Vec::new();
        match options.symbols {
            None => {
                for &short in wildcard_members {
                    staged.push((short, full_name(short), Status::Wildcard));
                }
            }
            Some(specs) => {
                for spec in specs {
                    let full = full_name(spec.source());
                    let known = match &resolved {
                        Source::Explicit { exports, .. } => exports.contains(&spec.source()),
                        Source::Implicit { .. } => host.is_bound(full),
                    };
                    if !known {
                        return Err(NamespaceError::UnexportedSymbol {
                            source: interner.lookup(source).to_owned(),
                            symbol: interner.lookup(full).to_owned(),
                        });
                    }
                    staged.push((spec.local(), full, Status::Imported));
                }
            }
        }

        let Some(context) = self.contexts.active_mut() else {
            return Err(NamespaceError::NoActiveNamespace { operation: "import" });
        };
        let mut table = context.table().clone();
        for &(short, full, status) in &staged {
            table
                .define_full(short, full, status)
                .map_err(|err| from_table_error(err, context.name(), &interner))?;
        }
        context.replace_table(table);

        tracing::debug!(
            namespace = interner.lookup(context.name()),
            source = interner.lookup(source),
            explicit = matches!(resolved, Source::Explicit { .. }),
            entries = staged.len(),
            "import committed"
        );
        Ok(staged.len())
    }
}

/// Short names of the implicit module `prefix` among `names`.
///
/// A name belongs to the module when it is `prefix` + `separator` + `rest`
/// with `rest` non-empty and free of `separator`. Sorted and deduplicated.
pub fn discover_members(
    names: &[Name],
    interner: &StringInterner,
    prefix: &str,
    separator: &str,
) -> Vec<Name> {
    let head = format!("{prefix}{separator}");
    let mut shorts: Vec<&str> = names
        .iter()
        .filter_map(|&name| {
            let rest = interner.lookup(name).strip_prefix(head.as_str())?;
            (!rest.is_empty() && !rest.contains(separator)).then_some(rest)
        })
        .collect();
    shorts.sort_unstable();
    shorts.dedup();
    shorts.into_iter().map(|short| interner.intern(short)).collect()
}
