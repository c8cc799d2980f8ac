//! Per-namespace symbol table and its provenance lattice.
//!
//! Each short name maps to at most one [`Entry`]. Every insertion goes
//! through [`SymbolTable::define_full`], which decides between inserting,
//! keeping, promoting to [`Status::Ambiguous`], overriding, or refusing:
//!
//! | existing | incoming | outcome |
//! |---|---|---|
//! | none | any | insert |
//! | `Ambiguous` | `Wildcard` | unchanged |
//! | `Wildcard` | `Wildcard` | promote to `Ambiguous` |
//! | `Defined` | `Defined`, same full name | unchanged |
//! | `Wildcard` / `Ambiguous` | anything else | override |
//! | otherwise | | conflict |
//!
//! Explicit imports are never re-declared: importing a short name a second
//! time is a conflict even when it names the same target.
//!
//! Wildcard imports are provisional: unrelated sources may all export a
//! name nobody uses, and that collision is harmless until something reads
//! it. Definitions and explicit imports are commitments.

use std::fmt;

use rustc_hash::FxHashMap;

use nsp_ir::Name;

/// Provenance of a symbol table entry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Status {
    /// Defined in this namespace (exported or private).
    Defined,
    /// Explicitly imported via `:symbols`.
    Imported,
    /// Wildcard-imported and not yet referenced.
    Wildcard,
    /// Wildcard-imported and referenced at least once.
    WildcardUsed,
    /// Wildcard-imported from more than one source.
    Ambiguous,
}

impl Status {
    /// Lower-case label used in reports and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Defined => "defined",
            Status::Imported => "imported",
            Status::Wildcard => "wildcard",
            Status::WildcardUsed => "wildcard-used",
            Status::Ambiguous => "ambiguous",
        }
    }

    /// Entries that a later definition or explicit import may replace.
    #[inline]
    fn is_provisional(self) -> bool {
        matches!(self, Status::Wildcard | Status::Ambiguous)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One live mapping: short name to full name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Entry {
    pub full_name: Name,
    pub status: Status,
}

impl Entry {
    #[inline]
    pub fn new(full_name: Name, status: Status) -> Self {
        Entry { full_name, status }
    }
}

/// What [`SymbolTable::define_full`] did.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DefineOutcome {
    /// New entry inserted.
    Inserted,
    /// Existing entry left as it was.
    Unchanged,
    /// Two wildcard imports collided; the entry is now ambiguous.
    MadeAmbiguous,
    /// A provisional entry was replaced.
    Overridden { previous: Entry },
}

/// Errors raised by the table itself.
///
/// The engine turns these into [`NamespaceError`](crate::NamespaceError)s
/// once it has the interner at hand to render names.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TableError {
    /// `define_full` refused the new mapping.
    Conflict {
        short: Name,
        existing: Entry,
        incoming: Entry,
    },
    /// A reference hit an ambiguous entry.
    Ambiguous { short: Name },
}

/// Mapping from short name to [`Entry`].
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    entries: FxHashMap<Name, Entry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `short -> full_name` with `status`, following the lattice.
    pub fn define_full(
        &mut self,
        short: Name,
        full_name: Name,
        status: Status,
    ) -> Result<DefineOutcome, TableError> {
        let incoming = Entry::new(full_name, status);
        let Some(existing) = self.entries.get(&short).copied() else {
            tracing::trace!(?short, ?full_name, %status, "entry inserted");
            self.entries.insert(short, incoming);
            return Ok(DefineOutcome::Inserted);
        };

        let outcome = match (existing.status, status) {
            (Status::Ambiguous, Status::Wildcard) => DefineOutcome::Unchanged,
            (Status::Wildcard, Status::Wildcard) => {
                tracing::trace!(?short, first = ?existing.full_name, second = ?full_name, "wildcard collision");
                self.set(short, Entry::new(existing.full_name, Status::Ambiguous));
                DefineOutcome::MadeAmbiguous
            }
            (Status::Defined, Status::Defined) if existing.full_name == full_name => {
                DefineOutcome::Unchanged
            }
            (old, _) if old.is_provisional() => {
                tracing::trace!(?short, from = %old, to = %status, "provisional entry overridden");
                self.set(short, incoming);
                DefineOutcome::Overridden { previous: existing }
            }
            _ => {
                return Err(TableError::Conflict {
                    short,
                    existing,
                    incoming,
                })
            }
        };
        Ok(outcome)
    }

    /// Install a `Defined` private mapping unless `short` is already `Defined`.
    ///
    /// Returns `Unchanged` for names that are already defined (exports or
    /// earlier private registrations). Any other existing status goes
    /// through the lattice, so an unused wildcard is overridden and an
    /// explicit import is a conflict.
    pub fn register_private_if_absent(
        &mut self,
        short: Name,
        private_full: Name,
    ) -> Result<DefineOutcome, TableError> {
        match self.entries.get(&short) {
            Some(entry) if entry.status == Status::Defined => Ok(DefineOutcome::Unchanged),
            _ => self.define_full(short, private_full, Status::Defined),
        }
    }

    /// Resolve a reference to `short`.
    ///
    /// `Ok(None)` when the name is unknown; an ambiguous entry is an error.
    /// A `Wildcard` entry is promoted to `WildcardUsed`.
    pub fn resolve(&mut self, short: Name) -> Result<Option<Name>, TableError> {
        let Some(entry) = self.entries.get_mut(&short) else {
            return Ok(None);
        };
        match entry.status {
            Status::Ambiguous => Err(TableError::Ambiguous { short }),
            Status::Wildcard => {
                tracing::trace!(?short, "wildcard import used");
                entry.status = Status::WildcardUsed;
                Ok(Some(entry.full_name))
            }
            Status::Defined | Status::Imported | Status::WildcardUsed => Ok(Some(entry.full_name)),
        }
    }

    /// Look up without resolving (no promotion, no ambiguity error).
    pub fn get(&self, short: Name) -> Option<Entry> {
        self.entries.get(&short).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Name, Entry)> + '_ {
        self.entries.iter().map(|(short, entry)| (*short, *entry))
    }

    /// Short names whose wildcard import was never referenced.
    pub fn unused_wildcards(&self) -> Vec<Name> {
        self.with_status(Status::Wildcard)
    }

    /// Short names left ambiguous.
    pub fn ambiguous(&self) -> Vec<Name> {
        self.with_status(Status::Ambiguous)
    }

    fn with_status(&self, status: Status) -> Vec<Name> {
        let mut names: Vec<Name> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.status == status)
            .map(|(short, _)| *short)
            .collect();
        names.sort_unstable();
        names
    }

    #[inline]
    fn set(&mut self, short: Name, entry: Entry) {
        self.entries.insert(short, entry);
    }
}
