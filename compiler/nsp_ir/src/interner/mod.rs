//! Sharded string interner for identifier storage.
//!
//! Provides O(1) interning and lookup. The engine and the host share one
//! interner so that a `Name` produced while reading a unit compares equal to
//! the same `Name` produced while building a prefixed full name.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Per-shard storage for interned strings.
struct InternShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Shard exceeded capacity.
    ShardOverflow { shard_idx: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "interner shard {shard_idx} exceeded capacity: {count} strings, max is {}",
                Name::MAX_LOCAL
            ),
        }
    }
}

impl std::error::Error for InternError {}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        // Pre-intern empty string at index 0
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Sharded string interner.
///
/// Uses `RwLock` per shard so that a [`SharedInterner`] handle can be held
/// by the engine and the host at the same time.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    /// Total count of interned strings across all shards.
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new interner with the well-known heads pre-interned.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });

        let interner = Self {
            shards,
            total_count: AtomicUsize::new(1),
        };
        interner.pre_intern_heads();
        interner
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(name) = self.get(s) {
            return Ok(name);
        }
        self.insert(s)
    }

    /// Try to intern an owned String without re-allocating it.
    pub fn try_intern_owned(&self, s: String) -> Result<Name, InternError> {
        if let Some(name) = self.get(&s) {
            return Ok(name);
        }
        self.insert(s)
    }

    /// Look up a string without interning it.
    ///
    /// Returns `None` when the string has never been interned.
    pub fn get(&self, s: &str) -> Option<Name> {
        let shard_idx = Self::shard_for(s);
        let guard = self.shards[shard_idx].read();
        guard
            .map
            .get(s)
            .map(|&local| Name::new(shard_u32(shard_idx), local))
    }

    /// Insert under the write lock. `s` is only boxed once it is known to be new.
    fn insert<S>(&self, s: S) -> Result<Name, InternError>
    where
        S: AsRef<str> + Into<Box<str>>,
    {
        let shard_idx = Self::shard_for(s.as_ref());
        let mut guard = self.shards[shard_idx].write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(s.as_ref()) {
            return Ok(Name::new(shard_u32(shard_idx), local));
        }

        let count = guard.strings.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&local| local <= Name::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow { shard_idx, count })?;

        let leaked: &'static str = Box::leak(s.into());
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);
        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_u32(shard_idx), local))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern` for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Intern an owned String, avoiding a second allocation.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity.
    pub fn intern_owned(&self, s: String) -> Name {
        self.try_intern_owned(s).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Look up the string for a Name.
    ///
    /// Interned strings are leaked, so the returned reference is `'static`.
    pub fn lookup(&self, name: Name) -> &'static str {
        let guard = self.shards[name.shard()].read();
        guard.strings[name.local()]
    }

    /// Pre-intern the special-form and directive heads every unit uses.
    fn pre_intern_heads(&self) {
        const HEADS: &[&str] = &[
            "nil",
            "t",
            "quote",
            "function",
            "lambda",
            "progn",
            "if",
            "let",
            "setq",
            "funcall",
            "defvar",
            "defconst",
            "defun",
            "defmacro",
            "defsubst",
            "defcustom",
            "defalias",
            "fset",
            "namespace",
            "import",
            "declare-private",
            "provide",
            ":export",
            ":symbols",
            ":prefix",
            ".",
        ];

        for head in HEADS {
            self.intern(head);
        }
    }

    /// Get the number of interned strings.
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the interner is empty (only has the empty string).
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "shard index is bounded by NUM_SHARDS (16)"
)]
fn shard_u32(shard_idx: usize) -> u32 {
    shard_idx as u32
}

/// Shared interner handle.
///
/// The engine and the host each hold a clone; all `Name` values they
/// exchange come from the same underlying table.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
