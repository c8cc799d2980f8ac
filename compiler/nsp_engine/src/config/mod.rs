//! Engine configuration.
//!
//! [`EngineConfig`] holds the textual knobs (separator, definition heads,
//! directive heads). The engine interns them once into [`Heads`] so the
//! per-form hot path compares `Name`s only.

use rustc_hash::FxHashSet;

use nsp_ir::{Name, StringInterner};

/// Default separator between a namespace prefix and a short name.
pub const DEFAULT_SEPARATOR: &str = "-";

/// Heads of definition forms the load-pipeline hook recognizes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definers {
    /// `(HEAD name ...)`: the second element is the introduced name.
    pub direct: Vec<String>,
    /// `(HEAD 'name ...)`: the second element must be a quoted literal name.
    pub quoted_target: Vec<String>,
}

impl Default for Definers {
    fn default() -> Self {
        Definers {
            direct: ["defvar", "defconst", "defun", "defmacro", "defsubst", "defcustom"]
                .map(String::from)
                .to_vec(),
            quoted_target: ["defalias", "fset"].map(String::from).to_vec(),
        }
    }
}

/// Head symbols of the declarative surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveNames {
    pub namespace: String,
    pub import: String,
    pub declare_private: String,
    pub provide: String,
}

impl Default for DirectiveNames {
    fn default() -> Self {
        DirectiveNames {
            namespace: "namespace".into(),
            import: "import".into(),
            declare_private: "declare-private".into(),
            provide: "provide".into(),
        }
    }
}

/// Engine configuration.
///
/// # Example
///
/// ```
/// use nsp_engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_separator("/")
///     .with_direct_definer("define-inline");
/// assert_eq!(config.separator, "/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Joins prefix and short name. Must be non-empty.
    pub separator: String,
    pub definers: Definers,
    pub directives: DirectiveNames,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            separator: DEFAULT_SEPARATOR.into(),
            definers: Definers::default(),
            directives: DirectiveNames::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub fn with_direct_definer(mut self, head: impl Into<String>) -> Self {
        self.definers.direct.push(head.into());
        self
    }

    #[must_use]
    pub fn with_quoted_definer(mut self, head: impl Into<String>) -> Self {
        self.definers.quoted_target.push(head.into());
        self
    }

    #[must_use]
    pub fn with_directives(mut self, directives: DirectiveNames) -> Self {
        self.directives = directives;
        self
    }

    /// The separator actually used; an empty one falls back to the default.
    pub fn effective_separator(&self) -> &str {
        if self.separator.is_empty() {
            DEFAULT_SEPARATOR
        } else {
            &self.separator
        }
    }
}

/// Interned view of an [`EngineConfig`] plus the fixed keyword heads.
#[derive(Clone, Debug)]
pub(crate) struct Heads {
    pub quote: Name,
    pub direct_definers: FxHashSet<Name>,
    pub quoted_definers: FxHashSet<Name>,
    pub namespace: Name,
    pub import: Name,
    pub declare_private: Name,
    pub provide: Name,
    pub nil: Name,
    pub kw_export: Name,
    pub kw_symbols: Name,
    pub kw_prefix: Name,
}

impl Heads {
    pub(crate) fn resolve(config: &EngineConfig, interner: &StringInterner) -> Self {
        let intern_all = |heads: &[String]| -> FxHashSet<Name> {
            heads.iter().map(|head| interner.intern(head)).collect()
        };
        let directives = &config.directives;
        Heads {
            quote: interner.intern("quote"),
            direct_definers: intern_all(&config.definers.direct),
            quoted_definers: intern_all(&config.definers.quoted_target),
            namespace: interner.intern(&directives.namespace),
            import: interner.intern(&directives.import),
            declare_private: interner.intern(&directives.declare_private),
            provide: interner.intern(&directives.provide),
            nil: interner.intern("nil"),
            kw_export: interner.intern(":export"),
            kw_symbols: interner.intern(":symbols"),
            kw_prefix: interner.intern(":prefix"),
        }
    }

    pub(crate) fn is_directive(&self, head: Name) -> bool {
        head == self.namespace
            || head == self.import
            || head == self.declare_private
            || head == self.provide
    }
}
