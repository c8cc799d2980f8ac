//! The declarative surface.
//!
//! ```text
//! (namespace NAME :export SYM)
//! (namespace NAME :export (SYM ...))
//! (import SOURCE [:symbols (ENTRY ...)] [:prefix PREFIX])   ; ENTRY = SYM | (SYM . ALIAS)
//! (declare-private SYM ...)
//! (provide 'NAME)
//! ```
//!
//! Names in head positions may be written bare or quoted. Keyword
//! arguments come in pairs; an unknown or repeated keyword is malformed.

use nsp_ir::{Form, Name, StringInterner};

use crate::config::Heads;
use crate::import::{ImportOptions, ImportSpec};
use crate::NamespaceError;

/// A parsed directive form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// Open a namespace exporting `exports`.
    OpenNamespace { name: Name, exports: Vec<Name> },
    /// Import from `source`.
    Import { source: Name, options: ImportOptions },
    /// Forward-declare private names.
    DeclarePrivate(Vec<Name>),
    /// The module-closing declaration.
    Close(Name),
}

impl Directive {
    /// Classify `form`.
    ///
    /// `Ok(None)` for anything that is not a directive. A form whose head
    /// is a directive but whose shape is wrong is an error.
    pub(crate) fn parse(
        form: &Form,
        heads: &Heads,
        interner: &StringInterner,
    ) -> Result<Option<Directive>, NamespaceError> {
        let Some(head) = form.head() else {
            return Ok(None);
        };
        if !heads.is_directive(head) {
            return Ok(None);
        }
        let parser = Parser {
            heads,
            interner,
            directive: head,
        };
        let args = form
            .as_list()
            .and_then(|items| items.get(1..))
            .unwrap_or_default();

        let directive = if head == heads.namespace {
            parser.namespace(args)?
        } else if head == heads.import {
            parser.import(args)?
        } else if head == heads.declare_private {
            parser.declare_private(args)?
        } else {
            parser.provide(args)?
        };
        Ok(Some(directive))
    }
}

struct Parser<'a> {
    heads: &'a Heads,
    interner: &'a StringInterner,
    directive: Name,
}

impl Parser<'_> {
    #[cold]
    fn malformed(&self, reason: impl Into<String>) -> NamespaceError {
        NamespaceError::MalformedDirective {
            directive: self.interner.lookup(self.directive).to_owned(),
            reason: reason.into(),
        }
    }

    /// A bare or quoted symbol.
    fn name(&self, form: &Form, what: &str) -> Result<Name, NamespaceError> {
        form.as_symbol()
            .or_else(|| form.unwrap_head(self.heads.quote)?.as_symbol())
            .ok_or_else(|| self.malformed(format!("{what} must be a symbol")))
    }

    /// Split `args` into keyword/value pairs, checking against `allowed`.
    fn keywords<'f>(
        &self,
        args: &'f [Form],
        allowed: &[Name],
    ) -> Result<Vec<(Name, &'f Form)>, NamespaceError> {
        let mut pairs: Vec<(Name, &Form)> = Vec::new();
        let mut rest = args;
        while let [key, tail @ ..] = rest {
            let Some(key) = key.as_symbol().filter(|k| allowed.contains(k)) else {
                return Err(self.malformed("unexpected argument; expected a keyword"));
            };
            let [value, tail @ ..] = tail else {
                return Err(self.malformed(format!(
                    "`{}` needs a value",
                    self.interner.lookup(key)
                )));
            };
            if pairs.iter().any(|(seen, _)| *seen == key) {
                return Err(self.malformed(format!(
                    "`{}` given more than once",
                    self.interner.lookup(key)
                )));
            }
            pairs.push((key, value));
            rest = tail;
        }
        Ok(pairs)
    }

    fn namespace(&self, args: &[Form]) -> Result<Directive, NamespaceError> {
        let [name, rest @ ..] = args else {
            return Err(self.malformed("missing namespace name"));
        };
        let name = self.name(name, "namespace name")?;
        let mut exports = Vec::new();
        for (_, value) in self.keywords(rest, &[self.heads.kw_export])? {
            exports = self.symbol_list(value, ":export")?;
        }
        Ok(Directive::OpenNamespace { name, exports })
    }

    /// `SYM`, `(SYM ...)`, `()` or `nil`.
    fn symbol_list(&self, form: &Form, what: &str) -> Result<Vec<Name>, NamespaceError> {
        match form {
            Form::Symbol(name) if *name == self.heads.nil => Ok(Vec::new()),
            Form::Symbol(name) => Ok(vec![*name]),
            Form::List(items) => items
                .iter()
                .map(|item| {
                    item.as_symbol()
                        .ok_or_else(|| self.malformed(format!("{what} entries must be symbols")))
                })
                .collect(),
            _ => Err(self.malformed(format!("{what} must be a symbol or a list of symbols"))),
        }
    }

    fn import(&self, args: &[Form]) -> Result<Directive, NamespaceError> {
        let [source, rest @ ..] = args else {
            return Err(self.malformed("missing import source"));
        };
        let source = self.name(source, "import source")?;
        let mut options = ImportOptions::wildcard();
        let allowed = [self.heads.kw_symbols, self.heads.kw_prefix];
        for (key, value) in self.keywords(rest, &allowed)? {
            if key == self.heads.kw_prefix {
                options.prefix = Some(self.name(value, ":prefix")?);
            } else {
                options.symbols = Some(self.import_specs(value)?);
            }
        }
        Ok(Directive::Import { source, options })
    }

    fn import_specs(&self, form: &Form) -> Result<Vec<ImportSpec>, NamespaceError> {
        let items: &[Form] = match form {
            Form::List(items) => items,
            Form::Symbol(name) if *name == self.heads.nil => &[],
            _ => return Err(self.malformed(":symbols must be a list")),
        };
        items.iter().map(|item| self.import_spec(item)).collect()
    }

    fn import_spec(&self, form: &Form) -> Result<ImportSpec, NamespaceError> {
        match form {
            Form::Symbol(name) => Ok(ImportSpec::Bare(*name)),
            Form::Dotted(head, tail) => match (head.as_slice(), tail.as_ref()) {
                ([Form::Symbol(source)], Form::Symbol(local)) => Ok(ImportSpec::Aliased {
                    source: *source,
                    local: *local,
                }),
                _ => Err(self.malformed("aliased entries look like (NAME . ALIAS)")),
            },
            _ => Err(self.malformed(":symbols entries must be NAME or (NAME . ALIAS)")),
        }
    }

    fn declare_private(&self, args: &[Form]) -> Result<Directive, NamespaceError> {
        if args.is_empty() {
            return Err(self.malformed("expected at least one name"));
        }
        let names = args
            .iter()
            .map(|arg| self.name(arg, "declared name"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Directive::DeclarePrivate(names))
    }

    fn provide(&self, args: &[Form]) -> Result<Directive, NamespaceError> {
        match args {
            [name] => Ok(Directive::Close(self.name(name, "feature name")?)),
            _ => Err(self.malformed("expected exactly one feature name")),
        }
    }
}
