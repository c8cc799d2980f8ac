//! Tree-shaped source forms.
//!
//! A [`Form`] is what the host's reader produces and what the engine
//! rewrites: atoms (symbols, integers, strings) and nested lists. Improper
//! lists (`(a b . c)`) are kept as [`Form::Dotted`] because import entries
//! use `(short . alias)` pairs.

use std::fmt;

use crate::{Name, StringInterner};

/// A parsed source form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Form {
    /// An identifier.
    Symbol(Name),
    /// Integer literal.
    Int(i64),
    /// String literal (already unescaped).
    Str(String),
    /// Proper list. The empty list is `nil`.
    List(Vec<Form>),
    /// Improper list: at least one head element plus a non-list tail.
    Dotted(Vec<Form>, Box<Form>),
}

impl Form {
    /// Build a two-element list `(head form)`, the shape of `quote` and `function`.
    pub fn wrap(head: Name, form: Form) -> Form {
        Form::List(vec![Form::Symbol(head), form])
    }

    /// Returns the symbol name if this form is an identifier.
    #[inline]
    pub fn as_symbol(&self) -> Option<Name> {
        match self {
            Form::Symbol(name) => Some(*name),
            _ => None,
        }
    }

    /// Returns the elements if this form is a proper list.
    #[inline]
    pub fn as_list(&self) -> Option<&[Form]> {
        match self {
            Form::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the head symbol of a non-empty proper list.
    pub fn head(&self) -> Option<Name> {
        self.as_list()?.first()?.as_symbol()
    }

    /// If this form is `(head x)`, returns `x`.
    ///
    /// Used to see through `'x` and `#'x` when looking for a literal target.
    pub fn unwrap_head(&self, head: Name) -> Option<&Form> {
        match self.as_list()? {
            [Form::Symbol(h), inner] if *h == head => Some(inner),
            _ => None,
        }
    }

    /// Display adapter that renders the form as s-expression text.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> FormDisplay<'a> {
        FormDisplay {
            form: self,
            interner,
        }
    }
}

/// Renders a [`Form`] back to source text.
///
/// `(quote x)` prints as `'x` and `(function x)` as `#'x`.
pub struct FormDisplay<'a> {
    form: &'a Form,
    interner: &'a StringInterner,
}

impl FormDisplay<'_> {
    fn with<'b>(&'b self, form: &'b Form) -> FormDisplay<'b> {
        FormDisplay {
            form,
            interner: self.interner,
        }
    }

    fn write_items(&self, f: &mut fmt::Formatter<'_>, items: &[Form]) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", self.with(item))?;
        }
        Ok(())
    }
}

impl fmt::Display for FormDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            Form::Symbol(name) => f.write_str(self.interner.lookup(*name)),
            Form::Int(value) => write!(f, "{value}"),
            Form::Str(text) => write_escaped(f, text),
            Form::List(items) => {
                if let [Form::Symbol(head), inner] = items.as_slice() {
                    match self.interner.lookup(*head) {
                        "quote" => return write!(f, "'{}", self.with(inner)),
                        "function" => return write!(f, "#'{}", self.with(inner)),
                        _ => {}
                    }
                }
                f.write_str("(")?;
                self.write_items(f, items)?;
                f.write_str(")")
            }
            Form::Dotted(items, tail) => {
                f.write_str("(")?;
                self.write_items(f, items)?;
                write!(f, " . {})", self.with(tail))
            }
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in text.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            other => write!(f, "{other}")?,
        }
    }
    f.write_str("\"")
}

#[cfg(test)]
mod tests;
