//! Mutable form visitor.
//!
//! Depth-first, left-to-right traversal over a [`Form`] tree with in-place
//! access to every symbol position. Override `visit_*` methods for custom
//! behavior at specific nodes and call [`walk_form_mut`] to continue into
//! children.
//!
//! Traversal is fallible: the first error returned by a `visit_*` method
//! stops the walk and leaves the remaining positions untouched.

use nsp_stack::ensure_sufficient_stack;

use crate::{Form, Name};

/// In-place form visitor.
pub trait FormVisitorMut {
    /// Error that aborts the traversal.
    type Error;

    /// Visit any form. Default walks into children.
    fn visit_form(&mut self, form: &mut Form) -> Result<(), Self::Error> {
        walk_form_mut(self, form)
    }

    /// Visit one identifier position.
    fn visit_symbol(&mut self, name: &mut Name) -> Result<(), Self::Error> {
        let _ = name;
        Ok(())
    }
}

/// Walk the children of `form`, dispatching symbols to `visit_symbol`.
pub fn walk_form_mut<V: FormVisitorMut + ?Sized>(
    visitor: &mut V,
    form: &mut Form,
) -> Result<(), V::Error> {
    ensure_sufficient_stack(|| match form {
        Form::Symbol(name) => visitor.visit_symbol(name),
        Form::Int(_) | Form::Str(_) => Ok(()),
        Form::List(items) => {
            for item in items {
                visitor.visit_form(item)?;
            }
            Ok(())
        }
        Form::Dotted(items, tail) => {
            for item in items {
                visitor.visit_form(item)?;
            }
            visitor.visit_form(tail)
        }
    })
}
