//! Runtime values.

use std::fmt;
use std::rc::Rc;

use nsp_engine::Module;
use nsp_ir::{Form, Name, StringInterner};

/// A user-defined function: parameters plus body, with the lexical
/// bindings visible where it was created.
#[derive(Clone, Debug, PartialEq)]
pub struct Lambda {
    pub params: Vec<Name>,
    pub body: Vec<Form>,
    pub captured: Vec<(Name, Value)>,
}

/// Built-in functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Builtin {
    Add,
    Sub,
    Mul,
    NumEq,
    Less,
    List,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "+" => Builtin::Add,
            "-" => Builtin::Sub,
            "*" => Builtin::Mul,
            "=" => Builtin::NumEq,
            "<" => Builtin::Less,
            "list" => Builtin::List,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::NumEq => "=",
            Builtin::Less => "<",
            Builtin::List => "list",
        }
    }
}

/// Contents of a function cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Function {
    Lambda(Rc<Lambda>),
    Builtin(Builtin),
    /// Indirection to another symbol's function cell (`defalias 'a 'b`).
    Alias(Name),
}

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
    Symbol(Name),
    List(Vec<Value>),
    /// Quoted improper list, kept as written.
    Data(Form),
    Function(Function),
    /// A namespace module bound under its name.
    Module(Module),
}

impl Value {
    /// Convert quoted data.
    pub fn from_form(form: &Form) -> Value {
        match form {
            Form::Symbol(name) => Value::Symbol(*name),
            Form::Int(value) => Value::Int(*value),
            Form::Str(text) => Value::Str(text.clone()),
            Form::List(items) => Value::List(items.iter().map(Value::from_form).collect()),
            Form::Dotted(..) => Value::Data(form.clone()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::List(_) | Value::Data(_) => "list",
            Value::Function(_) => "function",
            Value::Module(_) => "module",
        }
    }

    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> ValueDisplay<'a> {
        ValueDisplay {
            value: self,
            interner,
        }
    }
}

/// Renders a [`Value`] as it would be printed.
pub struct ValueDisplay<'a> {
    value: &'a Value,
    interner: &'a StringInterner,
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = self.interner;
        match self.value {
            Value::Int(value) => write!(f, "{value}"),
            Value::Str(text) => write!(f, "{}", Form::Str(text.clone()).display(interner)),
            Value::Symbol(name) => f.write_str(interner.lookup(*name)),
            Value::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item.display(interner))?;
                }
                f.write_str(")")
            }
            Value::Data(form) => write!(f, "{}", form.display(interner)),
            Value::Function(Function::Lambda(lambda)) => {
                let params: Vec<&str> = lambda.params.iter().map(|p| interner.lookup(*p)).collect();
                write!(f, "#<lambda ({})>", params.join(" "))
            }
            Value::Function(Function::Builtin(builtin)) => {
                write!(f, "#<builtin {}>", builtin.as_str())
            }
            Value::Function(Function::Alias(target)) => {
                write!(f, "#<alias {}>", interner.lookup(*target))
            }
            Value::Module(module) => {
                let exports: Vec<&str> = module.exports().iter().map(|e| interner.lookup(*e)).collect();
                write!(
                    f,
                    "#<module {} ({})>",
                    interner.lookup(module.prefix()),
                    exports.join(" ")
                )
            }
        }
    }
}
