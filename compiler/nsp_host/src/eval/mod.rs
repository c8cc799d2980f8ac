//! A small evaluator, just enough to run namespaced units.
//!
//! Symbols have separate value and function cells, as in the Lisp family
//! the directive surface comes from. Lexical bindings (`let`, lambda
//! parameters) shadow global values; closures copy the bindings visible
//! where they were created.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use nsp_ir::{Form, Name, SharedInterner};
use nsp_stack::ensure_sufficient_stack;

use crate::error::{
    arg_count, malformed, overflow, void_function, void_variable, wrong_type, EvalError,
};
use crate::registry::Registry;
use crate::value::{Builtin, Function, Lambda, Value};

/// Longest `defalias` chain followed before giving up.
const MAX_ALIAS_DEPTH: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Special {
    Quote,
    Function,
    Progn,
    If,
    Let,
    Lambda,
    Defvar,
    Defconst,
    Defun,
    Defalias,
    Setq,
    Funcall,
}

/// Lexical bindings, innermost last.
#[derive(Clone, Debug, Default)]
struct Env {
    bindings: Vec<(Name, Value)>,
}

impl Env {
    fn lookup(&self, name: Name) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| value)
    }

    /// Assign an existing lexical binding. Returns `false` if there is none.
    fn assign(&mut self, name: Name, value: &Value) -> bool {
        match self.bindings.iter_mut().rev().find(|(bound, _)| *bound == name) {
            Some((_, slot)) => {
                *slot = value.clone();
                true
            }
            None => false,
        }
    }
}

/// Evaluator plus the global registry it writes to.
pub struct Interpreter {
    interner: SharedInterner,
    registry: Registry,
    specials: FxHashMap<Name, Special>,
    nil: Name,
    t: Name,
    lambda: Name,
}

impl Interpreter {
    pub fn new(interner: SharedInterner) -> Self {
        let specials = [
            ("quote", Special::Quote),
            ("function", Special::Function),
            ("progn", Special::Progn),
            ("if", Special::If),
            ("let", Special::Let),
            ("lambda", Special::Lambda),
            ("defvar", Special::Defvar),
            ("defcustom", Special::Defvar),
            ("defconst", Special::Defconst),
            ("defun", Special::Defun),
            ("defmacro", Special::Defun),
            ("defsubst", Special::Defun),
            ("defalias", Special::Defalias),
            ("fset", Special::Defalias),
            ("setq", Special::Setq),
            ("funcall", Special::Funcall),
        ]
        .into_iter()
        .map(|(text, special)| (interner.intern(text), special))
        .collect();
        Interpreter {
            nil: interner.intern("nil"),
            t: interner.intern("t"),
            lambda: interner.intern("lambda"),
            specials,
            registry: Registry::new(),
            interner,
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Evaluate a top-level form.
    pub fn eval(&mut self, form: &Form) -> Result<Value, EvalError> {
        self.eval_in(form, &mut Env::default())
    }

    /// Call the function named `name` with already-evaluated arguments.
    pub fn call(&mut self, name: Name, args: Vec<Value>) -> Result<Value, EvalError> {
        let function = self.resolve_function(name)?;
        self.apply(&function, args, self.interner.lookup(name))
    }

    pub fn nil(&self) -> Value {
        Value::Symbol(self.nil)
    }

    fn boolean(&self, value: bool) -> Value {
        Value::Symbol(if value { self.t } else { self.nil })
    }

    fn is_true(&self, value: &Value) -> bool {
        match value {
            Value::Symbol(name) => *name != self.nil,
            Value::List(items) => !items.is_empty(),
            _ => true,
        }
    }

    fn text(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    fn eval_in(&mut self, form: &Form, env: &mut Env) -> Result<Value, EvalError> {
        ensure_sufficient_stack(|| match form {
            Form::Int(value) => Ok(Value::Int(*value)),
            Form::Str(text) => Ok(Value::Str(text.clone())),
            Form::Symbol(name) => self.variable(*name, env),
            Form::Dotted(..) => Err(malformed("dotted list", "cannot be evaluated")),
            Form::List(items) => match items.split_first() {
                None => Ok(self.nil()),
                Some((head, args)) => self.eval_call(head, args, env),
            },
        })
    }

    fn eval_body(&mut self, body: &[Form], env: &mut Env) -> Result<Value, EvalError> {
        let mut last = self.nil();
        for form in body {
            last = self.eval_in(form, env)?;
        }
        Ok(last)
    }

    fn eval_args(&mut self, args: &[Form], env: &mut Env) -> Result<Vec<Value>, EvalError> {
        args.iter().map(|arg| self.eval_in(arg, env)).collect()
    }

    fn variable(&self, name: Name, env: &Env) -> Result<Value, EvalError> {
        let text = self.text(name);
        if name == self.nil || name == self.t || text.starts_with(':') {
            return Ok(Value::Symbol(name));
        }
        env.lookup(name)
            .or_else(|| self.registry.value(name))
            .cloned()
            .ok_or_else(|| void_variable(text))
    }

    fn eval_call(&mut self, head: &Form, args: &[Form], env: &mut Env) -> Result<Value, EvalError> {
        match head {
            Form::Symbol(name) => {
                if let Some(&special) = self.specials.get(name) {
                    return self.eval_special(special, *name, args, env);
                }
                let function = self.resolve_function(*name)?;
                let values = self.eval_args(args, env)?;
                self.apply(&function, values, self.text(*name))
            }
            Form::List(items) if head.head() == Some(self.lambda) => {
                let lambda = self.make_lambda(items.get(1..).unwrap_or_default(), env)?;
                let values = self.eval_args(args, env)?;
                self.apply(&lambda, values, "lambda")
            }
            _ => Err(wrong_type("function", head.display(&self.interner).to_string())),
        }
    }

    /// Follow aliases to a callable function.
    fn resolve_function(&self, name: Name) -> Result<Function, EvalError> {
        let mut current = name;
        for _ in 0..MAX_ALIAS_DEPTH {
            match self.registry.function(current) {
                Some(Function::Alias(target)) => current = *target,
                Some(function) => return Ok(function.clone()),
                None => {
                    return Builtin::from_name(self.text(current))
                        .map(Function::Builtin)
                        .ok_or_else(|| void_function(self.text(name)));
                }
            }
        }
        Err(void_function(self.text(name)))
    }

    fn apply(&mut self, function: &Function, args: Vec<Value>, label: &str) -> Result<Value, EvalError> {
        match function {
            Function::Builtin(builtin) => self.call_builtin(*builtin, args),
            Function::Alias(target) => {
                let resolved = self.resolve_function(*target)?;
                self.apply(&resolved, args, label)
            }
            Function::Lambda(lambda) => {
                if lambda.params.len() != args.len() {
                    return Err(arg_count(label, lambda.params.len(), args.len()));
                }
                let mut env = Env {
                    bindings: lambda.captured.clone(),
                };
                env.bindings.extend(lambda.params.iter().copied().zip(args));
                self.eval_body(&lambda.body, &mut env)
            }
        }
    }

    fn call_builtin(&self, builtin: Builtin, args: Vec<Value>) -> Result<Value, EvalError> {
        let op = builtin.as_str();
        match builtin {
            Builtin::List => Ok(Value::List(args)),
            Builtin::Add => int_args(&args)?
                .iter()
                .try_fold(0i64, |acc, v| acc.checked_add(*v))
                .map(Value::Int)
                .ok_or_else(|| overflow(op)),
            Builtin::Mul => int_args(&args)?
                .iter()
                .try_fold(1i64, |acc, v| acc.checked_mul(*v))
                .map(Value::Int)
                .ok_or_else(|| overflow(op)),
            Builtin::Sub => match int_args(&args)?.split_first() {
                None => Ok(Value::Int(0)),
                Some((first, [])) => first
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| overflow(op)),
                Some((first, rest)) => rest
                    .iter()
                    .try_fold(*first, |acc, v| acc.checked_sub(*v))
                    .map(Value::Int)
                    .ok_or_else(|| overflow(op)),
            },
            Builtin::NumEq | Builtin::Less => {
                let ints = int_args(&args)?;
                if ints.is_empty() {
                    return Err(arg_count(op, 1, 0));
                }
                let holds = ints.windows(2).all(|pair| match builtin {
                    Builtin::Less => pair[0] < pair[1],
                    _ => pair[0] == pair[1],
                });
                Ok(self.boolean(holds))
            }
        }
    }

    fn symbol_arg(&self, form: Option<&Form>, special: Name, what: &'static str) -> Result<Name, EvalError> {
        form.and_then(Form::as_symbol)
            .ok_or_else(|| malformed(self.text(special), what))
    }

    fn make_lambda(&self, spec: &[Form], env: &Env) -> Result<Function, EvalError> {
        let Some((params, body)) = spec.split_first() else {
            return Err(malformed("lambda", "missing parameter list"));
        };
        let params = self.param_list(params, "lambda")?;
        Ok(Function::Lambda(Rc::new(Lambda {
            params,
            body: body.to_vec(),
            captured: env.bindings.clone(),
        })))
    }

    fn param_list(&self, form: &Form, special: &str) -> Result<Vec<Name>, EvalError> {
        match form {
            Form::Symbol(name) if *name == self.nil => Ok(Vec::new()),
            Form::List(items) => items
                .iter()
                .map(|item| {
                    item.as_symbol()
                        .ok_or_else(|| malformed(special, "parameters must be symbols"))
                })
                .collect(),
            _ => Err(malformed(special, "parameter list must be a list")),
        }
    }

    fn eval_special(
        &mut self,
        special: Special,
        head: Name,
        args: &[Form],
        env: &mut Env,
    ) -> Result<Value, EvalError> {
        let name = self.text(head);
        match special {
            Special::Quote => match args {
                [quoted] => Ok(Value::from_form(quoted)),
                _ => Err(malformed(name, "takes exactly one form")),
            },
            Special::Function => match args {
                [Form::Symbol(symbol)] => Ok(Value::Symbol(*symbol)),
                [form @ Form::List(items)] if form.head() == Some(self.lambda) => Ok(Value::Function(
                    self.make_lambda(items.get(1..).unwrap_or_default(), env)?,
                )),
                _ => Err(malformed(name, "takes a symbol or a lambda")),
            },
            Special::Progn => self.eval_body(args, env),
            Special::If => match args {
                [test, then, otherwise @ ..] => {
                    if self.eval_in(test, env).map(|v| self.is_true(&v))? {
                        self.eval_in(then, env)
                    } else {
                        self.eval_body(otherwise, env)
                    }
                }
                _ => Err(malformed(name, "needs a test and a then-branch")),
            },
            Special::Let => {
                let Some((bindings, body)) = args.split_first() else {
                    return Err(malformed(name, "missing binding list"));
                };
                let bindings: &[Form] = match bindings {
                    Form::List(items) => items,
                    Form::Symbol(sym) if *sym == self.nil => &[],
                    _ => return Err(malformed(name, "binding list must be a list")),
                };
                let mut values = Vec::with_capacity(bindings.len());
                for binding in bindings {
                    let (var, init) = match binding {
                        Form::Symbol(var) => (*var, None),
                        Form::List(items) => match items.as_slice() {
                            [Form::Symbol(var)] => (*var, None),
                            [Form::Symbol(var), init] => (*var, Some(init)),
                            _ => return Err(malformed(name, "bindings look like (VAR VALUE)")),
                        },
                        _ => return Err(malformed(name, "bindings look like (VAR VALUE)")),
                    };
                    let value = match init {
                        Some(init) => self.eval_in(init, env)?,
                        None => self.nil(),
                    };
                    values.push((var, value));
                }
                let depth = env.bindings.len();
                env.bindings.extend(values);
                let result = self.eval_body(body, env);
                env.bindings.truncate(depth);
                result
            }
            Special::Lambda => Ok(Value::Function(self.make_lambda(args, env)?)),
            Special::Defvar => {
                let symbol = self.symbol_arg(args.first(), head, "needs a symbol to define")?;
                if let Some(init) = args.get(1) {
                    if !self.registry.has_value(symbol) {
                        let value = self.eval_in(init, env)?;
                        self.registry.set_value(symbol, value);
                    }
                }
                Ok(Value::Symbol(symbol))
            }
            Special::Defconst => {
                let symbol = self.symbol_arg(args.first(), head, "needs a symbol to define")?;
                let Some(init) = args.get(1) else {
                    return Err(malformed(name, "needs a value"));
                };
                let value = self.eval_in(init, env)?;
                self.registry.set_value(symbol, value);
                Ok(Value::Symbol(symbol))
            }
            Special::Defun => {
                let symbol = self.symbol_arg(args.first(), head, "needs a symbol to define")?;
                let Some(params) = args.get(1) else {
                    return Err(malformed(name, "missing parameter list"));
                };
                let params = self.param_list(params, name)?;
                let lambda = Lambda {
                    params,
                    body: args.get(2..).unwrap_or_default().to_vec(),
                    captured: Vec::new(),
                };
                self.registry.set_function(symbol, Function::Lambda(Rc::new(lambda)));
                Ok(Value::Symbol(symbol))
            }
            Special::Defalias => {
                let [target, definition, ..] = args else {
                    return Err(malformed(name, "needs a symbol and a definition"));
                };
                let symbol = match self.eval_in(target, env)? {
                    Value::Symbol(symbol) => symbol,
                    other => return Err(wrong_type("symbol", other.type_name())),
                };
                let function = match self.eval_in(definition, env)? {
                    Value::Symbol(alias) => Function::Alias(alias),
                    Value::Function(function) => function,
                    other => return Err(wrong_type("function", other.type_name())),
                };
                self.registry.set_function(symbol, function);
                Ok(Value::Symbol(symbol))
            }
            Special::Setq => {
                if args.len() % 2 != 0 {
                    return Err(malformed(name, "needs an even number of arguments"));
                }
                let mut last = self.nil();
                for pair in args.chunks_exact(2) {
                    let symbol = self.symbol_arg(pair.first(), head, "can only assign symbols")?;
                    let value = match pair.get(1) {
                        Some(init) => self.eval_in(init, env)?,
                        None => self.nil(),
                    };
                    if !env.assign(symbol, &value) {
                        self.registry.set_value(symbol, value.clone());
                    }
                    last = value;
                }
                Ok(last)
            }
            Special::Funcall => {
                let Some((callee, rest)) = args.split_first() else {
                    return Err(malformed(name, "needs a function"));
                };
                let (function, label) = match self.eval_in(callee, env)? {
                    Value::Symbol(symbol) => (self.resolve_function(symbol)?, self.text(symbol)),
                    Value::Function(function) => (function, "lambda"),
                    other => return Err(wrong_type("function", other.type_name())),
                };
                let values = self.eval_args(rest, env)?;
                self.apply(&function, values, label)
            }
        }
    }
}

fn int_args(args: &[Value]) -> Result<Vec<i64>, EvalError> {
    args.iter()
        .map(|arg| match arg {
            Value::Int(value) => Ok(*value),
            other => Err(wrong_type("integer", other.type_name())),
        })
        .collect()
}

#[cfg(test)]
mod tests;
