use super::*;
use crate::error::EvalErrorKind;
use crate::reader::read_all;
use pretty_assertions::assert_eq;

struct Fixture {
    interp: Interpreter,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            interp: Interpreter::new(SharedInterner::default()),
        }
    }

    /// Evaluate every form, returning the printed value of the last.
    fn run(&mut self, source: &str) -> Result<String, EvalError> {
        let interner = self.interp.interner().clone();
        let forms = read_all(source, &interner).unwrap();
        let mut last = self.interp.nil();
        for form in &forms {
            last = self.interp.eval(form)?;
        }
        Ok(last.display(&interner).to_string())
    }

    fn ok(&mut self, source: &str) -> String {
        self.run(source).unwrap()
    }

    fn err(&mut self, source: &str) -> EvalErrorKind {
        self.run(source).unwrap_err().kind
    }
}

#[test]
fn test_literals_and_builtins() {
    let mut fx = Fixture::new();
    assert_eq!(fx.ok("42"), "42");
    assert_eq!(fx.ok("\"hi\""), "\"hi\"");
    assert_eq!(fx.ok("(+ 1 2 3)"), "6");
    assert_eq!(fx.ok("(- 10 3 2)"), "5");
    assert_eq!(fx.ok("(- 4)"), "-4");
    assert_eq!(fx.ok("(* 2 3 4)"), "24");
    assert_eq!(fx.ok("(= 2 2 2)"), "t");
    assert_eq!(fx.ok("(< 1 2 2)"), "nil");
    assert_eq!(fx.ok("(list 1 'a \"s\")"), "(1 a \"s\")");
    assert_eq!(fx.ok("()"), "nil");
    assert_eq!(fx.ok(":keyword"), ":keyword");
}

#[test]
fn test_quote_and_function() {
    let mut fx = Fixture::new();
    assert_eq!(fx.ok("'(a (b . c))"), "(a (b . c))");
    assert_eq!(fx.ok("#'car"), "car");
    assert_eq!(fx.ok("#'(lambda (x) x)"), "#<lambda (x)>");
}

#[test]
fn test_defvar_only_sets_unbound() {
    let mut fx = Fixture::new();
    assert_eq!(fx.ok("(defvar x 1) (defvar x 2) x"), "1");
    assert_eq!(fx.ok("(defconst y 1) (defconst y 2) y"), "2");
    assert_eq!(fx.ok("(setq x 5) x"), "5");
}

#[test]
fn test_defun_and_calls() {
    let mut fx = Fixture::new();
    fx.ok("(defun add1 (n) (+ n 1))");
    assert_eq!(fx.ok("(add1 41)"), "42");
    assert_eq!(fx.ok("(funcall #'add1 1)"), "2");
    assert_eq!(fx.ok("(funcall (lambda (a b) (* a b)) 6 7)"), "42");
    assert_eq!(fx.ok("((lambda () 9))"), "9");
}

#[test]
fn test_recursion() {
    let mut fx = Fixture::new();
    fx.ok("(defun fact (n) (if (< n 2) 1 (* n (fact (- n 1)))))");
    assert_eq!(fx.ok("(fact 10)"), "3628800");
}

#[test]
fn test_let_scoping_and_closures() {
    let mut fx = Fixture::new();
    assert_eq!(fx.ok("(let ((a 1) (b 2)) (+ a b))"), "3");
    assert_eq!(fx.ok("(let (a) a)"), "nil");
    assert_eq!(fx.ok("(defvar g 10) (let ((g 1)) (setq g 2)) g"), "10");
    assert_eq!(
        fx.ok("(defvar f (let ((k 5)) (lambda (x) (+ x k)))) (funcall f 1)"),
        "6"
    );
    assert_eq!(
        fx.err("(let ((z 1)) z) z"),
        EvalErrorKind::VoidVariable { name: "z".into() }
    );
}

#[test]
fn test_aliases() {
    let mut fx = Fixture::new();
    fx.ok("(defun base (x) (* x 2))");
    fx.ok("(defalias 'twice 'base)");
    fx.ok("(fset 'plus #'+)");
    fx.ok("(defalias 'anon (lambda () 7))");
    assert_eq!(fx.ok("(twice 4)"), "8");
    assert_eq!(fx.ok("(plus 1 2)"), "3");
    assert_eq!(fx.ok("(anon)"), "7");

    fx.ok("(defalias 'loop-a 'loop-b) (defalias 'loop-b 'loop-a)");
    assert_eq!(
        fx.err("(loop-a)"),
        EvalErrorKind::VoidFunction {
            name: "loop-a".into()
        }
    );
}

#[test]
fn test_errors() {
    let mut fx = Fixture::new();
    assert_eq!(
        fx.err("nope"),
        EvalErrorKind::VoidVariable {
            name: "nope".into()
        }
    );
    assert_eq!(
        fx.err("(nope)"),
        EvalErrorKind::VoidFunction {
            name: "nope".into()
        }
    );
    assert_eq!(
        fx.err("(+ 1 \"a\")"),
        EvalErrorKind::WrongType {
            expected: "integer",
            got: "string".into()
        }
    );
    assert_eq!(
        fx.err("(defun one (a) a) (one)"),
        EvalErrorKind::ArgCount {
            function: "one".into(),
            expected: 1,
            got: 0
        }
    );
    assert_eq!(
        fx.err("(* 9223372036854775807 2)"),
        EvalErrorKind::Overflow { operation: "*" }
    );
    assert!(matches!(
        fx.err("(let x)"),
        EvalErrorKind::MalformedForm { .. }
    ));
    assert!(matches!(
        fx.err("(setq a)"),
        EvalErrorKind::MalformedForm { .. }
    ));
    assert!(matches!(
        fx.err("(1 2)"),
        EvalErrorKind::WrongType { .. }
    ));
}

#[test]
fn test_call_by_name() {
    let mut fx = Fixture::new();
    fx.ok("(defun pair (a b) (list a b))");
    let name = fx.interp.interner().intern("pair");
    assert_eq!(
        fx.interp.call(name, vec![Value::Int(1), Value::Int(2)]),
        Ok(Value::List(vec![Value::Int(1), Value::Int(2)]))
    );
}
