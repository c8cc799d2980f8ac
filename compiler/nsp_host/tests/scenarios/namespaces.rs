use nsp_engine::EngineConfig;
use pretty_assertions::assert_eq;

use crate::common::{standard_session, Session, TESTMODULE_HEAD};

#[test]
fn exports_and_privates_get_long_names() {
    let mut session = standard_session();
    let source = format!(
        "{TESTMODULE_HEAD}
         (defun somefunction () (+ (private-function 0) (zzzq) (implicit)))
         (provide 'testmodule)"
    );
    session.load(&source).unwrap();

    assert_eq!(session.int("testmodule-somevariable"), Some(23));
    assert_eq!(session.int("testmodule--private"), Some(22));
    assert!(session.defined("testmodule--private-function"));
    assert_eq!(session.call_int("testmodule-somefunction"), 1100);

    for bare in ["private", "private-function", "somevariable", "somefunction"] {
        assert!(!session.defined(bare), "`{bare}` leaked unprefixed");
    }
}

#[test]
fn evaluated_forms_are_rewritten() {
    let mut session = standard_session();
    let source = format!("{TESTMODULE_HEAD} (provide 'testmodule)");
    let report = session.load(&source).unwrap();
    let printed = session.printed(&report);

    assert!(printed.contains(&"(defvar testmodule--private 22)".to_owned()));
    assert!(printed
        .contains(&"(defvar testmodule-somevariable (+ 1 testmodule--private))".to_owned()));
    // Directives reach the host as written.
    assert_eq!(
        printed[0],
        "(namespace testmodule :export (somefunction somevariable))"
    );
}

#[test]
fn code_outside_namespace_is_untouched() {
    let mut session = Session::new();
    let report = session
        .load("(defvar plain 1) (namespace m :export (f)) (defun f () plain) (provide 'm) (defvar after (m-f))")
        .unwrap();

    assert_eq!(session.int("plain"), Some(1));
    assert_eq!(session.int("after"), Some(1));
    assert_eq!(session.printed(&report)[0], "(defvar plain 1)");
}

#[test]
fn forward_declared_privates_support_mutual_recursion() {
    let mut session = Session::new();
    session
        .load(
            "(namespace parity :export (even))
             (declare-private odd)
             (defun even (n) (if (= n 0) 1 (odd (- n 1))))
             (defun odd (n) (if (= n 0) 0 (even (- n 1))))
             (provide 'parity)",
        )
        .unwrap();

    assert!(session.defined("parity--odd"));
    assert_eq!(
        session
            .runtime
            .call("parity-even", vec![nsp_host::Value::Int(10)])
            .unwrap(),
        nsp_host::Value::Int(1)
    );
}

#[test]
fn undeclared_forward_reference_stays_bare() {
    let mut session = Session::new();
    let report = session
        .load(
            "(namespace m :export (f))
             (defun f () (g))
             (defun g () 9)
             (provide 'm)",
        )
        .unwrap();

    let printed = session.printed(&report);
    assert_eq!(printed[1], "(defun m-f () (g))");
    assert_eq!(printed[2], "(defun m--g () 9)");
    assert!(session.defined("m--g"));
    assert!(!session.defined("g"));
    assert!(session.runtime.call("m-f", Vec::new()).is_err());
}

#[test]
fn aliases_register_their_quoted_target() {
    let mut session = Session::new();
    session
        .load(
            "(namespace m :export (plus))
             (defalias 'plus #'+)
             (defalias 'helper #'plus)
             (provide 'm)",
        )
        .unwrap();

    assert!(session.defined("m-plus"));
    assert!(session.defined("m--helper"));
    assert_eq!(
        session
            .runtime
            .call("m--helper", vec![nsp_host::Value::Int(2), nsp_host::Value::Int(3)])
            .unwrap(),
        nsp_host::Value::Int(5)
    );
}

#[test]
fn custom_separator() {
    let mut session = Session::with_config(EngineConfig::default().with_separator("/"));
    session
        .load("(namespace m :export (f)) (declare-private g) (defun f () (g)) (defun g () 9) (provide 'm)")
        .unwrap();

    assert!(session.defined("m/f"));
    assert!(session.defined("m//g"));
    assert_eq!(session.call_int("m/f"), 9);
}

#[test]
fn empty_export_is_rejected() {
    let mut session = Session::new();
    let err = session.load("(namespace m :export ())").unwrap_err();
    assert_eq!(err.code(), nsp_diagnostic::ErrorCode::E2001);
    assert_eq!(session.engine.depth(), 0);
}

#[test]
fn finished_contexts_keep_their_tables() {
    let mut session = standard_session();
    let source = format!("{TESTMODULE_HEAD} (provide 'testmodule)");
    session.load(&source).unwrap();

    let finished = session.runtime.take_finished();
    let testmodule = finished
        .iter()
        .find(|ctx| session.runtime.interner().lookup(ctx.name()) == "testmodule")
        .unwrap();
    let interner = session.runtime.interner();
    let mut shorts: Vec<&str> = testmodule
        .table()
        .iter()
        .map(|(short, _)| interner.lookup(short))
        .collect();
    shorts.sort_unstable();
    assert_eq!(
        shorts,
        vec![
            "implicit",
            "private",
            "private-function",
            "somefunction",
            "somevariable",
            "zzzq"
        ]
    );
}
