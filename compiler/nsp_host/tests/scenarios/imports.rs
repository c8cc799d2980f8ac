use nsp_engine::NamespaceError;
use nsp_host::HostError;
use pretty_assertions::assert_eq;

use crate::common::{standard_session, Session, TESTMODULE_HEAD};

#[test]
fn aliased_import_with_prefix() {
    let mut session = standard_session();
    let source = format!(
        "{TESTMODULE_HEAD}
         (import testimplicit2 :prefix ti2 :symbols ((implicit2 . i2)))
         (defun somefunction () (+ (private-function 0) (zzzq) (implicit) (i2)))
         (provide 'testmodule)"
    );
    session.load(&source).unwrap();

    assert_eq!(session.call_int("testmodule-somefunction"), 1105);
    assert!(!session.defined("i2"));
}

#[test]
fn aliased_import_of_missing_symbol() {
    let mut session = Session::new();
    session
        .unit("testm2", crate::common::TESTM2)
        .unit("testimplicit", crate::common::TESTIMPLICIT)
        .unit("testimplicit2", "(defun ti2-other () 5)");
    let source = format!(
        "{TESTMODULE_HEAD}
         (import testimplicit2 :prefix ti2 :symbols ((implicit2 . i2)))"
    );
    let err = session.load(&source).unwrap_err();

    assert_eq!(
        err,
        HostError::Namespace(NamespaceError::UnexportedSymbol {
            source: "testimplicit2".into(),
            symbol: "ti2-implicit2".into(),
        })
    );
    assert_eq!(session.engine.depth(), 0);
}

#[test]
fn explicit_import_must_be_exported() {
    let mut session = Session::new();
    session.unit(
        "lib",
        "(namespace lib :export (shown)) (defun shown () 1) (defun hidden () 2) (provide 'lib)",
    );
    let err = session
        .load("(namespace app :export (run)) (import lib :symbols (hidden))")
        .unwrap_err();
    assert!(matches!(
        err,
        HostError::Namespace(NamespaceError::UnexportedSymbol { .. })
    ));
    // The private definition exists, just not under a public name.
    assert!(session.defined("lib--hidden"));
}

#[test]
fn wildcard_import_of_module_takes_all_exports() {
    let mut session = Session::new();
    session.unit(
        "shapes",
        "(namespace shapes :export (square cube))
         (defun square (x) (* x x))
         (defun cube (x) (* x (square x)))
         (provide 'shapes)",
    );
    session
        .load(
            "(namespace app :export (volume))
             (import shapes)
             (defun volume () (+ (cube 2) (square 3)))
             (provide 'app)",
        )
        .unwrap();
    assert_eq!(session.call_int("app-volume"), 17);
}

#[test]
fn prefix_on_module_source_is_illegal() {
    let mut session = standard_session();
    let err = session
        .load("(namespace app :export (run)) (import testm2 :prefix other)")
        .unwrap_err();
    assert_eq!(err.code(), nsp_diagnostic::ErrorCode::E2006);
}

#[test]
fn unknown_source() {
    let mut session = Session::new();
    let err = session
        .load("(namespace app :export (run)) (import nowhere)")
        .unwrap_err();
    assert_eq!(
        err,
        HostError::Namespace(NamespaceError::UnknownSource {
            source: "nowhere".into()
        })
    );
}

#[test]
fn import_outside_namespace() {
    let mut session = standard_session();
    let err = session.load("(import testm2)").unwrap_err();
    assert_eq!(err.code(), nsp_diagnostic::ErrorCode::E2003);
}

#[test]
fn already_loaded_sources_are_reused() {
    let mut session = standard_session();
    session
        .load("(namespace a :export (x)) (import testm2 :symbols (zzzq)) (defun x () (zzzq)) (provide 'a)")
        .unwrap();
    session
        .load("(namespace b :export (y)) (import testm2 :symbols (zzzq)) (defun y () (zzzq)) (provide 'b)")
        .unwrap();

    assert_eq!(session.call_int("a-x"), 100);
    assert_eq!(session.call_int("b-y"), 100);
    let testm2 = session.runtime.interner().intern("testm2");
    assert_eq!(
        session.runtime.features().iter().filter(|f| **f == testm2).count(),
        1
    );
}

#[test]
fn nested_load_failure_is_reported_against_the_dependency() {
    let mut session = Session::new();
    session.unit("dep", "(namespace dep :export (f)) (defun f () (nope))\n(f)");
    let err = session
        .load("(namespace app :export (run)) (import dep)")
        .unwrap_err();

    let diag = err.to_diagnostic();
    assert_eq!(diag.code, nsp_diagnostic::ErrorCode::E2009);
    assert!(err.to_string().contains("`dep`"), "{err}");
    assert_eq!(session.engine.depth(), 0);
}
