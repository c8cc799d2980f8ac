use nsp_engine::NamespaceError;
use nsp_host::HostError;
use pretty_assertions::assert_eq;

use crate::common::Session;

fn two_wildcard_sources() -> Session {
    let mut session = Session::new();
    session
        .unit("one", "(defun one-foo () 1)")
        .unit("two", "(defun two-foo () 2)");
    session
}

#[test]
fn unreferenced_ambiguity_is_harmless() {
    let mut session = two_wildcard_sources();
    session
        .load(
            "(namespace app :export (run))
             (import one)
             (import two)
             (defun run () 0)
             (provide 'app)",
        )
        .unwrap();
    assert_eq!(session.call_int("app-run"), 0);
}

#[test]
fn referencing_ambiguous_name_fails() {
    let mut session = two_wildcard_sources();
    let err = session
        .load(
            "(namespace app :export (run))
             (import one)
             (import two)
             (defun run () (foo))",
        )
        .unwrap_err();

    assert_eq!(
        err,
        HostError::Namespace(NamespaceError::AmbiguousReference {
            namespace: "app".into(),
            short: "foo".into(),
        })
    );
    assert!(!session.defined("app-run"));
}

#[test]
fn explicit_import_settles_ambiguity() {
    let mut session = two_wildcard_sources();
    session
        .load(
            "(namespace app :export (run))
             (import one)
             (import two)
             (import two :symbols (foo))
             (defun run () (foo))
             (provide 'app)",
        )
        .unwrap();
    assert_eq!(session.call_int("app-run"), 2);
}

#[test]
fn explicit_imports_of_same_short_name_conflict() {
    let mut session = Session::new();
    session
        .unit("m1", "(namespace m1 :export (bar)) (defun bar () 1) (provide 'm1)")
        .unit("m2", "(namespace m2 :export (bar)) (defun bar () 2) (provide 'm2)");
    let err = session
        .load(
            "(namespace app :export (run))
             (import m1 :symbols (bar))
             (import m2 :symbols (bar))",
        )
        .unwrap_err();

    assert_eq!(
        err,
        HostError::Namespace(NamespaceError::RedefinitionConflict {
            namespace: "app".into(),
            short: "bar".into(),
            old: "m1-bar".into(),
            new: "m2-bar".into(),
        })
    );
    let notes = err.to_diagnostic().notes;
    assert!(notes.iter().any(|note| note.contains("m1-bar")));
    assert!(notes.iter().any(|note| note.contains("m2-bar")));
}

#[test]
fn definition_cannot_shadow_explicit_import() {
    let mut session = Session::new();
    session.unit("m1", "(namespace m1 :export (bar)) (defun bar () 1) (provide 'm1)");
    let err = session
        .load(
            "(namespace app :export (run))
             (import m1 :symbols (bar))
             (defun bar () 3)",
        )
        .unwrap_err();
    assert_eq!(err.code(), nsp_diagnostic::ErrorCode::E2002);
}

#[test]
fn definition_overrides_unused_wildcard() {
    let mut session = two_wildcard_sources();
    session
        .load(
            "(namespace app :export (run))
             (import one)
             (defun foo () 7)
             (defun run () (foo))
             (provide 'app)",
        )
        .unwrap();
    assert!(session.defined("app--foo"));
    assert_eq!(session.call_int("app-run"), 7);
}
