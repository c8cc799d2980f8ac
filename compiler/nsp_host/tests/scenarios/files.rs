use std::fs;

use pretty_assertions::assert_eq;

use crate::common::Session;

#[test]
fn units_load_from_search_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("geometry.nsp"),
        "; shapes on disk\n(namespace geometry :export (area))\n(defun area (w h) (* w h))\n(provide 'geometry)\n",
    )
    .unwrap();

    let mut session = Session::new();
    session.runtime.add_search_dir(dir.path());
    session
        .load(
            "(namespace app :export (room))
             (import geometry :symbols ((area . surface)))
             (defun room () (surface 3 4))
             (provide 'app)",
        )
        .unwrap();

    assert_eq!(session.call_int("app-room"), 12);
    let names: Vec<&str> = session
        .runtime
        .features()
        .iter()
        .map(|f| session.runtime.interner().lookup(*f))
        .collect();
    assert_eq!(names, vec!["geometry", "app"]);
}

#[test]
fn later_search_dirs_are_fallbacks() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    fs::write(first.path().join("pick.nsp"), "(defvar pick-origin 1)").unwrap();
    fs::write(second.path().join("pick.nsp"), "(defvar pick-origin 2)").unwrap();
    fs::write(second.path().join("only.nsp"), "(defvar only-origin 2)").unwrap();

    let mut session = Session::new();
    session.runtime.add_search_dir(first.path());
    session.runtime.add_search_dir(second.path());
    session
        .load("(namespace app :export (x)) (import pick) (import only) (provide 'app)")
        .unwrap();

    assert_eq!(session.int("pick-origin"), Some(1));
    assert_eq!(session.int("only-origin"), Some(2));
}
