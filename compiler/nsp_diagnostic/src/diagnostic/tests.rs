use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_builder_collects_notes_and_suggestions() {
    let diag = Diagnostic::error(ErrorCode::E2002)
        .with_message("`bar` is already mapped")
        .with_note("existing mapping: `m1-bar`")
        .with_note("new mapping: `m2-bar`")
        .with_suggestion("import one of them under an alias");

    assert!(diag.is_error());
    assert_eq!(diag.notes, vec!["existing mapping: `m1-bar`", "new mapping: `m2-bar`"]);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn test_display_header() {
    let diag = Diagnostic::error(ErrorCode::E2007).with_message("ambiguous `foo`");
    assert_eq!(diag.to_string(), "error[E2007]: ambiguous `foo`");
}
