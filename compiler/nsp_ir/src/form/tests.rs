use super::*;

fn sym(interner: &StringInterner, s: &str) -> Form {
    Form::Symbol(interner.intern(s))
}

#[test]
fn test_display_nested_list() {
    let interner = StringInterner::new();
    let form = Form::List(vec![
        sym(&interner, "defvar"),
        sym(&interner, "somevariable"),
        Form::List(vec![sym(&interner, "+"), Form::Int(1), sym(&interner, "private")]),
    ]);
    assert_eq!(
        form.display(&interner).to_string(),
        "(defvar somevariable (+ 1 private))"
    );
}

#[test]
fn test_display_quote_sugar() {
    let interner = StringInterner::new();
    let quoted = Form::wrap(interner.intern("quote"), sym(&interner, "x"));
    let function = Form::wrap(interner.intern("function"), sym(&interner, "f"));
    assert_eq!(quoted.display(&interner).to_string(), "'x");
    assert_eq!(function.display(&interner).to_string(), "#'f");
}

#[test]
fn test_display_dotted_and_strings() {
    let interner = StringInterner::new();
    let pair = Form::Dotted(
        vec![sym(&interner, "implicit2")],
        Box::new(sym(&interner, "i2")),
    );
    assert_eq!(pair.display(&interner).to_string(), "(implicit2 . i2)");

    let text = Form::Str(String::from("say \"hi\"\n"));
    assert_eq!(text.display(&interner).to_string(), r#""say \"hi\"\n""#);
}

#[test]
fn test_display_empty_list() {
    let interner = StringInterner::new();
    assert_eq!(Form::List(Vec::new()).display(&interner).to_string(), "()");
}

#[test]
fn test_head_and_unwrap_head() {
    let interner = StringInterner::new();
    let quote = interner.intern("quote");
    let target = sym(&interner, "private-function");
    let quoted = Form::wrap(quote, target.clone());

    assert_eq!(quoted.head(), Some(quote));
    assert_eq!(quoted.unwrap_head(quote), Some(&target));
    assert_eq!(quoted.unwrap_head(interner.intern("function")), None);
    assert_eq!(Form::Int(3).head(), None);
}
