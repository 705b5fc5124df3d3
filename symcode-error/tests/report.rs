use ariadne::Source;
use symcode_attrs::ErrorKind;
use symcode_error::{Error, ErrorKind};

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown variable `{}`", name),
    labels = ["used here", "and here"],
    help = "define it before using it",
)]
struct UnknownVariable {
    name: String,
}

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "something went wrong", labels = ["here"])]
struct Opaque;

/// Renders the report of the error against the given source, without colors.
fn render(err: &Error, src: &str) -> String {
    let mut buf = Vec::new();
    err.build_report("input").write(("input", Source::from(src)), &mut buf).unwrap();
    String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
}

#[test]
fn display_uses_message() {
    let err = Error::new(vec![0..1], UnknownVariable { name: "x".to_string() });
    assert_eq!(err.to_string(), "unknown variable `x`");
}

#[test]
fn downcast_kind() {
    let err = Error::new(vec![0..1], UnknownVariable { name: "q".to_string() });
    assert!(err.is::<UnknownVariable>());
    assert!(!err.is::<Opaque>());
    assert_eq!(err.kind_as::<UnknownVariable>().map(|k| k.name.as_str()), Some("q"));
}

#[test]
fn report_contains_labels_and_help() {
    let src = "x + x";
    let err = Error::new(vec![0..1, 4..5], UnknownVariable { name: "x".to_string() });
    let out = render(&err, src);
    assert!(out.contains("unknown variable `x`"));
    assert!(out.contains("used here"));
    assert!(out.contains("and here"));
    assert!(out.contains("define it before using it"));
}

#[test]
fn report_without_spans() {
    let err = Error::without_spans(Opaque);
    let out = render(&err, "a * b");
    assert!(out.contains("something went wrong"));
}
