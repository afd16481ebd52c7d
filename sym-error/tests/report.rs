use sym_attrs::ErrorKind;
use sym_error::{Error, ErrorKind as _};

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` variable is not registered", name),
    labels = [format!("`{}` is not registered", name)],
    help = "register the variable before parsing",
    note = "variable names are case-sensitive",
)]
struct UnknownName {
    name: String,
}

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "mismatched parentheses", labels = ["opened here", "", "closed here"])]
struct Mismatched;

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "unexpected end of input", labels = ["here"])]
struct Eof;

fn render(error: &Error, src: &str) -> String {
    let report = error.render("input", src).unwrap();
    String::from_utf8(strip_ansi_escapes::strip(report)).unwrap()
}

#[test]
fn report_contains_every_tag() {
    let error = Error::new(vec![4..5], UnknownName { name: "q".to_string() });
    let report = render(&error, "a + q");

    assert!(report.contains("the `q` variable is not registered"));
    assert!(report.contains("`q` is not registered"));
    assert!(report.contains("register the variable before parsing"));
    assert!(report.contains("variable names are case-sensitive"));
}

#[test]
fn labels_follow_spans() {
    let error = Error::new(vec![0..1, 6..7], Mismatched);
    let report = render(&error, "(a + b]");

    assert!(report.contains("mismatched parentheses"));
    assert!(report.contains("opened here"));
    assert!(!report.contains("closed here"));
}

#[test]
fn display_uses_the_message() {
    let error = Error::new(vec![2..3], UnknownName { name: "z".to_string() });
    assert_eq!(error.to_string(), "the `z` variable is not registered at 2..3");
    assert_eq!(error.kind.message(), "the `z` variable is not registered");

    let error = Error::new(Vec::new(), Eof);
    assert_eq!(error.to_string(), "unexpected end of input");
}

#[test]
fn downcast_to_kind() {
    let error = Error::new(vec![3..3], Eof);
    assert!(error.is::<Eof>());
    assert!(!error.is::<UnknownName>());
    assert_eq!(error.downcast_ref::<Eof>(), Some(&Eof));
    assert_eq!(error.primary_span(), Some(3..3));
}
