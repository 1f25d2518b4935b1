//! Programs in the shape they show up in real remap configurations.

use crate::parser::ast::Expr;
use crate::{ParseResult, parse};
use indoc::indoc;

const PROGRAMS: &[&str] = &[
    indoc! {r#"
    . = parse_syslog!(.message)
    .timestamp = format_timestamp!(.timestamp, format: "%+")
    del(.facility)
    "#},
    indoc! {r#"
    structured, err = parse_json(.message)
    if err != null {
      log("Unable to parse JSON: " + err, level: "error")
    } else {
      . = merge(., structured)
    }
    "#},
    indoc! {r#"
    .status_code = to_int!(.status)
    .tags = ["web", "prod"]
    .host = get_hostname!()
    .duration_ms = .duration * 1000.0
    .is_error = .status_code >= 500 && .status_code < 600
    "#},
    indoc! {r#"
    %custom.env = "production"
    .message = "user {{ user }} logged in"
    .labels = map_values(.labels) -> |value| { upcase!(value) }
    for_each(array!(.events)) -> |index, event| {
      log(event, level: "info")
    }
    "#},
    indoc! {r#"
    .level = .severity ?? "info"
    if match(.message, r'^ERROR') {
      .level = "error"
    }
    if .ts == null { .ts = t'2021-01-01T00:00:00Z' }
    if !exists(.id) { abort }
    .raw = s'literal {{ not a template }}'
    "#},
    indoc! {r#"
    .a.b[0]."c d"[-1] = 1
    .@timestamp = now()
    x = .nested
    x.y = 2
    .result = x.y
    "#},
    indoc! {r#"
    .object = {
      "nested": {
        "list": [1, 2.5, true, null],
        "empty": {},
      },
      "sum": 1 + 2 * 3,
    }
    "#},
    indoc! {r#"
    if (.a && .b) || (.c) {
      return true
    } else if (x = 1; x == 1) {
      .x = x
    }
    "#},
    indoc! {r#"
    {
      # block statement
      tmp = .a
      .b = tmp
    }
    "#},
];

#[test]
fn corpus_parses_cleanly() {
    for program in PROGRAMS {
        let result = parse(program);
        assert!(
            result.is_valid(),
            "program failed to parse:\n{program}\n{}",
            result.diagnostics.render(program)
        );
        assert_eq!(result.syntax().text().to_string(), *program);
    }
}

#[test]
fn error_handling_program() {
    let input = indoc! {r#"
    parsed, err = parse_json(.message)
    if err == null {
      . = merge!(., parsed)
    } else {
      .error = err
    }
    "#};

    let res = ParseResult::expect_valid_ast(input);

    insta::assert_snapshot!(res, @r"
    Program
      Assignment =
        Infallible
          Ident parsed
          Ident err
        FunctionCall parse_json
          Query event .message
      IfStatement
        Predicate
          BinaryOp ==
            Ident err
            Null
        Block
          Assignment =
            Query event
            FunctionCall merge!
              Query event
              Ident parsed
        Block
          Assignment =
            Query event .error
            Ident err
    ");
}

/// `{ .a }` stands in for the `{ .. }` placeholder block of the corpus.
#[test]
fn single_query_corpus() {
    for source in [".", ".foo", "foo.bar[2]", "foo().bar", "[1].foo", "{ .a }[0]"] {
        let result = parse(source);
        assert!(result.is_valid(), "{source}: {}", result.diagnostics.render(source));

        let statements: Vec<_> = result.program.statements().collect();
        assert_eq!(statements.len(), 1, "{source}");
        assert!(matches!(statements[0], Expr::Query(_)), "{source}: {statements:?}");
    }
}

#[test]
fn literal_ellipsis_block_is_reported() {
    let res = ParseResult::expect_invalid("{ .. }[0]");

    insta::assert_snapshot!(res, @r"
    error at 1:3..1:4: invalid path continuation: expected a field name or index right after the path root
    error at 1:5..1:6: invalid path continuation: expected a field name right after `.`, found `}`
    ");
}
