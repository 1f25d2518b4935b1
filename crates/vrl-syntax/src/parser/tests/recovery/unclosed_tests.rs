use crate::ParseResult;
use indoc::indoc;

#[test]
fn missing_paren() {
    let res = ParseResult::expect_invalid("f(.a");

    insta::assert_snapshot!(res, @"error at 1:4..1:4: unexpected end of input: expected `)` (`(` opened here at 1..2)");
}

#[test]
fn missing_bracket() {
    let res = ParseResult::expect_invalid("[1, 2");

    insta::assert_snapshot!(res, @"error at 1:5..1:5: unexpected end of input: expected `]` (`[` opened here at 0..1)");
}

#[test]
fn missing_object_brace() {
    let res = ParseResult::expect_invalid(r#"{"a": 1"#);

    insta::assert_snapshot!(res, @"error at 1:7..1:7: unexpected end of input: expected `}` (`{` opened here at 0..1)");
}

#[test]
fn missing_block_brace() {
    let input = indoc! {r#"
    if .a {
      .b = 1
    "#};

    let res = ParseResult::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 3:0..3:0: unexpected end of input: expected `}` (`{` opened here at 6..7)");
}

#[test]
fn nested_unclosed_reports_innermost() {
    let res = ParseResult::expect_invalid("(1 + (2");

    insta::assert_snapshot!(res, @"error at 1:7..1:7: unexpected end of input: expected `)` (`(` opened here at 5..6)");
}

#[test]
fn unclosed_closure_params() {
    let res = ParseResult::expect_invalid("f() -> |a");

    insta::assert_snapshot!(res, @"error at 1:9..1:9: unexpected end of input: expected `|` (`|` opened here at 7..8)");
}

#[test]
fn unterminated_string_inside_call() {
    let res = ParseResult::expect_invalid(r#"f("abc"#);

    insta::assert_snapshot!(res, @r"
    error at 1:2..1:6: unterminated string literal
    error at 1:6..1:6: unexpected end of input: expected `)` (`(` opened here at 1..2)
    ");
}

#[test]
fn mismatched_closer() {
    let res = ParseResult::expect_invalid("(1]");

    insta::assert_snapshot!(res, @"error at 1:2..1:3: expected `)`");
}

#[test]
fn unclosed_tree_keeps_parsed_parts() {
    let res = crate::parse("[1, [2");

    insta::assert_snapshot!(res.dump_ast(), @r"
    Program
      Array
        Integer 1
        Array
          Integer 2
    ");
}
