use crate::ParseResult;
use indoc::indoc;

#[test]
fn simple_assignment() {
    let res = ParseResult::expect_valid_ast(".status = 200");

    insta::assert_snapshot!(res, @r"
    Program
      Assignment =
        Query event .status
        Integer 200
    ");
}

#[test]
fn merge_assignment() {
    let res = ParseResult::expect_valid_ast(r#". |= {"a": 1}"#);

    insta::assert_snapshot!(res, @r#"
    Program
      Assignment |=
        Query event
        Object
          Entry "a"
            Integer 1
    "#);
}

#[test]
fn variable_and_metadata_targets() {
    let res = ParseResult::expect_valid_ast("x = 1; %tag = x");

    insta::assert_snapshot!(res, @r"
    Program
      Assignment =
        Ident x
        Integer 1
      Assignment =
        Query metadata .tag
        Ident x
    ");
}

#[test]
fn infallible_assignment() {
    let res = ParseResult::expect_valid_ast("parsed, err = parse_json(.message)");

    insta::assert_snapshot!(res, @r"
    Program
      Assignment =
        Infallible
          Ident parsed
          Ident err
        FunctionCall parse_json
          Query event .message
    ");
}

#[test]
fn infallible_assignment_cst() {
    let res = ParseResult::expect_valid_cst("a, _ = f()");

    insta::assert_snapshot!(res, @r#"
    Program
      Assignment
        InfallibleTarget
          Ident
            Id "a"
          Comma ","
          Noop
            Underscore "_"
        Equals "="
        FunctionCall
          Id "f"
          ArgumentList
            ParenOpen "("
            ParenClose ")"
    "#);
}

#[test]
fn discarded_result() {
    let res = ParseResult::expect_valid_ast("_ = del(.tmp)");

    insta::assert_snapshot!(res, @r"
    Program
      Assignment =
        Noop
        FunctionCall del
          Query event .tmp
    ");
}

#[test]
fn chained_assignment() {
    let res = ParseResult::expect_valid_ast(".a = .b = 1");

    insta::assert_snapshot!(res, @r"
    Program
      Assignment =
        Query event .a
        Assignment =
          Query event .b
          Integer 1
    ");
}

#[test]
fn if_statement_as_value() {
    let res = ParseResult::expect_valid_ast("x = if .a { 1 } else { 2 }");

    insta::assert_snapshot!(res, @r"
    Program
      Assignment =
        Ident x
        IfStatement
          Predicate
            Query event .a
          Block
            Integer 1
          Block
            Integer 2
    ");
}

#[test]
fn value_on_next_line() {
    let input = indoc! {r#"
    .a =
      "value"
    "#};

    let res = ParseResult::expect_valid_ast(input);

    insta::assert_snapshot!(res, @r#"
    Program
      Assignment =
        Query event .a
        String
          Text "value"
    "#);
}

#[test]
fn operator_on_next_line_starts_a_statement() {
    let input = indoc! {r#"
    .a
    = 1
    "#};

    let res = ParseResult::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 2:0..2:1: expected an expression: found `=`");
}

#[test]
fn literal_target() {
    let res = ParseResult::expect_invalid(r#""a" = 1"#);

    insta::assert_snapshot!(res, @r#"error at 1:0..1:3: invalid assignment target: cannot assign to `"a"`"#);
}

#[test]
fn call_target() {
    let res = ParseResult::expect_invalid("f() = 1");

    insta::assert_snapshot!(res, @"error at 1:0..1:3: invalid assignment target: cannot assign to `f()`");
}

#[test]
fn expression_target() {
    let res = ParseResult::expect_invalid(".a + 1 = 2");

    insta::assert_snapshot!(res, @"error at 1:0..1:6: invalid assignment target: cannot assign to `.a + 1`");
}

#[test]
fn bare_underscore() {
    let res = ParseResult::expect_invalid("_");

    insta::assert_snapshot!(res, @"error at 1:0..1:1: invalid assignment target: `_` can only be assigned to");
}

#[test]
fn underscore_as_operand() {
    let res = ParseResult::expect_invalid("1 + _");

    insta::assert_snapshot!(res, @"error at 1:4..1:5: expected an expression: `_` can only be an assignment target");
}

#[test]
fn missing_value() {
    let res = ParseResult::expect_invalid("a =");

    insta::assert_snapshot!(res, @"error at 1:3..1:3: unexpected end of input");
}

#[test]
fn targets_without_operator() {
    let res = ParseResult::expect_invalid("ok, err");

    insta::assert_snapshot!(res, @"error at 1:7..1:7: unexpected end of input: expected `=` or `|=` after assignment targets");
}
