use crate::ParseResult;
use indoc::indoc;

#[test]
fn nested_array() {
    let res = ParseResult::expect_valid_ast(r#"[1, "two", [3]]"#);

    insta::assert_snapshot!(res, @r#"
    Program
      Array
        Integer 1
        String
          Text "two"
        Array
          Integer 3
    "#);
}

#[test]
fn empty_containers() {
    let res = ParseResult::expect_valid_ast("[]; {}");

    insta::assert_snapshot!(res, @r"
    Program
      Array
      Object
    ");
}

#[test]
fn multiline_array_with_trailing_comma() {
    let input = indoc! {r#"
    [
      1,
      2,
    ]
    "#};

    let res = ParseResult::expect_valid_ast(input);

    insta::assert_snapshot!(res, @r"
    Program
      Array
        Integer 1
        Integer 2
    ");
}

#[test]
fn object_entries() {
    let res = ParseResult::expect_valid_ast(r#"{"a": 1, "b": [true, null]}"#);

    insta::assert_snapshot!(res, @r#"
    Program
      Object
        Entry "a"
          Integer 1
        Entry "b"
          Array
            Boolean true
            Null
    "#);
}

#[test]
fn object_cst() {
    let res = ParseResult::expect_valid_cst(r#"{"a": 1}"#);

    insta::assert_snapshot!(res, @r#"
    Program
      Object
        BraceOpen "{"
        Entry
          StringLit
            DoubleQuote "\""
            StrText "a"
            DoubleQuote "\""
          Colon ":"
          IntegerLit
            Integer "1"
        BraceClose "}"
    "#);
}

#[test]
fn multiline_object() {
    let input = indoc! {r#"
    {
      "a": {
        "b": .c,
      },
      "d e": 1 + 2
    }
    "#};

    let res = ParseResult::expect_valid_ast(input);

    insta::assert_snapshot!(res, @r#"
    Program
      Object
        Entry "a"
          Object
            Entry "b"
              Query event .c
        Entry "d e"
          BinaryOp +
            Integer 1
            Integer 2
    "#);
}

#[test]
fn brace_with_statement_is_a_block() {
    let res = ParseResult::expect_valid_ast("{ .a = 1; .b }");

    insta::assert_snapshot!(res, @r"
    Program
      Block
        Assignment =
          Query event .a
          Integer 1
        Query event .b
    ");
}

#[test]
fn string_statement_in_block() {
    let res = ParseResult::expect_valid_ast(r#"{ "a" }"#);

    insta::assert_snapshot!(res, @r#"
    Program
      Block
        String
          Text "a"
    "#);
}

#[test]
fn object_as_assignment_value() {
    let res = ParseResult::expect_valid_ast(r#". = {"message": .msg}"#);

    insta::assert_snapshot!(res, @r#"
    Program
      Assignment =
        Query event
        Object
          Entry "message"
            Query event .msg
    "#);
}

#[test]
fn object_keys_must_be_strings() {
    let res = ParseResult::expect_invalid(r#"{"a": 1, b: 2}"#);

    insta::assert_snapshot!(res, @"error at 1:9..1:10: object keys must be string literals, found identifier");
}

#[test]
fn object_entry_needs_colon() {
    let res = ParseResult::expect_invalid(r#"{"a": 1, "b" 2}"#);

    insta::assert_snapshot!(res, @"error at 1:13..1:14: expected `:` after object key");
}

#[test]
fn array_items_are_not_statements() {
    let res = ParseResult::expect_invalid("[if true { 1 }]");

    insta::assert_snapshot!(res, @"error at 1:1..1:3: expected an expression: found `if`");
}
