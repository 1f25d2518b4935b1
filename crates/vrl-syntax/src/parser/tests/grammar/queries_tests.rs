use crate::ParseResult;

#[test]
fn event_root() {
    let res = ParseResult::expect_valid_ast(".");

    insta::assert_snapshot!(res, @r"
    Program
      Query event
    ");
}

#[test]
fn metadata_root() {
    let res = ParseResult::expect_valid_ast("%foo.bar");

    insta::assert_snapshot!(res, @r"
    Program
      Query metadata .foo.bar
    ");
}

#[test]
fn event_path_cst() {
    let res = ParseResult::expect_valid_cst(".foo[1]");

    insta::assert_snapshot!(res, @r#"
    Program
      Query
        Dot "."
        Path
          FieldSegment
            Id "foo"
          IndexSegment
            BracketOpen "["
            Integer "1"
            BracketClose "]"
    "#);
}

#[test]
fn mixed_segments() {
    let res = ParseResult::expect_valid_ast(r#".foo.bar[2]."baz qux"[-1]"#);

    insta::assert_snapshot!(res, @r#"
    Program
      Query event .foo.bar[2]."baz qux"[-1]
    "#);
}

#[test]
fn index_right_after_root() {
    let res = ParseResult::expect_valid_ast(".[0].a");

    insta::assert_snapshot!(res, @r"
    Program
      Query event [0].a
    ");
}

#[test]
fn reserved_words_are_field_names() {
    let res = ParseResult::expect_valid_ast(".if.else.null.abort");

    insta::assert_snapshot!(res, @r"
    Program
      Query event .if.else.null.abort
    ");
}

#[test]
fn at_sign_fields() {
    let res = ParseResult::expect_valid_ast(".@timestamp.a@b");

    insta::assert_snapshot!(res, @r"
    Program
      Query event .@timestamp.a@b
    ");
}

#[test]
fn quoted_field_cst() {
    let res = ParseResult::expect_valid_cst(r#"."a b""#);

    insta::assert_snapshot!(res, @r#"
    Program
      Query
        Dot "."
        Path
          FieldSegment
            StringLit
              DoubleQuote "\""
              StrText "a b"
              DoubleQuote "\""
    "#);
}

#[test]
fn variable_path() {
    let res = ParseResult::expect_valid_ast("foo.bar[0]");

    insta::assert_snapshot!(res, @r"
    Program
      Query internal .bar[0]
        Ident foo
    ");
}

#[test]
fn call_result_path() {
    let res = ParseResult::expect_valid_ast("parse_json!(.message).field");

    insta::assert_snapshot!(res, @r"
    Program
      Query internal .field
        FunctionCall parse_json!
          Query event .message
    ");
}

#[test]
fn container_paths() {
    let res = ParseResult::expect_valid_ast(r#"[1, 2][0]; {"a": 1}.a; (.b).c"#);

    insta::assert_snapshot!(res, @r#"
    Program
      Query internal [0]
        Array
          Integer 1
          Integer 2
      Query internal .a
        Object
          Entry "a"
            Integer 1
      Query internal .c
        Group
          Query event .b
    "#);
}

#[test]
fn path_needs_adjacency() {
    let res = ParseResult::expect_invalid(". foo");

    insta::assert_snapshot!(res, @"error at 1:2..1:5: expected newline or `;` after expression: found identifier");
}

#[test]
fn separated_path_is_two_expressions() {
    let res = ParseResult::expect_invalid(".foo .bar");

    insta::assert_snapshot!(res, @"error at 1:5..1:6: expected newline or `;` after expression: found `.`");
}

#[test]
fn array_followed_by_spaced_bracket() {
    let res = ParseResult::expect_invalid("[1] [2]");

    insta::assert_snapshot!(res, @"error at 1:4..1:5: expected newline or `;` after expression: found `[`");
}

#[test]
fn call_followed_by_spaced_dot() {
    let res = ParseResult::expect_invalid("foo() .a");

    insta::assert_snapshot!(res, @"error at 1:6..1:7: expected newline or `;` after expression: found `.`");
}

#[test]
fn field_name_must_touch_dot() {
    let res = ParseResult::expect_invalid(".foo. bar");

    insta::assert_snapshot!(res, @"error at 1:6..1:9: invalid path continuation: expected a field name right after `.`, found identifier");
}

#[test]
fn double_dot() {
    let res = ParseResult::expect_invalid("..foo");

    insta::assert_snapshot!(res, @"error at 1:1..1:2: invalid path continuation: expected a field name or index right after the path root");
}

#[test]
fn index_must_be_integer() {
    let res = ParseResult::expect_invalid(r#".foo["bar"]"#);

    insta::assert_snapshot!(res, @r#"error at 1:5..1:6: path index must be an integer, found string"#);
}

#[test]
fn literal_cannot_root_a_path() {
    let res = ParseResult::expect_invalid(r#""abc".foo"#);

    insta::assert_snapshot!(res, @r#"error at 1:5..1:6: expected newline or `;` after expression: found `.`"#);
}

#[test]
fn path_error_keeps_query_node() {
    let res = crate::parse("..foo");

    insta::assert_snapshot!(res.dump_ast(), @r"
    Program
      Query event .foo
    ");
}

#[test]
fn block_and_array_roots() {
    let res = ParseResult::expect_valid_ast("{ .a }[0]; [1].foo");

    insta::assert_snapshot!(res, @r"
    Program
      Query internal [0]
        Block
          Query event .a
      Query internal .foo
        Array
          Integer 1
    ");
}
