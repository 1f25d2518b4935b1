use crate::ParseResult;
use indoc::indoc;

#[test]
fn garbage_before_statement() {
    let res = crate::parse("$$ .a = 1");

    insta::assert_snapshot!(res.dump_diagnostics("$$ .a = 1"), @"error at 1:0..1:2: unexpected character `$$`");
    insta::assert_snapshot!(res.dump_ast(), @r"
    Program
      Assignment =
        Query event .a
        Integer 1
    ");
}

#[test]
fn garbage_after_statement() {
    let res = ParseResult::expect_invalid(".a = 1 $$");

    insta::assert_snapshot!(res, @"error at 1:7..1:9: unexpected character `$$`");
}

#[test]
fn closer_instead_of_value() {
    let res = ParseResult::expect_invalid(".a = )");

    insta::assert_snapshot!(res, @"error at 1:5..1:6: expected an expression: found `)`");
}

#[test]
fn operator_instead_of_operand() {
    let res = ParseResult::expect_invalid("1 + * 2");

    insta::assert_snapshot!(res, @r"
    error at 1:4..1:5: expected an expression: found `*`
    error at 1:6..1:7: expected newline or `;` after expression: found integer
    ");
}

#[test]
fn recovery_resumes_at_next_line() {
    let input = indoc! {r#"
    .a = 1
    else
    .b = 2
    "#};

    let res = crate::parse(input);

    insta::assert_snapshot!(res.dump_diagnostics(input), @"error at 2:0..2:4: expected an expression: found `else`");
    insta::assert_snapshot!(res.dump_ast(), @r"
    Program
      Assignment =
        Query event .a
        Integer 1
      Error
      Assignment =
        Query event .b
        Integer 2
    ");
}

#[test]
fn errors_on_separate_lines_are_all_reported() {
    let input = indoc! {r#"
    .a = )
    .b = ]
    .c = 1
    "#};

    let res = ParseResult::expect_invalid(input);

    insta::assert_snapshot!(res, @r"
    error at 1:5..1:6: expected an expression: found `)`
    error at 2:5..2:6: expected an expression: found `]`
    ");
}

#[test]
fn recovered_input_is_lossless() {
    let input = ".a = ) ] $$ \"x\n if { , }";
    let res = crate::parse(input);

    assert!(!res.is_valid());
    assert_eq!(res.syntax().text().to_string(), input);
}

#[test]
fn rendered_missing_separator() {
    let res = ParseResult::expect_invalid_rendered(".a = 1 .b");

    insta::assert_snapshot!(res, @r"
    error: expected newline or `;` after expression: found `.`
      |
    1 | .a = 1 .b
      |        ^ expected newline or `;` after expression: found `.`
    ");
}
