use crate::ParseResult;
use indoc::indoc;

#[test]
fn binary_cst() {
    let res = ParseResult::expect_valid_cst("1 + 2");

    insta::assert_snapshot!(res, @r#"
    Program
      BinaryOp
        IntegerLit
          Integer "1"
        Plus "+"
        IntegerLit
          Integer "2"
    "#);
}

#[test]
fn multiplication_binds_tighter() {
    let res = ParseResult::expect_valid_ast("1 + 2 * 3");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp +
        Integer 1
        BinaryOp *
          Integer 2
          Integer 3
    ");
}

#[test]
fn subtraction_is_left_associative() {
    let res = ParseResult::expect_valid_ast("1 - 2 - 3");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp -
        BinaryOp -
          Integer 1
          Integer 2
        Integer 3
    ");
}

#[test]
fn division_and_multiplication_share_a_level() {
    let res = ParseResult::expect_valid_ast("a / b * c");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp *
        BinaryOp /
          Ident a
          Ident b
        Ident c
    ");
}

#[test]
fn logical_precedence_ladder() {
    let res = ParseResult::expect_valid_ast("a ?? b || c && d == e");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp ??
        Ident a
        BinaryOp ||
          Ident b
          BinaryOp &&
            Ident c
            BinaryOp ==
              Ident d
              Ident e
    ");
}

#[test]
fn comparison_binds_tighter_than_equality() {
    let res = ParseResult::expect_valid_ast("a < b == c > d");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp ==
        BinaryOp <
          Ident a
          Ident b
        BinaryOp >
          Ident c
          Ident d
    ");
}

#[test]
fn merge_sits_between_comparison_and_addition() {
    let res = ParseResult::expect_valid_ast("a | b + c");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp |
        Ident a
        BinaryOp +
          Ident b
          Ident c
    ");
}

#[test]
fn not_binds_tightest() {
    let res = ParseResult::expect_valid_ast("!a && !b");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp &&
        UnaryOp !
          Ident a
        UnaryOp !
          Ident b
    ");
}

#[test]
fn not_applies_to_group() {
    let res = ParseResult::expect_valid_ast("!(a || b)");

    insta::assert_snapshot!(res, @r"
    Program
      UnaryOp !
        Group
          BinaryOp ||
            Ident a
            Ident b
    ");
}

#[test]
fn group_overrides_precedence() {
    let res = ParseResult::expect_valid_ast("(1 + 2) * 3");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp *
        Group
          BinaryOp +
            Integer 1
            Integer 2
        Integer 3
    ");
}

#[test]
fn newline_after_operator_continues() {
    let input = indoc! {r#"
    1 +
      2
    "#};

    let res = ParseResult::expect_valid_ast(input);

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp +
        Integer 1
        Integer 2
    ");
}

#[test]
fn newlines_inside_group_are_insignificant() {
    let input = indoc! {r#"
    (1
      + 2)
    "#};

    let res = ParseResult::expect_valid_ast(input);

    insta::assert_snapshot!(res, @r"
    Program
      Group
        BinaryOp +
          Integer 1
          Integer 2
    ");
}

#[test]
fn negative_literal_operand() {
    let res = ParseResult::expect_valid_ast("a - -1");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp -
        Ident a
        Integer -1
    ");
}

#[test]
fn minus_after_operand_is_subtraction() {
    let res = ParseResult::expect_valid_ast("x -1");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp -
        Ident x
        Integer 1
    ");
}

#[test]
fn error_coalescing_call() {
    let res = ParseResult::expect_valid_ast("to_int(.a) ?? 0");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp ??
        FunctionCall to_int
          Query event .a
        Integer 0
    ");
}

#[test]
fn assignment_inside_group() {
    let res = ParseResult::expect_valid_ast("(x = 1) + 1");

    insta::assert_snapshot!(res, @r"
    Program
      BinaryOp +
        Group
          Assignment =
            Ident x
            Integer 1
        Integer 1
    ");
}
