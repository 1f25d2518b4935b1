use crate::{DiagnosticKind, Error, ErrorClass, ParseOptions};

#[test]
fn nested_arrays_hit_recursion_limit() {
    let input = format!("{}1{}", "[".repeat(10), "]".repeat(10));

    let result = ParseOptions::new()
        .recursion_limit(8)
        .parse(&input)
        .expect("recursion limit is not fatal");

    insta::assert_snapshot!(
        result.dump_diagnostics(&input),
        @"error at 1:7..1:8: nesting limit exceeded: more than 8 levels"
    );
    assert_eq!(result.syntax().text().to_string(), input);
}

#[test]
fn recursion_limit_suppresses_follow_up_errors() {
    let input = format!("{}1", "(".repeat(20));

    let result = ParseOptions::new()
        .recursion_limit(4)
        .parse(&input)
        .expect("recursion limit is not fatal");

    assert_eq!(result.diagnostics.len(), 1);
    let diag = result.diagnostics.iter().next().unwrap();
    assert_eq!(diag.kind(), DiagnosticKind::RecursionLimitExceeded);
    assert_eq!(diag.class(), ErrorClass::LimitExceeded);
}

#[test]
fn default_recursion_limit() {
    let input = format!("{}true", "!".repeat(300));

    let result = crate::parse(&input);

    let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, [DiagnosticKind::RecursionLimitExceeded]);
}

#[test]
fn operator_chain_counts_against_recursion_limit() {
    let input = "1 + 2 + 3 + 4 + 5 + 6";

    let result = ParseOptions::new()
        .recursion_limit(4)
        .parse(input)
        .expect("recursion limit is not fatal");

    insta::assert_snapshot!(
        result.dump_diagnostics(input),
        @"error at 1:12..1:13: nesting limit exceeded: more than 4 levels"
    );
    assert_eq!(result.syntax().text().to_string(), input);
}

#[test]
fn long_operator_chain_is_bounded() {
    let input = format!("{}1", "1 + ".repeat(50_000));

    let result = crate::parse(&input);

    let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, [DiagnosticKind::RecursionLimitExceeded]);
    assert_eq!(result.syntax().text().len(), rowan::TextSize::of(input.as_str()));
}

#[test]
fn operator_chain_below_limit_is_valid() {
    let input = format!("{}1", "1 + ".repeat(100));

    let result = crate::parse(&input);

    assert!(result.is_valid());
}

#[test]
fn nesting_below_limit_is_valid() {
    let input = format!("{}1{}", "[".repeat(6), "]".repeat(6));

    let result = ParseOptions::new()
        .recursion_limit(8)
        .parse(&input)
        .expect("no fuel limit");

    assert!(result.is_valid());
}

#[test]
fn exec_fuel_exhaustion_is_fatal() {
    let result = ParseOptions::new()
        .exec_fuel(Some(3))
        .parse(".a = 1; .b = 2");

    assert!(
        matches!(result, Err(Error::ExecFuelExhausted)),
        "expected ExecFuelExhausted, got {result:?}"
    );
}

#[test]
fn enough_exec_fuel() {
    let result = ParseOptions::new()
        .exec_fuel(Some(100))
        .parse(".a = 1; .b = 2")
        .expect("fuel suffices");

    assert!(result.is_valid());
    assert_eq!(result.program.statements().count(), 2);
}

#[test]
fn exec_fuel_error_message() {
    let err = ParseOptions::new()
        .exec_fuel(Some(0))
        .parse(".a")
        .unwrap_err();

    assert_eq!(err.to_string(), "execution limit exceeded");
}
