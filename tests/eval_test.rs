//! End-to-end evaluation tests
//!
//! Compile-then-match scenarios over in-memory environments, grouped as:
//! - simple string/identifier evaluation
//! - numeric evaluation and promotion
//! - numeric literal boundaries
//! - comparison, IN and BETWEEN semantics
//! - NULL propagation
//! - LIKE and ESCAPE

use msgsieve::{compile, MapEnvironment, Selector, Value};

fn selector(s: &str) -> Selector {
    match compile(s) {
        Ok(sel) => sel,
        Err(e) => panic!("selector {s:?} should compile, got: {e}"),
    }
}

fn eval(s: &str, env: &MapEnvironment) -> bool {
    selector(s).matches(env)
}

// ============================================================================
// Simple evaluation
// ============================================================================

fn string_env() -> MapEnvironment {
    let mut env = MapEnvironment::new();
    env.set("A", "Bye, bye cruel world");
    env.set("B", "hello kitty");
    env
}

#[test]
fn test_empty_selector_matches_everything() {
    assert!(eval("", &string_env()));
    assert!(eval(" ", &string_env()));
    assert!(eval("", &MapEnvironment::new()));
}

#[test]
fn test_simple_string_evaluation() {
    let env = string_env();

    assert!(eval("A is not null", &env));
    assert!(!eval("A is null", &env));
    assert!(!eval("A = C", &env));
    assert!(!eval("A <> C", &env));
    assert!(!eval("C is not null", &env));
    assert!(eval("C is null", &env));
    assert!(eval("A='Bye, bye cruel world'", &env));
    assert!(!eval("A<>'Bye, bye cruel world'", &env));
    assert!(!eval("A='hello kitty'", &env));
    assert!(eval("A<>'hello kitty'", &env));
    assert!(!eval("A=B", &env));
    assert!(eval("A<>B", &env));
    assert!(!eval("A='hello kitty' OR B='Bye, bye cruel world'", &env));
    assert!(eval("B='hello kitty' OR A='Bye, bye cruel world'", &env));
    assert!(eval("B='hello kitty' AnD A='Bye, bye cruel world'", &env));
    assert!(!eval("B='hello kitty' AnD B='Bye, bye cruel world'", &env));
    assert!(eval("A is null or A='Bye, bye cruel world'", &env));
    assert!(eval(
        "Z is null OR A is not null and A<>'Bye, bye cruel world'",
        &env
    ));
    assert!(!eval(
        "(Z is null OR A is not null) and A<>'Bye, bye cruel world'",
        &env
    ));
    assert!(eval("NOT C is not null OR C is null", &env));
    assert!(eval("Not A='' or B=z", &env));
    assert!(eval("Not A=17 or B=5.6", &env));
    assert!(!eval("A<>17 and B=5.6e17", &env));
    assert!(!eval("C=D", &env));
    assert!(eval("13 is not null", &env));
    assert!(!eval("'boo!' is null", &env));
}

#[test]
fn test_exact_match_scenarios() {
    let mut env = MapEnvironment::new();
    env.set("A", "foo");
    assert!(eval("A='foo'", &env));
    env.set("A", "bar");
    assert!(!eval("A='foo'", &env));
    assert!(!eval("A='foo'", &MapEnvironment::new()));
}

#[test]
fn test_null_or_empty_scenario() {
    let mut env = MapEnvironment::new();
    env.set("A", "x");
    assert!(!eval("A IS NULL OR A=''", &env));
    assert!(eval("A IS NULL OR A=''", &MapEnvironment::new()));
}

// ============================================================================
// Numeric evaluation
// ============================================================================

fn numeric_env() -> MapEnvironment {
    let mut env = MapEnvironment::new();
    env.set("A", 42.0);
    env.set("B", 39i64);
    env
}

#[test]
fn test_numeric_evaluation() {
    let env = numeric_env();

    assert!(eval("A>B", &env));
    assert!(eval("A=42", &env));
    assert!(eval("42=A", &env));
    assert!(eval("B=39.0", &env));
    assert!(eval("Not A=17 or B=5.6", &env));
    assert!(!eval("A<>17 and B=5.6e17", &env));
    assert!(eval("3 BETWEEN -17 and 98.5", &env));
    assert!(eval("A BETWEEN B and 98.5", &env));
    assert!(!eval("B NOT BETWEEN 35 AND 100", &env));
    assert!(!eval("A BETWEEN B and 40", &env));
    assert!(!eval("A BETWEEN C and 40", &env));
    assert!(!eval("A BETWEEN 45 and C", &env));
    assert!(eval("(A BETWEEN 40 and C) IS NULL", &env));
    assert!(eval("(A BETWEEN C and 45) IS NULL", &env));
    assert!(eval("17/4=4", &env));
    assert!(!eval("A/0=0", &env));
    assert!(eval("A*B+19<A*(B+19)", &env));
    assert!(eval("-A=0-A", &env));
}

#[test]
fn test_division_by_zero() {
    let mut env = MapEnvironment::new();
    env.set("A", 42.0);
    env.set("B", 42i64);

    // Float: 42.0/0 is +inf, which is not 0
    assert!(!eval("A/0=0", &env));
    assert!(eval("A/0>0", &env));
    // Integer: 42/0 is Unknown, so nothing matches
    assert!(!eval("B/0=0", &env));
    assert!(!eval("B/0>0", &env));
    assert!(eval("(B/0) IS NULL", &env));
}

#[test]
fn test_between_scenario_with_missing_upper_bound() {
    let mut env = MapEnvironment::new();
    env.set("A", 15i64);
    assert!(eval("(A BETWEEN 10 AND C) IS NULL", &env));
}

// ============================================================================
// Numeric literal boundaries
// ============================================================================

#[test]
fn test_numeric_literal_evaluation() {
    let env = MapEnvironment::new();

    assert!(eval(" 9223372036854775807>0", &env));
    assert!(eval("-9223372036854775807<0", &env));
    assert!(eval("0x8000_0000_0000_0001=-9223372036854775807", &env));
    assert!(eval(" 9223372036854775807L<>0", &env));
    assert!(eval("-9223372036854775807L<>0", &env));
    assert!(eval("-9223372036854775808<>0", &env));
    assert!(eval("-9223372036854775808=0x8000_0000_0000_0000", &env));
    assert!(eval("0x8000_0000_0000_0000<9223372036854775807", &env));
    assert!(eval(" 0.4f>0.3d", &env));
    assert!(eval(" 1000_020.4f>0.3d", &env));
    assert!(eval(" 1000_020.4f>0x800p-3", &env));
    assert!(eval(" 0x1000_0000=0x1000_0000p0", &env));
    assert!(eval(" 0xFF=255L", &env));
    assert!(eval(" 077L=0b111_111", &env));
    assert!(eval(" 077L=63", &env));
}

#[test]
fn test_promotion_is_symmetric() {
    let env = MapEnvironment::new();
    for (a, b) in [("42", "42.0"), ("0", "0.0"), ("-17", "-17.0")] {
        assert!(eval(&format!("{a} = {b}"), &env));
        assert!(eval(&format!("{b} = {a}"), &env));
        assert!(eval(&format!("{a} >= {b}"), &env));
        assert!(eval(&format!("{b} <= {a}"), &env));
    }
}

// ============================================================================
// Comparisons, IN, BETWEEN
// ============================================================================

#[test]
fn test_comparison_evaluation() {
    let env = MapEnvironment::new();

    assert!(!eval("17 > 19.0", &env));
    assert!(!eval("'hello' > 19.0", &env));
    assert!(!eval("'hello' < 19.0", &env));
    assert!(!eval("'hello' = 19.0", &env));
    assert!(!eval(
        "'hello'>42 and 'hello'<42 and 'hello'=42 and 'hello'<>42",
        &env
    ));
    assert!(eval("20 >= 19.0 and 20 > 19", &env));
    assert!(eval("42 <= 42.0 and 37.0 >= 37", &env));
}

#[test]
fn test_in_evaluation() {
    let env = MapEnvironment::new();

    assert!(eval("(A IN ('hello', 'there', 1 , true, (1-17))) IS NULL", &env));
    assert!(eval("(-16 IN ('hello', A, 'there', true)) IS NULL", &env));
    assert!(eval("(-16 NOT IN ('hello', 'there', A, true)) IS NULL", &env));
    assert!(eval("(-16 IN ('hello', 'there', true)) IS NOT NULL", &env));
    assert!(!eval("-16 IN ('hello', 'there', true)", &env));
    assert!(eval("(-16 NOT IN ('hello', 'there', true)) IS NOT NULL", &env));
    assert!(!eval("-16 NOT IN ('hello', 'there', true)", &env));
    assert!(eval("(-16 NOT IN ('hello', 'there', A, 1 , true)) IS NULL", &env));
    assert!(eval("'hello' IN ('hello', 'there', 1 , true, (1-17))", &env));
    assert!(eval("TRUE IN ('hello', 'there', 1 , true, (1-17))", &env));
    assert!(eval("-16 IN ('hello', 'there', 1 , true, (1-17))", &env));
    assert!(!eval("-16 NOT IN ('hello', 'there', 1 , true, (1-17))", &env));
    assert!(!eval("1 IN ('hello', 'there', 'polly')", &env));
    assert!(!eval("1 NOT IN ('hello', 'there', 'polly')", &env));
    assert!(!eval("'hell' IN ('hello', 'there', 1 , true, (1-17))", &env));
    assert!(eval(
        "('hell' IN ('hello', 'there', 1 , true, (1-17), A)) IS NULL",
        &env
    ));
    assert!(eval(
        "('hell' NOT IN ('hello', 'there', 1 , true, (1-17), A)) IS NULL",
        &env
    ));
}

#[test]
fn test_between_evaluation() {
    let env = MapEnvironment::new();

    assert!(!eval("'hello kitty' BETWEEN 30 and 40", &env));
    assert!(eval("'hello kitty' NOT BETWEEN 30 and 40", &env));
    assert!(!eval("14 BETWEEN 'aardvark' and 'zebra'", &env));
    assert!(eval("14 NOT BETWEEN 'aardvark' and 'zebra'", &env));
    assert!(!eval("TRUE BETWEEN 'aardvark' and 'zebra'", &env));
    assert!(eval("TRUE NOT BETWEEN 'aardvark' and 'zebra'", &env));
    assert!(eval("(A BETWEEN 'aardvark' and 14) IS NULL", &env));
    assert!(eval("(A NOT BETWEEN 'aardvark' and 14) IS NULL", &env));
    assert!(eval("(14 BETWEEN A and 17) IS NULL", &env));
    assert!(eval("(14 NOT BETWEEN A and 17) IS NULL", &env));
    assert!(eval("(14 BETWEEN 11 and A) IS NULL", &env));
    assert!(eval("(14 NOT BETWEEN 11 and A) IS NULL", &env));
    assert!(eval("14 NOT BETWEEN 11 and 9", &env));
    assert!(eval("14 BETWEEN -11 and 54367", &env));
}

// ============================================================================
// NULL propagation
// ============================================================================

#[test]
fn test_null_propagation() {
    let env = MapEnvironment::new();

    assert!(eval("P > 19.0 or (P is null)", &env));
    assert!(eval("P is null or P=''", &env));
    assert!(!eval("P=Q", &env));
    assert!(!eval("not P=Q", &env));
    assert!(!eval("not P=Q and not P=Q", &env));
    assert!(!eval("P=Q or not P=Q", &env));
    assert!(!eval("P > 19.0 or P <= 19.0", &env));
    assert!(eval("P > 19.0 or 17 <= 19.0", &env));
}

#[test]
fn test_excluded_middle_only_holds_when_known() {
    // e OR NOT e is true exactly when e is not Unknown
    let unbound = MapEnvironment::new();
    assert!(!eval("P=1 OR NOT P=1", &unbound));

    let mut bound = MapEnvironment::new();
    bound.set("P", 2i64);
    assert!(eval("P=1 OR NOT P=1", &bound));
}

// ============================================================================
// LIKE and ESCAPE
// ============================================================================

#[test]
fn test_like_evaluation() {
    let env = string_env();

    assert!(eval("A LIKE '%cru_l%'", &env));
    assert!(eval("'_%%_hello.th_re%' LIKE 'z_%.%z_%z%' escape 'z'", &env));
    assert!(eval("A NOT LIKE 'z_%.%z_%z%' escape 'z'", &env));
    assert!(eval(
        "'{}[]<>,.!\"$%^&*()_-+=?/|\\' LIKE '{}[]<>,.!\"$z%^&*()z_-+=?/|\\' escape 'z'",
        &env
    ));
}

#[test]
fn test_like_round_trip() {
    // Strings built by replacing % with filler and _ with one character
    // always match the pattern they came from
    let cases = [
        ("hel%", "hello"),
        ("hel%", "hel"),
        ("h_llo", "hallo"),
        ("%world", "hello world"),
        ("a%b_c", "aXYZbQc"),
        ("%", ""),
    ];
    for (pattern, value) in cases {
        let mut env = MapEnvironment::new();
        env.set("x", value);
        assert!(
            eval(&format!("x LIKE '{pattern}'"), &env),
            "{value:?} should match {pattern:?}"
        );
    }
}

#[test]
fn test_like_requires_string_subject() {
    let mut env = MapEnvironment::new();
    env.set("N", 42i64);
    assert!(!eval("N LIKE '42'", &env));
    assert!(!eval("N NOT LIKE '42'", &env));
    assert!(eval("(N LIKE '42') IS NULL", &env));
}

// ============================================================================
// Value inspection
// ============================================================================

#[test]
fn test_value_inspection() {
    let env = numeric_env();

    assert_eq!(selector("A").value(&env), Value::Inexact(42.0));
    assert_eq!(selector("B+1").value(&env), Value::Exact(40));
    assert_eq!(selector("A>B").value(&env), Value::Boolean(true));
    assert_eq!(selector("C").value(&env), Value::Unknown);
    assert_eq!(selector("C=1").value(&env), Value::Unknown);
    assert_eq!(
        selector("'hello'").value(&env),
        Value::text("hello")
    );
}
