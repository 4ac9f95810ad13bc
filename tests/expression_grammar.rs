//! Parser / concrete-transformer behavior over the expression grammar
//! (Testable Property 1 of the evaluation pipeline: the parser accepts
//! every construct in the grammar and rejects malformed input).

use std::collections::BTreeMap;

use decision_flow_engine::expression::{eval_concrete, parse, Value};
use rstest::rstest;

fn env() -> BTreeMap<String, Value> {
    let mut env = BTreeMap::new();
    env.insert("age".to_string(), Value::Int(21));
    env.insert("name".to_string(), Value::Str("Ada".to_string()));
    env.insert(
        "user".to_string(),
        Value::Object(BTreeMap::from([("active".to_string(), Value::Bool(true))])),
    );
    env.insert(
        "tags".to_string(),
        Value::List(vec![Value::Str("a".to_string()), Value::Str("b".to_string())]),
    );
    env
}

#[rstest]
#[case("age >= 18", Value::Bool(true))]
#[case("age < 18", Value::Bool(false))]
#[case("age == 21 and name == \"Ada\"", Value::Bool(true))]
#[case("age == 21 or name == \"Bob\"", Value::Bool(true))]
#[case("not (age < 18)", Value::Bool(true))]
#[case("user.active", Value::Bool(true))]
#[case("\"a\" in tags", Value::Bool(true))]
#[case("\"c\" in tags", Value::Bool(false))]
#[case("if age >= 18 then \"adult\" else \"minor\"", Value::Str("adult".to_string()))]
#[case("tags[1]", Value::Str("a".to_string()))]
#[case("1 + 2 * 3", Value::Int(7))]
#[case("(1 + 2) * 3", Value::Int(9))]
fn evaluates_expected_value(#[case] source: &str, #[case] expected: Value) {
    let expr = parse(source).unwrap_or_else(|e| panic!("failed to parse `{source}`: {e}"));
    let value = eval_concrete(&expr, &env()).unwrap_or_else(|e| panic!("failed to evaluate `{source}`: {e}"));
    assert_eq!(value, expected);
}

#[rstest]
#[case("age >=")]
#[case("(age + 1")]
#[case("\"unterminated")]
#[case("age @ 1")]
fn rejects_malformed_source(#[case] source: &str) {
    assert!(parse(source).is_err(), "expected `{source}` to fail parsing");
}

#[test]
fn null_propagates_through_comparisons() {
    let mut env = env();
    env.insert("missing".to_string(), Value::Null);
    let expr = parse("missing == null").unwrap();
    let value = eval_concrete(&expr, &env).unwrap();
    assert_eq!(value, Value::Bool(true));
}

#[test]
fn substring_indexing_is_one_based() {
    let expr = parse("substring(name, 1, 2)").unwrap();
    let value = eval_concrete(&expr, &env()).unwrap();
    assert_eq!(value, Value::Str("Ad".to_string()));
}
