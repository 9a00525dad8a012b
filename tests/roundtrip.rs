//! Printing a value and reading the text back yields the same value, for
//! every value that has a textual form.

use lispy_rs::{parse, read_forms, Value};
use proptest::prelude::*;

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z_][a-z0-9_+*/=<>!&-]{0,8}").expect("valid regex")
}

fn string_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[ -~\n\t\r\x07\x08\x0b\x0c\x00]{0,16}").expect("valid regex")
}

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Number),
        symbol_strategy().prop_map(Value::Symbol),
        string_strategy().prop_map(Value::String),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::SExpr),
            prop::collection::vec(inner, 0..6).prop_map(Value::QExpr),
        ]
    })
}

fn reread(value: &Value) -> Value {
    let text = value.to_string();
    let program = parse(&text).unwrap_or_else(|err| panic!("{text:?} failed to parse: {err:#}"));
    let mut forms = read_forms(&program);
    assert_eq!(forms.len(), 1, "{text:?} read as {forms:?}");
    forms.remove(0)
}

proptest! {
    #[test]
    fn numbers_roundtrip(n in any::<i64>()) {
        prop_assert_eq!(reread(&Value::Number(n)), Value::Number(n));
    }

    #[test]
    fn strings_roundtrip(s in string_strategy()) {
        let value = Value::String(s);
        prop_assert_eq!(reread(&value), value);
    }

    #[test]
    fn nested_lists_roundtrip(value in value_strategy()) {
        prop_assert_eq!(reread(&value), value);
    }
}
