use pretty_assertions::assert_eq;

use super::*;

fn list(values: Vec<Value>) -> Value {
	Value::List(values)
}

#[test]
fn test_scalars() {
	assert_eq!(parse_text("1024").unwrap(), Value::Int(1024));
	assert_eq!(parse_text("-3").unwrap(), Value::Int(-3));
	assert_eq!(parse_text("1_000").unwrap(), Value::Int(1000));
	assert_eq!(parse_text("0.1").unwrap(), Value::Float(0.1));
	assert_eq!(parse_text("1e-3").unwrap(), Value::Float(0.001));
	assert_eq!(parse_text("True").unwrap(), Value::Bool(true));
	assert_eq!(parse_text("false").unwrap(), Value::Bool(false));
	assert_eq!(parse_text("None").unwrap(), Value::Null);
	assert_eq!(parse_text("resnet").unwrap(), Value::from("resnet"));
}

#[test]
fn test_non_numeric_words_stay_strings() {
	assert_eq!(parse_text("inf").unwrap(), Value::from("inf"));
	assert_eq!(parse_text("nan").unwrap(), Value::from("nan"));
	assert_eq!(parse_text("1.2.3").unwrap(), Value::from("1.2.3"));
}

#[test]
fn test_quoted_strings() {
	assert_eq!(parse_text("'42'").unwrap(), Value::from("42"));
	assert_eq!(parse_text("\"true\"").unwrap(), Value::from("true"));
}

#[test]
fn test_literal_preserves_whitespace_and_punctuation() {
	assert_eq!(
		parse_text("%Elsa is doing magic.%").unwrap(),
		Value::from("Elsa is doing magic.")
	);
	assert_eq!(parse_text("%a, b: [c]%").unwrap(), Value::from("a, b: [c]"));
}

#[test]
fn test_literal_with_trailing_text_fails() {
	assert!(matches!(parse_text("%a%b"), Err(ValueError::TrailingInput(_))));
}

#[test]
fn test_nested_list() {
	assert_eq!(
		parse_text("[1, 4, [1, 2, 3]]").unwrap(),
		list(vec![
			Value::Int(1),
			Value::Int(4),
			list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
		])
	);
}

#[test]
fn test_empty_and_trailing_comma_lists() {
	assert_eq!(parse_text("[]").unwrap(), list(vec![]));
	assert_eq!(parse_text("[ ]").unwrap(), list(vec![]));
	assert_eq!(parse_text("[1, 2,]").unwrap(), list(vec![Value::Int(1), Value::Int(2)]));
	assert!(matches!(parse_text("[1,,2]"), Err(ValueError::InvalidEntry(_))));
}

#[test]
fn test_list_with_literal_element() {
	assert_eq!(
		parse_text("[%text, with comma%, 1]").unwrap(),
		list(vec![Value::from("text, with comma"), Value::Int(1)])
	);
}

#[test]
fn test_mapping() {
	let value = parse_text("{a: 1, 'b': [0.9, 0.99], c: {d: %x y%}}").unwrap();
	let ns = value.as_map().unwrap();
	assert_eq!(ns.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
	assert_eq!(ns.get("a"), Some(&Value::Int(1)));
	assert_eq!(
		ns.get("b"),
		Some(&list(vec![Value::Float(0.9), Value::Float(0.99)]))
	);
	assert_eq!(ns.get("c.d"), Some(&Value::from("x y")));
}

#[test]
fn test_mapping_entry_without_colon_fails() {
	assert!(matches!(parse_text("{a 1}"), Err(ValueError::InvalidEntry(_))));
	assert!(matches!(parse_text("{: 1}"), Err(ValueError::InvalidEntry(_))));
}

#[test]
fn test_unbalanced_brackets_fail() {
	assert!(matches!(parse_text("[1, 2"), Err(ValueError::Parse(_))));
	assert!(matches!(parse_text("{a: [1}"), Err(ValueError::Parse(_))));
	assert!(matches!(parse_text("[1] extra"), Err(ValueError::TrailingInput(_))));
}

#[test]
fn test_underscores_only_between_digits() {
	assert_eq!(parse_text("1_000_000").unwrap(), Value::Int(1_000_000));
	assert_eq!(parse_text("0.000_1").unwrap(), Value::Float(0.0001));
	assert_eq!(parse_text("_1").unwrap(), Value::from("_1"));
	assert_eq!(parse_text("1__").unwrap(), Value::from("1__"));
	assert_eq!(parse_text("1__0").unwrap(), Value::from("1__0"));
	assert_eq!(parse_text("1_").unwrap(), Value::from("1_"));
}

#[test]
fn test_literal_escapes_are_unescaped() {
	assert_eq!(parse_text(r"%50\% off%").unwrap(), Value::from("50% off"));
	assert_eq!(parse_text(r"%a\\b%").unwrap(), Value::from(r"a\b"));
	assert_eq!(
		parse_text(r"[%x\%%, 1]").unwrap(),
		list(vec![Value::from("x%"), Value::Int(1)])
	);
}

#[test]
fn test_dotted_mapping_keys_nest() {
	let value = parse_text("{a.b: 1, a.c: 2, d: 3}").unwrap();
	let ns = value.as_map().unwrap();
	assert_eq!(ns.keys().collect::<Vec<_>>(), vec!["a", "d"]);
	assert_eq!(ns.get("a.b"), Some(&Value::Int(1)));
	assert_eq!(ns.get("a.c"), Some(&Value::Int(2)));
	assert!(matches!(parse_text("{a: 1, a.b: 2}"), Err(ValueError::NotAMapping { .. })));
}
