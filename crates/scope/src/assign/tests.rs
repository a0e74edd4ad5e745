use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_view_activation() {
	assert_eq!(Assignment::parse("test_view").unwrap(), Assignment::View("test_view".into()));
}

#[test]
fn test_direct_assignment_keeps_text() {
	let assignment = Assignment::parse("num_layers=[1, 4, [1, 2, 3]]").unwrap();
	let Assignment::Direct { path, value, text } = assignment else {
		panic!("expected a direct assignment");
	};
	assert_eq!(path, "num_layers");
	assert_eq!(
		value,
		Value::List(vec![
			Value::Int(1),
			Value::Int(4),
			Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
		])
	);
	assert_eq!(text, "num_layers=[1, 4, [1, 2, 3]]");
}

#[test]
fn test_value_may_contain_equals() {
	let assignment = Assignment::parse("expr=%a=b%").unwrap();
	assert_eq!(assignment.key(), "expr");
	assert!(matches!(assignment, Assignment::Direct { value: Value::Str(ref s), .. } if s == "a=b"));
}

#[test]
fn test_nested_path() {
	let assignment = Assignment::parse("model.depth=4").unwrap();
	assert_eq!(assignment.key(), "model.depth");
}

#[test]
fn test_invalid_tokens() {
	for token in ["", "=1", "a..b=1", "bad name", ".x=1", "a b=1"] {
		assert!(
			matches!(Assignment::parse(token), Err(ScopeError::InvalidAssignment(_))),
			"{token:?} should be rejected"
		);
	}
}

#[test]
fn test_malformed_value_is_a_value_error() {
	assert!(matches!(Assignment::parse("layers=[1, 2"), Err(ScopeError::Value(_))));
}

#[test]
fn test_direct_renders_text() {
	assert_eq!(
		Assignment::direct("lr", 0.5),
		Assignment::Direct {
			path: "lr".into(),
			value: Value::Float(0.5),
			text: "lr=0.5".into(),
		}
	);
}

#[test]
fn test_overlaps() {
	assert!(overlaps("lr", "lr"));
	assert!(overlaps("model", "model.depth"));
	assert!(overlaps("model.depth", "model"));
	assert!(!overlaps("model", "models"));
	assert!(!overlaps("lr", "batch_size"));
}
