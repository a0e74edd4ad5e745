use pretty_assertions::assert_eq;

use super::*;

fn sample() -> Namespace {
	let mut ns = Namespace::new();
	ns.set("learning_rate", 0.1).unwrap();
	ns.set("batch_size", 128).unwrap();
	ns.set("model.depth", 4).unwrap();
	ns.set("model.name", "resnet").unwrap();
	ns
}

#[test]
fn test_set_and_get_top_level() {
	let ns = sample();
	assert_eq!(ns.get("learning_rate"), Some(&Value::Float(0.1)));
	assert_eq!(ns.get("batch_size"), Some(&Value::Int(128)));
	assert!(ns.get("missing").is_none());
}

#[test]
fn test_set_creates_intermediate_mappings() {
	let ns = sample();
	assert_eq!(ns.get("model.depth"), Some(&Value::Int(4)));
	assert!(ns.get("model").and_then(Value::as_map).is_some());
	assert_eq!(ns.keys().collect::<Vec<_>>(), vec!["learning_rate", "batch_size", "model"]);
}

#[test]
fn test_set_returns_previous_value() {
	let mut ns = sample();
	let previous = ns.set("batch_size", 256).unwrap();
	assert_eq!(previous, Some(Value::Int(128)));
	// Overwriting keeps the original insertion slot.
	assert_eq!(ns.keys().nth(1), Some("batch_size"));
}

#[test]
fn test_set_through_scalar_fails() {
	let mut ns = sample();
	let err = ns.set("batch_size.inner", 1).unwrap_err();
	match err {
		ValueError::NotAMapping { path, found } => {
			assert_eq!(path, "batch_size");
			assert_eq!(found, "int");
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn test_invalid_paths() {
	let mut ns = Namespace::new();
	assert!(matches!(ns.set("", 1), Err(ValueError::InvalidPath(_))));
	assert!(matches!(ns.set("a..b", 1), Err(ValueError::InvalidPath(_))));
	assert!(matches!(ns.set("a.", 1), Err(ValueError::InvalidPath(_))));
}

#[test]
fn test_remove_nested_preserves_order() {
	let mut ns = sample();
	ns.set("model.width", 64).unwrap();
	assert_eq!(ns.remove("model.name"), Some(Value::from("resnet")));
	let model = ns.get("model").and_then(Value::as_map).unwrap();
	assert_eq!(model.keys().collect::<Vec<_>>(), vec!["depth", "width"]);
	assert_eq!(ns.remove("model.name"), None);
	assert_eq!(ns.remove("nope.deeper"), None);
}

#[test]
fn test_get_mut_in_place() {
	let mut ns = sample();
	if let Some(Value::Int(depth)) = ns.get_mut("model.depth") {
		*depth += 1;
	}
	assert_eq!(ns.get("model.depth"), Some(&Value::Int(5)));
}

#[test]
fn test_display_is_stable() {
	let ns = sample();
	assert_eq!(
		ns.to_string(),
		r#"{learning_rate: 0.1, batch_size: 128, model: {depth: 4, name: "resnet"}}"#
	);
}

#[test]
fn test_json_roundtrip_preserves_order_and_types() {
	let ns = sample();
	let json = ns.to_json_string().unwrap();
	let restored = Namespace::from_json_str(&json).unwrap();
	assert_eq!(restored, ns);
	assert_eq!(restored.get("learning_rate"), Some(&Value::Float(0.1)));
}

#[test]
fn test_json_null_and_lists() {
	let ns = Namespace::from_json_str(r#"{"eps": [1, 2.5], "note": null, "on": true}"#).unwrap();
	assert_eq!(ns.get("eps"), Some(&Value::List(vec![Value::Int(1), Value::Float(2.5)])));
	assert_eq!(ns.get("note"), Some(&Value::Null));
	assert_eq!(ns.get("on"), Some(&Value::Bool(true)));
}

#[test]
fn test_json_file_loading() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("defaults.json");
	std::fs::write(&path, r#"{"learning_rate": 0.1, "batch_size": 128}"#).unwrap();
	let ns = Namespace::from_json_file(&path).unwrap();
	assert_eq!(ns.get("batch_size"), Some(&Value::Int(128)));

	let missing = Namespace::from_json_file(dir.path().join("missing.json"));
	assert!(matches!(missing, Err(ValueError::Io { .. })));
}

#[test]
fn test_from_iterator_keeps_keys_verbatim() {
	let ns: Namespace = [("a.b", 1)].into_iter().collect();
	assert!(ns.get("a.b").is_none());
	assert_eq!(ns.len(), 1);
	assert_eq!(ns.keys().next(), Some("a.b"));
}
