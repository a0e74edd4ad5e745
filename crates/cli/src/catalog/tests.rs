use std::io::Write;

use pretty_assertions::assert_eq;
use vista_scope::{Registry, Value};

use super::*;

const CATALOG: &str = r#"[
	{ "name": "base", "default": true, "set": { "lr": 0.1, "text": "A" } },
	{ "name": "fast", "priority": 10, "set": { "lr": 0.5, "model.depth": 18 } },
	{ "name": "tuned", "chain_with": ["fast"], "set": { "weight_decay": 0.01 } }
]"#;

fn scope_with_catalog() -> Scope {
	let scope = Registry::new().create_scope("config", Namespace::new()).unwrap();
	register(&scope, parse_catalog(CATALOG).unwrap()).unwrap();
	scope
}

#[test]
fn test_parse_fills_defaults() {
	let specs = parse_catalog(CATALOG).unwrap();
	assert_eq!(specs.len(), 3);
	assert_eq!(specs[0].priority, 0);
	assert!(specs[0].default);
	assert_eq!(specs[2].chain_with, vec!["fast".to_string()]);
	assert_eq!(specs[1].set.keys().collect::<Vec<_>>(), vec!["lr", "model.depth"]);
}

#[test]
fn test_default_view_applies_without_activation() {
	let scope = scope_with_catalog();
	let config = scope.apply().unwrap();
	assert_eq!(config.get("lr"), Some(&Value::Float(0.1)));
	assert_eq!(config.get("text"), Some(&Value::from("A")));
}

#[test]
fn test_declared_chain_and_overrides() {
	let scope = scope_with_catalog();
	scope.ingest_command("tuned lr=0.3 weight_decay=0").unwrap();
	let config = scope.apply().unwrap();
	assert_eq!(config.get("lr"), Some(&Value::Float(0.3)));
	assert_eq!(config.get("model.depth"), Some(&Value::Int(18)));
	assert_eq!(config.get("weight_decay"), Some(&Value::Float(0.01)));
	assert_eq!(scope.assigned_views().views, vec!["base", "fast", "tuned"]);
}

#[test]
fn test_chain_to_later_view_is_rejected() {
	let scope = Registry::new().create_scope("config", Namespace::new()).unwrap();
	let specs = parse_catalog(r#"[{ "name": "a", "chain_with": ["b"] }, { "name": "b" }]"#).unwrap();
	assert!(matches!(
		register(&scope, specs),
		Err(CatalogError::Scope(ScopeError::UnknownView { .. }))
	));
}

#[test]
fn test_load_from_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(CATALOG.as_bytes()).unwrap();
	let specs = load_catalog(file.path()).unwrap();
	assert_eq!(specs[1].name, "fast");

	assert!(matches!(
		load_catalog(Path::new("/nonexistent/views.json")),
		Err(CatalogError::Io { .. })
	));
	assert!(matches!(parse_catalog("{"), Err(CatalogError::Json(_))));
}
