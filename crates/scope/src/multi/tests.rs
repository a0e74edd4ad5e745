use pretty_assertions::assert_eq;

use super::*;
use crate::{Assignment, Registry, Value, View};

fn multi() -> (MultiScope, Scope, Scope) {
	let registry = Registry::new();
	let first = registry.create_scope("config_1", Namespace::new()).unwrap();
	let second = registry.create_scope("config_2", Namespace::new()).unwrap();
	first
		.observe(View::new("config_1_base", |cfg| {
			cfg.set("text", "A")?;
			cfg.set("lr", 0.1)
		}).as_default())
		.unwrap();
	second
		.observe(View::new("config_2_base", |cfg| {
			cfg.set("text", "B")?;
			cfg.set("lr", 1.0)
		}).as_default())
		.unwrap();
	let multi = MultiScope::new([first.clone(), second.clone()]).unwrap();
	(multi, first, second)
}

#[test]
fn test_prefixed_tokens_stay_isolated() {
	let (multi, _, _) = multi();
	multi.ingest_command("config_1.text=%X% config_2.lr=2.5").unwrap();
	let resolved = multi.apply().unwrap();
	assert_eq!(resolved["config_1"].get("text"), Some(&Value::from("X")));
	assert_eq!(resolved["config_1"].get("lr"), Some(&Value::Float(0.1)));
	assert_eq!(resolved["config_2"].get("text"), Some(&Value::from("B")));
	assert_eq!(resolved["config_2"].get("lr"), Some(&Value::Float(2.5)));
}

#[test]
fn test_unique_view_name_routes_to_owner() {
	let (multi, first, second) = multi();
	second
		.observe(View::new("wide", |cfg| cfg.set("width", 2)))
		.unwrap();
	multi.route("wide").unwrap();
	assert!(first.assignments().is_empty());
	assert_eq!(second.assignments(), vec![Assignment::View("wide".into())]);
}

#[test]
fn test_shared_view_name_is_ambiguous() {
	let (multi, first, second) = multi();
	first.observe(View::new("shared", |_| Ok(()))).unwrap();
	second.observe(View::new("shared", |_| Ok(()))).unwrap();
	assert!(matches!(multi.route("shared"), Err(ScopeError::AmbiguousToken(_))));
	assert!(matches!(multi.route("lr=1"), Err(ScopeError::AmbiguousToken(_))));
	multi.route("config_2.shared").unwrap();
	assert!(first.assignments().is_empty());
}

#[test]
fn test_explicit_assign() {
	let (multi, first, _) = multi();
	multi.assign("config_1", "lr=0.7").unwrap();
	assert_eq!(first.apply().unwrap().get("lr"), Some(&Value::Float(0.7)));
	assert!(matches!(
		multi.assign("config_3", "lr=1"),
		Err(ScopeError::UnknownScope(_))
	));
}

#[test]
fn test_duplicate_member_is_rejected() {
	let scope = Registry::new().create_scope("config", Namespace::new()).unwrap();
	assert!(matches!(
		MultiScope::new([scope.clone(), scope]),
		Err(ScopeError::DuplicateScope(_))
	));
}

#[test]
fn test_entry_binds_every_member() {
	let (multi, first, _) = multi();
	multi.parse_args(["t.py", "config_1.text=%X%", "config_2.lr=2.5"]).unwrap();
	let main = multi.entry(
		Signature::new().param("config_1").param("config_2"),
		|args| {
			let get = |scope: &str, key: &str| {
				args.namespace(scope).and_then(|ns| ns.get(key)).cloned()
			};
			(get("config_1", "text"), get("config_2", "lr"))
		},
	);
	assert_eq!(
		main.invoke().unwrap(),
		(Some(Value::from("X")), Some(Value::Float(2.5)))
	);
	assert_eq!(first.config().get("text"), Some(&Value::from("X")));

	multi.clear_assignments();
	assert_eq!(
		main.invoke().unwrap(),
		(Some(Value::from("A")), Some(Value::Float(1.0)))
	);
}
