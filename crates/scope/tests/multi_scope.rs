//! Two scopes fed from one argument vector.

use pretty_assertions::assert_eq;
use vista_scope::{EntryPoint, MultiScope, Namespace, Registry, Scope, Signature, Value, View};

fn setup() -> (Registry, Scope, Scope, MultiScope) {
	let registry = Registry::new();
	let config_1 = registry.create_scope("config_1", Namespace::new()).unwrap();
	let config_2 = registry.create_scope("config_2", Namespace::new()).unwrap();
	config_1
		.observe(
			View::new("config_1_base", |cfg| {
				cfg.set("text", "A")?;
				cfg.set("lr", 0.1)
			})
			.as_default(),
		)
		.unwrap();
	config_2
		.observe(
			View::new("config_2_base", |cfg| {
				cfg.set("text", "B")?;
				cfg.set("lr", 1.0)
			})
			.as_default(),
		)
		.unwrap();
	let multi = MultiScope::new([config_1.clone(), config_2.clone()]).unwrap();
	(registry, config_1, config_2, multi)
}

fn field(args: &vista_scope::Args, scope: &str, key: &str) -> Value {
	args.namespace(scope)
		.and_then(|ns| ns.get(key))
		.cloned()
		.unwrap_or_default()
}

#[test]
fn test_cli_isolation() {
	let (_registry, _, _, multi) = setup();
	multi
		.parse_args("t.py config_1.text=%X% config_2.lr=2.5".split_whitespace())
		.unwrap();

	let main = multi.entry(Signature::new().param("config_1").param("config_2"), |args| {
		(
			field(args, "config_1", "text"),
			field(args, "config_1", "lr"),
			field(args, "config_2", "text"),
			field(args, "config_2", "lr"),
		)
	});
	assert_eq!(
		main.invoke().unwrap(),
		(
			Value::from("X"),
			Value::Float(0.1),
			Value::from("B"),
			Value::Float(2.5),
		)
	);
}

#[test]
fn test_priority_chain_independence() {
	let (_registry, config_1, config_2, multi) = setup();
	config_1
		.observe(View::new("config_1_high", |cfg| cfg.set("lr", 0.2)).with_priority(1))
		.unwrap();
	config_2
		.observe(View::new("config_2_high", |cfg| cfg.set("lr", 2.0)).with_priority(1))
		.unwrap();
	config_1
		.observe(
			View::new("config_1_chain", |cfg| cfg.set("weight_decay", 1))
				.with_chain(["config_1_high"])
				.with_priority(2),
		)
		.unwrap();
	config_2
		.observe(
			View::new("config_2_chain", |cfg| cfg.set("weight_decay", 9))
				.with_chain(["config_2_high"])
				.with_priority(2),
		)
		.unwrap();

	multi
		.parse_args(["t.py", "config_1.config_1_chain", "config_2.config_2_chain"])
		.unwrap();
	let main = multi.entry(Signature::new().param("config_1").param("config_2"), |args| {
		(
			field(args, "config_1", "lr"),
			field(args, "config_1", "weight_decay"),
			field(args, "config_2", "lr"),
			field(args, "config_2", "weight_decay"),
		)
	});
	assert_eq!(
		main.invoke().unwrap(),
		(Value::Float(0.2), Value::Int(1), Value::Float(2.0), Value::Int(9))
	);
}

#[test]
fn test_registry_routes_like_multiscope() {
	let (registry, config_1, config_2, _) = setup();
	registry.ingest_command("config_2.text=%Y Z%").unwrap();
	assert_eq!(config_1.apply().unwrap().get("text"), Some(&Value::from("A")));
	assert_eq!(config_2.apply().unwrap().get("text"), Some(&Value::from("Y Z")));
}
