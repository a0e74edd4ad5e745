use pretty_assertions::assert_eq;

use super::*;
use crate::{Registry, View};

fn scope() -> Scope {
	let defaults: Namespace = [("learning_rate", Value::Float(0.1))].into_iter().collect();
	let scope = Registry::new().create_scope("cfg", defaults).unwrap();
	scope
		.observe(View::new("fast", |cfg| cfg.set("learning_rate", 0.5)))
		.unwrap();
	scope
}

fn lr(args: &Args) -> Option<Value> {
	args.namespace("cfg")?.get("learning_rate").cloned()
}

#[test]
fn test_injects_resolved_namespace() {
	let scope = scope();
	scope.activate("fast");
	let entry = scope.entry(Signature::new().param("cfg"), |args| lr(args));
	assert_eq!(entry.invoke().unwrap(), Some(Value::Float(0.5)));
}

#[test]
fn test_injected_parameter_position_is_free() {
	let scope = scope();
	let front = scope.entry(Signature::new().param("my_argument").param("cfg"), |args| {
		args.require("my_argument").cloned()
	});
	let back = scope.entry(Signature::new().param("cfg").param("my_argument"), |args| {
		args.require("my_argument").cloned()
	});
	assert_eq!(front.call(Call::new().arg("hi")).unwrap().unwrap(), Value::from("hi"));
	assert_eq!(back.call(Call::new().arg("bye")).unwrap().unwrap(), Value::from("bye"));
}

#[test]
fn test_mutations_are_written_back() {
	let scope = scope();
	let entry = scope.entry(Signature::new().param("cfg").param("my_argument"), |args| {
		let value = args.require("my_argument").cloned();
		if let (Some(cfg), Ok(value)) = (args.namespace_mut("cfg"), value) {
			cfg.insert("check_argument", value);
		}
	});
	entry.call(Call::new().arg("bye")).unwrap();
	assert_eq!(scope.config().get("check_argument"), Some(&Value::from("bye")));
}

#[test]
fn test_caller_cannot_bind_injected_parameter() {
	let scope = scope();
	let entry = scope.entry(Signature::new().param_default("cfg", Value::Null), |args| lr(args));
	assert!(matches!(
		entry.call(Call::new().arg(Namespace::new())),
		Err(ScopeError::InjectionConflict(name)) if name == "cfg"
	));
	assert!(matches!(
		entry.call(Call::new().kwarg("cfg", 1)),
		Err(ScopeError::InjectionConflict(_))
	));
}

#[test]
fn test_paused_scope_uses_default() {
	let scope = scope();
	let entry = scope.entry(Signature::new().param_default("cfg", Value::Null), |args| {
		args.get("cfg").cloned()
	});
	{
		let _paused = scope.pause();
		assert_eq!(entry.invoke().unwrap(), Some(Value::Null));
		assert_eq!(
			entry.call(Call::new().arg(7)).unwrap(),
			Some(Value::Int(7))
		);
	}
	assert!(matches!(entry.invoke().unwrap(), Some(Value::Map(_))));
}

#[test]
fn test_paused_scope_without_default_is_unset() {
	let scope = scope();
	let entry = scope.entry(Signature::new().param("cfg"), |args| args.is_set("cfg"));
	let _paused = scope.pause();
	assert!(!entry.invoke().unwrap());
}

#[test]
fn test_binding_errors() {
	let scope = scope();
	let entry = scope.entry(Signature::new().param("cfg").param("x"), |_| ());
	assert!(matches!(entry.invoke(), Err(ScopeError::MissingArgument(name)) if name == "x"));
	assert!(matches!(
		entry.call(Call::new().arg(1).kwarg("x", 2)),
		Err(ScopeError::DuplicateArgument(_))
	));
	assert!(matches!(
		entry.call(Call::new().kwarg("y", 2)),
		Err(ScopeError::UnexpectedArgument(_))
	));

	let _paused = scope.pause();
	assert!(matches!(
		entry.call(Call::new().arg(1).arg(2).arg(3)),
		Err(ScopeError::TooManyArguments { expected: 2, got: 3 })
	));
}

#[test]
fn test_keyword_arguments_bind_by_name() {
	let scope = scope();
	let entry = scope.entry(
		Signature::new().param("a").param("cfg").param_default("b", 2),
		|args| (args.require("a").cloned().ok(), args.get("b").cloned()),
	);
	let (a, b) = entry.call(Call::new().kwarg("a", 1)).unwrap();
	assert_eq!(a, Some(Value::Int(1)));
	assert_eq!(b, Some(Value::Int(2)));
}

#[test]
fn test_signature_without_scope_parameter_skips_resolution() {
	let scope = scope();
	scope.activate("missing");
	let entry = scope.entry(Signature::new().param("x"), |args| args.get("x").cloned());
	assert_eq!(entry.call(Call::new().arg(1)).unwrap(), Some(Value::Int(1)));
	assert!(scope.entry(Signature::new().param("cfg"), |_| ()).invoke().is_err());
}
