//! Entry points with an explicit parameter binding table.
//!
//! A [`Signature`] lists parameter names in order. When an entry point is
//! called, every parameter named after an active scope receives that scope's
//! freshly resolved namespace, wherever it sits in the list. Caller
//! positionals fill the remaining parameters left to right and keywords bind
//! by name. While a scope is paused its parameter is an ordinary one:
//! caller-supplied, else its default, else unset.

use indexmap::IndexMap;
use vista_value::{Namespace, Value};

use crate::scope::Scope;
use crate::{Result, ScopeError};

#[cfg(test)]
mod tests;

/// Something callable with a [`Call`].
pub trait EntryPoint {
	type Output;

	fn call(&self, call: Call) -> Result<Self::Output>;

	/// Calls without caller arguments.
	fn invoke(&self) -> Result<Self::Output> {
		self.call(Call::new())
	}
}

#[derive(Debug, Clone, PartialEq)]
struct Param {
	name: String,
	default: Option<Value>,
}

/// Ordered parameter declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
	params: Vec<Param>,
}

impl Signature {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn param(mut self, name: impl Into<String>) -> Self {
		self.params.push(Param {
			name: name.into(),
			default: None,
		});
		self
	}

	pub fn param_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
		self.params.push(Param {
			name: name.into(),
			default: Some(default.into()),
		});
		self
	}

	pub fn contains(&self, name: &str) -> bool {
		self.params.iter().any(|param| param.name == name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.params.iter().map(|param| param.name.as_str())
	}
}

/// Caller-supplied arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Call {
	positional: Vec<Value>,
	keyword: IndexMap<String, Value>,
}

impl Call {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn arg(mut self, value: impl Into<Value>) -> Self {
		self.positional.push(value.into());
		self
	}

	pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.keyword.insert(name.into(), value.into());
		self
	}
}

/// Bound arguments handed to an entry function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
	values: IndexMap<String, Value>,
}

impl Args {
	/// The bound value, or `None` for an unset paused scope parameter.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	pub fn require(&self, name: &str) -> Result<&Value> {
		self.get(name)
			.ok_or_else(|| ScopeError::MissingArgument(name.to_string()))
	}

	/// The injected namespace bound to `name`.
	pub fn namespace(&self, name: &str) -> Option<&Namespace> {
		self.get(name)?.as_map()
	}

	pub fn namespace_mut(&mut self, name: &str) -> Option<&mut Namespace> {
		self.values.get_mut(name)?.as_map_mut()
	}

	pub fn is_set(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}
}

/// A scope's contribution to one call: its resolved namespace, or `None` while paused.
pub(crate) struct Injection {
	pub name: String,
	pub namespace: Option<Namespace>,
}

impl Injection {
	/// Resolves `scope` for a call to `signature`, unless it is paused or not bound there.
	pub(crate) fn resolve(scope: &Scope, signature: &Signature) -> Result<Option<Self>> {
		if !signature.contains(scope.name()) {
			return Ok(None);
		}
		let namespace = if scope.is_paused() {
			tracing::debug!(domain = "scope", scope = scope.name(), "paused; injection skipped");
			None
		} else {
			Some(scope.apply()?)
		};
		Ok(Some(Self {
			name: scope.name().to_string(),
			namespace,
		}))
	}

	fn is_active(&self) -> bool {
		self.namespace.is_some()
	}
}

/// Binds `call` against `signature` with the given injections.
pub(crate) fn bind(signature: &Signature, call: Call, injections: &[Injection]) -> Result<Args> {
	let injection = |name: &str| injections.iter().find(|inj| inj.name == name);
	let injected = |name: &str| injection(name).is_some_and(Injection::is_active);

	let free: Vec<&Param> = signature
		.params
		.iter()
		.filter(|param| !injected(&param.name))
		.collect();
	if call.positional.len() > free.len() {
		if let Some(active) = injections.iter().find(|inj| inj.is_active()) {
			return Err(ScopeError::InjectionConflict(active.name.clone()));
		}
		return Err(ScopeError::TooManyArguments {
			expected: free.len(),
			got: call.positional.len(),
		});
	}

	let mut values = IndexMap::new();
	for (param, value) in free.iter().zip(call.positional) {
		values.insert(param.name.clone(), value);
	}
	for (name, value) in call.keyword {
		if injected(&name) {
			return Err(ScopeError::InjectionConflict(name));
		}
		if !signature.contains(&name) {
			return Err(ScopeError::UnexpectedArgument(name));
		}
		if values.contains_key(&name) {
			return Err(ScopeError::DuplicateArgument(name));
		}
		values.insert(name, value);
	}
	for inj in injections {
		if let Some(ns) = &inj.namespace {
			values.insert(inj.name.clone(), Value::Map(ns.clone()));
		}
	}

	let mut args = Args::default();
	for param in &signature.params {
		match values.shift_remove(&param.name).or_else(|| param.default.clone()) {
			Some(value) => {
				args.values.insert(param.name.clone(), value);
			}
			None if injection(&param.name).is_some() => {}
			None => return Err(ScopeError::MissingArgument(param.name.clone())),
		}
	}
	Ok(args)
}

/// An entry function bound to one scope.
pub struct Entry<F> {
	scope: Scope,
	signature: Signature,
	f: F,
}

impl<F> Entry<F> {
	pub(crate) fn new(scope: Scope, signature: Signature, f: F) -> Self {
		Self { scope, signature, f }
	}

	pub fn signature(&self) -> &Signature {
		&self.signature
	}
}

impl<F, R> EntryPoint for Entry<F>
where
	F: Fn(&mut Args) -> R,
{
	type Output = R;

	/// Resolves the scope, binds arguments, calls the function and writes the
	/// injected namespace back as the scope's config.
	fn call(&self, call: Call) -> Result<R> {
		let injections: Vec<Injection> = Injection::resolve(&self.scope, &self.signature)?
			.into_iter()
			.collect();
		let mut args = bind(&self.signature, call, &injections)?;
		let output = (self.f)(&mut args);
		write_back(std::slice::from_ref(&self.scope), &injections, &args);
		Ok(output)
	}
}

/// Stores each active injection's namespace, as mutated by the call, in its scope.
pub(crate) fn write_back(scopes: &[Scope], injections: &[Injection], args: &Args) {
	for inj in injections.iter().filter(|inj| inj.is_active()) {
		let scope = scopes.iter().find(|scope| scope.name() == inj.name);
		if let (Some(scope), Some(ns)) = (scope, args.namespace(&inj.name)) {
			scope.store_config(ns.clone());
		}
	}
}
