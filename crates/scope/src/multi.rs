//! Several scopes sharing one command stream.

use indexmap::IndexMap;
use vista_value::Namespace;

use crate::entry::{Args, Call, EntryPoint, Injection, Signature, bind, write_back};
use crate::route;
use crate::scope::Scope;
use crate::{Result, ScopeError};

#[cfg(test)]
mod tests;

/// An ordered set of scopes keyed by name.
///
/// Owns no namespace of its own. Tokens are routed to member scopes (see
/// the routing rules on [`MultiScope::route`]) and each member resolves in
/// isolation.
#[derive(Debug, Clone)]
pub struct MultiScope {
	scopes: IndexMap<String, Scope>,
}

impl MultiScope {
	/// # Errors
	///
	/// [`ScopeError::DuplicateScope`] if two members share a name.
	pub fn new(scopes: impl IntoIterator<Item = Scope>) -> Result<Self> {
		let mut members = IndexMap::new();
		for scope in scopes {
			let name = scope.name().to_string();
			if members.contains_key(&name) {
				return Err(ScopeError::DuplicateScope(name));
			}
			members.insert(name, scope);
		}
		Ok(Self { scopes: members })
	}

	pub fn get(&self, name: &str) -> Option<&Scope> {
		self.scopes.get(name)
	}

	pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
		self.scopes.values()
	}

	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	/// Queues `token` in the member it routes to.
	///
	/// A `<scope>.` prefix wins and is stripped; otherwise a bare view name
	/// owned by exactly one member goes there; otherwise a lone member takes
	/// everything. Anything else is [`ScopeError::AmbiguousToken`].
	pub fn route(&self, token: &str) -> Result<()> {
		let (scope, rest) = route::route(&self.scopes, token)?;
		scope.assign(&rest)
	}

	/// Queues `token` in the named member, bypassing routing.
	pub fn assign(&self, scope: &str, token: &str) -> Result<()> {
		self.scopes
			.get(scope)
			.ok_or_else(|| ScopeError::UnknownScope(scope.to_string()))?
			.assign(token)
	}

	pub fn ingest_command(&self, text: &str) -> Result<()> {
		route::ingest(&self.scopes, text)
	}

	/// Ingests a process argument vector; the first element is the program name.
	pub fn parse_args<I, S>(&self, argv: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		route::ingest_args(&self.scopes, argv)
	}

	pub fn clear_assignments(&self) {
		self.scopes.values().for_each(Scope::clear_assignments);
	}

	/// Resolves every member independently.
	pub fn apply(&self) -> Result<IndexMap<String, Namespace>> {
		let mut resolved = IndexMap::with_capacity(self.scopes.len());
		for (name, scope) in &self.scopes {
			resolved.insert(name.clone(), scope.apply()?);
		}
		Ok(resolved)
	}

	/// Wraps `f` so each member's namespace is bound to the parameter of the same name.
	pub fn entry<F, R>(&self, signature: Signature, f: F) -> MultiEntry<F>
	where
		F: Fn(&mut Args) -> R,
	{
		MultiEntry {
			scopes: self.scopes.values().cloned().collect(),
			signature,
			f,
		}
	}
}

/// An entry function bound to several scopes.
pub struct MultiEntry<F> {
	scopes: Vec<Scope>,
	signature: Signature,
	f: F,
}

impl<F, R> EntryPoint for MultiEntry<F>
where
	F: Fn(&mut Args) -> R,
{
	type Output = R;

	fn call(&self, call: Call) -> Result<R> {
		let mut injections = Vec::with_capacity(self.scopes.len());
		for scope in &self.scopes {
			injections.extend(Injection::resolve(scope, &self.signature)?);
		}
		let mut args = bind(&self.signature, call, &injections)?;
		let output = (self.f)(&mut args);
		write_back(&self.scopes, &injections, &args);
		Ok(output)
	}
}
