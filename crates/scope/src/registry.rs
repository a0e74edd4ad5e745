//! Catalog of live scopes.
//!
//! A [`Registry`] owns the scopes created through it and the compiled
//! lazy-block cache they share. Hosts that want isolation create their own
//! with [`Registry::new`]; [`Registry::global`] is the process-wide instance
//! that [`Scope::new`] uses, and [`Registry::initialize`] empties it.

use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use parking_lot::RwLock;
use vista_value::Namespace;

use crate::lazy::LazyCache;
use crate::route;
use crate::scope::Scope;
use crate::{Result, ScopeError};


static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Scopes keyed by name, in creation order.
#[derive(Clone, Default)]
pub struct Registry {
	scopes: Arc<RwLock<IndexMap<String, Scope>>>,
	cache: LazyCache,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// The process-wide registry.
	pub fn global() -> &'static Registry {
		&GLOBAL
	}

	/// Empties the process-wide registry.
	pub fn initialize() {
		Self::global().reset();
	}

	/// Drops every scope and cached lazy block.
	///
	/// Existing [`Scope`] handles keep working but are no longer reachable
	/// through this registry.
	pub fn reset(&self) {
		let dropped = {
			let mut scopes = self.scopes.write();
			let count = scopes.len();
			scopes.clear();
			count
		};
		self.cache.clear();
		tracing::debug!(domain = "registry", dropped, "registry reset");
	}

	/// Creates and registers a scope.
	///
	/// # Errors
	///
	/// [`ScopeError::DuplicateScope`] if `name` is taken.
	pub fn create_scope(&self, name: impl Into<String>, defaults: Namespace) -> Result<Scope> {
		let name = name.into();
		let mut scopes = self.scopes.write();
		if scopes.contains_key(&name) {
			return Err(ScopeError::DuplicateScope(name));
		}
		let scope = Scope::build(name.clone(), defaults, self.cache.clone());
		tracing::debug!(domain = "registry", scope = name.as_str(), "scope created");
		scopes.insert(name, scope.clone());
		Ok(scope)
	}

	pub fn get(&self, name: &str) -> Option<Scope> {
		self.scopes.read().get(name).cloned()
	}

	/// Like [`Registry::get`], failing with [`ScopeError::UnknownScope`].
	pub fn scope(&self, name: &str) -> Result<Scope> {
		self.get(name)
			.ok_or_else(|| ScopeError::UnknownScope(name.to_string()))
	}

	pub fn scope_names(&self) -> Vec<String> {
		self.scopes.read().keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.scopes.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.scopes.read().is_empty()
	}

	pub fn lazy_cache(&self) -> &LazyCache {
		&self.cache
	}

	/// Tokenizes `text` and routes each token to a registered scope.
	pub fn ingest_command(&self, text: &str) -> Result<()> {
		route::ingest(&self.snapshot(), text)
	}

	/// Ingests a process argument vector; the first element is the program name.
	///
	/// ```ignore
	/// Registry::global().parse_args(std::env::args())?;
	/// ```
	pub fn parse_args<I, S>(&self, argv: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		route::ingest_args(&self.snapshot(), argv)
	}

	/// Handles to every scope, taken so routing runs without the registry lock.
	fn snapshot(&self) -> IndexMap<String, Scope> {
		self.scopes.read().clone()
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("scopes", &self.scope_names())
			.field("cache", &self.cache)
			.finish()
	}
}
