//! The [`Scope`] handle.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use vista_trace::{Fingerprint, TraceLog};
use vista_value::{Namespace, Value};

use crate::assign::Assignment;
use crate::entry::{Entry, Signature};
use crate::lazy::LazyCache;
use crate::registry::Registry;
use crate::resolve::{self, AssignedViews, Plan};
use crate::traced::{RuntimeTraced, Traced};
use crate::view::View;
use crate::{EntryPoint, Result, ScopeError};


/// A named configuration namespace with its views and pending assignments.
///
/// Cloning a `Scope` yields another handle to the same scope.
#[derive(Clone)]
pub struct Scope {
	inner: Arc<ScopeInner>,
}

struct ScopeInner {
	name: String,
	cache: LazyCache,
	state: Mutex<ScopeState>,
}

struct ScopeState {
	defaults: Namespace,
	/// Namespace as of the last resolution or entry call.
	config: Namespace,
	views: IndexMap<String, Arc<View>>,
	assignments: Vec<Assignment>,
	pause_depth: usize,
	traces: TraceLog,
	/// Report of the last resolution, if any.
	applied: Option<AssignedViews>,
}

impl Scope {
	/// Creates a scope with empty defaults in the global registry.
	pub fn new(name: impl Into<String>) -> Result<Self> {
		Registry::global().create_scope(name, Namespace::new())
	}

	/// Creates a scope with `defaults` in the global registry.
	pub fn with_defaults(name: impl Into<String>, defaults: Namespace) -> Result<Self> {
		Registry::global().create_scope(name, defaults)
	}

	/// Clears the global registry. Call before building scopes in an isolated context.
	pub fn initialize_registry() {
		Registry::initialize();
	}

	pub(crate) fn build(name: String, defaults: Namespace, cache: LazyCache) -> Self {
		Self {
			inner: Arc::new(ScopeInner {
				name,
				cache,
				state: Mutex::new(ScopeState {
					config: defaults.clone(),
					defaults,
					views: IndexMap::new(),
					assignments: Vec::new(),
					pause_depth: 0,
					traces: TraceLog::new(),
					applied: None,
				}),
			}),
		}
	}

	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// Registers a view.
	///
	/// # Errors
	///
	/// [`ScopeError::DuplicateView`] for a name already registered here, and
	/// [`ScopeError::UnknownView`] for a `chain_with` predecessor that is not.
	pub fn observe(&self, view: View) -> Result<()> {
		let mut state = self.inner.state.lock();
		if state.views.contains_key(view.name()) {
			return Err(ScopeError::DuplicateView {
				scope: self.inner.name.clone(),
				view: view.name().to_string(),
			});
		}
		if let Some(missing) = view
			.chain_with()
			.iter()
			.find(|pred| !state.views.contains_key(pred.as_str()))
		{
			return Err(ScopeError::UnknownView {
				scope: self.inner.name.clone(),
				view: missing.clone(),
			});
		}
		tracing::debug!(
			domain = "scope",
			scope = self.name(),
			view = view.name(),
			priority = view.priority(),
			"registered view",
		);
		state.views.insert(view.name().to_string(), Arc::new(view));
		Ok(())
	}

	pub fn has_view(&self, name: &str) -> bool {
		self.inner.state.lock().views.contains_key(name)
	}

	/// Registered view names in registration order.
	pub fn view_names(&self) -> Vec<String> {
		self.inner.state.lock().views.keys().cloned().collect()
	}

	/// Queues one command token: a view name or a `path=value` override.
	pub fn assign(&self, token: &str) -> Result<()> {
		let assignment = Assignment::parse(token)?;
		self.push(assignment);
		Ok(())
	}

	/// Queues a direct override with an already-typed value.
	pub fn assign_value(&self, path: impl Into<String>, value: impl Into<Value>) {
		self.push(Assignment::direct(path, value));
	}

	/// Queues activation of `view`. Unknown names fail at resolution.
	pub fn activate(&self, view: impl Into<String>) {
		self.push(Assignment::View(view.into()));
	}

	/// Queues every token in order. If any token is invalid, none is queued.
	pub fn assign_all<I, S>(&self, tokens: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let parsed = tokens
			.into_iter()
			.map(|token| Assignment::parse(token.as_ref()))
			.collect::<Result<Vec<_>>>()?;
		self.inner.state.lock().assignments.extend(parsed);
		Ok(())
	}

	/// Tokenizes `text` and queues the tokens.
	pub fn ingest_command(&self, text: &str) -> Result<()> {
		self.assign_all(vista_lexer::split_command(text)?)
	}

	pub(crate) fn push(&self, assignment: Assignment) {
		self.inner.state.lock().assignments.push(assignment);
	}

	pub fn assignments(&self) -> Vec<Assignment> {
		self.inner.state.lock().assignments.clone()
	}

	/// Drops every queued assignment, e.g. between search trials.
	pub fn clear_assignments(&self) {
		self.inner.state.lock().assignments.clear();
	}

	/// Resolves the namespace from defaults, views, assignments and lazy blocks.
	///
	/// The result also becomes [`Scope::config`]. View bodies run without the
	/// scope lock held, so they may read other scopes freely.
	pub fn apply(&self) -> Result<Namespace> {
		let (defaults, views, assignments) = {
			let state = self.inner.state.lock();
			(state.defaults.clone(), state.views.clone(), state.assignments.clone())
		};
		let resolution = resolve::resolve(&Plan {
			scope: &self.inner.name,
			defaults: &defaults,
			views: &views,
			assignments: &assignments,
			cache: &self.inner.cache,
		})?;

		let mut state = self.inner.state.lock();
		state.config = resolution.namespace.clone();
		state.applied = Some(resolution.report);
		Ok(resolution.namespace)
	}

	/// The namespace as of the last resolution or entry call; the defaults before either.
	pub fn config(&self) -> Namespace {
		self.inner.state.lock().config.clone()
	}

	pub(crate) fn store_config(&self, config: Namespace) {
		self.inner.state.lock().config = config;
	}

	pub fn defaults(&self) -> Namespace {
		self.inner.state.lock().defaults.clone()
	}

	/// Sets a default. Before the first resolution it is also visible in [`Scope::config`].
	pub fn set_default(&self, path: &str, value: impl Into<Value>) -> Result<()> {
		let value = value.into();
		let mut state = self.inner.state.lock();
		state.defaults.set(path, value.clone())?;
		if state.applied.is_none() {
			state.config.set(path, value)?;
		}
		Ok(())
	}

	/// Views and direct assignments of the last resolution.
	pub fn assigned_views(&self) -> AssignedViews {
		self.inner.state.lock().applied.clone().unwrap_or_default()
	}

	/// Suspends injection until the returned guard drops. Pauses nest.
	#[must_use = "the scope resumes when the guard is dropped"]
	pub fn pause(&self) -> PauseGuard {
		self.inner.state.lock().pause_depth += 1;
		PauseGuard { scope: self.clone() }
	}

	/// Leaves one pause level.
	///
	/// # Errors
	///
	/// [`ScopeError::PauseUnderflow`] when the scope is not paused.
	pub fn resume(&self) -> Result<()> {
		let mut state = self.inner.state.lock();
		match state.pause_depth.checked_sub(1) {
			Some(depth) => {
				state.pause_depth = depth;
				Ok(())
			}
			None => Err(ScopeError::PauseUnderflow(self.inner.name.clone())),
		}
	}

	pub fn is_paused(&self) -> bool {
		self.pause_depth() > 0
	}

	pub fn pause_depth(&self) -> usize {
		self.inner.state.lock().pause_depth
	}

	/// Wraps `f` so calls receive this scope's resolved namespace.
	///
	/// See [`Entry`] for the binding rules.
	pub fn entry<F, R>(&self, signature: Signature, f: F) -> Entry<F>
	where
		F: Fn(&mut crate::Args) -> R,
	{
		Entry::new(self.clone(), signature, f)
	}

	/// Fingerprints `source` under `trace_id` and wraps `entry`.
	///
	/// Re-tracing an id overwrites its fingerprint.
	pub fn trace<E: EntryPoint>(&self, trace_id: impl Into<String>, source: &str, entry: E) -> Traced<E> {
		let trace_id = trace_id.into();
		let fingerprint = Fingerprint::of(source);
		self.inner.state.lock().traces.record(&trace_id, fingerprint.clone());
		Traced::new(self.clone(), trace_id, fingerprint, entry)
	}

	/// Like [`Scope::trace`], also running `init` once before the first call and
	/// logging `inspect(&output)` after every call.
	pub fn runtime_trace<E, I, N>(
		&self,
		trace_id: impl Into<String>,
		source: &str,
		init: I,
		inspect: N,
		entry: E,
	) -> RuntimeTraced<E, I, N>
	where
		E: EntryPoint,
		I: Fn(),
		N: Fn(&E::Output) -> Value,
	{
		let trace_id = trace_id.into();
		let fingerprint = Fingerprint::of(source);
		self.inner.state.lock().traces.register_runtime(&trace_id, fingerprint);
		RuntimeTraced::new(self.clone(), trace_id, init, inspect, entry)
	}

	pub(crate) fn with_traces<T>(&self, f: impl FnOnce(&mut TraceLog) -> T) -> T {
		f(&mut self.inner.state.lock().traces)
	}

	/// Snapshot of fingerprints and runtime call logs.
	pub fn traces(&self) -> TraceLog {
		self.inner.state.lock().traces.clone()
	}

	pub fn fingerprint(&self, trace_id: &str) -> Option<Fingerprint> {
		self.inner.state.lock().traces.fingerprint(trace_id).cloned()
	}
}

impl std::fmt::Debug for Scope {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Scope").field("name", &self.inner.name).finish_non_exhaustive()
	}
}

/// Keeps a scope paused while alive.
pub struct PauseGuard {
	scope: Scope,
}

impl Drop for PauseGuard {
	fn drop(&mut self) {
		if let Err(error) = self.scope.resume() {
			tracing::warn!(domain = "scope", scope = self.scope.name(), %error, "unbalanced pause guard");
		}
	}
}
