//! Views: named, prioritized mutations of a scope's namespace.

use std::fmt;
use std::sync::Arc;

use vista_value::{Namespace, Value};

use crate::Result;
use crate::lazy::{LazyBlock, LazyCache};

/// Signature of a view body.
pub type ViewBody = dyn Fn(&mut ViewContext<'_>) -> Result<()> + Send + Sync;

/// A named mutation registered against a scope.
///
/// Lower priorities run earlier. A view with predecessors (`with_chain`) runs
/// immediately after the last of them, whatever its priority.
#[derive(Clone)]
pub struct View {
	name: String,
	priority: i32,
	chain_with: Vec<String>,
	is_default: bool,
	body: Arc<ViewBody>,
}

impl View {
	pub fn new(
		name: impl Into<String>,
		body: impl Fn(&mut ViewContext<'_>) -> Result<()> + Send + Sync + 'static,
	) -> Self {
		Self {
			name: name.into(),
			priority: 0,
			chain_with: Vec::new(),
			is_default: false,
			body: Arc::new(body),
		}
	}

	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	/// Declares predecessor views that run right before this one.
	pub fn with_chain<I, S>(mut self, predecessors: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.chain_with.extend(predecessors.into_iter().map(Into::into));
		self
	}

	/// Marks the view as applied on every resolution, activated or not.
	pub fn as_default(mut self) -> Self {
		self.is_default = true;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn priority(&self) -> i32 {
		self.priority
	}

	pub fn chain_with(&self) -> &[String] {
		&self.chain_with
	}

	pub fn is_chained(&self) -> bool {
		!self.chain_with.is_empty()
	}

	pub fn is_default(&self) -> bool {
		self.is_default
	}

	pub(crate) fn apply(&self, ctx: &mut ViewContext<'_>) -> Result<()> {
		(self.body)(ctx)
	}
}

impl fmt::Debug for View {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("View")
			.field("name", &self.name)
			.field("priority", &self.priority)
			.field("chain_with", &self.chain_with)
			.field("is_default", &self.is_default)
			.finish_non_exhaustive()
	}
}

/// A lazy block waiting for the flush phase.
#[derive(Debug, Clone)]
pub(crate) struct Deferred {
	block: LazyBlock,
	compiled: bool,
}

impl Deferred {
	pub(crate) fn flush(&self, ns: &mut Namespace, cache: &LazyCache) -> Result<()> {
		if self.compiled {
			cache.get_or_compile(&self.block).run(ns)
		} else {
			self.block.run(ns)
		}
	}
}

/// What a view body sees while it runs.
///
/// Writes land in the namespace immediately and are visible to later views.
/// Paths written here are tracked so chained views can claim them.
pub struct ViewContext<'a> {
	config: &'a mut Namespace,
	written: Vec<String>,
	deferred: &'a mut Vec<Deferred>,
}

impl<'a> ViewContext<'a> {
	pub(crate) fn new(config: &'a mut Namespace, deferred: &'a mut Vec<Deferred>) -> Self {
		Self {
			config,
			written: Vec::new(),
			deferred,
		}
	}

	pub(crate) fn into_written(self) -> Vec<String> {
		self.written
	}

	/// Sets the field at a dotted path.
	pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
		self.config.set(path, value)?;
		self.track(path);
		Ok(())
	}

	pub fn get(&self, path: &str) -> Option<&Value> {
		self.config.get(path)
	}

	pub fn contains(&self, path: &str) -> bool {
		self.config.contains(path)
	}

	pub fn remove(&mut self, path: &str) -> Option<Value> {
		let removed = self.config.remove(path);
		if removed.is_some() {
			self.track(path);
		}
		removed
	}

	pub fn namespace(&self) -> &Namespace {
		self.config
	}

	/// Records a block that runs after every view and direct assignment.
	pub fn lazy(&mut self, build: impl FnOnce(&mut LazyBlock)) {
		self.defer(build, false);
	}

	/// Like [`ViewContext::lazy`], evaluated through the shared compiled-block cache.
	pub fn lazy_compiled(&mut self, build: impl FnOnce(&mut LazyBlock)) {
		self.defer(build, true);
	}

	fn defer(&mut self, build: impl FnOnce(&mut LazyBlock), compiled: bool) {
		let mut block = LazyBlock::new();
		build(&mut block);
		if !block.is_empty() {
			self.deferred.push(Deferred { block, compiled });
		}
	}

	fn track(&mut self, path: &str) {
		if !self.written.iter().any(|written| written == path) {
			self.written.push(path.to_string());
		}
	}
}
