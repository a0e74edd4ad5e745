//! Tracing wrappers around entry points.

use std::sync::Once;

use vista_trace::Fingerprint;
use vista_value::Value;

use crate::entry::{Call, EntryPoint};
use crate::scope::Scope;
use crate::Result;


/// An entry point whose source fingerprint is recorded in its scope.
pub struct Traced<E> {
	scope: Scope,
	trace_id: String,
	fingerprint: Fingerprint,
	entry: E,
}

impl<E> Traced<E> {
	pub(crate) fn new(scope: Scope, trace_id: String, fingerprint: Fingerprint, entry: E) -> Self {
		Self {
			scope,
			trace_id,
			fingerprint,
			entry,
		}
	}

	pub fn trace_id(&self) -> &str {
		&self.trace_id
	}

	/// Fingerprint computed when this wrapper was built.
	pub fn fingerprint(&self) -> &Fingerprint {
		&self.fingerprint
	}

	pub fn scope(&self) -> &Scope {
		&self.scope
	}
}

impl<E: EntryPoint> EntryPoint for Traced<E> {
	type Output = E::Output;

	fn call(&self, call: Call) -> Result<E::Output> {
		self.entry.call(call)
	}
}

/// An entry point with one-time setup and per-call inspection.
pub struct RuntimeTraced<E, I, N> {
	scope: Scope,
	trace_id: String,
	init: I,
	inspect: N,
	once: Once,
	entry: E,
}

impl<E, I, N> RuntimeTraced<E, I, N> {
	pub(crate) fn new(scope: Scope, trace_id: String, init: I, inspect: N, entry: E) -> Self {
		Self {
			scope,
			trace_id,
			init,
			inspect,
			once: Once::new(),
			entry,
		}
	}

	pub fn trace_id(&self) -> &str {
		&self.trace_id
	}
}

impl<E, I, N> EntryPoint for RuntimeTraced<E, I, N>
where
	E: EntryPoint,
	I: Fn(),
	N: Fn(&E::Output) -> Value,
{
	type Output = E::Output;

	fn call(&self, call: Call) -> Result<E::Output> {
		self.once.call_once(|| {
			tracing::debug!(domain = "trace", trace_id = self.trace_id.as_str(), "running init hook");
			(self.init)();
			self.scope.with_traces(|log| log.mark_initialized(&self.trace_id));
		});

		let output = self.entry.call(call)?;
		let summary = (self.inspect)(&output);
		self.scope.with_traces(|log| log.push_call(&self.trace_id, summary));
		Ok(output)
	}
}
