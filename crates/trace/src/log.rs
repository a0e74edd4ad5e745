use indexmap::IndexMap;
use serde::Serialize;
use vista_value::Value;

use crate::Fingerprint;


/// Runtime trace state for one `trace_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeRecord {
	/// Static fingerprint of the traced source.
	pub fingerprint: Fingerprint,
	/// Whether the one-time init hook has run.
	pub initialized: bool,
	/// Inspection summaries, one per completed call, oldest first.
	pub calls: Vec<Value>,
}

/// Fingerprints and runtime call logs, keyed by trace id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TraceLog {
	fingerprints: IndexMap<String, Fingerprint>,
	runtime: IndexMap<String, RuntimeRecord>,
}

impl TraceLog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores the fingerprint for `trace_id`, overwriting any previous one.
	///
	/// Returns the replaced fingerprint.
	pub fn record(&mut self, trace_id: &str, fingerprint: Fingerprint) -> Option<Fingerprint> {
		if let Some(record) = self.runtime.get_mut(trace_id) {
			record.fingerprint = fingerprint.clone();
		}
		let previous = self.fingerprints.insert(trace_id.to_string(), fingerprint);
		if let Some(previous) = &previous
			&& Some(previous) != self.fingerprints.get(trace_id)
		{
			tracing::debug!(
				domain = "trace",
				trace_id,
				previous = %previous,
				"traced source changed; fingerprint replaced",
			);
		}
		previous
	}

	/// Registers a runtime trace, resetting its init flag and call log.
	pub fn register_runtime(&mut self, trace_id: &str, fingerprint: Fingerprint) {
		self.record(trace_id, fingerprint.clone());
		self.runtime.insert(
			trace_id.to_string(),
			RuntimeRecord {
				fingerprint,
				initialized: false,
				calls: Vec::new(),
			},
		);
	}

	pub fn mark_initialized(&mut self, trace_id: &str) {
		if let Some(record) = self.runtime.get_mut(trace_id) {
			record.initialized = true;
		}
	}

	/// Appends an inspection summary to the runtime log of `trace_id`.
	///
	/// Ignored for ids that were never registered as runtime traces.
	pub fn push_call(&mut self, trace_id: &str, summary: Value) {
		match self.runtime.get_mut(trace_id) {
			Some(record) => record.calls.push(summary),
			None => tracing::warn!(domain = "trace", trace_id, "call summary for unregistered runtime trace"),
		}
	}

	pub fn fingerprint(&self, trace_id: &str) -> Option<&Fingerprint> {
		self.fingerprints.get(trace_id)
	}

	pub fn fingerprints(&self) -> &IndexMap<String, Fingerprint> {
		&self.fingerprints
	}

	pub fn runtime(&self, trace_id: &str) -> Option<&RuntimeRecord> {
		self.runtime.get(trace_id)
	}

	pub fn contains(&self, trace_id: &str) -> bool {
		self.fingerprints.contains_key(trace_id)
	}
}
