//! Ordering and application of views, direct assignments and lazy blocks.
//!
//! One resolution pass:
//!
//! 1. Activated views are expanded with their `chain_with` predecessors
//!    (first discovery wins), then every default view is added the same way.
//! 2. Views without predecessors are stable-sorted by priority. Each chained
//!    view is placed right after the last of its predecessors; followers that
//!    become ready together go in priority order.
//! 3. Views run in that order against a copy of the defaults.
//! 4. Direct assignments are merged in queue order, except for paths a
//!    chained view wrote: output of an explicitly chained view is authoritative.
//! 5. Lazy blocks are flushed against the result.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use vista_value::Namespace;

use crate::assign::{Assignment, overlaps};
use crate::lazy::LazyCache;
use crate::view::{View, ViewContext};
use crate::{Result, ScopeError};


/// Report of the last resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignedViews {
	/// View names in application order.
	pub views: Vec<String>,
	/// Direct assignment texts in queue order, including skipped ones.
	pub assignments: Vec<String>,
}

impl AssignedViews {
	/// Views followed by assignments.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.views
			.iter()
			.chain(&self.assignments)
			.map(String::as_str)
	}
}

/// Everything a resolution pass reads, snapshotted from a scope.
pub(crate) struct Plan<'a> {
	pub scope: &'a str,
	pub defaults: &'a Namespace,
	pub views: &'a IndexMap<String, Arc<View>>,
	pub assignments: &'a [Assignment],
	pub cache: &'a LazyCache,
}

pub(crate) struct Resolution {
	pub namespace: Namespace,
	pub report: AssignedViews,
}

pub(crate) fn resolve(plan: &Plan<'_>) -> Result<Resolution> {
	let found = discover(plan)?;
	let order = sequence(&found, plan.views);
	tracing::debug!(domain = "scope", scope = plan.scope, order = ?order, "resolved view order");

	let mut namespace = plan.defaults.clone();
	let mut deferred = Vec::new();
	let mut claimed: Vec<String> = Vec::new();
	for name in &order {
		let view = &plan.views[name.as_str()];
		tracing::trace!(domain = "scope", scope = plan.scope, view = name.as_str(), "applying view");
		let mut ctx = ViewContext::new(&mut namespace, &mut deferred);
		view.apply(&mut ctx)?;
		let written = ctx.into_written();
		if view.is_chained() {
			claimed.extend(written);
		}
	}

	let mut texts = Vec::new();
	for assignment in plan.assignments {
		let Assignment::Direct { path, value, text } = assignment else {
			continue;
		};
		texts.push(text.clone());
		if let Some(owner) = claimed.iter().find(|owner| overlaps(owner, path)) {
			tracing::debug!(
				domain = "scope",
				scope = plan.scope,
				assignment = text.as_str(),
				claimed = owner.as_str(),
				"direct assignment skipped: path set by a chained view",
			);
			continue;
		}
		namespace.set(path, value.clone())?;
	}

	for block in &deferred {
		block.flush(&mut namespace, plan.cache)?;
	}

	Ok(Resolution {
		namespace,
		report: AssignedViews {
			views: order,
			assignments: texts,
		},
	})
}

/// Activated views, then defaults, each followed by its unseen predecessors.
fn discover(plan: &Plan<'_>) -> Result<IndexSet<String>> {
	let mut found = IndexSet::new();
	for assignment in plan.assignments {
		if let Assignment::View(name) = assignment {
			pull(plan, name, &mut found)?;
		}
	}
	for view in plan.views.values().filter(|view| view.is_default()) {
		pull(plan, view.name(), &mut found)?;
	}
	Ok(found)
}

fn pull(plan: &Plan<'_>, name: &str, found: &mut IndexSet<String>) -> Result<()> {
	if found.contains(name) {
		return Ok(());
	}
	let view = plan.views.get(name).ok_or_else(|| ScopeError::UnknownView {
		scope: plan.scope.to_string(),
		view: name.to_string(),
	})?;
	found.insert(name.to_string());
	for predecessor in view.chain_with() {
		pull(plan, predecessor, found)?;
	}
	Ok(())
}

struct Sequencer<'a> {
	found: &'a IndexSet<String>,
	views: &'a IndexMap<String, Arc<View>>,
	emitted: IndexSet<String>,
}

impl Sequencer<'_> {
	/// Priority first, then discovery order.
	fn rank(&self, name: &str) -> (i32, usize) {
		let priority = self.views.get(name).map_or(0, |view| view.priority());
		(priority, self.found.get_index_of(name).unwrap_or(usize::MAX))
	}

	fn emit(&mut self, name: &str) {
		if !self.emitted.insert(name.to_string()) {
			return;
		}
		while let Some(next) = self.next_follower() {
			self.emit(&next);
		}
	}

	/// The best-ranked chained view whose predecessors have all been emitted.
	fn next_follower(&self) -> Option<String> {
		self.found
			.iter()
			.filter(|name| !self.emitted.contains(name.as_str()))
			.filter(|name| {
				self.views.get(name.as_str()).is_some_and(|view| {
					view.is_chained()
						&& view
							.chain_with()
							.iter()
							.all(|pred| self.emitted.contains(pred.as_str()))
				})
			})
			.min_by_key(|name| self.rank(name))
			.cloned()
	}
}

fn sequence(found: &IndexSet<String>, views: &IndexMap<String, Arc<View>>) -> Vec<String> {
	let mut sequencer = Sequencer {
		found,
		views,
		emitted: IndexSet::new(),
	};
	let mut roots: Vec<&String> = found
		.iter()
		.filter(|name| views.get(name.as_str()).is_some_and(|view| !view.is_chained()))
		.collect();
	roots.sort_by_key(|name| sequencer.rank(name));
	for root in roots {
		sequencer.emit(root);
	}
	sequencer.emitted.into_iter().collect()
}
