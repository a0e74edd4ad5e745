//! Declarative view catalogs.
//!
//! A catalog is a JSON array of view declarations:
//!
//! ```json
//! [
//!   { "name": "base", "default": true, "set": { "lr": 0.1 } },
//!   { "name": "fast", "priority": 10, "set": { "lr": 0.5, "model.depth": 18 } },
//!   { "name": "tuned", "chain_with": ["fast"], "set": { "weight_decay": 0.01 } }
//! ]
//! ```
//!
//! Keys of `set` are dotted paths. Declarations register in file order, so a
//! `chain_with` predecessor must appear before the views that name it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vista_scope::{Namespace, Scope, ScopeError, View};

#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},

	#[error("invalid view catalog: {0}")]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Scope(#[from] ScopeError),
}

/// One declared view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
	pub name: String,
	#[serde(default)]
	pub priority: i32,
	#[serde(default)]
	pub chain_with: Vec<String>,
	#[serde(default)]
	pub default: bool,
	/// Dotted path -> value pairs the view writes, in order.
	#[serde(default)]
	pub set: Namespace,
}

impl ViewSpec {
	pub fn into_view(self) -> View {
		let assignments = self.set;
		let mut view = View::new(self.name, move |cfg| {
			for (path, value) in &assignments {
				cfg.set(path, value.clone())?;
			}
			Ok(())
		})
		.with_priority(self.priority)
		.with_chain(self.chain_with);
		if self.default {
			view = view.as_default();
		}
		view
	}
}

pub fn parse_catalog(json: &str) -> Result<Vec<ViewSpec>, CatalogError> {
	Ok(serde_json::from_str(json)?)
}

pub fn load_catalog(path: &Path) -> Result<Vec<ViewSpec>, CatalogError> {
	let json = std::fs::read_to_string(path).map_err(|error| CatalogError::Io {
		path: path.to_path_buf(),
		error,
	})?;
	parse_catalog(&json)
}

/// Registers every declared view with `scope`, in order.
pub fn register(scope: &Scope, specs: Vec<ViewSpec>) -> Result<(), CatalogError> {
	for spec in specs {
		tracing::debug!(domain = "catalog", view = spec.name.as_str(), "registering declared view");
		scope.observe(spec.into_view())?;
	}
	Ok(())
}
