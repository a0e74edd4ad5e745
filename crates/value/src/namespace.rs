use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Result, Value, ValueError};

#[cfg(test)]
mod tests;

/// Separator between segments of a nested path.
pub const PATH_SEPARATOR: char = '.';

/// An insertion-ordered configuration mapping.
///
/// Methods taking a `path` accept dotted paths (`"optimizer.lr"`) and walk
/// nested [`Value::Map`] entries. [`Namespace::insert`] and the
/// [`FromIterator`] impl take keys verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace {
	entries: IndexMap<String, Value>,
}

fn segments(path: &str) -> Result<Vec<&str>> {
	let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
	if segments.iter().any(|segment| segment.is_empty()) {
		return Err(ValueError::InvalidPath(path.to_string()));
	}
	Ok(segments)
}

impl Namespace {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates top-level entries in insertion order.
	pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
		self.entries.iter()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Looks up a value by dotted path.
	pub fn get(&self, path: &str) -> Option<&Value> {
		match path.split_once(PATH_SEPARATOR) {
			None => self.entries.get(path),
			Some((head, rest)) => self.entries.get(head)?.as_map()?.get(rest),
		}
	}

	/// Looks up a value by dotted path for in-place mutation.
	pub fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
		match path.split_once(PATH_SEPARATOR) {
			None => self.entries.get_mut(path),
			Some((head, rest)) => self.entries.get_mut(head)?.as_map_mut()?.get_mut(rest),
		}
	}

	pub fn contains(&self, path: &str) -> bool {
		self.get(path).is_some()
	}

	/// Sets the value at a dotted path, returning the value it replaced.
	///
	/// Missing intermediate mappings are created.
	///
	/// # Errors
	///
	/// Returns [`ValueError::InvalidPath`] for empty segments and
	/// [`ValueError::NotAMapping`] when an intermediate segment holds a
	/// non-mapping value.
	pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<Option<Value>> {
		let segments = segments(path)?;
		let Some((last, parents)) = segments.split_last() else {
			return Err(ValueError::InvalidPath(path.to_string()));
		};

		let mut current = self;
		for (depth, segment) in parents.iter().enumerate() {
			let slot = current
				.entries
				.entry((*segment).to_string())
				.or_insert_with(|| Value::Map(Namespace::new()));
			current = match slot {
				Value::Map(nested) => nested,
				other => {
					return Err(ValueError::NotAMapping {
						path: segments[..=depth].join("."),
						found: other.type_name(),
					});
				}
			};
		}

		Ok(current.entries.insert((*last).to_string(), value.into()))
	}

	/// Inserts a top-level entry without interpreting the key as a path.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.entries.insert(key.into(), value.into())
	}

	/// Removes the value at a dotted path, preserving the order of the rest.
	pub fn remove(&mut self, path: &str) -> Option<Value> {
		match path.rsplit_once(PATH_SEPARATOR) {
			None => self.entries.shift_remove(path),
			Some((parent, key)) => self.get_mut(parent)?.as_map_mut()?.entries.shift_remove(key),
		}
	}

	/// Parses a namespace from a JSON object.
	pub fn from_json_str(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Reads a namespace from a JSON file.
	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let json = std::fs::read_to_string(path).map_err(|error| ValueError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_json_str(&json)
	}

	/// Renders the namespace as pretty-printed JSON.
	pub fn to_json_string(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

impl fmt::Display for Namespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("{")?;
		for (idx, (key, value)) in self.entries.iter().enumerate() {
			if idx > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{key}: {value}")?;
		}
		f.write_str("}")
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Namespace {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}

impl<'a> IntoIterator for &'a Namespace {
	type Item = (&'a String, &'a Value);
	type IntoIter = indexmap::map::Iter<'a, String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl IntoIterator for Namespace {
	type Item = (String, Value);
	type IntoIter = indexmap::map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}
