//! Queued assignments: direct overrides and view activations.

use vista_value::{PATH_SEPARATOR, Value, parse_text};

use crate::{Result, ScopeError};

#[cfg(test)]
mod tests;

/// One entry in a scope's assignment queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
	/// A `key=value` override; `text` is the token as it was supplied.
	Direct {
		path: String,
		value: Value,
		text: String,
	},
	/// Request to activate the named view.
	View(String),
}

impl Assignment {
	/// Parses a single command token.
	///
	/// `name` activates a view; `path=value` is a direct override whose value
	/// goes through [`parse_text`]. The token splits at its first `=`.
	pub fn parse(token: &str) -> Result<Self> {
		let token = token.trim();
		match token.split_once('=') {
			None if is_name(token) => Ok(Self::View(token.to_string())),
			None => Err(ScopeError::InvalidAssignment(token.to_string())),
			Some((path, text)) => {
				let path = path.trim();
				if !path.split(PATH_SEPARATOR).all(is_name) {
					return Err(ScopeError::InvalidAssignment(token.to_string()));
				}
				Ok(Self::Direct {
					path: path.to_string(),
					value: parse_text(text)?,
					text: token.to_string(),
				})
			}
		}
	}

	/// Builds a direct override from an already-typed value.
	pub fn direct(path: impl Into<String>, value: impl Into<Value>) -> Self {
		let path = path.into();
		let value = value.into();
		let text = format!("{path}={value}");
		Self::Direct { path, value, text }
	}

	/// The key portion used for routing: the path, or the view name.
	pub fn key(&self) -> &str {
		match self {
			Self::Direct { path, .. } => path,
			Self::View(name) => name,
		}
	}
}

/// Identifier-like segment: letters, digits, `_` and `-`.
fn is_name(segment: &str) -> bool {
	!segment.is_empty()
		&& segment
			.chars()
			.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '-')
}

/// Whether a direct assignment to `path` touches `claimed`: the same path,
/// or one path nested under the other.
pub(crate) fn overlaps(claimed: &str, path: &str) -> bool {
	let nested = |long: &str, short: &str| {
		long.strip_prefix(short)
			.is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
	};
	claimed == path || nested(claimed, path) || nested(path, claimed)
}
