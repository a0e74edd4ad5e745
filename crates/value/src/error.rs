//! Error types for value parsing and namespace access.

use std::path::PathBuf;

use thiserror::Error;
use vista_lexer::ParseError;

/// Errors that can occur when building or addressing configuration values.
#[derive(Debug, Error)]
pub enum ValueError {
	/// Malformed override text.
	#[error(transparent)]
	Parse(#[from] ParseError),

	/// A dotted path contained an empty segment (`"a..b"`, `""`).
	#[error("invalid path '{0}': empty segment")]
	InvalidPath(String),

	/// A path tried to descend through a value that is not a mapping.
	#[error("cannot descend into '{path}': it holds a {found}, not a mapping")]
	NotAMapping {
		/// Prefix of the path that resolved to the non-mapping value.
		path: String,
		/// Type name of the value found there.
		found: &'static str,
	},

	/// A structured value was followed by unparsed text.
	#[error("unexpected trailing input after value: '{0}'")]
	TrailingInput(String),

	/// A list element or mapping entry was empty or lacked a `key: value` shape.
	#[error("invalid entry '{0}'")]
	InvalidEntry(String),

	/// JSON (de)serialization failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// Error reading a JSON file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Result type for value operations.
pub type Result<T> = std::result::Result<T, ValueError>;
