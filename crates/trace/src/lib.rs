//! Fingerprints and runtime traces for vista entry points.
//!
//! A [`Fingerprint`] is a BLAKE3 hash of an entry point's normalized source
//! text (see [`normalize`]). Two bodies that differ only in comments,
//! whitespace or the order of names inside `use` groups share a fingerprint;
//! any change to expression structure or literals produces a new one.
//!
//! A [`TraceLog`] stores `trace_id -> fingerprint` for every traced entry
//! point, plus per-call summaries for runtime traces. It is plain data and
//! serializes with serde, so an experiment store can persist it without the
//! engine ever touching storage.

mod log;
pub mod normalize;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use log::{RuntimeRecord, TraceLog};
pub use normalize::canonical_tokens;

/// Separates tokens in the hashed stream so `ab c` and `a bc` differ.
const TOKEN_SEPARATOR: u8 = 0x1f;

/// Hex-encoded BLAKE3 hash of a normalized source body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
	/// Fingerprints `source` after normalization.
	pub fn of(source: &str) -> Self {
		let mut hasher = blake3::Hasher::new();
		for token in canonical_tokens(source) {
			hasher.update(token.as_bytes());
			hasher.update(&[TOKEN_SEPARATOR]);
		}
		Self(hasher.finalize().to_hex().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Fingerprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
