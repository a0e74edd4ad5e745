use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Namespace;

/// A configuration value.
///
/// Serializes untagged, so a namespace round-trips through plain JSON.
/// Non-finite floats serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
	/// Absent / `None` value.
	#[default]
	Null,
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating point value.
	Float(f64),
	/// String value.
	Str(String),
	/// Ordered sequence, possibly nested.
	List(Vec<Value>),
	/// Nested mapping.
	Map(Namespace),
}

impl Value {
	/// Returns the name of this value's variant, for diagnostics.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::Str(_) => "string",
			Value::List(_) => "list",
			Value::Map(_) => "mapping",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the numeric value of an `Int` or `Float` as `f64`.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Int(v) => Some(*v as f64),
			Value::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&Namespace> {
		match self {
			Value::Map(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_map_mut(&mut self) -> Option<&mut Namespace> {
		match self {
			Value::Map(v) => Some(v),
			_ => None,
		}
	}

	/// Truthiness used by conditional evaluation.
	///
	/// `Null`, `false`, zero, and empty strings, lists and mappings are false.
	pub fn is_truthy(&self) -> bool {
		match self {
			Value::Null => false,
			Value::Bool(v) => *v,
			Value::Int(v) => *v != 0,
			Value::Float(v) => *v != 0.0,
			Value::Str(v) => !v.is_empty(),
			Value::List(v) => !v.is_empty(),
			Value::Map(v) => !v.is_empty(),
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("null"),
			Value::Bool(v) => write!(f, "{v}"),
			Value::Int(v) => write!(f, "{v}"),
			// Debug keeps the fractional part, so 1.0 never renders like Int(1).
			Value::Float(v) => write!(f, "{v:?}"),
			Value::Str(v) => write!(f, "{v:?}"),
			Value::List(items) => {
				f.write_str("[")?;
				for (idx, item) in items.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Value::Map(ns) => write!(f, "{ns}"),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(v.into())
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<u32> for Value {
	fn from(v: u32) -> Self {
		Value::Int(v.into())
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Str(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Str(v)
	}
}

impl From<Namespace> for Value {
	fn from(v: Namespace) -> Self {
		Value::Map(v)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(v: Vec<T>) -> Self {
		Value::List(v.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map_or(Value::Null, Into::into)
	}
}

impl PartialEq<bool> for Value {
	fn eq(&self, other: &bool) -> bool {
		self.as_bool() == Some(*other)
	}
}

impl PartialEq<i64> for Value {
	fn eq(&self, other: &i64) -> bool {
		self.as_int() == Some(*other)
	}
}

impl PartialEq<f64> for Value {
	fn eq(&self, other: &f64) -> bool {
		self.as_float() == Some(*other)
	}
}

impl PartialEq<&str> for Value {
	fn eq(&self, other: &&str) -> bool {
		self.as_str() == Some(*other)
	}
}
