//! Conversion of override text into [`Value`]s.

use vista_lexer::{ESCAPE, LITERAL, find_top_level, parse_bracketed, parse_literal, split_top_level};

use crate::{Namespace, Result, Value, ValueError};

#[cfg(test)]
mod tests;

/// Parses the value half of a `key=value` override.
///
/// Surrounding whitespace is ignored. See the crate docs for the grammar.
///
/// # Errors
///
/// Malformed literals and brackets, trailing text after a structured value,
/// and empty list elements or mapping entries are errors.
pub fn parse_text(text: &str) -> Result<Value> {
	let text = text.trim();
	match text.chars().next() {
		Some(LITERAL) => parse_literal_value(text),
		Some('[') => parse_list(text),
		Some('{') => parse_map(text),
		_ => Ok(parse_scalar(text)),
	}
}

/// Returns the inside of a structured span, rejecting trailing input.
fn body(text: &str, end: usize) -> Result<&str> {
	if end != text.len() {
		return Err(ValueError::TrailingInput(text[end..].to_string()));
	}
	Ok(&text[1..end - 1])
}

fn parse_literal_value(text: &str) -> Result<Value> {
	let (_, end) = parse_literal(text, 0)?;
	Ok(Value::Str(unescape(body(text, end)?)))
}

/// Drops the backslash of every escape, keeping the escaped character.
fn unescape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut chars = text.chars();
	while let Some(ch) = chars.next() {
		if ch == ESCAPE {
			out.extend(chars.next());
		} else {
			out.push(ch);
		}
	}
	out
}

/// Splits a bracket body into trimmed items; a single trailing comma is allowed.
fn items(inner: &str) -> Result<Vec<&str>> {
	if inner.trim().is_empty() {
		return Ok(Vec::new());
	}
	let mut parts: Vec<&str> = split_top_level(inner, ',')?.into_iter().map(str::trim).collect();
	if parts.last().is_some_and(|last| last.is_empty()) {
		parts.pop();
	}
	if let Some(empty) = parts.iter().find(|part| part.is_empty()) {
		return Err(ValueError::InvalidEntry((*empty).to_string()));
	}
	Ok(parts)
}

fn parse_list(text: &str) -> Result<Value> {
	let (_, end) = parse_bracketed(text, 0)?;
	let inner = body(text, end)?;
	let values = items(inner)?.into_iter().map(parse_text).collect::<Result<Vec<_>>>()?;
	Ok(Value::List(values))
}

fn parse_map(text: &str) -> Result<Value> {
	let (_, end) = parse_bracketed(text, 0)?;
	let inner = body(text, end)?;

	let mut ns = Namespace::new();
	for entry in items(inner)? {
		let Some(colon) = find_top_level(entry, ':')? else {
			return Err(ValueError::InvalidEntry(entry.to_string()));
		};
		let key = unquote(entry[..colon].trim());
		if key.is_empty() {
			return Err(ValueError::InvalidEntry(entry.to_string()));
		}
		ns.set(key, parse_text(&entry[colon + 1..])?)?;
	}
	Ok(Value::Map(ns))
}

/// Strips one pair of matching single or double quotes.
fn unquote(text: &str) -> &str {
	for quote in ['"', '\''] {
		if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
			return &text[1..text.len() - 1];
		}
	}
	text
}

fn parse_scalar(text: &str) -> Value {
	match text {
		"true" | "True" => return Value::Bool(true),
		"false" | "False" => return Value::Bool(false),
		"null" | "None" | "none" => return Value::Null,
		_ => {}
	}

	let unquoted = unquote(text);
	if unquoted.len() != text.len() {
		return Value::Str(unquoted.to_string());
	}

	parse_number(text).unwrap_or_else(|| Value::Str(text.to_string()))
}

fn parse_number(text: &str) -> Option<Value> {
	// Guards against `inf`/`nan`, which f64 parsing would otherwise accept.
	if !text.bytes().any(|b| b.is_ascii_digit()) {
		return None;
	}
	if !separators_between_digits(text) {
		return None;
	}
	let cleaned: String = text.chars().filter(|&ch| ch != '_').collect();
	if let Ok(int) = cleaned.parse::<i64>() {
		return Some(Value::Int(int));
	}
	cleaned
		.parse::<f64>()
		.ok()
		.filter(|float| float.is_finite())
		.map(Value::Float)
}

/// `_` is a digit separator only when a digit sits on both sides of it.
fn separators_between_digits(text: &str) -> bool {
	let bytes = text.as_bytes();
	bytes.iter().enumerate().filter(|(_, b)| **b == b'_').all(|(idx, _)| {
		idx > 0
			&& bytes[idx - 1].is_ascii_digit()
			&& bytes.get(idx + 1).is_some_and(u8::is_ascii_digit)
	})
}
