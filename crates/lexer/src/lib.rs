//! # Override tokenizer
//!
//! Splits free-form override text (usually the joined process arguments) into
//! tokens, and slices single values out of a token for later conversion.
//!
//! ## Supported Syntax
//!
//! ```text
//! command   = token (whitespace+ token)*
//! token     = view | key "=" value | value
//! view      = identifier
//! value     = literal | bracketed | bare
//! literal   = "%" any* "%"                    ; internal whitespace preserved
//! bracketed = ("[" | "{") item* ("]" | "}")   ; nesting must balance
//! bare      = non-whitespace+
//! ```
//!
//! Inside literals and bracketed spans a backslash escapes the next character,
//! so `["\[x\]"]` is a single balanced span. Literals nested inside brackets
//! are opaque, which keeps `[%a, b%, 1]` a two-element list.
//!
//! Nothing here is ever silently truncated: an unterminated literal or an
//! unbalanced bracket is a [`ParseError`] carrying the byte offset of the
//! offending span.


/// Delimiter of verbatim string spans.
pub const LITERAL: char = '%';

/// Escapes the following character inside literals and bracketed spans.
pub const ESCAPE: char = '\\';

/// Error raised for malformed override text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

impl ParseError {
	pub fn new(message: impl Into<String>, position: usize) -> Self {
		Self {
			message: message.into(),
			position,
		}
	}
}

/// Result type for tokenizer operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Byte-offset cursor over the input.
struct Cursor<'a> {
	input: &'a str,
	position: usize,
}

impl<'a> Cursor<'a> {
	/// Places a cursor at `position`, rejecting offsets outside the input or
	/// inside a multi-byte character.
	fn at(input: &'a str, position: usize) -> Result<Self> {
		if !input.is_char_boundary(position) {
			return Err(ParseError::new("start position is not a character boundary", position));
		}
		Ok(Self { input, position })
	}

	fn peek(&self) -> Option<char> {
		self.input[self.position..].chars().next()
	}

	fn bump(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.position += ch.len_utf8();
		Some(ch)
	}
}

/// Returns the closing bracket matching `open`.
fn closing(open: char) -> char {
	if open == '[' { ']' } else { '}' }
}

/// Splits a command string into tokens.
///
/// Whitespace separates tokens unless it sits inside a `%...%` literal or a
/// bracketed span. Empty and whitespace-only input yields no tokens.
///
/// ```
/// use vista_lexer::split_command;
///
/// let tokens = split_command("layers=[1, 2, 3] name=model").unwrap();
/// assert_eq!(tokens, vec!["layers=[1, 2, 3]", "name=model"]);
/// ```
pub fn split_command(input: &str) -> Result<Vec<String>> {
	let mut tokens = Vec::new();
	let mut position = 0;

	while let Some(start) = next_non_whitespace(input, position) {
		let end = scan_token(input, start)?;
		tokens.push(input[start..end].to_string());
		position = end;
	}

	Ok(tokens)
}

fn next_non_whitespace(input: &str, from: usize) -> Option<usize> {
	input[from..]
		.char_indices()
		.find(|(_, ch)| !ch.is_whitespace())
		.map(|(offset, _)| from + offset)
}

/// Scans one token starting at `start`, returning its end offset.
fn scan_token(input: &str, start: usize) -> Result<usize> {
	let mut cursor = Cursor::at(input, start)?;

	if matches!(cursor.peek(), Some(LITERAL | '[' | '{')) {
		let (_, end) = parse_value(input, start)?;
		return finish_token(input, end);
	}

	while let Some(ch) = cursor.peek() {
		if ch.is_whitespace() {
			return Ok(cursor.position);
		}
		cursor.bump();
		if ch == '=' {
			let (_, end) = parse_value(input, cursor.position)?;
			return finish_token(input, end);
		}
	}

	Ok(cursor.position)
}

/// A structured value must be followed by whitespace or the end of input.
fn finish_token(input: &str, end: usize) -> Result<usize> {
	match input[end..].chars().next() {
		Some(ch) if !ch.is_whitespace() => {
			Err(ParseError::new(format!("unexpected '{ch}' after value"), end))
		}
		_ => Ok(end),
	}
}

/// Parses one value starting at `start`.
///
/// Returns the raw slice of the value and the offset immediately after it.
/// Literals and bracketed spans are delegated to [`parse_literal`] and
/// [`parse_bracketed`]; anything else runs to the next whitespace.
///
/// # Errors
///
/// Returns a [`ParseError`] if `start` is not a character boundary of the
/// input or if the value is a malformed literal or bracketed span.
pub fn parse_value(input: &str, start: usize) -> Result<(String, usize)> {
	let cursor = Cursor::at(input, start)?;
	match cursor.peek() {
		Some(LITERAL) => parse_literal(input, start),
		Some('[' | '{') => parse_bracketed(input, start),
		_ => {
			let end = input[start..]
				.find(char::is_whitespace)
				.map_or(input.len(), |offset| start + offset);
			Ok((input[start..end].to_string(), end))
		}
	}
}

/// Parses a `%...%` literal starting at `start`, delimiters included.
pub fn parse_literal(input: &str, start: usize) -> Result<(String, usize)> {
	let mut cursor = Cursor::at(input, start)?;
	match cursor.bump() {
		Some(LITERAL) => {}
		Some(ch) => return Err(ParseError::new(format!("expected '{LITERAL}', found '{ch}'"), start)),
		None => return Err(ParseError::new(format!("expected '{LITERAL}', found end of input"), start)),
	}
	scan_literal_tail(&mut cursor, start)?;
	Ok((input[start..cursor.position].to_string(), cursor.position))
}

/// Consumes the remainder of a literal whose opening delimiter sits at `start`.
fn scan_literal_tail(cursor: &mut Cursor<'_>, start: usize) -> Result<()> {
	while let Some(ch) = cursor.bump() {
		match ch {
			ESCAPE => {
				if cursor.bump().is_none() {
					break;
				}
			}
			LITERAL => return Ok(()),
			_ => {}
		}
	}
	Err(ParseError::new("unterminated literal string", start))
}

/// Parses a bracketed list (`[...]`) or mapping (`{...}`) starting at `start`.
///
/// Nesting of both bracket kinds must balance and match. Literals inside the
/// span are skipped as opaque text and escaped characters never count as
/// brackets.
pub fn parse_bracketed(input: &str, start: usize) -> Result<(String, usize)> {
	let mut cursor = Cursor::at(input, start)?;
	let mut open = match cursor.bump() {
		Some(ch @ ('[' | '{')) => vec![ch],
		Some(ch) => return Err(ParseError::new(format!("expected '[' or '{{', found '{ch}'"), start)),
		None => return Err(ParseError::new("expected '[' or '{', found end of input", start)),
	};

	while let Some(ch) = cursor.bump() {
		let at = cursor.position - ch.len_utf8();
		match ch {
			ESCAPE => {
				if cursor.bump().is_none() {
					break;
				}
			}
			LITERAL => scan_literal_tail(&mut cursor, at)?,
			'[' | '{' => open.push(ch),
			']' | '}' => {
				let Some(opener) = open.pop() else {
					return Err(ParseError::new(format!("unexpected '{ch}'"), at));
				};
				if closing(opener) != ch {
					return Err(ParseError::new(
						format!("mismatched '{ch}', expected '{}'", closing(opener)),
						at,
					));
				}
				if open.is_empty() {
					return Ok((input[start..cursor.position].to_string(), cursor.position));
				}
			}
			_ => {}
		}
	}

	Err(ParseError::new(
		format!("unbalanced '{}': missing '{}'", open[0], closing(open[0])),
		start,
	))
}

/// Byte offsets of `separator` occurrences outside brackets, literals and escapes.
fn top_level_positions(text: &str, separator: char) -> Result<Vec<usize>> {
	let mut positions = Vec::new();
	let mut depth = 0usize;
	let mut cursor = Cursor::at(text, 0)?;

	while let Some(ch) = cursor.bump() {
		let at = cursor.position - ch.len_utf8();
		match ch {
			ESCAPE => {
				cursor.bump();
			}
			LITERAL => scan_literal_tail(&mut cursor, at)?,
			'[' | '{' => depth += 1,
			']' | '}' => {
				depth = depth
					.checked_sub(1)
					.ok_or_else(|| ParseError::new(format!("unexpected '{ch}'"), at))?;
			}
			ch if ch == separator && depth == 0 => positions.push(at),
			_ => {}
		}
	}

	if depth != 0 {
		return Err(ParseError::new("unbalanced brackets", text.len()));
	}
	Ok(positions)
}

/// Splits `text` at every top-level `separator`.
///
/// Separators nested inside brackets or literals are ignored, so splitting the
/// body of `[1, [2, 3], %a, b%]` on `,` yields three parts. A text without any
/// separator yields a single part.
pub fn split_top_level(text: &str, separator: char) -> Result<Vec<&str>> {
	let mut parts = Vec::new();
	let mut segment_start = 0;
	for at in top_level_positions(text, separator)? {
		parts.push(&text[segment_start..at]);
		segment_start = at + separator.len_utf8();
	}
	parts.push(&text[segment_start..]);
	Ok(parts)
}

/// Returns the offset of the first top-level `separator`, if any.
pub fn find_top_level(text: &str, separator: char) -> Result<Option<usize>> {
	Ok(top_level_positions(text, separator)?.first().copied())
}
