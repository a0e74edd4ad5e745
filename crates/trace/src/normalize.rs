//! Source normalization.
//!
//! Turns Rust source text into a canonical token stream:
//!
//! - line, block and doc comments are dropped;
//! - whitespace outside string and character literals is insignificant;
//! - brace groups in `use` declarations are sorted, recursively, so
//!   `use std::f64::consts::{LN_2, SQRT_2};` and
//!   `use std::f64::consts::{SQRT_2, LN_2};` normalize identically.
//!
//! Everything else is kept verbatim, so operator grouping, operand order and
//! literal spelling (`2` vs `2.0`) all survive normalization.


/// Multi-character operators, longest first.
const OPERATORS: &[&str] = &[
	"<<=", ">>=", "..=", "...", "::", "->", "=>", "==", "!=", "<=", ">=", "&&", "||", "+=", "-=",
	"*=", "/=", "%=", "^=", "&=", "|=", "<<", ">>", "..",
];

/// Returns the canonical token stream of `source`.
pub fn canonical_tokens(source: &str) -> Vec<String> {
	canonicalize_uses(lex(source))
}

struct Lexer<'a> {
	src: &'a str,
	pos: usize,
}

impl Lexer<'_> {
	fn rest(&self) -> &str {
		&self.src[self.pos..]
	}

	fn peek(&self) -> Option<char> {
		self.rest().chars().next()
	}

	fn peek_nth(&self, n: usize) -> Option<char> {
		self.rest().chars().nth(n)
	}

	fn bump(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.pos += ch.len_utf8();
		Some(ch)
	}

	fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
		while self.peek().is_some_and(&predicate) {
			self.bump();
		}
	}

	fn skip_line_comment(&mut self) {
		self.eat_while(|ch| ch != '\n');
	}

	/// Skips a (possibly nested) block comment; an unterminated one runs to the end.
	fn skip_block_comment(&mut self) {
		self.pos += 2;
		let mut depth = 1usize;
		while depth > 0 && self.peek().is_some() {
			if self.rest().starts_with("/*") {
				self.pos += 2;
				depth += 1;
			} else if self.rest().starts_with("*/") {
				self.pos += 2;
				depth -= 1;
			} else {
				self.bump();
			}
		}
	}

	/// Consumes a `"..."` string with escapes, opening quote included.
	fn string(&mut self) {
		self.bump();
		while let Some(ch) = self.bump() {
			match ch {
				'\\' => {
					self.bump();
				}
				'"' => return,
				_ => {}
			}
		}
	}

	/// Consumes the `#*"..."#*` tail of a raw string, or a raw identifier.
	fn raw_string_or_ident(&mut self) {
		let mut hashes = 0usize;
		while self.peek() == Some('#') {
			self.bump();
			hashes += 1;
		}
		if self.peek() != Some('"') {
			self.eat_while(is_ident_continue);
			return;
		}
		self.bump();
		let terminator = format!("\"{}", "#".repeat(hashes));
		match self.rest().find(&terminator) {
			Some(offset) => self.pos += offset + terminator.len(),
			None => self.pos = self.src.len(),
		}
	}

	/// Consumes a character literal (`'a'`, `'\n'`) or a lifetime (`'a`).
	fn char_or_lifetime(&mut self) {
		self.bump();
		match (self.peek(), self.peek_nth(1)) {
			(Some('\\'), _) => {
				self.bump();
				self.bump();
				self.eat_while(|ch| ch != '\'');
				self.bump();
			}
			(Some(_), Some('\'')) => {
				self.bump();
				self.bump();
			}
			_ => self.eat_while(is_ident_continue),
		}
	}

	fn number(&mut self) {
		let start = self.pos;
		while let Some(ch) = self.peek() {
			let exponent_sign = matches!(ch, '+' | '-')
				&& self.src[start..self.pos].ends_with(['e', 'E'])
				&& !self.src[start..].starts_with("0x");
			let fraction = ch == '.' && self.peek_nth(1).is_some_and(|next| next.is_ascii_digit());
			if ch.is_ascii_alphanumeric() || ch == '_' || exponent_sign || fraction {
				self.bump();
			} else {
				break;
			}
		}
	}

	fn operator(&mut self) {
		match OPERATORS.iter().find(|op| self.rest().starts_with(**op)) {
			Some(op) => self.pos += op.len(),
			None => {
				self.bump();
			}
		}
	}
}

fn is_ident_continue(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

fn lex(source: &str) -> Vec<String> {
	let mut lexer = Lexer { src: source, pos: 0 };
	let mut tokens = Vec::new();

	while let Some(ch) = lexer.peek() {
		if ch.is_whitespace() {
			lexer.bump();
			continue;
		}
		if lexer.rest().starts_with("//") {
			lexer.skip_line_comment();
			continue;
		}
		if lexer.rest().starts_with("/*") {
			lexer.skip_block_comment();
			continue;
		}

		let start = lexer.pos;
		match ch {
			'"' => lexer.string(),
			'\'' => lexer.char_or_lifetime(),
			ch if ch.is_alphabetic() || ch == '_' => {
				lexer.eat_while(is_ident_continue);
				match (&source[start..lexer.pos], lexer.peek()) {
					("r" | "br", Some('"' | '#')) => lexer.raw_string_or_ident(),
					("b", Some('"')) => lexer.string(),
					("b", Some('\'')) => lexer.char_or_lifetime(),
					_ => {}
				}
			}
			ch if ch.is_ascii_digit() => lexer.number(),
			_ => lexer.operator(),
		}
		tokens.push(source[start..lexer.pos].to_string());
	}

	tokens
}

/// Rewrites every `use ...;` declaration into its canonical ordering.
fn canonicalize_uses(tokens: Vec<String>) -> Vec<String> {
	let mut out = Vec::with_capacity(tokens.len());
	let mut idx = 0;

	while idx < tokens.len() {
		if tokens[idx] != "use" {
			out.push(tokens[idx].clone());
			idx += 1;
			continue;
		}
		out.push(tokens[idx].clone());
		let body_start = idx + 1;
		let end = tokens[body_start..]
			.iter()
			.position(|token| token == ";")
			.map_or(tokens.len(), |offset| body_start + offset);
		out.extend(canonical_use_body(&tokens[body_start..end]));
		idx = end;
	}

	out
}

fn canonical_use_body(tokens: &[String]) -> Vec<String> {
	let mut pos = 0;
	let mut out = Vec::new();
	while pos < tokens.len() {
		out.extend(use_tree(tokens, &mut pos));
		// Stray separators outside any group are kept as-is.
		if let Some(token) = tokens.get(pos) {
			out.push(token.clone());
			pos += 1;
		}
	}
	out
}

/// Reads one use tree, sorting any brace group it contains.
fn use_tree(tokens: &[String], pos: &mut usize) -> Vec<String> {
	let mut out = Vec::new();
	while let Some(token) = tokens.get(*pos) {
		match token.as_str() {
			"," | "}" => break,
			"{" => {
				*pos += 1;
				let mut items: Vec<Vec<String>> = Vec::new();
				while let Some(token) = tokens.get(*pos) {
					match token.as_str() {
						"}" => {
							*pos += 1;
							break;
						}
						"," => *pos += 1,
						_ => items.push(use_tree(tokens, pos)),
					}
				}
				items.sort();
				out.push("{".to_string());
				for (idx, item) in items.into_iter().enumerate() {
					if idx > 0 {
						out.push(",".to_string());
					}
					out.extend(item);
				}
				out.push("}".to_string());
			}
			_ => {
				out.push(token.clone());
				*pos += 1;
			}
		}
	}
	out
}
