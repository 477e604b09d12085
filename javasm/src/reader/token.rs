//! Splitting a listing into tokens.
//!
//! A listing is read line by line. On each line, leading whitespace is skipped, and then one of these is read:
//! - a string literal `"..."`, or a char literal `'...'`, up to the first quote not escaped by a backslash,
//! - a line comment `// ...`, taking the remainder of the line,
//! - a block comment `/* ... */`, which must end on the same line,
//! - a plain token, up to the next whitespace, or up to the start of a literal or comment.
//!
//! The values of string and char literals are the raw content between the quotes, the escapes in them are
//! handled later on.

use std::iter::Enumerate;
use std::str::Lines;
use anyhow::{anyhow, Error, Result};
use regex::{Captures, Regex};
use crate::reader::error::SyntaxError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
	Plain,
	String,
	Char,
	Comment,
	EndOfInput,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Token<'a> {
	pub(crate) kind: TokenKind,
	pub(crate) value: &'a str,
	line: usize,
	column: usize,
	line_text: &'a str,
}

impl<'a> Token<'a> {
	/// Returns the value if this is a plain token.
	pub(crate) fn plain(&self) -> Option<&'a str> {
		(self.kind == TokenKind::Plain).then_some(self.value)
	}

	pub(crate) fn is_plain(&self, value: &str) -> bool {
		self.kind == TokenKind::Plain && self.value == value
	}

	pub(crate) fn is_comment(&self) -> bool {
		self.kind == TokenKind::Comment
	}
}

/// Finds the first `quote` in `s` that isn't escaped.
///
/// A quote is escaped if it's preceded by an odd number of backslashes.
pub(crate) fn find_closing_quote(s: &str, quote: char) -> Option<usize> {
	let mut backslashes = 0;
	for (index, char) in s.char_indices() {
		if char == quote && backslashes % 2 == 0 {
			return Some(index);
		}
		if char == '\\' {
			backslashes += 1;
		} else {
			backslashes = 0;
		}
	}
	None
}

/// A stream of [`Token`]s with one token of lookahead.
pub(crate) struct TokenReader<'a> {
	lines: Enumerate<Lines<'a>>,
	line: usize,
	line_text: &'a str,
	/// The part of the current line that wasn't read yet.
	rest: &'a str,
	next: Option<Token<'a>>,
	last: Option<Token<'a>>,
}

impl<'a> TokenReader<'a> {
	pub(crate) fn new(text: &'a str) -> TokenReader<'a> {
		TokenReader {
			lines: text.lines().enumerate(),
			line: 0,
			line_text: "",
			rest: "",
			next: None,
			last: None,
		}
	}

	fn read_next(&mut self) -> Result<Token<'a>> {
		loop {
			let rest = self.rest.trim_start();
			if !rest.is_empty() {
				self.rest = rest;
				break;
			}
			match self.lines.next() {
				Some((index, line)) => {
					self.line = index + 1;
					self.line_text = line;
					self.rest = line;
				},
				None => {
					self.rest = "";
					return Ok(Token {
						kind: TokenKind::EndOfInput,
						value: "",
						line: self.line,
						column: self.line_text.len(),
						line_text: self.line_text,
					});
				},
			}
		}

		let rest = self.rest;
		let column = self.line_text.len() - rest.len();

		let (kind, value, remaining) = if let Some(content) = rest.strip_prefix('"') {
			let end = find_closing_quote(content, '"')
				.ok_or_else(|| self.error_at(column, rest, "expected end of string"))?;
			(TokenKind::String, &content[..end], &content[end + 1..])
		} else if let Some(content) = rest.strip_prefix('\'') {
			let end = find_closing_quote(content, '\'')
				.ok_or_else(|| self.error_at(column, rest, "expected end of char"))?;
			(TokenKind::Char, &content[..end], &content[end + 1..])
		} else if let Some(content) = rest.strip_prefix("//") {
			(TokenKind::Comment, content, "")
		} else if let Some(content) = rest.strip_prefix("/*") {
			let end = content.find("*/")
				.ok_or_else(|| self.error_at(column, rest, "multi line comments are not supported"))?;
			(TokenKind::Comment, &content[..end], &content[end + 2..])
		} else {
			let mut end = rest.find(char::is_whitespace).unwrap_or(rest.len());
			for marker in ["\"", "'", "/*", "//"] {
				if let Some(index) = rest[..end].find(marker) {
					end = end.min(index);
				}
			}
			(TokenKind::Plain, &rest[..end], &rest[end..])
		};

		self.rest = remaining;
		Ok(Token { kind, value, line: self.line, column, line_text: self.line_text })
	}

	pub(crate) fn peek(&mut self) -> Result<Token<'a>> {
		if let Some(next) = self.next {
			return Ok(next);
		}
		let next = self.read_next()?;
		self.next = Some(next);
		Ok(next)
	}

	pub(crate) fn pop(&mut self) -> Result<Token<'a>> {
		let token = match self.next.take() {
			Some(token) => token,
			None => self.read_next()?,
		};
		self.last = Some(token);
		Ok(token)
	}

	pub(crate) fn skip_comments(&mut self) -> Result<()> {
		while self.peek()?.is_comment() {
			self.pop()?;
		}
		Ok(())
	}

	pub(crate) fn peek_non_comment(&mut self) -> Result<Token<'a>> {
		self.skip_comments()?;
		self.peek()
	}

	pub(crate) fn pop_non_comment(&mut self) -> Result<Token<'a>> {
		self.skip_comments()?;
		self.pop()
	}

	pub(crate) fn pop_if(&mut self, predicate: impl FnOnce(&Token<'a>) -> bool) -> Result<Option<Token<'a>>> {
		if predicate(&self.peek()?) {
			self.pop().map(Some)
		} else {
			Ok(None)
		}
	}

	pub(crate) fn pop_non_comment_if(&mut self, predicate: impl FnOnce(&Token<'a>) -> bool) -> Result<Option<Token<'a>>> {
		self.skip_comments()?;
		self.pop_if(predicate)
	}

	/// Pops the next token if it's the plain token `value`, skipping no comments.
	pub(crate) fn pop_if_plain(&mut self, value: &str) -> Result<bool> {
		Ok(self.pop_if(|token| token.is_plain(value))?.is_some())
	}

	/// Pops the next comment, if it matches the `regex`.
	pub(crate) fn pop_comment_matching(&mut self, regex: &Regex) -> Result<Option<Captures<'a>>> {
		let token = self.peek()?;
		if token.is_comment() {
			if let Some(captures) = regex.captures(token.value) {
				self.pop()?;
				return Ok(Some(captures));
			}
		}
		Ok(None)
	}

	/// Pops the next non-comment token, which must be of the given kind, and returns its value.
	pub(crate) fn pop_kind(&mut self, kind: TokenKind) -> Result<&'a str> {
		let token = self.pop_non_comment()?;
		if token.kind != kind {
			return Err(self.error(format!("Expected {kind:?} got {:?}", token.kind)));
		}
		Ok(token.value)
	}

	pub(crate) fn pop_plain(&mut self) -> Result<&'a str> {
		self.pop_kind(TokenKind::Plain)
	}

	pub(crate) fn pop_plain_exact(&mut self, value: &str) -> Result<()> {
		let token = self.pop_plain()?;
		if token != value {
			return Err(self.error(format!("Expected {value} got {token}")));
		}
		Ok(())
	}

	pub(crate) fn pop_plain_one_of(&mut self, values: &[&str]) -> Result<&'a str> {
		let token = self.pop_plain()?;
		if !values.contains(&token) {
			return Err(self.error(format!("Expected one of {values:?} got {token}")));
		}
		Ok(token)
	}

	/// Returns `true` if the next token is on the same line as the last popped one.
	pub(crate) fn peek_on_same_line(&mut self) -> Result<bool> {
		let next = self.peek()?;
		Ok(self.last.is_some_and(|last| last.line == next.line))
	}

	fn error_at(&self, column: usize, token: &str, message: &str) -> Error {
		anyhow!(SyntaxError {
			message: message.to_owned(),
			line: self.line,
			column: char_column(self.line_text, column),
			line_text: self.line_text.to_owned(),
			token: Some(token.to_owned()),
		})
	}

	fn syntax_error(&self, message: String) -> SyntaxError {
		match self.last.or(self.next) {
			Some(token) => SyntaxError {
				message,
				line: token.line,
				column: char_column(token.line_text, token.column),
				line_text: token.line_text.to_owned(),
				token: (token.kind != TokenKind::EndOfInput).then(|| token.value.to_owned()),
			},
			None => SyntaxError {
				message,
				line: self.line,
				column: 0,
				line_text: self.line_text.to_owned(),
				token: None,
			},
		}
	}

	/// Creates an error located at the last popped token.
	pub(crate) fn error(&self, message: impl Into<String>) -> Error {
		anyhow!(self.syntax_error(message.into()))
	}

	/// Creates an error located at the last popped token, caused by `cause`.
	pub(crate) fn error_with(&self, message: impl Into<String>, cause: Error) -> Error {
		cause.context(self.syntax_error(message.into()))
	}
}

fn char_column(line: &str, byte_column: usize) -> usize {
	line.get(..byte_column).map_or(byte_column, |before| before.chars().count())
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::reader::error::SyntaxError;
	use crate::reader::token::{find_closing_quote, TokenKind, TokenReader};

	fn tokens(text: &str) -> Result<Vec<(TokenKind, &str)>> {
		let mut reader = TokenReader::new(text);
		let mut tokens = Vec::new();
		loop {
			let token = reader.pop()?;
			if token.kind == TokenKind::EndOfInput {
				return Ok(tokens);
			}
			tokens.push((token.kind, token.value));
		}
	}

	#[test]
	fn plain_and_comments() -> Result<()> {
		assert_eq!(tokens("  public static\n\n\t foo()V // access flags 0x9\n")?, vec![
			(TokenKind::Plain, "public"),
			(TokenKind::Plain, "static"),
			(TokenKind::Plain, "foo()V"),
			(TokenKind::Comment, " access flags 0x9"),
		]);
		assert_eq!(tokens("a/* b */c//d")?, vec![
			(TokenKind::Plain, "a"),
			(TokenKind::Comment, " b "),
			(TokenKind::Plain, "c"),
			(TokenKind::Comment, "d"),
		]);
		Ok(())
	}

	#[test]
	fn literals() -> Result<()> {
		assert_eq!(tokens(r#"LDC "a \"b\" \\" x='y'"#)?, vec![
			(TokenKind::Plain, "LDC"),
			(TokenKind::String, r#"a \"b\" \\"#),
			(TokenKind::Plain, "x="),
			(TokenKind::Char, "y"),
		]);
		assert_eq!(tokens(r"'\''")?, vec![(TokenKind::Char, r"\'")]);
		Ok(())
	}

	#[test]
	fn quotes() {
		assert_eq!(find_closing_quote(r#"abc""#, '"'), Some(3));
		assert_eq!(find_closing_quote(r#"a\"c""#, '"'), Some(4));
		assert_eq!(find_closing_quote(r#"a\\"c"#, '"'), Some(3));
		assert_eq!(find_closing_quote(r#"a\\\"c"#, '"'), None);
	}

	#[test]
	fn unterminated_string() {
		let error = tokens("class Foo {\n  LDC \"abc\n}").unwrap_err();
		let error = error.downcast_ref::<SyntaxError>().unwrap();
		assert_eq!(error.message, "expected end of string");
		assert_eq!(error.line, 2);
		assert_eq!(error.column, 6);
		assert_eq!(error.line_text, "  LDC \"abc");
	}

	#[test]
	fn multi_line_comment() {
		assert!(tokens("/* a\n b */").is_err());
	}

	#[test]
	fn same_line() -> Result<()> {
		let mut reader = TokenReader::new("a b\nc");
		reader.pop()?;
		assert!(reader.peek_on_same_line()?);
		reader.pop()?;
		assert!(!reader.peek_on_same_line()?);
		Ok(())
	}

	#[test]
	fn error_position() -> Result<()> {
		let mut reader = TokenReader::new("  GOTO X1");
		reader.pop()?;
		reader.pop()?;
		let error = reader.error("Expected label");
		let error = error.downcast_ref::<SyntaxError>().unwrap();
		assert_eq!((error.line, error.column), (1, 7));
		assert_eq!(error.token.as_deref(), Some("X1"));
		Ok(())
	}
}
