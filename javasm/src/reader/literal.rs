//! Decoding of constant values, as written for `LDC`, field constant values, bootstrap method arguments and
//! annotation values.

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;
use anyhow::{anyhow, bail, Context, Error, Result};
use java_string::JavaString;
use regex::Regex;
use crate::jstring;
use crate::reader::patterns::anchored;
use crate::reader::token::TokenKind;

static DOUBLE: LazyLock<Regex> = LazyLock::new(|| {
	anchored(r"[\-+]?(?:\d+[fd](?:e[\-+]?\d+)?|(?:\d*\.\d+(?:e[\-+]?\d+)?|infinity|nan)[fd]?)")
});
static INTEGER: LazyLock<Regex> = LazyLock::new(|| anchored(r"[\-+]?\d+l?"));

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
	Integer(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	Boolean(bool),
	Char(u16),
	Short(i16),
	Byte(i8),
	String(JavaString),
	/// A `.class` literal, holding the descriptor in front of the `.class`, with `.` replaced by `/`.
	Type(String),
	Null,
}

/// Why a value couldn't be decoded.
#[derive(Debug)]
pub(crate) enum LiteralError {
	/// The value doesn't look like any literal.
	UnknownPrimitive(String),
	/// The value looks like a literal, but it's not valid, for example because it's out of range.
	Malformed(Error),
}

impl Display for LiteralError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			LiteralError::UnknownPrimitive(value) => write!(f, "Unknown primitive value: {value}"),
			LiteralError::Malformed(error) => write!(f, "{error:#}"),
		}
	}
}

impl std::error::Error for LiteralError {}

impl From<Error> for LiteralError {
	fn from(value: Error) -> Self {
		LiteralError::Malformed(value)
	}
}

/// Decodes the value of a token of the given kind.
pub(crate) fn decode(kind: TokenKind, value: &str) -> Result<Literal, LiteralError> {
	match kind {
		TokenKind::String => return Ok(Literal::String(decode_string(value)?)),
		TokenKind::Char => return Ok(Literal::Char(decode_char(value)?)),
		_ => {},
	}

	if let Some(descriptor) = value.strip_suffix(".class") {
		return Ok(Literal::Type(descriptor.replace('.', "/")));
	}
	let value = value.strip_suffix(',').unwrap_or(value);

	if DOUBLE.is_match(value) {
		return Ok(if let Some(float) = value.strip_suffix(['f', 'F']) {
			Literal::Float(float.parse().with_context(|| anyhow!("invalid float {value:?}"))?)
		} else {
			let double = value.strip_suffix(['d', 'D']).unwrap_or(value);
			Literal::Double(double.parse().with_context(|| anyhow!("invalid double {value:?}"))?)
		});
	}
	if INTEGER.is_match(value) {
		return Ok(if let Some(long) = value.strip_suffix(['l', 'L']) {
			Literal::Long(long.parse().with_context(|| anyhow!("invalid long {value:?}"))?)
		} else {
			Literal::Integer(value.parse().with_context(|| anyhow!("invalid int {value:?}"))?)
		});
	}

	Ok(match value {
		"true" => Literal::Boolean(true),
		"false" => Literal::Boolean(false),
		"null" => Literal::Null,
		_ => {
			if let Some(char) = value.strip_prefix('\'').and_then(|x| x.strip_suffix('\'')) {
				Literal::Char(decode_char(char)?)
			} else if let Some(short) = value.strip_prefix("(short)") {
				Literal::Short(short.parse().with_context(|| anyhow!("invalid short {value:?}"))?)
			} else if let Some(byte) = value.strip_prefix("(byte)") {
				Literal::Byte(byte.parse().with_context(|| anyhow!("invalid byte {value:?}"))?)
			} else if let Some(char) = value.strip_prefix("(char)") {
				Literal::Char(char.parse().with_context(|| anyhow!("invalid char {value:?}"))?)
			} else {
				return Err(LiteralError::UnknownPrimitive(value.to_owned()));
			}
		},
	})
}

pub(crate) fn decode_string(value: &str) -> Result<JavaString> {
	jstring::from_utf16(&unescape(value)?)
}

fn decode_char(value: &str) -> Result<u16> {
	match unescape(value)?.as_slice() {
		&[char] => Ok(char),
		_ => bail!("Expected single char, got {value:?}"),
	}
}

/// Resolves the escape sequences of a Java string literal, returning UTF-16 code units.
///
/// Unicode escapes may have any number of `u`s, like `\uuu0041`. Octal escapes go up to `\377`.
fn unescape(s: &str) -> Result<Vec<u16>> {
	let mut units = Vec::with_capacity(s.len());
	let mut chars = s.chars().peekable();
	while let Some(char) = chars.next() {
		if char != '\\' {
			let mut buf = [0; 2];
			units.extend_from_slice(char.encode_utf16(&mut buf));
			continue;
		}
		let escape = chars.next().with_context(|| anyhow!("unfinished escape sequence at the end of {s:?}"))?;
		let unit = match escape {
			'b' => 0x08,
			't' => 0x09,
			'n' => 0x0a,
			'f' => 0x0c,
			'r' => 0x0d,
			's' => 0x20,
			'"' => 0x22,
			'\'' => 0x27,
			'\\' => 0x5c,
			'u' => {
				while chars.next_if_eq(&'u').is_some() {}
				let hex: String = chars.by_ref().take(4).collect();
				if hex.len() != 4 {
					bail!("unfinished unicode escape in {s:?}");
				}
				u16::from_str_radix(&hex, 16).with_context(|| anyhow!("invalid unicode escape \\u{hex} in {s:?}"))?
			},
			'0'..='7' => {
				let max_digits = if escape <= '3' { 3 } else { 2 };
				let mut value = escape as u16 - '0' as u16;
				for _ in 1..max_digits {
					match chars.next_if(|c| ('0'..='7').contains(c)) {
						Some(digit) => value = value * 8 + (digit as u16 - '0' as u16),
						None => break,
					}
				}
				value
			},
			escape => bail!("invalid escape sequence \\{escape} in {s:?}"),
		};
		units.push(unit);
	}
	Ok(units)
}
