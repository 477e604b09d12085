//! Conversion of UTF-16 code units, as produced by unescaping a Java string literal, into a [`JavaString`].
//!
//! Java strings may contain unpaired surrogates, which a rust [`String`] can't represent. To keep them, the code
//! units are encoded into the modified UTF-8 format of the Java Virtual Machine Specification, which is then read
//! by [`JavaString::from_modified_utf8`]. Surrogate pairs in the input are combined into one code point by that.
//!
//! See <https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.4.7> for the complete specification of
//! the string format used in the Java Virtual Machine Specification.

use anyhow::{anyhow, Context, Result};
use java_string::JavaString;

/// Encodes the UTF-16 code units into modified UTF-8.
fn to_modified_utf8(units: &[u16]) -> Vec<u8> {
	let mut vec = Vec::with_capacity(units.len());
	for &unit in units {
		match unit {
			// `\0` uses two bytes
			0x0001..=0x007f => vec.push(unit as u8),
			0x0000 | 0x0080..=0x07ff => {
				vec.push(0b1100_0000 | (unit >> 6) as u8);
				vec.push(0b1000_0000 | (unit & 0b11_1111) as u8);
			},
			_ => {
				vec.push(0b1110_0000 | (unit >> 12) as u8);
				vec.push(0b1000_0000 | ((unit >> 6) & 0b11_1111) as u8);
				vec.push(0b1000_0000 | (unit & 0b11_1111) as u8);
			},
		}
	}
	vec
}

/// Takes in UTF-16 code units and tries to turn them into a [`JavaString`].
pub(crate) fn from_utf16(units: &[u16]) -> Result<JavaString> {
	JavaString::from_modified_utf8(to_modified_utf8(units))
		.with_context(|| anyhow!("invalid utf16 contents {units:x?}"))
}
