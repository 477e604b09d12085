use anyhow::{anyhow, Result};
use log::warn;
use crate::reader::patterns::{ACCESS_FLAGS, DEPRECATED, SIGNATURE};
use crate::reader::token::TokenReader;
use crate::tree::access::AccessFlags;

/// What was read in front of a declaration, and applies to it.
///
/// This is collected while reading the comments and modifier keywords, and then taken by the next declaration.
#[derive(Debug, Default)]
pub(crate) struct Pending {
	/// The modifier keywords, like `public static`.
	keywords: AccessFlags,
	/// The flags from an `// access flags 0x21` comment, these take precedence over the keywords.
	flags: Option<AccessFlags>,
	deprecated: bool,
	pub(crate) signature: Option<String>,
}

impl Pending {
	/// Returns `true` if any modifier keyword or access flags comment was read.
	pub(crate) fn has_access(&self) -> bool {
		!self.keywords.is_empty() || self.flags.is_some()
	}

	/// Returns `true` if an `// access flags` comment was read.
	pub(crate) fn has_flags(&self) -> bool {
		self.flags.is_some()
	}

	pub(crate) fn access(&self) -> AccessFlags {
		let access = self.flags.unwrap_or(self.keywords);
		if self.deprecated {
			access | AccessFlags::DEPRECATED
		} else {
			access
		}
	}

	pub(crate) fn add_access(&mut self, access: AccessFlags) {
		self.keywords |= access;
	}

	/// Takes the signature, converting it with `T::try_from`.
	///
	/// A signature that can't be converted is treated as if there was none.
	pub(crate) fn take_signature<T>(&mut self) -> Option<T>
	where
		T: TryFrom<String, Error = anyhow::Error>,
	{
		parse_signature(self.signature.take())
	}

	/// Reads a `// DEPRECATED`, `// signature` or `// access flags` comment, returning `false` if the next
	/// token isn't one of them.
	pub(crate) fn read_comment(&mut self, reader: &mut TokenReader) -> Result<bool> {
		if reader.pop_comment_matching(&DEPRECATED)?.is_some() {
			self.deprecated = true;
		} else if let Some(signature) = read_signature(reader)? {
			self.signature = Some(signature);
		} else if let Some(captures) = reader.pop_comment_matching(&ACCESS_FLAGS)? {
			let flags = u32::from_str_radix(&captures["flags"], 16)
				.map_err(|e| reader.error_with("Expected valid access flags", anyhow!(e)))?;
			self.flags = Some(AccessFlags(flags));
		} else {
			return Ok(false);
		}
		Ok(true)
	}

	/// Reads modifier keywords, returning `false` if there were none.
	///
	/// With `allow_enum`, the `enum` keyword is read as well, as used for the constants of an enum.
	pub(crate) fn read_keywords(&mut self, reader: &mut TokenReader, allow_enum: bool) -> Result<bool> {
		let mut any = false;
		loop {
			let token = reader.peek()?;
			let access = match token.plain() {
				Some(keyword) if allow_enum && keyword.eq_ignore_ascii_case("enum") => AccessFlags::ENUM,
				Some(keyword) => match AccessFlags::from_keyword(keyword) {
					Some(access) => access,
					None => return Ok(any),
				},
				None => return Ok(any),
			};
			reader.pop()?;
			self.keywords |= access;
			any = true;
		}
	}
}

/// Converts a signature with `T::try_from`, treating an invalid one as absent.
pub(crate) fn parse_signature<T>(signature: Option<String>) -> Option<T>
where
	T: TryFrom<String, Error = anyhow::Error>,
{
	T::try_from(signature?)
		.map_err(|e| warn!("ignoring invalid signature: {e:#}"))
		.ok()
}

/// Reads a `// signature ...` comment, if there's one.
pub(crate) fn read_signature(reader: &mut TokenReader) -> Result<Option<String>> {
	Ok(reader.pop_comment_matching(&SIGNATURE)?
		.map(|captures| captures["signature"].trim().to_owned()))
}
