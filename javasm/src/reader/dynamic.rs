//! Reading loadable constants, as used by `LDC`, and bootstrap methods with their arguments, as used by
//! `INVOKEDYNAMIC` and constant dynamic values.
//!
//! A bootstrap method is written in brackets, with the handle first:
//! ```txt
//! [
//!   // handle kind 0x6 : INVOKESTATIC
//!   java/lang/invoke/LambdaMetafactory.metafactory(...)Ljava/lang/invoke/CallSite;
//!   // arguments:
//!   ()V,
//!   // handle kind 0x6 : INVOKESTATIC
//!   Foo.lambda$main$0()V,
//!   ()V
//! ]
//! ```
//! A constant dynamic value is written as `Descriptor : "name" [ handle, arguments... ]`.

use anyhow::{anyhow, bail, Result};
use log::trace;
use crate::reader::literal::{decode, Literal, LiteralError};
use crate::reader::patterns::HANDLE_KIND;
use crate::reader::token::{TokenKind, TokenReader};
use crate::reader::typed;
use crate::tree::class::ClassName;
use crate::tree::field::{FieldDescriptor, FieldRef};
use crate::tree::method::code::{ConstantDynamic, Handle, Loadable};
use crate::tree::method::{MethodDescriptor, MethodRef};

fn strip_comma(s: &str) -> &str {
	s.strip_suffix(',').unwrap_or(s)
}

/// Skips comments, until a `// handle kind` comment, which is popped and its kind returned.
fn read_handle_kind(reader: &mut TokenReader) -> Result<Option<u8>> {
	loop {
		if let Some(captures) = reader.pop_comment_matching(&HANDLE_KIND)? {
			let kind = u8::from_str_radix(&captures["kind"], 16)
				.map_err(|e| reader.error_with("Expected a valid handle kind", anyhow!(e)))?;
			return Ok(Some(kind));
		}
		if !reader.peek()?.is_comment() {
			return Ok(None);
		}
		reader.pop()?;
	}
}

/// Reads a handle like `java/lang/Integer.valueOf(I)Ljava/lang/Integer;` or `Foo.bar(I) itf`.
///
/// The owner, name and descriptor may also be split into multiple tokens, like `Foo . bar (I)V`.
fn read_handle(reader: &mut TokenReader, kind: u8) -> Result<Handle> {
	let mut last = reader.pop_plain()?;
	let (owner, rest) = match strip_comma(last).split_once('.') {
		Some(split) => split,
		None => {
			let owner = strip_comma(last);
			last = reader.pop_plain()?;
			(owner, strip_comma(last).strip_prefix('.').unwrap_or(strip_comma(last)))
		},
	};
	let (name, desc) = match rest.find('(') {
		Some(paren) => rest.split_at(paren),
		None => {
			last = reader.pop_plain()?;
			(rest, strip_comma(last))
		},
	};
	let interface = !last.ends_with(',') && reader.pop_if(|t| t.is_plain("itf") || t.is_plain("itf,"))?.is_some();

	let class: ClassName = typed(reader, owner, "handle owner")?;
	let handle = match kind {
		1..=4 => {
			let desc = desc.strip_prefix('(').and_then(|x| x.strip_suffix(')')).unwrap_or(desc);
			let field = FieldRef {
				class,
				name: typed(reader, name, "field name")?,
				desc: typed(reader, desc, "field descriptor")?,
			};
			match kind {
				1 => Handle::GetField(field),
				2 => Handle::GetStatic(field),
				3 => Handle::PutField(field),
				_ => Handle::PutStatic(field),
			}
		},
		5..=9 => {
			let method = MethodRef {
				class,
				name: typed(reader, name, "method name")?,
				desc: typed(reader, desc, "method descriptor")?,
			};
			match kind {
				5 => Handle::InvokeVirtual(method, interface),
				6 => Handle::InvokeStatic(method, interface),
				7 => Handle::InvokeSpecial(method, interface),
				8 => Handle::NewInvokeSpecial(method),
				_ => Handle::InvokeInterface(method),
			}
		},
		kind => return Err(reader.error(format!("Unknown handle kind {kind:#x}"))),
	};
	trace!("handle {handle:?}");
	Ok(handle)
}

/// Reads a bootstrap method in brackets, returning the handle and the arguments.
pub(crate) fn read_bootstrap(reader: &mut TokenReader) -> Result<(Handle, Vec<Loadable>)> {
	reader.pop_plain_exact("[")?;
	let kind = read_handle_kind(reader)?
		.ok_or_else(|| reader.error("Expected a handle kind comment before the bootstrap method handle"))?;
	let handle = read_handle(reader, kind)?;

	let mut arguments = Vec::new();
	loop {
		// keep the handle kind comment for read_loadable
		while reader.peek()?.is_comment() && !HANDLE_KIND.is_match(reader.peek()?.value) {
			reader.pop()?;
		}
		let token = reader.peek()?;
		if token.is_plain("]") || token.is_plain("],") {
			reader.pop()?;
			return Ok((handle, arguments));
		}
		if token.is_plain(",") {
			reader.pop()?;
			continue;
		}
		if token.kind == TokenKind::EndOfInput {
			return Err(reader.error("Expected ] after bootstrap method arguments"));
		}
		arguments.push(read_loadable(reader)?);
	}
}

/// Reads a constant dynamic value, starting after the descriptor.
fn read_constant_dynamic(reader: &mut TokenReader, descriptor: &str) -> Result<ConstantDynamic> {
	let descriptor = typed(reader, descriptor, "constant dynamic descriptor")?;
	reader.pop_plain_exact(":")?;
	let name = reader.pop_kind(TokenKind::String)?;
	let name = typed(reader, name, "constant dynamic name")?;
	let (handle, arguments) = read_bootstrap(reader)?;
	Ok(ConstantDynamic { name, descriptor, handle, arguments })
}

/// Reads one constant, like `5`, `"a"`, `Ljava/lang/String;.class`, `(I)V`, a handle after its
/// `// handle kind` comment, or a constant dynamic value.
pub(crate) fn read_loadable(reader: &mut TokenReader) -> Result<Loadable> {
	if let Some(kind) = read_handle_kind(reader)? {
		return read_handle(reader, kind).map(Loadable::MethodHandle);
	}

	let token = reader.pop_non_comment()?;
	match token.kind {
		TokenKind::String | TokenKind::Char => {
			let literal = decode(token.kind, token.value)
				.map_err(|e| reader.error_with("Expected a valid constant", anyhow!(e)))?;
			literal_to_loadable(reader, literal)
		},
		TokenKind::Plain => {
			if reader.peek()?.is_plain(":") {
				return read_constant_dynamic(reader, token.value).map(Loadable::Dynamic);
			}
			let value = strip_comma(token.value);
			if let Some(class) = value.strip_suffix(".class") {
				return class_literal(&class.replace('.', "/"))
					.map_err(|e| reader.error_with("Expected a valid type", e));
			}
			match decode(TokenKind::Plain, value) {
				Ok(literal) => literal_to_loadable(reader, literal),
				Err(literal_error @ LiteralError::UnknownPrimitive(_)) => descriptor_to_loadable(value)
					.map_err(|e| reader.error_with("Expected a valid type", e.context(literal_error))),
				Err(LiteralError::Malformed(e)) => Err(reader.error_with("Expected a valid primitive", e)),
			}
		},
		TokenKind::Comment | TokenKind::EndOfInput => Err(reader.error("Expected a constant")),
	}
}

/// Converts a decoded literal into a constant.
///
/// The small integral types and booleans become [`Loadable::Integer`], like they are in the constant pool.
pub(crate) fn literal_to_loadable(reader: &TokenReader, literal: Literal) -> Result<Loadable> {
	Ok(match literal {
		Literal::Integer(x) => Loadable::Integer(x),
		Literal::Long(x) => Loadable::Long(x),
		Literal::Float(x) => Loadable::Float(x),
		Literal::Double(x) => Loadable::Double(x),
		Literal::Boolean(x) => Loadable::Integer(x.into()),
		Literal::Char(x) => Loadable::Integer(x.into()),
		Literal::Short(x) => Loadable::Integer(x.into()),
		Literal::Byte(x) => Loadable::Integer(x.into()),
		Literal::String(x) => Loadable::String(x),
		Literal::Type(class) => class_literal(&class).map_err(|e| reader.error_with("Expected a valid type", e))?,
		Literal::Null => return Err(reader.error("null can't be loaded as a constant")),
	})
}

/// Converts the part before `.class` into a constant: either a descriptor, or an internal class name.
fn class_literal(class: &str) -> Result<Loadable> {
	descriptor_to_loadable(class)
		.or_else(|_| ClassName::try_from(class).map(Loadable::Class))
}

/// Converts a method descriptor into a method type, and an object or array descriptor into a class.
fn descriptor_to_loadable(desc: &str) -> Result<Loadable> {
	if desc.starts_with('(') {
		Ok(Loadable::MethodType(MethodDescriptor::try_from(desc)?))
	} else if let Some(name) = desc.strip_prefix('L').and_then(|x| x.strip_suffix(';')) {
		FieldDescriptor::check_valid(desc)?;
		Ok(Loadable::Class(ClassName::try_from(name)?))
	} else if desc.starts_with('[') {
		FieldDescriptor::check_valid(desc)?;
		Ok(Loadable::Class(ClassName::try_from(desc)?))
	} else {
		bail!("{desc:?} is neither a class nor a method type descriptor")
	}
}
