//! Reading the textual class listings written by ASM's `Textifier`.
//!
//! The listing is split into tokens (see [`token`]), which are then read by recursive descent, calling the
//! visitor traits of [`crate::visitor`] in the order the declarations appear.
//!
//! All errors are reported as a [`SyntaxError`](error::SyntaxError) inside the [`anyhow::Error`], pointing at the
//! token that couldn't be read. There's no recovery, the first error ends reading.

use anyhow::{anyhow, Result};
use crate::reader::method::{read_declaration, read_method_body};
use crate::reader::pending::Pending;
use crate::reader::token::{TokenKind, TokenReader};
use crate::tree::access::AccessFlags;
use crate::tree::class::{ClassFile, ClassName};
use crate::tree::method::{Method, MethodDescriptor, MethodName, MethodSignature};
use crate::visitor::method::MethodVisitor;
use crate::visitor::MultiClassVisitor;

pub mod error;
mod token;
mod literal;
mod patterns;
mod labels;
mod annotation;
mod dynamic;
mod instruction;
mod pending;
mod method;
mod class;

/// Converts `value` with `T::try_from`, reporting a failure as a syntax error at the last token.
pub(crate) fn typed<'s, T>(reader: &TokenReader, value: &'s str, what: &str) -> Result<T>
where
	T: TryFrom<&'s str, Error = anyhow::Error>,
{
	T::try_from(value).map_err(|e| reader.error_with(format!("Invalid {what}: {value}"), e))
}

/// Reads a listing containing exactly one class.
pub fn read_class(text: &str) -> Result<ClassFile> {
	read_class_multi(text, None)?
		.ok_or_else(|| anyhow!("Expected a class, but the listing doesn't contain one"))
}

/// Reads all classes of a listing, giving them to `visitor`.
///
/// The classes may be separated by comments. Reading stops early if the visitor returns
/// [`ControlFlow::Break`](std::ops::ControlFlow::Break) for a class.
pub fn read_class_multi<V: MultiClassVisitor>(text: &str, visitor: V) -> Result<V> {
	let mut reader = TokenReader::new(text);
	class::read_classes(&mut reader, visitor)
}

/// Reads a listing of a single method, not belonging to any class.
///
/// The listing starts with the declaration, like `public static main([Ljava/lang/String;)V`, after which the
/// body follows in the same way as inside a class.
pub fn read_method(text: &str) -> Result<Method> {
	read_method_into(text, false, |access, name, descriptor, signature, exceptions| {
		Ok(Method::new(access, name, descriptor, signature, exceptions))
	})
}

/// Reads a listing of a single method into the visitor created by `f`.
///
/// With `in_annotation_interface`, the method may have a `default=` value, as methods of an annotation
/// interface do.
pub fn read_method_into<V, F>(text: &str, in_annotation_interface: bool, f: F) -> Result<V>
where
	V: MethodVisitor,
	F: FnOnce(AccessFlags, MethodName, MethodDescriptor, Option<MethodSignature>, Vec<ClassName>) -> Result<V>,
{
	let mut reader = TokenReader::new(text);

	let mut pending = Pending::default();
	loop {
		if pending.read_comment(&mut reader)? {
			continue;
		}
		if reader.peek()?.is_comment() {
			reader.pop()?;
			continue;
		}
		if !pending.read_keywords(&mut reader, false)? {
			break;
		}
	}

	let mut first = reader.pop_plain()?;
	if !first.contains('(') {
		// a Java style return type, like in `void main()V`
		first = reader.pop_plain()?;
	}
	let declaration = read_declaration(&mut reader, first)?;
	let access = pending.access();
	let visitor = f(access, declaration.name, declaration.descriptor, pending.take_signature(), declaration.exceptions)?;

	let without_code = access.contains(AccessFlags::ABSTRACT) || access.contains(AccessFlags::NATIVE);
	let visitor = read_method_body(&mut reader, visitor, without_code, in_annotation_interface, declaration.braced)?;

	reader.skip_comments()?;
	let token = reader.pop()?;
	if token.kind != TokenKind::EndOfInput {
		return Err(reader.error(format!("Expected end of input after the method, got {}", token.value)));
	}
	Ok(visitor)
}
