//! Reading methods.
//!
//! A method starts with its declaration, like `public static main([Ljava/lang/String;)V throws java/io/IOException`,
//! optionally followed by a `{`. After that come the parameters, annotations and the annotation default value, and
//! then the code, which ends once both `MAXSTACK` and `MAXLOCALS` were read, or at the closing `}` if the method
//! was opened with a `{`.

use anyhow::{anyhow, Result};
use log::{trace, warn};
use crate::reader::annotation::{read_annotation, read_default_value, read_label, ParsedAnnotation};
use crate::reader::instruction::{read_instruction, read_number};
use crate::reader::labels::Labels;
use crate::reader::patterns::{ANNOTABLE_PARAMETER_COUNT, PARAMETER};
use crate::reader::pending::read_signature;
use crate::reader::token::{TokenKind, TokenReader};
use crate::reader::typed;
use crate::tree::access::AccessFlags;
use crate::tree::class::ClassName;
use crate::tree::method::code::{Exception, LabelRange, Lv, LvIndex};
use crate::tree::method::{MethodDescriptor, MethodName, MethodParameter};
use crate::visitor::method::code::{CodeVisitor, StackMapData, VerificationTypeInfo};
use crate::visitor::method::MethodVisitor;

#[derive(Debug)]
pub(crate) struct MethodDeclaration {
	pub(crate) name: MethodName,
	pub(crate) descriptor: MethodDescriptor,
	pub(crate) exceptions: Vec<ClassName>,
	/// Whether the body is enclosed in `{` and `}`.
	pub(crate) braced: bool,
}

/// Reads the rest of a method declaration, after the token with name and descriptor, like `main([Ljava/lang/String;)V`.
pub(crate) fn read_declaration(reader: &mut TokenReader, name_and_descriptor: &str) -> Result<MethodDeclaration> {
	let Some(paren) = name_and_descriptor.find('(') else {
		return Err(reader.error(format!("Expected method name and descriptor, got {name_and_descriptor}")));
	};
	let (name, descriptor) = name_and_descriptor.split_at(paren);
	let name = typed(reader, name, "method name")?;
	let descriptor = typed(reader, descriptor, "method descriptor")?;

	let mut exceptions = Vec::new();
	if reader.peek_on_same_line()? && reader.pop_if_plain("throws")? {
		while reader.peek_on_same_line()? {
			let Some(token) = reader.pop_if(|token| token.plain().is_some_and(|value| value != "{"))? else {
				break;
			};
			exceptions.push(typed(reader, token.value, "exception class name")?);
		}
	}
	let braced = reader.pop_if_plain("{")?;

	Ok(MethodDeclaration { name, descriptor, exceptions, braced })
}

/// Reads a `// parameter final name` comment, after the `parameter`.
fn read_parameter(reader: &TokenReader, rest: &str) -> Result<MethodParameter> {
	let rest = rest.trim();
	let (modifiers, name) = match rest.strip_suffix("<no name>") {
		Some(modifiers) => (modifiers, None),
		None => match rest.rsplit_once(char::is_whitespace) {
			Some((modifiers, name)) => (modifiers, Some(name)),
			None => ("", Some(rest)),
		},
	};
	if name.is_some_and(str::is_empty) {
		return Err(reader.error("Expected parameter name"));
	}

	let mut flags = AccessFlags::empty();
	for modifier in modifiers.split_whitespace() {
		flags |= AccessFlags::from_keyword(modifier)
			.ok_or_else(|| reader.error(format!("Unknown parameter modifier {modifier}")))?;
	}
	Ok(MethodParameter { name: name.map(str::to_owned), flags })
}

/// Collects the tokens of an annotation default value, starting with `first`, until all brackets are closed.
fn read_default_text(reader: &mut TokenReader, first: &str) -> Result<String> {
	let mut text = String::new();
	let mut depth = 0i32;
	let mut kind = TokenKind::Plain;
	let mut value = first;
	loop {
		match kind {
			TokenKind::Plain => {
				for char in value.chars() {
					match char {
						'{' | '(' => depth += 1,
						'}' | ')' => depth -= 1,
						_ => {},
					}
				}
				text.push_str(value);
			},
			TokenKind::String => {
				text.push('"');
				text.push_str(value);
				text.push('"');
			},
			TokenKind::Char => {
				text.push('\'');
				text.push_str(value);
				text.push('\'');
			},
			TokenKind::Comment => {},
			TokenKind::EndOfInput => return Err(reader.error("Unexpected EOF while reading annotation default value")),
		}
		if depth <= 0 && !text.is_empty() {
			return Ok(text);
		}
		let token = reader.pop()?;
		kind = token.kind;
		value = token.value;
	}
}

fn read_verification_type(reader: &TokenReader, labels: &mut Labels, value: &str) -> Result<VerificationTypeInfo> {
	Ok(match value {
		"T" => VerificationTypeInfo::Top,
		"I" => VerificationTypeInfo::Integer,
		"F" => VerificationTypeInfo::Float,
		"D" => VerificationTypeInfo::Double,
		"J" => VerificationTypeInfo::Long,
		"N" => VerificationTypeInfo::Null,
		"U" => VerificationTypeInfo::UninitializedThis,
		value => match labels.lookup(value)? {
			Some(label) => VerificationTypeInfo::Uninitialized(label),
			None => {
				if value.len() == 1 {
					warn!("reading {value:?} in a frame as a class name, as it's not a verification type");
				}
				VerificationTypeInfo::Object(typed(reader, value, "class name")?)
			},
		},
	})
}

/// Reads a list like `[I Ljava/lang/String; L3]`, also accepting `[]`, `[I]` and `[ I ]`.
fn read_verification_types(reader: &mut TokenReader, labels: &mut Labels) -> Result<Vec<VerificationTypeInfo>> {
	let first = reader.pop_plain()?;
	let Some(mut rest) = first.strip_prefix('[') else {
		return Err(reader.error(format!("Expected [, got {first}")));
	};
	let mut types = Vec::new();
	loop {
		let (element, done) = match rest.strip_suffix(']') {
			Some(element) => (element, true),
			None => (rest, false),
		};
		if !element.is_empty() {
			types.push(read_verification_type(reader, labels, element)?);
		}
		if done {
			return Ok(types);
		}
		rest = reader.pop_plain()?;
	}
}

fn read_frame(reader: &mut TokenReader, labels: &mut Labels) -> Result<StackMapData> {
	let kind = reader.pop_plain()?;
	Ok(match kind.to_ascii_uppercase().as_str() {
		"SAME" => StackMapData::Same,
		"SAME1" => {
			let stack = reader.pop_plain()?;
			StackMapData::SameLocals1StackItem { stack: read_verification_type(reader, labels, stack)? }
		},
		"CHOP" => StackMapData::Chop { k: read_number(reader, "number of chopped locals")? },
		"APPEND" => StackMapData::Append { locals: read_verification_types(reader, labels)? },
		"FULL" => {
			let locals = read_verification_types(reader, labels)?;
			StackMapData::Full { locals, stack: read_verification_types(reader, labels)? }
		},
		"NEW" => {
			let locals = read_verification_types(reader, labels)?;
			StackMapData::New { locals, stack: read_verification_types(reader, labels)? }
		},
		_ => return Err(reader.error(format!("Unknown frame type {kind}"))),
	})
}

/// Reads `name descriptor start end index`, followed by an optional signature comment.
fn read_local_variable(reader: &mut TokenReader, labels: &mut Labels, name: &str) -> Result<Lv> {
	let name = typed(reader, name, "local variable name")?;
	let descriptor = reader.pop_plain()?;
	let descriptor = typed(reader, descriptor, "local variable descriptor")?;
	let start = read_label(reader, labels)?;
	let end = read_label(reader, labels)?;
	let index = LvIndex { index: read_number(reader, "local variable index")? };
	let signature = match read_signature(reader)? {
		Some(signature) => Some(typed(reader, &signature, "local variable signature")?),
		None => None,
	};
	Ok(Lv { range: LabelRange { start, end }, name, descriptor, signature, index })
}

/// Reads `start end handler type`, where the type is `null` for catching anything.
fn read_try_catch_block(reader: &mut TokenReader, labels: &mut Labels, start: &str) -> Result<Exception> {
	let start = labels.lookup(start)?.ok_or_else(|| reader.error(format!("Expected label, got {start}")))?;
	let end = read_label(reader, labels)?;
	let handler = read_label(reader, labels)?;
	let catch = match reader.pop_plain()? {
		"null" => None,
		catch => Some(typed(reader, catch, "exception class name")?),
	};
	Ok(Exception { start, end, handler, catch })
}

/// Gives an annotation read inside the code to either the code or the method.
fn route<V: MethodVisitor>(reader: &TokenReader, annotation: ParsedAnnotation, method: V, code: V::CodeVisitor) -> Result<(V, V::CodeVisitor)> {
	if annotation.is_in_code() {
		Ok((method, annotation.accept(reader, code)?))
	} else {
		Ok((annotation.accept(reader, method)?, code))
	}
}

/// Reads everything of a method after its declaration.
///
/// Methods that are `abstract` or `native` have no code, so `without_code` must be set for them. The default
/// value is only allowed on methods of an annotation interface.
pub(crate) fn read_method_body<V: MethodVisitor>(
	reader: &mut TokenReader,
	mut visitor: V,
	without_code: bool,
	in_annotation_interface: bool,
	braced: bool,
) -> Result<V> {
	loop {
		let token = reader.peek()?;
		if token.is_comment() {
			if let Some(captures) = reader.pop_comment_matching(&PARAMETER)? {
				visitor.visit_parameter(read_parameter(reader, &captures["rest"])?)?;
			} else if let Some(captures) = reader.pop_comment_matching(&ANNOTABLE_PARAMETER_COUNT)? {
				let count = captures["count"].parse()
					.map_err(|e: std::num::ParseIntError| reader.error_with("Expected a valid parameter count", anyhow!(e)))?;
				let visible = captures["visibility"].eq_ignore_ascii_case("visible");
				visitor.visit_annotable_parameter_count(count, visible)?;
			} else if without_code {
				// the comment belongs to the next declaration
				break;
			} else {
				reader.pop()?;
			}
			continue;
		}

		match token.plain() {
			Some(value) if value.starts_with('@') => {
				reader.pop()?;
				let annotation = read_annotation(reader, value, None)?;
				if annotation.is_in_code() {
					return Err(reader.error("Expected the code to start before an annotation inside the code"));
				}
				visitor = annotation.accept(reader, visitor)?;
			},
			Some(value) if value.starts_with("default=") => {
				if !in_annotation_interface {
					return Err(reader.error("Only methods of an annotation interface can have a default value"));
				}
				reader.pop()?;
				let text = read_default_text(reader, &value["default=".len()..])?;
				trace!("annotation default {text}");
				let (residual, default_visitor) = visitor.visit_annotation_default()?;
				let default_visitor = read_default_value(reader, &text, default_visitor)?;
				visitor = V::finish_annotation_default(residual, default_visitor)?;
			},
			_ => break,
		}
	}

	if without_code {
		if braced {
			reader.pop_plain_exact("}")?;
		}
		return Ok(visitor);
	}

	let mut code = visitor.visit_code()?;
	let mut labels = Labels::default();
	let mut max_stack = None;
	let mut max_locals = None;
	loop {
		let token = reader.pop_non_comment()?;
		let value = match token.kind {
			TokenKind::Plain => token.value,
			TokenKind::EndOfInput => return Err(reader.error("Unexpected end of input in the code of a method")),
			_ => return Err(reader.error("Expected an instruction")),
		};
		if braced && value == "}" {
			break;
		}
		if value.starts_with('@') {
			let annotation = read_annotation(reader, value, Some(&mut labels))?;
			(visitor, code) = route(reader, annotation, visitor, code)?;
			continue;
		}

		let upper = value.to_ascii_uppercase();
		if let Some(label) = labels.lookup(&upper)? {
			trace!("{upper} is {label:?}");
			code.visit_label(label)?;
			continue;
		}
		match upper.as_str() {
			"FRAME" => {
				let frame = read_frame(reader, &mut labels)?;
				trace!("{frame:?}");
				code.visit_frame(frame)?;
			},
			"LINENUMBER" => {
				let line = read_number(reader, "line number")?;
				let start = read_label(reader, &mut labels)?;
				trace!("line {line} at {start:?}");
				code.visit_line_number(line, start)?;
			},
			"LOCALVARIABLE" => {
				let name = reader.pop_plain()?;
				if name.starts_with('@') {
					let annotation = read_annotation(reader, name, Some(&mut labels))?;
					(visitor, code) = route(reader, annotation, visitor, code)?;
				} else {
					let local_variable = read_local_variable(reader, &mut labels, name)?;
					trace!("{local_variable:?}");
					code.visit_local_variable(local_variable)?;
				}
			},
			"TRYCATCHBLOCK" => {
				let start = reader.pop_plain()?;
				if start.starts_with('@') {
					let annotation = read_annotation(reader, start, Some(&mut labels))?;
					(visitor, code) = route(reader, annotation, visitor, code)?;
				} else {
					let exception = read_try_catch_block(reader, &mut labels, start)?;
					trace!("{exception:?}");
					code.visit_try_catch_block(exception)?;
				}
			},
			"MAXSTACK" | "MAXLOCALS" => {
				reader.pop_plain_exact("=")?;
				let value = read_number(reader, "integer")?;
				let slot = if upper == "MAXSTACK" { &mut max_stack } else { &mut max_locals };
				if slot.replace(value).is_some() {
					return Err(reader.error(format!("{upper} was already given")));
				}
				if let (Some(max_stack), Some(max_locals)) = (max_stack, max_locals) {
					trace!("max stack {max_stack}, max locals {max_locals}");
					code.visit_max_stack_and_max_locals(max_stack, max_locals)?;
					if !braced {
						break;
					}
				}
			},
			mnemonic => {
				let instruction = read_instruction(reader, &mut labels, mnemonic)?;
				trace!("{instruction:?}");
				code.visit_instruction(instruction)?;
			},
		}
	}

	visitor.finish_code(code)?;
	Ok(visitor)
}
