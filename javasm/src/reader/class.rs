//! Reading classes.

use std::ops::ControlFlow;
use anyhow::{anyhow, Result};
use log::{debug, trace};
use crate::reader::annotation::{read_annotation, ParsedAnnotation};
use crate::reader::literal::{decode, Literal, LiteralError};
use crate::reader::method::{read_declaration, read_method_body};
use crate::reader::patterns::{CLASS_VERSION, COMPILED_FROM};
use crate::reader::pending::{parse_signature, read_signature, Pending};
use crate::reader::token::{TokenKind, TokenReader};
use crate::reader::typed;
use crate::tree::access::AccessFlags;
use crate::tree::class::{ClassName, InnerClass};
use crate::tree::descriptor::DescriptorKind;
use crate::tree::field::{ConstantValue, FieldDescriptor, FieldName};
use crate::tree::record::RecordName;
use crate::tree::version::Version;
use crate::visitor::class::ClassVisitor;
use crate::visitor::MultiClassVisitor;

struct Header {
	version: Version,
	access: AccessFlags,
	name: ClassName,
	signature: Option<String>,
	super_class: Option<ClassName>,
	interfaces: Vec<ClassName>,
}

/// Reads the header of a class, up to and including the `{`.
///
/// Returns [`None`] if there's only comments left in the input.
fn read_header(reader: &mut TokenReader) -> Result<Option<Header>> {
	let mut version = Version::UNKNOWN;
	let mut pending = Pending::default();
	while reader.peek()?.is_comment() {
		if let Some(captures) = reader.pop_comment_matching(&CLASS_VERSION)? {
			let major = captures["major"].parse().map_err(|e: std::num::ParseIntError| reader.error_with("Invalid major version", anyhow!(e)))?;
			let minor = captures["minor"].parse().map_err(|e: std::num::ParseIntError| reader.error_with("Invalid minor version", anyhow!(e)))?;
			version = Version::new(major, minor);
		} else if !pending.read_comment(reader)? {
			reader.pop()?;
		}
	}
	if reader.peek()?.kind == TokenKind::EndOfInput && !pending.has_access() {
		return Ok(None);
	}

	pending.read_keywords(reader, false)?;
	let kind = match reader.pop_plain_one_of(&["class", "interface", "enum", "@interface"])? {
		"interface" => AccessFlags::INTERFACE,
		"enum" => AccessFlags::ENUM,
		"@interface" => AccessFlags::ANNOTATION | AccessFlags::INTERFACE,
		_ => AccessFlags::empty(),
	};
	let name = reader.pop_plain()?;
	let name: ClassName = typed(reader, name, "class name")?;

	let mut super_class = ClassName::JAVA_LANG_OBJECT;
	if reader.pop_non_comment_if(|token| token.is_plain("extends"))?.is_some() {
		let value = reader.pop_plain()?;
		super_class = typed(reader, value, "super class name")?;
		if super_class == ClassName::JAVA_LANG_RECORD {
			pending.add_access(AccessFlags::RECORD);
		}
	}

	let mut interfaces = Vec::new();
	if reader.pop_non_comment_if(|token| token.is_plain("implements"))?.is_some() {
		while let Some(token) = reader.pop_non_comment_if(|token| token.plain().is_some_and(|value| value != "{"))? {
			interfaces.push(typed(reader, token.value, "interface name")?);
		}
	}
	reader.pop_plain_exact("{")?;

	let access = if pending.has_flags() {
		pending.access()
	} else {
		let access = pending.access() | kind;
		if access.contains(AccessFlags::ABSTRACT) || access.contains(AccessFlags::INTERFACE) {
			access
		} else {
			access | AccessFlags::SUPER
		}
	};

	Ok(Some(Header {
		version,
		access,
		name,
		signature: pending.signature.take(),
		super_class: Some(super_class),
		interfaces,
	}))
}

/// What the annotations read in the class body go to.
enum Sink<C: ClassVisitor> {
	Class(C),
	Field(C::FieldResidual, C::FieldVisitor),
	RecordComponent(C::RecordComponentResidual, C::RecordComponentVisitor),
	/// Annotations directly after a method are an error, since the method reads its own annotations.
	AfterMethod(C),
}

impl<C: ClassVisitor> Sink<C> {
	/// Finishes the field or record component, if any, returning the class visitor.
	fn close(self) -> Result<C> {
		match self {
			Sink::Class(class) | Sink::AfterMethod(class) => Ok(class),
			Sink::Field(residual, field) => C::finish_field(residual, field),
			Sink::RecordComponent(residual, record_component) => C::finish_record_component(residual, record_component),
		}
	}

	fn accept(self, reader: &TokenReader, annotation: ParsedAnnotation) -> Result<Sink<C>> {
		Ok(match self {
			Sink::Class(class) => Sink::Class(annotation.accept(reader, class)?),
			Sink::Field(residual, field) => Sink::Field(residual, annotation.accept(reader, field)?),
			Sink::RecordComponent(residual, record_component) => {
				Sink::RecordComponent(residual, annotation.accept(reader, record_component)?)
			},
			Sink::AfterMethod(_) => return Err(reader.error("Unexpected annotation after method")),
		})
	}

	/// Finishes the field or record component, and gives mutable access to the class visitor.
	fn with_class(self, f: impl FnOnce(&mut C) -> Result<()>) -> Result<Sink<C>> {
		let after_method = matches!(self, Sink::AfterMethod(_));
		let mut class = self.close()?;
		f(&mut class)?;
		Ok(if after_method { Sink::AfterMethod(class) } else { Sink::Class(class) })
	}
}

fn expect_no_access(reader: &TokenReader, pending: &Pending, what: &str) -> Result<()> {
	if pending.has_access() {
		Err(reader.error(format!("Didn't expect access modifier with {what}")))
	} else {
		Ok(())
	}
}

fn optional_name<'s, T>(reader: &TokenReader, value: &'s str, what: &str) -> Result<Option<T>>
where
	T: TryFrom<&'s str, Error = anyhow::Error>,
{
	if value == "null" {
		Ok(None)
	} else {
		typed(reader, value, what).map(Some)
	}
}

/// Turns the value after the `=` of a field into a constant value fitting the field descriptor.
///
/// The listing writes `long`, `float` and `double` values without their suffix, so it's added back before decoding.
fn read_constant_value(reader: &mut TokenReader, descriptor: &FieldDescriptor) -> Result<Option<ConstantValue>> {
	let token = reader.pop_non_comment()?;
	let kind = descriptor.kind();
	let mut value = token.value.to_owned();
	if token.kind == TokenKind::Plain {
		let suffix = match kind {
			DescriptorKind::J => Some(['l', 'L']),
			DescriptorKind::F => Some(['f', 'F']),
			DescriptorKind::D => Some(['d', 'D']),
			_ => None,
		};
		if let Some(suffix) = suffix {
			if !value.ends_with(suffix) {
				value.push(suffix[1]);
			}
		}
	}

	let literal = decode(token.kind, &value).map_err(|e| match e {
		LiteralError::UnknownPrimitive(_) => reader.error(format!("Expected a constant value, got {value}")),
		LiteralError::Malformed(e) => reader.error_with("Expected a valid constant value", e),
	})?;
	let int_like = matches!(kind, DescriptorKind::B | DescriptorKind::C | DescriptorKind::I | DescriptorKind::S | DescriptorKind::Z);
	Ok(Some(match literal {
		Literal::Null => return Ok(None),
		Literal::Integer(value) if int_like => ConstantValue::Integer(value),
		Literal::Boolean(value) if int_like => ConstantValue::Integer(value.into()),
		Literal::Char(value) if int_like => ConstantValue::Integer(value.into()),
		Literal::Short(value) if int_like => ConstantValue::Integer(value.into()),
		Literal::Byte(value) if int_like => ConstantValue::Integer(value.into()),
		Literal::Long(value) if kind == DescriptorKind::J => ConstantValue::Long(value),
		Literal::Float(value) if kind == DescriptorKind::F => ConstantValue::Float(value),
		Literal::Double(value) if kind == DescriptorKind::D => ConstantValue::Double(value),
		Literal::String(value) if descriptor == "Ljava/lang/String;" => ConstantValue::String(value),
		literal => return Err(reader.error(format!("Constant value {literal:?} doesn't fit the field type {descriptor}"))),
	}))
}

/// Reads the members of a class, up to and including the closing `}`.
fn read_body<C: ClassVisitor>(reader: &mut TokenReader, class: C, class_access: AccessFlags) -> Result<C> {
	let mut sink = Sink::Class(class);
	let mut pending = Pending::default();
	loop {
		if let Some(captures) = reader.pop_comment_matching(&COMPILED_FROM)? {
			let source = captures["source"].trim().to_owned();
			sink = sink.with_class(|class| class.visit_source_file(source))?;
			continue;
		}
		if pending.read_comment(reader)? {
			continue;
		}
		if reader.peek()?.is_comment() {
			reader.pop()?;
			continue;
		}
		if pending.read_keywords(reader, true)? {
			continue;
		}

		let token = reader.pop()?;
		let value = match token.kind {
			TokenKind::Plain => token.value,
			TokenKind::EndOfInput => return Err(reader.error("Unexpected end of input, expected }")),
			_ => return Err(reader.error(format!("Expected a declaration, got {}", token.value))),
		};

		match value {
			"}" => {
				expect_no_access(reader, &pending, "}")?;
				return sink.close();
			},
			value if value.starts_with('@') => {
				expect_no_access(reader, &pending, "annotation")?;
				let annotation = read_annotation(reader, value, None)?;
				sink = sink.accept(reader, annotation)?;
			},
			"NESTMEMBER" => {
				expect_no_access(reader, &pending, "NESTMEMBER")?;
				let member = reader.pop_plain()?;
				let member: ClassName = typed(reader, member, "nest member class name")?;
				sink = sink.with_class(|class| class.visit_nest_member(member))?;
			},
			"NESTHOST" => {
				expect_no_access(reader, &pending, "NESTHOST")?;
				let host = reader.pop_plain()?;
				let host: ClassName = typed(reader, host, "nest host class name")?;
				sink = sink.with_class(|class| class.visit_nest_host_class(host))?;
			},
			"INNERCLASS" => {
				let inner_class = reader.pop_plain()?;
				let inner_class = typed(reader, inner_class, "inner class name")?;
				let outer_class = reader.pop_plain()?;
				let outer_class = optional_name(reader, outer_class, "outer class name")?;
				let inner_name = match reader.pop_plain()? {
					"null" => None,
					inner_name => Some(inner_name.to_owned()),
				};
				let inner_class = InnerClass { inner_class, outer_class, inner_name, flags: pending.access() };
				pending = Pending::default();
				trace!("{inner_class:?}");
				sink = sink.with_class(|class| class.visit_inner_class(inner_class))?;
			},
			"RECORDCOMPONENT" => {
				expect_no_access(reader, &pending, "RECORDCOMPONENT")?;
				let class = sink.close()?;
				let mut signature = None;
				while reader.peek()?.is_comment() {
					match read_signature(reader)? {
						Some(value) => signature = Some(value),
						None => {
							reader.pop()?;
						},
					}
				}
				let descriptor = reader.pop_plain()?;
				let descriptor: FieldDescriptor = typed(reader, descriptor, "record component descriptor")?;
				let name = reader.pop_plain()?;
				let name: RecordName = typed(reader, name, "record component name")?;
				// the signature may also be in front of the RECORDCOMPONENT
				let signature = match signature {
					Some(signature) => parse_signature(Some(signature)),
					None => pending.take_signature(),
				};
				pending = Pending::default();
				debug!("record component {name} {descriptor}");
				let (residual, record_component) = class.visit_record_component(name, descriptor, signature)?;
				sink = Sink::RecordComponent(residual, record_component);
			},
			value => {
				// a Java style return type in front of a method, like in `void main()V`
				let value = if !value.contains('(') && reader.peek()?.plain().is_some_and(|next| next.contains('(')) {
					reader.pop_plain()?
				} else {
					value
				};

				let class = sink.close()?;
				let access = pending.access();
				if value.contains('(') {
					let declaration = read_declaration(reader, value)?;
					debug!("method {}{}", declaration.name, declaration.descriptor);
					let (residual, method) = class.visit_method(
						access,
						declaration.name,
						declaration.descriptor,
						pending.take_signature(),
						declaration.exceptions,
					)?;
					let without_code = access.contains(AccessFlags::ABSTRACT) || access.contains(AccessFlags::NATIVE);
					let in_annotation_interface = class_access.contains(AccessFlags::ANNOTATION);
					let method = read_method_body(reader, method, without_code, in_annotation_interface, declaration.braced)?;
					sink = Sink::AfterMethod(C::finish_method(residual, method)?);
				} else {
					let descriptor: FieldDescriptor = typed(reader, value, "field descriptor")?;
					let name = reader.pop_plain()?;
					let name: FieldName = typed(reader, name, "field name")?;
					let constant_value = if reader.pop_if_plain("=")? {
						read_constant_value(reader, &descriptor)?
					} else {
						None
					};
					debug!("field {name} {descriptor}");
					let (residual, field) = class.visit_field(access, name, descriptor, pending.take_signature(), constant_value)?;
					sink = Sink::Field(residual, field);
				}
				pending = Pending::default();
			},
		}
	}
}

/// Reads classes until the end of the input, giving them to `visitor`.
pub(crate) fn read_classes<V: MultiClassVisitor>(reader: &mut TokenReader, mut visitor: V) -> Result<V> {
	while let Some(header) = read_header(reader)? {
		debug!("class {} extends {:?}", header.name, header.super_class);
		let class_access = header.access;
		let (residual, class) = match visitor.visit_class(
			header.version,
			header.access,
			header.name,
			parse_signature(header.signature),
			header.super_class,
			header.interfaces,
		)? {
			ControlFlow::Continue(x) => x,
			ControlFlow::Break(visitor) => return Ok(visitor),
		};
		let class = read_body(reader, class, class_access)?;
		visitor = V::finish_class(residual, class)?;
	}
	Ok(visitor)
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::reader::class::read_constant_value;
	use crate::reader::token::TokenReader;
	use crate::tree::field::{ConstantValue, FieldDescriptor};

	fn constant(descriptor: &str, text: &str) -> Result<Option<ConstantValue>> {
		let mut reader = TokenReader::new(text);
		read_constant_value(&mut reader, &FieldDescriptor::try_from(descriptor)?)
	}

	#[test]
	fn constant_values() -> Result<()> {
		assert_eq!(constant("I", "5")?, Some(ConstantValue::Integer(5)));
		assert_eq!(constant("Z", "true")?, Some(ConstantValue::Integer(1)));
		assert_eq!(constant("C", "'a'")?, Some(ConstantValue::Integer(97)));
		assert_eq!(constant("J", "5")?, Some(ConstantValue::Long(5)));
		assert_eq!(constant("J", "-9000000000")?, Some(ConstantValue::Long(-9_000_000_000)));
		assert_eq!(constant("F", "1.5")?, Some(ConstantValue::Float(1.5)));
		assert_eq!(constant("D", "2")?, Some(ConstantValue::Double(2.0)));
		assert_eq!(constant("Ljava/lang/String;", "\"a\\nb\"")?, Some(ConstantValue::String("a\nb".into())));
		assert_eq!(constant("Ljava/lang/Object;", "null")?, None);
		Ok(())
	}

	#[test]
	fn constant_value_mismatch() {
		assert!(constant("I", "\"a\"").is_err());
		assert!(constant("Ljava/lang/Object;", "\"a\"").is_err());
		assert!(constant("I", "5L").is_err());
		assert!(constant("I", "five").is_err());
	}
}
