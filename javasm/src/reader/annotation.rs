//! Reading annotations, like `@Ljava/lang/Deprecated;(forRemoval=true) // invisible`.
//!
//! An annotation is read in two steps: first [`read_annotation`] collects the tokens of the annotation, and
//! works out what it's attached to. The caller then decides which visitor gets it, and calls
//! [`ParsedAnnotation::accept`], which decodes the element values.

use anyhow::{anyhow, Result};
use log::trace;
use crate::reader::labels::Labels;
use crate::reader::literal::{decode, decode_string, Literal};
use crate::reader::token::{find_closing_quote, TokenKind, TokenReader};
use crate::tree::annotation::Object;
use crate::tree::field::FieldDescriptor;
use crate::tree::method::code::{Label, LabelRange, LvIndex};
use crate::tree::type_annotation::{TypePath, TypeReference};
use crate::visitor::annotation::{AnnotatableVisitor, AnnotationTarget, NamedElementValueVisitor, UnnamedElementValueVisitor};

/// An annotation of which the element values aren't decoded yet.
#[derive(Debug)]
pub(crate) struct ParsedAnnotation {
	descriptor: FieldDescriptor,
	/// The element values, like `(a=1,b="x")`.
	body: String,
	target: AnnotationTarget,
	visible: bool,
}

impl ParsedAnnotation {
	/// Returns `true` if this annotation belongs into the code of a method.
	pub(crate) fn is_in_code(&self) -> bool {
		match &self.target {
			AnnotationTarget::Type { type_reference, .. } => type_reference.sort() >= 0x40,
			AnnotationTarget::LocalVariable { .. } => true,
			_ => false,
		}
	}

	/// Gives this annotation to the `visitor`.
	pub(crate) fn accept<A: AnnotatableVisitor>(self, reader: &TokenReader, visitor: A) -> Result<A> {
		trace!("annotation {} on {:?}", self.descriptor, self.target);
		let (residual, annotation_visitor) = visitor.visit_annotation(self.target, self.descriptor, self.visible)
			.map_err(|e| reader.error_with("Invalid annotation target", e))?;

		let (rest, annotation_visitor) = read_content(reader, &self.body, annotation_visitor)?;
		if !rest.is_empty() {
			return Err(reader.error("Unexpected content after annotation )"));
		}

		A::finish_annotation(residual, annotation_visitor)
	}
}

fn read_descriptor(reader: &TokenReader, s: &str) -> Result<FieldDescriptor> {
	FieldDescriptor::try_from(s)
		.map_err(|e| reader.error_with(format!("Expected a valid type descriptor, got {s}"), e))
}

/// Reads an annotation, starting with the token `first`, which starts with `@`.
///
/// The `labels` are needed for annotations on local variables, and are only available inside code.
pub(crate) fn read_annotation<'a>(reader: &mut TokenReader<'a>, first: &'a str, labels: Option<&mut Labels>) -> Result<ParsedAnnotation> {
	let without_at = first.strip_prefix('@').unwrap_or(first);
	let Some(semicolon) = without_at.find(';') else {
		return Err(reader.error("Expected Type Descriptor after @"));
	};
	let descriptor = read_descriptor(reader, &without_at[..=semicolon])?;

	let mut body = String::new();
	let mut depth = 0i32;
	let mut kind = TokenKind::Plain;
	let mut value = without_at[semicolon + 1..].trim();
	loop {
		match kind {
			TokenKind::Plain => {
				for char in value.chars() {
					if char == '(' {
						depth += 1;
					} else if char == ')' {
						depth -= 1;
					}
					if depth < 0 {
						return Err(reader.error("Unexpected content after annotation )"));
					}
				}
				body.push_str(value);
				if depth <= 0 {
					break;
				}
			},
			TokenKind::String => {
				body.push('"');
				body.push_str(value);
				body.push('"');
			},
			TokenKind::Char => {
				body.push('\'');
				body.push_str(value);
				body.push('\'');
			},
			TokenKind::Comment => {},
			TokenKind::EndOfInput => return Err(reader.error("Unexpected EOF while reading annotation")),
		}
		let token = reader.pop()?;
		kind = token.kind;
		value = token.value;
	}

	let target = if reader.pop_if_plain(":")? {
		let type_reference = read_type_reference(reader)?;
		let type_path = read_type_path(reader)?;
		if reader.pop_if_plain("[")? {
			let labels = labels.ok_or_else(|| reader.error("Local variable ranges are only allowed inside code"))?;
			let table = read_local_variable_table(reader, labels)?;
			AnnotationTarget::LocalVariable { type_reference, type_path, table }
		} else {
			AnnotationTarget::Type { type_reference, type_path }
		}
	} else {
		AnnotationTarget::Declaration
	};

	let mut visible = true;
	let mut parameter = None;
	if reader.peek()?.is_comment() && reader.peek_on_same_line()? {
		let comment = reader.pop()?.value;
		for part in comment.split(',').map(str::trim) {
			if part == "invisible" {
				visible = false;
			} else if let Some(index) = part.strip_prefix("parameter") {
				let index = index.trim().parse()
					.map_err(|e: std::num::ParseIntError| reader.error_with(format!("Expected parameter NUMBER, got {part:?}"), anyhow!(e)))?;
				parameter = Some(index);
			}
		}
	}

	let target = match (target, parameter) {
		(AnnotationTarget::Declaration, Some(index)) => AnnotationTarget::Parameter { index },
		(target, _) => target,
	};

	Ok(ParsedAnnotation { descriptor, body, target, visible })
}

fn pop_number<T: std::str::FromStr>(reader: &mut TokenReader) -> Result<T>
where
	T::Err: std::error::Error + Send + Sync + 'static,
{
	let token = reader.pop_plain()?;
	let token = token.strip_suffix(',').unwrap_or(token);
	token.parse().map_err(|e: T::Err| reader.error_with(format!("Expected a number, got {token}"), anyhow!(e)))
}

/// Reads the symbolic form of a [`TypeReference`], like `METHOD_FORMAL_PARAMETER 2`.
fn read_type_reference(reader: &mut TokenReader) -> Result<TypeReference> {
	let token = reader.pop_plain()?;
	let sort = token.strip_suffix(',').unwrap_or(token);
	Ok(match sort {
		"CLASS_TYPE_PARAMETER" => TypeReference::ClassTypeParameter { index: pop_number(reader)? },
		"METHOD_TYPE_PARAMETER" => TypeReference::MethodTypeParameter { index: pop_number(reader)? },
		"CLASS_EXTENDS" => {
			let token = reader.pop_plain()?;
			let index = token.strip_suffix(',').unwrap_or(token);
			let index = match index {
				"-1" | "supertype" => None,
				index => Some(index.parse().map_err(|e: std::num::ParseIntError| reader.error_with("Expected interface index", anyhow!(e)))?),
			};
			TypeReference::ClassExtends { index }
		},
		"CLASS_TYPE_PARAMETER_BOUND" => TypeReference::ClassTypeParameterBound {
			type_parameter_index: pop_number(reader)?,
			bound_index: pop_number(reader)?,
		},
		"METHOD_TYPE_PARAMETER_BOUND" => TypeReference::MethodTypeParameterBound {
			type_parameter_index: pop_number(reader)?,
			bound_index: pop_number(reader)?,
		},
		"FIELD" => TypeReference::Field,
		"METHOD_RETURN" => TypeReference::MethodReturn,
		"METHOD_RECEIVER" => TypeReference::MethodReceiver,
		"METHOD_FORMAL_PARAMETER" => TypeReference::MethodFormalParameter { index: pop_number(reader)? },
		"THROWS" => TypeReference::Throws { index: pop_number(reader)? },
		"LOCAL_VARIABLE" => TypeReference::LocalVariable,
		"RESOURCE_VARIABLE" => TypeReference::ResourceVariable,
		"EXCEPTION_PARAMETER" => TypeReference::ExceptionParameter { index: pop_number(reader)? },
		"INSTANCEOF" => TypeReference::InstanceOf,
		"NEW" => TypeReference::New,
		"CONSTRUCTOR_REFERENCE" => TypeReference::ConstructorReference,
		"METHOD_REFERENCE" => TypeReference::MethodReference,
		"CAST" => TypeReference::Cast { index: pop_number(reader)? },
		"CONSTRUCTOR_INVOCATION_TYPE_ARGUMENT" => TypeReference::ConstructorInvocationTypeArgument { index: pop_number(reader)? },
		"METHOD_INVOCATION_TYPE_ARGUMENT" => TypeReference::MethodInvocationTypeArgument { index: pop_number(reader)? },
		"CONSTRUCTOR_REFERENCE_TYPE_ARGUMENT" => TypeReference::ConstructorReferenceTypeArgument { index: pop_number(reader)? },
		"METHOD_REFERENCE_TYPE_ARGUMENT" => TypeReference::MethodReferenceTypeArgument { index: pop_number(reader)? },
		_ => return Err(reader.error(format!("Unknown type reference: {token}"))),
	})
}

fn read_type_path(reader: &mut TokenReader) -> Result<TypePath> {
	let token = reader.pop_plain()?;
	let token = token.strip_suffix(',').unwrap_or(token);
	if token == "null" {
		Ok(TypePath::default())
	} else {
		TypePath::parse(token).map_err(|e| reader.error_with("Expected a type path", e))
	}
}

/// Reads the ranges like `L0 - L1 - 2 ]`, after the first `[` was already read.
fn read_local_variable_table(reader: &mut TokenReader, labels: &mut Labels) -> Result<Vec<(LabelRange, LvIndex)>> {
	let mut table = Vec::new();
	loop {
		let start = read_label(reader, labels)?;
		reader.pop_plain_exact("-")?;
		let end = read_label(reader, labels)?;
		reader.pop_plain_exact("-")?;
		let index = pop_number(reader)?;
		table.push((LabelRange { start, end }, LvIndex { index }));

		if reader.pop_if_plain("]")? && !reader.pop_if_plain("[")? {
			return Ok(table);
		}
	}
}

pub(crate) fn read_label(reader: &mut TokenReader, labels: &mut Labels) -> Result<Label> {
	let token = reader.pop_plain()?;
	labels.lookup(token)?.ok_or_else(|| reader.error(format!("Expected label, got {token}")))
}

/// Reads an annotation default value, like `{1,2}`, and gives it to the visitor.
pub(crate) fn read_default_value<V: UnnamedElementValueVisitor>(reader: &TokenReader, text: &str, visitor: V) -> Result<V> {
	let (rest, Unnamed(visitor)) = read_value(reader, text, (), Unnamed(visitor))?;
	if !rest.trim().is_empty() {
		return Err(reader.error(format!("Unexpected content after annotation default value: {rest}")));
	}
	Ok(visitor)
}

/// Reads the element value pairs, like `(a=1,b=2)`, returning the rest of the input.
fn read_content<'s, V: NamedElementValueVisitor>(reader: &TokenReader, s: &'s str, visitor: V) -> Result<(&'s str, V)> {
	let Some(mut s) = s.strip_prefix('(') else {
		return Err(reader.error("Expected annotation to start with ( and end with )"));
	};
	let mut visitor = Named(visitor);
	loop {
		s = s.trim_start();
		if let Some(rest) = s.strip_prefix(')') {
			return Ok((rest, visitor.0));
		}
		let pair = s.strip_prefix(',').unwrap_or(s);
		let Some(equals) = pair.find('=') else {
			return Err(reader.error("Expected = in annotation"));
		};
		let name = pair[..equals].trim().to_owned();
		(s, visitor) = read_value(reader, &pair[equals + 1..], name, visitor)?;
	}
}

/// Reads array elements like `1,2}`, after the `{` was already read.
fn read_array<'s, V: UnnamedElementValueVisitor>(reader: &TokenReader, mut s: &'s str, visitor: V) -> Result<(&'s str, V)> {
	let mut visitor = Unnamed(visitor);
	loop {
		s = s.trim_start();
		if let Some(rest) = s.strip_prefix('}') {
			return Ok((rest, visitor.0));
		} else if let Some(rest) = s.strip_prefix(',') {
			s = rest;
		} else if s.is_empty() {
			return Err(reader.error("Expected } in annotation"));
		} else {
			(s, visitor) = read_value(reader, s, (), visitor)?;
		}
	}
}

fn read_value<'s, V: ValueVisitor>(reader: &TokenReader, s: &'s str, name: V::Name, mut visitor: V) -> Result<(&'s str, V)> {
	let s = s.trim_start();
	if let Some(rest) = s.strip_prefix('@') {
		let Some(semicolon) = rest.find(';') else {
			return Err(reader.error("Expected Type Descriptor after @"));
		};
		let descriptor = read_descriptor(reader, &rest[..=semicolon])?;
		let (residual, annotation_visitor) = visitor.visit_annotation(name, descriptor)?;
		let (rest, annotation_visitor) = read_content(reader, rest[semicolon + 1..].trim_start(), annotation_visitor)?;
		Ok((rest, V::finish_annotation(residual, annotation_visitor)?))
	} else if let Some(rest) = s.strip_prefix('"') {
		let end = find_closing_quote(rest, '"').ok_or_else(|| reader.error("Expected end of string"))?;
		let string = decode_string(&rest[..end]).map_err(|e| reader.error_with("Expected a valid string", e))?;
		visitor.visit(name, Object::String(string))?;
		Ok((&rest[end + 1..], visitor))
	} else if let Some(rest) = s.strip_prefix('{') {
		let (residual, array_visitor) = visitor.visit_array(name)?;
		let (rest, array_visitor) = read_array(reader, rest, array_visitor)?;
		Ok((rest, V::finish_array(residual, array_visitor)?))
	} else {
		let mut end = s.find([',', '}', ')']).unwrap_or(s.len());
		if let Some(rest) = s.strip_prefix('\'') {
			// a char like `','` may contain any of the delimiters
			let quote = find_closing_quote(rest, '\'').ok_or_else(|| reader.error("Expected end of char"))?;
			let after = &rest[quote + 1..];
			end = 2 + quote + after.find([',', '}', ')']).unwrap_or(after.len());
		} else if s.starts_with('(') && end < s.len() {
			// a cast like `(short)5` has its `)` before the value
			let after = &s[end + 1..];
			end += 1 + after.find([',', '}', ')']).unwrap_or(after.len());
		}
		let value = s[..end].trim();
		read_primitive(reader, value, name, &mut visitor)?;
		Ok((&s[end..], visitor))
	}
}

fn read_primitive<V: ValueVisitor>(reader: &TokenReader, value: &str, name: V::Name, visitor: &mut V) -> Result<()> {
	if let Some(class) = value.strip_suffix(".class") {
		let class = class.replace('.', "/");
		let descriptor = if class == "V" || FieldDescriptor::is_valid(&class) {
			class
		} else {
			format!("L{class};")
		};
		return visitor.visit_class(name, descriptor);
	}

	if let Some((type_name, const_name)) = split_enum(value) {
		let type_name = read_descriptor(reader, type_name)?;
		return visitor.visit_enum(name, type_name, const_name.to_owned());
	}

	let (kind, value) = if let Some(char) = value.strip_prefix('\'').and_then(|x| x.strip_suffix('\'')) {
		(TokenKind::Char, char)
	} else {
		(TokenKind::Plain, value)
	};
	let object = match decode(kind, value).map_err(|e| reader.error_with("Expected a valid annotation value", anyhow!(e)))? {
		Literal::Integer(x) => Object::Integer(x),
		Literal::Long(x) => Object::Long(x),
		Literal::Float(x) => Object::Float(x),
		Literal::Double(x) => Object::Double(x),
		Literal::Boolean(x) => Object::Boolean(x),
		Literal::Char(x) => Object::Char(x),
		Literal::Short(x) => Object::Short(x),
		Literal::Byte(x) => Object::Byte(x),
		Literal::String(x) => Object::String(x),
		Literal::Type(class) => return visitor.visit_class(name, class),
		Literal::Null => return Err(reader.error("null is not allowed as annotation value")),
	};
	visitor.visit(name, object)
}

/// Splits an enum constant like `Lcom/example/Kind;.FIRST` into descriptor and constant name.
fn split_enum(value: &str) -> Option<(&str, &str)> {
	let semicolon = value.find(';')?;
	let (descriptor, rest) = value.split_at(semicolon + 1);
	if descriptor.len() < 3 || !descriptor.starts_with('L') {
		return None;
	}
	let const_name = rest.trim_start().strip_prefix('.')?.trim();
	(!const_name.is_empty()).then_some((descriptor, const_name))
}

/// Either a [`NamedElementValueVisitor`] or an [`UnnamedElementValueVisitor`], so that element values can be read
/// the same way for both.
trait ValueVisitor: Sized {
	type Name;
	type AnnotationVisitor: NamedElementValueVisitor;
	type AnnotationResidual;
	type ArrayVisitor: UnnamedElementValueVisitor;
	type ArrayResidual;

	fn visit(&mut self, name: Self::Name, value: Object) -> Result<()>;
	fn visit_enum(&mut self, name: Self::Name, type_name: FieldDescriptor, const_name: String) -> Result<()>;
	fn visit_class(&mut self, name: Self::Name, class: String) -> Result<()>;
	fn visit_annotation(self, name: Self::Name, annotation_type: FieldDescriptor) -> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)>;
	fn finish_annotation(this: Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self>;
	fn visit_array(self, name: Self::Name) -> Result<(Self::ArrayResidual, Self::ArrayVisitor)>;
	fn finish_array(this: Self::ArrayResidual, array_visitor: Self::ArrayVisitor) -> Result<Self>;
}

struct Named<V>(V);

impl<V: NamedElementValueVisitor> ValueVisitor for Named<V> {
	type Name = String;
	type AnnotationVisitor = V::AnnotationVisitor;
	type AnnotationResidual = V::AnnotationResidual;
	type ArrayVisitor = V::AnnotationArrayVisitor;
	type ArrayResidual = V::AnnotationArrayResidual;

	fn visit(&mut self, name: String, value: Object) -> Result<()> {
		self.0.visit(name, value)
	}

	fn visit_enum(&mut self, name: String, type_name: FieldDescriptor, const_name: String) -> Result<()> {
		self.0.visit_enum(name, type_name, const_name)
	}

	fn visit_class(&mut self, name: String, class: String) -> Result<()> {
		self.0.visit_class(name, class)
	}

	fn visit_annotation(self, name: String, annotation_type: FieldDescriptor) -> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)> {
		self.0.visit_annotation(name, annotation_type)
	}

	fn finish_annotation(this: Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self> {
		V::finish_annotation(this, annotation_visitor).map(Named)
	}

	fn visit_array(self, name: String) -> Result<(Self::ArrayResidual, Self::ArrayVisitor)> {
		self.0.visit_array(name)
	}

	fn finish_array(this: Self::ArrayResidual, array_visitor: Self::ArrayVisitor) -> Result<Self> {
		V::finish_array(this, array_visitor).map(Named)
	}
}

struct Unnamed<V>(V);

impl<V: UnnamedElementValueVisitor> ValueVisitor for Unnamed<V> {
	type Name = ();
	type AnnotationVisitor = V::AnnotationVisitor;
	type AnnotationResidual = V::AnnotationResidual;
	type ArrayVisitor = V::AnnotationArrayVisitor;
	type ArrayResidual = V::AnnotationArrayResidual;

	fn visit(&mut self, (): (), value: Object) -> Result<()> {
		self.0.visit(value)
	}

	fn visit_enum(&mut self, (): (), type_name: FieldDescriptor, const_name: String) -> Result<()> {
		self.0.visit_enum(type_name, const_name)
	}

	fn visit_class(&mut self, (): (), class: String) -> Result<()> {
		self.0.visit_class(class)
	}

	fn visit_annotation(self, (): (), annotation_type: FieldDescriptor) -> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)> {
		self.0.visit_annotation(annotation_type)
	}

	fn finish_annotation(this: Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self> {
		V::finish_annotation(this, annotation_visitor).map(Unnamed)
	}

	fn visit_array(self, (): ()) -> Result<(Self::ArrayResidual, Self::ArrayVisitor)> {
		self.0.visit_array()
	}

	fn finish_array(this: Self::ArrayResidual, array_visitor: Self::ArrayVisitor) -> Result<Self> {
		V::finish_array(this, array_visitor).map(Unnamed)
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use java_string::JavaString;
	use pretty_assertions::assert_eq;
	use crate::reader::annotation::{read_annotation, read_default_value, split_enum, ParsedAnnotation};
	use crate::reader::error::SyntaxError;
	use crate::reader::labels::Labels;
	use crate::reader::token::TokenReader;
	use crate::tree::annotation::{Annotation, ElementValue, ElementValuePair, Object};
	use crate::tree::field::{Field, FieldDescriptor, FieldName};
	use crate::tree::access::AccessFlags;
	use crate::tree::method::code::{Label, LabelRange, LvIndex};
	use crate::tree::type_annotation::{TypePath, TypeReference};
	use crate::visitor::annotation::AnnotationTarget;

	fn parse(text: &str) -> Result<(TokenReader, ParsedAnnotation)> {
		let mut reader = TokenReader::new(text);
		let first = reader.pop_plain()?;
		let mut labels = Labels::default();
		let annotation = read_annotation(&mut reader, first, Some(&mut labels))?;
		Ok((reader, annotation))
	}

	fn on_field(text: &str) -> Result<Field> {
		let (reader, annotation) = parse(text)?;
		let field = Field::new(AccessFlags::empty(), FieldName::try_from("f")?, FieldDescriptor::try_from("I")?, None, None);
		annotation.accept(&reader, field)
	}

	fn pair(name: &str, value: ElementValue) -> ElementValuePair {
		ElementValuePair { name: name.to_owned(), value }
	}

	#[test]
	fn nested() -> Result<()> {
		let field = on_field("@LFoo;(a=1, b={1, 2, @LNested;(x=1)}, c=\"s, )\") // invisible")?;
		assert!(field.runtime_visible_annotations.is_empty());

		let mut nested = Annotation::new(FieldDescriptor::try_from("LNested;")?);
		nested.element_value_pairs.push(pair("x", ElementValue::Object(Object::Integer(1))));
		let mut expected = Annotation::new(FieldDescriptor::try_from("LFoo;")?);
		expected.element_value_pairs.push(pair("a", ElementValue::Object(Object::Integer(1))));
		expected.element_value_pairs.push(pair("b", ElementValue::ArrayType(vec![
			ElementValue::Object(Object::Integer(1)),
			ElementValue::Object(Object::Integer(2)),
			ElementValue::AnnotationInterface(nested),
		])));
		expected.element_value_pairs.push(pair("c", ElementValue::Object(Object::String(JavaString::from("s, )")))));
		assert_eq!(field.runtime_invisible_annotations, vec![expected]);
		Ok(())
	}

	#[test]
	fn values() -> Result<()> {
		let field = on_field("@LFoo;(e=LKind;.FIRST, c=Ljava/lang/String;.class, v=V.class, s=(short)5, ch=(char)97, l=5L, q='x')")?;
		let values: Vec<_> = field.runtime_visible_annotations[0].element_value_pairs.iter()
			.map(|pair| pair.value.clone())
			.collect();
		assert_eq!(values, vec![
			ElementValue::Enum { type_name: FieldDescriptor::try_from("LKind;")?, const_name: "FIRST".to_owned() },
			ElementValue::Class("Ljava/lang/String;".to_owned()),
			ElementValue::Class("V".to_owned()),
			ElementValue::Object(Object::Short(5)),
			ElementValue::Object(Object::Char(97)),
			ElementValue::Object(Object::Long(5)),
			ElementValue::Object(Object::Char(b'x' as u16)),
		]);
		Ok(())
	}

	#[test]
	fn chars_holding_delimiters() -> Result<()> {
		let field = on_field("@LFoo;(a=',', b=')', c='}', d={'{', '\\''})")?;
		let values: Vec<_> = field.runtime_visible_annotations[0].element_value_pairs.iter()
			.map(|pair| pair.value.clone())
			.collect();
		assert_eq!(values, vec![
			ElementValue::Object(Object::Char(b',' as u16)),
			ElementValue::Object(Object::Char(b')' as u16)),
			ElementValue::Object(Object::Char(b'}' as u16)),
			ElementValue::ArrayType(vec![
				ElementValue::Object(Object::Char(b'{' as u16)),
				ElementValue::Object(Object::Char(b'\'' as u16)),
			]),
		]);
		Ok(())
	}

	#[test]
	fn type_annotation() -> Result<()> {
		let (_, annotation) = parse("@LFoo;() : CLASS_EXTENDS -1, null // invisible")?;
		assert_eq!(annotation.target, AnnotationTarget::Type {
			type_reference: TypeReference::ClassExtends { index: None },
			type_path: TypePath::default(),
		});
		assert!(!annotation.visible);
		assert!(!annotation.is_in_code());

		let (_, annotation) = parse("@LFoo;() : LOCAL_VARIABLE, null [ L0 - L1 - 1 L2 - L3 - 1 ] [ L4 - L5 - 2 ]")?;
		let range = |start, end, index| (LabelRange { start: Label { id: start }, end: Label { id: end } }, LvIndex { index });
		assert_eq!(annotation.target, AnnotationTarget::LocalVariable {
			type_reference: TypeReference::LocalVariable,
			type_path: TypePath::default(),
			table: vec![range(0, 1, 1), range(2, 3, 1), range(4, 5, 2)],
		});
		assert!(annotation.is_in_code());
		Ok(())
	}

	#[test]
	fn parameter() -> Result<()> {
		let (_, annotation) = parse("@LFoo;() // invisible, parameter 1")?;
		assert_eq!(annotation.target, AnnotationTarget::Parameter { index: 1 });
		assert!(!annotation.visible);
		Ok(())
	}

	#[test]
	fn comment_on_next_line_is_not_taken() -> Result<()> {
		let (mut reader, annotation) = parse("@LFoo;()\n// invisible")?;
		assert!(annotation.visible);
		assert!(reader.peek()?.is_comment());
		Ok(())
	}

	#[test]
	fn errors() {
		assert!(parse("@Foo").is_err());
		assert!(parse("@LFoo;(a=1").is_err());
		match parse("@LFoo;(a=1)) x") {
			Ok(_) => panic!("a surplus ) must not be read"),
			Err(e) => {
				let message = e.downcast_ref::<SyntaxError>().map(|e| e.message.as_str());
				assert_eq!(message, Some("Unexpected content after annotation )"));
			},
		}
		assert!(on_field("@LFoo;(a=1))").is_err());
		assert!(on_field("@LFoo;(a=',)").is_err());
		assert!(on_field("@LFoo;(a=1)x").is_err());
		assert!(on_field("@LFoo;(a=null)").is_err());
		assert!(on_field("@LFoo;() : METHOD_RETURN, null").is_err());
	}

	#[test]
	fn default_value() -> Result<()> {
		let reader = TokenReader::new("");
		let values = read_default_value(&reader, "{\"a\",LKind;.B}", Vec::new())?;
		assert_eq!(values, vec![ElementValue::ArrayType(vec![
			ElementValue::Object(Object::String(JavaString::from("a"))),
			ElementValue::Enum { type_name: FieldDescriptor::try_from("LKind;")?, const_name: "B".to_owned() },
		])]);
		Ok(())
	}

	#[test]
	fn enums() {
		assert_eq!(split_enum("LKind;.A"), Some(("LKind;", "A")));
		assert_eq!(split_enum("LKind; . A"), Some(("LKind;", "A")));
		assert_eq!(split_enum("Ljava/lang/String;.class"), Some(("Ljava/lang/String;", "class")));
		assert_eq!(split_enum("5"), None);
	}
}
