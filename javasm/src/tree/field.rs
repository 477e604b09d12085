use anyhow::{bail, Context};
use java_string::JavaString;
use crate::macros::make_name;
use crate::tree::access::AccessFlags;
use crate::tree::annotation::Annotation;
use crate::tree::class::ClassName;
use crate::tree::descriptor::{check_field_descriptor, DescriptorKind};
use crate::tree::type_annotation::{TargetInfoField, TypeAnnotation};

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	pub access: AccessFlags,
	pub name: FieldName,
	pub descriptor: FieldDescriptor,

	pub signature: Option<FieldSignature>,
	pub constant_value: Option<ConstantValue>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
	pub runtime_visible_type_annotations: Vec<TypeAnnotation<TargetInfoField>>,
	pub runtime_invisible_type_annotations: Vec<TypeAnnotation<TargetInfoField>>,
}

impl Field {
	pub fn new(access: AccessFlags, name: FieldName, descriptor: FieldDescriptor, signature: Option<FieldSignature>, constant_value: Option<ConstantValue>) -> Field {
		Field {
			access,
			name,
			descriptor,

			signature,
			constant_value,

			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
			runtime_visible_type_annotations: Vec::new(),
			runtime_invisible_type_annotations: Vec::new(),
		}
	}
}

/// The value of a `ConstantValue` attribute.
///
/// Fields of type `boolean`, `byte`, `char`, `short` and `int` all use [`ConstantValue::Integer`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
	Integer(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	String(JavaString),
}

make_name!(
	/// Represents a field name.
	pub FieldName;
	is_valid(s) = super::names::check_unqualified_name(s).context("invalid field name");
);

make_name!(
	/// Represents a field descriptor, like `I` or `Ljava/lang/String;`.
	pub FieldDescriptor;
	is_valid(s) = check_field_descriptor(s)
		.map(|_| ())
		.context("invalid field descriptor");
);

impl FieldDescriptor {
	/// Returns what kind of type this descriptor describes.
	pub fn kind(&self) -> DescriptorKind {
		match self.as_str().as_bytes().first() {
			Some(b'B') => DescriptorKind::B,
			Some(b'C') => DescriptorKind::C,
			Some(b'D') => DescriptorKind::D,
			Some(b'F') => DescriptorKind::F,
			Some(b'I') => DescriptorKind::I,
			Some(b'J') => DescriptorKind::J,
			Some(b'S') => DescriptorKind::S,
			Some(b'Z') => DescriptorKind::Z,
			Some(b'[') => DescriptorKind::Array,
			_ => DescriptorKind::Object,
		}
	}
}

impl From<ClassName> for FieldDescriptor {
	fn from(value: ClassName) -> Self {
		if value.is_array() {
			FieldDescriptor(value.into_inner().into())
		} else {
			FieldDescriptor(format!("L{value};").into())
		}
	}
}

make_name!(
	/// Represents a field signature, for example `Ljava/util/List<Ljava/lang/String;>;`.
	pub FieldSignature;
	is_valid(s) = if s.is_empty() {
		bail!("signature must not be empty")
	} else {
		Ok(())
	};
);

/// A reference to a field, as used by the field instructions and by field handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
	pub class: ClassName,
	pub name: FieldName,
	pub desc: FieldDescriptor,
}
