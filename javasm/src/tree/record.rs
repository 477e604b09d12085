use anyhow::Context;
use crate::macros::make_name;
use crate::tree::annotation::Annotation;
use crate::tree::field::{FieldDescriptor, FieldSignature};
use crate::tree::type_annotation::{TargetInfoField, TypeAnnotation};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordComponent {
	pub name: RecordName,
	pub descriptor: FieldDescriptor,

	pub signature: Option<FieldSignature>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
	pub runtime_visible_type_annotations: Vec<TypeAnnotation<TargetInfoField>>,
	pub runtime_invisible_type_annotations: Vec<TypeAnnotation<TargetInfoField>>,
}

impl RecordComponent {
	pub fn new(name: RecordName, descriptor: FieldDescriptor, signature: Option<FieldSignature>) -> RecordComponent {
		RecordComponent {
			name,
			descriptor,

			signature,

			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
			runtime_visible_type_annotations: Vec::new(),
			runtime_invisible_type_annotations: Vec::new(),
		}
	}
}

make_name!(
	/// Represents the name of a record component.
	pub RecordName;
	is_valid(s) = super::names::check_unqualified_name(s).context("invalid record component name");
);
