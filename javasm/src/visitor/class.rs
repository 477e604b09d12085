use anyhow::Result;
use crate::tree::access::AccessFlags;
use crate::tree::class::{ClassName, InnerClass};
use crate::tree::field::{ConstantValue, FieldDescriptor, FieldName, FieldSignature};
use crate::tree::method::{MethodDescriptor, MethodName, MethodSignature};
use crate::tree::record::RecordName;
use crate::visitor::annotation::AnnotatableVisitor;
use crate::visitor::field::FieldVisitor;
use crate::visitor::method::MethodVisitor;
use crate::visitor::record::RecordComponentVisitor;

/// A visitor for the contents of a class.
///
/// The annotations given through [`AnnotatableVisitor`] are the ones on the class itself.
pub trait ClassVisitor: AnnotatableVisitor {
	type RecordComponentVisitor: RecordComponentVisitor;
	type RecordComponentResidual;
	type FieldVisitor: FieldVisitor;
	type FieldResidual;
	type MethodVisitor: MethodVisitor;
	type MethodResidual;

	fn visit_source_file(&mut self, source_file: String) -> Result<()>;

	fn visit_nest_host_class(&mut self, nest_host_class: ClassName) -> Result<()>;
	fn visit_nest_member(&mut self, nest_member: ClassName) -> Result<()>;
	fn visit_inner_class(&mut self, inner_class: InnerClass) -> Result<()>;

	fn visit_record_component(self, name: RecordName, descriptor: FieldDescriptor, signature: Option<FieldSignature>)
		-> Result<(Self::RecordComponentResidual, Self::RecordComponentVisitor)>;
	fn finish_record_component(this: Self::RecordComponentResidual, record_component_visitor: Self::RecordComponentVisitor) -> Result<Self>;

	fn visit_field(
		self,
		access: AccessFlags,
		name: FieldName,
		descriptor: FieldDescriptor,
		signature: Option<FieldSignature>,
		constant_value: Option<ConstantValue>,
	) -> Result<(Self::FieldResidual, Self::FieldVisitor)>;
	fn finish_field(this: Self::FieldResidual, field_visitor: Self::FieldVisitor) -> Result<Self>;

	fn visit_method(
		self,
		access: AccessFlags,
		name: MethodName,
		descriptor: MethodDescriptor,
		signature: Option<MethodSignature>,
		exceptions: Vec<ClassName>,
	) -> Result<(Self::MethodResidual, Self::MethodVisitor)>;
	fn finish_method(this: Self::MethodResidual, method_visitor: Self::MethodVisitor) -> Result<Self>;
}
