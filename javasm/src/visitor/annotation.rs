use anyhow::Result;
use crate::tree::annotation::Object;
use crate::tree::field::FieldDescriptor;
use crate::tree::method::code::{LabelRange, LvIndex};
use crate::tree::type_annotation::{TypePath, TypeReference};

/// What an annotation is attached to, relative to the visitor it's given to.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationTarget {
	/// A plain annotation on the declaration of the visited class, field, method or record component.
	Declaration,
	/// An annotation on the formal parameter with the given index of the visited method.
	Parameter {
		index: u8,
	},
	/// A type annotation.
	Type {
		type_reference: TypeReference,
		type_path: TypePath,
	},
	/// A type annotation on a local variable, with the ranges where the local variable is in which slot.
	LocalVariable {
		type_reference: TypeReference,
		type_path: TypePath,
		table: Vec<(LabelRange, LvIndex)>,
	},
}

/// A visitor for everything that can carry annotations.
///
/// Implementations only accept the [`AnnotationTarget`]s that make sense for them, and return an error for all
/// the others.
pub trait AnnotatableVisitor
where
	Self: Sized,
{
	type AnnotationVisitor: NamedElementValueVisitor;
	type AnnotationResidual;

	fn visit_annotation(self, target: AnnotationTarget, annotation_descriptor: FieldDescriptor, visible: bool)
		-> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)>;
	fn finish_annotation(this: Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self>;
}

/// A visitor for the element value pairs of an annotation.
pub trait NamedElementValueVisitor
where
	Self: Sized,
{
	type AnnotationVisitor: NamedElementValueVisitor;
	type AnnotationResidual;
	type AnnotationArrayVisitor: UnnamedElementValueVisitor;
	type AnnotationArrayResidual;

	fn visit(&mut self, name: String, value: Object) -> Result<()>;

	fn visit_enum(
		&mut self,
		name: String,
		type_name: FieldDescriptor,
		const_name: String,
	) -> Result<()>;

	fn visit_class(&mut self, name: String, class: String) -> Result<()>;

	fn visit_annotation(self, name: String, annotation_type: FieldDescriptor) -> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)>;
	fn finish_annotation(this: Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self>;

	fn visit_array(self, name: String) -> Result<(Self::AnnotationArrayResidual, Self::AnnotationArrayVisitor)>;
	fn finish_array(this: Self::AnnotationArrayResidual, annotation_array_visitor: Self::AnnotationArrayVisitor) -> Result<Self>;
}

/// A visitor for element values without names, as found in arrays and as the default value of an annotation interface method.
pub trait UnnamedElementValueVisitor
where
	Self: Sized,
{
	type AnnotationVisitor: NamedElementValueVisitor;
	type AnnotationResidual;
	type AnnotationArrayVisitor: UnnamedElementValueVisitor;
	type AnnotationArrayResidual;

	fn visit(&mut self, value: Object) -> Result<()>;

	fn visit_enum(
		&mut self,
		type_name: FieldDescriptor,
		const_name: String,
	) -> Result<()>;

	fn visit_class(&mut self, class: String) -> Result<()>;

	fn visit_annotation(self, annotation_type: FieldDescriptor) -> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)>;
	fn finish_annotation(this: Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self>;

	fn visit_array(self) -> Result<(Self::AnnotationArrayResidual, Self::AnnotationArrayVisitor)>;
	fn finish_array(this: Self::AnnotationArrayResidual, annotation_array_visitor: Self::AnnotationArrayVisitor) -> Result<Self>;
}
