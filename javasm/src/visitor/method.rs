pub mod code;

use anyhow::Result;
use crate::tree::method::MethodParameter;
use crate::visitor::annotation::{AnnotatableVisitor, UnnamedElementValueVisitor};
use crate::visitor::method::code::CodeVisitor;

/// A visitor for the contents of a method.
///
/// The annotations given through [`AnnotatableVisitor`] are the ones on the method and its formal parameters.
pub trait MethodVisitor: AnnotatableVisitor {
	type AnnotationDefaultVisitor: UnnamedElementValueVisitor;
	type AnnotationDefaultResidual;
	type CodeVisitor: CodeVisitor;

	fn visit_parameter(&mut self, method_parameter: MethodParameter) -> Result<()>;
	fn visit_annotable_parameter_count(&mut self, count: u8, visible: bool) -> Result<()>;

	fn visit_annotation_default(self) -> Result<(Self::AnnotationDefaultResidual, Self::AnnotationDefaultVisitor)>;
	fn finish_annotation_default(this: Self::AnnotationDefaultResidual, element_value_visitor: Self::AnnotationDefaultVisitor) -> Result<Self>;

	fn visit_code(&mut self) -> Result<Self::CodeVisitor>;
	fn finish_code(&mut self, code_visitor: Self::CodeVisitor) -> Result<()>;
}
