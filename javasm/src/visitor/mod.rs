use std::ops::ControlFlow;
use anyhow::Result;
use crate::tree::access::AccessFlags;
use crate::tree::class::{ClassName, ClassSignature};
use crate::tree::version::Version;
use crate::visitor::class::ClassVisitor;

mod implementations;

pub mod annotation;
pub mod class;
pub mod field;
pub mod method;
pub mod record;

/// A visitor that can take in multiple classes.
///
/// Returning [`ControlFlow::Break`] from [`MultiClassVisitor::visit_class`] stops reading without visiting the
/// contents of the class.
pub trait MultiClassVisitor
where
	Self: Sized,
{
	type ClassVisitor: ClassVisitor;
	type ClassResidual;

	fn visit_class(
		self,
		version: Version,
		access: AccessFlags,
		name: ClassName,
		signature: Option<ClassSignature>,
		super_class: Option<ClassName>,
		interfaces: Vec<ClassName>,
	) -> Result<ControlFlow<Self, (Self::ClassResidual, Self::ClassVisitor)>>;
	fn finish_class(this: Self::ClassResidual, class_visitor: Self::ClassVisitor) -> Result<Self>;
}
