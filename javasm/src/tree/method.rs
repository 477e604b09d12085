pub mod code;

use anyhow::{bail, Context};
use crate::macros::make_name;
use crate::tree::access::AccessFlags;
use crate::tree::annotation::{Annotation, ElementValue};
use crate::tree::class::ClassName;
use crate::tree::descriptor::check_method_descriptor;
use crate::tree::method::code::Code;
use crate::tree::type_annotation::{TargetInfoMethod, TypeAnnotation};

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
	pub access: AccessFlags,
	pub name: MethodName,
	pub descriptor: MethodDescriptor,

	pub signature: Option<MethodSignature>,
	pub exceptions: Vec<ClassName>,

	pub code: Option<Code>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
	pub runtime_visible_type_annotations: Vec<TypeAnnotation<TargetInfoMethod>>,
	pub runtime_invisible_type_annotations: Vec<TypeAnnotation<TargetInfoMethod>>,

	pub visible_annotable_parameter_count: Option<u8>,
	pub invisible_annotable_parameter_count: Option<u8>,
	pub runtime_visible_parameter_annotations: Vec<ParameterAnnotation>,
	pub runtime_invisible_parameter_annotations: Vec<ParameterAnnotation>,

	pub annotation_default: Option<ElementValue>,
	pub method_parameters: Vec<MethodParameter>,
}

impl Method {
	pub fn new(access: AccessFlags, name: MethodName, descriptor: MethodDescriptor, signature: Option<MethodSignature>, exceptions: Vec<ClassName>) -> Method {
		Method {
			access,
			name,
			descriptor,

			signature,
			exceptions,

			code: None,

			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
			runtime_visible_type_annotations: Vec::new(),
			runtime_invisible_type_annotations: Vec::new(),

			visible_annotable_parameter_count: None,
			invisible_annotable_parameter_count: None,
			runtime_visible_parameter_annotations: Vec::new(),
			runtime_invisible_parameter_annotations: Vec::new(),

			annotation_default: None,
			method_parameters: Vec::new(),
		}
	}
}

/// An entry of the `MethodParameters` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodParameter {
	/// The name of the parameter, or [`None`] for a formal parameter without a name.
	pub name: Option<String>,
	pub flags: AccessFlags,
}

/// An annotation on the formal parameter with the index `parameter`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAnnotation {
	pub parameter: u8,
	pub annotation: Annotation,
}

make_name!(
	/// Represents a method name.
	pub MethodName;
	is_valid(s) = super::names::check_method_name(s).context("invalid method name");
);

impl MethodName {
	pub const INIT: MethodName = MethodName::from_static("<init>");
	pub const CLINIT: MethodName = MethodName::from_static("<clinit>");
}

make_name!(
	/// Represents a method descriptor, like `(ILjava/lang/String;)V`.
	pub MethodDescriptor;
	is_valid(s) = check_method_descriptor(s)
		.map(|_| ())
		.context("invalid method descriptor");
);

make_name!(
	/// Represents a method signature, for example `<T:Ljava/lang/Object;>(TT;)V`.
	pub MethodSignature;
	is_valid(s) = if s.is_empty() {
		bail!("signature must not be empty")
	} else {
		Ok(())
	};
);

/// A reference to a method, as used by the invoke instructions and by method handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
	pub class: ClassName,
	pub name: MethodName,
	pub desc: MethodDescriptor,
}
