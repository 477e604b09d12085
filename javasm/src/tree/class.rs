use anyhow::{bail, Context};
use crate::macros::make_name;
use crate::tree::access::AccessFlags;
use crate::tree::annotation::Annotation;
use crate::tree::field::Field;
use crate::tree::method::Method;
use crate::tree::record::RecordComponent;
use crate::tree::type_annotation::{TargetInfoClass, TypeAnnotation};
use crate::tree::version::Version;

/// An assembled class.
///
/// All the lists are in the order the declarations appeared in the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
	pub version: Version,
	pub access: AccessFlags,
	pub name: ClassName,
	pub super_class: Option<ClassName>,
	pub interfaces: Vec<ClassName>,

	pub signature: Option<ClassSignature>,
	pub source_file: Option<String>,

	pub nest_host_class: Option<ClassName>,
	pub nest_members: Vec<ClassName>,
	pub inner_classes: Vec<InnerClass>,

	pub record_components: Vec<RecordComponent>,
	pub fields: Vec<Field>,
	pub methods: Vec<Method>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
	pub runtime_visible_type_annotations: Vec<TypeAnnotation<TargetInfoClass>>,
	pub runtime_invisible_type_annotations: Vec<TypeAnnotation<TargetInfoClass>>,
}

impl ClassFile {
	pub fn new(version: Version, access: AccessFlags, name: ClassName, signature: Option<ClassSignature>, super_class: Option<ClassName>, interfaces: Vec<ClassName>) -> ClassFile {
		ClassFile {
			version,
			access,
			name,
			super_class,
			interfaces,

			signature,
			source_file: None,

			nest_host_class: None,
			nest_members: Vec::new(),
			inner_classes: Vec::new(),

			record_components: Vec::new(),
			fields: Vec::new(),
			methods: Vec::new(),

			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
			runtime_visible_type_annotations: Vec::new(),
			runtime_invisible_type_annotations: Vec::new(),
		}
	}
}

make_name!(
	/// Represents a class name.
	///
	/// The class name uses [internal binary names](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.2.1), i.e. with complete path
	/// written out and using slashes. It may also be an array class name, which is an array field descriptor.
	///
	/// # Examples
	/// The java class `java.lang.Thread` would get:
	/// ```
	/// use javasm::tree::class::ClassName;
	/// let name = ClassName::try_from("java/lang/Thread").unwrap();
	/// assert_eq!(name.as_str(), "java/lang/Thread");
	/// assert!(!ClassName::is_valid("java.lang.Thread"));
	/// ```
	pub ClassName;
	is_valid(s) = super::names::check_class_name(s).context("invalid class name");
);

impl ClassName {
	pub const JAVA_LANG_OBJECT: ClassName = ClassName::from_static("java/lang/Object");
	pub const JAVA_LANG_RECORD: ClassName = ClassName::from_static("java/lang/Record");
	pub const JAVA_LANG_STRING: ClassName = ClassName::from_static("java/lang/String");

	/// Returns `true` if this is the name of an array class.
	pub fn is_array(&self) -> bool {
		self.as_str().starts_with('[')
	}
}

make_name!(
	/// Represents a class signature, from a generic such as `Foo<T extends Bar>`.
	pub ClassSignature;
	is_valid(s) = if s.is_empty() {
		bail!("signature must not be empty")
	} else {
		Ok(())
	};
);

/// An entry of the `InnerClasses` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerClass {
	pub inner_class: ClassName,
	pub outer_class: Option<ClassName>,
	pub inner_name: Option<String>,
	pub flags: AccessFlags,
}
