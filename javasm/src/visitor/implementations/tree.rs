use std::ops::ControlFlow;
use anyhow::{anyhow, bail, Context, Result};
use crate::OptionExpansion;
use crate::tree::access::AccessFlags;
use crate::tree::annotation::{Annotation, ElementValue, ElementValuePair, Object};
use crate::tree::class::{ClassFile, ClassName, ClassSignature, InnerClass};
use crate::tree::field::{ConstantValue, Field, FieldDescriptor, FieldName, FieldSignature};
use crate::tree::method::{Method, MethodDescriptor, MethodName, MethodParameter, MethodSignature, ParameterAnnotation};
use crate::tree::method::code::{Code, CodeElement, CodeTypeAnnotation, Exception, Instruction, Label, Lv};
use crate::tree::record::{RecordComponent, RecordName};
use crate::tree::type_annotation::{TargetInfoClass, TargetInfoCode, TargetInfoField, TargetInfoMethod, TypeAnnotation, TypePath, TypeReference};
use crate::tree::version::Version;
use crate::visitor::annotation::{AnnotatableVisitor, AnnotationTarget, NamedElementValueVisitor, UnnamedElementValueVisitor};
use crate::visitor::class::ClassVisitor;
use crate::visitor::field::FieldVisitor;
use crate::visitor::method::code::{CodeVisitor, StackMapData};
use crate::visitor::method::MethodVisitor;
use crate::visitor::MultiClassVisitor;
use crate::visitor::record::RecordComponentVisitor;

impl MultiClassVisitor for Option<ClassFile> {
	type ClassVisitor = ClassFile;
	type ClassResidual = ();

	fn visit_class(self, version: Version, access: AccessFlags, name: ClassName, signature: Option<ClassSignature>, super_class: Option<ClassName>, interfaces: Vec<ClassName>)
			-> Result<ControlFlow<Self, (Self::ClassResidual, Self::ClassVisitor)>> {
		if let Some(old) = self {
			bail!("only one class visit allowed, but was called a second time: we had: {old:#?}, now got called with: {version:?} {access:?} {name:?} {super_class:?} {interfaces:?}")
		}
		Ok(ControlFlow::Continue(((), ClassFile::new(version, access, name, signature, super_class, interfaces))))
	}

	fn finish_class(_this: Self::ClassResidual, class_visitor: Self::ClassVisitor) -> Result<Self> {
		Ok(Some(class_visitor))
	}
}

impl MultiClassVisitor for Vec<ClassFile> {
	type ClassVisitor = ClassFile;
	type ClassResidual = Self;

	fn visit_class(self, version: Version, access: AccessFlags, name: ClassName, signature: Option<ClassSignature>, super_class: Option<ClassName>, interfaces: Vec<ClassName>)
			-> Result<ControlFlow<Self, (Self::ClassResidual, Self::ClassVisitor)>> {
		Ok(ControlFlow::Continue((self, ClassFile::new(version, access, name, signature, super_class, interfaces))))
	}

	fn finish_class(mut this: Self::ClassResidual, class_visitor: Self::ClassVisitor) -> Result<Self> {
		this.push(class_visitor);
		Ok(this)
	}
}

/// Where an annotation on a class, field, method or record component goes.
pub enum Attachment<T> {
	Declaration,
	Parameter(u8),
	Type(T, TypePath),
}

impl<T> Attachment<T>
where
	T: TryFrom<TypeReference, Error = anyhow::Error>,
{
	fn new(target: AnnotationTarget, on: &str, allow_parameters: bool) -> Result<Attachment<T>> {
		Ok(match target {
			AnnotationTarget::Declaration => Attachment::Declaration,
			AnnotationTarget::Parameter { index } if allow_parameters => Attachment::Parameter(index),
			AnnotationTarget::Type { type_reference, type_path } => {
				let target = T::try_from(type_reference)?;
				Attachment::Type(target, type_path)
			},
			target => bail!("annotation target {target:?} is not allowed on a {on}"),
		})
	}
}

/// The lists an [`Attachment`] is stored into.
struct AnnotationLists<'a, T> {
	visible: &'a mut Vec<Annotation>,
	invisible: &'a mut Vec<Annotation>,
	visible_type: &'a mut Vec<TypeAnnotation<T>>,
	invisible_type: &'a mut Vec<TypeAnnotation<T>>,
}

impl<T> AnnotationLists<'_, T> {
	fn store(self, visible: bool, attachment: Attachment<T>, annotation: Annotation) -> Result<()> {
		match attachment {
			Attachment::Declaration => {
				if visible {
					self.visible.push(annotation);
				} else {
					self.invisible.push(annotation);
				}
			},
			Attachment::Type(type_reference, type_path) => {
				let type_annotation = TypeAnnotation::new(type_reference, type_path, annotation);
				if visible {
					self.visible_type.push(type_annotation);
				} else {
					self.invisible_type.push(type_annotation);
				}
			},
			Attachment::Parameter(index) => bail!("can't store parameter annotation for parameter {index} here"),
		}
		Ok(())
	}
}

impl AnnotatableVisitor for ClassFile {
	type AnnotationVisitor = Annotation;
	type AnnotationResidual = (Self, bool, Attachment<TargetInfoClass>);

	fn visit_annotation(self, target: AnnotationTarget, annotation_descriptor: FieldDescriptor, visible: bool)
			-> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)> {
		let attachment = Attachment::new(target, "class", false)?;
		Ok(((self, visible, attachment), Annotation::new(annotation_descriptor)))
	}

	fn finish_annotation((mut this, visible, attachment): Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self> {
		AnnotationLists {
			visible: &mut this.runtime_visible_annotations,
			invisible: &mut this.runtime_invisible_annotations,
			visible_type: &mut this.runtime_visible_type_annotations,
			invisible_type: &mut this.runtime_invisible_type_annotations,
		}.store(visible, attachment, annotation_visitor)?;
		Ok(this)
	}
}

impl ClassVisitor for ClassFile {
	type RecordComponentVisitor = RecordComponent;
	type RecordComponentResidual = Self;
	type FieldVisitor = Field;
	type FieldResidual = Self;
	type MethodVisitor = Method;
	type MethodResidual = Self;

	fn visit_source_file(&mut self, source_file: String) -> Result<()> {
		self.source_file.insert_if_empty(source_file).context("only one SourceFile attribute is allowed")
	}

	fn visit_nest_host_class(&mut self, nest_host_class: ClassName) -> Result<()> {
		self.nest_host_class.insert_if_empty(nest_host_class).context("only one NestHost attribute is allowed")
	}

	fn visit_nest_member(&mut self, nest_member: ClassName) -> Result<()> {
		self.nest_members.push(nest_member);
		Ok(())
	}

	fn visit_inner_class(&mut self, inner_class: InnerClass) -> Result<()> {
		self.inner_classes.push(inner_class);
		Ok(())
	}

	fn visit_record_component(self, name: RecordName, descriptor: FieldDescriptor, signature: Option<FieldSignature>)
			-> Result<(Self::RecordComponentResidual, Self::RecordComponentVisitor)> {
		Ok((self, RecordComponent::new(name, descriptor, signature)))
	}

	fn finish_record_component(mut this: Self::RecordComponentResidual, record_component_visitor: Self::RecordComponentVisitor) -> Result<Self> {
		this.record_components.push(record_component_visitor);
		Ok(this)
	}

	fn visit_field(self, access: AccessFlags, name: FieldName, descriptor: FieldDescriptor, signature: Option<FieldSignature>, constant_value: Option<ConstantValue>)
			-> Result<(Self::FieldResidual, Self::FieldVisitor)> {
		Ok((self, Field::new(access, name, descriptor, signature, constant_value)))
	}

	fn finish_field(mut this: Self::FieldResidual, field_visitor: Self::FieldVisitor) -> Result<Self> {
		this.fields.push(field_visitor);
		Ok(this)
	}

	fn visit_method(self, access: AccessFlags, name: MethodName, descriptor: MethodDescriptor, signature: Option<MethodSignature>, exceptions: Vec<ClassName>)
			-> Result<(Self::MethodResidual, Self::MethodVisitor)> {
		Ok((self, Method::new(access, name, descriptor, signature, exceptions)))
	}

	fn finish_method(mut this: Self::MethodResidual, method_visitor: Self::MethodVisitor) -> Result<Self> {
		this.methods.push(method_visitor);
		Ok(this)
	}
}

impl AnnotatableVisitor for Field {
	type AnnotationVisitor = Annotation;
	type AnnotationResidual = (Self, bool, Attachment<TargetInfoField>);

	fn visit_annotation(self, target: AnnotationTarget, annotation_descriptor: FieldDescriptor, visible: bool)
			-> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)> {
		let attachment = Attachment::new(target, "field", false)?;
		Ok(((self, visible, attachment), Annotation::new(annotation_descriptor)))
	}

	fn finish_annotation((mut this, visible, attachment): Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self> {
		AnnotationLists {
			visible: &mut this.runtime_visible_annotations,
			invisible: &mut this.runtime_invisible_annotations,
			visible_type: &mut this.runtime_visible_type_annotations,
			invisible_type: &mut this.runtime_invisible_type_annotations,
		}.store(visible, attachment, annotation_visitor)?;
		Ok(this)
	}
}

impl FieldVisitor for Field {}

impl AnnotatableVisitor for RecordComponent {
	type AnnotationVisitor = Annotation;
	type AnnotationResidual = (Self, bool, Attachment<TargetInfoField>);

	fn visit_annotation(self, target: AnnotationTarget, annotation_descriptor: FieldDescriptor, visible: bool)
			-> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)> {
		let attachment = Attachment::new(target, "record component", false)?;
		Ok(((self, visible, attachment), Annotation::new(annotation_descriptor)))
	}

	fn finish_annotation((mut this, visible, attachment): Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self> {
		AnnotationLists {
			visible: &mut this.runtime_visible_annotations,
			invisible: &mut this.runtime_invisible_annotations,
			visible_type: &mut this.runtime_visible_type_annotations,
			invisible_type: &mut this.runtime_invisible_type_annotations,
		}.store(visible, attachment, annotation_visitor)?;
		Ok(this)
	}
}

impl RecordComponentVisitor for RecordComponent {}

impl AnnotatableVisitor for Method {
	type AnnotationVisitor = Annotation;
	type AnnotationResidual = (Self, bool, Attachment<TargetInfoMethod>);

	fn visit_annotation(self, target: AnnotationTarget, annotation_descriptor: FieldDescriptor, visible: bool)
			-> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)> {
		let attachment = Attachment::new(target, "method", true)?;
		Ok(((self, visible, attachment), Annotation::new(annotation_descriptor)))
	}

	fn finish_annotation((mut this, visible, attachment): Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self> {
		if let Attachment::Parameter(parameter) = attachment {
			let parameter_annotation = ParameterAnnotation { parameter, annotation: annotation_visitor };
			if visible {
				this.runtime_visible_parameter_annotations.push(parameter_annotation);
			} else {
				this.runtime_invisible_parameter_annotations.push(parameter_annotation);
			}
		} else {
			AnnotationLists {
				visible: &mut this.runtime_visible_annotations,
				invisible: &mut this.runtime_invisible_annotations,
				visible_type: &mut this.runtime_visible_type_annotations,
				invisible_type: &mut this.runtime_invisible_type_annotations,
			}.store(visible, attachment, annotation_visitor)?;
		}
		Ok(this)
	}
}

impl MethodVisitor for Method {
	type AnnotationDefaultVisitor = Vec<ElementValue>;
	type AnnotationDefaultResidual = Self;
	type CodeVisitor = Code;

	fn visit_parameter(&mut self, method_parameter: MethodParameter) -> Result<()> {
		self.method_parameters.push(method_parameter);
		Ok(())
	}

	fn visit_annotable_parameter_count(&mut self, count: u8, visible: bool) -> Result<()> {
		if visible {
			self.visible_annotable_parameter_count.insert_if_empty(count)
				.context("only one RuntimeVisibleParameterAnnotations attribute is allowed")
		} else {
			self.invisible_annotable_parameter_count.insert_if_empty(count)
				.context("only one RuntimeInvisibleParameterAnnotations attribute is allowed")
		}
	}

	fn visit_annotation_default(self) -> Result<(Self::AnnotationDefaultResidual, Self::AnnotationDefaultVisitor)> {
		Ok((self, Vec::new()))
	}

	fn finish_annotation_default(mut this: Self::AnnotationDefaultResidual, mut element_value_visitor: Self::AnnotationDefaultVisitor) -> Result<Self> {
		if element_value_visitor.len() != 1 {
			bail!("annotation default must be exactly one value, got {element_value_visitor:?}");
		}
		if let Some(value) = element_value_visitor.pop() {
			this.annotation_default.insert_if_empty(value).context("only one AnnotationDefault attribute is allowed")?;
		}
		Ok(this)
	}

	fn visit_code(&mut self) -> Result<Self::CodeVisitor> {
		Ok(Code::default())
	}

	fn finish_code(&mut self, code_visitor: Self::CodeVisitor) -> Result<()> {
		self.code.insert_if_empty(code_visitor).context("only one Code attribute is allowed")
	}
}

impl AnnotatableVisitor for Code {
	type AnnotationVisitor = Annotation;
	type AnnotationResidual = (Self, bool, Option<usize>, TargetInfoCode, TypePath);

	fn visit_annotation(self, target: AnnotationTarget, annotation_descriptor: FieldDescriptor, visible: bool)
			-> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)> {
		let (type_reference, type_path) = match target {
			AnnotationTarget::Type { type_reference, type_path } => {
				(TargetInfoCode::from_reference(type_reference, None)?, type_path)
			},
			AnnotationTarget::LocalVariable { type_reference, type_path, table } => {
				(TargetInfoCode::from_reference(type_reference, Some(table))?, type_path)
			},
			target => bail!("annotation target {target:?} is not allowed inside code"),
		};
		let instruction = if type_reference.is_on_instruction() {
			let index = self.last_instruction()
				.with_context(|| anyhow!("type annotation {type_reference:?} must come after the instruction it's on"))?;
			Some(index)
		} else {
			None
		};
		Ok(((self, visible, instruction, type_reference, type_path), Annotation::new(annotation_descriptor)))
	}

	fn finish_annotation((mut this, visible, instruction, type_reference, type_path): Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self> {
		let annotation = CodeTypeAnnotation {
			instruction,
			type_annotation: TypeAnnotation::new(type_reference, type_path, annotation_visitor),
		};
		if visible {
			this.runtime_visible_type_annotations.push(annotation);
		} else {
			this.runtime_invisible_type_annotations.push(annotation);
		}
		Ok(this)
	}
}

impl CodeVisitor for Code {
	fn visit_label(&mut self, label: Label) -> Result<()> {
		self.elements.push(CodeElement::Label(label));
		Ok(())
	}

	fn visit_frame(&mut self, frame: StackMapData) -> Result<()> {
		self.elements.push(CodeElement::Frame(frame));
		Ok(())
	}

	fn visit_line_number(&mut self, line: u16, start: Label) -> Result<()> {
		self.elements.push(CodeElement::LineNumber { line, start });
		Ok(())
	}

	fn visit_instruction(&mut self, instruction: Instruction) -> Result<()> {
		self.elements.push(CodeElement::Instruction(instruction));
		Ok(())
	}

	fn visit_try_catch_block(&mut self, exception: Exception) -> Result<()> {
		self.exception_table.push(exception);
		Ok(())
	}

	fn visit_local_variable(&mut self, local_variable: Lv) -> Result<()> {
		self.local_variables.push(local_variable);
		Ok(())
	}

	fn visit_max_stack_and_max_locals(&mut self, max_stack: u16, max_locals: u16) -> Result<()> {
		self.max_stack.insert_if_empty(max_stack).context("only one MAXSTACK is allowed")?;
		self.max_locals.insert_if_empty(max_locals).context("only one MAXLOCALS is allowed")
	}
}

impl NamedElementValueVisitor for Annotation {
	type AnnotationVisitor = Annotation;
	type AnnotationResidual = (Self, String);
	type AnnotationArrayVisitor = Vec<ElementValue>;
	type AnnotationArrayResidual = (Self, String);

	fn visit(&mut self, name: String, value: Object) -> Result<()> {
		self.element_value_pairs.push(ElementValuePair {
			name,
			value: ElementValue::Object(value),
		});
		Ok(())
	}

	fn visit_enum(&mut self, name: String, type_name: FieldDescriptor, const_name: String) -> Result<()> {
		self.element_value_pairs.push(ElementValuePair {
			name,
			value: ElementValue::Enum {
				type_name,
				const_name,
			}
		});
		Ok(())
	}

	fn visit_class(&mut self, name: String, class: String) -> Result<()> {
		self.element_value_pairs.push(ElementValuePair {
			name,
			value: ElementValue::Class(class),
		});
		Ok(())
	}

	fn visit_annotation(self, name: String, annotation_type: FieldDescriptor) -> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)> {
		Ok(((self, name), Annotation::new(annotation_type)))
	}

	fn finish_annotation((mut this, name): Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self> {
		this.element_value_pairs.push(ElementValuePair {
			name,
			value: ElementValue::AnnotationInterface(annotation_visitor),
		});
		Ok(this)
	}

	fn visit_array(self, name: String) -> Result<(Self::AnnotationArrayResidual, Self::AnnotationArrayVisitor)> {
		Ok(((self, name), Vec::new()))
	}

	fn finish_array((mut this, name): Self::AnnotationArrayResidual, annotation_array_visitor: Self::AnnotationArrayVisitor) -> Result<Self> {
		this.element_value_pairs.push(ElementValuePair {
			name,
			value: ElementValue::ArrayType(annotation_array_visitor),
		});
		Ok(this)
	}
}

impl UnnamedElementValueVisitor for Vec<ElementValue> {
	type AnnotationVisitor = Annotation;
	type AnnotationResidual = Self;
	type AnnotationArrayVisitor = Vec<ElementValue>;
	type AnnotationArrayResidual = Self;

	fn visit(&mut self, value: Object) -> Result<()> {
		self.push(ElementValue::Object(value));
		Ok(())
	}

	fn visit_enum(&mut self, type_name: FieldDescriptor, const_name: String) -> Result<()> {
		self.push(ElementValue::Enum {
			type_name,
			const_name,
		});
		Ok(())
	}

	fn visit_class(&mut self, class: String) -> Result<()> {
		self.push(ElementValue::Class(class));
		Ok(())
	}

	fn visit_annotation(self, annotation_type: FieldDescriptor) -> Result<(Self::AnnotationResidual, Self::AnnotationVisitor)> {
		Ok((self, Annotation::new(annotation_type)))
	}

	fn finish_annotation(mut this: Self::AnnotationResidual, annotation_visitor: Self::AnnotationVisitor) -> Result<Self> {
		this.push(ElementValue::AnnotationInterface(annotation_visitor));
		Ok(this)
	}

	fn visit_array(self) -> Result<(Self::AnnotationArrayResidual, Self::AnnotationArrayVisitor)> {
		Ok((self, Vec::new()))
	}

	fn finish_array(mut this: Self::AnnotationArrayResidual, annotation_array_visitor: Self::AnnotationArrayVisitor) -> Result<Self> {
		this.push(ElementValue::ArrayType(annotation_array_visitor));
		Ok(this)
	}
}
