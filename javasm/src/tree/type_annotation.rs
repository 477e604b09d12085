use anyhow::{anyhow, bail, Context, Result};
use crate::tree::annotation::Annotation;
use crate::tree::method::code::{LabelRange, LvIndex};

/// Where a type annotation is, as written in a listing.
///
/// This is the symbolic form of the `target_type` and `target_info` items of the class file.
/// Whether a certain [`TypeReference`] is allowed depends on what's annotated. To check that, convert it into
/// one of [`TargetInfoClass`], [`TargetInfoField`] or [`TargetInfoMethod`], or into the code
/// targets with [`TargetInfoCode::from_reference`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TypeReference {
	ClassTypeParameter { index: u8 },
	MethodTypeParameter { index: u8 },
	/// On the superclass, if `index` is [`None`], otherwise on the `index`th interface.
	ClassExtends { index: Option<u16> },
	ClassTypeParameterBound { type_parameter_index: u8, bound_index: u8 },
	MethodTypeParameterBound { type_parameter_index: u8, bound_index: u8 },
	Field,
	MethodReturn,
	MethodReceiver,
	MethodFormalParameter { index: u8 },
	Throws { index: u16 },
	LocalVariable,
	ResourceVariable,
	ExceptionParameter { index: u16 },
	InstanceOf,
	New,
	ConstructorReference,
	MethodReference,
	Cast { index: u8 },
	ConstructorInvocationTypeArgument { index: u8 },
	MethodInvocationTypeArgument { index: u8 },
	ConstructorReferenceTypeArgument { index: u8 },
	MethodReferenceTypeArgument { index: u8 },
}

impl TypeReference {
	/// The `target_type` value of this reference.
	pub fn sort(self) -> u8 {
		match self {
			TypeReference::ClassTypeParameter { .. } => 0x00,
			TypeReference::MethodTypeParameter { .. } => 0x01,
			TypeReference::ClassExtends { .. } => 0x10,
			TypeReference::ClassTypeParameterBound { .. } => 0x11,
			TypeReference::MethodTypeParameterBound { .. } => 0x12,
			TypeReference::Field => 0x13,
			TypeReference::MethodReturn => 0x14,
			TypeReference::MethodReceiver => 0x15,
			TypeReference::MethodFormalParameter { .. } => 0x16,
			TypeReference::Throws { .. } => 0x17,
			TypeReference::LocalVariable => 0x40,
			TypeReference::ResourceVariable => 0x41,
			TypeReference::ExceptionParameter { .. } => 0x42,
			TypeReference::InstanceOf => 0x43,
			TypeReference::New => 0x44,
			TypeReference::ConstructorReference => 0x45,
			TypeReference::MethodReference => 0x46,
			TypeReference::Cast { .. } => 0x47,
			TypeReference::ConstructorInvocationTypeArgument { .. } => 0x48,
			TypeReference::MethodInvocationTypeArgument { .. } => 0x49,
			TypeReference::ConstructorReferenceTypeArgument { .. } => 0x4a,
			TypeReference::MethodReferenceTypeArgument { .. } => 0x4b,
		}
	}

	/// Packs this reference into 32 bits, the same way ASM's `TypeReference.getValue()` does.
	///
	/// The sort is in the highest byte, the parameters follow in the lower bytes.
	pub fn to_u32(self) -> u32 {
		let sort = (self.sort() as u32) << 24;
		match self {
			TypeReference::ClassTypeParameter { index } |
			TypeReference::MethodTypeParameter { index } |
			TypeReference::MethodFormalParameter { index } => sort | (index as u32) << 16,
			TypeReference::ClassExtends { index } => sort | (index.unwrap_or(u16::MAX) as u32) << 8,
			TypeReference::ClassTypeParameterBound { type_parameter_index, bound_index } |
			TypeReference::MethodTypeParameterBound { type_parameter_index, bound_index } => {
				sort | (type_parameter_index as u32) << 16 | (bound_index as u32) << 8
			},
			TypeReference::Throws { index } |
			TypeReference::ExceptionParameter { index } => sort | (index as u32) << 8,
			TypeReference::Cast { index } |
			TypeReference::ConstructorInvocationTypeArgument { index } |
			TypeReference::MethodInvocationTypeArgument { index } |
			TypeReference::ConstructorReferenceTypeArgument { index } |
			TypeReference::MethodReferenceTypeArgument { index } => sort | index as u32,
			_ => sort,
		}
	}
}

/// States exactly on which type the annotation is.
///
/// For the class file structure.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TargetInfoClass {
	/// The annotation is on a type parameter of a generic class or generic interface.
	ClassTypeParameter {
		/// Specifies the index of the type parameter. `0` means the first type parameter.
		index: u8,
	},
	/// The annotation is on the superclass in an `extends` clause.
	Extends,
	/// The annotation is on an super interface, specified by either the `implements` clause (for
	/// classes) or the `extends` clause (for interfaces).
	Implements {
		/// Specifies the index into the list of the class' interfaces. `0` means first entry of that list.
		index: u16
	},
	/// The annotation is on a bound of a type parameter of a generic class or generic interface.
	ClassTypeParameterBound {
		type_parameter_index: u8,
		bound_index: u8,
	},
}

impl TryFrom<TypeReference> for TargetInfoClass {
	type Error = anyhow::Error;

	fn try_from(value: TypeReference) -> Result<Self> {
		Ok(match value {
			TypeReference::ClassTypeParameter { index } => TargetInfoClass::ClassTypeParameter { index },
			TypeReference::ClassExtends { index: None } => TargetInfoClass::Extends,
			TypeReference::ClassExtends { index: Some(index) } => TargetInfoClass::Implements { index },
			TypeReference::ClassTypeParameterBound { type_parameter_index, bound_index } => {
				TargetInfoClass::ClassTypeParameterBound { type_parameter_index, bound_index }
			},
			value => bail!("type reference {value:?} is not allowed on a class"),
		})
	}
}

/// States exactly on which type the annotation is.
///
/// For the field info structure, and for record components.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TargetInfoField {
	/// The annotation is on the type of a field declaration or on the type of a record component declaration.
	Field,
}

impl TryFrom<TypeReference> for TargetInfoField {
	type Error = anyhow::Error;

	fn try_from(value: TypeReference) -> Result<Self> {
		match value {
			TypeReference::Field => Ok(TargetInfoField::Field),
			value => bail!("type reference {value:?} is not allowed on a field or record component"),
		}
	}
}

/// States exactly on which type the annotation is.
///
/// For the method info structure.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TargetInfoMethod {
	/// The annotation is on a type parameter of a generic method or generic constructor.
	MethodTypeParameter {
		index: u8,
	},
	/// The annotation is on a bound of a type parameter of a generic method or generic constructor.
	MethodTypeParameterBound {
		type_parameter_index: u8,
		bound_index: u8,
	},
	/// The annotation is on the return type of a method or on the type of a newly constructed object.
	Return,
	/// The annotation is on the receiver type of a method or constructor.
	Receiver,
	/// The annotation is on a type of a formal parameter declaration of a method, constructor or lambda expression.
	FormalParameter {
		index: u8,
	},
	/// The annotation is on the `throws` clause of a method or constructor.
	Throws {
		/// Specifies the index into the list of the methods exceptions. `0` means first entry of that list.
		index: u16,
	},
}

impl TryFrom<TypeReference> for TargetInfoMethod {
	type Error = anyhow::Error;

	fn try_from(value: TypeReference) -> Result<Self> {
		Ok(match value {
			TypeReference::MethodTypeParameter { index } => TargetInfoMethod::MethodTypeParameter { index },
			TypeReference::MethodTypeParameterBound { type_parameter_index, bound_index } => {
				TargetInfoMethod::MethodTypeParameterBound { type_parameter_index, bound_index }
			},
			TypeReference::MethodReturn => TargetInfoMethod::Return,
			TypeReference::MethodReceiver => TargetInfoMethod::Receiver,
			TypeReference::MethodFormalParameter { index } => TargetInfoMethod::FormalParameter { index },
			TypeReference::Throws { index } => TargetInfoMethod::Throws { index },
			value => bail!("type reference {value:?} is not allowed on a method"),
		})
	}
}

/// States exactly on which type the annotation is.
///
/// For inside the `Code` attribute. The targets on instructions don't store the instruction, see
/// [`crate::tree::method::code::CodeTypeAnnotation`] for that.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetInfoCode {
	/// Indicates that the annotation is on the type of a local variable declaration.
	///
	/// In each [`LabelRange`] the local variable can be found in the [`LvIndex`].
	LocalVariable {
		table: Vec<(LabelRange, LvIndex)>,
	},
	/// Indicates that the annotation is on the type of a resource variable declaration.
	ResourceVariable {
		table: Vec<(LabelRange, LvIndex)>,
	},
	/// Indicates that the annotation appears on the type of an `catch` statement.
	ExceptionParameter {
		/// Specifies the index into the exception table of the code. `0` means first entry of that list.
		index: u16,
	},
	/// Indicates that the annotation appears on the type of an `instanceof` expression.
	InstanceOf,
	/// Indicates that the annotation appears on the type of a `new` expression.
	New,
	/// Indicates that the annotation appears on the type before the `::` of a constructor reference expression.
	ConstructorReference,
	/// Indicates that the annotation appears on the type before the `::` of a method reference expression.
	MethodReference,
	/// Indicates that the annotation appears on the `index`th type in a cast expression.
	Cast {
		index: u8,
	},
	ConstructorInvocationTypeArgument {
		index: u8,
	},
	MethodInvocationTypeArgument {
		index: u8,
	},
	ConstructorReferenceTypeArgument {
		index: u8,
	},
	MethodReferenceTypeArgument {
		index: u8,
	},
}

impl TargetInfoCode {
	/// Converts a [`TypeReference`] into the target inside code.
	///
	/// The local and resource variable targets need a `table`, while all the others must not have one.
	pub fn from_reference(value: TypeReference, table: Option<Vec<(LabelRange, LvIndex)>>) -> Result<TargetInfoCode> {
		match (value, table) {
			(TypeReference::LocalVariable, Some(table)) => Ok(TargetInfoCode::LocalVariable { table }),
			(TypeReference::ResourceVariable, Some(table)) => Ok(TargetInfoCode::ResourceVariable { table }),
			(TypeReference::LocalVariable | TypeReference::ResourceVariable, None) => {
				bail!("type reference {value:?} requires a table of local variable ranges")
			},
			(value, Some(_)) => bail!("type reference {value:?} can't have local variable ranges"),
			(value, None) => Ok(match value {
				TypeReference::ExceptionParameter { index } => TargetInfoCode::ExceptionParameter { index },
				TypeReference::InstanceOf => TargetInfoCode::InstanceOf,
				TypeReference::New => TargetInfoCode::New,
				TypeReference::ConstructorReference => TargetInfoCode::ConstructorReference,
				TypeReference::MethodReference => TargetInfoCode::MethodReference,
				TypeReference::Cast { index } => TargetInfoCode::Cast { index },
				TypeReference::ConstructorInvocationTypeArgument { index } => TargetInfoCode::ConstructorInvocationTypeArgument { index },
				TypeReference::MethodInvocationTypeArgument { index } => TargetInfoCode::MethodInvocationTypeArgument { index },
				TypeReference::ConstructorReferenceTypeArgument { index } => TargetInfoCode::ConstructorReferenceTypeArgument { index },
				TypeReference::MethodReferenceTypeArgument { index } => TargetInfoCode::MethodReferenceTypeArgument { index },
				value => bail!("type reference {value:?} is not allowed inside code"),
			}),
		}
	}

	/// Returns `true` if this target is on an instruction.
	pub fn is_on_instruction(&self) -> bool {
		!matches!(self,
			TargetInfoCode::LocalVariable { .. } |
			TargetInfoCode::ResourceVariable { .. } |
			TargetInfoCode::ExceptionParameter { .. }
		)
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TypePathKind {
	ArrayDeeper,
	NestedDeeper,
	WildcardBound,
	TypeArgument {
		index: u8,
	}
}

/// Specifies exactly where in the type the annotation is.
///
/// An empty path means the annotation is on the whole type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypePath {
	pub path: Vec<TypePathKind>
}

impl TypePath {
	/// Parses the string form of a type path, as printed by ASM's `TypePath.toString()`.
	///
	/// Each step is one of `[` (deeper in an array), `.` (deeper in a nested type), `*` (the bound of a wildcard),
	/// or a number followed by `;` (the type argument with that index).
	pub fn parse(s: &str) -> Result<TypePath> {
		let mut path = Vec::new();
		let mut rest = s;
		while let Some(char) = rest.chars().next() {
			match char {
				'[' => path.push(TypePathKind::ArrayDeeper),
				'.' => path.push(TypePathKind::NestedDeeper),
				'*' => path.push(TypePathKind::WildcardBound),
				'0'..='9' => {
					let end = rest.find(';')
						.with_context(|| anyhow!("expected `;` after type argument index in type path {s:?}"))?;
					let index = rest[..end].parse()
						.with_context(|| anyhow!("invalid type argument index in type path {s:?}"))?;
					path.push(TypePathKind::TypeArgument { index });
					rest = &rest[end..];
				},
				char => bail!("unexpected char {char:?} in type path {s:?}"),
			}
			rest = &rest[char.len_utf8()..];
		}
		Ok(TypePath { path })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation<T> {
	pub type_reference: T,
	pub type_path: TypePath,
	pub annotation: Annotation,
}

impl<T> TypeAnnotation<T> {
	pub fn new(type_reference: T, type_path: TypePath, annotation: Annotation) -> TypeAnnotation<T> {
		TypeAnnotation { type_reference, type_path, annotation }
	}
}
