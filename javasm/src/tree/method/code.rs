use anyhow::Context;
use java_string::JavaString;
use crate::macros::make_name;
use crate::tree::class::ClassName;
use crate::tree::field::{FieldDescriptor, FieldName, FieldRef, FieldSignature};
use crate::tree::method::{MethodDescriptor, MethodName, MethodRef};
use crate::tree::type_annotation::{TargetInfoCode, TypeAnnotation};
use crate::visitor::method::code::StackMapData;

/// One entry of the code of a method, in the order they appear in the listing.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeElement {
	/// The position of a label.
	Label(Label),
	/// A stack map frame at the current position.
	Frame(StackMapData),
	/// A `LineNumberTable` entry.
	LineNumber {
		line: u16,
		start: Label,
	},
	Instruction(Instruction),
}

/// Represents the code of a method.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Code {
	pub max_stack: Option<u16>,
	pub max_locals: Option<u16>,

	pub elements: Vec<CodeElement>,
	pub exception_table: Vec<Exception>,
	pub local_variables: Vec<Lv>,

	pub runtime_visible_type_annotations: Vec<CodeTypeAnnotation>,
	pub runtime_invisible_type_annotations: Vec<CodeTypeAnnotation>,
}

impl Code {
	/// Returns the index into [`Code::elements`] of the last instruction, if there's any.
	pub(crate) fn last_instruction(&self) -> Option<usize> {
		self.elements.iter()
			.rposition(|element| matches!(element, CodeElement::Instruction(_)))
	}
}

/// A type annotation inside the code.
///
/// For the targets on instructions (like [`TargetInfoCode::New`]), `instruction` is the index of the
/// annotated instruction in [`Code::elements`].
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTypeAnnotation {
	pub instruction: Option<usize>,
	pub type_annotation: TypeAnnotation<TargetInfoCode>,
}

make_name!(
	/// Represents a local variable name.
	pub LocalVariableName;
	is_valid(s) = super::super::names::check_unqualified_name(s).context("invalid local variable name");
);

#[derive(Debug, Clone, PartialEq)]
pub struct Exception {
	pub start: Label,
	pub end: Label,
	pub handler: Label,
	/// The caught type, or [`None`] for catching anything, like `finally` does.
	pub catch: Option<ClassName>,
}

/// Represents an index of a local variable.
///
/// If the local variable is of type `double` or `long`, it also occupies
/// the [`LvIndex`] with `index = index + 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LvIndex {
	pub index: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lv {
	pub range: LabelRange,
	pub name: LocalVariableName,
	pub descriptor: FieldDescriptor,
	pub signature: Option<FieldSignature>,
	pub index: LvIndex,
}

/// Represents a position in the code using a method-local id.
///
/// In a listing, labels are written as `L` followed by a number, like `L0`. Every mention of the same number in one
/// method refers to the same label, regardless of whether the label position comes before or after the mention.
///
/// The id stored in the `id` field does **not** correspond to the number in the listing, nor to the bytecode offset. It's
/// given out in the order the labels are first mentioned, starting at `0`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
	pub id: u16,
}

/// Represents a range of positions in the code.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRange {
	/// The start label, inclusive.
	pub start: Label,
	/// The end label, exclusive.
	pub end: Label,
}

/// Represents an instruction of the JVM.
///
/// Each instruction can either:
/// - hold no additional data, like [`Instruction::Nop`],
/// - hold some immediate value, like [`Instruction::BiPush`],
/// - hold a [local variable index][LvIndex], like [`Instruction::ILoad`] (note that this also represents the `iload_0` instruction for example),
/// - hold a [`Label`] for jumps, like [`Instruction::IfEq`],
/// - or hold other data the instruction needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
	Nop,
	AConstNull,
	IConstM1, IConst0, IConst1, IConst2, IConst3, IConst4, IConst5,
	LConst0, LConst1,
	FConst0, FConst1, FConst2,
	DConst0, DConst1,
	BiPush(i8),
	SiPush(i16),
	Ldc(Loadable),
	ILoad(LvIndex), LLoad(LvIndex), FLoad(LvIndex), DLoad(LvIndex), ALoad(LvIndex),
	IALoad, LALoad, FALoad, DALoad, AALoad, BALoad, CALoad, SALoad,
	IStore(LvIndex), LStore(LvIndex), FStore(LvIndex), DStore(LvIndex), AStore(LvIndex),
	IAStore, LAStore, FAStore, DAStore, AAStore, BAStore, CAStore, SAStore,
	Pop, Pop2,
	Dup, DupX1, DupX2,
	Dup2, Dup2X1, Dup2X2,
	Swap,
	IAdd, LAdd, FAdd, DAdd,
	ISub, LSub, FSub, DSub,
	IMul, LMul, FMul, DMul,
	IDiv, LDiv, FDiv, DDiv,
	IRem, LRem, FRem, DRem,
	INeg, LNeg, FNeg, DNeg,
	IShl, LShl,
	IShr, LShr,
	IUShr, LUShr,
	IAnd, LAnd,
	IOr, LOr,
	IXor, LXor,
	IInc(LvIndex, i16),
	I2L, I2F, I2D,
	L2I, L2F, L2D,
	F2I, F2L, F2D,
	D2I, D2L, D2F,
	I2B, I2C, I2S,
	LCmp,
	FCmpL, FCmpG,
	DCmpL, DCmpG,
	IfEq(Label), IfNe(Label), IfLt(Label), IfGe(Label), IfGt(Label), IfLe(Label),
	IfICmpEq(Label), IfICmpNe(Label), IfICmpLt(Label), IfICmpGe(Label), IfICmpGt(Label), IfICmpLe(Label),
	IfACmpEq(Label), IfACmpNe(Label),
	Goto(Label),
	Jsr(Label),
	Ret(LvIndex),
	TableSwitch {
		default: Label,
		low: i32,
		high: i32,
		/// The targets for the keys `low..=high`, in order.
		table: Vec<Label>,
	},
	LookupSwitch {
		default: Label,
		/// The key and target pairs, in the order they were written.
		pairs: Vec<(i32, Label)>,
	},
	IReturn, LReturn, FReturn, DReturn, AReturn,
	Return,
	GetStatic(FieldRef),
	PutStatic(FieldRef),
	GetField(FieldRef),
	PutField(FieldRef),
	/// The bool is `true` iff it's on an interface.
	InvokeVirtual(MethodRef, bool),
	/// The bool is `true` iff it's on an interface.
	InvokeSpecial(MethodRef, bool),
	/// The bool is `true` iff it's on an interface.
	InvokeStatic(MethodRef, bool),
	/// `invokeinterface` is always on an interface.
	InvokeInterface(MethodRef),
	InvokeDynamic(InvokeDynamic),
	New(ClassName),
	NewArray(ArrayType),
	ANewArray(ClassName),
	ArrayLength,
	AThrow,
	CheckCast(ClassName),
	InstanceOf(ClassName),
	MonitorEnter, MonitorExit,
	MultiANewArray(ClassName, u8),
	IfNull(Label), IfNonNull(Label),
}

/// A value that can be loaded with `ldc`, or be given as a bootstrap method argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable {
	Integer(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	Class(ClassName),
	String(JavaString),
	MethodHandle(Handle),
	MethodType(MethodDescriptor),
	Dynamic(ConstantDynamic),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Handle {
	GetField(FieldRef),
	GetStatic(FieldRef),
	PutField(FieldRef),
	PutStatic(FieldRef),
	/// The bool is `true` iff the owner is an interface.
	InvokeVirtual(MethodRef, bool),
	/// The bool is `true` iff the owner is an interface.
	InvokeStatic(MethodRef, bool),
	/// The bool is `true` iff the owner is an interface.
	InvokeSpecial(MethodRef, bool),
	NewInvokeSpecial(MethodRef),
	InvokeInterface(MethodRef),
}

impl Handle {
	/// The `reference_kind` of the handle, as used in the `CONSTANT_MethodHandle_info` structure.
	pub fn kind(&self) -> u8 {
		match self {
			Handle::GetField(_) => 1,
			Handle::GetStatic(_) => 2,
			Handle::PutField(_) => 3,
			Handle::PutStatic(_) => 4,
			Handle::InvokeVirtual(..) => 5,
			Handle::InvokeStatic(..) => 6,
			Handle::InvokeSpecial(..) => 7,
			Handle::NewInvokeSpecial(_) => 8,
			Handle::InvokeInterface(_) => 9,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDynamic {
	pub name: FieldName,
	pub descriptor: FieldDescriptor,
	pub handle: Handle,
	pub arguments: Vec<Loadable>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeDynamic {
	pub name: MethodName,
	pub descriptor: MethodDescriptor,
	pub handle: Handle,
	pub arguments: Vec<Loadable>,
}

/// The element type of a `newarray` instruction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ArrayType {
	Boolean,
	Char,
	Float,
	Double,
	Byte,
	Short,
	Int,
	Long,
}

impl ArrayType {
	/// Parses the operand of `newarray`, as written by `Textifier`, like `T_INT`.
	pub(crate) fn from_name(name: &str) -> Option<ArrayType> {
		match name {
			"T_BOOLEAN" => Some(ArrayType::Boolean),
			"T_CHAR" => Some(ArrayType::Char),
			"T_FLOAT" => Some(ArrayType::Float),
			"T_DOUBLE" => Some(ArrayType::Double),
			"T_BYTE" => Some(ArrayType::Byte),
			"T_SHORT" => Some(ArrayType::Short),
			"T_INT" => Some(ArrayType::Int),
			"T_LONG" => Some(ArrayType::Long),
			_ => None,
		}
	}

	/// The `atype` operand of the `newarray` instruction.
	pub fn to_atype(self) -> u8 {
		match self {
			ArrayType::Boolean => 4,
			ArrayType::Char    => 5,
			ArrayType::Float   => 6,
			ArrayType::Double  => 7,
			ArrayType::Byte    => 8,
			ArrayType::Short   => 9,
			ArrayType::Int     => 10,
			ArrayType::Long    => 11,
		}
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::tree::method::code::{ArrayType, Code, CodeElement, Instruction, Label};

	#[test]
	fn array_types() {
		assert_eq!(ArrayType::from_name("T_INT"), Some(ArrayType::Int));
		assert_eq!(ArrayType::from_name("T_INT").map(ArrayType::to_atype), Some(10));
		assert_eq!(ArrayType::from_name("int"), None);
	}

	#[test]
	fn last_instruction() {
		let mut code = Code::default();
		assert_eq!(code.last_instruction(), None);
		code.elements.push(CodeElement::Instruction(Instruction::Nop));
		code.elements.push(CodeElement::Label(Label { id: 0 }));
		assert_eq!(code.last_instruction(), Some(0));
	}
}
