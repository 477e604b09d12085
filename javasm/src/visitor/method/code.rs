use anyhow::Result;
use crate::tree::class::ClassName;
use crate::tree::method::code::{Exception, Instruction, Label, Lv};
use crate::visitor::annotation::AnnotatableVisitor;

/// A visitor for the code of a method.
///
/// Labels, frames, line numbers and instructions are visited in the order they appear in the code. The
/// annotations given through [`AnnotatableVisitor`] are the type annotations inside the code, an annotation on an
/// instruction is on the last visited instruction.
pub trait CodeVisitor: AnnotatableVisitor {
	fn visit_label(&mut self, label: Label) -> Result<()>;
	fn visit_frame(&mut self, frame: StackMapData) -> Result<()>;
	fn visit_line_number(&mut self, line: u16, start: Label) -> Result<()>;
	fn visit_instruction(&mut self, instruction: Instruction) -> Result<()>;

	fn visit_try_catch_block(&mut self, exception: Exception) -> Result<()>;
	fn visit_local_variable(&mut self, local_variable: Lv) -> Result<()>;

	/// Called last, with the values of `MAXSTACK` and `MAXLOCALS`.
	fn visit_max_stack_and_max_locals(&mut self, max_stack: u16, max_locals: u16) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationTypeInfo {
	Top,
	Integer,
	Float,
	Long,
	Double,
	Null,
	UninitializedThis,
	Object(ClassName),
	/// The type of an object created by the `new` instruction at the given label, before its constructor was called.
	Uninitialized(Label),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StackMapData {
	Same,
	SameLocals1StackItem {
		stack: VerificationTypeInfo,
	},
	Chop {
		k: u8,
	},
	Append {
		locals: Vec<VerificationTypeInfo>
	},
	Full {
		locals: Vec<VerificationTypeInfo>,
		stack: Vec<VerificationTypeInfo>,
	},
	/// An uncompressed frame, as used when frames are expanded.
	New {
		locals: Vec<VerificationTypeInfo>,
		stack: Vec<VerificationTypeInfo>,
	},
}
