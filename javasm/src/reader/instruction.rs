//! Reading instructions, by their mnemonic as printed by `Textifier`.

use std::collections::HashSet;
use std::str::FromStr;
use anyhow::{anyhow, Result};
use crate::reader::annotation::read_label;
use crate::reader::dynamic::{read_bootstrap, read_loadable};
use crate::reader::labels::Labels;
use crate::reader::token::TokenReader;
use crate::reader::typed;
use crate::tree::class::ClassName;
use crate::tree::field::FieldRef;
use crate::tree::method::code::{ArrayType, Instruction, InvokeDynamic, Label, LvIndex};
use crate::tree::method::MethodRef;

pub(crate) fn read_number<T: FromStr>(reader: &mut TokenReader, what: &str) -> Result<T>
where
	T::Err: std::error::Error + Send + Sync + 'static,
{
	let token = reader.pop_plain()?;
	token.parse().map_err(|e: T::Err| reader.error_with(format!("Expected {what}, got {token}"), anyhow!(e)))
}

fn read_lv_index(reader: &mut TokenReader) -> Result<LvIndex> {
	Ok(LvIndex { index: read_number(reader, "local variable index")? })
}

fn read_class_name(reader: &mut TokenReader) -> Result<ClassName> {
	let token = reader.pop_plain()?;
	typed(reader, token, "class name")
}

/// Reads `owner.name`, or `owner name`.
fn read_owner_and_name<'a>(reader: &mut TokenReader<'a>) -> Result<(&'a str, &'a str)> {
	let token = reader.pop_plain()?;
	match token.split_once('.') {
		Some(split) => Ok(split),
		None => Ok((token, reader.pop_plain()?)),
	}
}

/// Reads `java/lang/System.out : Ljava/io/PrintStream;`.
fn read_field_ref(reader: &mut TokenReader) -> Result<FieldRef> {
	let (class, name) = read_owner_and_name(reader)?;
	let class = typed(reader, class, "class name")?;
	let name = typed(reader, name, "field name")?;
	reader.pop_plain_exact(":")?;
	let desc = reader.pop_plain()?;
	let desc = typed(reader, desc, "field descriptor")?;
	Ok(FieldRef { class, name, desc })
}

/// Reads `java/io/PrintStream.println (Ljava/lang/String;)V`, followed by an optional `(itf)`.
fn read_method_ref(reader: &mut TokenReader) -> Result<(MethodRef, bool)> {
	let (class, name) = read_owner_and_name(reader)?;
	let class = typed(reader, class, "class name")?;
	// the descriptor may also directly follow the name
	let (name, desc) = match name.find('(') {
		Some(paren) => name.split_at(paren),
		None => (name, reader.pop_plain()?),
	};
	let name = typed(reader, name, "method name")?;
	let desc = typed(reader, desc, "method descriptor")?;
	let interface = reader.pop_non_comment_if(|token| token.is_plain("(itf)"))?.is_some();
	Ok((MethodRef { class, name, desc }, interface))
}

/// Reads `run()Ljava/lang/Runnable; [ ... ]`.
fn read_invoke_dynamic(reader: &mut TokenReader) -> Result<InvokeDynamic> {
	let token = reader.pop_plain()?;
	let Some(paren) = token.find('(') else {
		return Err(reader.error(format!("Expected name and descriptor, got {token}")));
	};
	let (name, descriptor) = token.split_at(paren);
	let name = typed(reader, name, "method name")?;
	let descriptor = typed(reader, descriptor, "method descriptor")?;
	let (handle, arguments) = read_bootstrap(reader)?;
	Ok(InvokeDynamic { name, descriptor, handle, arguments })
}

/// Reads one entry of a switch, like `5: L3`, `5 : L3` or `default: L3`. The key is [`None`] for the default.
fn read_switch_entry(reader: &mut TokenReader, labels: &mut Labels) -> Result<(Option<i32>, Label)> {
	let token = reader.pop_plain()?;
	let (key, label) = match token.split_once(':') {
		Some((key, label)) => (key, label),
		None => {
			let next = reader.pop_plain()?;
			(token, next.strip_prefix(':').unwrap_or(next))
		},
	};
	let label = if label.is_empty() { reader.pop_plain()? } else { label };

	let key = match key {
		"default" => None,
		key => Some(key.parse().map_err(|e: std::num::ParseIntError| reader.error_with(format!("Expected switch key, got {key}"), anyhow!(e)))?),
	};
	let label = labels.lookup(label)?.ok_or_else(|| reader.error(format!("Expected label, got {label}")))?;
	Ok((key, label))
}

fn read_table_switch(reader: &mut TokenReader, labels: &mut Labels) -> Result<Instruction> {
	let mut table = Vec::new();
	let mut low = None;
	let mut high: Option<i32> = None;
	loop {
		match read_switch_entry(reader, labels)? {
			(Some(key), label) => {
				if let Some(high) = high {
					if high.checked_add(1) != Some(key) {
						return Err(reader.error("Expected consecutive keys"));
					}
				}
				low.get_or_insert(key);
				high = Some(key);
				table.push(label);
			},
			(None, default) => {
				let (Some(low), Some(high)) = (low, high) else {
					return Err(reader.error("Expected at least one key before default"));
				};
				return Ok(Instruction::TableSwitch { default, low, high, table });
			},
		}
	}
}

fn read_lookup_switch(reader: &mut TokenReader, labels: &mut Labels) -> Result<Instruction> {
	let mut pairs = Vec::new();
	let mut keys = HashSet::new();
	loop {
		match read_switch_entry(reader, labels)? {
			(Some(key), label) => {
				if !keys.insert(key) {
					return Err(reader.error(format!("Duplicate key {key}")));
				}
				pairs.push((key, label));
			},
			(None, default) => return Ok(Instruction::LookupSwitch { default, pairs }),
		}
	}
}

/// Reads the operands of the instruction with the given (uppercase) mnemonic.
pub(crate) fn read_instruction(reader: &mut TokenReader, labels: &mut Labels, mnemonic: &str) -> Result<Instruction> {
	use Instruction::*;

	// the short forms, like `ILOAD_0`
	if let Some((base, index)) = mnemonic.split_once('_') {
		let index = match index {
			"0" => Some(0),
			"1" => Some(1),
			"2" => Some(2),
			"3" => Some(3),
			_ => None,
		};
		if let Some(index) = index {
			let index = LvIndex { index };
			let instruction = match base {
				"ILOAD" => Some(ILoad(index)),
				"LLOAD" => Some(LLoad(index)),
				"FLOAD" => Some(FLoad(index)),
				"DLOAD" => Some(DLoad(index)),
				"ALOAD" => Some(ALoad(index)),
				"ISTORE" => Some(IStore(index)),
				"LSTORE" => Some(LStore(index)),
				"FSTORE" => Some(FStore(index)),
				"DSTORE" => Some(DStore(index)),
				"ASTORE" => Some(AStore(index)),
				_ => None,
			};
			if let Some(instruction) = instruction {
				return Ok(instruction);
			}
		}
	}

	Ok(match mnemonic {
		"NOP" => Nop,
		"ACONST_NULL" => AConstNull,
		"ICONST_M1" => IConstM1,
		"ICONST_0" => IConst0,
		"ICONST_1" => IConst1,
		"ICONST_2" => IConst2,
		"ICONST_3" => IConst3,
		"ICONST_4" => IConst4,
		"ICONST_5" => IConst5,
		"LCONST_0" => LConst0,
		"LCONST_1" => LConst1,
		"FCONST_0" => FConst0,
		"FCONST_1" => FConst1,
		"FCONST_2" => FConst2,
		"DCONST_0" => DConst0,
		"DCONST_1" => DConst1,
		"BIPUSH" => BiPush(read_number(reader, "byte")?),
		"SIPUSH" => SiPush(read_number(reader, "short")?),
		"LDC" | "LDC_W" | "LDC2_W" => Ldc(read_loadable(reader)?),
		"ILOAD" => ILoad(read_lv_index(reader)?),
		"LLOAD" => LLoad(read_lv_index(reader)?),
		"FLOAD" => FLoad(read_lv_index(reader)?),
		"DLOAD" => DLoad(read_lv_index(reader)?),
		"ALOAD" => ALoad(read_lv_index(reader)?),
		"IALOAD" => IALoad,
		"LALOAD" => LALoad,
		"FALOAD" => FALoad,
		"DALOAD" => DALoad,
		"AALOAD" => AALoad,
		"BALOAD" => BALoad,
		"CALOAD" => CALoad,
		"SALOAD" => SALoad,
		"ISTORE" => IStore(read_lv_index(reader)?),
		"LSTORE" => LStore(read_lv_index(reader)?),
		"FSTORE" => FStore(read_lv_index(reader)?),
		"DSTORE" => DStore(read_lv_index(reader)?),
		"ASTORE" => AStore(read_lv_index(reader)?),
		"IASTORE" => IAStore,
		"LASTORE" => LAStore,
		"FASTORE" => FAStore,
		"DASTORE" => DAStore,
		"AASTORE" => AAStore,
		"BASTORE" => BAStore,
		"CASTORE" => CAStore,
		"SASTORE" => SAStore,
		"POP" => Pop,
		"POP2" => Pop2,
		"DUP" => Dup,
		"DUP_X1" => DupX1,
		"DUP_X2" => DupX2,
		"DUP2" => Dup2,
		"DUP2_X1" => Dup2X1,
		"DUP2_X2" => Dup2X2,
		"SWAP" => Swap,
		"IADD" => IAdd,
		"LADD" => LAdd,
		"FADD" => FAdd,
		"DADD" => DAdd,
		"ISUB" => ISub,
		"LSUB" => LSub,
		"FSUB" => FSub,
		"DSUB" => DSub,
		"IMUL" => IMul,
		"LMUL" => LMul,
		"FMUL" => FMul,
		"DMUL" => DMul,
		"IDIV" => IDiv,
		"LDIV" => LDiv,
		"FDIV" => FDiv,
		"DDIV" => DDiv,
		"IREM" => IRem,
		"LREM" => LRem,
		"FREM" => FRem,
		"DREM" => DRem,
		"INEG" => INeg,
		"LNEG" => LNeg,
		"FNEG" => FNeg,
		"DNEG" => DNeg,
		"ISHL" => IShl,
		"LSHL" => LShl,
		"ISHR" => IShr,
		"LSHR" => LShr,
		"IUSHR" => IUShr,
		"LUSHR" => LUShr,
		"IAND" => IAnd,
		"LAND" => LAnd,
		"IOR" => IOr,
		"LOR" => LOr,
		"IXOR" => IXor,
		"LXOR" => LXor,
		"IINC" => {
			let index = read_lv_index(reader)?;
			IInc(index, read_number(reader, "increment")?)
		},
		"I2L" => I2L,
		"I2F" => I2F,
		"I2D" => I2D,
		"L2I" => L2I,
		"L2F" => L2F,
		"L2D" => L2D,
		"F2I" => F2I,
		"F2L" => F2L,
		"F2D" => F2D,
		"D2I" => D2I,
		"D2L" => D2L,
		"D2F" => D2F,
		"I2B" => I2B,
		"I2C" => I2C,
		"I2S" => I2S,
		"LCMP" => LCmp,
		"FCMPL" => FCmpL,
		"FCMPG" => FCmpG,
		"DCMPL" => DCmpL,
		"DCMPG" => DCmpG,
		"IFEQ" => IfEq(read_label(reader, labels)?),
		"IFNE" => IfNe(read_label(reader, labels)?),
		"IFLT" => IfLt(read_label(reader, labels)?),
		"IFGE" => IfGe(read_label(reader, labels)?),
		"IFGT" => IfGt(read_label(reader, labels)?),
		"IFLE" => IfLe(read_label(reader, labels)?),
		"IF_ICMPEQ" => IfICmpEq(read_label(reader, labels)?),
		"IF_ICMPNE" => IfICmpNe(read_label(reader, labels)?),
		"IF_ICMPLT" => IfICmpLt(read_label(reader, labels)?),
		"IF_ICMPGE" => IfICmpGe(read_label(reader, labels)?),
		"IF_ICMPGT" => IfICmpGt(read_label(reader, labels)?),
		"IF_ICMPLE" => IfICmpLe(read_label(reader, labels)?),
		"IF_ACMPEQ" => IfACmpEq(read_label(reader, labels)?),
		"IF_ACMPNE" => IfACmpNe(read_label(reader, labels)?),
		"GOTO" | "GOTO_W" => Goto(read_label(reader, labels)?),
		"JSR" | "JSR_W" => Jsr(read_label(reader, labels)?),
		"RET" => Ret(read_lv_index(reader)?),
		"TABLESWITCH" => read_table_switch(reader, labels)?,
		"LOOKUPSWITCH" => read_lookup_switch(reader, labels)?,
		"IRETURN" => IReturn,
		"LRETURN" => LReturn,
		"FRETURN" => FReturn,
		"DRETURN" => DReturn,
		"ARETURN" => AReturn,
		"RETURN" => Return,
		"GETSTATIC" => GetStatic(read_field_ref(reader)?),
		"PUTSTATIC" => PutStatic(read_field_ref(reader)?),
		"GETFIELD" => GetField(read_field_ref(reader)?),
		"PUTFIELD" => PutField(read_field_ref(reader)?),
		"INVOKEVIRTUAL" => {
			let (method, interface) = read_method_ref(reader)?;
			InvokeVirtual(method, interface)
		},
		"INVOKESPECIAL" => {
			let (method, interface) = read_method_ref(reader)?;
			InvokeSpecial(method, interface)
		},
		"INVOKESTATIC" => {
			let (method, interface) = read_method_ref(reader)?;
			InvokeStatic(method, interface)
		},
		"INVOKEINTERFACE" => InvokeInterface(read_method_ref(reader)?.0),
		"INVOKEDYNAMIC" => Instruction::InvokeDynamic(read_invoke_dynamic(reader)?),
		"NEW" => New(read_class_name(reader)?),
		"NEWARRAY" => {
			let token = reader.pop_plain()?;
			let array_type = ArrayType::from_name(&token.to_ascii_uppercase())
				.ok_or_else(|| reader.error(format!("Expected valid type, got {token}")))?;
			NewArray(array_type)
		},
		"ANEWARRAY" => ANewArray(read_class_name(reader)?),
		"ARRAYLENGTH" => ArrayLength,
		"ATHROW" => AThrow,
		"CHECKCAST" => CheckCast(read_class_name(reader)?),
		"INSTANCEOF" => InstanceOf(read_class_name(reader)?),
		"MONITORENTER" => MonitorEnter,
		"MONITOREXIT" => MonitorExit,
		"MULTIANEWARRAY" => {
			let class = read_class_name(reader)?;
			MultiANewArray(class, read_number(reader, "dimensions")?)
		},
		"IFNULL" => IfNull(read_label(reader, labels)?),
		"IFNONNULL" => IfNonNull(read_label(reader, labels)?),
		_ => return Err(reader.error(format!("Expected a valid opcode, got {mnemonic}"))),
	})
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::reader::error::SyntaxError;
	use crate::reader::instruction::read_instruction;
	use crate::reader::labels::Labels;
	use crate::reader::token::TokenReader;
	use crate::tree::field::FieldRef;
	use crate::tree::method::code::{ArrayType, Instruction, Label, LvIndex};
	use crate::tree::method::MethodRef;

	fn read(text: &str) -> Result<Instruction> {
		let mut reader = TokenReader::new(text);
		let mnemonic = reader.pop_plain()?.to_ascii_uppercase();
		read_instruction(&mut reader, &mut Labels::default(), &mnemonic)
	}

	fn message(text: &str) -> String {
		read(text).unwrap_err().downcast_ref::<SyntaxError>().unwrap().message.clone()
	}

	#[test]
	fn operands() -> Result<()> {
		assert_eq!(read("NOP")?, Instruction::Nop);
		assert_eq!(read("BIPUSH -5")?, Instruction::BiPush(-5));
		assert_eq!(read("SIPUSH 1000")?, Instruction::SiPush(1000));
		assert_eq!(read("ALOAD 4")?, Instruction::ALoad(LvIndex { index: 4 }));
		assert_eq!(read("aload_1")?, Instruction::ALoad(LvIndex { index: 1 }));
		assert_eq!(read("IINC 2 -1")?, Instruction::IInc(LvIndex { index: 2 }, -1));
		assert_eq!(read("IFGE L5")?, Instruction::IfGe(Label { id: 0 }));
		assert_eq!(read("GOTO_W L0")?, Instruction::Goto(Label { id: 0 }));
		assert_eq!(read("NEWARRAY T_INT")?, Instruction::NewArray(ArrayType::Int));
		assert_eq!(read("MULTIANEWARRAY [[I 2")?, Instruction::MultiANewArray("[[I".try_into()?, 2));
		assert_eq!(read("CHECKCAST [Ljava/lang/String;")?, Instruction::CheckCast("[Ljava/lang/String;".try_into()?));
		Ok(())
	}

	#[test]
	fn members() -> Result<()> {
		let out = FieldRef {
			class: "java/lang/System".try_into()?,
			name: "out".try_into()?,
			desc: "Ljava/io/PrintStream;".try_into()?,
		};
		assert_eq!(read("GETSTATIC java/lang/System.out : Ljava/io/PrintStream;")?, Instruction::GetStatic(out.clone()));
		assert_eq!(read("GETSTATIC java/lang/System out : Ljava/io/PrintStream;")?, Instruction::GetStatic(out));

		let run = MethodRef { class: "Foo".try_into()?, name: "run".try_into()?, desc: "()V".try_into()? };
		assert_eq!(read("INVOKESTATIC Foo.run ()V (itf)")?, Instruction::InvokeStatic(run.clone(), true));
		assert_eq!(read("INVOKEVIRTUAL Foo.run()V")?, Instruction::InvokeVirtual(run.clone(), false));
		assert_eq!(read("INVOKEINTERFACE Foo.run ()V (itf)")?, Instruction::InvokeInterface(run));
		Ok(())
	}

	#[test]
	fn table_switch() -> Result<()> {
		let text = "TABLESWITCH\n  1: L1\n  2 : L2\n  3:\n L1\n  default: L3";
		assert_eq!(read(text)?, Instruction::TableSwitch {
			default: Label { id: 2 },
			low: 1,
			high: 3,
			table: vec![Label { id: 0 }, Label { id: 1 }, Label { id: 0 }],
		});
		Ok(())
	}

	#[test]
	fn table_switch_consecutive() {
		assert_eq!(message("TABLESWITCH\n 1: L1\n 3: L2\n default: L3"), "Expected consecutive keys");
		assert_eq!(message("TABLESWITCH\n 2: L1\n 1: L2\n default: L3"), "Expected consecutive keys");
		assert!(read("TABLESWITCH\n default: L3").is_err());
	}

	#[test]
	fn lookup_switch() -> Result<()> {
		let text = "LOOKUPSWITCH\n  100: L1\n  -7: L2\n  3: L1\n  default: L3";
		assert_eq!(read(text)?, Instruction::LookupSwitch {
			default: Label { id: 2 },
			pairs: vec![(100, Label { id: 0 }), (-7, Label { id: 1 }), (3, Label { id: 0 })],
		});
		assert!(read("LOOKUPSWITCH\n 1: L1\n 1: L2\n default: L3").is_err());
		Ok(())
	}

	#[test]
	fn errors() {
		assert_eq!(message("BIPUSH 300"), "Expected byte, got 300");
		assert_eq!(message("FOO"), "Expected a valid opcode, got FOO");
		assert_eq!(message("GOTO X"), "Expected label, got X");
		assert!(read("NEWARRAY T_VOID").is_err());
		assert!(read("GETSTATIC Foo.bar Ljava/lang/Object;").is_err());
	}
}
