use anyhow::Result;
use java_string::JavaString;
use pretty_assertions::assert_eq;
use javasm::tree::access::AccessFlags;
use javasm::tree::annotation::{Annotation, ElementValue, Object};
use javasm::tree::class::ClassName;
use javasm::tree::method::code::{CodeElement, ConstantDynamic, Exception, Handle, Instruction, InvokeDynamic, Label, Loadable, LvIndex};
use javasm::tree::method::{Method, MethodParameter, MethodRef, ParameterAnnotation};
use javasm::tree::type_annotation::TargetInfoCode;
use javasm::visitor::method::code::{StackMapData, VerificationTypeInfo};

fn instructions(method: &Method) -> Vec<Instruction> {
	method.code.iter()
		.flat_map(|code| code.elements.iter())
		.filter_map(|element| match element {
			CodeElement::Instruction(instruction) => Some(instruction.clone()),
			_ => None,
		})
		.collect()
}

#[test]
fn standalone() -> Result<()> {
	let text = "\
// access flags 0x9
// signature <T:Ljava/lang/Object;>(TT;)V
public static accept(Ljava/lang/Object;)V throws java/io/IOException
  // parameter final value
  // annotable parameter count: 1 (invisible)
  @LNotNull;() // invisible, parameter 0
 L0
  ALOAD 0
  IFNULL L1
  ICONST_M1
  ISTORE_1
 L1
 FRAME SAME
  RETURN
  MAXSTACK = 1
  MAXLOCALS = 2
";
	let method = javasm::read_method(text)?;
	assert_eq!(method.access, AccessFlags::PUBLIC | AccessFlags::STATIC);
	assert_eq!(method.name, "accept");
	assert_eq!(method.signature, Some("<T:Ljava/lang/Object;>(TT;)V".try_into()?));
	assert_eq!(method.exceptions, vec![ClassName::try_from("java/io/IOException")?]);
	assert_eq!(method.method_parameters, vec![MethodParameter { name: Some("value".to_owned()), flags: AccessFlags::FINAL }]);
	assert_eq!(method.invisible_annotable_parameter_count, Some(1));
	assert_eq!(method.runtime_invisible_parameter_annotations, vec![ParameterAnnotation {
		parameter: 0,
		annotation: Annotation::new("LNotNull;".try_into()?),
	}]);

	let code = method.code.as_ref().expect("has code");
	let (l0, l1) = (Label { id: 0 }, Label { id: 1 });
	assert_eq!(code.elements, vec![
		CodeElement::Label(l0),
		CodeElement::Instruction(Instruction::ALoad(LvIndex { index: 0 })),
		CodeElement::Instruction(Instruction::IfNull(l1)),
		CodeElement::Instruction(Instruction::IConstM1),
		CodeElement::Instruction(Instruction::IStore(LvIndex { index: 1 })),
		CodeElement::Label(l1),
		CodeElement::Frame(StackMapData::Same),
		CodeElement::Instruction(Instruction::Return),
	]);
	Ok(())
}

#[test]
fn annotation_default_needs_interface() -> Result<()> {
	let text = "public abstract value()[I\n  default={1, 2}\n";
	assert!(javasm::read_method(text).is_err());

	let method = javasm::read_method_into(text, true, |access, name, descriptor, signature, exceptions| {
		Ok(Method::new(access, name, descriptor, signature, exceptions))
	})?;
	assert_eq!(method.annotation_default, Some(ElementValue::ArrayType(vec![
		ElementValue::Object(Object::Integer(1)),
		ElementValue::Object(Object::Integer(2)),
	])));
	Ok(())
}

#[test]
fn label_identity() -> Result<()> {
	let text = "\
static loop()V
 L3
  GOTO L7
 L7
  GOTO L3
  MAXSTACK = 0
  MAXLOCALS = 0
";
	let method = javasm::read_method(text)?;
	let code = method.code.as_ref().expect("has code");
	let (l3, l7) = (Label { id: 0 }, Label { id: 1 });
	assert_eq!(code.elements, vec![
		CodeElement::Label(l3),
		CodeElement::Instruction(Instruction::Goto(l7)),
		CodeElement::Label(l7),
		CodeElement::Instruction(Instruction::Goto(l3)),
	]);
	Ok(())
}

#[test]
fn switches() -> Result<()> {
	let text = "\
static pick(I)V
  ILOAD 0
  TABLESWITCH
    0: L0
    1: L1
    default: L2
  ILOAD 0
  LOOKUPSWITCH
    10: L0
    -3: L2
    default: L1
 L0
 L1
 L2
  RETURN
  MAXSTACK = 1
  MAXLOCALS = 1
";
	let method = javasm::read_method(text)?;
	let (l0, l1, l2) = (Label { id: 0 }, Label { id: 1 }, Label { id: 2 });
	assert_eq!(instructions(&method), vec![
		Instruction::ILoad(LvIndex { index: 0 }),
		Instruction::TableSwitch { default: l2, low: 0, high: 1, table: vec![l0, l1] },
		Instruction::ILoad(LvIndex { index: 0 }),
		Instruction::LookupSwitch { default: l1, pairs: vec![(10, l0), (-3, l2)] },
		Instruction::Return,
	]);
	Ok(())
}

#[test]
fn invoke_dynamic_and_condy() -> Result<()> {
	let text = "\
static lambda()V
  INVOKEDYNAMIC run()Ljava/lang/Runnable; [
    // handle kind 0x6 : INVOKESTATIC
    java/lang/invoke/LambdaMetafactory.metafactory(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodHandle;Ljava/lang/invoke/MethodType;)Ljava/lang/invoke/CallSite;
    // arguments:
    ()V,
    // handle kind 0x6 : INVOKESTATIC
    Foo.lambda$0()V,
    ()V
  ]
  LDC I : \"answer\" [
    // handle kind 0x6 : INVOKESTATIC
    Foo.answer(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/Class;)I
    // arguments: none
  ]
  LDC Ljava/lang/String;.class
  LDC 1.5F
  RETURN
  MAXSTACK = 3
  MAXLOCALS = 0
";
	let method = javasm::read_method(text)?;
	let metafactory = MethodRef {
		class: "java/lang/invoke/LambdaMetafactory".try_into()?,
		name: "metafactory".try_into()?,
		desc: "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodHandle;Ljava/lang/invoke/MethodType;)Ljava/lang/invoke/CallSite;".try_into()?,
	};
	let lambda = MethodRef { class: "Foo".try_into()?, name: "lambda$0".try_into()?, desc: "()V".try_into()? };
	let answer = MethodRef {
		class: "Foo".try_into()?,
		name: "answer".try_into()?,
		desc: "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/Class;)I".try_into()?,
	};
	assert_eq!(instructions(&method), vec![
		Instruction::InvokeDynamic(InvokeDynamic {
			name: "run".try_into()?,
			descriptor: "()Ljava/lang/Runnable;".try_into()?,
			handle: Handle::InvokeStatic(metafactory, false),
			arguments: vec![
				Loadable::MethodType("()V".try_into()?),
				Loadable::MethodHandle(Handle::InvokeStatic(lambda, false)),
				Loadable::MethodType("()V".try_into()?),
			],
		}),
		Instruction::Ldc(Loadable::Dynamic(ConstantDynamic {
			name: "answer".try_into()?,
			descriptor: "I".try_into()?,
			handle: Handle::InvokeStatic(answer, false),
			arguments: Vec::new(),
		})),
		Instruction::Ldc(Loadable::Class(ClassName::JAVA_LANG_STRING)),
		Instruction::Ldc(Loadable::Float(1.5)),
		Instruction::Return,
	]);
	Ok(())
}

#[test]
fn frames_and_exceptions() -> Result<()> {
	let text = "\
static guarded()V
  TRYCATCHBLOCK L0 L1 L2 java/lang/Exception
  TRYCATCHBLOCK L0 L1 L3 null
 L0
  NEW java/lang/Object
  DUP
 L1
 L2
 FRAME FULL [I java/lang/String] [java/lang/Exception]
  POP
 L3
 FRAME SAME1 java/lang/Throwable
  POP
 FRAME APPEND [J L0]
 FRAME CHOP 2
  RETURN
  MAXSTACK = 2
  MAXLOCALS = 3
";
	let method = javasm::read_method(text)?;
	let code = method.code.as_ref().expect("has code");
	let (l0, l1, l2, l3) = (Label { id: 0 }, Label { id: 1 }, Label { id: 2 }, Label { id: 3 });
	assert_eq!(code.exception_table, vec![
		Exception { start: l0, end: l1, handler: l2, catch: Some("java/lang/Exception".try_into()?) },
		Exception { start: l0, end: l1, handler: l3, catch: None },
	]);

	let frames: Vec<_> = code.elements.iter()
		.filter_map(|element| match element {
			CodeElement::Frame(frame) => Some(frame.clone()),
			_ => None,
		})
		.collect();
	assert_eq!(frames, vec![
		StackMapData::Full {
			locals: vec![VerificationTypeInfo::Integer, VerificationTypeInfo::Object(ClassName::JAVA_LANG_STRING)],
			stack: vec![VerificationTypeInfo::Object("java/lang/Exception".try_into()?)],
		},
		StackMapData::SameLocals1StackItem { stack: VerificationTypeInfo::Object("java/lang/Throwable".try_into()?) },
		StackMapData::Append { locals: vec![VerificationTypeInfo::Long, VerificationTypeInfo::Uninitialized(l0)] },
		StackMapData::Chop { k: 2 },
	]);
	Ok(())
}

#[test]
fn instruction_type_annotation() -> Result<()> {
	let text = "\
static check(Ljava/lang/Object;)Z
  ALOAD 0
  INSTANCEOF java/lang/String
  @LTag;() : INSTANCEOF, null // invisible
  IRETURN
 L0
  LOCALVARIABLE @LTag;() : LOCAL_VARIABLE, null [ L0 - L0 - 0 ]
  MAXSTACK = 1
  MAXLOCALS = 1
";
	let method = javasm::read_method(text)?;
	let code = method.code.as_ref().expect("has code");
	assert_eq!(code.runtime_invisible_type_annotations.len(), 1);
	let annotation = &code.runtime_invisible_type_annotations[0];
	assert_eq!(annotation.instruction, Some(1));
	assert_eq!(annotation.type_annotation.type_reference, TargetInfoCode::InstanceOf);
	assert_eq!(annotation.type_annotation.annotation, Annotation::new("LTag;".try_into()?));

	assert_eq!(code.runtime_visible_type_annotations.len(), 1);
	assert_eq!(code.runtime_visible_type_annotations[0].instruction, None);
	Ok(())
}

#[test]
fn literals() -> Result<()> {
	let text = "\
static constants()V
  LDC 10
  LDC 10L
  LDC 1.0
  LDC 1.0F
  LDC \"tab\\there\"
  BIPUSH -5
  SIPUSH 1000
  IINC 2 -1
  RETURN
  MAXSTACK = 2
  MAXLOCALS = 3
";
	let method = javasm::read_method(text)?;
	assert_eq!(instructions(&method), vec![
		Instruction::Ldc(Loadable::Integer(10)),
		Instruction::Ldc(Loadable::Long(10)),
		Instruction::Ldc(Loadable::Double(1.0)),
		Instruction::Ldc(Loadable::Float(1.0)),
		Instruction::Ldc(Loadable::String(JavaString::from("tab\there"))),
		Instruction::BiPush(-5),
		Instruction::SiPush(1000),
		Instruction::IInc(LvIndex { index: 2 }, -1),
		Instruction::Return,
	]);
	Ok(())
}
