use anyhow::Result;
use java_string::JavaString;
use pretty_assertions::assert_eq;
use javasm::tree::access::AccessFlags;
use javasm::tree::annotation::{Annotation, ElementValue, ElementValuePair, Object};
use javasm::tree::class::{ClassFile, ClassName, InnerClass};
use javasm::tree::field::{ConstantValue, Field, FieldRef};
use javasm::tree::method::code::{Code, CodeElement, Instruction, Label, LabelRange, Loadable, Lv, LvIndex};
use javasm::tree::method::{Method, MethodRef};
use javasm::tree::record::RecordComponent;
use javasm::tree::version::Version;

#[test]
fn braced_method() -> Result<()> {
	let text = "class Foo {\n  public static void main()V {\n    L0\n    RETURN\n    MAXSTACK = 0\n    MAXLOCALS = 1\n  }\n}";
	let class = javasm::read_class(text)?;

	let mut expected = ClassFile::new(Version::UNKNOWN, AccessFlags::SUPER, "Foo".try_into()?, None, Some(ClassName::JAVA_LANG_OBJECT), Vec::new());
	let mut method = Method::new(AccessFlags::PUBLIC | AccessFlags::STATIC, "main".try_into()?, "()V".try_into()?, None, Vec::new());
	let mut code = Code::default();
	code.max_stack = Some(0);
	code.max_locals = Some(1);
	code.elements = vec![
		CodeElement::Label(Label { id: 0 }),
		CodeElement::Instruction(Instruction::Return),
	];
	method.code = Some(code);
	expected.methods.push(method);

	assert_eq!(class, expected);
	Ok(())
}

const FOO: &str = r#"// class version 52.0 (52)
// access flags 0x21
public class com/example/Foo implements java/lang/Runnable {

  // compiled from: Foo.java
  NESTMEMBER com/example/Foo$Bar
  // access flags 0x9
  public static INNERCLASS com/example/Foo$Bar com/example/Foo Bar
  // access flags 0x0
  INNERCLASS com/example/Foo$1 null null

  // access flags 0x1A
  private final static J BIG = 10000000000

  // access flags 0x2
  // signature Ljava/util/List<Ljava/lang/String;>;
  // declaration: names extends java.util.List<java.lang.String>
  private Ljava/util/List; names
  @Ljava/lang/Deprecated;() // invisible

  // access flags 0x1
  public <init>()V
   L0
    LINENUMBER 3 L0
    ALOAD 0
    INVOKESPECIAL java/lang/Object.<init> ()V
    RETURN
   L1
    LOCALVARIABLE this Lcom/example/Foo; L0 L1 0
    MAXSTACK = 1
    MAXLOCALS = 1

  // access flags 0x1
  public run()V
    GETSTATIC java/lang/System.out : Ljava/io/PrintStream;
    LDC "hi"
    INVOKEVIRTUAL java/io/PrintStream.println (Ljava/lang/String;)V
    RETURN
    MAXSTACK = 2
    MAXLOCALS = 1
}
"#;

#[test]
fn textifier_listing() -> Result<()> {
	let class = javasm::read_class(FOO)?;

	assert_eq!(class.version, Version::new(52, 0));
	assert_eq!(class.access, AccessFlags::PUBLIC | AccessFlags::SUPER);
	assert_eq!(class.name, "com/example/Foo");
	assert_eq!(class.super_class, Some(ClassName::JAVA_LANG_OBJECT));
	assert_eq!(class.interfaces, vec![ClassName::try_from("java/lang/Runnable")?]);
	assert_eq!(class.source_file, Some("Foo.java".to_owned()));
	assert_eq!(class.nest_members, vec![ClassName::try_from("com/example/Foo$Bar")?]);
	assert_eq!(class.inner_classes, vec![
		InnerClass {
			inner_class: "com/example/Foo$Bar".try_into()?,
			outer_class: Some("com/example/Foo".try_into()?),
			inner_name: Some("Bar".to_owned()),
			flags: AccessFlags::PUBLIC | AccessFlags::STATIC,
		},
		InnerClass {
			inner_class: "com/example/Foo$1".try_into()?,
			outer_class: None,
			inner_name: None,
			flags: AccessFlags::empty(),
		},
	]);

	let big = Field::new(
		AccessFlags::PRIVATE | AccessFlags::STATIC | AccessFlags::FINAL,
		"BIG".try_into()?,
		"J".try_into()?,
		None,
		Some(ConstantValue::Long(10_000_000_000)),
	);
	let mut names = Field::new(
		AccessFlags::PRIVATE,
		"names".try_into()?,
		"Ljava/util/List;".try_into()?,
		Some("Ljava/util/List<Ljava/lang/String;>;".try_into()?),
		None,
	);
	names.runtime_invisible_annotations.push(Annotation::new("Ljava/lang/Deprecated;".try_into()?));
	assert_eq!(class.fields, vec![big, names]);

	assert_eq!(class.methods.len(), 2);
	let init = &class.methods[0];
	assert_eq!(init.name, "<init>");
	let code = init.code.as_ref().expect("init has code");
	let (l0, l1) = (Label { id: 0 }, Label { id: 1 });
	assert_eq!(code.elements, vec![
		CodeElement::Label(l0),
		CodeElement::LineNumber { line: 3, start: l0 },
		CodeElement::Instruction(Instruction::ALoad(LvIndex { index: 0 })),
		CodeElement::Instruction(Instruction::InvokeSpecial(MethodRef {
			class: ClassName::JAVA_LANG_OBJECT,
			name: "<init>".try_into()?,
			desc: "()V".try_into()?,
		}, false)),
		CodeElement::Instruction(Instruction::Return),
		CodeElement::Label(l1),
	]);
	assert_eq!(code.local_variables, vec![Lv {
		range: LabelRange { start: l0, end: l1 },
		name: "this".try_into()?,
		descriptor: "Lcom/example/Foo;".try_into()?,
		signature: None,
		index: LvIndex { index: 0 },
	}]);

	let run = &class.methods[1];
	let code = run.code.as_ref().expect("run has code");
	assert_eq!(code.elements, vec![
		CodeElement::Instruction(Instruction::GetStatic(FieldRef {
			class: "java/lang/System".try_into()?,
			name: "out".try_into()?,
			desc: "Ljava/io/PrintStream;".try_into()?,
		})),
		CodeElement::Instruction(Instruction::Ldc(Loadable::String(JavaString::from("hi")))),
		CodeElement::Instruction(Instruction::InvokeVirtual(MethodRef {
			class: "java/io/PrintStream".try_into()?,
			name: "println".try_into()?,
			desc: "(Ljava/lang/String;)V".try_into()?,
		}, false)),
		CodeElement::Instruction(Instruction::Return),
	]);
	assert_eq!((code.max_stack, code.max_locals), (Some(2), Some(1)));
	Ok(())
}

#[test]
fn interface_and_enum() -> Result<()> {
	let class = javasm::read_class("public abstract interface Foo {\n  public abstract run()V\n}")?;
	assert_eq!(class.access, AccessFlags::PUBLIC | AccessFlags::ABSTRACT | AccessFlags::INTERFACE);
	assert_eq!(class.methods[0].code, None);

	let class = javasm::read_class("\
public final enum Color extends java/lang/Enum {
  public final static enum LColor; RED
}")?;
	assert_eq!(class.access, AccessFlags::PUBLIC | AccessFlags::FINAL | AccessFlags::ENUM | AccessFlags::SUPER);
	assert_eq!(class.super_class, Some(ClassName::try_from("java/lang/Enum")?));
	assert_eq!(class.fields[0].access, AccessFlags::PUBLIC | AccessFlags::FINAL | AccessFlags::STATIC | AccessFlags::ENUM);
	assert_eq!(class.fields[0].name, "RED");
	Ok(())
}

#[test]
fn annotation_interface_default() -> Result<()> {
	let text = "\
public abstract @interface Tag implements java/lang/annotation/Annotation {
  public abstract names()[Ljava/lang/String;
    default={\"a\", \"b\"}
  public abstract level()I
    default=3
}";
	let class = javasm::read_class(text)?;
	assert_eq!(class.access, AccessFlags::PUBLIC | AccessFlags::ABSTRACT | AccessFlags::ANNOTATION | AccessFlags::INTERFACE);
	assert_eq!(class.methods[0].annotation_default, Some(ElementValue::ArrayType(vec![
		ElementValue::Object(Object::String(JavaString::from("a"))),
		ElementValue::Object(Object::String(JavaString::from("b"))),
	])));
	assert_eq!(class.methods[1].annotation_default, Some(ElementValue::Object(Object::Integer(3))));
	Ok(())
}

#[test]
fn record() -> Result<()> {
	let text = "\
// class version 61.0 (61)
// access flags 0x10030
final class Point extends java/lang/Record {
  RECORDCOMPONENT I x
  @LNonNull;() // invisible
  // signature Ljava/util/List<TT;>;
  RECORDCOMPONENT Ljava/util/List; ys

  // access flags 0x12
  private final I x
}";
	let class = javasm::read_class(text)?;
	assert_eq!(class.version, Version::new(61, 0));
	assert_eq!(class.access, AccessFlags::FINAL | AccessFlags::SUPER | AccessFlags::RECORD);
	assert_eq!(class.super_class, Some(ClassName::JAVA_LANG_RECORD));

	let mut x = RecordComponent::new("x".try_into()?, "I".try_into()?, None);
	x.runtime_invisible_annotations.push(Annotation::new("LNonNull;".try_into()?));
	let ys = RecordComponent::new("ys".try_into()?, "Ljava/util/List;".try_into()?, Some("Ljava/util/List<TT;>;".try_into()?));
	assert_eq!(class.record_components, vec![x, ys]);
	assert_eq!(class.fields.len(), 1);
	assert_eq!(class.fields[0].signature, None);
	Ok(())
}

#[test]
fn record_component_signature() -> Result<()> {
	let text = "final class P extends java/lang/Record {\n  RECORDCOMPONENT\n  // signature TT;\n  Ljava/lang/Object; value\n}";
	let class = javasm::read_class(text)?;
	assert_eq!(class.record_components[0].signature, Some("TT;".try_into()?));
	assert!(class.access.contains(AccessFlags::RECORD));
	Ok(())
}

#[test]
fn class_annotations() -> Result<()> {
	let text = "\
// DEPRECATED
public class Foo {
  @Ljava/lang/Deprecated;()
  @LTag;(names={\"x\"}, level=1, kind=LKind;.BIG, type=Ljava/lang/String;.class, inner=@LInner;())
  @LTag;() : CLASS_EXTENDS -1, null
}";
	let class = javasm::read_class(text)?;
	assert!(class.access.contains(AccessFlags::DEPRECATED));

	let mut tag = Annotation::new("LTag;".try_into()?);
	tag.element_value_pairs = vec![
		ElementValuePair {
			name: "names".to_owned(),
			value: ElementValue::ArrayType(vec![ElementValue::Object(Object::String(JavaString::from("x")))]),
		},
		ElementValuePair { name: "level".to_owned(), value: ElementValue::Object(Object::Integer(1)) },
		ElementValuePair {
			name: "kind".to_owned(),
			value: ElementValue::Enum { type_name: "LKind;".try_into()?, const_name: "BIG".to_owned() },
		},
		ElementValuePair { name: "type".to_owned(), value: ElementValue::Class("Ljava/lang/String;".to_owned()) },
		ElementValuePair {
			name: "inner".to_owned(),
			value: ElementValue::AnnotationInterface(Annotation::new("LInner;".try_into()?)),
		},
	];
	assert_eq!(class.runtime_visible_annotations, vec![Annotation::new("Ljava/lang/Deprecated;".try_into()?), tag]);
	assert_eq!(class.runtime_visible_type_annotations.len(), 1);
	Ok(())
}

#[test]
fn multiple_classes() -> Result<()> {
	let text = "class A {\n}\n// between\nclass B extends A {\n}\n// trailing\n";
	let classes: Vec<ClassFile> = javasm::read_class_multi(text, Vec::new())?;
	let names: Vec<_> = classes.iter().map(|class| class.name.as_str()).collect();
	assert_eq!(names, ["A", "B"]);
	assert_eq!(classes[1].super_class, Some(ClassName::try_from("A")?));

	assert!(javasm::read_class(text).is_err());
	assert!(javasm::read_class("// nothing here\n").is_err());
	Ok(())
}

#[test]
fn invalid_signature_is_ignored() -> Result<()> {
	let class = javasm::read_class("class Foo {\n  // signature \n  I x\n}")?;
	assert_eq!(class.fields[0].signature, None);
	Ok(())
}

#[test]
fn access_flags_comment_wins_over_keywords() -> Result<()> {
	let text = "\
class Foo {
  // access flags 0x1a
  public static I x

  // access flags 0x1019
  public static final I y
}
";
	let class = javasm::read_class(text)?;
	assert_eq!(class.fields, vec![
		Field::new(AccessFlags::PRIVATE | AccessFlags::STATIC | AccessFlags::FINAL, "x".try_into()?, "I".try_into()?, None, None),
		Field::new(AccessFlags::PUBLIC | AccessFlags::STATIC | AccessFlags::FINAL | AccessFlags::SYNTHETIC, "y".try_into()?, "I".try_into()?, None, None),
	]);
	Ok(())
}
