use javasm::SyntaxError;

/// Reads `text` as a class, returning the syntax error it fails with.
fn syntax_error(text: &str) -> SyntaxError {
	let error = javasm::read_class(text).expect_err("listing should fail to read");
	error.downcast_ref::<SyntaxError>()
		.cloned()
		.unwrap_or_else(|| panic!("expected a syntax error, got {error:?}"))
}

#[test]
fn unterminated_string() {
	let error = syntax_error("class Foo {\n  static run()V\n    LDC \"abc\n}");
	assert_eq!(error.message, "expected end of string");
	assert_eq!(error.line, 3);
	assert_eq!(error.line_text, "    LDC \"abc");
}

#[test]
fn position_of_bad_token() {
	let error = syntax_error("class Foo {\n  static run()V\n    NOPE\n    RETURN\n}");
	assert_eq!(error.message, "Expected a valid opcode, got NOPE");
	assert_eq!(error.line, 3);
	assert_eq!(error.column, 4);
	assert_eq!(error.token.as_deref(), Some("NOPE"));
}

#[test]
fn table_switch_keys() {
	let text = "class Foo {\n static f(I)V\n  ILOAD 0\n  TABLESWITCH\n   0: L0\n   2: L0\n   default: L0\n L0\n  RETURN\n  MAXSTACK = 1\n  MAXLOCALS = 1\n}";
	assert_eq!(syntax_error(text).message, "Expected consecutive keys");
}

#[test]
fn annotation_after_method() {
	let text = "class Foo {\n  abstract run()V\n  MAXSTACK = 0\n}";
	assert!(javasm::read_class(text).is_err());

	let text = "class Foo {\n  static run()V\n    RETURN\n    MAXSTACK = 0\n    MAXLOCALS = 0\n  @LTag;()\n}";
	assert_eq!(syntax_error(text).message, "Unexpected annotation after method");
}

#[test]
fn access_before_annotation() {
	let text = "class Foo {\n  public @LTag;()\n}";
	assert_eq!(syntax_error(text).message, "Didn't expect access modifier with annotation");
}

#[test]
fn unbalanced_class() {
	assert_eq!(syntax_error("class Foo {\n  I x\n").message, "Unexpected end of input, expected }");
	assert!(javasm::read_class("class {\n}").is_err());
	assert!(javasm::read_class("struct Foo {\n}").is_err());
}

#[test]
fn invalid_names() {
	let error = syntax_error("class Foo {\n  I a.b\n}");
	assert_eq!(error.message, "Invalid field name: a.b");
	assert_eq!(error.line, 2);
}

#[test]
fn field_constant_type() {
	let error = syntax_error("class Foo {\n  I x = \"text\"\n}");
	assert_eq!(error.line, 2);
}

#[test]
fn error_display() {
	let error = syntax_error("class Foo {\n  static run()V\n    NOPE\n}");
	assert_eq!(error.to_string(), "Error at line 3, column 4: Expected a valid opcode, got NOPE\n    NOPE\n    ^");
}
