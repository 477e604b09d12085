use std::iter::Peekable;
use std::str::Chars;
use anyhow::{anyhow, bail, Context, Result};

/// The kind of the type a field descriptor describes.
///
/// This decides which constant a field with that descriptor may take.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DescriptorKind {
	/// A `byte`.
	B,
	/// A `char`.
	C,
	/// A `double`.
	D,
	/// A `float`.
	F,
	/// An `int`.
	I,
	/// A `long`.
	J,
	/// A `short`.
	S,
	/// A `boolean`.
	Z,
	/// An instance of some class.
	Object,
	/// An array, of any dimension.
	Array,
}

// The grammar for descriptors is:
//   FieldDescriptor:
//     FieldType
//
//   MethodDescriptor:
//     "(" FieldType* ")" ReturnDescriptor
//
//   ReturnDescriptor:
//     FieldType | "V"
//
//   FieldType:
//     "B" | "C" | "D" | "F" | "I" | "J" | "S" | "Z"
//     "L" ClassName ";"
//     "[" FieldType

fn read_field_type(chars: &mut Peekable<Chars>) -> Result<DescriptorKind> {
	let mut array_dimension = 0u32;
	while chars.next_if_eq(&'[').is_some() {
		array_dimension += 1;
	}
	if array_dimension > 255 {
		bail!("array descriptor with more than 255 dimensions");
	}

	let char = chars.next().ok_or_else(|| anyhow!("unexpected abrupt ending of descriptor"))?;
	let kind = match char {
		'B' => DescriptorKind::B,
		'C' => DescriptorKind::C,
		'D' => DescriptorKind::D,
		'F' => DescriptorKind::F,
		'I' => DescriptorKind::I,
		'J' => DescriptorKind::J,
		'S' => DescriptorKind::S,
		'Z' => DescriptorKind::Z,
		'L' => {
			let mut name = String::new();
			loop {
				match chars.next() {
					Some(';') => break,
					Some(char) => name.push(char),
					None => bail!("unexpected abrupt ending of descriptor in class name"),
				}
			}
			if name.starts_with('[') {
				bail!("invalid class name {name:?} in descriptor: must not be an array");
			}
			super::names::check_class_name(&name)
				.with_context(|| anyhow!("invalid class name {name:?} in descriptor"))?;
			DescriptorKind::Object
		},
		char => bail!("unexpected char {char:?} in descriptor"),
	};

	Ok(if array_dimension > 0 { DescriptorKind::Array } else { kind })
}

/// Checks that `desc` is exactly one field descriptor, returning the kind of it.
pub(crate) fn check_field_descriptor(desc: &str) -> Result<DescriptorKind> {
	let mut chars = desc.chars().peekable();
	let kind = read_field_type(&mut chars)?;
	if chars.next().is_some() {
		bail!("expected end of field descriptor");
	}
	Ok(kind)
}

/// Checks that `desc` is a field descriptor or `V`.
pub(crate) fn check_return_descriptor(desc: &str) -> Result<()> {
	if desc != "V" {
		check_field_descriptor(desc)?;
	}
	Ok(())
}

/// Checks that `desc` is a method descriptor, returning the number of parameters.
pub(crate) fn check_method_descriptor(desc: &str) -> Result<usize> {
	let mut chars = desc.chars().peekable();
	if chars.next() != Some('(') {
		bail!("method descriptor must start with `(`");
	}

	let mut parameters = 0;
	while chars.next_if_eq(&')').is_none() {
		read_field_type(&mut chars)
			.with_context(|| anyhow!("in parameter {parameters}"))?;
		parameters += 1;
	}

	if chars.next_if_eq(&'V').is_none() {
		read_field_type(&mut chars)
			.context("in return type")?;
	}
	if chars.next().is_some() {
		bail!("expected end of method descriptor");
	}
	Ok(parameters)
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::tree::descriptor::{check_field_descriptor, check_method_descriptor, check_return_descriptor, DescriptorKind};

	#[test]
	fn field_descriptors() -> Result<()> {
		assert_eq!(check_field_descriptor("I")?, DescriptorKind::I);
		assert_eq!(check_field_descriptor("J")?, DescriptorKind::J);
		assert_eq!(check_field_descriptor("Ljava/lang/Object;")?, DescriptorKind::Object);
		assert_eq!(check_field_descriptor("[[Ljava/lang/Object;")?, DescriptorKind::Array);
		assert_eq!(check_field_descriptor("[Z")?, DescriptorKind::Array);

		assert!(check_field_descriptor("").is_err());
		assert!(check_field_descriptor("V").is_err());
		assert!(check_field_descriptor("II").is_err());
		assert!(check_field_descriptor("L;").is_err());
		assert!(check_field_descriptor("Ljava/lang/Object").is_err());
		assert!(check_field_descriptor("Ljava.lang.Object;").is_err());
		assert!(check_field_descriptor("[").is_err());
		Ok(())
	}

	#[test]
	fn method_descriptors() -> Result<()> {
		assert_eq!(check_method_descriptor("()V")?, 0);
		assert_eq!(check_method_descriptor("(IJ[Ljava/lang/String;)Ljava/lang/Object;")?, 3);

		assert!(check_method_descriptor("V").is_err());
		assert!(check_method_descriptor("()").is_err());
		assert!(check_method_descriptor("(V)V").is_err());
		assert!(check_method_descriptor("()VV").is_err());
		Ok(())
	}

	#[test]
	fn return_descriptors() {
		assert!(check_return_descriptor("V").is_ok());
		assert!(check_return_descriptor("[I").is_ok());
		assert!(check_return_descriptor("VV").is_err());
	}
}
