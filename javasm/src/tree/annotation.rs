use std::fmt::{Debug, Formatter};
use java_string::JavaString;
use crate::tree::field::FieldDescriptor;

/// An annotation, written as `@Lcom/example/Tag;(key=value, ...)` in a listing.
#[derive(Clone, PartialEq)]
pub struct Annotation {
	pub annotation_type: FieldDescriptor,
	pub element_value_pairs: Vec<ElementValuePair>,
}

impl Annotation {
	pub fn new(annotation_type: FieldDescriptor) -> Annotation {
		Annotation {
			annotation_type,
			element_value_pairs: Vec::new(),
		}
	}
}

impl Debug for Annotation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "@{}", self.annotation_type)?;
		f.debug_map()
			.entries(self.element_value_pairs.iter()
				.map(|pair| (&pair.name, &pair.value))
			)
			.finish()
	}
}

#[derive(Clone, PartialEq)]
pub struct ElementValuePair {
	pub name: String,
	pub value: ElementValue,
}

impl Debug for ElementValuePair {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} = {:?}", self.name, self.value)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
	Object(Object),
	/// Written as `Lcom/example/Kind;.VALUE`.
	Enum {
		type_name: FieldDescriptor,
		const_name: String,
	},
	/// A class literal, stored as a return descriptor. So `void.class` is `V`, and `String.class` is `Ljava/lang/String;`.
	Class(String),
	/// A nested annotation, `@Lcom/example/Tag;()`.
	AnnotationInterface(Annotation),
	/// Written as `{a, b}`, with the elements all of the same kind.
	ArrayType(Vec<ElementValue>),
}

/// A constant element value. The suffix of the literal decides the variant, so `1` is an `Integer`, `(byte)1` is
/// a `Byte` and `'a'` is a `Char`.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
	Byte(i8),
	Char(u16),
	Double(f64),
	Float(f32),
	Integer(i32),
	Long(i64),
	Short(i16),
	Boolean(bool),
	String(JavaString),
}
