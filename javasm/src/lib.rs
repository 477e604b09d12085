//! An assembler for the textual class listing produced by ASM's `Textifier`.
//!
//! The [`reader`] module turns such a listing back into calls on the visitor traits found in [`visitor`].
//! The types in [`tree`] implement all of these traits, so assembling into a [`tree::class::ClassFile`] is as easy
//! as calling [`read_class`].
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! let text = "class Foo {\n}\n";
//! let class = javasm::read_class(text)?;
//! assert_eq!(class.name.as_str(), "Foo");
//! # Ok(())
//! # }
//! ```

pub mod tree;
pub mod visitor;
pub mod reader;
mod jstring;

mod macros;

use std::fmt::Debug;
use anyhow::{bail, Result};

pub use reader::{read_class, read_class_multi, read_method, read_method_into};
pub use reader::error::SyntaxError;

trait OptionExpansion<T> {
	fn insert_if_empty(&mut self, value: T) -> Result<()>;
}
impl<T> OptionExpansion<T> for Option<T> where T: Debug {
	fn insert_if_empty(&mut self, value: T) -> Result<()> {
		if let Some(old) = self {
			bail!("got {old:?} and {value:?}");
		} else {
			*self = Some(value);
			Ok(())
		}
	}
}
