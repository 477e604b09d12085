use std::fmt::{Display, Formatter};

/// An error in a listing, together with where it happened.
///
/// It's returned wrapped in an [`anyhow::Error`], use [`anyhow::Error::downcast_ref`] to get it back:
/// ```
/// # use javasm::SyntaxError;
/// let error = javasm::read_class("class Foo {\n  I \"abc\n}\n").unwrap_err();
/// let syntax_error = error.downcast_ref::<SyntaxError>().unwrap();
/// assert_eq!(syntax_error.line, 2);
/// ```
///
/// Errors that happened while trying multiple interpretations of some token are available as
/// the [source chain][std::error::Error::source] of the [`anyhow::Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
	pub message: String,
	/// The line of the error, starting at `1`.
	pub line: usize,
	/// The column of the error, counted in chars, starting at `0`.
	pub column: usize,
	/// The complete line the error is on.
	pub line_text: String,
	/// The token at the error, if there's any.
	pub token: Option<String>,
}

impl Display for SyntaxError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Error at line {}, column {}: {}\n{}\n{}^",
			self.line, self.column, self.message, self.line_text, " ".repeat(self.column))
	}
}

impl std::error::Error for SyntaxError {}
