/// Creates a [`String`] backed name type, that is only constructed from valid contents.
///
/// The `is_valid(s) = ...;` part gives the body of the `check_valid` function, evaluating to an
/// [`anyhow::Result<()>`] that tells if `s` is a valid value.
macro_rules! make_name {
	(
		$( #[$doc:meta] )*
		$vis:vis $name:ident;
		is_valid($s:ident) = $check:expr;
	) => {
		$( #[$doc] )*
		#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
		$vis struct $name(std::borrow::Cow<'static, str>);

		impl $name {
			/// Checks if the contents are valid for this type.
			pub fn check_valid($s: &str) -> anyhow::Result<()> {
				$check
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}

			pub fn into_inner(self) -> String {
				self.0.into_owned()
			}

			#[doc = concat!("Constructs [`", stringify!($name), "`] from a static string without checking any content.")]
			#[allow(unused)]
			pub(crate) const fn from_static(s: &'static str) -> $name {
				$name(std::borrow::Cow::Borrowed(s))
			}

			/// Checks if a given value is valid for being represented by this type.
			///
			/// See [`Self::check_valid`] for what names are valid.
			pub fn is_valid(inner: &str) -> bool {
				let result: anyhow::Result<()> = Self::check_valid(inner);
				result.is_ok()
			}
		}

		impl TryFrom<String> for $name {
			type Error = anyhow::Error;

			fn try_from(value: String) -> anyhow::Result<$name> {
				match $name::check_valid(&value) {
					Ok(()) => Ok($name(std::borrow::Cow::Owned(value))),
					Err(e) => {
						use anyhow::Context;
						Err(e).with_context(|| anyhow::anyhow!("on value {value:?}"))
					},
				}
			}
		}
		impl<'a> TryFrom<&'a str> for $name {
			type Error = anyhow::Error;

			fn try_from(value: &'a str) -> anyhow::Result<$name> {
				$name::try_from(value.to_owned())
			}
		}

		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.into_inner()
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				std::fmt::Display::fmt(&self.0, f)
			}
		}

		impl PartialEq<str> for $name {
			fn eq(&self, other: &str) -> bool {
				self.0 == other
			}
		}
		impl<'a> PartialEq<&'a str> for $name {
			fn eq(&self, other: &&'a str) -> bool {
				self.0 == *other
			}
		}
	}
}

pub(crate) use make_name;
