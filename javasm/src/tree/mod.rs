pub mod access;
pub mod annotation;
pub mod class;
pub mod descriptor;
pub mod field;
pub mod method;
pub mod record;
pub mod type_annotation;
pub mod version;

/// Validation of the names used in class files, see JVMS 4.2.
///
/// The errors say what's wrong with a name, so that they can be the cause of a syntax error at the name.
mod names {
	use anyhow::{anyhow, bail, Context, Result};

	const UNQUALIFIED_FORBIDDEN: &[char] = &['.', ';', '[', '/'];
	const METHOD_FORBIDDEN: &[char] = &['.', ';', '[', '/', '<', '>'];

	fn check_chars(name: &str, forbidden: &[char]) -> Result<()> {
		if name.is_empty() {
			bail!("must not be empty");
		}
		if let Some(char) = name.chars().find(|char| forbidden.contains(char)) {
			bail!("must not contain `{char}`");
		}
		Ok(())
	}

	/// Checks an unqualified name, as used for fields, local variables and record components.
	pub(super) fn check_unqualified_name(name: &str) -> Result<()> {
		check_chars(name, UNQUALIFIED_FORBIDDEN)
	}

	/// Checks a method name, which is an unqualified name that also can't have `<` or `>`, except for
	/// `<init>` and `<clinit>`.
	pub(super) fn check_method_name(name: &str) -> Result<()> {
		if name == "<init>" || name == "<clinit>" {
			return Ok(());
		}
		check_chars(name, METHOD_FORBIDDEN)
	}

	/// Checks a class name in internal form, like `java/lang/Object`, also accepting array descriptors as
	/// `ANEWARRAY` and `CHECKCAST` use them.
	pub(super) fn check_class_name(name: &str) -> Result<()> {
		if name.starts_with('[') {
			return crate::tree::descriptor::check_field_descriptor(name).map(|_| ());
		}
		for part in name.split('/') {
			check_unqualified_name(part)
				.with_context(|| anyhow!("the part {part:?} between the `/`"))?;
		}
		Ok(())
	}

	#[cfg(test)]
	mod testing {
		use pretty_assertions::assert_eq;
		use crate::tree::names::{check_class_name, check_method_name, check_unqualified_name};

		fn reason(result: anyhow::Result<()>) -> String {
			result.map_or_else(|e| format!("{e:#}"), |()| "ok".to_owned())
		}

		#[test]
		fn class_names() {
			for name in ["Foo", "java/util/Map$Entry", "[[I", "[Ljava/lang/String;", "module-info"] {
				assert_eq!(reason(check_class_name(name)), "ok", "{name}");
			}
			assert_eq!(reason(check_class_name("")), "the part \"\" between the `/`: must not be empty");
			assert_eq!(reason(check_class_name("java//Foo")), "the part \"\" between the `/`: must not be empty");
			assert_eq!(reason(check_class_name("java.lang.Object")), "the part \"java.lang.Object\" between the `/`: must not contain `.`");
			assert!(check_class_name("[Q").is_err());
			assert!(check_class_name("[Ljava/lang/String").is_err());
		}

		#[test]
		fn unqualified_names() {
			for name in ["x", "this", "0", "$", "-"] {
				assert_eq!(reason(check_unqualified_name(name)), "ok", "{name}");
			}
			assert_eq!(reason(check_unqualified_name("")), "must not be empty");
			assert_eq!(reason(check_unqualified_name("a;b")), "must not contain `;`");
			assert_eq!(reason(check_unqualified_name("[]")), "must not contain `[`");
		}

		#[test]
		fn method_names() {
			for name in ["<init>", "<clinit>", "run", "lambda$run$0"] {
				assert_eq!(reason(check_method_name(name)), "ok", "{name}");
			}
			assert_eq!(reason(check_method_name("<main>")), "must not contain `<`");
			assert_eq!(reason(check_method_name("a/b")), "must not contain `/`");
			assert_eq!(reason(check_method_name("")), "must not be empty");
		}
	}
}
