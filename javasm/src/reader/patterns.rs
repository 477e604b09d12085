//! The patterns of the comments carrying information, like `// class version 52.0 (52)`.
//!
//! All of them ignore case, and are searched for anywhere in the comment.

use std::sync::LazyLock;
use regex::{Regex, RegexBuilder};

#[allow(clippy::expect_used)]
fn build(pattern: &str) -> Regex {
	RegexBuilder::new(pattern)
		.case_insensitive(true)
		.build()
		.expect("static patterns are valid")
}

/// Builds a pattern that ignores case and must match the whole input.
pub(crate) fn anchored(pattern: &str) -> Regex {
	build(&format!("^(?:{pattern})$"))
}

pub(crate) static CLASS_VERSION: LazyLock<Regex> = LazyLock::new(|| {
	build(r"^\s*class\s*version:?\s*(?<major>\d+)\.(?<minor>\d+)")
});
pub(crate) static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| build(r"^\s*signature:?\s*(?<signature>.*)"));
pub(crate) static COMPILED_FROM: LazyLock<Regex> = LazyLock::new(|| build(r"^\s*compiled\s*from:?\s*(?<source>.*)"));
pub(crate) static ACCESS_FLAGS: LazyLock<Regex> = LazyLock::new(|| {
	build(r"^\s*access\s*flags:?\s*0x(?<flags>[0-9a-f]+)")
});
pub(crate) static DEPRECATED: LazyLock<Regex> = LazyLock::new(|| anchored(r"\s*DEPRECATED\s*"));
pub(crate) static ANNOTABLE_PARAMETER_COUNT: LazyLock<Regex> = LazyLock::new(|| {
	build(r"^\s*annotable\s*parameter\s*count:?\s*(?<count>\d+)\s*\((?<visibility>invisible|visible)\)")
});
pub(crate) static HANDLE_KIND: LazyLock<Regex> = LazyLock::new(|| {
	build(r"^\s*handle\s*kind:?\s*0x(?<kind>[0-9a-f]+)\s*:\s*(?<name>.*)")
});
pub(crate) static PARAMETER: LazyLock<Regex> = LazyLock::new(|| build(r"^\s*parameter\s+(?<rest>.*)$"));
