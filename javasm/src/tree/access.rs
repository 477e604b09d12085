use std::fmt::{Debug, Formatter};
use std::ops::{BitOr, BitOrAssign};

/// The access flags of a class, field, method, parameter or inner class.
///
/// Some bits have a different meaning depending on what they're used on, for example `0x0020` is
/// [`AccessFlags::SUPER`] on a class, but [`AccessFlags::SYNCHRONIZED`] on a method.
///
/// Besides the bits that end up in the class file, this also carries the bits ASM uses to
/// signal a record ([`AccessFlags::RECORD`]) and the presence of a `Deprecated` attribute ([`AccessFlags::DEPRECATED`]).
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct AccessFlags(pub u32);

impl AccessFlags {
	pub const PUBLIC: AccessFlags = AccessFlags(0x0001);
	pub const PRIVATE: AccessFlags = AccessFlags(0x0002);
	pub const PROTECTED: AccessFlags = AccessFlags(0x0004);
	pub const STATIC: AccessFlags = AccessFlags(0x0008);
	pub const FINAL: AccessFlags = AccessFlags(0x0010);
	pub const SUPER: AccessFlags = AccessFlags(0x0020);
	pub const SYNCHRONIZED: AccessFlags = AccessFlags(0x0020);
	pub const OPEN: AccessFlags = AccessFlags(0x0020);
	pub const TRANSITIVE: AccessFlags = AccessFlags(0x0020);
	pub const VOLATILE: AccessFlags = AccessFlags(0x0040);
	pub const BRIDGE: AccessFlags = AccessFlags(0x0040);
	pub const VARARGS: AccessFlags = AccessFlags(0x0080);
	pub const TRANSIENT: AccessFlags = AccessFlags(0x0080);
	pub const NATIVE: AccessFlags = AccessFlags(0x0100);
	pub const INTERFACE: AccessFlags = AccessFlags(0x0200);
	pub const ABSTRACT: AccessFlags = AccessFlags(0x0400);
	pub const STRICT: AccessFlags = AccessFlags(0x0800);
	pub const SYNTHETIC: AccessFlags = AccessFlags(0x1000);
	pub const ANNOTATION: AccessFlags = AccessFlags(0x2000);
	pub const ENUM: AccessFlags = AccessFlags(0x4000);
	pub const MANDATED: AccessFlags = AccessFlags(0x8000);
	pub const MODULE: AccessFlags = AccessFlags(0x8000);
	pub const RECORD: AccessFlags = AccessFlags(0x1_0000);
	pub const DEPRECATED: AccessFlags = AccessFlags(0x2_0000);

	pub const fn empty() -> AccessFlags {
		AccessFlags(0)
	}

	/// Returns `true` iff all bits of `other` are set in `self`.
	pub const fn contains(self, other: AccessFlags) -> bool {
		self.0 & other.0 == other.0
	}

	pub const fn is_empty(self) -> bool {
		self.0 == 0
	}

	/// Looks up the bits for a modifier keyword as printed by `Textifier`, ignoring case.
	///
	/// Keywords that only select the kind of declaration, like `interface` or `enum`, are not modifiers and
	/// return [`None`].
	pub fn from_keyword(keyword: &str) -> Option<AccessFlags> {
		Some(match keyword.to_ascii_lowercase().as_str() {
			"public" => Self::PUBLIC,
			"private" => Self::PRIVATE,
			"protected" => Self::PROTECTED,
			"static" => Self::STATIC,
			"final" => Self::FINAL,
			"super" => Self::SUPER,
			"synchronized" => Self::SYNCHRONIZED,
			"open" => Self::OPEN,
			"transitive" => Self::TRANSITIVE,
			"volatile" => Self::VOLATILE,
			"bridge" => Self::BRIDGE,
			"varargs" => Self::VARARGS,
			"transient" => Self::TRANSIENT,
			"native" => Self::NATIVE,
			"abstract" => Self::ABSTRACT,
			"strictfp" => Self::STRICT,
			"synthetic" => Self::SYNTHETIC,
			"annotation" => Self::ANNOTATION,
			"mandated" => Self::MANDATED,
			"module" => Self::MODULE,
			"record" => Self::RECORD,
			"deprecated" => Self::DEPRECATED,
			_ => return None,
		})
	}
}

impl BitOr for AccessFlags {
	type Output = AccessFlags;

	fn bitor(self, rhs: AccessFlags) -> AccessFlags {
		AccessFlags(self.0 | rhs.0)
	}
}

impl BitOrAssign for AccessFlags {
	fn bitor_assign(&mut self, rhs: AccessFlags) {
		self.0 |= rhs.0;
	}
}

impl From<u32> for AccessFlags {
	fn from(value: u32) -> Self {
		AccessFlags(value)
	}
}

impl Debug for AccessFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		// bits shared by multiple meanings are printed once, with their first meaning
		const NAMES: [(u32, &str); 18] = [
			(0x0001, "public"),
			(0x0002, "private"),
			(0x0004, "protected"),
			(0x0008, "static"),
			(0x0010, "final"),
			(0x0020, "super/synchronized"),
			(0x0040, "volatile/bridge"),
			(0x0080, "transient/varargs"),
			(0x0100, "native"),
			(0x0200, "interface"),
			(0x0400, "abstract"),
			(0x0800, "strict"),
			(0x1000, "synthetic"),
			(0x2000, "annotation"),
			(0x4000, "enum"),
			(0x8000, "module/mandated"),
			(0x1_0000, "record"),
			(0x2_0000, "deprecated"),
		];

		write!(f, "AccessFlags {{ ")?;
		for (bit, name) in NAMES {
			if self.0 & bit != 0 {
				write!(f, "{name} ")?;
			}
		}
		let unknown = NAMES.iter().fold(self.0, |acc, (bit, _)| acc & !bit);
		if unknown != 0 {
			write!(f, "{unknown:#x} ")?;
		}
		write!(f, "}}")
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::tree::access::AccessFlags;

	#[test]
	fn keywords() {
		assert_eq!(AccessFlags::from_keyword("public"), Some(AccessFlags::PUBLIC));
		assert_eq!(AccessFlags::from_keyword("STATIC"), Some(AccessFlags::STATIC));
		assert_eq!(AccessFlags::from_keyword("strictfp"), Some(AccessFlags::STRICT));
		assert_eq!(AccessFlags::from_keyword("enum"), None);
		assert_eq!(AccessFlags::from_keyword("class"), None);
		assert_eq!(AccessFlags::from_keyword("I"), None);
	}

	#[test]
	fn debug() {
		let flags = AccessFlags::PUBLIC | AccessFlags::STATIC | AccessFlags(0x4_0000);
		assert_eq!(format!("{flags:?}"), "AccessFlags { public static 0x40000 }");
		assert!(flags.contains(AccessFlags::STATIC));
		assert!(!flags.contains(AccessFlags::FINAL));
	}
}
