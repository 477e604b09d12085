use std::cmp::Ordering;

/// Represents a class file version.
///
/// Listings without a `// class version` comment get the all-zero version, see [`Version::UNKNOWN`].
///
/// Take a look at [the list of class file versions](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.1-200-B.2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Version {
	pub major: u16,
	pub minor: u16,
}

impl Version {
	pub const UNKNOWN: Version = Version::new(0, 0);

	pub const fn new(major: u16, minor: u16) -> Version {
		Version { major, minor }
	}

	/// Packs the version the way ASM does, with the minor version in the upper 16 bits.
	pub const fn as_u32(self) -> u32 {
		(self.minor as u32) << 16 | self.major as u32
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> Ordering {
		self.major.cmp(&other.major)
			.then_with(|| self.minor.cmp(&other.minor))
	}
}
