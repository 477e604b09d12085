use std::collections::HashMap;
use anyhow::{anyhow, Context, Result};
use crate::tree::method::code::Label;

/// The labels of one method, by the number they have in the listing.
#[derive(Debug, Default)]
pub(crate) struct Labels {
	labels: HashMap<u32, Label>,
}

impl Labels {
	/// Parses a label reference like `L12`, returning [`None`] if `token` isn't one.
	pub(crate) fn parse(token: &str) -> Option<u32> {
		let digits = token.strip_prefix('L')?;
		if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
			return None;
		}
		digits.parse().ok()
	}

	/// Returns the label with the given number, creating it on first use.
	pub(crate) fn get(&mut self, number: u32) -> Result<Label> {
		if let Some(&label) = self.labels.get(&number) {
			return Ok(label);
		}
		let id = u16::try_from(self.labels.len())
			.with_context(|| anyhow!("too many labels, can't create label for L{number}"))?;
		let label = Label { id };
		self.labels.insert(number, label);
		Ok(label)
	}

	/// Returns the label referenced by `token`, or [`None`] if the token isn't a label reference.
	pub(crate) fn lookup(&mut self, token: &str) -> Result<Option<Label>> {
		Labels::parse(token).map(|number| self.get(number)).transpose()
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::reader::labels::Labels;
	use crate::tree::method::code::Label;

	#[test]
	fn parse() {
		assert_eq!(Labels::parse("L0"), Some(0));
		assert_eq!(Labels::parse("L123"), Some(123));
		assert_eq!(Labels::parse("L"), None);
		assert_eq!(Labels::parse("L1a"), None);
		assert_eq!(Labels::parse("Ljava/lang/Object;"), None);
		assert_eq!(Labels::parse("I"), None);
	}

	#[test]
	fn identity() -> Result<()> {
		let mut labels = Labels::default();
		assert_eq!(labels.get(5)?, Label { id: 0 });
		assert_eq!(labels.get(2)?, Label { id: 1 });
		assert_eq!(labels.get(5)?, Label { id: 0 });
		assert_eq!(labels.lookup("L2")?, Some(Label { id: 1 }));
		assert_eq!(labels.lookup("GOTO")?, None);
		Ok(())
	}
}
