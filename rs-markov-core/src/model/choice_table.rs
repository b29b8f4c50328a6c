use std::collections::{HashMap, TryReserveError};

use crate::error::{ChainError, Result};
use crate::model::frequency_table::FrequencyTable;

/// Expanded chain model used for sampling.
///
/// Each suffix appears in its prefix's choice list as many times as it was
/// observed, so a uniform draw over the list reproduces the recorded
/// frequency distribution.
///
/// The table is filled either from a decoded file or from an in-memory
/// [`FrequencyTable`]; it is read-only afterwards.
#[derive(Clone, Debug)]
pub struct ChoiceTable {
	prefix_len: usize,
	choices: HashMap<String, Vec<String>>,
}

impl ChoiceTable {
	/// Creates an empty table for prefixes of `prefix_len` words.
	///
	/// # Errors
	/// Returns an error if `prefix_len == 0`.
	pub fn new(prefix_len: usize) -> Result<Self> {
		if prefix_len == 0 {
			return Err(ChainError::InvalidPrefixLen(prefix_len));
		}
		Ok(Self { prefix_len, choices: HashMap::new() })
	}

	pub fn prefix_len(&self) -> usize {
		self.prefix_len
	}

	/// Appends `suffix` to the choice list of `key`, `count` times.
	///
	/// The key is registered even when `count` is 0.
	pub(crate) fn push(&mut self, key: &str, suffix: &str, count: usize) {
		let list = self.choices.entry(key.to_owned()).or_default();
		list.extend(std::iter::repeat_n(suffix, count).map(str::to_owned));
	}

	/// Same as [`push`](Self::push), but fails instead of aborting when the
	/// list cannot grow by `count` entries. The table is left unchanged on
	/// failure.
	pub(crate) fn try_push(&mut self, key: &str, suffix: &str, count: usize) -> std::result::Result<(), TryReserveError> {
		let list = self.choices.entry(key.to_owned()).or_default();
		list.try_reserve(count)?;
		list.extend(std::iter::repeat_n(suffix, count).map(str::to_owned));
		Ok(())
	}

	/// Registers `key` without adding any choice.
	pub(crate) fn touch(&mut self, key: &str) {
		self.choices.entry(key.to_owned()).or_default();
	}

	/// Returns the choice list of `key`, if the key is known.
	pub fn choices(&self, key: &str) -> Option<&[String]> {
		self.choices.get(key).map(Vec::as_slice)
	}

	/// Collapses the choice list of `key` back into suffix counts.
	pub fn suffix_counts(&self, key: &str) -> HashMap<&str, usize> {
		let mut counts = HashMap::new();
		for suffix in self.choices(key).unwrap_or_default() {
			*counts.entry(suffix.as_str()).or_insert(0) += 1;
		}
		counts
	}

	/// Iterates over known prefix keys in unspecified order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.choices.keys().map(String::as_str)
	}

	/// Number of distinct prefix keys.
	pub fn len(&self) -> usize {
		self.choices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.choices.is_empty()
	}
}

impl From<&FrequencyTable> for ChoiceTable {
	fn from(table: &FrequencyTable) -> Self {
		let mut choices = Self {
			prefix_len: table.prefix_len(),
			choices: HashMap::with_capacity(table.len()),
		};
		for (key, suffixes) in table.iter() {
			for (suffix, count) in suffixes {
				choices.push(key, suffix, *count);
			}
		}
		choices
	}
}
