use std::collections::HashMap;

use crate::error::{ChainError, Result};
use crate::model::prefix::Prefix;

/// Canonical chain model: prefix key → suffix → occurrence count.
///
/// A key is `prefix_len` words joined by single spaces (see [`Prefix::key`]).
/// This compact representation is the one persisted on disk.
///
/// # Responsibilities
/// - Accumulate transition counts during building
/// - Merge with another table of the same prefix length
///
/// # Invariants
/// - `prefix_len >= 1`
/// - Every key present has at least one suffix
/// - Every count is strictly positive
/// - Counts are never decremented
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
	/// Number of words in every prefix key.
	prefix_len: usize,

	/// Outgoing transitions indexed by prefix key then by suffix.
	/// Example: { "I am" => { "a" => 1, "not" => 1 } }
	entries: HashMap<String, HashMap<String, usize>>,
}

impl FrequencyTable {
	/// Creates an empty table for prefixes of `prefix_len` words.
	///
	/// # Errors
	/// Returns an error if `prefix_len == 0`.
	pub fn new(prefix_len: usize) -> Result<Self> {
		if prefix_len == 0 {
			return Err(ChainError::InvalidPrefixLen(prefix_len));
		}
		Ok(Self { prefix_len, entries: HashMap::new() })
	}

	pub fn prefix_len(&self) -> usize {
		self.prefix_len
	}

	/// Records one occurrence of `suffix` following `key`.
	///
	/// - If the transition already exists, its count is increased.
	/// - Otherwise, it is created with an initial count of 1.
	/// - Empty suffixes are ignored, they could not be stored on disk.
	pub fn record(&mut self, key: &str, suffix: &str) {
		if suffix.is_empty() {
			return;
		}
		if let Some(suffixes) = self.entries.get_mut(key) {
			*suffixes.entry(suffix.to_owned()).or_insert(0) += 1;
			return;
		}
		let mut suffixes = HashMap::new();
		suffixes.insert(suffix.to_owned(), 1);
		self.entries.insert(key.to_owned(), suffixes);
	}

	/// Records `suffix` following the current content of `prefix`.
	pub fn record_prefix(&mut self, prefix: &Prefix, suffix: &str) {
		self.record(&prefix.key(), suffix);
	}

	/// Returns how many times `suffix` followed `key` (0 if never).
	pub fn count(&self, key: &str, suffix: &str) -> usize {
		self.entries
			.get(key)
			.and_then(|suffixes| suffixes.get(suffix))
			.copied()
			.unwrap_or(0)
	}

	/// Returns the suffix counts recorded for `key`.
	pub fn suffixes(&self, key: &str) -> Option<&HashMap<String, usize>> {
		self.entries.get(key)
	}

	/// Number of distinct prefix keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Total number of recorded transitions (sum of all counts).
	pub fn transitions(&self) -> usize {
		self.entries.values().flat_map(HashMap::values).sum()
	}

	/// Iterates over `(key, suffix counts)` in unspecified order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &HashMap<String, usize>)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Merges another table into this one.
	///
	/// Counts for matching keys and suffixes are summed.
	///
	/// # Errors
	/// Returns an error if the prefix lengths do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.prefix_len != other.prefix_len {
			return Err(ChainError::PrefixLenMismatch {
				expected: self.prefix_len,
				found: other.prefix_len,
			});
		}

		for (key, suffixes) in &other.entries {
			let existing = self.entries.entry(key.clone()).or_default();
			for (suffix, count) in suffixes {
				*existing.entry(suffix.clone()).or_insert(0) += *count;
			}
		}

		Ok(())
	}
}
