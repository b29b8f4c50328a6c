use std::fmt;

use crate::error::{ChainError, Result};

/// Serialized form of an empty prefix slot.
///
/// A real empty word would vanish when a line is split on spaces, so empty
/// slots are written as a literal pair of double quotes.
pub const SENTINEL: &str = "\"\"";

/// A Markov chain prefix of one or more words.
///
/// The prefix is a sliding window over the last `len` words consumed.
/// Slots that have not received a word yet hold the empty string.
///
/// # Invariants
/// - `len() >= 1`
/// - The length never changes after construction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prefix {
	words: Vec<String>,
}

impl Prefix {
	/// Creates a prefix of `len` empty slots.
	///
	/// # Errors
	/// Returns an error if `len == 0`.
	pub fn new(len: usize) -> Result<Self> {
		if len == 0 {
			return Err(ChainError::InvalidPrefixLen(len));
		}
		Ok(Self { words: vec![String::new(); len] })
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	/// Always `false`, a prefix holds at least one slot.
	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// Returns the words joined by a single space, used as the map key.
	pub fn key(&self) -> String {
		self.words.join(" ")
	}

	/// Drops the first word and appends `word` at the end.
	///
	/// Slots are rotated in place, the length is preserved.
	pub fn shift(&mut self, word: &str) {
		self.words.rotate_left(1);
		if let Some(last) = self.words.last_mut() {
			last.clear();
			last.push_str(word);
		}
	}

	/// Resets every slot to the empty word.
	pub fn reset(&mut self) {
		self.words.iter_mut().for_each(String::clear);
	}
}

impl fmt::Display for Prefix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.key())
	}
}

/// Maps an in-memory prefix word to its serialized field.
pub(crate) fn encode_word(word: &str) -> &str {
	if word.is_empty() { SENTINEL } else { word }
}

/// Maps a serialized prefix field back to its in-memory word.
pub(crate) fn decode_word(field: &str) -> &str {
	if field == SENTINEL { "" } else { field }
}
