use std::io::BufRead;
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::io::{Tokens, open_input};
use crate::model::frequency_table::FrequencyTable;
use crate::model::prefix::Prefix;

/// Builds a [`FrequencyTable`] from one or more token sources.
///
/// Every source is an independent document: it starts from an empty prefix
/// and never sees the last words of the previous source, while all sources
/// accumulate into the same table.
///
/// # Behavior
/// For each word `s` of a source, in order:
/// - record `s` as a suffix of the current prefix key
/// - shift the prefix by `s`
#[derive(Debug)]
pub struct ChainBuilder {
	table: FrequencyTable,
	prefix: Prefix,
}

impl ChainBuilder {
	/// Creates a builder for prefixes of `prefix_len` words.
	///
	/// # Errors
	/// Returns an error if `prefix_len == 0`.
	pub fn new(prefix_len: usize) -> Result<Self> {
		Ok(Self {
			table: FrequencyTable::new(prefix_len)?,
			prefix: Prefix::new(prefix_len)?,
		})
	}

	pub fn prefix_len(&self) -> usize {
		self.table.prefix_len()
	}

	/// Read-only view of the counts accumulated so far.
	pub fn table(&self) -> &FrequencyTable {
		&self.table
	}

	/// Consumes the builder and returns the accumulated table.
	pub fn finish(self) -> FrequencyTable {
		self.table
	}

	/// Folds one in-memory document into the table.
	///
	/// Items are split on whitespace first, so every recorded word is a
	/// single non-empty token. Returns the number of words consumed.
	pub fn add_tokens<I, S>(&mut self, words: I) -> usize
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.prefix.reset();
		let mut consumed = 0;
		for item in words {
			for word in item.as_ref().split_whitespace() {
				Self::push_word(&mut self.table, &mut self.prefix, word);
				consumed += 1;
			}
		}
		consumed
	}

	/// Folds one token source into the table.
	///
	/// The source is accumulated into a partial table first and merged only
	/// once it is exhausted: a read error leaves the builder untouched.
	///
	/// Returns the number of words consumed.
	pub fn add_reader<R: BufRead>(&mut self, reader: R) -> Result<usize> {
		let mut partial = FrequencyTable::new(self.prefix_len())?;
		self.prefix.reset();

		let mut consumed = 0;
		for word in Tokens::new(reader) {
			let word = word?;
			Self::push_word(&mut partial, &mut self.prefix, &word);
			consumed += 1;
		}

		self.table.merge(&partial)?;
		debug!("folded {} words into {} prefixes", consumed, partial.len());
		Ok(consumed)
	}

	/// Opens `path` (or standard input for `"-"`) and folds it.
	///
	/// Read failures name the offending path.
	pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
		let reader = open_input(&path)?;
		let consumed = self.add_reader(reader).map_err(|e| e.with_path(path.as_ref()))?;
		debug!("read {} words from {}", consumed, path.as_ref().display());
		Ok(consumed)
	}

	fn push_word(table: &mut FrequencyTable, prefix: &mut Prefix, word: &str) {
		table.record_prefix(prefix, word);
		prefix.shift(word);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ChainError;
	use std::io::{self, BufReader, Cursor, Read};

	#[test]
	fn repeated_word_single_prefix() {
		let mut builder = ChainBuilder::new(1).unwrap();
		assert_eq!(builder.add_tokens("a a a".split(' ')), 3);
		let table = builder.finish();

		assert_eq!(table.count("", "a"), 1);
		assert_eq!(table.count("a", "a"), 2);
		assert_eq!(table.len(), 2);
		assert_eq!(table.suffixes("a").unwrap().len(), 1);
	}

	#[test]
	fn worked_example_prefix_two() {
		let mut builder = ChainBuilder::new(2).unwrap();
		builder
			.add_reader(Cursor::new("I am not a number! I am a free man!"))
			.unwrap();
		let table = builder.finish();

		assert_eq!(table.count(" ", "I"), 1);
		assert_eq!(table.suffixes(" ").unwrap().len(), 1);
		assert_eq!(table.count(" I", "am"), 1);
		assert_eq!(table.count("I am", "a"), 1);
		assert_eq!(table.count("I am", "not"), 1);
		assert_eq!(table.count("a free", "man!"), 1);
		assert_eq!(table.count("am a", "free"), 1);
		assert_eq!(table.count("am not", "a"), 1);
		assert_eq!(table.count("a number!", "I"), 1);
		assert_eq!(table.count("number! I", "am"), 1);
		assert_eq!(table.count("not a", "number!"), 1);
		assert_eq!(table.len(), 9);
		assert_eq!(table.transitions(), 10);
	}

	#[test]
	fn sources_do_not_share_context() {
		let mut builder = ChainBuilder::new(1).unwrap();
		builder.add_reader(Cursor::new("x y")).unwrap();
		builder.add_reader(Cursor::new("z y")).unwrap();
		let table = builder.finish();

		// "y" ends the first source and must not precede "z".
		assert_eq!(table.count("y", "z"), 0);
		assert_eq!(table.count("", "x"), 1);
		assert_eq!(table.count("", "z"), 1);
		assert_eq!(table.count("x", "y"), 1);
		assert_eq!(table.count("z", "y"), 1);
		assert_eq!(table.transitions(), 4);
	}

	#[test]
	fn counts_accumulate_across_sources() {
		let mut builder = ChainBuilder::new(1).unwrap();
		builder.add_tokens(["a", "b"]);
		builder.add_tokens(["a", "b"]);
		assert_eq!(builder.table().count("", "a"), 2);
		assert_eq!(builder.table().count("a", "b"), 2);
	}

	#[test]
	fn tokens_are_normalized() {
		let mut builder = ChainBuilder::new(1).unwrap();
		assert_eq!(builder.add_tokens(["a b", "", "  c "]), 3);
		let table = builder.finish();
		assert_eq!(table.count("a", "b"), 1);
		assert_eq!(table.count("b", "c"), 1);
	}

	#[test]
	fn empty_source_adds_nothing() {
		let mut builder = ChainBuilder::new(3).unwrap();
		assert_eq!(builder.add_reader(Cursor::new("")).unwrap(), 0);
		assert!(builder.table().is_empty());
	}

	/// Yields some text, then fails.
	struct BrokenReader {
		sent: bool,
	}

	impl Read for BrokenReader {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			if self.sent {
				return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
			}
			self.sent = true;
			let text = b"partial words\n";
			buf[..text.len()].copy_from_slice(text);
			Ok(text.len())
		}
	}

	#[test]
	fn read_error_discards_source() {
		let mut builder = ChainBuilder::new(1).unwrap();
		builder.add_tokens(["keep", "me"]);
		let before = builder.table().clone();

		let err = builder
			.add_reader(BufReader::new(BrokenReader { sent: false }))
			.unwrap_err();
		assert!(matches!(err, ChainError::Io(_)));
		assert_eq!(builder.table(), &before);
	}

	#[test]
	fn unreadable_file_error_names_path() {
		// Opening a directory succeeds, reading it does not.
		let dir = tempfile::TempDir::new().unwrap();
		let mut builder = ChainBuilder::new(1).unwrap();
		let err = builder.add_file(dir.path()).unwrap_err();
		match err {
			ChainError::Read { path, .. } => assert_eq!(path, dir.path()),
			other => panic!("expected a read error, got {other:?}"),
		}
		assert!(builder.table().is_empty());
	}

	#[test]
	fn missing_file_is_open_error() {
		let mut builder = ChainBuilder::new(2).unwrap();
		let err = builder.add_file("no/such/input.txt").unwrap_err();
		assert!(matches!(err, ChainError::Open { .. }));
	}
}
