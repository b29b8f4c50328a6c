use std::path::Path;

use log::debug;
use rand::Rng;

use crate::error::Result;
use crate::model::choice_table::ChoiceTable;
use crate::model::codec;
use crate::model::prefix::Prefix;

/// Source of uniformly distributed indices.
///
/// Generation never reaches for a global random generator: the caller
/// provides one, which lets tests replay exact sequences.
pub trait RandomSource {
	/// Returns an index in `0..len`. `len` is always > 0.
	fn next_index(&mut self, len: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
	fn next_index(&mut self, len: usize) -> usize {
		self.random_range(0..len)
	}
}

/// Generates text by walking a [`ChoiceTable`].
///
/// # Behavior
/// - Starts from an empty prefix
/// - At each step, draws one entry uniformly from the current prefix's
///   choice list, emits it and shifts the prefix by it
/// - Stops after `max_words` words, or earlier when the current prefix has
///   no continuation (unknown key or empty list)
///
/// The word bound also guarantees termination when the chain has cycles.
#[derive(Debug)]
pub struct Generator {
	table: ChoiceTable,
}

impl Generator {
	pub fn new(table: ChoiceTable) -> Self {
		Self { table }
	}

	/// Creates a generator from a stored frequency table.
	///
	/// # Errors
	/// Returns an error if the file cannot be opened or is not a valid table.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::new(codec::load(path)?))
	}

	pub fn table(&self) -> &ChoiceTable {
		&self.table
	}

	/// Returns at most `max_words` generated words.
	pub fn generate<R: RandomSource + ?Sized>(&self, max_words: usize, rng: &mut R) -> Vec<String> {
		let mut words = Vec::new();
		// Impossible to fail, the table's prefix length is >= 1
		let Ok(mut prefix) = Prefix::new(self.table.prefix_len()) else {
			return words;
		};

		while words.len() < max_words {
			let choices = match self.table.choices(&prefix.key()) {
				Some(choices) if !choices.is_empty() => choices,
				_ => {
					debug!("dead end after {} words at {:?}", words.len(), prefix.key());
					break;
				}
			};
			let next = &choices[rng.next_index(choices.len())];
			prefix.shift(next);
			words.push(next.clone());
		}

		words
	}

	/// Returns the generated words joined by single spaces.
	///
	/// The result is empty when no word could be produced.
	pub fn generate_text<R: RandomSource + ?Sized>(&self, max_words: usize, rng: &mut R) -> String {
		self.generate(max_words, rng).join(" ")
	}
}
