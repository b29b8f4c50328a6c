//! Line-oriented frequency table format.
//!
//! ```text
//! 2
//! "" "" I 1
//! I am a 1 not 1
//! ```
//!
//! - Line 1: the prefix length
//! - One line per prefix key: the `prefix_len` prefix words, then a flat
//!   sequence of `suffix count` pairs
//! - Fields are separated by a single space
//! - Empty prefix slots are written as `""`
//!
//! Decoding produces a [`ChoiceTable`] directly: every suffix is repeated
//! `count` times in its prefix's choice list.

use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{ChainError, Result};
use crate::io::{build_temp_path, open_input};
use crate::model::choice_table::ChoiceTable;
use crate::model::frequency_table::FrequencyTable;
use crate::model::prefix::{decode_word, encode_word};

/// Writes `table` to `writer`.
///
/// Prefix keys and suffixes are written in sorted order so that equal
/// tables produce identical files. Readers must not rely on that order.
pub fn encode<W: Write>(table: &FrequencyTable, mut writer: W) -> Result<()> {
	writeln!(writer, "{}", table.prefix_len())?;

	let mut entries: Vec<_> = table.iter().collect();
	entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

	for (key, suffixes) in entries {
		let fields: Vec<&str> = key.split(' ').map(encode_word).collect();
		write!(writer, "{}", fields.join(" "))?;

		let mut suffixes: Vec<_> = suffixes.iter().collect();
		suffixes.sort_unstable_by(|a, b| a.0.cmp(b.0));
		for (suffix, count) in suffixes {
			write!(writer, " {} {}", suffix, count)?;
		}
		writeln!(writer)?;
	}

	writer.flush()?;
	Ok(())
}

/// Reads a frequency table and expands it into a [`ChoiceTable`].
///
/// # Errors
/// - `ChainError::Io` if the stream cannot be read
/// - `ChainError::Format` on the first invalid line (bad fields, invalid
///   UTF-8, a count too large to expand), nothing is returned for the
///   lines before it
///
/// Blank lines are accepted only at the end of the stream.
pub fn decode<R: BufRead>(mut reader: R) -> Result<ChoiceTable> {
	let mut buffer = Vec::new();

	let header = match read_line(&mut reader, &mut buffer, 1)? {
		Some(line) => line,
		None => return Err(ChainError::format(1, "missing prefix length")),
	};
	let prefix_len: usize = header
		.trim()
		.parse()
		.map_err(|_| ChainError::format(1, format!("invalid prefix length {:?}", header)))?;
	if prefix_len == 0 {
		return Err(ChainError::format(1, "prefix length must be >= 1"));
	}

	let mut table = ChoiceTable::new(prefix_len)?;
	let mut first_blank: Option<usize> = None;
	let mut number = 1;

	loop {
		number += 1;
		let Some(line) = read_line(&mut reader, &mut buffer, number)? else {
			break;
		};

		if line.trim().is_empty() {
			first_blank.get_or_insert(number);
			continue;
		}
		if let Some(blank) = first_blank {
			return Err(ChainError::format(
				number,
				format!("unexpected data after blank line {}", blank),
			));
		}

		decode_line(&mut table, &line, number)?;
	}

	debug!("decoded {} prefixes of {} words", table.len(), prefix_len);
	Ok(table)
}

/// Reads line `number` without its `\n` / `\r\n` terminator.
///
/// Returns `None` at end of stream. Invalid UTF-8 is a format error.
fn read_line<R: BufRead>(reader: &mut R, buffer: &mut Vec<u8>, number: usize) -> Result<Option<String>> {
	buffer.clear();
	if reader.read_until(b'\n', buffer)? == 0 {
		return Ok(None);
	}
	if buffer.last() == Some(&b'\n') {
		buffer.pop();
		if buffer.last() == Some(&b'\r') {
			buffer.pop();
		}
	}
	match String::from_utf8(std::mem::take(buffer)) {
		Ok(line) => Ok(Some(line)),
		Err(_) => Err(ChainError::format(number, "invalid UTF-8")),
	}
}

fn decode_line(table: &mut ChoiceTable, line: &str, number: usize) -> Result<()> {
	let prefix_len = table.prefix_len();
	let fields: Vec<&str> = line.split(' ').collect();

	if fields.len() < prefix_len {
		return Err(ChainError::format(
			number,
			format!("expected {} prefix words, found {}", prefix_len, fields.len()),
		));
	}

	let (prefix, tail) = fields.split_at(prefix_len);
	if tail.len() % 2 != 0 {
		return Err(ChainError::format(
			number,
			format!("odd number of suffix/count fields ({})", tail.len()),
		));
	}

	let key = prefix.iter().map(|field| decode_word(field)).collect::<Vec<_>>().join(" ");
	table.touch(&key);

	for pair in tail.chunks_exact(2) {
		let (suffix, count) = (pair[0], pair[1]);
		if suffix.is_empty() {
			return Err(ChainError::format(number, "empty suffix"));
		}
		let count: usize = count
			.parse()
			.map_err(|_| ChainError::format(number, format!("invalid count {:?} for suffix {:?}", count, suffix)))?;
		if count == 0 {
			warn!("line {}: suffix {:?} has a zero count", number, suffix);
		}
		table
			.try_push(&key, suffix, count)
			.map_err(|_| ChainError::format(number, format!("count {} too large for suffix {:?}", count, suffix)))?;
	}

	Ok(())
}

/// Writes `table` to the file at `path`.
///
/// The table is written to a temporary sibling first and renamed over
/// `path` once complete, so a failure never leaves a partial table behind.
pub fn store<P: AsRef<Path>>(table: &FrequencyTable, path: P) -> Result<()> {
	let path = path.as_ref();
	let temp_path = build_temp_path(path).map_err(|source| ChainError::Create {
		path: path.to_path_buf(),
		source,
	})?;

	if let Err(e) = write_file(table, &temp_path) {
		let _ = fs::remove_file(&temp_path);
		return Err(e);
	}

	fs::rename(&temp_path, path).map_err(|source| {
		let _ = fs::remove_file(&temp_path);
		ChainError::Create { path: path.to_path_buf(), source }
	})?;

	info!(
		"stored {} prefixes ({} transitions) to {}",
		table.len(),
		table.transitions(),
		path.display()
	);
	Ok(())
}

fn write_file(table: &FrequencyTable, path: &Path) -> Result<()> {
	let file = File::create(path).map_err(|source| ChainError::Create {
		path: path.to_path_buf(),
		source,
	})?;
	let mut writer = BufWriter::new(file);
	encode(table, &mut writer)?;
	let file = writer.into_inner().map_err(|e| e.into_error())?;
	file.sync_all()?;
	Ok(())
}

/// Loads the table stored at `path` (or standard input for `"-"`).
pub fn load<P: AsRef<Path>>(path: P) -> Result<ChoiceTable> {
	let reader = open_input(&path)?;
	let table = decode(reader).map_err(|e| e.with_path(path.as_ref()))?;
	info!("loaded {} prefixes from {}", table.len(), path.as_ref().display());
	Ok(table)
}
