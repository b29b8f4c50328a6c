use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{ChainError, Result};

/// Path accepted by [`open_input`] to read from standard input.
pub const STDIN_PATH: &str = "-";

/// Lazy source of whitespace-delimited words.
///
/// - Reads the underlying stream one line at a time
/// - Invalid UTF-8 is decoded lossily
/// - Exhaustion ends the iteration, it is not an error
/// - A read error is yielded once, then the iterator is fused
pub struct Tokens<R> {
	reader: R,
	buffer: Vec<u8>,
	pending: VecDeque<String>,
	done: bool,
}

impl<R: BufRead> Tokens<R> {
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			buffer: Vec::new(),
			pending: VecDeque::new(),
			done: false,
		}
	}
}

impl<R: BufRead> Iterator for Tokens<R> {
	type Item = io::Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(word) = self.pending.pop_front() {
				return Some(Ok(word));
			}
			if self.done {
				return None;
			}

			self.buffer.clear();
			match self.reader.read_until(b'\n', &mut self.buffer) {
				Ok(0) => {
					self.done = true;
					return None;
				}
				Ok(_) => {
					let line = String::from_utf8_lossy(&self.buffer);
					self.pending.extend(line.split_whitespace().map(str::to_owned));
				}
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => {
					self.done = true;
					return Some(Err(e));
				}
			}
		}
	}
}

/// Opens a text input as a buffered reader.
///
/// `"-"` designates standard input.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
	let path = path.as_ref();
	if path == Path::new(STDIN_PATH) {
		return Ok(Box::new(BufReader::new(io::stdin())));
	}
	let file = File::open(path).map_err(|source| ChainError::Open {
		path: path.to_path_buf(),
		source,
	})?;
	Ok(Box::new(BufReader::new(file)))
}

/// Builds the temporary sibling path used while a file is being written.
///
/// Example:
/// `data/model.txt` → `data/.model.txt.tmp`
pub fn build_temp_path<P: AsRef<Path>>(output_path: P) -> io::Result<PathBuf> {
	let output_path = output_path.as_ref();

	let parent = output_path.parent().unwrap_or_else(|| Path::new("."));
	let file_name = output_path
		.file_name()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Output path has no filename"))?;

	let mut temp_name = std::ffi::OsString::from(".");
	temp_name.push(file_name);
	temp_name.push(".tmp");

	Ok(parent.join(temp_name))
}
