use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while building, persisting or loading a chain.
///
/// Opening and creating files are kept apart from plain stream failures so
/// that callers can tell the operator which side failed.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
	#[error("could not open {}: {source}", .path.display())]
	Open {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("could not create {}: {source}", .path.display())]
	Create {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("could not read {}: {source}", .path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	/// Invalid frequency table content. `line` is 1-based.
	#[error("invalid model file, line {line}: {reason}")]
	Format { line: usize, reason: String },

	#[error("prefix length must be >= 1, got {0}")]
	InvalidPrefixLen(usize),

	#[error("prefix length mismatch: expected {expected}, found {found}")]
	PrefixLenMismatch { expected: usize, found: usize },
}

impl ChainError {
	pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
		ChainError::Format { line, reason: reason.into() }
	}

	/// Attaches `path` to a bare stream error, other errors are unchanged.
	pub(crate) fn with_path(self, path: &Path) -> Self {
		match self {
			ChainError::Io(source) => ChainError::Read { path: path.to_path_buf(), source },
			other => other,
		}
	}

	/// Returns `true` when the error comes from invalid model content
	/// rather than from the file system.
	pub fn is_format(&self) -> bool {
		matches!(self, ChainError::Format { .. })
	}
}

pub type Result<T> = std::result::Result<T, ChainError>;
