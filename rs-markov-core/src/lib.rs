//! Word-level Markov chain text generation library.
//!
//! This crate provides the full build / persist / generate pipeline:
//! - Prefix windows of a fixed number of words
//! - Frequency accumulation from one or more token sources
//! - A line-oriented frequency table format on disk
//! - Weighted random generation with an injectable random source
//!
//! Building and generating are independent phases connected only by the
//! frequency table file.

/// Chain models, table codec and generation logic.
pub mod model;

/// Error type shared by every fallible operation of the crate.
pub mod error;

/// Token source and file helpers (input opening, atomic output paths).
pub mod io;

pub use error::{ChainError, Result};
