//! Top-level module for the word chain system.
//!
//! The pipeline is split into:
//! - The sliding prefix window (`Prefix`)
//! - The canonical prefix → suffix → count model (`FrequencyTable`)
//! - Its construction from token sources (`ChainBuilder`)
//! - The on-disk table format (`codec`)
//! - The expanded, sampling-ready model (`ChoiceTable`)
//! - Bounded random walks over that model (`Generator`)

/// Fixed-length word window used as a lookup key.
pub mod prefix;

/// Canonical prefix → suffix → count accumulator.
pub mod frequency_table;

/// Folds token sources into a `FrequencyTable`.
pub mod chain_builder;

/// Expanded model where each suffix is repeated by its count.
pub mod choice_table;

/// Line-oriented encoder / decoder of frequency tables.
pub mod codec;

/// Weighted random generation over a `ChoiceTable`.
pub mod generator;
