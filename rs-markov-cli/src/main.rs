//! Command line front-end of the word chain generator.
//!
//! ```bash
//! # Build a model of 2-word prefixes from two texts
//! markov build 2 model.txt first.txt second.txt
//!
//! # Generate at most 100 words from it
//! markov generate model.txt 100
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_markov_core::ChainError;
use rs_markov_core::model::chain_builder::ChainBuilder;
use rs_markov_core::model::codec;
use rs_markov_core::model::generator::Generator;

#[derive(Parser, Debug)]
#[command(author, version, about = "Markov chain text generator", long_about = None)]
struct Cli {
	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, global = true, action = ArgAction::Count)]
	quiet: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Build a frequency table from input texts
	#[command(alias = "read")]
	Build(BuildArgs),
	/// Generate text from a frequency table
	Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
	/// Number of words in each prefix
	prefix_len: usize,

	/// Frequency table to write
	output: PathBuf,

	/// Input texts, "-" reads standard input
	#[arg(required = true)]
	inputs: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
	/// Frequency table to read
	model: PathBuf,

	/// Maximum number of words to generate
	words: usize,

	/// Seed for reproducible output
	#[arg(long, env = "MARKOV_SEED")]
	seed: Option<u64>,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	let result = match cli.command {
		Commands::Build(args) => run_build(args),
		Commands::Generate(args) => run_generate(args),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			if e.is_format() {
				eprintln!("error: {} (not a valid frequency table)", e);
			} else {
				eprintln!("error: {}", e);
			}
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: u8, quiet: u8) {
	use log::LevelFilter;

	let level = if quiet > 0 {
		match quiet {
			1 => LevelFilter::Error,
			_ => LevelFilter::Off,
		}
	} else {
		match verbose {
			0 => LevelFilter::Warn,
			1 => LevelFilter::Info,
			2 => LevelFilter::Debug,
			_ => LevelFilter::Trace,
		}
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
	if verbose > 0 || quiet > 0 {
		builder.filter_level(level);
	}
	builder.format_timestamp_millis();
	let _ = builder.try_init();
}

fn run_build(args: BuildArgs) -> Result<(), ChainError> {
	let mut builder = ChainBuilder::new(args.prefix_len)?;
	let mut total = 0;
	for input in &args.inputs {
		total += builder.add_file(input)?;
	}
	info!("read {} words from {} input(s)", total, args.inputs.len());

	codec::store(builder.table(), &args.output)
}

fn run_generate(args: GenerateArgs) -> Result<(), ChainError> {
	let generator = Generator::from_file(&args.model)?;

	let text = match args.seed {
		Some(seed) => generator.generate_text(args.words, &mut StdRng::seed_from_u64(seed)),
		None => generator.generate_text(args.words, &mut rand::rng()),
	};
	println!("{}", text);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_build() {
		let cli = Cli::try_parse_from(["markov", "build", "2", "out.txt", "a.txt", "b.txt"]).unwrap();
		match cli.command {
			Commands::Build(args) => {
				assert_eq!(args.prefix_len, 2);
				assert_eq!(args.output, PathBuf::from("out.txt"));
				assert_eq!(args.inputs, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn read_is_an_alias_of_build() {
		let cli = Cli::try_parse_from(["markov", "read", "1", "out.txt", "-"]).unwrap();
		assert!(matches!(cli.command, Commands::Build(_)));
	}

	#[test]
	fn build_requires_inputs() {
		assert!(Cli::try_parse_from(["markov", "build", "2", "out.txt"]).is_err());
	}

	#[test]
	fn build_rejects_zero_prefix() {
		let args = BuildArgs {
			prefix_len: 0,
			output: PathBuf::from("never-written.txt"),
			inputs: vec![PathBuf::from("never-read.txt")],
		};
		assert!(matches!(run_build(args), Err(ChainError::InvalidPrefixLen(0))));
	}

	#[test]
	fn parses_generate_with_seed() {
		let cli = Cli::try_parse_from(["markov", "-v", "generate", "model.txt", "25", "--seed", "7"]).unwrap();
		assert_eq!(cli.verbose, 1);
		match cli.command {
			Commands::Generate(args) => {
				assert_eq!(args.model, PathBuf::from("model.txt"));
				assert_eq!(args.words, 25);
				assert_eq!(args.seed, Some(7));
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn rejects_unknown_command() {
		assert!(Cli::try_parse_from(["markov", "train", "x"]).is_err());
	}

	#[test]
	fn rejects_non_numeric_word_count() {
		assert!(Cli::try_parse_from(["markov", "generate", "model.txt", "many"]).is_err());
	}
}
