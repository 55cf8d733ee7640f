//! Command line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

const ABOUT: &str = "Compares documents written in unknown languages to known languages.";

const LONG_ABOUT: &str = "Compares documents written in unknown languages to known languages.

A source list must be provided with known languages, with lines of the form
    English english1.txt english2.txt
    French  french/
    English english3.txt
    Unknown tbd.txt
where each line has a language name and the name of one or more files written
in that language, or of a directory containing files in that language.
Documents listed under the unknown keyword are classified.";

/// How many matches to report per document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchLimit {
	All,
	Count(usize),
}

impl MatchLimit {
	/// `None` stands for every match.
	pub fn as_option(self) -> Option<usize> {
		match self {
			MatchLimit::All => None,
			MatchLimit::Count(n) => Some(n),
		}
	}
}

impl FromStr for MatchLimit {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.eq_ignore_ascii_case("all") {
			return Ok(MatchLimit::All);
		}
		s.parse::<usize>()
			.map(MatchLimit::Count)
			.map_err(|_| format!("expected a number or 'all', got '{s}'"))
	}
}

#[derive(Parser, Debug)]
#[command(name = "ngram-lang")]
#[command(version)]
#[command(about = ABOUT, long_about = LONG_ABOUT)]
pub struct Cli {
	/// Longest n-gram stored for each language
	#[arg(short = 'n', long = "n-gram-max", value_name = "N", default_value_t = 3,
		value_parser = clap::value_parser!(u64).range(1..))]
	pub n_gram_max: u64,

	/// File listing the languages to process (defaults to stdin)
	#[arg(short, long, value_name = "FILE")]
	pub source: Option<PathBuf>,

	/// Other files to classify in addition to those marked unknown (may be repeated)
	#[arg(short, long, value_name = "FILE")]
	pub classify: Vec<PathBuf>,

	/// Number of matches to display, a number or 'all'
	#[arg(short, long, value_name = "N|all", default_value = "5")]
	pub matches: MatchLimit,

	/// Keyword designating unknown languages in the source list
	#[arg(short, long, value_name = "KEYWORD", default_value = "Unknown")]
	pub unknown: String,

	/// File used as cache for the reference languages (read and written)
	#[arg(short, long, value_name = "FILE")]
	pub data: Option<PathBuf>,

	/// Maximum worker threads used to build reference languages (0 = 4 per CPU)
	#[arg(short, long, value_name = "N", default_value_t = 0)]
	pub jobs: usize,
}

impl Cli {
	/// N-gram length as the library expects it.
	pub fn max_depth(&self) -> usize {
		self.n_gram_max as usize
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_flags() {
		let cli = Cli::parse_from(["ngram-lang"]);
		assert_eq!(cli.max_depth(), 3);
		assert_eq!(cli.matches, MatchLimit::Count(5));
		assert_eq!(cli.unknown, "Unknown");
		assert!(cli.source.is_none());
		assert!(cli.classify.is_empty());
		assert!(cli.data.is_none());
	}

	#[test]
	fn parses_all_flags() {
		let cli = Cli::parse_from([
			"ngram-lang", "-n", "4", "-s", "langs.txt", "-c", "a.txt", "-c", "b.txt", "-m", "all", "-u", "Mystery",
			"-d", "cache.bin", "-j", "2",
		]);
		assert_eq!(cli.max_depth(), 4);
		assert_eq!(cli.source, Some(PathBuf::from("langs.txt")));
		assert_eq!(cli.classify, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
		assert_eq!(cli.matches, MatchLimit::All);
		assert_eq!(cli.unknown, "Mystery");
		assert_eq!(cli.data, Some(PathBuf::from("cache.bin")));
		assert_eq!(cli.jobs, 2);
	}

	#[test]
	fn rejects_zero_depth_and_bad_limits() {
		assert!(Cli::try_parse_from(["ngram-lang", "-n", "0"]).is_err());
		assert!(Cli::try_parse_from(["ngram-lang", "-m", "some"]).is_err());
	}

	#[test]
	fn match_limit_parsing() {
		assert_eq!("ALL".parse::<MatchLimit>(), Ok(MatchLimit::All));
		assert_eq!("0".parse::<MatchLimit>(), Ok(MatchLimit::Count(0)));
		assert_eq!(MatchLimit::Count(3).as_option(), Some(3));
		assert_eq!(MatchLimit::All.as_option(), None);
	}
}
