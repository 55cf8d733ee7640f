use std::error::Error;
use std::io;

use clap::Parser;
use log::{error, info};

use ngram_lang_core::io::{parse_source_list, read_source_list, resolve_documents};
use ngram_lang_core::{SourceMap, best_matches, cache, corpus};

mod cli;
mod report;

use cli::{Cli, MatchLimit};

fn main() -> Result<(), Box<dyn Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
	let cli = Cli::parse();
	let max_depth = cli.max_depth();

	let mut sources: SourceMap = match &cli.source {
		Some(path) => read_source_list(path)?,
		None => parse_source_list(io::stdin().lock())?,
	};

	let mut unknowns = sources.remove(&cli.unknown).unwrap_or_default();
	unknowns.extend(cli.classify.iter().flat_map(resolve_documents));
	info!("{} reference languages, {} documents to classify", sources.len(), unknowns.len());

	let references = match &cli.data {
		Some(path) => cache::load_or_build(path, &sources, max_depth, cli.jobs)?,
		None => corpus::read_languages(&sources, max_depth, cli.jobs)?,
	};

	let plural = cli.matches != MatchLimit::Count(1);
	for unknown in &unknowns {
		match best_matches(unknown, &references, max_depth, cli.matches.as_option()) {
			Ok(matches) => println!("{}", report::format_report(unknown, &matches, plural)),
			Err(e) => error!("cannot classify {}: {e}", unknown.display()),
		}
	}

	Ok(())
}
