use std::path::Path;

use log::debug;

use super::language::Language;
use crate::error::Result;

/// Similarity of one reference language to an unknown profile.
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
	/// Reference language name.
	pub name: String,
	/// Cosine similarity in `[0, 1]`.
	pub score: f64,
}

/// Compares `unknown` against every reference and orders the results by
/// decreasing score.
///
/// Equal scores keep the order in which `known` yields them.
pub fn rank<'a, I, S>(unknown: &Language, known: I) -> Vec<Match>
where
	I: IntoIterator<Item = (S, &'a Language)>,
	S: Into<String>,
{
	let mut matches: Vec<Match> = known
		.into_iter()
		.map(|(name, language)| Match { name: name.into(), score: unknown.compare(language) })
		.collect();

	// Stable: ties stay in insertion order.
	matches.sort_by(|a, b| b.score.total_cmp(&a.score));
	matches
}

/// Same as [`rank`], keeping only the first `limit` matches
/// (all of them when `limit` is `None`).
pub fn top_matches<'a, I, S>(unknown: &Language, known: I, limit: Option<usize>) -> Vec<Match>
where
	I: IntoIterator<Item = (S, &'a Language)>,
	S: Into<String>,
{
	let mut matches = rank(unknown, known);
	if let Some(limit) = limit {
		matches.truncate(limit);
	}
	matches
}

/// Profiles the document at `path` and returns its best matches among
/// `references`.
///
/// # Errors
/// Returns an error if `max_depth < 1` or the document cannot be read.
pub fn best_matches<P: AsRef<Path>>(
	path: P,
	references: &[(String, Language)],
	max_depth: usize,
	limit: Option<usize>,
) -> Result<Vec<Match>> {
	let mut unknown = Language::new(max_depth)?;
	unknown.ingest_file(&path)?;
	debug!("classifying {} against {} references", path.as_ref().display(), references.len());

	Ok(top_matches(&unknown, references.iter().map(|(name, language)| (name.as_str(), language)), limit))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn profile(text: &str) -> Language {
		let mut language = Language::new(3).unwrap();
		language.ingest_str(text);
		language
	}

	fn references() -> Vec<(String, Language)> {
		vec![
			("far".to_owned(), profile("zzz qqq xxx")),
			("close".to_owned(), profile("the cat and the hat")),
			("exact".to_owned(), profile("the cat")),
		]
	}

	fn names(matches: &[Match]) -> Vec<&str> {
		matches.iter().map(|m| m.name.as_str()).collect()
	}

	#[test]
	fn rank_orders_by_score() {
		let unknown = profile("the cat");
		let references = references();
		let matches = rank(&unknown, references.iter().map(|(n, l)| (n.as_str(), l)));

		assert_eq!(names(&matches), vec!["exact", "close", "far"]);
		assert!((matches[0].score - 1.0).abs() < 1e-9);
		assert_eq!(matches[2].score, 0.0);
		assert!(matches.windows(2).all(|pair| pair[0].score >= pair[1].score));
	}

	#[test]
	fn ties_keep_insertion_order() {
		let unknown = profile("abc");
		let same = profile("xyz");
		let known = vec![("second", &same), ("first", &same), ("third", &same)];
		let matches = rank(&unknown, known);
		assert_eq!(names(&matches), vec!["second", "first", "third"]);
	}

	#[test]
	fn top_matches_is_a_prefix_of_rank() {
		let unknown = profile("the hat");
		let references = references();
		let all = rank(&unknown, references.iter().map(|(n, l)| (n.as_str(), l)));

		for limit in 0..5 {
			let top = top_matches(&unknown, references.iter().map(|(n, l)| (n.as_str(), l)), Some(limit));
			assert_eq!(top.len(), limit.min(references.len()));
			assert_eq!(top, all[..top.len()]);
		}
		let unlimited = top_matches(&unknown, references.iter().map(|(n, l)| (n.as_str(), l)), None);
		assert_eq!(unlimited, all);
	}

	#[test]
	fn rank_without_references_is_empty() {
		let unknown = profile("anything");
		let known: Vec<(String, &Language)> = Vec::new();
		assert!(rank(&unknown, known).is_empty());
	}
}
