//! Console report of the best matches for a document.

use std::path::Path;

use ngram_lang_core::Match;

/// Formats the matches found for `document`.
///
/// Names are padded to the longest one and scores shown as percentages.
/// `plural` selects the "match"/"matches" header wording.
pub fn format_report(document: &Path, matches: &[Match], plural: bool) -> String {
	let mut out = format!(
		"Best match{} for '{}'",
		if plural { "es" } else { "" },
		document.display()
	);

	let pad = matches.iter().map(|m| m.name.chars().count()).max().unwrap_or(0);
	for m in matches {
		out.push_str(&format!("\n\t{:<pad$}\t{:>6.2}%", m.name, m.score * 100.0));
	}
	out
}
