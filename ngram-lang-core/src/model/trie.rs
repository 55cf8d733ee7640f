use std::collections::HashMap;
use std::fmt;

use rand::Rng;

use super::node::Node;
use crate::error::{LangError, Result};

/// Exported `(n-gram, count)` pairs of a single depth.
pub type DepthCounts = Vec<(String, u64)>;

/// Character-keyed counting trie of n-grams up to a fixed length.
///
/// Every inserted n-gram increments each node on its path, so a node at
/// depth `d` counts the occurrences of its `d`-character prefix.
///
/// # Responsibilities
/// - Count n-grams incrementally (`add`)
/// - Derive frequency distributions at any depth (`frequencies`)
/// - Predict a following character by weighted sampling (`next_most_likely`, `next_random`)
/// - Merge, export and restore counts (parallel builds and caching)
///
/// # Invariants
/// - `max_depth` is always >= 1 and never changes
/// - `depth_totals[d]` equals the summed count of all nodes at depth `d`
/// - No stored path is longer than `max_depth`
#[derive(Clone, Debug, PartialEq)]
pub struct NGramTrie {
	/// Longest n-gram tracked.
	max_depth: usize,

	/// Root node, standing for the empty n-gram.
	root: Node,

	/// Summed counts per depth, indexed `0..=max_depth`.
	/// Used as frequency denominators without walking the trie.
	depth_totals: Vec<u64>,
}

/// Which node the prediction search accepts.
#[derive(Clone, Copy, PartialEq)]
enum Fallback {
	/// Stop at the longest matching suffix, even if it has no continuation.
	FirstMatch,
	/// Keep shrinking until a matching node has at least one child.
	RequireChildren,
}

impl NGramTrie {
	/// Creates an empty trie tracking n-grams up to `max_depth` characters.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `max_depth < 1`.
	pub fn new(max_depth: usize) -> Result<Self> {
		if max_depth < 1 {
			return Err(LangError::InvalidArgument("max_depth must be >= 1".to_owned()));
		}
		Ok(Self { max_depth, root: Node::default(), depth_totals: vec![0; max_depth + 1] })
	}

	/// Returns the longest n-gram length this trie tracks.
	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	/// Returns the summed count of all n-grams of length `depth`
	/// (0 for depths beyond `max_depth`).
	pub fn total(&self, depth: usize) -> u64 {
		self.depth_totals.get(depth).copied().unwrap_or(0)
	}

	/// Returns `true` if nothing has been counted yet.
	pub fn is_empty(&self) -> bool {
		self.depth_totals[0] == 0
	}

	/// Adds `gram` to the trie `count` times.
	///
	/// - Grams up to `max_depth` characters are stored as a single path.
	/// - Longer grams are broken into every `max_depth`-long window
	///   (stride 1), each inserted `count` times.
	/// - Empty grams and zero counts are ignored.
	pub fn add(&mut self, gram: &str, count: u64) {
		let chars: Vec<char> = gram.chars().collect();
		if chars.len() <= self.max_depth {
			self.add_chars(&chars, count);
			return;
		}
		for window in chars.windows(self.max_depth) {
			self.add_chars(window, count);
		}
	}

	/// Inserts one n-gram of at most `max_depth` characters.
	pub(crate) fn add_chars(&mut self, gram: &[char], count: u64) {
		if gram.is_empty() || count == 0 {
			return;
		}
		debug_assert!(gram.len() <= self.max_depth);
		for total in &mut self.depth_totals[..=gram.len()] {
			*total += count;
		}
		self.root.add_path(gram, count);
	}

	/// Returns the occurrence count of `gram` (0 if never seen).
	///
	/// The empty gram counts everything inserted.
	pub fn count(&self, gram: &str) -> u64 {
		let chars: Vec<char> = gram.chars().collect();
		self.root.walk(&chars).map_or(0, Node::count)
	}

	fn clamp_depth(&self, depth: Option<usize>) -> usize {
		match depth {
			Some(d) if d <= self.max_depth => d,
			_ => self.max_depth,
		}
	}

	/// Returns the observed n-grams of length `depth` with their relative
	/// frequency among all n-grams of that length.
	///
	/// - `None` or a depth above `max_depth` queries `max_depth`.
	/// - Returns an empty map when nothing of that length was counted.
	pub fn frequencies(&self, depth: Option<usize>) -> HashMap<String, f64> {
		let depth = self.clamp_depth(depth);
		let total = self.depth_totals[depth];
		if total == 0 {
			return HashMap::new();
		}
		self.counts_at(depth)
			.into_iter()
			.map(|(gram, count)| (gram, count as f64 / total as f64))
			.collect()
	}

	/// Returns every n-gram of length `depth` with its raw count.
	pub fn counts_at(&self, depth: usize) -> DepthCounts {
		let mut out = Vec::new();
		if depth <= self.max_depth {
			self.root.collect_at(depth, &mut String::new(), &mut out);
		}
		out
	}

	/// Predicts the character following `context` using the thread RNG.
	///
	/// See [`NGramTrie::next_most_likely_with`].
	pub fn next_most_likely(&self, context: &str) -> Option<char> {
		self.next_most_likely_with(context, &mut rand::rng())
	}

	/// Predicts the character following `context`.
	///
	/// Searches the longest suffix of `context` (at most `max_depth - 1`
	/// characters) present in the trie, shrinking down to the empty suffix.
	/// The first matching node decides: one of its children is drawn,
	/// weighted by count.
	///
	/// Returns `None` if the matching node has no continuation or the trie is empty.
	pub fn next_most_likely_with<R: Rng + ?Sized>(&self, context: &str, rng: &mut R) -> Option<char> {
		self.predict(context, Fallback::FirstMatch, rng)
	}

	/// Draws a character following `context` using the thread RNG.
	///
	/// See [`NGramTrie::next_random_with`].
	pub fn next_random(&self, context: &str) -> Option<char> {
		self.next_random_with(context, &mut rand::rng())
	}

	/// Same suffix search as [`NGramTrie::next_most_likely_with`], but a
	/// matching node without children is skipped in favor of a shorter suffix.
	///
	/// Returns `None` only if the trie is empty.
	pub fn next_random_with<R: Rng + ?Sized>(&self, context: &str, rng: &mut R) -> Option<char> {
		self.predict(context, Fallback::RequireChildren, rng)
	}

	fn predict<R: Rng + ?Sized>(&self, context: &str, fallback: Fallback, rng: &mut R) -> Option<char> {
		let chars: Vec<char> = context.chars().collect();
		let longest = chars.len().min(self.max_depth - 1);

		for len in (0..=longest).rev() {
			let suffix = &chars[chars.len() - len..];
			let Some(node) = self.root.walk(suffix) else {
				continue;
			};
			if fallback == Fallback::RequireChildren && !node.has_children() {
				continue;
			}
			return node.pick_child(rng);
		}
		None
	}

	/// Merges another trie into this one; counts of shared n-grams are summed.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the maximum depths differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.max_depth != other.max_depth {
			return Err(LangError::InvalidArgument(format!(
				"max_depth mismatch: self={}, other={}",
				self.max_depth, other.max_depth
			)));
		}
		self.root.merge(&other.root);
		for (total, other_total) in self.depth_totals.iter_mut().zip(&other.depth_totals) {
			*total += other_total;
		}
		Ok(())
	}

	/// Exports the raw counts of every depth, index `d` holding the n-grams
	/// of length `d`. Depth 0 holds the empty gram.
	///
	/// The result can be fed back to [`NGramTrie::from_counts`].
	pub fn export_counts(&self) -> Vec<DepthCounts> {
		(0..=self.max_depth).map(|depth| self.counts_at(depth)).collect()
	}

	/// Rebuilds a trie from counts produced by [`NGramTrie::export_counts`].
	///
	/// # Errors
	/// Returns `InvalidArgument` if:
	/// - `max_depth < 1` or the number of tables is not `max_depth + 1`
	/// - a gram's length differs from its table's depth
	/// - depth 0 holds anything other than a single empty gram
	/// - a gram's prefix is missing, counted less than the gram, or the gram is repeated
	/// - the grams continuing one prefix together outnumber that prefix
	pub fn from_counts(max_depth: usize, counts: Vec<DepthCounts>) -> Result<Self> {
		let mut trie = Self::new(max_depth)?;
		if counts.len() != max_depth + 1 {
			return Err(LangError::InvalidArgument(format!(
				"expected {} count tables, got {}",
				max_depth + 1,
				counts.len()
			)));
		}

		for (depth, table) in counts.into_iter().enumerate() {
			if depth == 0 {
				match table.as_slice() {
					[] => continue,
					[(gram, count)] if gram.is_empty() => {
						trie.root.set_count(*count);
						trie.depth_totals[0] = *count;
						continue;
					}
					_ => {
						return Err(LangError::InvalidArgument(
							"depth 0 must hold only the empty gram".to_owned(),
						));
					}
				}
			}

			for (gram, count) in table {
				let chars: Vec<char> = gram.chars().collect();
				if chars.len() != depth {
					return Err(LangError::InvalidArgument(format!(
						"gram {gram:?} listed at depth {depth}"
					)));
				}
				let (last, prefix) = chars.split_last().ok_or_else(|| {
					LangError::InvalidArgument("empty gram above depth 0".to_owned())
				})?;
				let parent = trie.root.walk_mut(prefix).ok_or_else(|| {
					LangError::InvalidArgument(format!("gram {gram:?} has no parent"))
				})?;
				if parent.count() < count {
					return Err(LangError::InvalidArgument(format!(
						"gram {gram:?} counted more often than its prefix"
					)));
				}
				if !parent.insert_child(*last, count) {
					return Err(LangError::InvalidArgument(format!("gram {gram:?} listed twice")));
				}
				trie.depth_totals[depth] += count;
			}
		}

		if !trie.root.counts_nest() {
			return Err(LangError::InvalidArgument(
				"continuations counted more often than their prefix".to_owned(),
			));
		}
		Ok(trie)
	}

	/// Renders the whole trie, one `"gram" : count` line per node.
	///
	/// Intended for debugging.
	pub fn dump(&self) -> String {
		let mut out = String::new();
		self.root.dump(&mut String::new(), &mut out);
		if out.ends_with('\n') {
			out.pop();
		}
		out
	}
}

impl fmt::Display for NGramTrie {
	/// Formats the frequencies at `max_depth`, sorted by n-gram.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut frequencies: Vec<(String, f64)> = self.frequencies(None).into_iter().collect();
		frequencies.sort_by(|a, b| a.0.cmp(&b.0));

		write!(f, "{{")?;
		for (index, (gram, frequency)) in frequencies.iter().enumerate() {
			if index > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{gram:?}: {frequency}")?;
		}
		write!(f, "}}")
	}
}
