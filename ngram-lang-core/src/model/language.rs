use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::io::{self, Read};
use std::path::Path;

use log::debug;

use super::trie::NGramTrie;
use crate::error::Result;

/// Lowercases a character; the default standardization step.
pub fn case_fold(c: char) -> String {
	c.to_lowercase().collect()
}

/// Leaves a character untouched.
pub fn identity(c: char) -> String {
	c.to_string()
}

/// Character transform pipeline applied to documents before counting.
///
/// For every character read:
/// 1. a non-alphabetic character becomes `non_alpha_substitute`
/// 2. a whitespace character repeating the end of the current n-gram is dropped
/// 3. anything else goes through `standardize`
///
/// `start_delimiter` and `end_delimiter` frame each document and go
/// through the same steps, so word boundaries look alike in every document.
#[derive(Clone, Debug)]
pub struct TransformConfig {
	/// Replacement for every non-alphabetic character.
	pub non_alpha_substitute: char,
	/// Standardization of kept characters (may yield zero or several characters).
	pub standardize: fn(char) -> String,
	/// Text read before each document.
	pub start_delimiter: String,
	/// Text read after each document.
	pub end_delimiter: String,
}

impl Default for TransformConfig {
	fn default() -> Self {
		Self {
			non_alpha_substitute: ' ',
			standardize: case_fold,
			start_delimiter: " ".to_owned(),
			end_delimiter: " ".to_owned(),
		}
	}
}

impl TransformConfig {
	/// Default pipeline without case folding.
	pub fn verbatim() -> Self {
		Self { standardize: identity, ..Self::default() }
	}

	/// Transforms one input character, given the last character of the
	/// n-gram being built.
	///
	/// An empty result means the character is dropped.
	pub fn transform(&self, c: char, previous: Option<char>) -> String {
		let c = if c.is_alphabetic() { c } else { self.non_alpha_substitute };
		if c.is_whitespace() && previous == Some(c) {
			return String::new();
		}
		(self.standardize)(c)
	}
}

/// Sliding buffer of the last `size` transformed characters.
struct Window {
	chars: VecDeque<char>,
	size: usize,
}

impl Window {
	fn new(size: usize) -> Self {
		Self { chars: VecDeque::with_capacity(size + 1), size }
	}

	fn last(&self) -> Option<char> {
		self.chars.back().copied()
	}

	/// Appends transform output and returns the full window if it now
	/// holds exactly `size` characters. Empty output never yields a window.
	fn push(&mut self, output: &str) -> Option<&[char]> {
		if output.is_empty() {
			return None;
		}
		self.chars.extend(output.chars());
		while self.chars.len() > self.size {
			self.chars.pop_front();
		}
		if self.chars.len() == self.size {
			Some(self.chars.make_contiguous())
		} else {
			None
		}
	}
}

/// N-gram profile of a language or of a single document.
///
/// Wraps an `NGramTrie` filled through a `TransformConfig` pipeline,
/// one document at a time.
///
/// # Responsibilities
/// - Turn raw text into fixed-length n-grams (`ingest`)
/// - Compare two profiles by cosine similarity (`compare`)
/// - Merge partial profiles built in parallel (`merge`)
#[derive(Clone, Debug)]
pub struct Language {
	trie: NGramTrie,
	config: TransformConfig,
	/// Number of documents ingested.
	documents: usize,
}

impl Language {
	/// Creates an empty profile counting n-grams of `max_depth` characters,
	/// with the default transform pipeline.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `max_depth < 1`.
	pub fn new(max_depth: usize) -> Result<Self> {
		Self::with_config(max_depth, TransformConfig::default())
	}

	/// Creates an empty profile using a custom transform pipeline.
	///
	/// # Parameters
	/// - `max_depth`: length of the n-grams counted (>= 1).
	/// - `config`: character pipeline applied to every ingested document.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `max_depth < 1`.
	pub fn with_config(max_depth: usize, config: TransformConfig) -> Result<Self> {
		Ok(Self { trie: NGramTrie::new(max_depth)?, config, documents: 0 })
	}

	pub(crate) fn from_parts(trie: NGramTrie, config: TransformConfig, documents: usize) -> Self {
		Self { trie, config, documents }
	}

	/// Returns the length of the n-grams this profile counts.
	pub fn max_depth(&self) -> usize {
		self.trie.max_depth()
	}

	/// Returns the underlying counting trie (read-only).
	pub fn trie(&self) -> &NGramTrie {
		&self.trie
	}

	/// Returns the transform pipeline applied by `ingest`.
	pub fn config(&self) -> &TransformConfig {
		&self.config
	}

	/// Returns how many documents were ingested, merged profiles included.
	///
	/// # Notes
	/// A document too short to fill a single n-gram still counts.
	pub fn documents(&self) -> usize {
		self.documents
	}

	/// Shortcut for [`NGramTrie::frequencies`].
	pub fn frequencies(&self, depth: Option<usize>) -> HashMap<String, f64> {
		self.trie.frequencies(depth)
	}

	/// Ingests one document given as a character stream.
	///
	/// The stream is framed by the start and end delimiters, transformed
	/// character by character, and every time the sliding window holds
	/// exactly `max_depth` characters it is counted as one n-gram.
	pub fn ingest<I: IntoIterator<Item = char>>(&mut self, document: I) {
		let Self { trie, config, documents } = self;
		let before = trie.total(trie.max_depth());

		let mut window = Window::new(trie.max_depth());
		let framed = config
			.start_delimiter
			.chars()
			.chain(document)
			.chain(config.end_delimiter.chars());
		for c in framed {
			let output = config.transform(c, window.last());
			if let Some(gram) = window.push(&output) {
				trie.add_chars(gram, 1);
			}
		}

		*documents += 1;
		debug!("document {} added {} n-grams", documents, trie.total(trie.max_depth()) - before);
	}

	/// Ingests one document held in memory.
	pub fn ingest_str(&mut self, text: &str) {
		self.ingest(text.chars());
	}

	/// Reads a whole document from `reader`, then ingests it.
	///
	/// # Notes
	/// - The reader is consumed to the end before anything is counted, so
	///   line breaks are seen as ordinary separators.
	/// - Nothing is counted if reading fails or the bytes are not UTF-8.
	pub fn ingest_reader<R: Read>(&mut self, mut reader: R) -> io::Result<()> {
		let mut text = String::new();
		reader.read_to_string(&mut text)?;
		self.ingest_str(&text);
		Ok(())
	}

	/// Reads and ingests a document file.
	///
	/// # Errors
	/// Returns an I/O error if the file cannot be read as UTF-8 text;
	/// the profile is left unchanged.
	pub fn ingest_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
		let text = crate::io::read_document(&path)?;
		self.ingest_str(&text);
		Ok(())
	}

	/// Cosine similarity between the n-gram frequency vectors of both profiles.
	///
	/// Compared at the smaller of the two maximum depths. Returns 0.0 when
	/// either vector is empty.
	pub fn compare(&self, other: &Self) -> f64 {
		let depth = self.max_depth().min(other.max_depth());
		cosine_similarity(&self.frequency_vector(depth), &other.frequency_vector(depth))
	}

	/// Frequencies at `depth`, sorted by n-gram.
	fn frequency_vector(&self, depth: usize) -> Vec<(String, f64)> {
		let total = self.trie.total(depth);
		if total == 0 {
			return Vec::new();
		}
		self.trie
			.counts_at(depth)
			.into_iter()
			.map(|(gram, count)| (gram, count as f64 / total as f64))
			.collect()
	}

	/// Merges another profile into this one.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the maximum depths differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		self.trie.merge(&other.trie)?;
		self.documents += other.documents;
		Ok(())
	}
}

/// Dot product of two frequency vectors sorted by n-gram.
fn dot_product(a: &[(String, f64)], b: &[(String, f64)]) -> f64 {
	let (mut i, mut j) = (0, 0);
	let mut sum = 0.0;
	while i < a.len() && j < b.len() {
		match a[i].0.cmp(&b[j].0) {
			Ordering::Less => i += 1,
			Ordering::Greater => j += 1,
			Ordering::Equal => {
				sum += a[i].1 * b[j].1;
				i += 1;
				j += 1;
			}
		}
	}
	sum
}

fn norm(a: &[(String, f64)]) -> f64 {
	a.iter().map(|(_, f)| f * f).sum::<f64>().sqrt()
}

fn cosine_similarity(a: &[(String, f64)], b: &[(String, f64)]) -> f64 {
	let denominator = norm(a) * norm(b);
	if denominator == 0.0 {
		return 0.0;
	}
	(dot_product(a, b) / denominator).clamp(0.0, 1.0)
}

impl fmt::Display for Language {
	/// One `'gram'  frequency` line per n-gram, least frequent first.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut grams = self.frequency_vector(self.max_depth());
		grams.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

		for (index, (gram, frequency)) in grams.iter().enumerate() {
			if index > 0 {
				writeln!(f)?;
			}
			write!(f, "'{gram}'  {frequency}")?;
		}
		Ok(())
	}
}
