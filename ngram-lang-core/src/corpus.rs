use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use log::{info, warn};

use crate::error::Result;
use crate::model::language::Language;

/// Ordered mapping from language name to the documents written in it.
///
/// Names keep the order in which they were first registered, which is
/// also the tie-break order when ranking matches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceMap {
	entries: Vec<(String, Vec<PathBuf>)>,
}

impl SourceMap {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the document list of `name`, registering the name if needed.
	pub fn entry(&mut self, name: &str) -> &mut Vec<PathBuf> {
		let index = match self.entries.iter().position(|(existing, _)| existing == name) {
			Some(index) => index,
			None => {
				self.entries.push((name.to_owned(), Vec::new()));
				self.entries.len() - 1
			}
		};
		&mut self.entries[index].1
	}

	/// Returns the documents registered for `name`, or `None` if the name is unknown.
	pub fn get(&self, name: &str) -> Option<&[PathBuf]> {
		self.entries.iter().find(|(existing, _)| existing == name).map(|(_, files)| files.as_slice())
	}

	/// Removes `name` and returns its documents.
	pub fn remove(&mut self, name: &str) -> Option<Vec<PathBuf>> {
		let index = self.entries.iter().position(|(existing, _)| existing == name)?;
		Some(self.entries.remove(index).1)
	}

	/// Iterates over `(name, documents)` pairs in registration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
		self.entries.iter().map(|(name, files)| (name.as_str(), files.as_slice()))
	}

	/// Iterates over the language names in registration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(name, _)| name.as_str())
	}

	/// Returns the number of registered languages, including those without documents.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if no language is registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Chunks per CPU when the thread count is left to the machine.
const CHUNKS_PER_CPU: usize = 4;

/// Returns how many documents each worker thread receives.
///
/// # Parameters
/// - `documents`: number of documents to ingest (must be > 0).
/// - `jobs`: maximum number of worker threads; 0 means CPU cores * `CHUNKS_PER_CPU`.
///
/// # Returns
/// A chunk size such that `documents.div_ceil(size)` never exceeds the thread cap.
fn chunk_size(documents: usize, jobs: usize) -> usize {
	let chunks = if jobs == 0 { num_cpus::get() * CHUNKS_PER_CPU } else { jobs };
	documents.div_ceil(chunks).max(1)
}

/// Builds one profile per language of `sources`, in the same order.
///
/// # Parameters
/// - `sources`: languages and their documents.
/// - `max_depth`: n-gram length of every profile.
/// - `jobs`: maximum number of worker threads; 0 means CPU cores * 4.
///
/// # Behavior
/// - Splits all (language, document) pairs into at most `jobs` chunks.
/// - Spawns one thread per chunk; each builds its own partial profiles.
/// - Merges the partial profiles as they arrive over an MPSC channel.
///
/// # Notes
/// Unreadable documents are logged and skipped, contributing nothing.
///
/// # Errors
/// Returns `InvalidArgument` if `max_depth < 1`.
pub fn read_languages(sources: &SourceMap, max_depth: usize, jobs: usize) -> Result<Vec<(String, Language)>> {
	let empty = Language::new(max_depth)?;
	let mut languages: Vec<(String, Language)> =
		sources.names().map(|name| (name.to_owned(), empty.clone())).collect();

	let documents: Vec<(usize, PathBuf)> = sources
		.iter()
		.enumerate()
		.flat_map(|(index, (_, files))| files.iter().map(move |file| (index, file.clone())))
		.collect();
	if documents.is_empty() {
		return Ok(languages);
	}

	let (tx, rx) = mpsc::channel();
	for chunk in documents.chunks(chunk_size(documents.len(), jobs)) {
		let tx = tx.clone();
		let chunk: Vec<(usize, PathBuf)> = chunk.to_vec();
		let empty = empty.clone();

		thread::spawn(move || {
			let mut partial: Vec<(usize, Language)> = Vec::new();
			for (index, path) in chunk {
				let position = match partial.iter().position(|(existing, _)| *existing == index) {
					Some(position) => position,
					None => {
						partial.push((index, empty.clone()));
						partial.len() - 1
					}
				};
				if let Err(e) = partial[position].1.ingest_file(&path) {
					warn!("skipping document: {e}");
				}
			}
			if tx.send(partial).is_err() {
				warn!("profile collector hung up");
			}
		});
	}
	drop(tx);

	for partial in rx.iter() {
		for (index, language) in partial {
			languages[index].1.merge(&language)?;
		}
	}

	for (name, language) in &languages {
		info!(
			"built {name}: {} documents, {} n-grams",
			language.documents(),
			language.trie().total(max_depth)
		);
	}
	Ok(languages)
}
