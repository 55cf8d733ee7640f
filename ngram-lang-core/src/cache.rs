//! On-disk cache of reference profiles.
//!
//! Profiles are stored as exported trie counts, serialized with `postcard`,
//! together with the list of documents they were built from. A cache is
//! only trusted when that list still matches the requested sources.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::corpus::{SourceMap, read_languages};
use crate::error::{LangError, Result};
use crate::model::language::{Language, TransformConfig};
use crate::model::trie::{DepthCounts, NGramTrie};

/// A source document and its modification time when the cache was written.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SourceStamp {
	pub path: PathBuf,
	/// Nanoseconds since the Unix epoch, `None` if unavailable.
	pub modified: Option<u128>,
}

impl SourceStamp {
	/// Stamps `path` with its current modification time.
	pub fn of<P: AsRef<Path>>(path: P) -> Self {
		let path = path.as_ref();
		let modified = fs::metadata(path)
			.and_then(|metadata| metadata.modified())
			.ok()
			.and_then(|time| time.duration_since(UNIX_EPOCH).ok())
			.map(|duration| duration.as_nanos());
		Self { path: path.to_path_buf(), modified }
	}
}

/// One cached reference profile.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CachedLanguage {
	pub name: String,
	pub sources: Vec<SourceStamp>,
	pub documents: usize,
	/// Output of `NGramTrie::export_counts`.
	pub counts: Vec<DepthCounts>,
}

/// Serialized snapshot of all reference profiles.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProfileCache {
	pub max_depth: usize,
	pub languages: Vec<CachedLanguage>,
}

impl ProfileCache {
	/// Snapshots `languages`, built from `sources`.
	///
	/// `languages` must follow the order of `sources`.
	pub fn capture(sources: &SourceMap, max_depth: usize, languages: &[(String, Language)]) -> Self {
		let languages = sources
			.iter()
			.zip(languages)
			.map(|((_, files), (name, language))| CachedLanguage {
				name: name.clone(),
				sources: files.iter().map(SourceStamp::of).collect(),
				documents: language.documents(),
				counts: language.trie().export_counts(),
			})
			.collect();
		Self { max_depth, languages }
	}

	/// Returns `true` if this cache was built with `max_depth` from exactly
	/// `sources`: same names in the same order, same documents, and no
	/// document modified since.
	pub fn is_fresh(&self, sources: &SourceMap, max_depth: usize) -> bool {
		if self.max_depth != max_depth || self.languages.len() != sources.len() {
			return false;
		}
		self.languages.iter().zip(sources.iter()).all(|(cached, (name, files))| {
			cached.name == name
				&& cached.sources.len() == files.len()
				&& cached.sources.iter().zip(files).all(|(stamp, file)| *stamp == SourceStamp::of(file))
		})
	}

	/// Rebuilds the profiles, using the default transform pipeline.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the stored counts are inconsistent.
	pub fn into_languages(self) -> Result<Vec<(String, Language)>> {
		let max_depth = self.max_depth;
		self.languages
			.into_iter()
			.map(|cached| -> Result<(String, Language)> {
				let trie = NGramTrie::from_counts(max_depth, cached.counts)?;
				let language = Language::from_parts(trie, TransformConfig::default(), cached.documents);
				Ok((cached.name, language))
			})
			.collect()
	}

	/// Encodes the snapshot with postcard.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Decodes a snapshot written by [`ProfileCache::to_bytes`].
	///
	/// # Errors
	/// Returns `Cache` if the bytes are not a valid snapshot.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Ok(postcard::from_bytes(bytes)?)
	}

	/// Reads and decodes a cache file.
	pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let bytes = fs::read(path).map_err(|e| LangError::io(path, e))?;
		Self::from_bytes(&bytes)
	}

	/// Writes the snapshot to `path`, replacing any previous file.
	pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		fs::write(path, self.to_bytes()?).map_err(|e| LangError::io(path, e))
	}
}

/// Loads the reference profiles from the cache at `path` if it is fresh,
/// otherwise builds them from `sources` and rewrites the cache.
///
/// A missing or unreadable cache simply triggers a rebuild.
///
/// # Errors
/// Returns an error if `max_depth < 1` or the new cache cannot be written.
pub fn load_or_build<P: AsRef<Path>>(
	path: P,
	sources: &SourceMap,
	max_depth: usize,
	jobs: usize,
) -> Result<Vec<(String, Language)>> {
	let path = path.as_ref();
	if path.exists() {
		match ProfileCache::read(path) {
			Ok(cache) if cache.is_fresh(sources, max_depth) => match cache.into_languages() {
				Ok(languages) => {
					info!("loaded {} profiles from {}", languages.len(), path.display());
					return Ok(languages);
				}
				Err(e) => warn!("discarding corrupt cache {}: {e}", path.display()),
			},
			Ok(_) => info!("cache {} is stale, rebuilding", path.display()),
			Err(e) => warn!("discarding unreadable cache {}: {e}", path.display()),
		}
	}

	let languages = read_languages(sources, max_depth, jobs)?;
	ProfileCache::capture(sources, max_depth, &languages).write(path)?;
	info!("wrote {} profiles to {}", languages.len(), path.display());
	Ok(languages)
}
