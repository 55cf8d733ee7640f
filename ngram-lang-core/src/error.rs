//! Error types for profile building, matching and caching.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the language profiling library.
#[derive(Debug, Error)]
pub enum LangError {
	/// A caller supplied an unusable argument (zero depth, mismatched depths,
	/// malformed exported counts).
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// A document, source list or cache file could not be read or written.
	#[error("I/O error on {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// The profile cache could not be encoded or decoded.
	#[error("Cache error: {0}")]
	Cache(String),
}

impl LangError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}
}

impl From<postcard::Error> for LangError {
	fn from(e: postcard::Error) -> Self {
		Self::Cache(e.to_string())
	}
}

/// Result type for language profiling operations.
pub type Result<T> = std::result::Result<T, LangError>;
