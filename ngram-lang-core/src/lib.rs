//! Character n-gram language identification library.
//!
//! This crate profiles documents by counting character n-grams and
//! identifies their language by comparing profiles, including:
//! - A counting trie of n-grams with frequency and prediction queries
//! - Language profiles built through a configurable character pipeline
//! - Cosine-similarity ranking against reference languages
//! - Parallel reference building and an on-disk profile cache

/// N-gram trie, language profiles and matching.
pub mod model;

/// Parallel construction of reference profiles.
pub mod corpus;

/// Reference profile cache.
pub mod cache;

/// Document and source list loading.
pub mod io;

/// Error types.
pub mod error;

pub use corpus::SourceMap;
pub use error::{LangError, Result};
pub use model::language::{Language, TransformConfig};
pub use model::matcher::{Match, best_matches, rank, top_matches};
pub use model::trie::NGramTrie;
