//! Core n-gram model.
//!
//! - Counting trie (`NGramTrie`)
//! - Document profiles and their comparison (`Language`)
//! - Ranking of reference profiles (`matcher`)

/// Character-keyed counting trie with frequency and prediction queries.
pub mod trie;

/// Language profile: character pipeline, ingestion and cosine similarity.
pub mod language;

/// Ranking of reference languages against an unknown profile.
pub mod matcher;

/// Internal trie node and weighted sampling.
///
/// Not exposed.
mod node;
