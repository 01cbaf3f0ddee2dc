//! bidalign-text
//!
//! Lexical matching for outline alignment: text normalization, a
//! character-level sequence ratio blended with word-set Jaccard, and the
//! `LexicalScorer` strategy built on them.

pub mod normalize;
pub mod scorer;
pub mod similarity;

pub use normalize::normalize;
pub use scorer::LexicalScorer;
pub use similarity::{best_match, jaccard, score, sequence_ratio};
