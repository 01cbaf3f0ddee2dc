use bidalign_core::traits::{ScoreMatrix, Scorer};
use tracing::debug;

use crate::normalize::normalize;
use crate::similarity::score;

/// Default pick floor for the lexical blend.
pub const DEFAULT_MIN_SCORE: f64 = 0.35;

/// Lexical baseline: both sides are normalized once, then every pair is
/// scored with the sequence/Jaccard blend.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalScorer;

impl LexicalScorer {
    pub fn new() -> Self { Self }
}

impl Scorer for LexicalScorer {
    fn name(&self) -> &str { "lexical" }

    fn default_min_score(&self) -> f64 { DEFAULT_MIN_SCORE }

    fn score_matrix(&self, queries: &[String], candidates: &[String]) -> anyhow::Result<ScoreMatrix> {
        let norm_candidates: Vec<String> = candidates.iter().map(|c| normalize(c)).collect();
        let rows = queries
            .iter()
            .map(|q| {
                let query = normalize(q);
                Some(norm_candidates.iter().map(|c| score(&query, c)).collect())
            })
            .collect();
        debug!(queries = queries.len(), candidates = candidates.len(), "lexical score matrix");
        Ok(rows)
    }
}
