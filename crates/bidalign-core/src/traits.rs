/// Score rows produced by a [`Scorer`]: one row per query, one column per
/// candidate. A `None` row marks a query the scorer cannot score (for
/// example a blank query for an embedding model); such a query receives no
/// picks and takes no part in fallback assignment.
pub type ScoreMatrix = Vec<Option<Vec<f64>>>;

/// Similarity strategy used by the aligner.
///
/// Implementations receive the raw query and candidate texts and do their
/// own preparation (normalization, embedding). Higher is better.
pub trait Scorer: Send + Sync {
    /// Short label for logs and reports.
    fn name(&self) -> &str;

    /// Score floor used when the caller does not supply one.
    fn default_min_score(&self) -> f64;

    fn score_matrix(&self, queries: &[String], candidates: &[String]) -> anyhow::Result<ScoreMatrix>;

    fn score(&self, query: &str, candidate: &str) -> anyhow::Result<f64> {
        let rows = self.score_matrix(&[query.to_string()], &[candidate.to_string()])?;
        Ok(rows
            .into_iter()
            .next()
            .flatten()
            .and_then(|row| row.first().copied())
            .unwrap_or(0.0))
    }
}

/// Text embedding model. Returned vectors are expected to be L2-normalized
/// and all of length [`Embedder::dim`].
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}
