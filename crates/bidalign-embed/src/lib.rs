//! bidalign-embed
//!
//! Vector-similarity scoring for outline alignment. `EmbeddingScorer` wraps
//! any [`Embedder`] and scores by dot product, which equals cosine
//! similarity for the unit-normalized vectors embedders must return.
//! Chunks and node queries are embedded in one batch each, never per pair.

use anyhow::Result;
use tracing::debug;

use bidalign_core::error::Error;
use bidalign_core::traits::{Embedder, ScoreMatrix, Scorer};

pub mod hashing;

pub use hashing::HashingEmbedder;

/// Embedding similarity runs hotter than the lexical blend.
pub const DEFAULT_MIN_SCORE: f64 = 0.45;

pub struct EmbeddingScorer {
    embedder: Box<dyn Embedder>,
}

impl EmbeddingScorer {
    pub fn new(embedder: Box<dyn Embedder>) -> Self { Self { embedder } }

    fn embed_checked(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.embedder.embed_batch(texts)?;
        if vectors.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "embedder returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            ))
            .into());
        }
        let dim = self.embedder.dim();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(Error::Embedding(format!("expected dimension {dim}, got {}", bad.len())).into());
        }
        Ok(vectors)
    }
}

impl Scorer for EmbeddingScorer {
    fn name(&self) -> &str { "embedding" }

    fn default_min_score(&self) -> f64 { DEFAULT_MIN_SCORE }

    fn score_matrix(&self, queries: &[String], candidates: &[String]) -> Result<ScoreMatrix> {
        let candidate_texts: Vec<String> = candidates.iter().map(|c| c.trim().to_string()).collect();
        let candidate_vecs = self.embed_checked(&candidate_texts)?;

        let query_texts: Vec<String> = queries.iter().map(|q| q.trim().to_string()).collect();
        let present: Vec<String> = query_texts.iter().filter(|q| !q.is_empty()).cloned().collect();
        let mut query_vecs = self.embed_checked(&present)?.into_iter();

        let rows = query_texts
            .iter()
            .map(|q| {
                if q.is_empty() {
                    return None;
                }
                let q_vec = query_vecs.next()?;
                Some(candidate_vecs.iter().map(|c_vec| dot(&q_vec, c_vec)).collect())
            })
            .collect();
        debug!(queries = queries.len(), embedded_queries = present.len(), candidates = candidates.len(), "embedding score matrix");
        Ok(rows)
    }
}

/// Adapter for an external embedding function, e.g. a client for a hosted
/// embedding endpoint.
pub struct FnEmbedder<F> {
    dim: usize,
    embed: F,
}

impl<F> FnEmbedder<F>
where
    F: Fn(&[String]) -> Result<Vec<Vec<f32>>> + Send + Sync,
{
    pub fn new(dim: usize, embed: F) -> Self { Self { dim, embed } }
}

impl<F> Embedder for FnEmbedder<F>
where
    F: Fn(&[String]) -> Result<Vec<Vec<f32>>> + Send + Sync,
{
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { (self.embed)(texts) }
}

/// The embedder used when no external model is wired in.
pub fn get_default_embedder(dim: usize) -> Box<dyn Embedder> {
    debug!(dim, "using hashing embedder");
    Box::new(HashingEmbedder::new(dim))
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    f64::from(a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>())
}
