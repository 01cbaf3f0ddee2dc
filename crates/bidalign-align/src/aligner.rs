use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use bidalign_core::chunker::validate_chunks;
use bidalign_core::outline::flatten;
use bidalign_core::traits::Scorer;
use bidalign_core::types::{AlignmentResult, Chunk, ChunkPick, FlatNode, NodeId, OutlineDocument};
use bidalign_text::LexicalScorer;

pub const DEFAULT_TOP_K: usize = 3;

/// Assigns chunks to outline nodes with a pluggable [`Scorer`].
///
/// Each node keeps its best `top_k` chunks scoring at least `min_score`;
/// chunks no node picked are then attached to their single best node
/// regardless of score, so with at least one scorable node every chunk ends
/// up attributed somewhere.
pub struct Aligner {
    scorer: Box<dyn Scorer>,
    top_k: usize,
    min_score: f64,
}

impl Aligner {
    pub fn new(scorer: Box<dyn Scorer>) -> Self {
        let min_score = scorer.default_min_score();
        Self { scorer, top_k: DEFAULT_TOP_K, min_score }
    }

    pub fn lexical() -> Self { Self::new(Box::new(LexicalScorer::new())) }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn scorer_name(&self) -> &str { self.scorer.name() }

    pub fn top_k(&self) -> usize { self.top_k }

    pub fn min_score(&self) -> f64 { self.min_score }

    pub fn map_outline_to_chunks(&self, outline: &OutlineDocument, chunks: &[Chunk]) -> Result<AlignmentResult> {
        validate_chunks(chunks)?;
        let flat = flatten(outline);
        let mut node_to_chunks: BTreeMap<NodeId, Vec<ChunkPick>> = BTreeMap::new();

        if chunks.is_empty() {
            for node in &flat { node_to_chunks.entry(node.id.clone()).or_default(); }
            debug!(nodes = flat.len(), "no chunks to align");
            return Ok(AlignmentResult { node_to_chunks, ..AlignmentResult::default() });
        }
        if flat.is_empty() {
            warn!(chunks = chunks.len(), "outline is empty; every chunk stays uncovered");
            return Ok(AlignmentResult { uncovered_chunks: (0..chunks.len()).collect(), ..AlignmentResult::default() });
        }

        let queries: Vec<String> = flat.iter().map(query_text).collect();
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let matrix = self.scorer.score_matrix(&queries, &texts)?;
        check_shape(&matrix, flat.len(), chunks.len())?;

        for (node, row) in flat.iter().zip(&matrix) {
            let picks = row.as_deref().map_or_else(Vec::new, |scores| self.select_top_k(scores));
            node_to_chunks.insert(node.id.clone(), picks);
        }

        let mut fallback_chunks = Vec::new();
        for chunk_index in uncovered(&node_to_chunks, chunks.len()) {
            let best = best_node_for(&matrix, chunk_index);
            match best {
                Some((node_pos, score)) => {
                    node_to_chunks
                        .entry(flat[node_pos].id.clone())
                        .or_default()
                        .push(ChunkPick { chunk_index, score: round3(score) });
                    fallback_chunks.push(chunk_index);
                }
                None => warn!(chunk_index, "no scorable node for chunk"),
            }
        }

        let uncovered_chunks = uncovered(&node_to_chunks, chunks.len());
        info!(
            scorer = self.scorer.name(),
            nodes = flat.len(),
            chunks = chunks.len(),
            fallback = fallback_chunks.len(),
            uncovered = uncovered_chunks.len(),
            "aligned outline to chunks"
        );
        Ok(AlignmentResult { node_to_chunks, uncovered_chunks, fallback_chunks })
    }

    /// Best `top_k` chunks by score, ties in ascending chunk order, then
    /// filtered by the floor.
    fn select_top_k(&self, scores: &[f64]) -> Vec<ChunkPick> {
        let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
            .into_iter()
            .take(self.top_k)
            .filter(|&(_, score)| score >= self.min_score)
            .map(|(chunk_index, score)| ChunkPick { chunk_index, score: round3(score) })
            .collect()
    }
}

/// Lexical alignment with explicit parameters.
pub fn map_outline_to_chunks(
    outline: &OutlineDocument,
    chunks: &[Chunk],
    top_k: usize,
    min_score: f64,
) -> Result<AlignmentResult> {
    Aligner::lexical().with_top_k(top_k).with_min_score(min_score).map_outline_to_chunks(outline, chunks)
}

fn query_text(node: &FlatNode) -> String {
    format!("{} {}", node.title, node.description)
}

fn check_shape(matrix: &[Option<Vec<f64>>], rows: usize, cols: usize) -> Result<()> {
    if matrix.len() != rows {
        return Err(anyhow!("scorer returned {} rows for {} nodes", matrix.len(), rows));
    }
    if let Some(row) = matrix.iter().flatten().find(|row| row.len() != cols) {
        return Err(anyhow!("scorer returned a row of {} scores for {} chunks", row.len(), cols));
    }
    Ok(())
}

fn uncovered(node_to_chunks: &BTreeMap<NodeId, Vec<ChunkPick>>, total: usize) -> Vec<usize> {
    let mut covered = vec![false; total];
    for pick in node_to_chunks.values().flatten() {
        if let Some(slot) = covered.get_mut(pick.chunk_index) { *slot = true; }
    }
    (0..total).filter(|&i| !covered[i]).collect()
}

/// First node (pre-order) with the highest score for `chunk_index`.
fn best_node_for(matrix: &[Option<Vec<f64>>], chunk_index: usize) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (node_pos, row) in matrix.iter().enumerate() {
        let Some(score) = row.as_ref().map(|scores| scores[chunk_index]) else { continue };
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((node_pos, score));
        }
    }
    best
}

fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
