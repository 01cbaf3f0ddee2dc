use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use bidalign_core::chunker::{paragraphs_from_plain_text, Chunker};
use bidalign_core::config::{AlignmentSettings, MatchingConfig, ScorerKind};
use bidalign_core::traits::Scorer;
use bidalign_core::types::{AlignmentResult, Chunk, CoverageReport, DocumentStructure, OutlineDocument};
use bidalign_embed::{get_default_embedder, EmbeddingScorer};
use bidalign_text::LexicalScorer;

use crate::aligner::Aligner;
use crate::merge::merge_chunk_alignment_into_outline;
use crate::report::coverage_report;

/// Everything one alignment request produces.
#[derive(Debug, Clone, Serialize)]
pub struct AlignedDocument {
    pub chunks: Vec<Chunk>,
    pub alignment: AlignmentResult,
    pub outline: OutlineDocument,
    pub report: CoverageReport,
}

pub fn build_scorer(matching: &MatchingConfig) -> Box<dyn Scorer> {
    match matching.scorer {
        ScorerKind::Lexical => Box::new(LexicalScorer::new()),
        ScorerKind::Embedding => Box::new(EmbeddingScorer::new(get_default_embedder(matching.embedding_dim))),
    }
}

pub struct AlignmentPipeline {
    chunker: Chunker,
    aligner: Aligner,
}

impl AlignmentPipeline {
    pub fn new(chunker: Chunker, aligner: Aligner) -> Self { Self { chunker, aligner } }

    pub fn from_settings(settings: &AlignmentSettings) -> Self {
        let scorer = build_scorer(&settings.matching);
        let mut aligner = Aligner::new(scorer).with_top_k(settings.matching.top_k);
        if let Some(min_score) = settings.matching.min_score {
            aligner = aligner.with_min_score(min_score);
        }
        Self::new(Chunker::with_config(settings.chunking), aligner)
    }

    pub fn aligner(&self) -> &Aligner { &self.aligner }

    pub fn run(&self, structure: &DocumentStructure, outline: &OutlineDocument) -> Result<AlignedDocument> {
        outline.validate().context("outline rejected")?;
        let chunks = self.chunker.chunk_structure(structure);
        let alignment = self
            .aligner
            .map_outline_to_chunks(outline, &chunks)
            .context("aligning outline to chunks")?;
        let merged = merge_chunk_alignment_into_outline(outline, &chunks, &alignment);
        let report = coverage_report(outline, chunks.len(), &alignment);
        info!(
            paragraphs = structure.paragraphs.len(),
            chunks = report.total_chunks,
            nodes = report.total_nodes,
            nodes_with_sources = report.nodes_with_sources,
            "alignment pipeline finished"
        );
        Ok(AlignedDocument { chunks, alignment, outline: merged, report })
    }

    /// Same as [`run`](Self::run) for sources that only yielded plain text;
    /// each non-blank line becomes a paragraph.
    pub fn run_plain_text(&self, text: &str, outline: &OutlineDocument) -> Result<AlignedDocument> {
        let structure = DocumentStructure { paragraphs: paragraphs_from_plain_text(text) };
        self.run(&structure, outline)
    }
}
