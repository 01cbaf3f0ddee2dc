//! Sliding-window chunking over a paragraph sequence.
//!
//! Paragraphs are accumulated whole until the window reaches
//! `target_chars`; the next window is seeded with the last `overlap_chars`
//! characters of the emitted one. Lengths are counted in Unicode scalar
//! values so CJK text is measured per character, not per byte.
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Chunk, DocumentStructure, Paragraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub target_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { target_chars: 800, overlap_chars: 200 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_chars == 0 {
            return Err(Error::InvalidConfig("chunking.target_chars must be > 0".into()));
        }
        if self.overlap_chars >= self.target_chars {
            return Err(Error::InvalidConfig(format!(
                "chunking.overlap_chars ({}) must be smaller than target_chars ({})",
                self.overlap_chars, self.target_chars
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: ChunkingConfig) -> Self { Self { config } }

    pub fn config(&self) -> &ChunkingConfig { &self.config }

    pub fn chunk_structure(&self, structure: &DocumentStructure) -> Vec<Chunk> {
        self.build_chunks(&structure.paragraphs)
    }

    /// Cut `paragraphs` into overlapping windows.
    ///
    /// Blank paragraphs are skipped but still count towards paragraph
    /// indices. After an emission the next window's `start_para` is the
    /// paragraph that triggered it, even though the overlap tail may
    /// originate from earlier paragraphs.
    pub fn build_chunks(&self, paragraphs: &[Paragraph]) -> Vec<Chunk> {
        let ChunkingConfig { target_chars, overlap_chars } = self.config;
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut buf: Vec<String> = Vec::new();
        let mut buf_len = 0usize;
        let mut start_para = 0usize;

        for (i, paragraph) in paragraphs.iter().enumerate() {
            let text = paragraph.text.trim();
            if text.is_empty() { continue; }
            if buf_len == 0 { start_para = i; }
            buf.push(text.to_string());
            buf_len += text.chars().count();

            if buf_len >= target_chars {
                let joined = buf.join("\n");
                let tail = tail_chars(&joined, overlap_chars).to_string();
                chunks.push(Chunk { index: chunks.len(), start_para, end_para: i, text: joined });
                buf.clear();
                buf_len = tail.chars().count();
                if !tail.is_empty() { buf.push(tail); }
                start_para = i;
            }
        }

        if buf_len > 0 {
            let end_para = paragraphs.len().saturating_sub(1);
            chunks.push(Chunk { index: chunks.len(), start_para, end_para, text: buf.join("\n") });
        }

        debug!(paragraphs = paragraphs.len(), chunks = chunks.len(), target_chars, overlap_chars, "built chunks");
        chunks
    }
}

/// Chunk `paragraphs` with explicit window sizes.
pub fn build_chunks(paragraphs: &[Paragraph], target_chars: usize, overlap_chars: usize) -> Vec<Chunk> {
    Chunker::with_config(ChunkingConfig { target_chars, overlap_chars }).build_chunks(paragraphs)
}

/// Paragraphs for sources that only yielded plain text: one per non-blank
/// line, trimmed.
pub fn paragraphs_from_plain_text(text: &str) -> Vec<Paragraph> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Paragraph::new)
        .collect()
}

/// Check the chunk-list contract: indices are exactly `0..n` in order and
/// every range is well formed.
pub fn validate_chunks(chunks: &[Chunk]) -> Result<()> {
    for (position, chunk) in chunks.iter().enumerate() {
        if chunk.index != position {
            return Err(Error::InvalidChunks(format!(
                "chunk at position {position} has index {}",
                chunk.index
            )));
        }
        if chunk.start_para > chunk.end_para {
            return Err(Error::InvalidChunks(format!(
                "chunk {} spans paragraphs {}..{}",
                chunk.index, chunk.start_para, chunk.end_para
            )));
        }
    }
    Ok(())
}

fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 { return ""; }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
