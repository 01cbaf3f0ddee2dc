//! Domain types shared by the chunker, the scorers and the aligner.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key under which a node's picks are stored in [`AlignmentResult`].
pub type NodeId = String;

/// One unit of source structure in reading order, as produced by an
/// external document parser. `text` may be blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paragraph {
    #[serde(default)]
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Parser output wrapper. Other parser fields (styles, headings, tables...)
/// are accepted on input and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentStructure {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

/// A contiguous text window cut from the paragraph sequence.
///
/// - `index`: 0-based position in emission order
/// - `start_para`/`end_para`: inclusive paragraph range the window spans
/// - `text`: the window payload, never empty
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub start_para: usize,
    pub end_para: usize,
    pub text: String,
}

/// A node of the target document's chapter tree.
///
/// `id` is an opaque unique key (a dotted path such as `1.2.3` by
/// convention). Alignment output is written into `assigned_chunks` and
/// `source_content`; any other input fields are carried through in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutlineNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<OutlineNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_chunks: Option<Vec<ChunkPick>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OutlineNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<OutlineNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn children(&self) -> &[OutlineNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Wire wrapper around the outline forest: `{"outline": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutlineDocument {
    #[serde(default)]
    pub outline: Vec<OutlineNode>,
}

/// A node with its tree structure discarded, keyed for alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    pub id: NodeId,
    pub title: String,
    pub description: String,
}

/// A chunk attributed to a node. `score` is rounded to 3 decimals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChunkPick {
    pub chunk_index: usize,
    pub score: f64,
}

/// Node to chunk mapping plus the chunks no node received.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlignmentResult {
    pub node_to_chunks: BTreeMap<NodeId, Vec<ChunkPick>>,
    pub uncovered_chunks: Vec<usize>,
    /// Chunks attached by the fallback pass rather than by top-k selection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback_chunks: Vec<usize>,
}

impl AlignmentResult {
    pub fn picks_for(&self, id: &str) -> &[ChunkPick] {
        self.node_to_chunks.get(id).map_or(&[], Vec::as_slice)
    }
}

/// Summary of how the chunks were distributed over the outline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageReport {
    pub total_chunks: usize,
    pub covered_chunks: usize,
    pub uncovered_chunks: usize,
    pub fallback_assignments: usize,
    pub total_nodes: usize,
    pub nodes_with_sources: usize,
}
