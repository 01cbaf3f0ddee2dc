//! bidalign-align
//!
//! Many-to-many alignment of outline nodes to source chunks, the merge of
//! that alignment back into the outline tree, and the end-to-end pipeline
//! (paragraphs → chunks → alignment → annotated outline + coverage report).

pub mod aligner;
pub mod merge;
pub mod pipeline;
pub mod report;

pub use aligner::{map_outline_to_chunks, Aligner};
pub use merge::merge_chunk_alignment_into_outline;
pub use pipeline::{build_scorer, AlignedDocument, AlignmentPipeline};
pub use report::coverage_report;
