use bidalign_core::outline::flatten;
use bidalign_core::types::{AlignmentResult, CoverageReport, OutlineDocument};

pub fn coverage_report(outline: &OutlineDocument, total_chunks: usize, alignment: &AlignmentResult) -> CoverageReport {
    let flat = flatten(outline);
    let nodes_with_sources = flat.iter().filter(|node| !alignment.picks_for(&node.id).is_empty()).count();
    let uncovered = alignment.uncovered_chunks.len();
    CoverageReport {
        total_chunks,
        covered_chunks: total_chunks.saturating_sub(uncovered),
        uncovered_chunks: uncovered,
        fallback_assignments: alignment.fallback_chunks.len(),
        total_nodes: flat.len(),
        nodes_with_sources,
    }
}
