use bidalign_core::outline::walk_mut;
use bidalign_core::types::{AlignmentResult, Chunk, ChunkPick, NodeId, OutlineDocument, OutlineNode};

/// Write an alignment back into a copy of `outline`.
///
/// Every node gets `assigned_chunks` (empty when it has no picks). Nodes
/// whose picks reference at least one existing, non-blank chunk also get
/// `source_content`: those chunk texts in ascending chunk order, separated
/// by a blank line. Out-of-range picks are skipped. `outline` is untouched.
pub fn merge_chunk_alignment_into_outline(
    outline: &OutlineDocument,
    chunks: &[Chunk],
    alignment: &AlignmentResult,
) -> OutlineDocument {
    let mut merged = outline.clone();
    walk_mut(&mut merged, &mut |key: &NodeId, node: &mut OutlineNode| {
        let picks = alignment.picks_for(key).to_vec();
        node.source_content = source_content(&picks, chunks);
        node.assigned_chunks = Some(picks);
    });
    merged
}

fn source_content(picks: &[ChunkPick], chunks: &[Chunk]) -> Option<String> {
    let mut ordered: Vec<usize> = picks.iter().map(|p| p.chunk_index).collect();
    ordered.sort_unstable();
    let texts: Vec<&str> = ordered
        .into_iter()
        .filter_map(|idx| chunks.get(idx))
        .map(|chunk| chunk.text.trim())
        .filter(|text| !text.is_empty())
        .collect();
    if texts.is_empty() { None } else { Some(texts.join("\n\n")) }
}
