use std::collections::BTreeMap;

use bidalign_align::{coverage_report, map_outline_to_chunks, merge_chunk_alignment_into_outline};
use bidalign_core::types::{AlignmentResult, Chunk, ChunkPick, OutlineDocument, OutlineNode};

fn chunk(index: usize, text: &str) -> Chunk {
    Chunk { index, start_para: index, end_para: index, text: text.to_string() }
}

fn pick(chunk_index: usize, score: f64) -> ChunkPick {
    ChunkPick { chunk_index, score }
}

fn sample_outline() -> OutlineDocument {
    OutlineDocument::new(vec![
        OutlineNode::new("1", "项目背景", "").with_children(vec![OutlineNode::new("1.1", "建设目标", "")]),
        OutlineNode::new("2", "技术方案", ""),
    ])
}

#[test]
fn source_content_follows_chunk_order_not_score_order() {
    let outline = sample_outline();
    let chunks = vec![chunk(0, " 第零块 "), chunk(1, "第一块"), chunk(2, "第二块")];
    let mut node_to_chunks = BTreeMap::new();
    node_to_chunks.insert("1".to_string(), vec![pick(2, 0.9), pick(0, 0.5)]);
    let alignment = AlignmentResult { node_to_chunks, ..AlignmentResult::default() };

    let merged = merge_chunk_alignment_into_outline(&outline, &chunks, &alignment);

    let root = &merged.outline[0];
    assert_eq!(root.source_content.as_deref(), Some("第零块\n\n第二块"));
    assert_eq!(root.assigned_chunks.as_deref(), Some(&[pick(2, 0.9), pick(0, 0.5)][..]), "picks keep their order");
    let child = &root.children()[0];
    assert_eq!(child.assigned_chunks.as_deref(), Some(&[][..]));
    assert!(child.source_content.is_none());
}

#[test]
fn out_of_range_picks_are_skipped() {
    let outline = sample_outline();
    let chunks = vec![chunk(0, "唯一的块")];
    let mut node_to_chunks = BTreeMap::new();
    node_to_chunks.insert("1".to_string(), vec![pick(7, 0.8), pick(0, 0.4)]);
    node_to_chunks.insert("2".to_string(), vec![pick(9, 0.8)]);
    let alignment = AlignmentResult { node_to_chunks, ..AlignmentResult::default() };

    let merged = merge_chunk_alignment_into_outline(&outline, &chunks, &alignment);

    assert_eq!(merged.outline[0].source_content.as_deref(), Some("唯一的块"));
    assert_eq!(merged.outline[1].assigned_chunks.as_ref().map(Vec::len), Some(1));
    assert!(merged.outline[1].source_content.is_none(), "only invalid picks: no source content");
}

#[test]
fn merge_is_deterministic_and_leaves_input_untouched() {
    let outline = sample_outline();
    let before = outline.clone();
    let chunks = vec![chunk(0, "项目背景说明"), chunk(1, "建设目标包括"), chunk(2, "技术方案采用")];
    let alignment = map_outline_to_chunks(&outline, &chunks, 3, 0.35).expect("align");

    let first = merge_chunk_alignment_into_outline(&outline, &chunks, &alignment);
    let second = merge_chunk_alignment_into_outline(&outline, &chunks, &alignment);

    assert_eq!(outline, before);
    assert_eq!(
        serde_json::to_string(&first).expect("json"),
        serde_json::to_string(&second).expect("json")
    );
}

#[test]
fn extra_node_fields_survive_the_merge() {
    let outline: OutlineDocument = serde_json::from_str(
        r#"{"outline":[{"id":"1","title":"项目背景","description":"","content":"已生成的正文"}]}"#,
    )
    .expect("outline");
    let chunks = vec![chunk(0, "项目背景介绍")];
    let alignment = map_outline_to_chunks(&outline, &chunks, 3, 0.35).expect("align");

    let merged = merge_chunk_alignment_into_outline(&outline, &chunks, &alignment);
    let value = serde_json::to_value(&merged).expect("json");

    assert_eq!(value["outline"][0]["content"], "已生成的正文");
    assert_eq!(value["outline"][0]["assigned_chunks"][0]["chunk_index"], 0);
    assert_eq!(value["outline"][0]["source_content"], "项目背景介绍");
}

#[test]
fn coverage_report_counts_nodes_and_fallbacks() {
    let outline = sample_outline();
    let chunks = vec![chunk(0, "项目背景说明"), chunk(1, "zzz")];
    let alignment = map_outline_to_chunks(&outline, &chunks, 3, 0.35).expect("align");

    let report = coverage_report(&outline, chunks.len(), &alignment);

    assert_eq!(report.total_chunks, 2);
    assert_eq!(report.covered_chunks, 2);
    assert_eq!(report.uncovered_chunks, 0);
    assert_eq!(report.fallback_assignments, 1, "the unrelated chunk is attached by fallback");
    assert_eq!(report.total_nodes, 3);
    assert!(report.nodes_with_sources >= 1);
}
