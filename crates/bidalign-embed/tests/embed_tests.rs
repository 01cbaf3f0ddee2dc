use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bidalign_core::traits::{Embedder, Scorer};
use bidalign_embed::{get_default_embedder, EmbeddingScorer, FnEmbedder, HashingEmbedder};

#[test]
fn hashing_embedder_shapes_and_determinism() {
    let embedder = get_default_embedder(128);
    let texts = vec!["项目背景 概述".to_string(), "项目背景 概述".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 128, "embedding dim follows the configured size");

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn identical_texts_score_one_and_related_beats_unrelated() {
    let scorer = EmbeddingScorer::new(Box::new(HashingEmbedder::new(256)));
    let same = scorer.score("技术方案", "技术方案").expect("score");
    assert!((same - 1.0).abs() < 1e-4, "self similarity is 1 (got {same})");

    let related = scorer.score("技术方案 总体设计", "本章介绍技术方案与总体设计").expect("score");
    let unrelated = scorer.score("技术方案 总体设计", "售后服务 培训计划").expect("score");
    assert!(related > unrelated, "related={related} unrelated={unrelated}");
}

#[test]
fn embeds_chunks_once_and_queries_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let inner = HashingEmbedder::new(64);
    let embedder = FnEmbedder::new(64, move |texts: &[String]| {
        counter.fetch_add(1, Ordering::SeqCst);
        inner.embed_batch(texts)
    });
    let scorer = EmbeddingScorer::new(Box::new(embedder));

    let queries: Vec<String> = (0..5).map(|i| format!("节点 {i}")).collect();
    let candidates: Vec<String> = (0..7).map(|i| format!("块 {i}")).collect();
    let rows = scorer.score_matrix(&queries, &candidates).expect("matrix");

    assert_eq!(calls.load(Ordering::SeqCst), 2, "one batch for chunks, one for queries");
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.as_ref().map(Vec::len) == Some(7)));
}

#[test]
fn blank_queries_are_not_scored() {
    let scorer = EmbeddingScorer::new(Box::new(HashingEmbedder::new(32)));
    let queries = vec!["  ".to_string(), "交付计划".to_string()];
    let candidates = vec!["交付计划与里程碑".to_string()];
    let rows = scorer.score_matrix(&queries, &candidates).expect("matrix");
    assert!(rows[0].is_none());
    assert_eq!(rows[1].as_ref().map(Vec::len), Some(1));
    assert!((scorer.default_min_score() - 0.45).abs() < 1e-12);
}

#[test]
fn mismatched_embedder_output_is_an_error() {
    let short = FnEmbedder::new(8, |_texts: &[String]| Ok(vec![vec![0.0; 8]]));
    let scorer = EmbeddingScorer::new(Box::new(short));
    let err = scorer
        .score_matrix(&["a".to_string()], &["x".to_string(), "y".to_string()])
        .expect_err("count mismatch must fail");
    assert!(err.to_string().contains("2 texts"), "unexpected error: {err}");

    let wrong_dim = FnEmbedder::new(8, |texts: &[String]| Ok(vec![vec![0.0; 3]; texts.len()]));
    let scorer = EmbeddingScorer::new(Box::new(wrong_dim));
    assert!(scorer.score_matrix(&["a".to_string()], &["x".to_string()]).is_err());
}
