use bidalign_core::traits::Scorer;
use bidalign_text::{normalize, score, LexicalScorer};

#[test]
fn scenario_numbering_prefix_and_punctuation_are_stripped() {
    assert_eq!(normalize("1. 项目概述！"), "项目概述");
}

#[test]
fn normalization_is_idempotent_on_mixed_inputs() {
    let inputs = [
        "第一章 项目背景",
        "（三）质量保证措施：",
        "2.1、Technical Approach — Overview",
        "   ",
        "i) ii) iii) 结论",
        "§ 7 附录 A",
        "ⅳ 罗马数字符号",
    ];
    for input in inputs {
        let once = normalize(input);
        assert_eq!(normalize(&once), once, "normalize not idempotent for {input:?}");
    }
}

#[test]
fn score_is_one_for_identical_and_zero_for_disjoint() {
    assert!((score("项目 背景", "项目 背景") - 1.0).abs() < 1e-9);
    assert!(score("abc", "xyz").abs() < 1e-9);
}

#[test]
fn scorer_normalizes_both_sides() {
    let scorer = LexicalScorer::new();
    let s = scorer.score("1. 项目背景！", "项目背景").expect("score");
    assert!((s - 1.0).abs() < 1e-9, "numbering and punctuation must not affect similarity (got {s})");
}

#[test]
fn score_matrix_shape_matches_inputs() {
    let scorer = LexicalScorer::new();
    let queries = vec!["项目背景 ".to_string(), "技术方案 ".to_string()];
    let candidates = vec!["项目背景：本项目".to_string(), "技术方案包括".to_string(), "其他".to_string()];
    let rows = scorer.score_matrix(&queries, &candidates).expect("matrix");
    assert_eq!(rows.len(), 2);
    for row in &rows {
        let row = row.as_ref().expect("lexical rows are always present");
        assert_eq!(row.len(), 3);
        assert!(row.iter().all(|s| (0.0..=1.0).contains(s)));
    }
    let first = rows[0].as_ref().expect("row");
    assert!(first[0] > first[1], "matching heading scores higher than an unrelated one");
    assert!((scorer.default_min_score() - 0.35).abs() < 1e-12);
}
