use std::collections::{HashMap, HashSet};

/// Weight of the character sequence ratio in [`score`].
pub const SEQUENCE_WEIGHT: f64 = 0.7;
/// Weight of the word-set Jaccard index in [`score`].
pub const TOKEN_WEIGHT: f64 = 0.3;

/// Blended lexical similarity of two already-normalized strings.
pub fn score(query: &str, candidate: &str) -> f64 {
    SEQUENCE_WEIGHT * sequence_ratio(query, candidate) + TOKEN_WEIGHT * jaccard(query, candidate)
}

/// Index and score of the best candidate for `query`.
///
/// Only a score strictly above the running best replaces it, so the first
/// of several equal candidates wins and a list scoring 0 everywhere yields
/// `(None, 0.0)`.
pub fn best_match<S: AsRef<str>>(query: &str, candidates: &[S]) -> (Option<usize>, f64) {
    let mut best_idx = None;
    let mut best_score = 0.0;
    for (idx, candidate) in candidates.iter().enumerate() {
        let s = score(query, candidate.as_ref());
        if s > best_score {
            best_score = s;
            best_idx = Some(idx);
        }
    }
    (best_idx, best_score)
}

/// `|A ∩ B| / |A ∪ B|` over whitespace-separated words; 0 when both are empty.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let a: HashSet<&str> = a.split_whitespace().collect();
    let b: HashSet<&str> = b.split_whitespace().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Ratcliff/Obershelp similarity over characters: `2·M / (|a| + |b|)` where
/// `M` counts characters in the recursively found longest common blocks.
/// Two empty strings are identical (1.0).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Ascending positions of every character of `b`.
type PositionIndex = HashMap<char, Vec<usize>>;

fn position_index(b: &[char]) -> PositionIndex {
    let mut index: PositionIndex = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        index.entry(c).or_default().push(j);
    }
    index
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let index = position_index(b);
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, alo, ahi, &index, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(start_a, start_b, len)`; the earliest block in `a` wins ties.
///
/// Only positions where `a[i]` occurs in `b` are visited, and only the run
/// lengths ending at the previous row are kept.
fn longest_match(
    a: &[char],
    alo: usize,
    ahi: usize,
    index: &PositionIndex,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    let mut run_ending: HashMap<usize, usize> = HashMap::new();
    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = index.get(c) {
            let start = positions.partition_point(|&j| j < blo);
            for &j in positions[start..].iter().take_while(|&&j| j < bhi) {
                let k = j.checked_sub(1).and_then(|prev| run_ending.get(&prev)).copied().unwrap_or(0) + 1;
                next.insert(j, k);
                if k > best_k {
                    best_k = k;
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                }
            }
        }
        run_ending = next;
    }
    (best_i, best_j, best_k)
}
