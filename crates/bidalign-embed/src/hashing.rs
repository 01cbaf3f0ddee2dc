use anyhow::Result;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use bidalign_core::traits::Embedder;

/// Offline feature-hashing embedder.
///
/// Latin words hash as whole lowercased tokens; runs of CJK ideographs are
/// split into character bigrams so unsegmented Chinese still shares
/// features. Output is L2-normalized and deterministic across runs.
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in tokens(text) {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = usize::try_from(h % self.dim as u64).unwrap_or(0);
            let weight = 0.5 + f32::from(u16::try_from(h >> 48).unwrap_or(u16::MAX)) / f32::from(u16::MAX);
            v[idx] += weight;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9fff}' | '\u{3400}'..='\u{4dbf}')
}

fn tokens(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let mut latin = String::new();
        let mut han: Vec<char> = Vec::new();
        for c in word.chars() {
            if is_cjk(c) {
                if !latin.is_empty() { out.push(std::mem::take(&mut latin)); }
                han.push(c);
            } else {
                flush_han(&mut han, &mut out);
                latin.extend(c.to_lowercase());
            }
        }
        flush_han(&mut han, &mut out);
        if !latin.is_empty() { out.push(latin); }
    }
    out
}

fn flush_han(han: &mut Vec<char>, out: &mut Vec<String>) {
    match han.len() {
        0 => {}
        1 => out.push(han[0].to_string()),
        _ => out.extend(han.windows(2).map(|w| w.iter().collect::<String>())),
    }
    han.clear();
}
