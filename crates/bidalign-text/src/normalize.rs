// Constant patterns, exercised by the unit tests below.
#![allow(clippy::expect_used)]

use regex::Regex;
use std::sync::LazyLock;

/// Enumeration marker at the head of a heading: `1.` `1.2.3` `(1)` `（一）`
/// `一、` `iv.` `[2]`. The numeral must be closed by a delimiter, whitespace
/// or the end of text so words such as "vision" keep their first letter.
static LEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[(（\[]?(?:\d+(?:[.．\-]\d+)*|[一二三四五六七八九十]+|[ivx]+)(?:[.．、\-)）\]]+\s*|\s+|$)")
        .expect("valid marker pattern")
});

/// A marker left at the head once punctuation has been removed.
static RESIDUAL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+|[一二三四五六七八九十]+|[ivx]+)(?:\s+|$)")
        .expect("valid residual marker pattern")
});

static SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]+").expect("valid symbol pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Canonical form used on both sides of every lexical comparison.
///
/// Lowercases, drops a leading enumeration marker, replaces punctuation and
/// symbols with spaces (letters, digits and CJK ideographs survive),
/// collapses whitespace and trims. `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let unmarked = LEADING_MARKER.replace(lowered.trim(), "");
    let cleaned = SYMBOLS.replace_all(&unmarked, " ");
    let collapsed = WHITESPACE.replace_all(&cleaned, " ");

    let mut out = collapsed.trim();
    // "1. 2. x" still starts with "2 " after the first strip.
    while let Some(m) = RESIDUAL_MARKER.find(out) {
        out = &out[m.end()..];
    }
    out.to_string()
}
