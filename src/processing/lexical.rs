//! Lexical similarity primitives
//!
//! Every higher-level score bottoms out in [`lexical_similarity`], a
//! case-insensitive Jaro-Winkler similarity bounded to `[0, 1]`.

use strsim::jaro_winkler;
use unicode_segmentation::UnicodeSegmentation;

/// Similarity of two short tokens (skill names, titles, locations).
///
/// Symmetric, prefix-weighted and case-insensitive. Blank input on either side
/// scores 0, identical input scores 1.
pub fn lexical_similarity(a: &str, b: &str) -> f64 {
    let a = a.trim();
    let b = b.trim();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }

    // Fixed argument order keeps the metric exactly symmetric
    let similarity = if a <= b {
        jaro_winkler(&a, &b)
    } else {
        jaro_winkler(&b, &a)
    };
    if similarity.is_finite() {
        similarity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Highest [`lexical_similarity`] between `needle` and any entry of `haystack`.
pub fn best_similarity<S: AsRef<str>>(needle: &str, haystack: &[S]) -> f64 {
    haystack
        .iter()
        .map(|candidate| lexical_similarity(needle, candidate.as_ref()))
        .fold(0.0, f64::max)
}

/// Lowercased word tokens of a phrase.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// Aggregate similarity between two token lists.
///
/// Each token of `a` contributes its best match in `b`; the sum is normalised by
/// `sqrt(|a|) * sqrt(|b|)` and clamped to `[0, 1]`. Not symmetric when the
/// lists differ in length.
pub fn token_set_similarity<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .map(|token| best_similarity(token.as_ref(), b))
        .sum();

    let norm = ((a.len() * b.len()) as f64).sqrt();
    (dot / norm).clamp(0.0, 1.0)
}
