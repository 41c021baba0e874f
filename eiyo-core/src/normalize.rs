//! Text normalization for name comparison.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize a string for comparison.
///
/// Applies NFKC (folds full-width ASCII to half-width, half-width katakana to
/// full-width, U+3000 to a plain space), then collapses every whitespace run to
/// a single ASCII space and trims both ends. Idempotent.
pub fn normalize(s: &str) -> String {
    let folded: String = s.nfkc().collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
