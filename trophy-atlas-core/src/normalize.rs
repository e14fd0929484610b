//! Title normalization for cross-source matching.
//!
//! The game-list feed and the trophy feed spell the same title differently:
//! trademark glyphs, accents, punctuation, and casing all vary between them
//! (and between regional releases). Matching happens on a canonical key that
//! strips all of that away.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Trademark glyphs that storefront feeds attach inconsistently.
const TRADEMARK_GLYPHS: &[char] = &['\u{00AE}', '\u{2122}', '\u{2120}'];

/// Derive the canonical matching key for a title.
///
/// NFKD-decomposes the string, drops combining marks and trademark glyphs,
/// lowercases, keeps only ASCII letters, digits, and whitespace, collapses
/// whitespace runs to single spaces, and trims. The function is pure and
/// idempotent; unusable input yields an empty key, which callers must never
/// treat as a valid match target.
///
/// # Examples
///
/// ```
/// use trophy_atlas_core::normalize::normalize_title;
///
/// assert_eq!(normalize_title("Caf\u{e9}\u{2122} Deluxe"), "cafe deluxe");
/// assert_eq!(normalize_title("  NieR:Automata\u{2122}  "), "nierautomata");
/// assert_eq!(normalize_title("\u{2620}"), "");
/// ```
pub fn normalize_title(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut pending_space = false;

    for ch in raw.nfkd() {
        if is_combining_mark(ch) || TRADEMARK_GLYPHS.contains(&ch) {
            continue;
        }
        for lower in ch.to_lowercase() {
            if lower.is_whitespace() {
                pending_space = true;
            } else if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
                // Collapse runs of whitespace and drop leading spaces here;
                // trailing spaces never get pushed at all.
                if pending_space && !key.is_empty() {
                    key.push(' ');
                }
                pending_space = false;
                key.push(lower);
            }
            // Anything else is punctuation and is dropped.
        }
    }

    key
}
