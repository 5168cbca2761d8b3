//! # Text Normalization Module
//!
//! ## Purpose
//! Turkish-locale case folding shared by the matcher, the query cache key, and
//! the API layer. Every piece of text that participates in matching passes
//! through here exactly once on each side of the comparison.
//!
//! ## Input/Output Specification
//! - **Input**: Raw field values and query strings (possibly absent)
//! - **Output**: Fully lowercased strings under Turkish casing rules
//!
//! ## Key Features
//! - Folds the Turkish uppercase letters before generic lowercasing, so that
//!   dotless `I` maps to `ı` instead of the `i` Unicode lowercasing produces
//! - Total: absent input maps to the empty string, never panics
//! - Idempotent: normalizing twice equals normalizing once

use unicode_normalization::UnicodeNormalization;

/// Turkish uppercase letters and their locale-correct lowercase forms.
/// `İ` must be handled here as well: Unicode lowercasing expands it to
/// `i` plus a combining dot, which would break substring matching.
const TURKISH_FOLD: &[(char, char)] = &[
    ('İ', 'i'),
    ('I', 'ı'),
    ('Ş', 'ş'),
    ('Ğ', 'ğ'),
    ('Ü', 'ü'),
    ('Ö', 'ö'),
    ('Ç', 'ç'),
];

/// Lowercase `text` under Turkish casing rules.
///
/// Applies NFC normalization, folds the Turkish letters from the table above,
/// then lowercases everything else generically.
pub fn normalize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.nfc() {
        match TURKISH_FOLD.iter().find(|(upper, _)| *upper == ch) {
            Some((_, lower)) => result.push(*lower),
            None => result.extend(ch.to_lowercase()),
        }
    }
    result
}

/// Normalize an optional value, mapping absent input to the empty string
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}
