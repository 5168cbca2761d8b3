//! # Matcher Module
//!
//! ## Purpose
//! Dual-mode filter over an ordered record sequence, parameterized by which
//! fields to search. One generic matcher replaces a bespoke matching function
//! per dataset; the per-dataset field list is configuration.
//!
//! ## Input/Output Specification
//! - **Input**: Record slice, raw query string, ordered search-field list
//! - **Output**: Matching records in original corpus order, never rescored
//! - **Modes**: numeric-prefix (all-digit query), keyword-AND (free text)
//!
//! ## Key Features
//! - All-digit queries match as a raw prefix on the first configured field
//! - Free-text queries match when every keyword is a substring of the
//!   normalized concatenation of the configured fields, order-independent
//! - Empty and whitespace-only queries return no rows
//! - Pure function over an immutable corpus snapshot, safe to run from any
//!   number of requests concurrently

use crate::datasets::Record;
use crate::text::normalize;
use regex::Regex;
use std::sync::OnceLock;

/// Matches queries consisting solely of ASCII digits
fn digits_regex() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"^\d+$").unwrap())
}

/// Filter `records` with `query` over the given `fields`.
///
/// An all-digit query selects records whose first configured field starts
/// with the raw digits; digits are never normalized and fields beyond the
/// first are ignored in this mode. Any other query is normalized, split on
/// spaces, and a record matches when every keyword occurs somewhere in the
/// normalized space-joined field text. The empty query returns no rows.
pub fn match_records<'a>(
    records: &'a [Record],
    query: &str,
    fields: &[String],
) -> Vec<&'a Record> {
    let query = query.trim();
    if query.is_empty() || fields.is_empty() {
        return Vec::new();
    }

    if digits_regex().is_match(query) {
        let code_field = &fields[0];
        records
            .iter()
            .filter(|row| row.field(code_field).starts_with(query))
            .collect()
    } else {
        let normalized = normalize(query);
        let keywords: Vec<&str> = normalized.split(' ').filter(|k| !k.is_empty()).collect();

        records
            .iter()
            .filter(|row| {
                let text = fields
                    .iter()
                    .map(|field| normalize(&row.field(field)))
                    .collect::<Vec<_>>()
                    .join(" ");
                keywords.iter().all(|keyword| text.contains(keyword))
            })
            .collect()
    }
}
