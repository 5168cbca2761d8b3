//! # Context Window Module
//!
//! ## Purpose
//! Extracts a bounded window of surrounding paragraphs around a matched
//! explanatory-notes record, so the client can show the match in context.
//!
//! ## Input/Output Specification
//! - **Input**: Paragraph corpus, target stable index, window radius
//! - **Output**: Contiguous slice of at most `2*radius+1` records with the
//!   target flagged, or `found = false` when the index is absent
//!
//! ## Key Features
//! - Window clamps at corpus boundaries; it never wraps or pads
//! - Exactly one entry carries the target flag on a successful lookup
//! - Absent index yields an empty window, surfaced as HTTP 404 by the caller

use crate::datasets::Record;

/// Window radius used by the explanatory-notes context endpoint
pub const DEFAULT_CONTEXT_RADIUS: usize = 25;

/// One entry of a context window
#[derive(Debug)]
pub struct ContextEntry<'a> {
    pub record: &'a Record,
    /// True only for the record whose stable index was requested
    pub is_target: bool,
}

/// A bounded slice of the paragraph corpus around a target record
#[derive(Debug)]
pub struct ContextWindow<'a> {
    pub entries: Vec<ContextEntry<'a>>,
    /// False when the requested stable index is absent from the corpus;
    /// the entries are empty in that case
    pub found: bool,
}

/// Extract the window of `radius` records on either side of the record whose
/// stable index equals `target_index`. The slice is inclusive and clamped at
/// the corpus boundaries, so its length ranges from `radius + 1` (target at a
/// boundary) to `2 * radius + 1` (target in the interior).
pub fn context_window<'a>(
    records: &'a [Record],
    target_index: i64,
    radius: usize,
) -> ContextWindow<'a> {
    let position = records
        .iter()
        .position(|row| row.stable_index() == Some(target_index));

    let Some(p) = position else {
        return ContextWindow {
            entries: Vec::new(),
            found: false,
        };
    };

    let start = p.saturating_sub(radius);
    let end = (p + radius).min(records.len() - 1);

    let entries = records[start..=end]
        .iter()
        .enumerate()
        .map(|(offset, record)| ContextEntry {
            record,
            is_target: start + offset == p,
        })
        .collect();

    ContextWindow {
        entries,
        found: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paragraph_corpus(len: usize) -> Vec<Record> {
        (0..len)
            .map(|i| {
                let value = json!({ "index": i as i64, "paragraf": format!("paragraf {}", i) });
                match value {
                    serde_json::Value::Object(map) => Record(map),
                    _ => unreachable!(),
                }
            })
            .collect()
    }

    fn target_count(window: &ContextWindow<'_>) -> usize {
        window.entries.iter().filter(|e| e.is_target).count()
    }

    #[test]
    fn test_interior_target_gets_full_window() {
        let corpus = paragraph_corpus(200);
        let window = context_window(&corpus, 100, DEFAULT_CONTEXT_RADIUS);
        assert!(window.found);
        assert_eq!(window.entries.len(), 51);
        assert_eq!(target_count(&window), 1);
        assert_eq!(window.entries[25].record.stable_index(), Some(100));
        assert!(window.entries[25].is_target);
    }

    #[test]
    fn test_window_clamps_at_start() {
        let corpus = paragraph_corpus(200);
        let window = context_window(&corpus, 3, 25);
        assert!(window.found);
        // positions 0..=28: min(25, 3) before + min(25, 196) after + target
        assert_eq!(window.entries.len(), 3 + 25 + 1);
        assert_eq!(window.entries[0].record.stable_index(), Some(0));
        assert_eq!(target_count(&window), 1);
    }

    #[test]
    fn test_window_clamps_at_end() {
        let corpus = paragraph_corpus(100);
        let window = context_window(&corpus, 99, 25);
        assert!(window.found);
        assert_eq!(window.entries.len(), 26);
        assert!(window.entries.last().unwrap().is_target);
    }

    #[test]
    fn test_window_length_formula() {
        let corpus = paragraph_corpus(60);
        for p in [0usize, 1, 10, 24, 25, 30, 58, 59] {
            let window = context_window(&corpus, p as i64, 25);
            let expected = p.min(25) + (59 - p).min(25) + 1;
            assert_eq!(window.entries.len(), expected, "target position {}", p);
            assert_eq!(target_count(&window), 1);
        }
    }

    #[test]
    fn test_absent_index_is_not_found() {
        let corpus = paragraph_corpus(50);
        let window = context_window(&corpus, 5000, 25);
        assert!(!window.found);
        assert!(window.entries.is_empty());
    }

    #[test]
    fn test_stable_index_is_independent_of_position() {
        // Corpus whose stable indices are offset from their positions
        let corpus: Vec<Record> = (0..40)
            .map(|i| {
                let value = json!({ "index": 1000 + i as i64, "paragraf": "p" });
                match value {
                    serde_json::Value::Object(map) => Record(map),
                    _ => unreachable!(),
                }
            })
            .collect();

        let window = context_window(&corpus, 1030, 5);
        assert!(window.found);
        assert_eq!(window.entries.len(), 11);
        let target = window.entries.iter().find(|e| e.is_target).unwrap();
        assert_eq!(target.record.stable_index(), Some(1030));
    }

    #[test]
    fn test_zero_radius_returns_only_the_target() {
        let corpus = paragraph_corpus(10);
        let window = context_window(&corpus, 4, 0);
        assert!(window.found);
        assert_eq!(window.entries.len(), 1);
        assert!(window.entries[0].is_target);
    }
}
