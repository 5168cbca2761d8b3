//! # Virtual List Module
//!
//! ## Purpose
//! Client-side list virtualization: given an ordered item sequence and fixed
//! row geometry, computes the visible sub-range for the current scroll offset
//! and exposes a programmatic scroll-to-row operation. Only rows intersecting
//! the viewport are ever materialized, so render cost is O(visible rows)
//! regardless of result-set size.
//!
//! ## Input/Output Specification
//! - **Input**: item count, row height, viewport height, scroll offset
//! - **Output**: visible index range, absolute row offsets, total scrollable
//!   height (so the scrollbar thumb stays accurate)
//!
//! ## Key Features
//! - `scroll_to_index` with top, center, and bottom alignment
//! - A row whose render callback fails degrades to a placeholder slot;
//!   the rest of the window still renders
//! - `RequestSequencer` tags in-flight searches so a stale response never
//!   overwrites a newer result list

use std::sync::atomic::{AtomicU64, Ordering};

/// Target alignment for `scroll_to_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Row top at the top of the viewport
    Top,
    /// Row centered within the viewport
    Center,
    /// Row bottom at the bottom of the viewport
    Bottom,
}

/// One materialized row of the visible window
#[derive(Debug)]
pub struct RowSlot<V> {
    pub index: usize,
    /// Absolute offset from the top of the scrollable surface
    pub top: u64,
    pub height: u32,
    /// None when the row's render callback failed; the caller shows a
    /// placeholder for this slot only
    pub view: Option<V>,
}

/// Viewport state over an ordered item sequence with uniform row height.
/// Purely derived from scroll and resize events, never persisted.
#[derive(Debug, Clone)]
pub struct VirtualList {
    item_count: usize,
    row_height: u32,
    viewport_height: u32,
    scroll_top: u64,
}

impl VirtualList {
    pub fn new(item_count: usize, row_height: u32, viewport_height: u32) -> Self {
        Self {
            item_count,
            row_height: row_height.max(1),
            viewport_height,
            scroll_top: 0,
        }
    }

    /// Total scrollable height; keeps the scrollbar thumb size accurate
    pub fn total_height(&self) -> u64 {
        self.item_count as u64 * self.row_height as u64
    }

    pub fn scroll_top(&self) -> u64 {
        self.scroll_top
    }

    /// Absolute offset of a row on the scrollable surface
    pub fn row_top(&self, index: usize) -> u64 {
        index as u64 * self.row_height as u64
    }

    fn max_scroll(&self) -> u64 {
        self.total_height()
            .saturating_sub(self.viewport_height as u64)
    }

    /// Apply a scroll event, clamped to the scrollable range
    pub fn set_scroll_top(&mut self, scroll_top: u64) {
        self.scroll_top = scroll_top.min(self.max_scroll());
    }

    /// Swap in a new result list, keeping the scroll offset in range
    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    /// Apply a viewport resize
    pub fn resize(&mut self, viewport_height: u32) {
        self.viewport_height = viewport_height;
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    /// Inclusive index range of rows intersecting the viewport, or None for
    /// an empty list
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        if self.item_count == 0 {
            return None;
        }
        let row_height = self.row_height as u64;
        let start = (self.scroll_top / row_height) as usize;
        let end = ((self.scroll_top + self.viewport_height as u64) / row_height) as usize;
        Some((start, end.min(self.item_count - 1)))
    }

    /// Scroll so the row at `index` lands at the requested alignment.
    /// Out-of-range indices are a no-op.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) {
        if index >= self.item_count {
            return;
        }
        let row_height = self.row_height as i64;
        let viewport_height = self.viewport_height as i64;
        let row_top = index as i64 * row_height;

        let target = match align {
            Align::Top => row_top,
            Align::Bottom => row_top + row_height - viewport_height,
            Align::Center => row_top - (viewport_height - row_height) / 2,
        };

        self.scroll_top = (target.max(0) as u64).min(self.max_scroll());
    }

    /// Materialize the visible rows through `render_row`. A failing row
    /// yields a placeholder slot instead of blanking the whole window.
    pub fn visible_rows<V, E, F>(&self, mut render_row: F) -> Vec<RowSlot<V>>
    where
        E: std::fmt::Display,
        F: FnMut(usize) -> Result<V, E>,
    {
        let Some((start, end)) = self.visible_range() else {
            return Vec::new();
        };

        (start..=end)
            .map(|index| {
                let view = match render_row(index) {
                    Ok(view) => Some(view),
                    Err(e) => {
                        tracing::warn!(index, error = %e, "row render failed, using placeholder");
                        None
                    }
                };
                RowSlot {
                    index,
                    top: self.row_top(index),
                    height: self.row_height,
                    view,
                }
            })
            .collect()
    }
}

/// Monotonic ticket counter for in-flight searches. A response is applied
/// only while its ticket is still the latest issued, so a slow earlier
/// request cannot overwrite the results of a later one.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a request about to be dispatched
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a response carrying `ticket` is still the latest
    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_window_over_large_list() {
        let list = VirtualList::new(10_000, 30, 300);
        assert_eq!(list.visible_range(), Some((0, 10)));
        assert_eq!(list.total_height(), 300_000);
    }

    #[test]
    fn test_visible_range_tracks_scroll() {
        let mut list = VirtualList::new(10_000, 30, 300);
        list.set_scroll_top(45);
        // row 1 partially above, row 11 partially below
        assert_eq!(list.visible_range(), Some((1, 11)));
    }

    #[test]
    fn test_scroll_to_bottom_alignment() {
        let mut list = VirtualList::new(10_000, 30, 300);
        list.scroll_to_index(9999, Align::Bottom);
        assert_eq!(list.scroll_top(), 10_000 * 30 - 300);
        let (start, end) = list.visible_range().unwrap();
        assert!(start <= 9999 && 9999 <= end);
    }

    #[test]
    fn test_scroll_to_top_and_center_alignment() {
        let mut list = VirtualList::new(1000, 30, 300);

        list.scroll_to_index(100, Align::Top);
        assert_eq!(list.scroll_top(), 3000);

        list.scroll_to_index(100, Align::Center);
        assert_eq!(list.scroll_top(), 100 * 30 - (300 - 30) / 2);

        // near the top, center alignment clamps to zero
        list.scroll_to_index(1, Align::Center);
        assert_eq!(list.scroll_top(), 0);
    }

    #[test]
    fn test_out_of_range_scroll_is_a_no_op() {
        let mut list = VirtualList::new(100, 30, 300);
        list.set_scroll_top(600);
        let before = list.scroll_top();
        list.scroll_to_index(100, Align::Top);
        list.scroll_to_index(usize::MAX, Align::Center);
        assert_eq!(list.scroll_top(), before);
    }

    #[test]
    fn test_scroll_clamps_to_scrollable_range() {
        let mut list = VirtualList::new(20, 30, 300);
        list.set_scroll_top(1_000_000);
        assert_eq!(list.scroll_top(), 20 * 30 - 300);

        // shrinking the result list pulls the offset back in range
        list.set_item_count(10);
        assert_eq!(list.scroll_top(), 0);
    }

    #[test]
    fn test_empty_list_has_no_visible_rows() {
        let list = VirtualList::new(0, 30, 300);
        assert_eq!(list.visible_range(), None);
        assert_eq!(list.total_height(), 0);
        let rows = list.visible_rows(|i| Ok::<_, String>(i));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_rendered_rows_intersect_the_viewport() {
        let mut list = VirtualList::new(10_000, 30, 300);
        list.set_scroll_top(12_345);
        let (start, end) = list.visible_range().unwrap();
        for index in start..=end {
            let top = list.row_top(index);
            assert!(top < 12_345 + 300);
            assert!(top + 30 > 12_345);
        }
        // the rows just outside the window fall outside the viewport
        assert!(list.row_top(start).saturating_sub(30) < 12_345);
        assert!(list.row_top(end + 1) + 30 > 12_345 + 300);
    }

    #[test]
    fn test_failing_row_degrades_to_placeholder() {
        let list = VirtualList::new(5, 30, 300);
        let rows = list.visible_rows(|i| {
            if i == 2 {
                Err("bad row".to_string())
            } else {
                Ok(format!("row {}", i))
            }
        });
        assert_eq!(rows.len(), 5);
        assert!(rows[2].view.is_none());
        assert_eq!(rows[3].view.as_deref(), Some("row 3"));
        assert_eq!(rows[4].top, 120);
    }

    #[test]
    fn test_stale_responses_are_discarded() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.begin();
        let second = sequencer.begin();

        // the slower first response arrives after the second was dispatched
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }
}
