//! Windowing engine - maps a large ordered collection onto the rows that
//! are actually worth rendering for the current scroll position.
//!
//! Everything here is a pure computation. The caller owns the scroll offset
//! and must ask for a fresh window on every scroll or resize.

use std::num::NonZeroU32;
use std::ops::Range;

/// Visible slice of a collection plus the geometry needed to place it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    /// First index eligible for rendering (inclusive)
    pub start_index: usize,
    /// One past the last index eligible for rendering
    pub end_index: usize,
    /// Pixel position of `start_index` inside the full scroll track
    pub offset_y: u64,
    /// Height of the whole collection, used to size the scroll track
    pub total_height: u64,
}

impl Window {
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// The items covered by this window. Out-of-range bounds (a window
    /// computed for a longer collection) are clamped rather than panicking.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end_index.min(items.len());
        let start = self.start_index.min(end);
        &items[start..end]
    }

    /// Top edge of row `index` relative to the viewport top. Negative values
    /// are overscan rows sitting above the visible area.
    pub fn row_top(&self, index: usize, item_height: NonZeroU32, scroll_offset: u64) -> i64 {
        let rows_past_start = index.saturating_sub(self.start_index) as u64;
        let top = self
            .offset_y
            .saturating_add(rows_past_start.saturating_mul(u64::from(item_height.get())));
        clamp_to_i64(top) - clamp_to_i64(scroll_offset)
    }
}

/// Compute the window of rows to render.
///
/// `item_height` is uniform across all rows. `overscan` rows are added on
/// both sides of the visible region so fast scrolling does not reveal gaps.
pub fn compute_window(
    item_count: usize,
    item_height: NonZeroU32,
    viewport_height: u32,
    scroll_offset: u64,
    overscan: usize,
) -> Window {
    let height = u64::from(item_height.get());
    let total_height = (item_count as u64).saturating_mul(height);

    if item_count == 0 {
        return Window::default();
    }

    let first_visible = usize::try_from(scroll_offset / height).unwrap_or(usize::MAX);
    let start_index = first_visible.saturating_sub(overscan);

    let rows_in_viewport = u64::from(viewport_height).div_ceil(height) as usize;
    let visible_count = rows_in_viewport.saturating_add(overscan.saturating_mul(2));

    let end_index = item_count.min(start_index.saturating_add(visible_count));
    // A scroll offset far past the content would otherwise leave start > end.
    let start_index = start_index.min(end_index);

    Window {
        start_index,
        end_index,
        offset_y: (start_index as u64).saturating_mul(height),
        total_height,
    }
}

/// Largest scroll offset that still fills the viewport.
pub fn max_scroll_offset(total_height: u64, viewport_height: u32) -> u64 {
    total_height.saturating_sub(u64::from(viewport_height))
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
