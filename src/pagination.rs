//! Pagination – the cursor-driven greedy fitter deciding when accumulated
//! content forces a new page.
//!
//! Handles:
//! - A4 page boundaries with the fixed bottom margin
//! - First-page vs continuation header reservations
//! - The trailing gap reserved before every entry

use crate::geometry::page_bottom_limit;
use crate::header::{draw_header, HeaderContent, HeaderMetrics};
use crate::surface::Surface;

/// Space reserved below an entry when checking whether it fits.
pub const ENTRY_BREAK_RESERVE_MM: f32 = 10.0;
/// Distance the cursor advances past an entry once it is placed.
pub const ENTRY_ADVANCE_GAP_MM: f32 = 12.0;

/// Cursor state for one layout run. Never shared between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginator {
    y: f32,
    page_count: usize,
}

impl Paginator {
    /// Draw the first-page header and position the cursor below it.
    pub fn start<S: Surface>(surface: &mut S, header: &HeaderContent<'_>) -> Result<Self, S::Error> {
        let y = draw_header(surface, header, true)?;
        Ok(Self { y, page_count: 1 })
    }

    /// Current cursor, in mm from the page top.
    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Break to a new page if `needed` millimetres do not fit below the
    /// cursor. Returns whether a break happened.
    ///
    /// Breaks at most once: content taller than a whole page overflows the
    /// fresh page rather than cascading.
    pub fn ensure_space<S: Surface>(
        &mut self,
        needed: f32,
        surface: &mut S,
        header: &HeaderContent<'_>,
    ) -> Result<bool, S::Error> {
        if self.y + needed <= page_bottom_limit() {
            return Ok(false);
        }
        surface.add_page();
        self.page_count += 1;
        log::debug!(
            "Page break: y={:.2} + needed={:.2} > {:.2}, starting page {}",
            self.y,
            needed,
            page_bottom_limit(),
            self.page_count
        );
        self.y = draw_header(surface, header, false)?;
        Ok(true)
    }

    /// Move the cursor down by `dy`.
    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }
}

/// Height available to an entry (including its break reserve) on a fresh
/// continuation page.
pub fn continuation_capacity() -> f32 {
    page_bottom_limit() - HeaderMetrics::CONTINUATION.content_start()
}
