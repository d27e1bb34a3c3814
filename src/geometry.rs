//! Geometry primitives – page constants, rectangles and the pure sizing
//! helpers shared by the estimator and the renderer.
//!
//! All lengths are millimetres measured from the top-left corner of the page.
//! Conversion to PDF points (bottom-left origin) happens only in [`crate::render`].

use serde::{Deserialize, Serialize};

/// A4 portrait width.
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4 portrait height.
pub const PAGE_HEIGHT_MM: f32 = 297.0;
/// Left and right page margin.
pub const MARGIN_X_MM: f32 = 14.0;
/// Space kept free at the bottom of every page (footer lives inside it).
pub const BOTTOM_MARGIN_MM: f32 = 16.0;

/// Millimetres → PDF points.
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Minimum height of an entry's text box.
const MIN_TEXT_BLOCK_MM: f32 = 18.0;
/// Vertical space reserved per wrapped text line.
pub const TEXT_LINE_PITCH_MM: f32 = 5.0;
/// Fixed vertical padding added to every text box.
const TEXT_BLOCK_PADDING_MM: f32 = 10.0;

/// Width available to content between the horizontal margins.
pub fn content_width() -> f32 {
    PAGE_WIDTH_MM - MARGIN_X_MM * 2.0
}

/// Lowest y a block may reach before a page break is required.
pub fn page_bottom_limit() -> f32 {
    PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM
}

/// An axis-aligned rectangle in page millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shift the rectangle by `(dx, dy)`.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Shrink the rectangle by `amount` on every side.
    pub fn inset(self, amount: f32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2.0).max(0.0),
            height: (self.height - amount * 2.0).max(0.0),
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Height of a text box holding `line_count` wrapped lines.
///
/// The floor keeps short (or empty) texts from collapsing the box.
pub fn text_block_height(line_count: usize) -> f32 {
    (line_count as f32 * TEXT_LINE_PITCH_MM + TEXT_BLOCK_PADDING_MM).max(MIN_TEXT_BLOCK_MM)
}

/// Fit a `src_w` × `src_h` raster inside `frame`, preserving aspect ratio,
/// and centre it ("object-fit: contain").
///
/// A degenerate source (zero width or height) fills the frame.
pub fn contain_fit(src_w: u32, src_h: u32, frame: Rect) -> Rect {
    if src_w == 0 || src_h == 0 {
        return frame;
    }
    let scale = (frame.width / src_w as f32).min(frame.height / src_h as f32);
    let draw_w = src_w as f32 * scale;
    let draw_h = src_h as f32 * scale;
    Rect {
        x: frame.x + (frame.width - draw_w) / 2.0,
        y: frame.y + (frame.height - draw_h) / 2.0,
        width: draw_w,
        height: draw_h,
    }
}
