//! Entry block layout – the vertical footprint and internal geometry of one
//! report entry, independent of where on the page it ends up.
//!
//! Coordinates in an [`EntryBlock`] are relative to the top-left corner of the
//! entry's outer frame; the engine offsets them once the pagination
//! controller has fixed the block's position.

use crate::fonts::{wrap_text, FontManager};
use crate::geometry::{text_block_height, Rect};
use crate::model::Entry;

/// Inner padding of the entry frame.
pub const ENTRY_PADDING_MM: f32 = 6.0;
/// Height of one photo cell.
pub const PHOTO_CELL_HEIGHT_MM: f32 = 55.0;
/// Gap between photo cells, both directions.
pub const PHOTO_GRID_GAP_MM: f32 = 6.0;
pub const PHOTO_GRID_COLUMNS: usize = 2;
/// Row holding the "Photos" label, measured from the text box bottom to the
/// label baseline.
const PHOTO_LABEL_ROW_MM: f32 = 10.0;
/// Label baseline to the top of the grid.
const PHOTO_LABEL_GAP_MM: f32 = 6.0;

/// Font size of entry text and the photo label.
pub const BODY_FONT_SIZE: f32 = 11.0;
/// Line-height factor used when drawing wrapped entry text.
pub const BODY_LINE_HEIGHT_FACTOR: f32 = 1.15;
/// First text baseline below the text box top.
const TEXT_BASELINE_OFFSET_MM: f32 = 7.0;

pub const FRAME_RADIUS_MM: f32 = 4.0;
pub const INNER_RADIUS_MM: f32 = 3.0;

/// Geometry of one laid-out entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryBlock {
    /// Total height of the outer frame.
    pub height: f32,
    pub text_lines: Vec<String>,
    pub text_frame: Rect,
    /// Left edge and first baseline of the text.
    pub text_origin: (f32, f32),
    /// Baseline origin of the "Photos" label, when the entry has photos.
    pub photo_label_origin: Option<(f32, f32)>,
    /// Photo cells in row-major order, one per laid-out photo.
    pub photo_cells: Vec<Rect>,
    pub frame: Rect,
}

impl EntryBlock {
    pub fn photo_rows(&self) -> usize {
        rows_for(self.photo_cells.len())
    }
}

fn rows_for(photos: usize) -> usize {
    if photos > 2 {
        2
    } else if photos > 0 {
        1
    } else {
        0
    }
}

/// Height of a photo grid with `rows` rows.
pub fn photo_grid_height(rows: usize) -> f32 {
    if rows == 0 {
        return 0.0;
    }
    rows as f32 * PHOTO_CELL_HEIGHT_MM + (rows - 1) as f32 * PHOTO_GRID_GAP_MM
}

/// Lay out `entry` inside a frame `content_width` wide.
///
/// Returns `None` for an empty entry: it takes no space and is never drawn.
/// Only the first four photos are considered; a three-photo entry still
/// reserves two full rows.
pub fn layout_entry(entry: &Entry, content_width: f32, fonts: &FontManager) -> Option<EntryBlock> {
    if entry.is_empty() {
        return None;
    }

    let padding = ENTRY_PADDING_MM;

    let text_lines = wrap_text(
        &entry.text,
        BODY_FONT_SIZE,
        false,
        content_width - padding * 4.0,
        fonts,
    );
    let text_height = text_block_height(text_lines.len());

    let photo_count = entry.laid_out_photos().len();
    let has_photos = photo_count > 0;
    let photos_height = photo_grid_height(rows_for(photo_count));

    let height = padding
        + text_height
        + if has_photos {
            PHOTO_LABEL_ROW_MM + PHOTO_LABEL_GAP_MM + photos_height
        } else {
            0.0
        }
        + padding;

    let inner_width = content_width - padding * 2.0;
    let text_frame = Rect::new(padding, padding, inner_width, text_height);
    let text_origin = (padding * 2.0, padding + TEXT_BASELINE_OFFSET_MM);

    let label_y = padding + text_height + PHOTO_LABEL_ROW_MM;
    let grid_top = label_y + PHOTO_LABEL_GAP_MM;
    let cell_width = (inner_width - PHOTO_GRID_GAP_MM) / PHOTO_GRID_COLUMNS as f32;
    let photo_cells = (0..photo_count)
        .map(|i| {
            let col = i % PHOTO_GRID_COLUMNS;
            let row = i / PHOTO_GRID_COLUMNS;
            Rect::new(
                padding + col as f32 * (cell_width + PHOTO_GRID_GAP_MM),
                grid_top + row as f32 * (PHOTO_CELL_HEIGHT_MM + PHOTO_GRID_GAP_MM),
                cell_width,
                PHOTO_CELL_HEIGHT_MM,
            )
        })
        .collect();

    Some(EntryBlock {
        height,
        text_lines,
        text_frame,
        text_origin,
        photo_label_origin: has_photos.then_some((padding, label_y)),
        photo_cells,
        frame: Rect::new(0.0, 0.0, content_width, height),
    })
}
