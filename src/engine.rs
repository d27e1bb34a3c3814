//! Layout engine – the single arithmetic core shared by the page estimator
//! and the PDF renderer.
//!
//! Walks the entries in order, measures each block, lets the paginator decide
//! on page breaks and draws the block into whatever [`Surface`] it was given.

use crate::entry_layout::{
    layout_entry, EntryBlock, BODY_FONT_SIZE, BODY_LINE_HEIGHT_FACTOR, FRAME_RADIUS_MM,
    INNER_RADIUS_MM,
};
use crate::fonts::FontManager;
use crate::geometry::{content_width, MARGIN_X_MM};
use crate::header::HeaderContent;
use crate::model::{Entry, ReportDocument, MAX_PHOTOS_PER_ENTRY};
use crate::pagination::{
    continuation_capacity, Paginator, ENTRY_ADVANCE_GAP_MM, ENTRY_BREAK_RESERVE_MM,
};
use crate::surface::{ImageRole, Surface, TextAlign, TextStyle};

pub const PHOTOS_LABEL: &str = "Photos";

const OUTER_FRAME_GRAY: u8 = 220;
const TEXT_FRAME_GRAY: u8 = 200;
const PHOTO_FRAME_GRAY: u8 = 220;
/// Gap between a photo cell's frame and the image inside it.
const PHOTO_INSET_MM: f32 = 1.0;

/// What a layout run produced besides the drawing itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOutcome {
    pub page_count: usize,
    /// Non-empty entries that were placed.
    pub entries_placed: usize,
}

/// Lay out every entry of `doc` onto `surface`, starting with the first-page
/// header. Footers are not drawn here; they need the final page count.
pub fn lay_out<S: Surface>(
    doc: &ReportDocument,
    fonts: &FontManager,
    surface: &mut S,
) -> Result<LayoutOutcome, S::Error> {
    let header = HeaderContent::from_document(doc);
    let mut paginator = Paginator::start(surface, &header)?;
    let width = content_width();
    let mut entries_placed = 0;

    for (index, entry) in doc.entries.iter().enumerate() {
        let Some(block) = layout_entry(entry, width, fonts) else {
            continue;
        };

        if entry.photos.len() > MAX_PHOTOS_PER_ENTRY {
            log::warn!(
                "Entry {index} has {} photos; only the first {MAX_PHOTOS_PER_ENTRY} are laid out",
                entry.photos.len()
            );
        }
        let needed = block.height + ENTRY_BREAK_RESERVE_MM;
        if needed > continuation_capacity() {
            log::warn!(
                "Entry {index} is {:.1}mm tall and will overflow its page",
                block.height
            );
        }

        paginator.ensure_space(needed, surface, &header)?;
        log::debug!(
            "Entry {index}: height={:.2} at y={:.2} on page {}",
            block.height,
            paginator.y(),
            paginator.page_count()
        );
        draw_entry(surface, entry, &block, paginator.y(), fonts)?;
        paginator.advance(block.height + ENTRY_ADVANCE_GAP_MM);
        entries_placed += 1;
    }

    Ok(LayoutOutcome {
        page_count: paginator.page_count(),
        entries_placed,
    })
}

fn draw_entry<S: Surface>(
    surface: &mut S,
    entry: &Entry,
    block: &EntryBlock,
    y: f32,
    fonts: &FontManager,
) -> Result<(), S::Error> {
    let x = MARGIN_X_MM;

    surface.rounded_rect(block.frame.offset(x, y), FRAME_RADIUS_MM, OUTER_FRAME_GRAY);
    surface.rounded_rect(block.text_frame.offset(x, y), INNER_RADIUS_MM, TEXT_FRAME_GRAY);

    let pitch = fonts.line_height_mm(BODY_FONT_SIZE, BODY_LINE_HEIGHT_FACTOR);
    let (text_x, text_y) = block.text_origin;
    for (i, line) in block.text_lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        surface.text(
            line,
            x + text_x,
            y + text_y + i as f32 * pitch,
            TextStyle::regular(BODY_FONT_SIZE),
            TextAlign::Left,
        );
    }

    if let Some((label_x, label_y)) = block.photo_label_origin {
        surface.text(
            PHOTOS_LABEL,
            x + label_x,
            y + label_y,
            TextStyle::bold(BODY_FONT_SIZE),
            TextAlign::Left,
        );
        for (photo, cell) in entry.laid_out_photos().iter().zip(&block.photo_cells) {
            let cell = cell.offset(x, y);
            surface.rounded_rect(cell, INNER_RADIUS_MM, PHOTO_FRAME_GRAY);
            surface.image_contain(photo, ImageRole::Photo, cell.inset(PHOTO_INSET_MM))?;
        }
    }

    Ok(())
}
