//! Page header and footer.
//!
//! The first page carries a larger header than continuation pages. The
//! header's vertical reservation is what the pagination controller resets
//! its cursor to, so these constants are shared by both the estimator and the
//! renderer.

use crate::geometry::{Rect, MARGIN_X_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::layout_config::Region;
use crate::model::ReportDocument;
use crate::surface::{ImageRole, Surface, TextAlign, TextStyle};

pub const REPORT_TITLE: &str = "Daily Report";

/// Footer baseline distance from the page bottom.
const FOOTER_OFFSET_MM: f32 = 10.0;
const FOOTER_FONT_SIZE: f32 = 9.0;
const FOOTER_GRAY: u8 = 140;
const META_GRAY: u8 = 80;
/// Project name and date baselines below the header top.
const PROJECT_LINE_OFFSET_MM: f32 = 7.0;
const DATE_LINE_OFFSET_MM: f32 = 13.0;

/// Size constants for one header variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderMetrics {
    pub top: f32,
    pub logo_box: f32,
    pub title_size: f32,
    pub meta_size: f32,
    /// Title baseline below `top`.
    pub title_offset: f32,
    /// Gap between the logo box bottom and the first content line.
    pub content_gap: f32,
}

impl HeaderMetrics {
    pub const FIRST_PAGE: HeaderMetrics = HeaderMetrics {
        top: 12.0,
        logo_box: 24.0,
        title_size: 15.0,
        meta_size: 11.0,
        title_offset: 11.0,
        content_gap: 14.0,
    };

    pub const CONTINUATION: HeaderMetrics = HeaderMetrics {
        top: 8.0,
        logo_box: 14.0,
        title_size: 11.0,
        meta_size: 9.0,
        title_offset: 9.0,
        content_gap: 10.0,
    };

    pub fn for_page(first_page: bool) -> Self {
        if first_page {
            Self::FIRST_PAGE
        } else {
            Self::CONTINUATION
        }
    }

    /// Cursor position where body content starts below this header.
    pub fn content_start(&self) -> f32 {
        self.top + self.logo_box + self.content_gap
    }
}

/// The document fields a header shows.
#[derive(Debug, Clone, Copy)]
pub struct HeaderContent<'a> {
    pub logo: Option<&'a crate::model::ImageSource>,
    pub project_name: &'a str,
    pub report_date: &'a str,
}

impl<'a> HeaderContent<'a> {
    pub fn from_document(doc: &'a ReportDocument) -> Self {
        Self {
            logo: doc.logo.as_ref(),
            project_name: &doc.project_name,
            report_date: &doc.report_date,
        }
    }
}

/// Draw the header of the active page and return the body cursor start.
///
/// Replaces whatever header the page already had.
pub fn draw_header<S: Surface>(
    surface: &mut S,
    content: &HeaderContent<'_>,
    first_page: bool,
) -> Result<f32, S::Error> {
    let m = HeaderMetrics::for_page(first_page);
    surface.begin_region(Region::Header);

    if let Some(logo) = content.logo {
        let frame = Rect::new(MARGIN_X_MM, m.top, m.logo_box, m.logo_box);
        surface.image_contain(logo, ImageRole::Logo, frame)?;
    }

    surface.text(
        REPORT_TITLE,
        PAGE_WIDTH_MM / 2.0,
        m.top + m.title_offset,
        TextStyle::bold(m.title_size),
        TextAlign::Center,
    );

    let right_x = PAGE_WIDTH_MM - MARGIN_X_MM;
    let meta = TextStyle::regular(m.meta_size).with_gray(META_GRAY);
    if !content.project_name.trim().is_empty() {
        surface.text(
            content.project_name,
            right_x,
            m.top + PROJECT_LINE_OFFSET_MM,
            meta,
            TextAlign::Right,
        );
    }
    surface.text(
        &format!("Report date: {}", content.report_date),
        right_x,
        m.top + DATE_LINE_OFFSET_MM,
        meta,
        TextAlign::Right,
    );

    surface.begin_region(Region::Body);
    Ok(m.content_start())
}

/// Footer label for page `page_number` (1-based) of `total`.
pub fn footer_label(page_number: usize, total: usize) -> String {
    format!("Page {page_number} / {total}")
}

/// Stamp the page-number footer on the active page.
pub fn draw_footer<S: Surface>(surface: &mut S, page_number: usize, total: usize) {
    surface.begin_region(Region::Footer);
    surface.text(
        &footer_label(page_number, total),
        PAGE_WIDTH_MM / 2.0,
        PAGE_HEIGHT_MM - FOOTER_OFFSET_MM,
        TextStyle::regular(FOOTER_FONT_SIZE).with_gray(FOOTER_GRAY),
        TextAlign::Center,
    );
    surface.begin_region(Region::Body);
}
