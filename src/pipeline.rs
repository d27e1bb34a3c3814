//! Pipeline – the document assembler. Ties the layout engine, the footer
//! pass and PDF rendering into the two calls the application uses:
//! [`estimate_page_count`] and [`render_to_pdf`].

use crate::engine::lay_out;
use crate::error::ReportError;
use crate::fonts::FontManager;
use crate::header::{draw_footer, draw_header, HeaderContent};
use crate::images::{DEFAULT_PHOTO_MAX_WIDTH, DEFAULT_PHOTO_QUALITY};
use crate::layout_config::LayoutConfig;
use crate::model::ReportDocument;
use crate::render::render_pdf;
use crate::surface::{NullSurface, RecordingSurface, Surface};

/// Used in the file name when the project name is empty.
const FALLBACK_PROJECT_SLUG: &str = "site";

/// Configuration for the PDF generation pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Document title embedded in the PDF metadata (default: "Daily Report").
    pub title: String,
    /// Photos wider than this many pixels are scaled down (default: 1400).
    pub photo_max_width: u32,
    /// JPEG quality for embedded photos, 1–100 (default: 72).
    pub photo_quality: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title: "Daily Report".to_string(),
            photo_max_width: DEFAULT_PHOTO_MAX_WIDTH,
            photo_quality: DEFAULT_PHOTO_QUALITY,
        }
    }
}

/// A finished report.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub page_count: usize,
}

/// Number of pages [`render_to_pdf`] would produce for `doc`, without
/// decoding a single image.
pub fn estimate_page_count(doc: &ReportDocument) -> usize {
    let fonts = FontManager::default();
    let mut surface = NullSurface::new();
    match lay_out(doc, &fonts, &mut surface) {
        Ok(outcome) => outcome.page_count,
        Err(never) => match never {},
    }
}

/// Lay out `doc` and stamp the footers. No PDF bytes are produced.
pub fn compute_layout_config(
    doc: &ReportDocument,
    config: &PipelineConfig,
) -> Result<LayoutConfig, ReportError> {
    let fonts = FontManager::default();
    let mut surface = RecordingSurface::new(
        &config.title,
        &fonts,
        config.photo_max_width,
        config.photo_quality,
    );

    let outcome = lay_out(doc, &fonts, &mut surface)?;
    debug_assert_eq!(outcome.page_count, surface.page_count());

    finalize(&mut surface, &HeaderContent::from_document(doc))?;
    Ok(surface.into_layout())
}

/// Full pipeline: report → PDF bytes, generated file name and page count.
pub fn render_to_pdf(
    doc: &ReportDocument,
    config: &PipelineConfig,
) -> Result<RenderedReport, ReportError> {
    let layout = compute_layout_config(doc, config)?;
    let bytes = render_pdf(&layout)?;
    let file_name = file_name(doc);

    log::info!(
        "Rendered '{}' ({} bytes, {} page{})",
        file_name,
        bytes.len(),
        layout.page_count(),
        if layout.page_count() == 1 { "" } else { "s" }
    );

    Ok(RenderedReport {
        bytes,
        file_name,
        page_count: layout.page_count(),
    })
}

/// Second pass over finished pages: redraw each header (first page keeps
/// the large variant) and stamp `Page p / total`.
pub fn finalize<S: Surface>(surface: &mut S, header: &HeaderContent<'_>) -> Result<(), S::Error> {
    let total = surface.page_count();
    for index in 0..total {
        surface.set_page(index);
        draw_header(surface, header, index == 0)?;
        draw_footer(surface, index + 1, total);
    }
    Ok(())
}

/// `{report_date}__{project slug}__daily-report.pdf`
pub fn file_name(doc: &ReportDocument) -> String {
    let project = if doc.project_name.is_empty() {
        FALLBACK_PROJECT_SLUG
    } else {
        doc.project_name.as_str()
    };
    format!("{}__{}__daily-report.pdf", doc.report_date, slugify(project))
}

/// Lowercase, trim, drop everything but word characters, whitespace and
/// `-`, then turn whitespace runs and repeated hyphens into single hyphens.
pub fn slugify(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for ch in lowered
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
    {
        if ch == '-' || ch.is_whitespace() {
            pending_hyphen = true;
            continue;
        }
        if pending_hyphen {
            out.push('-');
            pending_hyphen = false;
        }
        out.push(ch);
    }
    if pending_hyphen {
        out.push('-');
    }
    out
}
