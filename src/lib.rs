//! # daily-report-pdf – construction-site daily report layout and PDF export
//!
//! A report is a project name, a date, an optional logo and a list of
//! entries (text plus up to four photos). The crate turns it into an A4 PDF
//! and, through the very same arithmetic, predicts how many pages that PDF
//! will have. The pipeline stages are:
//!
//! 1. **Model** – report, entries and image sources ([`model`])
//! 2. **Measure** – text wrapping with Helvetica metrics ([`fonts`]) and
//!    per-entry block geometry ([`entry_layout`])
//! 3. **Lay out** – walk the entries, break pages, draw headers
//!    ([`engine`], [`pagination`], [`header`]) onto a [`surface::Surface`]
//! 4. **Finalize** – redraw headers and stamp `Page p / total` ([`pipeline`])
//! 5. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! The page estimator runs step 3 against a surface that draws nothing, so it
//! cannot disagree with the renderer.
//!
//! A C-compatible FFI surface is exposed via the [`ffi`] module.

pub mod engine;
pub mod entry_layout;
pub mod error;
pub mod ffi;
pub mod fonts;
pub mod geometry;
pub mod header;
pub mod images;
pub mod layout_config;
pub mod model;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod samples;
pub mod surface;

// Re-exports for convenience
pub use error::ReportError;
pub use layout_config::LayoutConfig;
pub use model::{Entry, ImageSource, ReportDocument};
pub use pipeline::{
    compute_layout_config, estimate_page_count, file_name, render_to_pdf, PipelineConfig,
    RenderedReport,
};
