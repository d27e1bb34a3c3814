//! Drawing surfaces – the page-based sink the layout engine writes into.
//!
//! The engine is generic over [`Surface`]. The page estimator runs it against
//! [`NullSurface`], which only counts pages, and the renderer against
//! [`RecordingSurface`], which records [`DrawOp`]s per page and prepares the
//! embedded images. Both see exactly the same calls, so the pagination
//! arithmetic cannot drift between the two paths.

use std::convert::Infallible;

use crate::error::ReportError;
use crate::fonts::FontManager;
use crate::geometry::{contain_fit, Rect};
use crate::images::{self, PreparedImage};
use crate::layout_config::{DrawOp, EmbeddedImage, LayoutConfig, PageLayout, Region};
use crate::model::ImageSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub bold: bool,
    /// 0 = black, 255 = white.
    pub gray: u8,
}

impl TextStyle {
    pub const fn regular(font_size: f32) -> Self {
        Self {
            font_size,
            bold: false,
            gray: 0,
        }
    }

    pub const fn bold(font_size: f32) -> Self {
        Self {
            font_size,
            bold: true,
            gray: 0,
        }
    }

    pub const fn with_gray(self, gray: u8) -> Self {
        Self { gray, ..self }
    }
}

/// How an image is prepared before it is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// Embedded as supplied, once per document.
    Logo,
    /// Re-encoded as a size-capped JPEG.
    Photo,
}

/// A page-based drawing sink.
///
/// Page indices are zero-based. A new surface already holds its first page.
pub trait Surface {
    type Error;

    fn add_page(&mut self);
    fn set_page(&mut self, index: usize);
    fn page_count(&self) -> usize;

    /// Route subsequent draw calls to `region` of the active page. Starting
    /// the header or footer region discards what that region held, so
    /// redrawing a header is idempotent.
    fn begin_region(&mut self, region: Region);

    /// Draw one line of text. `y` is the baseline; `x` is interpreted
    /// according to `align`.
    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle, align: TextAlign);

    fn rounded_rect(&mut self, rect: Rect, radius: f32, stroke_gray: u8);

    /// Draw `source` contain-fit and centred inside `frame`.
    fn image_contain(
        &mut self,
        source: &ImageSource,
        role: ImageRole,
        frame: Rect,
    ) -> Result<(), Self::Error>;
}

// ---------------------------------------------------------------------------
// Null surface (page estimator)
// ---------------------------------------------------------------------------

/// Counts pages and ignores every drawing call. Never fails.
#[derive(Debug)]
pub struct NullSurface {
    pages: usize,
}

impl NullSurface {
    pub fn new() -> Self {
        Self { pages: 1 }
    }
}

impl Default for NullSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for NullSurface {
    type Error = Infallible;

    fn add_page(&mut self) {
        self.pages += 1;
    }

    fn set_page(&mut self, _index: usize) {}

    fn page_count(&self) -> usize {
        self.pages
    }

    fn begin_region(&mut self, _region: Region) {}

    fn text(&mut self, _text: &str, _x: f32, _y: f32, _style: TextStyle, _align: TextAlign) {}

    fn rounded_rect(&mut self, _rect: Rect, _radius: f32, _stroke_gray: u8) {}

    fn image_contain(
        &mut self,
        _source: &ImageSource,
        _role: ImageRole,
        _frame: Rect,
    ) -> Result<(), Infallible> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Recording surface (PDF renderer)
// ---------------------------------------------------------------------------

/// Records draw operations into a [`LayoutConfig`].
///
/// Photos are decoded and re-encoded one at a time, at the moment they are
/// placed, so peak memory stays bounded and image order follows draw order.
pub struct RecordingSurface<'f> {
    fonts: &'f FontManager,
    layout: LayoutConfig,
    current: usize,
    region: Region,
    photo_max_width: u32,
    photo_quality: u8,
    logo_image: Option<usize>,
}

impl<'f> RecordingSurface<'f> {
    pub fn new(title: &str, fonts: &'f FontManager, photo_max_width: u32, photo_quality: u8) -> Self {
        let mut layout = LayoutConfig::a4();
        layout.title = title.to_string();
        layout.image_quality = photo_quality;
        layout.pages.push(PageLayout::new(0));
        Self {
            fonts,
            layout,
            current: 0,
            region: Region::Body,
            photo_max_width,
            photo_quality,
            logo_image: None,
        }
    }

    /// Index of the active page.
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Finish recording and hand back the layout.
    pub fn into_layout(self) -> LayoutConfig {
        self.layout
    }

    fn push(&mut self, op: DrawOp) {
        let region = self.region;
        self.layout.pages[self.current].ops_mut(region).push(op);
    }

    fn register(&mut self, prepared: PreparedImage) -> usize {
        self.layout.images.push(EmbeddedImage {
            px_width: prepared.px_width,
            px_height: prepared.px_height,
            bytes: prepared.bytes,
        });
        self.layout.images.len() - 1
    }
}

impl Surface for RecordingSurface<'_> {
    type Error = ReportError;

    fn add_page(&mut self) {
        let index = self.layout.pages.len();
        self.layout.pages.push(PageLayout::new(index));
        self.current = index;
        self.region = Region::Body;
    }

    fn set_page(&mut self, index: usize) {
        self.current = index.min(self.layout.pages.len() - 1);
        self.region = Region::Body;
    }

    fn page_count(&self) -> usize {
        self.layout.pages.len()
    }

    fn begin_region(&mut self, region: Region) {
        self.region = region;
        if region != Region::Body {
            self.layout.pages[self.current].ops_mut(region).clear();
        }
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle, align: TextAlign) {
        let left = match align {
            TextAlign::Left => x,
            TextAlign::Center => {
                x - self.fonts.measure_text_width(text, style.font_size, style.bold) / 2.0
            }
            TextAlign::Right => x - self.fonts.measure_text_width(text, style.font_size, style.bold),
        };
        self.push(DrawOp::Text {
            text: text.to_string(),
            x: left,
            y,
            font_size: style.font_size,
            bold: style.bold,
            gray: style.gray,
        });
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, stroke_gray: u8) {
        self.push(DrawOp::RoundedRect {
            rect,
            radius,
            stroke_gray,
        });
    }

    fn image_contain(
        &mut self,
        source: &ImageSource,
        role: ImageRole,
        frame: Rect,
    ) -> Result<(), ReportError> {
        let image = match (role, self.logo_image) {
            (ImageRole::Logo, Some(id)) => id,
            (ImageRole::Logo, None) => {
                let id = self.register(images::prepare_original(source.bytes())?);
                self.logo_image = Some(id);
                id
            }
            (ImageRole::Photo, _) => {
                let prepared =
                    images::compress_photo(source.bytes(), self.photo_max_width, self.photo_quality)?;
                self.register(prepared)
            }
        };
        let embedded = &self.layout.images[image];
        let rect = contain_fit(embedded.px_width, embedded.px_height, frame);
        self.push(DrawOp::Image { image, rect });
        Ok(())
    }
}
