//! Layout config – the intermediate representation between the layout engine
//! and PDF rendering. This is the "frozen" structure that encodes exactly what
//! goes on each page, in page millimetres with a top-left origin.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::geometry::{Rect, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::images::DEFAULT_PHOTO_QUALITY;

/// A complete report layout ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "LayoutConfig::default_title")]
    pub title: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// JPEG quality (1–100) images are stored with in the PDF.
    #[serde(default = "LayoutConfig::default_image_quality")]
    pub image_quality: u8,
    /// Every image referenced by a [`DrawOp::Image`], by index.
    #[serde(default)]
    pub images: Vec<EmbeddedImage>,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content, split by region so the header can be redrawn in
/// place and the footer stamped after the fact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    #[serde(default)]
    pub header: Vec<DrawOp>,
    #[serde(default)]
    pub body: Vec<DrawOp>,
    #[serde(default)]
    pub footer: Vec<DrawOp>,
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// One line of text; `x` is the left edge, `y` the baseline.
    Text {
        text: String,
        x: f32,
        y: f32,
        font_size: f32,
        bold: bool,
        /// 0 = black, 255 = white.
        gray: u8,
    },
    /// Stroked rectangle with rounded corners.
    RoundedRect {
        rect: Rect,
        radius: f32,
        stroke_gray: u8,
    },
    /// Image `image` (index into [`LayoutConfig::images`]) stretched to `rect`.
    Image { image: usize, rect: Rect },
}

/// Encoded image bytes plus their pixel size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedImage {
    pub px_width: u32,
    pub px_height: u32,
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

/// Which part of a page subsequent draw calls go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Header,
    Body,
    Footer,
}

impl LayoutConfig {
    /// An A4 portrait layout with no pages yet.
    pub fn a4() -> Self {
        Self {
            title: Self::default_title(),
            page_width_mm: PAGE_WIDTH_MM,
            page_height_mm: PAGE_HEIGHT_MM,
            image_quality: DEFAULT_PHOTO_QUALITY,
            images: Vec::new(),
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        "Daily Report".to_string()
    }

    fn default_image_quality() -> u8 {
        DEFAULT_PHOTO_QUALITY
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::Serialization(e.to_string()))
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl PageLayout {
    pub fn new(page_index: usize) -> Self {
        Self {
            page_index,
            ..Self::default()
        }
    }

    pub fn ops_mut(&mut self, region: Region) -> &mut Vec<DrawOp> {
        match region {
            Region::Header => &mut self.header,
            Region::Body => &mut self.body,
            Region::Footer => &mut self.footer,
        }
    }

    /// All ops in paint order.
    pub fn all_ops(&self) -> impl Iterator<Item = &DrawOp> {
        self.header.iter().chain(&self.body).chain(&self.footer)
    }

    /// Text of every [`DrawOp::Text`] on the page, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.all_ops()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}
