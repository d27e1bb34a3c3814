//! PDF renderer – takes a [`LayoutConfig`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).

use printpdf::*;

use crate::error::ReportError;
use crate::fonts::winansi_code;
use crate::geometry::{Rect, MM_TO_PT};
use crate::layout_config::*;

/// Stroke width of frame outlines.
const FRAME_LINE_WIDTH_MM: f32 = 0.2;
/// Control-point distance for a quarter circle approximated by a cubic.
const KAPPA: f32 = 0.552_284_8;

/// A printpdf XObject together with the pixel dimensions of the source image.
struct ImageResource {
    xobj_id: XObjectId,
    px_width: u32,
    px_height: u32,
}

/// Render a LayoutConfig into PDF bytes.
///
/// Every embedded image must decode; a failing image aborts the whole render
/// so no partial document is ever returned.
pub fn render_pdf(config: &LayoutConfig) -> Result<Vec<u8>, ReportError> {
    let page_w = Mm(config.page_width_mm);
    let page_h = Mm(config.page_height_mm);
    let page_height_pt = config.page_height_mm * MM_TO_PT;

    let mut doc = PdfDocument::new(&config.title);

    // ── Register images ───────────────────────────────────────────────────
    let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();
    let mut image_resources = Vec::with_capacity(config.images.len());
    for (index, image) in config.images.iter().enumerate() {
        let raw = RawImage::decode_from_bytes(&image.bytes, &mut img_warnings).map_err(|e| {
            ReportError::Serialization(format!("cannot embed image {index}: {e}"))
        })?;
        image_resources.push(ImageResource {
            xobj_id: doc.add_image(&raw),
            px_width: image.px_width,
            px_height: image.px_height,
        });
    }

    // ── Render pages ──────────────────────────────────────────────────────
    let mut pages = Vec::with_capacity(config.pages.len());
    for page_layout in &config.pages {
        let mut ops = Vec::new();
        for op in page_layout.all_ops() {
            render_op(&mut ops, op, page_height_pt, &image_resources)?;
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let bytes = doc.save(&save_options(config.image_quality), &mut Vec::new());
    if bytes.is_empty() {
        return Err(ReportError::Serialization("PDF writer produced no output".to_string()));
    }
    Ok(bytes)
}

/// printpdf re-encodes every image on save; pin that to JPEG at the
/// layout's quality with no further resizing or colour conversion.
fn save_options(image_quality: u8) -> PdfSaveOptions {
    PdfSaveOptions {
        image_optimization: Some(ImageOptimizationOptions {
            quality: Some(image_quality.clamp(1, 100) as f32 / 100.0),
            max_image_size: None,
            dither_greyscale: None,
            convert_to_greyscale: Some(false),
            auto_optimize: Some(false),
            format: Some(ImageCompression::Jpeg),
        }),
        ..PdfSaveOptions::default()
    }
}

fn render_op(
    ops: &mut Vec<Op>,
    op: &DrawOp,
    page_height_pt: f32,
    images: &[ImageResource],
) -> Result<(), ReportError> {
    match op {
        DrawOp::Text {
            text,
            x,
            y,
            font_size,
            bold,
            gray,
        } => {
            if text.is_empty() {
                return Ok(());
            }
            let font = if *bold {
                BuiltinFont::HelveticaBold
            } else {
                BuiltinFont::Helvetica
            };
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(x * MM_TO_PT),
                    y: Pt(page_height_pt - y * MM_TO_PT),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(*font_size),
                font,
            });
            ops.push(Op::SetFillColor { col: gray_color(*gray) });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(to_winlatin(text))],
                font,
            });
            ops.push(Op::EndTextSection);
        }
        DrawOp::RoundedRect {
            rect,
            radius,
            stroke_gray,
        } => {
            ops.push(Op::SetOutlineColor {
                col: gray_color(*stroke_gray),
            });
            ops.push(Op::SetOutlineThickness {
                pt: Pt(FRAME_LINE_WIDTH_MM * MM_TO_PT),
            });
            ops.push(Op::DrawLine {
                line: rounded_rect_path(rect, *radius, page_height_pt),
            });
        }
        DrawOp::Image { image, rect } => {
            let res = images.get(*image).ok_or_else(|| {
                ReportError::Serialization(format!("draw op references missing image {image}"))
            })?;

            // PDF origin is bottom-left; our layout origin is top-left.
            let width_pt = rect.width * MM_TO_PT;
            let height_pt = rect.height * MM_TO_PT;
            let img_bottom_y = page_height_pt - (rect.y + rect.height) * MM_TO_PT;

            // At dpi=72 printpdf renders 1 px = 1 pt, so
            // scale = desired_pt / px_dim.
            let scale_x = if res.px_width > 0 {
                width_pt / res.px_width as f32
            } else {
                1.0
            };
            let scale_y = if res.px_height > 0 {
                height_pt / res.px_height as f32
            } else {
                1.0
            };

            ops.push(Op::UseXobject {
                id: res.xobj_id.clone(),
                transform: XObjectTransform {
                    translate_x: Some(Pt(rect.x * MM_TO_PT)),
                    translate_y: Some(Pt(img_bottom_y)),
                    dpi: Some(72.0),
                    scale_x: Some(scale_x),
                    scale_y: Some(scale_y),
                    rotate: None,
                },
            });
        }
    }
    Ok(())
}

fn gray_color(gray: u8) -> Color {
    let v = gray as f32 / 255.0;
    Color::Rgb(Rgb {
        r: v,
        g: v,
        b: v,
        icc_profile: None,
    })
}

fn point(x: f32, y: f32, bezier: bool) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier,
    }
}

/// Closed outline of `rect` with quarter-circle corners, in PDF points.
fn rounded_rect_path(rect: &Rect, radius: f32, page_height_pt: f32) -> Line {
    let left = rect.x * MM_TO_PT;
    let right = (rect.x + rect.width) * MM_TO_PT;
    let top = page_height_pt - rect.y * MM_TO_PT;
    let bottom = page_height_pt - (rect.y + rect.height) * MM_TO_PT;
    let r = (radius * MM_TO_PT)
        .min((right - left) / 2.0)
        .min((top - bottom) / 2.0)
        .max(0.0);
    let k = r * KAPPA;

    // Clockwise from the end of the top-left corner. Each corner is a cubic:
    // two control points flagged `bezier`, then the end point.
    let points = vec![
        point(left + r, top, false),
        point(right - r, top, false),
        point(right - r + k, top, true),
        point(right, top - r + k, true),
        point(right, top - r, false),
        point(right, bottom + r, false),
        point(right, bottom + r - k, true),
        point(right - r + k, bottom, true),
        point(right - r, bottom, false),
        point(left + r, bottom, false),
        point(left + r - k, bottom, true),
        point(left, bottom + r - k, true),
        point(left, bottom + r, false),
        point(left, top - r, false),
        point(left, top - r + k, true),
        point(left + r - k, top, true),
        point(left + r, top, false),
    ];

    Line {
        points,
        is_closed: true,
    }
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF). The mapping is the
/// one text is measured with.
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s.chars().map(winansi_code).collect();
    // SAFETY: intentionally non-UTF-8 for 0x80-0xFF; printpdf passes these
    // bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}
