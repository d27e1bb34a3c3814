//! Image helpers – data-URI handling, dimension probing and the photo
//! re-encoding step that runs before a photo is embedded.

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::error::ReportError;

/// Photos wider than this are scaled down before embedding.
pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 1400;
/// JPEG quality (1–100) used for embedded photos.
pub const DEFAULT_PHOTO_QUALITY: u8 = 72;

/// An encoded image ready to embed, with the pixel size of what is embedded.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub bytes: Vec<u8>,
    pub px_width: u32,
    pub px_height: u32,
}

/// Parse a `data:<mime>;base64,<data>` URI and return the raw decoded bytes.
pub fn parse_data_uri(src: &str) -> Result<Vec<u8>, ReportError> {
    let Some(rest) = src.strip_prefix("data:") else {
        let preview: String = src.chars().take(80).collect();
        return Err(ReportError::InvalidInput(format!(
            "image must be a base64 data URI (e.g. `data:image/png;base64,...`), got {preview:?}"
        )));
    };
    let comma_pos = rest.find(',').ok_or_else(|| {
        ReportError::InvalidInput(
            "invalid data URI: missing `,` between header and data".to_string(),
        )
    })?;
    let header = &rest[..comma_pos];
    if !header.contains(";base64") {
        return Err(ReportError::InvalidInput(
            "only base64-encoded data URIs are supported".to_string(),
        ));
    }
    let b64_data = rest[comma_pos + 1..].trim();
    BASE64_STD
        .decode(b64_data)
        .map_err(|e| ReportError::InvalidInput(format!("base64 decode error: {e}")))
}

/// Wrap encoded image bytes in a data URI, sniffing PNG vs JPEG.
pub fn to_data_uri(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{mime};base64,{}", BASE64_STD.encode(bytes))
}

/// Decode `bytes` just far enough to learn its pixel size.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), ReportError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ReportError::Measurement(format!("cannot decode image: {e}")))?;
    Ok((img.width(), img.height()))
}

/// Embed an image as supplied (used for the logo).
pub fn prepare_original(bytes: &[u8]) -> Result<PreparedImage, ReportError> {
    let (px_width, px_height) = image_dimensions(bytes)?;
    Ok(PreparedImage {
        bytes: bytes.to_vec(),
        px_width,
        px_height,
    })
}

/// Re-encode a photo as JPEG, scaling it down to `max_width` pixels when it
/// is wider. Alpha is dropped.
pub fn compress_photo(
    bytes: &[u8],
    max_width: u32,
    quality: u8,
) -> Result<PreparedImage, ReportError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ReportError::Measurement(format!("cannot decode photo: {e}")))?;

    let img = if max_width > 0 && img.width() > max_width && img.height() > 0 {
        let ratio = img.width() as f64 / img.height() as f64;
        let new_h = ((max_width as f64 / ratio).round() as u32).max(1);
        img.resize_exact(max_width, new_h, FilterType::Triangle)
    } else {
        img
    };

    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| ReportError::Encoding(e.to_string()))?;

    log::trace!(
        "Compressed photo {} -> {} bytes ({}x{})",
        bytes.len(),
        out.len(),
        rgb.width(),
        rgb.height()
    );

    Ok(PreparedImage {
        bytes: out,
        px_width: rgb.width(),
        px_height: rgb.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 120, 200, 128]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn data_uri_roundtrip() {
        let bytes = png(3, 2);
        let uri = to_data_uri(&bytes);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(parse_data_uri(&uri).unwrap(), bytes);
    }

    #[test]
    fn rejects_non_data_uri() {
        assert!(matches!(
            parse_data_uri("photo.jpg"),
            Err(ReportError::InvalidInput(_))
        ));
        assert!(parse_data_uri("data:image/png,abc").is_err());
    }

    #[test]
    fn wide_photo_is_scaled_to_max_width() {
        let prepared = compress_photo(&png(2000, 1000), 1400, 72).unwrap();
        assert_eq!(prepared.px_width, 1400);
        assert_eq!(prepared.px_height, 700);
        assert_eq!(image::guess_format(&prepared.bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn narrow_photo_keeps_its_size() {
        let prepared = compress_photo(&png(40, 30), 1400, 72).unwrap();
        assert_eq!((prepared.px_width, prepared.px_height), (40, 30));
    }

    #[test]
    fn undecodable_photo_is_a_measurement_failure() {
        assert!(matches!(
            compress_photo(b"not an image", 1400, 72),
            Err(ReportError::Measurement(_))
        ));
    }
}
