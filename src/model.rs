//! Report model – the immutable input of every estimate and render.
//!
//! A [`ReportDocument`] is built fresh from the current application state for
//! each call and is never mutated by the layout engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::images;

/// Photos beyond this index are ignored by the layout.
pub const MAX_PHOTOS_PER_ENTRY: usize = 4;

/// Encoded image bytes (PNG or JPEG) as supplied by the application.
///
/// Pixel dimensions are only decoded when the renderer actually places the
/// image; the estimator never touches the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    bytes: Vec<u8>,
}

impl ImageSource {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decode a `data:<mime>;base64,<data>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self, ReportError> {
        images::parse_data_uri(uri).map(Self::from_bytes)
    }

    /// Read an image file from disk.
    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encode back to a base64 data URI, sniffing the MIME type.
    pub fn to_data_uri(&self) -> String {
        images::to_data_uri(&self.bytes)
    }
}

/// One report item: free text plus ordered photos.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub id: Option<String>,
    /// Raw speech-to-text output; kept for persistence, never laid out.
    pub transcript: Option<String>,
    pub text: String,
    pub photos: Vec<ImageSource>,
}

impl Entry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_photo(mut self, photo: ImageSource) -> Self {
        self.photos.push(photo);
        self
    }

    pub fn with_photos(mut self, photos: impl IntoIterator<Item = ImageSource>) -> Self {
        self.photos.extend(photos);
        self
    }

    /// Blank text and no photos: the entry is skipped entirely.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.photos.is_empty()
    }

    /// The photos that take part in layout (the first four).
    pub fn laid_out_photos(&self) -> &[ImageSource] {
        let n = self.photos.len().min(MAX_PHOTOS_PER_ENTRY);
        &self.photos[..n]
    }
}

/// Everything needed to lay out one daily report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDocument {
    pub project_name: String,
    /// ISO date (`YYYY-MM-DD`), used verbatim in the header and file name.
    pub report_date: String,
    pub logo: Option<ImageSource>,
    pub entries: Vec<Entry>,
}

impl ReportDocument {
    pub fn new(project_name: impl Into<String>, report_date: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            report_date: report_date.into(),
            logo: None,
            entries: Vec::new(),
        }
    }

    pub fn with_logo(mut self, logo: ImageSource) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Entries that will actually be laid out.
    pub fn visible_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.is_empty())
    }

    /// Parse the persisted report JSON.
    ///
    /// Image references are either base64 data URIs or file paths, the latter
    /// resolved against `base_dir`.
    pub fn from_json(json: &str, base_dir: &Path) -> Result<Self, ReportError> {
        let persisted: PersistedReport = serde_json::from_str(json)?;

        let report_date = persisted.report_date.unwrap_or_default();
        if report_date.trim().is_empty() {
            return Err(ReportError::InvalidInput(
                "`reportDate` is required".to_string(),
            ));
        }

        let logo = persisted
            .logo_data_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|reference| resolve_image(reference, base_dir))
            .transpose()?;

        let mut entries = Vec::with_capacity(persisted.entries.len());
        for (index, raw) in persisted.entries.into_iter().enumerate() {
            let photos = raw
                .photos
                .iter()
                .map(|reference| resolve_image(reference, base_dir))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| match e {
                    ReportError::InvalidInput(msg) => {
                        ReportError::InvalidInput(format!("entry {index}: {msg}"))
                    }
                    other => other,
                })?;
            entries.push(Entry {
                id: raw.id,
                transcript: raw.transcript,
                text: raw.text.unwrap_or_default(),
                photos,
            });
        }

        log::debug!(
            "Loaded report '{}' ({}) with {} entries",
            persisted.project_name.as_deref().unwrap_or(""),
            report_date,
            entries.len()
        );

        Ok(Self {
            project_name: persisted.project_name.unwrap_or_default(),
            report_date,
            logo,
            entries,
        })
    }

    /// Serialise the minimal persisted shape: project, date, logo and each
    /// entry's id / transcript / text. Photos are not persisted.
    pub fn to_persisted_json(&self) -> Result<String, ReportError> {
        let persisted = PersistedReport {
            project_name: Some(self.project_name.clone()),
            report_date: Some(self.report_date.clone()),
            logo_data_url: self.logo.as_ref().map(ImageSource::to_data_uri),
            entries: self
                .entries
                .iter()
                .map(|e| PersistedEntry {
                    id: e.id.clone(),
                    transcript: e.transcript.clone(),
                    text: Some(e.text.clone()),
                    photos: Vec::new(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&persisted)
            .map_err(|e| ReportError::Serialization(e.to_string()))
    }
}

fn resolve_image(reference: &str, base_dir: &Path) -> Result<ImageSource, ReportError> {
    if reference.starts_with("data:") {
        ImageSource::from_data_uri(reference)
    } else {
        ImageSource::from_path(&base_dir.join(reference))
    }
}

// ---------------------------------------------------------------------------
// Persisted JSON shape
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedReport {
    #[serde(default)]
    project_name: Option<String>,
    #[serde(default)]
    report_date: Option<String>,
    #[serde(default)]
    logo_data_url: Option<String>,
    #[serde(default)]
    entries: Vec<PersistedEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    photos: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_entry_is_empty() {
        assert!(Entry::new("   \n\t").is_empty());
        assert!(!Entry::new("note").is_empty());
        assert!(!Entry::new("").with_photo(ImageSource::from_bytes(vec![1])).is_empty());
    }

    #[test]
    fn photo_cap_applies_to_layout_view() {
        let entry = Entry::new("x").with_photos((0..10).map(|i| ImageSource::from_bytes(vec![i])));
        assert_eq!(entry.photos.len(), 10);
        assert_eq!(entry.laid_out_photos().len(), MAX_PHOTOS_PER_ENTRY);
        assert_eq!(entry.laid_out_photos()[3].bytes(), &[3]);
    }

    #[test]
    fn parses_persisted_shape_with_defaults() {
        let json = r#"{
            "projectName": null,
            "reportDate": "2024-03-01",
            "entries": [
                { "id": "a", "transcript": "raw words", "text": "Edited words" },
                { "text": null },
                {}
            ]
        }"#;
        let doc = ReportDocument::from_json(json, Path::new(".")).unwrap();
        assert_eq!(doc.project_name, "");
        assert_eq!(doc.report_date, "2024-03-01");
        assert!(doc.logo.is_none());
        assert_eq!(doc.entries.len(), 3);
        assert_eq!(doc.entries[0].id.as_deref(), Some("a"));
        assert_eq!(doc.entries[0].transcript.as_deref(), Some("raw words"));
        assert_eq!(doc.entries[0].text, "Edited words");
        assert_eq!(doc.visible_entries().count(), 1);
    }

    #[test]
    fn missing_report_date_is_rejected() {
        let err = ReportDocument::from_json(r#"{"entries": []}"#, Path::new(".")).unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(_)));
    }

    #[test]
    fn bad_photo_reference_names_the_entry() {
        let json = r#"{ "reportDate": "2024-03-01",
                        "entries": [ { "text": "x", "photos": ["data:image/png,notbase64"] } ] }"#;
        let err = ReportDocument::from_json(json, Path::new(".")).unwrap_err();
        match err {
            ReportError::InvalidInput(msg) => assert!(msg.starts_with("entry 0:"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn persisted_json_drops_photos() {
        let doc = ReportDocument::new("North", "2024-03-01").with_entry(
            Entry::new("Poured slab").with_photo(ImageSource::from_bytes(vec![0xFF, 0xD8])),
        );
        let json = doc.to_persisted_json().unwrap();
        assert!(json.contains("\"projectName\": \"North\""));
        assert!(json.contains("Poured slab"));
        assert!(!json.contains("photos"));

        let back = ReportDocument::from_json(&json, Path::new(".")).unwrap();
        assert_eq!(back.entries[0].text, "Poured slab");
        assert!(back.entries[0].photos.is_empty());
    }
}
