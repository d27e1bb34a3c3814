//! Sample reports for testing and demonstration.
//!
//! Each sample exercises a different part of the layout: text wrapping,
//! photo grids, page breaks and the empty-entry rule. Photos are generated
//! in memory so the samples carry no binary fixtures.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::error::ReportError;
use crate::model::{Entry, ImageSource, ReportDocument};

/// A 500-character lorem ipsum paragraph.
pub const LOREM_500: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis \
nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure \
dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. \
Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim \
id est laborum. Curabitur pretium tincidunt lacus, nulla gravida orci.";

/// A solid-colour PNG of the given size.
pub fn sample_photo(width: u32, height: u32, color: [u8; 3]) -> Result<ImageSource, ReportError> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ReportError::Encoding(format!("sample photo: {e}")))?;
    Ok(ImageSource::from_bytes(buf))
}

/// A square logo.
pub fn sample_logo() -> Result<ImageSource, ReportError> {
    sample_photo(64, 64, [20, 60, 140])
}

/// No entries, no project, no logo.
pub fn empty_report() -> ReportDocument {
    ReportDocument::new("", "2024-03-01")
}

/// One short text entry.
pub fn minimal_report() -> ReportDocument {
    ReportDocument::new("North Tower", "2024-03-01")
        .with_entry(Entry::new("Crew on site at 07:00. Formwork for level 3 inspected."))
}

/// A single long text entry without photos.
pub fn lorem_report() -> ReportDocument {
    ReportDocument::new("Site #4/North", "2024-03-01").with_entry(Entry::new(LOREM_500))
}

/// Text entries only, enough to spill onto a second page.
pub fn site_visit_report() -> Result<ReportDocument, ReportError> {
    let notes = [
        "Concrete delivery arrived 40 minutes late; pour rescheduled to 10:30.",
        "Scaffold inspection passed. Tag renewed on the east elevation.",
        "Electrician roughed in level 2 corridor lighting.",
        "Rain from 14:00, exterior works stopped. Site drained by 16:00.",
        "Client walkthrough: requested sample of lobby floor tile.",
        "Crane service due Thursday, lifting plan to be updated.",
        "Waste skip swapped. Segregation signage replaced.",
    ];
    Ok(notes.iter().fold(
        ReportDocument::new("Harbour Bridge Deck", "2024-03-02").with_logo(sample_logo()?),
        |doc, note| doc.with_entry(Entry::new(*note)),
    ))
}

/// Entries with 0–5 photos of mixed aspect ratios, plus an empty entry.
pub fn photo_report() -> Result<ReportDocument, ReportError> {
    let wide = sample_photo(320, 180, [180, 90, 40])?;
    let tall = sample_photo(120, 240, [40, 140, 90])?;
    let square = sample_photo(100, 100, [90, 90, 90])?;

    Ok(ReportDocument::new("Warehouse Retrofit", "2024-03-03")
        .with_logo(sample_logo()?)
        .with_entry(Entry::new("Roof membrane, north bay.").with_photo(wide.clone()))
        .with_entry(Entry::new(""))
        .with_entry(
            Entry::new("Column bases after grouting.")
                .with_photos([tall.clone(), square.clone(), wide.clone()]),
        )
        .with_entry(Entry::new("").with_photos([
            square.clone(),
            tall.clone(),
            wide.clone(),
            square.clone(),
            tall,
        ]))
        .with_entry(Entry::new(LOREM_500).with_photo(square)))
}

/// A persisted report as stored by the application, without photos.
pub fn sample_report_json() -> &'static str {
    r#"{
  "projectName": "Site #4/North",
  "reportDate": "2024-03-01",
  "logoDataUrl": null,
  "entries": [
    { "id": "e1", "transcript": "crew on site at seven", "text": "Crew on site at 07:00." },
    { "id": "e2", "transcript": null, "text": "" },
    { "id": "e3", "transcript": null, "text": "Formwork for level 3 inspected and approved." }
  ]
}"#
}
