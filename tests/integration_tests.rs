//! Integration tests for the daily report pipeline.
//!
//! These tests validate:
//! - The estimator and the renderer agree on the page count
//! - Rendering is deterministic and the file name is stable
//! - Empty entries and surplus photos do not affect the layout
//! - Headers and footers land on every page
//! - The persisted JSON input and the layout JSON round-trip

use std::fs;

use sha2::{Digest, Sha256};

use daily_report_pdf::entry_layout::layout_entry;
use daily_report_pdf::fonts::{wrap_text, FontManager};
use daily_report_pdf::geometry::{content_width, text_block_height};
use daily_report_pdf::layout_config::{DrawOp, LayoutConfig};
use daily_report_pdf::pipeline::{compute_layout_config, estimate_page_count, render_to_pdf};
use daily_report_pdf::render::render_pdf;
use daily_report_pdf::samples::{self, LOREM_500};
use daily_report_pdf::{Entry, ImageSource, PipelineConfig, ReportDocument, ReportError};

// =====================================================================
// Helper
// =====================================================================

fn default_config() -> PipelineConfig {
    PipelineConfig::default()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "Missing PDF header");
}

fn tiny_photo(seed: u8) -> ImageSource {
    samples::sample_photo(8 + seed as u32, 6, [seed, 100, 200]).unwrap()
}

/// A deterministic mix of text lengths and photo counts.
fn generated_entries(n: usize) -> Vec<Entry> {
    (0..n)
        .map(|i| {
            let text = &LOREM_500[..(i * 37) % LOREM_500.len()];
            Entry::new(text).with_photos((0..i % 5).map(|p| tiny_photo(p as u8)))
        })
        .collect()
}

fn layout_digest(layout: &LayoutConfig) -> Vec<u8> {
    let json = layout.to_json().unwrap();
    Sha256::digest(json.as_bytes()).to_vec()
}

fn all_samples() -> Vec<ReportDocument> {
    vec![
        samples::empty_report(),
        samples::minimal_report(),
        samples::lorem_report(),
        samples::site_visit_report().unwrap(),
        samples::photo_report().unwrap(),
    ]
}

// =====================================================================
// Estimator / renderer parity
// =====================================================================

#[test]
fn samples_estimate_matches_render() {
    for doc in all_samples() {
        let estimate = estimate_page_count(&doc);
        let report = render_to_pdf(&doc, &default_config()).unwrap();
        assert_valid_pdf(&report.bytes);
        assert_eq!(
            estimate, report.page_count,
            "parity broken for '{}'",
            doc.project_name
        );
    }
}

#[test]
fn sample_page_counts() {
    assert_eq!(estimate_page_count(&samples::empty_report()), 1);
    assert_eq!(estimate_page_count(&samples::minimal_report()), 1);
    assert_eq!(estimate_page_count(&samples::lorem_report()), 1);
    assert_eq!(estimate_page_count(&samples::site_visit_report().unwrap()), 2);
    assert_eq!(estimate_page_count(&samples::photo_report().unwrap()), 4);
}

#[test]
fn generated_documents_estimate_matches_layout() {
    let entries = generated_entries(20);
    let mut doc = ReportDocument::new("Generated", "2024-03-05");
    for entry in entries {
        doc.entries.push(entry);
        let layout = compute_layout_config(&doc, &default_config()).unwrap();
        assert_eq!(
            estimate_page_count(&doc),
            layout.page_count(),
            "parity broken at {} entries",
            doc.entries.len()
        );
    }
}

// =====================================================================
// Determinism
// =====================================================================

#[test]
fn repeated_renders_are_identical() {
    let doc = samples::photo_report().unwrap();
    let first = compute_layout_config(&doc, &default_config()).unwrap();
    let second = compute_layout_config(&doc, &default_config()).unwrap();
    assert_eq!(layout_digest(&first), layout_digest(&second));

    let a = render_to_pdf(&doc, &default_config()).unwrap();
    let b = render_to_pdf(&doc, &default_config()).unwrap();
    assert_eq!(a.page_count, b.page_count);
    assert_eq!(a.file_name, b.file_name);
}

// =====================================================================
// Pagination properties
// =====================================================================

#[test]
fn adding_entries_never_reduces_page_count() {
    let mut doc = ReportDocument::new("Monotone", "2024-03-05");
    let mut previous = estimate_page_count(&doc);
    assert_eq!(previous, 1);
    for entry in generated_entries(30) {
        doc.entries.push(entry);
        let current = estimate_page_count(&doc);
        assert!(current >= previous, "{current} < {previous}");
        previous = current;
    }
}

#[test]
fn four_photo_entries_take_a_page_each() {
    for n in 1..=4 {
        let mut doc = ReportDocument::new("Grid", "2024-03-05");
        for _ in 0..n {
            doc.entries
                .push(Entry::new("Slab").with_photos((0..4).map(tiny_photo)));
        }
        assert_eq!(estimate_page_count(&doc), n);
    }
}

#[test]
fn empty_entries_do_not_change_layout() {
    let plain = samples::site_visit_report().unwrap();
    let mut interleaved = ReportDocument::new(plain.project_name.clone(), plain.report_date.clone());
    interleaved.logo = plain.logo.clone();
    for entry in &plain.entries {
        interleaved.entries.push(Entry::new(""));
        interleaved.entries.push(entry.clone());
        interleaved.entries.push(Entry::new("  \n  "));
    }

    assert_eq!(estimate_page_count(&plain), estimate_page_count(&interleaved));

    let a = compute_layout_config(&plain, &default_config()).unwrap();
    let b = compute_layout_config(&interleaved, &default_config()).unwrap();
    assert_eq!(a.page_count(), b.page_count());
    for (pa, pb) in a.pages.iter().zip(&b.pages) {
        assert_eq!(pa.body, pb.body);
    }
}

#[test]
fn photos_beyond_four_are_ignored() {
    let photos: Vec<ImageSource> = (0..10).map(tiny_photo).collect();
    let four = ReportDocument::new("Cap", "2024-03-05")
        .with_entry(Entry::new("Pour").with_photos(photos[..4].iter().cloned()));
    let ten = ReportDocument::new("Cap", "2024-03-05")
        .with_entry(Entry::new("Pour").with_photos(photos.iter().cloned()));

    assert_eq!(estimate_page_count(&four), estimate_page_count(&ten));

    let a = compute_layout_config(&four, &default_config()).unwrap();
    let b = compute_layout_config(&ten, &default_config()).unwrap();
    assert_eq!(a.images.len(), 4);
    assert_eq!(b.images.len(), 4);
    assert_eq!(a.pages[0].body, b.pages[0].body);
}

// =====================================================================
// Entry geometry scenarios
// =====================================================================

#[test]
fn lorem_entry_height_follows_wrapped_lines() {
    let fonts = FontManager::default();
    let lines = wrap_text(LOREM_500, 11.0, false, 158.0, &fonts);
    assert!(lines.len() > 1, "500 characters must wrap");
    for line in &lines {
        assert!(fonts.measure_text_width(line, 11.0, false) <= 158.0 + 1e-3);
    }

    let block = layout_entry(&Entry::new(LOREM_500), content_width(), &fonts).unwrap();
    assert_eq!(block.text_lines, lines);
    assert_eq!(block.height, 12.0 + text_block_height(lines.len()));
}

#[test]
fn three_photos_reserve_two_rows() {
    let fonts = FontManager::default();
    let entry = Entry::new("Columns").with_photos((0..3).map(tiny_photo));
    let block = layout_entry(&entry, content_width(), &fonts).unwrap();
    assert_eq!(block.photo_rows(), 2);
    assert_eq!(block.photo_cells.len(), 3);
    // 6 + 18 + 16 + (55 + 6 + 55) + 6
    assert_eq!(block.height, 162.0);
}

// =====================================================================
// Headers, footers, file name
// =====================================================================

#[test]
fn empty_document_has_header_and_footer() {
    let layout = compute_layout_config(&samples::empty_report(), &default_config()).unwrap();
    assert_eq!(layout.page_count(), 1);
    let texts = layout.pages[0].texts();
    assert!(texts.contains(&"Daily Report"));
    assert!(texts.contains(&"Report date: 2024-03-01"));
    assert!(texts.contains(&"Page 1 / 1"));
    assert!(layout.pages[0].body.is_empty());
}

#[test]
fn every_page_has_header_and_total() {
    let layout = compute_layout_config(&samples::photo_report().unwrap(), &default_config()).unwrap();
    let total = layout.page_count();
    assert_eq!(total, 4);
    for (i, page) in layout.pages.iter().enumerate() {
        let texts = page.texts();
        assert!(texts.contains(&"Daily Report"), "page {i} lacks a title");
        assert!(texts.contains(&"Warehouse Retrofit"), "page {i} lacks the project");
        let footer = format!("Page {} / {}", i + 1, total);
        assert!(texts.contains(&footer.as_str()), "page {i} lacks '{footer}'");
    }
}

#[test]
fn logo_is_embedded_once() {
    let layout = compute_layout_config(&samples::site_visit_report().unwrap(), &default_config()).unwrap();
    assert_eq!(layout.page_count(), 2);
    assert_eq!(layout.images.len(), 1);
    for page in &layout.pages {
        let logos = page
            .header
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { image: 0, .. }))
            .count();
        assert_eq!(logos, 1);
    }
}

#[test]
fn file_name_from_date_and_project() {
    let doc = ReportDocument::new("Site #4/North", "2024-03-01");
    let report = render_to_pdf(&doc, &default_config()).unwrap();
    assert_eq!(report.file_name, "2024-03-01__site-4north__daily-report.pdf");

    let unnamed = render_to_pdf(&samples::empty_report(), &default_config()).unwrap();
    assert_eq!(unnamed.file_name, "2024-03-01__site__daily-report.pdf");
}

// =====================================================================
// Input and layout JSON
// =====================================================================

#[test]
fn persisted_json_loads_and_renders() {
    let doc = ReportDocument::from_json(samples::sample_report_json(), std::path::Path::new("."))
        .unwrap();
    assert_eq!(doc.project_name, "Site #4/North");
    assert_eq!(doc.entries.len(), 3);
    assert_eq!(doc.visible_entries().count(), 2);

    let report = render_to_pdf(&doc, &default_config()).unwrap();
    assert_valid_pdf(&report.bytes);
    assert_eq!(report.page_count, 1);
}

#[test]
fn photo_paths_resolve_against_base_dir() {
    let dir = std::env::temp_dir().join(format!("daily-report-it-{}", std::process::id()));
    fs::create_dir_all(dir.join("photos")).unwrap();
    let photo = samples::sample_photo(40, 30, [10, 20, 30]).unwrap();
    fs::write(dir.join("photos/a.png"), photo.bytes()).unwrap();

    let json = r#"{
      "projectName": "Depot",
      "reportDate": "2024-03-04",
      "entries": [ { "id": "e1", "text": "Gate", "photos": ["photos/a.png"] } ]
    }"#;
    let doc = ReportDocument::from_json(json, &dir).unwrap();
    assert_eq!(doc.entries[0].photos[0].bytes(), photo.bytes());

    let missing = ReportDocument::from_json(&json.replace("a.png", "b.png"), &dir);
    assert!(matches!(missing, Err(ReportError::Io(_))));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn layout_json_round_trip_renders() {
    let layout = compute_layout_config(&samples::photo_report().unwrap(), &default_config()).unwrap();
    let json = layout.to_json().unwrap();
    let restored = LayoutConfig::from_json(&json).unwrap();
    assert_eq!(restored.page_count(), layout.page_count());
    assert_eq!(restored.images.len(), layout.images.len());
    assert_valid_pdf(&render_pdf(&restored).unwrap());
}

// =====================================================================
// Photo encoding
// =====================================================================

/// A photo full of pseudo-random pixels, so JPEG quality shows in the size.
fn noisy_photo(width: u32, height: u32) -> ImageSource {
    let mut state: u32 = 0x2545_F491;
    let img = image::RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        image::Rgb([next(), next(), next()])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    ImageSource::from_bytes(buf)
}

#[test]
fn photo_quality_reaches_the_pdf() {
    let doc = ReportDocument::new("Quality", "2024-03-05")
        .with_entry(Entry::new("Noise").with_photo(noisy_photo(400, 300)));

    let render = |quality: u8| {
        let config = PipelineConfig {
            photo_quality: quality,
            ..default_config()
        };
        render_to_pdf(&doc, &config).unwrap().bytes.len()
    };
    let low = render(10);
    let high = render(95);
    assert!(low < high, "quality 10 gave {low} bytes, quality 95 gave {high}");
}

#[test]
fn layout_carries_photo_quality() {
    let config = PipelineConfig {
        photo_quality: 40,
        ..default_config()
    };
    let layout = compute_layout_config(&samples::minimal_report(), &config).unwrap();
    assert_eq!(layout.image_quality, 40);
    let restored = LayoutConfig::from_json(&layout.to_json().unwrap()).unwrap();
    assert_eq!(restored.image_quality, 40);
}

// =====================================================================
// Failures
// =====================================================================

#[test]
fn undecodable_photo_aborts_render_but_not_estimate() {
    let doc = ReportDocument::new("Broken", "2024-03-05").with_entry(
        Entry::new("Bad upload").with_photo(ImageSource::from_bytes(b"not an image".to_vec())),
    );
    assert_eq!(estimate_page_count(&doc), 1);
    assert!(matches!(
        render_to_pdf(&doc, &default_config()),
        Err(ReportError::Measurement(_))
    ));
}

#[test]
fn missing_report_date_is_rejected() {
    let result = ReportDocument::from_json(r#"{ "projectName": "X" }"#, std::path::Path::new("."));
    assert!(matches!(result, Err(ReportError::InvalidInput(_))));
}
