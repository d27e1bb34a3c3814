//! Font metrics and text measurement for the builtin Helvetica faces.
//!
//! The renderer draws every string with the PDF base-14 Helvetica fonts, so
//! wrapping must use exactly those advance widths. The tables below are the
//! Adobe AFM widths (1/1000 em) for WinAnsiEncoding, the single-byte encoding
//! the builtin fonts are drawn with. Each char is measured through the same
//! [`winansi_code`] mapping the renderer uses, so unencodable chars measure as
//! the `?` they are drawn as. Measurements are done in integer font units so
//! the estimator and the renderer always agree on line breaks.

use crate::geometry::MM_TO_PT;

/// Advance widths for `' '..='~'` in Helvetica.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Advance widths for `' '..='~'` in Helvetica-Bold.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Advance widths for WinAnsi `0x80..=0xFF` in Helvetica. Unassigned codes
/// (0x81, 0x8D, 0x8F, 0x90, 0x9D) are never produced by [`winansi_code`].
#[rustfmt::skip]
const HELVETICA_HIGH_WIDTHS: [u16; 128] = [
    556, 556, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 556, 611, 556,
    556, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 556, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Advance widths for WinAnsi `0x80..=0xFF` in Helvetica-Bold.
#[rustfmt::skip]
const HELVETICA_BOLD_HIGH_WIDTHS: [u16; 128] = [
    556, 556, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 556, 611, 556,
    556, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 556, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// WinAnsi byte a char is drawn as by the builtin fonts.
///
/// Latin-1 maps to itself, the typographic punctuation of `0x80..=0x9F` to
/// its WinAnsi slot, tabs and no-break spaces to a space. Control chars and
/// everything WinAnsi cannot encode become `?`.
pub fn winansi_code(ch: char) -> u8 {
    match ch {
        '\t' | '\u{00A0}' => b' ',
        '\u{20AC}' => 0x80, // euro
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85, // ellipsis
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95, // bullet
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        c if (0x20..=0x7E).contains(&(c as u32)) || (0xA0..=0xFF).contains(&(c as u32)) => {
            c as u8
        }
        _ => b'?',
    }
}

/// Width tables for one face.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    ascii: &'static [u16; 95],
    high: &'static [u16; 128],
}

impl FontMetrics {
    /// Advance width of `ch` in 1/1000 em, as drawn.
    pub fn char_units(&self, ch: char) -> u32 {
        let code = winansi_code(ch);
        if code >= 0x80 {
            self.high[(code - 0x80) as usize] as u32
        } else {
            self.ascii[(code - 0x20) as usize] as u32
        }
    }

    /// Advance width of `text` in 1/1000 em.
    pub fn text_units(&self, text: &str) -> u32 {
        text.chars().map(|ch| self.char_units(ch)).sum()
    }
}

/// Holds the two faces the report uses.
#[derive(Debug, Clone)]
pub struct FontManager {
    regular: FontMetrics,
    bold: FontMetrics,
}

impl FontManager {
    /// Metrics for the builtin Helvetica / Helvetica-Bold pair.
    pub fn helvetica() -> Self {
        Self {
            regular: FontMetrics {
                ascii: &HELVETICA_WIDTHS,
                high: &HELVETICA_HIGH_WIDTHS,
            },
            bold: FontMetrics {
                ascii: &HELVETICA_BOLD_WIDTHS,
                high: &HELVETICA_BOLD_HIGH_WIDTHS,
            },
        }
    }

    pub fn metrics(&self, bold: bool) -> &FontMetrics {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    /// Width of `text` in millimetres at `font_size` points.
    pub fn measure_text_width(&self, text: &str, font_size: f32, bold: bool) -> f32 {
        units_to_mm(self.metrics(bold).text_units(text), font_size)
    }

    /// Line pitch in millimetres for a font size and line-height factor.
    pub fn line_height_mm(&self, font_size: f32, line_height_factor: f32) -> f32 {
        font_size * line_height_factor / MM_TO_PT
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::helvetica()
    }
}

fn units_to_mm(units: u32, font_size: f32) -> f32 {
    units as f32 / 1000.0 * font_size / MM_TO_PT
}

/// Largest number of font units that still fits `max_width` mm.
fn max_units_for(max_width: f32, font_size: f32) -> u32 {
    if font_size <= 0.0 {
        return u32::MAX;
    }
    let units = (max_width * MM_TO_PT / font_size * 1000.0).floor();
    if units <= 0.0 {
        0
    } else {
        units as u32
    }
}

/// Word-wrap `text` to fit within `max_width` millimetres. Returns the lines.
///
/// Existing newlines are kept as hard breaks, runs of whitespace between words
/// collapse to a single space and a word wider than a whole line is split
/// between characters. Empty text yields one empty line.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    bold: bool,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    let metrics = fonts.metrics(bold);
    let limit = max_units_for(max_width, font_size);
    let space = metrics.char_units(' ');

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut current = String::new();
        let mut current_units = 0u32;
        let mut any_word = false;

        for word in paragraph.split_whitespace() {
            any_word = true;
            let word_units = metrics.text_units(word);

            if !current.is_empty() {
                if current_units + space + word_units <= limit {
                    current.push(' ');
                    current.push_str(word);
                    current_units += space + word_units;
                    continue;
                }
                lines.push(std::mem::take(&mut current));
            }

            if word_units <= limit {
                current.push_str(word);
                current_units = word_units;
            } else {
                let (mut chunks, rest, rest_units) = split_long_word(word, limit, metrics);
                lines.append(&mut chunks);
                current = rest;
                current_units = rest_units;
            }
        }

        if !current.is_empty() || !any_word {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Break a word that is wider than a line into full-width chunks. Returns the
/// finished chunks plus the trailing remainder (and its width), which stays
/// open so the following word can join it.
fn split_long_word(word: &str, limit: u32, metrics: &FontMetrics) -> (Vec<String>, String, u32) {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut chunk_units = 0u32;
    for ch in word.chars() {
        let ch_units = metrics.char_units(ch);
        if !chunk.is_empty() && chunk_units + ch_units > limit {
            chunks.push(std::mem::take(&mut chunk));
            chunk_units = 0;
        }
        chunk.push(ch);
        chunk_units += ch_units;
    }
    (chunks, chunk, chunk_units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_with_afm_widths() {
        let fonts = FontManager::default();
        // "Hello" = 722 + 556 + 222 + 222 + 556 = 2278 units
        let expected = 2278.0 / 1000.0 * 11.0 / MM_TO_PT;
        let w = fonts.measure_text_width("Hello", 11.0, false);
        assert!((w - expected).abs() < 1e-4);
        assert!(fonts.measure_text_width("Hello", 11.0, true) > w);
    }

    #[test]
    fn winansi_glyphs_use_their_own_widths() {
        let regular = FontManager::default();
        let m = regular.metrics(false);
        assert_eq!(m.char_units('\u{2014}'), 1000);
        assert_eq!(m.char_units('\u{2026}'), 1000);
        assert_eq!(m.char_units('\u{00C0}'), 667);
        assert_eq!(m.char_units('\u{00D2}'), 778);
        assert_eq!(m.char_units('\u{00E9}'), 556);
        assert_eq!(m.char_units('\u{00A0}'), m.char_units(' '));
        // drawn as '?'
        assert_eq!(m.char_units('\u{4E2D}'), m.char_units('?'));
        assert_eq!(m.char_units('\u{0085}'), m.char_units('?'));
        let bold = regular.metrics(true);
        assert_eq!(bold.char_units('\u{00C0}'), 722);
        assert_eq!(bold.char_units('\u{00F6}'), 611);
    }

    #[test]
    fn dashes_and_accented_capitals_wrap_within_width() {
        let fonts = FontManager::default();
        for text in ["Getto \u{2014} ".repeat(30), "\u{00C0}\u{00C8}\u{00D2}".repeat(30)] {
            let lines = wrap_text(&text, 11.0, false, 158.0, &fonts);
            assert!(lines.len() > 1, "expected wrapping for {text:?}");
            for line in &lines {
                let units: u32 = line
                    .chars()
                    .map(|c| match c {
                        '\u{2014}' => 1000,
                        '\u{00C0}' | '\u{00C8}' => 667,
                        '\u{00D2}' => 778,
                        other => fonts.metrics(false).char_units(other),
                    })
                    .sum();
                let width = units as f32 / 1000.0 * 11.0 / MM_TO_PT;
                assert!(width <= 158.0 + 1e-3, "{line:?} is {width}mm wide");
            }
        }
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let fonts = FontManager::default();
        assert_eq!(wrap_text("", 11.0, false, 158.0, &fonts), vec![String::new()]);
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let fonts = FontManager::default();
        let lines = wrap_text("Concrete pour finished", 11.0, false, 158.0, &fonts);
        assert_eq!(lines, vec!["Concrete pour finished".to_string()]);
    }

    #[test]
    fn word_wrap_basic() {
        let fonts = FontManager::default();
        let lines = wrap_text("Hello world foo bar", 11.0, false, 15.0, &fonts);
        assert!(lines.len() >= 2, "Expected wrapping, got {:?}", lines);
        for line in &lines {
            assert!(fonts.measure_text_width(line, 11.0, false) <= 15.0 + 1e-3);
        }
    }

    #[test]
    fn hard_breaks_are_kept() {
        let fonts = FontManager::default();
        let lines = wrap_text("first\r\n\nthird", 11.0, false, 158.0, &fonts);
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn long_word_is_split_by_characters() {
        let fonts = FontManager::default();
        let word = "x".repeat(200);
        let lines = wrap_text(&word, 11.0, false, 20.0, &fonts);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(fonts.measure_text_width(line, 11.0, false) <= 20.0 + 1e-3);
        }
    }
}
