//! # Font Metrics
//!
//! Advance widths for the reference layout surface.
//!
//! Without a font file we fall back to [`StandardMetrics`], an approximation
//! of Helvetica grouped into width classes. Given a TrueType/OpenType file,
//! [`FontMetrics`] reads real advances via ttf-parser.

use std::collections::HashMap;

use crate::PrintError;

/// Anything that can report how wide a character is.
pub trait TextMetrics {
    /// Advance width of `ch` in points.
    fn char_width(&self, ch: char, font_size: f64, bold: bool) -> f64;

    /// Width of a whole string in points.
    fn text_width(&self, text: &str, font_size: f64, bold: bool) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size, bold)).sum()
    }
}

/// Emboldening widens glyphs by roughly this factor.
const BOLD_WIDTH_FACTOR: f64 = 1.05;

/// Helvetica-like widths, as fractions of an em, by character class.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

impl StandardMetrics {
    fn em_fraction(ch: char) -> f64 {
        match ch {
            ' ' => 0.278,
            'i' | 'j' | 'l' | '\'' | '.' | ',' | ':' | ';' | '!' | '|' => 0.222,
            'f' | 't' | 'r' | 'I' | '(' | ')' | '-' | '[' | ']' => 0.333,
            'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.833,
            '0'..='9' => 0.556,
            'A'..='Z' => 0.667,
            '\u{00AD}' | '\n' | '\r' => 0.0,
            _ if ch.is_ascii() => 0.5,
            _ => 0.556,
        }
    }
}

impl TextMetrics for StandardMetrics {
    fn char_width(&self, ch: char, font_size: f64, bold: bool) -> f64 {
        let w = Self::em_fraction(ch) * font_size;
        if bold {
            w * BOLD_WIDTH_FACTOR
        } else {
            w
        }
    }
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
}

impl FontMetrics {
    /// Parse metrics from font data.
    pub fn from_font_data(data: &[u8]) -> Result<Self, PrintError> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| PrintError::Font(format!("failed to parse font: {e}")))?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        // Basic Multilingual Plane is enough for document text
        for code in 32u32..=0xFFFF {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            if let Some(glyph_id) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                advance_widths.insert(ch, advance);
                if ch == ' ' {
                    default_advance = advance;
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Ok(FontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
        })
    }

    /// Load and parse a font file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, PrintError> {
        let data = std::fs::read(path)
            .map_err(|e| PrintError::Font(format!("failed to read {}: {e}", path.display())))?;
        Self::from_font_data(&data)
    }
}

impl TextMetrics for FontMetrics {
    fn char_width(&self, ch: char, font_size: f64, bold: bool) -> f64 {
        if matches!(ch, '\u{00AD}' | '\n' | '\r') {
            return 0.0;
        }
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        let width = (w as f64 / self.units_per_em as f64) * font_size;
        if bold {
            width * BOLD_WIDTH_FACTOR
        } else {
            width
        }
    }
}
