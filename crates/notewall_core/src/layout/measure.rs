//! Text measurement seam and the per-note height oracle.
//!
//! # Responsibility
//! - Define the measurement capability the rendering host supplies.
//! - Turn a note sequence into the height oracle consumed by masonry layout.
//!
//! # Invariants
//! - Measurers are deterministic: same text/width/font, same height.
//! - Oracle heights are finite and non-negative for any finite measurer.

use crate::model::note::Note;

/// Fixed vertical space a card spends on its headline and insets.
pub const CARD_CHROME_HEIGHT: f64 = 60.0;
/// Height used for an index that has no backing note.
pub const FALLBACK_ITEM_HEIGHT: f64 = 180.0;

const BODY_FONT_SIZE: f64 = 16.0;
const DEFAULT_LINE_HEIGHT_MULTIPLE: f64 = 1.2;
const GLYPH_ADVANCE_RATIO: f64 = 0.5;

/// Font parameters relevant to line-box height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontDescriptor {
    /// Point size.
    pub size: f64,
    /// Line box height as a multiple of `size`.
    pub line_height_multiple: f64,
}

impl FontDescriptor {
    pub const fn new(size: f64, line_height_multiple: f64) -> Self {
        Self {
            size,
            line_height_multiple,
        }
    }

    /// Card body font.
    pub const fn body() -> Self {
        Self::new(BODY_FONT_SIZE, DEFAULT_LINE_HEIGHT_MULTIPLE)
    }

    pub fn line_height(&self) -> f64 {
        self.size * self.line_height_multiple
    }
}

/// Measurement capability provided by the rendering host.
pub trait TextMeasurer {
    /// Height `text` occupies when wrapped to `constrained_width`.
    fn measure_height(&self, text: &str, constrained_width: f64, font: &FontDescriptor) -> f64;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure_height(&self, text: &str, constrained_width: f64, font: &FontDescriptor) -> f64 {
        (**self).measure_height(text, constrained_width, font)
    }
}

/// Monospace approximation: every glyph advances `size * 0.5`.
///
/// Used by the CLI preview and in tests where no real text stack exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphGridMeasurer;

impl GlyphGridMeasurer {
    /// Number of glyphs that fit on one line.
    pub fn glyphs_per_line(constrained_width: f64, font: &FontDescriptor) -> usize {
        let advance = font.size * GLYPH_ADVANCE_RATIO;
        if !constrained_width.is_finite() || constrained_width <= 0.0 || advance <= 0.0 {
            return 1;
        }
        ((constrained_width / advance).floor() as usize).max(1)
    }

    /// Wrapped line count; each `\n` paragraph takes at least one line.
    pub fn line_count(text: &str, constrained_width: f64, font: &FontDescriptor) -> usize {
        if text.is_empty() {
            return 0;
        }
        let per_line = Self::glyphs_per_line(constrained_width, font);
        text.split('\n')
            .map(|paragraph| paragraph.chars().count().div_ceil(per_line).max(1))
            .sum()
    }
}

impl TextMeasurer for GlyphGridMeasurer {
    fn measure_height(&self, text: &str, constrained_width: f64, font: &FontDescriptor) -> f64 {
        let lines = Self::line_count(text, constrained_width, font);
        (lines as f64 * font.line_height()).ceil()
    }
}

/// Height oracle for a card sequence: measured body plus card chrome.
pub struct NoteHeightOracle<'a, M: TextMeasurer> {
    notes: &'a [Note],
    measurer: M,
    font: FontDescriptor,
}

impl<'a, M: TextMeasurer> NoteHeightOracle<'a, M> {
    pub fn new(notes: &'a [Note], measurer: M) -> Self {
        Self {
            notes,
            measurer,
            font: FontDescriptor::body(),
        }
    }

    pub fn with_font(mut self, font: FontDescriptor) -> Self {
        self.font = font;
        self
    }

    pub fn item_count(&self) -> usize {
        self.notes.len()
    }

    /// Card height for `index` at `content_width`.
    pub fn height(&self, index: usize, content_width: f64) -> f64 {
        match self.notes.get(index) {
            Some(note) => {
                self.measurer
                    .measure_height(note.body.as_str(), content_width, &self.font)
                    + CARD_CHROME_HEIGHT
            }
            None => FALLBACK_ITEM_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FontDescriptor, GlyphGridMeasurer, NoteHeightOracle, TextMeasurer, CARD_CHROME_HEIGHT,
        FALLBACK_ITEM_HEIGHT,
    };
    use crate::model::color::NoteColor;
    use crate::model::note::Note;
    use uuid::Uuid;

    fn note_with_body(body: &str) -> Note {
        let mut note = Note::with_id(Uuid::new_v4(), NoteColor::WHITE);
        note.edit("title", body);
        note
    }

    #[test]
    fn empty_text_measures_zero() {
        let height = GlyphGridMeasurer.measure_height("", 100.0, &FontDescriptor::body());
        assert_eq!(height, 0.0);
    }

    #[test]
    fn wraps_by_glyph_grid_and_paragraphs() {
        let font = FontDescriptor::new(10.0, 1.0);
        // 5pt advance at 50pt width -> 10 glyphs per line.
        assert_eq!(GlyphGridMeasurer::glyphs_per_line(50.0, &font), 10);
        assert_eq!(GlyphGridMeasurer::line_count("0123456789", 50.0, &font), 1);
        assert_eq!(GlyphGridMeasurer::line_count("0123456789a", 50.0, &font), 2);
        assert_eq!(GlyphGridMeasurer::line_count("a\n\nb", 50.0, &font), 3);
        assert_eq!(
            GlyphGridMeasurer.measure_height("0123456789a", 50.0, &font),
            20.0
        );
    }

    #[test]
    fn degenerate_width_falls_back_to_single_glyph_lines() {
        let font = FontDescriptor::new(10.0, 1.0);
        assert_eq!(GlyphGridMeasurer::glyphs_per_line(-4.0, &font), 1);
        assert_eq!(GlyphGridMeasurer::glyphs_per_line(f64::NAN, &font), 1);
        assert_eq!(GlyphGridMeasurer::line_count("abc", 0.0, &font), 3);
    }

    #[test]
    fn measure_rounds_up_fractional_line_heights() {
        let height = GlyphGridMeasurer.measure_height("x", 100.0, &FontDescriptor::body());
        // 16 * 1.2 = 19.2 -> 20
        assert_eq!(height, 20.0);
    }

    #[test]
    fn oracle_adds_chrome_and_falls_back_past_the_end() {
        let notes = vec![note_with_body(""), note_with_body("x")];
        let oracle = NoteHeightOracle::new(&notes, GlyphGridMeasurer);
        assert_eq!(oracle.height(0, 100.0), CARD_CHROME_HEIGHT);
        assert_eq!(oracle.height(1, 100.0), CARD_CHROME_HEIGHT + 20.0);
        assert_eq!(oracle.height(2, 100.0), FALLBACK_ITEM_HEIGHT);
    }
}
