use crate::widths::{AVG_GLYPH_WIDTH, MeasureError, TEXT_PADDING, TextMeasure};
use fontdue::{Font, FontSettings, LineMetrics, Metrics};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Pixel size the grid text is rasterized at. At this size one advance of
/// the embedded monospace face stays within [`AVG_GLYPH_WIDTH`].
pub const FONT_SIZE: f32 = 11.5;

pub type GlyphCache = HashMap<char, (Metrics, Vec<u8>)>;

lazy_static! {
    static ref EMBEDDED_FONT: Result<Font, &'static str> = Font::from_bytes(
        include_bytes!("../assets/DejaVuSansMono.ttf") as &[u8],
        FontSettings::default(),
    );
}

/// The embedded DejaVu Sans Mono face, covering Latin and Cyrillic.
pub fn embedded_font() -> Result<&'static Font, &'static str> {
    EMBEDDED_FONT.as_ref().map_err(|e| *e)
}

pub fn line_metrics(font: &Font) -> Result<LineMetrics, &'static str> {
    font.horizontal_line_metrics(FONT_SIZE)
        .ok_or("font has no horizontal line metrics")
}

/// Rasterize `ch` once per cache, returning its metrics and coverage bitmap.
pub fn glyph<'a>(font: &Font, cache: &'a mut GlyphCache, ch: char) -> &'a (Metrics, Vec<u8>) {
    cache
        .entry(ch)
        .or_insert_with(|| font.rasterize(ch, FONT_SIZE))
}

/// Measures text with the embedded font's advance widths.
///
/// Missing glyphs are counted at [`AVG_GLYPH_WIDTH`], so the result stays
/// comparable with [`crate::widths::CharCountMeasure`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FontMeasure;

impl TextMeasure for FontMeasure {
    fn measure(&self, text: &str) -> Result<u32, MeasureError> {
        let font = embedded_font().map_err(|e| MeasureError::Unavailable(e.to_string()))?;
        let advance: f32 = text
            .chars()
            .map(|ch| {
                if font.lookup_glyph_index(ch) == 0 {
                    AVG_GLYPH_WIDTH as f32
                } else {
                    font.metrics(ch, FONT_SIZE).advance_width
                }
            })
            .sum();
        let advance = advance.ceil();
        if !advance.is_finite() || advance > u32::MAX as f32 {
            return Err(MeasureError::Unavailable(format!(
                "advance {advance} out of range"
            )));
        }
        Ok((advance as u32).saturating_add(TEXT_PADDING))
    }
}
