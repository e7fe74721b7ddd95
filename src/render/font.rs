//! Text metrics used to size nametag boxes.
//!
//! Glyphs themselves are rasterized by the host; the overlay only needs to
//! know how much room a string takes.

use crate::constants::{GLYPH_ADVANCE, GLYPH_HEIGHT, SPACE_ADVANCE};
use crate::error::NametagError;

pub trait FontRenderer {
    /// Height of one line of text at scale 1.0
    fn line_height(&self) -> f32;

    /// Width of `text` at scale 1.0
    fn text_width(&self, text: &str) -> Result<f32, NametagError>;
}

/// Fixed-advance font matching the segment glyphs of the HUD.
#[derive(Debug, Clone, Copy)]
pub struct SegmentFont {
    pub advance: f32,
    pub space_advance: f32,
    pub height: f32,
}

impl Default for SegmentFont {
    fn default() -> Self {
        Self {
            advance: GLYPH_ADVANCE,
            space_advance: SPACE_ADVANCE,
            height: GLYPH_HEIGHT,
        }
    }
}

impl FontRenderer for SegmentFont {
    fn line_height(&self) -> f32 {
        self.height
    }

    fn text_width(&self, text: &str) -> Result<f32, NametagError> {
        let mut total_width = 0.0;
        for ch in text.chars() {
            if ch.is_control() {
                return Err(NametagError::Font(format!(
                    "cannot lay out control character {:?}",
                    ch
                )));
            }
            if ch == ' ' {
                total_width += self.space_advance;
            } else {
                total_width += self.advance;
            }
        }
        Ok(total_width)
    }
}
