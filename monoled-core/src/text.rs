//! Text layout on top of [`Canvas`]
//!
//! Glyphs come from [`crate::font`]. Each glyph occupies a 6 px cell (5 px
//! glyph plus 1 px spacing) on an 8 px line. Only set glyph bits are drawn,
//! so text over existing content does not erase the background.

use crate::canvas::{Canvas, Clip, Color};
use crate::font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Blank columns between glyphs
pub const GLYPH_SPACING: u16 = 1;

/// Horizontal advance per glyph
pub const CELL_WIDTH: u16 = GLYPH_WIDTH + GLYPH_SPACING;

/// Vertical advance per wrapped line
pub const LINE_HEIGHT: u16 = GLYPH_HEIGHT;

/// What to do when the next glyph would cross the right edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WrapMode {
    /// Continue on the next line at the starting column
    Wrap,
    /// Stop drawing
    #[default]
    Truncate,
}

impl From<u8> for WrapMode {
    /// `0` selects [`WrapMode::Wrap`], anything else truncates
    fn from(value: u8) -> Self {
        match value {
            0 => WrapMode::Wrap,
            _ => WrapMode::Truncate,
        }
    }
}

/// Result of laying out one string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextOutcome {
    /// Glyphs placed (fully or partially)
    pub glyphs: u16,
    /// Bytes outside the printable range that were ignored
    pub skipped: u16,
    /// Layout stopped before the end of the input
    pub truncated: bool,
    /// At least one glyph pixel fell outside the canvas
    pub clipped: Clip,
}

impl TextOutcome {
    /// Every byte was laid out and every pixel landed
    pub fn is_complete(&self) -> bool {
        !self.truncated && !self.clipped.is_clipped()
    }

    /// Combine outcomes of several strings drawn in one frame
    pub fn merge(self, other: TextOutcome) -> TextOutcome {
        TextOutcome {
            glyphs: self.glyphs.saturating_add(other.glyphs),
            skipped: self.skipped.saturating_add(other.skipped),
            truncated: self.truncated || other.truncated,
            clipped: self.clipped.and(other.clipped),
        }
    }
}

/// Draw raw bytes starting at `(x, y)`
///
/// Bytes outside `0x20..=0x7F` are skipped without moving the cursor.
/// Before each glyph, if it would cross the right edge the wrap mode decides:
/// `Wrap` returns to column `x` on the next line and stops once a line no
/// longer fits vertically, `Truncate` stops.
pub fn render_bytes<C: Canvas + ?Sized>(
    canvas: &mut C,
    bytes: &[u8],
    x: u16,
    y: u16,
    color: Color,
    wrap: WrapMode,
) -> TextOutcome {
    let width = u32::from(canvas.width());
    let height = u32::from(canvas.height());
    let glyph_width = u32::from(GLYPH_WIDTH);

    let mut outcome = TextOutcome::default();
    let mut cur_x = u32::from(x);
    let mut cur_y = u32::from(y);

    for &byte in bytes {
        let Some(glyph) = font::glyph(byte) else {
            outcome.skipped = outcome.skipped.saturating_add(1);
            continue;
        };

        if cur_x + glyph_width > width {
            match wrap {
                WrapMode::Wrap => {
                    cur_x = u32::from(x);
                    cur_y += u32::from(LINE_HEIGHT);
                    if cur_y + u32::from(LINE_HEIGHT) > height {
                        outcome.truncated = true;
                        break;
                    }
                }
                WrapMode::Truncate => {
                    outcome.truncated = true;
                    break;
                }
            }
        }

        let landed = blit(canvas, glyph, cur_x, cur_y, color);
        outcome.clipped = outcome.clipped.and(landed);
        outcome.glyphs = outcome.glyphs.saturating_add(1);

        cur_x += u32::from(CELL_WIDTH);
    }

    outcome
}

/// Draw the set bits of one glyph with its top-left corner at `(x, y)`
fn blit<C: Canvas + ?Sized>(canvas: &mut C, glyph: &[u8; 5], x: u32, y: u32, color: Color) -> Clip {
    let mut landed = true;

    for (column, &bits) in glyph.iter().enumerate() {
        for row in 0..GLYPH_HEIGHT {
            if bits & (1 << row) == 0 {
                continue;
            }
            let px = u16::try_from(x + column as u32);
            let py = u16::try_from(y + u32::from(row));
            landed &= match (px, py) {
                (Ok(px), Ok(py)) => canvas.set_pixel(px, py, color),
                _ => false,
            };
        }
    }

    Clip::from_landed(landed)
}

/// Text drawing for any [`Canvas`]
pub trait TextExt: Canvas {
    /// Draw a string with the built-in 5x8 font
    fn draw_text(&mut self, text: &str, x: u16, y: u16, color: Color, wrap: WrapMode) -> TextOutcome {
        render_bytes(self, text.as_bytes(), x, y, color, wrap)
    }

    /// Draw 8-bit data, skipping anything that is not printable ASCII
    fn draw_bytes(&mut self, bytes: &[u8], x: u16, y: u16, color: Color, wrap: WrapMode) -> TextOutcome {
        render_bytes(self, bytes, x, y, color, wrap)
    }
}

impl<C: Canvas + ?Sized> TextExt for C {}
