//! Bitmap text for generated pages
//!
//! Glyphs come from the Spleen 12×24 font and are upscaled by an integer
//! factor with nearest-neighbour blocks, so output is identical on every
//! platform.

use crate::constants::{GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::types::*;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use spleen_font::{FONT_12X24, PSF2Font};

/// Width in pixels of `text` drawn at `scale`
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_WIDTH * scale
}

/// Height in pixels of one line drawn at `scale`
pub fn text_height(scale: u32) -> u32 {
    GLYPH_HEIGHT * scale
}

/// Draw a single line of text with its top-left corner at (x, y)
pub fn draw_text(
    image: &mut RgbaImage,
    x: i32,
    y: i32,
    scale: u32,
    text: &str,
    color: Rgba<u8>,
) -> Result<()> {
    let mut font = PSF2Font::new(FONT_12X24)
        .map_err(|_| CalibrationError::Font("Failed to load Spleen 12x24".to_string()))?;
    let step = (GLYPH_WIDTH * scale) as i32;

    for (i, ch) in text.chars().enumerate() {
        let origin_x = x + i as i32 * step;
        let utf8 = ch.to_string();

        match font.glyph_for_utf8(utf8.as_bytes()) {
            Some(glyph) => {
                for (row_y, row) in glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        if on {
                            let rect = Rect::at(
                                origin_x + (col_x as u32 * scale) as i32,
                                y + (row_y as u32 * scale) as i32,
                            )
                            .of_size(scale, scale);
                            draw_filled_rect_mut(image, rect, color);
                        }
                    }
                }
            }
            None => {
                // Unknown character: outline the glyph cell
                let rect = Rect::at(origin_x, y).of_size(GLYPH_WIDTH * scale, GLYPH_HEIGHT * scale);
                draw_hollow_rect_mut(image, rect, color);
            }
        }
    }

    Ok(())
}

/// Draw a line of text horizontally centred on `center_x`
pub fn draw_text_centered(
    image: &mut RgbaImage,
    center_x: i32,
    y: i32,
    scale: u32,
    text: &str,
    color: Rgba<u8>,
) -> Result<()> {
    let x = center_x - (text_width(text, scale) / 2) as i32;
    draw_text(image, x, y, scale, text, color)
}
