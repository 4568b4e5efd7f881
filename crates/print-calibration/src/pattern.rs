//! Calibration test page
//!
//! A US Letter landscape page at 360 DPI carrying everything a user needs to
//! measure a printer by hand:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐  ← paper edge
//! │ ┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┓ │  ← border, 5mm in, 5mm thick
//! │ ┃           title + instructions           ┃ │
//! │ ┃        A ⊕──────────────────⊕ B          ┃ │
//! │ ┃          │      100mm       │            ┃ │
//! │ ┃        D ⊕──────────────────⊕ C          ┃ │
//! │ ┃           expected values                ┃ │
//! │ ┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛ │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The page depends only on constants, so repeated generation is
//! byte-identical.

use crate::constants::*;
use crate::correct::encode_png;
use crate::text::{draw_text, draw_text_centered, text_height, text_width};
use crate::types::*;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;
use std::path::Path;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const GUIDE_GRAY: Rgba<u8> = Rgba([190, 190, 190, 255]);

/// Gap between the inner edge of the border and the first text line
const TEXT_TOP_GAP_PX: u32 = 70;

/// Gap between the lowest dot decoration and the footer text
const TEXT_BOTTOM_GAP_PX: u32 = 120;

/// A measurement dot on the test page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub label: char,
    /// Centre in pixels
    pub x: f64,
    pub y: f64,
}

impl Dot {
    /// Centre rounded to the pixel grid
    pub fn pixel(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }

    /// Distance to another dot in millimetres at nominal scale
    pub fn distance_mm(&self, other: &Dot) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt() / PRINT_DPI * MM_PER_INCH
    }
}

/// Geometry of the calibration test page, in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct TestPageLayout {
    pub width: u32,
    pub height: u32,
    /// Dots in label order: A top-left, B top-right, C bottom-right, D bottom-left
    pub dots: [Dot; 4],
    /// Distance from the paper edge to the outer edge of the border
    pub border_inset: u32,
    pub border_thickness: u32,
}

impl TestPageLayout {
    /// The standard page every saved calibration was measured against
    pub fn standard() -> Self {
        let width = TEST_PAGE_WIDTH_PX;
        let height = TEST_PAGE_HEIGHT_PX;

        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        let half = mm_to_px(EXPECTED_DISTANCE_MM) / 2.0;

        let dot = |label, x, y| Dot { label, x, y };

        Self {
            width,
            height,
            dots: [
                dot('A', cx - half, cy - half),
                dot('B', cx + half, cy - half),
                dot('C', cx + half, cy + half),
                dot('D', cx - half, cy + half),
            ],
            border_inset: mm_to_px(BORDER_INSET_MM).round() as u32,
            border_thickness: mm_to_px(BORDER_THICKNESS_MM).round() as u32,
        }
    }

    /// Inner edge of the border on the top/left sides
    fn content_top(&self) -> u32 {
        self.border_inset + self.border_thickness
    }
}

/// Render the calibration test page
pub fn generate_calibration_test_page() -> Result<RgbaImage> {
    let layout = TestPageLayout::standard();
    let mut page = RgbaImage::from_pixel(layout.width, layout.height, WHITE);

    draw_border(&mut page, &layout);
    draw_guides(&mut page, &layout);
    for dot in &layout.dots {
        draw_dot(&mut page, dot);
    }
    draw_labels(&mut page, &layout)?;
    draw_instructions(&mut page, &layout)?;

    Ok(page)
}

/// Render the calibration test page and write it as PNG
pub async fn save_calibration_test_page(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(|| {
        let page = generate_calibration_test_page()?;
        encode_png(&page)
    })
    .await??;

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| CalibrationError::File {
            path: path.clone(),
            source,
        })?;
    log::info!("Wrote calibration test page to {}", path.display());
    Ok(())
}

fn draw_border(page: &mut RgbaImage, layout: &TestPageLayout) {
    let inset = layout.border_inset;
    let thick = layout.border_thickness;
    let span_w = layout.width - 2 * inset;
    let span_h = layout.height - 2 * inset;
    let far_x = (layout.width - inset - thick) as i32;
    let far_y = (layout.height - inset - thick) as i32;
    let near = inset as i32;

    for rect in [
        Rect::at(near, near).of_size(span_w, thick),
        Rect::at(near, far_y).of_size(span_w, thick),
        Rect::at(near, near).of_size(thick, span_h),
        Rect::at(far_x, near).of_size(thick, span_h),
    ] {
        draw_filled_rect_mut(page, rect, BLACK);
    }
}

/// Thin lines joining the dots in measuring order
fn draw_guides(page: &mut RgbaImage, layout: &TestPageLayout) {
    for i in 0..layout.dots.len() {
        let (ax, ay) = layout.dots[i].pixel();
        let (bx, by) = layout.dots[(i + 1) % layout.dots.len()].pixel();
        draw_line_segment_mut(
            page,
            (ax as f32, ay as f32),
            (bx as f32, by as f32),
            GUIDE_GRAY,
        );
    }
}

fn draw_dot(page: &mut RgbaImage, dot: &Dot) {
    let (x, y) = dot.pixel();
    let radius = mm_to_px(DOT_RADIUS_MM).round() as i32;
    let ring = mm_to_px(DOT_RING_RADIUS_MM).round() as i32;
    let arm = mm_to_px(CROSSHAIR_ARM_MM).round() as i32;

    draw_filled_circle_mut(page, (x, y), radius, BLACK);
    for r in ring - 1..=ring + 1 {
        draw_hollow_circle_mut(page, (x, y), r, BLACK);
    }

    // Three pixels wide so the crosshair survives low-quality print modes
    for offset in -1..=1 {
        draw_line_segment_mut(
            page,
            ((x - arm) as f32, (y + offset) as f32),
            ((x + arm) as f32, (y + offset) as f32),
            BLACK,
        );
        draw_line_segment_mut(
            page,
            ((x + offset) as f32, (y - arm) as f32),
            ((x + offset) as f32, (y + arm) as f32),
            BLACK,
        );
    }
}

/// Letters sit outside the square: A and D to the left, B and C to the right
fn draw_labels(page: &mut RgbaImage, layout: &TestPageLayout) -> Result<()> {
    let offset = mm_to_px(LABEL_OFFSET_MM).round() as i32;
    let glyph_h = text_height(TITLE_TEXT_SCALE) as i32;

    for dot in &layout.dots {
        let (x, y) = dot.pixel();
        let label = dot.label.to_string();
        let label_w = text_width(&label, TITLE_TEXT_SCALE) as i32;
        let label_x = match dot.label {
            'A' | 'D' => x - offset - label_w,
            _ => x + offset,
        };
        draw_text(page, label_x, y - glyph_h / 2, TITLE_TEXT_SCALE, &label, BLACK)?;
    }

    Ok(())
}

fn draw_instructions(page: &mut RgbaImage, layout: &TestPageLayout) -> Result<()> {
    let center_x = (layout.width / 2) as i32;
    let title_h = text_height(TITLE_TEXT_SCALE) + LINE_SPACING_PX;
    let line_h = text_height(BODY_TEXT_SCALE) + LINE_SPACING_PX;

    let header = [
        "Print this page at 100% scale (turn off fit-to-page).".to_string(),
        "Measure the distance between dot centers in mm:".to_string(),
        "A-B (top), B-C (right), C-D (bottom), D-A (left).".to_string(),
    ];
    let footer = [
        format!("Each distance should be exactly {} mm.", EXPECTED_DISTANCE_MM),
        "Measure from each paper edge to the outer edge of the black border.".to_string(),
        format!("Each border gap should be exactly {} mm.", BORDER_INSET_MM),
    ];

    let mut y = layout.content_top() + TEXT_TOP_GAP_PX;
    draw_text_centered(
        page,
        center_x,
        y as i32,
        TITLE_TEXT_SCALE,
        "PRINT CALIBRATION TEST PAGE",
        BLACK,
    )?;
    y += title_h + LINE_SPACING_PX;

    for line in &header {
        draw_text_centered(page, center_x, y as i32, BODY_TEXT_SCALE, line, BLACK)?;
        y += line_h;
    }

    // Footer starts below the bottom row of dots and their crosshairs
    let bottom_dot_y = layout.dots[2].pixel().1;
    let arm = mm_to_px(CROSSHAIR_ARM_MM).round() as i32;
    let mut y = (bottom_dot_y + arm) as u32 + TEXT_BOTTOM_GAP_PX;

    for line in &footer {
        draw_text_centered(page, center_x, y as i32, BODY_TEXT_SCALE, line, BLACK)?;
        y += line_h;
    }

    let resolution = format!(
        "{} x {} in @ {} dpi",
        TEST_PAGE_WIDTH_IN, TEST_PAGE_HEIGHT_IN, PRINT_DPI
    );
    draw_text_centered(page, center_x, y as i32, BODY_TEXT_SCALE, &resolution, GUIDE_GRAY)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_top() {
        let layout = TestPageLayout::standard();
        assert_eq!(layout.content_top(), 142);
    }
}
