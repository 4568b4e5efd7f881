//! Image correction - applying calibration to a print-ready image
//!
//! This module orchestrates the correction:
//! 1. Resolve the target page size in pixels
//! 2. Resolve scale factors and border padding
//! 3. Fit the source to the page, then apply the calibration scale
//! 4. Stretch-resize and pad with white

mod io;

pub use io::{apply_calibration_to_png, encode_png, image_dimensions, load_image, save_png};

use crate::border::calculate_border_compensation;
use crate::constants::inches_to_px;
use crate::options::CorrectionOptions;
use crate::scale::calculate_calibration;
use crate::types::*;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

/// Fill colour for padding
const PADDING_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Compute the geometry of a correction without touching pixels
pub fn plan_correction(
    source_width: u32,
    source_height: u32,
    options: &CorrectionOptions,
) -> Result<CorrectionPlan> {
    options.validate()?;

    if source_width == 0 || source_height == 0 {
        return Err(CalibrationError::Config(format!(
            "Source image is empty ({}x{})",
            source_width, source_height
        )));
    }

    // Without page metadata the source is its own page
    let (target_width, target_height) = match (options.page_width_inches, options.page_height_inches)
    {
        (Some(w), Some(h)) => (to_px(inches_to_px(w)), to_px(inches_to_px(h))),
        _ => (source_width, source_height),
    };

    let (scale_x, scale_y) = resolve_scale(options);

    let padding = calculate_border_compensation(
        options.border_calibration.as_ref(),
        options.border_inset_mm,
    );

    let sw = source_width as f64;
    let sh = source_height as f64;
    let fit_scale = (target_width as f64 / sw).min(target_height as f64 / sh);

    // Calibration may enlarge the image, but never past the page
    let final_width = to_px(sw * fit_scale * scale_x).min(target_width);
    let final_height = to_px(sh * fit_scale * scale_y).min(target_height);

    let plan = CorrectionPlan {
        source_width,
        source_height,
        target_width,
        target_height,
        fit_scale,
        scale_x,
        scale_y,
        final_width,
        final_height,
        padding,
    };
    log::debug!("Correction plan: {:?}", plan);

    Ok(plan)
}

/// Apply calibration to an in-memory image, returning a new image
pub fn apply_calibration(source: &DynamicImage, options: &CorrectionOptions) -> Result<RgbaImage> {
    let plan = plan_correction(source.width(), source.height(), options)?;
    Ok(render_plan(source, &plan))
}

pub(crate) fn render_plan(source: &DynamicImage, plan: &CorrectionPlan) -> RgbaImage {
    // Fill fit: both axes hit their target exactly
    let resized = source
        .resize_exact(plan.final_width, plan.final_height, FilterType::Lanczos3)
        .to_rgba8();

    if plan.padding.is_zero() {
        return resized;
    }

    let mut canvas = RgbaImage::from_pixel(plan.output_width(), plan.output_height(), PADDING_COLOR);
    imageops::replace(
        &mut canvas,
        &resized,
        plan.padding.left_px as i64,
        plan.padding.top_px as i64,
    );
    canvas
}

fn resolve_scale(options: &CorrectionOptions) -> (f64, f64) {
    match options.calibration {
        Some(ScaleSource::Measurement(ref measurement)) => {
            let scale = calculate_calibration(Some(measurement));
            (scale.scale_x, scale.scale_y)
        }
        Some(ScaleSource::Factors { scale_x, scale_y }) => (scale_x, scale_y),
        None => (1.0, 1.0),
    }
}

/// Round a pixel length, keeping at least one pixel
fn to_px(value: f64) -> u32 {
    let px = value.round();
    if px >= 1.0 { px as u32 } else { 1 }
}
