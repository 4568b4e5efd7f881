//! Image I/O for correction

use super::{plan_correction, render_plan};
use crate::options::CorrectionOptions;
use crate::types::*;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Load and decode an image file
pub async fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| CalibrationError::File {
            path: path.clone(),
            source,
        })?;
    tokio::task::spawn_blocking(move || {
        image::load_from_memory(&bytes).map_err(|source| CalibrationError::Decode { path, source })
    })
    .await?
}

/// Read an image's pixel size from its header, without decoding pixels
pub async fn image_dimensions(path: impl AsRef<Path>) -> Result<(u32, u32)> {
    let path = path.as_ref().to_owned();
    if let Err(source) = tokio::fs::metadata(&path).await {
        return Err(CalibrationError::File { path, source });
    }
    tokio::task::spawn_blocking(move || {
        image::image_dimensions(&path).map_err(|source| CalibrationError::Decode { path, source })
    })
    .await?
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Encode and write an image as PNG
pub async fn save_png(image: RgbaImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || encode_png(&image)).await??;
    write_file(&path, bytes).await
}

/// Correct an image file and write the print-ready PNG.
///
/// The output is only written once the corrected image has been fully
/// encoded; a decode or encode failure leaves `output` untouched.
pub async fn apply_calibration_to_png(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &CorrectionOptions,
) -> Result<CorrectionPlan> {
    options.validate()?;

    let input = input.as_ref();
    let output = output.as_ref().to_owned();
    let source = load_image(input).await?;

    let options = options.clone();
    let (plan, bytes) = tokio::task::spawn_blocking(move || {
        let plan = plan_correction(source.width(), source.height(), &options)?;
        let corrected = render_plan(&source, &plan);
        let bytes = encode_png(&corrected)?;
        Ok::<_, CalibrationError>((plan, bytes))
    })
    .await??;

    write_file(&output, bytes).await?;
    log::info!(
        "Calibrated {} -> {} ({}x{})",
        input.display(),
        output.display(),
        plan.output_width(),
        plan.output_height()
    );

    Ok(plan)
}

async fn write_file(path: &Path, bytes: Vec<u8>) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| CalibrationError::File {
            path: path.to_owned(),
            source,
        })
}
