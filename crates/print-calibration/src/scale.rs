//! Four-point scale calibration
//!
//! The test page prints dots A, B, C, D on a 100mm square. A printer that
//! shrinks or stretches the page changes the measured distances; the ratio of
//! expected to measured distance on each axis is the factor that undoes it.

use crate::constants::EXPECTED_DISTANCE_MM;
use crate::types::{CalibrationMeasurement, ScaleFactor};

/// Convert a test-page measurement into per-axis scale factors.
///
/// Missing or partial data yields [`ScaleFactor::IDENTITY`].
pub fn calculate_calibration(measurement: Option<&CalibrationMeasurement>) -> ScaleFactor {
    let Some([ab, bc, cd, da]) = measurement.and_then(CalibrationMeasurement::distances) else {
        log::debug!("No complete calibration measurement, using identity scale");
        return ScaleFactor::IDENTITY;
    };

    // A-B and C-D are the horizontal edges of the square, B-C and D-A the vertical ones
    let horizontal_avg = (ab + cd) / 2.0;
    let vertical_avg = (bc + da) / 2.0;

    let scale_x = EXPECTED_DISTANCE_MM / horizontal_avg;
    let scale_y = EXPECTED_DISTANCE_MM / vertical_avg;
    let avg_scale = (scale_x + scale_y) / 2.0;

    log::debug!(
        "Calibration: ab={} bc={} cd={} da={} -> horizontal avg {:.3}mm, vertical avg {:.3}mm",
        ab,
        bc,
        cd,
        da,
        horizontal_avg,
        vertical_avg
    );
    log::debug!(
        "Calibration: scale_x={:.5} scale_y={:.5} avg={:.5}",
        scale_x,
        scale_y,
        avg_scale
    );

    ScaleFactor {
        scale_x,
        scale_y,
        avg_scale,
        is_calibrated: true,
    }
}
