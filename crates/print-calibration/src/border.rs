//! Border compensation
//!
//! The test-page border sits a known distance from the paper edge. A printer
//! that clips the edge prints it closer than expected; the difference becomes
//! white padding on that side so the content survives the clip.
//!
//! Only clipping can be compensated. A printer that adds margin (measured gap
//! larger than expected) gets zero padding on that side rather than a negative
//! offset.

use crate::constants::{MM_PER_INCH, PRINT_DPI};
use crate::types::{BorderCompensation, BorderMeasurement};

/// Convert measured border gaps into per-side pixel padding.
///
/// Absent sides contribute nothing; zero is a valid measurement. Every side is
/// clamped to `>= 0`.
pub fn calculate_border_compensation(
    measurement: Option<&BorderMeasurement>,
    expected_inset_mm: f64,
) -> BorderCompensation {
    let Some(measurement) = measurement else {
        return BorderCompensation::default();
    };

    let side = |measured: Option<f64>| -> u32 {
        let compensation_mm = match measured.filter(|v| v.is_finite()) {
            Some(measured) => expected_inset_mm - measured,
            None => 0.0,
        };
        compensation_px(compensation_mm)
    };

    let compensation = BorderCompensation {
        top_px: side(measurement.top),
        right_px: side(measurement.right),
        bottom_px: side(measurement.bottom),
        left_px: side(measurement.left),
    };

    log::debug!(
        "Border compensation (inset {}mm): {:?} -> {:?}",
        expected_inset_mm,
        measurement,
        compensation
    );

    compensation
}

/// Millimetres of compensation to whole pixels, never negative
fn compensation_px(mm: f64) -> u32 {
    let px = (mm / MM_PER_INCH * PRINT_DPI).round();
    if px.is_finite() && px > 0.0 { px as u32 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compensation_px_rounding() {
        assert_eq!(compensation_px(0.0), 0);
        assert_eq!(compensation_px(2.0), 28);
        assert_eq!(compensation_px(25.4), 360);
        assert_eq!(compensation_px(-1.0), 0);
        assert_eq!(compensation_px(f64::NAN), 0);
    }
}
