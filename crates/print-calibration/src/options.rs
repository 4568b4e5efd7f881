use crate::constants::{BORDER_INSET_MM, MAX_BORDER_INSET_MM, MAX_PAGE_INCHES};
use crate::scale::calculate_calibration;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A printer's saved settings and calibration data.
///
/// Owned by the persistence layer; the engine only reads it. Field names
/// follow the stored columns so rows deserialise without renaming.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrintProfile {
    // Printer identity
    pub printer_name: String,

    // Page geometry
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub copies: u32,

    // Four-point scale calibration (mm)
    pub calibration_ab: Option<f64>,
    pub calibration_bc: Option<f64>,
    pub calibration_cd: Option<f64>,
    pub calibration_da: Option<f64>,

    // Border gaps (mm)
    pub border_top: Option<f64>,
    pub border_right: Option<f64>,
    pub border_bottom: Option<f64>,
    pub border_left: Option<f64>,
}

impl Default for PrintProfile {
    fn default() -> Self {
        Self {
            printer_name: String::new(),
            paper_size: PaperSize::Letter,
            orientation: Orientation::Landscape,
            copies: 1,
            calibration_ab: None,
            calibration_bc: None,
            calibration_cd: None,
            calibration_da: None,
            border_top: None,
            border_right: None,
            border_bottom: None,
            border_left: None,
        }
    }
}

impl PrintProfile {
    pub fn new(printer_name: impl Into<String>) -> Self {
        Self {
            printer_name: printer_name.into(),
            ..Default::default()
        }
    }

    /// Load a profile from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CalibrationError::File {
                path: path.to_owned(),
                source,
            })?;
        let profile = serde_json::from_slice(&bytes)
            .map_err(|e| CalibrationError::Config(format!("Failed to parse profile: {}", e)))?;
        Ok(profile)
    }

    /// Save the profile to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CalibrationError::Config(format!("Failed to serialize profile: {}", e)))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| CalibrationError::File {
                path: path.to_owned(),
                source,
            })?;
        Ok(())
    }

    /// Validate the profile
    pub fn validate(&self) -> Result<()> {
        if self.printer_name.trim().is_empty() {
            return Err(CalibrationError::Config(
                "Printer name must not be empty".to_string(),
            ));
        }

        if self.copies == 0 {
            return Err(CalibrationError::Config(
                "Copies must be at least 1".to_string(),
            ));
        }

        if let PaperSize::Custom {
            width_mm,
            height_mm,
        } = self.paper_size
        {
            if !(width_mm.is_finite() && width_mm > 0.0 && height_mm.is_finite() && height_mm > 0.0)
            {
                return Err(CalibrationError::Config(format!(
                    "Custom paper size must be positive, got {}x{} mm",
                    width_mm, height_mm
                )));
            }
        }

        let measurements = [
            ("calibration_ab", self.calibration_ab),
            ("calibration_bc", self.calibration_bc),
            ("calibration_cd", self.calibration_cd),
            ("calibration_da", self.calibration_da),
            ("border_top", self.border_top),
            ("border_right", self.border_right),
            ("border_bottom", self.border_bottom),
            ("border_left", self.border_left),
        ];
        for (name, value) in measurements {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(CalibrationError::Config(format!(
                        "{} must be a non-negative distance in mm, got {}",
                        name, v
                    )));
                }
            }
        }

        Ok(())
    }

    /// The stored four-point measurement (possibly partial)
    pub fn calibration_measurement(&self) -> CalibrationMeasurement {
        CalibrationMeasurement {
            ab: self.calibration_ab,
            bc: self.calibration_bc,
            cd: self.calibration_cd,
            da: self.calibration_da,
        }
    }

    /// The stored border gaps
    pub fn border_measurement(&self) -> BorderMeasurement {
        BorderMeasurement {
            top: self.border_top,
            right: self.border_right,
            bottom: self.border_bottom,
            left: self.border_left,
        }
    }

    /// Scale factors implied by the stored measurement
    pub fn scale_factor(&self) -> ScaleFactor {
        calculate_calibration(Some(&self.calibration_measurement()))
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration_measurement().is_complete()
    }

    /// Page size in inches for the configured paper and orientation
    pub fn page_size_inches(&self) -> (f64, f64) {
        self.paper_size.dimensions_inches(self.orientation)
    }

    /// A copy of this profile carrying a new four-point measurement
    pub fn with_calibration(&self, measurement: &CalibrationMeasurement) -> Self {
        Self {
            calibration_ab: measurement.ab,
            calibration_bc: measurement.bc,
            calibration_cd: measurement.cd,
            calibration_da: measurement.da,
            ..self.clone()
        }
    }

    /// A copy of this profile carrying new border gaps
    pub fn with_border(&self, measurement: &BorderMeasurement) -> Self {
        Self {
            border_top: measurement.top,
            border_right: measurement.right,
            border_bottom: measurement.bottom,
            border_left: measurement.left,
            ..self.clone()
        }
    }
}

/// Options for the image corrector.
///
/// Every field is optional; a default value applies no correction and fits the
/// source to its own size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CorrectionOptions {
    // Scale calibration
    pub calibration: Option<ScaleSource>,

    // Border compensation
    pub border_calibration: Option<BorderMeasurement>,
    pub border_inset_mm: f64,

    // Target page; both must be set to take effect
    pub page_width_inches: Option<f64>,
    pub page_height_inches: Option<f64>,
}

impl Default for CorrectionOptions {
    fn default() -> Self {
        Self {
            calibration: None,
            border_calibration: None,
            border_inset_mm: BORDER_INSET_MM,
            page_width_inches: None,
            page_height_inches: None,
        }
    }
}

impl CorrectionOptions {
    /// Build corrector options from a saved profile
    pub fn from_profile(profile: &PrintProfile) -> Self {
        let measurement = profile.calibration_measurement();
        let border = profile.border_measurement();
        let (width_in, height_in) = profile.page_size_inches();

        Self {
            calibration: measurement
                .is_complete()
                .then_some(ScaleSource::Measurement(measurement)),
            border_calibration: (!border.is_empty()).then_some(border),
            border_inset_mm: BORDER_INSET_MM,
            page_width_inches: Some(width_in),
            page_height_inches: Some(height_in),
        }
    }

    /// Set the target page size in inches
    pub fn with_page_inches(mut self, width: f64, height: f64) -> Self {
        self.page_width_inches = Some(width);
        self.page_height_inches = Some(height);
        self
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("page_width_inches", self.page_width_inches),
            ("page_height_inches", self.page_height_inches),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 || v > MAX_PAGE_INCHES {
                    return Err(CalibrationError::Config(format!(
                        "{} must be between 0 and {} inches, got {}",
                        name, MAX_PAGE_INCHES, v
                    )));
                }
            }
        }

        if let Some(ScaleSource::Factors { scale_x, scale_y }) = self.calibration {
            if !(scale_x.is_finite() && scale_x > 0.0 && scale_y.is_finite() && scale_y > 0.0) {
                return Err(CalibrationError::Config(format!(
                    "Scale factors must be positive, got {} x {}",
                    scale_x, scale_y
                )));
            }
        }

        if !(self.border_inset_mm.is_finite()
            && (0.0..=MAX_BORDER_INSET_MM).contains(&self.border_inset_mm))
        {
            return Err(CalibrationError::Config(format!(
                "Border inset must be between 0 and {} mm, got {}",
                MAX_BORDER_INSET_MM, self.border_inset_mm
            )));
        }

        if let Some(border) = &self.border_calibration {
            for (name, value) in [
                ("top", border.top),
                ("right", border.right),
                ("bottom", border.bottom),
                ("left", border.left),
            ] {
                if let Some(v) = value {
                    if !v.is_finite() || v < 0.0 {
                        return Err(CalibrationError::Config(format!(
                            "Border {} must be a non-negative distance in mm, got {}",
                            name, v
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
