use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("IO error on {}: {source}", .path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CalibrationError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    /// Portrait: height > width
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PaperSize {
    A3,
    A4,
    A5,
    #[default]
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f64, height_mm: f64 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Page size in inches with orientation applied, as consumed by the image corrector
    pub fn dimensions_inches(self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.dimensions_with_orientation(orientation);
        (
            crate::constants::mm_to_inches(w),
            crate::constants::mm_to_inches(h),
        )
    }
}

/// Distances measured between the four dots of a printed test page, in mm.
///
/// A-B and C-D run horizontally, B-C and D-A vertically. The measurement is
/// only usable when all four distances are present and positive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationMeasurement {
    pub ab: Option<f64>,
    pub bc: Option<f64>,
    pub cd: Option<f64>,
    pub da: Option<f64>,
}

impl CalibrationMeasurement {
    /// A fully populated measurement
    pub fn new(ab: f64, bc: f64, cd: f64, da: f64) -> Self {
        Self {
            ab: Some(ab),
            bc: Some(bc),
            cd: Some(cd),
            da: Some(da),
        }
    }

    /// All four distances, or `None` if any is missing, zero, negative or not finite
    pub fn distances(&self) -> Option<[f64; 4]> {
        let usable = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);
        Some([
            usable(self.ab)?,
            usable(self.bc)?,
            usable(self.cd)?,
            usable(self.da)?,
        ])
    }

    pub fn is_complete(&self) -> bool {
        self.distances().is_some()
    }
}

/// Per-axis correction derived from a [`CalibrationMeasurement`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleFactor {
    pub scale_x: f64,
    pub scale_y: f64,
    pub avg_scale: f64,
    pub is_calibrated: bool,
}

impl ScaleFactor {
    /// No correction; used whenever calibration data is missing
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        avg_scale: 1.0,
        is_calibrated: false,
    };
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Gaps measured between each paper edge and the outer edge of the test-page
/// border, in mm. Sides are independent; zero is a valid measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderMeasurement {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl BorderMeasurement {
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }
}

/// White padding added to each side of a corrected image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderCompensation {
    pub top_px: u32,
    pub right_px: u32,
    pub bottom_px: u32,
    pub left_px: u32,
}

impl BorderCompensation {
    /// Total padding added to the width
    pub fn horizontal_px(&self) -> u32 {
        self.left_px.saturating_add(self.right_px)
    }

    /// Total padding added to the height
    pub fn vertical_px(&self) -> u32 {
        self.top_px.saturating_add(self.bottom_px)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Where the image corrector gets its scale factors from
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScaleSource {
    /// Raw test-page measurements, converted with `calculate_calibration`
    Measurement(CalibrationMeasurement),
    /// Factors computed earlier (e.g. cached alongside a profile)
    Factors { scale_x: f64, scale_y: f64 },
}

/// Geometry of a correction, computed before any pixels are touched
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrectionPlan {
    /// Source image size
    pub source_width: u32,
    pub source_height: u32,
    /// Target page size
    pub target_width: u32,
    pub target_height: u32,
    /// Uniform scale that fits the source inside the page
    pub fit_scale: f64,
    /// Calibration factors in effect
    pub scale_x: f64,
    pub scale_y: f64,
    /// Size of the resized image before padding (never larger than the page)
    pub final_width: u32,
    pub final_height: u32,
    /// Padding added around the resized image
    pub padding: BorderCompensation,
}

impl CorrectionPlan {
    /// Width of the written image, padding included
    pub fn output_width(&self) -> u32 {
        self.final_width.saturating_add(self.padding.horizontal_px())
    }

    /// Height of the written image, padding included
    pub fn output_height(&self) -> u32 {
        self.final_height.saturating_add(self.padding.vertical_px())
    }
}
