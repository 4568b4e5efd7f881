//! Shared constants for print calibration
//!
//! These values are part of the calibration contract: measurements saved in
//! existing print profiles were taken against a test page built from them, so
//! they must not change.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Resolution at which every page/pixel conversion is defined
pub const PRINT_DPI: f64 = 360.0;

/// Convert millimetres to (fractional) pixels at [`PRINT_DPI`]
#[inline]
pub fn mm_to_px(mm: f64) -> f64 {
    mm / MM_PER_INCH * PRINT_DPI
}

/// Convert inches to (fractional) pixels at [`PRINT_DPI`]
#[inline]
pub fn inches_to_px(inches: f64) -> f64 {
    inches * PRINT_DPI
}

/// Convert millimetres to inches
#[inline]
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

// =============================================================================
// Calibration Targets
// =============================================================================

/// Nominal distance between adjacent test-page dots (A-B, B-C, C-D, D-A)
pub const EXPECTED_DISTANCE_MM: f64 = 100.0;

/// Gap between the paper edge and the outer edge of the test-page border
pub const BORDER_INSET_MM: f64 = 5.0;

/// Stroke width of the test-page border
pub const BORDER_THICKNESS_MM: f64 = 5.0;

// =============================================================================
// Correction Limits
// =============================================================================

/// Largest page edge the corrector accepts (17280px at 360dpi)
pub const MAX_PAGE_INCHES: f64 = 48.0;

/// Largest expected border inset the corrector accepts
pub const MAX_BORDER_INSET_MM: f64 = 100.0;

// =============================================================================
// Test Page Geometry
// =============================================================================

/// Test page width (US Letter, landscape)
pub const TEST_PAGE_WIDTH_IN: f64 = 11.0;

/// Test page height (US Letter, landscape)
pub const TEST_PAGE_HEIGHT_IN: f64 = 8.5;

/// Test page width in pixels (11in × 360dpi)
pub const TEST_PAGE_WIDTH_PX: u32 = 3960;

/// Test page height in pixels (8.5in × 360dpi)
pub const TEST_PAGE_HEIGHT_PX: u32 = 3060;

/// Radius of the solid centre of each measurement dot
pub const DOT_RADIUS_MM: f64 = 1.0;

/// Radius of the ring drawn around each measurement dot
pub const DOT_RING_RADIUS_MM: f64 = 4.0;

/// Half-length of the crosshair arms through each dot
pub const CROSSHAIR_ARM_MM: f64 = 7.0;

/// Gap between a dot and its letter label
pub const LABEL_OFFSET_MM: f64 = 6.0;

// =============================================================================
// Text
// =============================================================================

/// Glyph cell width of the bitmap font (Spleen 12×24)
pub const GLYPH_WIDTH: u32 = 12;

/// Glyph cell height of the bitmap font (Spleen 12×24)
pub const GLYPH_HEIGHT: u32 = 24;

/// Integer upscale for instruction text (≈ 5mm line height at 360dpi)
pub const BODY_TEXT_SCALE: u32 = 3;

/// Integer upscale for the page title and dot labels
pub const TITLE_TEXT_SCALE: u32 = 4;

/// Vertical gap between text lines (pixels)
pub const LINE_SPACING_PX: u32 = 24;
