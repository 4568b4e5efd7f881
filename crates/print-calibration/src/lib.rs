//! Print calibration engine
//!
//! Turns hand measurements of a printed test page into scale factors and
//! border padding, and applies them to images before they are printed.

mod border;
pub mod constants;
pub mod correct;
mod options;
mod pattern;
mod scale;
mod text;
mod types;

pub use border::calculate_border_compensation;
pub use correct::{
    apply_calibration, apply_calibration_to_png, encode_png, image_dimensions, load_image,
    plan_correction, save_png,
};
pub use options::*;
pub use pattern::{Dot, TestPageLayout, generate_calibration_test_page, save_calibration_test_page};
pub use scale::calculate_calibration;
pub use types::*;
