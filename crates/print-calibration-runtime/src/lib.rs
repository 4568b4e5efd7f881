//! Command/update protocol for a calibration worker.
//!
//! A front end sends [`CalibrationCommand`]s and receives
//! [`CalibrationUpdate`]s. Each worker handles its commands strictly in order,
//! so running one worker per printer keeps calibration and print preparation
//! for that printer from interleaving.

mod worker;

pub use worker::{WorkerHandle, spawn_worker, worker_task};

use std::path::PathBuf;

// Re-export types from the library crate
pub use print_calibration::{
    BorderCompensation, BorderMeasurement, CalibrationMeasurement, CorrectionOptions,
    CorrectionPlan, PrintProfile, ScaleFactor,
};

/// Commands sent from the front end to the worker
#[derive(Debug, Clone)]
pub enum CalibrationCommand {
    GenerateTestPage {
        output_path: PathBuf,
    },
    LoadProfile {
        path: PathBuf,
    },
    SaveProfile {
        profile: PrintProfile,
        path: PathBuf,
    },
    CalculateScale {
        measurement: Option<CalibrationMeasurement>,
    },
    CalculateBorder {
        measurement: Option<BorderMeasurement>,
        expected_inset_mm: f64,
    },
    /// Preview the geometry of a correction; superseded by newer queued requests
    PlanCorrection {
        source_width: u32,
        source_height: u32,
        options: CorrectionOptions,
    },
    ApplyCalibration {
        input_path: PathBuf,
        output_path: PathBuf,
        options: CorrectionOptions,
    },
}

/// Updates sent from the worker to the front end
#[derive(Debug, Clone)]
pub enum CalibrationUpdate {
    TestPageGenerated {
        path: PathBuf,
    },
    ProfileLoaded {
        profile: PrintProfile,
    },
    ProfileSaved {
        path: PathBuf,
    },
    ScaleCalculated {
        scale: ScaleFactor,
    },
    BorderCalculated {
        compensation: BorderCompensation,
    },
    CorrectionPlanned {
        plan: CorrectionPlan,
    },
    CalibrationApplied {
        path: PathBuf,
        plan: CorrectionPlan,
    },
    Error {
        message: String,
    },
}
