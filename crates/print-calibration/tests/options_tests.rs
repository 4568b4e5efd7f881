use print_calibration::*;

fn calibrated_profile() -> PrintProfile {
    PrintProfile {
        calibration_ab: Some(98.0),
        calibration_bc: Some(99.0),
        calibration_cd: Some(98.0),
        calibration_da: Some(99.0),
        border_left: Some(3.0),
        ..PrintProfile::new("Office Laser")
    }
}

#[test]
fn test_paper_size_dimensions() {
    assert_eq!(PaperSize::A4.dimensions_mm(), (210.0, 297.0));
    assert_eq!(PaperSize::Letter.dimensions_mm(), (215.9, 279.4));
    assert_eq!(
        PaperSize::Letter.dimensions_with_orientation(Orientation::Landscape),
        (279.4, 215.9)
    );

    let (w, h) = PaperSize::Letter.dimensions_inches(Orientation::Landscape);
    assert!((w - 11.0).abs() < 1e-9);
    assert!((h - 8.5).abs() < 1e-9);
}

#[test]
fn test_profile_defaults() {
    let profile = PrintProfile::default();
    assert_eq!(profile.paper_size, PaperSize::Letter);
    assert_eq!(profile.orientation, Orientation::Landscape);
    assert_eq!(profile.copies, 1);
    assert!(!profile.is_calibrated());
    assert_eq!(profile.scale_factor(), ScaleFactor::IDENTITY);
}

#[test]
fn test_validation_empty_printer_name() {
    let result = PrintProfile::default().validate();
    match result {
        Err(CalibrationError::Config(msg)) => assert!(msg.contains("Printer name")),
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut profile = PrintProfile::new("Office Laser");
    assert!(profile.validate().is_ok());

    profile.copies = 0;
    assert!(profile.validate().is_err());
    profile.copies = 2;

    profile.border_top = Some(-1.0);
    assert!(profile.validate().is_err());
    profile.border_top = Some(0.0);
    assert!(profile.validate().is_ok());

    profile.calibration_ab = Some(f64::NAN);
    assert!(profile.validate().is_err());
    profile.calibration_ab = None;

    profile.paper_size = PaperSize::Custom {
        width_mm: 0.0,
        height_mm: 100.0,
    };
    assert!(profile.validate().is_err());
}

#[test]
fn test_profile_measurements() {
    let profile = calibrated_profile();
    assert!(profile.is_calibrated());
    assert_eq!(
        profile.calibration_measurement(),
        CalibrationMeasurement::new(98.0, 99.0, 98.0, 99.0)
    );
    assert_eq!(profile.border_measurement().left, Some(3.0));
    assert_eq!(profile.border_measurement().top, None);

    let scale = profile.scale_factor();
    assert!(scale.is_calibrated);
    assert!((scale.scale_x - 100.0 / 98.0).abs() < 1e-12);
    assert!((scale.scale_y - 100.0 / 99.0).abs() < 1e-12);
}

#[test]
fn test_with_calibration_returns_updated_copy() {
    let profile = PrintProfile::new("Office Laser");
    let updated = profile.with_calibration(&CalibrationMeasurement::new(97.0, 97.0, 97.0, 97.0));

    assert!(!profile.is_calibrated());
    assert!(updated.is_calibrated());
    assert_eq!(updated.printer_name, "Office Laser");

    let bordered = updated.with_border(&BorderMeasurement {
        top: Some(4.5),
        ..Default::default()
    });
    assert_eq!(bordered.border_top, Some(4.5));
    assert_eq!(bordered.calibration_ab, Some(97.0));
}

#[test]
fn test_correction_options_from_profile() {
    let options = CorrectionOptions::from_profile(&calibrated_profile());

    assert_eq!(
        options.calibration,
        Some(ScaleSource::Measurement(CalibrationMeasurement::new(
            98.0, 99.0, 98.0, 99.0
        )))
    );
    assert_eq!(options.border_calibration.unwrap().left, Some(3.0));
    assert!((options.page_width_inches.unwrap() - 11.0).abs() < 1e-9);
    assert!((options.page_height_inches.unwrap() - 8.5).abs() < 1e-9);
}

#[test]
fn test_correction_options_from_uncalibrated_profile() {
    let mut profile = PrintProfile::new("Photo Printer");
    profile.calibration_ab = Some(98.0);
    profile.orientation = Orientation::Portrait;

    let options = CorrectionOptions::from_profile(&profile);
    assert_eq!(options.calibration, None);
    assert_eq!(options.border_calibration, None);
    assert!((options.page_width_inches.unwrap() - 8.5).abs() < 1e-9);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_profile() {
    use tempfile::NamedTempFile;

    let mut profile = calibrated_profile();
    profile.paper_size = PaperSize::Custom {
        width_mm: 101.6,
        height_mm: 152.4,
    };
    profile.copies = 3;

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    profile.save(path).await.unwrap();
    let loaded = PrintProfile::load(path).await.unwrap();

    assert_eq!(loaded, profile);
}

#[cfg(feature = "serde")]
#[test]
fn test_profile_row_with_nulls() {
    let json = r#"{
        "printer_name": "Front Desk",
        "paper_size": "a4",
        "orientation": "portrait",
        "copies": 2,
        "calibration_ab": 99.5,
        "calibration_bc": null,
        "border_top": 4.0
    }"#;
    let profile: PrintProfile = serde_json::from_str(json).unwrap();

    assert_eq!(profile.paper_size, PaperSize::A4);
    assert_eq!(profile.orientation, Orientation::Portrait);
    assert!(!profile.is_calibrated());
    assert_eq!(profile.border_top, Some(4.0));
    assert_eq!(profile.border_left, None);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_invalid_profile() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), b"{ not json").await.unwrap();

    match PrintProfile::load(temp_file.path()).await {
        Err(CalibrationError::Config(msg)) => assert!(msg.contains("Failed to parse profile")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}
