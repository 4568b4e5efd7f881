use image::{Rgba, RgbaImage};
use print_calibration::save_png;
use print_calibration_runtime::*;
use tempfile::tempdir;

async fn next_update(handle: &mut WorkerHandle) -> CalibrationUpdate {
    handle.updates.recv().await.expect("worker stopped early")
}

#[tokio::test]
async fn test_calculate_scale_and_border() {
    let mut worker = spawn_worker();

    worker
        .commands
        .send(CalibrationCommand::CalculateScale {
            measurement: Some(CalibrationMeasurement::new(98.0, 98.0, 98.0, 98.0)),
        })
        .unwrap();
    worker
        .commands
        .send(CalibrationCommand::CalculateBorder {
            measurement: Some(BorderMeasurement {
                left: Some(3.0),
                ..Default::default()
            }),
            expected_inset_mm: 5.0,
        })
        .unwrap();

    match next_update(&mut worker).await {
        CalibrationUpdate::ScaleCalculated { scale } => {
            assert!(scale.is_calibrated);
            assert!((scale.scale_x - 100.0 / 98.0).abs() < 1e-12);
        }
        other => panic!("Expected ScaleCalculated, got {:?}", other),
    }
    match next_update(&mut worker).await {
        CalibrationUpdate::BorderCalculated { compensation } => {
            assert_eq!(compensation.left_px, 28);
        }
        other => panic!("Expected BorderCalculated, got {:?}", other),
    }
}

#[tokio::test]
async fn test_queued_plans_are_coalesced() {
    let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = tokio::sync::mpsc::unbounded_channel();

    // Queue everything before the worker starts so the drain sees it all
    for width in [100, 200, 300] {
        command_tx
            .send(CalibrationCommand::PlanCorrection {
                source_width: width,
                source_height: 50,
                options: CorrectionOptions::default(),
            })
            .unwrap();
    }
    command_tx
        .send(CalibrationCommand::CalculateScale { measurement: None })
        .unwrap();
    drop(command_tx);

    worker_task(command_rx, update_tx).await;

    let mut updates = Vec::new();
    while let Some(update) = update_rx.recv().await {
        updates.push(update);
    }

    assert_eq!(updates.len(), 2);
    assert!(matches!(
        updates[0],
        CalibrationUpdate::ScaleCalculated { scale } if !scale.is_calibrated
    ));
    match &updates[1] {
        CalibrationUpdate::CorrectionPlanned { plan } => assert_eq!(plan.source_width, 300),
        other => panic!("Expected CorrectionPlanned, got {:?}", other),
    }
}

#[tokio::test]
async fn test_profile_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("printer.json");
    let mut worker = spawn_worker();

    let profile = PrintProfile::new("Office Laser")
        .with_calibration(&CalibrationMeasurement::new(99.0, 99.0, 99.0, 99.0));

    worker
        .commands
        .send(CalibrationCommand::SaveProfile {
            profile: profile.clone(),
            path: path.clone(),
        })
        .unwrap();
    worker
        .commands
        .send(CalibrationCommand::LoadProfile { path: path.clone() })
        .unwrap();

    assert!(matches!(
        next_update(&mut worker).await,
        CalibrationUpdate::ProfileSaved { .. }
    ));
    match next_update(&mut worker).await {
        CalibrationUpdate::ProfileLoaded { profile: loaded } => assert_eq!(loaded, profile),
        other => panic!("Expected ProfileLoaded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_profile_is_not_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("printer.json");
    let mut worker = spawn_worker();

    worker
        .commands
        .send(CalibrationCommand::SaveProfile {
            profile: PrintProfile::default(),
            path: path.clone(),
        })
        .unwrap();

    match next_update(&mut worker).await {
        CalibrationUpdate::Error { message } => assert!(message.contains("Printer name")),
        other => panic!("Expected Error, got {:?}", other),
    }
    assert!(!path.exists());
}

#[tokio::test]
async fn test_apply_calibration_reports_errors() {
    let dir = tempdir().unwrap();
    let mut worker = spawn_worker();

    worker
        .commands
        .send(CalibrationCommand::ApplyCalibration {
            input_path: dir.path().join("missing.png"),
            output_path: dir.path().join("out.png"),
            options: CorrectionOptions::default(),
        })
        .unwrap();

    match next_update(&mut worker).await {
        CalibrationUpdate::Error { message } => assert!(message.contains("missing.png")),
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_apply_calibration_writes_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("flyer.png");
    let output = dir.path().join("flyer-print.png");
    save_png(RgbaImage::from_pixel(85, 110, Rgba([0, 0, 0, 255])), &input)
        .await
        .unwrap();

    let mut worker = spawn_worker();
    worker
        .commands
        .send(CalibrationCommand::ApplyCalibration {
            input_path: input,
            output_path: output.clone(),
            options: CorrectionOptions::default().with_page_inches(0.85, 1.1),
        })
        .unwrap();

    match next_update(&mut worker).await {
        CalibrationUpdate::CalibrationApplied { path, plan } => {
            assert_eq!(path, output);
            assert_eq!((plan.final_width, plan.final_height), (306, 396));
        }
        other => panic!("Expected CalibrationApplied, got {:?}", other),
    }
    assert!(output.exists());
}

#[tokio::test]
async fn test_worker_stops_when_senders_dropped() {
    let worker = spawn_worker();
    let WorkerHandle { commands, task, .. } = worker;
    drop(commands);
    task.await.unwrap();
}

#[tokio::test]
async fn test_interleaved_plans_run_after_other_commands() {
    let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = tokio::sync::mpsc::unbounded_channel();

    let plan = |width| CalibrationCommand::PlanCorrection {
        source_width: width,
        source_height: 40,
        options: CorrectionOptions::default(),
    };
    command_tx.send(plan(10)).unwrap();
    command_tx
        .send(CalibrationCommand::CalculateScale { measurement: None })
        .unwrap();
    command_tx.send(plan(20)).unwrap();
    command_tx
        .send(CalibrationCommand::CalculateBorder {
            measurement: None,
            expected_inset_mm: 5.0,
        })
        .unwrap();
    drop(command_tx);

    worker_task(command_rx, update_tx).await;

    let mut updates = Vec::new();
    while let Some(update) = update_rx.recv().await {
        updates.push(update);
    }

    assert_eq!(updates.len(), 3);
    assert!(matches!(updates[0], CalibrationUpdate::ScaleCalculated { .. }));
    assert!(matches!(updates[1], CalibrationUpdate::BorderCalculated { .. }));
    match &updates[2] {
        CalibrationUpdate::CorrectionPlanned { plan } => assert_eq!(plan.source_width, 20),
        other => panic!("Expected CorrectionPlanned, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_plan_reports_error_and_worker_continues() {
    let mut worker = spawn_worker();

    worker
        .commands
        .send(CalibrationCommand::PlanCorrection {
            source_width: 10,
            source_height: 10,
            options: CorrectionOptions {
                border_calibration: Some(BorderMeasurement {
                    left: Some(0.0),
                    right: Some(0.0),
                    ..Default::default()
                }),
                border_inset_mm: 1e12,
                ..Default::default()
            },
        })
        .unwrap();

    match next_update(&mut worker).await {
        CalibrationUpdate::Error { message } => assert!(message.contains("inset")),
        other => panic!("Expected Error, got {:?}", other),
    }

    worker
        .commands
        .send(CalibrationCommand::CalculateScale { measurement: None })
        .unwrap();
    assert!(matches!(
        next_update(&mut worker).await,
        CalibrationUpdate::ScaleCalculated { .. }
    ));
}
