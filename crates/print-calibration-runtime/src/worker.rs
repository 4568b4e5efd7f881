use crate::{CalibrationCommand, CalibrationUpdate};
use print_calibration::{
    CorrectionOptions, PrintProfile, apply_calibration_to_png, calculate_border_compensation,
    calculate_calibration, plan_correction, save_calibration_test_page,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Channels and task of a running worker
pub struct WorkerHandle {
    pub commands: mpsc::UnboundedSender<CalibrationCommand>,
    pub updates: mpsc::UnboundedReceiver<CalibrationUpdate>,
    pub task: JoinHandle<()>,
}

/// Start a worker on the current tokio runtime.
///
/// The worker exits once every command sender has been dropped.
pub fn spawn_worker() -> WorkerHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(worker_task(command_rx, update_tx));

    WorkerHandle {
        commands: command_tx,
        updates: update_rx,
        task,
    }
}

/// Async worker task that processes calibration commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<CalibrationCommand>,
    update_tx: mpsc::UnboundedSender<CalibrationUpdate>,
) {
    while let Some(mut cmd) = command_rx.recv().await {
        if matches!(cmd, CalibrationCommand::PlanCorrection { .. }) {
            let (deferred, latest) = coalesce_plans(cmd, &mut command_rx);
            // Other commands keep their place ahead of the coalesced plan
            for other in deferred {
                handle_command(other, &update_tx).await;
            }
            cmd = latest;
        }
        handle_command(cmd, &update_tx).await;
    }
    log::debug!("Calibration worker stopped: command channel closed");
}

/// Drain queued commands, keeping only the most recent plan request.
///
/// Returns the non-plan commands in arrival order and the plan to run after
/// them.
fn coalesce_plans(
    first: CalibrationCommand,
    command_rx: &mut mpsc::UnboundedReceiver<CalibrationCommand>,
) -> (Vec<CalibrationCommand>, CalibrationCommand) {
    let mut latest = first;
    let mut deferred = Vec::new();

    while let Ok(next_cmd) = command_rx.try_recv() {
        if matches!(next_cmd, CalibrationCommand::PlanCorrection { .. }) {
            log::debug!("Discarding queued correction plan, using newer request");
            latest = next_cmd;
        } else {
            deferred.push(next_cmd);
        }
    }

    (deferred, latest)
}

async fn handle_command(cmd: CalibrationCommand, update_tx: &mpsc::UnboundedSender<CalibrationUpdate>) {
    match cmd {
        CalibrationCommand::GenerateTestPage { output_path } => {
            let update = match save_calibration_test_page(&output_path).await {
                Ok(()) => CalibrationUpdate::TestPageGenerated { path: output_path },
                Err(e) => error_update("Failed to generate test page", e),
            };
            send(update_tx, update);
        }
        CalibrationCommand::LoadProfile { path } => {
            send(update_tx, load_profile(&path).await);
        }
        CalibrationCommand::SaveProfile { profile, path } => {
            let update = match profile.validate() {
                Ok(()) => match profile.save(&path).await {
                    Ok(()) => CalibrationUpdate::ProfileSaved { path },
                    Err(e) => error_update("Failed to save profile", e),
                },
                Err(e) => error_update("Refusing to save invalid profile", e),
            };
            send(update_tx, update);
        }
        CalibrationCommand::CalculateScale { measurement } => {
            let scale = calculate_calibration(measurement.as_ref());
            send(update_tx, CalibrationUpdate::ScaleCalculated { scale });
        }
        CalibrationCommand::CalculateBorder {
            measurement,
            expected_inset_mm,
        } => {
            let compensation = calculate_border_compensation(measurement.as_ref(), expected_inset_mm);
            send(update_tx, CalibrationUpdate::BorderCalculated { compensation });
        }
        CalibrationCommand::PlanCorrection {
            source_width,
            source_height,
            options,
        } => {
            send(update_tx, plan_update(source_width, source_height, &options));
        }
        CalibrationCommand::ApplyCalibration {
            input_path,
            output_path,
            options,
        } => {
            let update = match apply_calibration_to_png(&input_path, &output_path, &options).await {
                Ok(plan) => CalibrationUpdate::CalibrationApplied {
                    path: output_path,
                    plan,
                },
                Err(e) => error_update("Failed to apply calibration", e),
            };
            send(update_tx, update);
        }
    }
}

async fn load_profile(path: &std::path::Path) -> CalibrationUpdate {
    match PrintProfile::load(path).await {
        Ok(profile) => {
            if let Err(e) = profile.validate() {
                log::warn!("Loaded profile {} is invalid: {}", path.display(), e);
            }
            CalibrationUpdate::ProfileLoaded { profile }
        }
        Err(e) => error_update("Failed to load profile", e),
    }
}

fn plan_update(width: u32, height: u32, options: &CorrectionOptions) -> CalibrationUpdate {
    match plan_correction(width, height, options) {
        Ok(plan) => CalibrationUpdate::CorrectionPlanned { plan },
        Err(e) => error_update("Failed to plan correction", e),
    }
}

fn error_update(context: &str, err: impl std::fmt::Display) -> CalibrationUpdate {
    let message = format!("{}: {}", context, err);
    log::error!("{}", message);
    CalibrationUpdate::Error { message }
}

fn send(update_tx: &mpsc::UnboundedSender<CalibrationUpdate>, update: CalibrationUpdate) {
    if update_tx.send(update).is_err() {
        log::debug!("Update receiver dropped; discarding update");
    }
}
