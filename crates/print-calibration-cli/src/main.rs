mod logger;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use print_calibration::constants::BORDER_INSET_MM;
use print_calibration::{
    BorderCompensation, BorderMeasurement, CalibrationMeasurement, CorrectionOptions,
    CorrectionPlan, PrintProfile, ScaleFactor, ScaleSource,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pcal", about = "Printer calibration CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the calibration test page (US Letter landscape, 360 DPI PNG)
    TestPage {
        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Compute scale factors from measured dot distances
    Scale {
        #[command(flatten)]
        measurement: MeasurementArgs,
    },

    /// Compute border padding from measured border gaps
    Border {
        #[command(flatten)]
        border: BorderArgs,

        /// Expected gap between paper edge and border in mm
        #[arg(long, default_value_t = BORDER_INSET_MM)]
        inset: f64,
    },

    /// Apply calibration to an image
    Correct {
        /// Input image (PNG)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long, required_unless_present = "plan_only")]
        output: Option<PathBuf>,

        /// Saved print profile (JSON) supplying calibration and page size
        #[arg(long)]
        profile: Option<PathBuf>,

        #[command(flatten)]
        measurement: MeasurementArgs,

        /// Precomputed horizontal scale factor
        #[arg(long, requires = "scale_y", conflicts_with_all = ["ab", "bc", "cd", "da"])]
        scale_x: Option<f64>,

        /// Precomputed vertical scale factor
        #[arg(long, requires = "scale_x")]
        scale_y: Option<f64>,

        #[command(flatten)]
        border: BorderArgs,

        /// Output paper size
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Output orientation (with --paper)
        #[arg(long, default_value = "landscape", value_enum)]
        orientation: OrientationArg,

        /// Page width in inches (overrides --paper and the profile)
        #[arg(long, requires = "page_height_in")]
        page_width_in: Option<f64>,

        /// Page height in inches
        #[arg(long, requires = "page_width_in")]
        page_height_in: Option<f64>,

        /// Show the correction plan only, don't write an image
        #[arg(long)]
        plan_only: bool,
    },

    /// Validate and summarise a saved print profile
    Profile {
        /// Profile JSON file
        path: PathBuf,
    },
}

/// Distances between the test-page dots, in mm
#[derive(Args)]
struct MeasurementArgs {
    /// Distance A-B (top edge)
    #[arg(long)]
    ab: Option<f64>,
    /// Distance B-C (right edge)
    #[arg(long)]
    bc: Option<f64>,
    /// Distance C-D (bottom edge)
    #[arg(long)]
    cd: Option<f64>,
    /// Distance D-A (left edge)
    #[arg(long)]
    da: Option<f64>,
}

impl MeasurementArgs {
    fn is_empty(&self) -> bool {
        self.ab.is_none() && self.bc.is_none() && self.cd.is_none() && self.da.is_none()
    }

    fn to_measurement(&self) -> CalibrationMeasurement {
        CalibrationMeasurement {
            ab: self.ab,
            bc: self.bc,
            cd: self.cd,
            da: self.da,
        }
    }
}

/// Gaps between each paper edge and the printed border, in mm
#[derive(Args)]
struct BorderArgs {
    #[arg(long = "border-top")]
    top: Option<f64>,
    #[arg(long = "border-right")]
    right: Option<f64>,
    #[arg(long = "border-bottom")]
    bottom: Option<f64>,
    #[arg(long = "border-left")]
    left: Option<f64>,
}

impl BorderArgs {
    fn to_measurement(&self) -> BorderMeasurement {
        BorderMeasurement {
            top: self.top,
            right: self.right,
            bottom: self.bottom,
            left: self.left,
        }
    }

    /// Apply the sides given on the command line over `base`
    fn merge_into(&self, base: Option<BorderMeasurement>) -> Option<BorderMeasurement> {
        let base = base.unwrap_or_default();
        let merged = BorderMeasurement {
            top: self.top.or(base.top),
            right: self.right.or(base.right),
            bottom: self.bottom.or(base.bottom),
            left: self.left.or(base.left),
        };
        (!merged.is_empty()).then_some(merged)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for print_calibration::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for print_calibration::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::CliLogger::new(logger::level_from_flags(cli.verbose, cli.quiet)).init()?;

    match cli.command {
        Commands::TestPage { output } => {
            print_calibration::save_calibration_test_page(&output).await?;
            println!("Calibration test page → {}", output.display());
            println!("Print it at 100% scale, then measure A-B, B-C, C-D, D-A and the border gaps.");
        }

        Commands::Scale { measurement } => {
            let measurement = measurement.to_measurement();
            if !measurement.is_complete() {
                log::warn!("All four distances (--ab --bc --cd --da) are needed to calibrate");
            }
            let scale = print_calibration::calculate_calibration(Some(&measurement));
            print_scale(&scale);
        }

        Commands::Border { border, inset } => {
            let measurement = border.to_measurement();
            let compensation =
                print_calibration::calculate_border_compensation(Some(&measurement), inset);
            print_border(&compensation);
        }

        Commands::Correct {
            input,
            output,
            profile,
            measurement,
            scale_x,
            scale_y,
            border,
            paper,
            orientation,
            page_width_in,
            page_height_in,
            plan_only,
        } => {
            let mut options = match &profile {
                Some(path) => {
                    let profile = PrintProfile::load(path)
                        .await
                        .with_context(|| format!("loading profile {}", path.display()))?;
                    if let Err(e) = profile.validate() {
                        log::warn!("Profile {}: {}", path.display(), e);
                    }
                    CorrectionOptions::from_profile(&profile)
                }
                None => CorrectionOptions::default(),
            };

            // Command-line values take precedence over the profile
            if let (Some(scale_x), Some(scale_y)) = (scale_x, scale_y) {
                options.calibration = Some(ScaleSource::Factors { scale_x, scale_y });
            } else if !measurement.is_empty() {
                let measurement = measurement.to_measurement();
                if !measurement.is_complete() {
                    log::warn!("Incomplete measurement given; scale calibration is disabled");
                }
                options.calibration = Some(ScaleSource::Measurement(measurement));
            }

            options.border_calibration = border.merge_into(options.border_calibration);

            if let (Some(w), Some(h)) = (page_width_in, page_height_in) {
                options = options.with_page_inches(w, h);
            } else if let Some(paper) = paper {
                let size: print_calibration::PaperSize = paper.into();
                let (w, h) = size.dimensions_inches(orientation.into());
                options = options.with_page_inches(w, h);
            }

            if plan_only {
                let (width, height) = print_calibration::image_dimensions(&input).await?;
                let plan = print_calibration::plan_correction(width, height, &options)?;
                print_plan(&plan);
                return Ok(());
            }

            let Some(output) = output else {
                anyhow::bail!("--output is required unless --plan-only is given");
            };
            let plan = print_calibration::apply_calibration_to_png(&input, &output, &options).await?;
            print_plan(&plan);
            println!("Calibrated → {}", output.display());
        }

        Commands::Profile { path } => {
            let profile = PrintProfile::load(&path)
                .await
                .with_context(|| format!("loading profile {}", path.display()))?;

            println!("Print Profile: {}", path.display());
            println!("  Printer: {}", profile.printer_name);
            println!("  Paper: {:?} ({:?})", profile.paper_size, profile.orientation);
            let (w, h) = profile.page_size_inches();
            println!("  Page: {:.2} × {:.2} in", w, h);
            println!("  Copies: {}", profile.copies);

            print_scale(&profile.scale_factor());
            let compensation = print_calibration::calculate_border_compensation(
                Some(&profile.border_measurement()),
                BORDER_INSET_MM,
            );
            print_border(&compensation);

            match profile.validate() {
                Ok(()) => println!("Profile is valid"),
                Err(e) => anyhow::bail!("Profile is invalid: {}", e),
            }
        }
    }

    Ok(())
}

fn print_scale(scale: &ScaleFactor) {
    println!("Scale Calibration:");
    println!("  Calibrated: {}", if scale.is_calibrated { "yes" } else { "no" });
    println!("  Scale X: {:.5}", scale.scale_x);
    println!("  Scale Y: {:.5}", scale.scale_y);
    println!("  Average: {:.5}", scale.avg_scale);
}

fn print_border(compensation: &BorderCompensation) {
    println!("Border Padding (px @ 360 DPI):");
    println!("  Top: {}", compensation.top_px);
    println!("  Right: {}", compensation.right_px);
    println!("  Bottom: {}", compensation.bottom_px);
    println!("  Left: {}", compensation.left_px);
}

fn print_plan(plan: &CorrectionPlan) {
    println!("Correction Plan:");
    println!("  Source: {} × {} px", plan.source_width, plan.source_height);
    println!("  Page: {} × {} px", plan.target_width, plan.target_height);
    println!("  Fit scale: {:.5}", plan.fit_scale);
    println!("  Calibration: {:.5} × {:.5}", plan.scale_x, plan.scale_y);
    println!("  Resized: {} × {} px", plan.final_width, plan.final_height);
    println!(
        "  Padding: top {} right {} bottom {} left {}",
        plan.padding.top_px, plan.padding.right_px, plan.padding.bottom_px, plan.padding.left_px
    );
    println!("  Output: {} × {} px", plan.output_width(), plan.output_height());
}
