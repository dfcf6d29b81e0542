//! cubeface CLI: print the color grid of a target face photo.

use clap::{Parser, ValueEnum};
use cubeface::color::CellSample;
use cubeface::core::{CornerId, PixelRect};
use cubeface::{load_color_image, to_rgb_image, ColorGrid, Pipeline, PipelineParams};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "cubeface")]
#[command(about = "Read the 4x4 color grid of a fiducial-marked target face")]
#[command(version)]
struct Cli {
    /// Path to the input image.
    image: PathBuf,

    /// JSON file with pipeline parameters; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON report instead of the plain grid.
    #[arg(long)]
    json: bool,

    /// Write the rectified, cropped image to this path.
    #[arg(long)]
    save_rectified: Option<PathBuf>,

    /// Log verbosity on stderr.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Serialize)]
struct Fiducial {
    corner: CornerId,
    image_xy: [f64; 2],
    target_xy: [f64; 2],
}

#[derive(Serialize)]
struct Report<'a> {
    image: &'a Path,
    grid: ColorGrid,
    cells: &'a [CellSample],
    fiducials: Vec<Fiducial>,
    homography: [[f64; 3]; 3],
    crop: PixelRect,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(_level: LogLevel) {
    // verbosity comes from RUST_LOG
    cubeface::core::init_tracing(false);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LogLevel) {
    if let Err(err) = cubeface::core::init_with_level(level.into()) {
        eprintln!("warning: logger already installed: {err}");
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let params = match &cli.config {
        Some(path) => load_params(path)?,
        None => PipelineParams::default(),
    };

    let image = load_color_image(&cli.image)?;
    log::info!(
        "loaded {} ({}x{})",
        cli.image.display(),
        image.width,
        image.height
    );

    let out = Pipeline::new(params).run(&image)?;

    if let Some(path) = &cli.save_rectified {
        to_rgb_image(&out.rectified.image).save(path)?;
        log::info!("rectified image written to {}", path.display());
    }

    if cli.json {
        let fiducials = CornerId::ALL
            .iter()
            .map(|&corner| {
                let c = out.correspondences.get(corner);
                Fiducial {
                    corner,
                    image_xy: [c.src.x, c.src.y],
                    target_xy: [c.dst.x, c.dst.y],
                }
            })
            .collect();
        let report = Report {
            image: &cli.image,
            grid: out.grid(),
            cells: &out.sample.cells,
            fiducials,
            homography: out.rectified.h_canvas_from_img.to_array(),
            crop: out.rectified.crop,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", out.grid());
    }
    Ok(())
}

fn load_params(path: &Path) -> CliResult<PipelineParams> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
    let params = serde_json::from_str(&text)
        .map_err(|e| format!("invalid config {}: {e}", path.display()))?;
    Ok(params)
}
