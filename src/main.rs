//! Spectrometer CLI
//!
//! Runs still images through the spectrometer pipeline and writes the results.

use clap::{Parser, Subcommand};
use spectrometer_cv::config::Settings;
use spectrometer_cv::export::SpectrumExporter;
use spectrometer_cv::processor::FrameProcessor;
use spectrometer_cv::Frame;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "spectrometer-cv")]
#[command(version, about = "Camera spectrometer image pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a captured frame
    Analyze {
        /// Input image
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,

        /// Settings file (.json or .xml); defaults to the user config directory
        #[arg(short, long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Draw the reference line markers on the crop
        #[arg(long)]
        calibrating: bool,

        /// Wavelength of the lower reference line in nm
        #[arg(long, value_name = "NM")]
        lower_nm: Option<f32>,

        /// Wavelength of the upper reference line in nm
        #[arg(long, value_name = "NM")]
        upper_nm: Option<f32>,
    },

    /// Show the effective settings, or write defaults to a file
    Settings {
        /// Write default settings to this path
        #[arg(long, value_name = "FILE")]
        init: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            out,
            settings,
            calibrating,
            lower_nm,
            upper_nm,
        } => analyze(&input, &out, settings.as_deref(), calibrating, lower_nm, upper_nm),
        Commands::Settings { init } => show_settings(init.as_deref()),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, String> {
    match path {
        Some(path) => Settings::load_from_file(path).map_err(|e| format!("{}: {}", path.display(), e)),
        None => Ok(Settings::load()),
    }
}

fn analyze(
    input: &Path,
    out: &Path,
    settings_path: Option<&Path>,
    calibrating: bool,
    lower_nm: Option<f32>,
    upper_nm: Option<f32>,
) -> Result<(), String> {
    let mut settings = load_settings(settings_path)?;
    if let Some(nm) = lower_nm {
        settings.lower_nm = nm;
    }
    if let Some(nm) = upper_nm {
        settings.upper_nm = nm;
    }

    let image = image::open(input).map_err(|e| format!("Failed to open {}: {}", input.display(), e))?;
    let frame = Frame::from_dynamic(&image).map_err(|e| e.to_string())?;
    log::info!("Loaded {} ({}x{})", input.display(), frame.width(), frame.height());

    let mut processor = FrameProcessor::new(settings);
    processor.calibrating = calibrating;
    let processed = processor.process(frame).map_err(|e| e.to_string())?;
    let analysis = processed
        .analysis
        .as_ref()
        .ok_or_else(|| "First frame was not analysed".to_string())?;

    std::fs::create_dir_all(out).map_err(|e| e.to_string())?;
    let io = |e: std::io::Error| e.to_string();
    SpectrumExporter::export_frame_png(&processed.display, &out.join("display.png")).map_err(io)?;
    SpectrumExporter::export_frame_png(&analysis.crop, &out.join("crop.png")).map_err(io)?;
    SpectrumExporter::export_spectrum_json(
        &analysis.profile,
        &analysis.spectrum,
        analysis.spectral_extent,
        &out.join("spectrum.json"),
    )
    .map_err(io)?;
    SpectrumExporter::export_histogram_json(&analysis.histogram, &out.join("histogram.json")).map_err(io)?;

    match analysis.spectral_extent {
        Some((left, right)) => log::info!(
            "Spectrum of {} columns, {:.1}-{:.1} nm, written to {}",
            analysis.profile.len(),
            left,
            right,
            out.display()
        ),
        None => log::info!(
            "Uncalibrated profile of {} columns written to {}",
            analysis.profile.len(),
            out.display()
        ),
    }
    Ok(())
}

fn show_settings(init: Option<&Path>) -> Result<(), String> {
    if let Some(path) = init {
        Settings::default().save_to_file(path).map_err(|e| e.to_string())?;
        log::info!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let settings = Settings::load();
    let json = serde_json::to_string_pretty(&settings).map_err(|e| e.to_string())?;
    println!("{}", json);
    if let Some(path) = Settings::default_path() {
        log::info!("Settings path: {}", path.display());
    }
    Ok(())
}
