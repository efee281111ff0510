use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;

use facemark_core::detection::domain::confidence_filter::filter_count;
use facemark_core::detection::domain::detection_result::DetectionBatch;
use facemark_core::detection::infrastructure::detector_factory::{
    create_cascade_detector, create_detector, DetectorConfig,
};
use facemark_core::detection::infrastructure::model_resolver::ProgressFn;
use facemark_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use facemark_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use facemark_core::pipeline::analyze_image_use_case::AnalyzeImageUseCase;
use facemark_core::shared::constants::IMAGE_EXTENSIONS;

/// Face detection with per-region landmark confidence scoring.
#[derive(Parser)]
#[command(name = "facemark")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Write the annotated frame (landmarks or boxes drawn) to this path.
    #[arg(long)]
    annotated: Option<PathBuf>,

    /// Also report how many faces exceed this overall confidence (0.0-1.0).
    #[arg(long)]
    threshold: Option<f64>,

    /// Maximum number of faces to track simultaneously.
    #[arg(long, default_value = "10")]
    max_faces: usize,

    /// Minimum face detection confidence (0.0-1.0).
    #[arg(long, default_value = "0.5")]
    min_detection_confidence: f64,

    /// Minimum face tracking confidence (0.0-1.0).
    #[arg(long, default_value = "0.5")]
    min_tracking_confidence: f64,

    /// Skip the landmark model and use the cascade detector directly.
    #[arg(long)]
    basic: bool,
}

#[derive(Serialize)]
struct ConfidenceJson {
    forehead: f64,
    eyes: f64,
    nose: f64,
    chin: f64,
    overall: f64,
}

#[derive(Serialize)]
struct FaceJson {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<ConfidenceJson>,
}

#[derive(Serialize)]
struct ReportJson {
    count: usize,
    faces: Vec<FaceJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matching: Option<usize>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = DetectorConfig {
        max_faces: cli.max_faces,
        min_detection_confidence: cli.min_detection_confidence,
        min_tracking_confidence: cli.min_tracking_confidence,
    };

    // Same callback for every model download this run may need; only
    // terminate the progress line if one actually happened.
    let downloading = Arc::new(AtomicBool::new(false));
    let started = downloading.clone();
    let progress: ProgressFn = Arc::new(move |done, total| {
        started.store(true, Ordering::Relaxed);
        download_progress(done, total);
    });

    let detector = if cli.basic {
        log::info!("cascade detector forced via --basic");
        create_cascade_detector(Some(progress))?
    } else {
        create_detector(&config, Some(progress))?
    };
    if downloading.load(Ordering::Relaxed) {
        eprintln!();
    }

    let mut use_case = AnalyzeImageUseCase::new(
        Box::new(ImageFileReader::new()),
        detector,
        Box::new(ImageFileWriter::new()),
    );

    let result = use_case.execute(&cli.input, cli.annotated.as_deref());
    use_case.release();
    let batch = result?;

    if let Some(path) = &cli.annotated {
        log::info!("annotated frame written to {}", path.display());
    }

    let report = build_report(&batch, cli.threshold);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn build_report(batch: &DetectionBatch, threshold: Option<f64>) -> ReportJson {
    let faces = batch
        .faces()
        .iter()
        .map(|face| FaceJson {
            x: face.bbox.x,
            y: face.bbox.y,
            width: face.bbox.width,
            height: face.bbox.height,
            confidence: face.confidence.map(|c| ConfidenceJson {
                forehead: c.forehead,
                eyes: c.eyes,
                nose: c.nose,
                chin: c.chin,
                overall: c.overall,
            }),
        })
        .collect();

    ReportJson {
        count: batch.count(),
        faces,
        matching: threshold.map(|t| filter_count(batch, t)),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.input) {
        return Err(format!(
            "Unsupported input extension, expected one of: {}",
            IMAGE_EXTENSIONS.join(", ")
        )
        .into());
    }
    if cli.max_faces == 0 {
        return Err("Max faces must be at least 1".into());
    }
    if !(0.0..=1.0).contains(&cli.min_detection_confidence) {
        return Err(format!(
            "Min detection confidence must be between 0.0 and 1.0, got {}",
            cli.min_detection_confidence
        )
        .into());
    }
    if !(0.0..=1.0).contains(&cli.min_tracking_confidence) {
        return Err(format!(
            "Min tracking confidence must be between 0.0 and 1.0, got {}",
            cli.min_tracking_confidence
        )
        .into());
    }
    if let Some(t) = cli.threshold {
        if !(0.0..=1.0).contains(&t) {
            return Err(format!("Threshold must be between 0.0 and 1.0, got {t}").into());
        }
    }
    Ok(())
}

fn is_image(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading detection model... {pct}%");
    } else {
        eprint!("\rDownloading detection model... {downloaded} bytes");
    }
}
