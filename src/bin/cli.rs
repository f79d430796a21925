//! CLI for facial proportion analysis.
//!
//! Usage:
//!   golden-face <image> --landmarks face.json                 # Human-readable output
//!   golden-face <image> --landmarks face.json.bz2 --json      # JSON output
//!   golden-face <image> --landmarks face.json --overlay out.png --attributes attrs.json

use std::path::PathBuf;

use clap::Parser;
use golden_face::{
    AnalyzerConfig, Analysis, FaceAnalyzer, FileAttributeModel, FileLandmarkDetector,
    UnavailableAttributeModel,
};
use log::info;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "golden-face")]
#[command(author, version, about = "Facial proportion analysis from face mesh landmarks", long_about = None)]
struct Args {
    /// Input image file
    #[arg(required = true)]
    image: PathBuf,

    /// Face mesh landmark dump (.json or .json.bz2)
    #[arg(long)]
    landmarks: PathBuf,

    /// Age/gender estimator result dump (.json)
    #[arg(long)]
    attributes: Option<PathBuf>,

    /// Analyzer config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the annotated image here
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output structure for JSON serialization
#[derive(Serialize)]
struct Output {
    image: String,
    width: u32,
    height: u32,
    face_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<golden_face::ReportSummary>,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            AnalyzerConfig::load(path)?
        }
        None => AnalyzerConfig::default(),
    };

    let detector = FileLandmarkDetector::open(&args.landmarks, &config.detector)?;
    let analyzer = match &args.attributes {
        Some(path) => FaceAnalyzer::from_config(&config, detector, FileAttributeModel::open(path)?)?,
        None => FaceAnalyzer::from_config(&config, detector, UnavailableAttributeModel)?,
    };

    info!("Loading image {:?}", args.image);
    let image = image::open(&args.image)?.to_rgb8();
    let (width, height) = image.dimensions();

    let analysis = analyzer.analyze(&image);

    if let (Analysis::Face(report), Some(path)) = (&analysis, &args.overlay) {
        report.overlay.save(path)?;
        info!("Overlay written to {:?}", path);
    }

    let output = Output {
        image: args.image.display().to_string(),
        width,
        height,
        face_detected: analysis.report().is_some(),
        report: analysis.report().map(|r| r.summary()),
    };

    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else {
        format_human_readable(&output)
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        info!("Output written to {:?}", path);
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn format_human_readable(output: &Output) -> String {
    let mut s = String::new();

    s.push_str(&format!("Image: {} ({}x{})\n", output.image, output.width, output.height));

    match &output.report {
        Some(report) => {
            s.push('\n');
            s.push_str(&report.to_text());
        }
        None => s.push_str("\nNo face detected! Please use a clearer image.\n"),
    }

    s
}
