// src/main.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use vitalcam::{BoundingBox, HeartRateMethod, MonitorConfig, VitalHistory, VitalPipeline};
/// Replay recorded face frames through the vital-sign pipeline.
#[derive(Parser, Debug)]
#[command(name = "vitalcam", version, about)]
struct Args {
    /// Directory of PNG/JPEG frames, processed in file-name order
    frames: PathBuf,
    /// Session configuration (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Fixed normalised face box as x,y,width,height
    #[arg(long, value_parser = parse_box, conflicts_with = "boxes")]
    face: Option<BoundingBox>,
    /// JSON array with one face box (or null) per frame
    #[arg(long)]
    boxes: Option<PathBuf>,
    /// Use the spectral heart-rate estimator instead of peak intervals
    #[arg(long)]
    spectral: bool,
}
fn parse_box(s: &str) -> Result<BoundingBox, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, w, h] => Ok(BoundingBox::new(*x, *y, *w, *h)),
        _ => Err(format!("expected 4 comma-separated numbers, got {}", parts.len())),
    }
}
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("cannot read frame directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
                .unwrap_or(false)
        })
        .collect();
    frames.sort();
    Ok(frames)
}
fn load_boxes(args: &Args, frame_count: usize) -> Result<Vec<Option<BoundingBox>>> {
    if let Some(face) = args.face {
        return Ok(vec![Some(face); frame_count]);
    }
    let Some(path) = &args.boxes else {
        bail!("either --face or --boxes is required");
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read boxes file {}", path.display()))?;
    let boxes: Vec<Option<BoundingBox>> =
        serde_json::from_str(&text).context("boxes file must be a JSON array of boxes or null")?;
    if boxes.len() != frame_count {
        warn!(
            "{} boxes for {} frames; missing entries count as no face",
            boxes.len(),
            frame_count
        );
    }
    Ok(boxes)
}
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => MonitorConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MonitorConfig::default(),
    };
    if args.spectral {
        config.heart_rate_method = HeartRateMethod::Spectral;
    }
    config.validate()?;
    let frames = list_frames(&args.frames)?;
    if frames.is_empty() {
        bail!("no frames found in {}", args.frames.display());
    }
    let boxes = load_boxes(&args, frames.len())?;
    info!(
        "replaying {} frames at {} Hz",
        frames.len(),
        config.sampling_rate
    );
    let rate = config.sampling_rate;
    let mut history = VitalHistory::new(config.display_history_length, config.smoothing_window_samples);
    let mut pipeline = VitalPipeline::new(Arc::new(config))?;
    for (i, path) in frames.iter().enumerate() {
        let frame = image::open(path)
            .with_context(|| format!("failed to decode {}", path.display()))?
            .to_rgb8();
        let face = boxes.get(i).copied().flatten();
        let timestamp = Duration::from_secs_f64(i as f64 / rate);
        let vitals = pipeline.process_frame(&frame, face.as_ref(), timestamp)?;
        history.push(vitals);
        println!("{}", serde_json::to_string(&vitals)?);
    }
    let smoothed = history.smoothed();
    let summary = serde_json::json!({
        "smoothed": smoothed,
        "status": smoothed.classify(&pipeline.config().thresholds),
    });
    println!("{summary}");
    Ok(())
}
