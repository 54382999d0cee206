//! JSON configuration of a training run.
//!
//! ```json
//! {
//!   "positives": "data/pos",
//!   "negatives": "data/bg",
//!   "output": "out/cascade",
//!   "scan": { "step_factor": 0.5 },
//!   "training": { "numPos": 1000, "numNeg": 2000, "numStages": 12 }
//! }
//! ```
//!
//! Omitted blocks and fields fall back to their defaults.

use crate::image::io::load_image_pool;
use crate::registry::WindowSize;
use crate::training::TrainingParams;
use crate::window_source::{ScanOptions, WindowSource};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct TrainingConfig {
    /// Directory of window-sized positive images.
    pub positives: PathBuf,
    /// Directory of background images.
    pub negatives: PathBuf,
    /// Directory receiving `cascade.json`.
    pub output: PathBuf,
    #[serde(default)]
    pub scan: ScanOptions,
    #[serde(default)]
    pub training: TrainingParams,
}

impl TrainingConfig {
    /// Load both image pools and wrap them in a [`WindowSource`].
    pub fn load_window_source(&self, window: WindowSize) -> Result<WindowSource, String> {
        let positives = load_image_pool(&self.positives)?;
        let negatives = load_image_pool(&self.negatives)?;
        log::info!(
            "loaded {} positives and {} backgrounds",
            positives.len(),
            negatives.len()
        );
        WindowSource::new(positives, negatives, window, self.scan).map_err(|e| e.to_string())
    }
}

pub fn load_config(path: &Path) -> Result<TrainingConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Invalid config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<TrainingConfig, String> {
    let config: TrainingConfig = serde_json::from_str(data).map_err(|e| e.to_string())?;
    config.training.validate()?;
    Ok(config)
}
