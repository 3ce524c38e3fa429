use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

/// Mapping parameters for the radial visualiser. Read once at setup,
/// never mutated during ticks.
#[derive(Debug, Clone, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_max_visual_scale")]
    pub max_visual_scale: f32,
    #[serde(default = "default_visual_modifier")]
    pub visual_modifier: f32,
    #[serde(default = "default_visualiser_smooth_speed")]
    pub visualiser_smooth_speed: f32,
    #[serde(default = "default_background_smooth_speed")]
    pub background_smooth_speed: f32,
    #[serde(default = "default_keep_percentage")]
    pub keep_percentage: f32,
    #[serde(default = "default_amt_visual")]
    pub amt_visual: usize,
    #[serde(default = "default_db_cap")]
    pub db_cap: f32,
    #[serde(default = "default_min_color")]
    pub min_color: [f32; 4],
    #[serde(default = "default_max_color")]
    pub max_color: [f32; 4],
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    #[serde(default = "default_reference_amplitude")]
    pub reference_amplitude: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            max_visual_scale: default_max_visual_scale(),
            visual_modifier: default_visual_modifier(),
            visualiser_smooth_speed: default_visualiser_smooth_speed(),
            background_smooth_speed: default_background_smooth_speed(),
            keep_percentage: default_keep_percentage(),
            amt_visual: default_amt_visual(),
            db_cap: default_db_cap(),
            min_color: default_min_color(),
            max_color: default_max_color(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            frame_size: default_frame_size(),
            reference_amplitude: default_reference_amplitude(),
        }
    }
}

fn default_max_visual_scale() -> f32 { 25.0 }
fn default_visual_modifier() -> f32 { 50.0 }
fn default_visualiser_smooth_speed() -> f32 { 10.0 }
fn default_background_smooth_speed() -> f32 { 0.5 }
fn default_keep_percentage() -> f32 { 0.5 }
fn default_amt_visual() -> usize { 64 }
fn default_db_cap() -> f32 { 40.0 }
fn default_min_color() -> [f32; 4] { [0.0, 0.0, 0.0, 1.0] }
fn default_max_color() -> [f32; 4] { [1.0, 1.0, 1.0, 1.0] }
fn default_frame_size() -> usize { 1024 }
fn default_reference_amplitude() -> f32 { 0.1 }

/// Setup-time rejections. None of these can surface mid-tick: a validated
/// configuration runs the whole pipeline infallibly.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("amt_visual must be a positive integer")]
    AmtVisualZero,
    #[error("keep_percentage must be in (0, 1], got {value}")]
    KeepPercentage { value: f32 },
    #[error("{amt_visual} display elements cannot be cut from {retained} retained spectrum bins (bucket width would be 0)")]
    BucketWidthZero { retained: usize, amt_visual: usize },
    #[error("db_cap must be positive, got {value}")]
    DbCapNonPositive { value: f32 },
    #[error("reference_amplitude must be positive, got {value}")]
    ReferenceAmplitude { value: f32 },
    #[error("frame_size must be a power of two, got {value}")]
    FrameSize { value: usize },
}

impl Config {
    /// Scalar range checks. Bucket geometry is validated separately by
    /// `SpectrumBucketizer::new`, which owns that arithmetic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.visual.amt_visual == 0 {
            return Err(ConfigError::AmtVisualZero);
        }
        if !(self.visual.keep_percentage > 0.0 && self.visual.keep_percentage <= 1.0) {
            return Err(ConfigError::KeepPercentage {
                value: self.visual.keep_percentage,
            });
        }
        if self.visual.db_cap <= 0.0 {
            return Err(ConfigError::DbCapNonPositive {
                value: self.visual.db_cap,
            });
        }
        if self.audio.reference_amplitude <= 0.0 {
            return Err(ConfigError::ReferenceAmplitude {
                value: self.audio.reference_amplitude,
            });
        }
        if !self.audio.frame_size.is_power_of_two() {
            return Err(ConfigError::FrameSize {
                value: self.audio.frame_size,
            });
        }
        Ok(())
    }
}

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
