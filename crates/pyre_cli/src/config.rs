//! Render settings: defaults, JSON config files and command-line overrides.
//!
//! Precedence is defaults < `--config` file < explicit flags.

use crate::Args;
use anyhow::{Context, Result};
use clap::ValueEnum;
use pyre_math::Vec3;
use pyre_renderer::{CameraSettings, RenderConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which built-in scene to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Hundreds of small random spheres around three large ones
    Random,
    /// Ground and the three large spheres only
    Showcase,
}

/// Camera placement and lens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub look_from: [f32; 3],
    pub look_at: [f32; 3],
    pub vup: [f32; 3],
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub aperture: f32,
    /// Defaults to the distance between `look_from` and `look_at`
    pub focus_dist: Option<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            look_from: [10.0, 2.0, 2.5],
            look_at: [-1.5, 0.0, -1.1],
            vup: [0.0, 1.0, 0.0],
            vfov: 24.0,
            aperture: 0.0,
            focus_dist: None,
        }
    }
}

/// Everything needed to produce one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub samples: u32,
    pub threads: usize,
    pub seed: u64,
    pub scene: SceneKind,
    pub camera: CameraConfig,
    pub output: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let render = RenderConfig::default();
        Self {
            width: render.width,
            height: render.height,
            samples: render.samples_per_pixel,
            threads: render.threads,
            seed: render.seed,
            scene: SceneKind::Random,
            camera: CameraConfig::default(),
            output: PathBuf::from("output.ppm"),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolve the settings for a command line: defaults, then the config
    /// file if one was given, then explicit flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        settings.apply(args);
        Ok(settings)
    }

    /// Override fields with any flags present on the command line.
    pub fn apply(&mut self, args: &Args) {
        if let Some(width) = args.width {
            self.width = width;
        }
        if let Some(height) = args.height {
            self.height = height;
        }
        if let Some(samples) = args.samples {
            self.samples = samples;
        }
        if let Some(threads) = args.threads {
            self.threads = threads;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(scene) = args.scene {
            self.scene = scene;
        }
        if let Some(look_from) = args.look_from {
            self.camera.look_from = look_from;
        }
        if let Some(look_at) = args.look_at {
            self.camera.look_at = look_at;
        }
        if let Some(vup) = args.vup {
            self.camera.vup = vup;
        }
        if let Some(vfov) = args.vfov {
            self.camera.vfov = vfov;
        }
        if let Some(aperture) = args.aperture {
            self.camera.aperture = aperture;
        }
        if let Some(focus_dist) = args.focus_dist {
            self.camera.focus_dist = Some(focus_dist);
        }
        if let Some(output) = &args.output {
            self.output = output.clone();
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            samples_per_pixel: self.samples,
            threads: self.threads,
            seed: self.seed,
        }
    }

    pub fn camera_settings(&self) -> CameraSettings {
        let look_from = Vec3::from_array(self.camera.look_from);
        let look_at = Vec3::from_array(self.camera.look_at);
        let focus_dist = self
            .camera
            .focus_dist
            .unwrap_or_else(|| (look_from - look_at).length());

        CameraSettings::new()
            .with_position(look_from, look_at, Vec3::from_array(self.camera.vup))
            .with_lens(self.camera.vfov, self.camera.aperture, focus_dist)
            .with_aspect(self.width as f32 / self.height as f32)
    }
}

/// Parse a comma-separated `x,y,z` triple.
pub fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{s}'"));
    }

    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("invalid component '{part}': {e}"))?;
    }
    Ok(out)
}
