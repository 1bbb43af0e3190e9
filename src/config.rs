//! Run configuration loaded from YAML.
//!
//! ```yaml
//! simulator:
//!   timestep: 0.1           # > 0
//!   bbox_size: 12           # edge of the cubic box, > 2
//!   particle_radius: 0.1    # lattice particle radius, > 0
//!
//! video:
//!   framerate: 30           # frames per second for a renderer
//!   total_frames: 520       # frames the driver runs
//!
//! tool:                     # optional; defaults shown
//!   position: [1.0, 4.0, 4.0]
//!   velocity: [0.1, 0.0, -0.1]
//!   mass: 1.0               # radius = cbrt(mass)
//!   bottom: 1.5             # imprint depth
//!   top: 4.0                # parking height
//! ```
//!
//! The configuration is an explicit value handed to the simulation; there is
//! no process-wide state.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::core::particle::DIM;
use crate::core::tool::ToolPath;
use crate::error::{Error, Result};

/// Physical and numerical parameters of the simulation.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub timestep: f64,  // time advanced per frame
    pub bbox_size: u32, // box edge length
    #[serde(default = "default_particle_radius")]
    pub particle_radius: f64, // lattice particle radius
}

/// Playback parameters consumed by the frame driver and a renderer.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VideoConfig {
    #[serde(default = "default_framerate")]
    pub framerate: u32,
    #[serde(default = "default_total_frames")]
    pub total_frames: u32,
}

/// Initial state and stroke of the tool.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ToolConfig {
    pub position: [f64; DIM],
    pub velocity: [f64; DIM],
    pub mass: f64,
    pub bottom: f64,
    pub top: f64,
}

/// Top-level configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub tool: ToolConfig,
}

fn default_particle_radius() -> f64 {
    0.1
}

fn default_framerate() -> u32 {
    30
}

fn default_total_frames() -> u32 {
    520
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            timestep: 0.1,
            bbox_size: 12,
            particle_radius: default_particle_radius(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            framerate: default_framerate(),
            total_frames: default_total_frames(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        let path = ToolPath::default();
        Self {
            position: [1.0, 4.0, 4.0],
            velocity: [0.1, 0.0, -0.1],
            mass: 1.0,
            bottom: path.bottom,
            top: path.top,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            video: VideoConfig::default(),
            tool: ToolConfig::default(),
        }
    }
}

impl ToolConfig {
    pub fn path(&self) -> ToolPath {
        ToolPath {
            bottom: self.bottom,
            top: self.top,
        }
    }
}

impl SimConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: SimConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let cfg: SimConfig = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject parameters that would produce a degenerate run.
    ///
    /// Lattice emptiness is checked when the lattice is built.
    pub fn validate(&self) -> Result<()> {
        let s = &self.simulator;
        if !s.timestep.is_finite() || s.timestep <= 0.0 {
            return Err(Error::Configuration("timestep must be finite and > 0".into()));
        }
        if s.bbox_size <= 2 {
            return Err(Error::Configuration("bbox_size must be > 2".into()));
        }
        if !s.particle_radius.is_finite() || s.particle_radius <= 0.0 {
            return Err(Error::Configuration(
                "particle_radius must be finite and > 0".into(),
            ));
        }
        if self.video.framerate == 0 {
            return Err(Error::Configuration("framerate must be > 0".into()));
        }
        self.tool.path().validate()
    }
}
