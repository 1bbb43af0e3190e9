use crate::core::particle::{Colour, Particle, DIM};
use crate::error::{Error, Result};

const X: usize = 0;
const Z: usize = 2;

/// Turning points of the tool's V-shaped stroke along z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolPath {
    /// Maximum imprint depth: the tool turns around at or below this height.
    pub bottom: f64,
    /// Retraction height: above it the tool parks.
    pub top: f64,
}

impl Default for ToolPath {
    fn default() -> Self {
        Self {
            bottom: 1.5,
            top: 4.0,
        }
    }
}

impl ToolPath {
    pub fn validate(&self) -> Result<()> {
        if !self.bottom.is_finite() || !self.top.is_finite() {
            return Err(Error::Configuration("tool path heights must be finite".into()));
        }
        if self.bottom >= self.top {
            return Err(Error::Configuration(
                "tool bottom must lie below tool top".into(),
            ));
        }
        Ok(())
    }
}

/// Stage of the stroke, derived from the tool's vertical velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolPhase {
    Descending,
    Ascending,
    Parked,
}

impl ToolPhase {
    pub fn of(tool: &Particle) -> Self {
        if tool.v[Z] < 0.0 {
            ToolPhase::Descending
        } else if tool.v[Z] > 0.0 {
            ToolPhase::Ascending
        } else {
            ToolPhase::Parked
        }
    }
}

/// Create the tool particle. Its radius follows from constant density:
/// `radius = cbrt(mass)`.
pub fn make_tool(position: [f64; DIM], velocity: [f64; DIM], mass: f64) -> Result<Particle> {
    Particle::new(position, velocity, mass.cbrt(), mass, Colour::Black)
}

/// Move the tool one step of `dt` along its stroke and return the phase it
/// is in afterwards.
///
/// The tool descends until `z <= bottom`, reverses, and parks (zero
/// velocity) once it rises above `top`. A parked tool stays put.
pub fn advance_tool(tool: &mut Particle, dt: f64, path: &ToolPath) -> ToolPhase {
    if tool.r[Z] <= path.bottom && tool.v[Z] < 0.0 {
        tool.v[Z] = -tool.v[Z];
    }
    if tool.r[Z] > path.top {
        tool.v[X] = 0.0;
        tool.v[Z] = 0.0;
    }
    tool.r[Z] += tool.v[Z] * dt;
    tool.r[X] += tool.v[X] * dt;
    ToolPhase::of(tool)
}
