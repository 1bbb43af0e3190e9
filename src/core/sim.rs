use crate::config::SimConfig;
use crate::core::collision::{reset_locks, resolve_frame, FrameReport};
use crate::core::lattice::Lattice;
use crate::core::particle::{Particle, DIM};
use crate::core::tool::{advance_tool, make_tool, ToolPath, ToolPhase};
use crate::driver::Simulator;
use crate::error::{Error, Result};
use ordered_float::NotNan;

/// Overlaps smaller than this are numerical noise, not contact.
const EPS_OVERLAP: f64 = 1e-9;

/// Build the lattice for `bbox_size` and `particle_radius` and return it with
/// the render-order particle arena: `tool` at index 0, then every lattice
/// cell in ascending (x, y, z) order.
///
/// The tool is not returned separately; read it back as `particles[0]`.
pub fn initialize(bbox_size: u32, particle_radius: f64, tool: Particle) -> Result<(Lattice, Vec<Particle>)> {
    let (lattice, cells) = Lattice::build(f64::from(bbox_size), particle_radius)?;
    let mut particles = Vec::with_capacity(cells.len() + 1);
    particles.push(tool);
    particles.extend(cells);
    Ok((lattice, particles))
}

/// Nano-imprint process: a tool particle pressed into and withdrawn from a
/// particle slab.
///
/// Each frame resets the per-frame locks, moves the tool one timestep along
/// its stroke, and then relaxes the slab once (tool contacts first, then
/// static neighbours). A frame that fails halts the run.
#[derive(Debug)]
pub struct NanoImprint {
    lattice: Lattice,
    particles: Vec<Particle>,
    timestep: f64,
    path: ToolPath,
    phase: ToolPhase,
    frame: u64,
    halted: bool,
}

impl NanoImprint {
    /// Create a simulation from a validated configuration.
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let tc = &config.tool;
        let tool = make_tool(tc.position, tc.velocity, tc.mass)?;
        let (lattice, particles) = initialize(
            config.simulator.bbox_size,
            config.simulator.particle_radius,
            tool,
        )?;
        let phase = ToolPhase::of(&particles[0]);
        Ok(Self {
            lattice,
            particles,
            timestep: config.simulator.timestep,
            path: tc.path(),
            phase,
            frame: 0,
            halted: false,
        })
    }

    /// Run one frame and report what the relaxation did.
    ///
    /// Errors:
    /// - `Error::DegenerateContact` if two centres coincide; the run is halted.
    /// - `Error::Halted` on every call after a failed frame.
    pub fn step(&mut self) -> Result<FrameReport> {
        if self.halted {
            return Err(Error::Halted);
        }
        match self.try_step() {
            Ok(report) => Ok(report),
            Err(e) => {
                self.halted = true;
                log::error!("frame {} failed, halting run: {}", self.frame, e);
                Err(e)
            }
        }
    }

    fn try_step(&mut self) -> Result<FrameReport> {
        reset_locks(&mut self.particles);
        let (tool, cells) = self
            .particles
            .split_first_mut()
            .ok_or_else(|| Error::Configuration("no particles to simulate".into()))?;

        let phase = advance_tool(tool, self.timestep, &self.path);
        if phase != self.phase {
            log::info!(
                "frame {}: tool {:?} -> {:?} at z = {:.3}",
                self.frame,
                self.phase,
                phase,
                tool.r[2]
            );
            self.phase = phase;
        }

        let report = resolve_frame(&self.lattice, tool, cells)?;
        log::debug!(
            "frame {}: tool visited {} cells, moved {}; {} neighbour corrections",
            self.frame,
            report.tool_cells,
            report.tool_corrections,
            report.neighbour_corrections
        );
        self.frame += 1;
        Ok(report)
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn tool_phase(&self) -> ToolPhase {
        self.phase
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// All particles in render order; the tool is element 0.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn tool(&self) -> &Particle {
        &self.particles[0]
    }

    /// Lattice particles only, in arena order.
    pub fn cells(&self) -> &[Particle] {
        &self.particles[1..]
    }

    /// Positions in render order.
    pub fn positions(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    // ============ Diagnostics ============

    /// Largest distance any lattice particle has moved from its reference position.
    pub fn max_displacement(&self) -> f64 {
        self.cells()
            .iter()
            .filter_map(|p| NotNan::new(norm(&p.displacement())).ok())
            .max()
            .map_or(0.0, NotNan::into_inner)
    }

    /// Mean distance of lattice particles from their reference positions.
    pub fn mean_displacement(&self) -> f64 {
        let cells = self.cells();
        if cells.is_empty() {
            return 0.0;
        }
        let total: f64 = cells.iter().map(|p| norm(&p.displacement())).sum();
        total / cells.len() as f64
    }

    /// Deepest remaining overlap between statically connected particles
    /// (0 if none overlap).
    pub fn max_neighbour_overlap(&self) -> f64 {
        let cells = self.cells();
        let mut deepest = 0.0_f64;
        for (i, p) in cells.iter().enumerate() {
            for &n in p.neighbours() {
                let j = self.lattice.flat_index(n);
                if j <= i {
                    continue;
                }
                let overlap = p.radius + cells[j].radius - p.distance_to(&cells[j]);
                deepest = deepest.max(overlap);
            }
        }
        deepest
    }

    /// Lattice particles still overlapping the tool.
    pub fn tool_overlap_count(&self) -> usize {
        let tool = self.tool();
        self.cells()
            .iter()
            .filter(|p| p.distance_to(tool) < p.radius + tool.radius - EPS_OVERLAP)
            .count()
    }
}

impl Simulator for NanoImprint {
    fn advance_one_frame(&mut self) -> Result<()> {
        self.step().map(|_| ())
    }

    fn particle_view(&self) -> &[Particle] {
        self.particles()
    }
}

#[inline]
fn norm(a: &[f64; DIM]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}
