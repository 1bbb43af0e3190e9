use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray1, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::SimConfig;
use crate::core::particle::{Particle, DIM};
use crate::core::NanoImprint as Core;

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_array(particles: &[Particle], f: impl Fn(&Particle) -> [f64; DIM]) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((particles.len(), DIM));
    for (i, p) in particles.iter().enumerate() {
        for (k, v) in f(p).into_iter().enumerate() {
            arr[[i, k]] = v;
        }
    }
    arr
}

/// Python-facing wrapper for a renderer (e.g. a matplotlib animation).
///
/// Row 0 of every array is the tool; the rest is the lattice in render order.
#[pyclass]
pub struct NanoImprint {
    sim: Core,
}

#[pymethods]
impl NanoImprint {
    /// Build the lattice and the tool.
    ///
    /// Parameters
    /// - bbox_size: edge of the cubic box (int, > 2)
    /// - particle_radius: lattice particle radius (float, > 0)
    /// - timestep: time advanced per frame (float, > 0)
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (bbox_size, particle_radius=0.1, timestep=0.1))]
    fn new(bbox_size: u32, particle_radius: f64, timestep: f64) -> PyResult<Self> {
        let mut cfg = SimConfig::default();
        cfg.simulator.bbox_size = bbox_size;
        cfg.simulator.particle_radius = particle_radius;
        cfg.simulator.timestep = timestep;
        let sim = Core::new(&cfg).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Advance one frame (releases the GIL during computation).
    fn advance_one_frame(&mut self, py: Python<'_>) -> PyResult<()> {
        py.detach(|| self.sim.step().map(|_| ())).map_err(py_err)
    }

    /// Advance `frames` frames.
    fn advance(&mut self, py: Python<'_>, frames: u32) -> PyResult<()> {
        py.detach(|| {
            for _ in 0..frames {
                self.sim.step()?;
            }
            Ok::<(), crate::error::Error>(())
        })
        .map_err(py_err)
    }

    /// Positions as a NumPy array of shape (N, 3), dtype=float64.
    fn get_positions(&self, py: Python<'_>) -> Py<PyArray2<f64>> {
        to_array(self.sim.particles(), |p| p.r).into_pyarray(py).unbind()
    }

    /// Displacements from the initial positions, shape (N, 3).
    fn get_displacements(&self, py: Python<'_>) -> Py<PyArray2<f64>> {
        to_array(self.sim.particles(), Particle::displacement)
            .into_pyarray(py)
            .unbind()
    }

    /// Radii, shape (N,).
    fn get_radii(&self, py: Python<'_>) -> Py<PyArray1<f64>> {
        let radii: Vec<f64> = self.sim.particles().iter().map(|p| p.radius).collect();
        radii.into_pyarray(py).unbind()
    }

    /// Matplotlib colour names, one per particle.
    fn get_colours(&self) -> Vec<&'static str> {
        self.sim.particles().iter().map(|p| p.colour.name()).collect()
    }

    /// Frames completed so far.
    #[getter]
    fn frame(&self) -> u64 {
        self.sim.frame()
    }

    /// "Descending", "Ascending" or "Parked".
    #[getter]
    fn tool_phase(&self) -> String {
        format!("{:?}", self.sim.tool_phase())
    }

    /// Largest distance a lattice particle has moved from its initial position.
    fn get_max_displacement(&self) -> f64 {
        self.sim.max_displacement()
    }
}

/// The nanosim Python module entry point.
#[pymodule]
fn nanosim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<NanoImprint>()?;
    Ok(())
}
