use crate::core::lattice::LatticeIndex;
use crate::error::{Error, Result};

/// Fixed spatial dimension (3D).
pub const DIM: usize = 3;

/// Render hint carried by every particle. No physical meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Black,
    DarkSlateGray,
    Olive,
}

impl Colour {
    /// Matplotlib-compatible colour name.
    pub fn name(self) -> &'static str {
        match self {
            Colour::Black => "black",
            Colour::DarkSlateGray => "darkslategray",
            Colour::Olive => "olive",
        }
    }

    /// Colour of a lattice layer: alternating by z index.
    pub fn for_layer(iz: usize) -> Self {
        if iz % 2 == 0 {
            Colour::DarkSlateGray
        } else {
            Colour::Olive
        }
    }
}

/// A spherical particle of the slab, or the tool.
///
/// Fields:
/// - `r`: position [x, y, z]
/// - `r0`: reference position, fixed at creation
/// - `v`: velocity [vx, vy, vz]
/// - `mass`, `radius` (> 0)
/// - `neighbours`: static lattice connectivity, empty for the tool
/// - `locked`: set once the particle has been processed in the current frame
#[derive(Debug, Clone)]
pub struct Particle {
    /// Position (x, y, z).
    pub r: [f64; DIM],
    r0: [f64; DIM],
    /// Velocity (vx, vy, vz).
    pub v: [f64; DIM],
    /// Mass (> 0).
    pub mass: f64,
    /// Sphere radius (> 0).
    pub radius: f64,
    /// Render hint.
    pub colour: Colour,
    neighbours: Vec<LatticeIndex>,
    /// Per-frame processed flag.
    pub locked: bool,
}

impl Particle {
    /// Create a new particle at `r` after validating invariants. `r` also becomes
    /// the reference position.
    ///
    /// Errors:
    /// - `Error::Configuration` if `radius` or `mass` is non-positive or any component is NaN/inf.
    pub fn new(r: [f64; DIM], v: [f64; DIM], radius: f64, mass: f64, colour: Colour) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::Configuration("radius must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::Configuration("mass must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::Configuration("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::Configuration("velocity must be finite".into()));
        }
        Ok(Self {
            r,
            r0: r,
            v,
            radius,
            mass,
            colour,
            neighbours: Vec::new(),
            locked: false,
        })
    }

    /// A lattice particle at rest with constant density (`mass = radius^3`).
    pub fn lattice(r: [f64; DIM], radius: f64, colour: Colour) -> Result<Self> {
        Self::new(r, [0.0; DIM], radius, radius.powi(3), colour)
    }

    /// Reference position recorded at creation.
    #[inline]
    pub fn reference_position(&self) -> [f64; DIM] {
        self.r0
    }

    /// Static neighbour coordinates in -x, +x, -y, +y, -z, +z order.
    #[inline]
    pub fn neighbours(&self) -> &[LatticeIndex] {
        &self.neighbours
    }

    pub(crate) fn set_neighbours(&mut self, neighbours: Vec<LatticeIndex>) {
        self.neighbours = neighbours;
    }

    /// Displacement vector from the reference position.
    #[inline]
    pub fn displacement(&self) -> [f64; DIM] {
        let mut d = [0.0; DIM];
        for (k, dk) in d.iter_mut().enumerate() {
            *dk = self.r[k] - self.r0[k];
        }
        d
    }

    /// Euclidean distance between the centres of two particles.
    #[inline]
    pub fn distance_to(&self, other: &Particle) -> f64 {
        distance(&self.r, &other.r)
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &[f64; DIM], b: &[f64; DIM]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
