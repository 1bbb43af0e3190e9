use crate::core::particle::{Colour, Particle, DIM};
use crate::error::{Error, Result};

/// Number of particle layers in the slab (z axis).
pub const Z_LAYERS: usize = 5;

/// Offset of the first lattice centre from the box origin on every axis.
pub const ORIGIN: f64 = 1.0;

/// Largest slab `Lattice::build` accepts, in cells.
pub const MAX_CELLS: usize = 1 << 24;

/// Integer coordinates of a lattice cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatticeIndex {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LatticeIndex {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    #[inline]
    fn axes(self) -> [usize; DIM] {
        [self.x, self.y, self.z]
    }

    #[inline]
    fn from_axes(a: [usize; DIM]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

/// Shape of the particle slab.
///
/// The particles themselves live in a flat arena (row-major over x, then y,
/// then z); `Lattice` maps between cell coordinates and arena slots. All
/// cells share one radius, which is also the unit pitch used to locate the
/// tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    dims: [usize; DIM],
    radius: f64,
}

impl Lattice {
    /// Build the lattice for a cubic box of edge `bbox_size` filled with
    /// particles of `radius`, returning the shape and its particles in arena
    /// order. Every particle gets its static neighbour set here.
    ///
    /// Errors:
    /// - `Error::Configuration` if `radius` is non-positive, the box holds no
    ///   full row, or the slab would exceed [`MAX_CELLS`].
    pub fn build(bbox_size: f64, radius: f64) -> Result<(Self, Vec<Particle>)> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::Configuration(
                "particle_radius must be finite and > 0".into(),
            ));
        }
        if !bbox_size.is_finite() {
            return Err(Error::Configuration("bbox_size must be finite".into()));
        }
        let side = ((bbox_size - 2.0 * ORIGIN) / (2.0 * radius)).floor();
        if side < 1.0 {
            return Err(Error::Configuration(format!(
                "bbox_size {bbox_size} with particle_radius {radius} yields an empty lattice"
            )));
        }
        let too_large = || {
            Error::Configuration(format!(
                "bbox_size {bbox_size} with particle_radius {radius} exceeds {MAX_CELLS} cells"
            ))
        };
        if !side.is_finite() || side > MAX_CELLS as f64 {
            return Err(too_large());
        }
        let side = side as usize;
        side.checked_mul(side)
            .and_then(|n| n.checked_mul(Z_LAYERS))
            .filter(|&n| n <= MAX_CELLS)
            .ok_or_else(too_large)?;
        let lattice = Self {
            dims: [side, side, Z_LAYERS],
            radius,
        };

        let mut cells = Vec::with_capacity(lattice.len());
        for idx in lattice.indices() {
            let mut r = [0.0_f64; DIM];
            for (r_k, i_k) in r.iter_mut().zip(idx.axes()) {
                *r_k = ORIGIN + 2.0 * radius * i_k as f64;
            }
            let mut p = Particle::lattice(r, radius, Colour::for_layer(idx.z))?;
            p.set_neighbours(lattice.adjacent(idx));
            cells.push(p);
        }

        log::info!(
            "built {}x{}x{} lattice ({} particles, radius {})",
            side,
            side,
            Z_LAYERS,
            cells.len(),
            radius
        );
        Ok((lattice, cells))
    }

    /// Cell counts per axis.
    #[inline]
    pub fn dims(&self) -> [usize; DIM] {
        self.dims
    }

    /// Radius shared by every lattice particle.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arena slot of a cell.
    #[inline]
    pub fn flat_index(&self, idx: LatticeIndex) -> usize {
        (idx.x * self.dims[1] + idx.y) * self.dims[2] + idx.z
    }

    /// Cell coordinates of an arena slot.
    #[inline]
    pub fn index_of(&self, flat: usize) -> LatticeIndex {
        let z = flat % self.dims[2];
        let y = (flat / self.dims[2]) % self.dims[1];
        let x = flat / (self.dims[1] * self.dims[2]);
        LatticeIndex::new(x, y, z)
    }

    #[inline]
    pub fn contains(&self, idx: LatticeIndex) -> bool {
        idx.axes().iter().zip(self.dims).all(|(&i, n)| i < n)
    }

    /// All cells in ascending (x, y, z) order, i.e. arena order.
    pub fn indices(&self) -> impl Iterator<Item = LatticeIndex> + '_ {
        (0..self.len()).map(move |flat| self.index_of(flat))
    }

    /// Look up a cell in an arena built by [`Lattice::build`].
    pub fn get<'a>(&self, cells: &'a [Particle], idx: LatticeIndex) -> Option<&'a Particle> {
        if !self.contains(idx) {
            return None;
        }
        cells.get(self.flat_index(idx))
    }

    /// Lattice index nearest to a point on each axis, unclipped (may be
    /// negative or past the end; saturates at the `i64` range).
    pub fn nearest_index(&self, r: &[f64; DIM]) -> [i64; DIM] {
        let mut out = [0_i64; DIM];
        for (o, &x) in out.iter_mut().zip(r) {
            *o = ((x - ORIGIN) / (2.0 * self.radius)).floor() as i64;
        }
        out
    }

    /// How many cells on each side of its centre a body of `radius` spans.
    #[inline]
    pub fn reach(&self, radius: f64) -> i64 {
        (radius / self.radius).floor() as i64
    }

    /// Cells within `reach` of `centre` on every axis, clipped to bounds, in
    /// ascending order.
    pub fn cube(&self, centre: [i64; DIM], reach: i64) -> Vec<LatticeIndex> {
        let mut span = [(0_usize, 0_usize); DIM];
        for (k, s) in span.iter_mut().enumerate() {
            let lo = centre[k].saturating_sub(reach).max(0);
            let hi = centre[k].saturating_add(reach).min(self.dims[k] as i64 - 1);
            if lo > hi {
                return Vec::new();
            }
            *s = (lo as usize, hi as usize);
        }
        let mut out = Vec::new();
        for x in span[0].0..=span[0].1 {
            for y in span[1].0..=span[1].1 {
                for z in span[2].0..=span[2].1 {
                    out.push(LatticeIndex::new(x, y, z));
                }
            }
        }
        out
    }

    /// Existing cells at offset ±1 along exactly one axis, ordered
    /// -x, +x, -y, +y, -z, +z.
    fn adjacent(&self, idx: LatticeIndex) -> Vec<LatticeIndex> {
        let mut out = Vec::with_capacity(2 * DIM);
        let axes = idx.axes();
        for k in 0..DIM {
            if axes[k] > 0 {
                let mut a = axes;
                a[k] -= 1;
                out.push(LatticeIndex::from_axes(a));
            }
            if axes[k] + 1 < self.dims[k] {
                let mut a = axes;
                a[k] += 1;
                out.push(LatticeIndex::from_axes(a));
            }
        }
        out
    }
}
