use crate::core::lattice::Lattice;
use crate::core::particle::{distance, Particle, DIM};
use crate::error::{Error, Result};

/// Centre separations at or below this are treated as coincident.
pub const EPS_DIST: f64 = 1e-12;

/// What one relaxation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Cells inside the tool's reach (all of them end up locked).
    pub tool_cells: usize,
    /// Cells the tool actually pushed.
    pub tool_corrections: usize,
    /// Neighbour corrections that moved a particle.
    pub neighbour_corrections: usize,
}

/// Push `moving` out of `still` along the line joining their centres until
/// the two spheres touch. `still` is not modified.
///
/// Returns `Ok(false)` when the spheres do not overlap (nothing moves).
///
/// Errors:
/// - `Error::DegenerateContact` if the spheres overlap and their centres are
///   within [`EPS_DIST`]. Below that the contact normal is lost to rounding and
///   the push can overflow to infinity.
pub fn correct(moving: &mut Particle, still: &Particle) -> Result<bool> {
    push_apart(&mut moving.r, moving.radius, &still.r, still.radius)
}

fn push_apart(
    moving: &mut [f64; DIM],
    moving_radius: f64,
    still: &[f64; DIM],
    still_radius: f64,
) -> Result<bool> {
    let contact = moving_radius + still_radius;
    let d = distance(moving, still);
    if d >= contact {
        return Ok(false);
    }
    if d <= EPS_DIST {
        return Err(Error::DegenerateContact { position: *moving });
    }
    // Similar triangles: the overlap splits over the axes like the centre offset.
    let scale = (contact - d) / d;
    for (m, s) in moving.iter_mut().zip(still) {
        *m += scale * (*m - s);
    }
    Ok(true)
}

/// Clear the per-frame processed flag on every particle.
pub fn reset_locks(particles: &mut [Particle]) {
    for p in particles {
        p.locked = false;
    }
}

/// Tool pass: correct every cell within the tool's reach against the tool
/// and lock it, whether or not it overlapped.
///
/// Returns `(cells visited, cells moved)`.
pub fn resolve_tool(lattice: &Lattice, tool: &Particle, cells: &mut [Particle]) -> Result<(usize, usize)> {
    let reach = lattice.reach(tool.radius);
    let centre = lattice.nearest_index(&tool.r);
    let cube = lattice.cube(centre, reach);
    let mut moved = 0;
    for idx in &cube {
        let cell = &mut cells[lattice.flat_index(*idx)];
        if correct(cell, tool)? {
            moved += 1;
        }
        cell.locked = true;
    }
    Ok((cube.len(), moved))
}

/// Neighbour pass: in arena order, push each unlocked cell out of its static
/// neighbours one after another, then lock it.
///
/// Each correction sees the cell's already-shifted position and the
/// neighbour's current position, so results depend on visiting order.
///
/// Returns the number of corrections that moved a particle.
pub fn resolve_neighbours(lattice: &Lattice, cells: &mut [Particle]) -> Result<usize> {
    let mut moved = 0;
    for i in 0..cells.len() {
        if cells[i].locked {
            continue;
        }
        for n in 0..cells[i].neighbours().len() {
            let j = lattice.flat_index(cells[i].neighbours()[n]);
            let (still_r, still_radius) = (cells[j].r, cells[j].radius);
            let p = &mut cells[i];
            if push_apart(&mut p.r, p.radius, &still_r, still_radius)? {
                moved += 1;
            }
        }
        cells[i].locked = true;
    }
    Ok(moved)
}

/// Tool pass followed by the neighbour pass. Locks must already be reset.
pub fn resolve_frame(lattice: &Lattice, tool: &Particle, cells: &mut [Particle]) -> Result<FrameReport> {
    let (tool_cells, tool_corrections) = resolve_tool(lattice, tool, cells)?;
    let neighbour_corrections = resolve_neighbours(lattice, cells)?;
    Ok(FrameReport {
        tool_cells,
        tool_corrections,
        neighbour_corrections,
    })
}
