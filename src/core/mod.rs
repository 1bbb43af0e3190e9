//! Core of the nano-imprint simulator: particles, the lattice, the tool's
//! stroke and the per-frame collision relaxation.

pub mod collision;
pub mod lattice;
pub mod particle;
pub mod sim;
pub mod tool;

pub use collision::{correct, FrameReport};
pub use lattice::{Lattice, LatticeIndex};
pub use particle::{Colour, Particle};
pub use sim::{initialize, NanoImprint};
pub use tool::{ToolPath, ToolPhase};
