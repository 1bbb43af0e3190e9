//! Nano-imprint simulation: a rigid tool particle pressed into and withdrawn
//! from a slab of spherical particles on a fixed lattice.
//!
//! ```no_run
//! use nanosim::config::SimConfig;
//! use nanosim::core::NanoImprint;
//! use nanosim::driver::FrameDriver;
//!
//! # fn main() -> nanosim::error::Result<()> {
//! let cfg = SimConfig::default();
//! let mut sim = NanoImprint::new(&cfg)?;
//! FrameDriver::from(&cfg.video).run(&mut sim, |frame, particles| {
//!     println!("frame {frame}: tool at {:?}", particles[0].r);
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod driver;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::core::{NanoImprint, Particle};
pub use crate::driver::{FrameDriver, Simulator};
pub use crate::error::{Error, Result};
