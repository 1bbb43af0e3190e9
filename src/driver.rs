//! Frame loop, kept outside the simulations.
//!
//! A simulation only knows how to advance one frame and expose its particles;
//! the driver decides how many frames run and hands each finished frame to an
//! observer (a renderer, an exporter, a test).

use std::time::Duration;

use crate::config::VideoConfig;
use crate::core::particle::Particle;
use crate::error::{Error, Result};

/// Capability shared by every simulation variant.
pub trait Simulator {
    /// Mutate the simulation state by exactly one frame.
    fn advance_one_frame(&mut self) -> Result<()>;

    /// Particles in stable render order. Length and order never change
    /// between frames.
    fn particle_view(&self) -> &[Particle];
}

/// Runs a [`Simulator`] for a fixed number of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDriver {
    pub total_frames: u32,
    pub framerate: u32,
}

impl From<&VideoConfig> for FrameDriver {
    fn from(v: &VideoConfig) -> Self {
        Self {
            total_frames: v.total_frames,
            framerate: v.framerate,
        }
    }
}

impl FrameDriver {
    pub fn new(total_frames: u32, framerate: u32) -> Self {
        Self {
            total_frames,
            framerate,
        }
    }

    /// Wall-clock time between frames for a renderer.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.framerate.max(1)))
    }

    /// Advance `sim` frame by frame, calling `on_frame(frame, particles)`
    /// after each completed frame. Stops at the first error from either side.
    ///
    /// Returns the number of frames run.
    pub fn run<S, F>(&self, sim: &mut S, mut on_frame: F) -> Result<u32>
    where
        S: Simulator + ?Sized,
        F: FnMut(u32, &[Particle]) -> Result<()>,
    {
        if sim.particle_view().is_empty() {
            return Err(Error::Configuration(
                "the array of particles is empty".into(),
            ));
        }
        for frame in 0..self.total_frames {
            sim.advance_one_frame()?;
            on_frame(frame, sim.particle_view())?;
        }
        log::info!("ran {} frames", self.total_frames);
        Ok(self.total_frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::particle::Colour;

    /// Drifts a single particle along x by one unit per frame.
    struct Drift {
        particles: Vec<Particle>,
    }

    impl Simulator for Drift {
        fn advance_one_frame(&mut self) -> Result<()> {
            self.particles[0].r[0] += 1.0;
            Ok(())
        }

        fn particle_view(&self) -> &[Particle] {
            &self.particles
        }
    }

    #[test]
    fn observer_sees_every_frame() -> Result<()> {
        let mut sim = Drift {
            particles: vec![Particle::lattice([0.0; 3], 1.0, Colour::Olive)?],
        };
        let mut seen = Vec::new();
        let n = FrameDriver::new(3, 30).run(&mut sim, |frame, ps| {
            seen.push((frame, ps[0].r[0]));
            Ok(())
        })?;
        assert_eq!(n, 3);
        assert_eq!(seen, vec![(0, 1.0), (1, 2.0), (2, 3.0)]);
        Ok(())
    }

    #[test]
    fn empty_view_rejected() {
        let mut sim = Drift { particles: vec![] };
        let err = FrameDriver::new(1, 30).run(&mut sim, |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn observer_error_stops_run() -> Result<()> {
        let mut sim = Drift {
            particles: vec![Particle::lattice([0.0; 3], 1.0, Colour::Olive)?],
        };
        let res = FrameDriver::new(10, 30).run(&mut sim, |frame, _| {
            if frame == 1 {
                Err(Error::Halted)
            } else {
                Ok(())
            }
        });
        assert!(res.is_err());
        assert_eq!(sim.particles[0].r[0], 2.0);
        Ok(())
    }

    #[test]
    fn interval_from_framerate() {
        assert_eq!(FrameDriver::new(1, 4).frame_interval(), Duration::from_millis(250));
    }
}
