use nanosim::config::SimConfig;
use nanosim::core::collision::{reset_locks, resolve_tool};
use nanosim::core::{Lattice, NanoImprint, ToolPhase};
use nanosim::driver::{FrameDriver, Simulator};
use nanosim::error::Result;

/// 15 x 15 x 5 slab of radius 0.2 particles; the default tool stroke takes
/// about 100 frames at dt = 0.5.
fn stroke_config() -> SimConfig {
    let mut cfg = SimConfig::default();
    cfg.simulator.bbox_size = 8;
    cfg.simulator.particle_radius = 0.2;
    cfg.simulator.timestep = 0.5;
    cfg.video.total_frames = 110;
    cfg
}

/// Every lattice particle is locked after a frame; the tool never is.
#[test]
fn locks_hold_between_frames() -> Result<()> {
    let mut sim = NanoImprint::new(&stroke_config())?;
    for _ in 0..5 {
        sim.advance_one_frame()?;
        assert!(sim.cells().iter().all(|p| p.locked));
        assert!(!sim.tool().locked);
    }
    Ok(())
}

/// After a frame, nothing inside the tool's reach overlaps the tool: the
/// tool pass leaves those cells tangent and locked.
#[test]
fn tool_contacts_are_resolved_each_frame() -> Result<()> {
    let mut sim = NanoImprint::new(&stroke_config())?;
    for _ in 0..60 {
        sim.step()?;
        let lattice = sim.lattice();
        let tool = sim.tool();
        let cube = lattice.cube(lattice.nearest_index(&tool.r), lattice.reach(tool.radius));
        for idx in cube {
            let p = &sim.cells()[lattice.flat_index(idx)];
            assert!(
                p.distance_to(tool) >= p.radius + tool.radius - 1e-9,
                "frame {}: cell {idx:?} still overlaps the tool",
                sim.frame()
            );
        }
    }
    Ok(())
}

/// A full press-and-withdraw run deforms the slab, parks the tool and leaves
/// the static structure untouched.
#[test]
fn full_stroke_deforms_slab() -> Result<()> {
    let cfg = stroke_config();
    let mut sim = NanoImprint::new(&cfg)?;
    let neighbours_before: Vec<_> = sim.cells().iter().map(|p| p.neighbours().to_vec()).collect();
    let references_before: Vec<_> = sim.cells().iter().map(|p| p.reference_position()).collect();
    let n = sim.particles().len();

    let mut lowest_tool_z = f64::INFINITY;
    let frames = FrameDriver::from(&cfg.video).run(&mut sim, |_, particles| {
        assert_eq!(particles.len(), n);
        lowest_tool_z = lowest_tool_z.min(particles[0].r[2]);
        Ok(())
    })?;

    assert_eq!(frames, 110);
    assert_eq!(sim.frame(), 110);
    assert_eq!(sim.tool_phase(), ToolPhase::Parked);
    assert!(lowest_tool_z <= 1.5);
    assert_eq!(sim.tool().r[1], 4.0);
    assert!(sim.max_displacement() > 0.0);
    assert!(sim.mean_displacement() > 0.0);
    assert!(sim.mean_displacement() <= sim.max_displacement());
    assert!(sim.positions().iter().flatten().all(|x| x.is_finite()));

    let neighbours_after: Vec<_> = sim.cells().iter().map(|p| p.neighbours().to_vec()).collect();
    let references_after: Vec<_> = sim.cells().iter().map(|p| p.reference_position()).collect();
    assert_eq!(neighbours_before, neighbours_after);
    assert_eq!(references_before, references_after);
    Ok(())
}

/// Identical configurations produce identical trajectories.
#[test]
fn runs_are_deterministic() -> Result<()> {
    let cfg = stroke_config();
    let mut a = NanoImprint::new(&cfg)?;
    let mut b = NanoImprint::new(&cfg)?;
    for _ in 0..40 {
        let ra = a.step()?;
        let rb = b.step()?;
        assert_eq!(ra, rb);
    }
    assert_eq!(a.positions(), b.positions());
    Ok(())
}

/// A tool hovering above the slab moves nothing.
#[test]
fn distant_tool_leaves_slab_alone() -> Result<()> {
    let mut cfg = stroke_config();
    cfg.tool.position = [4.0, 4.0, 3.9];
    cfg.tool.velocity = [0.0, 0.0, 0.0];
    let mut sim = NanoImprint::new(&cfg)?;
    let report = sim.step()?;
    assert_eq!(report.tool_corrections, 0);
    // Only rounding noise from the initial grid spacing.
    assert!(sim.max_displacement() < 1e-12);
    assert_eq!(sim.tool_overlap_count(), 0);
    Ok(())
}

/// The tool pass locks every visited cell, overlapping or not.
#[test]
fn tool_pass_locks_without_overlap() -> Result<()> {
    let (lattice, mut cells) = Lattice::build(12.0, 0.5)?;
    let tool = nanosim::core::tool::make_tool([5.5, 5.5, 7.5], [0.0; 3], 1.0)?;
    reset_locks(&mut cells);
    let (visited, moved) = resolve_tool(&lattice, &tool, &mut cells)?;
    assert_eq!(moved, 0);
    assert!(visited > 0);
    assert_eq!(cells.iter().filter(|p| p.locked).count(), visited);
    Ok(())
}
