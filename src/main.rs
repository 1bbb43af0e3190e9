use nanosim::config::SimConfig;
use nanosim::core::NanoImprint;
use nanosim::driver::FrameDriver;

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Run the nano-imprint simulation headlessly.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML configuration; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of frames from the configuration
    #[arg(short, long)]
    frames: Option<u32>,

    /// Write every frame as CSV rows: frame,index,x,y,z,radius,colour
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut cfg = match &args.config {
        Some(path) => SimConfig::from_path(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(frames) = args.frames {
        cfg.video.total_frames = frames;
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = load_config(&args)?;

    let mut sim = NanoImprint::new(&cfg).context("invalid simulation setup")?;
    let driver = FrameDriver::from(&cfg.video);

    let mut csv = match &args.csv {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut w = BufWriter::new(file);
            writeln!(w, "frame,index,x,y,z,radius,colour")?;
            Some(w)
        }
        None => None,
    };

    driver.run(&mut sim, |frame, particles| {
        if let Some(w) = csv.as_mut() {
            for (i, p) in particles.iter().enumerate() {
                writeln!(
                    w,
                    "{},{},{},{},{},{},{}",
                    frame,
                    i,
                    p.r[0],
                    p.r[1],
                    p.r[2],
                    p.radius,
                    p.colour.name()
                )?;
            }
        }
        Ok(())
    })?;

    if let Some(mut w) = csv {
        w.flush()?;
    }

    log::info!(
        "finished after {} frames: tool {:?} at {:?}, max displacement {:.4}, mean {:.4}, max neighbour overlap {:.2e}",
        sim.frame(),
        sim.tool_phase(),
        sim.tool().r,
        sim.max_displacement(),
        sim.mean_displacement(),
        sim.max_neighbour_overlap()
    );
    Ok(())
}
