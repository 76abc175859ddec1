//! Host-side driver: `cargo run` steps the trail simulation headlessly along
//! a scripted pointer path and reports what the pool did.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;
    use trail_wasm::{PointerSample, TrailConfig, TrailSimulation, Viewport};

    #[derive(Parser, Debug)]
    #[command(name = "trail-sim", about = "Run the cursor trail simulation without a browser")]
    pub struct Cli {
        /// Built-in preset (fluid, dense, liquid)
        #[arg(short, long, default_value = "fluid")]
        preset: String,

        /// JSON config file; overrides --preset
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, default_value_t = 600)]
        frames: u32,

        #[arg(long, default_value_t = 60.0)]
        fps: f32,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = 1280.0)]
        width: f32,

        #[arg(long, default_value_t = 720.0)]
        height: f32,

        /// Print the resolved config as JSON and exit
        #[arg(long)]
        dump_config: bool,

        /// Increase verbosity (-v info, -vv debug, -vvv trace)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
    }

    #[derive(Debug, Default)]
    struct Stats {
        spawned: usize,
        expired: usize,
        peak: usize,
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let mut logger =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
        match cli.verbose {
            0 => {}
            1 => {
                logger.filter_level(log::LevelFilter::Info);
            }
            2 => {
                logger.filter_level(log::LevelFilter::Debug);
            }
            _ => {
                logger.filter_level(log::LevelFilter::Trace);
            }
        }
        logger.init();

        let config = match &cli.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                TrailConfig::from_json_str(&json)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => TrailConfig::preset(&cli.preset)?,
        };

        if cli.dump_config {
            println!("{}", config.to_json_pretty()?);
            return Ok(());
        }

        let viewport = Viewport::new(cli.width, cli.height);
        let anchors = vec![
            Vec2::new(viewport.width * 0.25, viewport.height * 0.5),
            Vec2::new(viewport.width * 0.75, viewport.height * 0.5),
        ];

        let mut sim = TrailSimulation::new(config, cli.seed)?;
        sim.resize(viewport);

        let fps = cli.fps.max(1.0);
        let dt = 1.0 / fps;
        let second = fps as u32;
        let press_period = 2 * second;
        let press_length = (second / 4).max(1);
        let mut stats = Stats::default();
        let mut last = Vec2::ZERO;

        for i in 0..cli.frames {
            let pos = pointer_path(i as f32 * dt, &viewport);
            let delta = if i == 0 { Vec2::ZERO } else { pos - last };
            last = pos;

            stats.spawned += sim.pointer_move(PointerSample {
                position: pos,
                movement: delta,
            });
            // Press for a quarter second every two seconds.
            match i % press_period {
                0 => sim.pointer_down(),
                n if n == press_length => sim.pointer_up(),
                _ => {}
            }

            let frame = sim.frame(dt, &anchors);
            stats.expired += frame.expired;
            stats.peak = stats.peak.max(frame.trail.len());
            let rippling = !frame.ripple.is_empty();

            if i % second == 0 {
                log::info!(
                    "t={:>6.2}s live={:>4} ripple={}",
                    sim.elapsed(),
                    sim.pool().len(),
                    rippling
                );
            }
        }

        println!("frames:   {}", cli.frames);
        println!("spawned:  {}", stats.spawned);
        println!("expired:  {}", stats.expired);
        println!("peak:     {} / {}", stats.peak, sim.pool().capacity());
        println!("live:     {}", sim.pool().len());
        Ok(())
    }

    /// A figure-eight sweep across the viewport.
    fn pointer_path(t: f32, viewport: &Viewport) -> Vec2 {
        let c = Vec2::new(viewport.width, viewport.height) * 0.5;
        c + Vec2::new((t * 0.9).sin() * c.x * 0.8, (t * 1.8).sin() * c.y * 0.6)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
