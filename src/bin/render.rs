use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use drt::imageio::write_image;
use drt::integrator::{Estimator, Pathtracer};
use drt::renderer::Renderer;
use drt::scenes::cornell_box;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Param {
    Red,
    Green,
    White,
    Emission,
}

/// Renders the built-in Cornell box, or the gradient of its radiance with respect to one
/// of its material parameters.
#[derive(Debug, Parser)]
#[command(version)]
struct RenderArgs {
    /// Image width in pixels
    #[arg(short = 'x', long, default_value_t = 640)]
    width: usize,

    /// Image height in pixels
    #[arg(short = 'y', long, default_value_t = 480)]
    height: usize,

    /// Samples per pixel
    #[arg(short = 'n', long, default_value_t = 100)]
    samples: usize,

    /// Bounces before Russian roulette starts
    #[arg(short = 'b', long, default_value_t = 1)]
    min_bounces: usize,

    /// Probability of absorbing a path at each bounce after the minimum
    #[arg(short = 'p', long, default_value_t = 0.5)]
    absorb_prob: f64,

    /// Output image, `.exr` for linear floats or any 8-bit format such as `.png`
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Base seed for the per-pixel random streams
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads, defaults to one per core
    #[arg(long)]
    threads: Option<usize>,

    /// Gradient estimator, `biased` or `unbiased`
    #[arg(long, default_value = "unbiased")]
    estimator: Estimator,

    /// Write the gradient of the pixel radiance with respect to this parameter instead
    #[arg(long, value_enum)]
    gradient: Option<Param>,
}

impl RenderArgs {
    fn validate(&self) -> anyhow::Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("image size must be at least 1x1, got {}x{}", self.width, self.height);
        }
        if self.samples == 0 {
            bail!("need at least one sample per pixel");
        }
        if !(0.0..1.0).contains(&self.absorb_prob) {
            bail!("absorb probability must be in [0, 1), got {}", self.absorb_prob);
        }
        if self.threads == Some(0) {
            bail!("need at least one thread");
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = RenderArgs::parse();
    args.validate()?;
    info!(?args, "starting");

    let cornell = cornell_box(args.width, args.height);
    let tracer = Pathtracer::new(args.absorb_prob, args.min_bounces).with_estimator(args.estimator);
    let renderer = Renderer::new(cornell.camera, tracer, args.samples)
        .with_seed(args.seed)
        .with_progress(true);

    let run = || -> anyhow::Result<_> {
        match args.gradient {
            None => Ok(renderer.render(&cornell.scene)),
            Some(param) => {
                let var = match param {
                    Param::Red => &cornell.red,
                    Param::Green => &cornell.green,
                    Param::White => &cornell.white,
                    Param::Emission => &cornell.emission,
                };
                renderer
                    .render_gradient(&cornell.scene, var)
                    .with_context(|| format!("gradient of {:?}", param))
            }
        }
    };

    let film = match args.threads {
        Some(threads) => Renderer::with_pool(threads, run)??,
        None => run()?,
    };

    write_image(&args.output, &film)?;
    info!(output = %args.output.display(), "done");
    Ok(())
}
