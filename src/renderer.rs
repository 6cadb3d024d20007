use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use crate::autograd::GradError;
use crate::camera::Camera;
use crate::film::Film;
use crate::integrator::Pathtracer;
use crate::sampler::{pixel_seed, RandomSampler};
use crate::scene::Scene;
use crate::{Float, Var3, Vec3};

/// Drives the per-pixel sample loop over a camera.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub camera: Camera,
    pub tracer: Pathtracer,
    pub samples: usize,
    pub seed: u64,
    pub progress: bool,
}

impl Renderer {
    pub fn new(camera: Camera, tracer: Pathtracer, samples: usize) -> Self {
        Self {
            camera,
            tracer,
            samples,
            seed: 0,
            progress: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn sampler(&self, x: usize, y: usize) -> RandomSampler {
        RandomSampler::new_with_seed(pixel_seed(self.seed, x, y))
    }

    fn progress_bar(&self, what: &str) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(self.camera.height() as u64);
        bar.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rows {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(what.to_string());
        bar
    }

    /// One radiance estimate per sample for pixel `(x, y)`, each already divided by the
    /// sample count so their sum is the pixel mean.
    fn pixel_samples<'a>(
        &'a self,
        tracer: &'a Pathtracer,
        scene: &Arc<Scene>,
        x: usize,
        y: usize,
    ) -> impl Iterator<Item = Var3> + 'a {
        let scene = Arc::clone(scene);
        let mut sampler = self.sampler(x, y);
        let inv_samples = 1.0 / self.samples as Float;
        (0..self.samples).map(move |_| {
            let (dir, pdf) = self.camera.sample(x, y, &mut sampler);
            let l = tracer.trace(&scene, self.camera.eye(), dir, 0, &mut sampler);
            l * (inv_samples / pdf)
        })
    }

    /// Mean radiance over `samples` paths through pixel `(x, y)`. No graph is recorded.
    pub fn render_pixel(&self, scene: &Arc<Scene>, x: usize, y: usize) -> Vec3 {
        let tracer = self.tracer.with_grad(false);
        let radiance: Vec3 = self.pixel_samples(&tracer, scene, x, y).map(|l| l.detach()).sum();
        if radiance.has_nans() {
            warn!(x, y, "NaN radiance");
        }
        radiance
    }

    pub fn render(&self, scene: &Arc<Scene>) -> Film {
        let (width, height) = (self.camera.width(), self.camera.height());
        let span = info_span!("render", width, height, samples = self.samples);
        let _enter = span.enter();
        let start = std::time::Instant::now();

        let progress = self.progress_bar("radiance");
        let rows: Vec<Vec<Vec3>> = (0..height)
            .into_par_iter()
            .map(|y| {
                let row = (0..width).map(|x| self.render_pixel(scene, x, y)).collect();
                progress.inc(1);
                row
            })
            .collect();
        progress.finish_and_clear();

        info!("rendered in {} ms", start.elapsed().as_millis());
        Film::from_rows(width, rows)
    }

    /// Per-pixel gradient of the summed pixel radiance with respect to `param`.
    ///
    /// Pixels run one after another: the gradient buffer of `param` is reset, filled
    /// over all samples of the pixel, then read back. It is left zeroed.
    pub fn render_gradient(&self, scene: &Arc<Scene>, param: &Var3) -> Result<Film, GradError> {
        let (width, height) = (self.camera.width(), self.camera.height());
        let span = info_span!("render_gradient", width, height, samples = self.samples);
        let _enter = span.enter();

        let progress = self.progress_bar("gradient");
        let mut film = Film::new(width, height);
        for y in 0..height {
            for x in 0..width {
                param.zero_grad()?;
                for l in self.pixel_samples(&self.tracer, scene, x, y) {
                    l.backward(Vec3::ones());
                }
                film.set(x, y, param.grad()?);
            }
            progress.inc(1);
        }
        progress.finish_and_clear();
        param.zero_grad()?;
        Ok(film)
    }

    /// Gradient of `sum over pixels of dot(weights[p], radiance[p])` with respect to
    /// `param`. Pixels are traced in parallel and all accumulate into `param`.
    ///
    /// # Panics
    /// If `weights` does not match the camera resolution.
    pub fn loss_gradient(&self, scene: &Arc<Scene>, param: &Var3, weights: &Film) -> Result<Vec3, GradError> {
        let (width, height) = (self.camera.width(), self.camera.height());
        assert_eq!(weights.dimensions(), (width, height), "weight image must match the camera");
        let span = info_span!("loss_gradient", width, height, samples = self.samples);
        let _enter = span.enter();

        param.zero_grad()?;
        let progress = self.progress_bar("loss gradient");
        (0..height).into_par_iter().for_each(|y| {
            for x in 0..width {
                let w = weights.get(x, y);
                if w.is_zero() {
                    continue;
                }
                for l in self.pixel_samples(&self.tracer, scene, x, y) {
                    l.backward(w);
                }
            }
            progress.inc(1);
        });
        progress.finish_and_clear();

        let grad = param.grad()?;
        debug!(%grad, "loss gradient");
        param.zero_grad()?;
        Ok(grad)
    }

    /// Runs `f` on a dedicated pool of `threads` workers.
    pub fn with_pool<R: Send>(threads: usize, f: impl FnOnce() -> R + Send) -> anyhow::Result<R> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(pool.install(f))
    }
}
