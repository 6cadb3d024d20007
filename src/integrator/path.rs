use std::sync::Arc;

use crate::emitter;
use crate::integrator::{integrate, Estimator};
use crate::reflection::BxDF;
use crate::sampler::Sampler;
use crate::scene::{RaycastHit, Scene};
use crate::{Float, Var3, Vec3, RAY_EPSILON};

/// Recursive path tracer with Russian roulette.
///
/// Below `min_bounces` every path continues. From then on each call is absorbed with
/// probability `absorb_prob`, and surviving calls divide their result by
/// `1 - absorb_prob`.
///
/// With `track_grad` off every vertex returns a constant, so radiance-only passes build
/// no graph even when the scene holds variables.
#[derive(Debug, Clone, Copy)]
pub struct Pathtracer {
    pub absorb_prob: Float,
    pub min_bounces: usize,
    pub estimator: Estimator,
    pub track_grad: bool,
}

impl Pathtracer {
    pub fn new(absorb_prob: Float, min_bounces: usize) -> Self {
        Self {
            absorb_prob,
            min_bounces,
            estimator: Estimator::default(),
            track_grad: true,
        }
    }

    pub fn with_estimator(mut self, estimator: Estimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_grad(mut self, track_grad: bool) -> Self {
        self.track_grad = track_grad;
        self
    }

    /// Probability that a call at `depth` is not absorbed.
    pub fn survival_prob(&self, depth: usize) -> Float {
        if depth >= self.min_bounces { 1.0 - self.absorb_prob } else { 1.0 }
    }

    /// Radiance arriving at `orig` from direction `dir`.
    pub fn trace(
        &self,
        scene: &Arc<Scene>,
        orig: Vec3,
        dir: Vec3,
        depth: usize,
        sampler: &mut dyn Sampler,
    ) -> Var3 {
        if depth >= self.min_bounces && sampler.get_1d() < self.absorb_prob {
            return Var3::zeros();
        }
        let survival = self.survival_prob(depth);

        match scene.raycast(orig, dir) {
            Some(hit) => self.scatter(scene, &hit, dir, depth, survival, sampler),
            None => Var3::zeros(),
        }
    }

    fn scatter(
        &self,
        scene: &Arc<Scene>,
        hit: &RaycastHit<'_>,
        dir_in: Vec3,
        depth: usize,
        survival: Float,
        sampler: &mut dyn Sampler,
    ) -> Var3 {
        let emission = emitter::emission(hit.emitter());
        let scattered = match hit.bxdf() {
            Some(bxdf) => self.scatter_integral(scene, bxdf, hit.point, hit.normal, dir_in, depth, sampler),
            None => Var3::zeros(),
        };
        let radiance = Var3::scatter_combine(&emission, &scattered, 1.0 / survival);
        if self.track_grad { radiance } else { Var3::constant(radiance.detach()) }
    }

    /// Single-sample estimate of the light reflected at `point` towards `-dir_in`.
    #[allow(clippy::too_many_arguments)]
    fn scatter_integral(
        &self,
        scene: &Arc<Scene>,
        bxdf: &BxDF,
        point: Vec3,
        normal: Vec3,
        dir_in: Vec3,
        depth: usize,
        sampler: &mut dyn Sampler,
    ) -> Var3 {
        let tracer = *self;
        let wo = -dir_in;
        // nothing to differentiate, skip recording replay nodes
        let estimator = if self.track_grad && scene.requires_grad() {
            self.estimator
        } else {
            Estimator::Biased
        };

        let forward = {
            let scene = Arc::clone(scene);
            let bxdf = bxdf.clone();
            move |dir_out: &Vec3, sampler: &mut dyn Sampler| {
                let cos_theta = normal.dot(dir_out);
                if cos_theta <= 0.0 {
                    return Var3::zeros();
                }
                let weight = bxdf.evaluate(normal, wo, *dir_out);
                let orig = point + *dir_out * RAY_EPSILON;
                let radiance = tracer.trace(&scene, orig, *dir_out, depth + 1, sampler);
                weight * radiance * cos_theta
            }
        };
        let bxdf = bxdf.clone();
        let sample = move |sampler: &mut dyn Sampler| bxdf.sample(normal, wo, sampler);

        integrate(forward, sample, 1, estimator, sampler)
    }
}

impl Default for Pathtracer {
    fn default() -> Self {
        Self::new(0.5, 1)
    }
}
