//! Monte Carlo integration over recorded computation graphs.
//!
//! [`integrate`] estimates `E[forward(x) / pdf(x)]` for samples `x` drawn by a sampling
//! function. The two [`Estimator`]s give the same image and differ only in how gradients
//! flow back through the estimate.

use std::marker::PhantomData;
use std::str::FromStr;

use parking_lot::Mutex;

use crate::autograd::{BackwardOp, Replay};
use crate::sampler::Sampler;
use crate::{Scalar, Var, Vector};

pub mod path;

pub use path::Pathtracer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimator {
    /// Averages the tracked per-sample results directly, so the gradient reuses the
    /// exact sample draws of the value. Value and gradient are correlated.
    Biased,
    /// Averages detached values and records a node that re-draws fresh samples every
    /// time a gradient is pushed through it.
    Unbiased,
}

impl Default for Estimator {
    fn default() -> Self {
        Estimator::Unbiased
    }
}

impl FromStr for Estimator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "biased" => Ok(Estimator::Biased),
            "unbiased" => Ok(Estimator::Unbiased),
            other => Err(format!("unknown estimator `{}`, expected `biased` or `unbiased`", other)),
        }
    }
}

/// Mean of `forward(x) / pdf` over `n_samples` draws of `(x, pdf)` from `sample`.
///
/// Both closures receive the sampler so nested estimates can keep drawing from it.
/// A degenerate density is not filtered, so a zero or NaN pdf shows up in the value.
///
/// # Panics
/// If `n_samples` is zero.
pub fn integrate<T, const N: usize, X, F, S>(
    forward: F,
    sample: S,
    n_samples: usize,
    estimator: Estimator,
    sampler: &mut dyn Sampler,
) -> Var<T, N>
where
    T: Scalar,
    X: 'static,
    F: Fn(&X, &mut dyn Sampler) -> Var<T, N> + Send + Sync + 'static,
    S: Fn(&mut dyn Sampler) -> (X, T) + Send + Sync + 'static,
{
    assert!(n_samples > 0, "integrate needs at least one sample");
    let n = T::cast(n_samples as f64);

    match estimator {
        Estimator::Biased => {
            let terms: Vec<_> = (0..n_samples)
                .map(|_| {
                    let (x, pdf) = sample(&mut *sampler);
                    (forward(&x, &mut *sampler), T::one() / (pdf * n))
                })
                .collect();
            Var::weighted_sum(terms)
        }
        Estimator::Unbiased => {
            let mut total = Vector::zeros();
            for _ in 0..n_samples {
                let (x, pdf) = sample(&mut *sampler);
                total += forward(&x, &mut *sampler).detach() / pdf;
            }
            let replay = ReplayIntegral {
                forward,
                sample,
                n_samples,
                sampler: Mutex::new(sampler.fork()),
                _sample: PhantomData,
            };
            Var::from_op(total / n, BackwardOp::IntegratorReplay(Box::new(replay)))
        }
    }
}

/// Backward pass of an unbiased integral. Each replay draws its own samples from a
/// fresh fork of the stored stream and skips draws whose pdf is not positive.
struct ReplayIntegral<X, F, S> {
    forward: F,
    sample: S,
    n_samples: usize,
    sampler: Mutex<Box<dyn Sampler>>,
    _sample: PhantomData<fn() -> X>,
}

impl<T, const N: usize, X, F, S> Replay<T, N> for ReplayIntegral<X, F, S>
where
    T: Scalar,
    X: 'static,
    F: Fn(&X, &mut dyn Sampler) -> Var<T, N> + Send + Sync + 'static,
    S: Fn(&mut dyn Sampler) -> (X, T) + Send + Sync + 'static,
{
    fn replay(&self, grad: &Vector<T, N>) {
        let mut sampler = self.sampler.lock().fork();
        let n = T::cast(self.n_samples as f64);
        for _ in 0..self.n_samples {
            let (x, pdf) = (self.sample)(sampler.as_mut());
            if pdf > T::zero() {
                (self.forward)(&x, sampler.as_mut()).backward(*grad / (pdf * n));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::VarKind;
    use crate::sampler::RandomSampler;
    use crate::{Float, Var3, Vec3};
    use approx::assert_abs_diff_eq;

    // integral of 3x^2 over [0, 1) with uniform samples
    fn uniform(sampler: &mut dyn Sampler) -> (Float, Float) {
        (sampler.get_1d(), 1.0)
    }

    #[test]
    fn test_biased_converges() {
        let mut sampler = RandomSampler::new_with_seed(1);
        let r: Var3 = integrate(
            |x: &Float, _: &mut dyn Sampler| Var3::constant(Vec3::splat(3.0 * x * x)),
            uniform,
            100_000,
            Estimator::Biased,
            &mut sampler,
        );
        assert_eq!(r.kind(), VarKind::Constant);
        assert_abs_diff_eq!(r.value().x(), 1.0, epsilon = 0.015);
    }

    #[test]
    fn test_importance_sampled_is_exact() {
        // sampling x with pdf 3x^2 makes every draw's weight exactly 1
        let mut sampler = RandomSampler::new_with_seed(2);
        let r: Var3 = integrate(
            |x: &Float, _: &mut dyn Sampler| Var3::constant(Vec3::splat(3.0 * x * x)),
            |s: &mut dyn Sampler| {
                let x = (1.0 - s.get_1d()).cbrt();
                (x, 3.0 * x * x)
            },
            16,
            Estimator::Unbiased,
            &mut sampler,
        );
        for &c in r.value().iter() {
            assert_abs_diff_eq!(c, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unbiased_gradient_replays() {
        let theta = Var3::variable(vec3!(2, 1, 0));
        let captured = theta.clone();
        let mut sampler = RandomSampler::new_with_seed(3);
        // d/dtheta of integral of theta * x over [0, 1) is 1/2
        let r = integrate(
            move |x: &Float, _: &mut dyn Sampler| &captured * *x,
            uniform,
            1,
            Estimator::Unbiased,
            &mut sampler,
        );
        assert_eq!(r.kind(), VarKind::Operation("IntegratorReplay"));

        let passes = 20_000;
        for _ in 0..passes {
            r.backward(Vec3::ones());
        }
        let mean = theta.grad().unwrap() / passes as Float;
        for &c in mean.iter() {
            assert_abs_diff_eq!(c, 0.5, epsilon = 0.01);
        }
    }

    #[test]
    fn test_biased_gradient_reuses_samples() {
        let theta = Var3::variable(vec3!(1, 1, 1));
        let captured = theta.clone();
        let mut sampler = RandomSampler::new_with_seed(4);
        let r = integrate(
            move |x: &Float, _: &mut dyn Sampler| &captured * *x,
            uniform,
            8,
            Estimator::Biased,
            &mut sampler,
        );
        r.backward(Vec3::ones());
        // value is linear in theta, so the gradient equals value / theta exactly
        let grad = theta.grad().unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(grad[i], r.value()[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_biased_many_tracked_samples() {
        let theta = Var3::variable(vec3!(1, 2, 3));
        let captured = theta.clone();
        let mut sampler = RandomSampler::new_with_seed(5);
        let r = integrate(
            move |x: &Float, _: &mut dyn Sampler| &captured * *x,
            uniform,
            200_000,
            Estimator::Biased,
            &mut sampler,
        );
        assert_eq!(r.kind(), VarKind::Operation("WeightedSum"));
        r.backward(Vec3::ones());
        let grad = theta.grad().unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(grad[i], 0.5, epsilon = 0.01);
            assert_abs_diff_eq!(r.value()[i], grad[i] * theta.value()[i], epsilon = 1e-9);
        }
        drop(r);
    }

    #[test]
    fn test_degenerate_pdf_propagates() {
        let nan_pdf = |s: &mut dyn Sampler| (s.get_1d(), Float::NAN);
        for &estimator in &[Estimator::Biased, Estimator::Unbiased] {
            let mut sampler = RandomSampler::new_with_seed(6);
            let r: Var3 = integrate(
                |x: &Float, _: &mut dyn Sampler| Var3::constant(Vec3::splat(*x)),
                nan_pdf,
                4,
                estimator,
                &mut sampler,
            );
            assert!(r.value().has_nans(), "{:?}", estimator);
        }

        let mut sampler = RandomSampler::new_with_seed(7);
        let r: Var3 = integrate(
            |_: &Float, _: &mut dyn Sampler| Var3::constant(Vec3::ones()),
            |s: &mut dyn Sampler| (s.get_1d(), 0.0),
            1,
            Estimator::Biased,
            &mut sampler,
        );
        assert!(r.value().iter().all(|c| c.is_infinite()));
    }

    #[test]
    #[should_panic]
    fn test_zero_samples_panics() {
        let mut sampler = RandomSampler::new_with_seed(0);
        let _: Var3 = integrate(
            |_: &Float, _: &mut dyn Sampler| Var3::zeros(),
            uniform,
            0,
            Estimator::Biased,
            &mut sampler,
        );
    }

    #[test]
    fn test_estimator_from_str() {
        assert_eq!("biased".parse::<Estimator>(), Ok(Estimator::Biased));
        assert_eq!("Unbiased".parse::<Estimator>(), Ok(Estimator::Unbiased));
        assert!("other".parse::<Estimator>().is_err());
    }
}
