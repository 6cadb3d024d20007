#[macro_use] pub mod macros; // must stay at the top
pub mod math;
pub mod vector;
pub mod autograd;
pub mod sampler;
pub mod reflection;
pub mod emitter;
pub mod shapes;
pub mod scene;
pub mod camera;
pub mod integrator;
pub mod film;
pub mod imageio;
pub mod renderer;
pub mod scenes;

pub use vector::{Vector, VectorError};
pub use autograd::{Var, GradError};
pub use math::*;

use num::traits::NumAssignOps;
use std::fmt::{Debug, Display};

pub type Float = f64;

pub type Vec3 = Vector<Float, 3>;
pub type Var3 = Var<Float, 3>;

/// Scalar element type of [`Vector`] and [`Var`].
pub trait Scalar: num::Float + NumAssignOps + Default + Debug + Display + Send + Sync + 'static {
    /// Converts an `f64` constant into this scalar type.
    fn cast(v: f64) -> Self;
}

impl Scalar for f32 {
    fn cast(v: f64) -> Self {
        v as f32
    }
}

impl Scalar for f64 {
    fn cast(v: f64) -> Self {
        v
    }
}
