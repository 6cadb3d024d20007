use crate::sampler::Sampler;
use crate::vector::reflect;
use crate::{Float, Var3, Vec3, INV_PI, PI};

/// Orthonormal shading frame with the surface normal as its local `z` axis.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub normal: Vec3,
}

impl Frame {
    /// Builds a frame around `normal`, seeding the tangent with whichever of the `x`/`y`
    /// axes is further from parallel to it.
    pub fn from_normal(normal: Vec3) -> Self {
        let e1 = vec3!(1, 0, 0);
        let e2 = vec3!(0, 1, 0);
        let seed = if e1.dot(&normal).abs() < e2.dot(&normal).abs() { e1 } else { e2 };
        let tangent = (seed - normal * seed.dot(&normal)).normalize();
        let bitangent = normal.cross(&tangent).normalize();
        Self { tangent, bitangent, normal }
    }

    pub fn local_to_world(&self, v: Vec3) -> Vec3 {
        self.tangent * v.x() + self.bitangent * v.y() + self.normal * v.z()
    }

    /// Direction at polar angle `theta` from the normal and azimuth `phi` around it.
    pub fn angle_to_dir(&self, theta: Float, phi: Float) -> Vec3 {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        self.local_to_world(vec3!(cos_phi * sin_theta, sin_phi * sin_theta, cos_theta))
    }
}

/// Scattering function of a surface.
///
/// `dir_in` always points away from the surface, back along the ray that arrived, and
/// `dir_out` is the direction light is gathered from.
#[derive(Debug, Clone)]
pub enum BxDF {
    /// Lambertian reflector.
    Diffuse { color: Var3 },
    /// Phong-like glossy lobe around the half vector.
    Specular { color: Var3, exponent: Float },
    /// Perfect mirror. Its weight is only meaningful together with its own `sample`.
    Mirror,
}

impl BxDF {
    pub fn diffuse(color: impl Into<Var3>) -> Self {
        BxDF::Diffuse { color: color.into() }
    }

    pub fn specular(color: impl Into<Var3>, exponent: Float) -> Self {
        BxDF::Specular { color: color.into(), exponent }
    }

    pub fn evaluate(&self, normal: Vec3, dir_in: Vec3, dir_out: Vec3) -> Var3 {
        match self {
            BxDF::Diffuse { color } => color * INV_PI,
            BxDF::Specular { color, exponent } => {
                let halfway = (dir_in + dir_out).normalize();
                let cos_theta = normal.dot(&halfway).max(0.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
                let factor = (exponent + 2.0) / (2.0 * PI) * cos_theta.powf(*exponent) * sin_theta;
                color * factor
            }
            BxDF::Mirror => Var3::constant(Vec3::splat(1.0 / normal.dot(&dir_out))),
        }
    }

    /// Draws `dir_out` proportionally to this lobe and returns it with its density.
    pub fn sample(&self, normal: Vec3, dir_in: Vec3, sampler: &mut dyn Sampler) -> (Vec3, Float) {
        match self {
            BxDF::Diffuse { .. } => {
                let (u1, u2) = sampler.get_2d();
                let theta = u1.sqrt().asin();
                let phi = 2.0 * PI * u2;
                let dir = Frame::from_normal(normal).angle_to_dir(theta, phi);
                (dir, theta.cos() * INV_PI)
            }
            BxDF::Specular { exponent, .. } => {
                let (u1, u2) = sampler.get_2d();
                let theta = u1.powf(1.0 / (exponent + 2.0)).acos();
                let phi = 2.0 * PI * u2;
                let mut halfway = Frame::from_normal(normal).angle_to_dir(theta, phi);
                if halfway.dot(&dir_in) < 0.0 {
                    halfway = reflect(halfway, normal);
                }
                let dir = reflect(dir_in, halfway);
                let pdf = (exponent + 2.0) / (2.0 * PI)
                    * theta.cos().powf(exponent + 1.0)
                    * theta.sin();
                (dir, pdf)
            }
            BxDF::Mirror => (reflect(dir_in, normal), 1.0),
        }
    }
}

/// Weight of an optional BxDF; a missing one scatters nothing.
pub fn evaluate(bxdf: Option<&BxDF>, normal: Vec3, dir_in: Vec3, dir_out: Vec3) -> Var3 {
    match bxdf {
        Some(bxdf) => bxdf.evaluate(normal, dir_in, dir_out),
        None => Var3::zeros(),
    }
}

pub fn sample(bxdf: Option<&BxDF>, normal: Vec3, dir_in: Vec3, sampler: &mut dyn Sampler) -> (Vec3, Float) {
    match bxdf {
        Some(bxdf) => bxdf.sample(normal, dir_in, sampler),
        None => (Vec3::zeros(), 1.0),
    }
}
