use crate::math::quadratic;
use crate::{Float, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Vec3,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Vec3, radius: Float) -> Self {
        Self { center, radius }
    }

    pub fn intersect(&self, orig: Vec3, dir: Vec3) -> Option<Float> {
        let oc = orig - self.center;
        let b = 2.0 * oc.dot(&dir);
        let c = oc.norm_squared() - self.radius * self.radius;
        let (t0, t1) = quadratic(1.0, b, c)?;

        if t0 > 0.0 {
            Some(t0)
        } else if t1 > 0.0 {
            // origin inside the sphere
            Some(t1)
        } else {
            None
        }
    }

    pub fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }
}
