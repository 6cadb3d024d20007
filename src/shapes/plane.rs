use crate::{Float, Vec3};

/// All points `x` with `dot(x, normal) == offset`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    normal: Vec3,
    offset: Float,
}

impl Plane {
    pub fn new(normal: Vec3, offset: Float) -> Self {
        Self { normal, offset }
    }

    pub fn intersect(&self, orig: Vec3, dir: Vec3) -> Option<Float> {
        let height = orig.dot(&self.normal) - self.offset;
        let t = height / dir.dot(&-self.normal);
        // also rejects NaN from rays parallel to the plane
        if t > 0.0 { Some(t) } else { None }
    }

    pub fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }
}
