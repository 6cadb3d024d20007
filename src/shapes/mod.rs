use crate::{Float, Vec3};

pub mod plane;
pub mod sphere;

pub use plane::Plane;
pub use sphere::Sphere;

/// Closed set of primitives a scene can hold.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Plane(Plane),
    Sphere(Sphere),
}

impl Shape {
    /// Ray parameter of the nearest hit in front of `orig`, if any. `dir` is assumed to
    /// be unit length.
    pub fn intersect(&self, orig: Vec3, dir: Vec3) -> Option<Float> {
        match self {
            Shape::Plane(p) => p.intersect(orig, dir),
            Shape::Sphere(s) => s.intersect(orig, dir),
        }
    }

    pub fn normal(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Plane(p) => p.normal(point),
            Shape::Sphere(s) => s.normal(point),
        }
    }
}

impl From<Plane> for Shape {
    fn from(p: Plane) -> Self {
        Shape::Plane(p)
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}
