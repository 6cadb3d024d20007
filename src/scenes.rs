//! Built-in test scenes.

use std::sync::Arc;

use crate::camera::Camera;
use crate::emitter::Emitter;
use crate::reflection::BxDF;
use crate::scene::{Primitive, Scene};
use crate::shapes::{Plane, Sphere};
use crate::{Var3, Vec3};

/// A scene with its camera and the material parameters gradients can be taken for.
pub struct CornellBox {
    pub scene: Arc<Scene>,
    pub camera: Camera,
    pub red: Var3,
    pub green: Var3,
    pub white: Var3,
    pub emission: Var3,
}

/// Box with a red left wall, a green right wall, a glossy sphere in front of a diffuse one,
/// and a spherical light under the ceiling.
pub fn cornell_box(width: usize, height: usize) -> CornellBox {
    let red = Var3::variable(vec3!(0.5, 0, 0));
    let green = Var3::variable(vec3!(0, 0.5, 0));
    let white = Var3::variable(vec3!(0.5, 0.5, 0.5));
    let emission = Var3::variable(Vec3::ones());

    let diffuse_red = BxDF::diffuse(red.clone());
    let diffuse_green = BxDF::diffuse(green.clone());
    let diffuse_white = BxDF::diffuse(white.clone());
    let specular_white = BxDF::specular(white.clone(), 30.0);

    let scene: Scene = vec![
        Primitive::new(Sphere::new(vec3!(0, 0, 3), 1.0)).with_bxdf(specular_white),
        Primitive::new(Sphere::new(vec3!(-1, 1, 4.5), 1.0)).with_bxdf(diffuse_white.clone()),
        Primitive::new(Plane::new(vec3!(-1, 0, 0), -3.0)).with_bxdf(diffuse_red),
        Primitive::new(Plane::new(vec3!(1, 0, 0.1), -3.0)).with_bxdf(diffuse_green),
        Primitive::new(Plane::new(vec3!(0, 0, -1), -6.0)).with_bxdf(diffuse_white.clone()),
        Primitive::new(Plane::new(vec3!(0, 0, 1), 0.0)).with_bxdf(diffuse_white.clone()),
        Primitive::new(Plane::new(vec3!(0, 1, 0), -3.0)).with_bxdf(diffuse_white.clone()),
        Primitive::new(Plane::new(vec3!(0, -1, 0), -3.0)).with_bxdf(diffuse_white),
        Primitive::new(Sphere::new(vec3!(0, 3, 3), 1.0)).with_emitter(Emitter::area(emission.clone())),
    ]
    .into_iter()
    .collect();

    let mut camera = Camera::new(width, height);
    camera.look_at(vec3!(1.5, 1.5, 0), vec3!(0, 0, 3), vec3!(0, 1, 0));

    CornellBox {
        scene: Arc::new(scene),
        camera,
        red,
        green,
        white,
        emission,
    }
}
