#![allow(dead_code)]

use std::sync::Arc;

use drt::emitter::Emitter;
use drt::reflection::BxDF;
use drt::scene::{Primitive, Scene};
use drt::shapes::{Plane, Sphere};
use drt::{vec3, Var3, Vec3};

/// Diffuse floor at `y = -1` under an emitting dome that encloses everything. Light
/// reflected by the floor is exactly `albedo * emission`.
pub fn dome(albedo: Var3, emission: Var3) -> Arc<Scene> {
    let mut scene = Scene::new();
    scene.push(Primitive::new(Plane::new(vec3!(0, 1, 0), -1.0)).with_bxdf(BxDF::diffuse(albedo)));
    scene.push(Primitive::new(Sphere::new(Vec3::zeros(), 100.0)).with_emitter(Emitter::area(emission)));
    Arc::new(scene)
}

/// Two diffuse surfaces of the same albedo under the dome, so paths bounce several times.
pub fn dome_with_ball(albedo: Var3) -> Arc<Scene> {
    let mut scene = Scene::new();
    scene.push(Primitive::new(Plane::new(vec3!(0, 1, 0), -1.0)).with_bxdf(BxDF::diffuse(albedo.clone())));
    scene.push(Primitive::new(Sphere::new(vec3!(0, 0, -3), 1.0)).with_bxdf(BxDF::diffuse(albedo)));
    scene.push(Primitive::new(Sphere::new(Vec3::zeros(), 100.0)).with_emitter(Emitter::area(vec3!(1, 0.8, 0.6))));
    Arc::new(scene)
}
