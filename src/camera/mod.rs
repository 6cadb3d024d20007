use crate::sampler::Sampler;
use crate::{Float, Vec3};

/// Default vertical field of view, roughly 80 degrees.
pub const DEFAULT_VFOV: Float = 1.3963;

/// Pinhole camera. Pixel row 0 is the top of the image.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    width: usize,
    height: usize,
    vfov: Float,
    eye: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            vfov: DEFAULT_VFOV,
            eye: Vec3::zeros(),
            forward: vec3!(0, 0, -1),
            right: vec3!(1, 0, 0),
            up: vec3!(0, 1, 0),
        }
    }

    pub fn with_vfov(mut self, vfov: Float) -> Self {
        self.vfov = vfov;
        self
    }

    pub fn look_at(&mut self, eye: Vec3, at: Vec3, up: Vec3) {
        self.eye = eye;
        self.forward = (at - eye).normalize();
        self.right = self.forward.cross(&up).normalize();
        self.up = self.right.cross(&self.forward);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn aspect(&self) -> Float {
        self.width as Float / self.height as Float
    }

    /// Jittered unit direction through pixel `(x, y)`. The pdf is always 1.
    pub fn sample(&self, x: usize, y: usize, sampler: &mut dyn Sampler) -> (Vec3, Float) {
        let (u, v) = sampler.get_2d();
        let s = (x as Float + u) / self.width as Float;
        let t = (y as Float + v) / self.height as Float;
        let half_height = (self.vfov / 2.0).tan();

        let dir = self.forward
            + self.right * ((2.0 * s - 1.0) * self.aspect() * half_height)
            - self.up * ((2.0 * t - 1.0) * half_height);
        (dir.normalize(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::RandomSampler;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_look_at_frame() {
        let mut cam = Camera::new(4, 3);
        cam.look_at(vec3!(1.5, 1.5, 0), vec3!(0, 0, 3), vec3!(0, 1, 0));
        assert_relative_eq!(cam.forward.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cam.up.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cam.forward.dot(&cam.right), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cam.forward.dot(&cam.up), 0.0, epsilon = 1e-12);
        assert!(cam.up.y() > 0.0);
        assert_eq!(cam.eye(), vec3!(1.5, 1.5, 0));
    }

    #[test]
    fn test_sample_stays_inside_frustum() {
        let cam = Camera::new(2, 2).with_vfov(std::f64::consts::FRAC_PI_2);
        let mut sampler = RandomSampler::new_with_seed(11);
        for _ in 0..100 {
            // top-left pixel looks up and to the left
            let (dir, pdf) = cam.sample(0, 0, &mut sampler);
            assert_eq!(pdf, 1.0);
            assert_relative_eq!(dir.norm(), 1.0, epsilon = 1e-12);
            assert!(dir.x() <= 0.0 && dir.y() >= 0.0 && dir.z() < 0.0);
            // a 90 degree fov square image spans [-1, 1] at unit distance
            assert!(dir.x().abs() <= -dir.z() + 1e-12);
        }
    }
}
