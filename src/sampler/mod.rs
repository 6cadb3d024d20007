use crate::Float;

pub mod random;

pub use random::RandomSampler;

/// Source of uniform samples in `[0, 1)`, passed explicitly to everything that draws
/// random numbers.
pub trait Sampler: Sync + Send {
    fn get_1d(&mut self) -> Float;

    fn get_2d(&mut self) -> (Float, Float) {
        let u = self.get_1d();
        let v = self.get_1d();
        (u, v)
    }

    /// Splits off an independent stream, advancing this one.
    fn fork(&mut self) -> Box<dyn Sampler>;

    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler>;
}

/// Mixes a base seed with pixel coordinates so every pixel gets its own stream no matter
/// which worker renders it.
pub fn pixel_seed(seed: u64, x: usize, y: usize) -> u64 {
    let mut z = seed
        ^ (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    // splitmix64 finalizer
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
