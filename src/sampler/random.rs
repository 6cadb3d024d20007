use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use crate::Float;
use crate::sampler::Sampler;

#[derive(Clone, Debug)]
pub struct RandomSampler {
    rng: Xoshiro256Plus,
}

impl RandomSampler {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256Plus::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn get_1d(&mut self) -> Float {
        self.rng.gen()
    }

    fn fork(&mut self) -> Box<dyn Sampler> {
        Box::new(Self::new_with_seed(self.rng.gen()))
    }

    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler> {
        Box::new(Self::new_with_seed(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::pixel_seed;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = RandomSampler::new_with_seed(7);
        let mut b = RandomSampler::new_with_seed(7);
        for _ in 0..16 {
            assert_eq!(a.get_1d(), b.get_1d());
        }
    }

    #[test]
    fn test_samples_in_unit_interval() {
        let mut s = RandomSampler::new_with_seed(1);
        for _ in 0..1000 {
            let (u, v) = s.get_2d();
            assert!((0.0..1.0).contains(&u));
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_fork_is_independent_of_parent() {
        let mut parent = RandomSampler::new_with_seed(3);
        let mut child = parent.fork();
        let a: Vec<Float> = (0..8).map(|_| parent.get_1d()).collect();
        let b: Vec<Float> = (0..8).map(|_| child.get_1d()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_pixel_seeds_differ() {
        assert_ne!(pixel_seed(0, 1, 0), pixel_seed(0, 0, 1));
        assert_ne!(pixel_seed(0, 2, 3), pixel_seed(1, 2, 3));
        assert_eq!(pixel_seed(5, 2, 3), pixel_seed(5, 2, 3));
    }
}
