//! # Seeded Gradient Noise
//!
//! 2D simplex noise for height fields. The permutation table is shuffled
//! by a ChaCha stream, so a seed gives identical output on every platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed for every deterministic generator in this crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NoiseSeed(u64);

impl NoiseSeed {
    /// Creates a seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Raw value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Independent sub-seed for another generator, so two generators fed
    /// from one seed do not produce correlated output.
    #[inline]
    #[must_use]
    pub const fn derive(self, stream: u64) -> Self {
        // splitmix64 finalizer
        let mut z = self.0 ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        Self(z ^ (z >> 31))
    }

    /// ChaCha RNG seeded from this value.
    #[must_use]
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}

/// Eight gradient directions: axes and diagonals.
const GRADIENTS: [[f32; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
];

/// (sqrt(3) - 1) / 2
const SKEW: f32 = 0.366_025_42;
/// (3 - sqrt(3)) / 6
const UNSKEW: f32 = 0.211_324_87;
/// Brings the summed corner contributions to roughly [-1, 1].
const OUTPUT_SCALE: f32 = 70.0;

/// 2D simplex noise in [-1, 1].
#[derive(Clone, Debug)]
pub struct SimplexNoise {
    /// Shuffled 0..256, stored twice so lookups never wrap.
    perm: [u8; 512],
}

impl SimplexNoise {
    /// Builds the permutation table for `seed`.
    #[must_use]
    pub fn new(seed: NoiseSeed) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = u8::try_from(i).unwrap_or(u8::MAX);
        }

        let mut rng = seed.rng();
        for i in (1..table.len()).rev() {
            let j = rng.gen_range(0..=i);
            table.swap(i, j);
        }

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&table);
        perm[256..].copy_from_slice(&table);
        Self { perm }
    }

    #[inline]
    fn hash(&self, i: usize, j: usize) -> usize {
        usize::from(self.perm[i + usize::from(self.perm[j])])
    }

    /// One octave at (x, z).
    #[must_use]
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let s = (x + z) * SKEW;
        let i = (x + s).floor();
        let j = (z + s).floor();
        let t = (i + j) * UNSKEW;
        let x0 = x - (i - t);
        let z0 = z - (j - t);

        let (i1, j1) = if x0 > z0 { (1, 0) } else { (0, 1) };
        let x1 = x0 - i1 as f32 + UNSKEW;
        let z1 = z0 - j1 as f32 + UNSKEW;
        let x2 = x0 - 1.0 + 2.0 * UNSKEW;
        let z2 = z0 - 1.0 + 2.0 * UNSKEW;

        // rem_euclid keeps negative lattice coordinates in 0..256
        let ii = (i as i64).rem_euclid(256) as usize;
        let jj = (j as i64).rem_euclid(256) as usize;

        let n0 = corner(x0, z0, self.hash(ii, jj));
        let n1 = corner(x1, z1, self.hash(ii + i1, jj + j1));
        let n2 = corner(x2, z2, self.hash(ii + 1, jj + 1));

        (OUTPUT_SCALE * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Sum of `octaves` layers, each at double the frequency and half the
    /// amplitude of the last, normalized back to [-1, 1].
    #[must_use]
    pub fn fractal(&self, x: f32, z: f32, octaves: u32) -> f32 {
        let mut total = 0.0;
        let mut norm = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        for _ in 0..octaves.max(1) {
            total += self.sample(x * frequency, z * frequency) * amplitude;
            norm += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        total / norm
    }
}

#[inline]
fn corner(x: f32, z: f32, hash: usize) -> f32 {
    let falloff = 0.5 - x * x - z * z;
    if falloff <= 0.0 {
        return 0.0;
    }
    let [gx, gz] = GRADIENTS[hash % GRADIENTS.len()];
    let f2 = falloff * falloff;
    f2 * f2 * (gx * x + gz * z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_noise() {
        let a = SimplexNoise::new(NoiseSeed::new(99));
        let b = SimplexNoise::new(NoiseSeed::new(99));
        for i in 0..200 {
            let x = i as f32 * 0.37 - 30.0;
            let z = i as f32 * 0.11 + 4.0;
            assert_eq!(a.sample(x, z), b.sample(x, z));
        }
    }

    #[test]
    fn test_seeds_differ() {
        let a = SimplexNoise::new(NoiseSeed::new(1));
        let b = SimplexNoise::new(NoiseSeed::new(2));
        let differs = (0..64).any(|i| {
            let x = i as f32 * 0.7 + 0.3;
            a.sample(x, x * 0.5) != b.sample(x, x * 0.5)
        });
        assert!(differs);
    }

    #[test]
    fn test_range() {
        let noise = SimplexNoise::new(NoiseSeed::default());
        for i in -100..100 {
            for j in -10..10 {
                let v = noise.fractal(i as f32 * 0.13, j as f32 * 0.29, 4);
                assert!((-1.0..=1.0).contains(&v), "{v} out of range");
            }
        }
    }

    #[test]
    fn test_lattice_points_are_zero() {
        // Nearest corner has zero offset; the other two are out of reach
        let noise = SimplexNoise::new(NoiseSeed::new(7));
        assert_eq!(noise.sample(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_derive_is_stable() {
        let seed = NoiseSeed::new(42);
        assert_eq!(seed.derive(1), seed.derive(1));
        assert_ne!(seed.derive(1), seed.derive(2));
        assert_ne!(seed.derive(1), seed);
    }
}
