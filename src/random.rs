//! Randomization primitives for the fallback pass.
//!
//! The fallback pass shuffles the program list with a Fisher–Yates pass
//! driven by a deliberately simple seeded generator: the fractional part
//! of `sin(seed) * 10000`, incrementing the seed by one per draw. The
//! formula is not uniform in any rigorous sense, but shuffle outcomes are
//! a stable function of the seed, which is what reproducible runs and
//! cross-port golden files depend on. Do not swap it for a library PRNG.
//!
//! Seeds for individual shuffle calls — and the uniform picks used by the
//! escape valve — come from a [`RandomSource`], a small wrapper around
//! `SmallRng` that is either OS-seeded or derived from one caller-supplied
//! `u64`, making an entire multi-trial run reproducible from a single
//! number.
//!
//! # Reference
//! Knuth (1997), "The Art of Computer Programming", Vol. 2, 3.4.2

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// One draw of the seeded generator: `frac(sin(seed) * 10000)`.
///
/// Always in `[0.0, 1.0)`.
#[inline]
pub fn frac_sin(seed: f64) -> f64 {
    let x = seed.sin() * 10000.0;
    x - x.floor()
}

/// Fisher–Yates shuffle driven by [`frac_sin`].
///
/// The seed advances by exactly one per draw, so two calls with the same
/// seed and same-length input produce the same permutation.
pub fn shuffle<T>(items: &mut [T], mut seed: f64) {
    let mut current = items.len();
    while current != 0 {
        let picked = (frac_sin(seed) * current as f64).floor() as usize;
        current -= 1;
        seed += 1.0;
        items.swap(current, picked);
    }
}

/// Source of shuffle seeds and uniform indices for one engine run.
///
/// Wraps `SmallRng` so the engine never touches a global RNG: a request
/// carrying a seed gets bit-identical shuffles and escape-valve picks on
/// every run, and concurrent requests cannot observe each other.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: SmallRng,
}

impl RandomSource {
    /// Creates a source producing a reproducible stream.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Creates an OS-seeded source.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Seed for one [`shuffle`] call, in `[0.0, 1.0)`.
    pub fn next_shuffle_seed(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform index into a collection of `len` elements.
    ///
    /// # Panics
    /// Panics if `len` is zero.
    pub fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frac_sin_known_value() {
        // sin(1) * 10000 = 8414.709848078965 → fractional part
        assert!((frac_sin(1.0) - 0.709_848_078_965).abs() < 1e-9);
        let r = frac_sin(42.0);
        assert!((0.0..1.0).contains(&r));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, 0.37);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_deterministic_per_seed() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b: Vec<u32> = (0..20).collect();
        shuffle(&mut a, 3.5);
        shuffle(&mut b, 3.5);
        assert_eq!(a, b);

        let mut c: Vec<u32> = (0..20).collect();
        shuffle(&mut c, 4.5);
        assert_ne!(a, c);
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut empty: Vec<u32> = vec![];
        shuffle(&mut empty, 1.0);
        assert!(empty.is_empty());

        let mut one = vec![7];
        shuffle(&mut one, 1.0);
        assert_eq!(one, vec![7]);
    }

    #[test]
    fn test_source_reproducible() {
        let mut a = RandomSource::from_seed(99);
        let mut b = RandomSource::from_seed(99);
        for _ in 0..10 {
            assert_eq!(a.next_shuffle_seed().to_bits(), b.next_shuffle_seed().to_bits());
            assert_eq!(a.pick(17), b.pick(17));
        }
    }

    #[test]
    fn test_source_pick_in_range() {
        let mut source = RandomSource::from_entropy();
        for _ in 0..100 {
            assert!(source.pick(5) < 5);
        }
    }
}
