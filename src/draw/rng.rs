//! Random sources for winner selection. [Rng] is SplitMix64: fast, decent statistical
//! quality, deterministic for a given seed. Not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// Anything that can drive a draw. Implementors only need [RandomSource::next_u64].
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u64) -> u64 {
        if bound <= 1 {
            return 0;
        }
        // Reject the low 2^64 mod bound values so every residue is equally likely.
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let value = self.next_u64();
            if value >= threshold {
                return value % bound;
            }
        }
    }

    /// Uniform sample of `min(count, pool.len())` distinct elements without replacement.
    /// The pool is left untouched; order of the sample is random.
    fn sample<T: Clone>(&mut self, pool: &[T], count: usize) -> Vec<T>
    where
        Self: Sized,
    {
        let take = count.min(pool.len());
        if take == 0 {
            return Vec::new();
        }
        let mut indices: Vec<usize> = (0..pool.len()).collect();
        for i in 0..take {
            let j = i + self.below((pool.len() - i) as u64) as usize;
            indices.swap(i, j);
        }
        indices[..take].iter().map(|&i| pool[i].clone()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds from OS entropy. Falls back to the clock if the OS source is unavailable.
    pub fn from_entropy() -> Self {
        let mut buf = [0u8; 8];
        let seed = match getrandom::getrandom(&mut buf) {
            Ok(()) => u64::from_le_bytes(buf),
            Err(_) => std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or(SPLITMIX64_GOLDEN),
        };
        Self::new(seed)
    }
}

impl RandomSource for Rng {
    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn splitmix64_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn splitmix64_different_seeds_differ() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = Rng::new(99);
        for bound in [1u64, 2, 3, 7, 1000] {
            for _ in 0..200 {
                assert!(rng.below(bound) < bound);
            }
        }
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn sample_is_distinct_subset_and_leaves_pool_alone() {
        let pool: Vec<u32> = (0..50).collect();
        let before = pool.clone();
        let mut rng = Rng::new(3);
        let picked = rng.sample(&pool, 10);

        assert_eq!(picked.len(), 10);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 10);
        assert!(picked.iter().all(|v| pool.contains(v)));
        assert_eq!(pool, before);
    }

    #[test]
    fn sample_caps_at_pool_size_and_handles_empty() {
        let mut rng = Rng::new(5);
        assert_eq!(rng.sample(&[1, 2, 3], 10).len(), 3);
        assert!(rng.sample::<u8>(&[], 4).is_empty());
        assert!(rng.sample(&[1, 2, 3], 0).is_empty());
    }

    #[test]
    fn sample_reaches_every_element() {
        let pool: Vec<u32> = (0..5).collect();
        let mut rng = Rng::new(11);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.extend(rng.sample(&pool, 1));
        }
        assert_eq!(seen.len(), pool.len());
    }
}
