//! Seeded random stream shared by the cluster generator.
//!
//! A seed string always produces the same stream, so every catalog built from
//! it is reproducible. The stream is owned by the caller and passed down by
//! `&mut`; nothing here is global.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: &str = "0xdeadbeef^0xcafebabe";

pub struct ClusterRng {
    rng: ChaCha8Rng,
}

impl ClusterRng {
    /// Builds a stream from the two words returned by [`seed_words`].
    pub fn from_seed_str(seed: &str) -> Self {
        let (key, stream) = seed_words(seed);
        debug!("rng: seed {seed:?} -> {key:016x} {stream:016x}");
        Self::from_words(key, stream)
    }

    pub fn from_words(key: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(key);
        rng.set_stream(stream);
        ClusterRng { rng }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform draw in `0..n`.
    pub fn index(&mut self, n: usize) -> usize {
        self.rng.random_range(0..n)
    }

    /// Sum of `n` six-sided dice.
    pub fn roll_d6(&mut self, n: u32) -> u32 {
        (0..n).map(|_| self.rng.random_range(1..=6u32)).sum()
    }

    /// Scales `value` by `0.86 + 4d6/100`, a jitter in `[0.90, 1.10]` that
    /// clusters around its centre.
    pub fn vary_10pct(&mut self, value: f64) -> f64 {
        value * (0.86 + f64::from(self.roll_d6(4)) / 100.0)
    }
}

/// Hashes a seed string into two 64-bit words. The first word takes the even
/// digest bytes 0..16, the second the odd ones, both little-endian.
pub fn seed_words(seed: &str) -> (u64, u64) {
    let digest = Sha256::digest(seed.as_bytes());
    let mut even = 0u64;
    let mut odd = 0u64;
    for i in 0..8 {
        even |= u64::from(digest[2 * i]) << (8 * i);
        odd |= u64::from(digest[2 * i + 1]) << (8 * i);
    }
    (even, odd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = ClusterRng::from_seed_str("test-seed-1");
        let mut b = ClusterRng::from_seed_str("test-seed-1");
        for _ in 0..32 {
            assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = ClusterRng::from_seed_str("alpha");
        let mut b = ClusterRng::from_seed_str("beta");
        let da: Vec<u64> = (0..8).map(|_| a.uniform().to_bits()).collect();
        let db: Vec<u64> = (0..8).map(|_| b.uniform().to_bits()).collect();
        assert_ne!(da, db);
    }

    #[test]
    fn seed_words_interleave_digest_bytes() {
        let digest = Sha256::digest(b"abc");
        let (even, odd) = seed_words("abc");
        assert_eq!(even & 0xff, u64::from(digest[0]));
        assert_eq!(odd & 0xff, u64::from(digest[1]));
        assert_eq!(even >> 56, u64::from(digest[14]));
        assert_eq!(odd >> 56, u64::from(digest[15]));
    }

    #[test]
    fn dice_stay_in_range() {
        let mut rng = ClusterRng::from_seed_str(DEFAULT_SEED);
        for _ in 0..500 {
            let roll = rng.roll_d6(4);
            assert!((4..=24).contains(&roll));
            let varied = rng.vary_10pct(100.0);
            assert!((90.0 - 1e-9..=110.0 + 1e-9).contains(&varied));
        }
    }
}
