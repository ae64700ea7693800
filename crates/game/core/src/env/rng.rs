//! Deterministic random rolls for evasion and loot.
//!
//! Implementations must be pure: the same seed always yields the same value,
//! so battles replay identically from a saved game seed and the probability
//! laws in the test suite hold against fixed seeds.

/// RNG oracle for deterministic random number generation.
pub trait RngOracle {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll in [0, 1000). Used for permille probabilities such as evasion
    /// chance and loot drop rates.
    fn roll_permille(&self, seed: u64) -> u32 {
        self.next_u32(seed) % 1000
    }
}

/// PCG-XSH-RR generator: 32-bit output permuted from 64-bit LCG state.
///
/// Small, fast, stateless from the caller's perspective (the seed carries
/// all state), and of good statistical quality.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Mixes the game seed with a per-event nonce and a roll context so every
/// random event in a run gets an independent seed.
///
/// Use distinct `context` values when one action needs several rolls
/// (evasion check, loot entry index, and so on).
pub fn compute_seed(game_seed: u64, nonce: u64, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_value() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_ne!(rng.next_u32(42), rng.next_u32(43));
    }

    #[test]
    fn permille_stays_in_range() {
        let rng = PcgRng;
        for seed in 0..1000 {
            assert!(rng.roll_permille(seed) < 1000);
        }
    }

    #[test]
    fn dodge_frequency_tracks_the_permille_chance() {
        // 75 permille evasion over 10k independent rolls lands near 750.
        let rng = PcgRng;
        let evasion = 75;
        let dodges = (0..10_000u64)
            .filter(|&nonce| rng.roll_permille(compute_seed(7, nonce, 1)) < evasion)
            .count();
        assert!((600..=900).contains(&dodges), "observed {dodges} dodges");
    }

    #[test]
    fn compute_seed_varies_by_nonce_and_context() {
        let base = compute_seed(7, 0, 0);
        assert_ne!(base, compute_seed(7, 1, 0));
        assert_ne!(base, compute_seed(7, 0, 1));
        assert_eq!(base, compute_seed(7, 0, 0));
    }
}
