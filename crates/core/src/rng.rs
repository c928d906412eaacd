//! RNG module - deterministic random source for fills and reshuffles
//!
//! A simple LCG keeps every board reproducible from its seed, which matters for
//! tests, benches and replaying an autoplay run.

use crate::types::TileColor;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits of the LCG output; the low bits of a power-of-two LCG
    /// cycle with a very short period (bit 0 simply alternates).
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Random index into a collection of `len` items
    pub fn index(&mut self, len: usize) -> usize {
        self.next_range(len as u32) as usize
    }

    /// Pick a random color from the palette
    pub fn pick(&mut self, palette: &[TileColor]) -> Option<TileColor> {
        if palette.is_empty() {
            return None;
        }
        Some(palette[self.index(palette.len())])
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_not_stuck() {
        let mut rng = SimpleRng::new(0);
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..20u32 {
            for _ in 0..50 {
                assert!(rng.next_range(max) < max);
            }
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_next_range_two_values_do_not_alternate() {
        // Low-bit LCG output would produce a strict 0,1,0,1 pattern here.
        let mut rng = SimpleRng::new(99);
        let draws: Vec<u32> = (0..32).map(|_| rng.next_range(2)).collect();
        let alternating = draws.windows(2).all(|w| w[0] != w[1]);
        assert!(!alternating);
        assert!(draws.contains(&0) && draws.contains(&1));
    }

    #[test]
    fn test_pick_from_palette() {
        let palette: Vec<TileColor> = "ABC".chars().filter_map(TileColor::from_char).collect();
        let mut rng = SimpleRng::new(3);
        for _ in 0..30 {
            let c = rng.pick(&palette).unwrap();
            assert!(palette.contains(&c));
        }
        assert_eq!(rng.pick(&[]), None);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SimpleRng::new(42);
        let mut values: Vec<u32> = (0..10).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }
}
