//! RNG oracle for deterministic random number generation.
//!
//! Every source of randomness in a fight (turn order, damage variance, AI
//! choice, evasion rolls) is drawn through one injected [`RngOracle`]. Given
//! the same seed the same fight replays exactly, which is what the tests rely
//! on.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32(seed)) % span) as u32
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Compute a deterministic seed for one draw.
///
/// * `game_seed` - base seed chosen when the session starts
/// * `nonce` - draw counter, advanced after every draw
/// * `stream` - separates independent consumers sharing one game seed
pub fn compute_seed(game_seed: u64, nonce: u64, stream: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

// ============================================================================
// Dice
// ============================================================================

/// Stateful draw cursor over an [`RngOracle`].
pub struct Dice<'r> {
    oracle: &'r dyn RngOracle,
    seed: u64,
    stream: u32,
    nonce: u64,
}

impl<'r> Dice<'r> {
    pub fn new(oracle: &'r dyn RngOracle, seed: u64) -> Self {
        Self {
            oracle,
            seed,
            stream: 0,
            nonce: 0,
        }
    }

    #[must_use]
    pub fn with_stream(mut self, stream: u32) -> Self {
        self.stream = stream;
        self
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> u64 {
        self.nonce
    }

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.seed, self.nonce, self.stream);
        self.nonce += 1;
        seed
    }

    /// Uniform value in `[min, max]`; returns `min` when the range is empty.
    pub fn roll(&mut self, min: u32, max: u32) -> u32 {
        let seed = self.next_seed();
        self.oracle.range(seed, min, max)
    }

    pub fn roll_d100(&mut self) -> u32 {
        let seed = self.next_seed();
        self.oracle.roll_d100(seed)
    }

    /// True with `percent` percent probability.
    pub fn chance(&mut self, percent: u32) -> bool {
        self.roll_d100() <= percent
    }

    /// `base` varied uniformly by up to `percent` percent in either direction,
    /// never below 1 when `base` is positive.
    pub fn vary(&mut self, base: u32, percent: u32) -> u32 {
        if base == 0 {
            return 0;
        }
        let spread = base.saturating_mul(percent) / 100;
        self.roll(base.saturating_sub(spread), base.saturating_add(spread))
            .max(1)
    }

    /// Index drawn proportionally to `weights`; `None` when all are zero.
    ///
    /// Totals beyond `u32::MAX` draw their ticket from `[1, u32::MAX]`.
    pub fn pick_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().copied().map(u64::from).sum();
        if total == 0 {
            return None;
        }
        let ceiling = u32::try_from(total).unwrap_or(u32::MAX);
        let mut ticket = u64::from(self.roll(1, ceiling));
        for (index, weight) in weights.iter().copied().map(u64::from).enumerate() {
            if ticket <= weight {
                return Some(index);
            }
            ticket -= weight;
        }
        None
    }
}

impl std::fmt::Debug for Dice<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dice")
            .field("seed", &self.seed)
            .field("stream", &self.stream)
            .field("nonce", &self.nonce)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_ne!(rng.next_u32(42), rng.next_u32(43));
    }

    #[test]
    fn same_seed_replays_the_same_draws() {
        let rng = PcgRng;
        let mut first = Dice::new(&rng, 7);
        let mut second = Dice::new(&rng, 7);
        let a: Vec<_> = (0..16).map(|_| first.roll(1, 20)).collect();
        let b: Vec<_> = (0..16).map(|_| second.roll(1, 20)).collect();
        assert_eq!(a, b);
        assert_eq!(first.draws(), 16);
    }

    #[test]
    fn degenerate_range_returns_min() {
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 1);
        assert_eq!(dice.roll(1, 1), 1);
        assert_eq!(dice.roll(5, 3), 5);
    }

    #[test]
    fn vary_stays_within_spread() {
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 99);
        for _ in 0..200 {
            let value = dice.vary(100, 8);
            assert!((92..=108).contains(&value), "value={value}");
        }
        assert_eq!(dice.vary(0, 50), 0);
    }

    #[test]
    fn weighted_pick_skips_zero_weights() {
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 3);
        for _ in 0..50 {
            assert_eq!(dice.pick_weighted(&[0, 5, 0]), Some(1));
        }
        assert_eq!(dice.pick_weighted(&[0, 0]), None);
    }

    #[test]
    fn full_width_range_does_not_overflow() {
        let rng = PcgRng;
        for seed in 0..32 {
            let value = rng.range(seed, 0, u32::MAX);
            assert_eq!(value, rng.next_u32(seed));
        }
        assert!(rng.range(5, u32::MAX - 1, u32::MAX) >= u32::MAX - 1);
    }

    #[test]
    fn huge_weights_do_not_overflow() {
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 11);
        for _ in 0..50 {
            let pick = dice.pick_weighted(&[u32::MAX, u32::MAX, 0]);
            assert!(matches!(pick, Some(0 | 1)), "pick={pick:?}");
        }
    }
}
