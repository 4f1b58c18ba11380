//! Opening turn order.

use crate::combatant::Side;
use crate::rng::Dice;

/// Opening initiative scores, rolled once per encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Initiative {
    pub hero: u32,
    pub foe: u32,
}

impl Initiative {
    /// Each side adds a draw from `[1, max(speed_hero, speed_foe)]` to its
    /// speed. The range degenerates to `[1, 1]` when both speeds are zero.
    pub fn roll(hero_speed: u32, foe_speed: u32, dice: &mut Dice<'_>) -> Self {
        let ceiling = hero_speed.max(foe_speed).max(1);
        let hero = hero_speed.saturating_add(dice.roll(1, ceiling));
        let foe = foe_speed.saturating_add(dice.roll(1, ceiling));
        Self { hero, foe }
    }

    /// Side that moves first. Ties favor the hero.
    pub fn first(&self) -> Side {
        if self.hero >= self.foe {
            Side::Hero
        } else {
            Side::Foe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{PcgRng, RngOracle};

    /// Oracle whose raw output is always the same value.
    struct Constant(u32);

    impl RngOracle for Constant {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    #[test]
    fn zero_speeds_degenerate_to_single_value_range() {
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 5);
        let initiative = Initiative::roll(0, 0, &mut dice);
        assert_eq!(initiative, Initiative { hero: 1, foe: 1 });
        assert_eq!(initiative.first(), Side::Hero);
    }

    #[test]
    fn equal_draws_let_speed_decide() {
        let rng = Constant(0);
        let mut dice = Dice::new(&rng, 0);
        let initiative = Initiative::roll(3, 9, &mut dice);
        assert_eq!(initiative, Initiative { hero: 4, foe: 10 });
        assert_eq!(initiative.first(), Side::Foe);
    }

    #[test]
    fn same_seed_same_order() {
        let rng = PcgRng;
        for seed in 0..32 {
            let a = Initiative::roll(6, 7, &mut Dice::new(&rng, seed));
            let b = Initiative::roll(6, 7, &mut Dice::new(&rng, seed));
            assert_eq!(a, b);
        }
    }
}
