//! Combat formulas. Each draws from the RNG in a fixed order so a given
//! sequence always produces the same fight.

use crate::{math, rng::Random};

/// Outcome of a physical attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hit {
    Damage(u8),
    /// The roll came out at zero.
    Missed,
    /// The defender's evasion check succeeded before any roll.
    Dodged,
}

/// Damage of a normal blow. Zero means a miss.
///
/// With `power = attack - defense / 2`, a weak attacker (`power < 2`) has an
/// even chance of landing a single point. Otherwise the blow does
/// `((power + 1) * rnd) / 1024 + power / 4`, roughly a quarter to half of the
/// attacker's power.
pub fn physical_damage(attack: u8, defense: u8, rng: &mut dyn Random) -> u8 {
    let power = i16::from(attack) - i16::from(defense / 2);
    if power < 2 {
        return if rng.one_in(1) { 1 } else { 0 };
    }
    let power = power as u16;
    let roll = math::scale(power + 1, rng.next_u8(), 10);
    (roll + power / 4).min(u16::from(u8::MAX)) as u8
}

/// One chance in 32 for the hero to land an excellent move.
pub fn excellent_move(rng: &mut dyn Random) -> bool {
    rng.one_in(0x1F)
}

/// Damage of an excellent move: the attack value minus up to half of it.
pub fn excellent_damage(attack: u8, rng: &mut dyn Random) -> u8 {
    let cut = math::scale(u16::from(attack / 2), rng.next_u8(), 8) as u8;
    attack - cut
}

/// Evasion check against the defender's dodge nibble (chance x/64).
pub fn dodges(dodge: u8, rng: &mut dyn Random) -> bool {
    rng.masked(0x3F) < dodge
}

/// Speed contest before the first turn. True when the enemy acts first.
pub fn enemy_preempts(agility: u8, enemy_defense: u8, rng: &mut dyn Random) -> bool {
    let hero = math::mul8x8(agility, rng.next_u8());
    let enemy = math::mul8x8(enemy_defense, rng.next_u8()) / 4;
    hero < enemy
}

/// Run contest. `scale` is the species' flee tier in eighths.
pub fn flee_succeeds(agility: u8, enemy_defense: u8, scale: u8, rng: &mut dyn Random) -> bool {
    let hero = u32::from(math::mul8x8(agility, rng.next_u8()));
    let enemy = u32::from(math::mul8x8(enemy_defense, rng.next_u8())) * u32::from(scale) / 8;
    hero > enemy
}

/// Resistance check for sleep, stopspell and hurt spells.
///
/// The spell fails when a draw from `0..=15` is below `resist`, so a
/// resistance of 15 still lets a roll of 15 through.
pub fn spell_fails(resist: u8, rng: &mut dyn Random) -> bool {
    rng.nibble() < resist
}

/// Gold dropped by a defeated enemy: `base * (192 + rnd & 63) / 256`.
pub fn gold_reward(base: u16, rng: &mut dyn Random) -> u16 {
    let factor = 192 + u32::from(rng.masked(0x3F));
    (u32::from(base) * factor / 256).min(u32::from(u16::MAX)) as u16
}

/// HP restored by a medical herb.
pub fn herb_heal(rng: &mut dyn Random) -> u8 {
    rng.roll(23, 0x07)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rng::SequenceRandom, tests::TEST_COUNT};
    use proptest::prelude::*;

    #[test]
    fn weak_attacker_lands_one_or_nothing() {
        assert_eq!(physical_damage(5, 10, &mut SequenceRandom::new([0x00])), 1);
        assert_eq!(physical_damage(5, 10, &mut SequenceRandom::new([0x01])), 0);
        assert_eq!(physical_damage(0, 255, &mut SequenceRandom::new([0x00])), 1);
    }

    #[test]
    fn general_formula() {
        // power 20: 20/4 + 21 * rnd / 1024
        assert_eq!(physical_damage(30, 20, &mut SequenceRandom::new([0])), 5);
        assert_eq!(physical_damage(30, 20, &mut SequenceRandom::new([255])), 10);
        assert_eq!(physical_damage(255, 0, &mut SequenceRandom::new([255])), 63 + 63);
    }

    #[test]
    fn excellent_move_keeps_at_least_half() {
        assert_eq!(excellent_damage(100, &mut SequenceRandom::new([0])), 100);
        assert_eq!(excellent_damage(100, &mut SequenceRandom::new([255])), 51);
        assert!(excellent_move(&mut SequenceRandom::new([0x20])));
        assert!(!excellent_move(&mut SequenceRandom::new([0x01])));
    }

    #[test]
    fn dodge_uses_sixty_fourths() {
        assert!(dodges(4, &mut SequenceRandom::new([0x43])));
        assert!(!dodges(4, &mut SequenceRandom::new([0x44])));
        assert!(!dodges(0, &mut SequenceRandom::new([0x00])));
    }

    #[test]
    fn spell_failure_boundary() {
        assert!(spell_fails(15, &mut SequenceRandom::new([14])));
        assert!(!spell_fails(15, &mut SequenceRandom::new([15])));
        assert!(!spell_fails(0, &mut SequenceRandom::new([0])));
    }

    #[test]
    fn flee_contest() {
        // agility 50 against defense 5 on the weakest tier.
        assert!(flee_succeeds(50, 5, 2, &mut SequenceRandom::new([200, 10])));
        assert!(!flee_succeeds(50, 5, 2, &mut SequenceRandom::new([0, 10])));
        assert!(!flee_succeeds(1, 200, 8, &mut SequenceRandom::new([10, 200])));
    }

    #[test]
    fn gold_reward_range() {
        assert_eq!(gold_reward(100, &mut SequenceRandom::new([0])), 75);
        assert_eq!(gold_reward(100, &mut SequenceRandom::new([0x3F])), 99);
        assert_eq!(gold_reward(u16::MAX, &mut SequenceRandom::new([0x3F])), 65279);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(TEST_COUNT as u32))]

        #[test]
        fn damage_is_bounded_by_power(attack in any::<u8>(), defense in any::<u8>(), rnd in any::<u8>()) {
            let damage = physical_damage(attack, defense, &mut SequenceRandom::new([rnd]));
            let power = i16::from(attack) - i16::from(defense / 2);
            if power < 2 {
                prop_assert!(damage <= 1);
            } else {
                prop_assert!(i16::from(damage) >= power / 4);
                prop_assert!(i16::from(damage) <= power / 2 + 1);
            }
        }

        #[test]
        fn herbs_heal_23_to_30(rnd in any::<u8>()) {
            let amount = herb_heal(&mut SequenceRandom::new([rnd]));
            prop_assert!((23..=30).contains(&amount));
        }
    }
}
