use core::fmt;

use crate::rng::Random;

/// The hero's spells, in the order they are learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spell {
    Heal,
    Hurt,
    Sleep,
    Radiant,
    Stopspell,
    Outside,
    Return,
    Repel,
    Healmore,
    Hurtmore,
}

impl Spell {
    pub const ALL: [Spell; 10] = [
        Self::Heal,
        Self::Hurt,
        Self::Sleep,
        Self::Radiant,
        Self::Stopspell,
        Self::Outside,
        Self::Return,
        Self::Repel,
        Self::Healmore,
        Self::Hurtmore,
    ];

    pub const fn mp_cost(self) -> u8 {
        match self {
            Self::Heal => 4,
            Self::Hurt => 2,
            Self::Sleep => 2,
            Self::Radiant => 3,
            Self::Stopspell => 2,
            Self::Outside => 6,
            Self::Return => 8,
            Self::Repel => 2,
            Self::Healmore => 10,
            Self::Hurtmore => 5,
        }
    }

    pub const fn learned_at(self) -> u8 {
        match self {
            Self::Heal => 3,
            Self::Hurt => 4,
            Self::Sleep => 7,
            Self::Radiant => 9,
            Self::Stopspell => 10,
            Self::Outside => 12,
            Self::Return => 13,
            Self::Repel => 15,
            Self::Healmore => 17,
            Self::Hurtmore => 19,
        }
    }

    pub const fn works_in_battle(self) -> bool {
        matches!(
            self,
            Self::Heal | Self::Hurt | Self::Sleep | Self::Stopspell | Self::Healmore | Self::Hurtmore
        )
    }

    pub const fn works_in_field(self) -> bool {
        matches!(
            self,
            Self::Heal | Self::Radiant | Self::Outside | Self::Return | Self::Repel | Self::Healmore
        )
    }

    /// Rolled amount for damage and healing spells.
    pub fn roll(self, rng: &mut dyn Random) -> Option<u8> {
        let amount = match self {
            Self::Heal => rng.roll(10, 0x07),
            Self::Healmore => rng.roll(85, 0x0F),
            Self::Hurt => rng.roll(5, 0x07),
            Self::Hurtmore => rng.roll(58, 0x07),
            _ => return None,
        };
        Some(amount)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Heal => "HEAL",
            Self::Hurt => "HURT",
            Self::Sleep => "SLEEP",
            Self::Radiant => "RADIANT",
            Self::Stopspell => "STOPSPELL",
            Self::Outside => "OUTSIDE",
            Self::Return => "RETURN",
            Self::Repel => "REPEL",
            Self::Healmore => "HEALMORE",
            Self::Hurtmore => "HURTMORE",
        }
    }
}

impl fmt::Display for Spell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Spells known at `level`, in learning order.
pub fn spells_known(level: u8) -> Vec<Spell> {
    Spell::ALL
        .into_iter()
        .filter(|spell| spell.learned_at() <= level)
        .collect()
}

/// Spells first available at exactly `level`.
pub fn spells_learned_at(level: u8) -> impl Iterator<Item = Spell> {
    Spell::ALL
        .into_iter()
        .filter(move |spell| spell.learned_at() == level)
}
