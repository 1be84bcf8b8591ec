//! How monsters pick their move.
//!
//! A species' spell byte holds two groups. The high nibble is the support
//! group (sleep, stopspell, heal, healmore) and the low nibble the attack
//! group (hurt, hurtmore, fire, strong fire). In each nibble the top two
//! bits pick the spell and the bottom two its chance, tried as
//! `rnd & 3 < chance`. The support group is tried first.

use crate::{enemy::Enemy, player::items::Armor, rng::Random};

/// Spells and breath attacks monsters use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemySpell {
    Sleep,
    Stopspell,
    Heal,
    Healmore,
    Hurt,
    Hurtmore,
    Fire,
    StrongFire,
}

impl EnemySpell {
    pub const fn is_breath(self) -> bool {
        matches!(self, Self::Fire | Self::StrongFire)
    }

    pub const fn is_damaging(self) -> bool {
        matches!(
            self,
            Self::Hurt | Self::Hurtmore | Self::Fire | Self::StrongFire
        )
    }
}

/// A species' packed spell byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpellPattern(u8);

impl SpellPattern {
    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Support spell and its chance, if the species has one.
    pub const fn support(self) -> Option<(EnemySpell, u8)> {
        let nibble = self.0 >> 4;
        let chance = nibble & 0x03;
        if chance == 0 {
            return None;
        }
        let spell = match nibble >> 2 {
            0 => EnemySpell::Sleep,
            1 => EnemySpell::Stopspell,
            2 => EnemySpell::Heal,
            _ => EnemySpell::Healmore,
        };
        Some((spell, chance))
    }

    /// Attack spell and its chance, if the species has one.
    pub const fn attack(self) -> Option<(EnemySpell, u8)> {
        let nibble = self.0 & 0x0F;
        let chance = nibble & 0x03;
        if chance == 0 {
            return None;
        }
        let spell = match nibble >> 2 {
            0 => EnemySpell::Hurt,
            1 => EnemySpell::Hurtmore,
            2 => EnemySpell::Fire,
            _ => EnemySpell::StrongFire,
        };
        Some((spell, chance))
    }
}

/// What the monster does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyAction {
    Attack,
    Cast(EnemySpell),
    Flee,
}

/// The hero's side of the state the AI looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeroCondition {
    pub strength: u8,
    pub asleep: bool,
    pub stopspelled: bool,
}

/// Picks the monster's move.
///
/// A monster outclassed by the hero (strength at least twice its attack)
/// runs one time in four. The dragonlord never runs.
pub fn choose_action(enemy: &Enemy, hero: HeroCondition, rng: &mut dyn Random) -> EnemyAction {
    if !enemy.kind().is_dragonlord()
        && u16::from(hero.strength) >= 2 * u16::from(enemy.attack())
        && rng.one_in(0x03)
    {
        return EnemyAction::Flee;
    }
    let pattern = enemy.template().spells;
    if let Some((spell, chance)) = pattern.support() {
        let useful = match spell {
            EnemySpell::Sleep => !hero.asleep,
            EnemySpell::Stopspell => !hero.stopspelled,
            _ => enemy.is_weakened(),
        };
        if useful && rng.masked(0x03) < chance {
            return EnemyAction::Cast(spell);
        }
    }
    if let Some((spell, chance)) = pattern.attack() {
        if rng.masked(0x03) < chance {
            return EnemyAction::Cast(spell);
        }
    }
    EnemyAction::Attack
}

/// HP a monster's healing spell restores.
pub fn heal_amount(spell: EnemySpell, rng: &mut dyn Random) -> u8 {
    match spell {
        EnemySpell::Healmore => rng.roll(85, 0x0F),
        _ => rng.roll(20, 0x07),
    }
}

/// Damage of a monster's spell or breath after the hero's armor.
///
/// Magic armor and Erdrick's armor cut hurt spells to two thirds; only
/// Erdrick's armor does the same for fire.
pub fn spell_damage(spell: EnemySpell, armor: Armor, rng: &mut dyn Random) -> u8 {
    let damage = match spell {
        EnemySpell::Hurt => rng.roll(3, 0x07),
        EnemySpell::Hurtmore => rng.roll(30, 0x0F),
        EnemySpell::Fire => rng.roll(16, 0x07),
        EnemySpell::StrongFire => rng.roll(65, 0x07),
        _ => return 0,
    };
    let reduced = match spell {
        EnemySpell::Hurt | EnemySpell::Hurtmore => {
            matches!(armor, Armor::MagicArmor | Armor::ErdricksArmor)
        }
        _ => armor == Armor::ErdricksArmor,
    };
    if reduced {
        (u16::from(damage) * 2 / 3) as u8
    } else {
        damage
    }
}
