//! The hero.
//!
//! Level, growth stats, attack and defense are always derived from
//! experience, the name and the equipped gear; only experience, gold, the bag,
//! gear, flags and current HP/MP are stored.

use tracing::info;

use crate::{
    combat::spells::{self, Spell},
    dialog::MessageSpeed,
    player::{
        flags::{QuestFlags, StatusFlags, StoryFlags},
        items::{Equipment, Inventory},
        name::NameModifier,
        stats::BaseStats,
    },
};

pub mod flags;
pub mod items;
pub mod name;
#[cfg(feature = "snapshot-postcard")]
pub mod snapshot;
pub mod stats;

/// Level before and after an experience change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub before: u8,
    pub after: u8,
}

impl LevelChange {
    pub fn leveled_up(&self) -> bool {
        self.after > self.before
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub(crate) name: String,
    pub(crate) experience: u16,
    pub(crate) gold: u16,
    pub(crate) hp: u8,
    pub(crate) mp: u8,
    pub(crate) equipment: Equipment,
    pub(crate) inventory: Inventory,
    pub(crate) status: StatusFlags,
    pub(crate) quest: QuestFlags,
    pub(crate) story: StoryFlags,
    pub(crate) message_speed: MessageSpeed,
    /// Resume in the throne room rather than where the log was written.
    pub(crate) restart: bool,
}

impl Player {
    /// A level 1 hero at full health.
    pub fn new(name: &str) -> Self {
        let mut player = Self {
            name: name::normalize(name),
            experience: 0,
            gold: 0,
            hp: 0,
            mp: 0,
            equipment: Equipment::default(),
            inventory: Inventory::default(),
            status: StatusFlags::empty(),
            quest: QuestFlags::empty(),
            story: StoryFlags::empty(),
            message_speed: MessageSpeed::default(),
            restart: true,
        };
        player.restore();
        player
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn experience(&self) -> u16 {
        self.experience
    }

    pub fn gold(&self) -> u16 {
        self.gold
    }

    pub fn hp(&self) -> u8 {
        self.hp
    }

    pub fn mp(&self) -> u8 {
        self.mp
    }

    pub fn level(&self) -> u8 {
        stats::level_for(self.experience)
    }

    /// Growth stats for the current level after the name adjustment.
    pub fn stats(&self) -> BaseStats {
        NameModifier::for_name(&self.name).apply(stats::base_stats(self.level()))
    }

    pub fn strength(&self) -> u8 {
        self.stats().strength
    }

    pub fn agility(&self) -> u8 {
        self.stats().agility
    }

    pub fn max_hp(&self) -> u8 {
        self.stats().max_hp
    }

    pub fn max_mp(&self) -> u8 {
        self.stats().max_mp
    }

    /// Strength plus weapon, plus 2 while wearing the fighter's ring.
    pub fn attack(&self) -> u8 {
        let ring = if self.status.contains(StatusFlags::WEARING_RING) {
            2
        } else {
            0
        };
        self.strength()
            .saturating_add(self.equipment.weapon.bonus())
            .saturating_add(ring)
    }

    /// Half agility plus armor and shield, plus 2 while wearing the scale.
    pub fn defense(&self) -> u8 {
        let scale = if self.status.contains(StatusFlags::WEARING_SCALE) {
            2
        } else {
            0
        };
        (self.agility() / 2)
            .saturating_add(self.equipment.armor.bonus())
            .saturating_add(self.equipment.shield.bonus())
            .saturating_add(scale)
    }

    pub fn equipment(&self) -> Equipment {
        self.equipment
    }

    pub fn equipment_mut(&mut self) -> &mut Equipment {
        &mut self.equipment
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn status(&self) -> StatusFlags {
        self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusFlags {
        &mut self.status
    }

    pub fn quest(&self) -> QuestFlags {
        self.quest
    }

    pub fn quest_mut(&mut self) -> &mut QuestFlags {
        &mut self.quest
    }

    pub fn story(&self) -> StoryFlags {
        self.story
    }

    pub fn story_mut(&mut self) -> &mut StoryFlags {
        &mut self.story
    }

    pub fn message_speed(&self) -> MessageSpeed {
        self.message_speed
    }

    pub fn set_message_speed(&mut self, speed: MessageSpeed) {
        self.message_speed = speed;
    }

    pub fn restart(&self) -> bool {
        self.restart
    }

    pub fn set_restart(&mut self, restart: bool) {
        self.restart = restart;
    }

    /// Adds experience, saturating at 65535.
    pub fn gain_experience(&mut self, amount: u16) -> LevelChange {
        let before = self.level();
        self.experience = self.experience.saturating_add(amount);
        let after = self.level();
        if after > before {
            info!(name = %self.name, before, after, "level up");
        }
        LevelChange { before, after }
    }

    /// Sets experience directly; level and stats follow.
    pub fn set_experience(&mut self, experience: u16) {
        self.experience = experience;
        self.hp = self.hp.min(self.max_hp());
        self.mp = self.mp.min(self.max_mp());
    }

    /// Adds gold, saturating at 65535.
    pub fn add_gold(&mut self, amount: u16) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Pays `amount` if the hero can afford it.
    pub fn spend_gold(&mut self, amount: u16) -> bool {
        match self.gold.checked_sub(amount) {
            Some(left) => {
                self.gold = left;
                true
            }
            None => false,
        }
    }

    pub fn set_gold(&mut self, gold: u16) {
        self.gold = gold;
    }

    /// Loses `amount` HP. Returns true when the hero has fallen.
    pub fn take_damage(&mut self, amount: u8) -> bool {
        self.hp = self.hp.saturating_sub(amount);
        self.hp == 0
    }

    /// Heals up to max HP. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u8) -> u8 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp());
        self.hp - before
    }

    pub fn set_hp(&mut self, hp: u8) {
        self.hp = hp.min(self.max_hp());
    }

    pub fn set_mp(&mut self, mp: u8) {
        self.mp = mp.min(self.max_mp());
    }

    /// Pays a spell's MP. Returns false, leaving MP untouched, when short.
    pub fn spend_mp(&mut self, cost: u8) -> bool {
        match self.mp.checked_sub(cost) {
            Some(left) => {
                self.mp = left;
                true
            }
            None => false,
        }
    }

    /// Refills HP and MP.
    pub fn restore(&mut self) {
        self.hp = self.max_hp();
        self.mp = self.max_mp();
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    pub fn spells(&self) -> Vec<Spell> {
        spells::spells_known(self.level())
    }

    pub fn knows(&self, spell: Spell) -> bool {
        spell.learned_at() <= self.level()
    }

    pub fn is_cursed(&self) -> bool {
        self.status.intersects(StatusFlags::CURSED)
    }

    /// The dragonlord's bargain: everything earned is gone.
    pub fn reset_progress(&mut self) {
        self.experience = 0;
        self.gold = 0;
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::items::{Armor, Shield, Weapon};
    use proptest::prelude::*;

    fn hero() -> Player {
        // "Loto" trims strength and max HP by 10% and adds 3.
        Player::new("Loto")
    }

    #[test]
    fn new_hero_is_level_one_and_healthy() {
        let hero = hero();
        assert_eq!(hero.level(), 1);
        assert_eq!(hero.max_hp(), 15 * 9 / 10 + 3);
        assert_eq!(hero.hp(), hero.max_hp());
        assert_eq!(hero.mp(), 0);
        assert!(hero.spells().is_empty());
    }

    #[test]
    fn derived_attack_and_defense() {
        let mut hero = hero();
        hero.equipment = Equipment {
            weapon: Weapon::CopperSword,
            armor: Armor::ChainMail,
            shield: Shield::SmallShield,
        };
        let strength = hero.strength();
        assert_eq!(hero.attack(), strength + 10);
        hero.status.insert(StatusFlags::WEARING_RING);
        assert_eq!(hero.attack(), strength + 12);
        assert_eq!(hero.defense(), hero.agility() / 2 + 14);
        hero.status.insert(StatusFlags::WEARING_SCALE);
        assert_eq!(hero.defense(), hero.agility() / 2 + 16);
    }

    #[test]
    fn experience_drives_level_up() {
        let mut hero = hero();
        let change = hero.gain_experience(23);
        assert_eq!(change, LevelChange { before: 1, after: 3 });
        assert!(change.leveled_up());
        assert_eq!(hero.spells(), vec![Spell::Heal]);
        assert!(!hero.gain_experience(1).leveled_up());
    }

    #[test]
    fn mp_is_never_overspent() {
        let mut hero = hero();
        hero.set_experience(47);
        hero.restore();
        let mp = hero.mp();
        assert!(!hero.spend_mp(mp + 1));
        assert_eq!(hero.mp(), mp);
        assert!(hero.spend_mp(2));
        assert_eq!(hero.mp(), mp - 2);
    }

    #[test]
    fn gold_cannot_go_negative() {
        let mut hero = hero();
        hero.add_gold(10);
        assert!(!hero.spend_gold(11));
        assert_eq!(hero.gold(), 10);
        assert!(hero.spend_gold(10));
        assert_eq!(hero.gold(), 0);
    }

    proptest! {
        #[test]
        fn gold_and_experience_saturate(start in any::<u16>(), gain in any::<u16>()) {
            let mut hero = hero();
            hero.set_gold(start);
            hero.add_gold(gain);
            prop_assert_eq!(hero.gold(), start.saturating_add(gain));

            hero.set_experience(start);
            hero.gain_experience(gain);
            prop_assert_eq!(hero.experience(), start.saturating_add(gain));
        }

        #[test]
        fn damage_never_underflows(hp in 1u8..=40, hit in any::<u8>()) {
            let mut hero = hero();
            hero.set_experience(u16::MAX);
            hero.set_hp(hp);
            let dead = hero.take_damage(hit);
            prop_assert_eq!(dead, hit >= hp);
            prop_assert_eq!(hero.hp(), hp.saturating_sub(hit));
        }
    }
}
