//! Turn-based fights.
//!
//! A fight is one call to [`GameSession::fight`]. After the opening speed
//! contest the hero and the monster alternate turns until one side is
//! defeated or runs. A failed action (miss, dodge, resisted spell) still
//! ends the turn; only cancelled menus and unusable choices re-prompt.

use core::fmt;

use tracing::{debug, info};

use crate::{
    GameSession,
    combat::{
        damage::Hit,
        enemy_ai::{EnemyAction, EnemySpell, HeroCondition},
        spells::Spell,
    },
    dialog::text,
    enemy::{Enemy, EnemyKind},
    host::{Host, Music, Selection, Sfx, Window},
    map::layouts::THRONE_ROOM_START,
    player::{
        flags::{QuestFlags, StatusFlags},
        items::{InventoryEntry, Item},
    },
    ppu::FlashKind,
};

pub mod damage;
pub mod enemy_ai;
pub mod spells;

/// How a fight ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    PlayerFled,
    EnemyFled,
    PoweredOff,
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::PlayerFled => "player fled",
            Self::EnemyFled => "enemy fled",
            Self::PoweredOff => "powered off",
        };
        f.write_str(label)
    }
}

/// Battle-scoped state. Nothing here outlives the fight.
#[derive(Debug, Clone)]
struct Battle {
    enemy: Enemy,
    hero_asleep: bool,
    /// Turns slept so far; the first one is always lost.
    hero_sleep_turns: u8,
    hero_stopspelled: bool,
}

impl Battle {
    fn hero_condition(&self, strength: u8) -> HeroCondition {
        HeroCondition {
            strength,
            asleep: self.hero_asleep,
            stopspelled: self.hero_stopspelled,
        }
    }
}

/// Result of a menu pick during the hero's turn.
enum Choice {
    /// The turn is spent; `Some` ends the fight.
    Done(Option<BattleOutcome>),
    Reprompt,
}

impl<H: Host> GameSession<H> {
    /// Runs a fight against `kind` to the end.
    pub fn fight(&mut self, kind: EnemyKind) -> BattleOutcome {
        let enemy = Enemy::spawn(kind, self.rng.as_mut());
        info!(enemy = %kind, hp = enemy.hp(), "fight started");
        let music = if kind.is_dragonlord() {
            Music::FinalBattle
        } else {
            Music::Battle
        };
        self.host.play_music(music);
        self.say_subject(text::DRAWS_NEAR, kind.name());

        let mut battle = Battle {
            enemy,
            hero_asleep: false,
            hero_sleep_turns: 0,
            hero_stopspelled: false,
        };
        let mut enemy_first = damage::enemy_preempts(
            self.player.agility(),
            battle.enemy.defense(),
            self.rng.as_mut(),
        );
        if enemy_first {
            self.say_subject(text::ENEMY_PREEMPTS, kind.name());
        }

        let outcome = loop {
            if !enemy_first {
                if self.host.powered_off() {
                    break BattleOutcome::PoweredOff;
                }
                if let Some(outcome) = self.hero_turn(&mut battle) {
                    break outcome;
                }
            }
            enemy_first = false;
            if self.host.powered_off() {
                break BattleOutcome::PoweredOff;
            }
            if let Some(outcome) = self.enemy_turn(&mut battle) {
                break outcome;
            }
        };
        info!(enemy = %kind, %outcome, "fight over");
        self.finish_fight(&battle, outcome);
        outcome
    }

    fn hero_turn(&mut self, battle: &mut Battle) -> Option<BattleOutcome> {
        if battle.hero_asleep {
            let wakes = battle.hero_sleep_turns > 0 && self.rng.one_in(0x01);
            battle.hero_sleep_turns = battle.hero_sleep_turns.saturating_add(1);
            if !wakes {
                self.say(text::PLAYER_ASLEEP);
                return None;
            }
            battle.hero_asleep = false;
            self.say(text::PLAYER_AWAKENS);
        }
        loop {
            if self.host.powered_off() {
                return Some(BattleOutcome::PoweredOff);
            }
            let choice = match self.host.show_window(Window::BattleCommand) {
                Selection::Index(0) => Choice::Done(self.hero_attacks(battle)),
                Selection::Index(1) => Choice::Done(self.hero_runs(battle)),
                Selection::Index(2) => self.hero_casts(battle),
                Selection::Index(3) => self.hero_uses_item(battle),
                _ => Choice::Reprompt,
            };
            if let Choice::Done(outcome) = choice {
                return outcome;
            }
        }
    }

    fn hero_attacks(&mut self, battle: &mut Battle) -> Option<BattleOutcome> {
        self.say(text::PLAYER_ATTACKS);
        self.host.play_sfx(Sfx::Attack);
        let attack = self.player.attack();
        let kind = battle.enemy.kind();
        let rng = self.rng.as_mut();
        let hit = if !battle.enemy.is_asleep()
            && damage::dodges(battle.enemy.template().dodge(), rng)
        {
            Hit::Dodged
        } else if !kind.is_dragonlord() && damage::excellent_move(rng) {
            let amount = damage::excellent_damage(attack, rng);
            self.say(text::EXCELLENT_MOVE);
            self.host.play_sfx(Sfx::Excellent);
            Hit::Damage(amount)
        } else {
            match damage::physical_damage(attack, battle.enemy.defense(), rng) {
                0 => Hit::Missed,
                amount => Hit::Damage(amount),
            }
        };
        debug!(?hit, "hero attack");
        match hit {
            Hit::Dodged => {
                self.host.play_sfx(Sfx::Dodge);
                self.say_subject(text::ENEMY_DODGED, kind.name());
                None
            }
            Hit::Missed => {
                self.host.play_sfx(Sfx::Missed);
                self.say(text::PLAYER_MISSED);
                None
            }
            Hit::Damage(amount) => self.damage_enemy(battle, amount),
        }
    }

    fn damage_enemy(&mut self, battle: &mut Battle, amount: u8) -> Option<BattleOutcome> {
        self.host.play_sfx(Sfx::EnemyHit);
        let defeated = battle.enemy.take_damage(amount);
        self.say_args(text::ENEMY_HURT, Some(amount.into()), Some(battle.enemy.name()));
        defeated.then_some(BattleOutcome::Victory)
    }

    fn hero_runs(&mut self, battle: &mut Battle) -> Option<BattleOutcome> {
        let kind = battle.enemy.kind();
        let escaped = if kind.is_dragonlord() {
            false
        } else if battle.enemy.is_asleep() {
            true
        } else {
            damage::flee_succeeds(
                self.player.agility(),
                battle.enemy.defense(),
                kind.flee_scale(),
                self.rng.as_mut(),
            )
        };
        self.host.play_sfx(Sfx::Run);
        if escaped {
            self.say(text::PLAYER_FLED);
            Some(BattleOutcome::PlayerFled)
        } else {
            self.say_subject(text::RUN_BLOCKED, kind.name());
            None
        }
    }

    fn hero_casts(&mut self, battle: &mut Battle) -> Choice {
        let known = self.player.spells();
        if known.is_empty() {
            self.say(text::NO_SPELLS);
            return Choice::Reprompt;
        }
        let Some(&spell) = self
            .host
            .show_window(Window::SpellList(&known))
            .index()
            .and_then(|index| known.get(index))
        else {
            return Choice::Reprompt;
        };
        if !self.player.spend_mp(spell.mp_cost()) {
            self.say(text::NOT_ENOUGH_MP);
            return Choice::Reprompt;
        }
        self.host.play_sfx(Sfx::Spell);
        self.palette_flash(FlashKind::Spell, 1);
        self.say_subject(text::SPELL_CAST, spell.name());
        if battle.hero_stopspelled {
            self.say(text::SPELL_BLOCKED);
            return Choice::Done(None);
        }
        Choice::Done(self.resolve_hero_spell(battle, spell))
    }

    fn resolve_hero_spell(&mut self, battle: &mut Battle, spell: Spell) -> Option<BattleOutcome> {
        let template = battle.enemy.template();
        let name = battle.enemy.name();
        match spell {
            Spell::Heal | Spell::Healmore => {
                let amount = spell.roll(self.rng.as_mut()).unwrap_or_default();
                let restored = self.player.heal(amount);
                self.host.play_sfx(Sfx::Heal);
                self.say_number(text::HP_RESTORED, restored);
                None
            }
            Spell::Hurt | Spell::Hurtmore => {
                if damage::spell_fails(template.hurt_resist(), self.rng.as_mut()) {
                    self.say(text::SPELL_NO_EFFECT);
                    return None;
                }
                let amount = spell.roll(self.rng.as_mut()).unwrap_or_default();
                self.damage_enemy(battle, amount)
            }
            Spell::Sleep => {
                if damage::spell_fails(template.sleep_resist(), self.rng.as_mut()) {
                    self.say(text::SPELL_NO_EFFECT);
                } else {
                    battle.enemy.set_asleep(true);
                    self.say_subject(text::ENEMY_FALLS_ASLEEP, name);
                }
                None
            }
            Spell::Stopspell => {
                if damage::spell_fails(template.stopspell_resist(), self.rng.as_mut()) {
                    self.say(text::SPELL_NO_EFFECT);
                } else {
                    battle.enemy.set_stopspelled(true);
                    self.say_subject(text::ENEMY_STOPSPELLED, name);
                }
                None
            }
            Spell::Radiant | Spell::Outside | Spell::Return | Spell::Repel => {
                self.say(text::SPELL_WILL_NOT_WORK);
                None
            }
        }
    }

    fn hero_uses_item(&mut self, battle: &mut Battle) -> Choice {
        let entries = self.player.inventory().entries();
        if entries.is_empty() {
            self.say(text::BAG_EMPTY);
            return Choice::Reprompt;
        }
        let Some(&entry) = self
            .host
            .show_window(Window::ItemList(&entries))
            .index()
            .and_then(|index| entries.get(index))
        else {
            return Choice::Reprompt;
        };
        match entry {
            InventoryEntry::Herb(_) => {
                self.player.inventory_mut().take_herb();
                let amount = damage::herb_heal(self.rng.as_mut());
                let restored = self.player.heal(amount);
                self.host.play_sfx(Sfx::Heal);
                self.say_number(text::HERB_USED, restored);
                Choice::Done(None)
            }
            InventoryEntry::Item(Item::FairyFlute) => {
                self.say(text::FLUTE_PLAYED);
                self.host.play_music(Music::FairyFlute);
                self.wait_for_track_end();
                if battle.enemy.kind() == EnemyKind::Golem {
                    battle.enemy.set_asleep(true);
                    self.say_subject(text::GOLEM_LULLED, battle.enemy.name());
                } else {
                    self.say(text::NO_EFFECT);
                }
                Choice::Done(None)
            }
            _ => {
                self.say_subject(text::ITEM_NOT_IN_BATTLE, entry.name());
                Choice::Reprompt
            }
        }
    }

    fn enemy_turn(&mut self, battle: &mut Battle) -> Option<BattleOutcome> {
        let name = battle.enemy.name();
        if battle.enemy.is_asleep() {
            if self.rng.below(3) != 0 {
                self.say_subject(text::ENEMY_ASLEEP, name);
                return None;
            }
            battle.enemy.set_asleep(false);
            self.say_subject(text::ENEMY_AWAKENS, name);
        }
        let condition = battle.hero_condition(self.player.strength());
        let action = enemy_ai::choose_action(&battle.enemy, condition, self.rng.as_mut());
        debug!(?action, "enemy turn");
        match action {
            EnemyAction::Flee => {
                self.host.play_sfx(Sfx::Run);
                self.say_subject(text::ENEMY_RAN, name);
                Some(BattleOutcome::EnemyFled)
            }
            EnemyAction::Attack => {
                self.say_subject(text::ENEMY_ATTACKS, name);
                let amount = damage::physical_damage(
                    battle.enemy.attack(),
                    self.player.defense(),
                    self.rng.as_mut(),
                );
                if amount == 0 {
                    self.host.play_sfx(Sfx::Missed);
                    self.say(text::ENEMY_MISSED);
                    None
                } else {
                    self.damage_hero(amount)
                }
            }
            EnemyAction::Cast(spell) => self.enemy_casts(battle, spell),
        }
    }

    fn enemy_casts(&mut self, battle: &mut Battle, spell: EnemySpell) -> Option<BattleOutcome> {
        let name = battle.enemy.name();
        if spell.is_breath() {
            self.host.play_sfx(Sfx::Fire);
            self.say_subject(text::ENEMY_BREATHES_FIRE, name);
        } else {
            self.host.play_sfx(Sfx::Spell);
            self.say_subject(text::ENEMY_CHANTS, name);
            if battle.enemy.is_stopspelled() {
                self.say(text::SPELL_BLOCKED);
                return None;
            }
        }
        match spell {
            EnemySpell::Sleep => {
                battle.hero_asleep = true;
                battle.hero_sleep_turns = 0;
                self.say(text::PLAYER_FALLS_ASLEEP);
                None
            }
            EnemySpell::Stopspell => {
                if self.rng.one_in(0x01) {
                    battle.hero_stopspelled = true;
                    self.say(text::PLAYER_STOPSPELLED);
                } else {
                    self.say(text::SPELL_NO_EFFECT);
                }
                None
            }
            EnemySpell::Heal | EnemySpell::Healmore => {
                let amount = enemy_ai::heal_amount(spell, self.rng.as_mut());
                battle.enemy.heal(amount);
                self.say_subject(text::ENEMY_HEALED, name);
                None
            }
            EnemySpell::Hurt | EnemySpell::Hurtmore | EnemySpell::Fire | EnemySpell::StrongFire => {
                let armor = self.player.equipment().armor;
                let amount = enemy_ai::spell_damage(spell, armor, self.rng.as_mut());
                self.damage_hero(amount)
            }
        }
    }

    fn damage_hero(&mut self, amount: u8) -> Option<BattleOutcome> {
        self.host.play_sfx(Sfx::PlayerHit);
        self.palette_flash(FlashKind::Damage, 1);
        let dead = self.player.take_damage(amount);
        self.say_number(text::PLAYER_HURT, amount);
        dead.then_some(BattleOutcome::Defeat)
    }

    fn finish_fight(&mut self, battle: &Battle, outcome: BattleOutcome) {
        match outcome {
            BattleOutcome::Victory => self.claim_victory(battle.enemy.kind()),
            BattleOutcome::Defeat => {
                self.suffer_defeat();
                return;
            }
            BattleOutcome::PoweredOff => return,
            BattleOutcome::PlayerFled | BattleOutcome::EnemyFled => {}
        }
        self.host.play_music(self.map_id().layout().music);
    }

    fn claim_victory(&mut self, kind: EnemyKind) {
        self.say_subject(text::ENEMY_DEFEATED, kind.name());
        match kind {
            EnemyKind::Golem => self.player.quest_mut().insert(QuestFlags::GOLEM_DEAD),
            EnemyKind::DragonlordTrueForm => {
                self.player.quest_mut().insert(QuestFlags::DRAGONLORD_DEAD)
            }
            _ => {}
        }
        let template = kind.template();
        if template.experience == 0 && template.gold == 0 {
            return;
        }
        self.host.play_music(Music::Victory);
        self.wait_for_track_end();
        let gold = damage::gold_reward(template.gold, self.rng.as_mut());
        let change = self.player.gain_experience(template.experience);
        self.player.add_gold(gold);
        self.say_number(text::GAINED_EXPERIENCE, template.experience);
        self.say_number(text::GAINED_GOLD, gold);
        if change.leveled_up() {
            self.host.play_music(Music::LevelUp);
            self.wait_for_track_end();
            self.say(text::LEVEL_UP);
            for level in change.before + 1..=change.after {
                for spell in spells::spells_learned_at(level) {
                    self.say_subject(text::LEARNED_SPELL, spell.name());
                }
            }
        }
    }

    /// The hero wakes in the throne room with half the gold and full health.
    pub(crate) fn suffer_defeat(&mut self) {
        self.say(text::PLAYER_DIED);
        self.host.play_music(Music::Death);
        self.wait_for_track_end();
        let player = &mut self.player;
        player.set_gold(player.gold() / 2);
        player.status_mut().remove(StatusFlags::CARRYING_PRINCESS);
        player.restore();
        player.set_restart(true);
        info!(gold = player.gold(), "hero fell; returning to the king");
        let (map, x, y, facing) = THRONE_ROOM_START;
        self.load_map(map, x, y, facing);
        self.say(text::KING_DEATH_RETURN);
    }
}
