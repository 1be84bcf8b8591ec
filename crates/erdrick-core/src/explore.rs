//! Walking around: the main loop outside of fights and the title screen.
//!
//! One pass of [`GameSession::explore`] waits for a blank, advances the RNG
//! and polls the pad. A held direction walks, A opens the command window and
//! anything else counts toward the idle status popup. Every step runs the
//! post-step triggers in a fixed order: guardians, damage tiles, armor
//! regeneration, ward counters and finally the encounter roll.

use tracing::{debug, info};

use crate::{
    GameSession, SessionOutcome,
    combat::BattleOutcome,
    dialog::text,
    host::{Buttons, Host, Sfx, Window},
    map::{BlockType, Direction, MapExit, MapId},
    player::{flags::StoryFlags, items::Armor},
    ppu::FlashKind,
};

pub mod commands;
pub mod field;
pub mod npc;
pub mod shops;
pub mod triggers;

/// Steps a repel spell or a sprinkle of fairy water lasts.
pub const WARD_STEPS: u8 = 127;
/// Light radius of a torch.
pub const TORCH_RADIUS: u8 = 1;
/// Light radius right after Radiant.
pub const RADIANT_RADIUS: u8 = 3;
/// Steps before Radiant's glow shrinks to torchlight.
pub const RADIANT_STEPS: u8 = 60;

/// Step counters and idle tracking that live outside the player record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExploreState {
    pub(crate) repel_steps: u8,
    pub(crate) fairy_water_steps: u8,
    pub(crate) radiant_steps: u8,
    pub(crate) idle_frames: u32,
    pub(crate) popup_shown: bool,
}

impl ExploreState {
    pub fn repel_steps(&self) -> u8 {
        self.repel_steps
    }

    pub fn fairy_water_steps(&self) -> u8 {
        self.fairy_water_steps
    }

    /// Weak monsters are kept away while either ward lasts.
    pub fn warded(&self) -> bool {
        self.repel_steps > 0 || self.fairy_water_steps > 0
    }

    fn reset_idle(&mut self) {
        self.idle_frames = 0;
        self.popup_shown = false;
    }
}

impl<H: Host> GameSession<H> {
    pub fn explore_state(&self) -> &ExploreState {
        &self.explore
    }

    /// Runs the field loop until the console is switched off or the story
    /// reaches an end.
    pub fn explore(&mut self) -> SessionOutcome {
        loop {
            if self.host.powered_off() {
                return SessionOutcome::PoweredOff;
            }
            self.wait_for_blank();
            self.rng.tick();
            let buttons = self.host.poll();
            let outcome = if let Some(direction) = Direction::from_buttons(buttons) {
                self.explore.reset_idle();
                self.walk(direction)
            } else if buttons.contains(Buttons::A) {
                self.explore.reset_idle();
                self.command_menu()
            } else {
                self.idle();
                None
            };
            if let Some(outcome) = outcome {
                return outcome;
            }
        }
    }

    fn idle(&mut self) {
        self.explore.idle_frames = self.explore.idle_frames.saturating_add(1);
        if !self.explore.popup_shown && self.explore.idle_frames >= self.config.idle_popup_frames {
            self.explore.popup_shown = true;
            self.show_status();
        }
    }

    /// Faces `direction` and tries to take one step.
    pub(crate) fn walk(&mut self, direction: Direction) -> Option<SessionOutcome> {
        if self.world.facing != direction {
            self.world.facing = direction;
            self.place_player_sprite();
        }
        if let Some(exit) = self.check_map_exit(direction) {
            self.take_exit(exit);
            return None;
        }
        let (dx, dy) = direction.delta();
        let (tx, ty) = (self.world.x as i16 + dx, self.world.y as i16 + dy);
        let block = self.block_at(tx, ty);
        if block.is_entrance() {
            self.say(text::CANNOT_ENTER);
            return None;
        }
        if !self.world.map.contains(tx, ty) || !block.is_passable() || self.npc_at(tx, ty).is_some() {
            self.host.play_sfx(Sfx::Bump);
            return None;
        }
        let from = self.position();
        self.world.x = tx as u8;
        self.world.y = ty as u8;
        self.draw_exposed_edge(direction);
        self.scroll_to_player();
        self.place_npc_sprites();
        self.wait_frames(self.config.frames_per_step);
        self.after_step(from, block)
    }

    /// Moves through `exit` and forgets any light that belonged to the old map.
    pub(crate) fn take_exit(&mut self, exit: MapExit) {
        if exit.from == MapId::ThroneRoom {
            self.player.story_mut().insert(StoryFlags::LEFT_THRONE_ROOM);
        }
        self.travel(exit.to, exit.x, exit.y, exit.facing);
    }

    pub(crate) fn travel(&mut self, map: MapId, x: u8, y: u8, facing: Direction) {
        info!(from = %self.map_id(), to = %map, x, y, "travel");
        self.explore.radiant_steps = 0;
        self.load_map(map, x, y, facing);
    }

    /// Puts the hero back where the last step started.
    fn step_back(&mut self, from: (u8, u8)) {
        (self.world.x, self.world.y) = from;
        self.draw_view();
        self.scroll_to_player();
        self.place_npc_sprites();
    }

    fn after_step(&mut self, from: (u8, u8), block: BlockType) -> Option<SessionOutcome> {
        let (x, y) = self.position();
        if let Some(guardian) = triggers::guardian_at(self.map_id(), x, y, self.player.quest()) {
            match self.fight(guardian) {
                BattleOutcome::PoweredOff => return Some(SessionOutcome::PoweredOff),
                BattleOutcome::Defeat => return None,
                BattleOutcome::PlayerFled => {
                    self.say_subject(text::GOLEM_BLOCKS_PATH, guardian.name());
                    self.step_back(from);
                    return None;
                }
                BattleOutcome::Victory | BattleOutcome::EnemyFled => {}
            }
        }

        let armor = self.player.equipment().armor;
        let damage = block.step_damage();
        if damage > 0 && armor != Armor::ErdricksArmor {
            let sfx = if block == BlockType::ForceField {
                Sfx::ForceField
            } else {
                Sfx::SwampStep
            };
            self.host.play_sfx(sfx);
            self.palette_flash(FlashKind::Damage, 1);
            if self.player.take_damage(damage) {
                self.suffer_defeat();
                return None;
            }
        }
        if armor == Armor::ErdricksArmor {
            self.player.heal(1);
        }

        self.tick_wards();
        self.roll_encounter(block)
    }

    fn tick_wards(&mut self) {
        if self.explore.repel_steps > 0 {
            self.explore.repel_steps -= 1;
            if self.explore.repel_steps == 0 {
                self.say(text::REPEL_WORN_OFF);
            }
        }
        if self.explore.fairy_water_steps > 0 {
            self.explore.fairy_water_steps -= 1;
            if self.explore.fairy_water_steps == 0 {
                self.say(text::REPEL_WORN_OFF);
            }
        }
        if self.explore.radiant_steps > 0 {
            self.explore.radiant_steps -= 1;
            if self.explore.radiant_steps == 0 && self.world.light_radius > TORCH_RADIUS {
                self.world.light_radius = TORCH_RADIUS;
                self.draw_view();
            }
        }
    }

    fn roll_encounter(&mut self, block: BlockType) -> Option<SessionOutcome> {
        if !self.config.encounters {
            return None;
        }
        let mask = block.encounter_mask()?;
        let (x, y) = self.position();
        let group = triggers::encounter_group(self.map_id(), x, y)?;
        if !self.rng.one_in(mask) {
            return None;
        }
        let kind = group[self.rng.below(group.len() as u8) as usize];
        if self.explore.warded() && kind.template().attack < self.player.defense() {
            debug!(enemy = %kind, "encounter warded off");
            return None;
        }
        match self.fight(kind) {
            BattleOutcome::PoweredOff => Some(SessionOutcome::PoweredOff),
            _ => None,
        }
    }

    /// Pops up the status window.
    pub(crate) fn show_status(&mut self) {
        let view = commands::status_view(&self.player);
        self.host.show_window(Window::Status(view));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GameConfig,
        host::{WindowKind, scripted::ScriptedHost},
        map::World,
        player::{Player, flags::QuestFlags},
        rng::SequenceRandom,
    };

    fn field(script: &str, map: MapId, x: u8, y: u8, facing: Direction) -> GameSession<ScriptedHost> {
        let host = ScriptedHost::from_script(script).expect("valid script");
        let mut session = GameSession::new(host, GameConfig::default());
        session.player = Player::new("Loto");
        session.world = World::new(map, x, y, facing);
        session
    }

    #[test]
    fn walls_and_npcs_block() {
        let mut session = field("press up\npress left", MapId::ThroneRoom, 4, 3, Direction::Down);
        assert_eq!(session.explore(), SessionOutcome::PoweredOff);
        assert_eq!(session.position(), (3, 3));
        assert_eq!(session.world().facing(), Direction::Left);
        assert!(session.host().played_sfx(Sfx::Bump));
    }

    #[test]
    fn entrances_change_maps() {
        let mut session = field("press up", MapId::Overworld, 7, 6, Direction::Down);
        session.config.encounters = false;
        session.explore();
        assert_eq!(session.map_id(), MapId::Tantegel);
        assert_eq!(session.position(), (7, 10));
    }

    #[test]
    fn swamp_hurts_unless_wearing_erdricks_armor() {
        let mut session = field("press right", MapId::Overworld, 14, 5, Direction::Right);
        session.config.encounters = false;
        let hp = session.player().hp();
        session.explore();
        assert_eq!(session.position(), (15, 5));
        assert_eq!(session.player().hp(), hp - 2);

        let mut session = field("press right", MapId::Overworld, 14, 5, Direction::Right);
        session.config.encounters = false;
        session.player.equipment_mut().armor = Armor::ErdricksArmor;
        session.player.set_hp(1);
        session.explore();
        assert_eq!(session.player().hp(), 2);
    }

    #[test]
    fn fleeing_the_golem_steps_back() {
        let mut session = field("press down\nselect 1\nidle 1", MapId::Overworld, 13, 12, Direction::Down);
        session.world.map.set_block(13, 12, BlockType::Bridge);
        // Spawn, preempt pair, flee pair.
        session.set_rng(SequenceRandom::new([0, 200, 0, 255, 0]));
        session.player.set_experience(10_000);
        session.explore();
        assert!(session.host().saw_text(text::GOLEM_BLOCKS_PATH));
        assert_eq!(session.position(), (13, 12));
        assert!(!session.player().quest().contains(QuestFlags::GOLEM_DEAD));
    }

    #[test]
    fn idle_popup_shows_once() {
        let mut session = field("idle 200", MapId::ThroneRoom, 4, 3, Direction::Up);
        session.config.idle_popup_frames = 50;
        session.explore();
        let popups = session
            .host()
            .windows()
            .into_iter()
            .filter(|&kind| kind == WindowKind::Status)
            .count();
        assert_eq!(popups, 1);
    }

    #[test]
    fn encounter_on_grass() {
        // Encounter draw, group pick, then the fight: spawn and preempt.
        let mut session = field("press left\nselect 1\nidle 1", MapId::Overworld, 6, 2, Direction::Left);
        session.set_rng(SequenceRandom::new([0, 0, 0, 200, 0, 200, 10]));
        session.explore();
        assert!(session.host().saw_text(text::DRAWS_NEAR));
        assert_eq!(session.position(), (5, 2));
    }

    #[test]
    fn repel_runs_out() {
        let mut session = field("press right", MapId::Overworld, 2, 1, Direction::Right);
        session.config.encounters = false;
        session.explore.repel_steps = 1;
        session.explore();
        assert_eq!(session.explore_state().repel_steps(), 0);
        assert!(session.host().saw_text(text::REPEL_WORN_OFF));
    }
}
