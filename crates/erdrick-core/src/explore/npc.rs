//! People standing around the maps, and what they say.

use tracing::{info, warn};

use crate::{
    GameSession, SessionOutcome,
    combat::BattleOutcome,
    dialog::{TextRef, text},
    enemy::EnemyKind,
    explore::shops::{self, Ware},
    host::{Host, Music},
    map::{MapId, MapPoint},
    player::{
        flags::{QuestFlags, StatusFlags, StoryFlags},
        items::Item,
        stats,
    },
};

/// What happens when the hero talks to someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcRole {
    King,
    Guard(TextRef),
    Townsperson(TextRef),
    WiseMan,
    Innkeeper { price: u16 },
    ArmsShop(&'static [Ware]),
    ToolShop(&'static [Ware]),
    KeySeller,
    Princess,
    Dragonlord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Npc {
    pub at: MapPoint,
    pub role: NpcRole,
}

const fn npc(map: MapId, x: u8, y: u8, role: NpcRole) -> Npc {
    Npc {
        at: MapPoint::new(map, x, y),
        role,
    }
}

pub static NPCS: &[Npc] = &[
    npc(MapId::ThroneRoom, 4, 2, NpcRole::King),
    npc(MapId::Tantegel, 6, 8, NpcRole::Guard(text::GUARD_GREETING)),
    npc(MapId::Tantegel, 9, 8, NpcRole::Guard(text::GUARD_LOCKED_DOOR)),
    npc(MapId::Tantegel, 12, 7, NpcRole::WiseMan),
    npc(MapId::Brecconary, 3, 2, NpcRole::ArmsShop(shops::BRECCONARY_ARMS)),
    npc(
        MapId::Brecconary,
        9,
        2,
        NpcRole::Innkeeper {
            price: shops::BRECCONARY_INN_PRICE,
        },
    ),
    npc(MapId::Brecconary, 3, 8, NpcRole::ToolShop(shops::BRECCONARY_TOOLS)),
    npc(MapId::Brecconary, 10, 8, NpcRole::KeySeller),
    npc(MapId::Brecconary, 8, 5, NpcRole::Townsperson(text::TOWNSPERSON_RUMOR)),
    npc(MapId::ErdricksCave, 10, 6, NpcRole::Princess),
    npc(MapId::CharlockThrone, 4, 1, NpcRole::Dragonlord),
];

/// First sprite slot used for people; slots before it belong to the hero.
const FIRST_NPC_SPRITE: usize = 4;
/// Screen position of the hero's top-left sprite.
const HERO_SCREEN: (i16, i16) = (0x78, 0x6F);

impl Npc {
    /// Whether the story still has this person around.
    fn present(&self, quest: QuestFlags, status: StatusFlags) -> bool {
        match self.role {
            NpcRole::Dragonlord => !quest.contains(QuestFlags::DRAGONLORD_DEAD),
            NpcRole::Princess => {
                !status.intersects(StatusFlags::CARRYING_PRINCESS | StatusFlags::PRINCESS_RETURNED)
            }
            _ => true,
        }
    }
}

impl<H: Host> GameSession<H> {
    /// Person standing at `(x, y)` on the current map.
    pub fn npc_at(&self, x: i16, y: i16) -> Option<&'static Npc> {
        let map = self.map_id();
        NPCS.iter().find(|npc| {
            npc.at.map == map
                && i16::from(npc.at.x) == x
                && i16::from(npc.at.y) == y
                && npc.present(self.player.quest(), self.player.status())
        })
    }

    /// Writes sprites for everyone visible on the current map.
    pub(crate) fn place_npc_sprites(&mut self) {
        let map = self.map_id();
        let (px, py) = (self.world.x as i16, self.world.y as i16);
        let dark = map.layout().dark;
        let radius = self.world.light_radius as i16;
        let (quest, status) = (self.player.quest(), self.player.status());
        let mut slot = FIRST_NPC_SPRITE;
        for (index, npc) in NPCS.iter().filter(|npc| npc.at.map == map).enumerate() {
            let (dx, dy) = (npc.at.x as i16 - px, npc.at.y as i16 - py);
            let visible = npc.present(quest, status)
                && dx.abs() < 8
                && dy.abs() < 7
                && (!dark || (dx.abs() <= radius && dy.abs() <= radius));
            let tile = 0x40 + (index as u8) * 2;
            let (sx, sy) = (HERO_SCREEN.0 + dx * 16, HERO_SCREEN.1 + dy * 16);
            for half in 0..2 {
                let entry = if visible {
                    [sy as u8, tile + half as u8, 0x01, (sx + half * 8) as u8]
                } else {
                    [0xF0, 0, 0, 0]
                };
                self.frame.set_sprite(slot, entry);
                slot += 1;
            }
        }
        while slot < FIRST_NPC_SPRITE + NPCS.len() * 2 {
            self.frame.set_sprite(slot, [0xF0, 0, 0, 0]);
            slot += 1;
        }
    }

    /// Talks to whoever stands in front of the hero, reaching across a
    /// shop counter if there is one.
    pub(crate) fn talk(&mut self) -> Option<SessionOutcome> {
        let (mut x, mut y) = self.world.ahead(1);
        if self.block_at(x, y).is_counter() {
            (x, y) = self.world.ahead(2);
        }
        let Some(npc) = self.npc_at(x, y) else {
            self.say(text::NO_ONE_THERE);
            return None;
        };
        match npc.role {
            NpcRole::King => self.talk_to_king(),
            NpcRole::Guard(line) | NpcRole::Townsperson(line) => self.say(line),
            NpcRole::WiseMan => {
                if self.player.story().contains(StoryFlags::TOKEN_FOUND) {
                    self.say(text::WISE_MAN_FLUTE);
                } else {
                    self.say(text::WISE_MAN_TOKEN);
                }
            }
            NpcRole::Innkeeper { price } => self.visit_inn(price),
            NpcRole::ArmsShop(wares) => self.visit_arms_shop(wares),
            NpcRole::ToolShop(wares) => self.visit_tool_shop(wares),
            NpcRole::KeySeller => self.visit_key_seller(),
            NpcRole::Princess => self.rescue_princess(),
            NpcRole::Dragonlord => return self.face_dragonlord(),
        }
        None
    }

    fn talk_to_king(&mut self) {
        let status = self.player.status_mut();
        if status.contains(StatusFlags::CARRYING_PRINCESS) {
            status.remove(StatusFlags::CARRYING_PRINCESS);
            status.insert(StatusFlags::PRINCESS_RETURNED);
            self.host.play_music(Music::Princess);
            self.wait_for_track_end();
            self.say(text::KING_PRINCESS_THANKS);
            self.receive_item(Item::GwaelinsLove);
        } else if !self.player.quest().contains(QuestFlags::MET_KING) {
            self.player.quest_mut().insert(QuestFlags::MET_KING);
            self.say(text::KING_QUEST);
        } else {
            self.say(text::KING_WELCOME);
        }
        if let Some(needed) = stats::experience_to_next(self.player.experience()) {
            self.say_number(text::KING_NEXT_LEVEL, needed);
        }
        self.say(text::KING_SAVE_PROMPT);
        if self.confirm() {
            self.record_deeds();
        }
        self.say(text::KING_FAREWELL);
    }

    /// Writes the adventure log for the current slot.
    fn record_deeds(&mut self) {
        let Some(slot) = self.slot else {
            warn!("no adventure log slot chosen; nothing saved");
            self.say(text::DEEDS_NOT_RECORDED);
            return;
        };
        self.player.set_restart(true);
        match self.battery.save_player(slot, &self.player) {
            Ok(()) => self.say(text::KING_SAVED),
            Err(err) => {
                warn!(slot, %err, "adventure log not written");
                self.say(text::DEEDS_NOT_RECORDED);
            }
        }
    }

    fn rescue_princess(&mut self) {
        self.player.status_mut().insert(StatusFlags::CARRYING_PRINCESS);
        self.host.play_music(Music::Princess);
        self.wait_for_track_end();
        self.place_npc_sprites();
        info!("princess rescued");
        self.say(text::PRINCESS_RESCUED);
    }

    /// The dragonlord's offer. Taking it ends the game; refusing starts the
    /// last fight, against both of his forms back to back.
    fn face_dragonlord(&mut self) -> Option<SessionOutcome> {
        self.say(text::DRAGONLORD_WELCOME);
        self.say(text::DRAGONLORD_OFFER);
        if self.confirm() {
            self.say(text::DRAGONLORD_ACCEPTED);
            self.player.reset_progress();
            info!("took the dragonlord's offer");
            return Some(SessionOutcome::GameOver);
        }
        self.say(text::DRAGONLORD_REFUSED);
        for form in [EnemyKind::Dragonlord, EnemyKind::DragonlordTrueForm] {
            match self.fight(form) {
                BattleOutcome::Victory => {}
                BattleOutcome::PoweredOff => return Some(SessionOutcome::PoweredOff),
                _ => return None,
            }
            if form == EnemyKind::Dragonlord {
                self.say(text::DRAGONLORD_TRUE_FORM);
            }
        }
        self.place_npc_sprites();
        self.say(text::ENDING_RETURN);
        self.host.play_music(Music::Ending);
        info!(name = %self.player.name(), "the dragonlord is no more");
        Some(SessionOutcome::Ending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GameConfig,
        host::scripted::ScriptedHost,
        map::{Direction, World},
        player::Player,
    };

    fn facing(script: &str, map: MapId, x: u8, y: u8, dir: Direction) -> GameSession<ScriptedHost> {
        let host = ScriptedHost::from_script(script).expect("valid script");
        let mut session = GameSession::new(host, GameConfig::default());
        session.player = Player::new("Loto");
        session.world = World::new(map, x, y, dir);
        session
    }

    #[test]
    fn every_npc_stands_on_open_ground() {
        for npc in NPCS {
            let layout = npc.at.map.layout();
            let c = layout.rows[npc.at.y as usize].as_bytes()[npc.at.x as usize] as char;
            let block = crate::map::BlockType::from_char(c).expect("known block");
            assert!(block.is_passable(), "{npc:?} stands on {block:?}");
        }
    }

    #[test]
    fn talking_across_a_counter() {
        let mut session = facing("cancel", MapId::Brecconary, 3, 4, Direction::Up);
        assert_eq!(session.talk(), None);
        assert!(session.host().saw_text(text::SHOP_WELCOME));
        assert!(session.host().saw_text(text::SHOP_COME_AGAIN));
    }

    #[test]
    fn nobody_there() {
        let mut session = facing("", MapId::Brecconary, 6, 6, Direction::Up);
        session.talk();
        assert!(session.host().saw_text(text::NO_ONE_THERE));
    }

    #[test]
    fn king_saves_to_the_chosen_slot() {
        let mut session = facing("yes", MapId::ThroneRoom, 4, 3, Direction::Up);
        session.slot = Some(1);
        session.player.set_gold(77);
        session.talk();
        assert!(session.host().saw_text(text::KING_SAVED));
        assert!(session.host().saw_text(text::KING_NEXT_LEVEL));
        let saved = session.battery().valid_record(1).expect("log written").to_player();
        assert_eq!(saved.gold(), 77);
    }

    #[test]
    fn princess_comes_home() {
        let mut session = facing("no", MapId::ThroneRoom, 4, 3, Direction::Up);
        session.player.status_mut().insert(StatusFlags::CARRYING_PRINCESS);
        session.talk();
        let status = session.player().status();
        assert!(status.contains(StatusFlags::PRINCESS_RETURNED));
        assert!(!status.contains(StatusFlags::CARRYING_PRINCESS));
        assert!(session.player().inventory().contains(Item::GwaelinsLove));
    }

    #[test]
    fn full_bag_offers_a_toss_for_the_princess_gift() {
        let mut session = facing("yes\nselect 0\nno", MapId::ThroneRoom, 4, 3, Direction::Up);
        session.player.status_mut().insert(StatusFlags::CARRYING_PRINCESS);
        let inventory = session.player.inventory_mut();
        while inventory.add_item(Item::Wings).is_ok() {}
        session.talk();
        let inventory = session.player().inventory();
        assert!(inventory.contains(Item::GwaelinsLove));
        assert!(inventory.is_full());
        assert!(session.host().saw_text(text::TOSSED_ITEM));
        assert!(
            session
                .host()
                .windows()
                .contains(&crate::host::WindowKind::ItemList)
        );
    }

    #[test]
    fn accepting_the_dragonlord_ends_the_game() {
        let mut session = facing("yes", MapId::CharlockThrone, 4, 2, Direction::Up);
        session.player.set_experience(5000);
        session.player.set_gold(900);
        assert_eq!(session.talk(), Some(SessionOutcome::GameOver));
        assert_eq!(session.player().experience(), 0);
        assert_eq!(session.player().gold(), 0);
    }

    #[test]
    fn refusing_starts_the_last_fight() {
        let mut session = facing("no", MapId::CharlockThrone, 4, 2, Direction::Up);
        assert_eq!(session.talk(), Some(SessionOutcome::PoweredOff));
        assert!(session.host().saw_text(text::DRAGONLORD_REFUSED));
        assert!(session.host().played_music(Music::FinalBattle));
        assert!(!session.host().saw_text(text::DRAGONLORD_ACCEPTED));
    }

    #[test]
    fn the_dragonlord_is_gone_once_beaten() {
        let mut session = facing("", MapId::CharlockThrone, 4, 2, Direction::Up);
        assert!(session.npc_at(4, 1).is_some());
        session.player.quest_mut().insert(QuestFlags::DRAGONLORD_DEAD);
        assert!(session.npc_at(4, 1).is_none());
    }
}
