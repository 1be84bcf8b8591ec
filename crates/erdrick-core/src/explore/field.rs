//! Spells and items used outside of battle.

use tracing::info;

use crate::{
    GameSession, SessionOutcome,
    combat::{BattleOutcome, damage, spells::Spell},
    dialog::{TextRef, text},
    explore::{RADIANT_RADIUS, RADIANT_STEPS, TORCH_RADIUS, WARD_STEPS, triggers},
    host::{Host, Music, Sfx, Window},
    map::{
        BlockType, MapId,
        layouts::{BRIDGE_SITE, BRIDGE_VANTAGE, RETURN_POINT},
    },
    player::{
        flags::{QuestFlags, StatusFlags},
        items::{InventoryEntry, Item},
        stats,
    },
    ppu::FlashKind,
};

impl<H: Host> GameSession<H> {
    /// Whether `spell` would do anything here. Checked before any MP is
    /// spent.
    fn field_spell_applies(&self, spell: Spell) -> bool {
        let map = self.map_id();
        match spell {
            Spell::Heal | Spell::Healmore | Spell::Repel => true,
            Spell::Radiant => map.layout().dark,
            Spell::Outside => map.outside().is_some(),
            Spell::Return => map == MapId::Overworld,
            Spell::Hurt | Spell::Hurtmore | Spell::Sleep | Spell::Stopspell => false,
        }
    }

    pub(crate) fn cast_in_field(&mut self) -> Option<SessionOutcome> {
        let known = self.player.spells();
        if known.is_empty() {
            self.say(text::NO_SPELLS);
            return None;
        }
        let &spell = self
            .host
            .show_window(Window::SpellList(&known))
            .index()
            .and_then(|index| known.get(index))?;
        if !spell.works_in_field() || !self.field_spell_applies(spell) {
            self.say(text::SPELL_WILL_NOT_WORK);
            return None;
        }
        if !self.player.spend_mp(spell.mp_cost()) {
            self.say(text::NOT_ENOUGH_MP);
            return None;
        }
        self.host.play_sfx(Sfx::Spell);
        self.palette_flash(FlashKind::Spell, 1);
        self.say_subject(text::SPELL_CAST, spell.name());
        info!(%spell, mp = self.player.mp(), "field spell");
        match spell {
            Spell::Heal | Spell::Healmore => {
                let amount = spell.roll(self.rng.as_mut()).unwrap_or_default();
                let restored = self.player.heal(amount);
                self.host.play_sfx(Sfx::Heal);
                self.say_number(text::HP_RESTORED, restored);
            }
            Spell::Radiant => {
                self.world.light_radius = RADIANT_RADIUS;
                self.explore.radiant_steps = RADIANT_STEPS;
                self.draw_view();
                self.place_npc_sprites();
                self.say(text::RADIANCE);
            }
            Spell::Outside => {
                if let Some((map, x, y, facing)) = self.map_id().outside() {
                    self.travel(map, x, y, facing);
                }
            }
            Spell::Return => {
                self.host.play_sfx(Sfx::Wings);
                let (map, x, y, facing) = RETURN_POINT;
                self.travel(map, x, y, facing);
            }
            Spell::Repel => self.explore.repel_steps = WARD_STEPS,
            Spell::Hurt | Spell::Hurtmore | Spell::Sleep | Spell::Stopspell => {}
        }
        None
    }

    pub(crate) fn use_item_in_field(&mut self) -> Option<SessionOutcome> {
        let entries = self.player.inventory().entries();
        if entries.is_empty() {
            self.say(text::BAG_EMPTY);
            return None;
        }
        let &entry = self
            .host
            .show_window(Window::ItemList(&entries))
            .index()
            .and_then(|index| entries.get(index))?;
        match entry {
            InventoryEntry::Herb(_) => {
                self.player.inventory_mut().take_herb();
                let amount = damage::herb_heal(self.rng.as_mut());
                let restored = self.player.heal(amount);
                self.host.play_sfx(Sfx::Heal);
                self.say_number(text::HERB_USED, restored);
            }
            InventoryEntry::Key(_) => self.say(text::CANNOT_USE_HERE),
            InventoryEntry::Item(item) => return self.use_field_item(item),
        }
        None
    }

    fn use_field_item(&mut self, item: Item) -> Option<SessionOutcome> {
        match item {
            Item::Torch => {
                if !self.map_id().layout().dark {
                    self.say(text::CANNOT_USE_HERE);
                    return None;
                }
                self.player.inventory_mut().remove_item(Item::Torch);
                self.world.light_radius = self.world.light_radius.max(TORCH_RADIUS);
                self.draw_view();
                self.place_npc_sprites();
                self.say(text::TORCH_LIT);
            }
            Item::FairyWater => {
                self.player.inventory_mut().remove_item(Item::FairyWater);
                self.explore.fairy_water_steps = WARD_STEPS;
                self.say(text::FAIRY_WATER_SPRINKLED);
            }
            Item::Wings => {
                if self.map_id() != MapId::Overworld {
                    self.say(text::CANNOT_USE_HERE);
                    return None;
                }
                self.player.inventory_mut().remove_item(Item::Wings);
                self.say(text::WINGS_FLY);
                self.host.play_sfx(Sfx::Wings);
                let (map, x, y, facing) = RETURN_POINT;
                self.travel(map, x, y, facing);
            }
            Item::DragonsScale => self.wear(StatusFlags::WEARING_SCALE, text::SCALE_PUT_ON),
            Item::FightersRing => self.wear(StatusFlags::WEARING_RING, text::RING_PUT_ON),
            Item::CursedBelt => self.wear(StatusFlags::CURSED_BELT, text::CURSED),
            Item::DeathNecklace => self.wear(StatusFlags::DEATH_NECKLACE, text::CURSED),
            Item::GwaelinsLove => {
                let needed = stats::experience_to_next(self.player.experience()).unwrap_or(0);
                self.say_number(text::GWAELINS_LOVE, needed);
            }
            Item::RainbowDrop => self.raise_rainbow_bridge(),
            Item::SilverHarp => {
                self.say(text::HARP_PLAYED);
                self.host.play_music(Music::SilverHarp);
                self.wait_for_track_end();
                if self.map_id() != MapId::Overworld {
                    self.host.play_music(self.map_id().layout().music);
                    self.say(text::NO_EFFECT);
                    return None;
                }
                let group = triggers::harp_group();
                let kind = group[self.rng.below(group.len() as u8) as usize];
                if self.fight(kind) == BattleOutcome::PoweredOff {
                    return Some(SessionOutcome::PoweredOff);
                }
            }
            Item::FairyFlute => {
                self.say(text::FLUTE_PLAYED);
                self.host.play_music(Music::FairyFlute);
                self.wait_for_track_end();
                self.host.play_music(self.map_id().layout().music);
                self.say(text::NO_EFFECT);
            }
            Item::ErdricksToken | Item::StonesOfSunlight | Item::StaffOfRain => {
                self.say(text::NO_EFFECT)
            }
        }
        None
    }

    /// Puts on a worn item. Cursed pieces say so and stay on.
    fn wear(&mut self, flag: StatusFlags, message: TextRef) {
        if self.player.status().contains(flag) {
            self.say(text::ALREADY_WEARING);
            return;
        }
        self.player.status_mut().insert(flag);
        info!(?flag, cursed = self.player.is_cursed(), "item worn");
        self.say(message);
    }

    fn raise_rainbow_bridge(&mut self) {
        let (vx, vy, facing) = BRIDGE_VANTAGE;
        let in_place = self.map_id() == MapId::Overworld
            && self.position() == (vx, vy)
            && self.world.facing == facing;
        if !in_place || self.player.quest().contains(QuestFlags::RAINBOW_BRIDGE) {
            self.say(text::NO_EFFECT);
            return;
        }
        let (bx, by) = BRIDGE_SITE;
        self.modify_block(bx, by, BlockType::Bridge);
        self.player.quest_mut().insert(QuestFlags::RAINBOW_BRIDGE);
        info!("rainbow bridge formed");
        self.say(text::RAINBOW_BRIDGE);
    }
}
