//! The field command window.

use tracing::{debug, info};

use crate::{
    GameSession, SessionOutcome,
    dialog::text,
    host::{Host, Selection, Sfx, StatusView, Window},
    map::{
        BlockType, MapPoint,
        treasure::{self, Treasure},
    },
    player::{
        Player,
        flags::StoryFlags,
        items::{InventoryEntry, Item},
    },
};

/// Field commands, in window order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Talk,
    Spell,
    Status,
    Item,
    Stairs,
    Door,
    Search,
    Take,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Self::Talk,
        Self::Spell,
        Self::Status,
        Self::Item,
        Self::Stairs,
        Self::Door,
        Self::Search,
        Self::Take,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

pub fn status_view(player: &Player) -> StatusView<'_> {
    StatusView {
        name: player.name(),
        level: player.level(),
        hp: player.hp(),
        mp: player.mp(),
        gold: player.gold(),
        experience: player.experience(),
    }
}

impl<H: Host> GameSession<H> {
    /// Opens the command window and runs the picked command.
    pub(crate) fn command_menu(&mut self) -> Option<SessionOutcome> {
        let Selection::Index(index) = self.host.show_window(Window::Command) else {
            return None;
        };
        let command = Command::from_index(index)?;
        debug!(?command, "field command");
        match command {
            Command::Talk => return self.talk(),
            Command::Spell => return self.cast_in_field(),
            Command::Status => self.show_status(),
            Command::Item => return self.use_item_in_field(),
            Command::Stairs => self.take_stairs(),
            Command::Door => self.open_door(),
            Command::Search => self.search(),
            Command::Take => self.take_treasure(),
        }
        None
    }

    fn take_stairs(&mut self) {
        match self.stairs_exit() {
            Some(exit) => {
                self.host.play_sfx(Sfx::Stairs);
                self.take_exit(exit);
            }
            None => self.say(text::NO_STAIRS),
        }
    }

    fn open_door(&mut self) {
        let (x, y) = self.world.ahead(1);
        if self.block_at(x, y) != BlockType::Door {
            self.say(text::NO_DOOR);
            return;
        }
        if !self.player.inventory_mut().take_key() {
            self.say(text::NO_KEY);
            return;
        }
        let (x, y) = (x as u8, y as u8);
        self.modify_block(x, y, BlockType::Brick);
        let point = MapPoint::new(self.map_id(), x, y);
        self.history.record_door(point);
        self.host.play_sfx(Sfx::Door);
        info!(map = %point.map, x, y, keys = self.player.inventory().keys(), "door opened");
    }

    fn search(&mut self) {
        let (x, y) = self.position();
        if self.block_at(x.into(), y.into()) == BlockType::Chest {
            self.say(text::TREASURE_UNDERFOOT);
            return;
        }
        let point = MapPoint::new(self.map_id(), x, y);
        let found = match treasure::hidden_item_at(point) {
            Some(Item::ErdricksToken) => Some((Item::ErdricksToken, StoryFlags::TOKEN_FOUND)),
            Some(Item::FairyFlute) => Some((Item::FairyFlute, StoryFlags::FLUTE_FOUND)),
            _ => None,
        };
        match found {
            Some((item, flag)) if !self.player.story().contains(flag) => {
                if self.receive_item(item) {
                    self.player.story_mut().insert(flag);
                }
            }
            _ => self.say(text::NOTHING_HERE),
        }
    }

    fn take_treasure(&mut self) {
        let (x, y) = self.position();
        if self.block_at(x.into(), y.into()) != BlockType::Chest {
            self.say(text::NOTHING_HERE);
            return;
        }
        let point = MapPoint::new(self.map_id(), x, y);
        let Some(contents) = treasure::chest_at(point) else {
            self.say(text::CHEST_EMPTY);
            return;
        };
        let taken = match contents {
            Treasure::Gold { base, mask } => {
                let gold = base.saturating_add(self.rng.masked(mask).into());
                self.player.add_gold(gold);
                self.say_number(text::FOUND_GOLD, gold);
                true
            }
            Treasure::Herb => self.receive_counted(InventoryEntry::Herb(1)),
            Treasure::Key => self.receive_counted(InventoryEntry::Key(1)),
            Treasure::Item(item) => self.receive_item(item),
        };
        if !taken {
            return;
        }
        self.host.play_sfx(Sfx::Chest);
        self.modify_block(x, y, BlockType::Brick);
        self.history.record_treasure(point);
        info!(map = %point.map, x, y, ?contents, "chest opened");
    }

    /// Herbs and keys have their own counters instead of bag slots.
    fn receive_counted(&mut self, entry: InventoryEntry) -> bool {
        let inventory = self.player.inventory_mut();
        let stored = match entry {
            InventoryEntry::Key(_) => inventory.add_key(),
            _ => inventory.add_herb(),
        };
        if stored {
            self.say_subject(text::FOUND_ITEM, entry.name());
        } else {
            self.say_subject(text::LEFT_IN_CHEST, entry.name());
        }
        stored
    }

    /// Puts `item` in the bag, offering to toss something when it is full.
    ///
    /// Returns false when the hero ends up without the item; in that case
    /// the bag is unchanged.
    pub(crate) fn receive_item(&mut self, item: Item) -> bool {
        if self.player.inventory_mut().add_item(item).is_ok() {
            self.say_subject(text::FOUND_ITEM, item.name());
            return true;
        }
        self.say_subject(text::BAG_FULL_TOSS, item.name());
        if !self.confirm() {
            self.say_subject(text::LEFT_IN_CHEST, item.name());
            return false;
        }
        let tossable: Vec<InventoryEntry> = self
            .player
            .inventory()
            .items()
            .iter()
            .filter(|held| !held.is_important())
            .map(|&held| InventoryEntry::Item(held))
            .collect();
        let picked = self
            .host
            .show_window(Window::ItemList(&tossable))
            .index()
            .and_then(|index| tossable.get(index));
        let Some(&InventoryEntry::Item(tossed)) = picked else {
            self.say_subject(text::LEFT_IN_CHEST, item.name());
            return false;
        };
        let inventory = self.player.inventory_mut();
        inventory.remove_item(tossed);
        if inventory.add_item(item).is_err() {
            // Removing one item always frees a slot.
            return false;
        }
        self.say_subject(text::TOSSED_ITEM, tossed.name());
        self.say_subject(text::FOUND_ITEM, item.name());
        true
    }
}
