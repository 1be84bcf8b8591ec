//! The title screen's adventure log menu.
//!
//! Which actions are offered depends only on which slots currently validate.
//! Every action comes back to the root menu unless it starts a game, and
//! cancelling any submenu returns to the root with nothing changed.

use core::fmt;

use tracing::{debug, info, warn};

use crate::{
    GameSession,
    dialog::{MessageSpeed, text},
    host::{Host, Music, Window},
    memory::battery::SLOT_COUNT,
    player::Player,
};

/// Root state of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleState {
    NoSavesExist,
    SomeSlotsUsed,
    AllSlotsUsed,
}

/// Entries of the root menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleAction {
    Continue,
    ChangeSpeed,
    NewGame,
    Copy,
    Erase,
}

impl fmt::Display for TitleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Continue => "CONTINUE A QUEST",
            Self::ChangeSpeed => "CHANGE MESSAGE SPEED",
            Self::NewGame => "BEGIN A NEW QUEST",
            Self::Copy => "COPY A QUEST",
            Self::Erase => "ERASE A QUEST",
        };
        f.write_str(label)
    }
}

impl TitleState {
    /// Derives the root state from per-slot validity.
    pub fn from_slots(slots: &[bool]) -> Self {
        let used = slots.iter().filter(|&&valid| valid).count();
        match used {
            0 => Self::NoSavesExist,
            n if n >= slots.len() => Self::AllSlotsUsed,
            _ => Self::SomeSlotsUsed,
        }
    }

    pub const fn actions(self) -> &'static [TitleAction] {
        match self {
            Self::NoSavesExist => &[TitleAction::NewGame],
            Self::SomeSlotsUsed => &[
                TitleAction::Continue,
                TitleAction::ChangeSpeed,
                TitleAction::NewGame,
                TitleAction::Copy,
                TitleAction::Erase,
            ],
            Self::AllSlotsUsed => &[
                TitleAction::Continue,
                TitleAction::ChangeSpeed,
                TitleAction::Erase,
            ],
        }
    }
}

/// How the title screen was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleOutcome {
    NewGame { slot: usize },
    Continue { slot: usize },
    PoweredOff,
}

impl<H: Host> GameSession<H> {
    pub fn title_state(&self) -> TitleState {
        TitleState::from_slots(&self.battery.slot_status())
    }

    /// Runs the title menu until a game starts or the console is switched off.
    pub fn title_menu(&mut self) -> TitleOutcome {
        self.host.play_music(Music::Title);
        self.drop_corrupted_slots();
        loop {
            if self.host.powered_off() {
                return TitleOutcome::PoweredOff;
            }
            let actions = self.title_state().actions();
            let Some(&action) = self
                .host
                .show_window(Window::TitleMenu(actions))
                .index()
                .and_then(|index| actions.get(index))
            else {
                continue;
            };
            debug!(?action, "title menu");
            let started = match action {
                TitleAction::Continue => self.continue_quest(),
                TitleAction::ChangeSpeed => self.change_speed(),
                TitleAction::NewGame => self.begin_quest(),
                TitleAction::Copy => self.copy_quest(),
                TitleAction::Erase => self.erase_quest(),
            };
            if let Some(outcome) = started {
                return outcome;
            }
        }
    }

    /// Erases slots where data is present but no replica validates, telling
    /// the player once per lost log.
    fn drop_corrupted_slots(&mut self) {
        for slot in 0..SLOT_COUNT {
            if !self.battery.is_blank(slot) && !self.battery.is_valid(slot) {
                self.load_slot(slot);
            }
        }
    }

    fn slots_where(&self, valid: bool) -> Vec<usize> {
        (0..SLOT_COUNT)
            .filter(|&slot| self.battery.is_valid(slot) == valid)
            .collect()
    }

    fn pick_slot(&mut self, slots: &[usize]) -> Option<usize> {
        if slots.is_empty() {
            return None;
        }
        let index = self.host.show_window(Window::SlotSelect(slots)).index()?;
        slots.get(index).copied()
    }

    fn pick_speed(&mut self) -> Option<MessageSpeed> {
        let index = self.host.show_window(Window::MessageSpeed).index()?;
        MessageSpeed::from_index(index)
    }

    fn load_slot(&mut self, slot: usize) -> Option<Player> {
        match self.battery.validate_and_load(slot) {
            Ok(player) => Some(player),
            Err(err) => {
                warn!(slot, %err, "adventure log unavailable");
                self.say(text::DEEDS_NOT_RECORDED);
                None
            }
        }
    }

    fn continue_quest(&mut self) -> Option<TitleOutcome> {
        let slot = self.pick_slot(&self.slots_where(true))?;
        let player = self.load_slot(slot)?;
        info!(slot, name = %player.name(), "quest resumed");
        self.player = player;
        self.slot = Some(slot);
        Some(TitleOutcome::Continue { slot })
    }

    fn begin_quest(&mut self) -> Option<TitleOutcome> {
        let free = self.slots_where(false);
        if free.is_empty() {
            self.say(text::NO_FREE_SLOT);
            return None;
        }
        let slot = self.pick_slot(&free)?;
        let name = self.host.enter_name()?;
        let speed = self.pick_speed()?;
        let mut player = Player::new(&name);
        if player.name().is_empty() {
            return None;
        }
        player.set_message_speed(speed);
        info!(slot, name = %player.name(), "new quest");
        self.player = player;
        self.slot = Some(slot);
        Some(TitleOutcome::NewGame { slot })
    }

    fn change_speed(&mut self) -> Option<TitleOutcome> {
        let slot = self.pick_slot(&self.slots_where(true))?;
        let speed = self.pick_speed()?;
        let mut player = self.load_slot(slot)?;
        player.set_message_speed(speed);
        if let Err(err) = self.battery.save_player(slot, &player) {
            warn!(slot, %err, "could not rewrite adventure log");
        }
        None
    }

    fn copy_quest(&mut self) -> Option<TitleOutcome> {
        let src = self.pick_slot(&self.slots_where(true))?;
        let free = self.slots_where(false);
        if free.is_empty() {
            self.say(text::NO_FREE_SLOT);
            return None;
        }
        let dst = self.pick_slot(&free)?;
        match self.battery.copy(src, dst) {
            Ok(()) => self.say(text::LOG_COPIED),
            Err(err) => {
                warn!(src, dst, %err, "copy failed");
                self.say(text::DEEDS_NOT_RECORDED);
            }
        }
        None
    }

    fn erase_quest(&mut self) -> Option<TitleOutcome> {
        let slot = self.pick_slot(&self.slots_where(true))?;
        if !self.confirm() {
            return None;
        }
        match self.battery.erase(slot) {
            Ok(()) => self.say(text::LOG_ERASED),
            Err(err) => warn!(slot, %err, "erase failed"),
        }
        None
    }
}
