//! Collaborators the engine drives but never implements.
//!
//! A front end provides one type implementing [`Host`]: a write-only video
//! sink, a fire-and-forget audio driver, a blocking window renderer and a
//! joypad. [`scripted::ScriptedHost`] is the headless implementation used by
//! the CLI and by tests.

use bitflags::bitflags;

use crate::{
    combat::spells::Spell,
    dialog::{MessageSpeed, TextArgs, TextRef},
    explore::shops::Ware,
    memory::ppu::SPRITE_RAM_SIZE,
    player::items::InventoryEntry,
    save::menu::TitleAction,
};

pub mod scripted;

bitflags! {
    /// Joypad state, one bit per button in shift-register order (A first).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const A = 0x01;
        const B = 0x02;
        const SELECT = 0x04;
        const START = 0x08;
        const UP = 0x10;
        const DOWN = 0x20;
        const LEFT = 0x40;
        const RIGHT = 0x80;
        const DPAD = Self::UP.bits() | Self::DOWN.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

/// Result of a modal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Index(usize),
    Cancelled,
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(index),
            Self::Cancelled => None,
        }
    }
}

/// Values shown by the status window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView<'a> {
    pub name: &'a str,
    pub level: u8,
    pub hp: u8,
    pub mp: u8,
    pub gold: u16,
    pub experience: u16,
}

/// Modal windows the engine opens.
///
/// Windows with a list return the index into that list. A yes/no
/// [`Window::Confirm`] returns 0 for yes and 1 for no.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window<'a> {
    TitleMenu(&'a [TitleAction]),
    SlotSelect(&'a [usize]),
    MessageSpeed,
    Confirm,
    /// Talk, Spell, Status, Item, Stairs, Door, Search, Take.
    Command,
    /// Fight, Run, Spell, Item.
    BattleCommand,
    SpellList(&'a [Spell]),
    ItemList(&'a [InventoryEntry]),
    Shop(&'a [Ware]),
    Status(StatusView<'a>),
}

/// Discriminant of a [`Window`], for logs and transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    TitleMenu,
    SlotSelect,
    MessageSpeed,
    Confirm,
    Command,
    BattleCommand,
    SpellList,
    ItemList,
    Shop,
    Status,
}

impl Window<'_> {
    pub fn kind(&self) -> WindowKind {
        match self {
            Self::TitleMenu(_) => WindowKind::TitleMenu,
            Self::SlotSelect(_) => WindowKind::SlotSelect,
            Self::MessageSpeed => WindowKind::MessageSpeed,
            Self::Confirm => WindowKind::Confirm,
            Self::Command => WindowKind::Command,
            Self::BattleCommand => WindowKind::BattleCommand,
            Self::SpellList(_) => WindowKind::SpellList,
            Self::ItemList(_) => WindowKind::ItemList,
            Self::Shop(_) => WindowKind::Shop,
            Self::Status(_) => WindowKind::Status,
        }
    }
}

/// Sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Cursor,
    Bump,
    Stairs,
    Door,
    Chest,
    SwampStep,
    ForceField,
    Attack,
    Excellent,
    EnemyHit,
    PlayerHit,
    Missed,
    Dodge,
    Spell,
    Fire,
    Run,
    Wings,
    Heal,
}

/// Music tracks. Jingles play once and are waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Music {
    Title,
    Overworld,
    Town,
    Castle,
    ThroneRoom,
    Dungeon,
    Battle,
    FinalBattle,
    Victory,
    LevelUp,
    Inn,
    Death,
    Princess,
    SilverHarp,
    FairyFlute,
    Ending,
}

impl Music {
    pub const fn is_jingle(self) -> bool {
        matches!(
            self,
            Self::Victory
                | Self::LevelUp
                | Self::Inn
                | Self::Death
                | Self::Princess
                | Self::SilverHarp
                | Self::FairyFlute
        )
    }
}

/// Write-only video memory plus the per-frame registers.
pub trait VideoSink {
    fn write(&mut self, addr: u16, data: u8);

    fn set_scroll(&mut self, x: u8, y: u8);

    fn upload_sprites(&mut self, sprites: &[u8; SPRITE_RAM_SIZE]);

    /// Called once per blank after every other update for the frame.
    fn frame_complete(&mut self, frame: u64);
}

pub trait AudioDriver {
    fn play_sfx(&mut self, sfx: Sfx);

    fn play_music(&mut self, music: Music);

    /// Advances the driver by one frame.
    fn service(&mut self);

    /// True while a jingle is still playing.
    fn is_playing(&self) -> bool;
}

pub trait WindowRenderer {
    /// Shows `window` and blocks until the player picks or cancels.
    fn show_window(&mut self, window: Window<'_>) -> Selection;

    /// Prints a dialog line and waits for it to be acknowledged.
    fn show_text(&mut self, text: TextRef, args: &TextArgs<'_>, speed: MessageSpeed);

    /// Runs the name entry screen. `None` means the player backed out.
    fn enter_name(&mut self) -> Option<String>;
}

pub trait Joypad {
    fn poll(&mut self) -> Buttons;
}

/// Everything a session needs from the outside world.
pub trait Host: VideoSink + AudioDriver + WindowRenderer + Joypad {
    /// True once the console has been switched off; the session unwinds.
    fn powered_off(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_match_bits() {
        assert_eq!(Buttons::from_name("A"), Some(Buttons::A));
        assert_eq!(Buttons::from_name("RIGHT"), Some(Buttons::RIGHT));
        assert_eq!(Buttons::from_name("TURBO"), None);
        assert_eq!(Buttons::RIGHT.bits(), 0x80);
        assert!(Buttons::DPAD.contains(Buttons::LEFT));
    }

    #[test]
    fn selection_index() {
        assert_eq!(Selection::Index(3).index(), Some(3));
        assert_eq!(Selection::Cancelled.index(), None);
    }
}
