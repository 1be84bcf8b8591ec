//! Dialog references and text pacing.
//!
//! The engine never carries strings for dialog. Every line is a `(block,
//! entry)` pair the host resolves, optionally filled with a number, a
//! subject name (enemy, item, spell) and the hero's name. Branching lives in
//! the code that picks which reference to show.

use core::fmt;

use crate::{
    GameSession,
    host::{Host, Selection, Window},
};

/// A dialog line, resolved by the window renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRef {
    pub block: u8,
    pub entry: u8,
}

impl TextRef {
    pub const fn new(block: u8, entry: u8) -> Self {
        Self { block, entry }
    }
}

impl fmt::Display for TextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.entry)
    }
}

/// Substitutions for a dialog line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextArgs<'a> {
    pub number: Option<u32>,
    pub subject: Option<&'a str>,
    pub name: &'a str,
}

impl<'a> TextArgs<'a> {
    pub fn named(name: &'a str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn number(mut self, number: impl Into<u32>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn subject(mut self, subject: &'a str) -> Self {
        self.subject = Some(subject);
        self
    }
}

/// Text speed picked on the title screen and stored in the save record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageSpeed {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl MessageSpeed {
    pub const ALL: [MessageSpeed; 3] = [Self::Fast, Self::Normal, Self::Slow];

    /// Frames the renderer waits between characters.
    pub const fn frames_per_char(self) -> u8 {
        match self {
            Self::Fast => 0,
            Self::Normal => 1,
            Self::Slow => 2,
        }
    }

    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Unknown values fall back to normal speed.
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Fast,
            2 => Self::Slow,
            _ => Self::Normal,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Fast),
            1 => Some(Self::Normal),
            2 => Some(Self::Slow),
            _ => None,
        }
    }
}

impl fmt::Display for MessageSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fast => "fast",
            Self::Normal => "normal",
            Self::Slow => "slow",
        };
        f.write_str(label)
    }
}

impl<H: Host> GameSession<H> {
    /// Shows a dialog line with only the hero's name filled in.
    pub(crate) fn say(&mut self, text: TextRef) {
        self.say_args(text, None, None);
    }

    pub(crate) fn say_number(&mut self, text: TextRef, number: impl Into<u32>) {
        self.say_args(text, Some(number.into()), None);
    }

    pub(crate) fn say_subject(&mut self, text: TextRef, subject: &str) {
        self.say_args(text, None, Some(subject));
    }

    pub(crate) fn say_args(&mut self, text: TextRef, number: Option<u32>, subject: Option<&str>) {
        let args = TextArgs {
            number,
            subject,
            name: &self.player.name,
        };
        self.host.show_text(text, &args, self.player.message_speed);
    }

    /// Opens a yes/no window. Cancelling counts as no.
    pub(crate) fn confirm(&mut self) -> bool {
        self.host.show_window(Window::Confirm) == Selection::Index(0)
    }
}

/// Dialog table references used by the engine.
pub mod text {
    use super::TextRef;

    // Block 0: adventure log and the king.
    pub const DEEDS_NOT_RECORDED: TextRef = TextRef::new(0, 0);
    pub const LOG_ERASED: TextRef = TextRef::new(0, 1);
    pub const LOG_COPIED: TextRef = TextRef::new(0, 2);
    pub const NO_FREE_SLOT: TextRef = TextRef::new(0, 3);
    pub const KING_WELCOME: TextRef = TextRef::new(0, 4);
    pub const KING_NEXT_LEVEL: TextRef = TextRef::new(0, 5);
    pub const KING_SAVE_PROMPT: TextRef = TextRef::new(0, 6);
    pub const KING_SAVED: TextRef = TextRef::new(0, 7);
    pub const KING_FAREWELL: TextRef = TextRef::new(0, 8);
    pub const KING_PRINCESS_THANKS: TextRef = TextRef::new(0, 9);
    pub const KING_DEATH_RETURN: TextRef = TextRef::new(0, 10);
    pub const KING_CONTINUE: TextRef = TextRef::new(0, 11);
    pub const KING_QUEST: TextRef = TextRef::new(0, 12);

    // Block 1: field actions.
    pub const NOTHING_HERE: TextRef = TextRef::new(1, 0);
    pub const CANNOT_ENTER: TextRef = TextRef::new(1, 1);
    pub const NO_STAIRS: TextRef = TextRef::new(1, 2);
    pub const NO_DOOR: TextRef = TextRef::new(1, 3);
    pub const NO_KEY: TextRef = TextRef::new(1, 4);
    pub const NO_ONE_THERE: TextRef = TextRef::new(1, 5);
    pub const FOUND_ITEM: TextRef = TextRef::new(1, 6);
    pub const FOUND_GOLD: TextRef = TextRef::new(1, 7);
    pub const TREASURE_UNDERFOOT: TextRef = TextRef::new(1, 8);
    pub const BAG_FULL_TOSS: TextRef = TextRef::new(1, 9);
    pub const TOSSED_ITEM: TextRef = TextRef::new(1, 10);
    pub const LEFT_IN_CHEST: TextRef = TextRef::new(1, 11);
    pub const CHEST_EMPTY: TextRef = TextRef::new(1, 12);
    pub const NO_EFFECT: TextRef = TextRef::new(1, 13);
    pub const CANNOT_USE_HERE: TextRef = TextRef::new(1, 14);
    pub const TORCH_LIT: TextRef = TextRef::new(1, 15);
    pub const WINGS_FLY: TextRef = TextRef::new(1, 16);
    pub const FAIRY_WATER_SPRINKLED: TextRef = TextRef::new(1, 17);
    pub const RING_PUT_ON: TextRef = TextRef::new(1, 18);
    pub const SCALE_PUT_ON: TextRef = TextRef::new(1, 19);
    pub const CURSED: TextRef = TextRef::new(1, 20);
    pub const RAINBOW_BRIDGE: TextRef = TextRef::new(1, 21);
    pub const HARP_PLAYED: TextRef = TextRef::new(1, 22);
    pub const FLUTE_PLAYED: TextRef = TextRef::new(1, 23);
    pub const GWAELINS_LOVE: TextRef = TextRef::new(1, 24);
    pub const NOT_ENOUGH_MP: TextRef = TextRef::new(1, 25);
    pub const SPELL_WILL_NOT_WORK: TextRef = TextRef::new(1, 26);
    pub const SPELL_CAST: TextRef = TextRef::new(1, 27);
    pub const HP_RESTORED: TextRef = TextRef::new(1, 28);
    pub const NO_SPELLS: TextRef = TextRef::new(1, 29);
    pub const BAG_EMPTY: TextRef = TextRef::new(1, 30);
    pub const REPEL_WORN_OFF: TextRef = TextRef::new(1, 31);
    pub const ALREADY_WEARING: TextRef = TextRef::new(1, 32);
    pub const RADIANCE: TextRef = TextRef::new(1, 33);

    // Block 2: townsfolk, shops and the dragonlord.
    pub const GUARD_GREETING: TextRef = TextRef::new(2, 0);
    pub const GUARD_LOCKED_DOOR: TextRef = TextRef::new(2, 1);
    pub const TOWNSPERSON_RUMOR: TextRef = TextRef::new(2, 2);
    pub const WISE_MAN_TOKEN: TextRef = TextRef::new(2, 3);
    pub const WISE_MAN_FLUTE: TextRef = TextRef::new(2, 4);
    pub const INN_OFFER: TextRef = TextRef::new(2, 5);
    pub const INN_GOOD_NIGHT: TextRef = TextRef::new(2, 6);
    pub const INN_GOOD_MORNING: TextRef = TextRef::new(2, 7);
    pub const INN_COME_AGAIN: TextRef = TextRef::new(2, 8);
    pub const SHOP_WELCOME: TextRef = TextRef::new(2, 9);
    pub const SHOP_BUY_WHAT: TextRef = TextRef::new(2, 10);
    pub const SHOP_TRADE_IN: TextRef = TextRef::new(2, 11);
    pub const SHOP_NOT_ENOUGH_GOLD: TextRef = TextRef::new(2, 12);
    pub const SHOP_THANK_YOU: TextRef = TextRef::new(2, 13);
    pub const SHOP_COME_AGAIN: TextRef = TextRef::new(2, 14);
    pub const SHOP_CANNOT_CARRY: TextRef = TextRef::new(2, 15);
    pub const KEY_OFFER: TextRef = TextRef::new(2, 16);
    pub const KEY_CANNOT_CARRY: TextRef = TextRef::new(2, 17);
    pub const DRAGONLORD_WELCOME: TextRef = TextRef::new(2, 18);
    pub const DRAGONLORD_OFFER: TextRef = TextRef::new(2, 19);
    pub const DRAGONLORD_ACCEPTED: TextRef = TextRef::new(2, 20);
    pub const DRAGONLORD_REFUSED: TextRef = TextRef::new(2, 21);
    pub const DRAGONLORD_TRUE_FORM: TextRef = TextRef::new(2, 22);
    pub const ENDING_RETURN: TextRef = TextRef::new(2, 23);
    pub const PRINCESS_RESCUED: TextRef = TextRef::new(2, 24);

    // Block 3: combat.
    pub const DRAWS_NEAR: TextRef = TextRef::new(3, 0);
    pub const ENEMY_PREEMPTS: TextRef = TextRef::new(3, 1);
    pub const PLAYER_ATTACKS: TextRef = TextRef::new(3, 2);
    pub const EXCELLENT_MOVE: TextRef = TextRef::new(3, 3);
    pub const ENEMY_HURT: TextRef = TextRef::new(3, 4);
    pub const ENEMY_DODGED: TextRef = TextRef::new(3, 5);
    pub const PLAYER_MISSED: TextRef = TextRef::new(3, 6);
    pub const ENEMY_ATTACKS: TextRef = TextRef::new(3, 7);
    pub const PLAYER_HURT: TextRef = TextRef::new(3, 8);
    pub const ENEMY_MISSED: TextRef = TextRef::new(3, 9);
    pub const PLAYER_ASLEEP: TextRef = TextRef::new(3, 10);
    pub const PLAYER_AWAKENS: TextRef = TextRef::new(3, 11);
    pub const ENEMY_ASLEEP: TextRef = TextRef::new(3, 12);
    pub const ENEMY_AWAKENS: TextRef = TextRef::new(3, 13);
    pub const SPELL_BLOCKED: TextRef = TextRef::new(3, 14);
    pub const SPELL_NO_EFFECT: TextRef = TextRef::new(3, 15);
    pub const ENEMY_CHANTS: TextRef = TextRef::new(3, 16);
    pub const ENEMY_BREATHES_FIRE: TextRef = TextRef::new(3, 17);
    pub const PLAYER_FALLS_ASLEEP: TextRef = TextRef::new(3, 18);
    pub const PLAYER_STOPSPELLED: TextRef = TextRef::new(3, 19);
    pub const ENEMY_HEALED: TextRef = TextRef::new(3, 20);
    pub const ENEMY_FALLS_ASLEEP: TextRef = TextRef::new(3, 21);
    pub const ENEMY_STOPSPELLED: TextRef = TextRef::new(3, 22);
    pub const PLAYER_FLED: TextRef = TextRef::new(3, 23);
    pub const RUN_BLOCKED: TextRef = TextRef::new(3, 24);
    pub const ENEMY_RAN: TextRef = TextRef::new(3, 25);
    pub const ENEMY_DEFEATED: TextRef = TextRef::new(3, 26);
    pub const GAINED_EXPERIENCE: TextRef = TextRef::new(3, 27);
    pub const GAINED_GOLD: TextRef = TextRef::new(3, 28);
    pub const LEVEL_UP: TextRef = TextRef::new(3, 29);
    pub const LEARNED_SPELL: TextRef = TextRef::new(3, 30);
    pub const PLAYER_DIED: TextRef = TextRef::new(3, 31);
    pub const HERB_USED: TextRef = TextRef::new(3, 32);
    pub const ITEM_NOT_IN_BATTLE: TextRef = TextRef::new(3, 33);
    pub const GOLEM_LULLED: TextRef = TextRef::new(3, 34);
    pub const GOLEM_BLOCKS_PATH: TextRef = TextRef::new(3, 35);
}
