//! Monster templates and the live enemy in a fight.

use core::fmt;

use crate::{combat::enemy_ai::SpellPattern, math, rng::Random};

/// Every species, in table order. The order sets the flee tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnemyKind {
    Slime,
    RedSlime,
    Drakee,
    Ghost,
    Magician,
    Magidrakee,
    Scorpion,
    Druin,
    Poltergeist,
    Droll,
    Drakeema,
    Skeleton,
    Warlock,
    MetalScorpion,
    Wolf,
    Wraith,
    MetalSlime,
    Specter,
    Wolflord,
    Druinlord,
    Drollmagi,
    Wyvern,
    RogueScorpion,
    WraithKnight,
    Golem,
    Goldman,
    Knight,
    Magiwyvern,
    DemonKnight,
    Werewolf,
    GreenDragon,
    Starwyvern,
    Wizard,
    AxeKnight,
    BlueDragon,
    Stoneman,
    ArmoredKnight,
    RedDragon,
    Dragonlord,
    DragonlordTrueForm,
}

/// Fixed stats of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub attack: u8,
    pub defense: u8,
    pub hp: u8,
    pub spells: SpellPattern,
    /// Sleep resistance in the high nibble, stopspell in the low nibble.
    pub resist: u8,
    /// Hurt resistance in the high nibble, dodge chance (x/64) in the low.
    pub mdef: u8,
    pub experience: u16,
    pub gold: u16,
}

impl EnemyTemplate {
    pub const fn sleep_resist(&self) -> u8 {
        self.resist >> 4
    }

    pub const fn stopspell_resist(&self) -> u8 {
        self.resist & 0x0F
    }

    pub const fn hurt_resist(&self) -> u8 {
        self.mdef >> 4
    }

    pub const fn dodge(&self) -> u8 {
        self.mdef & 0x0F
    }
}

macro_rules! template {
    ($name:literal, $atk:literal, $def:literal, $hp:literal, $spells:literal, $resist:literal, $mdef:literal, $exp:literal, $gold:literal) => {
        EnemyTemplate {
            name: $name,
            attack: $atk,
            defense: $def,
            hp: $hp,
            spells: SpellPattern::new($spells),
            resist: $resist,
            mdef: $mdef,
            experience: $exp,
            gold: $gold,
        }
    };
}

#[rustfmt::skip]
static TEMPLATES: [EnemyTemplate; 40] = [
    template!("Slime",                5,   3,   3, 0x00, 0x0F, 0x01,   1,   2),
    template!("Red Slime",            7,   3,   4, 0x00, 0x0F, 0x01,   1,   3),
    template!("Drakee",               9,   6,   6, 0x00, 0x0F, 0x01,   2,   3),
    template!("Ghost",               11,   8,   7, 0x00, 0x0F, 0x04,   3,   5),
    template!("Magician",            11,  12,  13, 0x02, 0x00, 0x01,   4,  12),
    template!("Magidrakee",          14,  14,  15, 0x02, 0x00, 0x01,   5,  12),
    template!("Scorpion",            18,  16,  20, 0x00, 0x0F, 0x01,   6,  16),
    template!("Druin",               20,  18,  22, 0x00, 0x0F, 0x02,   7,  16),
    template!("Poltergeist",         18,  20,  23, 0x06, 0x00, 0x06,   8,  18),
    template!("Droll",               24,  24,  25, 0x00, 0x0E, 0x02,  10,  25),
    template!("Drakeema",            22,  26,  20, 0x92, 0x20, 0x06,  11,  20),
    template!("Skeleton",            28,  22,  30, 0x00, 0x0F, 0x04,  11,  30),
    template!("Warlock",             28,  22,  30, 0x31, 0x10, 0x02,  13,  35),
    template!("Metal Scorpion",      36,  42,  22, 0x00, 0x0F, 0x02,  14,  40),
    template!("Wolf",                40,  30,  34, 0x00, 0x1F, 0x02,  16,  50),
    template!("Wraith",              44,  34,  36, 0x70, 0x70, 0x04,  17,  60),
    template!("Metal Slime",         10, 255,   4, 0x03, 0xFF, 0xF1, 115,   6),
    template!("Specter",             40,  38,  36, 0x31, 0x30, 0x04,  18,  70),
    template!("Wolflord",            50,  36,  38, 0x60, 0x20, 0x03,  20,  80),
    template!("Druinlord",           47,  40,  35, 0x71, 0xF0, 0x04,  20,  85),
    template!("Drollmagi",           52,  50,  38, 0x22, 0x20, 0x01,  22,  90),
    template!("Wyvern",              56,  48,  42, 0x00, 0x4F, 0x02,  24, 100),
    template!("Rogue Scorpion",      60,  90,  35, 0x00, 0x7F, 0x02,  26, 110),
    template!("Wraith Knight",       68,  56,  46, 0xB3, 0x50, 0x34,  28, 120),
    template!("Golem",              120,  60,  70, 0x00, 0xFF, 0xF0,   5,  10),
    template!("Goldman",             48,  40,  50, 0x00, 0xDF, 0x01,   6, 200),
    template!("Knight",              76,  78,  55, 0x60, 0x67, 0x01,  33, 130),
    template!("Magiwyvern",          78,  68,  58, 0x20, 0x20, 0x02,  34, 140),
    template!("Demon Knight",        79,  64,  50, 0x00, 0xFF, 0xFF,  37, 150),
    template!("Werewolf",            86,  70,  60, 0x00, 0x7F, 0x07,  40, 155),
    template!("Green Dragon",        88,  74,  65, 0x09, 0x7F, 0x22,  45, 160),
    template!("Starwyvern",          86,  80,  65, 0xF9, 0x80, 0x12,  43, 160),
    template!("Wizard",              80,  70,  65, 0x06, 0xF7, 0xF2,  50, 165),
    template!("Axe Knight",          94,  82,  70, 0x10, 0xF3, 0x11,  54, 165),
    template!("Blue Dragon",         98,  84,  70, 0x0F, 0xFF, 0x72,  60, 150),
    template!("Stoneman",           100,  40, 160, 0x00, 0x2F, 0x71,  65, 140),
    template!("Armored Knight",     105,  86,  90, 0xF5, 0xF7, 0x12,  70, 140),
    template!("Red Dragon",         120,  90, 100, 0x19, 0xF7, 0xF2, 100, 140),
    template!("Dragonlord",          90,  75, 100, 0x57, 0xFF, 0xF0,   0,   0),
    template!("Dragonlord",         140, 200, 130, 0x0E, 0xFF, 0xF0,   0,   0),
];

impl EnemyKind {
    pub const ALL: [EnemyKind; 40] = [
        Self::Slime,
        Self::RedSlime,
        Self::Drakee,
        Self::Ghost,
        Self::Magician,
        Self::Magidrakee,
        Self::Scorpion,
        Self::Druin,
        Self::Poltergeist,
        Self::Droll,
        Self::Drakeema,
        Self::Skeleton,
        Self::Warlock,
        Self::MetalScorpion,
        Self::Wolf,
        Self::Wraith,
        Self::MetalSlime,
        Self::Specter,
        Self::Wolflord,
        Self::Druinlord,
        Self::Drollmagi,
        Self::Wyvern,
        Self::RogueScorpion,
        Self::WraithKnight,
        Self::Golem,
        Self::Goldman,
        Self::Knight,
        Self::Magiwyvern,
        Self::DemonKnight,
        Self::Werewolf,
        Self::GreenDragon,
        Self::Starwyvern,
        Self::Wizard,
        Self::AxeKnight,
        Self::BlueDragon,
        Self::Stoneman,
        Self::ArmoredKnight,
        Self::RedDragon,
        Self::Dragonlord,
        Self::DragonlordTrueForm,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn template(self) -> &'static EnemyTemplate {
        &TEMPLATES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.template().name
    }

    pub const fn is_dragonlord(self) -> bool {
        matches!(self, Self::Dragonlord | Self::DragonlordTrueForm)
    }

    /// Multiplier (in eighths) applied to the enemy side of the flee
    /// contest. Later species are harder to escape.
    pub const fn flee_scale(self) -> u8 {
        match self.index() {
            0..20 => 2,
            20..30 => 3,
            30..35 => 4,
            _ => 8,
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The monster currently being fought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    kind: EnemyKind,
    hp: u8,
    max_hp: u8,
    asleep: bool,
    stopspelled: bool,
}

impl Enemy {
    /// Spawns `kind` with its HP cut by up to a quarter.
    pub fn spawn(kind: EnemyKind, rng: &mut dyn Random) -> Self {
        let base = kind.template().hp;
        let cut = math::scale(u16::from(base), rng.next_u8(), 10) as u8;
        let hp = base - cut;
        Self {
            kind,
            hp,
            max_hp: hp,
            asleep: false,
            stopspelled: false,
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn template(&self) -> &'static EnemyTemplate {
        self.kind.template()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn hp(&self) -> u8 {
        self.hp
    }

    pub fn max_hp(&self) -> u8 {
        self.max_hp
    }

    pub fn attack(&self) -> u8 {
        self.template().attack
    }

    pub fn defense(&self) -> u8 {
        self.template().defense
    }

    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    pub fn set_asleep(&mut self, asleep: bool) {
        self.asleep = asleep;
    }

    pub fn is_stopspelled(&self) -> bool {
        self.stopspelled
    }

    pub fn set_stopspelled(&mut self, stopspelled: bool) {
        self.stopspelled = stopspelled;
    }

    /// True below a quarter of spawn HP, when healing spells are considered.
    pub fn is_weakened(&self) -> bool {
        self.hp < self.max_hp / 4
    }

    /// Returns true when the enemy is defeated.
    pub fn take_damage(&mut self, amount: u8) -> bool {
        self.hp = self.hp.saturating_sub(amount);
        self.hp == 0
    }

    pub fn heal(&mut self, amount: u8) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}
