//! The game session: everything one console power cycle owns.

use core::fmt;

use tracing::info;

use crate::{
    dialog::{MessageSpeed, text},
    explore::ExploreState,
    frame::FrameState,
    host::Host,
    map::{
        AttributeShadow, History, World,
        layouts::{RETURN_POINT, THRONE_ROOM_START},
    },
    player::{Player, flags::QuestFlags},
    ppu::{Palette, PpuBuffer, palette::FIELD_PALETTE},
    rng::{Random, RandomGenerator},
    save::{BatteryRam, TitleOutcome},
};

pub use crate::map::history::HistoryPolicy;

/// Idle frames before the status window pops up on its own.
pub const IDLE_POPUP_FRAMES: u32 = 90;

/// Frames one block of walking takes.
pub const FRAMES_PER_STEP: u32 = 2;

/// Knobs a front end sets before starting a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub history_policy: HistoryPolicy,
    /// Random encounters on the overworld and in dungeons.
    pub encounters: bool,
    pub idle_popup_frames: u32,
    /// Blanks waited out per step while the view scrolls.
    pub frames_per_step: u32,
    /// Speed a hero starts with before the title menu picks one.
    pub message_speed: MessageSpeed,
    pub seed: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            history_policy: HistoryPolicy::default(),
            encounters: true,
            idle_popup_frames: IDLE_POPUP_FRAMES,
            frames_per_step: FRAMES_PER_STEP,
            message_speed: MessageSpeed::default(),
            seed: 0,
        }
    }
}

/// How [`GameSession::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOutcome {
    /// The host switched the console off.
    PoweredOff,
    /// The dragonlord fell and the hero went home.
    Ending,
    /// The hero took the dragonlord's bargain.
    GameOver,
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PoweredOff => "powered off",
            Self::Ending => "ending",
            Self::GameOver => "game over",
        };
        f.write_str(label)
    }
}

/// One running game, driving a [`Host`].
#[derive(Debug)]
pub struct GameSession<H: Host> {
    pub(crate) host: H,
    pub(crate) config: GameConfig,
    pub(crate) rng: Box<dyn Random>,
    pub(crate) ppu: PpuBuffer,
    pub(crate) frame: FrameState,
    /// Undimmed palette the fade engine works from.
    pub(crate) palette: Palette,
    pub(crate) attributes: AttributeShadow,
    pub(crate) world: World,
    pub(crate) history: History,
    pub(crate) player: Player,
    pub(crate) explore: ExploreState,
    pub(crate) battery: BatteryRam,
    /// Slot the current adventure is logged to.
    pub(crate) slot: Option<usize>,
}

impl<H: Host> GameSession<H> {
    /// A session with blank battery RAM.
    pub fn new(host: H, config: GameConfig) -> Self {
        Self::with_battery(host, config, BatteryRam::new())
    }

    /// A session whose battery RAM holds `battery`.
    pub fn with_battery(host: H, config: GameConfig, battery: BatteryRam) -> Self {
        let (map, x, y, facing) = THRONE_ROOM_START;
        let mut player = Player::new("");
        player.set_message_speed(config.message_speed);
        Self {
            host,
            config,
            rng: Box::new(RandomGenerator::new(config.seed)),
            ppu: PpuBuffer::new(),
            frame: FrameState::default(),
            palette: FIELD_PALETTE,
            attributes: AttributeShadow::default(),
            world: World::new(map, x, y, facing),
            history: History::new(config.history_policy),
            player,
            explore: ExploreState::default(),
            battery,
            slot: None,
        }
    }

    /// Replaces the random source, for reproducible runs.
    pub fn set_rng(&mut self, rng: impl Random + 'static) {
        self.rng = Box::new(rng);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ppu(&self) -> &PpuBuffer {
        &self.ppu
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn battery(&self) -> &BatteryRam {
        &self.battery
    }

    /// Consumes the session, handing back the host and the battery image.
    pub fn into_parts(self) -> (H, BatteryRam) {
        (self.host, self.battery)
    }

    /// Plays from the title screen until the console is switched off or the
    /// story ends.
    pub fn run(&mut self) -> SessionOutcome {
        let outcome = match self.title_menu() {
            TitleOutcome::PoweredOff => return SessionOutcome::PoweredOff,
            outcome => outcome,
        };
        self.history = History::new(self.config.history_policy);
        self.explore = ExploreState::default();
        self.set_palette(FIELD_PALETTE);
        match outcome {
            TitleOutcome::NewGame { slot } => {
                info!(slot, name = %self.player.name(), "adventure begins");
                self.enter_throne_room();
                self.player.quest_mut().insert(QuestFlags::MET_KING);
                self.say(text::KING_QUEST);
            }
            TitleOutcome::Continue { slot } => {
                info!(slot, name = %self.player.name(), "adventure resumes");
                if self.player.restart() {
                    self.enter_throne_room();
                } else {
                    let (map, x, y, facing) = RETURN_POINT;
                    self.load_map(map, x, y, facing);
                }
                self.say(text::KING_CONTINUE);
            }
            TitleOutcome::PoweredOff => return SessionOutcome::PoweredOff,
        }
        let outcome = self.explore();
        info!(%outcome, frames = self.frame_count(), "session over");
        outcome
    }

    fn enter_throne_room(&mut self) {
        let (map, x, y, facing) = THRONE_ROOM_START;
        self.load_map(map, x, y, facing);
    }
}
