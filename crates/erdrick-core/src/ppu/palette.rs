//! Palette fades and flashes.
//!
//! Both run synchronously on top of the PPU queue: each step recomputes all
//! 32 palette bytes and waits a fixed number of blanks before the next one.

use crate::{
    GameSession,
    host::Host,
    memory::ppu::{PALETTE_BASE, PALETTE_RAM_SIZE},
    ppu::buffer::PpuCommand,
};

pub type Palette = [u8; PALETTE_RAM_SIZE];

/// Color written for anything darker than black.
pub const BLACK: u8 = 0x0F;

/// Brightness offsets, brightest first.
pub const FADE_STEPS: [u8; 5] = [0x00, 0x10, 0x20, 0x30, 0x40];

/// Blanks between two fade steps.
pub const FADE_STEP_FRAMES: u32 = 4;

/// Blanks each half of a flash cycle lasts.
pub const FLASH_HALF_CYCLE_FRAMES: u32 = 3;

/// Outdoor and town colors: four background then four sprite palettes.
pub const FIELD_PALETTE: Palette = [
    0x0F, 0x29, 0x1A, 0x0F, 0x0F, 0x30, 0x10, 0x00, //
    0x0F, 0x29, 0x27, 0x17, 0x0F, 0x21, 0x22, 0x11, //
    0x0F, 0x35, 0x30, 0x12, 0x0F, 0x35, 0x30, 0x12, //
    0x0F, 0x35, 0x30, 0x27, 0x0F, 0x35, 0x30, 0x16, //
];

/// Caves and the dragonlord's castle.
pub const DUNGEON_PALETTE: Palette = [
    0x0F, 0x00, 0x10, 0x0F, 0x0F, 0x17, 0x27, 0x07, //
    0x0F, 0x00, 0x10, 0x30, 0x0F, 0x16, 0x26, 0x06, //
    0x0F, 0x35, 0x30, 0x12, 0x0F, 0x35, 0x30, 0x12, //
    0x0F, 0x35, 0x30, 0x27, 0x0F, 0x35, 0x30, 0x16, //
];

/// Flash colors used for feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlashKind {
    /// Red wash when the hero takes a heavy hit.
    Damage,
    /// White wash when a spell goes off.
    Spell,
}

impl FlashKind {
    const fn color(self) -> u8 {
        match self {
            Self::Damage => 0x16,
            Self::Spell => 0x30,
        }
    }

    /// `base` with every visible background color replaced by the flash color.
    pub fn palette(self, base: &Palette) -> Palette {
        let mut flashed = *base;
        for (index, color) in flashed.iter_mut().enumerate().take(16) {
            if index % 4 != 0 {
                *color = self.color();
            }
        }
        flashed
    }
}

/// `color` dimmed by `offset`, clamped to [`BLACK`].
///
/// Colors in the black column (`$xD`-`$xF`) stay black at every step.
#[inline]
pub const fn darken(color: u8, offset: u8) -> u8 {
    if color & 0x0F >= 0x0D || color < offset {
        BLACK
    } else {
        color - offset
    }
}

/// Every entry of `palette` darkened by `offset`.
pub fn faded(palette: &Palette, offset: u8) -> Palette {
    palette.map(|color| darken(color, offset))
}

fn palette_commands(palette: &Palette) -> [PpuCommand; PALETTE_RAM_SIZE] {
    core::array::from_fn(|index| PpuCommand::new(PALETTE_BASE + index as u16, palette[index]))
}

impl<H: Host> GameSession<H> {
    /// Makes `palette` the base palette and queues it.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.queue_batch(&palette_commands(&palette));
    }

    /// Current undimmed palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Dims the screen to black over five steps.
    pub fn fade_out(&mut self) {
        for offset in FADE_STEPS {
            self.fade_step(offset);
        }
    }

    /// Brings the screen back from black to the base palette.
    pub fn fade_in(&mut self) {
        for offset in FADE_STEPS.into_iter().rev() {
            self.fade_step(offset);
        }
    }

    fn fade_step(&mut self, offset: u8) {
        self.wait_frames(FADE_STEP_FRAMES);
        let dimmed = faded(&self.palette, offset);
        self.queue_batch(&palette_commands(&dimmed));
    }

    /// Alternates the flash palette and the base palette `cycles` times.
    pub fn palette_flash(&mut self, kind: FlashKind, cycles: u8) {
        let flashed = kind.palette(&self.palette);
        let restored = self.palette;
        for _ in 0..cycles {
            self.queue_batch(&palette_commands(&flashed));
            self.wait_frames(FLASH_HALF_CYCLE_FRAMES);
            self.queue_batch(&palette_commands(&restored));
            self.wait_frames(FLASH_HALF_CYCLE_FRAMES);
        }
    }
}
