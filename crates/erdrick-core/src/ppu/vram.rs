use crate::{
    host::VideoSink,
    memory::ppu::{
        PALETTE_BASE, PALETTE_RAM_SIZE, PALETTE_STRIDE, SPRITE_RAM_SIZE, VRAM_MIRROR_MASK,
        VRAM_SIZE,
    },
};

/// In-memory video sink recording every write the engine flushes.
///
/// Nametables and pattern space live in a flat 16 KiB image; palette writes
/// land in a separate 32-byte RAM with the hardware mirrors applied, so
/// `$3F10` aliases `$3F00`.
#[derive(Debug, Clone)]
pub struct Vram {
    memory: Box<[u8; VRAM_SIZE]>,
    palette: [u8; PALETTE_RAM_SIZE],
    sprites: [u8; SPRITE_RAM_SIZE],
    scroll: (u8, u8),
    writes: u64,
    frame: u64,
}

impl Default for Vram {
    fn default() -> Self {
        Self::new()
    }
}

impl Vram {
    pub fn new() -> Self {
        Self {
            memory: Box::new([0; VRAM_SIZE]),
            palette: [0; PALETTE_RAM_SIZE],
            sprites: [0; SPRITE_RAM_SIZE],
            scroll: (0, 0),
            writes: 0,
            frame: 0,
        }
    }

    /// Byte last written at `addr` (after mirroring).
    pub fn read(&self, addr: u16) -> u8 {
        let addr = addr & VRAM_MIRROR_MASK;
        if addr >= PALETTE_BASE {
            self.palette[palette_index(addr)]
        } else {
            self.memory[addr as usize]
        }
    }

    pub fn palette(&self) -> &[u8; PALETTE_RAM_SIZE] {
        &self.palette
    }

    pub fn sprites(&self) -> &[u8; SPRITE_RAM_SIZE] {
        &self.sprites
    }

    pub fn scroll(&self) -> (u8, u8) {
        self.scroll
    }

    /// Total writes received since creation.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Frame number of the last completed frame.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl VideoSink for Vram {
    fn write(&mut self, addr: u16, data: u8) {
        let addr = addr & VRAM_MIRROR_MASK;
        if addr >= PALETTE_BASE {
            self.palette[palette_index(addr)] = data;
        } else {
            self.memory[addr as usize] = data;
        }
        self.writes += 1;
    }

    fn set_scroll(&mut self, x: u8, y: u8) {
        self.scroll = (x, y);
    }

    fn upload_sprites(&mut self, sprites: &[u8; SPRITE_RAM_SIZE]) {
        self.sprites.copy_from_slice(sprites);
    }

    fn frame_complete(&mut self, frame: u64) {
        self.frame = frame;
    }
}

fn palette_index(addr: u16) -> usize {
    let mut index = ((addr - PALETTE_BASE) % PALETTE_STRIDE) as usize;
    if index >= 16 && index % 4 == 0 {
        index -= 16;
    }
    index % PALETTE_RAM_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_mirrors_backdrop_entries() {
        let mut vram = Vram::new();
        vram.write(0x3F10, 0x21);
        assert_eq!(vram.read(0x3F00), 0x21);
        vram.write(0x3F25, 0x16);
        assert_eq!(vram.read(0x3F05), 0x16);
        assert_eq!(vram.palette()[5], 0x16);
    }

    #[test]
    fn nametable_writes_are_mirrored_into_range() {
        let mut vram = Vram::new();
        vram.write(0x6000 | 0x2041, 0x7A);
        assert_eq!(vram.read(0x2041), 0x7A);
        assert_eq!(vram.writes(), 1);
    }
}
