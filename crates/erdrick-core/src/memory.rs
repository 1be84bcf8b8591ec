//! Shared definitions for video memory and the battery-backed save area.
//!
//! Keeping the address layout in one place stops magic numbers from leaking
//! into the map, palette and save code.

/// Video memory layout as seen through the PPU command queue.
pub mod ppu {
    /// Left nametable (block columns 0-15).
    pub const NAMETABLE_0: u16 = 0x2000;
    /// Right nametable (block columns 16-31).
    pub const NAMETABLE_1: u16 = 0x2400;
    /// Offset of the attribute table inside a nametable.
    pub const ATTRIBUTE_OFFSET: u16 = 0x03C0;
    /// Tile columns across both nametables.
    pub const TILE_COLUMNS: u16 = 64;
    /// Tile rows in one nametable.
    pub const TILE_ROWS: u16 = 30;
    /// Attribute bytes per nametable.
    pub const ATTRIBUTE_BYTES: usize = 64;

    /// First palette RAM address (`$3F00`).
    pub const PALETTE_BASE: u16 = 0x3F00;
    /// Palette RAM mirrors every 32 bytes through `$3FFF`.
    pub const PALETTE_STRIDE: u16 = 0x20;
    /// Background plus sprite palettes.
    pub const PALETTE_RAM_SIZE: usize = 0x20;

    /// Size of the addressable video memory image (16 KiB).
    pub const VRAM_SIZE: usize = 0x4000;
    /// Mask applied to mirror accesses above `$3FFF`.
    pub const VRAM_MIRROR_MASK: u16 = 0x3FFF;

    /// Sprite attribute table copied to the host every blank.
    pub const SPRITE_RAM_SIZE: usize = 0x100;

    /// Entries the PPU command queue holds between two flushes.
    pub const PPU_QUEUE_CAPACITY: usize = 58;
}

/// Battery RAM layout for the three adventure logs.
pub mod battery {
    /// Total size of the battery-backed image.
    pub const BATTERY_RAM_SIZE: usize = 0x2000;
    /// Number of save slots.
    pub const SLOT_COUNT: usize = 3;
    /// Redundant copies written for every slot.
    pub const REPLICAS_PER_SLOT: usize = 10;
    /// Bytes per save record.
    pub const RECORD_SIZE: usize = 32;
    /// Bytes covered by the checksum (everything before it).
    pub const CHECKSUM_COVERED: usize = 30;
    /// Distance between the first replicas of consecutive slots.
    pub const SLOT_STRIDE: usize = 0x140;

    /// Offset of replica `replica` of slot `slot`.
    #[inline]
    pub const fn replica_offset(slot: usize, replica: usize) -> usize {
        slot * SLOT_STRIDE + replica * RECORD_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::battery::*;

    #[test]
    fn replicas_never_overlap() {
        let mut seen = Vec::new();
        for slot in 0..SLOT_COUNT {
            for replica in 0..REPLICAS_PER_SLOT {
                let offset = replica_offset(slot, replica);
                assert!(offset + RECORD_SIZE <= BATTERY_RAM_SIZE);
                for &other in &seen {
                    assert!(offset + RECORD_SIZE <= other || other + RECORD_SIZE <= offset);
                }
                seen.push(offset);
            }
        }
        assert_eq!(seen.len(), 30);
    }
}
