//! Blanking-interval synchronization.
//!
//! [`GameSession::wait_for_blank`] stands in for the vertical-blank
//! interrupt. It is the only suspension point in the engine: queued video
//! writes, the sprite table and the scroll registers reach the host there, the
//! audio driver is serviced there, and the frame counter only advances there.

use crate::{
    GameSession,
    host::Host,
    memory::ppu::SPRITE_RAM_SIZE,
    ppu::buffer::PpuCommand,
};

/// Per-frame registers copied to the host on every blank.
#[derive(Debug, Clone)]
pub struct FrameState {
    count: u64,
    blank_pending: bool,
    scroll: (u8, u8),
    sprites: [u8; SPRITE_RAM_SIZE],
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            count: 0,
            blank_pending: false,
            scroll: (0, 0),
            // Y = 0xF0 parks every sprite below the visible area.
            sprites: [0xF0; SPRITE_RAM_SIZE],
        }
    }
}

impl FrameState {
    /// Frames completed so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn scroll(&self) -> (u8, u8) {
        self.scroll
    }

    pub fn set_scroll(&mut self, x: u8, y: u8) {
        self.scroll = (x, y);
    }

    pub fn sprites(&self) -> &[u8; SPRITE_RAM_SIZE] {
        &self.sprites
    }

    /// Writes one 4-byte sprite entry (`y`, `tile`, `attributes`, `x`).
    pub fn set_sprite(&mut self, index: usize, entry: [u8; 4]) {
        let base = (index % (SPRITE_RAM_SIZE / 4)) * 4;
        self.sprites[base..base + 4].copy_from_slice(&entry);
    }

    /// True only while the blank handler is running.
    pub fn blank_pending(&self) -> bool {
        self.blank_pending
    }
}

impl<H: Host> GameSession<H> {
    /// Suspends until the next blanking interval and runs the blank handler.
    ///
    /// In order: flush the PPU queue (skipped while a batch is mid-update),
    /// copy the sprite table, set the scroll registers, service the audio
    /// driver, advance the frame counter and notify the host.
    pub fn wait_for_blank(&mut self) {
        self.frame.blank_pending = true;
        // A half-written batch stays queued. queue_batch never yields with
        // the flag raised, so only a caller holding the flag across a blank
        // reaches this.
        if !self.ppu.mid_update() {
            self.ppu.flush(&mut self.host);
        }
        self.host.upload_sprites(&self.frame.sprites);
        let (x, y) = self.frame.scroll;
        self.host.set_scroll(x, y);
        self.host.service();
        self.frame.count += 1;
        self.frame.blank_pending = false;
        self.host.frame_complete(self.frame.count);
    }

    /// Waits for `frames` blanks.
    pub fn wait_frames(&mut self, frames: u32) {
        for _ in 0..frames {
            self.wait_for_blank();
        }
    }

    /// Queues a single video write, yielding to the next blank while the
    /// queue is full.
    pub fn queue_ppu(&mut self, addr: u16, data: u8) {
        let mut command = PpuCommand::new(addr, data);
        loop {
            match self.ppu.try_push(command) {
                Ok(()) => return,
                Err(rejected) => {
                    command = rejected;
                    self.wait_for_blank();
                }
            }
        }
    }

    /// Queues `commands` so that no flush can observe part of a batch.
    ///
    /// Batches larger than the queue are written in capacity-sized chunks.
    pub fn queue_batch(&mut self, commands: &[PpuCommand]) {
        let capacity = self.ppu.capacity();
        for chunk in commands.chunks(capacity) {
            while self.ppu.headroom() < chunk.len() {
                self.wait_for_blank();
            }
            self.ppu.begin_update();
            for &command in chunk {
                let pushed = self.ppu.try_push(command);
                debug_assert!(pushed.is_ok(), "headroom was reserved for the batch");
            }
            self.ppu.end_update();
        }
    }

    /// Blocks until fewer than `max` writes are queued.
    pub fn wait_for_buffer_space(&mut self, max: usize) {
        let max = max.max(1);
        while self.ppu.len() >= max {
            self.wait_for_blank();
        }
    }

    /// Blocks until the current jingle has finished.
    pub fn wait_for_track_end(&mut self) {
        while self.host.is_playing() && !self.host.powered_off() {
            self.wait_for_blank();
        }
    }

    /// Frames completed since the session started.
    pub fn frame_count(&self) -> u64 {
        self.frame.count
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        GameConfig, GameSession,
        host::{AudioDriver, Music, scripted::ScriptedHost},
        memory::ppu::PPU_QUEUE_CAPACITY,
        ppu::buffer::PpuCommand,
    };

    fn session() -> GameSession<ScriptedHost> {
        GameSession::new(ScriptedHost::new(), GameConfig::default())
    }

    #[test]
    fn blank_flushes_and_counts() {
        let mut session = session();
        session.queue_ppu(0x2000, 0x42);
        assert_eq!(session.ppu().len(), 1);
        session.wait_for_blank();
        assert!(session.ppu().is_empty());
        assert_eq!(session.host().vram().read(0x2000), 0x42);
        assert_eq!(session.frame_count(), 1);
        assert_eq!(session.host().frames(), 1);
    }

    #[test]
    fn full_queue_yields_instead_of_dropping() {
        let mut session = session();
        for i in 0..(PPU_QUEUE_CAPACITY as u16 + 5) {
            session.queue_ppu(0x2000 + i, i as u8);
            assert!(session.ppu().len() <= PPU_QUEUE_CAPACITY);
        }
        assert_eq!(session.frame_count(), 1);
        session.wait_for_blank();
        for i in 0..(PPU_QUEUE_CAPACITY as u16 + 5) {
            assert_eq!(session.host().vram().read(0x2000 + i), i as u8);
        }
    }

    #[test]
    fn batch_waits_for_headroom() {
        let mut session = session();
        for i in 0..50 {
            session.queue_ppu(0x2100 + i, 1);
        }
        let batch: Vec<_> = (0..10).map(|i| PpuCommand::new(0x2200 + i, 2)).collect();
        session.queue_batch(&batch);
        assert_eq!(session.frame_count(), 1);
        assert_eq!(session.ppu().len(), 10);
        assert!(!session.ppu().mid_update());
    }

    #[test]
    fn open_batch_is_not_flushed() {
        let mut session = session();
        session.ppu.begin_update();
        session.queue_ppu(0x2000, 0x11);
        session.wait_for_blank();
        assert_eq!(session.ppu().len(), 1);
        assert_eq!(session.host().vram().read(0x2000), 0);
        assert_eq!(session.frame_count(), 1);
        session.ppu.end_update();
        session.wait_for_blank();
        assert!(session.ppu().is_empty());
        assert_eq!(session.host().vram().read(0x2000), 0x11);
    }

    #[test]
    fn oversized_batch_is_chunked() {
        let mut session = session();
        let batch: Vec<_> = (0..150).map(|i| PpuCommand::new(0x2000 + i, 3)).collect();
        session.queue_batch(&batch);
        assert_eq!(session.frame_count(), 2);
        session.wait_for_blank();
        assert_eq!(session.host().vram().writes(), 150);
    }

    #[test]
    fn buffer_space_waits_until_below_max() {
        let mut session = session();
        for i in 0..20 {
            session.queue_ppu(0x2000 + i, 0);
        }
        session.wait_for_buffer_space(30);
        assert_eq!(session.frame_count(), 0);
        session.wait_for_buffer_space(20);
        assert_eq!(session.frame_count(), 1);
        assert!(session.ppu().is_empty());
    }

    #[test]
    fn track_end_waits_out_the_jingle() {
        let mut session = session();
        session.host_mut().push_buttons(Default::default(), 1);
        session.host_mut().play_music(Music::Victory);
        session.wait_for_track_end();
        assert!(!session.host().is_playing());
        assert!(session.frame_count() > 0);
    }
}
