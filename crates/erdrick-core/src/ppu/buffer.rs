use std::collections::VecDeque;

use tracing::debug;

use crate::{host::VideoSink, memory::ppu::PPU_QUEUE_CAPACITY};

/// One buffered video memory write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PpuCommand {
    pub addr: u16,
    pub data: u8,
}

impl PpuCommand {
    pub const fn new(addr: u16, data: u8) -> Self {
        Self { addr, data }
    }
}

/// Bounded FIFO of video writes applied during the blanking interval.
///
/// The queue never grows past its capacity. [`PpuBuffer::try_push`] hands the
/// command back when full; the session turns that into a wait for the next
/// blank so nothing is ever dropped.
#[derive(Debug, Clone)]
pub struct PpuBuffer {
    queue: VecDeque<PpuCommand>,
    capacity: usize,
    mid_update: bool,
    flushed: u64,
}

impl Default for PpuBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PpuBuffer {
    pub fn new() -> Self {
        Self::with_capacity(PPU_QUEUE_CAPACITY)
    }

    /// A queue holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            mid_update: false,
            flushed: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free entries before the queue is full.
    #[inline]
    pub fn headroom(&self) -> usize {
        self.capacity - self.queue.len()
    }

    /// Queues `command`, or returns it when the queue is full.
    pub fn try_push(&mut self, command: PpuCommand) -> Result<(), PpuCommand> {
        if self.is_full() {
            return Err(command);
        }
        self.queue.push_back(command);
        Ok(())
    }

    /// Set while a multi-entry batch is being written.
    #[inline]
    pub fn mid_update(&self) -> bool {
        self.mid_update
    }

    pub(crate) fn begin_update(&mut self) {
        self.mid_update = true;
    }

    pub(crate) fn end_update(&mut self) {
        self.mid_update = false;
    }

    /// Applies every queued write in order and empties the queue.
    ///
    /// Returns the number of writes applied; an empty queue is a no-op.
    pub fn flush(&mut self, sink: &mut impl VideoSink) -> usize {
        let count = self.queue.len();
        if count == 0 {
            return 0;
        }
        for command in self.queue.drain(..) {
            sink.write(command.addr, command.data);
        }
        self.flushed += count as u64;
        debug!(count, "flushed PPU queue");
        count
    }

    /// Writes applied over the buffer's lifetime.
    pub fn total_flushed(&self) -> u64 {
        self.flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::vram::Vram;
    use proptest::prelude::*;

    #[test]
    fn full_queue_hands_command_back() {
        let mut buffer = PpuBuffer::with_capacity(2);
        assert_eq!(buffer.try_push(PpuCommand::new(0x2000, 1)), Ok(()));
        assert_eq!(buffer.try_push(PpuCommand::new(0x2001, 2)), Ok(()));
        let rejected = PpuCommand::new(0x2002, 3);
        assert_eq!(buffer.try_push(rejected), Err(rejected));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.headroom(), 0);
    }

    #[test]
    fn flush_applies_in_enqueue_order() {
        let mut buffer = PpuBuffer::new();
        let mut vram = Vram::new();
        buffer
            .try_push(PpuCommand::new(0x2000, 0x11))
            .expect("room");
        buffer
            .try_push(PpuCommand::new(0x2000, 0x22))
            .expect("room");
        assert_eq!(buffer.flush(&mut vram), 2);
        assert_eq!(vram.read(0x2000), 0x22);
        assert!(buffer.is_empty());
    }

    #[test]
    fn flush_on_empty_is_idempotent() {
        let mut buffer = PpuBuffer::new();
        let mut vram = Vram::new();
        assert_eq!(buffer.flush(&mut vram), 0);
        assert_eq!(buffer.flush(&mut vram), 0);
        assert_eq!(vram.writes(), 0);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let buffer = PpuBuffer::with_capacity(0);
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(PpuBuffer::new().capacity(), PPU_QUEUE_CAPACITY);
    }

    proptest! {
        #[test]
        fn never_holds_more_than_capacity(
            capacity in 1usize..=PPU_QUEUE_CAPACITY,
            ops in proptest::collection::vec(any::<Option<u8>>(), 0..200),
        ) {
            let mut buffer = PpuBuffer::with_capacity(capacity);
            let mut vram = Vram::new();
            for op in ops {
                match op {
                    Some(data) => {
                        let was_full = buffer.is_full();
                        let pushed = buffer.try_push(PpuCommand::new(0x2000, data));
                        prop_assert_eq!(pushed.is_err(), was_full);
                    }
                    None => {
                        buffer.flush(&mut vram);
                        prop_assert!(buffer.is_empty());
                    }
                }
                prop_assert!(buffer.len() <= buffer.capacity());
            }
        }
    }
}
