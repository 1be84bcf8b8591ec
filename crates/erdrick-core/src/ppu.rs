//! Buffered video updates.
//!
//! Game logic never touches video memory directly. Writes are queued as
//! [`buffer::PpuCommand`]s and reach the host's [`crate::host::VideoSink`]
//! only when the session flushes them during the blanking interval.

pub mod buffer;
pub mod palette;
pub mod vram;

pub use buffer::{PpuBuffer, PpuCommand};
pub use palette::{FlashKind, Palette};
pub use vram::Vram;
