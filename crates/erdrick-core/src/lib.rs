//! Engine core for a Dragon Warrior style role-playing game.
//!
//! Everything runs on a single logical thread inside a [`GameSession`]. The
//! session owns the player, the RNG, the PPU command queue and the map state
//! and drives an external [`host::Host`] (video sink, audio driver, window
//! renderer and joypad). [`GameSession::wait_for_blank`] is the only place the
//! engine yields; queued video writes reach the host there and nowhere else.

pub mod combat;
pub mod dialog;
pub mod enemy;
pub mod error;
pub mod explore;
pub mod frame;
pub mod host;
pub mod map;
pub mod math;
pub mod memory;
pub mod player;
pub mod ppu;
pub mod rng;
pub mod save;
pub mod session;

pub use error::Error;
pub use session::{GameConfig, GameSession, HistoryPolicy, SessionOutcome};

#[cfg(test)]
mod tests {
    use ctor::ctor;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub(crate) const TEST_COUNT: usize = 1000;

    #[ctor]
    fn init_tracing() {
        let subscriber = FmtSubscriber::builder()
            .with_file(true)
            .with_line_number(true)
            .with_max_level(Level::DEBUG)
            .pretty()
            .finish();
        tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");
    }
}
