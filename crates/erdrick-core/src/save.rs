//! Adventure logs.
//!
//! A log is a 32-byte [`record::SaveRecord`] sealed with a CRC-16. Every
//! write lands in ten replicas of its slot inside [`store::BatteryRam`]; a
//! load takes the first replica whose checksum still matches.

pub mod crc;
pub mod menu;
pub mod record;
pub mod store;

pub use menu::{TitleAction, TitleOutcome, TitleState};
pub use record::SaveRecord;
pub use store::BatteryRam;
