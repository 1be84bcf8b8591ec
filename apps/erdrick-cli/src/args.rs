use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use erdrick_core::HistoryPolicy;
use tracing::Level;

/// Headless runner for the Erdrick engine
#[derive(Parser, Debug)]
#[command(name = "erdrick", author, version, about, long_about = None)]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a session from the title screen, driven by an input script
    Play(PlayArgs),
    /// Report which adventure logs in a battery image still validate
    Check {
        /// Battery RAM image to inspect
        battery: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct PlayArgs {
    /// Input script (press/idle/select/yes/no/cancel/name lines)
    pub script: PathBuf,

    /// Battery RAM image; loaded when present and written back afterwards
    #[arg(short, long)]
    pub battery: Option<PathBuf>,

    /// Switch the console off after this many frames
    #[arg(long, default_value_t = erdrick_core::host::scripted::DEFAULT_FRAME_LIMIT)]
    pub frames: u64,

    /// Seed for the random number generator
    #[arg(long, default_value_t = 0)]
    pub seed: u16,

    /// What happens once the door and treasure tables are full
    #[arg(long, value_enum, default_value_t = HistoryArg::Fixed)]
    pub history: HistoryArg,

    /// Disable random encounters
    #[arg(long)]
    pub no_encounters: bool,

    /// Write a postcard snapshot of the hero here when the session ends
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Print every dialog line, window, sound and track the engine produced
    #[arg(long)]
    pub transcript: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryArg {
    /// Fixed-size tables; extra openings are forgotten on reload
    Fixed,
    /// Remember every door and chest
    Unbounded,
}

impl From<HistoryArg> for HistoryPolicy {
    fn from(value: HistoryArg) -> Self {
        match value {
            HistoryArg::Fixed => HistoryPolicy::Fixed,
            HistoryArg::Unbounded => HistoryPolicy::Unbounded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_defaults() {
        let args = Args::try_parse_from(["erdrick", "play", "quest.txt"]).expect("parses");
        let Command::Play(play) = args.command else {
            panic!("expected play");
        };
        assert_eq!(play.history, HistoryArg::Fixed);
        assert_eq!(play.seed, 0);
        assert!(!play.no_encounters);
        assert_eq!(args.log_level, Level::INFO);
    }

    #[test]
    fn log_level_after_the_subcommand() {
        let args = Args::try_parse_from([
            "erdrick", "check", "save.bin", "--log-level", "debug",
        ])
        .expect("parses");
        assert_eq!(args.log_level, Level::DEBUG);
        assert!(matches!(args.command, Command::Check { .. }));
    }

    #[test]
    fn history_maps_onto_the_policy() {
        assert_eq!(HistoryPolicy::from(HistoryArg::Unbounded), HistoryPolicy::Unbounded);
    }
}
