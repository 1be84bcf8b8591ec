#![allow(dead_code)]

use anyhow::{Context, Result};
use erdrick_core::{
    GameConfig, GameSession,
    host::scripted::ScriptedHost,
    map::{Direction, MapId},
    player::Player,
    save::BatteryRam,
};

/// Builds a session driven by `script` with encounters switched off, so
/// walking scenarios do not depend on the RNG.
pub fn scripted(script: &str) -> Result<GameSession<ScriptedHost>> {
    scripted_with(script, BatteryRam::new())
}

pub fn scripted_with(script: &str, battery: BatteryRam) -> Result<GameSession<ScriptedHost>> {
    let host = ScriptedHost::from_script(script).context("parsing test script")?;
    let config = GameConfig {
        encounters: false,
        ..GameConfig::default()
    };
    Ok(GameSession::with_battery(host, config, battery))
}

/// A session already in the field, skipping the title screen.
pub fn in_field(
    script: &str,
    hero: Player,
    map: MapId,
    x: u8,
    y: u8,
    facing: Direction,
) -> Result<GameSession<ScriptedHost>> {
    let mut session = scripted(script)?;
    *session.player_mut() = hero;
    session.load_map(map, x, y, facing);
    Ok(session)
}

/// Battery RAM holding `hero` in `slot`.
pub fn battery_with(slot: usize, hero: &Player) -> Result<BatteryRam> {
    let mut battery = BatteryRam::new();
    battery
        .save_player(slot, hero)
        .with_context(|| format!("saving to slot {slot}"))?;
    Ok(battery)
}
