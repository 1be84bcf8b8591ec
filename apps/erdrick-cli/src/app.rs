use std::{fs, path::Path};

use anyhow::{Context, Result};
use erdrick_core::{
    GameConfig, GameSession,
    host::scripted::{HostEvent, ScriptedHost},
    memory::battery::{REPLICAS_PER_SLOT, SLOT_COUNT},
    player::snapshot,
    save::BatteryRam,
};
use tracing::{info, warn};

use crate::args::PlayArgs;

fn load_battery(path: &Path) -> Result<BatteryRam> {
    if !path.exists() {
        info!(path = %path.display(), "no battery image yet; starting blank");
        return Ok(BatteryRam::new());
    }
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    BatteryRam::from_bytes(&bytes).with_context(|| format!("loading {}", path.display()))
}

pub fn play(args: PlayArgs) -> Result<()> {
    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("reading {}", args.script.display()))?;
    let host = ScriptedHost::from_script(&script)
        .with_context(|| format!("parsing {}", args.script.display()))?
        .with_frame_limit(args.frames);
    let battery = match &args.battery {
        Some(path) => load_battery(path)?,
        None => BatteryRam::new(),
    };
    let config = GameConfig {
        history_policy: args.history.into(),
        encounters: !args.no_encounters,
        seed: args.seed,
        ..GameConfig::default()
    };

    let mut session = GameSession::with_battery(host, config, battery);
    let outcome = session.run();
    let frames = session.frame_count();
    let map = session.map_id();
    let (x, y) = session.position();
    let player = session.player().clone();
    let (host, battery) = session.into_parts();

    if args.transcript {
        for event in host.transcript() {
            println!("{}", describe(event));
        }
    }
    println!("outcome: {outcome} after {frames} frames");
    println!(
        "{}: level {} HP {}/{} MP {}/{} gold {} exp {}",
        player.name(),
        player.level(),
        player.hp(),
        player.max_hp(),
        player.mp(),
        player.max_mp(),
        player.gold(),
        player.experience()
    );
    println!("at {map} ({x}, {y})");
    if host.pending() > 0 {
        warn!(steps = host.pending(), "script not used up");
    }

    if let Some(path) = &args.battery {
        fs::write(path, battery.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "battery image saved");
    }
    if let Some(path) = &args.snapshot {
        let bytes = snapshot::to_postcard(&player).context("encoding snapshot")?;
        fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }
    Ok(())
}

fn describe(event: &HostEvent) -> String {
    match event {
        HostEvent::Text {
            text,
            number,
            subject,
        } => {
            let mut line = format!("text {text}");
            if let Some(number) = number {
                line.push_str(&format!(" #{number}"));
            }
            if let Some(subject) = subject {
                line.push_str(&format!(" \"{subject}\""));
            }
            line
        }
        HostEvent::Window { kind, selection } => format!("window {kind:?} -> {selection:?}"),
        HostEvent::Name(name) => format!("name {name:?}"),
        HostEvent::Sfx(sfx) => format!("sfx {sfx:?}"),
        HostEvent::Music(music) => format!("music {music:?}"),
    }
}

pub fn check(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let battery =
        BatteryRam::from_bytes(&bytes).with_context(|| format!("loading {}", path.display()))?;
    for slot in 0..SLOT_COUNT {
        if battery.is_blank(slot) {
            println!("slot {}: empty", slot + 1);
            continue;
        }
        let intact = (0..REPLICAS_PER_SLOT)
            .filter_map(|replica| battery.replica(slot, replica).ok())
            .filter(|record| record.is_valid())
            .count();
        match battery.valid_record(slot) {
            Some(record) => {
                let player = record.to_player();
                println!(
                    "slot {}: {} level {} gold {} ({intact}/{REPLICAS_PER_SLOT} replicas intact)",
                    slot + 1,
                    player.name(),
                    player.level(),
                    player.gold()
                );
            }
            None => println!("slot {}: corrupted, no replica validates", slot + 1),
        }
    }
    Ok(())
}
