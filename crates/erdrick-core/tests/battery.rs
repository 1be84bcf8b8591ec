mod common;

use anyhow::{Context, Result};
use common::battery_with;
use erdrick_core::{
    memory::battery::{CHECKSUM_COVERED, REPLICAS_PER_SLOT},
    player::{Player, items::Item},
    save::{BatteryRam, SaveRecord},
};

fn corrupt(battery: &mut BatteryRam, slot: usize, replica: usize) -> Result<()> {
    let mut bytes = *battery.replica(slot, replica)?.bytes();
    bytes[CHECKSUM_COVERED] ^= 0xFF;
    battery.write_replica(slot, replica, &SaveRecord::from_bytes(bytes))?;
    Ok(())
}

#[test]
fn nine_corrupted_replicas_still_load() -> Result<()> {
    let mut hero = Player::new("Lora");
    hero.set_gold(1234);
    hero.inventory_mut()
        .add_item(Item::Torch)
        .map_err(|item| anyhow::anyhow!("bag rejected {item}"))?;
    let mut battery = battery_with(2, &hero)?;
    for replica in 0..REPLICAS_PER_SLOT - 1 {
        corrupt(&mut battery, 2, replica)?;
    }
    let loaded = battery.validate_and_load(2).context("last replica intact")?;
    assert_eq!(loaded, hero);
    Ok(())
}

#[test]
fn image_round_trips_through_bytes() -> Result<()> {
    let battery = battery_with(0, &Player::new("Loto"))?;
    let reloaded = BatteryRam::from_bytes(battery.as_bytes())?;
    assert!(reloaded.is_valid(0));
    assert!(!reloaded.is_valid(1));
    Ok(())
}
