mod common;

use anyhow::{Context, Result, ensure};
use common::{battery_with, in_field, scripted, scripted_with};
use ctor::ctor;
use erdrick_core::{
    SessionOutcome,
    dialog::text,
    host::Music,
    map::{BlockType, Direction, MapId},
    player::{
        Player,
        flags::QuestFlags,
        items::{INVENTORY_CAPACITY, Item},
    },
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

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

#[test]
fn new_quest_saved_with_the_king() -> Result<()> {
    // Title: new quest, first slot, name, normal speed. Then talk to the
    // king and accept his offer to record the deeds.
    let mut session = scripted(
        "select 0\nselect 0\nname Loto\nselect 1\npress a\nselect 0\nyes",
    )?;
    assert_eq!(session.run(), SessionOutcome::PoweredOff);
    assert!(session.host().saw_text(text::KING_QUEST));
    assert!(session.host().saw_text(text::KING_SAVED));

    let (_, battery) = session.into_parts();
    let saved = battery.valid_record(0).context("slot 0 holds a log")?.to_player();
    assert_eq!(saved.name(), "Loto");
    assert!(saved.quest().contains(QuestFlags::MET_KING));
    assert!(saved.restart());
    Ok(())
}

#[test]
fn continue_after_a_save_starts_at_the_king() -> Result<()> {
    let mut hero = Player::new("Lora");
    hero.set_gold(250);
    hero.set_restart(true);
    let battery = battery_with(1, &hero)?;
    let mut session = scripted_with("select 0\nselect 0\nidle 5", battery)?;
    assert_eq!(session.run(), SessionOutcome::PoweredOff);
    assert_eq!(session.map_id(), MapId::ThroneRoom);
    assert_eq!(session.player().gold(), 250);
    assert!(session.host().played_music(Music::ThroneRoom));
    Ok(())
}

#[test]
fn cancelling_the_title_menu_changes_nothing() -> Result<()> {
    let battery = battery_with(0, &Player::new("Lora"))?;
    let before = battery.as_bytes().to_vec();
    // Erase, then back out of the slot picker; copy, then back out.
    let mut session = scripted_with("select 4\ncancel\nselect 3\ncancel\ncancel", battery)?;
    assert_eq!(session.run(), SessionOutcome::PoweredOff);
    let (_, battery) = session.into_parts();
    ensure!(battery.as_bytes() == before.as_slice(), "battery RAM changed");
    Ok(())
}

#[test]
fn walking_out_of_the_throne_room() -> Result<()> {
    // Around the king, down through the unlocked door and onto the stairs.
    let mut hero = Player::new("Loto");
    hero.inventory_mut().add_key();
    let mut session = in_field(
        "press a\nselect 5\npress down 3\npress right 4\npress a\nselect 4",
        hero,
        MapId::ThroneRoom,
        4,
        3,
        Direction::Down,
    )?;
    assert_eq!(session.explore(), SessionOutcome::PoweredOff);
    assert_eq!(session.map_id(), MapId::Tantegel);
    assert_eq!(session.player().inventory().keys(), 0);

    // The opened door stays open when the room is loaded again.
    session.load_map(MapId::ThroneRoom, 4, 3, Direction::Down);
    assert_eq!(session.block_at(4, 4), BlockType::Brick);
    Ok(())
}

#[test]
fn full_bag_declined_keeps_everything() -> Result<()> {
    let mut hero = Player::new("Loto");
    for _ in 0..INVENTORY_CAPACITY {
        hero.inventory_mut()
            .add_item(Item::FairyWater)
            .map_err(|item| anyhow::anyhow!("bag rejected {item}"))?;
    }
    let before = hero.inventory().clone();
    let mut session = in_field("press a\nselect 7\nno", hero, MapId::ThroneRoom, 3, 1, Direction::Down)?;
    session.explore();
    assert_eq!(session.player().inventory(), &before);
    assert_eq!(session.block_at(3, 1), BlockType::Chest);
    assert!(session.host().saw_text(text::LEFT_IN_CHEST));
    Ok(())
}

#[test]
fn rainbow_drop_opens_the_way_south() -> Result<()> {
    let mut hero = Player::new("Loto");
    hero.inventory_mut()
        .add_item(Item::RainbowDrop)
        .map_err(|item| anyhow::anyhow!("bag rejected {item}"))?;
    let mut session = in_field(
        "press a\nselect 3\nselect 0\npress down",
        hero,
        MapId::Overworld,
        13,
        11,
        Direction::Down,
    )?;
    session.explore();
    assert!(session.player().quest().contains(QuestFlags::RAINBOW_BRIDGE));
    assert_eq!(session.block_at(13, 12), BlockType::Bridge);
    assert_eq!(session.position(), (13, 12));
    Ok(())
}

#[test]
fn taking_the_dragonlords_offer_ends_the_game() -> Result<()> {
    let mut hero = Player::new("Loto");
    hero.set_experience(20_000);
    hero.set_gold(5_000);
    let mut session = in_field(
        "press a\nselect 0\nyes",
        hero,
        MapId::CharlockThrone,
        4,
        2,
        Direction::Up,
    )?;
    assert_eq!(session.explore(), SessionOutcome::GameOver);
    assert_eq!(session.player().experience(), 0);
    assert_eq!(session.player().gold(), 0);
    Ok(())
}
