//! Encounter tables and the monsters that guard fixed spots.

use crate::{
    enemy::EnemyKind::{self, *},
    map::MapId,
    player::flags::QuestFlags,
};

/// Overworld blocks per encounter zone, horizontally.
pub const ZONE_WIDTH: u8 = 12;
/// Overworld blocks per encounter zone, vertically.
pub const ZONE_HEIGHT: u8 = 8;
/// Zones per row of the overworld grid.
const ZONES_ACROSS: usize = 2;

/// A zone's five encounter slots; one is picked uniformly per fight.
pub type EncounterGroup = [EnemyKind; 5];

/// Row-major, starting with the zone around Tantegel.
static OVERWORLD_ZONES: [EncounterGroup; 4] = [
    [Slime, RedSlime, Drakee, Slime, RedSlime],
    [Drakee, Ghost, Magician, Scorpion, Drakee],
    [Ghost, Magician, Magidrakee, Scorpion, Skeleton],
    [Druin, Poltergeist, Droll, Drakeema, Skeleton],
];

static CAVE_GROUP: EncounterGroup = [Ghost, Magician, Magidrakee, Scorpion, Druin];

/// Group rolled for encounters at `(x, y)`; `None` where nothing attacks.
pub fn encounter_group(map: MapId, x: u8, y: u8) -> Option<&'static EncounterGroup> {
    match map {
        MapId::Overworld => {
            let column = usize::from(x / ZONE_WIDTH).min(ZONES_ACROSS - 1);
            let row = usize::from(y / ZONE_HEIGHT);
            OVERWORLD_ZONES.get(row * ZONES_ACROSS + column)
        }
        MapId::ErdricksCave => Some(&CAVE_GROUP),
        _ => None,
    }
}

/// Monsters the silver harp calls up: the weakest overworld zone.
pub fn harp_group() -> &'static EncounterGroup {
    &OVERWORLD_ZONES[0]
}

/// A monster that attacks whenever the hero steps onto its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guardian {
    pub map: MapId,
    pub x: u8,
    pub y: u8,
    pub kind: EnemyKind,
    /// Set once the guardian is beaten; it never returns after that.
    pub beaten: QuestFlags,
}

pub static GUARDIANS: &[Guardian] = &[Guardian {
    map: MapId::Overworld,
    x: 13,
    y: 13,
    kind: Golem,
    beaten: QuestFlags::GOLEM_DEAD,
}];

/// Guardian still standing at `(x, y)`.
pub fn guardian_at(map: MapId, x: u8, y: u8, quest: QuestFlags) -> Option<EnemyKind> {
    GUARDIANS
        .iter()
        .find(|g| g.map == map && g.x == x && g.y == y && !quest.contains(g.beaten))
        .map(|g| g.kind)
}
