use core::fmt;

use crate::{
    host::Music,
    map::{BlockType, Direction},
    ppu::palette::{DUNGEON_PALETTE, FIELD_PALETTE, Palette},
};

/// Every map in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapId {
    Overworld,
    Tantegel,
    ThroneRoom,
    Brecconary,
    ErdricksCave,
    CharlockThrone,
}

/// Static description of a map.
#[derive(Debug, Clone, Copy)]
pub struct MapLayout {
    pub rows: &'static [&'static str],
    /// Block reported for coordinates outside the grid.
    pub boundary: BlockType,
    /// Only a small radius around the hero is drawn.
    pub dark: bool,
    pub music: Music,
}

impl MapLayout {
    pub fn width(&self) -> u8 {
        self.rows.first().map_or(0, |row| row.len() as u8)
    }

    pub fn height(&self) -> u8 {
        self.rows.len() as u8
    }
}

impl MapId {
    pub const ALL: [MapId; 6] = [
        Self::Overworld,
        Self::Tantegel,
        Self::ThroneRoom,
        Self::Brecconary,
        Self::ErdricksCave,
        Self::CharlockThrone,
    ];

    pub fn layout(self) -> &'static MapLayout {
        match self {
            Self::Overworld => &OVERWORLD,
            Self::Tantegel => &TANTEGEL,
            Self::ThroneRoom => &THRONE_ROOM,
            Self::Brecconary => &BRECCONARY,
            Self::ErdricksCave => &ERDRICKS_CAVE,
            Self::CharlockThrone => &CHARLOCK_THRONE,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::ErdricksCave | Self::CharlockThrone => DUNGEON_PALETTE,
            _ => FIELD_PALETTE,
        }
    }

    /// Maps where the Outside spell works, with where it leads.
    pub fn outside(self) -> Option<(MapId, u8, u8, Direction)> {
        match self {
            Self::ErdricksCave => Some((Self::Overworld, 17, 8, Direction::Down)),
            Self::CharlockThrone => Some((Self::Overworld, 13, 14, Direction::Up)),
            _ => None,
        }
    }

    pub fn is_dungeon(self) -> bool {
        matches!(self, Self::ErdricksCave | Self::CharlockThrone)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Overworld => "Alefgard",
            Self::Tantegel => "Tantegel Castle",
            Self::ThroneRoom => "Throne Room",
            Self::Brecconary => "Brecconary",
            Self::ErdricksCave => "Erdrick's Cave",
            Self::CharlockThrone => "Charlock Castle",
        }
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a new adventure and every return to the king begins.
pub const THRONE_ROOM_START: (MapId, u8, u8, Direction) = (MapId::ThroneRoom, 4, 3, Direction::Up);

/// Landing spot for Return and the Wings.
pub const RETURN_POINT: (MapId, u8, u8, Direction) = (MapId::Overworld, 7, 6, Direction::Down);

/// Where the rainbow drop has to be held up, facing the water.
pub const BRIDGE_VANTAGE: (u8, u8, Direction) = (13, 11, Direction::Down);

/// Overworld block the rainbow bridge fills in.
pub const BRIDGE_SITE: (u8, u8) = (13, 12);

static OVERWORLD: MapLayout = MapLayout {
    rows: &[
        "~~~~~~~~~~~~~~~~~~~~~~~~",
        "~.....ff....MMM....,,,.~",
        "~..T..ff...MMM...n..,,.~",
        "~.....f.......M..nn..,.~",
        "~..........ff......ff..~",
        "~......K...ff..%%f%%...~",
        "~...........nn..%%%....~",
        "~..,,......nnn..MMM....~",
        "~..,,,..........MC.....~",
        "~...,...ff.....MMM.....~",
        "~......fff.............~",
        "~~~~~..........~~~~~~~~~",
        "~~~~~~~~~~~~~~~~~~~~~~~~",
        "~~~~~~~~~~~...~~~~~~~~~~",
        "~~~~~~~~~~~~.K~~~~~~~~~~",
        "~~~~~~~~~~~~~~~~~~~~~~~~",
    ],
    boundary: BlockType::Water,
    dark: false,
    music: Music::Overworld,
};

static TANTEGEL: MapLayout = MapLayout {
    rows: &[
        "################",
        "#______#_______#",
        "#__<___#_______#",
        "#______D_______#",
        "#______#___$___#",
        "#______#########",
        "#______________#",
        "#______________#",
        "#______________#",
        "#######__#######",
        "................",
    ],
    boundary: BlockType::Grass,
    dark: false,
    music: Music::Castle,
};

static THRONE_ROOM: MapLayout = MapLayout {
    rows: &[
        "##########",
        "#_$$__$__#",
        "#________#",
        "#________#",
        "####D#####",
        "#________#",
        "#_______>#",
        "##########",
    ],
    boundary: BlockType::Wall,
    dark: false,
    music: Music::ThroneRoom,
};

static BRECCONARY: MapLayout = MapLayout {
    rows: &[
        "fffffffffffff",
        "f#W###.##I##f",
        "f#___#.#___#f",
        "f##+##.##+##f",
        "f...........f",
        "f...........f",
        "f...........f",
        "f#W###......f",
        "f#___#......f",
        "f##+##......f",
        "f...........f",
        "f.....,.....f",
        "fffff...fffff",
    ],
    boundary: BlockType::Grass,
    dark: false,
    music: Music::Town,
};

static ERDRICKS_CAVE: MapLayout = MapLayout {
    rows: &[
        "############",
        "#<__#______#",
        "#_#_#_####_#",
        "#_#___#____#",
        "#_####_#_#_#",
        "#____$_#_#_#",
        "#_####___#_#",
        "############",
    ],
    boundary: BlockType::Wall,
    dark: true,
    music: Music::Dungeon,
};

static CHARLOCK_THRONE: MapLayout = MapLayout {
    rows: &[
        "#########",
        "#_______#",
        "#_______#",
        "#_!!!!!_#",
        "#_______#",
        "#_______#",
        "####_####",
    ],
    boundary: BlockType::Brick,
    dark: false,
    music: Music::Dungeon,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_are_rectangular_and_parse() {
        for id in MapId::ALL {
            let layout = id.layout();
            let width = layout.width() as usize;
            assert!(width > 0, "{id} is empty");
            for row in layout.rows {
                assert_eq!(row.len(), width, "{id} has a ragged row: {row:?}");
                for c in row.chars() {
                    assert!(BlockType::from_char(c).is_some(), "{id}: bad block {c:?}");
                }
            }
        }
    }

    #[test]
    fn landmarks_sit_where_the_tables_expect() {
        let at = |id: MapId, x: usize, y: usize| {
            BlockType::from_char(id.layout().rows[y].as_bytes()[x] as char)
        };
        assert_eq!(at(MapId::Overworld, 3, 2), Some(BlockType::Town));
        assert_eq!(at(MapId::Overworld, 7, 5), Some(BlockType::Castle));
        assert_eq!(at(MapId::Overworld, 17, 8), Some(BlockType::Cave));
        assert_eq!(at(MapId::Overworld, 13, 14), Some(BlockType::Castle));
        assert_eq!(at(MapId::Overworld, 13, 12), Some(BlockType::Water));
        assert_eq!(at(MapId::Overworld, 16, 5), Some(BlockType::Swamp));
        assert_eq!(at(MapId::ThroneRoom, 4, 4), Some(BlockType::Door));
        assert_eq!(at(MapId::ThroneRoom, 8, 6), Some(BlockType::StairsDown));
        assert_eq!(at(MapId::Tantegel, 3, 2), Some(BlockType::StairsUp));
        assert_eq!(at(MapId::Tantegel, 7, 3), Some(BlockType::Door));
        assert_eq!(at(MapId::Tantegel, 11, 4), Some(BlockType::Chest));
        assert_eq!(at(MapId::Brecconary, 3, 3), Some(BlockType::LargeTile));
        assert_eq!(at(MapId::ErdricksCave, 1, 1), Some(BlockType::StairsUp));
        assert_eq!(at(MapId::ErdricksCave, 5, 5), Some(BlockType::Chest));
        assert_eq!(at(MapId::CharlockThrone, 4, 3), Some(BlockType::ForceField));
    }
}
