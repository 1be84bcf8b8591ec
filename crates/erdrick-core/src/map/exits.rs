//! Map transitions.
//!
//! The table is scanned top to bottom and the first matching row wins, so a
//! wildcard row shadows everything after it for the same map. Keep exact
//! coordinates above edge and wildcard rows.

use crate::map::{Direction, layouts::MapId};

/// What a row of the exit table matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// An exact block on the source map.
    At { x: u8, y: u8 },
    /// Walking off any edge of the source map.
    Edge,
    /// Any position on the source map.
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapExit {
    pub from: MapId,
    pub trigger: Trigger,
    pub to: MapId,
    pub x: u8,
    pub y: u8,
    pub facing: Direction,
}

impl MapExit {
    /// Whether this row fires for position `(x, y)` on `map`.
    ///
    /// `off_edge` is set when the position lies outside the map, which only
    /// edge and wildcard rows accept.
    pub fn matches(&self, map: MapId, x: i16, y: i16, off_edge: bool) -> bool {
        if self.from != map {
            return false;
        }
        match self.trigger {
            Trigger::At { x: tx, y: ty } => !off_edge && x == tx as i16 && y == ty as i16,
            Trigger::Edge => off_edge,
            Trigger::Any => true,
        }
    }
}

const fn at(from: MapId, x: u8, y: u8, to: MapId, tx: u8, ty: u8, facing: Direction) -> MapExit {
    MapExit {
        from,
        trigger: Trigger::At { x, y },
        to,
        x: tx,
        y: ty,
        facing,
    }
}

const fn edge(from: MapId, to: MapId, x: u8, y: u8, facing: Direction) -> MapExit {
    MapExit {
        from,
        trigger: Trigger::Edge,
        to,
        x,
        y,
        facing,
    }
}

pub static EXITS: &[MapExit] = &[
    at(MapId::Overworld, 3, 2, MapId::Brecconary, 6, 11, Direction::Up),
    at(MapId::Overworld, 7, 5, MapId::Tantegel, 7, 10, Direction::Up),
    at(MapId::Overworld, 17, 8, MapId::ErdricksCave, 1, 1, Direction::Down),
    at(MapId::Overworld, 13, 14, MapId::CharlockThrone, 4, 6, Direction::Up),
    at(MapId::ThroneRoom, 8, 6, MapId::Tantegel, 3, 2, Direction::Down),
    at(MapId::Tantegel, 3, 2, MapId::ThroneRoom, 8, 6, Direction::Left),
    at(MapId::ErdricksCave, 1, 1, MapId::Overworld, 17, 8, Direction::Down),
    edge(MapId::Tantegel, MapId::Overworld, 7, 5, Direction::Down),
    edge(MapId::Brecconary, MapId::Overworld, 3, 2, Direction::Down),
    edge(MapId::CharlockThrone, MapId::Overworld, 13, 14, Direction::Up),
];

/// First row of `table` matching the position, if any.
pub fn find_exit_in(
    table: &[MapExit],
    map: MapId,
    x: i16,
    y: i16,
    off_edge: bool,
) -> Option<&MapExit> {
    table.iter().find(|exit| exit.matches(map, x, y, off_edge))
}

/// Looks the position up in the game's exit table.
pub fn find_exit(map: MapId, x: i16, y: i16, off_edge: bool) -> Option<&'static MapExit> {
    find_exit_in(EXITS, map, x, y, off_edge)
}
