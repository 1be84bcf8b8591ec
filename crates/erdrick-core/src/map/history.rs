use tracing::warn;

use crate::map::layouts::MapId;

/// Opened doors remembered for the session.
pub const DOOR_HISTORY_LEN: usize = 16;
/// Emptied chests remembered for the session.
pub const TREASURE_HISTORY_LEN: usize = 20;

/// How the door and treasure histories behave when full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HistoryPolicy {
    /// Fixed-size tables; openings past the limit are silently not recorded
    /// and reappear when the map is reloaded.
    #[default]
    Fixed,
    /// No limit.
    Unbounded,
}

/// A block on a specific map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapPoint {
    pub map: MapId,
    pub x: u8,
    pub y: u8,
}

impl MapPoint {
    pub const fn new(map: MapId, x: u8, y: u8) -> Self {
        Self { map, x, y }
    }
}

/// Doors opened and chests taken during the session.
#[derive(Debug, Clone, Default)]
pub struct History {
    policy: HistoryPolicy,
    doors: Vec<MapPoint>,
    treasure: Vec<MapPoint>,
}

impl History {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self {
            policy,
            doors: Vec::new(),
            treasure: Vec::new(),
        }
    }

    pub fn policy(&self) -> HistoryPolicy {
        self.policy
    }

    /// Records an opened door. Returns false when the table had no room.
    pub fn record_door(&mut self, point: MapPoint) -> bool {
        Self::record(&mut self.doors, point, DOOR_HISTORY_LEN, self.policy, "door")
    }

    /// Records a taken chest. Returns false when the table had no room.
    pub fn record_treasure(&mut self, point: MapPoint) -> bool {
        Self::record(
            &mut self.treasure,
            point,
            TREASURE_HISTORY_LEN,
            self.policy,
            "treasure",
        )
    }

    fn record(
        table: &mut Vec<MapPoint>,
        point: MapPoint,
        limit: usize,
        policy: HistoryPolicy,
        kind: &str,
    ) -> bool {
        if table.contains(&point) {
            return true;
        }
        if policy == HistoryPolicy::Fixed && table.len() >= limit {
            warn!(kind, ?point, "history full, opening not recorded");
            return false;
        }
        table.push(point);
        true
    }

    pub fn door_opened(&self, point: MapPoint) -> bool {
        self.doors.contains(&point)
    }

    pub fn treasure_taken(&self, point: MapPoint) -> bool {
        self.treasure.contains(&point)
    }

    pub fn doors_on(&self, map: MapId) -> impl Iterator<Item = MapPoint> + '_ {
        self.doors.iter().copied().filter(move |p| p.map == map)
    }

    pub fn treasure_on(&self, map: MapId) -> impl Iterator<Item = MapPoint> + '_ {
        self.treasure.iter().copied().filter(move |p| p.map == map)
    }

    pub fn door_count(&self) -> usize {
        self.doors.len()
    }

    pub fn treasure_count(&self) -> usize {
        self.treasure.len()
    }
}
