use crate::{
    map::{history::MapPoint, layouts::MapId},
    player::items::Item,
};

/// Contents of a chest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Treasure {
    /// `base + (rnd & mask)` gold.
    Gold { base: u16, mask: u8 },
    Herb,
    Key,
    Item(Item),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chest {
    pub at: MapPoint,
    pub contents: Treasure,
}

const fn chest(map: MapId, x: u8, y: u8, contents: Treasure) -> Chest {
    Chest {
        at: MapPoint::new(map, x, y),
        contents,
    }
}

pub static CHESTS: &[Chest] = &[
    chest(MapId::ThroneRoom, 2, 1, Treasure::Gold { base: 120, mask: 0 }),
    chest(MapId::ThroneRoom, 3, 1, Treasure::Item(Item::Torch)),
    chest(MapId::ThroneRoom, 6, 1, Treasure::Key),
    chest(MapId::Tantegel, 11, 4, Treasure::Herb),
    chest(MapId::ErdricksCave, 5, 5, Treasure::Gold { base: 50, mask: 0x3F }),
];

/// Chest contents at `point`, if a chest was placed there.
pub fn chest_at(point: MapPoint) -> Option<Treasure> {
    CHESTS
        .iter()
        .find(|chest| chest.at == point)
        .map(|chest| chest.contents)
}

/// Items hidden in the open, found with Search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiddenItem {
    pub at: MapPoint,
    pub item: Item,
}

pub static HIDDEN_ITEMS: &[HiddenItem] = &[
    HiddenItem {
        at: MapPoint::new(MapId::Overworld, 16, 5),
        item: Item::ErdricksToken,
    },
    HiddenItem {
        at: MapPoint::new(MapId::Brecconary, 11, 9),
        item: Item::FairyFlute,
    },
];

pub fn hidden_item_at(point: MapPoint) -> Option<Item> {
    HIDDEN_ITEMS
        .iter()
        .find(|hidden| hidden.at == point)
        .map(|hidden| hidden.item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::BlockType;

    #[test]
    fn every_chest_sits_on_a_chest_block() {
        for chest in CHESTS {
            let layout = chest.at.map.layout();
            let row = layout.rows[chest.at.y as usize].as_bytes();
            assert_eq!(
                BlockType::from_char(row[chest.at.x as usize] as char),
                Some(BlockType::Chest),
                "{:?}",
                chest.at
            );
        }
    }

    #[test]
    fn lookups() {
        assert_eq!(
            chest_at(MapPoint::new(MapId::ThroneRoom, 6, 1)),
            Some(Treasure::Key)
        );
        assert_eq!(chest_at(MapPoint::new(MapId::ThroneRoom, 5, 1)), None);
        assert_eq!(
            hidden_item_at(MapPoint::new(MapId::Overworld, 16, 5)),
            Some(Item::ErdricksToken)
        );
    }
}
