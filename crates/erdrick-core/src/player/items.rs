//! Equipment and the item bag.

use core::fmt;

/// Most general items the bag holds.
pub const INVENTORY_CAPACITY: usize = 8;
/// Most herbs carried at once.
pub const MAX_HERBS: u8 = 6;
/// Most magic keys carried at once.
pub const MAX_KEYS: u8 = 6;

pub const HERB_PRICE: u16 = 24;
pub const KEY_PRICE: u16 = 53;

macro_rules! gear {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $value:literal, $bonus:literal, $price:literal, $label:literal;)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            #[default]
            $($variant = $value,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Stat bonus while equipped.
            pub const fn bonus(self) -> u8 {
                match self {
                    $($name::$variant => $bonus,)+
                }
            }

            /// Shop price in gold; zero for gear that cannot be bought.
            pub const fn price(self) -> u16 {
                match self {
                    $($name::$variant => $price,)+
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub const fn index(self) -> u8 {
                self as u8
            }

            pub fn from_index(index: u8) -> Option<Self> {
                Self::ALL.get(index as usize).copied()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

gear! {
    /// Weapons, adding to attack.
    Weapon {
        None = 0, 0, 0, "nothing";
        BambooPole = 1, 2, 10, "Bamboo Pole";
        Club = 2, 4, 60, "Club";
        CopperSword = 3, 10, 180, "Copper Sword";
        HandAxe = 4, 15, 560, "Hand Axe";
        BroadSword = 5, 20, 1500, "Broad Sword";
        FlameSword = 6, 28, 9800, "Flame Sword";
        ErdricksSword = 7, 40, 0, "Erdrick's Sword";
    }
}

gear! {
    /// Body armor, adding to defense.
    Armor {
        None = 0, 0, 0, "nothing";
        Clothes = 1, 2, 20, "Clothes";
        LeatherArmor = 2, 4, 70, "Leather Armor";
        ChainMail = 3, 10, 300, "Chain Mail";
        HalfPlate = 4, 16, 1000, "Half Plate";
        FullPlate = 5, 24, 3000, "Full Plate";
        MagicArmor = 6, 24, 7700, "Magic Armor";
        ErdricksArmor = 7, 28, 0, "Erdrick's Armor";
    }
}

gear! {
    /// Shields, adding to defense.
    Shield {
        None = 0, 0, 0, "nothing";
        SmallShield = 1, 4, 90, "Small Shield";
        LargeShield = 2, 10, 800, "Large Shield";
        SilverShield = 3, 20, 14800, "Silver Shield";
    }
}

/// Equipped gear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Weapon,
    pub armor: Armor,
    pub shield: Shield,
}

impl Equipment {
    /// `weapon << 5 | armor << 2 | shield`.
    pub const fn pack(self) -> u8 {
        (self.weapon.index() << 5) | (self.armor.index() << 2) | self.shield.index()
    }

    pub fn unpack(byte: u8) -> Self {
        Self {
            weapon: Weapon::from_index(byte >> 5).unwrap_or_default(),
            armor: Armor::from_index((byte >> 2) & 0x07).unwrap_or_default(),
            shield: Shield::from_index(byte & 0x03).unwrap_or_default(),
        }
    }
}

/// General items, numbered by their save-record nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Item {
    Torch = 1,
    FairyWater = 2,
    Wings = 3,
    DragonsScale = 4,
    FairyFlute = 5,
    FightersRing = 6,
    ErdricksToken = 7,
    GwaelinsLove = 8,
    CursedBelt = 9,
    SilverHarp = 10,
    DeathNecklace = 11,
    StonesOfSunlight = 12,
    StaffOfRain = 13,
    RainbowDrop = 14,
}

impl Item {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        let item = match code {
            1 => Self::Torch,
            2 => Self::FairyWater,
            3 => Self::Wings,
            4 => Self::DragonsScale,
            5 => Self::FairyFlute,
            6 => Self::FightersRing,
            7 => Self::ErdricksToken,
            8 => Self::GwaelinsLove,
            9 => Self::CursedBelt,
            10 => Self::SilverHarp,
            11 => Self::DeathNecklace,
            12 => Self::StonesOfSunlight,
            13 => Self::StaffOfRain,
            14 => Self::RainbowDrop,
            _ => return None,
        };
        Some(item)
    }

    /// Tool shop price; zero when the item is not sold.
    pub const fn price(self) -> u16 {
        match self {
            Self::Torch => 8,
            Self::FairyWater => 38,
            Self::Wings => 70,
            Self::DragonsScale => 20,
            _ => 0,
        }
    }

    /// Quest items can never be tossed or sold.
    pub const fn is_important(self) -> bool {
        matches!(
            self,
            Self::ErdricksToken
                | Self::GwaelinsLove
                | Self::SilverHarp
                | Self::StonesOfSunlight
                | Self::StaffOfRain
                | Self::RainbowDrop
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Torch => "Torch",
            Self::FairyWater => "Fairy Water",
            Self::Wings => "Wings",
            Self::DragonsScale => "Dragon's Scale",
            Self::FairyFlute => "Fairy Flute",
            Self::FightersRing => "Fighter's Ring",
            Self::ErdricksToken => "Erdrick's Token",
            Self::GwaelinsLove => "Gwaelin's Love",
            Self::CursedBelt => "Cursed Belt",
            Self::SilverHarp => "Silver Harp",
            Self::DeathNecklace => "Death Necklace",
            Self::StonesOfSunlight => "Stones of Sunlight",
            Self::StaffOfRain => "Staff of Rain",
            Self::RainbowDrop => "Rainbow Drop",
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One line of the item window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryEntry {
    Herb(u8),
    Key(u8),
    Item(Item),
}

impl InventoryEntry {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Herb(_) => "Herb",
            Self::Key(_) => "Magic Key",
            Self::Item(item) => item.name(),
        }
    }
}

/// Bag contents: up to eight general items plus herb and key counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    items: Vec<Item>,
    herbs: u8,
    keys: u8,
}

impl Inventory {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn herbs(&self) -> u8 {
        self.herbs
    }

    pub fn keys(&self) -> u8 {
        self.keys
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= INVENTORY_CAPACITY
    }

    pub fn contains(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    /// Adds `item`, handing it back when the bag is full.
    pub fn add_item(&mut self, item: Item) -> Result<(), Item> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push(item);
        Ok(())
    }

    /// Removes the first `item`. Returns false if none was carried.
    pub fn remove_item(&mut self, item: Item) -> bool {
        match self.items.iter().position(|&held| held == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn add_herb(&mut self) -> bool {
        if self.herbs >= MAX_HERBS {
            return false;
        }
        self.herbs += 1;
        true
    }

    pub fn take_herb(&mut self) -> bool {
        if self.herbs == 0 {
            return false;
        }
        self.herbs -= 1;
        true
    }

    pub fn add_key(&mut self) -> bool {
        if self.keys >= MAX_KEYS {
            return false;
        }
        self.keys += 1;
        true
    }

    pub fn take_key(&mut self) -> bool {
        if self.keys == 0 {
            return false;
        }
        self.keys -= 1;
        true
    }

    /// Window lines: herbs, keys, then general items in bag order.
    pub fn entries(&self) -> Vec<InventoryEntry> {
        let mut entries = Vec::with_capacity(self.items.len() + 2);
        if self.herbs > 0 {
            entries.push(InventoryEntry::Herb(self.herbs));
        }
        if self.keys > 0 {
            entries.push(InventoryEntry::Key(self.keys));
        }
        entries.extend(self.items.iter().copied().map(InventoryEntry::Item));
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.herbs == 0 && self.keys == 0
    }

    /// General items as nibble pairs, low nibble first.
    pub fn pack(&self) -> [u8; INVENTORY_CAPACITY / 2] {
        let mut packed = [0; INVENTORY_CAPACITY / 2];
        for (index, item) in self.items.iter().enumerate() {
            let shift = (index % 2) * 4;
            packed[index / 2] |= item.code() << shift;
        }
        packed
    }

    /// Rebuilds a bag from packed items and counters. Unknown nibbles are
    /// skipped and counters are clamped.
    pub fn unpack(packed: [u8; INVENTORY_CAPACITY / 2], herbs: u8, keys: u8) -> Self {
        let items = packed
            .iter()
            .flat_map(|byte| [byte & 0x0F, byte >> 4])
            .filter_map(Item::from_code)
            .collect();
        Self {
            items,
            herbs: herbs.min(MAX_HERBS),
            keys: keys.min(MAX_KEYS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equipment_packs_into_one_byte() {
        let gear = Equipment {
            weapon: Weapon::ErdricksSword,
            armor: Armor::MagicArmor,
            shield: Shield::SilverShield,
        };
        assert_eq!(gear.pack(), 0b111_110_11);
        assert_eq!(Equipment::unpack(gear.pack()), gear);
        assert_eq!(Equipment::unpack(0), Equipment::default());
    }

    #[test]
    fn bag_holds_eight_items() {
        let mut bag = Inventory::default();
        for _ in 0..INVENTORY_CAPACITY {
            assert_eq!(bag.add_item(Item::Torch), Ok(()));
        }
        assert!(bag.is_full());
        assert_eq!(bag.add_item(Item::Wings), Err(Item::Wings));
        assert_eq!(bag.items().len(), INVENTORY_CAPACITY);
    }

    #[test]
    fn counters_cap_at_six() {
        let mut bag = Inventory::default();
        for _ in 0..MAX_HERBS {
            assert!(bag.add_herb());
        }
        assert!(!bag.add_herb());
        assert!(bag.take_herb());
        assert_eq!(bag.herbs(), 5);
        assert!(!bag.take_key());
    }

    #[test]
    fn nibble_packing() {
        let mut bag = Inventory::default();
        bag.add_item(Item::Torch).expect("room");
        bag.add_item(Item::RainbowDrop).expect("room");
        bag.add_item(Item::Wings).expect("room");
        assert_eq!(bag.pack(), [0xE1, 0x03, 0x00, 0x00]);
        let restored = Inventory::unpack(bag.pack(), 9, 2);
        assert_eq!(restored.items(), bag.items());
        assert_eq!(restored.herbs(), MAX_HERBS);
        assert_eq!(restored.keys(), 2);
    }

    #[test]
    fn entries_list_counters_first() {
        let mut bag = Inventory::default();
        bag.add_key();
        bag.add_item(Item::FairyFlute).expect("room");
        assert_eq!(
            bag.entries(),
            vec![InventoryEntry::Key(1), InventoryEntry::Item(Item::FairyFlute)]
        );
    }

    #[test]
    fn remove_only_first_copy() {
        let mut bag = Inventory::default();
        bag.add_item(Item::Torch).expect("room");
        bag.add_item(Item::Torch).expect("room");
        assert!(bag.remove_item(Item::Torch));
        assert_eq!(bag.items(), &[Item::Torch]);
        assert!(!bag.remove_item(Item::Wings));
    }
}
