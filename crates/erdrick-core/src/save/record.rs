use crate::{
    dialog::MessageSpeed,
    memory::battery::{CHECKSUM_COVERED, RECORD_SIZE},
    player::{
        Player,
        flags::{QuestFlags, StatusFlags, StoryFlags},
        items::{Equipment, Inventory},
        name::{self, NAME_LEN},
    },
    save::crc::checksum,
};

const EXPERIENCE: usize = 0;
const GOLD: usize = 2;
const ITEMS: usize = 4;
const KEYS: usize = 8;
const HERBS: usize = 9;
const EQUIPMENT: usize = 10;
const STATUS: usize = 11;
const QUEST: usize = 12;
const STORY: usize = 13;
const NAME: usize = 14;
const MESSAGE_SPEED: usize = 22;
const HP: usize = 23;
const MP: usize = 24;
const RESTART: usize = 25;
const CHECKSUM: usize = CHECKSUM_COVERED;

/// One 32-byte adventure log as stored in battery RAM.
///
/// | offset | field |
/// |-------:|-------|
/// | 0-1    | experience (LE) |
/// | 2-3    | gold (LE) |
/// | 4-7    | general items, two nibbles per byte |
/// | 8      | keys |
/// | 9      | herbs |
/// | 10     | `weapon << 5 \| armor << 2 \| shield` |
/// | 11-13  | status, quest and story flags |
/// | 14-21  | name tiles |
/// | 22     | message speed |
/// | 23-24  | current HP, MP |
/// | 25     | restart status |
/// | 26-29  | reserved, zero |
/// | 30-31  | checksum of bytes 0-29 (LE) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SaveRecord([u8; RECORD_SIZE]);

impl Default for SaveRecord {
    fn default() -> Self {
        Self([0; RECORD_SIZE])
    }
}

impl SaveRecord {
    pub fn from_bytes(bytes: [u8; RECORD_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; RECORD_SIZE] {
        &self.0
    }

    /// Serializes `player` and seals the record with its checksum.
    pub fn from_player(player: &Player) -> Self {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[EXPERIENCE..EXPERIENCE + 2].copy_from_slice(&player.experience.to_le_bytes());
        bytes[GOLD..GOLD + 2].copy_from_slice(&player.gold.to_le_bytes());
        bytes[ITEMS..ITEMS + 4].copy_from_slice(&player.inventory.pack());
        bytes[KEYS] = player.inventory.keys();
        bytes[HERBS] = player.inventory.herbs();
        bytes[EQUIPMENT] = player.equipment.pack();
        bytes[STATUS] = player.status.bits();
        bytes[QUEST] = player.quest.bits();
        bytes[STORY] = player.story.bits();
        bytes[NAME..NAME + NAME_LEN].copy_from_slice(&name::encode(&player.name));
        bytes[MESSAGE_SPEED] = player.message_speed.to_byte();
        bytes[HP] = player.hp;
        bytes[MP] = player.mp;
        bytes[RESTART] = u8::from(player.restart);
        let mut record = Self(bytes);
        record.seal();
        record
    }

    /// Recomputes and stores the checksum.
    pub fn seal(&mut self) {
        let sum = self.compute_checksum();
        self.0[CHECKSUM..CHECKSUM + 2].copy_from_slice(&sum.to_le_bytes());
    }

    pub fn compute_checksum(&self) -> u16 {
        checksum(&self.0[..CHECKSUM_COVERED])
    }

    pub fn stored_checksum(&self) -> u16 {
        u16::from_le_bytes([self.0[CHECKSUM], self.0[CHECKSUM + 1]])
    }

    /// True when the stored checksum matches. An all-zero record never
    /// validates.
    pub fn is_valid(&self) -> bool {
        !self.is_blank() && self.stored_checksum() == self.compute_checksum()
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Rebuilds the hero. HP and MP are clamped to the derived maximums.
    pub fn to_player(&self) -> Player {
        let b = &self.0;
        let mut tiles = [0u8; NAME_LEN];
        tiles.copy_from_slice(&b[NAME..NAME + NAME_LEN]);
        let mut player = Player {
            name: name::decode(&tiles),
            experience: u16::from_le_bytes([b[EXPERIENCE], b[EXPERIENCE + 1]]),
            gold: u16::from_le_bytes([b[GOLD], b[GOLD + 1]]),
            hp: 0,
            mp: 0,
            equipment: Equipment::unpack(b[EQUIPMENT]),
            inventory: Inventory::unpack(
                [b[ITEMS], b[ITEMS + 1], b[ITEMS + 2], b[ITEMS + 3]],
                b[HERBS],
                b[KEYS],
            ),
            status: StatusFlags::from_bits_truncate(b[STATUS]),
            quest: QuestFlags::from_bits_truncate(b[QUEST]),
            story: StoryFlags::from_bits_truncate(b[STORY]),
            message_speed: MessageSpeed::from_byte(b[MESSAGE_SPEED]),
            restart: b[RESTART] != 0,
        };
        player.set_hp(b[HP]);
        player.set_mp(b[MP]);
        player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::items::{Armor, Item, Weapon};

    fn veteran() -> Player {
        let mut player = Player::new("Erdrick");
        player.set_experience(2900);
        player.restore();
        player.set_gold(4321);
        player.equipment_mut().weapon = Weapon::BroadSword;
        player.equipment_mut().armor = Armor::HalfPlate;
        let bag = player.inventory_mut();
        bag.add_item(Item::Torch).expect("room");
        bag.add_item(Item::RainbowDrop).expect("room");
        bag.add_herb();
        bag.add_key();
        bag.add_key();
        player.status_mut().insert(StatusFlags::WEARING_SCALE);
        player.quest_mut().insert(QuestFlags::GOLEM_DEAD);
        player.story_mut().insert(StoryFlags::TOKEN_FOUND);
        player.set_message_speed(MessageSpeed::Slow);
        player.take_damage(5);
        player
    }

    #[test]
    fn layout_offsets() {
        let record = SaveRecord::from_player(&veteran());
        let b = record.bytes();
        assert_eq!(u16::from_le_bytes([b[0], b[1]]), 2900);
        assert_eq!(u16::from_le_bytes([b[2], b[3]]), 4321);
        assert_eq!(b[4], 0xE1);
        assert_eq!(b[8], 2);
        assert_eq!(b[9], 1);
        assert_eq!(b[10], (5 << 5) | (4 << 2));
        assert_eq!(b[11], StatusFlags::WEARING_SCALE.bits());
        assert_eq!(&b[14..21], &name::encode("Erdrick")[..7]);
        assert_eq!(b[21], name::NAME_PAD);
        assert_eq!(b[22], MessageSpeed::Slow.to_byte());
        assert_eq!(&b[26..30], &[0, 0, 0, 0]);
        assert_eq!(record.stored_checksum(), checksum(&b[..30]));
    }

    #[test]
    fn round_trip_restores_the_hero() {
        let player = veteran();
        let record = SaveRecord::from_player(&player);
        assert!(record.is_valid());
        assert_eq!(record.to_player(), player);
    }

    #[test]
    fn corruption_is_detected() {
        let record = SaveRecord::from_player(&veteran());
        let mut bytes = *record.bytes();
        bytes[30] ^= 0xFF;
        assert!(!SaveRecord::from_bytes(bytes).is_valid());
        let mut bytes = *record.bytes();
        bytes[2] ^= 0x01;
        assert!(!SaveRecord::from_bytes(bytes).is_valid());
    }

    #[test]
    fn blank_record_never_validates() {
        let blank = SaveRecord::default();
        assert!(blank.is_blank());
        assert!(!blank.is_valid());
    }
}
