use tracing::{debug, info, warn};

use crate::{
    error::SaveError,
    memory::battery::{BATTERY_RAM_SIZE, RECORD_SIZE, REPLICAS_PER_SLOT, SLOT_COUNT, replica_offset},
    player::Player,
    save::record::SaveRecord,
};

/// The battery-backed RAM image holding three adventure logs, each written
/// ten times.
#[derive(Clone, PartialEq, Eq)]
pub struct BatteryRam {
    bytes: Box<[u8; BATTERY_RAM_SIZE]>,
}

impl core::fmt::Debug for BatteryRam {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BatteryRam")
            .field("slots", &self.slot_status())
            .finish()
    }
}

impl Default for BatteryRam {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryRam {
    /// A cleared image with every slot empty.
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0; BATTERY_RAM_SIZE]),
        }
    }

    /// Wraps an image read from disk.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SaveError> {
        let bytes: [u8; BATTERY_RAM_SIZE] =
            bytes.try_into().map_err(|_| SaveError::BatterySize {
                expected: BATTERY_RAM_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self {
            bytes: Box::new(bytes),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    fn check_slot(slot: usize) -> Result<(), SaveError> {
        if slot < SLOT_COUNT {
            Ok(())
        } else {
            Err(SaveError::SlotOutOfRange(slot))
        }
    }

    /// Replica `replica` of `slot` as currently stored.
    pub fn replica(&self, slot: usize, replica: usize) -> Result<SaveRecord, SaveError> {
        Self::check_slot(slot)?;
        if replica >= REPLICAS_PER_SLOT {
            return Err(SaveError::SlotOutOfRange(slot));
        }
        let offset = replica_offset(slot, replica);
        let mut record = [0u8; RECORD_SIZE];
        record.copy_from_slice(&self.bytes[offset..offset + RECORD_SIZE]);
        Ok(SaveRecord::from_bytes(record))
    }

    /// Overwrites a single replica. Exposed for tooling and fault injection.
    pub fn write_replica(
        &mut self,
        slot: usize,
        replica: usize,
        record: &SaveRecord,
    ) -> Result<(), SaveError> {
        Self::check_slot(slot)?;
        if replica >= REPLICAS_PER_SLOT {
            return Err(SaveError::SlotOutOfRange(slot));
        }
        let offset = replica_offset(slot, replica);
        self.bytes[offset..offset + RECORD_SIZE].copy_from_slice(record.bytes());
        Ok(())
    }

    /// Writes `record` to all ten replicas of `slot`.
    pub fn persist(&mut self, slot: usize, record: &SaveRecord) -> Result<(), SaveError> {
        Self::check_slot(slot)?;
        for replica in 0..REPLICAS_PER_SLOT {
            self.write_replica(slot, replica, record)?;
        }
        info!(slot, "adventure log written");
        Ok(())
    }

    /// Serializes `player` and writes it to `slot`.
    pub fn save_player(&mut self, slot: usize, player: &Player) -> Result<(), SaveError> {
        self.persist(slot, &SaveRecord::from_player(player))
    }

    /// First replica of `slot` whose checksum matches, without side effects.
    pub fn valid_record(&self, slot: usize) -> Option<SaveRecord> {
        (0..REPLICAS_PER_SLOT)
            .filter_map(|replica| self.replica(slot, replica).ok())
            .find(SaveRecord::is_valid)
    }

    pub fn is_valid(&self, slot: usize) -> bool {
        self.valid_record(slot).is_some()
    }

    /// True when every replica of `slot` is zero.
    pub fn is_blank(&self, slot: usize) -> bool {
        (0..REPLICAS_PER_SLOT)
            .filter_map(|replica| self.replica(slot, replica).ok())
            .all(|record| record.is_blank())
    }

    /// Which slots currently hold a valid log.
    pub fn slot_status(&self) -> [bool; SLOT_COUNT] {
        core::array::from_fn(|slot| self.is_valid(slot))
    }

    /// Loads the first intact replica of `slot`.
    ///
    /// Corrupted replicas in front of it are logged and skipped. When none
    /// survive the slot is erased so it reads as empty from then on.
    pub fn validate_and_load(&mut self, slot: usize) -> Result<Player, SaveError> {
        Self::check_slot(slot)?;
        if self.is_blank(slot) {
            return Err(SaveError::SlotEmpty(slot));
        }
        for replica in 0..REPLICAS_PER_SLOT {
            let record = self.replica(slot, replica)?;
            if record.is_valid() {
                debug!(slot, replica, "replica validated");
                return Ok(record.to_player());
            }
            warn!(
                slot,
                replica,
                stored = record.stored_checksum(),
                computed = record.compute_checksum(),
                "corrupted save replica"
            );
        }
        self.erase(slot)?;
        Err(SaveError::DeedsNotRecorded(slot))
    }

    /// Duplicates the log in `src` into every replica of `dst`.
    pub fn copy(&mut self, src: usize, dst: usize) -> Result<(), SaveError> {
        Self::check_slot(src)?;
        Self::check_slot(dst)?;
        let record = self.valid_record(src).ok_or(SaveError::SlotEmpty(src))?;
        if self.is_valid(dst) {
            return Err(SaveError::SlotOccupied(dst));
        }
        self.persist(dst, &record)?;
        if self.valid_record(dst) != Some(record) {
            return Err(SaveError::DeedsNotRecorded(dst));
        }
        info!(src, dst, "adventure log copied");
        Ok(())
    }

    /// Zeroes every replica of `slot`.
    pub fn erase(&mut self, slot: usize) -> Result<(), SaveError> {
        Self::check_slot(slot)?;
        let blank = SaveRecord::default();
        for replica in 0..REPLICAS_PER_SLOT {
            self.write_replica(slot, replica, &blank)?;
        }
        info!(slot, "adventure log erased");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(name: &str) -> (BatteryRam, Player) {
        let mut battery = BatteryRam::new();
        let mut player = Player::new(name);
        player.set_gold(777);
        battery.save_player(1, &player).expect("slot 1 exists");
        (battery, player)
    }

    #[test]
    fn image_size_is_checked() {
        assert_eq!(
            BatteryRam::from_bytes(&[0; 16]),
            Err(SaveError::BatterySize {
                expected: BATTERY_RAM_SIZE,
                actual: 16
            })
        );
        let battery = BatteryRam::from_bytes(&[0; BATTERY_RAM_SIZE]).expect("right size");
        assert_eq!(battery.slot_status(), [false; SLOT_COUNT]);
    }

    #[test]
    fn persist_writes_every_replica() {
        let (battery, player) = saved("Lora");
        assert_eq!(battery.slot_status(), [false, true, false]);
        for replica in 0..REPLICAS_PER_SLOT {
            let record = battery.replica(1, replica).expect("in range");
            assert_eq!(record.to_player(), player);
        }
        assert!(battery.is_blank(0));
    }

    #[test]
    fn falls_back_to_a_later_replica() {
        let (mut battery, player) = saved("Lora");
        let mut damaged = *battery.replica(1, 0).expect("in range").bytes();
        damaged[0] ^= 0x80;
        battery
            .write_replica(1, 0, &SaveRecord::from_bytes(damaged))
            .expect("in range");
        assert_eq!(battery.validate_and_load(1), Ok(player));
    }

    #[test]
    fn total_corruption_erases_the_slot() {
        let (mut battery, _) = saved("Lora");
        for replica in 0..REPLICAS_PER_SLOT {
            let mut damaged = *battery.replica(1, replica).expect("in range").bytes();
            damaged[31] ^= 0x01;
            battery
                .write_replica(1, replica, &SaveRecord::from_bytes(damaged))
                .expect("in range");
        }
        assert_eq!(
            battery.validate_and_load(1),
            Err(SaveError::DeedsNotRecorded(1))
        );
        assert!(battery.is_blank(1));
        assert_eq!(battery.validate_and_load(1), Err(SaveError::SlotEmpty(1)));
    }

    #[test]
    fn copy_and_erase() {
        let (mut battery, player) = saved("Lora");
        assert_eq!(battery.copy(0, 2), Err(SaveError::SlotEmpty(0)));
        battery.copy(1, 2).expect("slot 2 is free");
        assert_eq!(battery.validate_and_load(2), Ok(player));
        assert_eq!(battery.copy(1, 2), Err(SaveError::SlotOccupied(2)));

        battery.erase(1).expect("slot exists");
        assert_eq!(battery.slot_status(), [false, false, true]);
        assert_eq!(battery.erase(3), Err(SaveError::SlotOutOfRange(3)));
    }

    #[test]
    fn slots_do_not_overlap() {
        let mut battery = BatteryRam::new();
        for slot in 0..SLOT_COUNT {
            let mut player = Player::new("Hero");
            player.set_gold(slot as u16 * 100 + 1);
            battery.save_player(slot, &player).expect("slot exists");
        }
        for slot in 0..SLOT_COUNT {
            let loaded = battery.validate_and_load(slot).expect("intact");
            assert_eq!(loaded.gold(), slot as u16 * 100 + 1);
        }
    }
}
