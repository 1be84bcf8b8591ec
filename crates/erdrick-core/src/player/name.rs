//! Hero names and the stat adjustment derived from them.
//!
//! Names are stored as eight tile codes. The first four codes pick which two
//! of the four growth stats are trimmed by 10% and how many points (0-3) are
//! handed back to them.

use crate::player::stats::BaseStats;

pub const NAME_LEN: usize = 8;
/// Tile code for an empty name position.
pub const NAME_PAD: u8 = 0x60;

/// Tile code for a name character, if it can be typed.
pub const fn char_to_tile(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'a'..='z' => Some(c as u8 - b'a' + 0x0A),
        'A'..='Z' => Some(c as u8 - b'A' + 0x24),
        ' ' => Some(NAME_PAD),
        _ => None,
    }
}

pub const fn tile_to_char(tile: u8) -> Option<char> {
    match tile {
        0x00..=0x09 => Some((b'0' + tile) as char),
        0x0A..=0x23 => Some((b'a' + tile - 0x0A) as char),
        0x24..=0x3D => Some((b'A' + tile - 0x24) as char),
        NAME_PAD => Some(' '),
        _ => None,
    }
}

/// Encodes up to eight typeable characters, padding the rest.
pub fn encode(name: &str) -> [u8; NAME_LEN] {
    let mut tiles = [NAME_PAD; NAME_LEN];
    for (slot, tile) in tiles
        .iter_mut()
        .zip(name.chars().filter_map(char_to_tile))
    {
        *slot = tile;
    }
    tiles
}

/// Decodes stored tiles, dropping trailing padding and unknown codes.
pub fn decode(tiles: &[u8; NAME_LEN]) -> String {
    let name: String = tiles.iter().filter_map(|&t| tile_to_char(t)).collect();
    name.trim_end().to_string()
}

/// The name as it will be stored.
pub fn normalize(name: &str) -> String {
    decode(&encode(name))
}

/// Which growth stats a name trims, and the points it hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameModifier {
    /// Agility is trimmed instead of strength.
    pub trims_agility: bool,
    /// Max MP is trimmed instead of max HP.
    pub trims_mp: bool,
    /// Added back to each trimmed stat.
    pub bonus: u8,
}

impl NameModifier {
    pub fn for_name(name: &str) -> Self {
        let tiles = encode(name);
        let sum: u32 = tiles[..4].iter().map(|&t| u32::from(t)).sum();
        Self::from_value((sum % 16) as u8)
    }

    /// Modifier for `n` in `0..16`.
    pub const fn from_value(n: u8) -> Self {
        Self {
            trims_agility: n & 0b01 != 0,
            trims_mp: n & 0b10 != 0,
            bonus: (n & 0x0F) >> 2,
        }
    }

    fn trim(self, stat: u8) -> u8 {
        if stat == 0 {
            return 0;
        }
        ((stat as u16 * 9 / 10) as u8).saturating_add(self.bonus)
    }

    pub fn apply(self, stats: BaseStats) -> BaseStats {
        let mut adjusted = stats;
        if self.trims_agility {
            adjusted.agility = self.trim(stats.agility);
        } else {
            adjusted.strength = self.trim(stats.strength);
        }
        if self.trims_mp {
            adjusted.max_mp = self.trim(stats.max_mp);
        } else {
            adjusted.max_hp = self.trim(stats.max_hp);
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::stats::base_stats;

    #[test]
    fn tiles_round_trip() {
        assert_eq!(char_to_tile('0'), Some(0x00));
        assert_eq!(char_to_tile('a'), Some(0x0A));
        assert_eq!(char_to_tile('Z'), Some(0x3D));
        assert_eq!(char_to_tile('#'), None);
        for tile in (0x00..=0x3D).chain([NAME_PAD]) {
            let c = tile_to_char(tile).expect("typeable");
            assert_eq!(char_to_tile(c), Some(tile));
        }
    }

    #[test]
    fn names_are_truncated_and_padded() {
        assert_eq!(encode("Loto"), [0x2F, 0x18, 0x1D, 0x18, 0x60, 0x60, 0x60, 0x60]);
        assert_eq!(normalize("Erdrick the Great"), "Erdrick");
        assert_eq!(normalize("A#B"), "AB");
    }

    #[test]
    fn value_bits_pick_the_trimmed_stats() {
        // "Loto": 0x2F + 0x18 + 0x1D + 0x18 = 0x7C, 0x7C % 16 = 12.
        let modifier = NameModifier::for_name("Loto");
        assert_eq!(modifier, NameModifier::from_value(12));
        assert!(!modifier.trims_agility);
        assert!(!modifier.trims_mp);
        assert_eq!(modifier.bonus, 3);

        let modifier = NameModifier::from_value(0b0111);
        assert!(modifier.trims_agility);
        assert!(modifier.trims_mp);
        assert_eq!(modifier.bonus, 1);
    }

    #[test]
    fn trim_is_nine_tenths_plus_bonus() {
        let stats = base_stats(30);
        let adjusted = NameModifier::from_value(12).apply(stats);
        assert_eq!(u16::from(adjusted.strength), 140 * 9 / 10 + 3);
        assert_eq!(u16::from(adjusted.max_hp), 210 * 9 / 10 + 3);
        assert_eq!(adjusted.agility, stats.agility);
        assert_eq!(adjusted.max_mp, stats.max_mp);
    }

    #[test]
    fn zero_stats_stay_zero() {
        let stats = base_stats(1);
        let adjusted = NameModifier::from_value(0b1110).apply(stats);
        assert_eq!(adjusted.max_mp, 0);
    }
}
