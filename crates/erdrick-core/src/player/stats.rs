//! Level and growth tables.

pub const MAX_LEVEL: u8 = 30;

/// Experience needed to reach each level, level 1 first.
pub const LEVEL_THRESHOLDS: [u16; MAX_LEVEL as usize] = [
    0, 7, 23, 47, 110, 220, 450, 800, 1300, 2000, 2900, 4000, 5500, 7500, 10000, 13000, 16000,
    19000, 22000, 26000, 30000, 34000, 38000, 42000, 46000, 50000, 54000, 58000, 62000, 65535,
];

/// Strength, agility, max HP and max MP before the name adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BaseStats {
    pub strength: u8,
    pub agility: u8,
    pub max_hp: u8,
    pub max_mp: u8,
}

const fn s(strength: u8, agility: u8, max_hp: u8, max_mp: u8) -> BaseStats {
    BaseStats {
        strength,
        agility,
        max_hp,
        max_mp,
    }
}

pub const BASE_STATS: [BaseStats; MAX_LEVEL as usize] = [
    s(4, 4, 15, 0),
    s(5, 4, 22, 0),
    s(7, 6, 24, 5),
    s(7, 8, 31, 16),
    s(12, 10, 35, 20),
    s(16, 10, 38, 24),
    s(18, 17, 40, 26),
    s(22, 20, 46, 29),
    s(30, 22, 50, 36),
    s(35, 31, 54, 40),
    s(40, 35, 62, 50),
    s(48, 40, 63, 58),
    s(52, 48, 70, 64),
    s(60, 55, 78, 70),
    s(68, 64, 86, 72),
    s(72, 70, 92, 95),
    s(72, 78, 100, 100),
    s(85, 84, 115, 108),
    s(87, 86, 130, 115),
    s(92, 88, 138, 128),
    s(95, 90, 149, 135),
    s(97, 90, 158, 146),
    s(99, 94, 165, 153),
    s(103, 98, 170, 161),
    s(113, 100, 174, 161),
    s(117, 105, 180, 168),
    s(125, 107, 189, 175),
    s(130, 115, 195, 180),
    s(135, 120, 200, 190),
    s(140, 130, 210, 200),
];

/// Largest level whose threshold `experience` has reached.
pub fn level_for(experience: u16) -> u8 {
    LEVEL_THRESHOLDS
        .iter()
        .rposition(|&threshold| experience >= threshold)
        .map_or(1, |index| index as u8 + 1)
}

/// Experience still needed for the next level, or `None` at the cap.
pub fn experience_to_next(experience: u16) -> Option<u16> {
    let level = level_for(experience);
    LEVEL_THRESHOLDS
        .get(level as usize)
        .map(|&next| next - experience)
}

/// Unadjusted stats for `level` (clamped to 1..=30).
pub fn base_stats(level: u8) -> BaseStats {
    let index = level.clamp(1, MAX_LEVEL) as usize - 1;
    BASE_STATS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thresholds_map_to_levels() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(6), 1);
        assert_eq!(level_for(7), 2);
        assert_eq!(level_for(22), 2);
        assert_eq!(level_for(23), 3);
        assert_eq!(level_for(64_999), 29);
        assert_eq!(level_for(u16::MAX), 30);
    }

    #[test]
    fn next_level_distance() {
        assert_eq!(experience_to_next(0), Some(7));
        assert_eq!(experience_to_next(10), Some(13));
        assert_eq!(experience_to_next(u16::MAX), None);
    }

    #[test]
    fn tables_grow() {
        assert!(LEVEL_THRESHOLDS.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(base_stats(0), base_stats(1));
        assert_eq!(base_stats(99), BASE_STATS[29]);
    }

    proptest! {
        #[test]
        fn level_is_monotonic(a in any::<u16>(), b in any::<u16>()) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for(low) <= level_for(high));
        }

        #[test]
        fn level_is_the_largest_reached_threshold(e in any::<u16>()) {
            let level = level_for(e);
            prop_assert_eq!(level, level_for(e));
            prop_assert!(e >= LEVEL_THRESHOLDS[level as usize - 1]);
            if let Some(&next) = LEVEL_THRESHOLDS.get(level as usize) {
                prop_assert!(e < next);
            }
        }
    }
}
