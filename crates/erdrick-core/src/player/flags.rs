use bitflags::bitflags;

bitflags! {
    /// Worn items and companion state (save record byte 11).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u8 {
        const WEARING_SCALE = 0x01;
        const WEARING_RING = 0x02;
        const CURSED_BELT = 0x04;
        const DEATH_NECKLACE = 0x08;
        const CARRYING_PRINCESS = 0x10;
        const PRINCESS_RETURNED = 0x20;
        const CURSED = Self::CURSED_BELT.bits() | Self::DEATH_NECKLACE.bits();
    }
}

bitflags! {
    /// World changes made by the hero (save record byte 12).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct QuestFlags: u8 {
        const RAINBOW_BRIDGE = 0x01;
        const GOLEM_DEAD = 0x02;
        const DRAGONLORD_DEAD = 0x04;
        const MET_KING = 0x08;
    }
}

bitflags! {
    /// One-shot discoveries (save record byte 13).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StoryFlags: u8 {
        const TOKEN_FOUND = 0x01;
        const FLUTE_FOUND = 0x02;
        const LEFT_THRONE_ROOM = 0x04;
    }
}
