/// Terrain and fixtures making up a map grid.
///
/// Each block covers a 2x2 tile footprint and one attribute quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Grass,
    Sand,
    Hill,
    StairsUp,
    StairsDown,
    Brick,
    Swamp,
    Town,
    Cave,
    Castle,
    Bridge,
    Trees,
    Chest,
    ForceField,
    LargeTile,
    Water,
    Wall,
    Door,
    Mountain,
    WeaponSign,
    InnSign,
    Blank,
}

impl BlockType {
    /// Layout character for this block.
    pub const fn to_char(self) -> char {
        match self {
            Self::Grass => '.',
            Self::Sand => ',',
            Self::Hill => 'n',
            Self::StairsUp => '<',
            Self::StairsDown => '>',
            Self::Brick => '_',
            Self::Swamp => '%',
            Self::Town => 'T',
            Self::Cave => 'C',
            Self::Castle => 'K',
            Self::Bridge => '=',
            Self::Trees => 'f',
            Self::Chest => '$',
            Self::ForceField => '!',
            Self::LargeTile => '+',
            Self::Water => '~',
            Self::Wall => '#',
            Self::Door => 'D',
            Self::Mountain => 'M',
            Self::WeaponSign => 'W',
            Self::InnSign => 'I',
            Self::Blank => ' ',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        let block = match c {
            '.' => Self::Grass,
            ',' => Self::Sand,
            'n' => Self::Hill,
            '<' => Self::StairsUp,
            '>' => Self::StairsDown,
            '_' => Self::Brick,
            '%' => Self::Swamp,
            'T' => Self::Town,
            'C' => Self::Cave,
            'K' => Self::Castle,
            '=' => Self::Bridge,
            'f' => Self::Trees,
            '$' => Self::Chest,
            '!' => Self::ForceField,
            '+' => Self::LargeTile,
            '~' => Self::Water,
            '#' => Self::Wall,
            'D' => Self::Door,
            'M' => Self::Mountain,
            'W' => Self::WeaponSign,
            'I' => Self::InnSign,
            ' ' => Self::Blank,
            _ => return None,
        };
        Some(block)
    }

    /// Whether the hero can walk onto this block.
    pub const fn is_passable(self) -> bool {
        !matches!(
            self,
            Self::Water
                | Self::Wall
                | Self::Door
                | Self::Mountain
                | Self::LargeTile
                | Self::WeaponSign
                | Self::InnSign
                | Self::Blank
        )
    }

    /// Talking across these reaches the shopkeeper on the other side.
    pub const fn is_counter(self) -> bool {
        matches!(self, Self::LargeTile)
    }

    /// HP lost for stepping onto this block.
    pub const fn step_damage(self) -> u8 {
        match self {
            Self::Swamp => 2,
            Self::ForceField => 15,
            _ => 0,
        }
    }

    /// Encounter mask: a fight starts when `rnd & mask == 0`.
    pub const fn encounter_mask(self) -> Option<u8> {
        match self {
            Self::Grass => Some(0x1F),
            Self::Hill => Some(0x07),
            Self::Sand | Self::Trees | Self::Swamp | Self::Brick => Some(0x0F),
            _ => None,
        }
    }

    /// Entrances to another map when stepped on from the overworld.
    pub const fn is_entrance(self) -> bool {
        matches!(self, Self::Town | Self::Castle | Self::Cave)
    }

    pub const fn is_stairs(self) -> bool {
        matches!(self, Self::StairsUp | Self::StairsDown)
    }

    /// Pattern indices for the 2x2 footprint: top-left, top-right,
    /// bottom-left, bottom-right.
    pub const fn tiles(self) -> [u8; 4] {
        let base = 0x20 + (self as u8) * 4;
        [base, base + 1, base + 2, base + 3]
    }

    /// Background palette (0-3) selected in the attribute byte.
    pub const fn palette(self) -> u8 {
        match self {
            Self::Grass | Self::Hill | Self::Trees | Self::Swamp | Self::Mountain => 0,
            Self::Sand | Self::ForceField => 2,
            Self::Water | Self::Bridge => 3,
            _ => 1,
        }
    }
}
