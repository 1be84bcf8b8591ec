//! Block grids and how they reach video memory.
//!
//! A map is a grid of [`BlockType`]s. Each block occupies a 2x2 tile
//! footprint in one of two side-by-side nametables plus one quadrant of an
//! attribute byte. Video memory is never read back: attribute bytes are
//! rebuilt from a session-owned shadow copy before being queued.

use tracing::debug;

use crate::{
    GameSession,
    host::{Buttons, Host},
    memory::ppu::{
        ATTRIBUTE_BYTES, ATTRIBUTE_OFFSET, NAMETABLE_0, NAMETABLE_1, TILE_COLUMNS, TILE_ROWS,
    },
    player::flags::QuestFlags,
    ppu::buffer::PpuCommand,
};

pub mod block;
pub mod exits;
pub mod history;
pub mod layouts;
pub mod treasure;

pub use block::BlockType;
pub use exits::MapExit;
pub use history::{History, HistoryPolicy, MapPoint};
pub use layouts::MapId;

/// Blocks drawn left and right of the hero.
const VIEW_HALF_WIDTH: i16 = 8;
/// Blocks drawn above the hero; one more is drawn below.
const VIEW_HALF_HEIGHT: i16 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "snapshot-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const fn delta(self) -> (i16, i16) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// First direction held on the pad, checked up, down, left, right.
    pub fn from_buttons(buttons: Buttons) -> Option<Self> {
        if buttons.contains(Buttons::UP) {
            Some(Self::Up)
        } else if buttons.contains(Buttons::DOWN) {
            Some(Self::Down)
        } else if buttons.contains(Buttons::LEFT) {
            Some(Self::Left)
        } else if buttons.contains(Buttons::RIGHT) {
            Some(Self::Right)
        } else {
            None
        }
    }
}

/// Tile column and row of the top-left tile of block `(x, y)`.
#[inline]
pub fn tile_origin(x: i16, y: i16) -> (u16, u16) {
    let col = (x * 2).rem_euclid(TILE_COLUMNS as i16) as u16;
    let row = (y * 2).rem_euclid(TILE_ROWS as i16) as u16;
    (col, row)
}

#[inline]
fn nametable_base(col: u16) -> u16 {
    if col < 32 { NAMETABLE_0 } else { NAMETABLE_1 }
}

/// Nametable address of tile `(col, row)`.
#[inline]
pub fn nametable_addr(col: u16, row: u16) -> u16 {
    nametable_base(col) + row * 32 + col % 32
}

/// Attribute byte address covering tile `(col, row)`.
#[inline]
pub fn attribute_addr(col: u16, row: u16) -> u16 {
    nametable_base(col) + ATTRIBUTE_OFFSET + (row / 4) * 8 + (col % 32) / 4
}

/// Bit position of the 2-bit palette field for tile `(col, row)`.
#[inline]
pub fn attribute_shift(col: u16, row: u16) -> u8 {
    (((row % 4) / 2) * 4 + ((col % 4) / 2) * 2) as u8
}

/// Shadow of both attribute tables.
#[derive(Debug, Clone)]
pub struct AttributeShadow {
    bytes: [u8; ATTRIBUTE_BYTES * 2],
}

impl Default for AttributeShadow {
    fn default() -> Self {
        Self {
            bytes: [0; ATTRIBUTE_BYTES * 2],
        }
    }
}

impl AttributeShadow {
    fn index(col: u16, row: u16) -> usize {
        let table = usize::from(col >= 32);
        table * ATTRIBUTE_BYTES + (row as usize / 4) * 8 + (col as usize % 32) / 4
    }

    pub fn get(&self, col: u16, row: u16) -> u8 {
        self.bytes[Self::index(col, row)]
    }

    /// Sets the palette of the quadrant holding `(col, row)` and returns the
    /// whole updated byte.
    pub fn update(&mut self, col: u16, row: u16, palette: u8) -> u8 {
        let shift = attribute_shift(col, row);
        let byte = &mut self.bytes[Self::index(col, row)];
        *byte = (*byte & !(0b11 << shift)) | ((palette & 0b11) << shift);
        *byte
    }
}

/// Mutable copy of a map's grid.
#[derive(Debug, Clone)]
pub struct MapState {
    id: MapId,
    width: u8,
    height: u8,
    blocks: Vec<BlockType>,
}

impl MapState {
    pub fn load(id: MapId) -> Self {
        let layout = id.layout();
        let blocks = layout
            .rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|c| BlockType::from_char(c).unwrap_or(BlockType::Blank))
            .collect();
        Self {
            id,
            width: layout.width(),
            height: layout.height(),
            blocks,
        }
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn contains(&self, x: i16, y: i16) -> bool {
        (0..self.width as i16).contains(&x) && (0..self.height as i16).contains(&y)
    }

    /// Block at `(x, y)`; positions outside the grid report the boundary block.
    pub fn block_at(&self, x: i16, y: i16) -> BlockType {
        if self.contains(x, y) {
            self.blocks[y as usize * self.width as usize + x as usize]
        } else {
            self.id.layout().boundary
        }
    }

    /// Replaces a block. Returns false for positions outside the grid.
    pub fn set_block(&mut self, x: u8, y: u8, block: BlockType) -> bool {
        if !self.contains(x as i16, y as i16) {
            return false;
        }
        self.blocks[y as usize * self.width as usize + x as usize] = block;
        true
    }
}

/// Where the hero is and what the current map looks like.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) map: MapState,
    pub(crate) x: u8,
    pub(crate) y: u8,
    pub(crate) facing: Direction,
    pub(crate) light_radius: u8,
}

impl World {
    pub fn new(id: MapId, x: u8, y: u8, facing: Direction) -> Self {
        Self {
            map: MapState::load(id),
            x,
            y,
            facing,
            light_radius: 0,
        }
    }

    pub fn map(&self) -> &MapState {
        &self.map
    }

    pub fn position(&self) -> (u8, u8) {
        (self.x, self.y)
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn light_radius(&self) -> u8 {
        self.light_radius
    }

    /// The block `steps` blocks ahead of the hero.
    pub fn ahead(&self, steps: i16) -> (i16, i16) {
        let (dx, dy) = self.facing.delta();
        (self.x as i16 + dx * steps, self.y as i16 + dy * steps)
    }
}

impl<H: Host> GameSession<H> {
    /// Block at `(x, y)` on the current map.
    pub fn block_at(&self, x: i16, y: i16) -> BlockType {
        self.world.map.block_at(x, y)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn map_id(&self) -> MapId {
        self.world.map.id()
    }

    pub fn position(&self) -> (u8, u8) {
        self.world.position()
    }

    /// Replaces a block and queues its 4 tiles and attribute byte as one batch.
    pub fn modify_block(&mut self, x: u8, y: u8, replacement: BlockType) -> bool {
        if !self.world.map.set_block(x, y, replacement) {
            return false;
        }
        debug!(map = %self.map_id(), x, y, ?replacement, "block modified");
        self.draw_block(x as i16, y as i16, replacement);
        true
    }

    pub(crate) fn draw_block(&mut self, x: i16, y: i16, block: BlockType) {
        let (col, row) = tile_origin(x, y);
        let [tl, tr, bl, br] = block.tiles();
        let attribute = self.attributes.update(col, row, block.palette());
        let commands = [
            PpuCommand::new(nametable_addr(col, row), tl),
            PpuCommand::new(nametable_addr(col + 1, row), tr),
            PpuCommand::new(nametable_addr(col, row + 1), bl),
            PpuCommand::new(nametable_addr(col + 1, row + 1), br),
            PpuCommand::new(attribute_addr(col, row), attribute),
        ];
        self.queue_batch(&commands);
    }

    /// Block as the hero sees it, accounting for darkness.
    fn visible_block(&self, x: i16, y: i16) -> BlockType {
        if self.world.map.id().layout().dark {
            let radius = self.world.light_radius as i16;
            let (px, py) = (self.world.x as i16, self.world.y as i16);
            if (x - px).abs() > radius || (y - py).abs() > radius {
                return BlockType::Blank;
            }
        }
        self.block_at(x, y)
    }

    /// Redraws the whole visible area around the hero.
    pub(crate) fn draw_view(&mut self) {
        let (px, py) = (self.world.x as i16, self.world.y as i16);
        if self.world.map.id().layout().dark {
            // One ring past the light radius so old light is erased.
            let reach = self.world.light_radius as i16 + 1;
            for y in py - reach..=py + reach {
                for x in px - reach..=px + reach {
                    let block = self.visible_block(x, y);
                    self.draw_block(x, y, block);
                }
            }
            return;
        }
        for y in py - VIEW_HALF_HEIGHT..=py + VIEW_HALF_HEIGHT + 1 {
            for x in px - VIEW_HALF_WIDTH..px + VIEW_HALF_WIDTH {
                let block = self.block_at(x, y);
                self.draw_block(x, y, block);
            }
        }
    }

    /// Draws the row or column that scrolled into view after a step.
    pub(crate) fn draw_exposed_edge(&mut self, moved: Direction) {
        if self.world.map.id().layout().dark {
            self.draw_view();
            return;
        }
        let (px, py) = (self.world.x as i16, self.world.y as i16);
        match moved {
            Direction::Up | Direction::Down => {
                let y = if moved == Direction::Up {
                    py - VIEW_HALF_HEIGHT
                } else {
                    py + VIEW_HALF_HEIGHT + 1
                };
                for x in px - VIEW_HALF_WIDTH..px + VIEW_HALF_WIDTH {
                    let block = self.block_at(x, y);
                    self.draw_block(x, y, block);
                }
            }
            Direction::Left | Direction::Right => {
                let x = if moved == Direction::Left {
                    px - VIEW_HALF_WIDTH
                } else {
                    px + VIEW_HALF_WIDTH - 1
                };
                for y in py - VIEW_HALF_HEIGHT..=py + VIEW_HALF_HEIGHT + 1 {
                    let block = self.block_at(x, y);
                    self.draw_block(x, y, block);
                }
            }
        }
    }

    /// Centers the background on the hero.
    pub(crate) fn scroll_to_player(&mut self) {
        let x = (self.world.x as u16 * 16).wrapping_sub(VIEW_HALF_WIDTH as u16 * 16) as u8;
        let y = ((self.world.y as u16 * 16 + 240 - VIEW_HALF_HEIGHT as u16 * 16) % 240) as u8;
        self.frame.set_scroll(x, y);
    }

    /// Writes the hero's four sprite entries for the current facing.
    pub(crate) fn place_player_sprite(&mut self) {
        let base = (self.world.facing as u8) * 4;
        let entries = [
            [0x6F, base, 0x00, 0x78],
            [0x6F, base + 1, 0x00, 0x80],
            [0x77, base + 2, 0x00, 0x78],
            [0x77, base + 3, 0x00, 0x80],
        ];
        for (index, entry) in entries.into_iter().enumerate() {
            self.frame.set_sprite(index, entry);
        }
    }

    /// Switches to `id` with the hero at `(x, y)`.
    ///
    /// Fades out, re-applies the door and treasure history, draws the view
    /// around the hero, starts the map's music and fades back in.
    pub fn load_map(&mut self, id: MapId, x: u8, y: u8, facing: Direction) {
        debug!(map = %id, x, y, "loading map");
        self.fade_out();
        let mut world = World::new(id, x, y, facing);
        for door in self.history.doors_on(id) {
            world.map.set_block(door.x, door.y, BlockType::Brick);
        }
        for chest in self.history.treasure_on(id) {
            world.map.set_block(chest.x, chest.y, BlockType::Brick);
        }
        if id == MapId::Overworld && self.player.quest().contains(QuestFlags::RAINBOW_BRIDGE) {
            let (x, y) = layouts::BRIDGE_SITE;
            world.map.set_block(x, y, BlockType::Bridge);
        }
        self.world = world;
        self.palette = id.palette();
        self.draw_view();
        self.place_player_sprite();
        self.place_npc_sprites();
        self.scroll_to_player();
        self.host.play_music(id.layout().music);
        self.fade_in();
    }

    /// Exit the hero would take by stepping `direction`, if any.
    ///
    /// Only walking off the map or onto an entrance block can trigger an
    /// exit here; stairs need the Stairs command.
    pub fn check_map_exit(&self, direction: Direction) -> Option<MapExit> {
        let (dx, dy) = direction.delta();
        let (tx, ty) = (self.world.x as i16 + dx, self.world.y as i16 + dy);
        let off_edge = !self.world.map.contains(tx, ty);
        if !off_edge && !self.block_at(tx, ty).is_entrance() {
            return None;
        }
        exits::find_exit(self.map_id(), tx, ty, off_edge).copied()
    }

    /// Exit reached by taking the stairs the hero stands on.
    pub fn stairs_exit(&self) -> Option<MapExit> {
        let (x, y) = (self.world.x as i16, self.world.y as i16);
        if !self.block_at(x, y).is_stairs() {
            return None;
        }
        exits::find_exit(self.map_id(), x, y, false).copied()
    }
}
