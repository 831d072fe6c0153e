use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: GridPos) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    pub fn euclidean(self, other: GridPos) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Up, down, left, right.
    pub fn neighbors(self) -> [GridPos; 4] {
        [
            GridPos::new(self.x, self.y - 1),
            GridPos::new(self.x, self.y + 1),
            GridPos::new(self.x - 1, self.y),
            GridPos::new(self.x + 1, self.y),
        ]
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2 {
            x: self.x as f32,
            y: self.y as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn lerp(self, target: Vec2, factor: f32) -> Vec2 {
        Vec2 {
            x: self.x + (target.x - self.x) * factor,
            y: self.y + (target.y - self.y) * factor,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u16);

impl TileId {
    pub const VOID: TileId = TileId(0);
    pub const FLOOR_STONE: TileId = TileId(1);
    pub const FLOOR_WOOD: TileId = TileId(2);
    pub const FLOOR_DIRT: TileId = TileId(3);
    pub const FLOOR_GRASS: TileId = TileId(4);
    pub const FLOOR_SAND: TileId = TileId(5);
    pub const FLOOR_COBBLE: TileId = TileId(6);
    pub const WALL_STONE: TileId = TileId(10);
    pub const WALL_BRICK: TileId = TileId(11);
    pub const WALL_CAVE: TileId = TileId(12);
    pub const WALL_WOOD: TileId = TileId(13);
    pub const WATER_SHALLOW: TileId = TileId(20);
    pub const WATER_DEEP: TileId = TileId(21);
    pub const LAVA: TileId = TileId(22);
    pub const ICE: TileId = TileId(23);
    pub const DOOR_CLOSED: TileId = TileId(30);
    pub const DOOR_OPEN: TileId = TileId(31);
    pub const DOOR_LOCKED: TileId = TileId(32);
    pub const GATE_CLOSED: TileId = TileId(33);
    pub const GATE_OPEN: TileId = TileId(34);
    pub const STAIRS_DOWN: TileId = TileId(40);
    pub const STAIRS_UP: TileId = TileId(41);
    pub const PIT: TileId = TileId(42);
    pub const BRIDGE: TileId = TileId(43);
    pub const PATH: TileId = TileId(44);

    pub fn is_walkable(self) -> bool {
        matches!(self.0, 1..=6 | 31 | 34 | 40 | 41 | 43 | 44)
    }

    pub fn terrain(self) -> Terrain {
        match self.0 {
            0 => Terrain::Void,
            1..=6 => Terrain::Floor,
            10..=13 => Terrain::Wall,
            20 | 21 => Terrain::Water,
            22 => Terrain::Lava,
            23 => Terrain::Ice,
            30..=32 => Terrain::Door,
            33 | 34 => Terrain::Gate,
            40 | 41 => Terrain::Stairs,
            42 => Terrain::Pit,
            43 => Terrain::Bridge,
            44 => Terrain::Path,
            _ => Terrain::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Void,
    Floor,
    Wall,
    Water,
    Lava,
    Ice,
    Door,
    Gate,
    Stairs,
    Pit,
    Bridge,
    Path,
    Unknown,
}

/// Largest accepted room side, in tiles.
pub const MAX_ROOM_DIM: u32 = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileGridError {
    #[error("room {width}x{height} exceeds the {max}x{max} tile limit")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// Row-major terrain grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<TileId>,
}

impl TileGrid {
    /// Builds a grid from nested rows. Short or missing rows are padded with
    /// void and extra cells are ignored.
    pub fn from_rows(
        width: u32,
        height: u32,
        rows: &[Vec<TileId>],
    ) -> Result<Self, TileGridError> {
        if width > MAX_ROOM_DIM || height > MAX_ROOM_DIM {
            return Err(TileGridError::TooLarge {
                width,
                height,
                max: MAX_ROOM_DIM,
            });
        }
        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as usize {
            let row = rows.get(y);
            for x in 0..width as usize {
                let tile = row
                    .and_then(|cells| cells.get(x))
                    .copied()
                    .unwrap_or(TileId::VOID);
                tiles.push(tile);
            }
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<TileId>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height as usize];
        }
        self.tiles
            .chunks(self.width as usize)
            .map(<[TileId]>::to_vec)
            .collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.index_of(pos).is_some()
    }

    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as u32, pos.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn tile_at(&self, pos: GridPos) -> Option<TileId> {
        self.index_of(pos).map(|index| self.tiles[index])
    }

    /// Returns false and leaves the grid untouched when `pos` is outside it.
    pub fn set_tile(&mut self, pos: GridPos, tile: TileId) -> bool {
        match self.index_of(pos) {
            Some(index) => {
                self.tiles[index] = tile;
                true
            }
            None => false,
        }
    }

    pub fn is_walkable(&self, pos: GridPos) -> bool {
        self.tile_at(pos).is_some_and(TileId::is_walkable)
    }
}
