use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::grid::{GridPos, TileGrid, TileGridError, TileId};

pub const PLAYER_ENTITY_ID: &str = "player";
pub const DEFAULT_PLAYER_SPAWN: GridPos = GridPos::new(1, 1);
const DEFAULT_AMBIENCE: &str = "dungeon";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn player() -> Self {
        Self(PLAYER_ENTITY_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_player(&self) -> bool {
        self.0 == PLAYER_ENTITY_ID
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for ObjectId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lighting {
    #[default]
    Bright,
    Dim,
    Dark,
}

impl Lighting {
    pub fn ambient(self) -> f32 {
        match self {
            Lighting::Bright => 0.7,
            Lighting::Dim => 0.25,
            Lighting::Dark => 0.05,
        }
    }

    /// Grid steps from the player beyond which no tile is evaluated.
    pub fn view_radius(self) -> u32 {
        match self {
            Lighting::Bright => 15,
            Lighting::Dim => 10,
            Lighting::Dark => 6,
        }
    }

    pub fn player_light_radius(self) -> f32 {
        match self {
            Lighting::Bright => 1.0,
            Lighting::Dim => 2.0,
            Lighting::Dark => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn from_step(from: GridPos, to: GridPos) -> Option<Facing> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx == 0 && dy == 0 {
            return None;
        }
        Some(if dx.abs() >= dy.abs() {
            if dx > 0 {
                Facing::Right
            } else {
                Facing::Left
            }
        } else if dy > 0 {
            Facing::Down
        } else {
            Facing::Up
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectState {
    Open,
    Closed,
    Locked,
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomEntity {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub type_id: u16,
    #[serde(flatten)]
    pub pos: GridPos,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<Facing>,
}

impl RoomEntity {
    pub fn new(id: impl Into<EntityId>, type_id: u16, pos: GridPos) -> Self {
        Self {
            id: id.into(),
            type_id,
            pos,
            name: String::new(),
            hostile: false,
            hp: None,
            max_hp: None,
            ac: None,
            color: None,
            facing: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitLink {
    pub to_location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomObject {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub type_id: u16,
    #[serde(flatten)]
    pub pos: GridPos,
    #[serde(default)]
    pub interactable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ObjectState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<ExitLink>,
}

impl RoomObject {
    pub fn new(id: impl Into<ObjectId>, type_id: u16, pos: GridPos) -> Self {
        Self {
            id: id.into(),
            type_id,
            pos,
            interactable: false,
            state: None,
            label: None,
            contents: None,
            exit: None,
        }
    }

    /// Label when present, otherwise the id with underscores as spaces.
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.id.as_str().replace('_', " "),
        }
    }
}

fn default_ambience() -> String {
    DEFAULT_AMBIENCE.to_string()
}

/// Externally persisted room shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Vec<TileId>>,
    #[serde(default)]
    pub entities: Vec<RoomEntity>,
    #[serde(default)]
    pub objects: Vec<RoomObject>,
    #[serde(default)]
    pub lighting: Lighting,
    #[serde(default = "default_ambience")]
    pub ambience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_spawn: Option<GridPos>,
}

impl RoomSnapshot {
    pub fn filled(width: u32, height: u32, tile: TileId) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![tile; width as usize]; height as usize],
            entities: Vec::new(),
            objects: Vec::new(),
            lighting: Lighting::default(),
            ambience: default_ambience(),
            player_spawn: None,
        }
    }
}

/// The loaded room. Entities and objects keep their insertion order so hit
/// testing and drawing stay deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomModel {
    grid: TileGrid,
    entities: Vec<RoomEntity>,
    objects: Vec<RoomObject>,
    lighting: Lighting,
    ambience: String,
    player_spawn: GridPos,
}

impl RoomModel {
    pub fn from_snapshot(snapshot: RoomSnapshot) -> Result<Self, TileGridError> {
        let grid = TileGrid::from_rows(snapshot.width, snapshot.height, &snapshot.tiles)?;
        let mut entities: Vec<RoomEntity> = Vec::with_capacity(snapshot.entities.len());
        for entity in snapshot.entities {
            if entities.iter().all(|existing| existing.id != entity.id) {
                entities.push(entity);
            }
        }
        let mut objects: Vec<RoomObject> = Vec::with_capacity(snapshot.objects.len());
        for object in snapshot.objects {
            if objects.iter().all(|existing| existing.id != object.id) {
                objects.push(object);
            }
        }
        Ok(Self {
            grid,
            entities,
            objects,
            lighting: snapshot.lighting,
            ambience: snapshot.ambience,
            player_spawn: snapshot.player_spawn.unwrap_or(DEFAULT_PLAYER_SPAWN),
        })
    }

    pub fn to_snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            tiles: self.grid.to_rows(),
            entities: self.entities.clone(),
            objects: self.objects.clone(),
            lighting: self.lighting,
            ambience: self.ambience.clone(),
            player_spawn: Some(self.player_spawn),
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn lighting(&self) -> Lighting {
        self.lighting
    }

    pub fn ambience(&self) -> &str {
        &self.ambience
    }

    pub fn player_spawn(&self) -> GridPos {
        self.player_spawn
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.grid.contains(pos)
    }

    pub fn tile_at(&self, pos: GridPos) -> Option<TileId> {
        self.grid.tile_at(pos)
    }

    pub(crate) fn set_tile(&mut self, pos: GridPos, tile: TileId) -> bool {
        self.grid.set_tile(pos, tile)
    }

    pub fn entities(&self) -> &[RoomEntity] {
        &self.entities
    }

    pub fn objects(&self) -> &[RoomObject] {
        &self.objects
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity(&self, id: &str) -> Option<&RoomEntity> {
        self.entities.iter().find(|entity| entity.id.as_str() == id)
    }

    pub(crate) fn entity_mut(&mut self, id: &str) -> Option<&mut RoomEntity> {
        self.entities
            .iter_mut()
            .find(|entity| entity.id.as_str() == id)
    }

    pub fn object(&self, id: &str) -> Option<&RoomObject> {
        self.objects.iter().find(|object| object.id.as_str() == id)
    }

    pub(crate) fn object_mut(&mut self, id: &str) -> Option<&mut RoomObject> {
        self.objects
            .iter_mut()
            .find(|object| object.id.as_str() == id)
    }

    /// Returns false when an entity with the same id already exists.
    pub(crate) fn insert_entity(&mut self, entity: RoomEntity) -> bool {
        if self.entity(entity.id.as_str()).is_some() {
            return false;
        }
        self.entities.push(entity);
        true
    }

    pub(crate) fn upsert_entity(&mut self, entity: RoomEntity) {
        match self.entity_mut(entity.id.as_str()) {
            Some(existing) => *existing = entity,
            None => self.entities.push(entity),
        }
    }

    pub(crate) fn remove_entity(&mut self, id: &str) -> Option<RoomEntity> {
        let index = self
            .entities
            .iter()
            .position(|entity| entity.id.as_str() == id)?;
        Some(self.entities.remove(index))
    }

    pub fn entity_at(&self, pos: GridPos) -> Option<&RoomEntity> {
        self.entities.iter().find(|entity| entity.pos == pos)
    }

    pub fn interactable_object_at(&self, pos: GridPos) -> Option<&RoomObject> {
        self.objects
            .iter()
            .find(|object| object.pos == pos && object.interactable)
    }

    pub fn object_at(&self, pos: GridPos) -> Option<&RoomObject> {
        self.objects.iter().find(|object| object.pos == pos)
    }
}
