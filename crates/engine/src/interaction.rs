use crate::world::{EntityId, GridPos, ObjectId, RoomEntity, RoomModel, RoomObject, Vec2};

pub type TileClickFn = Box<dyn FnMut(GridPos)>;
pub type EntityClickFn = Box<dyn FnMut(&EntityId, &RoomEntity, Option<Vec2>)>;
pub type ObjectClickFn = Box<dyn FnMut(&ObjectId, &RoomObject, Option<Vec2>)>;
pub type HoverFn = Box<dyn FnMut(Option<&HoverInfo>)>;
pub type MoveCompleteFn = Box<dyn FnMut(GridPos)>;

#[derive(Default)]
pub(crate) struct Callbacks {
    pub(crate) on_tile_click: Option<TileClickFn>,
    pub(crate) on_entity_click: Option<EntityClickFn>,
    pub(crate) on_object_click: Option<ObjectClickFn>,
    pub(crate) on_hover: Option<HoverFn>,
    pub(crate) on_player_move_complete: Option<MoveCompleteFn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverKind {
    Entity,
    Object,
}

/// Tooltip data for whatever is under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    pub kind: HoverKind,
    pub id: String,
    pub name: String,
    pub hostile: Option<bool>,
    pub hp: Option<u32>,
    pub max_hp: Option<u32>,
    pub exit_to: Option<String>,
    pub tile: GridPos,
    pub screen: Vec2,
}

/// What a press resolved to, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ClickTarget {
    Nothing,
    EditTile(GridPos),
    Entity(RoomEntity),
    Object(RoomObject),
    Tile { pos: GridPos, walkable: bool },
}

/// Result of [`crate::GridEngine::pointer_down`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    EditTile(GridPos),
    Entity(EntityId),
    Object(ObjectId),
    Tile { pos: GridPos, moving: bool },
}

pub fn screen_to_tile(world_px: Vec2, tile_size_px: f32) -> GridPos {
    GridPos::new(
        (world_px.x / tile_size_px).floor() as i32,
        (world_px.y / tile_size_px).floor() as i32,
    )
}

pub(crate) fn resolve_click(room: &RoomModel, tile: GridPos, edit_mode: bool) -> ClickTarget {
    if edit_mode {
        return if room.contains(tile) {
            ClickTarget::EditTile(tile)
        } else {
            ClickTarget::Nothing
        };
    }
    if let Some(entity) = room.entity_at(tile) {
        return ClickTarget::Entity(entity.clone());
    }
    if let Some(object) = room.interactable_object_at(tile) {
        return ClickTarget::Object(object.clone());
    }
    if room.contains(tile) {
        return ClickTarget::Tile {
            pos: tile,
            walkable: room.grid().is_walkable(tile),
        };
    }
    ClickTarget::Nothing
}

pub(crate) fn resolve_hover(room: &RoomModel, tile: GridPos, screen: Vec2) -> Option<HoverInfo> {
    if let Some(entity) = room.entity_at(tile) {
        return Some(HoverInfo {
            kind: HoverKind::Entity,
            id: entity.id.to_string(),
            name: entity.name.clone(),
            hostile: Some(entity.hostile),
            hp: entity.hp,
            max_hp: entity.max_hp,
            exit_to: None,
            tile,
            screen,
        });
    }
    room.object_at(tile).map(|object| HoverInfo {
        kind: HoverKind::Object,
        id: object.id.to_string(),
        name: object.display_name(),
        hostile: None,
        hp: None,
        max_hp: None,
        exit_to: object.exit.as_ref().map(|exit| exit.to_location.clone()),
        tile,
        screen,
    })
}
