pub mod catalog;
mod grid;
mod room;

pub use grid::{GridPos, Terrain, TileGrid, TileGridError, TileId, Vec2, MAX_ROOM_DIM};
pub use room::{
    EntityId, ExitLink, Facing, Lighting, ObjectId, ObjectState, RoomEntity, RoomModel,
    RoomObject, RoomSnapshot, DEFAULT_PLAYER_SPAWN, PLAYER_ENTITY_ID,
};
