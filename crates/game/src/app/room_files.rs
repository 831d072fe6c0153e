use std::fs;
use std::path::Path;

use realm_engine::world::MAX_ROOM_DIM;
use realm_engine::{EngineConfig, GridPos, RoomSnapshot};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::ViewerError;

pub(crate) fn read_text(path: &Path) -> Result<String, ViewerError> {
    fs::read_to_string(path).map_err(|source| ViewerError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Decodes JSON and reports the failing field path, e.g. `entities[2].type`.
pub(crate) fn decode_json<T: DeserializeOwned>(path: &Path, raw: &str) -> Result<T, ViewerError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let at = match error.path().to_string() {
            at if at.is_empty() => ".".to_string(),
            at => at,
        };
        ViewerError::Decode {
            path: path.to_path_buf(),
            at,
            source: error.into_inner(),
        }
    })
}

pub(crate) fn load_room(path: &Path) -> Result<RoomSnapshot, ViewerError> {
    let raw = read_text(path)?;
    let snapshot: RoomSnapshot = decode_json(path, &raw)?;
    validate_room(path, &snapshot)?;
    Ok(snapshot)
}

pub(crate) fn load_engine_config(path: &Path) -> Result<EngineConfig, ViewerError> {
    let raw = read_text(path)?;
    decode_json(path, &raw)
}

/// Rejects rooms the engine could only render as empty. Ragged rows are
/// accepted since the grid pads them with void.
fn validate_room(path: &Path, snapshot: &RoomSnapshot) -> Result<(), ViewerError> {
    let invalid = |reason: String| ViewerError::InvalidRoom {
        path: path.to_path_buf(),
        reason,
    };
    if snapshot.width == 0 || snapshot.height == 0 {
        return Err(invalid(format!(
            "dimensions {}x{} must be non-zero",
            snapshot.width, snapshot.height
        )));
    }
    if snapshot.width > MAX_ROOM_DIM || snapshot.height > MAX_ROOM_DIM {
        return Err(invalid(format!(
            "dimensions {}x{} exceed {MAX_ROOM_DIM} tiles per side",
            snapshot.width, snapshot.height
        )));
    }
    if snapshot.tiles.len() != snapshot.height as usize
        || snapshot
            .tiles
            .iter()
            .any(|row| row.len() != snapshot.width as usize)
    {
        warn!(
            path = %path.display(),
            width = snapshot.width,
            height = snapshot.height,
            rows = snapshot.tiles.len(),
            "room_tiles_ragged"
        );
    }
    if let Some(spawn) = snapshot.player_spawn {
        if !in_bounds(snapshot, spawn) {
            return Err(invalid(format!(
                "player spawn ({}, {}) is outside the room",
                spawn.x, spawn.y
            )));
        }
    }
    Ok(())
}

fn in_bounds(snapshot: &RoomSnapshot, pos: GridPos) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < snapshot.width && (pos.y as u32) < snapshot.height
}
