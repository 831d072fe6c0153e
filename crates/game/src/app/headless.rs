use std::path::Path;

use image::{ImageFormat, RgbaImage};
use realm_engine::{render_frame, EventSource, GridEngine, WorldEvent};
use tracing::info;

use super::ViewerError;

pub(crate) const HEADLESS_TICK_SECONDS: f32 = 1.0 / 60.0;

/// Runs `ticks` fixed steps without a window, feeding due events first on
/// every step.
pub(crate) fn simulate(engine: &mut GridEngine, events: &mut dyn EventSource, ticks: u64) {
    let mut pending: Vec<WorldEvent> = Vec::new();
    for _ in 0..ticks {
        pending.clear();
        events.poll(engine.tick_count(), &mut pending);
        for event in pending.drain(..) {
            engine.process_event(event);
        }
        engine.tick(HEADLESS_TICK_SECONDS);
    }
    let counters = engine.counters();
    info!(
        ticks = counters.ticks,
        events_applied = counters.events_applied,
        events_dropped = counters.events_dropped,
        visibility_passes = counters.visibility_passes,
        "headless_run_finished"
    );
}

pub(crate) fn write_png(
    engine: &GridEngine,
    width: u32,
    height: u32,
    path: &Path,
) -> Result<(), ViewerError> {
    let frame = render_frame(engine, width, height);
    let image =
        RgbaImage::from_raw(width, height, frame).ok_or(ViewerError::FrameSize { width, height })?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ViewerError::EncodePng {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        path = %path.display(),
        width,
        height,
        tick = engine.tick_count(),
        "snapshot_written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use realm_engine::{EngineConfig, GridPos, RoomSnapshot, TileId};

    use super::*;
    use crate::app::script::ScriptedEvents;

    fn engine() -> GridEngine {
        let mut engine = GridEngine::new(EngineConfig {
            viewport_width: 96,
            viewport_height: 64,
            ..EngineConfig::default()
        });
        engine.load_room(RoomSnapshot::filled(6, 5, TileId::FLOOR_GRASS));
        engine
    }

    #[test]
    fn simulate_applies_scripted_events_on_their_tick() {
        let mut engine = engine();
        let mut script = ScriptedEvents::parse(
            r#"{"tick": 2, "event": {"type": "update_tile", "payload": {"x": 4, "y": 3, "newTile": 21}}}
{"tick": 5, "event": {"type": "spawn_entity", "payload": {"id": "wolf", "type": 135, "x": 4, "y": 1}}}"#,
        );

        simulate(&mut engine, &mut script, 3);
        let room = engine.current_room().expect("room");
        assert_eq!(room.tile_at(GridPos::new(4, 3)), Some(TileId::WATER_DEEP));
        assert!(engine.entity("wolf").is_none());

        simulate(&mut engine, &mut script, 3);
        assert!(engine.entity("wolf").is_some());
        assert_eq!(engine.tick_count(), 6);
        assert_eq!(engine.counters().events_applied, 2);
    }

    #[test]
    fn png_round_trips_dimensions() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("frame.png");
        write_png(&engine(), 96, 64, &path).expect("write png");

        let decoded = image::open(&path).expect("decode png").to_rgba8();
        assert_eq!(decoded.dimensions(), (96, 64));
        assert_eq!(decoded.as_raw(), &render_frame(&engine(), 96, 64));
    }

    #[test]
    fn unwritable_path_is_an_encode_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("frame.png");
        let err = write_png(&engine(), 8, 8, &path).expect_err("no parent dir");
        assert!(matches!(err, ViewerError::EncodePng { .. }));
    }

    #[test]
    fn bundled_crypt_script_plays_out() {
        let assets = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        let room = crate::app::room_files::load_room(&assets.join("rooms/crypt.json"))
            .expect("crypt room");
        let mut script = ScriptedEvents::load(&assets.join("scripts/crypt_ambush.jsonl"))
            .expect("crypt script");
        assert_eq!(script.dropped_lines(), 0);

        let mut engine = GridEngine::new(EngineConfig {
            idle_animation: false,
            ..EngineConfig::default()
        });
        engine.load_room(room);
        simulate(&mut engine, &mut script, 240);

        assert_eq!(script.remaining(), 0);
        assert!(engine.entity("skeleton_1").is_none());
        assert!(engine.entity("skeleton_2").is_some());
        assert_eq!(engine.entity("player").and_then(|player| player.hp), Some(14));
        let room = engine.current_room().expect("room");
        assert_eq!(room.tile_at(GridPos::new(7, 3)), Some(TileId::DOOR_OPEN));
        let chest = room.object("crypt_chest").expect("chest");
        assert_eq!(chest.type_id, realm_engine::world::catalog::object_types::CHEST_OPEN);

        let counters = engine.counters();
        assert_eq!(counters.events_applied, 10);
        assert_eq!(counters.events_dropped, 1);
        assert_eq!(counters.visibility_passes, 1);
    }
}
