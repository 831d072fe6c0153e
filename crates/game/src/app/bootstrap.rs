use std::path::PathBuf;

use clap::Parser;
use realm_engine::world::catalog::{entity_types, object_types};
use realm_engine::{
    EngineConfig, GridEngine, GridPos, HoverKind, Lighting, LoopConfig, RoomEntity, RoomObject,
    RoomSnapshot, TileId,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::room_files::{load_engine_config, load_room};
use super::script::ScriptedEvents;
use super::ViewerError;

#[derive(Debug, Parser)]
#[command(version, about = "Tile-grid world viewer: loads a room, replays scripted events")]
pub(crate) struct Cli {
    /// Room snapshot JSON. A small built-in room is used when omitted.
    #[arg(long, value_name = "PATH")]
    pub(crate) room: Option<PathBuf>,

    /// JSON-lines event script, one `{"tick": n, "event": {..}}` per line.
    #[arg(long, value_name = "PATH")]
    pub(crate) script: Option<PathBuf>,

    /// Engine config JSON; command-line flags override its fields.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Report raw tile clicks only.
    #[arg(long)]
    pub(crate) edit: bool,

    /// Render headless to this PNG instead of opening a window.
    #[arg(long, value_name = "PATH")]
    pub(crate) snapshot: Option<PathBuf>,

    /// Ticks to simulate before a headless snapshot. Defaults to just past
    /// the last scripted event.
    #[arg(long)]
    pub(crate) ticks: Option<u64>,

    #[arg(long)]
    pub(crate) tile_size: Option<u32>,

    #[arg(long)]
    pub(crate) zoom: Option<f32>,

    #[arg(long, default_value_t = 1280)]
    pub(crate) width: u32,

    #[arg(long, default_value_t = 720)]
    pub(crate) height: u32,

    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Disable blinking, bobbing and glow pulses.
    #[arg(long)]
    pub(crate) no_idle: bool,

    /// Show the F3 stats overlay from the start.
    #[arg(long)]
    pub(crate) overlay: bool,
}

pub(crate) enum RunMode {
    Window(LoopConfig),
    Snapshot { path: PathBuf, ticks: u64 },
}

pub(crate) struct AppWiring {
    pub(crate) mode: RunMode,
    pub(crate) engine: GridEngine,
    pub(crate) events: ScriptedEvents,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

pub(crate) fn build_app(cli: Cli) -> Result<AppWiring, ViewerError> {
    info!(version = env!("CARGO_PKG_VERSION"), "realm_viewer_startup");

    let config = engine_config(&cli)?;
    let room = match &cli.room {
        Some(path) => load_room(path)?,
        None => demo_room(),
    };
    let events = match &cli.script {
        Some(path) => ScriptedEvents::load(path)?,
        None => ScriptedEvents::default(),
    };
    let room_source = cli
        .room
        .as_ref()
        .map_or_else(|| "<built-in>".to_string(), |path| path.display().to_string());
    info!(
        room = room_source.as_str(),
        width = room.width,
        height = room.height,
        scripted_events = events.len(),
        dropped_lines = events.dropped_lines(),
        edit_mode = config.edit_mode,
        "viewer_inputs_loaded"
    );

    let mut engine = GridEngine::new(config);
    engine.load_room(room);
    register_logging_callbacks(&mut engine);

    let mode = match cli.snapshot {
        Some(path) => RunMode::Snapshot {
            path,
            ticks: cli
                .ticks
                .unwrap_or_else(|| events.last_tick().map_or(1, |tick| tick + 1)),
        },
        None => RunMode::Window(LoopConfig {
            window_width: cli.width,
            window_height: cli.height,
            show_overlay: cli.overlay,
            ..LoopConfig::default()
        }),
    };

    Ok(AppWiring {
        mode,
        engine,
        events,
        width: cli.width,
        height: cli.height,
    })
}

fn engine_config(cli: &Cli) -> Result<EngineConfig, ViewerError> {
    let mut config = match &cli.config {
        Some(path) => load_engine_config(path)?,
        None => EngineConfig::default(),
    };
    config.viewport_width = cli.width;
    config.viewport_height = cli.height;
    config.edit_mode |= cli.edit;
    if cli.no_idle {
        config.idle_animation = false;
    }
    if let Some(tile_size) = cli.tile_size {
        config.tile_size = tile_size;
    }
    if let Some(zoom) = cli.zoom {
        config.zoom = zoom;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    Ok(config)
}

/// The host side of the callback contract: every pointer outcome is logged.
fn register_logging_callbacks(engine: &mut GridEngine) {
    engine.on_tile_click(|tile| info!(x = tile.x, y = tile.y, "tile_clicked"));
    engine.on_entity_click(|id, entity, screen| {
        info!(
            entity_id = %id,
            name = entity.name.as_str(),
            hostile = entity.hostile,
            hp = ?entity.hp,
            screen = ?screen,
            "entity_clicked"
        );
    });
    engine.on_object_click(|id, object, _screen| {
        info!(
            object_id = %id,
            type_id = object.type_id,
            state = ?object.state,
            "object_clicked"
        );
    });
    engine.on_hover(|hover| match hover {
        Some(info) => debug!(
            kind = match info.kind {
                HoverKind::Entity => "entity",
                HoverKind::Object => "object",
            },
            id = info.id.as_str(),
            name = info.name.as_str(),
            hp = ?info.hp,
            "hover"
        ),
        None => debug!("hover_cleared"),
    });
    engine.on_player_move_complete(|tile| info!(x = tile.x, y = tile.y, "player_arrived"));
}

/// A walled 12x9 cellar with a few props, used when no room file is given.
pub(crate) fn demo_room() -> RoomSnapshot {
    let (width, height) = (12u32, 9u32);
    let mut snapshot = RoomSnapshot::filled(width, height, TileId::FLOOR_STONE);
    for (y, row) in snapshot.tiles.iter_mut().enumerate() {
        for (x, tile) in row.iter_mut().enumerate() {
            let edge = x == 0 || y == 0 || x + 1 == width as usize || y + 1 == height as usize;
            if edge {
                *tile = TileId::WALL_STONE;
            }
        }
    }
    snapshot.tiles[4][11] = TileId::DOOR_CLOSED;
    snapshot.tiles[6][4] = TileId::WATER_SHALLOW;
    snapshot.tiles[6][5] = TileId::WATER_SHALLOW;
    snapshot.lighting = Lighting::Dim;
    snapshot.ambience = "dungeon".to_string();
    snapshot.player_spawn = Some(GridPos::new(2, 2));

    let mut guard = RoomEntity::new(
        "skeleton_1",
        entity_types::SKELETON_WARRIOR,
        GridPos::new(8, 5),
    );
    guard.name = "Skeleton".to_string();
    guard.hostile = true;
    guard.hp = Some(12);
    guard.max_hp = Some(12);
    snapshot.entities.push(guard);

    snapshot.objects.push(RoomObject::new(
        "torch_1",
        object_types::TORCH_WALL,
        GridPos::new(6, 1),
    ));
    let mut chest = RoomObject::new("old_chest", object_types::CHEST_CLOSED, GridPos::new(9, 2));
    chest.interactable = true;
    snapshot.objects.push(chest);
    snapshot
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn cli_defaults_open_a_window() {
        let cli = Cli::try_parse_from(["realm-viewer"]).expect("parse");
        let wiring = build_app(cli).expect("wiring");
        assert!(matches!(wiring.mode, RunMode::Window(_)));
        assert_eq!((wiring.width, wiring.height), (1280, 720));
        assert_eq!(wiring.engine.player_position(), GridPos::new(2, 2));
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp");
        file.write_all(br#"{"tileSize": 16, "seed": 7, "idleAnimation": true}"#)
            .expect("write");
        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "realm-viewer",
            "--config",
            path.as_str(),
            "--tile-size",
            "48",
            "--no-idle",
            "--edit",
            "--width",
            "640",
        ])
        .expect("parse");

        let config = engine_config(&cli).expect("config");
        assert_eq!(config.tile_size, 48);
        assert_eq!(config.seed, 7);
        assert!(!config.idle_animation);
        assert!(config.edit_mode);
        assert_eq!(config.viewport_width, 640);
    }

    #[test]
    fn snapshot_ticks_default_past_last_scripted_event() {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = dir.path().join("s.jsonl");
        std::fs::write(
            &script,
            r#"{"tick": 40, "event": {"type": "camera_effect", "payload": {"effectType": "shake"}}}"#,
        )
        .expect("write script");
        let script = script.to_string_lossy().to_string();
        let out = dir.path().join("out.png").to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "realm-viewer",
            "--script",
            script.as_str(),
            "--snapshot",
            out.as_str(),
        ])
        .expect("parse");

        let wiring = build_app(cli).expect("wiring");
        match wiring.mode {
            RunMode::Snapshot { ticks, .. } => assert_eq!(ticks, 41),
            RunMode::Window(_) => panic!("expected snapshot mode"),
        }
    }

    #[test]
    fn demo_room_is_walled_and_has_a_hostile() {
        let room = demo_room();
        assert_eq!(room.tiles[0][0], TileId::WALL_STONE);
        assert_eq!(room.tiles[4][11], TileId::DOOR_CLOSED);
        assert!(room.entities.iter().any(|entity| entity.hostile));
    }
}
