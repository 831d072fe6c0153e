//! Tile-grid world engine: an authoritative room state store driven by a
//! closed event protocol, with pathfinding, movement interpolation, lighting
//! and fog of war, pointer interaction and a deterministic software renderer.
//!
//! [`GridEngine`] is headless. [`app::run_app`] wraps it in a window with a
//! fixed-tick loop; [`render_frame`] paints a frame without one.

pub mod app;
mod camera;
mod config;
mod effects;
mod events;
mod grid_engine;
mod idle;
mod interaction;
mod movement;
mod nav;
pub mod render;
mod visibility;
pub mod world;

pub use app::{
    run_app, run_app_with_metrics, AppError, InputAction, LoopConfig, LoopMetricsSnapshot,
    MetricsHandle, SLOW_FRAME_ENV_VAR,
};
pub use camera::{Camera, Viewport, ZOOM_DEFAULT, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
pub use config::{EngineConfig, DEFAULT_TILE_SIZE};
pub use effects::{DepartingEntity, EffectState, EntityVisual, FloatingText, ScreenFlash};
pub use events::{
    AttackKind, CameraEffect, CameraEffectKind, CombatEffect, EventDecodeError, EventSource,
    Intensity, InteractObject, InteractResult, MoveEntity, ObjectAction, RemoveAnimation,
    RemoveEntity, SpawnAnimation, SpawnEntity, TileAnimation, UpdateTile, WorldEvent,
};
pub use grid_engine::{EngineCounters, GridEngine};
pub use idle::IdleAnimator;
pub use interaction::{ClickOutcome, HoverInfo, HoverKind};
pub use movement::{SpeedTier, LOCAL_MOVE_SPEED};
pub use nav::find_path;
pub use render::{paint_world, render_frame};
pub use visibility::{
    collect_light_sources, tile_light_level, FogCell, LightSource, VisibilityState,
};
pub use world::{
    EntityId, Facing, GridPos, Lighting, ObjectId, ObjectState, RoomEntity, RoomModel, RoomObject,
    RoomSnapshot, TileId, Vec2,
};
