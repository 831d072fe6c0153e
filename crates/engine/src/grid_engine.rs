use tracing::{debug, info};

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::effects::EffectState;
use crate::events::{
    CameraEffect, CameraEffectKind, CombatEffect, InteractObject, MoveEntity, ObjectAction,
    RemoveEntity, SpawnEntity, UpdateTile, WorldEvent,
};
use crate::idle::IdleAnimator;
use crate::interaction::{self, Callbacks, ClickOutcome, ClickTarget, HoverInfo};
use crate::movement::{MovementController, LOCAL_MOVE_SPEED};
use crate::nav::find_path;
use crate::visibility::{FogCell, VisibilityState};
use crate::world::catalog::{self, entity_types, object_types};
use crate::world::{
    EntityId, GridPos, ObjectId, ObjectState, RoomEntity, RoomModel, RoomObject, RoomSnapshot,
    Vec2,
};

const FLASH_DEFAULT_COLOR: u32 = 0xffffff;
const PLAYER_DEFAULT_NAME: &str = "Player";

/// Running totals since the engine was created. The window loop diffs two
/// samples to report per-interval rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineCounters {
    pub ticks: u64,
    pub events_applied: u64,
    /// Events that left state untouched: unknown ids, out-of-range cells,
    /// no room loaded, or an action with no effect.
    pub events_dropped: u64,
    pub visibility_passes: u64,
}

impl EngineCounters {
    pub fn since(self, earlier: Self) -> Self {
        Self {
            ticks: self.ticks.saturating_sub(earlier.ticks),
            events_applied: self.events_applied.saturating_sub(earlier.events_applied),
            events_dropped: self.events_dropped.saturating_sub(earlier.events_dropped),
            visibility_passes: self
                .visibility_passes
                .saturating_sub(earlier.visibility_passes),
        }
    }
}

/// The authoritative state store. Every mutation arrives either as a
/// [`WorldEvent`] or as one of the direct calls below; [`GridEngine::tick`]
/// advances movement and transient effects.
pub struct GridEngine {
    config: EngineConfig,
    room: Option<RoomModel>,
    player_position: GridPos,
    movement: MovementController,
    idle: IdleAnimator,
    visibility: VisibilityState,
    effects: EffectState,
    camera: Camera,
    callbacks: Callbacks,
    counters: EngineCounters,
}

impl GridEngine {
    pub fn new(config: EngineConfig) -> Self {
        let idle = IdleAnimator::new(config.idle_animation, config.seed);
        let effects = EffectState::new(config.seed ^ 0x9e37_79b9_7f4a_7c15);
        let camera = Camera::new(config.zoom);
        Self {
            config,
            room: None,
            player_position: GridPos::default(),
            movement: MovementController::default(),
            idle,
            visibility: VisibilityState::default(),
            effects,
            camera,
            callbacks: Callbacks::default(),
            counters: EngineCounters::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces all room state. The player entity is kept if the snapshot
    /// has one and synthesized otherwise; either way it starts on the spawn.
    /// Oversized rooms are dropped and the current room stays loaded.
    pub fn load_room(&mut self, snapshot: RoomSnapshot) -> bool {
        let mut room = match RoomModel::from_snapshot(snapshot) {
            Ok(room) => room,
            Err(error) => {
                debug!(%error, "load_room_rejected");
                return false;
            }
        };
        let spawn = room.player_spawn();
        let player = match room.entity(EntityId::player().as_str()) {
            Some(existing) => RoomEntity {
                pos: spawn,
                ..existing.clone()
            },
            None => {
                let mut player =
                    RoomEntity::new(EntityId::player(), entity_types::PLAYER_WARRIOR, spawn);
                player.name = PLAYER_DEFAULT_NAME.to_string();
                player
            }
        };
        room.upsert_entity(player);

        self.movement.clear();
        self.effects.clear();
        for entity in room.entities() {
            self.movement.place(&entity.id, entity.pos);
            self.effects.track_entity(&entity.id);
        }
        self.idle.reset_for_room(&room);

        self.player_position = spawn;
        self.visibility.reset();
        self.visibility.recompute(&room, spawn);
        self.counters.visibility_passes += 1;
        self.camera.snap_to(self.tile_center_px(spawn.to_vec2()));

        info!(
            width = room.width(),
            height = room.height(),
            entity_count = room.entity_count(),
            object_count = room.objects().len(),
            lighting = ?room.lighting(),
            visible_tiles = self.visibility.visible_count(),
            "room_loaded"
        );
        self.room = Some(room);
        true
    }

    /// Applies one protocol event. Events that reference unknown ids or
    /// out-of-range cells are dropped without touching state.
    pub fn process_event(&mut self, event: WorldEvent) {
        let kind = event.kind();
        let applied = if self.room.is_none() && !matches!(event, WorldEvent::LoadRoom { .. }) {
            debug!(kind, "event_dropped_no_room");
            false
        } else {
            match event {
                WorldEvent::LoadRoom { room } => self.load_room(room),
                WorldEvent::MoveEntity(event) => self.apply_move_entity(event),
                WorldEvent::UpdateTile(event) => self.apply_update_tile(event),
                WorldEvent::SpawnEntity(event) => self.apply_spawn_entity(event),
                WorldEvent::RemoveEntity(event) => self.apply_remove_entity(event),
                WorldEvent::InteractObject(event) => self.apply_interact_object(event),
                WorldEvent::CombatEffect(event) => self.apply_combat_effect(event),
                WorldEvent::CameraEffect(event) => self.apply_camera_effect(event),
            }
        };
        if applied {
            self.counters.events_applied += 1;
        } else {
            self.counters.events_dropped += 1;
        }
    }

    /// One fixed simulation step.
    pub fn tick(&mut self, dt_seconds: f32) {
        self.counters.ticks = self.counters.ticks.saturating_add(1);
        let dt_seconds = if dt_seconds.is_finite() {
            dt_seconds.max(0.0)
        } else {
            0.0
        };
        let dt_ms = dt_seconds * 1000.0;

        if let Some(room) = self.room.as_mut() {
            let arrivals = self.movement.advance(dt_seconds, room);
            for arrival in arrivals {
                if !arrival.entity_id.is_player() {
                    continue;
                }
                self.player_position = arrival.pos;
                self.visibility.recompute(room, arrival.pos);
                self.counters.visibility_passes += 1;
                debug!(
                    x = arrival.pos.x,
                    y = arrival.pos.y,
                    visible_tiles = self.visibility.visible_count(),
                    explored_tiles = self.visibility.explored_count(),
                    "player_move_complete"
                );
                if let Some(callback) = self.callbacks.on_player_move_complete.as_mut() {
                    callback(arrival.pos);
                }
            }
        }

        self.idle.advance(dt_ms);
        self.effects.advance(dt_ms);

        let focus = self
            .movement
            .position(EntityId::player().as_str())
            .map(|tile| self.tile_center_px(tile))
            .unwrap_or_else(|| self.camera.center());
        self.camera.follow(focus);
    }

    /// Paths the player to `target` at the local click speed. Returns false
    /// when no path exists.
    pub fn move_player_to(&mut self, target: GridPos) -> bool {
        let Some(room) = self.room.as_ref() else {
            return false;
        };
        let player_id = EntityId::player();
        let Some(player) = room.entity(player_id.as_str()) else {
            return false;
        };
        let path = find_path(room, player.pos, target, Some(&player_id));
        if path.is_empty() {
            debug!(x = target.x, y = target.y, "player_move_unreachable");
            return false;
        }
        self.movement
            .start(player_id.as_str(), path, LOCAL_MOVE_SPEED)
    }

    /// Last tile the player finished a move on.
    pub fn player_position(&self) -> GridPos {
        self.player_position
    }

    pub fn current_room(&self) -> Option<&RoomModel> {
        self.room.as_ref()
    }

    pub fn entity(&self, id: &str) -> Option<&RoomEntity> {
        self.room.as_ref().and_then(|room| room.entity(id))
    }

    /// Continuous position in tile units; falls between cells mid-move.
    pub fn entity_render_position(&self, id: &str) -> Option<Vec2> {
        self.movement.position(id)
    }

    pub fn is_entity_moving(&self, id: &str) -> bool {
        self.movement.is_moving(id)
    }

    pub fn any_entity_moving(&self) -> bool {
        self.movement.any_moving()
    }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.config.edit_mode = enabled;
    }

    pub fn edit_mode(&self) -> bool {
        self.config.edit_mode
    }

    pub fn set_zoom(&mut self, level: f32, animate: bool) {
        self.camera.set_zoom(level, animate);
    }

    pub fn zoom(&self) -> f32 {
        self.camera.zoom()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn fog_cell(&self, tile: GridPos) -> FogCell {
        self.visibility.fog_cell(tile)
    }

    pub fn effects(&self) -> &EffectState {
        &self.effects
    }

    pub fn idle(&self) -> &IdleAnimator {
        &self.idle
    }

    pub fn tick_count(&self) -> u64 {
        self.counters.ticks
    }

    pub fn counters(&self) -> EngineCounters {
        self.counters
    }

    pub fn on_tile_click(&mut self, callback: impl FnMut(GridPos) + 'static) {
        self.callbacks.on_tile_click = Some(Box::new(callback));
    }

    pub fn on_entity_click(
        &mut self,
        callback: impl FnMut(&EntityId, &RoomEntity, Option<Vec2>) + 'static,
    ) {
        self.callbacks.on_entity_click = Some(Box::new(callback));
    }

    pub fn on_object_click(
        &mut self,
        callback: impl FnMut(&ObjectId, &RoomObject, Option<Vec2>) + 'static,
    ) {
        self.callbacks.on_object_click = Some(Box::new(callback));
    }

    pub fn on_hover(&mut self, callback: impl FnMut(Option<&HoverInfo>) + 'static) {
        self.callbacks.on_hover = Some(Box::new(callback));
    }

    pub fn on_player_move_complete(&mut self, callback: impl FnMut(GridPos) + 'static) {
        self.callbacks.on_player_move_complete = Some(Box::new(callback));
    }

    /// Maps a screen pixel to the tile under it, through camera, zoom and
    /// shake.
    pub fn screen_to_tile(&self, screen: Vec2) -> GridPos {
        let world = self.camera.screen_to_world(
            screen,
            self.config.viewport(),
            self.effects.camera_offset(),
        );
        interaction::screen_to_tile(world, self.config.tile_size_px())
    }

    /// Screen pixel of a point given in tile units (tile centers at `+0.5`).
    pub fn tile_to_screen(&self, tile: Vec2) -> Vec2 {
        let world = tile * self.config.tile_size_px();
        self.camera
            .world_to_screen(world, self.config.viewport(), self.effects.camera_offset())
    }

    pub fn pointer_down(&mut self, screen: Vec2) -> ClickOutcome {
        let tile = self.screen_to_tile(screen);
        let Some(room) = self.room.as_ref() else {
            return ClickOutcome::Ignored;
        };
        match interaction::resolve_click(room, tile, self.config.edit_mode) {
            ClickTarget::Nothing => ClickOutcome::Ignored,
            ClickTarget::EditTile(pos) => {
                if let Some(callback) = self.callbacks.on_tile_click.as_mut() {
                    callback(pos);
                }
                ClickOutcome::EditTile(pos)
            }
            ClickTarget::Entity(entity) => {
                if let Some(callback) = self.callbacks.on_entity_click.as_mut() {
                    callback(&entity.id, &entity, Some(screen));
                }
                ClickOutcome::Entity(entity.id)
            }
            ClickTarget::Object(object) => {
                if let Some(callback) = self.callbacks.on_object_click.as_mut() {
                    callback(&object.id, &object, Some(screen));
                }
                ClickOutcome::Object(object.id)
            }
            ClickTarget::Tile { pos, walkable } => {
                let moving = walkable && self.move_player_to(pos);
                if let Some(callback) = self.callbacks.on_tile_click.as_mut() {
                    callback(pos);
                }
                ClickOutcome::Tile { pos, moving }
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Vec2) -> Option<HoverInfo> {
        let tile = self.screen_to_tile(screen);
        let info = self
            .room
            .as_ref()
            .and_then(|room| interaction::resolve_hover(room, tile, screen));
        if let Some(callback) = self.callbacks.on_hover.as_mut() {
            callback(info.as_ref());
        }
        info
    }

    fn tile_center_px(&self, tile: Vec2) -> Vec2 {
        (tile + Vec2::new(0.5, 0.5)) * self.config.tile_size_px()
    }

    fn apply_move_entity(&mut self, event: MoveEntity) -> bool {
        let Some(room) = self.room.as_mut() else {
            return false;
        };
        let Some(entity) = room.entity_mut(event.entity_id.as_str()) else {
            debug!(entity_id = %event.entity_id, "move_entity_unknown_id");
            return false;
        };
        if let Some(facing) = event.facing {
            entity.facing = Some(facing);
        }
        if event.path.is_empty() || event.path.iter().any(|step| !room.contains(*step)) {
            debug!(
                entity_id = %event.entity_id,
                path_len = event.path.len(),
                "move_entity_invalid_path"
            );
            return false;
        }
        self.movement.start(
            event.entity_id.as_str(),
            event.path,
            event.speed.multiplier(),
        )
    }

    fn apply_update_tile(&mut self, event: UpdateTile) -> bool {
        let Some(room) = self.room.as_mut() else {
            return false;
        };
        let pos = GridPos::new(event.x, event.y);
        if !room.set_tile(pos, event.new_tile) {
            debug!(x = event.x, y = event.y, "update_tile_out_of_bounds");
            return false;
        }
        true
    }

    fn apply_spawn_entity(&mut self, event: SpawnEntity) -> bool {
        let Some(room) = self.room.as_mut() else {
            return false;
        };
        let pos = GridPos::new(event.x, event.y);
        if !room.contains(pos) {
            debug!(entity_id = %event.id, x = event.x, y = event.y, "spawn_entity_out_of_bounds");
            return false;
        }
        let mut entity = RoomEntity::new(event.id.clone(), event.type_id, pos);
        entity.name = event.name;
        entity.hostile = event.hostile;
        entity.hp = event.hp;
        entity.max_hp = event.max_hp;
        entity.color = event.color;
        if !room.insert_entity(entity) {
            debug!(entity_id = %event.id, "spawn_entity_duplicate_id");
            return false;
        }

        self.movement.place(&event.id, pos);
        self.idle.track_entity(&event.id);
        if event.animation.is_some() {
            self.effects.begin_fade_in(&event.id);
        } else {
            self.effects.track_entity(&event.id);
        }
        if event.id.is_player() {
            self.player_position = pos;
            self.visibility.recompute(room, pos);
            self.counters.visibility_passes += 1;
        }
        true
    }

    fn apply_remove_entity(&mut self, event: RemoveEntity) -> bool {
        let Some(room) = self.room.as_mut() else {
            return false;
        };
        let Some(entity) = room.remove_entity(event.entity_id.as_str()) else {
            debug!(entity_id = %event.entity_id, "remove_entity_unknown_id");
            return false;
        };
        let position = self
            .movement
            .position(entity.id.as_str())
            .unwrap_or_else(|| entity.pos.to_vec2());
        self.movement.remove(entity.id.as_str());
        self.idle.forget_entity(entity.id.as_str());
        self.effects.begin_departure(entity, position, event.animation);
        true
    }

    fn apply_interact_object(&mut self, event: InteractObject) -> bool {
        let Some(room) = self.room.as_mut() else {
            return false;
        };
        let Some(object) = room.object_mut(event.object_id.as_str()) else {
            debug!(object_id = %event.object_id, "interact_object_unknown_id");
            return false;
        };
        let is_closed_chest = matches!(
            object.type_id,
            object_types::CHEST_CLOSED | object_types::CHEST_LOCKED
        );
        if event.action != ObjectAction::Open || !is_closed_chest {
            debug!(
                object_id = %event.object_id,
                action = ?event.action,
                type_id = object.type_id,
                "interact_object_no_effect"
            );
            return false;
        }
        object.type_id = object_types::CHEST_OPEN;
        object.state = Some(ObjectState::Open);
        true
    }

    fn apply_combat_effect(&mut self, event: CombatEffect) -> bool {
        let Some(room) = self.room.as_mut() else {
            return false;
        };
        let Some(target) = room.entity_mut(event.target_id.as_str()) else {
            debug!(target_id = %event.target_id, "combat_effect_unknown_target");
            return false;
        };
        if !event.miss {
            if let (Some(damage), Some(hp)) = (event.damage, target.hp) {
                target.hp = Some(hp.saturating_sub(damage));
            }
        }
        let anchor = self
            .movement
            .position(event.target_id.as_str())
            .unwrap_or_else(|| target.pos.to_vec2());
        self.effects.combat_hit(anchor, &event);
        true
    }

    fn apply_camera_effect(&mut self, event: CameraEffect) -> bool {
        match event.effect_type {
            CameraEffectKind::Shake => self.effects.start_camera_shake(event.intensity),
            CameraEffectKind::Flash => {
                let color = event
                    .color
                    .as_deref()
                    .and_then(catalog::parse_hex_color)
                    .unwrap_or(FLASH_DEFAULT_COLOR);
                self.effects.start_screen_flash(color);
            }
            CameraEffectKind::Zoom | CameraEffectKind::Pan => {
                debug!(effect_type = ?event.effect_type, "camera_effect_ignored");
                return false;
            }
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn set_tile_for_test(&mut self, pos: GridPos, tile: crate::world::TileId) -> bool {
        self.room
            .as_mut()
            .is_some_and(|room| room.set_tile(pos, tile))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::events::{AttackKind, Intensity, RemoveAnimation, SpawnAnimation};
    use crate::movement::SpeedTier;
    use crate::world::TileId;

    const DT: f32 = 1.0 / 60.0;

    fn engine_with_room(width: u32, height: u32) -> GridEngine {
        let mut engine = GridEngine::new(EngineConfig {
            idle_animation: false,
            ..EngineConfig::default()
        });
        engine.load_room(RoomSnapshot::filled(width, height, TileId::FLOOR_STONE));
        engine
    }

    fn run_until_idle(engine: &mut GridEngine) -> u32 {
        let mut ticks = 0;
        while engine.movement.any_moving() {
            engine.tick(DT);
            ticks += 1;
            assert!(ticks < 10_000, "movement never settled");
        }
        ticks
    }

    fn spawn(id: &str, x: i32, y: i32) -> WorldEvent {
        WorldEvent::SpawnEntity(SpawnEntity {
            id: EntityId::from(id),
            type_id: entity_types::GOBLIN,
            x,
            y,
            name: "Goblin".to_string(),
            hostile: true,
            animation: None,
            hp: Some(10),
            max_hp: Some(10),
            color: None,
        })
    }

    #[test]
    fn load_room_synthesizes_player_on_default_spawn() {
        let engine = engine_with_room(5, 5);
        let player = engine.entity("player").expect("player");
        assert_eq!(player.pos, GridPos::new(1, 1));
        assert_eq!(player.name, "Player");
        assert_eq!(engine.player_position(), GridPos::new(1, 1));
        assert!(engine.visibility().is_visible(GridPos::new(1, 1)));
    }

    #[test]
    fn load_room_moves_existing_player_to_spawn() {
        let mut snapshot = RoomSnapshot::filled(6, 6, TileId::FLOOR_STONE);
        let mut player = RoomEntity::new("player", entity_types::PLAYER_MAGE, GridPos::new(0, 0));
        player.name = "Ilse".to_string();
        snapshot.entities.push(player);
        snapshot.player_spawn = Some(GridPos::new(4, 3));

        let mut engine = GridEngine::new(EngineConfig::default());
        engine.load_room(snapshot);

        let player = engine.entity("player").expect("player");
        assert_eq!(player.pos, GridPos::new(4, 3));
        assert_eq!(player.name, "Ilse");
        assert_eq!(engine.current_room().expect("room").entity_count(), 1);
    }

    #[test]
    fn events_without_a_room_are_dropped() {
        let mut engine = GridEngine::new(EngineConfig::default());
        engine.process_event(spawn("gob", 1, 1));
        assert!(engine.current_room().is_none());
        assert!(!engine.move_player_to(GridPos::new(2, 2)));
        assert_eq!(engine.counters().events_dropped, 1);
        assert_eq!(engine.counters().events_applied, 0);
    }

    #[test]
    fn oversized_room_is_dropped_and_current_room_kept() {
        let mut engine = engine_with_room(8, 8);
        let huge = WorldEvent::from_json(
            r#"{"type":"load_room","payload":{"room":{"width":4294967295,"height":4294967295,"tiles":[]}}}"#,
        )
        .expect("load_room event");

        engine.process_event(huge);

        let room = engine.current_room().expect("room");
        assert_eq!((room.width(), room.height()), (8, 8));
        assert_eq!(engine.player_position(), GridPos::new(1, 1));
        assert_eq!(engine.counters().events_dropped, 1);
        assert!(!engine.load_room(RoomSnapshot::filled(
            crate::world::MAX_ROOM_DIM + 1,
            1,
            TileId::FLOOR_STONE
        )));
        assert_eq!(engine.current_room().map(RoomModel::width), Some(8));
    }

    #[test]
    fn move_player_completes_and_fires_callback_once() {
        let mut engine = engine_with_room(8, 8);
        let completions = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&completions);
        engine.on_player_move_complete(move |pos| sink.borrow_mut().push(pos));

        assert!(engine.move_player_to(GridPos::new(4, 1)));
        run_until_idle(&mut engine);

        assert_eq!(engine.player_position(), GridPos::new(4, 1));
        assert_eq!(completions.borrow().as_slice(), &[GridPos::new(4, 1)]);
    }

    #[test]
    fn move_player_to_wall_or_same_tile_is_rejected() {
        let mut engine = engine_with_room(5, 5);
        assert!(engine.set_tile_for_test(GridPos::new(3, 3), TileId::WALL_STONE));
        assert!(!engine.move_player_to(GridPos::new(3, 3)));
        assert!(!engine.move_player_to(GridPos::new(1, 1)));
        assert!(!engine.move_player_to(GridPos::new(9, 9)));
    }

    #[test]
    fn spawn_with_duplicate_id_is_a_no_op() {
        let mut engine = engine_with_room(5, 5);
        engine.process_event(spawn("gob", 2, 2));
        engine.process_event(spawn("gob", 3, 3));
        let room = engine.current_room().expect("room");
        assert_eq!(room.entity_count(), 2);
        assert_eq!(room.entity("gob").expect("gob").pos, GridPos::new(2, 2));
    }

    #[test]
    fn spawn_animation_starts_transparent() {
        let mut engine = engine_with_room(5, 5);
        let mut event = spawn("gob", 2, 2);
        if let WorldEvent::SpawnEntity(spawn) = &mut event {
            spawn.animation = Some(SpawnAnimation::FadeIn);
        }
        engine.process_event(event);
        assert_eq!(engine.effects().visual("gob").alpha, 0.0);
        for _ in 0..10 {
            engine.tick(DT);
        }
        assert_eq!(engine.effects().visual("gob").alpha, 1.0);
    }

    #[test]
    fn remove_entity_leaves_fading_ghost() {
        let mut engine = engine_with_room(5, 5);
        engine.process_event(spawn("gob", 2, 2));
        engine.process_event(WorldEvent::RemoveEntity(RemoveEntity {
            entity_id: EntityId::from("gob"),
            animation: RemoveAnimation::Explode,
        }));
        assert!(engine.entity("gob").is_none());
        assert_eq!(engine.effects().departing().len(), 1);
        for _ in 0..12 {
            engine.tick(DT);
        }
        assert!(engine.effects().departing().is_empty());
    }

    #[test]
    fn move_entity_rejects_out_of_bounds_paths() {
        let mut engine = engine_with_room(5, 5);
        engine.process_event(spawn("gob", 2, 2));
        engine.process_event(WorldEvent::MoveEntity(MoveEntity {
            entity_id: EntityId::from("gob"),
            path: vec![GridPos::new(2, 3), GridPos::new(2, 9)],
            speed: SpeedTier::Fast,
            facing: None,
        }));
        assert!(!engine.is_entity_moving("gob"));
    }

    #[test]
    fn combat_damage_floors_hp_at_zero() {
        let mut engine = engine_with_room(5, 5);
        engine.process_event(spawn("gob", 2, 2));
        let strike = |damage, miss| {
            WorldEvent::CombatEffect(CombatEffect {
                attacker_id: EntityId::player(),
                target_id: EntityId::from("gob"),
                effect_type: AttackKind::Slash,
                damage: Some(damage),
                is_critical: false,
                miss,
            })
        };
        engine.process_event(strike(4, false));
        assert_eq!(engine.entity("gob").and_then(|gob| gob.hp), Some(6));
        engine.process_event(strike(4, true));
        assert_eq!(engine.entity("gob").and_then(|gob| gob.hp), Some(6));
        engine.process_event(strike(40, false));
        assert_eq!(engine.entity("gob").and_then(|gob| gob.hp), Some(0));
        assert_eq!(engine.effects().floating_texts().len(), 3);
    }

    #[test]
    fn open_turns_closed_chest_into_open_chest() {
        let mut snapshot = RoomSnapshot::filled(5, 5, TileId::FLOOR_STONE);
        snapshot.objects.push(RoomObject::new(
            "chest",
            object_types::CHEST_LOCKED,
            GridPos::new(3, 3),
        ));
        snapshot.objects.push(RoomObject::new(
            "barrel",
            object_types::BARREL,
            GridPos::new(2, 3),
        ));
        let mut engine = GridEngine::new(EngineConfig::default());
        engine.load_room(snapshot);

        let open = |id: &str| {
            WorldEvent::InteractObject(InteractObject {
                object_id: ObjectId::from(id),
                action: ObjectAction::Open,
                result: None,
            })
        };
        engine.process_event(open("chest"));
        engine.process_event(open("barrel"));

        let room = engine.current_room().expect("room");
        let chest = room.object("chest").expect("chest");
        assert_eq!(chest.type_id, object_types::CHEST_OPEN);
        assert_eq!(chest.state, Some(ObjectState::Open));
        assert_eq!(
            room.object("barrel").expect("barrel").type_id,
            object_types::BARREL
        );
    }

    #[test]
    fn camera_flash_defaults_to_white() {
        let mut engine = engine_with_room(5, 5);
        engine.process_event(WorldEvent::CameraEffect(CameraEffect {
            effect_type: CameraEffectKind::Flash,
            intensity: Intensity::Light,
            color: Some("not a color".to_string()),
            target: None,
        }));
        let flash = engine.effects().screen_flash().expect("flash");
        assert_eq!(flash.color, 0xffffff);
    }

    #[test]
    fn click_on_walkable_tile_moves_player_then_reports_tile() {
        let mut engine = engine_with_room(8, 8);
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicked);
        engine.on_tile_click(move |pos| sink.borrow_mut().push(pos));

        let target = GridPos::new(3, 1);
        let screen = engine.tile_to_screen(target.to_vec2() + Vec2::new(0.5, 0.5));
        let outcome = engine.pointer_down(screen);

        assert_eq!(
            outcome,
            ClickOutcome::Tile {
                pos: target,
                moving: true
            }
        );
        assert_eq!(clicked.borrow().as_slice(), &[target]);
        assert!(engine.is_entity_moving("player"));
    }

    #[test]
    fn click_on_entity_reports_entity_only() {
        let mut engine = engine_with_room(8, 8);
        engine.process_event(spawn("gob", 2, 1));
        let tiles = Rc::new(RefCell::new(0));
        let entities = Rc::new(RefCell::new(Vec::new()));
        let tile_sink = Rc::clone(&tiles);
        let entity_sink = Rc::clone(&entities);
        engine.on_tile_click(move |_| *tile_sink.borrow_mut() += 1);
        engine.on_entity_click(move |id, _, _| entity_sink.borrow_mut().push(id.clone()));

        let screen = engine.tile_to_screen(Vec2::new(2.5, 1.5));
        let outcome = engine.pointer_down(screen);

        assert_eq!(outcome, ClickOutcome::Entity(EntityId::from("gob")));
        assert_eq!(entities.borrow().as_slice(), &[EntityId::from("gob")]);
        assert_eq!(*tiles.borrow(), 0);
        assert!(!engine.is_entity_moving("player"));
    }

    #[test]
    fn edit_mode_reports_tile_without_moving() {
        let mut engine = engine_with_room(8, 8);
        engine.set_edit_mode(true);
        let screen = engine.tile_to_screen(Vec2::new(1.5, 1.5));
        assert_eq!(
            engine.pointer_down(screen),
            ClickOutcome::EditTile(GridPos::new(1, 1))
        );
        assert!(!engine.is_entity_moving("player"));
    }

    #[test]
    fn hover_reports_then_clears() {
        let mut engine = engine_with_room(8, 8);
        engine.process_event(spawn("gob", 2, 1));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine.on_hover(move |info| sink.borrow_mut().push(info.map(|info| info.id.clone())));

        let over = engine.tile_to_screen(Vec2::new(2.5, 1.5));
        let away = engine.tile_to_screen(Vec2::new(5.5, 5.5));
        assert!(engine.pointer_move(over).is_some());
        assert!(engine.pointer_move(away).is_none());
        assert_eq!(
            seen.borrow().as_slice(),
            &[Some("gob".to_string()), None]
        );
    }
}
