//! The closed event protocol. Each event is `{"type": <name>, "payload": {..}}`.
//! Field names are part of the wire format and must stay stable for logged or
//! replayed event streams.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::movement::SpeedTier;
use crate::world::{EntityId, Facing, GridPos, ObjectId, RoomSnapshot, TileId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum WorldEvent {
    LoadRoom { room: RoomSnapshot },
    MoveEntity(MoveEntity),
    UpdateTile(UpdateTile),
    SpawnEntity(SpawnEntity),
    RemoveEntity(RemoveEntity),
    InteractObject(InteractObject),
    CombatEffect(CombatEffect),
    CameraEffect(CameraEffect),
}

impl WorldEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            WorldEvent::LoadRoom { .. } => "load_room",
            WorldEvent::MoveEntity(_) => "move_entity",
            WorldEvent::UpdateTile(_) => "update_tile",
            WorldEvent::SpawnEntity(_) => "spawn_entity",
            WorldEvent::RemoveEntity(_) => "remove_entity",
            WorldEvent::InteractObject(_) => "interact_object",
            WorldEvent::CombatEffect(_) => "combat_effect",
            WorldEvent::CameraEffect(_) => "camera_effect",
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, EventDecodeError> {
        serde_json::from_str(raw).map_err(EventDecodeError::Json)
    }

    pub fn to_json(&self) -> Result<String, EventDecodeError> {
        serde_json::to_string(self).map_err(EventDecodeError::Json)
    }
}

#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("malformed world event: {0}")]
    Json(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEntity {
    pub entity_id: EntityId,
    pub path: Vec<GridPos>,
    #[serde(default)]
    pub speed: SpeedTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<Facing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileAnimation {
    Instant,
    Fade,
    Crumble,
    Grow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTile {
    pub x: i32,
    pub y: i32,
    pub new_tile: TileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_tile: Option<TileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<TileAnimation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpawnAnimation {
    FadeIn,
    DropIn,
    Emerge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnEntity {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub type_id: u16,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<SpawnAnimation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoveAnimation {
    #[default]
    FadeOut,
    Explode,
    Dissolve,
    Flee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveEntity {
    pub entity_id: EntityId,
    #[serde(default)]
    pub animation: RemoveAnimation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectAction {
    Open,
    Close,
    Destroy,
    Activate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trap: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractObject {
    pub object_id: ObjectId,
    pub action: ObjectAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<InteractResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    Slash,
    Stab,
    Magic,
    Arrow,
    Heal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatEffect {
    pub attacker_id: EntityId,
    pub target_id: EntityId,
    pub effect_type: AttackKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
    #[serde(default)]
    pub is_critical: bool,
    #[serde(default)]
    pub miss: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraEffectKind {
    Shake,
    Flash,
    Zoom,
    Pan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    #[default]
    Light,
    Medium,
    Heavy,
}

impl Intensity {
    pub fn shake_px(self) -> f32 {
        match self {
            Intensity::Light => 5.0,
            Intensity::Medium => 10.0,
            Intensity::Heavy => 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraEffect {
    pub effect_type: CameraEffectKind,
    #[serde(default)]
    pub intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<GridPos>,
}

/// Anything that can feed events into the tick loop, e.g. a scripted replay
/// or a bridge to a remote narrator.
pub trait EventSource {
    /// Appends events due at `tick` to `out`.
    fn poll(&mut self, tick: u64, out: &mut Vec<WorldEvent>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_move_entity_with_default_speed() {
        let event = WorldEvent::from_json(
            r#"{"type":"move_entity","payload":{"entityId":"gob","path":[{"x":1,"y":2},{"x":2,"y":2}]}}"#,
        )
        .expect("move event");

        let WorldEvent::MoveEntity(moved) = event else {
            panic!("expected move_entity, got {event:?}");
        };
        assert_eq!(moved.entity_id, EntityId::from("gob"));
        assert_eq!(moved.speed, SpeedTier::Normal);
        assert_eq!(moved.path.len(), 2);
    }

    #[test]
    fn decodes_combat_and_camera_effects() {
        let combat = WorldEvent::from_json(
            r#"{"type":"combat_effect","payload":{"attackerId":"player","targetId":"gob",
                "effectType":"slash","damage":5,"isCritical":true}}"#,
        )
        .expect("combat event");
        let WorldEvent::CombatEffect(combat) = combat else {
            panic!("expected combat_effect");
        };
        assert_eq!(combat.damage, Some(5));
        assert!(combat.is_critical);
        assert!(!combat.miss);

        let camera = WorldEvent::from_json(
            r##"{"type":"camera_effect","payload":{"effectType":"flash","intensity":"heavy","color":"#ff0000"}}"##,
        )
        .expect("camera event");
        assert_eq!(camera.kind(), "camera_effect");
    }

    #[test]
    fn spawn_payload_keeps_entity_type_under_type_key() {
        let spawn = WorldEvent::from_json(
            r#"{"type":"spawn_entity","payload":{"id":"sk1","type":121,"x":3,"y":4,
                "name":"Skeleton","hostile":true,"animation":"dropIn","maxHp":9}}"#,
        )
        .expect("spawn event");
        let WorldEvent::SpawnEntity(spawn) = spawn else {
            panic!("expected spawn_entity");
        };
        assert_eq!(spawn.type_id, 121);
        assert_eq!(spawn.animation, Some(SpawnAnimation::DropIn));
        assert_eq!(spawn.max_hp, Some(9));
        assert_eq!(spawn.hp, None);
    }

    #[test]
    fn remove_animation_defaults_to_fade_out() {
        let remove =
            WorldEvent::from_json(r#"{"type":"remove_entity","payload":{"entityId":"sk1"}}"#)
                .expect("remove event");
        let WorldEvent::RemoveEntity(remove) = remove else {
            panic!("expected remove_entity");
        };
        assert_eq!(remove.animation, RemoveAnimation::FadeOut);
    }

    #[test]
    fn unknown_event_type_is_a_decode_error() {
        let result = WorldEvent::from_json(
            r#"{"type":"transition_location","payload":{"toLocation":"x"}}"#,
        );
        assert!(matches!(result, Err(EventDecodeError::Json(_))));
    }

    #[test]
    fn load_room_round_trips_through_json() {
        let event = WorldEvent::LoadRoom {
            room: RoomSnapshot::filled(2, 2, TileId::FLOOR_DIRT),
        };
        let raw = event.to_json().expect("encode");
        assert!(raw.starts_with(r#"{"type":"load_room","payload":"#));
        assert_eq!(WorldEvent::from_json(&raw).expect("decode"), event);
    }
}
