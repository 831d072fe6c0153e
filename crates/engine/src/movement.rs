use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::world::{EntityId, Facing, GridPos, RoomModel, Vec2};

/// Tiles per second for one unit of speed multiplier.
const TILES_PER_SECOND_PER_SPEED: f32 = 0.3125;
const ARRIVAL_EPSILON_TILES: f32 = 1e-4;
/// Multiplier used for moves requested through pointer clicks.
pub const LOCAL_MOVE_SPEED: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedTier {
    pub fn multiplier(self) -> f32 {
        match self {
            SpeedTier::Slow => 3.0,
            SpeedTier::Normal => 6.0,
            SpeedTier::Fast => 9.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Route {
    waypoints: Vec<GridPos>,
    next_waypoint_index: usize,
    speed: f32,
}

impl Route {
    fn current_waypoint(&self) -> Option<GridPos> {
        self.waypoints.get(self.next_waypoint_index).copied()
    }

    fn advance_waypoint(&mut self) {
        if self.next_waypoint_index < self.waypoints.len() {
            self.next_waypoint_index = self.next_waypoint_index.saturating_add(1);
        }
    }

    fn is_complete(&self) -> bool {
        self.next_waypoint_index >= self.waypoints.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Motion {
    position: Vec2,
    route: Option<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub entity_id: EntityId,
    pub pos: GridPos,
}

/// Continuous positions in tile units, keyed by entity id.
#[derive(Debug, Default)]
pub struct MovementController {
    motions: BTreeMap<EntityId, Motion>,
}

impl MovementController {
    pub fn clear(&mut self) {
        self.motions.clear();
    }

    /// Puts an entity at rest on `pos`, dropping any route it had.
    pub fn place(&mut self, id: &EntityId, pos: GridPos) {
        self.motions.insert(
            id.clone(),
            Motion {
                position: pos.to_vec2(),
                route: None,
            },
        );
    }

    pub fn remove(&mut self, id: &str) {
        self.motions.remove(id);
    }

    /// Replaces any in-flight route. Returns false for unknown ids and empty
    /// paths.
    pub fn start(&mut self, id: &str, path: Vec<GridPos>, speed: f32) -> bool {
        if path.is_empty() || !speed.is_finite() || speed <= 0.0 {
            return false;
        }
        let Some(motion) = self.motions.get_mut(id) else {
            return false;
        };
        motion.route = Some(Route {
            waypoints: path,
            next_waypoint_index: 0,
            speed,
        });
        true
    }

    pub fn is_moving(&self, id: &str) -> bool {
        self.motions
            .get(id)
            .is_some_and(|motion| motion.route.is_some())
    }

    pub fn any_moving(&self) -> bool {
        self.motions.values().any(|motion| motion.route.is_some())
    }

    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.motions.get(id).map(|motion| motion.position)
    }

    /// Moves every routed entity toward its next waypoint. Reaching a
    /// waypoint commits it to the room; finishing the route reports an
    /// arrival.
    pub fn advance(&mut self, dt_seconds: f32, room: &mut RoomModel) -> Vec<Arrival> {
        let mut arrivals = Vec::new();
        for (id, motion) in &mut self.motions {
            let Some(route) = motion.route.as_mut() else {
                continue;
            };
            let Some(target) = route.current_waypoint() else {
                motion.route = None;
                continue;
            };
            let Some(entity) = room.entity_mut(id.as_str()) else {
                motion.route = None;
                continue;
            };

            if let Some(facing) = Facing::from_step(entity.pos, target) {
                entity.facing = Some(facing);
            }

            let step = route.speed * TILES_PER_SECOND_PER_SPEED * dt_seconds.max(0.0);
            let target_vec = target.to_vec2();
            let delta = target_vec - motion.position;
            let distance = delta.length();

            if distance <= step + ARRIVAL_EPSILON_TILES {
                motion.position = target_vec;
                entity.pos = target;
                route.advance_waypoint();
                if route.is_complete() {
                    motion.route = None;
                    arrivals.push(Arrival {
                        entity_id: id.clone(),
                        pos: target,
                    });
                }
            } else {
                motion.position = motion.position + delta * (step / distance);
            }
        }
        arrivals
    }
}
