//! Cosmetic idle animation: blinking, bobbing and light glow pulses. Nothing
//! here feeds back into movement or visibility.

use std::collections::BTreeMap;

use crate::world::{catalog, EntityId, ObjectId, RoomModel};

const BLINK_OPEN_MIN_MS: f32 = 2000.0;
const BLINK_OPEN_SPREAD_MS: f32 = 3000.0;
const BLINK_CLOSED_MIN_MS: f32 = 100.0;
const BLINK_CLOSED_SPREAD_MS: f32 = 100.0;
const BOB_TIME_SCALE: f64 = 0.003;
const BOB_POSITION_SCALE: f64 = 0.5;
const BOB_AMPLITUDE: f64 = 0.5;
const GLOW_PHASE_PER_MS: f32 = 0.005;

#[derive(Debug, Clone, Copy)]
struct BlinkState {
    timer_ms: f32,
    blinking: bool,
}

#[derive(Debug)]
pub struct IdleAnimator {
    enabled: bool,
    anim_time_ms: f64,
    rng: fastrand::Rng,
    blinks: BTreeMap<EntityId, BlinkState>,
    glow_phases: BTreeMap<ObjectId, f32>,
}

impl IdleAnimator {
    pub fn new(enabled: bool, seed: u64) -> Self {
        Self {
            enabled,
            anim_time_ms: 0.0,
            rng: fastrand::Rng::with_seed(seed),
            blinks: BTreeMap::new(),
            glow_phases: BTreeMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn reset_for_room(&mut self, room: &RoomModel) {
        self.blinks.clear();
        self.glow_phases.clear();
        for entity in room.entities() {
            self.track_entity(&entity.id);
        }
        for object in room.objects() {
            if catalog::light_profile(object.type_id).is_some() {
                self.glow_phases.insert(object.id.clone(), 0.0);
            }
        }
    }

    pub fn track_entity(&mut self, id: &EntityId) {
        let timer_ms = self.next_open_duration_ms();
        self.blinks.insert(
            id.clone(),
            BlinkState {
                timer_ms,
                blinking: false,
            },
        );
    }

    pub fn forget_entity(&mut self, id: &str) {
        self.blinks.remove(id);
    }

    pub fn advance(&mut self, dt_ms: f32) {
        if !self.enabled {
            return;
        }
        self.anim_time_ms += f64::from(dt_ms);

        let ids: Vec<EntityId> = self.blinks.keys().cloned().collect();
        for id in ids {
            let Some(state) = self.blinks.get(&id).copied() else {
                continue;
            };
            let timer_ms = state.timer_ms - dt_ms;
            let next = if timer_ms > 0.0 {
                BlinkState { timer_ms, ..state }
            } else if state.blinking {
                BlinkState {
                    timer_ms: self.next_open_duration_ms(),
                    blinking: false,
                }
            } else {
                BlinkState {
                    timer_ms: self.next_closed_duration_ms(),
                    blinking: true,
                }
            };
            self.blinks.insert(id, next);
        }

        for phase in self.glow_phases.values_mut() {
            *phase += dt_ms * GLOW_PHASE_PER_MS;
        }
    }

    pub fn eyes_open(&self, id: &str) -> bool {
        self.blinks.get(id).map_or(true, |state| !state.blinking)
    }

    /// Vertical eye offset in tile-local pixels, seeded by the grid column.
    pub fn bob_offset(&self, grid_x: i32) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        let angle = self.anim_time_ms * BOB_TIME_SCALE + f64::from(grid_x) * BOB_POSITION_SCALE;
        (angle.sin() * BOB_AMPLITUDE) as f32
    }

    pub fn glow_alpha(&self, id: &str) -> f32 {
        let phase = self.glow_phases.get(id).copied().unwrap_or(0.0);
        (0.7 + phase.sin() * 0.3) * 0.4
    }

    fn next_open_duration_ms(&mut self) -> f32 {
        BLINK_OPEN_MIN_MS + self.rng.f32() * BLINK_OPEN_SPREAD_MS
    }

    fn next_closed_duration_ms(&mut self) -> f32 {
        BLINK_CLOSED_MIN_MS + self.rng.f32() * BLINK_CLOSED_SPREAD_MS
    }
}
