use std::collections::BTreeMap;

use crate::events::{CombatEffect, Intensity, RemoveAnimation};
use crate::world::{EntityId, RoomEntity, Vec2};

const FADE_STEP: f32 = 0.1;
const SPAWN_START_SCALE: f32 = 0.5;
const SPAWN_SCALE_STEP: f32 = 0.05;
const EXPLODE_SCALE_FACTOR: f32 = 1.1;
const FADE_DONE_EPSILON: f32 = 1e-3;
const TARGET_SHAKE_TICKS: u32 = 12;
const TARGET_SHAKE_PX: f32 = 6.0;
const TARGET_SHAKE_CRIT_PX: f32 = 12.0;
const HIT_FLASH_MS: f32 = 150.0;
pub const HIT_FLASH_TINT: u32 = 0xff6666;
const FLOATING_TEXT_LIFE_MS: f32 = 1200.0;
const FLOATING_TEXT_FADE_MS: f32 = 1000.0;
const FLOATING_TEXT_RISE_PX: f32 = 30.0;
const MISS_COLOR: u32 = 0xaaaaaa;
const CRIT_COLOR: u32 = 0xffff00;
const DAMAGE_COLOR: u32 = 0xff4444;
const CAMERA_SHAKE_TICKS: u32 = 25;
const SCREEN_FLASH_START_ALPHA: f32 = 0.6;
const SCREEN_FLASH_STEP: f32 = 0.04;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shake {
    ticks_elapsed: u32,
    amplitude: f32,
}

/// Per-entity presentation state layered over the room model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityVisual {
    pub alpha: f32,
    pub scale: f32,
    pub shake_offset_px: f32,
    fading_in: bool,
    shake: Option<Shake>,
    flash_remaining_ms: f32,
}

impl Default for EntityVisual {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            scale: 1.0,
            shake_offset_px: 0.0,
            fading_in: false,
            shake: None,
            flash_remaining_ms: 0.0,
        }
    }
}

impl EntityVisual {
    pub fn is_flashing(&self) -> bool {
        self.flash_remaining_ms > 0.0
    }

    pub fn is_fading_in(&self) -> bool {
        self.fading_in
    }
}

/// Visual left behind by a removed entity while it fades out. The entity
/// itself is already gone from the room.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartingEntity {
    pub entity: RoomEntity,
    pub position: Vec2,
    pub alpha: f32,
    pub scale: f32,
    explode: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub text: String,
    pub color: u32,
    pub large: bool,
    /// Tile coordinates of the entity that was hit.
    pub anchor: Vec2,
    life_ms: f32,
}

impl FloatingText {
    pub fn rise_px(&self) -> f32 {
        (1.0 - self.life_ms / FLOATING_TEXT_FADE_MS) * FLOATING_TEXT_RISE_PX
    }

    pub fn alpha(&self) -> f32 {
        (self.life_ms / FLOATING_TEXT_FADE_MS).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CameraShake {
    ticks_elapsed: u32,
    intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenFlash {
    pub color: u32,
    pub alpha: f32,
}

#[derive(Debug)]
pub struct EffectState {
    visuals: BTreeMap<EntityId, EntityVisual>,
    departing: Vec<DepartingEntity>,
    floating: Vec<FloatingText>,
    camera_shake: Option<CameraShake>,
    camera_offset: Vec2,
    screen_flash: Option<ScreenFlash>,
    rng: fastrand::Rng,
}

impl EffectState {
    pub fn new(seed: u64) -> Self {
        Self {
            visuals: BTreeMap::new(),
            departing: Vec::new(),
            floating: Vec::new(),
            camera_shake: None,
            camera_offset: Vec2::ZERO,
            screen_flash: None,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn clear(&mut self) {
        self.visuals.clear();
        self.departing.clear();
        self.floating.clear();
        self.camera_shake = None;
        self.camera_offset = Vec2::ZERO;
        self.screen_flash = None;
    }

    pub fn track_entity(&mut self, id: &EntityId) {
        self.visuals.insert(id.clone(), EntityVisual::default());
    }

    pub fn begin_fade_in(&mut self, id: &EntityId) {
        self.visuals.insert(
            id.clone(),
            EntityVisual {
                alpha: 0.0,
                scale: SPAWN_START_SCALE,
                fading_in: true,
                ..EntityVisual::default()
            },
        );
    }

    /// Drops the entity's live visual (cancelling any fade-in) and leaves a
    /// fading copy at `position`.
    pub fn begin_departure(
        &mut self,
        entity: RoomEntity,
        position: Vec2,
        animation: RemoveAnimation,
    ) {
        let visual = self.visuals.remove(entity.id.as_str()).unwrap_or_default();
        self.departing.push(DepartingEntity {
            entity,
            position,
            alpha: visual.alpha,
            scale: visual.scale,
            explode: animation == RemoveAnimation::Explode,
        });
    }

    pub fn combat_hit(&mut self, anchor: Vec2, effect: &CombatEffect) {
        let visual = self
            .visuals
            .entry(effect.target_id.clone())
            .or_default();
        visual.shake = Some(Shake {
            ticks_elapsed: 0,
            amplitude: if effect.is_critical {
                TARGET_SHAKE_CRIT_PX
            } else {
                TARGET_SHAKE_PX
            },
        });
        if !effect.miss {
            visual.flash_remaining_ms = HIT_FLASH_MS;
        }

        let label = if effect.miss {
            Some(("MISS".to_string(), MISS_COLOR))
        } else {
            effect.damage.map(|damage| {
                if effect.is_critical {
                    (format!("CRIT! -{damage}"), CRIT_COLOR)
                } else {
                    (format!("-{damage}"), DAMAGE_COLOR)
                }
            })
        };
        if let Some((text, color)) = label {
            self.floating.push(FloatingText {
                text,
                color,
                large: effect.is_critical && !effect.miss,
                anchor,
                life_ms: FLOATING_TEXT_LIFE_MS,
            });
        }
    }

    pub fn start_camera_shake(&mut self, intensity: Intensity) {
        self.camera_shake = Some(CameraShake {
            ticks_elapsed: 0,
            intensity: intensity.shake_px(),
        });
    }

    pub fn start_screen_flash(&mut self, color: u32) {
        self.screen_flash = Some(ScreenFlash {
            color,
            alpha: SCREEN_FLASH_START_ALPHA,
        });
    }

    /// Advances every transient effect by one tick of `dt_ms`.
    pub fn advance(&mut self, dt_ms: f32) {
        let rng = &mut self.rng;
        for visual in self.visuals.values_mut() {
            if visual.fading_in {
                visual.alpha += FADE_STEP;
                visual.scale += SPAWN_SCALE_STEP;
                if visual.alpha >= 1.0 - FADE_DONE_EPSILON {
                    visual.alpha = 1.0;
                    visual.scale = 1.0;
                    visual.fading_in = false;
                }
            }
            if let Some(shake) = visual.shake.as_mut() {
                shake.ticks_elapsed += 1;
                if shake.ticks_elapsed >= TARGET_SHAKE_TICKS {
                    visual.shake = None;
                    visual.shake_offset_px = 0.0;
                } else {
                    visual.shake_offset_px = (rng.f32() - 0.5) * shake.amplitude;
                }
            }
            visual.flash_remaining_ms = (visual.flash_remaining_ms - dt_ms).max(0.0);
        }

        for ghost in &mut self.departing {
            ghost.alpha -= FADE_STEP;
            if ghost.explode {
                ghost.scale *= EXPLODE_SCALE_FACTOR;
            }
        }
        self.departing
            .retain(|ghost| ghost.alpha > FADE_DONE_EPSILON);

        for text in &mut self.floating {
            text.life_ms -= dt_ms;
        }
        self.floating.retain(|text| text.life_ms > 0.0);

        if let Some(shake) = self.camera_shake.as_mut() {
            shake.ticks_elapsed += 1;
            if shake.ticks_elapsed >= CAMERA_SHAKE_TICKS {
                self.camera_shake = None;
                self.camera_offset = Vec2::ZERO;
            } else {
                let decay = 1.0 - shake.ticks_elapsed as f32 / CAMERA_SHAKE_TICKS as f32;
                self.camera_offset = Vec2::new(
                    (rng.f32() - 0.5) * shake.intensity * decay,
                    (rng.f32() - 0.5) * shake.intensity * decay,
                );
            }
        }

        if let Some(flash) = self.screen_flash.as_mut() {
            flash.alpha -= SCREEN_FLASH_STEP;
            if flash.alpha <= 0.0 {
                self.screen_flash = None;
            }
        }
    }

    pub fn visual(&self, id: &str) -> EntityVisual {
        self.visuals.get(id).copied().unwrap_or_default()
    }

    pub fn forget_entity(&mut self, id: &str) {
        self.visuals.remove(id);
    }

    pub fn departing(&self) -> &[DepartingEntity] {
        &self.departing
    }

    pub fn floating_texts(&self) -> &[FloatingText] {
        &self.floating
    }

    pub fn camera_offset(&self) -> Vec2 {
        self.camera_offset
    }

    pub fn screen_flash(&self) -> Option<ScreenFlash> {
        self.screen_flash
    }

    pub fn is_camera_shaking(&self) -> bool {
        self.camera_shake.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AttackKind;
    use crate::world::GridPos;

    const DT_MS: f32 = 1000.0 / 60.0;

    fn hit(damage: Option<u32>, is_critical: bool, miss: bool) -> CombatEffect {
        CombatEffect {
            attacker_id: EntityId::player(),
            target_id: EntityId::from("gob"),
            effect_type: AttackKind::Slash,
            damage,
            is_critical,
            miss,
        }
    }

    #[test]
    fn fade_in_reaches_full_alpha_and_scale() {
        let mut effects = EffectState::new(1);
        let id = EntityId::from("sk");
        effects.begin_fade_in(&id);
        assert_eq!(effects.visual("sk").alpha, 0.0);
        assert_eq!(effects.visual("sk").scale, SPAWN_START_SCALE);

        for _ in 0..10 {
            effects.advance(DT_MS);
        }

        let visual = effects.visual("sk");
        assert_eq!(visual.alpha, 1.0);
        assert_eq!(visual.scale, 1.0);
        assert!(!visual.is_fading_in());
    }

    #[test]
    fn departure_cancels_fade_in_and_fades_out() {
        let mut effects = EffectState::new(1);
        let id = EntityId::from("sk");
        effects.begin_fade_in(&id);
        effects.advance(DT_MS);
        effects.advance(DT_MS);

        let entity = RoomEntity::new("sk", 120, GridPos::new(2, 2));
        effects.begin_departure(entity, Vec2::new(2.0, 2.0), RemoveAnimation::FadeOut);

        assert!(!effects.visual("sk").is_fading_in());
        assert_eq!(effects.departing().len(), 1);
        for _ in 0..3 {
            effects.advance(DT_MS);
        }
        assert!(effects.departing().is_empty());
    }

    #[test]
    fn explode_grows_while_fading() {
        let mut effects = EffectState::new(1);
        let entity = RoomEntity::new("barrel_imp", 110, GridPos::new(0, 0));
        effects.begin_departure(entity, Vec2::ZERO, RemoveAnimation::Explode);

        effects.advance(DT_MS);

        let ghost = &effects.departing()[0];
        assert!((ghost.scale - 1.1).abs() < 1e-6);
        assert!((ghost.alpha - 0.9).abs() < 1e-6);
        for _ in 0..12 {
            effects.advance(DT_MS);
        }
        assert!(effects.departing().is_empty());
    }

    #[test]
    fn combat_hit_spawns_labels_by_outcome() {
        let mut effects = EffectState::new(1);
        effects.combat_hit(Vec2::ZERO, &hit(Some(5), false, false));
        effects.combat_hit(Vec2::ZERO, &hit(Some(9), true, false));
        effects.combat_hit(Vec2::ZERO, &hit(None, false, true));
        effects.combat_hit(Vec2::ZERO, &hit(None, false, false));

        let labels: Vec<&str> = effects
            .floating_texts()
            .iter()
            .map(|text| text.text.as_str())
            .collect();
        assert_eq!(labels, vec!["-5", "CRIT! -9", "MISS"]);
        assert!(effects.floating_texts()[1].large);
    }

    #[test]
    fn hit_flash_and_shake_expire() {
        let mut effects = EffectState::new(3);
        effects.combat_hit(Vec2::ZERO, &hit(Some(2), false, false));
        assert!(effects.visual("gob").is_flashing());

        for _ in 0..TARGET_SHAKE_TICKS {
            effects.advance(DT_MS);
        }

        let visual = effects.visual("gob");
        assert!(!visual.is_flashing());
        assert_eq!(visual.shake_offset_px, 0.0);
    }

    #[test]
    fn miss_does_not_flash() {
        let mut effects = EffectState::new(3);
        effects.combat_hit(Vec2::ZERO, &hit(None, false, true));
        assert!(!effects.visual("gob").is_flashing());
    }

    #[test]
    fn floating_text_rises_and_expires() {
        let mut effects = EffectState::new(1);
        effects.combat_hit(Vec2::ZERO, &hit(Some(1), false, false));
        let start_rise = effects.floating_texts()[0].rise_px();
        effects.advance(600.0);
        let mid = &effects.floating_texts()[0];
        assert!(mid.rise_px() > start_rise);
        assert!(mid.alpha() < 1.0);

        effects.advance(600.0);
        assert!(effects.floating_texts().is_empty());
    }

    #[test]
    fn camera_shake_decays_to_rest() {
        let mut effects = EffectState::new(9);
        effects.start_camera_shake(Intensity::Heavy);
        effects.advance(DT_MS);
        let first = effects.camera_offset();
        assert!(first.x.abs() <= 10.0 && first.y.abs() <= 10.0);

        for _ in 1..CAMERA_SHAKE_TICKS {
            effects.advance(DT_MS);
        }
        assert!(!effects.is_camera_shaking());
        assert_eq!(effects.camera_offset(), Vec2::ZERO);
    }

    #[test]
    fn screen_flash_fades_over_fifteen_ticks() {
        let mut effects = EffectState::new(1);
        effects.start_screen_flash(0xffffff);
        let mut ticks = 0;
        while effects.screen_flash().is_some() {
            effects.advance(DT_MS);
            ticks += 1;
        }
        assert!((14..=16).contains(&ticks), "flash lasted {ticks} ticks");
    }
}
