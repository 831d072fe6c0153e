use crate::effects::HIT_FLASH_TINT;
use crate::world::{catalog, Facing, RoomEntity};

use super::frame::{rgba, tint_rgb, Canvas};
use super::glyphs;
use super::tiles::DESIGN_TILE_UNITS;

const BODY_RADIUS_FRACTION: f32 = 0.4;
const HOSTILE_OUTLINE: u32 = 0xff3333;
const HP_HIGH_COLOR: u32 = 0x44ff44;
const HP_LOW_COLOR: u32 = 0xff4444;
const HP_LOW_FRACTION: f32 = 0.3;

/// Where and how to draw one entity this frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActorPose {
    pub(crate) center: (f32, f32),
    /// On-screen tile edge in pixels.
    pub(crate) tile_size: f32,
    pub(crate) alpha: f32,
    pub(crate) scale: f32,
    pub(crate) flashing: bool,
    pub(crate) eyes_open: bool,
    /// Idle bob applied to the eyes only, in screen pixels.
    pub(crate) eye_offset: f32,
}

pub(crate) fn body_color(entity: &RoomEntity) -> u32 {
    entity
        .color
        .as_deref()
        .and_then(catalog::parse_hex_color)
        .unwrap_or_else(|| catalog::entity_color(entity.type_id))
}

pub(crate) fn draw_actor(canvas: &mut Canvas<'_>, entity: &RoomEntity, pose: ActorPose) {
    if pose.alpha <= 0.0 || pose.scale <= 0.0 {
        return;
    }
    let unit = pose.tile_size / DESIGN_TILE_UNITS;
    let (cx, cy) = pose.center;
    let radius = pose.tile_size * BODY_RADIUS_FRACTION * pose.scale;
    let alpha = pose.alpha;

    canvas.fill_ellipse(
        cx,
        cy + radius * 0.7,
        radius * 0.8,
        radius * 0.3,
        rgba(0x000000, 0.3 * alpha),
    );

    let mut color = body_color(entity);
    if pose.flashing {
        color = tint_rgb(color, HIT_FLASH_TINT);
    }
    canvas.fill_circle(cx, cy, radius, rgba(color, alpha));
    let (outline, outline_alpha) = if entity.hostile {
        (HOSTILE_OUTLINE, 0.8)
    } else {
        (0x000000, 0.4)
    };
    canvas.stroke_circle(cx, cy, radius, 3.0 * unit, rgba(outline, outline_alpha * alpha));
    canvas.fill_circle(
        cx - radius * 0.35,
        cy - radius * 0.45,
        radius * 0.18,
        rgba(0xffffff, 0.2 * alpha),
    );

    draw_eyes(
        canvas,
        entity.facing,
        cx,
        cy + pose.eye_offset,
        radius,
        alpha,
        pose.eyes_open,
    );
}

fn draw_eyes(
    canvas: &mut Canvas<'_>,
    facing: Option<Facing>,
    cx: f32,
    cy: f32,
    radius: f32,
    alpha: f32,
    open: bool,
) {
    let offset_x = radius * 0.3;
    let eye_y = cy - radius * 0.1;
    let eye_radius = radius * 0.25;
    for eye_x in [cx - offset_x, cx + offset_x] {
        if !open {
            canvas.fill_rect(
                eye_x - eye_radius,
                eye_y - 0.5,
                eye_radius * 2.0,
                (eye_radius * 0.2).max(1.0),
                rgba(0x000000, alpha),
            );
            continue;
        }
        canvas.fill_circle(eye_x, eye_y, eye_radius, rgba(0xffffff, alpha));
        let pupil_radius = eye_radius * 0.5;
        let glance = eye_radius * 0.3;
        let (px, py) = match facing {
            Some(Facing::Left) => (eye_x - glance, eye_y),
            Some(Facing::Right) => (eye_x + glance, eye_y),
            Some(Facing::Up) => (eye_x, eye_y - glance),
            Some(Facing::Down) | None => (eye_x, eye_y),
        };
        canvas.fill_circle(px, py, pupil_radius, rgba(0x000000, alpha));
        canvas.fill_circle(
            px - 1.0,
            py - 1.0,
            pupil_radius * 0.3,
            rgba(0xffffff, 0.8 * alpha),
        );
    }
}

/// HP bar for hostiles with known hp, name plate for named non-hostiles.
pub(crate) fn draw_actor_labels(canvas: &mut Canvas<'_>, entity: &RoomEntity, pose: ActorPose) {
    if pose.alpha <= 0.0 {
        return;
    }
    let unit = pose.tile_size / DESIGN_TILE_UNITS;
    let (cx, cy) = pose.center;
    let radius = pose.tile_size * BODY_RADIUS_FRACTION;

    if entity.hostile {
        if let (Some(hp), Some(max_hp)) = (entity.hp, entity.max_hp) {
            if max_hp > 0 {
                let fraction = (hp as f32 / max_hp as f32).clamp(0.0, 1.0);
                let bar_width = pose.tile_size * 0.8;
                let left = cx - bar_width / 2.0;
                let top = cy - radius - 10.0 * unit;
                canvas.fill_rect(left, top, bar_width, 6.0 * unit, rgba(0x333333, pose.alpha));
                let fill = if fraction > HP_LOW_FRACTION {
                    HP_HIGH_COLOR
                } else {
                    HP_LOW_COLOR
                };
                canvas.fill_rect(
                    left + unit,
                    top + unit,
                    (bar_width - 2.0 * unit) * fraction,
                    4.0 * unit,
                    rgba(fill, pose.alpha),
                );
            }
        }
        return;
    }

    if !entity.name.is_empty() {
        let scale = (pose.tile_size / DESIGN_TILE_UNITS).round().max(1.0) as i32;
        glyphs::draw_text_centered_outlined(
            canvas,
            cx.round() as i32,
            (cy + radius + 5.0 * unit).round() as i32,
            &entity.name,
            scale,
            rgba(0xffffff, pose.alpha),
            rgba(0x000000, pose.alpha),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GridPos;

    fn pose() -> ActorPose {
        ActorPose {
            center: (32.0, 48.0),
            tile_size: 64.0,
            alpha: 1.0,
            scale: 1.0,
            flashing: false,
            eyes_open: true,
            eye_offset: 0.0,
        }
    }

    fn render(entity: &RoomEntity, pose: ActorPose) -> Vec<u8> {
        let mut frame = vec![0u8; 64 * 96 * 4];
        let mut canvas = Canvas::new(&mut frame, 64, 96);
        draw_actor(&mut canvas, entity, pose);
        draw_actor_labels(&mut canvas, entity, pose);
        frame
    }

    #[test]
    fn custom_color_overrides_type_color() {
        let mut entity = RoomEntity::new("npc", 140, GridPos::new(0, 0));
        assert_eq!(body_color(&entity), catalog::entity_color(140));
        entity.color = Some("#123456".to_string());
        assert_eq!(body_color(&entity), 0x123456);
        entity.color = Some("teal".to_string());
        assert_eq!(body_color(&entity), catalog::entity_color(140));
    }

    #[test]
    fn flash_and_blink_change_the_picture() {
        let entity = RoomEntity::new("gob", 110, GridPos::new(0, 0));
        let base = render(&entity, pose());
        let flashing = render(
            &entity,
            ActorPose {
                flashing: true,
                ..pose()
            },
        );
        let blinking = render(
            &entity,
            ActorPose {
                eyes_open: false,
                ..pose()
            },
        );
        assert_ne!(base, flashing);
        assert_ne!(base, blinking);
    }

    #[test]
    fn invisible_actor_draws_nothing() {
        let entity = RoomEntity::new("gob", 110, GridPos::new(0, 0));
        let frame = render(
            &entity,
            ActorPose {
                alpha: 0.0,
                ..pose()
            },
        );
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn hp_bar_shrinks_with_damage() {
        let mut goblin = RoomEntity::new("gob", 110, GridPos::new(0, 0));
        goblin.hostile = true;
        goblin.max_hp = Some(10);
        goblin.hp = Some(10);
        let healthy = render(&goblin, pose());
        goblin.hp = Some(2);
        let wounded = render(&goblin, pose());
        assert_ne!(healthy, wounded);
    }
}
