//! CPU rasterizer for the grid world. Layers are painted back to front:
//! tiles, objects, entities, floating text, fog, screen flash. Painting reads
//! engine state only, so the same state always yields the same bytes.

mod actors;
mod frame;
mod glyphs;
mod overlay;
mod props;
mod tiles;

use crate::camera::{Camera, Viewport};
use crate::grid_engine::GridEngine;
use crate::world::{GridPos, RoomModel, Vec2};

use actors::ActorPose;
use frame::{rgba, Canvas};
use tiles::TileRect;

const CULL_PADDING_TILES: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TileRectInclusive {
    x_min: i32,
    x_max: i32,
    y_min: i32,
    y_max: i32,
}

impl TileRectInclusive {
    fn contains_padded(&self, pos: GridPos, padding: i32) -> bool {
        pos.x >= self.x_min - padding
            && pos.x <= self.x_max + padding
            && pos.y >= self.y_min - padding
            && pos.y <= self.y_max + padding
    }
}

/// Camera, viewport and shake frozen for one paint.
#[derive(Debug, Clone, Copy)]
struct ViewTransform {
    camera: Camera,
    viewport: Viewport,
    shake: Vec2,
    tile_px: f32,
}

impl ViewTransform {
    fn tile_rect(&self, tile: Vec2) -> TileRect {
        let top_left = self
            .camera
            .world_to_screen(tile * self.tile_px, self.viewport, self.shake);
        TileRect {
            left: top_left.x,
            top: top_left.y,
            size: self.tile_px * self.camera.zoom(),
        }
    }

    fn visible_tile_rect(&self, room: &RoomModel) -> Option<TileRectInclusive> {
        if room.width() == 0 || room.height() == 0 {
            return None;
        }
        let min = self
            .camera
            .screen_to_world(Vec2::ZERO, self.viewport, self.shake);
        let max = self.camera.screen_to_world(
            Vec2::new(self.viewport.width as f32, self.viewport.height as f32),
            self.viewport,
            self.shake,
        );
        let x_min = ((min.x / self.tile_px).floor() as i32).max(0);
        let y_min = ((min.y / self.tile_px).floor() as i32).max(0);
        let x_max = ((max.x / self.tile_px).ceil() as i32 - 1).min(room.width() as i32 - 1);
        let y_max = ((max.y / self.tile_px).ceil() as i32 - 1).min(room.height() as i32 - 1);
        if x_min > x_max || y_min > y_max {
            return None;
        }
        Some(TileRectInclusive {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

fn clear_color_for_ambience(ambience: &str) -> u32 {
    match ambience {
        "cave" => 0x0b0907,
        "forest" | "outdoor" => 0x08100a,
        "town" | "tavern" => 0x100d0a,
        _ => 0x0a0a0f,
    }
}

/// Paints the current engine state into an RGBA8 `frame` of `width * height`
/// pixels. Frames of the wrong length are left untouched.
pub fn paint_world(frame: &mut [u8], width: u32, height: u32, engine: &GridEngine) {
    let expected_len = width as usize * height as usize * 4;
    if frame.len() != expected_len || width == 0 || height == 0 {
        return;
    }
    let mut canvas = Canvas::new(frame, width, height);
    let Some(room) = engine.current_room() else {
        canvas.clear(rgba(clear_color_for_ambience(""), 1.0));
        return;
    };
    canvas.clear(rgba(clear_color_for_ambience(room.ambience()), 1.0));

    let view = ViewTransform {
        camera: *engine.camera(),
        viewport: Viewport { width, height },
        shake: engine.effects().camera_offset(),
        tile_px: engine.config().tile_size.max(1) as f32,
    };
    let Some(visible) = view.visible_tile_rect(room) else {
        if let Some(flash) = engine.effects().screen_flash() {
            overlay::draw_screen_flash(&mut canvas, flash);
        }
        return;
    };

    for y in visible.y_min..=visible.y_max {
        for x in visible.x_min..=visible.x_max {
            let pos = GridPos::new(x, y);
            if let Some(tile) = room.tile_at(pos) {
                tiles::draw_tile(&mut canvas, tile, pos, view.tile_rect(pos.to_vec2()));
            }
        }
    }

    for object in room.objects() {
        if !visible.contains_padded(object.pos, CULL_PADDING_TILES) {
            continue;
        }
        props::draw_object(
            &mut canvas,
            object,
            view.tile_rect(object.pos.to_vec2()),
            engine.idle().glow_alpha(object.id.as_str()),
        );
    }

    paint_entities(&mut canvas, engine, room, &view, visible);

    let zoom = view.camera.zoom();
    for text in engine.effects().floating_texts() {
        overlay::draw_floating_text(&mut canvas, text, view.tile_rect(text.anchor), zoom);
    }

    for y in visible.y_min..=visible.y_max {
        for x in visible.x_min..=visible.x_max {
            let pos = GridPos::new(x, y);
            overlay::draw_fog_cell(
                &mut canvas,
                engine.visibility(),
                pos,
                view.tile_rect(pos.to_vec2()),
            );
        }
    }

    if let Some(flash) = engine.effects().screen_flash() {
        overlay::draw_screen_flash(&mut canvas, flash);
    }
}

fn paint_entities(
    canvas: &mut Canvas<'_>,
    engine: &GridEngine,
    room: &RoomModel,
    view: &ViewTransform,
    visible: TileRectInclusive,
) {
    let zoom = view.camera.zoom();
    let idle = engine.idle();
    let mut poses = Vec::with_capacity(room.entity_count());
    for entity in room.entities() {
        if !visible.contains_padded(entity.pos, CULL_PADDING_TILES) {
            continue;
        }
        let id = entity.id.as_str();
        let visual = engine.effects().visual(id);
        let position = engine
            .entity_render_position(id)
            .unwrap_or_else(|| entity.pos.to_vec2());
        let rect = view.tile_rect(position);
        let (cx, cy) = rect.center();
        let pose = ActorPose {
            center: (cx + visual.shake_offset_px * zoom, cy),
            tile_size: rect.size,
            alpha: visual.alpha,
            scale: visual.scale,
            flashing: visual.is_flashing(),
            eyes_open: idle.eyes_open(id),
            eye_offset: idle.bob_offset(entity.pos.x) * zoom,
        };
        actors::draw_actor(canvas, entity, pose);
        poses.push((entity, pose));
    }
    for (entity, pose) in poses {
        actors::draw_actor_labels(canvas, entity, pose);
    }

    for ghost in engine.effects().departing() {
        let rect = view.tile_rect(ghost.position);
        actors::draw_actor(
            canvas,
            &ghost.entity,
            ActorPose {
                center: rect.center(),
                tile_size: rect.size,
                alpha: ghost.alpha,
                scale: ghost.scale,
                flashing: false,
                eyes_open: true,
                eye_offset: 0.0,
            },
        );
    }
}

/// Draws a text panel in the top-left corner on top of an already painted frame.
pub fn paint_info_panel(frame: &mut [u8], width: u32, height: u32, lines: &[String]) {
    if frame.len() != width as usize * height as usize * 4 {
        return;
    }
    let mut canvas = Canvas::new(frame, width, height);
    overlay::draw_info_panel(&mut canvas, lines);
}

/// Convenience for headless hosts: allocates a frame and paints into it.
pub fn render_frame(engine: &GridEngine, width: u32, height: u32) -> Vec<u8> {
    let mut frame = vec![0u8; width as usize * height as usize * 4];
    paint_world(&mut frame, width, height, engine);
    frame
}
