use crate::world::catalog::{self, object_types, ObjectCategory};
use crate::world::{ObjectState, RoomObject};

use super::frame::{rgba, scale_rgb, Canvas};
use super::tiles::TileRect;

pub(crate) fn draw_object(canvas: &mut Canvas<'_>, object: &RoomObject, rect: TileRect, glow_alpha: f32) {
    let color = catalog::object_color(object.type_id);
    match catalog::object_category(object.type_id) {
        ObjectCategory::Container => draw_container(canvas, object, rect, color),
        ObjectCategory::Furniture => draw_furniture(canvas, object.type_id, rect, color),
        ObjectCategory::Light => draw_light(canvas, object.type_id, rect, color, glow_alpha),
        ObjectCategory::Feature => draw_feature(canvas, object.type_id, rect, color),
        ObjectCategory::Loot => draw_loot(canvas, object.type_id, rect, color),
        ObjectCategory::Trap => draw_trap(canvas, object.type_id, rect, color),
        ObjectCategory::Other => {
            let (cx, cy) = rect.center();
            canvas.fill_circle(cx, cy, rect.size / 3.0, rgba(color, 1.0));
        }
    }
}

fn draw_container(canvas: &mut Canvas<'_>, object: &RoomObject, rect: TileRect, color: u32) {
    let unit = rect.unit();
    let open = object.state == Some(ObjectState::Open) || object.type_id == object_types::CHEST_OPEN;
    let locked =
        object.state == Some(ObjectState::Locked) || object.type_id == object_types::CHEST_LOCKED;

    let (x, y) = rect.at(4.0, 12.8);
    canvas.fill_rect(x, y, 24.0 * unit, 16.0 * unit, rgba(color, 1.0));
    canvas.stroke_rect(x, y, 24.0 * unit, 16.0 * unit, 2.0 * unit, rgba(0x000000, 0.4));

    if open {
        let (x, y) = rect.at(3.0, 3.2);
        canvas.fill_rect(x, y, 26.0 * unit, 4.8 * unit, rgba(color, 0.8));
    } else {
        let (x, y) = rect.at(3.0, 8.0);
        canvas.fill_rect(x, y, 26.0 * unit, 6.4 * unit, rgba(color, 1.0));
        canvas.stroke_rect(x, y, 26.0 * unit, 6.4 * unit, 1.0, rgba(0x000000, 0.3));
        let (lx, ly) = rect.at(16.0, 17.6);
        let lock = if locked { 0xddaa00 } else { 0x666666 };
        canvas.fill_circle(lx, ly, 4.0 * unit, rgba(lock, 1.0));
        if locked {
            canvas.fill_circle(lx, ly, 1.5 * unit, rgba(0x222222, 1.0));
        }
    }

    for band_x in [6.4, 23.6] {
        let (x, y) = rect.at(band_x, 13.4);
        canvas.fill_rect(x, y, 2.0 * unit, 14.4 * unit, rgba(0x444444, 1.0));
    }
    canvas.line(rect.at(6.0, 13.4), rect.at(26.0, 13.4), rgba(0xffffff, 0.2));
}

fn draw_furniture(canvas: &mut Canvas<'_>, type_id: u16, rect: TileRect, color: u32) {
    let unit = rect.unit();
    let shade = |factor: f32| rgba(scale_rgb(color, factor), 1.0);
    match type_id {
        object_types::TABLE => {
            let (x, y) = rect.at(2.0, 11.2);
            canvas.fill_rect(x, y, 28.0 * unit, 3.2 * unit, shade(1.0));
            for leg_x in [4.0, 25.0] {
                let (x, y) = rect.at(leg_x, 14.4);
                canvas.fill_rect(x, y, 3.0 * unit, 14.4 * unit, shade(0.8));
            }
        }
        object_types::CHAIR => {
            let (x, y) = rect.at(6.4, 16.0);
            canvas.fill_rect(x, y, 19.2 * unit, 3.2 * unit, shade(1.0));
            let (x, y) = rect.at(6.4, 6.4);
            canvas.fill_rect(x, y, 3.2 * unit, 11.2 * unit, shade(1.0));
            for leg_x in [8.0, 22.4] {
                let (x, y) = rect.at(leg_x, 19.2);
                canvas.fill_rect(x, y, 3.0 * unit, 11.2 * unit, shade(0.7));
            }
        }
        object_types::BED => {
            let (x, y) = rect.at(2.0, 9.6);
            canvas.fill_rect(x, y, 28.0 * unit, 19.2 * unit, rgba(0x5a3a2a, 1.0));
            let (x, y) = rect.at(4.0, 11.2);
            canvas.fill_rect(x, y, 24.0 * unit, 16.0 * unit, rgba(0x8b4040, 1.0));
            let (x, y) = rect.at(5.0, 12.2);
            canvas.fill_rect(x, y, 9.6 * unit, 6.4 * unit, rgba(0xccccaa, 1.0));
        }
        object_types::BOOKSHELF => {
            let (x, y) = rect.at(3.0, 2.0);
            canvas.fill_rect(x, y, 26.0 * unit, 28.0 * unit, shade(1.0));
            for shelf in 0..3 {
                let (x, y) = rect.at(5.0, 4.0 + shelf as f32 * 9.0);
                canvas.fill_rect(x, y, 22.0 * unit, 6.0 * unit, shade(0.5));
            }
        }
        _ => {
            let (cx, cy) = rect.center();
            canvas.fill_circle(cx, cy, rect.size / 3.0, shade(1.0));
        }
    }
}

fn draw_light(canvas: &mut Canvas<'_>, type_id: u16, rect: TileRect, color: u32, glow_alpha: f32) {
    let unit = rect.unit();
    let (cx, cy) = rect.center();
    if let Some(profile) = catalog::light_profile(type_id) {
        let radius = profile.radius * rect.size / 4.0;
        canvas.fill_circle(cx, cy, radius, rgba(profile.color, glow_alpha * 0.75));
        canvas.fill_circle(cx, cy, radius * 0.6, rgba(profile.color, glow_alpha * 0.5));
    }

    match type_id {
        object_types::TORCH_WALL | object_types::TORCH_GROUND => {
            let (x, y) = rect.at(14.0, 12.8);
            canvas.fill_rect(x, y, 4.0 * unit, 16.0 * unit, rgba(0x5a3a2a, 1.0));
            canvas.fill_triangle(
                rect.at(16.0, 4.8),
                rect.at(11.0, 12.8),
                rect.at(21.0, 12.8),
                rgba(0xff6622, 1.0),
            );
            canvas.fill_triangle(
                rect.at(16.0, 7.0),
                rect.at(13.0, 12.2),
                rect.at(19.0, 12.2),
                rgba(0xffcc00, 1.0),
            );
        }
        object_types::CAMPFIRE => {
            let (x, y) = rect.at(6.4, 22.4);
            canvas.fill_rect(x, y, 19.2 * unit, 4.0 * unit, rgba(0x4a2a1a, 1.0));
            let (x, y) = rect.at(8.0, 20.8);
            canvas.fill_rect(x, y, 16.0 * unit, 4.0 * unit, rgba(0x3a1a0a, 1.0));
            for flame in 0..3 {
                let fx = 9.6 + flame as f32 * 6.4;
                canvas.fill_triangle(
                    rect.at(fx, 8.0),
                    rect.at(fx - 4.0, 19.2),
                    rect.at(fx + 4.0, 19.2),
                    rgba(0xff5500, 1.0),
                );
            }
        }
        _ => canvas.fill_circle(cx, cy, 6.0 * unit, rgba(color, 1.0)),
    }
}

fn draw_feature(canvas: &mut Canvas<'_>, type_id: u16, rect: TileRect, color: u32) {
    let unit = rect.unit();
    let (cx, cy) = rect.center();
    match type_id {
        object_types::ALTAR => {
            let (x, y) = rect.at(4.8, 19.2);
            canvas.fill_rect(x, y, 22.4 * unit, 11.2 * unit, rgba(0x555566, 1.0));
            let (x, y) = rect.at(3.2, 16.0);
            canvas.fill_rect(x, y, 25.6 * unit, 4.8 * unit, rgba(0x666677, 1.0));
            for candle_x in [6.4, 24.6] {
                let (x, y) = rect.at(candle_x, 11.2);
                canvas.fill_rect(x, y, 3.0 * unit, 4.8 * unit, rgba(0xcccc99, 1.0));
                let (fx, fy) = rect.at(candle_x + 1.5, 10.2);
                canvas.fill_circle(fx, fy, 2.0 * unit, rgba(0xff9933, 1.0));
            }
        }
        object_types::FOUNTAIN => {
            canvas.fill_circle(cx, cy, rect.size * 0.4, rgba(0x556688, 1.0));
            canvas.fill_circle(cx, cy, rect.size * 0.3, rgba(0x4488cc, 1.0));
            canvas.fill_circle(cx, cy, 4.0 * unit, rgba(0x667788, 1.0));
        }
        object_types::LEVER => {
            let (x, y) = rect.at(11.2, 22.4);
            canvas.fill_rect(x, y, 9.6 * unit, 8.0 * unit, rgba(0x444444, 1.0));
            let (x, y) = rect.at(14.4, 9.6);
            canvas.fill_rect(x, y, 4.0 * unit, 14.4 * unit, rgba(0x666666, 1.0));
            let (hx, hy) = rect.at(16.0, 9.6);
            canvas.fill_circle(hx, hy, 4.0 * unit, rgba(0x888888, 1.0));
        }
        object_types::PRESSURE_PLATE => {
            let (x, y) = rect.at(5.0, 5.0);
            canvas.fill_rect(x, y, 22.0 * unit, 22.0 * unit, rgba(color, 1.0));
            canvas.stroke_rect(x, y, 22.0 * unit, 22.0 * unit, 1.0, rgba(0x000000, 0.4));
        }
        _ => canvas.fill_circle(cx, cy, rect.size / 3.0, rgba(color, 1.0)),
    }
}

fn draw_loot(canvas: &mut Canvas<'_>, type_id: u16, rect: TileRect, color: u32) {
    let unit = rect.unit();
    match type_id {
        object_types::GOLD_PILE => {
            for coin in 0..6 {
                let (x, y) = rect.at(
                    9.6 + (coin % 3) as f32 * 6.4,
                    16.0 + (coin / 3) as f32 * 4.8,
                );
                canvas.fill_circle(x, y, 4.0 * unit, rgba(0xffd700, 1.0));
                canvas.stroke_circle(x, y, 4.0 * unit, 1.0, rgba(0xaa8800, 1.0));
            }
        }
        object_types::POTION => {
            let (x, y) = rect.at(11.2, 12.8);
            canvas.fill_rect(x, y, 9.6 * unit, 16.0 * unit, rgba(0xff4444, 1.0));
            let (x, y) = rect.at(13.4, 9.6);
            canvas.fill_rect(x, y, 5.1 * unit, 4.8 * unit, rgba(0x666666, 1.0));
            let (x, y) = rect.at(14.1, 7.0);
            canvas.fill_rect(x, y, 3.8 * unit, 3.2 * unit, rgba(0x8b5a2b, 1.0));
            let (sx, sy) = rect.at(13.4, 17.6);
            canvas.fill_circle(sx, sy, 2.0 * unit, rgba(0xffffff, 0.4));
        }
        _ => {
            let (cx, cy) = rect.center();
            canvas.fill_circle(cx, cy, rect.size / 4.0, rgba(color, 1.0));
        }
    }
}

fn draw_trap(canvas: &mut Canvas<'_>, type_id: u16, rect: TileRect, color: u32) {
    let unit = rect.unit();
    match type_id {
        object_types::TRAP_SPIKE => {
            canvas.fill_rect(rect.left, rect.top, rect.size, rect.size, rgba(0x3a3a4a, 1.0));
            for i in 0..3 {
                for j in 0..3 {
                    let (hx, hy) = rect.at(6.0 + i as f32 * 10.0, 6.0 + j as f32 * 10.0);
                    canvas.fill_circle(hx, hy, 3.0 * unit, rgba(0x1a1a2a, 1.0));
                }
            }
        }
        object_types::TRAP_FIRE => {
            canvas.fill_rect(rect.left, rect.top, rect.size, rect.size, rgba(0x3a2a2a, 1.0));
            for vent in 0..4 {
                let (x, y) = rect.at(4.0 + vent as f32 * 7.0, 4.0);
                canvas.fill_rect(x, y, 4.0 * unit, 24.0 * unit, rgba(0x222222, 1.0));
            }
        }
        _ => {
            let (cx, cy) = rect.center();
            canvas.fill_circle(cx, cy, rect.size / 4.0, rgba(color, 0.6));
        }
    }
}
