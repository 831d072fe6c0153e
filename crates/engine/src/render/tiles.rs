use std::f32::consts::TAU;

use crate::world::{catalog, GridPos, Terrain, TileId};

use super::frame::{rgba, Canvas};

/// Tile art is laid out on a 32-unit square and scaled to the on-screen size.
pub(crate) const DESIGN_TILE_UNITS: f32 = 32.0;
const GRID_LINE_ALPHA: f32 = 0.15;

/// Tile-keyed generator so the same cell always gets the same cracks,
/// ripples and bubbles.
pub(crate) fn detail_rng(pos: GridPos) -> fastrand::Rng {
    fastrand::Rng::with_seed((pos.x as i64 * 1000 + pos.y as i64) as u64)
}

/// Screen placement of one tile: top-left corner plus edge length in pixels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TileRect {
    pub(crate) left: f32,
    pub(crate) top: f32,
    pub(crate) size: f32,
}

impl TileRect {
    pub(crate) fn unit(&self) -> f32 {
        self.size / DESIGN_TILE_UNITS
    }

    /// Screen point for design-space coordinates.
    pub(crate) fn at(&self, x: f32, y: f32) -> (f32, f32) {
        let unit = self.unit();
        (self.left + x * unit, self.top + y * unit)
    }

    pub(crate) fn center(&self) -> (f32, f32) {
        (self.left + self.size * 0.5, self.top + self.size * 0.5)
    }
}

pub(crate) fn draw_tile(canvas: &mut Canvas<'_>, tile: TileId, pos: GridPos, rect: TileRect) {
    canvas.fill_rect(
        rect.left,
        rect.top,
        rect.size,
        rect.size,
        rgba(catalog::tile_color(tile), 1.0),
    );
    let mut rng = detail_rng(pos);
    match tile.terrain() {
        Terrain::Floor | Terrain::Path => draw_floor_detail(canvas, tile, rect, &mut rng),
        Terrain::Wall => draw_wall_detail(canvas, rect, &mut rng),
        Terrain::Water => draw_water_detail(canvas, tile, rect, &mut rng),
        Terrain::Lava => draw_lava_detail(canvas, rect, &mut rng),
        Terrain::Door | Terrain::Gate => draw_door_detail(canvas, tile, rect),
        Terrain::Stairs => draw_stairs_detail(canvas, tile, rect),
        Terrain::Pit => {
            let (cx, cy) = rect.center();
            canvas.fill_circle(cx, cy, rect.size * 0.38, rgba(0x000000, 0.6));
        }
        Terrain::Bridge => {
            for plank in 0..4 {
                let y = 2.0 + plank as f32 * 8.0;
                let (x0, y0) = rect.at(0.0, y);
                let (x1, _) = rect.at(32.0, y);
                canvas.line((x0, y0), (x1, y0), rgba(0x000000, 0.3));
            }
        }
        Terrain::Void | Terrain::Ice | Terrain::Unknown => {}
    }
    canvas.stroke_rect(
        rect.left,
        rect.top,
        rect.size,
        rect.size,
        1.0,
        rgba(0x000000, GRID_LINE_ALPHA),
    );
}

fn draw_floor_detail(
    canvas: &mut Canvas<'_>,
    tile: TileId,
    rect: TileRect,
    rng: &mut fastrand::Rng,
) {
    let unit = rect.unit();
    let detail_count = 3 + (rng.f32() * 4.0) as u32;
    for _ in 0..detail_count {
        let (px, py) = rect.at(rng.f32() * 26.0 + 3.0, rng.f32() * 26.0 + 3.0);
        let radius = (1.0 + rng.f32() * 1.5) * unit;
        if rng.f32() > 0.5 {
            let alpha = 0.1 + rng.f32() * 0.15;
            canvas.fill_circle(px, py, radius, rgba(0x000000, alpha));
        } else {
            let angle = rng.f32() * TAU;
            let length = (3.0 + rng.f32() * 5.0) * unit;
            canvas.line(
                (px, py),
                (px + angle.cos() * length, py + angle.sin() * length),
                rgba(0x000000, 0.1),
            );
        }
    }

    if tile == TileId::FLOOR_COBBLE {
        for row in 0..2 {
            for col in 0..2 {
                let (x, y) = rect.at(col as f32 * 16.0 + 2.0, row as f32 * 16.0 + 2.0);
                canvas.stroke_rect(x, y, 12.0 * unit, 12.0 * unit, 1.0, rgba(0x000000, 0.2));
            }
        }
    }

    if tile == TileId::FLOOR_GRASS {
        for _ in 0..5 {
            let (bx, by) = rect.at(rng.f32() * 32.0, rng.f32() * 32.0);
            let lean = (rng.f32() - 0.5) * 4.0 * unit;
            let height = (4.0 + rng.f32() * 4.0) * unit;
            canvas.line((bx, by), (bx + lean, by - height), rgba(0x2a5a2a, 0.4));
        }
    }
}

fn draw_wall_detail(canvas: &mut Canvas<'_>, rect: TileRect, rng: &mut fastrand::Rng) {
    let unit = rect.unit();
    let brick_height = DESIGN_TILE_UNITS / 3.0;
    for row in 0..3 {
        let offset = if row % 2 == 0 { 0.0 } else { 8.0 };
        for col in -1..3 {
            let bx = offset + col as f32 * 16.0;
            let by = row as f32 * brick_height;
            let left = bx.max(0.0) + 1.0;
            let right = (bx + 15.0).min(31.0);
            if right <= left {
                continue;
            }
            let (x, y) = rect.at(left, by + 1.0);
            canvas.stroke_rect(
                x,
                y,
                (right - left) * unit,
                (brick_height - 2.0) * unit,
                1.0,
                rgba(0x000000, 0.25),
            );
        }
    }

    let (left, top) = rect.at(0.0, 0.0);
    canvas.fill_rect(left, top, rect.size, 2.0 * unit, rgba(0xffffff, 0.08));
    canvas.fill_rect(
        left,
        top + rect.size - 2.0 * unit,
        rect.size,
        2.0 * unit,
        rgba(0x000000, 0.3),
    );

    if rng.f32() > 0.7 {
        let (cx, cy) = rect.at(rng.f32() * 32.0, rng.f32() * 32.0);
        let dx = (rng.f32() - 0.5) * 8.0 * unit;
        let dy = rng.f32() * 8.0 * unit;
        canvas.line((cx, cy), (cx + dx, cy + dy), rgba(0x000000, 0.3));
    }
}

fn draw_water_detail(
    canvas: &mut Canvas<'_>,
    tile: TileId,
    rect: TileRect,
    rng: &mut fastrand::Rng,
) {
    let wave_color = if tile == TileId::WATER_DEEP {
        0x0a2a5a
    } else {
        0x5a9ad9
    };
    for wave in 0..3 {
        let base_y = 8.0 + wave as f32 * 10.0 + rng.f32() * 5.0;
        let mut previous = rect.at(0.0, base_y);
        let mut x = 4.0;
        while x <= DESIGN_TILE_UNITS {
            let next = rect.at(x, base_y + (x * 0.3 + wave as f32).sin() * 2.0);
            canvas.line(previous, next, rgba(wave_color, 0.3));
            previous = next;
            x += 4.0;
        }
    }
    for _ in 0..2 {
        let (sx, sy) = rect.at(rng.f32() * 32.0, rng.f32() * 32.0);
        canvas.fill_circle(sx, sy, rect.unit().max(0.75), rgba(0xffffff, 0.3));
    }
}

fn draw_lava_detail(canvas: &mut Canvas<'_>, rect: TileRect, rng: &mut fastrand::Rng) {
    let unit = rect.unit();
    for _ in 0..3 {
        let (bx, by) = rect.at(rng.f32() * 24.0 + 4.0, rng.f32() * 24.0 + 4.0);
        let radius = (2.0 + rng.f32() * 3.0) * unit;
        canvas.fill_circle(bx, by, radius, rgba(0xff6600, 0.6));
        canvas.fill_circle(
            bx - radius * 0.3,
            by - radius * 0.3,
            radius * 0.3,
            rgba(0xffff00, 0.5),
        );
    }
    for _ in 0..2 {
        let (cx, cy) = rect.at(rng.f32() * 32.0, rng.f32() * 32.0);
        let dx = (rng.f32() - 0.5) * 15.0 * unit;
        let dy = (rng.f32() - 0.5) * 15.0 * unit;
        canvas.line((cx, cy), (cx + dx, cy + dy), rgba(0xffff00, 0.4));
    }
}

fn draw_door_detail(canvas: &mut Canvas<'_>, tile: TileId, rect: TileRect) {
    let unit = rect.unit();
    match tile {
        TileId::GATE_CLOSED => {
            for bar in 0..4 {
                let (x, y) = rect.at(6.0 + bar as f32 * 7.0, 2.0);
                canvas.fill_rect(x, y, 2.0 * unit, 28.0 * unit, rgba(0x555555, 1.0));
            }
            let (x, y) = rect.at(2.0, 14.0);
            canvas.fill_rect(x, y, 28.0 * unit, 4.0 * unit, rgba(0x444444, 1.0));
        }
        TileId::DOOR_CLOSED | TileId::DOOR_LOCKED => {
            let locked = tile == TileId::DOOR_LOCKED;
            let (x, y) = rect.at(6.4, 2.0);
            canvas.fill_rect(x, y, 19.2 * unit, 28.0 * unit, rgba(0x5c3a21, 1.0));
            for panel_top in [5.0, 18.0] {
                let (x, y) = rect.at(8.0, panel_top);
                canvas.stroke_rect(
                    x,
                    y,
                    16.0 * unit,
                    6.7 * unit,
                    2.0 * unit,
                    rgba(0x3a2510, 1.0),
                );
            }
            let (hx, hy) = rect.at(20.8, 16.0);
            let handle = if locked { 0xcc8833 } else { 0x888888 };
            canvas.fill_circle(hx, hy, 3.0 * unit, rgba(handle, 1.0));
            if locked {
                canvas.fill_circle(hx, hy + 8.0 * unit, 2.0 * unit, rgba(0x222222, 1.0));
            }
        }
        _ => {}
    }
}

fn draw_stairs_detail(canvas: &mut Canvas<'_>, tile: TileId, rect: TileRect) {
    let unit = rect.unit();
    let descending = tile == TileId::STAIRS_DOWN;
    let steps = 4;
    let step_height = DESIGN_TILE_UNITS / steps as f32;
    for step in 0..steps {
        let slot = if descending { step } else { steps - 1 - step };
        let brightness = if descending {
            0.8 - step as f32 * 0.15
        } else {
            0.5 + step as f32 * 0.15
        };
        let grey = (brightness * 90.0) as u32;
        let color = grey * 0x010101 + 0x303040;
        let (x, y) = rect.at(2.0, slot as f32 * step_height);
        canvas.fill_rect(x, y, 28.0 * unit, (step_height - 1.0) * unit, rgba(color, 1.0));
        let (x1, _) = rect.at(30.0, 0.0);
        canvas.line((x, y), (x1, y), rgba(0xffffff, 0.1));
    }

    let (tip_y, direction) = if descending { (24.0, 1.0) } else { (8.0, -1.0) };
    canvas.fill_triangle(
        rect.at(16.0, tip_y),
        rect.at(11.0, tip_y - 5.0 * direction),
        rect.at(21.0, tip_y - 5.0 * direction),
        rgba(0xffffff, 0.3),
    );
}
