use crate::effects::{FloatingText, ScreenFlash};
use crate::visibility::VisibilityState;
use crate::world::GridPos;

use super::frame::{rgba, Canvas};
use super::glyphs;
use super::tiles::TileRect;

const FOG_SKIP_ALPHA: f32 = 0.01;
const PANEL_TEXT_SCALE: i32 = 2;
const PANEL_MARGIN: i32 = 8;
const PANEL_INSET: i32 = 6;
const PANEL_BG: u32 = 0x0a0c10;
const PANEL_BORDER: u32 = 0x5c6a7e;
const PANEL_TEXT: u32 = 0xf4f8fc;

pub(crate) fn draw_floating_text(
    canvas: &mut Canvas<'_>,
    text: &FloatingText,
    anchor: TileRect,
    zoom: f32,
) {
    let alpha = text.alpha();
    if alpha <= 0.0 {
        return;
    }
    let scale_factor = if text.large { 3.0 } else { 2.0 };
    let scale = (scale_factor * zoom).round().max(1.0) as i32;
    let (cx, _) = anchor.center();
    let top = anchor.top - text.rise_px() * zoom - glyphs::text_height(scale) as f32 * 0.5;
    glyphs::draw_text_centered_outlined(
        canvas,
        cx.round() as i32,
        top.round() as i32,
        &text.text,
        scale,
        rgba(text.color, alpha),
        rgba(0x000000, alpha),
    );
}

/// Darkens one tile according to its explored and lit state.
pub(crate) fn draw_fog_cell(
    canvas: &mut Canvas<'_>,
    visibility: &VisibilityState,
    tile: GridPos,
    rect: TileRect,
) {
    let cell = visibility.fog_cell(tile);
    if cell.alpha <= FOG_SKIP_ALPHA {
        return;
    }
    canvas.fill_rect(
        rect.left,
        rect.top,
        rect.size,
        rect.size,
        rgba(cell.color, cell.alpha),
    );
}

pub(crate) fn draw_screen_flash(canvas: &mut Canvas<'_>, flash: ScreenFlash) {
    let (width, height) = (canvas.width() as f32, canvas.height() as f32);
    canvas.fill_rect(0.0, 0.0, width, height, rgba(flash.color, flash.alpha));
}

/// Top-left text panel used by the windowed runner's debug overlay.
pub(crate) fn draw_info_panel(canvas: &mut Canvas<'_>, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let line_advance = glyphs::text_height(PANEL_TEXT_SCALE) + 2 * PANEL_TEXT_SCALE;
    let widest = lines
        .iter()
        .map(|line| glyphs::text_width(line, PANEL_TEXT_SCALE))
        .max()
        .unwrap_or(0);
    let left = PANEL_MARGIN as f32;
    let top = PANEL_MARGIN as f32;
    let width = (widest + PANEL_INSET * 2) as f32;
    let height = (lines.len() as i32 * line_advance + PANEL_INSET * 2 - 2 * PANEL_TEXT_SCALE) as f32;
    canvas.fill_rect(left, top, width, height, rgba(PANEL_BG, 0.82));
    canvas.stroke_rect(left, top, width, height, 1.0, rgba(PANEL_BORDER, 1.0));

    let mut y = PANEL_MARGIN + PANEL_INSET;
    for line in lines {
        glyphs::draw_text(
            canvas,
            PANEL_MARGIN + PANEL_INSET,
            y,
            line,
            PANEL_TEXT_SCALE,
            rgba(PANEL_TEXT, 1.0),
        );
        y += line_advance;
    }
}
