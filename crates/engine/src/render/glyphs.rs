//! A 3x5 bitmap font for name plates and damage numbers. Each glyph packs its
//! five rows top to bottom into 15 bits, three bits per row, high bit first.
//! Lowercase letters render as uppercase; anything unmapped renders blank.

use super::frame::{Canvas, Rgba};

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;

const GLYPHS: &[(char, u16)] = &[
    ('!', 0b010010010000010),
    ('\'', 0b010010000000000),
    ('-', 0b000000111000000),
    ('.', 0b000000000000010),
    ('0', 0b111101101101111),
    ('1', 0b010110010010111),
    ('2', 0b111001111100111),
    ('3', 0b111001111001111),
    ('4', 0b101101111001001),
    ('5', 0b111100111001111),
    ('6', 0b111100111101111),
    ('7', 0b111001010010010),
    ('8', 0b111101111101111),
    ('9', 0b111101111001111),
    (':', 0b000010000010000),
    ('?', 0b111001011000010),
    ('A', 0b010101111101101),
    ('B', 0b110101110101110),
    ('C', 0b111100100100111),
    ('D', 0b110101101101110),
    ('E', 0b111100110100111),
    ('F', 0b111100110100100),
    ('G', 0b111100101101111),
    ('H', 0b101101111101101),
    ('I', 0b111010010010111),
    ('J', 0b111001001101111),
    ('K', 0b101101110101101),
    ('L', 0b100100100100111),
    ('M', 0b101111111101101),
    ('N', 0b101111111111101),
    ('O', 0b111101101101111),
    ('P', 0b110101110100100),
    ('Q', 0b111101101111001),
    ('R', 0b110101110101101),
    ('S', 0b111100111001111),
    ('T', 0b111010010010010),
    ('U', 0b101101101101111),
    ('V', 0b101101101101010),
    ('W', 0b101101111111101),
    ('X', 0b101101010101101),
    ('Y', 0b101101010010010),
    ('Z', 0b111001010100111),
];

fn glyph_bits(ch: char) -> u16 {
    let ch = ch.to_ascii_uppercase();
    GLYPHS
        .iter()
        .find(|(glyph, _)| *glyph == ch)
        .map_or(0, |(_, bits)| *bits)
}

pub(crate) fn text_height(scale: i32) -> i32 {
    GLYPH_HEIGHT * scale.max(1)
}

pub(crate) fn text_width(text: &str, scale: i32) -> i32 {
    let count = text.chars().count() as i32;
    if count == 0 {
        return 0;
    }
    let scale = scale.max(1);
    count * (GLYPH_WIDTH + 1) * scale - scale
}

pub(crate) fn draw_text(canvas: &mut Canvas<'_>, x: i32, y: i32, text: &str, scale: i32, color: Rgba) {
    let scale = scale.max(1);
    let mut pen_x = x;
    for ch in text.chars() {
        draw_glyph(canvas, pen_x, y, glyph_bits(ch), scale, color);
        pen_x += (GLYPH_WIDTH + 1) * scale;
    }
}

/// Text with a one-scale-unit dark outline, centered on `center_x`.
pub(crate) fn draw_text_centered_outlined(
    canvas: &mut Canvas<'_>,
    center_x: i32,
    top: i32,
    text: &str,
    scale: i32,
    color: Rgba,
    outline: Rgba,
) {
    let scale = scale.max(1);
    let left = center_x - text_width(text, scale) / 2;
    for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
        draw_text(canvas, left + dx * scale, top + dy * scale, text, scale, outline);
    }
    draw_text(canvas, left, top, text, scale, color);
}

fn draw_glyph(canvas: &mut Canvas<'_>, x: i32, y: i32, bits: u16, scale: i32, color: Rgba) {
    if bits == 0 {
        return;
    }
    for row in 0..GLYPH_HEIGHT {
        for col in 0..GLYPH_WIDTH {
            let bit = GLYPH_WIDTH * GLYPH_HEIGHT - 1 - (row * GLYPH_WIDTH + col);
            if bits & (1 << bit) == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    canvas.blend_pixel(x + col * scale + sx, y + row * scale + sy, color);
                }
            }
        }
    }
}
