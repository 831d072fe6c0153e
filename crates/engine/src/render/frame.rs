//! RGBA8 raster primitives. Every write is bounds-checked; shapes that fall
//! partly or fully outside the frame are clipped, never panicking.

pub(crate) type Rgba = [u8; 4];

pub(crate) fn rgba(hex: u32, alpha: f32) -> Rgba {
    let alpha = if alpha.is_finite() {
        alpha.clamp(0.0, 1.0)
    } else {
        0.0
    };
    [
        (hex >> 16) as u8,
        (hex >> 8) as u8,
        hex as u8,
        (alpha * 255.0).round() as u8,
    ]
}

/// Per-channel multiply, the way a sprite tint darkens toward `tint`.
pub(crate) fn tint_rgb(hex: u32, tint: u32) -> u32 {
    let channel = |shift: u32| {
        let a = (hex >> shift) & 0xff;
        let b = (tint >> shift) & 0xff;
        ((a * b + 127) / 255) << shift
    };
    channel(16) | channel(8) | channel(0)
}

pub(crate) fn scale_rgb(hex: u32, factor: f32) -> u32 {
    let factor = factor.clamp(0.0, 1.0);
    let channel = |shift: u32| {
        let value = ((hex >> shift) & 0xff) as f32 * factor;
        (value.round() as u32).min(0xff) << shift
    };
    channel(16) | channel(8) | channel(0)
}

pub(crate) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn clear(&mut self, color: Rgba) {
        let opaque = [color[0], color[1], color[2], 255];
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&opaque);
        }
    }

    pub(crate) fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let alpha = u32::from(color[3]);
        if alpha == 0 {
            return;
        }
        let Some(pixel_offset) = (y as usize)
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x as usize))
        else {
            return;
        };
        let Some(byte_offset) = pixel_offset.checked_mul(4) else {
            return;
        };
        let Some(pixel) = self.frame.get_mut(byte_offset..byte_offset + 4) else {
            return;
        };
        if alpha == 255 {
            pixel.copy_from_slice(&[color[0], color[1], color[2], 255]);
            return;
        }
        let inverse = 255 - alpha;
        for channel in 0..3 {
            let src = u32::from(color[channel]);
            let dst = u32::from(pixel[channel]);
            pixel[channel] = ((src * alpha + dst * inverse + 127) / 255) as u8;
        }
        pixel[3] = 255;
    }

    /// Fills the pixels whose centers fall inside `[left, left + w) x [top, top + h)`.
    /// Adjacent rects with shared edges never overlap.
    pub(crate) fn fill_rect(&mut self, left: f32, top: f32, w: f32, h: f32, color: Rgba) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = (left.round() as i32).max(0);
        let y0 = (top.round() as i32).max(0);
        let x1 = ((left + w).round() as i32).min(self.width as i32);
        let y1 = ((top + h).round() as i32).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color);
            }
        }
    }

    pub(crate) fn stroke_rect(
        &mut self,
        left: f32,
        top: f32,
        w: f32,
        h: f32,
        thickness: f32,
        color: Rgba,
    ) {
        let t = thickness.max(1.0).min(w.min(h) * 0.5).max(1.0);
        self.fill_rect(left, top, w, t, color);
        self.fill_rect(left, top + h - t, w, t, color);
        self.fill_rect(left, top + t, t, h - 2.0 * t, color);
        self.fill_rect(left + w - t, top + t, t, h - 2.0 * t, color);
    }

    pub(crate) fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        self.fill_ellipse(cx, cy, radius, radius, color);
    }

    pub(crate) fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Rgba) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (x0, x1) = self.clamp_span_x(cx - rx, cx + rx);
        let (y0, y1) = self.clamp_span_y(cy - ry, cy + ry);
        for y in y0..y1 {
            let dy = (y as f32 + 0.5 - cy) / ry;
            for x in x0..x1 {
                let dx = (x as f32 + 0.5 - cx) / rx;
                if dx * dx + dy * dy <= 1.0 {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    pub(crate) fn stroke_circle(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        thickness: f32,
        color: Rgba,
    ) {
        let half = thickness.max(1.0) * 0.5;
        let outer = radius + half;
        let inner = (radius - half).max(0.0);
        let (x0, x1) = self.clamp_span_x(cx - outer, cx + outer);
        let (y0, y1) = self.clamp_span_y(cy - outer, cy + outer);
        for y in y0..y1 {
            let dy = y as f32 + 0.5 - cy;
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                let distance_sq = dx * dx + dy * dy;
                if distance_sq <= outer * outer && distance_sq >= inner * inner {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    pub(crate) fn fill_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Rgba) {
        let area = edge(a, b, c);
        if area.abs() <= f32::EPSILON {
            return;
        }
        let (x0, x1) = self.clamp_span_x(a.0.min(b.0).min(c.0), a.0.max(b.0).max(c.0));
        let (y0, y1) = self.clamp_span_y(a.1.min(b.1).min(c.1), a.1.max(b.1).max(c.1));
        for y in y0..y1 {
            for x in x0..x1 {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(b, c, p) * area.signum();
                let w1 = edge(c, a, p) * area.signum();
                let w2 = edge(a, b, p) * area.signum();
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// One-pixel line between two points, Bresenham style.
    pub(crate) fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba) {
        let (mut x, mut y) = (from.0.floor() as i32, from.1.floor() as i32);
        let (x_end, y_end) = (to.0.floor() as i32, to.1.floor() as i32);
        let dx = (x_end - x).abs();
        let dy = -(y_end - y).abs();
        let step_x = if x < x_end { 1 } else { -1 };
        let step_y = if y < y_end { 1 } else { -1 };
        let mut error = dx + dy;
        loop {
            self.blend_pixel(x, y, color);
            if x == x_end && y == y_end {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x += step_x;
            }
            if doubled <= dx {
                error += dx;
                y += step_y;
            }
        }
    }

    fn clamp_span_x(&self, min: f32, max: f32) -> (i32, i32) {
        clamp_span(min, max, self.width)
    }

    fn clamp_span_y(&self, min: f32, max: f32) -> (i32, i32) {
        clamp_span(min, max, self.height)
    }
}

fn clamp_span(min: f32, max: f32, limit: u32) -> (i32, i32) {
    if !min.is_finite() || !max.is_finite() {
        return (0, 0);
    }
    let start = (min.floor() as i32).max(0);
    let end = (max.ceil() as i32 + 1).min(limit as i32);
    (start, end.max(start))
}

fn edge(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn rgba_splits_hex_and_clamps_alpha() {
        assert_eq!(rgba(0x336699, 1.0), [0x33, 0x66, 0x99, 255]);
        assert_eq!(rgba(0x336699, 2.0)[3], 255);
        assert_eq!(rgba(0x336699, f32::NAN)[3], 0);
    }

    #[test]
    fn tint_multiplies_channels() {
        assert_eq!(tint_rgb(0xffffff, 0xff6666), 0xff6666);
        assert_eq!(tint_rgb(0x000000, 0xff6666), 0x000000);
    }

    #[test]
    fn half_alpha_blends_toward_source() {
        let mut frame = vec![0u8; 4];
        let mut canvas = Canvas::new(&mut frame, 1, 1);
        canvas.clear([0, 0, 0, 255]);
        canvas.blend_pixel(0, 0, [200, 100, 0, 128]);
        assert_eq!(pixel(&frame, 1, 0, 0), [100, 50, 0, 255]);
    }

    #[test]
    fn adjacent_rects_share_edges_without_overlap() {
        let mut frame = vec![0u8; 8 * 4];
        let mut canvas = Canvas::new(&mut frame, 8, 1);
        canvas.clear([0, 0, 0, 255]);
        canvas.fill_rect(0.0, 0.0, 2.6, 1.0, [255, 0, 0, 128]);
        canvas.fill_rect(2.6, 0.0, 2.6, 1.0, [255, 0, 0, 128]);
        let reds: Vec<u8> = (0..8).map(|x| pixel(&frame, 8, x, 0)[0]).collect();
        assert_eq!(reds, vec![128, 128, 128, 128, 128, 0, 0, 0]);
    }

    #[test]
    fn shapes_outside_the_frame_are_clipped() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);
        canvas.fill_circle(-10.0, -10.0, 30.0, [255, 255, 255, 255]);
        canvas.fill_rect(-5.0, 2.0, 100.0, 100.0, [255, 255, 255, 255]);
        canvas.stroke_circle(100.0, 100.0, 3.0, 2.0, [255, 255, 255, 255]);
        canvas.fill_triangle((-4.0, 0.0), (9.0, 0.0), (2.0, 9.0), [255, 255, 255, 255]);
        canvas.line((-3.0, -3.0), (6.0, 6.0), [255, 255, 255, 255]);
        assert_eq!(frame.len(), 64);
    }

    #[test]
    fn circle_fills_center_but_not_corners() {
        let mut frame = vec![0u8; 9 * 9 * 4];
        let mut canvas = Canvas::new(&mut frame, 9, 9);
        canvas.fill_circle(4.5, 4.5, 3.0, [255, 255, 255, 255]);
        assert_eq!(pixel(&frame, 9, 4, 4)[0], 255);
        assert_eq!(pixel(&frame, 9, 0, 0)[0], 0);
        assert_eq!(pixel(&frame, 9, 8, 8)[0], 0);
    }
}
