use crate::world::Vec2;

pub const ZOOM_DEFAULT: f32 = 2.0;
pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 4.0;
pub const ZOOM_STEP: f32 = 0.25;
const FOLLOW_LERP: f32 = 0.08;
const ZOOM_LERP: f32 = 0.1;
const ZOOM_SNAP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    fn center(self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

/// Looks at `center` (world pixels) with `zoom` screen pixels per world pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    center: Vec2,
    zoom: f32,
    target_zoom: f32,
    zoom_animating: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(ZOOM_DEFAULT)
    }
}

impl Camera {
    pub fn new(zoom: f32) -> Self {
        let zoom = clamp_zoom(zoom);
        Self {
            center: Vec2::ZERO,
            zoom,
            target_zoom: zoom,
            zoom_animating: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn target_zoom(&self) -> f32 {
        self.target_zoom
    }

    pub fn snap_to(&mut self, world_px: Vec2) {
        self.center = world_px;
    }

    /// One tick of smoothing toward `world_px` plus any zoom animation.
    pub fn follow(&mut self, world_px: Vec2) {
        self.center = self.center.lerp(world_px, FOLLOW_LERP);
        if !self.zoom_animating {
            return;
        }
        let diff = self.target_zoom - self.zoom;
        self.zoom += diff * ZOOM_LERP;
        if diff.abs() < ZOOM_SNAP {
            self.zoom = self.target_zoom;
            self.zoom_animating = false;
        }
    }

    pub fn set_zoom(&mut self, level: f32, animate: bool) {
        self.target_zoom = clamp_zoom(level);
        if animate {
            self.zoom_animating = (self.target_zoom - self.zoom).abs() > f32::EPSILON;
        } else {
            self.zoom = self.target_zoom;
            self.zoom_animating = false;
        }
    }

    pub fn world_to_screen(&self, world_px: Vec2, viewport: Viewport, shake: Vec2) -> Vec2 {
        (world_px - self.center) * self.zoom + viewport.center() + shake
    }

    pub fn screen_to_world(&self, screen_px: Vec2, viewport: Viewport, shake: Vec2) -> Vec2 {
        (screen_px - viewport.center() - shake) * (1.0 / self.zoom) + self.center
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    if !zoom.is_finite() {
        return ZOOM_DEFAULT;
    }
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 800,
        height: 600,
    };

    #[test]
    fn center_maps_to_viewport_center() {
        let mut camera = Camera::new(2.0);
        camera.snap_to(Vec2::new(100.0, 50.0));

        let screen = camera.world_to_screen(Vec2::new(100.0, 50.0), VIEWPORT, Vec2::ZERO);
        assert_eq!(screen, Vec2::new(400.0, 300.0));

        let offset = camera.world_to_screen(Vec2::new(110.0, 40.0), VIEWPORT, Vec2::ZERO);
        assert_eq!(offset, Vec2::new(420.0, 280.0));
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let mut camera = Camera::new(1.5);
        camera.snap_to(Vec2::new(-30.0, 75.0));
        let shake = Vec2::new(3.0, -2.0);
        let world = Vec2::new(12.0, 140.0);

        let back = camera.screen_to_world(camera.world_to_screen(world, VIEWPORT, shake), VIEWPORT, shake);

        assert!((back.x - world.x).abs() < 1e-3);
        assert!((back.y - world.y).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.set_zoom(10.0, false);
        assert_eq!(camera.zoom(), ZOOM_MAX);
        camera.set_zoom(0.1, false);
        assert_eq!(camera.zoom(), ZOOM_MIN);
        camera.set_zoom(f32::NAN, false);
        assert_eq!(camera.zoom(), ZOOM_DEFAULT);
    }

    #[test]
    fn animated_zoom_converges_and_snaps() {
        let mut camera = Camera::default();
        camera.set_zoom(3.0, true);
        assert_eq!(camera.zoom(), ZOOM_DEFAULT);

        for _ in 0..200 {
            camera.follow(Vec2::ZERO);
        }

        assert_eq!(camera.zoom(), 3.0);
    }

    #[test]
    fn follow_moves_a_fraction_per_tick() {
        let mut camera = Camera::default();
        camera.follow(Vec2::new(100.0, 0.0));
        assert!((camera.center().x - 8.0).abs() < 1e-4);
    }
}
