use serde::{Deserialize, Serialize};

use crate::camera::{Viewport, ZOOM_DEFAULT};

pub const DEFAULT_TILE_SIZE: u32 = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub tile_size: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub zoom: f32,
    pub edit_mode: bool,
    /// Blinking, bobbing and glow pulses. Purely cosmetic.
    pub idle_animation: bool,
    /// Seed for cosmetic randomness (blink timers, shake jitter).
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            viewport_width: 1280,
            viewport_height: 720,
            zoom: ZOOM_DEFAULT,
            edit_mode: false,
            idle_animation: true,
            seed: 0x5eed,
        }
    }
}

impl EngineConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
        }
    }

    pub(crate) fn tile_size_px(&self) -> f32 {
        self.tile_size.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"tileSize": 16, "idleAnimation": false}"#).expect("config");

        assert_eq!(config.tile_size, 16);
        assert!(!config.idle_animation);
        assert_eq!(config.zoom, ZOOM_DEFAULT);
        assert_eq!(config.viewport().width, 1280);
    }

    #[test]
    fn zero_tile_size_is_treated_as_one_pixel() {
        let config = EngineConfig {
            tile_size: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.tile_size_px(), 1.0);
    }
}
