use std::collections::{HashMap, HashSet};

use crate::world::{catalog, GridPos, RoomModel};

const PLAYER_LIGHT_COLOR: u32 = 0xffffcc;
const VISIBLE_LIGHT_THRESHOLD: f32 = 0.1;
const UNEXPLORED_FOG_ALPHA: f32 = 0.95;
const REMEMBERED_FOG_ALPHA: f32 = 0.7;
const VISIBLE_FOG_MAX_ALPHA: f32 = 0.6;
const WARM_TINT_THRESHOLD: f32 = 0.5;
const FOG_COLOR: u32 = 0x0a0a15;
const WARM_FOG_COLOR: u32 = 0x1a1510;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub pos: GridPos,
    pub radius: f32,
    pub color: u32,
}

impl LightSource {
    /// `(1 - d/r)^2` inside the radius, zero outside.
    pub fn contribution(&self, tile: GridPos) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        let distance = self.pos.euclidean(tile);
        if distance > self.radius {
            return 0.0;
        }
        let falloff = 1.0 - distance / self.radius;
        falloff * falloff
    }
}

/// Light-emitting objects plus the light the player carries.
pub fn collect_light_sources(room: &RoomModel, player: GridPos) -> Vec<LightSource> {
    let mut sources: Vec<LightSource> = room
        .objects()
        .iter()
        .filter_map(|object| {
            catalog::light_profile(object.type_id).map(|profile| LightSource {
                pos: object.pos,
                radius: profile.radius,
                color: profile.color,
            })
        })
        .collect();
    sources.push(LightSource {
        pos: player,
        radius: room.lighting().player_light_radius(),
        color: PLAYER_LIGHT_COLOR,
    });
    sources
}

/// Max of ambient and every contribution; lights never add up.
pub fn tile_light_level(ambient: f32, sources: &[LightSource], tile: GridPos) -> f32 {
    sources
        .iter()
        .map(|source| source.contribution(tile))
        .fold(ambient, f32::max)
        .min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogCell {
    pub alpha: f32,
    pub color: u32,
}

#[derive(Debug, Default, Clone)]
pub struct VisibilityState {
    visible: HashSet<GridPos>,
    explored: HashSet<GridPos>,
    light_levels: HashMap<GridPos, f32>,
}

impl VisibilityState {
    pub fn reset(&mut self) {
        self.visible.clear();
        self.explored.clear();
        self.light_levels.clear();
    }

    /// Re-evaluates tiles within the view radius of `player`. Tiles farther
    /// than the radius (in grid steps) are never evaluated, so no light can
    /// reveal them.
    pub fn recompute(&mut self, room: &RoomModel, player: GridPos) {
        self.visible.clear();
        self.light_levels.clear();

        let sources = collect_light_sources(room, player);
        let ambient = room.lighting().ambient();
        let view_radius = room.lighting().view_radius();
        let reach = view_radius.min(i32::MAX as u32) as i32;

        let x_min = player.x.saturating_sub(reach).max(0);
        let y_min = player.y.saturating_sub(reach).max(0);
        let x_max = player
            .x
            .saturating_add(reach)
            .min(room.width() as i32 - 1);
        let y_max = player
            .y
            .saturating_add(reach)
            .min(room.height() as i32 - 1);

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let tile = GridPos::new(x, y);
                if tile.manhattan(player) > view_radius {
                    continue;
                }
                let level = tile_light_level(ambient, &sources, tile);
                self.light_levels.insert(tile, level);
                if level > VISIBLE_LIGHT_THRESHOLD {
                    self.visible.insert(tile);
                    self.explored.insert(tile);
                }
            }
        }
    }

    pub fn is_visible(&self, tile: GridPos) -> bool {
        self.visible.contains(&tile)
    }

    pub fn is_explored(&self, tile: GridPos) -> bool {
        self.explored.contains(&tile)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn explored_count(&self) -> usize {
        self.explored.len()
    }

    pub fn visible_tiles(&self) -> impl Iterator<Item = &GridPos> {
        self.visible.iter()
    }

    pub fn explored_tiles(&self) -> impl Iterator<Item = &GridPos> {
        self.explored.iter()
    }

    pub fn light_level(&self, tile: GridPos) -> f32 {
        self.light_levels.get(&tile).copied().unwrap_or(0.0)
    }

    pub fn fog_cell(&self, tile: GridPos) -> FogCell {
        if self.is_visible(tile) {
            let level = self.light_level(tile);
            let color = if level > WARM_TINT_THRESHOLD {
                WARM_FOG_COLOR
            } else {
                FOG_COLOR
            };
            return FogCell {
                alpha: (VISIBLE_FOG_MAX_ALPHA - level * VISIBLE_FOG_MAX_ALPHA).max(0.0),
                color,
            };
        }
        let alpha = if self.is_explored(tile) {
            REMEMBERED_FOG_ALPHA
        } else {
            UNEXPLORED_FOG_ALPHA
        };
        FogCell {
            alpha,
            color: FOG_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{catalog::object_types, Lighting, RoomObject, RoomSnapshot, TileId};

    fn room(width: u32, height: u32, lighting: Lighting) -> RoomSnapshot {
        let mut snapshot = RoomSnapshot::filled(width, height, TileId::FLOOR_STONE);
        snapshot.lighting = lighting;
        snapshot
    }

    #[test]
    fn contribution_is_full_at_source_and_zero_at_radius() {
        let source = LightSource {
            pos: GridPos::new(0, 0),
            radius: 4.0,
            color: 0,
        };
        assert_eq!(source.contribution(GridPos::new(0, 0)), 1.0);
        assert_eq!(source.contribution(GridPos::new(4, 0)), 0.0);
        assert_eq!(source.contribution(GridPos::new(5, 0)), 0.0);
        assert!((source.contribution(GridPos::new(2, 0)) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn overlapping_sources_take_the_max() {
        let near = LightSource {
            pos: GridPos::new(0, 0),
            radius: 4.0,
            color: 0,
        };
        let far = LightSource {
            pos: GridPos::new(4, 0),
            radius: 4.0,
            color: 0,
        };
        let tile = GridPos::new(2, 0);
        let level = tile_light_level(0.0, &[near, far], tile);

        assert!((level - 0.25).abs() < 1e-6);
        assert!(level < near.contribution(tile) + far.contribution(tile));
    }

    #[test]
    fn ambient_floor_applies_everywhere() {
        let level = tile_light_level(0.7, &[], GridPos::new(3, 3));
        assert!((level - 0.7).abs() < 1e-6);
    }

    #[test]
    fn dark_room_hides_tiles_beyond_view_radius_even_when_lit() {
        let mut snapshot = room(9, 9, Lighting::Dark);
        snapshot.objects.push(RoomObject::new(
            "crystal",
            object_types::CRYSTAL_GLOW,
            GridPos::new(8, 8),
        ));
        let model = RoomModel::from_snapshot(snapshot).expect("room");
        let mut visibility = VisibilityState::default();

        visibility.recompute(&model, GridPos::new(4, 4));

        assert!(visibility.is_visible(GridPos::new(4, 4)));
        assert!(!visibility.is_visible(GridPos::new(8, 8)));
        assert!(!visibility.is_visible(GridPos::new(0, 0)));
        assert!(!visibility.is_explored(GridPos::new(8, 8)));
    }

    #[test]
    fn explored_grows_and_keeps_remembered_tiles() {
        let model = RoomModel::from_snapshot(room(20, 3, Lighting::Dark)).expect("room");
        let mut visibility = VisibilityState::default();

        visibility.recompute(&model, GridPos::new(1, 1));
        assert!(visibility.is_visible(GridPos::new(2, 1)));
        let explored_before = visibility.explored_count();

        visibility.recompute(&model, GridPos::new(15, 1));
        assert!(!visibility.is_visible(GridPos::new(2, 1)));
        assert!(visibility.is_explored(GridPos::new(2, 1)));
        assert!(visibility.explored_count() >= explored_before);
        for tile in visibility.visible_tiles() {
            assert!(visibility.is_explored(*tile));
        }
    }

    #[test]
    fn fog_cells_follow_visibility_tiers() {
        let model = RoomModel::from_snapshot(room(30, 1, Lighting::Bright)).expect("room");
        let mut visibility = VisibilityState::default();
        visibility.recompute(&model, GridPos::new(0, 0));
        visibility.recompute(&model, GridPos::new(29, 0));

        let unexplored = visibility.fog_cell(GridPos::new(10, 5));
        assert_eq!(unexplored.alpha, UNEXPLORED_FOG_ALPHA);

        let remembered = visibility.fog_cell(GridPos::new(0, 0));
        assert_eq!(remembered.alpha, REMEMBERED_FOG_ALPHA);

        let at_player = visibility.fog_cell(GridPos::new(29, 0));
        assert_eq!(at_player.alpha, 0.0);
        assert_eq!(at_player.color, WARM_FOG_COLOR);

        let ambient_only = visibility.fog_cell(GridPos::new(25, 0));
        assert!((ambient_only.alpha - (0.6 - 0.7 * 0.6)).abs() < 1e-5);
        assert_eq!(ambient_only.color, WARM_FOG_COLOR);
    }
}
