use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::world::{EntityId, GridPos, RoomModel};

/// Terrain allow-list minus tiles held by entities other than the mover.
/// Rebuilt on every call.
struct PassabilityGrid {
    width: u32,
    height: u32,
    passable: Vec<bool>,
}

impl PassabilityGrid {
    fn from_room(room: &RoomModel, mover: Option<&EntityId>) -> Self {
        let width = room.width();
        let height = room.height();
        let mut passable = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                passable.push(room.grid().is_walkable(GridPos::new(x, y)));
            }
        }

        let mut grid = Self {
            width,
            height,
            passable,
        };
        for entity in room.entities() {
            if Some(&entity.id) == mover {
                continue;
            }
            if let Some(index) = grid.index_of(entity.pos) {
                grid.passable[index] = false;
            }
        }
        grid
    }

    fn index_of(&self, pos: GridPos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as u32, pos.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn is_passable(&self, pos: GridPos) -> bool {
        self.index_of(pos)
            .and_then(|index| self.passable.get(index))
            .copied()
            .unwrap_or(false)
    }

    fn position_of(&self, index: usize) -> GridPos {
        let width = self.width.max(1) as usize;
        GridPos::new((index % width) as i32, (index / width) as i32)
    }
}

/// Open-set priority, smallest first: f, then h, then row-major position,
/// then discovery order. Preferring lower y then lower x makes equal-cost
/// detours bend toward the top-left consistently, so two clients holding the
/// same room state always pick the same path.
type OpenKey = Reverse<(u32, u32, i32, i32, u64)>;

fn open_key(pos: GridPos, g_cost: u32, h_cost: u32, discovered: u64) -> OpenKey {
    Reverse((g_cost.saturating_add(h_cost), h_cost, pos.y, pos.x, discovered))
}

/// 4-directional A* over the room. The returned path excludes `start`; an
/// empty path means "do not move". The start tile itself does not need to be
/// passable.
pub fn find_path(
    room: &RoomModel,
    start: GridPos,
    goal: GridPos,
    mover: Option<&EntityId>,
) -> Vec<GridPos> {
    if start == goal {
        return Vec::new();
    }
    let grid = PassabilityGrid::from_room(room, mover);
    let (Some(start_index), Some(goal_index)) = (grid.index_of(start), grid.index_of(goal)) else {
        return Vec::new();
    };
    if !grid.is_passable(goal) {
        return Vec::new();
    }

    let node_count = grid.passable.len();
    let mut closed = vec![false; node_count];
    let mut best_g = vec![u32::MAX; node_count];
    let mut parent = vec![None::<usize>; node_count];
    let mut open = BinaryHeap::new();
    let mut discovered = 0u64;

    best_g[start_index] = 0;
    open.push(open_key(start, 0, start.manhattan(goal), discovered));

    while let Some(Reverse((_, _, y, x, _))) = open.pop() {
        let current = GridPos::new(x, y);
        let Some(current_index) = grid.index_of(current) else {
            continue;
        };
        if closed[current_index] {
            continue;
        }
        closed[current_index] = true;

        if current_index == goal_index {
            return reconstruct_path(&grid, &parent, start_index, goal_index);
        }

        let next_g = best_g[current_index].saturating_add(1);
        for neighbor in current.neighbors() {
            let Some(neighbor_index) = grid.index_of(neighbor) else {
                continue;
            };
            if closed[neighbor_index]
                || !grid.is_passable(neighbor)
                || next_g >= best_g[neighbor_index]
            {
                continue;
            }
            best_g[neighbor_index] = next_g;
            parent[neighbor_index] = Some(current_index);
            discovered += 1;
            open.push(open_key(neighbor, next_g, neighbor.manhattan(goal), discovered));
        }
    }

    Vec::new()
}

fn reconstruct_path(
    grid: &PassabilityGrid,
    parent: &[Option<usize>],
    start_index: usize,
    goal_index: usize,
) -> Vec<GridPos> {
    let mut cursor = goal_index;
    let mut indices = Vec::new();
    while cursor != start_index {
        indices.push(cursor);
        let Some(next) = parent.get(cursor).copied().flatten() else {
            return Vec::new();
        };
        cursor = next;
    }
    indices.reverse();
    indices
        .into_iter()
        .map(|index| grid.position_of(index))
        .collect()
}
