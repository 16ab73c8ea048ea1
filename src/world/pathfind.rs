//! A* pathfinding over the world grid
//!
//! Cardinal movement only, Manhattan heuristic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::ecs::TilePos;

use super::WorldGrid;

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    tile: TilePos,
    f_cost: i32,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.tile == other.tile
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other.f_cost.cmp(&self.f_cost)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path from `start` to `goal`, inclusive of both.
///
/// Returns `None` if no path exists or the goal is impassable.
pub fn find_path(grid: &WorldGrid, start: TilePos, goal: TilePos) -> Option<Vec<TilePos>> {
    if start == goal {
        return Some(vec![start]);
    }
    if !grid.is_passable(goal) {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<TilePos, TilePos> = HashMap::new();
    let mut g_scores: HashMap<TilePos, i32> = HashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        tile: start,
        f_cost: start.manhattan(&goal),
    });

    while let Some(current) = open_set.pop() {
        if current.tile == goal {
            return Some(reconstruct_path(&came_from, current.tile));
        }

        let current_g = *g_scores.get(&current.tile).unwrap_or(&i32::MAX);

        for neighbor in current.tile.cardinal_neighbors() {
            if !grid.is_passable(neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&i32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.tile);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    tile: neighbor,
                    f_cost: tentative_g + neighbor.manhattan(&goal),
                });
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &HashMap<TilePos, TilePos>, goal: TilePos) -> Vec<TilePos> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Terrain;

    #[test]
    fn test_straight_path() {
        let grid = WorldGrid::new(10, 10);
        let path = find_path(&grid, TilePos::new(1, 1), TilePos::new(5, 1)).unwrap();
        assert_eq!(path.first(), Some(&TilePos::new(1, 1)));
        assert_eq!(path.last(), Some(&TilePos::new(5, 1)));
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_path_routes_around_rock() {
        let mut grid = WorldGrid::new(10, 10);
        // Wall with a gap at y = 8
        for y in 0..8 {
            grid.set_terrain(TilePos::new(5, y), Terrain::Rock);
        }
        let path = find_path(&grid, TilePos::new(2, 2), TilePos::new(8, 2)).unwrap();
        assert!(path.iter().all(|t| grid.is_passable(*t)));
        assert!(path.iter().any(|t| t.y >= 8), "path must use the gap");
    }

    #[test]
    fn test_unreachable_goal_fails() {
        let mut grid = WorldGrid::new(10, 10);
        // Seal the goal in rock
        for t in TilePos::new(7, 7).cardinal_neighbors() {
            grid.set_terrain(t, Terrain::Rock);
        }
        assert!(find_path(&grid, TilePos::new(1, 1), TilePos::new(7, 7)).is_none());
        // Impassable goal fails immediately
        grid.set_terrain(TilePos::new(3, 3), Terrain::Water);
        assert!(find_path(&grid, TilePos::new(1, 1), TilePos::new(3, 3)).is_none());
    }
}
