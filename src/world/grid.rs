//! World grid
//!
//! The 2D terrain grid for the wasteland surface, plus the world-unit to
//! tile-coordinate conversion scale.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::ecs::TilePos;

/// World units per tile; entity positions are continuous world coordinates.
pub const TILE_SIZE: f32 = 32.0;

/// Terrain types on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    /// Bare ash flats
    Ash,
    /// Hardy scrub growth
    Scrub,
    /// Collapsed pre-war structures, passable rubble
    Ruin,
    /// Rock outcrops, impassable and sight-blocking
    Rock,
    /// Standing irradiated water, impassable
    Water,
}

impl Terrain {
    pub fn is_passable(&self) -> bool {
        matches!(self, Terrain::Ash | Terrain::Scrub | Terrain::Ruin)
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Terrain::Rock)
    }

    pub fn glyph(&self) -> char {
        match self {
            Terrain::Ash => '.',
            Terrain::Scrub => '"',
            Terrain::Ruin => '%',
            Terrain::Rock => '^',
            Terrain::Water => '~',
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Terrain::Ash => (110, 100, 95),
            Terrain::Scrub => (110, 130, 70),
            Terrain::Ruin => (140, 125, 110),
            Terrain::Rock => (90, 85, 90),
            Terrain::Water => (60, 90, 120),
        }
    }
}

/// A rectangular grid of terrain tiles
#[derive(Debug, Clone)]
pub struct WorldGrid {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Terrain>,
}

impl WorldGrid {
    /// Create a grid filled with ash flats
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Terrain::Ash; (width * height) as usize],
        }
    }

    /// Generate wasteland terrain from layered Perlin noise
    pub fn generate(width: i32, height: i32, seed: u32) -> Self {
        let elevation = Perlin::new(seed);
        let growth = Perlin::new(seed.wrapping_add(1));

        let mut grid = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let nx = x as f64 / 14.0;
                let ny = y as f64 / 14.0;
                let e = elevation.get([nx, ny]);
                let g = growth.get([nx * 2.0, ny * 2.0]);

                let terrain = if e < -0.42 {
                    Terrain::Water
                } else if e > 0.48 {
                    Terrain::Rock
                } else if g > 0.35 {
                    Terrain::Scrub
                } else if g < -0.45 {
                    Terrain::Ruin
                } else {
                    Terrain::Ash
                };
                let idx = grid.idx(x, y);
                grid.tiles[idx] = terrain;
            }
        }
        grid
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    pub fn in_bounds(&self, tile: TilePos) -> bool {
        tile.x >= 0 && tile.x < self.width && tile.y >= 0 && tile.y < self.height
    }

    /// Terrain at a tile, if in bounds
    pub fn terrain(&self, tile: TilePos) -> Option<Terrain> {
        if self.in_bounds(tile) {
            Some(self.tiles[self.idx(tile.x, tile.y)])
        } else {
            None
        }
    }

    pub fn set_terrain(&mut self, tile: TilePos, terrain: Terrain) {
        if self.in_bounds(tile) {
            let idx = self.idx(tile.x, tile.y);
            self.tiles[idx] = terrain;
        }
    }

    /// Whether a tile can be walked on; out of bounds is impassable
    pub fn is_passable(&self, tile: TilePos) -> bool {
        self.terrain(tile).map_or(false, |t| t.is_passable())
    }

    /// Whether a tile blocks sight; out of bounds blocks
    pub fn is_opaque(&self, tile: TilePos) -> bool {
        self.terrain(tile).map_or(true, |t| t.is_opaque())
    }

    /// Carve a passable clearing around a tile (used for spawn sites)
    pub fn clear_area(&mut self, center: TilePos, radius: i32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let tile = TilePos::new(center.x + dx, center.y + dy);
                if self.in_bounds(tile) && !self.tiles[self.idx(tile.x, tile.y)].is_passable() {
                    self.set_terrain(tile, Terrain::Ash);
                }
            }
        }
    }

    /// Line of sight between two tiles along a Bresenham walk.
    ///
    /// Intermediate opaque tiles block; the endpoints themselves do not.
    pub fn line_of_sight(&self, from: TilePos, to: TilePos) -> bool {
        let mut x = from.x;
        let mut y = from.y;
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x == to.x && y == to.y {
                return true;
            }
            let here = TilePos::new(x, y);
            if here != from && self.is_opaque(here) {
                return false;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::WorldPos;

    #[test]
    fn test_out_of_bounds_is_impassable_and_opaque() {
        let grid = WorldGrid::new(10, 10);
        assert!(!grid.is_passable(TilePos::new(-1, 0)));
        assert!(!grid.is_passable(TilePos::new(10, 3)));
        assert!(grid.is_opaque(TilePos::new(0, -1)));
        assert!(grid.is_passable(TilePos::new(5, 5)));
    }

    #[test]
    fn test_world_tile_roundtrip() {
        let tile = TilePos::new(7, 3);
        assert_eq!(tile.center().tile(), tile);
        // Any point inside the tile maps back to it
        let pos = WorldPos::new(7.0 * TILE_SIZE + 1.0, 3.0 * TILE_SIZE + 30.0);
        assert_eq!(pos.tile(), tile);
    }

    #[test]
    fn test_line_of_sight_blocked_by_rock() {
        let mut grid = WorldGrid::new(10, 10);
        assert!(grid.line_of_sight(TilePos::new(1, 5), TilePos::new(8, 5)));
        grid.set_terrain(TilePos::new(4, 5), Terrain::Rock);
        assert!(!grid.line_of_sight(TilePos::new(1, 5), TilePos::new(8, 5)));
        // An opaque endpoint does not block sight of itself
        assert!(grid.line_of_sight(TilePos::new(1, 5), TilePos::new(4, 5)));
    }

    #[test]
    fn test_clear_area_opens_terrain() {
        let mut grid = WorldGrid::new(10, 10);
        grid.set_terrain(TilePos::new(5, 5), Terrain::Rock);
        grid.set_terrain(TilePos::new(6, 5), Terrain::Water);
        grid.clear_area(TilePos::new(5, 5), 1);
        assert!(grid.is_passable(TilePos::new(5, 5)));
        assert!(grid.is_passable(TilePos::new(6, 5)));
    }
}
