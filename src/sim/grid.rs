//! Maze terrain and generation
//!
//! The grid is a row-major array of tiles. Border cells and cells at even
//! column AND even row are permanent walls (the classic pillar layout); the
//! spawn safe zone is always floor; everything else is rolled breakable or
//! floor from the session RNG.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::in_safe_zone;

/// Terrain kind of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
    Breakable,
}

impl Tile {
    /// Numeric cell code used by renderers (0 = floor, 1 = wall, 2 = breakable)
    pub fn code(self) -> u8 {
        match self {
            Tile::Floor => 0,
            Tile::Wall => 1,
            Tile::Breakable => 2,
        }
    }

    /// Walls and breakables stop walkers
    #[inline]
    pub fn is_solid(self) -> bool {
        self != Tile::Floor
    }
}

/// The maze terrain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Tile>,
}

impl Grid {
    /// A grid of the given size filled with one tile kind
    pub fn filled(width: i32, height: i32, tile: Tile) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![tile; width as usize * height as usize],
        }
    }

    /// An open arena: border and pillar walls, every other cell floor
    pub fn open(width: i32, height: i32) -> Self {
        let mut grid = Self::filled(width, height, Tile::Floor);
        for y in 0..grid.height {
            for x in 0..grid.width {
                let tile = IVec2::new(x, y);
                if grid.is_permanent_wall(tile) {
                    grid.set(tile, Tile::Wall);
                }
            }
        }
        grid
    }

    /// Build a grid from rows of cell codes (0/1/2); unknown codes become walls
    pub fn from_codes(rows: &[&[u8]]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as i32;
        let mut grid = Self::filled(width, height, Tile::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let tile = match code {
                    0 => Tile::Floor,
                    2 => Tile::Breakable,
                    _ => Tile::Wall,
                };
                grid.set(IVec2::new(x as i32, y as i32), tile);
            }
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    #[inline]
    fn index(&self, tile: IVec2) -> Option<usize> {
        self.in_bounds(tile)
            .then(|| (tile.y * self.width + tile.x) as usize)
    }

    /// Tile at a position, `None` outside the grid
    #[inline]
    pub fn get(&self, tile: IVec2) -> Option<Tile> {
        self.index(tile).map(|i| self.cells[i])
    }

    /// Overwrite a tile; writes outside the grid are ignored
    pub fn set(&mut self, tile: IVec2, kind: Tile) {
        if let Some(i) = self.index(tile) {
            self.cells[i] = kind;
        }
    }

    /// Out-of-grid, walls and breakables all block movement
    #[inline]
    pub fn is_blocking(&self, tile: IVec2) -> bool {
        self.get(tile).is_none_or(Tile::is_solid)
    }

    /// Border and even/even pillar cells
    #[inline]
    pub fn is_permanent_wall(&self, tile: IVec2) -> bool {
        let border =
            tile.x == 0 || tile.y == 0 || tile.x == self.width - 1 || tile.y == self.height - 1;
        border || (tile.x % 2 == 0 && tile.y % 2 == 0)
    }

    /// Turn a breakable into floor. Returns true if a wall was destroyed.
    pub fn destroy(&mut self, tile: IVec2) -> bool {
        if self.get(tile) == Some(Tile::Breakable) {
            self.set(tile, Tile::Floor);
            true
        } else {
            false
        }
    }

    /// Rows of tiles, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// All floor tiles outside the spawn safe zone, row-major order
    pub fn spawn_candidates(&self) -> Vec<IVec2> {
        let mut spots = Vec::new();
        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                let tile = IVec2::new(x, y);
                if self.get(tile) == Some(Tile::Floor) && !in_safe_zone(tile) {
                    spots.push(tile);
                }
            }
        }
        spots
    }

    pub fn count(&self, kind: Tile) -> usize {
        self.cells.iter().filter(|&&t| t == kind).count()
    }
}

/// Generate a fresh maze
///
/// Rule order matters: border and pillars win over the safe zone, so the
/// pillar at (2, 2) stays a wall.
pub fn generate_grid<R: Rng>(width: i32, height: i32, breakable_chance: f64, rng: &mut R) -> Grid {
    let chance = breakable_chance.clamp(0.0, 1.0);
    let mut grid = Grid::filled(width, height, Tile::Floor);

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let tile = IVec2::new(x, y);
            let kind = if grid.is_permanent_wall(tile) {
                Tile::Wall
            } else if in_safe_zone(tile) {
                Tile::Floor
            } else if rng.random_bool(chance) {
                Tile::Breakable
            } else {
                Tile::Floor
            };
            grid.set(tile, kind);
        }
    }

    log::debug!(
        "Generated {}x{} maze: {} breakable, {} floor",
        grid.width(),
        grid.height(),
        grid.count(Tile::Breakable),
        grid.count(Tile::Floor)
    );

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use crate::consts::SPAWN_TILE;

    #[test]
    fn test_out_of_bounds_is_blocking() {
        let grid = Grid::open(7, 7);
        assert!(grid.is_blocking(IVec2::new(-1, 3)));
        assert!(grid.is_blocking(IVec2::new(3, 7)));
        assert_eq!(grid.get(IVec2::new(7, 0)), None);
        assert!(!grid.is_blocking(IVec2::new(1, 1)));
    }

    #[test]
    fn test_safe_zone_is_floor() {
        let mut rng = Pcg32::seed_from_u64(7);
        // Chance 1.0 fills everything else with breakables
        let grid = generate_grid(9, 9, 1.0, &mut rng);
        assert_eq!(grid.get(SPAWN_TILE), Some(Tile::Floor));
        assert_eq!(grid.get(IVec2::new(1, 2)), Some(Tile::Floor));
        assert_eq!(grid.get(IVec2::new(2, 1)), Some(Tile::Floor));
        assert_eq!(grid.get(IVec2::new(2, 2)), Some(Tile::Wall));
        assert_eq!(grid.get(IVec2::new(3, 1)), Some(Tile::Breakable));
        assert!(grid.spawn_candidates().is_empty());
    }

    #[test]
    fn test_zero_chance_has_no_breakables() {
        let mut rng = Pcg32::seed_from_u64(1);
        let grid = generate_grid(15, 13, 0.0, &mut rng);
        assert_eq!(grid.count(Tile::Breakable), 0);
        assert_eq!(grid, Grid::open(15, 13));
    }

    #[test]
    fn test_destroy_only_affects_breakables() {
        let mut grid = Grid::from_codes(&[&[1, 1, 1], &[1, 2, 0], &[1, 1, 1]]);
        assert!(grid.destroy(IVec2::new(1, 1)));
        assert_eq!(grid.get(IVec2::new(1, 1)), Some(Tile::Floor));
        assert!(!grid.destroy(IVec2::new(1, 1)));
        assert!(!grid.destroy(IVec2::new(0, 0)));
        assert_eq!(grid.get(IVec2::new(0, 0)), Some(Tile::Wall));
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = generate_grid(15, 13, 0.62, &mut Pcg32::seed_from_u64(42));
        let b = generate_grid(15, 13, 0.62, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_border_and_pillars_are_walls(
            seed in any::<u64>(),
            width in 5i32..32,
            height in 5i32..32,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let grid = generate_grid(width, height, 0.62, &mut rng);
            for y in 0..height {
                for x in 0..width {
                    let tile = IVec2::new(x, y);
                    let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                    if border || (x % 2 == 0 && y % 2 == 0) {
                        prop_assert_eq!(grid.get(tile), Some(Tile::Wall));
                    } else {
                        prop_assert_ne!(grid.get(tile), Some(Tile::Wall));
                    }
                    if in_safe_zone(tile) && !grid.is_permanent_wall(tile) {
                        prop_assert_eq!(grid.get(tile), Some(Tile::Floor));
                    }
                }
            }
        }
    }
}
