//! Bomber Quest - A grid maze bomb-and-dodge arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, bombs, blasts, enemies, contact)
//! - `settings`: Data-driven tunables for a session

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    use glam::IVec2;

    /// Default grid dimensions (in tiles)
    pub const GRID_WIDTH: i32 = 15;
    pub const GRID_HEIGHT: i32 = 13;

    /// Smallest grid that still has a playable interior around the spawn
    pub const MIN_GRID_SIZE: i32 = 5;
    /// Largest grid a settings file may ask for
    pub const MAX_GRID_SIZE: i32 = 255;

    /// Player spawn / respawn tile
    pub const SPAWN_TILE: IVec2 = IVec2::new(1, 1);
    /// Safe zone covers columns and rows `1..=SAFE_ZONE_EXTENT`
    pub const SAFE_ZONE_EXTENT: i32 = 2;

    /// Chance an interior non-pillar cell starts as a breakable wall
    pub const BREAKABLE_CHANCE: f64 = 0.62;

    /// Player defaults
    pub const STARTING_LIVES: u8 = 3;
    pub const STARTING_BOMBS: u8 = 1;
    pub const STARTING_POWER: u8 = 1;

    /// Enemy defaults
    pub const ENEMY_COUNT: usize = 4;
    pub const ENEMY_MIN_STEPS: i32 = 1;
    pub const ENEMY_MAX_STEPS: i32 = 3;

    /// Timings (milliseconds)
    pub const PLAYER_MOVE_DELAY_MS: f32 = 140.0;
    pub const ENEMY_MOVE_DELAY_MS: f32 = 600.0;
    pub const BOMB_FUSE_MS: f32 = 2000.0;
    pub const EXPLOSION_LIFE_MS: f32 = 500.0;
    pub const BOMB_REMOVAL_DELAY_MS: f32 = 120.0;

    /// Frame step used by the headless runner (~60 Hz)
    pub const FRAME_DT_MS: f32 = 16.0;
}

/// One of the four cardinal directions on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in blast ray order (right, left, down, up)
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Unit step for this direction (rows grow downward)
    #[inline]
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// True if the tile lies inside the spawn safe zone
#[inline]
pub fn in_safe_zone(tile: IVec2) -> bool {
    tile.x <= consts::SAFE_ZONE_EXTENT && tile.y <= consts::SAFE_ZONE_EXTENT
}
