//! Read-only view of a session for renderers and HUDs
//!
//! Built fresh each frame; owns its data so the host can hold it while the
//! simulation keeps running.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Tile;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: IVec2,
    pub lives: u8,
    pub bombs_allowed: u8,
    pub power: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BombView {
    pub pos: IVec2,
    /// 1.0 when placed, 0.0 when due
    pub fuse_ratio: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionView {
    pub tiles: Vec<IVec2>,
    /// 1.0 when fresh, fading to 0.0
    pub life_ratio: f32,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Cell codes, row by row (0 = floor, 1 = wall, 2 = breakable)
    pub grid: Vec<Vec<u8>>,
    pub player: PlayerView,
    pub enemies: Vec<IVec2>,
    pub bombs: Vec<BombView>,
    pub explosions: Vec<ExplosionView>,
    pub phase: GamePhase,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            grid: state
                .grid
                .rows()
                .map(|row| row.iter().map(|t| t.code()).collect())
                .collect(),
            player: PlayerView {
                pos: state.player.pos,
                lives: state.player.lives,
                bombs_allowed: state.player.bombs_allowed,
                power: state.player.power,
            },
            enemies: state.enemies.iter().map(|e| e.pos).collect(),
            bombs: state
                .bombs
                .iter()
                .map(|b| BombView {
                    pos: b.pos,
                    fuse_ratio: b.fuse_ratio(),
                })
                .collect(),
            explosions: state
                .explosions
                .iter()
                .map(|e| ExplosionView {
                    tiles: e.tiles.clone(),
                    life_ratio: e.life_ratio(),
                })
                .collect(),
            phase: state.phase,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// ASCII rendering: `#` wall, `+` breakable, `*` blast, `o` bomb,
/// `E` enemy, `P` player (top layer wins)
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.grid.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let tile = IVec2::new(x as i32, y as i32);
                let ch = if self.player.pos == tile {
                    'P'
                } else if self.enemies.contains(&tile) {
                    'E'
                } else if self.bombs.iter().any(|b| b.pos == tile) {
                    'o'
                } else if self.explosions.iter().any(|e| e.tiles.contains(&tile)) {
                    '*'
                } else if code == Tile::Wall.code() {
                    '#'
                } else if code == Tile::Breakable.code() {
                    '+'
                } else {
                    '.'
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "lives {}  bombs {}  power {}  {:?}",
            self.player.lives, self.player.bombs_allowed, self.player.power, self.phase
        )
    }
}
