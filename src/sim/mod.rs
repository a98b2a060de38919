//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied frame time only
//! - Seeded RNG only
//! - Stable iteration order (spawn / placement order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod blast;
pub mod collision;
pub mod grid;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use autopilot::Intent;
pub use blast::{blast_tiles, detonate};
pub use collision::{hit_player, is_walkable, resolve_enemy_contact, try_move};
pub use grid::{Grid, Tile, generate_grid};
pub use snapshot::Snapshot;
pub use state::{Bomb, Enemy, Explosion, GameEvent, GamePhase, GameState, Player};
pub use tick::{TickInput, place_bomb, request_move, tick};
