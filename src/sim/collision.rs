//! Movement legality and contact resolution
//!
//! Everything here is total: blocked moves are rejected silently and
//! out-of-grid tiles count as solid.

use glam::IVec2;

use super::state::{GameEvent, GamePhase, GameState};
use crate::Direction;
use crate::consts::SPAWN_TILE;

/// Can a walker step onto this tile?
///
/// Blocked by the grid edge, walls, breakables and any bomb still on the
/// field (including one that just went off and is awaiting removal).
pub fn is_walkable(state: &GameState, tile: IVec2) -> bool {
    !state.grid.is_blocking(tile) && !state.bomb_at(tile)
}

/// Try to move the player one tile. Returns true if the player moved.
pub fn try_move(state: &mut GameState, dir: Direction) -> bool {
    let target = state.player.pos + dir.delta();
    if !is_walkable(state, target) {
        log::trace!("Move {:?} to {} rejected", dir, target);
        return false;
    }
    state.player.pos = target;
    true
}

/// Apply one hit to the player: lose a life, then respawn or lose the game
pub fn hit_player(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.player.lives = state.player.lives.saturating_sub(1);
    state.events.push(GameEvent::PlayerHit {
        lives: state.player.lives,
    });
    if state.player.lives > 0 {
        log::debug!("Player hit at {}, {} lives left", state.player.pos, state.player.lives);
        state.player.pos = SPAWN_TILE;
    } else {
        state.finish(GamePhase::Lost);
    }
}

/// Resolve player/enemy overlap after enemies moved
///
/// Every enemy sharing the player's tile costs a life, counted against the
/// tile the player stood on before any respawn. Enemies survive contact.
/// Returns the number of overlapping enemies.
pub fn resolve_enemy_contact(state: &mut GameState) -> usize {
    let player_tile = state.player.pos;
    let touching = state.enemies.iter().filter(|e| e.pos == player_tile).count();
    for _ in 0..touching {
        hit_player(state);
    }
    touching
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::grid::{Grid, Tile};
    use crate::sim::state::Bomb;

    fn arena() -> GameState {
        GameState::from_grid(1, Settings::with_grid(7, 7), Grid::open(7, 7))
    }

    fn drop_bomb(state: &mut GameState, pos: IVec2) {
        let id = state.next_entity_id();
        state.bombs.push(Bomb {
            id,
            pos,
            fuse: 2000.0,
            fuse_total: 2000.0,
            power: 1,
            exploded: false,
            remove_at_ms: None,
        });
    }

    #[test]
    fn test_move_onto_floor() {
        let mut state = arena();
        assert!(try_move(&mut state, Direction::Right));
        assert_eq!(state.player.pos, IVec2::new(2, 1));
    }

    #[test]
    fn test_move_into_wall_rejected() {
        let mut state = arena();
        assert!(!try_move(&mut state, Direction::Up));
        assert!(!try_move(&mut state, Direction::Left));
        assert_eq!(state.player.pos, SPAWN_TILE);
    }

    #[test]
    fn test_move_into_breakable_rejected() {
        let mut state = arena();
        state.grid.set(IVec2::new(2, 1), Tile::Breakable);
        assert!(!try_move(&mut state, Direction::Right));
        assert_eq!(state.player.pos, SPAWN_TILE);
    }

    #[test]
    fn test_move_onto_bomb_rejected() {
        let mut state = arena();
        drop_bomb(&mut state, IVec2::new(1, 2));
        assert!(!try_move(&mut state, Direction::Down));
        assert_eq!(state.player.pos, SPAWN_TILE);

        // Exploded bombs still block until removed
        state.bombs[0].exploded = true;
        assert!(!try_move(&mut state, Direction::Down));
        state.bombs.clear();
        assert!(try_move(&mut state, Direction::Down));
    }

    #[test]
    fn test_move_off_grid_rejected() {
        // A grid with no border walls: the edge itself must block
        let mut state = GameState::from_grid(1, Settings::default(), Grid::filled(3, 3, Tile::Floor));
        state.player.pos = IVec2::new(0, 0);
        assert!(!try_move(&mut state, Direction::Up));
        assert!(!try_move(&mut state, Direction::Left));
        assert_eq!(state.player.pos, IVec2::new(0, 0));
    }

    #[test]
    fn test_contact_respawns_and_keeps_enemy() {
        let mut state = arena();
        state.player.pos = IVec2::new(3, 3);
        state.spawn_enemy(IVec2::new(3, 3));
        assert_eq!(resolve_enemy_contact(&mut state), 1);
        assert_eq!(state.player.lives, 2);
        assert_eq!(state.player.pos, SPAWN_TILE);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_contact_on_last_life_loses_without_respawn() {
        let mut state = arena();
        state.player.lives = 1;
        state.player.pos = IVec2::new(3, 3);
        state.spawn_enemy(IVec2::new(3, 3));
        resolve_enemy_contact(&mut state);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.player.pos, IVec2::new(3, 3));
    }

    #[test]
    fn test_stacked_enemies_each_cost_a_life() {
        let mut state = arena();
        state.player.lives = 2;
        state.player.pos = IVec2::new(3, 3);
        state.spawn_enemy(IVec2::new(3, 3));
        state.spawn_enemy(IVec2::new(3, 3));
        assert_eq!(resolve_enemy_contact(&mut state), 2);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.phase, GamePhase::Lost);
    }

    #[test]
    fn test_extra_contacts_after_loss_are_ignored() {
        let mut state = arena();
        state.player.lives = 1;
        state.player.pos = IVec2::new(3, 3);
        for _ in 0..3 {
            state.spawn_enemy(IVec2::new(3, 3));
        }
        resolve_enemy_contact(&mut state);
        assert_eq!(state.player.lives, 0);
        let hits = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(hits, 1);
    }
}
