//! Idle/demo mode player
//!
//! A small greedy bot: get out of blast lines, bomb anything worth bombing
//! when there is a way out, otherwise walk toward the nearest bombing spot.
//! Uses no randomness, so a demo run is as reproducible as the session.

use std::collections::VecDeque;

use glam::IVec2;

use super::blast::blast_tiles;
use super::collision::is_walkable;
use super::state::GameState;
use crate::Direction;

/// What the bot wants to do this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub movement: Option<Direction>,
    pub place_bomb: bool,
}

/// Pick this frame's intents
pub fn decide(state: &GameState) -> Intent {
    let player = state.player.pos;
    let danger = danger_tiles(state, None);

    if danger.contains(&player) {
        let movement = first_step(state, player, |t| !danger.contains(&t), &[]);
        return Intent {
            movement,
            place_bomb: false,
        };
    }

    let can_bomb = state.bombs.len() < usize::from(state.player.bombs_allowed)
        && !state.bomb_at(player);
    if can_bomb && worth_bombing(state, player) {
        // Only drop it if we can still get clear
        let with_bomb = danger_tiles(state, Some(player));
        let escape = first_step(state, player, |t| !with_bomb.contains(&t), &danger);
        if escape.is_some() {
            return Intent {
                movement: None,
                place_bomb: true,
            };
        }
    }

    let movement = first_step(
        state,
        player,
        |t| t != player && worth_bombing(state, t),
        &danger,
    );
    Intent {
        movement,
        place_bomb: false,
    }
}

/// Tiles that are burning or will be hit by a bomb already on the field,
/// optionally with one extra bomb of the player's power at `extra`
fn danger_tiles(state: &GameState, extra: Option<IVec2>) -> Vec<IVec2> {
    let mut tiles: Vec<IVec2> = state
        .explosions
        .iter()
        .flat_map(|e| e.tiles.iter().copied())
        .collect();
    for bomb in state.bombs.iter().filter(|b| b.is_armed()) {
        tiles.extend(blast_tiles(&state.grid, bomb.pos, bomb.power).0);
    }
    if let Some(pos) = extra {
        tiles.extend(blast_tiles(&state.grid, pos, state.player.power).0);
    }
    tiles
}

/// A bomb here would break a wall or catch an enemy
fn worth_bombing(state: &GameState, tile: IVec2) -> bool {
    let (tiles, broken) = blast_tiles(&state.grid, tile, state.player.power);
    !broken.is_empty() || tiles.iter().any(|&t| t != tile && state.enemy_at(t))
}

/// Breadth-first search from `start` to the nearest tile satisfying `goal`,
/// never stepping on `avoid` tiles or enemies. Returns the first step.
fn first_step(
    state: &GameState,
    start: IVec2,
    goal: impl Fn(IVec2) -> bool,
    avoid: &[IVec2],
) -> Option<Direction> {
    let grid = &state.grid;
    let width = grid.width();
    let index = |t: IVec2| (t.y * width + t.x) as usize;

    // First direction taken to reach each visited tile
    let mut via: Vec<Option<Option<Direction>>> =
        vec![None; grid.width() as usize * grid.height() as usize];
    let mut queue = VecDeque::new();
    if !grid.in_bounds(start) {
        return None;
    }
    via[index(start)] = Some(None);
    queue.push_back(start);

    while let Some(tile) = queue.pop_front() {
        let first = via[index(tile)].flatten();
        if tile != start && goal(tile) {
            return first;
        }
        for dir in Direction::ALL {
            let next = tile + dir.delta();
            if !grid.in_bounds(next) || via[index(next)].is_some() {
                continue;
            }
            if !is_walkable(state, next) || avoid.contains(&next) || state.enemy_at(next) {
                continue;
            }
            via[index(next)] = Some(Some(first.unwrap_or(dir)));
            queue.push_back(next);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::grid::{Grid, Tile};
    use crate::sim::state::GamePhase;
    use crate::sim::tick::{TickInput, place_bomb, tick};

    fn arena(grid: Grid) -> GameState {
        let settings = Settings::with_grid(grid.width(), grid.height());
        GameState::from_grid(3, settings, grid)
    }

    #[test]
    fn test_flees_own_bomb() {
        let mut state = arena(Grid::open(7, 7));
        state.spawn_enemy(IVec2::new(5, 5));
        place_bomb(&mut state);
        let intent = decide(&state);
        assert!(intent.movement.is_some());
        assert!(!intent.place_bomb);
    }

    #[test]
    fn test_bombs_adjacent_breakable_with_escape() {
        let mut grid = Grid::open(7, 7);
        grid.set(IVec2::new(2, 1), Tile::Breakable);
        let mut state = arena(grid);
        state.spawn_enemy(IVec2::new(5, 5));
        let intent = decide(&state);
        assert!(intent.place_bomb);
    }

    #[test]
    fn test_no_bomb_without_escape() {
        // Dead-end corridor: the only way out is through the blast line
        let grid = Grid::from_codes(&[
            &[1, 1, 1, 1, 1],
            &[1, 0, 0, 2, 1],
            &[1, 1, 1, 1, 1],
        ]);
        let mut state = arena(grid);
        state.player.pos = IVec2::new(2, 1);
        let intent = decide(&state);
        assert!(!intent.place_bomb);
    }

    #[test]
    fn test_walks_toward_target() {
        let mut grid = Grid::open(9, 3);
        grid.set(IVec2::new(6, 1), Tile::Breakable);
        let state = arena(grid);
        assert_eq!(decide(&state).movement, Some(Direction::Right));
    }

    #[test]
    fn test_boxed_in_does_nothing() {
        let grid = Grid::from_codes(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]]);
        let state = arena(grid);
        assert_eq!(decide(&state), Intent::default());
    }

    #[test]
    fn test_idle_mode_survives_own_bombs() {
        // Demo runs must not blow themselves up in an empty field
        let mut grid = Grid::open(11, 11);
        for x in [3, 5, 7] {
            grid.set(IVec2::new(x, 1), Tile::Breakable);
        }
        let mut state = arena(grid);
        state.spawn_enemy(IVec2::new(9, 9));
        state.enemies[0].move_delay = f32::INFINITY;
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut state, &input, 16.0);
        }
        assert_eq!(state.player.lives, 3);
        assert_ne!(state.phase, GamePhase::Lost);
        assert!(state.grid.count(Tile::Breakable) == 0 || state.phase == GamePhase::Won);
    }
}
