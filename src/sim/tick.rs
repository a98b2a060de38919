//! Frame tick
//!
//! Core game loop that advances a session by one host frame. Order within a
//! frame: intents, fuses (and bomb cleanup), explosion lifetimes, enemy
//! steps, contact, win check.

use super::autopilot;
use super::blast::detonate;
use super::collision::{is_walkable, resolve_enemy_contact, try_move};
use super::state::{Bomb, GameEvent, GamePhase, GameState};
use crate::Direction;

/// Intents for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Step request (subject to the player move throttle)
    pub movement: Option<Direction>,
    /// Drop a bomb on the player's tile
    pub place_bomb: bool,
    /// Start a fresh session with this seed
    pub restart: Option<u64>,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the session by `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(seed) = input.restart {
        state.restart(seed);
        return;
    }

    // Won/Lost freeze the session until a restart
    if state.phase.is_over() {
        return;
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    state.time_ticks += 1;
    state.time_ms += f64::from(dt);

    let mut input = input.clone();
    if input.idle_mode {
        let intent = autopilot::decide(state);
        input.movement = intent.movement;
        input.place_bomb = intent.place_bomb;
    }

    if let Some(dir) = input.movement {
        request_move(state, dir);
    }
    if input.place_bomb {
        place_bomb(state);
    }

    update_bombs(state, dt);
    if state.phase.is_over() {
        return;
    }

    update_explosions(state, dt);

    update_enemies(state, dt);
    resolve_enemy_contact(state);
    if state.phase.is_over() {
        return;
    }

    if state.enemies.is_empty() {
        state.finish(GamePhase::Won);
    }
}

/// Throttled move intent: at most one attempt per `player_move_delay_ms`
///
/// An attempt that gets past the throttle consumes it even if the move
/// itself is blocked. Returns true if the player moved.
pub fn request_move(state: &mut GameState, dir: Direction) -> bool {
    if state.phase.is_over() {
        return false;
    }
    let delay = f64::from(state.settings.player_move_delay_ms);
    let now = state.time_ms;
    if state.player.last_move_ms.is_some_and(|last| now - last < delay) {
        log::trace!("Move {:?} throttled", dir);
        return false;
    }
    state.player.last_move_ms = Some(state.time_ms);
    try_move(state, dir)
}

/// Drop a bomb on the player's tile. Returns true if a bomb was placed.
///
/// Refused when the field already holds `bombs_allowed` bombs (counting
/// ones that went off but are not yet cleared) or the tile has a bomb.
pub fn place_bomb(state: &mut GameState) -> bool {
    if state.phase.is_over() {
        return false;
    }
    if state.bombs.len() >= usize::from(state.player.bombs_allowed) {
        log::trace!("Bomb refused: {} already out", state.bombs.len());
        return false;
    }
    let pos = state.player.pos;
    if state.bomb_at(pos) {
        log::trace!("Bomb refused: tile {} occupied", pos);
        return false;
    }

    let id = state.next_entity_id();
    let fuse = state.settings.bomb_fuse_ms;
    state.bombs.push(Bomb {
        id,
        pos,
        fuse,
        fuse_total: fuse,
        power: state.player.power,
        exploded: false,
        remove_at_ms: None,
    });
    state.events.push(GameEvent::BombPlaced { tile: pos });
    log::debug!("Bomb {} placed at {} (power {})", id, pos, state.player.power);
    true
}

/// Burn fuses, set off due bombs, clear spent ones
///
/// Only bombs already due when this runs go off; a bomb whose fuse gets
/// zeroed by one of those blasts waits for the next tick.
fn update_bombs(state: &mut GameState, dt: f32) {
    let mut due = Vec::new();
    for (i, bomb) in state.bombs.iter_mut().enumerate() {
        bomb.fuse -= dt;
        if bomb.fuse <= 0.0 && bomb.is_armed() {
            due.push(i);
        }
    }

    // Indices stay valid: nothing is removed until after the loop
    for i in due {
        detonate(state, i);
    }

    let now = state.time_ms;
    state
        .bombs
        .retain(|b| b.remove_at_ms.is_none_or(|t| now < t));
}

/// Fade explosions and drop expired ones
fn update_explosions(state: &mut GameState, dt: f32) {
    for explosion in &mut state.explosions {
        explosion.life -= dt;
    }
    state.explosions.retain(|e| e.life > 0.0);
}

/// Wander each enemy whose step timer has elapsed
fn update_enemies(state: &mut GameState, dt: f32) {
    for i in 0..state.enemies.len() {
        let enemy = &mut state.enemies[i];
        enemy.move_timer += dt;
        if enemy.move_timer < enemy.move_delay {
            continue;
        }
        enemy.move_timer = 0.0;
        step_enemy(state, i);
    }
}

/// One wander step: re-roll heading when the budget is spent, then try to
/// advance. A blocked step zeroes the budget so the next step re-rolls.
fn step_enemy(state: &mut GameState, index: usize) {
    if state.enemies[index].steps_remaining <= 0 {
        let dir = state.random_direction();
        let steps = state.random_steps();
        let enemy = &mut state.enemies[index];
        enemy.dir = dir;
        enemy.steps_remaining = steps;
    }

    let enemy = &state.enemies[index];
    let target = enemy.pos + enemy.dir.delta();
    let open = is_walkable(state, target);

    let enemy = &mut state.enemies[index];
    if open {
        enemy.pos = target;
        enemy.steps_remaining -= 1;
    } else {
        enemy.steps_remaining = 0;
    }
}
