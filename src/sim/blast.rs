//! Bomb detonation and blast propagation
//!
//! A blast is a cross centred on the bomb. Each arm runs out `power` tiles,
//! stops short of a wall, and stops *on* a breakable (which it destroys).

use glam::IVec2;

use super::collision::hit_player;
use super::grid::{Grid, Tile};
use super::state::{Explosion, GameEvent, GameState};
use crate::Direction;

/// Tiles covered by a blast of `power` at `origin`, plus the breakables it
/// will destroy. Does not mutate the grid.
pub fn blast_tiles(grid: &Grid, origin: IVec2, power: u8) -> (Vec<IVec2>, Vec<IVec2>) {
    let mut tiles = vec![origin];
    let mut broken = Vec::new();

    for dir in Direction::ALL {
        for r in 1..=power as i32 {
            let tile = origin + dir.delta() * r;
            match grid.get(tile) {
                None | Some(Tile::Wall) => break,
                Some(Tile::Breakable) => {
                    tiles.push(tile);
                    broken.push(tile);
                    break;
                }
                Some(Tile::Floor) => tiles.push(tile),
            }
        }
    }

    (tiles, broken)
}

/// Detonate the bomb at `index` in the bomb list
///
/// No-op for a bomb that already went off. Side effects land immediately:
/// walls break, caught bombs get a zero fuse (they go off on a later tick),
/// caught enemies die and a caught player takes a hit. Returns the id of the
/// new explosion.
pub fn detonate(state: &mut GameState, index: usize) -> Option<u32> {
    let bomb = state.bombs.get_mut(index)?;
    if bomb.exploded {
        return None;
    }
    bomb.exploded = true;
    bomb.remove_at_ms = Some(state.time_ms + f64::from(state.settings.bomb_removal_delay_ms));
    let (origin, power) = (bomb.pos, bomb.power);

    let (tiles, broken) = blast_tiles(&state.grid, origin, power);
    for &tile in &broken {
        state.grid.destroy(tile);
        state.events.push(GameEvent::WallDestroyed { tile });
    }

    log::debug!(
        "Bomb at {} exploded (power {}, {} tiles, {} walls)",
        origin,
        power,
        tiles.len(),
        broken.len()
    );

    // Chain: caught bombs go off next time the scheduler looks at fuses
    for (i, other) in state.bombs.iter_mut().enumerate() {
        if i != index && other.is_armed() && tiles.contains(&other.pos) {
            other.fuse = 0.0;
        }
    }

    let mut killed = Vec::new();
    state.enemies.retain(|e| {
        let caught = tiles.contains(&e.pos);
        if caught {
            killed.push((e.id, e.pos));
        }
        !caught
    });
    for (id, tile) in killed {
        log::debug!("Enemy {} destroyed at {}", id, tile);
        state.events.push(GameEvent::EnemyKilled { id, tile });
    }

    let player_caught = tiles.contains(&state.player.pos);

    let id = state.next_entity_id();
    let life = state.settings.explosion_life_ms;
    state.events.push(GameEvent::BombExploded {
        tile: origin,
        tiles: tiles.clone(),
    });
    state.explosions.push(Explosion {
        id,
        tiles,
        life,
        life_total: life,
    });

    if player_caught {
        hit_player(state);
    }

    Some(id)
}
