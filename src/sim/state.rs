//! Game state and core simulation types
//!
//! Everything a session mutates lives in `GameState`, including the seeded
//! RNG, so sessions are independent and reproducible.

use glam::IVec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, generate_grid};
use crate::Direction;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every enemy was destroyed
    Won,
    /// Player ran out of lives
    Lost,
}

impl GamePhase {
    pub fn is_over(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Things that happened during a tick, for HUD/audio/logging hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BombPlaced { tile: IVec2 },
    BombExploded { tile: IVec2, tiles: Vec<IVec2> },
    WallDestroyed { tile: IVec2 },
    EnemyKilled { id: u32, tile: IVec2 },
    PlayerHit { lives: u8 },
    Won,
    Lost,
    Restarted { seed: u64 },
}

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: IVec2,
    pub lives: u8,
    /// Max bombs on the field at once
    pub bombs_allowed: u8,
    /// Blast radius in tiles
    pub power: u8,
    /// Session time (ms) of the last accepted move intent
    pub last_move_ms: Option<f64>,
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pos: SPAWN_TILE,
            lives: settings.starting_lives,
            bombs_allowed: settings.starting_bombs,
            power: settings.starting_power,
            last_move_ms: None,
        }
    }
}

/// A wandering enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: IVec2,
    pub dir: Direction,
    /// Steps left before picking a new direction
    pub steps_remaining: i32,
    /// Time accumulated toward the next step (ms)
    pub move_timer: f32,
    pub move_delay: f32,
}

impl Enemy {
    pub fn new(id: u32, pos: IVec2, dir: Direction, steps: i32, move_delay: f32) -> Self {
        Self {
            id,
            pos,
            dir,
            steps_remaining: steps,
            move_timer: 0.0,
            move_delay,
        }
    }
}

/// A placed bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub pos: IVec2,
    /// Fuse remaining (ms)
    pub fuse: f32,
    /// Fuse length at placement, for render ratios
    pub fuse_total: f32,
    pub power: u8,
    pub exploded: bool,
    /// Session time after which an exploded bomb leaves the field
    pub remove_at_ms: Option<f64>,
}

impl Bomb {
    /// Still counts as a detonation candidate
    #[inline]
    pub fn is_armed(&self) -> bool {
        !self.exploded
    }

    /// Fraction of fuse remaining (1.0 = just placed)
    pub fn fuse_ratio(&self) -> f32 {
        if self.fuse_total <= 0.0 {
            0.0
        } else {
            (self.fuse / self.fuse_total).clamp(0.0, 1.0)
        }
    }
}

/// A live blast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub tiles: Vec<IVec2>,
    /// Display lifetime remaining (ms)
    pub life: f32,
    pub life_total: f32,
}

impl Explosion {
    pub fn covers(&self, tile: IVec2) -> bool {
        self.tiles.contains(&tile)
    }

    pub fn life_ratio(&self) -> f32 {
        if self.life_total <= 0.0 {
            0.0
        } else {
            (self.life / self.life_total).clamp(0.0, 1.0)
        }
    }
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session was started from
    pub seed: u64,
    /// Session RNG (maze, spawns, enemy wandering)
    pub rng: Pcg32,
    pub settings: Settings,
    pub phase: GamePhase,
    pub grid: Grid,
    pub player: Player,
    /// Enemies (kept in spawn order)
    pub enemies: Vec<Enemy>,
    /// Bombs (kept in placement order)
    pub bombs: Vec<Bomb>,
    pub explosions: Vec<Explosion>,
    /// Session clock (ms of Playing time)
    pub time_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Start a session with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    /// Start a session with custom settings
    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        let settings = settings.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = generate_grid(
            settings.grid_width,
            settings.grid_height,
            settings.breakable_chance,
            &mut rng,
        );
        let mut state = Self::from_grid(seed, settings, grid);
        state.rng = rng;
        state.spawn_enemies();
        log::info!(
            "Session started (seed {}, {} enemies)",
            seed,
            state.enemies.len()
        );
        state
    }

    /// A session on a hand-built grid with no enemies spawned
    ///
    /// Used by hosts that ship fixed levels, and by tests.
    pub fn from_grid(seed: u64, settings: Settings, grid: Grid) -> Self {
        let settings = settings.sanitized();
        let player = Player::new(&settings);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            phase: GamePhase::Playing,
            grid,
            player,
            enemies: Vec::new(),
            bombs: Vec::new(),
            explosions: Vec::new(),
            time_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Throw the session away and start over with the same settings
    pub fn restart(&mut self, seed: u64) {
        let settings = self.settings.clone();
        *self = Self::with_settings(seed, settings);
        self.events.push(GameEvent::Restarted { seed });
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniformly random wander direction
    pub fn random_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.random_range(0..Direction::ALL.len())]
    }

    /// Random wander budget
    pub fn random_steps(&mut self) -> i32 {
        self.rng.random_range(ENEMY_MIN_STEPS..=ENEMY_MAX_STEPS)
    }

    /// Place enemies on shuffled floor tiles outside the safe zone
    fn spawn_enemies(&mut self) {
        let mut spots = self.grid.spawn_candidates();
        spots.shuffle(&mut self.rng);
        let count = self.settings.enemy_count.min(spots.len());
        if count < self.settings.enemy_count {
            log::warn!(
                "Only {} spawn tiles for {} enemies",
                spots.len(),
                self.settings.enemy_count
            );
        }
        for &pos in spots.iter().take(count) {
            self.spawn_enemy(pos);
        }
    }

    /// Add an enemy with a random heading at a tile
    pub fn spawn_enemy(&mut self, pos: IVec2) -> u32 {
        let id = self.next_entity_id();
        let dir = self.random_direction();
        let steps = self.random_steps();
        let delay = self.settings.enemy_move_delay_ms;
        self.enemies.push(Enemy::new(id, pos, dir, steps, delay));
        id
    }

    /// Any bomb (armed or awaiting removal) on this tile
    pub fn bomb_at(&self, tile: IVec2) -> bool {
        self.bombs.iter().any(|b| b.pos == tile)
    }

    pub fn enemy_at(&self, tile: IVec2) -> bool {
        self.enemies.iter().any(|e| e.pos == tile)
    }

    /// Take everything that happened since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move to a terminal phase (no-op unless Playing)
    pub(crate) fn finish(&mut self, phase: GamePhase) {
        if self.phase != GamePhase::Playing || phase == GamePhase::Playing {
            return;
        }
        self.phase = phase;
        match phase {
            GamePhase::Won => {
                log::info!("All enemies destroyed at {:.0} ms - you win", self.time_ms);
                self.events.push(GameEvent::Won);
            }
            GamePhase::Lost => {
                log::info!("Out of lives at {:.0} ms - game over", self.time_ms);
                self.events.push(GameEvent::Lost);
            }
            GamePhase::Playing => {}
        }
    }
}
