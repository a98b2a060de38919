//! Session settings
//!
//! Tunables for maze size, population and timings. Loaded from JSON by the
//! host; anything missing falls back to the defaults in `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tunables for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Maze ===
    /// Grid width in tiles (including border walls)
    pub grid_width: i32,
    /// Grid height in tiles (including border walls)
    pub grid_height: i32,
    /// Chance an eligible interior cell becomes breakable (0.0 - 1.0)
    pub breakable_chance: f64,

    // === Population ===
    pub enemy_count: usize,
    pub starting_lives: u8,
    pub starting_bombs: u8,
    pub starting_power: u8,

    // === Timings (ms) ===
    pub bomb_fuse_ms: f32,
    pub explosion_life_ms: f32,
    pub bomb_removal_delay_ms: f32,
    pub enemy_move_delay_ms: f32,
    /// Minimum interval between accepted player move intents
    pub player_move_delay_ms: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            breakable_chance: BREAKABLE_CHANCE,

            enemy_count: ENEMY_COUNT,
            starting_lives: STARTING_LIVES,
            starting_bombs: STARTING_BOMBS,
            starting_power: STARTING_POWER,

            bomb_fuse_ms: BOMB_FUSE_MS,
            explosion_life_ms: EXPLOSION_LIFE_MS,
            bomb_removal_delay_ms: BOMB_REMOVAL_DELAY_MS,
            enemy_move_delay_ms: ENEMY_MOVE_DELAY_MS,
            player_move_delay_ms: PLAYER_MOVE_DELAY_MS,
        }
    }
}

impl Settings {
    /// Settings for a custom grid size, everything else default
    pub fn with_grid(width: i32, height: i32) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Self::default()
        }
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Parse settings if given, falling back to defaults on bad input
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!(
                    "Loaded settings ({}x{}, {} enemies)",
                    settings.grid_width,
                    settings.grid_height,
                    settings.enemy_count
                );
                settings
            }
            Some(Err(e)) => {
                log::warn!("Invalid settings, using defaults: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Clamp values into ranges the simulation can run with
    pub fn sanitized(mut self) -> Self {
        self.grid_width = self.grid_width.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        self.grid_height = self.grid_height.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        self.breakable_chance = if self.breakable_chance.is_finite() {
            self.breakable_chance.clamp(0.0, 1.0)
        } else {
            BREAKABLE_CHANCE
        };
        self.starting_lives = self.starting_lives.max(1);
        self.starting_bombs = self.starting_bombs.max(1);
        self.starting_power = self.starting_power.max(1);

        for (value, default) in [
            (&mut self.bomb_fuse_ms, BOMB_FUSE_MS),
            (&mut self.explosion_life_ms, EXPLOSION_LIFE_MS),
            (&mut self.bomb_removal_delay_ms, BOMB_REMOVAL_DELAY_MS),
            (&mut self.enemy_move_delay_ms, ENEMY_MOVE_DELAY_MS),
            (&mut self.player_move_delay_ms, PLAYER_MOVE_DELAY_MS),
        ] {
            if !value.is_finite() || *value < 0.0 {
                *value = default;
            }
        }
        self
    }

    /// Serialize for the host to store or display
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let s = Settings::default();
        assert_eq!(s.grid_width, GRID_WIDTH);
        assert_eq!(s.enemy_count, 4);
        assert_eq!(s.starting_lives, 3);
        assert_eq!(s.bomb_fuse_ms, 2000.0);
        assert_eq!(s.explosion_life_ms, 500.0);
        assert_eq!(s.bomb_removal_delay_ms, 120.0);
        assert_eq!(s.enemy_move_delay_ms, 600.0);
        assert_eq!(s.player_move_delay_ms, 140.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "grid_width": 21, "enemy_count": 6 }"#).unwrap();
        assert_eq!(s.grid_width, 21);
        assert_eq!(s.enemy_count, 6);
        assert_eq!(s.grid_height, GRID_HEIGHT);
        assert_eq!(s.breakable_chance, BREAKABLE_CHANCE);
    }

    #[test]
    fn test_sanitized_clamps() {
        let s = Settings::from_json(
            r#"{ "grid_width": 2, "breakable_chance": 3.5, "starting_lives": 0, "bomb_fuse_ms": -1 }"#,
        )
        .unwrap();
        assert_eq!(s.grid_width, MIN_GRID_SIZE);
        assert_eq!(s.breakable_chance, 1.0);
        assert_eq!(s.starting_lives, 1);
        assert_eq!(s.bomb_fuse_ms, BOMB_FUSE_MS);

        let s = Settings::from_json(r#"{ "grid_width": 70000, "grid_height": 70000 }"#).unwrap();
        assert_eq!(s.grid_width, MAX_GRID_SIZE);
        assert_eq!(s.grid_height, MAX_GRID_SIZE);
    }

    #[test]
    fn test_oversized_grid_starts_a_session() {
        let s = Settings::from_json(r#"{ "grid_width": 70000, "grid_height": 70000 }"#).unwrap();
        let state = crate::sim::GameState::with_settings(1, s);
        assert_eq!(state.grid.width(), MAX_GRID_SIZE);
        assert_eq!(state.grid.height(), MAX_GRID_SIZE);
    }

    #[test]
    fn test_load_or_default_recovers_from_garbage() {
        assert_eq!(Settings::load_or_default(Some("not json")), Settings::default());
        assert_eq!(Settings::load_or_default(None), Settings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings::with_grid(9, 7);
        assert_eq!(Settings::from_json(&s.to_json().unwrap()).unwrap(), s);
    }
}
