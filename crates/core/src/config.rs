//! Tunable arena parameters
//!
//! Every rule constant of the simulation lives in [`ArenaConfig`]. Defaults
//! reproduce the classic 15×15 two-player arena. Configs can be loaded from
//! and saved to JSON; missing fields fall back to their defaults.

use crate::core_types::Millis;
use crate::entities::player::{Companion, PlayerId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Round-start stats for one player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    /// Base speed multiplier
    pub speed: f32,
    pub bomb_range: u32,
    pub max_bombs: u32,
    /// Companion held from the start (its speed overrides `speed` while held)
    pub companion: Option<Companion>,
}

impl Loadout {
    /// Player 1 debug kit: faster, longer blasts, an extra bomb and an owl
    #[must_use]
    pub fn debug_p1(config: &ArenaConfig) -> Self {
        Loadout {
            speed: config.initial_speed + 1.0,
            bomb_range: config.initial_bomb_range + 2,
            max_bombs: config.initial_max_bombs + 1,
            companion: Some(Companion::Owl),
        }
    }

    /// Player 2 debug kit: faster, two extra bombs and a turtle
    #[must_use]
    pub fn debug_p2(config: &ArenaConfig) -> Self {
        Loadout {
            speed: config.initial_speed + 1.0,
            bomb_range: config.initial_bomb_range + 1,
            max_bombs: config.initial_max_bombs + 2,
            companion: Some(Companion::Turtle),
        }
    }
}

/// Arena rules and timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Side length of the square grid (odd, >= 5)
    pub grid_size: usize,
    pub initial_max_bombs: u32,
    pub initial_bomb_range: u32,
    pub initial_speed: f32,
    /// Move cooldown at speed 1.0; actual cooldown is this ÷ speed
    pub move_base_delay: Millis,
    pub fuse_duration: Millis,
    /// How long an explosion footprint stays lethal
    pub explosion_duration: Millis,
    /// Delay between a ray reaching a bomb and that bomb detonating
    pub chain_delay: Millis,
    pub grass_break_duration: Millis,
    /// Granted when a companion absorbs a hit
    pub invulnerability_duration: Millis,
    /// Chance that a non-wall, non-spawn cell starts as grass
    pub grass_spawn_chance: f64,
    /// Chance that destroyed grass leaves a powerup behind
    pub grass_powerup_chance: f64,
    /// Chance per ambient interval that a powerup spawn is attempted
    pub ambient_powerup_chance: f64,
    pub ambient_powerup_interval: Millis,
    /// Chance that a random powerup is a companion (then 50/50 owl/turtle)
    pub companion_draw_chance: f64,
    /// Added to both speed and base speed by a SpeedBoost
    pub speed_boost_increment: f32,
    pub owl_speed: f32,
    pub turtle_speed: f32,
    /// Presentational hint: delay before offering "play again"
    pub game_over_prompt_delay: Millis,
    /// Nominal tick period for drivers (≈60 Hz)
    pub tick_interval: Millis,
    /// Fixed RNG seed; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Per-player loadout overrides; `None` uses the initial_* values
    pub loadouts: [Option<Loadout>; 2],
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            grid_size: 15,
            initial_max_bombs: 1,
            initial_bomb_range: 1,
            initial_speed: 1.0,
            move_base_delay: Millis::new(200),
            fuse_duration: Millis::new(2000),
            explosion_duration: Millis::new(500),
            chain_delay: Millis::new(100),
            grass_break_duration: Millis::new(200),
            invulnerability_duration: Millis::new(1500),
            grass_spawn_chance: 0.35,
            grass_powerup_chance: 0.35,
            ambient_powerup_chance: 0.2,
            ambient_powerup_interval: Millis::new(10_000),
            companion_draw_chance: 0.2,
            speed_boost_increment: 0.5,
            owl_speed: 2.0,
            turtle_speed: 0.8,
            game_over_prompt_delay: Millis::new(1000),
            tick_interval: Millis::new(16),
            seed: None,
            loadouts: [None, None],
        }
    }
}

impl ArenaConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_grid_size(mut self, size: usize) -> Self {
        self.grid_size = size;
        self
    }

    #[must_use]
    pub fn with_loadout(mut self, player: PlayerId, loadout: Loadout) -> Self {
        self.loadouts[player.index()] = Some(loadout);
        self
    }

    /// Both players start with the debug kits
    #[must_use]
    pub fn with_debug_loadouts(self) -> Self {
        let p1 = Loadout::debug_p1(&self);
        let p2 = Loadout::debug_p2(&self);
        self.with_loadout(PlayerId::P1, p1)
            .with_loadout(PlayerId::P2, p2)
    }

    /// Effective round-start stats for `player`
    #[must_use]
    pub fn loadout(&self, player: PlayerId) -> Loadout {
        self.loadouts[player.index()].unwrap_or(Loadout {
            speed: self.initial_speed,
            bomb_range: self.initial_bomb_range,
            max_bombs: self.initial_max_bombs,
            companion: None,
        })
    }

    /// Check every parameter against the rules the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 5 || self.grid_size % 2 == 0 {
            return Err(ConfigError::invalid(
                "grid_size",
                format!("must be odd and at least 5, got {}", self.grid_size),
            ));
        }
        for (field, value) in [
            ("grass_spawn_chance", self.grass_spawn_chance),
            ("grass_powerup_chance", self.grass_powerup_chance),
            ("ambient_powerup_chance", self.ambient_powerup_chance),
            ("companion_draw_chance", self.companion_draw_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a probability in [0, 1], got {value}"),
                ));
            }
        }
        for (field, value) in [
            ("initial_speed", self.initial_speed),
            ("owl_speed", self.owl_speed),
            ("turtle_speed", self.turtle_speed),
        ] {
            check_speed(field, value)?;
        }
        if !self.speed_boost_increment.is_finite() || self.speed_boost_increment < 0.0 {
            return Err(ConfigError::invalid(
                "speed_boost_increment",
                format!("must be finite and non-negative, got {}", self.speed_boost_increment),
            ));
        }
        if self.initial_max_bombs == 0 {
            return Err(ConfigError::invalid("initial_max_bombs", "must be at least 1"));
        }
        if self.move_base_delay == Millis::ZERO {
            return Err(ConfigError::invalid("move_base_delay", "must be positive"));
        }
        if self.ambient_powerup_interval == Millis::ZERO {
            return Err(ConfigError::invalid(
                "ambient_powerup_interval",
                "must be positive",
            ));
        }
        for loadout in self.loadouts.iter().flatten() {
            check_speed("loadouts.speed", loadout.speed)?;
            if loadout.max_bombs == 0 {
                return Err(ConfigError::invalid("loadouts.max_bombs", "must be at least 1"));
            }
        }
        Ok(())
    }

    /// Load a config from a JSON file and validate it
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed, or fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save the config as pretty JSON
    ///
    /// # Errors
    /// Returns error if the config cannot be serialized or written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeFailed(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }
}

fn check_speed(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be finite and positive, got {value}"),
        ))
    }
}

/// Config errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read file
    LoadFailed(String),
    /// Failed to parse file contents
    ParseFailed(String),
    /// Failed to serialize config
    SerializeFailed(String),
    /// Failed to write file
    SaveFailed(String),
    /// A parameter breaks a simulation rule
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadFailed(msg) => write!(f, "Failed to load: {msg}"),
            ConfigError::ParseFailed(msg) => write!(f, "Failed to parse: {msg}"),
            ConfigError::SerializeFailed(msg) => write!(f, "Failed to serialize: {msg}"),
            ConfigError::SaveFailed(msg) => write!(f, "Failed to save: {msg}"),
            ConfigError::Invalid { field, reason } => write!(f, "Invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
