//! Game configuration
//!
//! Everything the simulation needs at construction time. Loaded from JSON
//! (any missing section falls back to defaults) and validated once, so a bad
//! table or constant fails at load instead of mid-tick.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::physics::Bounds;
use crate::sim::tier::{Tier, TierTable};

/// Construction-time contract violations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tier table needs {expected} entries, found {found}")]
    TierCount { expected: usize, found: usize },
    #[error("tier {tier:?} has invalid radius {radius}")]
    InvalidRadius { tier: Tier, radius: f32 },
    #[error("tier {tier:?} has a zero score value")]
    ZeroScore { tier: Tier },
    #[error("tier {tier:?} can reach itself through its merge chain")]
    TierCycle { tier: Tier },
    #[error("spawnable tier count must be 1..={max}, got {count}")]
    SpawnableTiers { count: usize, max: usize },
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("play box is {width} wide, too narrow for a ball of radius {radius}")]
    BoxTooNarrow { width: f32, radius: f32 },
}

/// Container geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
    /// Gap between the outer wall and the play box edges
    pub wall_inset: f32,
    /// Game-over line (y, measured from the top)
    pub threshold_y: f32,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            width: CONTAINER_WIDTH,
            height: CONTAINER_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            wall_inset: WALL_INSET,
            threshold_y: GAME_OVER_LINE,
        }
    }
}

/// Physics constants, all per tick
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub friction: f32,
    pub bounce_stop: f32,
    pub wall_pad: f32,
    pub separation_slop: f32,
    /// Restitution given to player-dropped balls
    pub restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            bounce_stop: BOUNCE_STOP,
            wall_pad: WALL_PAD,
            separation_slop: SEPARATION_SLOP,
            restitution: BALL_RESTITUTION,
        }
    }
}

/// Player cursor and drop rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub cooldown_ms: u64,
    /// How many of the lowest tiers the player can drop
    pub spawnable_tiers: usize,
    pub player_speed: f32,
    pub player_width: f32,
    /// Left edge of the cursor at session start
    pub player_start_x: f32,
    pub preview_y: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: SPAWN_COOLDOWN_MS,
            spawnable_tiers: SPAWNABLE_TIERS,
            player_speed: PLAYER_SPEED,
            player_width: PLAYER_WIDTH,
            player_start_x: PLAYER_START_X,
            preview_y: PREVIEW_Y,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tick_rate_hz: u32,
    pub container: ContainerConfig,
    pub physics: PhysicsConfig,
    pub spawn: SpawnConfig,
    pub tiers: TierTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,
            container: ContainerConfig::default(),
            physics: PhysicsConfig::default(),
            spawn: SpawnConfig::default(),
            tiers: TierTable::default(),
        }
    }
}

fn check(field: &'static str, value: f32, ok: bool) -> Result<(), ConfigError> {
    if value.is_finite() && ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
        })
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check every constant the simulation relies on
    ///
    /// The tier table validates itself when built or deserialized.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::OutOfRange {
                field: "tick_rate_hz",
                value: 0.0,
            });
        }

        let c = &self.container;
        check("container.width", c.width, c.width > 0.0)?;
        check("container.height", c.height, c.height > 0.0)?;
        check("container.wall_thickness", c.wall_thickness, c.wall_thickness >= 0.0)?;
        check("container.wall_inset", c.wall_inset, c.wall_inset >= 0.0)?;
        let bounds = self.bounds();
        check(
            "container.threshold_y",
            c.threshold_y,
            c.threshold_y < bounds.floor,
        )?;

        let p = &self.physics;
        check("physics.gravity", p.gravity, p.gravity >= 0.0)?;
        check(
            "physics.friction",
            p.friction,
            p.friction > 0.0 && p.friction <= 1.0,
        )?;
        check("physics.bounce_stop", p.bounce_stop, p.bounce_stop > 0.0)?;
        check("physics.wall_pad", p.wall_pad, p.wall_pad >= 0.0)?;
        check(
            "physics.separation_slop",
            p.separation_slop,
            p.separation_slop > 0.0,
        )?;
        check(
            "physics.restitution",
            p.restitution,
            (0.0..=1.0).contains(&p.restitution),
        )?;

        let s = &self.spawn;
        if s.spawnable_tiers == 0 || s.spawnable_tiers > Tier::COUNT {
            return Err(ConfigError::SpawnableTiers {
                count: s.spawnable_tiers,
                max: Tier::COUNT,
            });
        }
        check("spawn.player_speed", s.player_speed, s.player_speed >= 0.0)?;
        check("spawn.player_width", s.player_width, s.player_width > 0.0)?;
        check("spawn.player_start_x", s.player_start_x, true)?;
        check("spawn.preview_y", s.preview_y, true)?;

        let radius = self.tiers.max_radius();
        if 2.0 * (radius + p.wall_pad) >= bounds.width() {
            return Err(ConfigError::BoxTooNarrow {
                width: bounds.width(),
                radius,
            });
        }

        Ok(())
    }

    /// Inner edges of the play box
    pub fn bounds(&self) -> Bounds {
        let c = &self.container;
        let edge = c.wall_thickness + c.wall_inset;
        Bounds {
            left: edge,
            right: c.width - edge,
            floor: c.height - edge,
            threshold: c.threshold_y,
        }
    }

    /// Milliseconds covered by `ticks` fixed steps
    pub fn ticks_to_ms(&self, ticks: u64) -> u64 {
        ticks * 1000 / self.tick_rate_hz as u64
    }

    /// Cursor x range (left edge of the cursor)
    pub fn cursor_range(&self) -> (f32, f32) {
        let c = &self.container;
        let min = c.wall_thickness - 10.0;
        let max = c.width - c.wall_thickness + 10.0 - self.spawn.player_width;
        (min, max.max(min))
    }

    /// Tiers the player may drop, lowest first
    pub fn spawnable(&self) -> &[Tier] {
        &Tier::ALL[..self.spawn.spawnable_tiers]
    }
}
