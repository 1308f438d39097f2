//! Suika Drop - falling-ball merge game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, merges, game state)
//! - `config`: Construction-time constants with fail-fast validation
//!
//! Rendering, input polling and frame pacing live outside this crate. A host
//! calls [`sim::tick`] once per frame and draws the returned snapshot.

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig};

use glam::Vec2;

/// Game configuration defaults
pub mod consts {
    /// Fixed simulation rate (one tick per rendered frame)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Screen/container dimensions
    pub const CONTAINER_WIDTH: f32 = 500.0;
    pub const CONTAINER_HEIGHT: f32 = 720.0;
    pub const WALL_THICKNESS: f32 = 10.0;
    /// Gap between the outer wall and the play box
    pub const WALL_INSET: f32 = 15.0;
    /// Landed balls whose top edge rises above this line end the run
    pub const GAME_OVER_LINE: f32 = 110.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.40;
    /// Horizontal velocity retained per tick
    pub const FRICTION: f32 = 0.99999;
    /// Vertical speed below which a floor contact stops the ball
    pub const BOUNCE_STOP: f32 = 0.3;
    /// Push-back from a wall after contact, prevents re-penetration jitter
    pub const WALL_PAD: f32 = 6.0;
    /// Extra distance added when separating overlapping balls
    pub const SEPARATION_SLOP: f32 = 1.0;
    /// Restitution for player-dropped balls
    pub const BALL_RESTITUTION: f32 = 0.3;

    /// Minimum time between accepted drops
    pub const SPAWN_COOLDOWN_MS: u64 = 500;
    /// Number of low tiers the player can drop
    pub const SPAWNABLE_TIERS: usize = 3;
    /// Cursor movement per tick for a unit move input
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_WIDTH: f32 = 100.0;
    pub const PLAYER_START_X: f32 = 210.0;
    /// Vertical position of the preview ball under the cursor
    pub const PREVIEW_Y: f32 = 100.0;
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Angle of the direction from `from` to `to` (radians, atan2 convention)
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit normal pointing from `from` toward `to`
///
/// Coincident points yield +X, so callers always get a usable axis.
#[inline]
pub fn contact_normal(from: Vec2, to: Vec2) -> Vec2 {
    Vec2::from_angle(angle_to(from, to))
}
