//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the ball list)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod physics;
pub mod state;
pub mod tick;
pub mod tier;

pub use ball::{Ball, BallIds};
pub use collision::{MergeEvent, Resolution, bounce_pair, resolve};
pub use physics::{Bounds, confine, step_ball};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{BallView, SessionSnapshot, TickInput, tick};
pub use tier::{Tier, TierSpec, TierTable};
