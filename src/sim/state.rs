//! Game session state
//!
//! A single owned value holds everything the simulation touches: the active
//! balls, the queued preview ball, the cursor, score, drop cooldown and the
//! seeded RNG used for preview tiers.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ball::{Ball, BallIds};
use super::collision::MergeEvent;
use super::physics::{Bounds, confine};
use super::tier::Tier;
use crate::config::{ConfigError, GameConfig};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Balls fall, merge and can be dropped
    Running,
    /// A landed ball crossed the top line; terminal
    GameOver,
}

/// Things that happened during the last tick, for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The preview ball was dropped into the container
    Spawned { id: u32, tier: Tier },
    Merged(MergeEvent),
    GameOver { score: u64 },
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// Simulation tick counter (only advances while running)
    pub time_ticks: u64,
    /// Tick of the last accepted drop
    pub last_shot_tick: Option<u64>,
    /// Left edge of the player cursor
    pub cursor_x: f32,
    /// Active balls in insertion order
    pub balls: Vec<Ball>,
    /// Next ball to drop; follows the cursor, not simulated
    pub preview: Ball,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub(crate) config: GameConfig,
    pub(crate) bounds: Bounds,
    rng: Pcg32,
    pub(crate) ids: BallIds,
}

impl GameState {
    /// Create a session with the default configuration
    pub fn new(seed: u64) -> Self {
        Self::build(GameConfig::default(), seed)
    }

    /// Create a session with a custom configuration, validating it first
    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        let bounds = config.bounds();
        let cursor_x = config.spawn.player_start_x;
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = BallIds::default();
        let preview = Self::draw_preview(&config, &mut rng, &mut ids, cursor_x);

        log::info!("Session started with seed {}", seed);

        Self {
            seed,
            phase: GamePhase::Running,
            score: 0,
            time_ticks: 0,
            last_shot_tick: None,
            cursor_x,
            balls: Vec::new(),
            preview,
            events: Vec::new(),
            config,
            bounds,
            rng,
            ids,
        }
    }

    /// Start over with the same seed and configuration
    pub fn reset(&mut self) {
        self.reset_with_seed(self.seed);
    }

    /// Start over with a new seed, keeping the configuration
    pub fn reset_with_seed(&mut self, seed: u64) {
        let config = std::mem::take(&mut self.config);
        *self = Self::build(config, seed);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Centre of the preview ball for a cursor position
    fn preview_pos(config: &GameConfig, cursor_x: f32) -> Vec2 {
        Vec2::new(
            cursor_x + config.spawn.player_width / 2.0,
            config.spawn.preview_y,
        )
    }

    fn draw_preview(config: &GameConfig, rng: &mut Pcg32, ids: &mut BallIds, cursor_x: f32) -> Ball {
        let spawnable = config.spawnable();
        let tier = spawnable[rng.random_range(0..spawnable.len())];
        Ball::new(
            ids.next_id(),
            tier,
            Self::preview_pos(config, cursor_x),
            config.physics.restitution,
            &config.tiers,
        )
    }

    /// Move the cursor by `delta` steps, clamped to the container
    pub fn move_cursor(&mut self, delta: i32) {
        if delta != 0 {
            let (min, max) = self.config.cursor_range();
            let x = self.cursor_x + delta as f32 * self.config.spawn.player_speed;
            self.cursor_x = x.clamp(min, max);
        }
        self.preview.pos = Self::preview_pos(&self.config, self.cursor_x);
    }

    /// Whether the drop cooldown has elapsed
    pub fn can_spawn(&self) -> bool {
        match self.last_shot_tick {
            None => true,
            Some(last) => {
                let elapsed = self.config.ticks_to_ms(self.time_ticks - last);
                elapsed > self.config.spawn.cooldown_ms
            }
        }
    }

    /// Drop the preview ball if the cooldown allows it
    ///
    /// Returns the id of the new active ball.
    pub fn try_spawn(&mut self) -> Option<u32> {
        if self.phase != GamePhase::Running {
            return None;
        }
        if !self.can_spawn() {
            log::debug!("Spawn rejected at tick {} (cooldown)", self.time_ticks);
            return None;
        }

        let next = Self::draw_preview(&self.config, &mut self.rng, &mut self.ids, self.cursor_x);
        let mut dropped = std::mem::replace(&mut self.preview, next);
        confine(&mut dropped, &self.bounds);
        let (id, tier) = (dropped.id, dropped.tier());
        self.balls.push(dropped);
        self.last_shot_tick = Some(self.time_ticks);
        self.events.push(GameEvent::Spawned { id, tier });
        log::debug!("Spawned {:?} ball {} at tick {}", tier, id, self.time_ticks);
        Some(id)
    }

    /// Place a ball directly into the container
    #[cfg(test)]
    pub fn insert_ball(&mut self, tier: Tier, pos: Vec2) -> u32 {
        let id = self.ids.next_id();
        let ball = Ball::new(id, tier, pos, self.config.physics.restitution, &self.config.tiers);
        self.balls.push(ball);
        id
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    #[cfg(test)]
    pub fn ball_mut(&mut self, id: u32) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    /// Whether any landed ball pokes above the game-over line
    pub fn over_threshold(&self) -> bool {
        self.balls
            .iter()
            .any(|b| b.landed && b.top() < self.bounds.threshold)
    }
}
