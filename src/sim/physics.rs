//! Per-ball integration and container response
//!
//! Screen coordinates: x grows right, y grows downward, so gravity is +y and
//! the floor is the largest y a ball may reach.

use super::ball::Ball;
use crate::config::PhysicsConfig;

/// Inner edges of the play box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub floor: f32,
    /// Game-over line; landed balls must stay below it
    pub threshold: f32,
}

impl Bounds {
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }
}

/// Vertical bounce at the floor: reflect upward, or stop when slow
#[inline]
fn bounce_vertical(ball: &mut Ball, bounce_stop: f32) -> bool {
    if ball.vel.y.abs() > bounce_stop {
        ball.vel.y = -ball.vel.y.abs() * ball.restitution;
        true
    } else {
        ball.vel.y = 0.0;
        false
    }
}

/// Advance one ball by a single fixed step
pub fn step_ball(ball: &mut Ball, params: &PhysicsConfig, bounds: &Bounds) {
    let r = ball.radius();

    // Gravity and floor bounce are exclusive within a tick
    if ball.bottom() < bounds.floor {
        ball.vel.y += params.gravity;
    } else {
        bounce_vertical(ball, params.bounce_stop);
    }

    ball.pos += ball.vel;
    ball.vel.x *= params.friction;

    if ball.bottom() >= bounds.floor {
        ball.pos.y = bounds.floor - r;
        ball.landed = true;
        if !bounce_vertical(ball, params.bounce_stop) {
            ball.vel.x *= params.friction;
        }
    }

    if ball.pos.x - r <= bounds.left {
        ball.vel.x = ball.vel.x.abs() * ball.restitution;
        ball.pos.x = bounds.left + r + params.wall_pad;
    } else if ball.pos.x + r >= bounds.right {
        ball.vel.x = -ball.vel.x.abs() * ball.restitution;
        ball.pos.x = bounds.right - r - params.wall_pad;
    }
}

/// Clamp a ball back inside the box without touching its velocity
///
/// Collision separation and merge growth can push a disc through a wall.
pub fn confine(ball: &mut Ball, bounds: &Bounds) {
    let r = ball.radius();
    let min_x = bounds.left + r;
    let max_x = bounds.right - r;
    if min_x <= max_x {
        ball.pos.x = ball.pos.x.clamp(min_x, max_x);
    } else {
        ball.pos.x = (bounds.left + bounds.right) * 0.5;
    }
    if ball.pos.y + r > bounds.floor {
        ball.pos.y = bounds.floor - r;
    }
}
