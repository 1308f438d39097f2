//! Ball entity

use glam::Vec2;

use super::tier::{Tier, TierTable};

/// A physical disc in the container
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    /// Stable identity within a session, used for removal
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fraction of speed kept after a bounce (0-1)
    pub restitution: f32,
    /// Set once the ball has touched the floor or another ball
    pub landed: bool,
    tier: Tier,
    radius: f32,
}

impl Ball {
    /// Create a ball at rest; the radius comes from the tier table
    pub fn new(id: u32, tier: Tier, pos: Vec2, restitution: f32, tiers: &TierTable) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            restitution,
            landed: false,
            tier,
            radius: tiers.radius(tier),
        }
    }

    #[inline]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Topmost point of the disc (y grows downward)
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    /// Lowest point of the disc
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.vel.length_squared()
    }

    /// Whether the two discs intersect
    pub fn overlaps(&self, other: &Ball) -> bool {
        crate::distance(self.pos, other.pos) < self.radius + other.radius
    }

    /// Ball produced by merging `self` with `other`, or `None` if the pair
    /// cannot merge (different tiers or terminal tier)
    pub fn merge_with(&self, other: &Ball, id: u32, tiers: &TierTable) -> Option<Ball> {
        if self.tier != other.tier {
            return None;
        }
        let next = tiers.next(self.tier)?;
        Some(Ball {
            id,
            pos: (self.pos + other.pos) * 0.5,
            vel: (self.vel + other.vel) * 0.5,
            restitution: (self.restitution + other.restitution) * 0.5,
            landed: true,
            tier: next,
            radius: tiers.radius(next),
        })
    }
}

/// Monotonic ball id source, one per session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallIds {
    next: u32,
}

impl Default for BallIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl BallIds {
    /// Allocate a new id
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}
