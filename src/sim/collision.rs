//! Ball-ball collision and merge resolution
//!
//! One pass over every pair (i < j) in collection order. Overlapping pairs of
//! the same mergeable tier become a merge; everything else that overlaps gets
//! an elastic velocity exchange and is pushed apart. The active collection is
//! never resized here: removals and merge products are returned for the
//! caller to apply after the scan.

use glam::Vec2;

use super::ball::{Ball, BallIds};
use super::tier::{Tier, TierTable};
use crate::{contact_normal, distance};

/// A merge that happened during a scan
#[derive(Debug, Clone, PartialEq)]
pub struct MergeEvent {
    /// Ids of the two consumed balls
    pub consumed: [u32; 2],
    /// Id of the new ball
    pub created: u32,
    /// Tier of the new ball
    pub tier: Tier,
    pub pos: Vec2,
    /// Points awarded for this merge
    pub points: u64,
}

/// Deferred outcome of one resolver pass
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Ids of balls consumed by merges
    pub removed: Vec<u32>,
    /// Merge products, in the order they were created
    pub spawned: Vec<Ball>,
    pub score_delta: u64,
    pub merges: Vec<MergeEvent>,
}

impl Resolution {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.spawned.is_empty()
    }
}

/// Resolve all pairwise contacts among `balls`
///
/// A ball consumed by an earlier merge in this pass is skipped by every later
/// pair (first match wins).
pub fn resolve(balls: &mut [Ball], tiers: &TierTable, slop: f32, ids: &mut BallIds) -> Resolution {
    let mut out = Resolution::default();
    let mut consumed = vec![false; balls.len()];

    for i in 0..balls.len() {
        for j in (i + 1)..balls.len() {
            if consumed[i] || consumed[j] {
                continue;
            }

            let (head, tail) = balls.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            let dist = distance(a.pos, b.pos);
            if dist >= a.radius() + b.radius() {
                continue;
            }

            if a.tier() == b.tier() && tiers.next(a.tier()).is_some() {
                let id = ids.next_id();
                if let Some(merged) = a.merge_with(b, id, tiers) {
                    let points = tiers.score(a.tier());
                    log::debug!(
                        "merge {} + {} -> {} ({:?}, +{})",
                        a.id,
                        b.id,
                        id,
                        merged.tier(),
                        points
                    );
                    consumed[i] = true;
                    consumed[j] = true;
                    out.removed.extend([a.id, b.id]);
                    out.score_delta += points;
                    out.merges.push(MergeEvent {
                        consumed: [a.id, b.id],
                        created: id,
                        tier: merged.tier(),
                        pos: merged.pos,
                        points,
                    });
                    out.spawned.push(merged);
                }
                continue;
            }

            bounce_pair(a, b, dist, slop);
        }
    }

    out
}

/// Equal-mass elastic exchange along the contact normal, then separation
///
/// Each ball keeps its own tangential component and swaps the normal one,
/// so total kinetic energy is preserved before restitution scales it down.
pub fn bounce_pair(a: &mut Ball, b: &mut Ball, dist: f32, slop: f32) {
    let n = contact_normal(a.pos, b.pos);

    let a_n = a.vel.dot(n);
    let b_n = b.vel.dot(n);
    a.vel = (a.vel + (b_n - a_n) * n) * a.restitution;
    b.vel = (b.vel + (a_n - b_n) * n) * b.restitution;

    let push = 0.5 * (a.radius() + b.radius() - dist + slop);
    a.pos -= n * push;
    b.pos += n * push;

    a.landed = true;
    b.landed = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(id: u32, tier: Tier, x: f32, y: f32) -> Ball {
        Ball::new(id, tier, Vec2::new(x, y), 0.3, &TierTable::default())
    }

    fn ids_after(n: u32) -> BallIds {
        let mut ids = BallIds::default();
        for _ in 0..n {
            ids.next_id();
        }
        ids
    }

    #[test]
    fn test_same_tier_overlap_merges() {
        let tiers = TierTable::default();
        let mut balls = vec![
            ball(1, Tier::Yellow, 100.0, 300.0),
            ball(2, Tier::Yellow, 110.0, 300.0),
        ];
        let mut ids = ids_after(2);

        let res = resolve(&mut balls, &tiers, 1.0, &mut ids);
        assert_eq!(res.removed, vec![1, 2]);
        assert_eq!(res.spawned.len(), 1);
        assert_eq!(res.score_delta, 10);

        let merged = &res.spawned[0];
        assert_eq!(merged.id, 3);
        assert_eq!(merged.tier(), Tier::Orange);
        assert_eq!(merged.pos, Vec2::new(105.0, 300.0));
        assert_eq!(res.merges[0].consumed, [1, 2]);
    }

    #[test]
    fn test_separated_pair_untouched() {
        let tiers = TierTable::default();
        let mut balls = vec![
            ball(1, Tier::Red, 100.0, 300.0),
            ball(2, Tier::Blue, 190.0, 300.0),
        ];
        balls[0].vel = Vec2::new(1.0, 0.0);
        let before = balls.clone();

        let res = resolve(&mut balls, &tiers, 1.0, &mut ids_after(2));
        assert!(res.is_empty());
        assert_eq!(balls, before);
    }

    #[test]
    fn test_terminal_tier_bounces() {
        let tiers = TierTable::default();
        let mut balls = vec![
            ball(1, Tier::Gold, 200.0, 300.0),
            ball(2, Tier::Gold, 300.0, 300.0),
        ];
        let res = resolve(&mut balls, &tiers, 1.0, &mut ids_after(2));
        assert!(res.is_empty());
        assert_eq!(res.score_delta, 0);
        assert!(distance(balls[0].pos, balls[1].pos) > 360.0);
    }

    #[test]
    fn test_different_tiers_separate() {
        let tiers = TierTable::default();
        let mut balls = vec![
            ball(1, Tier::Yellow, 100.0, 300.0),
            ball(2, Tier::Orange, 120.0, 300.0),
        ];
        balls[0].vel = Vec2::new(4.0, 0.0);
        balls[1].vel = Vec2::new(-1.0, 0.0);

        let res = resolve(&mut balls, &tiers, 1.0, &mut ids_after(2));
        assert!(res.is_empty());
        // Normal components swapped, then scaled by restitution
        assert!((balls[0].vel.x - (-0.3)).abs() < 1e-5);
        assert!((balls[1].vel.x - 1.2).abs() < 1e-5);
        assert!(distance(balls[0].pos, balls[1].pos) > 30.0);
        assert!(balls[0].landed && balls[1].landed);
    }

    #[test]
    fn test_tangential_component_kept() {
        let mut a = ball(1, Tier::Red, 100.0, 300.0);
        let mut b = ball(2, Tier::Blue, 150.0, 300.0);
        a.restitution = 1.0;
        b.restitution = 1.0;
        a.vel = Vec2::new(2.0, 5.0);
        b.vel = Vec2::new(0.0, -1.0);

        bounce_pair(&mut a, &mut b, 50.0, 1.0);
        assert!((a.vel.x - 0.0).abs() < 1e-5);
        assert!((a.vel.y - 5.0).abs() < 1e-5);
        assert!((b.vel.x - 2.0).abs() < 1e-5);
        assert!((b.vel.y - (-1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_first_match_wins() {
        let tiers = TierTable::default();
        // Three yellows all touching: only the first pair merges
        let mut balls = vec![
            ball(1, Tier::Yellow, 100.0, 300.0),
            ball(2, Tier::Yellow, 105.0, 300.0),
            ball(3, Tier::Yellow, 110.0, 300.0),
        ];
        let res = resolve(&mut balls, &tiers, 1.0, &mut ids_after(3));
        assert_eq!(res.removed, vec![1, 2]);
        assert_eq!(res.spawned.len(), 1);
        assert_eq!(res.score_delta, 10);
    }

    #[test]
    fn test_two_independent_merges() {
        let tiers = TierTable::default();
        let mut balls = vec![
            ball(1, Tier::Red, 100.0, 600.0),
            ball(2, Tier::Orange, 300.0, 600.0),
            ball(3, Tier::Red, 150.0, 600.0),
            ball(4, Tier::Orange, 320.0, 600.0),
        ];
        let res = resolve(&mut balls, &tiers, 1.0, &mut ids_after(4));
        assert_eq!(res.removed, vec![1, 3, 2, 4]);
        assert_eq!(res.score_delta, 30 + 20);
        assert_eq!(res.spawned[0].tier(), Tier::Blue);
        assert_eq!(res.spawned[1].tier(), Tier::Red);
        assert_eq!(res.spawned[0].id, 5);
        assert_eq!(res.spawned[1].id, 6);
    }

    #[test]
    fn test_coincident_centers_still_separate() {
        let mut a = ball(1, Tier::Yellow, 200.0, 300.0);
        let mut b = ball(2, Tier::Orange, 200.0, 300.0);
        bounce_pair(&mut a, &mut b, 0.0, 1.0);
        assert!(distance(a.pos, b.pos) > 30.0);
    }
}
