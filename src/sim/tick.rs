//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session by one frame.

use glam::Vec2;
use serde::Serialize;

use super::ball::Ball;
use super::collision::{Resolution, resolve};
use super::physics::{confine, step_ball};
use super::state::{GameEvent, GamePhase, GameState};
use super::tier::Tier;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Cursor steps this frame (negative = left)
    pub move_delta: i32,
    /// Drop the preview ball (subject to cooldown)
    pub spawn: bool,
}

/// Render data for one disc
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub tier: Tier,
}

impl From<&Ball> for BallView {
    fn from(ball: &Ball) -> Self {
        Self {
            id: ball.id,
            pos: ball.pos,
            radius: ball.radius(),
            tier: ball.tier(),
        }
    }
}

/// Read-only view of the session after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub balls: Vec<BallView>,
    pub preview: BallView,
    pub score: u64,
    pub is_game_over: bool,
}

impl GameState {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tick: self.time_ticks,
            balls: self.balls.iter().map(BallView::from).collect(),
            preview: BallView::from(&self.preview),
            score: self.score,
            is_game_over: self.is_game_over(),
        }
    }
}

/// Remove consumed balls by id, append merge products, keep everyone inside
fn reconcile(state: &mut GameState, resolution: Resolution) {
    let Resolution {
        removed,
        spawned,
        score_delta,
        merges,
    } = resolution;

    state.score += score_delta;
    if !removed.is_empty() {
        state.balls.retain(|b| !removed.contains(&b.id));
    }
    state.balls.extend(spawned);
    state
        .events
        .extend(merges.into_iter().map(GameEvent::Merged));

    for ball in &mut state.balls {
        confine(ball, &state.bounds);
    }
}

/// Advance the game state by one fixed timestep
///
/// Once the session is over this returns the final snapshot unchanged.
pub fn tick(state: &mut GameState, input: &TickInput) -> SessionSnapshot {
    if state.phase == GamePhase::GameOver {
        return state.snapshot();
    }

    state.events.clear();
    state.time_ticks += 1;
    state.move_cursor(input.move_delta);

    for ball in &mut state.balls {
        step_ball(ball, &state.config.physics, &state.bounds);
    }

    let resolution = resolve(
        &mut state.balls,
        &state.config.tiers,
        state.config.physics.separation_slop,
        &mut state.ids,
    );
    reconcile(state, resolution);

    if state.over_threshold() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!(
            "Game over at tick {} with score {}",
            state.time_ticks,
            state.score
        );
    } else if input.spawn {
        state.try_spawn();
    }

    state.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DROP: TickInput = TickInput {
        move_delta: 0,
        spawn: true,
    };

    #[test]
    fn test_yellow_on_yellow_merges() {
        let mut state = GameState::new(12345);
        let floor = state.bounds().floor;
        let below = state.insert_ball(Tier::Yellow, Vec2::new(250.0, floor - 10.0));
        let above = state.insert_ball(Tier::Yellow, Vec2::new(250.0, 600.0));
        assert_eq!(state.balls.len(), 2);

        let mut merged_at = None;
        for _ in 0..120 {
            let snap = tick(&mut state, &TickInput::default());
            if snap.balls.len() == 1 {
                merged_at = Some(snap);
                break;
            }
        }

        let snap = merged_at.expect("balls never merged");
        assert_eq!(snap.score, 10);
        assert_eq!(snap.balls[0].tier, Tier::Orange);
        assert!(state.ball(below).is_none());
        assert!(state.ball(above).is_none());
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Merged(m) if m.consumed == [below, above]))
        );
    }

    #[test]
    fn test_dropped_yellow_merges_with_resting_yellow() {
        let mut state = GameState::new(12345);
        let floor = state.bounds().floor;
        let tiers = state.config().tiers.clone();
        let (id, pos) = (state.preview.id, state.preview.pos);
        state.preview = Ball::new(id, Tier::Yellow, pos, 0.3, &tiers);
        let below = state.insert_ball(Tier::Yellow, Vec2::new(260.0, floor - 10.0));

        let snap = tick(&mut state, &DROP);
        assert_eq!(snap.balls.len(), 2);
        let dropped = snap.balls[1].id;

        let mut merged_at = None;
        for _ in 0..200 {
            let snap = tick(&mut state, &TickInput::default());
            if snap.balls.len() == 1 {
                merged_at = Some(snap);
                break;
            }
        }

        let snap = merged_at.expect("dropped ball never merged");
        assert_eq!(snap.score, 10);
        assert_eq!(snap.balls[0].tier, Tier::Orange);
        assert!(state.ball(below).is_none());
        assert!(state.ball(dropped).is_none());
    }

    #[test]
    fn test_removal_by_id_keeps_identical_ball() {
        let mut state = GameState::new(4);
        let floor = state.bounds().floor;
        let a = state.insert_ball(Tier::Yellow, Vec2::new(250.0, floor - 10.0));
        let b = state.insert_ball(Tier::Yellow, Vec2::new(255.0, floor - 10.0));
        let c = state.insert_ball(Tier::Yellow, Vec2::new(250.0, floor - 10.0));

        let snap = tick(&mut state, &TickInput::default());
        assert!(state.ball(a).is_none());
        assert!(state.ball(b).is_none());
        let survivor = state.ball(c).expect("identical ball was removed");
        assert_eq!(survivor.tier(), Tier::Yellow);
        assert_eq!(snap.balls.len(), 2);
        assert_eq!(
            snap.balls.iter().filter(|v| v.tier == Tier::Orange).count(),
            1
        );
        assert_eq!(snap.score, 10);
    }

    #[test]
    fn test_stacking_drops_ends_game() {
        let mut state = GameState::new(3);
        let mut last = None;
        for _ in 0..3000 {
            let snap = tick(&mut state, &DROP);
            if snap.is_game_over {
                last = Some(snap);
                break;
            }
        }

        let snap = last.expect("stack never reached the line");
        let threshold = state.bounds().threshold;
        assert!(
            state
                .balls
                .iter()
                .any(|b| b.landed && b.top() < threshold)
        );
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );

        for _ in 0..10 {
            assert_eq!(tick(&mut state, &DROP), snap);
        }
    }

    #[test]
    fn test_landed_ball_over_line_ends_game() {
        let mut state = GameState::new(1);
        let id = state.insert_ball(Tier::Yellow, Vec2::new(250.0, 50.0));
        if let Some(ball) = state.ball_mut(id) {
            ball.landed = true;
        }

        let snap = tick(&mut state, &TickInput::default());
        assert!(snap.is_game_over);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Every later tick is a no-op
        let after = tick(&mut state, &DROP);
        assert_eq!(after, snap);
        let after = tick(
            &mut state,
            &TickInput {
                move_delta: 5,
                spawn: false,
            },
        );
        assert_eq!(after, snap);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_falling_ball_above_line_is_not_game_over() {
        let mut state = GameState::new(1);
        state.insert_ball(Tier::Yellow, Vec2::new(250.0, 50.0));
        let snap = tick(&mut state, &TickInput::default());
        assert!(!snap.is_game_over);
    }

    #[test]
    fn test_spawn_cooldown() {
        let mut state = GameState::new(77);
        tick(&mut state, &DROP);
        assert_eq!(state.balls.len(), 1);
        tick(&mut state, &DROP);
        assert_eq!(state.balls.len(), 1);

        // 500 ms at 60 Hz is 30 ticks; the cooldown must be exceeded
        for _ in 0..28 {
            tick(&mut state, &TickInput::default());
        }
        tick(&mut state, &DROP);
        assert_eq!(state.balls.len(), 1);
        tick(&mut state, &DROP);
        assert_eq!(state.balls.len(), 2);
    }

    #[test]
    fn test_spawned_ball_takes_preview() {
        let mut state = GameState::new(3);
        let preview = state.preview.clone();
        tick(
            &mut state,
            &TickInput {
                move_delta: -10,
                spawn: true,
            },
        );
        let dropped = state.ball(preview.id).expect("preview was not dropped");
        assert_eq!(dropped.tier(), preview.tier());
        assert_eq!(dropped.pos.x, 260.0 - 30.0);
        assert_ne!(state.preview.id, preview.id);
    }

    #[test]
    fn test_idle_ticks_only_move_cursor() {
        let mut state = GameState::new(2024);
        let tier = state.preview.tier();
        let id = state.preview.id;

        for _ in 0..50 {
            let snap = tick(
                &mut state,
                &TickInput {
                    move_delta: 1,
                    spawn: false,
                },
            );
            assert_eq!(snap.score, 0);
            assert!(snap.balls.is_empty());
            assert_eq!(snap.preview.tier, tier);
            assert_eq!(snap.preview.id, id);
        }
        assert_eq!(state.preview.pos.x, 260.0 + 150.0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        for i in 0..600 {
            let input = TickInput {
                move_delta: if (i / 45) % 2 == 0 { 2 } else { -3 },
                spawn: i % 20 == 0,
            };
            let a = tick(&mut state1, &input);
            let b = tick(&mut state2, &input);
            assert_eq!(a, b);
        }
        assert!(state1.time_ticks > 0);
    }

    #[test]
    fn test_balls_stay_in_bounds() {
        let mut state = GameState::new(31337);
        for i in 0..900 {
            let input = TickInput {
                move_delta: ((i * 7) % 5) as i32 - 2,
                spawn: i % 25 == 0,
            };
            let snap = tick(&mut state, &input);
            let b = *state.bounds();
            for ball in &snap.balls {
                assert!(ball.pos.x - ball.radius >= b.left - 1e-3);
                assert!(ball.pos.x + ball.radius <= b.right + 1e-3);
                assert!(ball.pos.y + ball.radius <= b.floor + 1e-3);
            }
            if snap.is_game_over {
                break;
            }
        }
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut state = GameState::new(8);
        let id = state.insert_ball(Tier::Red, Vec2::new(250.0, 60.0));
        if let Some(ball) = state.ball_mut(id) {
            ball.landed = true;
        }
        assert!(tick(&mut state, &TickInput::default()).is_game_over);

        state.reset();
        let snap = tick(&mut state, &DROP);
        assert!(!snap.is_game_over);
        assert_eq!(snap.balls.len(), 1);
        assert_eq!(snap.score, 0);
    }
}
