//! Per-tick physics: paddle movement, ball integration, collision response
//!
//! One discrete Euler step per tick, no substepping. Tunneling at extreme
//! speed is an accepted limitation; the amplification cap keeps the ball
//! slower than the hit zones are wide in practice.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::input::InputState;
use super::state::{Ball, Paddle, PlayerId};
use crate::consts::*;

/// Events produced by one physics step, consumed by the caller in the
/// same tick (no queuing across ticks).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    /// Ball bounced off the top or bottom wall; y is the board boundary
    WallHit { x: f32, y: f32 },
    /// Ball bounced off a paddle; x is the hit-zone face
    PaddleHit { x: f32, y: f32, side: PlayerId },
    /// Ball left the board; it has already been re-served toward the scorer
    Scored { scorer: PlayerId, exit_y: f32 },
}

/// Advance paddles and ball by one tick.
///
/// Paddles are indexed [player 1, player 2]. The RNG is only drawn from
/// when a point is scored (serve vertical direction).
pub fn step(
    paddles: &mut [Paddle; 2],
    ball: &mut Ball,
    input: &InputState,
    rng: &mut Pcg32,
) -> Vec<PhysicsEvent> {
    let mut events = Vec::new();

    move_paddles(paddles, input);

    ball.pos += ball.vel;

    collide_walls(ball, &mut events);
    collide_paddles(ball, paddles, &mut events);
    if let Some(event) = check_scoring(ball, rng) {
        events.push(event);
    }

    events
}

/// Both paddles move independently and simultaneously; opposing held keys
/// cancel out.
fn move_paddles(paddles: &mut [Paddle; 2], input: &InputState) {
    if input.up1 {
        paddles[0].shift(-PADDLE_SPEED);
    }
    if input.down1 {
        paddles[0].shift(PADDLE_SPEED);
    }
    if input.up2 {
        paddles[1].shift(-PADDLE_SPEED);
    }
    if input.down2 {
        paddles[1].shift(PADDLE_SPEED);
    }
}

fn collide_walls(ball: &mut Ball, events: &mut Vec<PhysicsEvent>) {
    // Only reflect when moving into the wall, so a ball clamped to the
    // boundary can't get stuck re-inverting.
    if ball.pos.y <= 0.0 && ball.vel.y < 0.0 {
        ball.pos.y = 0.0;
        ball.vel.y = -ball.vel.y;
        events.push(PhysicsEvent::WallHit {
            x: ball.center().x,
            y: 0.0,
        });
    } else if ball.pos.y >= BOARD_HEIGHT - BALL_SIZE && ball.vel.y > 0.0 {
        ball.pos.y = BOARD_HEIGHT - BALL_SIZE;
        ball.vel.y = -ball.vel.y;
        events.push(PhysicsEvent::WallHit {
            x: ball.center().x,
            y: BOARD_HEIGHT,
        });
    }
}

/// Hit test: the ball's leading edge must be inside the side's x-band and
/// the vertical extents must overlap. The leading-edge direction check also
/// guarantees at most one deflection (and one amplification) per approach.
fn collide_paddles(ball: &mut Ball, paddles: &[Paddle; 2], events: &mut Vec<PhysicsEvent>) {
    if ball.vel.x < 0.0
        && ball.pos.x >= LEFT_BAND_MIN
        && ball.pos.x <= LEFT_BAND_MAX
        && paddles[0].overlaps(ball.pos.y)
    {
        deflect(ball, &paddles[0], PlayerId::One);
        events.push(PhysicsEvent::PaddleHit {
            x: LEFT_BAND_MAX,
            y: ball.center().y,
            side: PlayerId::One,
        });
    } else if ball.vel.x > 0.0
        && ball.pos.x + BALL_SIZE >= RIGHT_BAND_MIN
        && ball.pos.x + BALL_SIZE <= RIGHT_BAND_MAX
        && paddles[1].overlaps(ball.pos.y)
    {
        deflect(ball, &paddles[1], PlayerId::Two);
        events.push(PhysicsEvent::PaddleHit {
            x: RIGHT_BAND_MIN,
            y: ball.center().y,
            side: PlayerId::Two,
        });
    }
}

/// Recompute velocity from where the ball struck the paddle face.
///
/// `hit_pos` 0 is the paddle's top edge, 1 its bottom; center hits reflect
/// straight, edge hits deflect up to ±0.4 rad. Speed magnitude is preserved,
/// then amplified 5% while |vx| is under the cap.
fn deflect(ball: &mut Ball, paddle: &Paddle, side: PlayerId) {
    let hit_pos = ((ball.center().y - paddle.y) / PADDLE_HEIGHT).clamp(0.0, 1.0);
    let angle = (hit_pos - 0.5) * DEFLECTION_RANGE;

    // A zero velocity vector would make the angle math produce NaN via the
    // zero magnitude; floor it at serve speed.
    let mut speed = ball.speed();
    if speed <= f32::EPSILON {
        speed = SERVE_SPEED;
    }

    // Horizontal sign forces the ball away from the struck paddle.
    let dir = match side {
        PlayerId::One => 1.0,
        PlayerId::Two => -1.0,
    };
    ball.vel = Vec2::new(dir * speed * angle.cos(), speed * angle.sin());

    if ball.vel.x.abs() < SPEED_AMP_CAP {
        ball.vel *= SPEED_AMP;
    }
}

/// Serve direction after a point: away from the edge the ball exited.
pub fn serve_sign_after_exit(exit_side: PlayerId) -> f32 {
    match exit_side {
        PlayerId::One => 1.0,
        PlayerId::Two => -1.0,
    }
}

/// Uniformly random ±1.0
pub fn random_sign(rng: &mut Pcg32) -> f32 {
    if rng.random::<bool>() { 1.0 } else { -1.0 }
}

/// A ball past either goal line scores for the defender's opponent. The
/// ball is re-served from center immediately; the event carries the exit y
/// for particle placement.
fn check_scoring(ball: &mut Ball, rng: &mut Pcg32) -> Option<PhysicsEvent> {
    let exit_side = if ball.pos.x <= 0.0 {
        PlayerId::One
    } else if ball.pos.x >= BOARD_WIDTH - BALL_SIZE {
        PlayerId::Two
    } else {
        return None;
    };

    let exit_y = ball.pos.y;
    ball.reset(serve_sign_after_exit(exit_side), random_sign(rng));
    Some(PhysicsEvent::Scored {
        scorer: exit_side.opponent(),
        exit_y,
    })
}
