//! Core simulation types
//!
//! Leaf data for the board: players, paddles, the ball, game phase, and the
//! events the simulation emits for presentation/audio collaborators.

use glam::Vec2;

use super::score::Score;
use crate::consts::*;

/// One of the two local players. Player one defends the left side,
/// player two the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn opponent(&self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerId::One => "Player 1",
            PlayerId::Two => "Player 2",
        }
    }
}

/// A player's paddle. The x position is fixed per side; only y moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub y: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self { y: PADDLE_START_Y }
    }
}

impl Paddle {
    /// Move vertically by `delta`, clamped to the board.
    pub fn shift(&mut self, delta: f32) {
        self.y = (self.y + delta).clamp(0.0, BOARD_HEIGHT - PADDLE_HEIGHT);
    }

    /// Whether the ball's vertical extent overlaps this paddle.
    pub fn overlaps(&self, ball_y: f32) -> bool {
        ball_y + BALL_SIZE >= self.y && ball_y <= self.y + PADDLE_HEIGHT
    }
}

/// The ball. Position is the top-left corner of its bounding square,
/// matching how the renderer places it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    /// Ball at the board center with the given per-axis velocity signs.
    pub fn serve(vx_sign: f32, vy_sign: f32) -> Self {
        Self {
            pos: Vec2::new(BALL_RESET_X, BALL_RESET_Y),
            vel: Vec2::new(SERVE_SPEED * vx_sign, SERVE_SPEED * vy_sign),
        }
    }

    /// Recenter for the next point, keeping the given serve direction.
    pub fn reset(&mut self, vx_sign: f32, vy_sign: f32) {
        *self = Self::serve(vx_sign, vy_sign);
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Ball center (events and deflection math use the center).
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(BALL_SIZE / 2.0)
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Created, never started
    Idle,
    /// Ticking
    Running,
    /// Frozen mid-match; positions untouched
    Paused,
    /// Match over, winner retained for display
    Ended(PlayerId),
}

/// Events emitted by the simulation, consumed synchronously by the caller
/// in the same tick (audio cues, particles, HUD updates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball bounced off the top or bottom wall; y is the board boundary
    WallHit { x: f32, y: f32 },
    /// Ball bounced off a paddle; x/y is the contact point on the hit zone
    PaddleHit { x: f32, y: f32, side: PlayerId },
    /// A point was scored; `score` is the updated tally
    ScorePoint { scorer: PlayerId, score: Score },
    /// A player reached the win threshold
    GameEnded { winner: PlayerId, final_score: Score },
}
