//! Volley Pong - classic two-player Pong
//!
//! Core modules:
//! - `sim`: Deterministic simulation (input, physics, scoring, game state)
//! - `renderer`: DOM presentation adapter
//! - `audio`: Web Audio sound cues
//! - `settings`: Player preferences

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const BOARD_WIDTH: f32 = 800.0;
    pub const BOARD_HEIGHT: f32 = 500.0;

    /// Paddle geometry - each paddle is a vertical bar inset from its side
    pub const PADDLE_HEIGHT: f32 = 80.0;
    pub const PADDLE_WIDTH: f32 = 12.0;
    /// Horizontal inset of each paddle face from its board edge
    pub const PADDLE_OFFSET: f32 = 50.0;
    /// Vertical paddle travel per tick per held key
    pub const PADDLE_SPEED: f32 = 7.0;
    /// Starting y for both paddles (vertically centered)
    pub const PADDLE_START_Y: f32 = (BOARD_HEIGHT - PADDLE_HEIGHT) / 2.0;

    /// Hit zone for the left paddle: [inner, outer] x-band
    pub const LEFT_BAND_MIN: f32 = PADDLE_OFFSET;
    pub const LEFT_BAND_MAX: f32 = PADDLE_OFFSET + PADDLE_WIDTH;
    /// Hit zone for the right paddle
    pub const RIGHT_BAND_MIN: f32 = BOARD_WIDTH - PADDLE_OFFSET - PADDLE_WIDTH;
    pub const RIGHT_BAND_MAX: f32 = BOARD_WIDTH - PADDLE_OFFSET;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 15.0;
    /// Serve speed per axis
    pub const SERVE_SPEED: f32 = 5.0;
    /// Ball reset position (board center, offset by half the ball)
    pub const BALL_RESET_X: f32 = 392.0;
    pub const BALL_RESET_Y: f32 = 242.0;

    /// Full deflection range across the paddle face (radians).
    /// A center hit reflects straight; edge hits deflect up to half this.
    pub const DEFLECTION_RANGE: f32 = 0.8;
    /// Speed multiplier applied on paddle hits while below the cap
    pub const SPEED_AMP: f32 = 1.05;
    /// Amplification stops once |vx| reaches this
    pub const SPEED_AMP_CAP: f32 = 15.0;

    /// First player to reach this score wins
    pub const WIN_SCORE: u32 = 10;
}
