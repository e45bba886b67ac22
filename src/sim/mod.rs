//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete step per tick
//! - Seeded RNG only
//! - Single-threaded tick path
//! - No rendering or platform dependencies

pub mod input;
pub mod particles;
pub mod physics;
pub mod score;
pub mod session;
pub mod state;

pub use input::{InputState, Key};
pub use particles::{MAX_PARTICLES, Particle, ParticleSystem};
pub use physics::PhysicsEvent;
pub use score::{Score, ScoreKeeper};
pub use session::{Command, GameSession, Scheduler};
pub use state::{Ball, GameEvent, GamePhase, Paddle, PlayerId};
