//! Match orchestration: game state machine and tick scheduling
//!
//! `GameSession` owns all mutable game state (no ambient globals) and is the
//! sole authority for phase transitions. The `Scheduler` collaborator drives
//! the loop; the session decides when to (re)request or cancel the next
//! tick, which decouples the simulation from any rendering environment.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::input::{InputState, Key};
use super::particles::ParticleSystem;
use super::physics::{self, PhysicsEvent};
use super::score::{Score, ScoreKeeper};
use super::state::{Ball, GameEvent, GamePhase, Paddle, PlayerId};
use crate::consts::BOARD_WIDTH;

/// Tick source abstraction (requestAnimationFrame on the web, a mock in
/// tests). Requests are one-shot: the session re-requests every tick it
/// wants a successor for.
pub trait Scheduler {
    fn request_next_tick(&mut self);
    /// Cancel the pending tick request, if any.
    fn cancel(&mut self);
}

/// Control commands from the UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    /// "Play again": reinitialize scores and positions, then run
    Reset,
}

/// A complete match: input snapshot, physics bodies, score, phase, and the
/// seeded RNG all serve directions are drawn from. Deterministic given its
/// seed and the sequence of inputs.
pub struct GameSession {
    seed: u64,
    rng: Pcg32,
    phase: GamePhase,
    input: InputState,
    paddles: [Paddle; 2],
    ball: Ball,
    scores: ScoreKeeper,
    particles: ParticleSystem,
    particles_enabled: bool,
    tick_count: u64,
}

impl GameSession {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball = Ball::serve(physics::random_sign(&mut rng), physics::random_sign(&mut rng));
        Self {
            seed,
            rng,
            phase: GamePhase::Idle,
            input: InputState::default(),
            paddles: [Paddle::default(), Paddle::default()],
            ball,
            scores: ScoreKeeper::default(),
            particles: ParticleSystem::default(),
            particles_enabled: true,
            tick_count: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> Score {
        self.scores.score()
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn paddles(&self) -> &[Paddle; 2] {
        &self.paddles
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Visual-only toggle: disabling stops new bursts, existing sparks fade
    /// out on their own. Physics is unaffected.
    pub fn set_particles_enabled(&mut self, enabled: bool) {
        self.particles_enabled = enabled;
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Feed a raw key event. Unknown keys are a no-op.
    pub fn apply_key(&mut self, raw: &str, pressed: bool) {
        if let Some(key) = Key::parse(raw) {
            self.input.set_key(key, pressed);
        }
    }

    /// Apply a UI command. Commands invalid for the current phase are
    /// silently ignored (guard conditions, not errors).
    pub fn command(&mut self, cmd: Command, scheduler: &mut impl Scheduler) {
        match (cmd, self.phase) {
            (Command::Start, GamePhase::Idle) => {
                log::info!("match started (seed {})", self.seed);
                // Keys pressed before the match began (including a stale
                // pause edge) must not leak into the first tick.
                self.input.clear();
                self.phase = GamePhase::Running;
                scheduler.request_next_tick();
            }
            (Command::Pause, GamePhase::Running) => {
                self.pause(scheduler);
            }
            (Command::Resume, GamePhase::Paused) => {
                log::info!("resumed");
                self.phase = GamePhase::Running;
                scheduler.request_next_tick();
            }
            (Command::Reset, GamePhase::Running | GamePhase::Paused | GamePhase::Ended(_)) => {
                self.restart(scheduler);
            }
            (cmd, phase) => {
                log::debug!("ignoring {cmd:?} while {phase:?}");
            }
        }
    }

    /// One simulation tick. Invoked by the display loop while Running;
    /// spurious requests in any other phase do nothing.
    pub fn on_tick_request(&mut self, scheduler: &mut impl Scheduler) -> Vec<GameEvent> {
        if self.phase != GamePhase::Running {
            return Vec::new();
        }

        // Edge-triggered pause key, consumed before any physics runs so the
        // freeze is clean.
        if self.input.take_pause_edge() {
            self.pause(scheduler);
            return Vec::new();
        }

        self.tick_count += 1;
        self.particles.update();

        let physics_events =
            physics::step(&mut self.paddles, &mut self.ball, &self.input, &mut self.rng);

        let mut events = Vec::with_capacity(physics_events.len());
        for event in physics_events {
            match event {
                PhysicsEvent::WallHit { x, y } => {
                    if self.particles_enabled {
                        // Sparks fly back into the board
                        let normal = if y == 0.0 { Vec2::Y } else { Vec2::NEG_Y };
                        self.particles
                            .spawn_burst(Vec2::new(x, y), normal, 6, &mut self.rng);
                    }
                    events.push(GameEvent::WallHit { x, y });
                }
                PhysicsEvent::PaddleHit { x, y, side } => {
                    if self.particles_enabled {
                        let normal = match side {
                            PlayerId::One => Vec2::X,
                            PlayerId::Two => Vec2::NEG_X,
                        };
                        self.particles
                            .spawn_burst(Vec2::new(x, y), normal, 8, &mut self.rng);
                    }
                    events.push(GameEvent::PaddleHit { x, y, side });
                }
                PhysicsEvent::Scored { scorer, exit_y } => {
                    let score = self.scores.register_point(scorer);
                    if self.particles_enabled {
                        let (exit_x, normal) = match scorer {
                            // Player 2 scored: ball left past the left edge
                            PlayerId::Two => (0.0, Vec2::X),
                            PlayerId::One => (BOARD_WIDTH, Vec2::NEG_X),
                        };
                        self.particles
                            .spawn_burst(Vec2::new(exit_x, exit_y), normal, 12, &mut self.rng);
                    }
                    log::info!(
                        "{} scores ({} - {})",
                        scorer.as_str(),
                        score.player1,
                        score.player2
                    );
                    events.push(GameEvent::ScorePoint { scorer, score });

                    if let Some(winner) = self.scores.has_winner() {
                        log::info!(
                            "match over: {} wins {} - {}",
                            winner.as_str(),
                            score.player1,
                            score.player2
                        );
                        self.phase = GamePhase::Ended(winner);
                        events.push(GameEvent::GameEnded {
                            winner,
                            final_score: score,
                        });
                        scheduler.cancel();
                        return events;
                    }
                }
            }
        }

        scheduler.request_next_tick();
        events
    }

    fn pause(&mut self, scheduler: &mut impl Scheduler) {
        log::info!("paused");
        self.phase = GamePhase::Paused;
        scheduler.cancel();
    }

    /// "Play again": zero scores, recenter everything, randomize the serve,
    /// and go straight to Running.
    fn restart(&mut self, scheduler: &mut impl Scheduler) {
        self.scores.reset();
        self.paddles = [Paddle::default(), Paddle::default()];
        self.ball = Ball::serve(
            physics::random_sign(&mut self.rng),
            physics::random_sign(&mut self.rng),
        );
        self.input.clear();
        self.particles.clear();
        self.tick_count = 0;
        self.phase = GamePhase::Running;
        log::info!("match reset");
        scheduler.request_next_tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    /// Records scheduling calls; `pending` mirrors what a real one-shot
    /// scheduler would hold.
    #[derive(Debug, Default)]
    struct MockScheduler {
        pending: bool,
        requests: u32,
        cancels: u32,
    }

    impl Scheduler for MockScheduler {
        fn request_next_tick(&mut self) {
            self.pending = true;
            self.requests += 1;
        }

        fn cancel(&mut self) {
            self.pending = false;
            self.cancels += 1;
        }
    }

    fn running_session(seed: u64) -> (GameSession, MockScheduler) {
        let mut session = GameSession::new(seed);
        let mut sched = MockScheduler::default();
        session.command(Command::Start, &mut sched);
        (session, sched)
    }

    #[test]
    fn test_start_begins_ticking() {
        let (session, sched) = running_session(1);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.seed(), 1);
        assert!(sched.pending);
    }

    #[test]
    fn test_keys_pressed_before_start_do_not_leak_into_the_match() {
        let mut session = GameSession::new(10);
        let mut sched = MockScheduler::default();

        // Tapped and released while Idle; must not pause the first tick
        session.apply_key("Escape", true);
        session.apply_key("Escape", false);
        session.apply_key("w", true);

        session.command(Command::Start, &mut sched);
        let y = session.paddles()[0].y;
        session.on_tick_request(&mut sched);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.paddles()[0].y, y, "stale held key moved a paddle");
        assert!(sched.pending);
    }

    #[test]
    fn test_particle_toggle_suppresses_bursts() {
        let (mut session, mut sched) = running_session(12);
        session.set_particles_enabled(false);
        force_left_exit(&mut session);
        let events = session.on_tick_request(&mut sched);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::ScorePoint { .. })),
            "toggle is visual only, events still flow"
        );
        assert!(session.particles().is_empty());

        session.set_particles_enabled(true);
        force_left_exit(&mut session);
        session.on_tick_request(&mut sched);
        assert!(!session.particles().is_empty());
    }

    #[test]
    fn test_invalid_commands_are_ignored() {
        let mut session = GameSession::new(1);
        let mut sched = MockScheduler::default();

        session.command(Command::Pause, &mut sched);
        session.command(Command::Resume, &mut sched);
        session.command(Command::Reset, &mut sched);
        assert_eq!(session.phase(), GamePhase::Idle);
        assert!(!sched.pending);

        session.command(Command::Start, &mut sched);
        session.command(Command::Start, &mut sched);
        assert_eq!(sched.requests, 1);
        session.command(Command::Resume, &mut sched);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(sched.requests, 1);
    }

    #[test]
    fn test_tick_advances_ball() {
        let (mut session, mut sched) = running_session(2);
        let before = session.ball().pos;
        session.on_tick_request(&mut sched);
        assert_ne!(session.ball().pos, before);
        assert!(sched.pending, "running session re-requests ticks");
    }

    #[test]
    fn test_pause_resume_is_an_idempotent_freeze() {
        let (mut session, mut sched) = running_session(3);
        for _ in 0..10 {
            session.on_tick_request(&mut sched);
        }
        let ball = *session.ball();
        let paddles = *session.paddles();

        session.command(Command::Pause, &mut sched);
        assert_eq!(session.phase(), GamePhase::Paused);
        assert!(!sched.pending);

        // Stale tick requests while paused mutate nothing
        assert!(session.on_tick_request(&mut sched).is_empty());
        assert_eq!(*session.ball(), ball);

        session.command(Command::Resume, &mut sched);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(*session.ball(), ball, "no fast-forward compensation");
        assert_eq!(*session.paddles(), paddles);
    }

    #[test]
    fn test_pause_key_edge_pauses_before_physics() {
        let (mut session, mut sched) = running_session(4);
        session.on_tick_request(&mut sched);
        let ball = *session.ball();

        session.apply_key("Escape", true);
        let events = session.on_tick_request(&mut sched);
        assert!(events.is_empty());
        assert_eq!(session.phase(), GamePhase::Paused);
        assert_eq!(*session.ball(), ball, "freeze tick runs no physics");
        assert!(!sched.pending);

        // Holding the key must not generate further edges after resume
        session.apply_key("Escape", true);
        session.command(Command::Resume, &mut sched);
        session.on_tick_request(&mut sched);
        assert_eq!(session.phase(), GamePhase::Running);
    }

    #[test]
    fn test_unknown_keys_are_noops() {
        let (mut session, mut sched) = running_session(5);
        session.apply_key("x", true);
        session.apply_key("Enter", true);
        let y = session.paddles()[0].y;
        session.on_tick_request(&mut sched);
        assert_eq!(session.paddles()[0].y, y);
    }

    #[test]
    fn test_movement_keys_drive_paddles() {
        let (mut session, mut sched) = running_session(6);
        session.apply_key("w", true);
        session.apply_key("ArrowDown", true);
        let y1 = session.paddles()[0].y;
        let y2 = session.paddles()[1].y;
        session.on_tick_request(&mut sched);
        assert_eq!(session.paddles()[0].y, y1 - PADDLE_SPEED);
        assert_eq!(session.paddles()[1].y, y2 + PADDLE_SPEED);
    }

    /// Aim the ball straight at the left goal line from just inside it.
    fn force_left_exit(session: &mut GameSession) {
        session.ball.pos = Vec2::new(3.0, 250.0);
        session.ball.vel = Vec2::new(-SERVE_SPEED, 0.0);
        // Park the left paddle out of the way
        session.paddles[0].y = 0.0;
    }

    #[test]
    fn test_score_event_carries_updated_tally() {
        let (mut session, mut sched) = running_session(7);
        force_left_exit(&mut session);
        let events = session.on_tick_request(&mut sched);

        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::ScorePoint {
                scorer: PlayerId::Two,
                score: Score { player1: 0, player2: 1 },
            }
        )));
        assert_eq!(session.ball().pos, Vec2::new(BALL_RESET_X, BALL_RESET_Y));
        assert_eq!(session.ball().vel.x, SERVE_SPEED);
    }

    #[test]
    fn test_first_to_threshold_ends_the_match() {
        let (mut session, mut sched) = running_session(8);
        for point in 1..=WIN_SCORE {
            force_left_exit(&mut session);
            let events = session.on_tick_request(&mut sched);
            let ended = events
                .iter()
                .any(|e| matches!(e, GameEvent::GameEnded { .. }));
            assert_eq!(ended, point == WIN_SCORE);
        }

        assert_eq!(session.phase(), GamePhase::Ended(PlayerId::Two));
        assert_eq!(session.score().player2, WIN_SCORE);
        assert!(!sched.pending, "ticking halted at match end");

        // No further ticks mutate positions
        let ball = *session.ball();
        assert!(session.on_tick_request(&mut sched).is_empty());
        assert_eq!(*session.ball(), ball);
    }

    #[test]
    fn test_reset_after_end_restarts_clean() {
        let (mut session, mut sched) = running_session(9);
        for _ in 0..WIN_SCORE {
            force_left_exit(&mut session);
            session.on_tick_request(&mut sched);
        }
        assert!(matches!(session.phase(), GamePhase::Ended(_)));

        session.command(Command::Reset, &mut sched);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.score(), Score::default());
        assert_eq!(session.ball().pos, Vec2::new(BALL_RESET_X, BALL_RESET_Y));
        assert_eq!(session.ball().vel.x.abs(), SERVE_SPEED);
        assert_eq!(session.ball().vel.y.abs(), SERVE_SPEED);
        assert!(sched.pending);
    }

    #[test]
    fn test_sessions_are_deterministic_per_seed() {
        let (mut a, mut sched_a) = running_session(1234);
        let (mut b, mut sched_b) = running_session(1234);
        a.apply_key("w", true);
        b.apply_key("w", true);
        for _ in 0..120 {
            let ea = a.on_tick_request(&mut sched_a);
            let eb = b.on_tick_request(&mut sched_b);
            assert_eq!(ea, eb);
        }
        assert_eq!(a.ball(), b.ball());
        assert_eq!(a.paddles(), b.paddles());
        assert_eq!(a.tick_count(), b.tick_count());
        assert_eq!(a.tick_count(), 120);
    }
}
