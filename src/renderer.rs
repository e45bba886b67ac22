//! Presentation adapter
//!
//! The core never touches the DOM directly; it calls through this narrow
//! interface, which tests mock entirely. The wasm implementation moves the
//! absolutely-positioned board elements the page provides.

use crate::sim::{GameSession, PlayerId, Score};

/// Capability interface the game loop drives each frame.
pub trait Renderer {
    /// Move paddles, ball, and particles to their current positions.
    fn update_positions(&mut self, session: &GameSession);
    /// Refresh the score display.
    fn update_score(&mut self, score: Score);
    /// Show the winner banner with the final score.
    fn show_winner(&mut self, winner: PlayerId, final_score: Score);
    /// Remove the winner banner (play again).
    fn clear_winner(&mut self);
}

/// Rolling frames-per-second estimate for the HUD, averaged over a ring of
/// recent frame timestamps.
pub struct FpsCounter {
    /// Millisecond timestamps of the last N frames
    samples: [f64; 60],
    index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            samples: [0.0; 60],
            index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame timestamp (milliseconds, monotonic).
    pub fn record(&mut self, now_ms: f64) {
        self.samples[self.index] = now_ms;
        self.index = (self.index + 1) % self.samples.len();

        let oldest = self.samples[self.index];
        if oldest > 0.0 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                // N samples span N - 1 frame intervals
                let intervals = (self.samples.len() - 1) as f64;
                self.fps = (intervals * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    /// Latest estimate; 0 until the ring has filled once.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomRenderer;

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::JsCast;
    use web_sys::{Document, Element, HtmlElement};

    use super::Renderer;
    use crate::consts::{LEFT_BAND_MIN, RIGHT_BAND_MIN};
    use crate::sim::{GameSession, PlayerId, Score};

    /// Renders into the absolutely-positioned elements of the game page.
    pub struct DomRenderer {
        game_area: Element,
        paddle1: HtmlElement,
        paddle2: HtmlElement,
        ball: HtmlElement,
        score1: Element,
        score2: Element,
        /// Reused div pool for particle sparks
        particle_nodes: Vec<HtmlElement>,
        document: Document,
    }

    impl DomRenderer {
        /// Look up the board elements. Returns `None` (with a warning) if
        /// the page is missing any of them.
        pub fn from_document(document: &Document) -> Option<Self> {
            let get = |id: &str| -> Option<HtmlElement> {
                let el = document.get_element_by_id(id)?.dyn_into().ok()?;
                Some(el)
            };
            let query = |sel: &str| document.query_selector(sel).ok().flatten();

            let renderer = Self {
                game_area: document.get_element_by_id("gameArea")?,
                paddle1: get("player1Paddle")?,
                paddle2: get("player2Paddle")?,
                ball: get("ball")?,
                score1: query(".player1-score")?,
                score2: query(".player2-score")?,
                particle_nodes: Vec::new(),
                document: document.clone(),
            };
            Some(renderer)
        }

        fn set_px(el: &HtmlElement, prop: &str, value: f32) {
            let _ = el.style().set_property(prop, &format!("{value}px"));
        }

        fn sync_particles(&mut self, session: &GameSession) {
            let wanted = session.particles().len();

            // Grow/shrink the node pool to match the live particle count
            while self.particle_nodes.len() < wanted {
                let Ok(node) = self.document.create_element("div") else {
                    return;
                };
                let _ = node.set_attribute("class", "particle");
                let Ok(node) = node.dyn_into::<HtmlElement>() else {
                    return;
                };
                let _ = self.game_area.append_child(&node);
                self.particle_nodes.push(node);
            }
            while self.particle_nodes.len() > wanted {
                if let Some(node) = self.particle_nodes.pop() {
                    node.remove();
                }
            }

            for (node, particle) in self.particle_nodes.iter().zip(session.particles().iter()) {
                Self::set_px(node, "left", particle.pos.x);
                Self::set_px(node, "top", particle.pos.y);
                Self::set_px(node, "width", particle.size);
                Self::set_px(node, "height", particle.size);
                let _ = node
                    .style()
                    .set_property("opacity", &format!("{:.2}", particle.life));
            }
        }
    }

    impl Renderer for DomRenderer {
        fn update_positions(&mut self, session: &GameSession) {
            let [p1, p2] = session.paddles();
            Self::set_px(&self.paddle1, "top", p1.y);
            Self::set_px(&self.paddle2, "top", p2.y);
            // Paddle x never changes; set once per frame anyway, it's cheap
            Self::set_px(&self.paddle1, "left", LEFT_BAND_MIN);
            Self::set_px(&self.paddle2, "left", RIGHT_BAND_MIN);

            let ball = session.ball();
            Self::set_px(&self.ball, "left", ball.pos.x);
            Self::set_px(&self.ball, "top", ball.pos.y);

            self.sync_particles(session);
        }

        fn update_score(&mut self, score: Score) {
            self.score1.set_text_content(Some(&score.player1.to_string()));
            self.score2.set_text_content(Some(&score.player2.to_string()));
        }

        fn show_winner(&mut self, winner: PlayerId, final_score: Score) {
            let Ok(banner) = self.document.create_element("div") else {
                return;
            };
            let _ = banner.set_attribute("class", "winner-announcement");
            banner.set_inner_html(&format!(
                "<h2>{} Wins!</h2><p>Final Score: {} - {}</p>",
                winner.as_str(),
                final_score.player1,
                final_score.player2
            ));
            let _ = self.game_area.append_child(&banner);
        }

        fn clear_winner(&mut self) {
            if let Some(banner) = self
                .document
                .query_selector(".winner-announcement")
                .ok()
                .flatten()
            {
                banner.remove();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Command, GameSession, Scheduler};

    struct NoopScheduler;
    impl Scheduler for NoopScheduler {
        fn request_next_tick(&mut self) {}
        fn cancel(&mut self) {}
    }

    /// Records calls; stands in for the DOM in tests.
    #[derive(Default)]
    struct MockRenderer {
        frames: u32,
        last_score: Option<Score>,
        winner: Option<PlayerId>,
    }

    impl Renderer for MockRenderer {
        fn update_positions(&mut self, _session: &GameSession) {
            self.frames += 1;
        }
        fn update_score(&mut self, score: Score) {
            self.last_score = Some(score);
        }
        fn show_winner(&mut self, winner: PlayerId, _final_score: Score) {
            self.winner = Some(winner);
        }
        fn clear_winner(&mut self) {
            self.winner = None;
        }
    }

    #[test]
    fn test_fps_counter_matches_frame_interval() {
        // 60 Hz: one frame every 16.6667 ms
        let mut counter = FpsCounter::default();
        for frame in 0..120 {
            counter.record(1000.0 + frame as f64 * 1000.0 / 60.0);
        }
        assert_eq!(counter.fps(), 60);

        // 30 Hz display
        let mut counter = FpsCounter::default();
        for frame in 0..120 {
            counter.record(1000.0 + frame as f64 * 1000.0 / 30.0);
        }
        assert_eq!(counter.fps(), 30);
    }

    #[test]
    fn test_fps_counter_warms_up_silently() {
        let mut counter = FpsCounter::default();
        for frame in 0..30 {
            counter.record(1000.0 + frame as f64 * 16.0);
            assert_eq!(counter.fps(), 0, "no estimate until the ring fills");
        }
    }

    #[test]
    fn test_renderer_is_drivable_from_the_session() {
        let mut session = GameSession::new(11);
        let mut sched = NoopScheduler;
        session.command(Command::Start, &mut sched);
        session.on_tick_request(&mut sched);

        let mut renderer = MockRenderer::default();
        renderer.update_positions(&session);
        renderer.update_score(session.score());
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.last_score, Some(Score::default()));
    }
}
