//! Visual particle effects
//!
//! Gameplay-neutral sparks spawned from collision and score events. The
//! pool is capped; the oldest particle is evicted when full.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// Maximum live particles
pub const MAX_PARTICLES: usize = 256;

/// Velocity damping per tick
const DRAG: f32 = 0.95;
/// Life drained per tick (~25 ticks of visibility)
const LIFE_DECAY: f32 = 0.04;

/// A single spark
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, dead at 0
    pub life: f32,
    pub size: f32,
}

/// Pooled particle state, updated once per tick.
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Spawn a burst at `origin`, spread in a cone around `normal`.
    pub fn spawn_burst(&mut self, origin: Vec2, normal: Vec2, count: usize, rng: &mut Pcg32) {
        let base_angle = normal.y.atan2(normal.x);
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            // 90 degree cone around the surface normal
            let angle = base_angle + rng.random_range(-0.8..0.8);
            let speed = rng.random_range(2.0..6.0);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: rng.random_range(0.6..1.0),
                size: rng.random_range(2.0..5.0),
            });
        }
    }

    /// Advance all particles one tick and drop the dead ones.
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.vel *= DRAG;
            particle.life -= LIFE_DECAY;
            particle.size *= 0.97;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
