//! Bounded pool of trail particles.
//!
//! The pool is an insertion-ordered `Vec`: new particles are appended, expired
//! ones are removed in place, and when the pool is over capacity at the end of
//! [`ParticlePool::advance`] the oldest entries are dropped first, regardless
//! of how much life they have left.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{PhysicsConfig, PoolConfig};
use crate::particle::{centered, sample, Particle};

pub struct ParticlePool {
    config: PoolConfig,
    physics: PhysicsConfig,
    intensity_max: f32,
    particles: Vec<Particle>,
    rng: SmallRng,
}

impl ParticlePool {
    pub fn new(config: PoolConfig, physics: PhysicsConfig, intensity_max: f32, seed: u64) -> Self {
        let particles = Vec::with_capacity(config.capacity);
        Self {
            config,
            physics,
            intensity_max,
            particles,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Oldest first.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Number of particles a spawn at `intensity` adds.
    pub fn spawn_count(&self, intensity: f32) -> usize {
        let intensity = if intensity.is_finite() {
            intensity.clamp(0.0, self.intensity_max)
        } else {
            0.0
        };
        1usize.saturating_add((intensity * self.config.per_intensity).floor() as usize)
    }

    /// Spawns with no inherited pointer velocity.
    pub fn spawn(&mut self, position: Vec3, intensity: f32) -> usize {
        self.spawn_with_velocity(position, intensity, Vec3::ZERO)
    }

    /// Appends `1 + floor(intensity * per_intensity)` particles around
    /// `position` and returns how many were added. Does not trim.
    pub fn spawn_with_velocity(
        &mut self,
        position: Vec3,
        intensity: f32,
        pointer_velocity: Vec3,
    ) -> usize {
        let count = self.spawn_count(intensity);
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = self.new_particle(position, pointer_velocity);
            self.particles.push(particle);
        }
        count
    }

    fn new_particle(&mut self, origin: Vec3, pointer_velocity: Vec3) -> Particle {
        let cfg = &self.config;
        let rng = &mut self.rng;

        let mut velocity = centered(rng, cfg.drift) + pointer_velocity * cfg.pointer_bias;
        let angle = rng.gen::<f32>() * std::f32::consts::TAU;
        velocity.x += angle.cos() * cfg.swirl;
        velocity.y += angle.sin() * cfg.swirl;

        let max_life = sample(rng, &cfg.max_life);
        let color = cfg.palette[rng.gen_range(0..cfg.palette.len())];

        let mut particle = Particle {
            position: origin + centered(rng, cfg.jitter),
            velocity,
            life: cfg.initial_life,
            max_life,
            size: sample(rng, &cfg.size),
            color,
            opacity: 0.0,
        };
        particle.opacity = self.opacity_for(particle.life_ratio());
        particle
    }

    pub fn opacity_for(&self, life_ratio: f32) -> f32 {
        self.config.opacity_max * life_ratio.clamp(0.0, 1.0).powf(self.config.opacity_exponent)
    }

    /// Steps every particle by one tick, removes the expired ones and trims
    /// the pool back to capacity. Returns the number of particles removed.
    ///
    /// `elapsed` drives the turbulence phase; `anchors` are world-space
    /// attraction points.
    pub fn advance(&mut self, dt: f32, elapsed: f32, anchors: &[Vec3]) -> usize {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let before = self.particles.len();

        let physics = &self.physics;
        let cfg = &self.config;
        let turb = &physics.turbulence;
        let blend = (dt * cfg.color_blend_rate).min(1.0);
        let radius = physics.magnetic_radius;

        for p in self.particles.iter_mut() {
            let mut pull = Vec3::ZERO;
            for &anchor in anchors {
                let offset = anchor - p.position;
                let dist = offset.length();
                if dist < radius {
                    pull +=
                        offset.normalize_or_zero() * (radius - dist) * physics.magnetic_strength;
                }
            }

            p.velocity += pull;
            p.velocity *= physics.drag;
            p.velocity.y -= physics.gravity;

            let phase = Vec3::splat(elapsed) * turb.frequency + p.position * turb.spatial;
            p.velocity += Vec3::new(phase.x.sin(), phase.y.cos(), phase.z.sin()) * turb.amplitude;

            p.position += p.velocity;

            p.life -= dt * sample(&mut self.rng, &cfg.decay_rate);
            let ratio = p.life_ratio();
            p.opacity = cfg.opacity_max * ratio.powf(cfg.opacity_exponent);

            if ratio < cfg.fade_threshold {
                p.color = p.color.lerp(cfg.terminal_color, blend);
            }
        }

        self.particles.retain(Particle::is_alive);

        let excess = self.particles.len().saturating_sub(self.config.capacity);
        if excess > 0 {
            self.particles.drain(..excess);
        }

        before - self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(capacity: usize) -> ParticlePool {
        let config = PoolConfig {
            capacity,
            ..Default::default()
        };
        ParticlePool::new(config, PhysicsConfig::default(), 3.0, 7)
    }

    #[test]
    fn test_spawn_count() {
        let pool = pool(10);
        assert_eq!(pool.spawn_count(0.0), 1);
        assert_eq!(pool.spawn_count(0.99), 3);
        assert_eq!(pool.spawn_count(1.0), 4);
        assert_eq!(pool.spawn_count(50.0), 10);
        assert_eq!(pool.spawn_count(-2.0), 1);
        assert_eq!(pool.spawn_count(f32::NAN), 1);
    }

    #[test]
    fn test_spawn_count_saturates() {
        let config = PoolConfig {
            per_intensity: 1e30,
            ..Default::default()
        };
        let pool = ParticlePool::new(config, PhysicsConfig::default(), 3.0, 7);
        assert_eq!(pool.spawn_count(3.0), usize::MAX);
    }

    #[test]
    fn test_spawn_does_not_trim() {
        let mut pool = pool(2);
        pool.spawn(Vec3::ZERO, 3.0);
        assert_eq!(pool.len(), 10);
        pool.advance(0.0, 0.0, &[]);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_coincident_anchor_is_ignored() {
        let mut pool = pool(4);
        pool.spawn(Vec3::ZERO, 0.0);
        let at = pool.particles()[0].position;
        pool.advance(0.0, 0.0, &[at]);
        assert!(pool.particles()[0].velocity.is_finite());
    }
}
