use std::ops::Range;

use glam::Vec3;
use rand::Rng;

/// A single trail particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Remaining life; the particle is removed once this reaches zero.
    pub life: f32,
    /// Normalizer for [`Particle::life_ratio`].
    pub max_life: f32,
    pub size: f32,
    pub color: Vec3,
    pub opacity: f32,
}

impl Particle {
    /// Remaining life as a fraction of `max_life`, clamped to `[0, 1]`.
    pub fn life_ratio(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// `0xRRGGBB` to RGB components in `[0, 1]`.
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Uniform sample that tolerates empty ranges.
pub(crate) fn sample<R: Rng>(rng: &mut R, range: &Range<f32>) -> f32 {
    if range.start < range.end {
        rng.gen_range(range.start..range.end)
    } else {
        range.start
    }
}

/// Uniform sample in `[-extent / 2, extent / 2)` per axis.
pub(crate) fn centered<R: Rng>(rng: &mut R, extent: Vec3) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * extent.x,
        (rng.gen::<f32>() - 0.5) * extent.y,
        (rng.gen::<f32>() - 0.5) * extent.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_rgb_hex() {
        let c = rgb_hex(0xff8000);
        assert_eq!(c.x, 1.0);
        assert!((c.y - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.z, 0.0);
    }

    #[test]
    fn test_sample_degenerate_range() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(sample(&mut rng, &(2.0..2.0)), 2.0);
        assert_eq!(sample(&mut rng, &(3.0..1.0)), 3.0);
    }

    #[test]
    fn test_life_ratio_clamped() {
        let p = Particle {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            life: -0.5,
            max_life: 1.0,
            size: 0.01,
            color: Vec3::ONE,
            opacity: 0.0,
        };
        assert_eq!(p.life_ratio(), 0.0);
        assert!(!p.is_alive());
    }
}
