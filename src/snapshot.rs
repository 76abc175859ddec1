//! Flat render buffers consumed by the point renderer.

use glam::Vec3;

use crate::particle::Particle;

/// Parallel attribute buffers: 3 floats per point for `positions` and
/// `colors`, 1 float per point for `sizes` and `alphas`.
///
/// Contents are rebuilt from scratch on every fill; only the allocations are
/// reused between frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub sizes: Vec<f32>,
    pub alphas: Vec<f32>,
}

impl RenderBuffers {
    pub fn with_capacity(points: usize) -> Self {
        Self {
            positions: Vec::with_capacity(points * 3),
            colors: Vec::with_capacity(points * 3),
            sizes: Vec::with_capacity(points),
            alphas: Vec::with_capacity(points),
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.sizes.clear();
        self.alphas.clear();
    }

    pub fn push(&mut self, position: Vec3, color: Vec3, size: f32, alpha: f32) {
        self.positions.extend_from_slice(&position.to_array());
        self.colors.extend_from_slice(&color.to_array());
        self.sizes.push(size);
        self.alphas.push(alpha);
    }

    /// Packs `particles` in order. Point size is `size * opacity * size_scale`
    /// so particles shrink as they fade.
    pub fn fill(&mut self, particles: &[Particle], size_scale: f32) {
        self.clear();
        for p in particles {
            self.push(p.position, p.color, p.size * p.opacity * size_scale, p.opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_previous_contents() {
        let p = Particle {
            position: Vec3::new(1.0, 2.0, 3.0),
            velocity: Vec3::ZERO,
            life: 1.0,
            max_life: 1.0,
            size: 0.5,
            color: Vec3::new(0.1, 0.2, 0.3),
            opacity: 0.5,
        };
        let mut buffers = RenderBuffers::default();
        buffers.fill(&[p.clone(), p.clone()], 2.0);
        assert_eq!(buffers.len(), 2);

        buffers.fill(&[p], 2.0);
        assert_eq!(buffers.positions, vec![1.0, 2.0, 3.0]);
        assert_eq!(buffers.colors, vec![0.1, 0.2, 0.3]);
        assert_eq!(buffers.sizes, vec![0.5]);
        assert_eq!(buffers.alphas, vec![0.5]);
    }
}
