//! "Liquid" cursor: a short chain of blobs easing toward the pointer, each
//! link a little slower than the one before it.

use glam::Vec3;

use crate::config::FollowerConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub position: Vec3,
    pub size: f32,
    pub opacity: f32,
    pub color: Vec3,
}

#[derive(Debug, Clone)]
pub struct FollowerChain {
    config: FollowerConfig,
    positions: Vec<Vec3>,
}

impl FollowerChain {
    pub fn new(config: FollowerConfig, start: Vec3) -> Self {
        let positions = vec![start; config.links];
        Self { config, positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Ease factor for link `i`.
    pub fn ease(&self, i: usize) -> f32 {
        (self.config.base_ease - i as f32 * self.config.ease_step).max(self.config.min_ease)
    }

    pub fn update(&mut self, target: Vec3) {
        for i in 0..self.positions.len() {
            let ease = self.ease(i);
            let p = &mut self.positions[i];
            *p += (target - *p) * ease;
        }
    }

    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        let cfg = &self.config;
        let last = self.positions.len().saturating_sub(1).max(1) as f32;
        self.positions.iter().enumerate().map(move |(i, &position)| Link {
            position,
            size: if i == 0 { cfg.head_size } else { cfg.link_size },
            opacity: (cfg.head_opacity - i as f32 * cfg.opacity_step).max(0.0),
            color: cfg.head_color.lerp(cfg.tail_color, i as f32 / last),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_is_floored() {
        let chain = FollowerChain::new(FollowerConfig::default(), Vec3::ZERO);
        assert!((chain.ease(0) - 0.25).abs() < 1e-6);
        assert!((chain.ease(2) - 0.19).abs() < 1e-6);
        assert!((chain.ease(10) - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_head_leads_tail() {
        let mut chain = FollowerChain::new(FollowerConfig::default(), Vec3::ZERO);
        let target = Vec3::new(1.0, 0.0, 0.0);
        chain.update(target);
        let links: Vec<_> = chain.links().collect();
        assert_eq!(links.len(), 6);
        assert!(links[0].position.x > links[5].position.x);
        assert!(links[0].size > links[1].size);
        assert!(links[5].opacity < links[0].opacity);
    }

    #[test]
    fn test_chain_converges_on_still_target() {
        let mut chain = FollowerChain::new(FollowerConfig::default(), Vec3::ZERO);
        let target = Vec3::new(0.5, -0.25, 0.0);
        for _ in 0..200 {
            chain.update(target);
        }
        assert!(chain.links().all(|l| l.position.distance(target) < 1e-4));
    }
}
