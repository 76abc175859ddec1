//! Magnetic anchor points.
//!
//! The simulation never walks the page itself; it asks an [`AnchorSource`]
//! for the screen-space centers of whatever should attract particles and
//! maps them into world space.

use glam::{Vec2, Vec3};

use crate::projection::{Projection, Viewport};

/// Read-only provider of magnetic element centers, in CSS pixels.
pub trait AnchorSource {
    fn anchor_centers(&self) -> Vec<Vec2>;
}

/// No magnetic elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnchors;

impl AnchorSource for NoAnchors {
    fn anchor_centers(&self) -> Vec<Vec2> {
        Vec::new()
    }
}

impl AnchorSource for &[Vec2] {
    fn anchor_centers(&self) -> Vec<Vec2> {
        self.to_vec()
    }
}

impl AnchorSource for Vec<Vec2> {
    fn anchor_centers(&self) -> Vec<Vec2> {
        self.clone()
    }
}

/// Center of an axis-aligned screen rectangle.
pub fn rect_center(left: f32, top: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(left + width * 0.5, top + height * 0.5)
}

/// Re-queried world-space anchors, refreshed only when marked stale.
#[derive(Debug, Clone)]
pub struct AnchorCache {
    world: Vec<Vec3>,
    stale: bool,
}

impl Default for AnchorCache {
    fn default() -> Self {
        Self {
            world: Vec::new(),
            stale: true,
        }
    }
}

impl AnchorCache {
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Refreshes from `source` if stale and returns the current anchors.
    pub fn resolve(
        &mut self,
        source: &dyn AnchorSource,
        projection: &Projection,
        viewport: &Viewport,
    ) -> &[Vec3] {
        if self.stale {
            self.world.clear();
            self.world.extend(
                source
                    .anchor_centers()
                    .into_iter()
                    .filter(|c| c.is_finite())
                    .map(|c| projection.screen_to_world(c, viewport)),
            );
            self.stale = false;
            log::trace!("refreshed {} magnetic anchors", self.world.len());
        }
        &self.world
    }

    pub fn world(&self) -> &[Vec3] {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting<'a>(&'a Cell<u32>);

    impl AnchorSource for Counting<'_> {
        fn anchor_centers(&self) -> Vec<Vec2> {
            self.0.set(self.0.get() + 1);
            vec![Vec2::new(50.0, 50.0)]
        }
    }

    #[test]
    fn test_cache_queries_only_when_stale() {
        let calls = Cell::new(0);
        let source = Counting(&calls);
        let viewport = Viewport::new(100.0, 100.0);
        let mut cache = AnchorCache::default();

        assert_eq!(cache.resolve(&source, &Projection::Flat, &viewport).len(), 1);
        cache.resolve(&source, &Projection::Flat, &viewport);
        assert_eq!(calls.get(), 1);

        cache.invalidate();
        let world = cache.resolve(&source, &Projection::Flat, &viewport);
        assert_eq!(calls.get(), 2);
        assert!(world[0].length() < 1e-6);
    }

    #[test]
    fn test_slice_source_skips_non_finite_centers() {
        let points = [Vec2::new(100.0, 50.0), Vec2::new(f32::NAN, 0.0)];
        let slice: &[Vec2] = &points;
        let mut cache = AnchorCache::default();
        let world = cache.resolve(&slice, &Projection::Flat, &Viewport::new(100.0, 100.0));
        assert_eq!(world.len(), 1);
        assert!((world[0].x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rect_center() {
        assert_eq!(rect_center(10.0, 20.0, 100.0, 40.0), Vec2::new(60.0, 40.0));
    }
}
