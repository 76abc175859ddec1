//! The owned simulation context.
//!
//! Event handlers call the `pointer_*` methods as events arrive; the frame
//! callback calls [`TrailSimulation::frame`] once per displayed frame. Spawns
//! made between two frames are observed by the next `frame` call.

use glam::Vec3;

use crate::anchors::{AnchorCache, AnchorSource};
use crate::config::{ConfigResult, TrailConfig};
use crate::cursor::{CursorState, CursorVisuals};
use crate::follower::FollowerChain;
use crate::input::{PointerSample, PointerTracker};
use crate::pool::ParticlePool;
use crate::projection::Viewport;
use crate::snapshot::RenderBuffers;

/// Output of one frame. Buffers borrow from the simulation and are valid
/// until the next mutation.
pub struct Frame<'a> {
    pub trail: &'a RenderBuffers,
    /// Follower links, glow and core marker, back to front.
    pub overlay: &'a RenderBuffers,
    /// Ripple ring; empty while the ripple is invisible.
    pub ripple: &'a RenderBuffers,
    pub cursor: CursorVisuals,
    /// Particles removed by this frame's advance.
    pub expired: usize,
}

pub struct TrailSimulation {
    config: TrailConfig,
    viewport: Viewport,
    tracker: PointerTracker,
    pool: ParticlePool,
    cursor: CursorState,
    followers: Option<FollowerChain>,
    anchors: AnchorCache,
    elapsed: f32,
    trail: RenderBuffers,
    overlay: RenderBuffers,
    ripple: RenderBuffers,
}

impl TrailSimulation {
    /// Validates `config` and builds a simulation seeded with `seed`.
    pub fn new(config: TrailConfig, seed: u64) -> ConfigResult<Self> {
        config.validate()?;
        let pool = ParticlePool::new(
            config.pool.clone(),
            config.physics.clone(),
            config.input.intensity_max,
            seed,
        );
        let followers = config
            .follower
            .clone()
            .map(|f| FollowerChain::new(f, Vec3::ZERO));
        let overlay_len = 2 + followers.as_ref().map_or(0, FollowerChain::len);

        Ok(Self {
            tracker: PointerTracker::new(config.input.clone()),
            cursor: CursorState::new(config.cursor.clone()),
            trail: RenderBuffers::with_capacity(config.pool.capacity),
            overlay: RenderBuffers::with_capacity(overlay_len),
            ripple: RenderBuffers::with_capacity(1),
            viewport: Viewport::default(),
            anchors: AnchorCache::default(),
            elapsed: 0.0,
            followers,
            pool,
            config,
        })
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Seconds simulated so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.anchors.invalidate();
    }

    /// Tracks a pointer-move and spawns trail particles for it. Returns the
    /// number of particles added.
    pub fn pointer_move(&mut self, sample: PointerSample) -> usize {
        let request = self
            .tracker
            .track(sample, &self.config.projection, &self.viewport);
        self.cursor.set_target(request.position);
        self.anchors.invalidate();
        self.pool
            .spawn_with_velocity(request.position, request.intensity, request.velocity)
    }

    pub fn pointer_down(&mut self) {
        self.cursor.press();
    }

    pub fn pointer_up(&mut self) {
        self.cursor.release();
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.cursor.set_hovering(hovering);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.cursor.set_visible(visible);
    }

    /// Forces a re-query of magnetic anchors on the next frame.
    pub fn invalidate_anchors(&mut self) {
        self.anchors.invalidate();
    }

    pub fn frame(&mut self, dt: f32, anchors: &dyn AnchorSource) -> Frame<'_> {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_delta)
        } else {
            0.0
        };
        self.elapsed += dt;

        let world_anchors = self
            .anchors
            .resolve(anchors, &self.config.projection, &self.viewport);
        let expired = self.pool.advance(dt, self.elapsed, world_anchors);

        let cursor = self.cursor.update(dt);
        if let Some(chain) = self.followers.as_mut() {
            chain.update(self.cursor.target());
        }

        self.trail.fill(self.pool.particles(), self.config.size_scale);
        self.fill_overlay(&cursor);

        log::trace!(
            "frame t={:.3} particles={} expired={}",
            self.elapsed,
            self.pool.len(),
            expired
        );

        Frame {
            trail: &self.trail,
            overlay: &self.overlay,
            ripple: &self.ripple,
            cursor,
            expired,
        }
    }

    fn fill_overlay(&mut self, cursor: &CursorVisuals) {
        let cfg = &self.config.cursor;
        let shown = self.cursor.is_visible();

        self.overlay.clear();
        if shown {
            if let Some(chain) = &self.followers {
                // Tail first so the head draws on top.
                let links: Vec<_> = chain.links().collect();
                for link in links.into_iter().rev() {
                    self.overlay
                        .push(link.position, link.color, link.size, link.opacity);
                }
            }
        }
        for prim in [cursor.glow, cursor.core] {
            if prim.opacity > 0.0 {
                self.overlay
                    .push(prim.position, prim.color, cfg.core_size * prim.scale, prim.opacity);
            }
        }

        self.ripple.clear();
        let ring = cursor.ripple;
        if ring.opacity > 0.0 && ring.scale > 0.0 {
            self.ripple
                .push(ring.position, ring.color, cfg.ripple_size * ring.scale, ring.opacity);
        }
    }
}
