//! Pointer events to spawn requests.

use glam::{Vec2, Vec3};

use crate::config::InputConfig;
use crate::projection::{Projection, Viewport};

/// One pointer-move event, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub position: Vec2,
    /// The event's native movement delta (`movementX`, `movementY`).
    pub movement: Vec2,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, dx: f32, dy: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            movement: Vec2::new(dx, dy),
        }
    }
}

/// What the pool should emit for one pointer-move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub position: Vec3,
    pub intensity: f32,
    pub velocity: Vec3,
}

/// Remembers the previous world position to derive pointer velocity.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    config: InputConfig,
    current: Vec3,
    previous: Vec3,
    velocity: Vec3,
}

impl PointerTracker {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// `clamp(|movement| / divisor, 0, max)`; non-finite input yields zero.
    pub fn intensity(&self, movement: Vec2) -> f32 {
        let speed = movement.length();
        if !speed.is_finite() {
            return 0.0;
        }
        (speed / self.config.intensity_divisor).clamp(0.0, self.config.intensity_max)
    }

    pub fn track(
        &mut self,
        sample: PointerSample,
        projection: &Projection,
        viewport: &Viewport,
    ) -> SpawnRequest {
        let world = projection.screen_to_world(sample.position, viewport);
        self.previous = self.current;
        self.current = world;
        self.velocity = (self.current - self.previous) * self.config.velocity_scale;
        SpawnRequest {
            position: world,
            intensity: self.intensity(sample.movement),
            velocity: self.velocity,
        }
    }

    pub fn current(&self) -> Vec3 {
        self.current
    }

    pub fn previous(&self) -> Vec3 {
        self.previous
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }
}
