//! Display primitives that follow the pointer: the core marker, its glow
//! halo, and the ripple ring shown while the button is held.

use glam::Vec3;

use crate::config::CursorConfig;

/// Transform and appearance of one display primitive for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub position: Vec3,
    pub scale: f32,
    /// Rotation about Z, in radians.
    pub rotation: f32,
    pub opacity: f32,
    pub color: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorVisuals {
    pub core: Primitive,
    pub glow: Primitive,
    pub ripple: Primitive,
}

#[derive(Debug, Clone)]
pub struct CursorState {
    config: CursorConfig,
    target: Vec3,
    current: Vec3,
    hovering: bool,
    pressed: bool,
    visible: bool,
    ripple_scale: f32,
    time: f32,
}

impl CursorState {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            config,
            target: Vec3::ZERO,
            current: Vec3::ZERO,
            hovering: false,
            pressed: false,
            visible: true,
            ripple_scale: 0.0,
            time: 0.0,
        }
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Starts a new ripple.
    pub fn press(&mut self) {
        self.pressed = true;
        self.ripple_scale = 0.0;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> Vec3 {
        self.current
    }

    /// Latest pointer position, before easing.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn update(&mut self, dt: f32) -> CursorVisuals {
        let cfg = &self.config;
        self.time += dt;
        let t = self.time;

        // Per-frame easing, as in the original effect.
        let follow = if self.hovering { cfg.hover_follow } else { cfg.follow };
        self.current = self.current.lerp(self.target, follow);

        let base = if self.hovering { cfg.hover_scale } else { cfg.idle_scale };
        let (click, pulse) = if self.pressed {
            (cfg.click_scale, 1.0 + (t * cfg.pulse_frequency).sin() * cfg.pulse_amplitude)
        } else {
            (1.0, 1.0)
        };
        let scale = base * click * pulse;

        if self.pressed {
            self.ripple_scale += dt * cfg.ripple_speed;
        } else {
            self.ripple_scale = 0.0;
        }
        let ripple_opacity = if self.pressed && cfg.ripple_fade_scale > 0.0 {
            (1.0 - self.ripple_scale / cfg.ripple_fade_scale).max(0.0)
        } else {
            0.0
        };

        let shown = if self.visible { 1.0 } else { 0.0 };
        let glow_opacity = cfg.glow_opacity + (t * cfg.glow_frequency).sin() * cfg.glow_flicker;

        CursorVisuals {
            core: Primitive {
                position: self.current,
                scale,
                rotation: (t * cfg.wobble_frequency).sin() * cfg.wobble_amplitude,
                opacity: cfg.core_opacity * shown,
                color: cfg.core_color,
            },
            glow: Primitive {
                position: self.current,
                scale: scale * cfg.glow_scale,
                rotation: 0.0,
                opacity: glow_opacity.max(0.0) * shown,
                color: cfg.glow_color,
            },
            ripple: Primitive {
                position: self.current,
                scale: self.ripple_scale,
                rotation: 0.0,
                opacity: ripple_opacity * shown,
                color: cfg.ripple_color,
            },
        }
    }
}
