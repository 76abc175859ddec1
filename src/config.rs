//! Tunable constants for the trail, grouped by the component that reads them.
//!
//! Every section is `#[serde(default)]`, so a JSON override only has to name
//! the fields it changes:
//!
//! ```
//! use trail_wasm::config::TrailConfig;
//!
//! let cfg = TrailConfig::from_json_str(r#"{ "pool": { "capacity": 64 } }"#).unwrap();
//! assert_eq!(cfg.pool.capacity, 64);
//! assert_eq!(cfg.physics.drag, 0.985);
//! ```

use std::ops::Range;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::particle::rgb_hex;
use crate::projection::Projection;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("Config validation error: {0}")]
    Validation(String),
    /// No preset with this name.
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Names accepted by [`TrailConfig::preset`].
pub const PRESETS: [&str; 3] = ["fluid", "dense", "liquid"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub pool: PoolConfig,
    pub physics: PhysicsConfig,
    pub input: InputConfig,
    pub projection: Projection,
    pub cursor: CursorConfig,
    /// Liquid follower chain; `None` disables it.
    pub follower: Option<FollowerConfig>,
    /// Upper bound on a single frame's delta, in seconds.
    pub max_frame_delta: f32,
    /// Multiplier applied to `size * opacity` when packing render buffers.
    pub size_scale: f32,
    /// CSS selector for elements that attract particles.
    pub magnetic_selector: String,
    /// CSS selector for elements that put the cursor into its hover state.
    pub hover_selector: String,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            physics: PhysicsConfig::default(),
            input: InputConfig::default(),
            projection: Projection::default(),
            cursor: CursorConfig::default(),
            follower: None,
            max_frame_delta: 0.1,
            size_scale: 1.0,
            magnetic_selector: r#"button, a, [data-magnetic="true"]"#.to_string(),
            hover_selector: "button, a, .cursor-pointer, [data-magnetic]".to_string(),
        }
    }
}

/// Spawn-time parameters and per-particle appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Hard cap on live particles, enforced at the end of every advance.
    pub capacity: usize,
    /// Extra particles per unit of intensity.
    pub per_intensity: f32,
    /// Full width of the uniform position jitter on each axis.
    pub jitter: Vec3,
    /// Full width of the uniform random drift on each axis.
    pub drift: Vec3,
    /// Magnitude of the random-direction swirl added in the XY plane.
    pub swirl: f32,
    /// Fraction of pointer velocity inherited by new particles.
    pub pointer_bias: f32,
    pub initial_life: f32,
    pub max_life: Range<f32>,
    /// Life lost per second, drawn per particle per tick.
    pub decay_rate: Range<f32>,
    pub size: Range<f32>,
    pub palette: Vec<Vec3>,
    pub terminal_color: Vec3,
    /// Remaining-life ratio below which colors start blending to `terminal_color`.
    pub fade_threshold: f32,
    pub color_blend_rate: f32,
    pub opacity_max: f32,
    pub opacity_exponent: f32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 150,
            per_intensity: 3.0,
            jitter: Vec3::new(0.02, 0.02, 0.005),
            drift: Vec3::new(0.03, 0.03, 0.01),
            swirl: 0.01,
            pointer_bias: 0.02,
            initial_life: 1.0,
            max_life: 1.0..1.5,
            decay_rate: 0.4..0.7,
            size: 0.008..0.033,
            palette: vec![
                rgb_hex(0x8b5cf6), // neon purple
                rgb_hex(0x06b6d4), // electric blue
                rgb_hex(0x84cc16), // lime
                rgb_hex(0xe11d48), // neon pink
                rgb_hex(0x0ea5e9), // sky blue
            ],
            terminal_color: rgb_hex(0x4338ca),
            fade_threshold: 0.7,
            color_blend_rate: 2.0,
            opacity_max: 0.9,
            opacity_exponent: 1.5,
        }
    }
}

/// Forces applied during advance. All per tick, not per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub drag: f32,
    pub gravity: f32,
    pub magnetic_radius: f32,
    pub magnetic_strength: f32,
    pub turbulence: TurbulenceConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            drag: 0.985,
            gravity: 0.0002,
            magnetic_radius: 0.3,
            magnetic_strength: 0.001,
            turbulence: TurbulenceConfig::default(),
        }
    }
}

/// `amplitude * wave(time * frequency + position * spatial)` per axis, with
/// sine on x and z and cosine on y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurbulenceConfig {
    pub amplitude: Vec3,
    pub frequency: Vec3,
    pub spatial: Vec3,
}

impl Default for TurbulenceConfig {
    fn default() -> Self {
        Self {
            amplitude: Vec3::new(0.0001, 0.0001, 0.00005),
            frequency: Vec3::new(2.0, 1.5, 3.0),
            spatial: Vec3::new(10.0, 8.0, 12.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Pixels of movement per unit of intensity.
    pub intensity_divisor: f32,
    pub intensity_max: f32,
    /// Scale from world delta per event to pointer velocity.
    pub velocity_scale: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            intensity_divisor: 10.0,
            intensity_max: 3.0,
            velocity_scale: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub follow: f32,
    pub hover_follow: f32,
    pub idle_scale: f32,
    pub hover_scale: f32,
    pub click_scale: f32,
    pub pulse_amplitude: f32,
    pub pulse_frequency: f32,
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
    pub glow_scale: f32,
    pub glow_opacity: f32,
    pub glow_flicker: f32,
    pub glow_frequency: f32,
    pub ripple_speed: f32,
    /// Ripple scale at which it becomes fully transparent.
    pub ripple_fade_scale: f32,
    /// Diameter of the core marker at scale 1, in world units.
    pub core_size: f32,
    /// Outer diameter of the ripple ring at scale 1, in world units.
    pub ripple_size: f32,
    pub core_color: Vec3,
    pub core_opacity: f32,
    pub glow_color: Vec3,
    pub ripple_color: Vec3,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            follow: 0.15,
            hover_follow: 0.25,
            idle_scale: 1.2,
            hover_scale: 1.8,
            click_scale: 1.4,
            pulse_amplitude: 0.1,
            pulse_frequency: 4.0,
            wobble_amplitude: 0.1,
            wobble_frequency: 2.0,
            glow_scale: 2.5,
            glow_opacity: 0.4,
            glow_flicker: 0.1,
            glow_frequency: 3.0,
            ripple_speed: 8.0,
            ripple_fade_scale: 3.0,
            core_size: 0.024,
            ripple_size: 0.08,
            core_color: rgb_hex(0x8b5cf6),
            core_opacity: 0.95,
            glow_color: rgb_hex(0x06b6d4),
            ripple_color: rgb_hex(0x84cc16),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    pub links: usize,
    pub base_ease: f32,
    pub ease_step: f32,
    pub min_ease: f32,
    pub head_size: f32,
    pub link_size: f32,
    pub head_opacity: f32,
    pub opacity_step: f32,
    pub head_color: Vec3,
    pub tail_color: Vec3,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            links: 6,
            base_ease: 0.25,
            ease_step: 0.03,
            min_ease: 0.08,
            head_size: 0.052,
            link_size: 0.04,
            head_opacity: 0.92,
            opacity_step: 0.12,
            head_color: rgb_hex(0x22d3ee),
            tail_color: rgb_hex(0x6366f1),
        }
    }
}

impl TrailConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a built-in preset by name.
    pub fn preset(name: &str) -> ConfigResult<Self> {
        match name {
            "fluid" => Ok(Self::default()),
            "dense" => {
                let mut cfg = Self::default();
                cfg.pool.capacity = 200;
                cfg.pool.per_intensity = 4.0;
                cfg.physics.magnetic_radius = 0.4;
                Ok(cfg)
            }
            "liquid" => Ok(Self {
                follower: Some(FollowerConfig::default()),
                ..Self::default()
            }),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    /// Parses a (possibly partial) JSON document and validates the result.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Largest number of particles a single spawn call can add.
    pub fn max_per_spawn(&self) -> usize {
        let extra = self.input.intensity_max.max(0.0) * self.pool.per_intensity.max(0.0);
        1usize.saturating_add(extra.floor() as usize)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let pool = &self.pool;
        if pool.capacity == 0 {
            return Err(invalid("pool.capacity must be at least 1"));
        }
        if pool.palette.is_empty() {
            return Err(invalid("pool.palette must not be empty"));
        }
        check_range("pool.max_life", &pool.max_life, true)?;
        check_range("pool.decay_rate", &pool.decay_rate, true)?;
        check_range("pool.size", &pool.size, false)?;
        check_non_negative("pool.per_intensity", pool.per_intensity)?;
        check_non_negative("pool.initial_life", pool.initial_life)?;
        check_non_negative("pool.opacity_max", pool.opacity_max)?;
        if !(pool.opacity_exponent.is_finite() && pool.opacity_exponent > 0.0) {
            return Err(invalid("pool.opacity_exponent must be positive"));
        }

        let physics = &self.physics;
        if !(physics.drag > 0.0 && physics.drag <= 1.0) {
            return Err(invalid("physics.drag must be in (0, 1]"));
        }
        check_non_negative("physics.magnetic_radius", physics.magnetic_radius)?;

        let input = &self.input;
        if !(input.intensity_divisor.is_finite() && input.intensity_divisor > 0.0) {
            return Err(invalid("input.intensity_divisor must be positive"));
        }
        check_non_negative("input.intensity_max", input.intensity_max)?;
        if input.intensity_max * pool.per_intensity > pool.capacity as f32 {
            return Err(invalid(
                "input.intensity_max * pool.per_intensity must not exceed pool.capacity",
            ));
        }

        check_non_negative("max_frame_delta", self.max_frame_delta)?;
        self.projection.validate()?;
        Ok(())
    }
}

pub(crate) fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Validation(msg.into())
}

fn check_non_negative(name: &str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a finite, non-negative number")))
    }
}

fn check_range(name: &str, range: &Range<f32>, positive: bool) -> ConfigResult<()> {
    if !(range.start.is_finite() && range.end.is_finite()) || range.start > range.end {
        return Err(invalid(format!("{name} must be a finite range with start <= end")));
    }
    if positive && range.start <= 0.0 {
        return Err(invalid(format!("{name} must be strictly positive")));
    }
    if range.start < 0.0 {
        return Err(invalid(format!("{name} must not be negative")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        for name in PRESETS {
            TrailConfig::preset(name).unwrap().validate().unwrap();
        }
    }

    #[test]
    fn test_max_per_spawn() {
        let cfg = TrailConfig::default();
        assert_eq!(cfg.max_per_spawn(), 10);
        assert_eq!(TrailConfig::preset("dense").unwrap().max_per_spawn(), 13);
    }

    #[test]
    fn test_spawn_burst_bounded_by_capacity() {
        let mut cfg = TrailConfig::default();
        cfg.pool.per_intensity = 1e30;
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
        assert_eq!(cfg.max_per_spawn(), usize::MAX);

        cfg.pool.per_intensity = 50.0;
        cfg.validate().unwrap();
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut cfg = TrailConfig::default();
        cfg.pool.max_life = 2.0..1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }
}
