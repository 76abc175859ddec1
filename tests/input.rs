use glam::{Vec2, Vec3};
use trail_wasm::config::InputConfig;
use trail_wasm::input::PointerTracker;
use trail_wasm::{PointerSample, Projection, Viewport};

#[test]
fn intensity_scales_and_clamps() {
    let tracker = PointerTracker::new(InputConfig::default());
    assert_eq!(tracker.intensity(Vec2::ZERO), 0.0);
    assert!((tracker.intensity(Vec2::new(3.0, 4.0)) - 0.5).abs() < 1e-6);
    assert_eq!(tracker.intensity(Vec2::new(30.0, 40.0)), 3.0);
    assert_eq!(tracker.intensity(Vec2::new(f32::NAN, 1.0)), 0.0);
    assert_eq!(tracker.intensity(Vec2::new(f32::INFINITY, 0.0)), 0.0);
}

#[test]
fn velocity_is_scaled_world_delta() {
    let mut tracker = PointerTracker::new(InputConfig::default());
    let vp = Viewport::new(200.0, 200.0);

    let first = tracker.track(PointerSample::new(150.0, 100.0, 5.0, 0.0), &Projection::Flat, &vp);
    assert!((first.position - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
    assert!((first.velocity - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    assert!((first.intensity - 0.5).abs() < 1e-6);

    let second = tracker.track(
        PointerSample::new(100.0, 50.0, -50.0, -50.0),
        &Projection::Flat,
        &vp,
    );
    assert!((second.position - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-6);
    assert!((second.velocity - Vec3::new(-5.0, 5.0, 0.0)).length() < 1e-5);
    assert_eq!(second.intensity, 3.0);
    assert_eq!(tracker.previous(), first.position);
    assert_eq!(tracker.current(), second.position);
}
