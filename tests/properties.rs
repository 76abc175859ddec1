#![cfg(not(target_arch = "wasm32"))]

use std::collections::HashMap;

use glam::Vec3;
use proptest::prelude::*;
use trail_wasm::config::{PhysicsConfig, PoolConfig, TrailConfig};
use trail_wasm::ParticlePool;

fn pool(capacity: usize, seed: u64) -> ParticlePool {
    let config = PoolConfig {
        capacity,
        ..Default::default()
    };
    ParticlePool::new(config, PhysicsConfig::default(), 3.0, seed)
}

proptest! {
    #[test]
    fn spawn_growth_is_bounded(intensity in -5.0f32..10.0, seed in any::<u64>()) {
        let mut pool = pool(50, seed);
        let before = pool.len();
        let added = pool.spawn(Vec3::ZERO, intensity);
        let max = TrailConfig::default().max_per_spawn();
        prop_assert_eq!(pool.len() - before, added);
        prop_assert!(added >= 1);
        prop_assert!(added <= max);
    }

    #[test]
    fn advance_respects_capacity(
        capacity in 1usize..64,
        steps in prop::collection::vec((0.0f32..3.0, 0usize..4, 0.0f32..0.3), 1..40),
        seed in any::<u64>(),
    ) {
        let mut pool = pool(capacity, seed);
        let mut elapsed = 0.0;
        for (intensity, spawns, dt) in steps {
            for _ in 0..spawns {
                pool.spawn(Vec3::ZERO, intensity);
            }
            elapsed += dt;
            pool.advance(dt, elapsed, &[]);
            prop_assert!(pool.len() <= capacity);
        }
    }

    #[test]
    fn life_ratio_never_increases(
        dts in prop::collection::vec(0.0f32..0.2, 1..30),
        seed in any::<u64>(),
    ) {
        let mut pool = pool(64, seed);
        for _ in 0..8 {
            pool.spawn(Vec3::ZERO, 1.0);
        }

        // Size is fixed at spawn, so it identifies a particle across advances.
        let mut ratios: HashMap<u32, f32> = pool
            .particles()
            .iter()
            .map(|p| (p.size.to_bits(), p.life_ratio()))
            .collect();

        let mut elapsed = 0.0;
        for dt in dts {
            elapsed += dt;
            pool.advance(dt, elapsed, &[]);
            for p in pool.particles() {
                let key = p.size.to_bits();
                if let Some(prev) = ratios.get(&key) {
                    prop_assert!(p.life_ratio() <= *prev);
                }
                ratios.insert(key, p.life_ratio());
            }
        }
    }

    #[test]
    fn opacity_stays_in_bounds(
        dts in prop::collection::vec(0.0f32..0.5, 1..20),
        seed in any::<u64>(),
    ) {
        let mut pool = pool(64, seed);
        pool.spawn(Vec3::ZERO, 3.0);
        let max = PoolConfig::default().opacity_max;
        let mut elapsed = 0.0;
        for dt in dts {
            elapsed += dt;
            pool.advance(dt, elapsed, &[]);
            for p in pool.particles() {
                prop_assert!(p.opacity >= 0.0 && p.opacity <= max);
                prop_assert!(p.life > 0.0);
            }
        }
    }
}
