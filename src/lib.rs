//! Gravity Well - a shielded-planet arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity, collisions, waves, camera)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Remote leaderboard request handling
//! - `error`: Error types for tuning and the score service

pub mod error;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use error::{ScoreError, TuningError};
pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible frame at zoom 1.0
    pub const FRAME_WIDTH: f32 = 800.0;
    pub const FRAME_HEIGHT: f32 = 600.0;
    /// Extra room past the fully zoomed-out frame before bodies wrap
    pub const WRAP_MARGIN: f32 = 100.0;

    /// Central body (planet)
    pub const CENTRAL_MASS: f32 = 10_000.0;
    pub const CENTRAL_RADIUS: f32 = 50.0;
    /// Gravitational constant for the planet's pull
    pub const GRAVITY_CONSTANT: f32 = 500.0;
    /// Gravitational constant for Large-asteroid pull on neighbours
    pub const LOCAL_GRAVITY_CONSTANT: f32 = 50.0;
    /// Reach of Large-asteroid gravity
    pub const LOCAL_GRAVITY_RANGE: f32 = 200.0;
    /// Below this distance no gravity is applied (singularity guard)
    pub const GRAVITY_MIN_DISTANCE: f32 = 1.0;

    /// Atmosphere shield
    pub const SHIELD_MIN_RADIUS: f32 = 40.0;
    pub const SHIELD_MAX_RADIUS: f32 = 80.0;
    pub const SHIELD_SHRINK_STEP: f32 = 2.0;
    pub const SHIELD_REGEN_STEP: f32 = 3.0;
    /// Score bonus for an asteroid turned away by the shield
    pub const SHIELD_BOUNCE_BONUS: u64 = 5;

    /// Player ship
    pub const PLAYER_SPAWN_RADIUS: f32 = 200.0;
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_MASS: f32 = 1.0;
    pub const PLAYER_LINEAR_DAMPING: f32 = 0.3;
    pub const PLAYER_ANGULAR_DAMPING: f32 = 0.5;
    pub const MAX_THRUST: f32 = 400.0;
    /// Input magnitudes at or below this are treated as idle
    pub const INPUT_DEADZONE: f32 = 0.1;

    /// Projectiles
    pub const FIRE_INTERVAL: f32 = 0.2;
    pub const PROJECTILE_SPEED: f32 = 500.0;
    pub const PROJECTILE_SPAWN_OFFSET: f32 = 20.0;
    pub const PROJECTILE_TTL: f32 = 3.0;
    pub const PROJECTILE_RADIUS: f32 = 4.0;

    /// Fragmentation
    pub const FRAGMENT_IMPULSE: f32 = 150.0;

    /// Asteroid-asteroid contacts
    pub const ASTEROID_IMPACT_SPEED: f32 = 100.0;
    pub const ASTEROID_SEPARATION_IMPULSE: f32 = 50.0;

    /// Waves
    pub const WAVE_BASE_COUNT: u32 = 3;
    pub const WAVE_COUNT_STEP: u32 = 2;
    pub const WAVE_SPAWN_INTERVAL: f32 = 0.5;
    pub const WAVE_TANGENTIAL_SPEED: (f32, f32) = (50.0, 100.0);
    pub const WAVE_RADIAL_SPEED: (f32, f32) = (-20.0, -5.0);

    /// Camera
    pub const MAX_ZOOM: f32 = 2.5;
    pub const CAMERA_ZOOM_DISTANCE: f32 = 300.0;
    pub const CAMERA_ZOOM_SMOOTHING: f32 = 0.95;
    pub const CAMERA_POSITION_SMOOTHING: f32 = 0.9;
    pub const CAMERA_TRACKING: f32 = 0.3;

    /// Planet hit points
    pub const STARTING_HEALTH: u8 = 3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Reflect a velocity about a unit normal: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Unit vector and distance from `from` to `to`, or `None` when the points
/// are closer than `min_distance`.
#[inline]
pub fn direction_and_distance(from: Vec2, to: Vec2, min_distance: f32) -> Option<(Vec2, f32)> {
    let delta = to - from;
    let distance = delta.length();
    if distance > min_distance {
        Some((delta / distance, distance))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_angle_wraps() {
        use std::f32::consts::PI;
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_direction_guard() {
        assert!(direction_and_distance(Vec2::ZERO, Vec2::new(0.5, 0.5), 1.0).is_none());
        let (dir, dist) = direction_and_distance(Vec2::ZERO, Vec2::new(3.0, 4.0), 1.0).unwrap();
        assert!((dist - 5.0).abs() < 1e-6);
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    proptest! {
        #[test]
        fn reflection_preserves_speed(
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
            theta in -3.14f32..3.14,
        ) {
            let v = Vec2::new(vx, vy);
            let n = polar_to_cartesian(1.0, theta);
            let r = reflect(v, n);
            prop_assert!((r.length() - v.length()).abs() < 1e-2);
            prop_assert!((r - (v - 2.0 * v.dot(n) * n)).length() < 1e-3);
        }
    }
}
