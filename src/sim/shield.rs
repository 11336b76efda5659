//! Atmosphere shield
//!
//! A shrinking/regenerating radius around the planet. Everything that touches
//! it is reflected; the planet only takes damage once the shield has been
//! worn down to its minimum.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::BodyKind;
use super::state::GameEvent;
use crate::consts::{GRAVITY_MIN_DISTANCE, SHIELD_BOUNCE_BONUS};
use crate::tuning::Tuning;
use crate::{direction_and_distance, reflect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereShield {
    radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub shrink_step: f32,
    pub regen_step: f32,
}

/// What a bounce did, for the caller to apply to score and events
#[derive(Debug, Clone, PartialEq)]
pub struct Bounce {
    /// Reflected velocity
    pub velocity: Vec2,
    /// Score to award
    pub bonus: u64,
    pub effect: GameEvent,
}

impl AtmosphereShield {
    /// A full-strength shield
    pub fn new(min_radius: f32, max_radius: f32, shrink_step: f32, regen_step: f32) -> Self {
        Self {
            radius: max_radius,
            min_radius,
            max_radius,
            shrink_step,
            regen_step,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.shield_min_radius,
            tuning.shield_max_radius,
            tuning.shield_shrink_step,
            tuning.shield_regen_step,
        )
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the radius directly (clamped to bounds)
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.clamp(self.min_radius, self.max_radius);
    }

    /// Fully worn down: the planet is exposed
    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.radius <= self.min_radius
    }

    pub fn shrink(&mut self) {
        self.set_radius(self.radius - self.shrink_step);
    }

    pub fn regenerate(&mut self) {
        self.set_radius(self.radius + self.regen_step);
    }

    /// Reflect a body off the shield.
    ///
    /// `v' = v - 2(v·n)n` with `n` the outward normal at the contact. Every
    /// contact shrinks the shield; asteroids award a bonus; the ship and
    /// projectiles feed energy back into it.
    pub fn bounce(&mut self, kind: BodyKind, pos: Vec2, vel: Vec2) -> Bounce {
        let velocity = match direction_and_distance(Vec2::ZERO, pos, GRAVITY_MIN_DISTANCE) {
            Some((normal, _)) => reflect(vel, normal),
            None => vel,
        };

        self.shrink();
        let bonus = match kind {
            BodyKind::Asteroid => SHIELD_BOUNCE_BONUS,
            _ => 0,
        };
        if matches!(kind, BodyKind::Player | BodyKind::Projectile) {
            self.regenerate();
        }

        Bounce {
            velocity,
            bonus,
            effect: GameEvent::Impact { pos },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn shield() -> AtmosphereShield {
        AtmosphereShield::from_tuning(&Tuning::default())
    }

    #[test]
    fn test_starts_full() {
        let s = shield();
        assert_eq!(s.radius(), 80.0);
        assert!(!s.is_depleted());
    }

    #[test]
    fn test_asteroid_bounce_shrinks_and_scores() {
        let mut s = shield();
        let out = s.bounce(BodyKind::Asteroid, Vec2::new(100.0, 0.0), Vec2::new(-50.0, 10.0));
        assert_eq!(s.radius(), 78.0);
        assert_eq!(out.bonus, 5);
        assert!((out.velocity - Vec2::new(50.0, 10.0)).length() < 1e-4);
        assert_eq!(out.effect, GameEvent::Impact { pos: Vec2::new(100.0, 0.0) });
    }

    #[test]
    fn test_player_and_projectile_bounce_regenerate() {
        let mut s = shield();
        s.set_radius(60.0);
        let out = s.bounce(BodyKind::Player, Vec2::new(0.0, 70.0), Vec2::new(0.0, -30.0));
        // shrink 2 then regen 3
        assert_eq!(s.radius(), 61.0);
        assert_eq!(out.bonus, 0);

        s.bounce(BodyKind::Projectile, Vec2::new(0.0, -70.0), Vec2::new(0.0, 30.0));
        assert_eq!(s.radius(), 62.0);
    }

    #[test]
    fn test_regen_clamped_at_max() {
        let mut s = shield();
        s.bounce(BodyKind::Player, Vec2::new(90.0, 0.0), Vec2::new(-1.0, 0.0));
        assert_eq!(s.radius(), 80.0);
    }

    #[test]
    fn test_depletion_after_twenty_hits() {
        let mut s = shield();
        for _ in 0..20 {
            s.bounce(BodyKind::Asteroid, Vec2::new(90.0, 0.0), Vec2::new(-10.0, 0.0));
        }
        assert_eq!(s.radius(), 40.0);
        assert!(s.is_depleted());
    }

    #[test]
    fn test_bounce_at_center_keeps_velocity() {
        let mut s = shield();
        let out = s.bounce(BodyKind::Asteroid, Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert_eq!(out.velocity, Vec2::new(3.0, 4.0));
        assert!(!out.velocity.is_nan());
    }

    proptest! {
        #[test]
        fn radius_after_n_shrinks(n in 0usize..60) {
            let mut s = shield();
            for _ in 0..n {
                s.shrink();
            }
            let expected = (80.0 - 2.0 * n as f32).max(40.0);
            prop_assert!((s.radius() - expected).abs() < 1e-4);
        }

        #[test]
        fn radius_stays_in_bounds(ops in proptest::collection::vec(0u8..3, 0..200)) {
            let mut s = shield();
            for op in ops {
                let kind = match op {
                    0 => BodyKind::Asteroid,
                    1 => BodyKind::Player,
                    _ => BodyKind::Projectile,
                };
                s.bounce(kind, Vec2::new(100.0, 0.0), Vec2::new(-10.0, 0.0));
                prop_assert!(s.radius() >= 40.0 && s.radius() <= 80.0);
            }
        }

        #[test]
        fn bounce_obeys_reflection_law(
            px in -300.0f32..300.0,
            py in -300.0f32..300.0,
            vx in -400.0f32..400.0,
            vy in -400.0f32..400.0,
        ) {
            let pos = Vec2::new(px, py);
            prop_assume!(pos.length() > 1.0);
            let v = Vec2::new(vx, vy);
            let n = pos.normalize();
            let out = shield().bounce(BodyKind::Asteroid, pos, v);
            prop_assert!((out.velocity - (v - 2.0 * v.dot(n) * n)).length() < 1e-2);
            prop_assert!((out.velocity.length() - v.length()).abs() < 1e-2);
        }
    }
}
