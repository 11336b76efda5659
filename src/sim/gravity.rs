//! Gravity field
//!
//! Inverse-square pull from the planet on the ship and every asteroid, plus a
//! weaker short-range pull from each Large asteroid on its neighbours.
//! Projectiles fly straight and are not affected.

use glam::Vec2;

use super::registry::EntityRegistry;
use super::state::{AsteroidTier, EntityId, Player};
use crate::consts::GRAVITY_MIN_DISTANCE;
use crate::direction_and_distance;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityField {
    /// Gravitational constant for the planet
    pub g: f32,
    pub central_mass: f32,
    /// Gravitational constant for Large asteroids
    pub local_g: f32,
    pub local_range: f32,
}

impl GravityField {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            g: tuning.gravity_constant,
            central_mass: tuning.central_mass,
            local_g: tuning.local_gravity_constant,
            local_range: tuning.local_gravity_range,
        }
    }

    /// Force on a body of `mass` at `pos` from the planet at the origin.
    ///
    /// Zero inside the singularity guard; no upper distance cap.
    pub fn central_force(&self, pos: Vec2, mass: f32) -> Vec2 {
        match direction_and_distance(pos, Vec2::ZERO, GRAVITY_MIN_DISTANCE) {
            Some((dir, d)) => dir * (self.g * self.central_mass * mass / (d * d)),
            None => Vec2::ZERO,
        }
    }

    /// Force on `target` from a Large asteroid at `source`.
    ///
    /// Only within `(GRAVITY_MIN_DISTANCE, local_range)`; the lower guard is
    /// checked here independently of the central one.
    pub fn local_force(&self, source: Vec2, source_mass: f32, target: Vec2, target_mass: f32) -> Vec2 {
        match direction_and_distance(target, source, GRAVITY_MIN_DISTANCE) {
            Some((dir, d)) if d < self.local_range => {
                dir * (self.local_g * source_mass * target_mass / (d * d))
            }
            _ => Vec2::ZERO,
        }
    }

    /// Accumulate this frame's gravity into every affected body
    pub fn accumulate(&self, player: &mut Player, registry: &mut EntityRegistry) {
        let player_force = self.central_force(player.body.pos, player.body.mass);
        player.body.apply_force(player_force);

        let attractors: Vec<(EntityId, Vec2, f32)> = registry
            .asteroids()
            .filter(|a| a.tier == AsteroidTier::Large)
            .map(|a| (a.id, a.body.pos, a.body.mass))
            .collect();

        for asteroid in registry.asteroids_mut() {
            let mut force = self.central_force(asteroid.body.pos, asteroid.body.mass);
            for &(source_id, source_pos, source_mass) in &attractors {
                if source_id == asteroid.id {
                    continue;
                }
                force += self.local_force(source_pos, source_mass, asteroid.body.pos, asteroid.body.mass);
            }
            asteroid.body.apply_force(force);
        }
    }
}
