//! Semi-implicit Euler integration and boundary wrap

use glam::Vec2;

use super::registry::EntityRegistry;
use super::state::{Body, Player};

/// Advance one body by `dt` and clear its accumulators
pub fn integrate_body(body: &mut Body, dt: f32) {
    if body.mass > 0.0 {
        body.vel += body.force / body.mass * dt + body.impulse / body.mass;
    }
    if body.linear_damping > 0.0 {
        body.vel *= 1.0 / (1.0 + dt * body.linear_damping);
    }
    body.pos += body.vel * dt;
    body.force = Vec2::ZERO;
    body.impulse = Vec2::ZERO;
}

/// Advance the ship, including its spin
pub fn integrate_player(player: &mut Player, dt: f32) {
    integrate_body(&mut player.body, dt);
    if player.angular_damping > 0.0 {
        player.angular_vel *= 1.0 / (1.0 + dt * player.angular_damping);
    }
    player.angle = crate::normalize_angle(player.angle + player.angular_vel * dt);
}

/// Integrate every dynamic body exactly once and age projectiles
pub fn step(player: &mut Player, registry: &mut EntityRegistry, dt: f32) {
    integrate_player(player, dt);
    for asteroid in registry.asteroids_mut() {
        integrate_body(&mut asteroid.body, dt);
    }
    for projectile in registry.projectiles_mut() {
        integrate_body(&mut projectile.body, dt);
        projectile.ttl -= dt;
    }
}

/// Mirror each coordinate that leaves `[-limit, limit]` to the other side
#[inline]
pub fn wrap_position(pos: Vec2, limit: f32) -> Vec2 {
    let x = if pos.x.abs() > limit { -pos.x } else { pos.x };
    let y = if pos.y.abs() > limit { -pos.y } else { pos.y };
    Vec2::new(x, y)
}

/// Wrap the ship and asteroids; projectiles expire instead
pub fn wrap_bodies(player: &mut Player, registry: &mut EntityRegistry, limit: f32) {
    player.body.pos = wrap_position(player.body.pos, limit);
    for asteroid in registry.asteroids_mut() {
        asteroid.body.pos = wrap_position(asteroid.body.pos, limit);
    }
}
