//! Contact detection and resolution
//!
//! Every collider is a circle. Which pairs may interact is decided by
//! [`classify`], the single permission table for the simulation; anything it
//! rejects passes through. Contacts are gathered against the positions at the
//! start of the pass, then resolved in class order. A body removed by an
//! earlier resolution is skipped by every later one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::fragment::fragment;
use super::state::{EntityId, GameEvent, GameState};
use crate::direction_and_distance;

/// Closed set of things that can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Player,
    Asteroid,
    Projectile,
    CentralBody,
    Atmosphere,
}

/// Permitted contact types, in resolution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactClass {
    /// Projectile strikes an asteroid
    ProjectileHit,
    /// Asteroid reaches the planet surface
    PlanetImpact,
    /// Ship, asteroid or projectile meets the shield
    ShieldBounce,
    /// Two asteroids touch
    AsteroidCollision,
}

/// Contact permission matrix; `None` means the pair never interacts
pub fn classify(a: BodyKind, b: BodyKind) -> Option<ContactClass> {
    use BodyKind::*;
    match (a, b) {
        (Projectile, Asteroid) | (Asteroid, Projectile) => Some(ContactClass::ProjectileHit),
        (Asteroid, CentralBody) | (CentralBody, Asteroid) => Some(ContactClass::PlanetImpact),
        (Atmosphere, Asteroid | Player | Projectile) | (Asteroid | Player | Projectile, Atmosphere) => {
            Some(ContactClass::ShieldBounce)
        }
        (Asteroid, Asteroid) => Some(ContactClass::AsteroidCollision),
        _ => None,
    }
}

/// Handle to a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRef {
    Player,
    Asteroid(EntityId),
    Projectile(EntityId),
    CentralBody,
    Atmosphere,
}

impl BodyRef {
    pub fn kind(self) -> BodyKind {
        match self {
            BodyRef::Player => BodyKind::Player,
            BodyRef::Asteroid(_) => BodyKind::Asteroid,
            BodyRef::Projectile(_) => BodyKind::Projectile,
            BodyRef::CentralBody => BodyKind::CentralBody,
            BodyRef::Atmosphere => BodyKind::Atmosphere,
        }
    }
}

/// A detected contact. `a` is the projectile for hits, the asteroid for
/// planet impacts, the non-shield body for bounces, and the lower id for
/// asteroid pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub class: ContactClass,
    pub a: BodyRef,
    pub b: BodyRef,
}

impl Contact {
    fn new(class: ContactClass, a: BodyRef, b: BodyRef) -> Self {
        let swap = match class {
            ContactClass::ProjectileHit => a.kind() != BodyKind::Projectile,
            ContactClass::PlanetImpact => a.kind() != BodyKind::Asteroid,
            ContactClass::ShieldBounce => a.kind() == BodyKind::Atmosphere,
            ContactClass::AsteroidCollision => false,
        };
        if swap {
            Self { class, a: b, b: a }
        } else {
            Self { class, a, b }
        }
    }
}

/// Circle snapshot used for detection
#[derive(Debug, Clone, Copy)]
struct Collider {
    body: BodyRef,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
}

fn colliders(state: &GameState) -> Vec<Collider> {
    let mut out = Vec::with_capacity(1 + state.registry.asteroid_count() + state.registry.projectile_count());
    out.push(Collider {
        body: BodyRef::Player,
        pos: state.player.body.pos,
        vel: state.player.body.vel,
        radius: state.player.radius,
    });
    out.extend(state.registry.asteroids().map(|a| Collider {
        body: BodyRef::Asteroid(a.id),
        pos: a.body.pos,
        vel: a.body.vel,
        radius: a.radius(),
    }));
    out.extend(state.registry.projectiles().map(|p| Collider {
        body: BodyRef::Projectile(p.id),
        pos: p.body.pos,
        vel: p.body.vel,
        radius: p.radius(),
    }));
    out
}

/// Touching the planet or the shield. The shield only counts bodies moving
/// inward, so a body already reflected this frame is not bounced again.
fn touches_static(state: &GameState, collider: &Collider, target: BodyRef) -> bool {
    let distance = collider.pos.length();
    match target {
        BodyRef::CentralBody => distance < state.central.radius + collider.radius,
        BodyRef::Atmosphere => {
            distance < state.shield.radius() + collider.radius && collider.vel.dot(collider.pos) < 0.0
        }
        _ => false,
    }
}

/// Gather all permitted contacts, ordered by resolution class
pub fn detect_contacts(state: &GameState) -> Vec<Contact> {
    let colliders = colliders(state);
    let mut contacts = Vec::new();

    for collider in &colliders {
        for target in [BodyRef::CentralBody, BodyRef::Atmosphere] {
            if let Some(class) = classify(collider.body.kind(), target.kind()) {
                if touches_static(state, collider, target) {
                    contacts.push(Contact::new(class, collider.body, target));
                }
            }
        }
    }

    for (i, first) in colliders.iter().enumerate() {
        for second in &colliders[i + 1..] {
            let Some(class) = classify(first.body.kind(), second.body.kind()) else {
                continue;
            };
            let reach = first.radius + second.radius;
            if first.pos.distance_squared(second.pos) < reach * reach {
                contacts.push(Contact::new(class, first.body, second.body));
            }
        }
    }

    // Stable: keeps id order within a class
    contacts.sort_by_key(|c| c.class);
    contacts
}

/// Apply one contact's resolution
pub fn resolve(state: &mut GameState, contact: Contact) {
    match (contact.class, contact.a, contact.b) {
        (ContactClass::ProjectileHit, BodyRef::Projectile(p), BodyRef::Asteroid(a)) => {
            resolve_projectile_hit(state, p, a)
        }
        (ContactClass::PlanetImpact, BodyRef::Asteroid(a), _) => resolve_planet_impact(state, a),
        (ContactClass::ShieldBounce, body, _) => resolve_shield_bounce(state, body),
        (ContactClass::AsteroidCollision, BodyRef::Asteroid(a), BodyRef::Asteroid(b)) => {
            resolve_asteroid_collision(state, a, b)
        }
        _ => {}
    }
}

/// Detect and resolve every contact for this frame; returns the contact count
pub fn process(state: &mut GameState) -> usize {
    let contacts = detect_contacts(state);
    for contact in &contacts {
        resolve(state, *contact);
    }
    contacts.len()
}

fn resolve_projectile_hit(state: &mut GameState, projectile: EntityId, asteroid: EntityId) {
    if !state.registry.is_alive(projectile) || !state.registry.is_alive(asteroid) {
        return;
    }
    state.registry.remove(projectile);

    let impulse = state.tuning.fragment_impulse;
    if let Some(result) = fragment(
        &mut state.registry,
        &mut state.score,
        asteroid,
        impulse,
        &mut state.rng,
    ) {
        state.stats.asteroids_destroyed += 1;
        state.events.push(GameEvent::Explosion {
            pos: result.pos,
            color: Some(result.tier.color()),
        });
    }
}

/// Planet damage tint
const DAMAGE_COLOR: u32 = 0xFF3B30;

fn resolve_planet_impact(state: &mut GameState, asteroid: EntityId) {
    if !state.registry.is_alive(asteroid) {
        return;
    }
    let Some(pos) = state.registry.asteroid(asteroid).map(|a| a.body.pos) else {
        return;
    };
    state.registry.remove(asteroid);

    if state.shield.is_depleted() {
        state.health = state.health.saturating_sub(1);
        state.stats.planet_hits += 1;
        log::debug!("Planet hit at {:?}, health now {}", pos, state.health);
        state.events.push(GameEvent::PlanetDamage {
            pos,
            color: Some(DAMAGE_COLOR),
        });
    }
}

fn resolve_shield_bounce(state: &mut GameState, body: BodyRef) {
    let (pos, vel) = match body {
        BodyRef::Player => (state.player.body.pos, state.player.body.vel),
        BodyRef::Asteroid(id) if state.registry.is_alive(id) => match state.registry.asteroid(id) {
            Some(a) => (a.body.pos, a.body.vel),
            None => return,
        },
        BodyRef::Projectile(id) if state.registry.is_alive(id) => match state.registry.projectile(id) {
            Some(p) => (p.body.pos, p.body.vel),
            None => return,
        },
        _ => return,
    };

    let bounce = state.shield.bounce(body.kind(), pos, vel);
    match body {
        BodyRef::Player => state.player.body.vel = bounce.velocity,
        BodyRef::Asteroid(id) => {
            if let Some(a) = state.registry.asteroid_mut(id) {
                a.body.vel = bounce.velocity;
            }
        }
        BodyRef::Projectile(id) => {
            // Spent on contact
            state.registry.remove(id);
        }
        _ => {}
    }

    state.score += bounce.bonus;
    state.stats.shield_bounces += 1;
    state.events.push(bounce.effect);
}

fn resolve_asteroid_collision(state: &mut GameState, a: EntityId, b: EntityId) {
    if !state.registry.is_alive(a) || !state.registry.is_alive(b) {
        return;
    }
    let (Some(first), Some(second)) = (state.registry.asteroid(a), state.registry.asteroid(b)) else {
        return;
    };
    let (pa, va) = (first.body.pos, first.body.vel);
    let (pb, vb) = (second.body.pos, second.body.vel);

    if (va - vb).length() > state.tuning.impact_effect_speed {
        state.events.push(GameEvent::Impact { pos: (pa + pb) * 0.5 });
    }

    let normal = direction_and_distance(pa, pb, 0.0)
        .map(|(n, _)| n)
        .unwrap_or(Vec2::X);
    let impulse = normal * state.tuning.separation_impulse;
    if let Some(first) = state.registry.asteroid_mut(a) {
        first.body.apply_impulse(-impulse);
    }
    if let Some(second) = state.registry.asteroid_mut(b) {
        second.body.apply_impulse(impulse);
    }
}
