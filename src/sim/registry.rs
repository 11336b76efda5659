//! Entity registry
//!
//! Owns every asteroid and projectile. Spawns and removals requested during a
//! frame are queued and applied together by [`EntityRegistry::flush`], so no
//! collection is ever resized while something is iterating it. Entities are
//! kept sorted by id for deterministic iteration.

use std::collections::BTreeSet;

use glam::Vec2;

use super::state::{Asteroid, AsteroidTier, EntityId, Projectile};

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    asteroids: Vec<Asteroid>,
    projectiles: Vec<Projectile>,
    pending_asteroids: Vec<Asteroid>,
    pending_projectiles: Vec<Projectile>,
    /// Ids marked for removal at the next flush
    doomed: BTreeSet<EntityId>,
    next_id: EntityId,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            asteroids: Vec::new(),
            projectiles: Vec::new(),
            pending_asteroids: Vec::new(),
            pending_projectiles: Vec::new(),
            doomed: BTreeSet::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue an asteroid; it becomes live at the next flush
    pub fn spawn_asteroid(&mut self, tier: AsteroidTier, pos: Vec2, vel: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.pending_asteroids.push(Asteroid::new(id, tier, pos, vel));
        id
    }

    /// Queue a projectile; it becomes live at the next flush
    pub fn spawn_projectile(&mut self, pos: Vec2, vel: Vec2, ttl: f32) -> EntityId {
        let id = self.next_entity_id();
        self.pending_projectiles.push(Projectile::new(id, pos, vel, ttl));
        id
    }

    /// Mark a live entity for removal.
    ///
    /// Returns false if the id is unknown or already marked, so callers can
    /// use it as a "process once" guard.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let known = self.asteroids.iter().any(|a| a.id == id)
            || self.projectiles.iter().any(|p| p.id == id);
        known && self.doomed.insert(id)
    }

    /// Live and not marked for removal
    pub fn is_alive(&self, id: EntityId) -> bool {
        !self.doomed.contains(&id)
            && (self.asteroid(id).is_some() || self.projectile(id).is_some())
    }

    pub fn asteroid(&self, id: EntityId) -> Option<&Asteroid> {
        self.asteroids
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|i| &self.asteroids[i])
    }

    pub fn asteroid_mut(&mut self, id: EntityId) -> Option<&mut Asteroid> {
        match self.asteroids.binary_search_by_key(&id, |a| a.id) {
            Ok(i) => Some(&mut self.asteroids[i]),
            Err(_) => None,
        }
    }

    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.projectiles[i])
    }

    pub fn projectile_mut(&mut self, id: EntityId) -> Option<&mut Projectile> {
        match self.projectiles.binary_search_by_key(&id, |p| p.id) {
            Ok(i) => Some(&mut self.projectiles[i]),
            Err(_) => None,
        }
    }

    /// Live asteroids in id order
    pub fn asteroids(&self) -> impl Iterator<Item = &Asteroid> + '_ {
        let doomed = &self.doomed;
        self.asteroids.iter().filter(move |a| !doomed.contains(&a.id))
    }

    pub fn asteroids_mut(&mut self) -> impl Iterator<Item = &mut Asteroid> + '_ {
        let doomed = &self.doomed;
        self.asteroids
            .iter_mut()
            .filter(move |a| !doomed.contains(&a.id))
    }

    /// Live projectiles in id order
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> + '_ {
        let doomed = &self.doomed;
        self.projectiles
            .iter()
            .filter(move |p| !doomed.contains(&p.id))
    }

    pub fn projectiles_mut(&mut self) -> impl Iterator<Item = &mut Projectile> + '_ {
        let doomed = &self.doomed;
        self.projectiles
            .iter_mut()
            .filter(move |p| !doomed.contains(&p.id))
    }

    pub fn asteroid_count(&self) -> usize {
        self.asteroids().count()
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles().count()
    }

    /// Any asteroid live or waiting to spawn
    pub fn has_asteroids(&self) -> bool {
        self.asteroids().next().is_some() || !self.pending_asteroids.is_empty()
    }

    /// Mark every expired projectile for removal; returns how many
    pub fn expire_projectiles(&mut self) -> usize {
        let expired: Vec<EntityId> = self
            .projectiles()
            .filter(|p| p.expired())
            .map(|p| p.id)
            .collect();
        let count = expired.len();
        self.doomed.extend(expired);
        count
    }

    /// Apply queued removals, then queued spawns
    pub fn flush(&mut self) {
        if !self.doomed.is_empty() {
            let doomed = &self.doomed;
            self.asteroids.retain(|a| !doomed.contains(&a.id));
            self.projectiles.retain(|p| !doomed.contains(&p.id));
            self.doomed.clear();
        }
        if !self.pending_asteroids.is_empty() {
            self.asteroids.append(&mut self.pending_asteroids);
            self.asteroids.sort_by_key(|a| a.id);
        }
        if !self.pending_projectiles.is_empty() {
            self.projectiles.append(&mut self.pending_projectiles);
            self.projectiles.sort_by_key(|p| p.id);
        }
    }
}
