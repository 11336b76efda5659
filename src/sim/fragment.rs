//! Asteroid fragmentation

use glam::Vec2;
use rand::Rng;

use super::registry::EntityRegistry;
use super::state::{AsteroidTier, EntityId};
use crate::polar_to_cartesian;

/// Result of breaking one asteroid
#[derive(Debug, Clone, PartialEq)]
pub struct Fragmentation {
    pub tier: AsteroidTier,
    /// Parent's last position
    pub pos: Vec2,
    pub points: u64,
    /// Ids of the queued children (empty for Small)
    pub children: Vec<EntityId>,
}

/// Break an asteroid apart.
///
/// Awards the tier's points, queues the parent's removal, then queues 2-3
/// children of the next tier spread evenly around the parent's last position.
/// Each child inherits the parent's velocity plus `impulse` along its own
/// offset direction. Returns `None` if the asteroid is not live.
pub fn fragment<R: Rng>(
    registry: &mut EntityRegistry,
    score: &mut u64,
    id: EntityId,
    impulse: f32,
    rng: &mut R,
) -> Option<Fragmentation> {
    let (tier, pos, vel) = {
        let parent = registry.asteroid(id)?;
        (parent.tier, parent.body.pos, parent.body.vel)
    };
    if !registry.remove(id) {
        return None;
    }
    *score += tier.points();

    let mut children = Vec::new();
    if let Some(child_tier) = tier.smaller() {
        let count: u32 = rng.random_range(2..=3);
        let spread = std::f32::consts::TAU / count as f32;
        for i in 0..count {
            let theta = i as f32 * spread;
            let offset = polar_to_cartesian(tier.radius(), theta);
            let kick = polar_to_cartesian(impulse, theta);
            children.push(registry.spawn_asteroid(child_tier, pos + offset, vel + kick));
        }
    }

    log::debug!(
        "Fragmented {:?} asteroid {} into {} pieces",
        tier,
        id,
        children.len()
    );

    Some(Fragmentation {
        tier,
        pos,
        points: tier.points(),
        children,
    })
}
