//! Read-only per-frame view for the renderer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{AsteroidTier, CentralBody, EntityId, GameEvent, GamePhase, GameState, SessionStats};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipPose {
    pub pos: Vec2,
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidPose {
    pub id: EntityId,
    pub tier: AsteroidTier,
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectilePose {
    pub id: EntityId,
    pub pos: Vec2,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub central: CentralBody,
    pub shield_radius: f32,
    pub player: ShipPose,
    pub asteroids: Vec<AsteroidPose>,
    pub projectiles: Vec<ProjectilePose>,
    pub score: u64,
    pub wave: u32,
    pub health: u8,
    pub camera_position: Vec2,
    pub camera_zoom: f32,
    pub stats: SessionStats,
    /// One-shot effects raised since the previous snapshot
    pub events: Vec<GameEvent>,
}

impl FrameSnapshot {
    /// Capture the current frame, draining pending events
    pub fn capture(state: &mut GameState) -> Self {
        let events = state.take_events();
        Self {
            tick: state.time_ticks,
            phase: state.phase,
            central: state.central,
            shield_radius: state.shield.radius(),
            player: ShipPose {
                pos: state.player.body.pos,
                angle: state.player.angle,
            },
            asteroids: state
                .registry
                .asteroids()
                .map(|a| AsteroidPose {
                    id: a.id,
                    tier: a.tier,
                    pos: a.body.pos,
                    radius: a.radius(),
                })
                .collect(),
            projectiles: state
                .registry
                .projectiles()
                .map(|p| ProjectilePose {
                    id: p.id,
                    pos: p.body.pos,
                })
                .collect(),
            score: state.score,
            wave: state.wave(),
            health: state.health,
            camera_position: state.camera.position,
            camera_zoom: state.camera.zoom,
            stats: state.stats.clone(),
            events,
        }
    }
}
