//! Wave director
//!
//! Each wave spawns `3 + 2 * wave` Large asteroids, staggered half a second
//! apart, on a ring one frame-width from the planet. The next wave starts
//! once every scheduled spawn is out and the field is clear.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::registry::EntityRegistry;
use super::state::{AsteroidTier, GameEvent};
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Wave lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Releasing asteroids; `elapsed` is seconds since the wave began
    Spawning {
        wave: u32,
        spawned: u32,
        elapsed: f32,
    },
    /// All asteroids released, waiting for the field to clear
    Active { wave: u32 },
    /// Field cleared; the next wave begins on the following update
    Cleared { wave: u32 },
}

/// Number of asteroids in a wave
#[inline]
pub fn spawn_count(wave: u32) -> u32 {
    WAVE_BASE_COUNT + WAVE_COUNT_STEP * wave
}

/// Initial velocity for an asteroid entering at `pos`: mostly tangential,
/// drifting slightly inward.
pub fn spawn_velocity<R: Rng>(pos: Vec2, rng: &mut R) -> Vec2 {
    let outward = pos.normalize_or_zero();
    let to_center = -outward;
    let tangent = Vec2::new(-to_center.y, to_center.x);
    let (t_min, t_max) = WAVE_TANGENTIAL_SPEED;
    let (r_min, r_max) = WAVE_RADIAL_SPEED;
    tangent * rng.random_range(t_min..=t_max) + outward * rng.random_range(r_min..=r_max)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDirector {
    phase: WavePhase,
    /// Whether the current wave's banner has gone out
    announced: bool,
    pub spawn_interval: f32,
    pub ring_radius: f32,
}

impl WaveDirector {
    /// Director poised to start wave 1
    pub fn new(ring_radius: f32, spawn_interval: f32) -> Self {
        Self {
            phase: WavePhase::Spawning {
                wave: 1,
                spawned: 0,
                elapsed: 0.0,
            },
            announced: false,
            spawn_interval,
            ring_radius,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.frame_width, tuning.wave_spawn_interval)
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Current wave number (1-based)
    pub fn wave(&self) -> u32 {
        match self.phase {
            WavePhase::Spawning { wave, .. }
            | WavePhase::Active { wave }
            | WavePhase::Cleared { wave } => wave,
        }
    }

    /// Advance the wave state machine by `dt`
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        registry: &mut EntityRegistry,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        match self.phase {
            WavePhase::Spawning {
                wave,
                mut spawned,
                elapsed,
            } => {
                if !self.announced {
                    log::info!("Wave {} begins: {} asteroids", wave, spawn_count(wave));
                    events.push(GameEvent::WaveBanner { wave });
                    self.announced = true;
                }

                let count = spawn_count(wave);
                while spawned < count && elapsed >= spawned as f32 * self.spawn_interval {
                    let theta = rng.random_range(0.0..std::f32::consts::TAU);
                    let pos = polar_to_cartesian(self.ring_radius, theta);
                    let vel = spawn_velocity(pos, rng);
                    registry.spawn_asteroid(AsteroidTier::Large, pos, vel);
                    spawned += 1;
                }

                self.phase = if spawned >= count {
                    WavePhase::Active { wave }
                } else {
                    WavePhase::Spawning {
                        wave,
                        spawned,
                        elapsed: elapsed + dt,
                    }
                };
            }
            WavePhase::Active { wave } => {
                if !registry.has_asteroids() {
                    log::info!("Wave {} cleared", wave);
                    self.phase = WavePhase::Cleared { wave };
                }
            }
            WavePhase::Cleared { wave } => {
                self.phase = WavePhase::Spawning {
                    wave: wave + 1,
                    spawned: 0,
                    elapsed: 0.0,
                };
                self.announced = false;
                self.update(dt, registry, rng, events);
            }
        }
    }
}
