//! Data-driven game balance
//!
//! Every tunable constant in [`crate::consts`] has a field here. Tuning files
//! are JSON; missing keys fall back to the compile-time defaults, so a file
//! can override just the values being adjusted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Runtime-tunable physics and gameplay values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Frame ===
    /// Simulation timestep (seconds)
    pub sim_dt: f32,
    pub frame_width: f32,
    pub frame_height: f32,
    pub wrap_margin: f32,

    // === Gravity ===
    pub gravity_constant: f32,
    pub central_mass: f32,
    pub central_radius: f32,
    pub local_gravity_constant: f32,
    pub local_gravity_range: f32,

    // === Atmosphere shield ===
    pub shield_min_radius: f32,
    pub shield_max_radius: f32,
    pub shield_shrink_step: f32,
    pub shield_regen_step: f32,

    // === Player ===
    pub player_spawn_radius: f32,
    pub player_mass: f32,
    pub player_linear_damping: f32,
    pub player_angular_damping: f32,
    pub max_thrust: f32,
    pub fire_interval: f32,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_ttl: f32,

    // === Asteroids ===
    pub fragment_impulse: f32,
    pub separation_impulse: f32,
    pub impact_effect_speed: f32,

    // === Waves ===
    pub wave_spawn_interval: f32,

    // === Camera ===
    pub max_zoom: f32,
    pub camera_zoom_distance: f32,

    // === Session ===
    pub starting_health: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            sim_dt: SIM_DT,
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
            wrap_margin: WRAP_MARGIN,

            gravity_constant: GRAVITY_CONSTANT,
            central_mass: CENTRAL_MASS,
            central_radius: CENTRAL_RADIUS,
            local_gravity_constant: LOCAL_GRAVITY_CONSTANT,
            local_gravity_range: LOCAL_GRAVITY_RANGE,

            shield_min_radius: SHIELD_MIN_RADIUS,
            shield_max_radius: SHIELD_MAX_RADIUS,
            shield_shrink_step: SHIELD_SHRINK_STEP,
            shield_regen_step: SHIELD_REGEN_STEP,

            player_spawn_radius: PLAYER_SPAWN_RADIUS,
            player_mass: PLAYER_MASS,
            player_linear_damping: PLAYER_LINEAR_DAMPING,
            player_angular_damping: PLAYER_ANGULAR_DAMPING,
            max_thrust: MAX_THRUST,
            fire_interval: FIRE_INTERVAL,

            projectile_speed: PROJECTILE_SPEED,
            projectile_ttl: PROJECTILE_TTL,

            fragment_impulse: FRAGMENT_IMPULSE,
            separation_impulse: ASTEROID_SEPARATION_IMPULSE,
            impact_effect_speed: ASTEROID_IMPACT_SPEED,

            wave_spawn_interval: WAVE_SPAWN_INTERVAL,

            max_zoom: MAX_ZOOM,
            camera_zoom_distance: CAMERA_ZOOM_DISTANCE,

            starting_health: STARTING_HEALTH,
        }
    }
}

impl Tuning {
    /// Parse a tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&contents)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("sim_dt", self.sim_dt),
            ("frame_width", self.frame_width),
            ("frame_height", self.frame_height),
            ("central_mass", self.central_mass),
            ("central_radius", self.central_radius),
            ("player_mass", self.player_mass),
            ("fire_interval", self.fire_interval),
            ("projectile_ttl", self.projectile_ttl),
            ("camera_zoom_distance", self.camera_zoom_distance),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be greater than 0",
                });
            }
        }
        if self.shield_min_radius > self.shield_max_radius {
            return Err(TuningError::Invalid {
                field: "shield_min_radius",
                reason: "must not exceed shield_max_radius",
            });
        }
        if self.max_zoom < 1.0 {
            return Err(TuningError::Invalid {
                field: "max_zoom",
                reason: "must be at least 1.0",
            });
        }
        if self.starting_health == 0 {
            return Err(TuningError::Invalid {
                field: "starting_health",
                reason: "must be greater than 0",
            });
        }
        Ok(())
    }

    /// Extent beyond which bodies wrap to the opposite side
    pub fn wrap_limit(&self) -> f32 {
        self.frame_width * 0.5 * self.max_zoom + self.wrap_margin
    }
}
