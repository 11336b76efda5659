//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod fragment;
pub mod gravity;
pub mod integrate;
pub mod registry;
pub mod shield;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;

pub use camera::Camera;
pub use collision::{BodyKind, BodyRef, Contact, ContactClass, classify, detect_contacts};
pub use fragment::{Fragmentation, fragment};
pub use gravity::GravityField;
pub use integrate::wrap_position;
pub use registry::EntityRegistry;
pub use shield::{AtmosphereShield, Bounce};
pub use snapshot::FrameSnapshot;
pub use state::{
    Asteroid, AsteroidTier, Body, CentralBody, EntityId, GameEvent, GamePhase, GameState, Player,
    Projectile, SessionStats,
};
pub use tick::{FrameClock, TickInput, tick};
pub use wave::{WaveDirector, WavePhase, spawn_count};
