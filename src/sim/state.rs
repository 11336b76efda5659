//! Game state and core simulation types
//!
//! Everything a frame reads or writes lives in [`GameState`]; the caller owns
//! it and passes it to [`super::tick`] explicitly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::registry::EntityRegistry;
use super::shield::AtmosphereShield;
use super::wave::WaveDirector;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::polar_to_cartesian;

/// Stable identifier for registry-owned entities
pub type EntityId = u32;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Planet destroyed, simulation halted
    GameOver,
}

/// Linear state shared by every dynamic body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub linear_damping: f32,
    /// Force accumulated this frame, consumed by the integrator
    #[serde(skip)]
    pub force: Vec2,
    /// Impulse queued for the next integration step
    #[serde(skip)]
    pub impulse: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, mass: f32) -> Self {
        Self {
            pos,
            vel,
            mass,
            linear_damping: 0.0,
            force: Vec2::ZERO,
            impulse: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.impulse += impulse;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Distance from the central body
    #[inline]
    pub fn distance_from_center(&self) -> f32 {
        self.pos.length()
    }
}

/// The fixed planet at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralBody {
    pub mass: f32,
    pub radius: f32,
}

impl CentralBody {
    pub fn new(mass: f32, radius: f32) -> Self {
        Self { mass, radius }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Orientation in radians; 0 means the nose points along -y
    pub angle: f32,
    pub angular_vel: f32,
    pub angular_damping: f32,
    pub radius: f32,
    /// Seconds until the gun can fire again
    pub fire_cooldown: f32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        let mut body = Body::new(pos, Vec2::ZERO, tuning.player_mass);
        body.linear_damping = tuning.player_linear_damping;
        Self {
            body,
            angle: 0.0,
            angular_vel: 0.0,
            angular_damping: tuning.player_angular_damping,
            radius: PLAYER_RADIUS,
            fire_cooldown: 0.0,
        }
    }

    /// Spawn at a random point on the ring around the planet
    pub fn spawn<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let theta = rng.random_range(0.0..std::f32::consts::TAU);
        Self::new(polar_to_cartesian(tuning.player_spawn_radius, theta), tuning)
    }

    /// Unit vector the nose points along
    pub fn facing(&self) -> Vec2 {
        let heading = self.angle - std::f32::consts::FRAC_PI_2;
        Vec2::new(heading.cos(), heading.sin())
    }

    /// Thrust along the input direction and turn to face it.
    ///
    /// Inputs with magnitude at or below the deadzone are ignored.
    pub fn steer(&mut self, direction: Vec2, max_thrust: f32) {
        let magnitude = direction.length().min(1.0);
        if magnitude <= INPUT_DEADZONE {
            return;
        }
        let dir = direction / direction.length();
        self.body.apply_force(dir * max_thrust * magnitude);
        self.angle = dir.y.atan2(dir.x) + std::f32::consts::FRAC_PI_2;
        self.angular_vel = 0.0;
    }

    /// Tick the gun cooldown; returns the muzzle position and velocity of a
    /// new projectile when one is fired.
    pub fn update_gun(&mut self, fire_held: bool, dt: f32, tuning: &Tuning) -> Option<(Vec2, Vec2)> {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        if !fire_held || self.fire_cooldown > 0.0 {
            return None;
        }
        self.fire_cooldown = tuning.fire_interval;
        let facing = self.facing();
        Some((
            self.body.pos + facing * PROJECTILE_SPAWN_OFFSET,
            facing * tuning.projectile_speed,
        ))
    }
}

/// Asteroid size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidTier {
    Large,
    Medium,
    Small,
}

impl AsteroidTier {
    pub fn radius(self) -> f32 {
        match self {
            AsteroidTier::Large => 40.0,
            AsteroidTier::Medium => 25.0,
            AsteroidTier::Small => 15.0,
        }
    }

    pub fn points(self) -> u64 {
        match self {
            AsteroidTier::Large => 20,
            AsteroidTier::Medium => 15,
            AsteroidTier::Small => 10,
        }
    }

    pub fn mass(self) -> f32 {
        match self {
            AsteroidTier::Large => 100.0,
            AsteroidTier::Medium => 50.0,
            AsteroidTier::Small => 20.0,
        }
    }

    /// Tier of the fragments this asteroid breaks into
    pub fn smaller(self) -> Option<AsteroidTier> {
        match self {
            AsteroidTier::Large => Some(AsteroidTier::Medium),
            AsteroidTier::Medium => Some(AsteroidTier::Small),
            AsteroidTier::Small => None,
        }
    }

    /// Explosion tint (0xRRGGBB)
    pub fn color(self) -> u32 {
        match self {
            AsteroidTier::Large => 0xFF8C42,
            AsteroidTier::Medium => 0xFFC857,
            AsteroidTier::Small => 0xE9E9E9,
        }
    }
}

/// An asteroid entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: EntityId,
    pub tier: AsteroidTier,
    pub body: Body,
}

impl Asteroid {
    pub fn new(id: EntityId, tier: AsteroidTier, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            tier,
            body: Body::new(pos, vel, tier.mass()),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.tier.radius()
    }
}

/// A player-fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub body: Body,
    /// Seconds left before expiry
    pub ttl: f32,
}

impl Projectile {
    pub fn new(id: EntityId, pos: Vec2, vel: Vec2, ttl: f32) -> Self {
        Self {
            id,
            body: Body::new(pos, vel, 1.0),
            ttl,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        PROJECTILE_RADIUS
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.ttl <= 0.0
    }
}

/// One-shot notifications for the renderer (never affect gameplay)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Asteroid broken by a projectile
    Explosion { pos: Vec2, color: Option<u32> },
    /// Shield bounce or hard asteroid collision
    Impact { pos: Vec2 },
    /// Asteroid struck an unshielded planet
    PlanetDamage { pos: Vec2, color: Option<u32> },
    /// A new wave begins
    WaveBanner { wave: u32 },
    /// Planet destroyed
    GameOver { score: u64, wave: u32 },
}

/// Running totals for the session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub asteroids_destroyed: u32,
    pub shots_fired: u32,
    pub shield_bounces: u32,
    pub planet_hits: u32,
    /// Simulated seconds
    pub elapsed: f32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Score (never decreases)
    pub score: u64,
    /// Planet hit points
    pub health: u8,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub central: CentralBody,
    pub shield: AtmosphereShield,
    pub player: Player,
    pub registry: EntityRegistry,
    pub waves: WaveDirector,
    pub camera: Camera,
    pub stats: SessionStats,
    /// Events raised since the last [`GameState::take_events`]
    pub events: Vec<GameEvent>,
    /// Injectable random source; every random draw in the frame uses it
    pub rng: Pcg32,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new session; wave 1 starts on the first tick
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::spawn(&mut rng, &tuning);
        Self {
            seed,
            phase: GamePhase::Playing,
            score: 0,
            health: tuning.starting_health,
            time_ticks: 0,
            central: CentralBody::new(tuning.central_mass, tuning.central_radius),
            shield: AtmosphereShield::from_tuning(&tuning),
            player,
            registry: EntityRegistry::new(),
            waves: WaveDirector::from_tuning(&tuning),
            camera: Camera::new(tuning.max_zoom, tuning.camera_zoom_distance),
            stats: SessionStats::default(),
            events: Vec::new(),
            rng,
            tuning,
        }
    }

    /// Current wave number (1-based)
    pub fn wave(&self) -> u32 {
        self.waves.wave()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Drain pending one-shot events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_table() {
        assert_eq!(AsteroidTier::Large.radius(), 40.0);
        assert_eq!(AsteroidTier::Medium.points(), 15);
        assert_eq!(AsteroidTier::Small.mass(), 20.0);
        assert_eq!(AsteroidTier::Large.smaller(), Some(AsteroidTier::Medium));
        assert_eq!(AsteroidTier::Medium.smaller(), Some(AsteroidTier::Small));
        assert_eq!(AsteroidTier::Small.smaller(), None);
    }

    #[test]
    fn test_player_spawns_on_ring() {
        let state = GameState::new(7);
        let d = state.player.body.distance_from_center();
        assert!((d - PLAYER_SPAWN_RADIUS).abs() < 1e-3);
        assert_eq!(state.health, STARTING_HEALTH);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_steer_sets_orientation_and_thrust() {
        let tuning = Tuning::default();
        let mut player = Player::new(Vec2::new(100.0, 0.0), &tuning);
        player.steer(Vec2::new(1.0, 0.0), tuning.max_thrust);

        assert!((player.body.force - Vec2::new(400.0, 0.0)).length() < 1e-3);
        assert!((player.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        // Nose follows the thrust direction
        assert!((player.facing() - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_steer_scales_with_magnitude() {
        let tuning = Tuning::default();
        let mut player = Player::new(Vec2::ZERO, &tuning);
        player.steer(Vec2::new(0.0, -0.5), tuning.max_thrust);
        assert!((player.body.force - Vec2::new(0.0, -200.0)).length() < 1e-3);
    }

    #[test]
    fn test_steer_ignores_deadzone() {
        let tuning = Tuning::default();
        let mut player = Player::new(Vec2::ZERO, &tuning);
        player.angle = 1.0;
        player.steer(Vec2::new(0.05, 0.05), tuning.max_thrust);
        assert_eq!(player.body.force, Vec2::ZERO);
        assert_eq!(player.angle, 1.0);
    }

    #[test]
    fn test_gun_rate_limit() {
        let tuning = Tuning::default();
        let mut player = Player::new(Vec2::ZERO, &tuning);
        let dt = 1.0 / 60.0;

        let mut shots = 0;
        // One simulated second of holding fire
        for _ in 0..60 {
            if player.update_gun(true, dt, &tuning).is_some() {
                shots += 1;
            }
        }
        assert!((4..=6).contains(&shots), "fired {shots} shots");
    }

    #[test]
    fn test_gun_muzzle() {
        let tuning = Tuning::default();
        let mut player = Player::new(Vec2::new(10.0, 10.0), &tuning);
        player.steer(Vec2::new(0.0, 1.0), tuning.max_thrust);
        let (pos, vel) = player.update_gun(true, 1.0 / 60.0, &tuning).unwrap();
        assert!((pos - Vec2::new(10.0, 30.0)).length() < 1e-3);
        assert!((vel.length() - PROJECTILE_SPEED).abs() < 1e-2);
        assert!(player.update_gun(false, 1.0 / 60.0, &tuning).is_none());
    }
}
