//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision;
use super::gravity::GravityField;
use super::integrate;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MAX_SUBSTEPS;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Steering direction, magnitude <= 1 (zero when idle)
    pub direction: Vec2,
    /// Fire button held
    pub fire: bool,
}

/// Advance the game state by one fixed timestep.
///
/// Stage order: ship control, gravity, integration, contacts, registry
/// flush, boundary wrap, camera, waves, projectile expiry. Game over is
/// decided only after the whole frame has been applied.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;
    state.stats.elapsed += dt;

    // Ship control
    state.player.steer(input.direction, state.tuning.max_thrust);
    if let Some((pos, vel)) = state.player.update_gun(input.fire, dt, &state.tuning) {
        state.registry.spawn_projectile(pos, vel, state.tuning.projectile_ttl);
        state.stats.shots_fired += 1;
    }

    // Forces, then motion
    GravityField::from_tuning(&state.tuning).accumulate(&mut state.player, &mut state.registry);
    integrate::step(&mut state.player, &mut state.registry, dt);

    // Contacts
    collision::process(state);
    state.registry.flush();

    let limit = state.tuning.wrap_limit();
    integrate::wrap_bodies(&mut state.player, &mut state.registry, limit);

    state.camera.update(state.player.body.pos);

    state
        .waves
        .update(dt, &mut state.registry, &mut state.rng, &mut state.events);

    // Cleanup
    state.registry.expire_projectiles();
    state.registry.flush();

    if state.health == 0 {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score {} on wave {} after {:.1}s",
            state.score,
            state.wave(),
            state.stats.elapsed
        );
        state.events.push(GameEvent::GameOver {
            score: state.score,
            wave: state.wave(),
        });
    }
}

/// Fixed-timestep accumulator for drivers with variable frame times
#[derive(Debug, Clone)]
pub struct FrameClock {
    pub dt: f32,
    accumulator: f32,
}

impl FrameClock {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Run as many ticks as `elapsed` seconds allow, capped at
    /// [`MAX_SUBSTEPS`]. Returns the number of ticks run.
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, elapsed: f32) -> u32 {
        self.accumulator += elapsed.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < MAX_SUBSTEPS {
            tick(state, input, self.dt);
            self.accumulator -= self.dt;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = 0.0;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::AsteroidTier;
    use crate::sim::wave::WavePhase;

    /// Fresh session with the ship parked out of the way
    fn parked_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.player.body.pos = Vec2::new(0.0, -1000.0);
        state
    }

    #[test]
    fn test_first_wave_starts_automatically() {
        let mut state = parked_state(12345);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.wave(), 1);
        assert_eq!(state.registry.asteroid_count(), 1);
        assert!(state.events.contains(&GameEvent::WaveBanner { wave: 1 }));

        for _ in 0..150 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.waves.phase(), WavePhase::Active { wave: 1 });
        assert_eq!(state.registry.asteroid_count(), 5);
    }

    #[test]
    fn test_firing_spawns_projectile() {
        let mut state = parked_state(1);
        let input = TickInput {
            direction: Vec2::new(1.0, 0.0),
            fire: true,
        };
        tick(&mut state, &input, SIM_DT);

        assert_eq!(state.stats.shots_fired, 1);
        let shot = state.registry.projectiles().next().unwrap();
        assert!(shot.body.vel.x > 499.0);
        assert_eq!(shot.ttl, PROJECTILE_TTL);
    }

    #[test]
    fn test_projectiles_expire() {
        let mut state = parked_state(1);
        let fire = TickInput {
            direction: Vec2::new(0.0, -1.0),
            fire: true,
        };
        tick(&mut state, &fire, SIM_DT);
        let id = state.registry.projectiles().next().unwrap().id;

        // 3 seconds of flight, plus a frame
        for _ in 0..181 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.registry.projectile(id).is_none());
    }

    #[test]
    fn test_projectiles_ignore_gravity() {
        let mut state = parked_state(1);
        state.registry.spawn_projectile(Vec2::new(300.0, 300.0), Vec2::new(0.0, 500.0), 3.0);
        state.registry.flush();
        tick(&mut state, &TickInput::default(), SIM_DT);

        let shot = state.registry.projectiles().next().unwrap();
        assert_eq!(shot.body.vel, Vec2::new(0.0, 500.0));
    }

    #[test]
    fn test_shot_breaks_large_asteroid() {
        let mut state = parked_state(77);
        // Skip the scripted wave so only our asteroid is on the field
        state.waves = crate::sim::wave::WaveDirector::new(FRAME_WIDTH, 1000.0);
        state.player.body.pos = Vec2::new(300.0, 400.0);
        let target = state
            .registry
            .spawn_asteroid(AsteroidTier::Large, Vec2::new(300.0, 480.0), Vec2::ZERO);
        state.registry.flush();

        // Aim straight up (+y) and fire
        let fire = TickInput {
            direction: Vec2::new(0.0, 1.0),
            fire: true,
        };
        let score_before = state.score;
        tick(&mut state, &fire, SIM_DT);
        let mut destroyed = false;
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if !state.registry.is_alive(target) {
                destroyed = true;
                break;
            }
        }
        assert!(destroyed);

        let parent_pos = state
            .events
            .iter()
            .find_map(|e| match e {
                GameEvent::Explosion { pos, .. } => Some(*pos),
                _ => None,
            })
            .unwrap();
        assert_eq!(state.score - score_before, 20);

        let mediums: Vec<_> = state
            .registry
            .asteroids()
            .filter(|a| a.tier == AsteroidTier::Medium)
            .collect();
        assert!((2..=3).contains(&mediums.len()));
        for child in mediums {
            // One frame of motion at most since the split
            assert!(child.body.pos.distance(parent_pos) < 40.0 + 10.0);
            assert!(child.body.speed() >= FRAGMENT_IMPULSE * 0.9);
        }
    }

    #[test]
    fn test_planet_damage_only_when_depleted() {
        for (shield, expected) in [(SHIELD_MIN_RADIUS, 2u8), (SHIELD_MAX_RADIUS, 3u8)] {
            let mut state = parked_state(3);
            state.waves = crate::sim::wave::WaveDirector::new(FRAME_WIDTH, 1000.0);
            state.shield.set_radius(shield);
            state
                .registry
                .spawn_asteroid(AsteroidTier::Small, Vec2::new(0.0, 62.0), Vec2::new(0.0, -200.0));
            state.registry.flush();

            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_eq!(state.health, expected, "shield radius {shield}");
        }
    }

    #[test]
    fn test_game_over_halts_loop() {
        let mut state = parked_state(8);
        state.health = 1;
        state.shield.set_radius(SHIELD_MIN_RADIUS);
        state
            .registry
            .spawn_asteroid(AsteroidTier::Small, Vec2::new(55.0, 0.0), Vec2::new(-100.0, 0.0));
        state.registry.flush();

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.is_game_over());
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );

        let ticks = state.time_ticks;
        let player_pos = state.player.body.pos;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.player.body.pos, player_pos);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut state = GameState::new(2024);
        let mut last = 0;
        for i in 0..1200 {
            let input = TickInput {
                direction: crate::polar_to_cartesian(1.0, i as f32 * 0.05),
                fire: true,
            };
            tick(&mut state, &input, SIM_DT);
            assert!(state.score >= last);
            assert!(state.shield.radius() >= SHIELD_MIN_RADIUS);
            assert!(state.shield.radius() <= SHIELD_MAX_RADIUS);
            last = state.score;
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                direction: Vec2::new(0.5, 0.0),
                fire: false,
            },
            TickInput {
                direction: Vec2::new(0.0, 1.0),
                fire: true,
            },
            TickInput::default(),
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.registry.asteroid_count(), state2.registry.asteroid_count());
        assert_eq!(state1.player.body.pos, state2.player.body.pos);
        assert_eq!(state1.events, state2.events);
    }

    #[test]
    fn test_frame_clock_substeps() {
        let mut state = parked_state(5);
        let mut clock = FrameClock::new(SIM_DT);

        assert_eq!(clock.advance(&mut state, &TickInput::default(), SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(&mut state, &TickInput::default(), SIM_DT * 0.6), 1);
        // Long stall is capped
        let ran = clock.advance(&mut state, &TickInput::default(), 5.0);
        assert_eq!(ran, MAX_SUBSTEPS.min(6));
        assert_eq!(state.time_ticks, 1 + ran as u64);
    }
}
