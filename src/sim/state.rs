//! Mission state and core simulation types
//!
//! Everything one mission attempt mutates per step lives in `GameState`.
//! The host only ever sees summaries derived from it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityId, Kind, Player, Tier};
use super::objective::{BaseHealth, ObjectiveTracker, Outcome};
use super::particles::ParticleEmitter;
use super::registry::EntityRegistry;
use super::spawn::SpawnScheduler;
use crate::error::EngineError;
use crate::mission::{MinigameKind, Mission};
use crate::settings::Settings;
use crate::tuning::{ModeTuning, Tuning};

/// Defended structure in tower-defense play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Base {
    pub pos: Vec2,
    pub radius: f32,
}

/// Notable things that happened during a step
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    WaveStarted(u32),
    /// An obstacle broke into two children of `tier`
    ObstacleSplit { tier: Tier, pos: Vec2 },
    ObjectiveCompleted { progress: u32, target: u32 },
    PlayerHit { pos: Vec2 },
    BaseBreached { health: i32 },
    Resolved(Outcome),
}

/// Complete state of one mission attempt (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct GameState {
    pub kind: MinigameKind,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG (spawning, splitting, mineral drops)
    pub rng: Pcg32,
    /// Simulation clock in seconds, advanced by dt every step
    pub clock: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Playfield size in pixels
    pub playfield: Vec2,
    pub registry: EntityRegistry,
    pub player_id: EntityId,
    pub base: Option<Base>,
    pub spawner: SpawnScheduler,
    pub emitter: ParticleEmitter,
    pub objective: ObjectiveTracker,
    /// Balance for this mission, already scaled for difficulty
    pub tuning: ModeTuning,
    /// Whether thrusting leaves exhaust particles
    pub thrust_trails: bool,
}

impl GameState {
    /// Build a fresh mission instance. The player (and base) start at the
    /// playfield center.
    pub fn new(
        mission: &Mission,
        tuning: &Tuning,
        settings: &Settings,
        size: Vec2,
        seed: u64,
    ) -> Result<Self, EngineError> {
        mission.validate()?;

        let kind = mission.minigame_type;
        let tuning = tuning.for_kind(kind).clone().scaled_for_difficulty(mission.difficulty);
        let playfield = size.max(Vec2::ONE);
        let center = playfield / 2.0;

        let mut registry = EntityRegistry::new();
        let vulnerable_at = if tuning.player.vulnerable {
            tuning.player.spawn_grace_secs as f64
        } else {
            f64::INFINITY
        };
        let player_id = registry.add(Entity::player(
            center,
            tuning.player.radius,
            -std::f32::consts::FRAC_PI_2,
            vulnerable_at,
        ));

        let base = tuning.base.as_ref().map(|b| Base {
            pos: center,
            radius: b.radius,
        });
        let base_health = tuning.base.as_ref().map(|b| BaseHealth {
            current: b.health,
            max: b.health,
            breach_damage: b.breach_damage,
        });

        log::info!(
            "Mission '{}' ({}) started: target {}, difficulty {}, seed {}",
            mission.name,
            kind.as_str(),
            mission.objectives,
            mission.difficulty,
            seed
        );

        Ok(Self {
            kind,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock: 0.0,
            time_ticks: 0,
            playfield,
            registry,
            player_id,
            base,
            spawner: SpawnScheduler::new(&tuning.spawn, &tuning.hostiles),
            emitter: ParticleEmitter::new(seed, settings.max_particles()),
            objective: ObjectiveTracker::new(mission.objectives, mission.reward, base_health),
            tuning,
            thrust_trails: settings.effective_thrust_trails(),
        })
    }

    pub fn player(&self) -> Option<&Entity> {
        self.registry.get(self.player_id)
    }

    pub fn player_state(&self) -> Option<&Player> {
        self.player().and_then(Entity::as_player)
    }

    /// Position of the player while it is alive
    pub fn live_player_pos(&self) -> Option<Vec2> {
        self.player()
            .filter(|e| e.as_player().is_some_and(|p| p.alive))
            .map(|e| e.pos)
    }

    pub fn base_pos(&self) -> Option<Vec2> {
        self.base.map(|b| b.pos)
    }

    pub fn outcome(&self) -> Outcome {
        self.objective.outcome()
    }

    pub fn is_terminal(&self) -> bool {
        self.objective.is_terminal()
    }

    /// Adapt to a new playfield size: recenter the player and base, bring
    /// obstacles back inside, drop projectiles left outside. Score and
    /// progress are untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        let playfield = Vec2::new(width, height).max(Vec2::ONE);
        self.playfield = playfield;
        let center = playfield / 2.0;

        if let Some(player) = self.registry.get_mut(self.player_id) {
            player.pos = center;
            player.vel = Vec2::ZERO;
        }
        if let Some(base) = &mut self.base {
            base.pos = center;
        }

        let boundary = self.tuning.boundary;
        self.registry.for_each_mut(Kind::Obstacle, |e| {
            let radius = e.radius;
            boundary.apply(&mut e.pos, &mut e.vel, radius, playfield);
        });

        let mut outside = Vec::new();
        self.registry.for_each(Kind::Projectile, |e| {
            if e.pos.x < 0.0 || e.pos.y < 0.0 || e.pos.x > playfield.x || e.pos.y > playfield.y {
                outside.push(e.id);
            }
        });
        for id in outside {
            self.registry.remove(id);
        }
        self.registry.flush();

        log::debug!("Playfield resized to {}x{}", width, height);
    }

    /// Place an entity directly (used by tests and scripted setups)
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        self.registry.add(entity)
    }
}
