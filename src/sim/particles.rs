//! Cosmetic particle effects
//!
//! Particles live in the entity registry like everything else but never take
//! part in collisions. The emitter owns its own RNG stream so changing the
//! particle budget can never shift gameplay randomness.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::entity::{Entity, EntityKind, Kind, Particle};
use super::registry::EntityRegistry;

/// Stream offset so the emitter never mirrors the gameplay RNG
const FX_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Velocity damping applied to particles every update
const PARTICLE_DRAG: f32 = 0.96;

/// Randomization ranges for one emission
#[derive(Debug, Clone, Copy)]
pub struct EmitParams {
    pub speed: (f32, f32),
    pub lifespan: (f32, f32),
    pub radius: (f32, f32),
    /// Center direction; `None` scatters over the full circle
    pub emission_angle: Option<f32>,
    /// Total width of the directional cone (radians)
    pub angle_spread: f32,
}

impl EmitParams {
    /// Exhaust puffs streaming out behind the ship
    pub fn thrust_trail(heading: f32) -> Self {
        Self {
            speed: (60.0, 140.0),
            lifespan: (0.15, 0.35),
            radius: (1.0, 2.5),
            emission_angle: Some(heading + std::f32::consts::PI),
            angle_spread: 0.6,
        }
    }

    /// Debris from a destroyed obstacle
    pub fn explosion() -> Self {
        Self {
            speed: (40.0, 180.0),
            lifespan: (0.3, 0.8),
            radius: (1.0, 3.0),
            emission_angle: None,
            angle_spread: TAU,
        }
    }

    /// Large burst when the player is struck
    pub fn player_hit() -> Self {
        Self {
            speed: (60.0, 260.0),
            lifespan: (0.6, 1.4),
            radius: (1.5, 4.0),
            emission_angle: None,
            angle_spread: TAU,
        }
    }
}

/// Uniform sample from an inclusive `(lo, hi)` pair; tolerant of `lo == hi`
pub fn sample(rng: &mut Pcg32, (lo, hi): (f32, f32)) -> f32 {
    lo + (hi - lo) * rng.random::<f32>()
}

#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    rng: Pcg32,
    max_particles: usize,
}

impl ParticleEmitter {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ FX_STREAM),
            max_particles,
        }
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    /// Spawn up to `count` particles at `origin`. Returns how many were created.
    pub fn emit(
        &mut self,
        registry: &mut EntityRegistry,
        count: usize,
        origin: Vec2,
        color: [f32; 4],
        params: &EmitParams,
    ) -> usize {
        let live = registry.count(Kind::Particle);
        let count = count.min(self.max_particles.saturating_sub(live));

        for _ in 0..count {
            let angle = match params.emission_angle {
                Some(center) => {
                    center - params.angle_spread / 2.0 + params.angle_spread * self.rng.random::<f32>()
                }
                None => TAU * self.rng.random::<f32>(),
            };
            let speed = sample(&mut self.rng, params.speed);
            let lifespan = sample(&mut self.rng, params.lifespan).max(0.05);
            let radius = sample(&mut self.rng, params.radius);

            registry.add(Entity::new(
                origin,
                Vec2::from_angle(angle) * speed,
                radius,
                EntityKind::Particle(Particle {
                    color,
                    lifespan,
                    remaining: lifespan,
                }),
            ));
        }
        count
    }

    /// Move and age every particle, marking expired ones for removal.
    /// Returns how many were retired.
    pub fn update(&mut self, registry: &mut EntityRegistry, dt: f32) -> usize {
        let mut retired = Vec::new();
        registry.for_each_mut(Kind::Particle, |e| {
            e.pos += e.vel * dt;
            e.vel *= PARTICLE_DRAG;
            if let EntityKind::Particle(p) = &mut e.kind {
                if p.age(dt) {
                    retired.push(e.id);
                }
            }
        });
        for id in &retired {
            registry.remove(*id);
        }
        retired.len()
    }
}
