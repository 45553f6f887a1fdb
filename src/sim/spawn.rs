//! Hostile spawning: timer cadence, waves, and tier splitting
//!
//! All randomness comes from the gameplay RNG passed in by the tick, so a run
//! seed reproduces the full spawn sequence.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::{FRAC_PI_4, TAU};

use super::entity::{Behavior, Entity, EntityId, EntityKind, Kind, Obstacle, Tier};
use super::particles::sample;
use super::registry::EntityRegistry;
use crate::tuning::{HostileTuning, SeekTarget, SpawnPolicy};

/// Cadence bookkeeping for the configured spawn policy
#[derive(Debug, Clone)]
enum Cadence {
    Timer {
        initial_count: u32,
        interval: f32,
        min_interval: f32,
        ramp: f32,
        max_alive: usize,
        next_at: f64,
    },
    Waves {
        per_wave: u32,
        spawn_gap: f32,
        wave_delay: f32,
        /// Current wave number (0 before the first wave)
        wave: u32,
        /// Enemies of the current wave not yet spawned
        to_spawn: u32,
        next_at: f64,
        /// When a cleared wave's breather ends
        breather_until: Option<f64>,
    },
}

/// What a scheduler update did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnReport {
    pub spawned: Vec<EntityId>,
    pub wave_started: Option<u32>,
}

/// Where spawns may go this step
#[derive(Debug, Clone, Copy)]
pub struct SpawnArea {
    pub size: Vec2,
    pub player_pos: Option<Vec2>,
    pub base_pos: Option<Vec2>,
}

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    cadence: Cadence,
    hostiles: HostileTuning,
    safe_distance: f32,
    started: bool,
}

impl SpawnScheduler {
    pub fn new(policy: &SpawnPolicy, hostiles: &HostileTuning) -> Self {
        let (cadence, safe_distance) = match *policy {
            SpawnPolicy::Timer {
                initial_count,
                initial_interval_secs,
                min_interval_secs,
                ramp,
                safe_distance,
                max_alive,
            } => (
                Cadence::Timer {
                    initial_count,
                    interval: initial_interval_secs,
                    min_interval: min_interval_secs,
                    ramp,
                    max_alive,
                    next_at: initial_interval_secs as f64,
                },
                safe_distance,
            ),
            SpawnPolicy::Waves {
                per_wave,
                spawn_gap_secs,
                wave_delay_secs,
                safe_distance,
            } => (
                Cadence::Waves {
                    per_wave,
                    spawn_gap: spawn_gap_secs,
                    wave_delay: wave_delay_secs,
                    wave: 0,
                    to_spawn: 0,
                    next_at: 0.0,
                    breather_until: None,
                },
                safe_distance,
            ),
        };

        Self {
            cadence,
            hostiles: hostiles.clone(),
            safe_distance,
            started: false,
        }
    }

    /// Current wave number (0 for timer policies and before the first wave)
    pub fn wave(&self) -> u32 {
        match self.cadence {
            Cadence::Waves { wave, .. } => wave,
            Cadence::Timer { .. } => 0,
        }
    }

    /// Current timer interval in seconds (None for wave policies)
    pub fn interval(&self) -> Option<f32> {
        match self.cadence {
            Cadence::Timer { interval, .. } => Some(interval),
            Cadence::Waves { .. } => None,
        }
    }

    /// Run the cadence for simulation time `now`
    pub fn update(
        &mut self,
        now: f64,
        registry: &mut EntityRegistry,
        rng: &mut Pcg32,
        area: SpawnArea,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();
        let alive = registry.count(Kind::Obstacle);

        let first_update = !self.started;
        self.started = true;

        match &mut self.cadence {
            Cadence::Timer {
                initial_count,
                interval,
                min_interval,
                ramp,
                max_alive,
                next_at,
            } => {
                let mut wanted = 0;
                if first_update {
                    wanted += *initial_count as usize;
                }
                if now >= *next_at {
                    if alive + wanted < *max_alive {
                        wanted += 1;
                        *interval = (*interval * *ramp).max(*min_interval);
                    }
                    *next_at = now + *interval as f64;
                }
                let wanted = wanted.min(max_alive.saturating_sub(alive));
                for _ in 0..wanted {
                    let entity = spawn_hostile(&self.hostiles, self.safe_distance, rng, area);
                    report.spawned.push(registry.add(entity));
                }
            }
            Cadence::Waves {
                per_wave,
                spawn_gap,
                wave_delay,
                wave,
                to_spawn,
                next_at,
                breather_until,
            } => {
                if *to_spawn > 0 {
                    if now >= *next_at {
                        let entity = spawn_hostile(&self.hostiles, self.safe_distance, rng, area);
                        report.spawned.push(registry.add(entity));
                        *to_spawn -= 1;
                        *next_at = now + *spawn_gap as f64;
                    }
                } else if alive == 0 {
                    // Wave fully spawned and fully resolved
                    let ready = if *wave == 0 {
                        true
                    } else if let Some(until) = *breather_until {
                        now >= until
                    } else {
                        *breather_until = Some(now + *wave_delay as f64);
                        false
                    };
                    if ready {
                        *wave += 1;
                        *to_spawn = *wave * *per_wave;
                        *next_at = now;
                        *breather_until = None;
                        report.wave_started = Some(*wave);
                        log::info!("Wave {} started: {} enemies", wave, to_spawn);
                    }
                }
            }
        }

        if !report.spawned.is_empty() {
            log::debug!("Spawned {} hostiles at t={:.2}", report.spawned.len(), now);
        }
        report
    }
}

/// Random point on the playfield border
fn edge_point(rng: &mut Pcg32, size: Vec2) -> Vec2 {
    let t = rng.random::<f32>();
    match rng.random_range(0..4u8) {
        0 => Vec2::new(t * size.x, 0.0),
        1 => Vec2::new(size.x, t * size.y),
        2 => Vec2::new(t * size.x, size.y),
        _ => Vec2::new(0.0, t * size.y),
    }
}

/// Edge samples tried before falling back to the farthest corner
const SAFE_SPAWN_ATTEMPTS: usize = 8;

/// Mirror a spawn point through the playfield center when that moves it
/// farther from the player
pub fn adjust_away_from(point: Vec2, player: Option<Vec2>, size: Vec2, safe_distance: f32) -> Vec2 {
    let Some(player) = player else {
        return point;
    };
    if point.distance(player) >= safe_distance {
        return point;
    }
    let mirrored = size - point;
    if mirrored.distance(player) > point.distance(player) {
        mirrored
    } else {
        point
    }
}

/// Playfield corner farthest from `player`
fn farthest_corner(player: Vec2, size: Vec2) -> Vec2 {
    let x = if player.x * 2.0 < size.x { size.x } else { 0.0 };
    let y = if player.y * 2.0 < size.y { size.y } else { 0.0 };
    Vec2::new(x, y)
}

/// Edge point at least `safe_distance` from the player.
///
/// Samples a few edge points (each mirrored when that helps) and keeps the
/// farthest. If none is safe the farthest corner is used, which is as far
/// as any point of the playfield can be.
pub fn safe_edge_point(rng: &mut Pcg32, size: Vec2, player: Option<Vec2>, safe_distance: f32) -> Vec2 {
    let Some(player_pos) = player else {
        return edge_point(rng, size);
    };

    let mut best = None::<(Vec2, f32)>;
    for _ in 0..SAFE_SPAWN_ATTEMPTS {
        let point = adjust_away_from(edge_point(rng, size), player, size, safe_distance);
        let distance = point.distance(player_pos);
        if distance >= safe_distance {
            return point;
        }
        if best.is_none_or(|(_, d)| distance > d) {
            best = Some((point, distance));
        }
    }

    let corner = farthest_corner(player_pos, size);
    match best {
        Some((point, distance)) if distance >= corner.distance(player_pos) => point,
        _ => corner,
    }
}

fn jittered_radius(rng: &mut Pcg32, base: f32, jitter: f32) -> f32 {
    base * (1.0 + jitter * (2.0 * rng.random::<f32>() - 1.0))
}

/// Create one new hostile at the playfield edge
fn spawn_hostile(hostiles: &HostileTuning, safe_distance: f32, rng: &mut Pcg32, area: SpawnArea) -> Entity {
    let pos = safe_edge_point(rng, area.size, area.player_pos, safe_distance);

    match *hostiles {
        HostileTuning::Tiered {
            radii,
            radius_jitter,
            speed,
            spin,
            sides,
            ..
        } => {
            // Head roughly toward the middle so rocks cross the field
            let inward = (area.size / 2.0 - pos).to_angle();
            let angle = inward + FRAC_PI_4 * (2.0 * rng.random::<f32>() - 1.0);
            let vel = Vec2::from_angle(angle) * sample(rng, speed);
            let radius = jittered_radius(rng, radii[Tier::Large.index()], radius_jitter);
            Entity::new(
                pos,
                vel,
                radius,
                EntityKind::Obstacle(Obstacle {
                    tier: Tier::Large,
                    rotation: TAU * rng.random::<f32>(),
                    rotation_speed: sample(rng, spin),
                    sides: rng.random_range(sides.0..=sides.1.max(sides.0)),
                    alive: true,
                    behavior: Behavior::Drift,
                }),
            )
        }
        HostileTuning::Seekers {
            radius,
            speed,
            spin,
            sides,
            target,
            ..
        } => {
            let speed = sample(rng, speed);
            let (behavior, aim) = match target {
                SeekTarget::Player => (Behavior::SeekPlayer { speed }, area.player_pos),
                SeekTarget::Base => (Behavior::SeekBase { speed }, area.base_pos.or(area.player_pos)),
            };
            let vel = aim
                .map(|t| (t - pos).normalize_or_zero() * speed)
                .unwrap_or(Vec2::ZERO);
            Entity::new(
                pos,
                vel,
                radius,
                EntityKind::Obstacle(Obstacle {
                    tier: Tier::Small,
                    rotation: TAU * rng.random::<f32>(),
                    rotation_speed: sample(rng, spin),
                    sides,
                    alive: true,
                    behavior,
                }),
            )
        }
    }
}

/// The two children a destroyed obstacle breaks into
pub fn split_children(
    hostiles: &HostileTuning,
    child_tier: Tier,
    parent_pos: Vec2,
    parent_vel: Vec2,
    rng: &mut Pcg32,
) -> [Entity; 2] {
    let (radius, speed, spin, sides, offset, boost) = match *hostiles {
        HostileTuning::Tiered {
            radii,
            radius_jitter,
            speed,
            spin,
            sides,
            split_offset,
            split_speed_boost,
            ..
        } => (
            jittered_radius(rng, radii[child_tier.index()], radius_jitter),
            speed,
            spin,
            sides,
            split_offset,
            split_speed_boost,
        ),
        // Seekers never split; keep the shape sensible if misconfigured
        HostileTuning::Seekers {
            radius,
            speed,
            spin,
            sides,
            ..
        } => (radius, speed, spin, (sides, sides), radius / 2.0, 1.0),
    };

    let base_angle = TAU * rng.random::<f32>();
    let mut make = |angle: f32| {
        let dir = Vec2::from_angle(angle);
        let vel = dir * sample(rng, speed) * boost + parent_vel * 0.2;
        Entity::new(
            parent_pos + dir * offset,
            vel,
            radius,
            EntityKind::Obstacle(Obstacle {
                tier: child_tier,
                rotation: TAU * rng.random::<f32>(),
                rotation_speed: sample(rng, spin),
                sides: rng.random_range(sides.0..=sides.1.max(sides.0)),
                alive: true,
                behavior: Behavior::Drift,
            }),
        )
    };
    let first = make(base_angle);
    let second = make(base_angle + std::f32::consts::PI);
    [first, second]
}
