//! Fixed timestep simulation tick
//!
//! Advances one mission attempt deterministically. Step order is fixed:
//! input, physics, spawning, collisions, particles, objective evaluation.

use glam::Vec2;

use super::collision::{self, CollisionEvent};
use super::entity::{Entity, EntityKind, Projectile, Tier};
use super::objective::{RewardSink, roll_minerals};
use super::particles::EmitParams;
use super::physics;
use super::spawn::{SpawnArea, split_children};
use super::state::{GameEvent, GameState};
use crate::consts::INTENT_DEADZONE;
use crate::tuning::HostileTuning;

const EXHAUST_COLOR: [f32; 4] = [1.0, 0.65, 0.2, 1.0];
const DEBRIS_COLOR: [f32; 4] = [0.75, 0.7, 0.65, 1.0];
const PLAYER_HIT_COLOR: [f32; 4] = [1.0, 0.3, 0.2, 1.0];
const BREACH_COLOR: [f32; 4] = [0.4, 0.8, 1.0, 1.0];

/// Directional intent: where the player wants to go and how hard
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Radians, screen space (y down)
    pub angle: f32,
    /// 0..=1
    pub intensity: f32,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub intent: Intent,
    /// Fire held (rate-limited by the projectile cooldown)
    pub fire: bool,
}

/// Advance the mission by one fixed timestep.
///
/// Returns what happened this step. Once the outcome is terminal only
/// particles keep moving.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, rewards: &mut dyn RewardSink) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.clock += dt as f64;
    state.time_ticks += 1;

    if state.is_terminal() {
        state.emitter.update(&mut state.registry, dt);
        state.registry.flush();
        return events;
    }

    apply_input(state, input);

    let base_pos = state.base_pos();
    physics::integrate(
        &mut state.registry,
        &state.tuning,
        state.playfield,
        base_pos,
        state.clock,
        dt,
    );

    let area = SpawnArea {
        size: state.playfield,
        player_pos: state.live_player_pos(),
        base_pos: state.base_pos(),
    };
    let report = state
        .spawner
        .update(state.clock, &mut state.registry, &mut state.rng, area);
    if let Some(wave) = report.wave_started {
        events.push(GameEvent::WaveStarted(wave));
    }

    resolve_collisions(state, &mut events);

    state.emitter.update(&mut state.registry, dt);
    state.registry.flush();

    if let Some(outcome) = state.objective.evaluate(rewards) {
        events.push(GameEvent::Resolved(outcome));
    }

    events
}

/// Copy the input snapshot onto the player, handle spawn grace and firing
fn apply_input(state: &mut GameState, input: &TickInput) {
    let clock = state.clock;
    let cooldown = state.tuning.projectile.cooldown_secs as f64;

    let Some(entity) = state.registry.get_mut(state.player_id) else {
        return;
    };
    let (pos, radius) = (entity.pos, entity.radius);
    let Some(player) = entity.as_player_mut() else {
        return;
    };
    if !player.alive {
        return;
    }

    player.intent = input.intent;
    player.firing = input.fire;
    if !player.vulnerable && clock >= player.vulnerable_at {
        player.vulnerable = true;
        log::debug!("Spawn grace over at t={:.2}", clock);
    }

    let heading = player.heading;
    let can_fire = player.last_fire.is_none_or(|t| clock - t >= cooldown);
    let fire = input.fire && can_fire;
    if fire {
        player.last_fire = Some(clock);
    }

    let dir = Vec2::from_angle(heading);
    if fire {
        let shot = &state.tuning.projectile;
        state.registry.add(Entity::new(
            pos + dir * (radius + shot.radius),
            dir * shot.speed,
            shot.radius,
            EntityKind::Projectile(Projectile {
                length: shot.length,
                born_at: clock,
                ttl: shot.ttl_secs,
            }),
        ));
    }

    if state.thrust_trails && input.intent.intensity > INTENT_DEADZONE {
        state.emitter.emit(
            &mut state.registry,
            2,
            pos - dir * radius,
            EXHAUST_COLOR,
            &EmitParams::thrust_trail(heading),
        );
    }
}

/// Score for destroying an obstacle of `tier`
fn points_for(hostiles: &HostileTuning, tier: Tier) -> u64 {
    match hostiles {
        HostileTuning::Tiered { scores, .. } => scores[tier.index()],
        HostileTuning::Seekers { score, .. } => *score,
    }
}

fn debris_count(radius: f32) -> usize {
    ((radius / 2.0) as usize).clamp(6, 24)
}

fn resolve_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    // Children are added after detection so they cannot be hit this step
    for hit in collision::detect_projectile_hits(&mut state.registry) {
        let CollisionEvent::ProjectileHit {
            tier, pos, vel, radius, ..
        } = hit
        else {
            continue;
        };
        let points = points_for(&state.tuning.hostiles, tier);
        let splits = matches!(state.tuning.hostiles, HostileTuning::Tiered { .. });

        match tier.next_smaller().filter(|_| splits) {
            Some(child_tier) => {
                for child in split_children(&state.tuning.hostiles, child_tier, pos, vel, &mut state.rng) {
                    state.registry.add(child);
                }
                state.objective.add_score(points);
                events.push(GameEvent::ObstacleSplit { tier: child_tier, pos });
                log::debug!("{:?} obstacle split at ({:.0}, {:.0})", tier, pos.x, pos.y);
            }
            None => {
                let drops = roll_minerals(&mut state.rng, &state.tuning.mineral_odds);
                state.objective.record_objective(points, &drops);
                events.push(GameEvent::ObjectiveCompleted {
                    progress: state.objective.progress(),
                    target: state.objective.target(),
                });
            }
        }

        state.emitter.emit(
            &mut state.registry,
            debris_count(radius),
            pos,
            DEBRIS_COLOR,
            &EmitParams::explosion(),
        );
    }

    if let Some(CollisionEvent::PlayerHit { pos, .. }) =
        collision::detect_player_hit(&state.registry, state.player_id)
    {
        if let Some(entity) = state.registry.get_mut(state.player_id) {
            entity.vel = Vec2::ZERO;
            if let Some(player) = entity.as_player_mut() {
                player.hit = true;
                player.alive = false;
                player.firing = false;
            }
        }
        state
            .emitter
            .emit(&mut state.registry, 48, pos, PLAYER_HIT_COLOR, &EmitParams::player_hit());
        state.objective.record_player_eliminated();
        events.push(GameEvent::PlayerHit { pos });
        log::info!("Player hit at t={:.2}", state.clock);
    }

    if let Some(base) = state.base {
        for breach in collision::detect_base_breaches(&mut state.registry, base.pos, base.radius) {
            let CollisionEvent::BaseBreach { pos, .. } = breach else {
                continue;
            };
            if let Some(health) = state.objective.record_breach() {
                events.push(GameEvent::BaseBreached { health });
                log::debug!("Base breached, health {}", health);
            }
            state
                .emitter
                .emit(&mut state.registry, 16, pos, BREACH_COLOR, &EmitParams::explosion());
        }
    }
}
