//! Motion integration and playfield boundaries

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Behavior, Entity, EntityKind, Kind};
use super::registry::EntityRegistry;
use crate::consts::INTENT_DEADZONE;
use crate::normalize_angle;
use crate::tuning::ModeTuning;

/// What happens when an entity reaches the playfield edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Exit one side, re-enter on the opposite side (free-floating space)
    Wrap,
    /// Stay inside the playfield (ground-bound)
    Clamp,
}

impl Boundary {
    /// Bring an entity back inside a `size` playfield
    pub fn apply(self, pos: &mut Vec2, vel: &mut Vec2, radius: f32, size: Vec2) {
        match self {
            Boundary::Wrap => {
                if size.x > 0.0 {
                    pos.x = pos.x.rem_euclid(size.x);
                }
                if size.y > 0.0 {
                    pos.y = pos.y.rem_euclid(size.y);
                }
            }
            Boundary::Clamp => {
                clamp_axis(&mut pos.x, &mut vel.x, radius, size.x);
                clamp_axis(&mut pos.y, &mut vel.y, radius, size.y);
            }
        }
    }
}

fn clamp_axis(pos: &mut f32, vel: &mut f32, radius: f32, extent: f32) {
    let lo = radius;
    let hi = extent - radius;
    if hi < lo {
        // Playfield narrower than the entity: pin to the middle
        *pos = extent / 2.0;
        *vel = 0.0;
        return;
    }
    if *pos < lo {
        *pos = lo;
        *vel = vel.max(0.0);
    } else if *pos > hi {
        *pos = hi;
        *vel = vel.min(0.0);
    }
}

/// How the player's heading follows the directional intent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingPolicy {
    /// Heading jumps to the intent angle
    Snap,
    /// Heading turns toward the intent angle at `rate` radians per second
    Turn { rate: f32 },
}

/// Rotate `current` toward `target` by at most `max_delta`, taking the short way round
pub fn turn_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = normalize_angle(normalize_angle(target) - normalize_angle(current));
    let clamped = delta.clamp(-max_delta, max_delta);
    normalize_angle(current + clamped)
}

/// Apply intent thrust, friction and integration to the player entity
pub fn step_player(entity: &mut Entity, tuning: &ModeTuning, dt: f32) {
    let EntityKind::Player(player) = &mut entity.kind else {
        return;
    };
    if !player.alive {
        return;
    }

    let intent = player.intent;
    if intent.intensity > INTENT_DEADZONE {
        player.heading = match tuning.heading {
            HeadingPolicy::Snap => normalize_angle(intent.angle),
            HeadingPolicy::Turn { rate } => turn_toward(player.heading, intent.angle, rate * dt),
        };
        let intensity = intent.intensity.min(1.0);
        entity.vel += Vec2::from_angle(player.heading) * tuning.player.thrust * intensity * dt;
    }

    entity.vel *= tuning.player.friction;
    if entity.vel.length() > tuning.player.max_speed {
        entity.vel = entity.vel.normalize_or_zero() * tuning.player.max_speed;
    }
    entity.pos += entity.vel * dt;
}

/// Steer, spin and move an obstacle
pub fn step_obstacle(entity: &mut Entity, player_pos: Option<Vec2>, base_pos: Option<Vec2>, dt: f32) {
    let EntityKind::Obstacle(obstacle) = &mut entity.kind else {
        return;
    };

    let seek = match obstacle.behavior {
        Behavior::Drift => None,
        Behavior::SeekPlayer { speed } => player_pos.map(|t| (t, speed)),
        Behavior::SeekBase { speed } => base_pos.or(player_pos).map(|t| (t, speed)),
    };
    if let Some((target, speed)) = seek {
        entity.vel = (target - entity.pos).normalize_or_zero() * speed;
    }

    obstacle.rotation = normalize_angle(obstacle.rotation + obstacle.rotation_speed * dt);
    entity.pos += entity.vel * dt;
}

/// Advance every movable entity by one step.
///
/// Projectiles that expire or leave the playfield are marked for removal;
/// particles are left to the emitter.
pub fn integrate(
    registry: &mut EntityRegistry,
    tuning: &ModeTuning,
    size: Vec2,
    base_pos: Option<Vec2>,
    now: f64,
    dt: f32,
) {
    let boundary = tuning.boundary;

    let mut player_pos = None;
    registry.for_each_mut(Kind::Player, |e| {
        step_player(e, tuning, dt);
        let radius = e.radius;
        boundary.apply(&mut e.pos, &mut e.vel, radius, size);
        if e.as_player().is_some_and(|p| p.alive) {
            player_pos = Some(e.pos);
        }
    });

    registry.for_each_mut(Kind::Obstacle, |e| {
        step_obstacle(e, player_pos, base_pos, dt);
        let radius = e.radius;
        boundary.apply(&mut e.pos, &mut e.vel, radius, size);
    });

    let mut dead = Vec::new();
    registry.for_each_mut(Kind::Projectile, |e| {
        e.pos += e.vel * dt;
        let EntityKind::Projectile(p) = &e.kind else {
            return;
        };
        let out_of_bounds = e.pos.x < 0.0 || e.pos.y < 0.0 || e.pos.x > size.x || e.pos.y > size.y;
        if p.expired(now) || out_of_bounds {
            dead.push(e.id);
        }
    });
    for id in dead {
        registry.remove(id);
    }
}
