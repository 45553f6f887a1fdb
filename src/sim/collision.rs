//! Circle-circle collision detection
//!
//! Every gameplay body is a circle, so one test covers everything:
//! two bodies touch iff the distance between centers is less than the sum
//! of their radii. Detection marks the colliding entities for removal and
//! reports what happened; consequences (splitting, scoring, particles) are
//! applied by the tick.

use glam::Vec2;

use super::entity::{Behavior, EntityId, Kind, Tier};
use super::registry::EntityRegistry;

/// Whether two circles overlap. Symmetric in its arguments.
#[inline]
pub fn circles_collide(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) < reach * reach
}

/// Outcome of a detected collision
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionEvent {
    /// A projectile destroyed an obstacle
    ProjectileHit {
        projectile: EntityId,
        obstacle: EntityId,
        tier: Tier,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
    },
    /// An obstacle struck the vulnerable player
    PlayerHit { obstacle: EntityId, pos: Vec2 },
    /// A base-seeking enemy reached the base
    BaseBreach { obstacle: EntityId, pos: Vec2 },
}

#[derive(Debug, Clone, Copy)]
struct Body {
    id: EntityId,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
}

/// Resolve projectiles against obstacles.
///
/// A projectile resolves at most one obstacle per step: the inner loop stops
/// at the first hit, and an obstacle destroyed earlier in the same step cannot
/// be hit again. Both bodies are marked for removal.
pub fn detect_projectile_hits(registry: &mut EntityRegistry) -> Vec<CollisionEvent> {
    let projectiles: Vec<Body> = registry
        .iter(Kind::Projectile)
        .map(|e| Body {
            id: e.id,
            pos: e.pos,
            vel: e.vel,
            radius: e.radius,
        })
        .collect();
    let obstacles: Vec<(Body, Tier)> = registry
        .iter(Kind::Obstacle)
        .filter_map(|e| {
            let o = e.as_obstacle()?;
            o.alive.then_some((
                Body {
                    id: e.id,
                    pos: e.pos,
                    vel: e.vel,
                    radius: e.radius,
                },
                o.tier,
            ))
        })
        .collect();

    let mut consumed = vec![false; obstacles.len()];
    let mut events = Vec::new();

    for shot in &projectiles {
        for (i, (rock, tier)) in obstacles.iter().enumerate() {
            if consumed[i] {
                continue;
            }
            if circles_collide(shot.pos, shot.radius, rock.pos, rock.radius) {
                consumed[i] = true;
                events.push(CollisionEvent::ProjectileHit {
                    projectile: shot.id,
                    obstacle: rock.id,
                    tier: *tier,
                    pos: rock.pos,
                    vel: rock.vel,
                    radius: rock.radius,
                });
                break;
            }
        }
    }

    for event in &events {
        if let CollisionEvent::ProjectileHit {
            projectile,
            obstacle,
            ..
        } = event
        {
            registry.remove(*projectile);
            registry.remove(*obstacle);
        }
    }

    events
}

/// Test the player against obstacles. Only a live, vulnerable, not-yet-hit
/// player can be struck; the first overlapping obstacle wins.
pub fn detect_player_hit(registry: &EntityRegistry, player_id: EntityId) -> Option<CollisionEvent> {
    let player = registry.get(player_id)?;
    let state = player.as_player()?;
    if !state.alive || !state.vulnerable || state.hit {
        return None;
    }

    registry
        .iter(Kind::Obstacle)
        .find(|e| {
            e.as_obstacle().is_some_and(|o| o.alive)
                && circles_collide(player.pos, player.radius, e.pos, e.radius)
        })
        .map(|e| CollisionEvent::PlayerHit {
            obstacle: e.id,
            pos: player.pos,
        })
}

/// Base-seeking enemies that reached the base. They are marked for removal.
pub fn detect_base_breaches(
    registry: &mut EntityRegistry,
    base_pos: Vec2,
    base_radius: f32,
) -> Vec<CollisionEvent> {
    let events: Vec<CollisionEvent> = registry
        .iter(Kind::Obstacle)
        .filter(|e| {
            e.as_obstacle()
                .is_some_and(|o| o.alive && matches!(o.behavior, Behavior::SeekBase { .. }))
                && circles_collide(base_pos, base_radius, e.pos, e.radius)
        })
        .map(|e| CollisionEvent::BaseBreach {
            obstacle: e.id,
            pos: e.pos,
        })
        .collect();

    for event in &events {
        if let CollisionEvent::BaseBreach { obstacle, .. } = event {
            registry.remove(*obstacle);
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Entity, EntityKind, Obstacle, Projectile};
    use proptest::prelude::*;

    fn rock(pos: Vec2, radius: f32, tier: Tier) -> Entity {
        Entity::new(
            pos,
            Vec2::ZERO,
            radius,
            EntityKind::Obstacle(Obstacle {
                tier,
                rotation: 0.0,
                rotation_speed: 0.0,
                sides: 7,
                alive: true,
                behavior: Behavior::Drift,
            }),
        )
    }

    fn shot(pos: Vec2) -> Entity {
        Entity::new(
            pos,
            Vec2::new(100.0, 0.0),
            2.0,
            EntityKind::Projectile(Projectile {
                length: 6.0,
                born_at: 0.0,
                ttl: 1.0,
            }),
        )
    }

    #[test]
    fn test_touching_is_not_colliding() {
        assert!(!circles_collide(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(circles_collide(Vec2::ZERO, 5.0, Vec2::new(9.9, 0.0), 5.0));
    }

    #[test]
    fn test_projectile_hits_single_obstacle() {
        let mut reg = EntityRegistry::new();
        // Two overlapping rocks under one projectile
        let a = reg.add(rock(Vec2::new(50.0, 50.0), 20.0, Tier::Small));
        let b = reg.add(rock(Vec2::new(55.0, 50.0), 20.0, Tier::Small));
        let s = reg.add(shot(Vec2::new(52.0, 50.0)));

        let events = detect_projectile_hits(&mut reg);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            CollisionEvent::ProjectileHit { projectile, obstacle, .. } if projectile == s && obstacle == a
        ));
        assert!(!reg.contains(s));
        assert!(!reg.contains(a));
        assert!(reg.contains(b), "second rock survives this step");
    }

    #[test]
    fn test_obstacle_consumed_once() {
        let mut reg = EntityRegistry::new();
        let a = reg.add(rock(Vec2::new(50.0, 50.0), 20.0, Tier::Large));
        let s1 = reg.add(shot(Vec2::new(45.0, 50.0)));
        let s2 = reg.add(shot(Vec2::new(55.0, 50.0)));

        let events = detect_projectile_hits(&mut reg);
        assert_eq!(events.len(), 1);
        assert!(!reg.contains(a));
        assert!(!reg.contains(s1));
        assert!(reg.contains(s2), "second projectile keeps flying");
    }

    #[test]
    fn test_player_hit_requires_vulnerability() {
        let mut reg = EntityRegistry::new();
        let pid = reg.add(Entity::player(Vec2::new(100.0, 100.0), 10.0, 0.0, 0.0));
        reg.add(rock(Vec2::new(105.0, 100.0), 10.0, Tier::Small));

        assert!(detect_player_hit(&reg, pid).is_none());

        if let Some(p) = reg.get_mut(pid).and_then(|e| e.as_player_mut()) {
            p.vulnerable = true;
        }
        assert!(matches!(
            detect_player_hit(&reg, pid),
            Some(CollisionEvent::PlayerHit { .. })
        ));
    }

    #[test]
    fn test_base_breach_only_for_base_seekers() {
        let mut reg = EntityRegistry::new();
        reg.add(rock(Vec2::new(10.0, 0.0), 5.0, Tier::Small));
        let mut seeker = rock(Vec2::new(-10.0, 0.0), 5.0, Tier::Small);
        if let EntityKind::Obstacle(o) = &mut seeker.kind {
            o.behavior = Behavior::SeekBase { speed: 10.0 };
        }
        let sid = reg.add(seeker);

        let events = detect_base_breaches(&mut reg, Vec2::ZERO, 20.0);
        assert_eq!(events.len(), 1);
        assert!(!reg.contains(sid));
        assert_eq!(reg.count(Kind::Obstacle), 1);
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ar in 0.1f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, br in 0.1f32..100.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circles_collide(a, ar, b, br), circles_collide(b, br, a, ar));
        }
    }
}
