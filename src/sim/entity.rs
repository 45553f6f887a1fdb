//! Entity types
//!
//! Every simulated thing shares a small header (id, position, velocity,
//! radius) and carries a kind-specific payload. Systems dispatch on the
//! payload with `match` rather than through trait objects.

use glam::Vec2;

use super::tick::Intent;
use crate::consts::MIN_RADIUS;

/// Registry-assigned entity identifier (never reused within a mission)
pub type EntityId = u32;

/// Discriminant used to select entities of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Player,
    Obstacle,
    Projectile,
    Particle,
}

/// Obstacle size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Large,
    Medium,
    Small,
}

impl Tier {
    /// Index into per-tier tuning tables (large = 0)
    pub fn index(self) -> usize {
        match self {
            Tier::Large => 0,
            Tier::Medium => 1,
            Tier::Small => 2,
        }
    }

    /// Tier children are split into, `None` for the smallest tier
    pub fn next_smaller(self) -> Option<Tier> {
        match self {
            Tier::Large => Some(Tier::Medium),
            Tier::Medium => Some(Tier::Small),
            Tier::Small => None,
        }
    }
}

/// How an obstacle picks its velocity each step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Keeps its spawn velocity
    Drift,
    /// Steers straight at the player
    SeekPlayer { speed: f32 },
    /// Steers straight at the defended base
    SeekBase { speed: f32 },
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Facing angle (radians, screen space)
    pub heading: f32,
    pub alive: bool,
    /// Set once a hostile has hit the player
    pub hit: bool,
    /// Whether hostiles can currently hit the player
    pub vulnerable: bool,
    /// Simulation time at which the spawn grace ends
    pub vulnerable_at: f64,
    /// Latest directional intent read from input
    pub intent: Intent,
    pub firing: bool,
    /// Simulation time of the last shot
    pub last_fire: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub tier: Tier,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Polygon side count used for drawing
    pub sides: u8,
    pub alive: bool,
    pub behavior: Behavior,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub length: f32,
    /// Simulation time the projectile was fired
    pub born_at: f64,
    pub ttl: f32,
}

impl Projectile {
    pub fn expired(&self, now: f64) -> bool {
        now - self.born_at >= self.ttl as f64
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub color: [f32; 4],
    /// Total lifespan (seconds)
    pub lifespan: f32,
    /// Remaining lifespan (seconds)
    pub remaining: f32,
}

impl Particle {
    /// Fade factor in [0, 1]
    pub fn alpha(&self) -> f32 {
        (self.remaining / self.lifespan).max(0.0)
    }

    /// Age by `dt`; returns true once the particle should be retired
    pub fn age(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// Kind-specific payload
#[derive(Debug, Clone)]
pub enum EntityKind {
    Player(Player),
    Obstacle(Obstacle),
    Projectile(Projectile),
    Particle(Particle),
}

impl EntityKind {
    pub fn kind(&self) -> Kind {
        match self {
            EntityKind::Player(_) => Kind::Player,
            EntityKind::Obstacle(_) => Kind::Obstacle,
            EntityKind::Projectile(_) => Kind::Projectile,
            EntityKind::Particle(_) => Kind::Particle,
        }
    }
}

/// A simulated entity
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub kind: EntityKind,
}

impl Entity {
    /// Build an entity; the registry assigns the id on insertion.
    /// Radii are clamped to `MIN_RADIUS` so no degenerate circle is ever created.
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, kind: EntityKind) -> Self {
        Self {
            id: 0,
            pos,
            vel,
            radius: radius.max(MIN_RADIUS),
            kind,
        }
    }

    pub fn player(pos: Vec2, radius: f32, heading: f32, vulnerable_at: f64) -> Self {
        Self::new(
            pos,
            Vec2::ZERO,
            radius,
            EntityKind::Player(Player {
                heading,
                alive: true,
                hit: false,
                vulnerable: false,
                vulnerable_at,
                intent: Intent::default(),
                firing: false,
                last_fire: None,
            }),
        )
    }

    pub fn kind(&self) -> Kind {
        self.kind.kind()
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_obstacle(&self) -> Option<&Obstacle> {
        match &self.kind {
            EntityKind::Obstacle(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_particle(&self) -> Option<&Particle> {
        match &self.kind {
            EntityKind::Particle(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_floor() {
        let e = Entity::new(
            Vec2::ZERO,
            Vec2::ZERO,
            -5.0,
            EntityKind::Projectile(Projectile {
                length: 4.0,
                born_at: 0.0,
                ttl: 1.0,
            }),
        );
        assert_eq!(e.radius, MIN_RADIUS);
    }

    #[test]
    fn test_tier_cascade() {
        assert_eq!(Tier::Large.next_smaller(), Some(Tier::Medium));
        assert_eq!(Tier::Medium.next_smaller(), Some(Tier::Small));
        assert_eq!(Tier::Small.next_smaller(), None);
    }

    #[test]
    fn test_particle_alpha_reaches_zero_when_retired() {
        let mut p = Particle {
            color: [1.0; 4],
            lifespan: 0.5,
            remaining: 0.5,
        };
        let mut last_alpha = p.alpha();
        assert_eq!(last_alpha, 1.0);

        let mut steps = 0;
        loop {
            let retired = p.age(0.07);
            let alpha = p.alpha();
            assert!(alpha <= last_alpha, "alpha must never increase");
            last_alpha = alpha;
            steps += 1;
            if retired {
                assert_eq!(alpha, 0.0);
                break;
            }
            assert!(alpha > 0.0);
        }
        assert_eq!(steps, 8);
    }

    #[test]
    fn test_projectile_expiry_uses_clock() {
        let p = Projectile {
            length: 4.0,
            born_at: 10.0,
            ttl: 1.0,
        };
        assert!(!p.expired(10.5));
        assert!(p.expired(11.0));
    }
}
