//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod objective;
pub mod particles;
pub mod physics;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionEvent, circles_collide};
pub use entity::{Behavior, Entity, EntityId, EntityKind, Kind, Tier};
pub use objective::{MineralKind, MineralTally, ObjectiveTracker, Outcome, RewardSink};
pub use particles::{EmitParams, ParticleEmitter};
pub use physics::{Boundary, HeadingPolicy};
pub use registry::EntityRegistry;
pub use spawn::SpawnScheduler;
pub use state::{Base, GameEvent, GameState};
pub use tick::{Intent, TickInput, tick};
