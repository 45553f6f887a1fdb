//! Data-driven game balance
//!
//! Every per-minigame constant lives here so balance can be adjusted from JSON
//! without touching simulation code. `Tuning::default()` carries the shipped
//! values; a JSON document may override any whole mode.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::mission::MinigameKind;
use crate::sim::physics::{Boundary, HeadingPolicy};

/// Player ship/character tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTuning {
    pub radius: f32,
    /// Acceleration at full intent intensity (px/s²)
    pub thrust: f32,
    /// Velocity multiplier applied every step
    pub friction: f32,
    pub max_speed: f32,
    /// Whether hostiles can hit the player at all
    pub vulnerable: bool,
    /// Invulnerable window after spawning (seconds)
    pub spawn_grace_secs: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileTuning {
    pub speed: f32,
    pub radius: f32,
    /// Drawn streak length
    pub length: f32,
    pub ttl_secs: f32,
    /// Minimum time between shots
    pub cooldown_secs: f32,
}

/// How hostiles enter the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Continuous edge spawning with a shrinking interval
    Timer {
        /// Hostiles placed at mission start
        initial_count: u32,
        initial_interval_secs: f32,
        min_interval_secs: f32,
        /// Multiplier applied to the interval after every spawn (< 1)
        ramp: f32,
        /// Spawns closer than this to the player are moved away
        safe_distance: f32,
        max_alive: usize,
    },
    /// Discrete waves of `wave * per_wave` enemies
    Waves {
        per_wave: u32,
        /// Gap between enemies of the same wave
        spawn_gap_secs: f32,
        /// Breather between a cleared wave and the next one
        wave_delay_secs: f32,
        safe_distance: f32,
    },
}

/// Hostile population shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum HostileTuning {
    /// Drifting rocks in three size tiers that split when shot
    Tiered {
        /// Radius for large, medium, small
        radii: [f32; 3],
        /// Fractional random variation applied to radii
        radius_jitter: f32,
        /// Score for destroying large, medium, small
        scores: [u64; 3],
        speed: (f32, f32),
        spin: (f32, f32),
        sides: (u8, u8),
        /// Distance children are placed from their parent
        split_offset: f32,
        /// Speed multiplier children get over their parent
        split_speed_boost: f32,
    },
    /// Homogeneous enemies that home in on a target
    Seekers {
        radius: f32,
        score: u64,
        speed: (f32, f32),
        spin: (f32, f32),
        sides: u8,
        target: SeekTarget,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekTarget {
    Player,
    Base,
}

/// Defended structure for tower-defense play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseTuning {
    pub radius: f32,
    pub health: i32,
    pub breach_damage: i32,
}

/// Complete balance sheet for one minigame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeTuning {
    pub boundary: Boundary,
    pub heading: HeadingPolicy,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub spawn: SpawnPolicy,
    pub hostiles: HostileTuning,
    /// Independent drop chance for tamita, janita, elenita per objective kill
    pub mineral_odds: [f32; 3],
    #[serde(default)]
    pub base: Option<BaseTuning>,
}

impl ModeTuning {
    pub fn asteroids() -> Self {
        Self {
            boundary: Boundary::Wrap,
            heading: HeadingPolicy::Turn { rate: 5.0 },
            player: PlayerTuning {
                radius: 12.0,
                thrust: 420.0,
                friction: 0.985,
                max_speed: 360.0,
                vulnerable: true,
                spawn_grace_secs: 2.0,
            },
            projectile: ProjectileTuning {
                speed: 520.0,
                radius: 2.5,
                length: 10.0,
                ttl_secs: 1.1,
                cooldown_secs: 0.2,
            },
            spawn: SpawnPolicy::Timer {
                initial_count: 3,
                initial_interval_secs: 4.0,
                min_interval_secs: 1.2,
                ramp: 0.95,
                safe_distance: 150.0,
                max_alive: 12,
            },
            hostiles: HostileTuning::Tiered {
                radii: [40.0, 24.0, 13.0],
                radius_jitter: 0.15,
                scores: [2, 5, 10],
                speed: (30.0, 80.0),
                spin: (-1.5, 1.5),
                sides: (6, 10),
                split_offset: 8.0,
                split_speed_boost: 1.3,
            },
            mineral_odds: [0.5, 0.3, 0.0],
            base: None,
        }
    }

    pub fn survival() -> Self {
        Self {
            boundary: Boundary::Clamp,
            heading: HeadingPolicy::Snap,
            player: PlayerTuning {
                radius: 12.0,
                thrust: 900.0,
                friction: 0.9,
                max_speed: 220.0,
                vulnerable: true,
                spawn_grace_secs: 1.5,
            },
            projectile: ProjectileTuning {
                speed: 480.0,
                radius: 3.0,
                length: 8.0,
                ttl_secs: 0.9,
                cooldown_secs: 0.25,
            },
            spawn: SpawnPolicy::Timer {
                initial_count: 2,
                initial_interval_secs: 2.5,
                min_interval_secs: 0.6,
                ramp: 0.96,
                safe_distance: 180.0,
                max_alive: 20,
            },
            hostiles: HostileTuning::Seekers {
                radius: 14.0,
                score: 15,
                speed: (45.0, 75.0),
                spin: (-2.0, 2.0),
                sides: 3,
                target: SeekTarget::Player,
            },
            mineral_odds: [0.25, 0.15, 0.1],
            base: None,
        }
    }

    pub fn tower_defense() -> Self {
        Self {
            boundary: Boundary::Clamp,
            heading: HeadingPolicy::Snap,
            player: PlayerTuning {
                radius: 14.0,
                thrust: 700.0,
                friction: 0.88,
                max_speed: 160.0,
                vulnerable: false,
                spawn_grace_secs: 0.0,
            },
            projectile: ProjectileTuning {
                speed: 500.0,
                radius: 3.0,
                length: 8.0,
                ttl_secs: 1.2,
                cooldown_secs: 0.18,
            },
            spawn: SpawnPolicy::Waves {
                per_wave: 5,
                spawn_gap_secs: 0.8,
                wave_delay_secs: 2.0,
                safe_distance: 120.0,
            },
            hostiles: HostileTuning::Seekers {
                radius: 12.0,
                score: 5,
                speed: (35.0, 55.0),
                spin: (-1.0, 1.0),
                sides: 4,
                target: SeekTarget::Base,
            },
            mineral_odds: [0.2, 0.1, 0.05],
            base: Some(BaseTuning {
                radius: 36.0,
                health: 100,
                breach_damage: 10,
            }),
        }
    }

    /// Apply mission difficulty: faster hostiles and a quicker spawn cadence
    pub fn scaled_for_difficulty(mut self, difficulty: u32) -> Self {
        let factor = 1.0 + 0.08 * difficulty.saturating_sub(1) as f32;

        match &mut self.hostiles {
            HostileTuning::Tiered { speed, .. } | HostileTuning::Seekers { speed, .. } => {
                speed.0 *= factor;
                speed.1 *= factor;
            }
        }

        if let SpawnPolicy::Timer {
            initial_interval_secs,
            min_interval_secs,
            ..
        } = &mut self.spawn
        {
            *initial_interval_secs /= factor;
            *min_interval_secs /= factor;
        }

        self
    }
}

/// Balance sheet for every minigame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub asteroids: ModeTuning,
    pub tower_defense: ModeTuning,
    pub survival: ModeTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            asteroids: ModeTuning::asteroids(),
            tower_defense: ModeTuning::tower_defense(),
            survival: ModeTuning::survival(),
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; modes absent from the document keep defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn for_kind(&self, kind: MinigameKind) -> &ModeTuning {
        match kind {
            MinigameKind::Asteroids => &self.asteroids,
            MinigameKind::TowerDefense => &self.tower_defense,
            MinigameKind::Survival => &self.survival,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_per_mode() {
        let tuning = Tuning::default();
        assert_eq!(tuning.for_kind(MinigameKind::Asteroids).boundary, Boundary::Wrap);
        assert_eq!(tuning.for_kind(MinigameKind::Survival).boundary, Boundary::Clamp);
        assert_eq!(tuning.for_kind(MinigameKind::TowerDefense).boundary, Boundary::Clamp);
    }

    #[test]
    fn test_only_defense_has_base() {
        let tuning = Tuning::default();
        assert!(tuning.tower_defense.base.is_some());
        assert!(tuning.asteroids.base.is_none());
        assert!(tuning.survival.base.is_none());
    }

    #[test]
    fn test_difficulty_speeds_up_hostiles() {
        let base = ModeTuning::survival();
        let hard = ModeTuning::survival().scaled_for_difficulty(6);
        let (HostileTuning::Seekers { speed: a, .. }, HostileTuning::Seekers { speed: b, .. }) =
            (&base.hostiles, &hard.hostiles)
        else {
            panic!("survival uses seekers");
        };
        assert!(b.0 > a.0);
        assert!(b.1 > a.1);
    }

    #[test]
    fn test_partial_override_keeps_other_modes() {
        let mut custom = ModeTuning::asteroids();
        custom.player.friction = 0.9;
        let json = serde_json::json!({ "asteroids": custom }).to_string();

        let tuning = Tuning::from_json(&json).unwrap();
        assert!((tuning.asteroids.player.friction - 0.9).abs() < 1e-6);
        assert_eq!(tuning.survival.heading, HeadingPolicy::Snap);
        assert!(tuning.tower_defense.base.is_some());
    }
}
