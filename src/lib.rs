//! Arcade Engine - real-time 2D simulation core for the outpost minigames
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, collisions, spawning, objectives)
//! - `game_loop`: Frame-driven host loop with lifecycle and fixed timestep
//! - `input`: Keyboard/touch/joystick normalization into intents
//! - `renderer`: Vertex generation for the 2D drawing surface
//! - `tuning`: Data-driven game balance per minigame

pub mod account;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod mission;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use account::PlayerAccount;
pub use error::EngineError;
pub use game_loop::{FrameStatus, FrameToken, GameLoop, HudSummary, MissionConfig, MissionObserver};
pub use mission::{MinigameKind, Mission};
pub use settings::{QualityPreset, Settings, StyleSettings, VisualSettings};
pub use tuning::Tuning;

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep (one step per 60 Hz display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest host frame gap fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Intents at or below this intensity produce no thrust
    pub const INTENT_DEADZONE: f32 = 0.1;
    /// Smallest radius any generated entity may have
    pub const MIN_RADIUS: f32 = 2.0;

    /// Default drawing surface size
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Particle tail kept running after a terminal outcome (seconds)
    pub const TERMINAL_TAIL_SECS: f64 = 1.5;
    /// Minimum gap between HUD summaries pushed to the observer (seconds)
    pub const HUD_THROTTLE_SECS: f64 = 0.1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
