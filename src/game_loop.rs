//! Host-facing game loop
//!
//! The host calls `frame` once per display refresh with its timestamp. The
//! loop converts elapsed time into fixed simulation steps, renders, reports
//! to the observer, and detaches itself a short while after the mission
//! resolves. Every scheduled callback carries a `FrameToken`; tokens from an
//! earlier mount are ignored.

use glam::Vec2;
use serde::Serialize;

use crate::consts::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, HUD_THROTTLE_SECS, MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT, TERMINAL_TAIL_SECS,
};
use crate::error::EngineError;
use crate::input::{InputHandle, autopilot};
use crate::mission::{MinigameKind, Mission};
use crate::renderer::{RenderSurface, Renderer};
use crate::settings::{Settings, StyleSettings, VisualSettings};
use crate::sim::{GameEvent, GameState, MineralTally, Outcome, RewardSink, tick};
use crate::tuning::Tuning;

/// Everything a mission needs before it can start. Missing pieces make
/// `mount` fail.
#[derive(Debug, Clone, Default)]
pub struct MissionConfig {
    pub mission: Option<Mission>,
    pub style: Option<StyleSettings>,
    pub visual: Option<VisualSettings>,
}

impl MissionConfig {
    pub fn new(mission: Mission, style: StyleSettings, visual: VisualSettings) -> Self {
        Self {
            mission: Some(mission),
            style: Some(style),
            visual: Some(visual),
        }
    }
}

/// Identifies the mount a frame callback was scheduled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Schedule another frame with the same token
    Continue,
    /// Loop detached (or token stale); stop scheduling
    Stopped,
}

/// Display-level snapshot pushed to the reactive layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HudSummary {
    pub kind: MinigameKind,
    pub progress: u32,
    pub target: u32,
    pub score: u64,
    pub minerals: MineralTally,
    pub outcome: Outcome,
    pub player_alive: bool,
    /// (current, max) for defense play
    pub base_health: Option<(i32, i32)>,
    pub wave: u32,
}

impl HudSummary {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            kind: state.kind,
            progress: state.objective.progress(),
            target: state.objective.target(),
            score: state.objective.score(),
            minerals: *state.objective.minerals(),
            outcome: state.outcome(),
            player_alive: state.player_state().is_some_and(|p| p.alive),
            base_health: state.objective.base_health().map(|b| (b.current, b.max)),
            wave: state.spawner.wave(),
        }
    }
}

/// Receives mission results and UI requests
pub trait MissionObserver {
    /// Called once per attempt when the outcome becomes terminal
    fn on_objective_resolved(&mut self, outcome: Outcome, final_score: u64, minerals: &MineralTally);

    /// The end screen was dismissed
    fn on_request_exit(&mut self);

    /// Throttled HUD update
    fn on_summary(&mut self, _summary: &HudSummary) {}
}

/// Per-mount state
struct Session {
    state: GameState,
    renderer: Renderer,
    accumulator: f32,
    last_time_ms: Option<f64>,
    /// Simulation time the outcome became terminal
    terminal_since: Option<f64>,
    last_summary_ms: Option<f64>,
    last_outcome: Outcome,
}

pub struct GameLoop {
    tuning: Tuning,
    settings: Settings,
    size: Vec2,
    input: InputHandle,
    rewards: Box<dyn RewardSink>,
    observer: Box<dyn MissionObserver>,
    surface: Box<dyn RenderSurface>,
    generation: u64,
    session: Option<Session>,
}

impl GameLoop {
    pub fn new(
        tuning: Tuning,
        settings: Settings,
        input: InputHandle,
        rewards: Box<dyn RewardSink>,
        observer: Box<dyn MissionObserver>,
        surface: Box<dyn RenderSurface>,
    ) -> Self {
        Self {
            tuning,
            settings,
            size: Vec2::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            input,
            rewards,
            observer,
            surface,
            generation: 0,
            session: None,
        }
    }

    pub fn input(&self) -> InputHandle {
        self.input.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    pub fn state(&self) -> Option<&GameState> {
        self.session.as_ref().map(|s| &s.state)
    }

    /// Mutable access for scripted setups
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.session.as_mut().map(|s| &mut s.state)
    }

    pub fn summary(&self) -> Option<HudSummary> {
        self.state().map(HudSummary::from_state)
    }

    /// Validate configuration and start a fresh mission instance.
    ///
    /// Any previous mount is detached first, so its tokens go stale.
    pub fn mount(&mut self, config: &MissionConfig, seed: u64) -> Result<FrameToken, EngineError> {
        let mission = config.mission.as_ref().ok_or(EngineError::MissingMission)?;
        let style = config.style.as_ref().ok_or(EngineError::MissingStyleSettings)?;
        let visual = config.visual.as_ref().ok_or(EngineError::MissingVisualSettings)?;

        let state = GameState::new(mission, &self.tuning, &self.settings, self.size, seed)?;
        let renderer = Renderer::new(
            mission.minigame_type,
            style,
            visual,
            &self.settings,
            self.size,
            seed,
        );

        self.detach();
        self.generation += 1;
        self.session = Some(Session {
            last_outcome: state.outcome(),
            state,
            renderer,
            accumulator: 0.0,
            last_time_ms: None,
            terminal_since: None,
            last_summary_ms: None,
        });

        log::info!("Engine mounted (generation {})", self.generation);
        Ok(FrameToken {
            generation: self.generation,
        })
    }

    /// Run one animation frame at host time `now_ms`
    pub fn frame(&mut self, token: FrameToken, now_ms: f64) -> FrameStatus {
        if token.generation != self.generation {
            return FrameStatus::Stopped;
        }
        let Some(session) = self.session.as_mut() else {
            return FrameStatus::Stopped;
        };

        let dt = match session.last_time_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        session.last_time_ms = Some(now_ms);
        session.accumulator += dt;

        let mut substeps = 0;
        while session.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = {
                let adapter = self.input.borrow();
                if adapter.autopilot {
                    autopilot(&session.state)
                } else {
                    adapter.snapshot()
                }
            };

            for event in tick(&mut session.state, &input, SIM_DT, self.rewards.as_mut()) {
                if let GameEvent::Resolved(outcome) = event {
                    session.terminal_since = Some(session.state.clock);
                    self.observer.on_objective_resolved(
                        outcome,
                        session.state.objective.score(),
                        session.state.objective.minerals(),
                    );
                }
            }

            session.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            session.accumulator = session.accumulator.min(SIM_DT);
        }

        let outcome = session.state.outcome();
        let throttle_elapsed = session
            .last_summary_ms
            .is_none_or(|last| now_ms - last >= HUD_THROTTLE_SECS * 1000.0);
        if throttle_elapsed || outcome != session.last_outcome {
            session.last_summary_ms = Some(now_ms);
            session.last_outcome = outcome;
            self.observer.on_summary(&HudSummary::from_state(&session.state));
        }

        let frame = session.renderer.build_frame(&session.state);
        self.surface.present(&frame);

        let tail_over = session
            .terminal_since
            .is_some_and(|since| session.state.clock - since >= TERMINAL_TAIL_SECS);
        if tail_over {
            self.detach();
            return FrameStatus::Stopped;
        }
        FrameStatus::Continue
    }

    /// Adapt to a new drawing surface size
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.size = Vec2::new(width, height);
        if let Some(session) = &mut self.session {
            session.state.resize(width, height);
            session.renderer.resize(width, height);
        }
    }

    /// Stop the loop; pending frame callbacks become no-ops
    pub fn teardown(&mut self) {
        self.detach();
    }

    /// The player dismissed the end screen
    pub fn dismiss(&mut self) {
        self.detach();
        self.observer.on_request_exit();
    }

    fn detach(&mut self) {
        if self.session.take().is_some() {
            self.generation += 1;
            self.surface.release();
            log::info!("Engine detached");
        }
    }
}
