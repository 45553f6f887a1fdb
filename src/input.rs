//! Input normalization
//!
//! Keyboard, touch and virtual-joystick signals all collapse into one
//! directional intent plus a fire flag. Handlers only write here; the loop
//! snapshots the adapter at the top of every step, so the latest write wins.

use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

use crate::consts::INTENT_DEADZONE;
use crate::sim::{GameState, Intent, Kind, TickInput};

/// Shared handle device callbacks write through
pub type InputHandle = Rc<RefCell<InputAdapter>>;

/// Drag distance that counts as full intensity for touch steering (px)
const TOUCH_MAX_DRAG: f32 = 60.0;

/// Directional and fire keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

impl Key {
    /// Map a DOM-style key name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Space" | "Enter" => Some(Key::Fire),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    intent: Intent,
    fire: bool,
    // Held directional keys: up, down, left, right
    held: [bool; 4],
    fire_key: bool,
    fire_button: bool,
    touch_anchor: Option<Vec2>,
    /// Demo mode: the loop steers instead of the player
    pub autopilot: bool,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle() -> InputHandle {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn firing(&self) -> bool {
        self.fire
    }

    pub fn key_down(&mut self, key: Key) {
        self.set_key(key, true);
    }

    pub fn key_up(&mut self, key: Key) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::Up => self.held[0] = down,
            Key::Down => self.held[1] = down,
            Key::Left => self.held[2] = down,
            Key::Right => self.held[3] = down,
            Key::Fire => {
                self.fire_key = down;
                self.fire = self.fire_key || self.fire_button;
                return;
            }
        }

        let [up, down_, left, right] = self.held.map(|h| h as i32 as f32);
        let dir = Vec2::new(right - left, down_ - up);
        if dir == Vec2::ZERO {
            self.intent.intensity = 0.0;
        } else {
            self.intent = Intent {
                angle: dir.to_angle(),
                intensity: 1.0,
            };
        }
    }

    /// Virtual joystick moved. Intensity is clamped to [0, 1]; a non-finite
    /// reading releases the stick and keeps the previous angle.
    pub fn joystick_move(&mut self, angle: f32, intensity: f32) {
        if !angle.is_finite() || !intensity.is_finite() {
            self.intent.intensity = 0.0;
            return;
        }
        self.intent = Intent {
            angle,
            intensity: intensity.clamp(0.0, 1.0),
        };
    }

    /// Joystick knob offset from its center; full intensity at `max_dist`
    pub fn joystick_from_offset(&mut self, dx: f32, dy: f32, max_dist: f32) {
        let offset = Vec2::new(dx, dy);
        let intensity = if max_dist > 0.0 {
            (offset.length() / max_dist).min(1.0)
        } else {
            0.0
        };
        self.joystick_move(offset.to_angle(), intensity);
    }

    /// Knob released: keep the angle, drop the intensity
    pub fn joystick_end(&mut self) {
        self.intent.intensity = 0.0;
    }

    /// Touch on the playfield anchors a floating stick at the contact point
    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.touch_anchor = Some(Vec2::new(x, y));
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        if let Some(anchor) = self.touch_anchor {
            let offset = Vec2::new(x, y) - anchor;
            self.joystick_from_offset(offset.x, offset.y, TOUCH_MAX_DRAG);
        }
    }

    pub fn touch_end(&mut self) {
        if self.touch_anchor.take().is_some() {
            self.joystick_end();
        }
    }

    pub fn fire_down(&mut self) {
        self.fire_button = true;
        self.fire = true;
    }

    pub fn fire_up(&mut self) {
        self.fire_button = false;
        self.fire = self.fire_key;
    }

    pub fn toggle_autopilot(&mut self) {
        self.autopilot = !self.autopilot;
        log::info!("Autopilot: {}", self.autopilot);
    }

    /// Current state as a tick input
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            intent: self.intent,
            fire: self.fire,
        }
    }
}

/// Hostiles closer than this make the autopilot flee
const AUTOPILOT_DANGER: f32 = 110.0;
/// How well aimed the heading must be before the autopilot fires (radians)
const AUTOPILOT_AIM_TOLERANCE: f32 = 0.25;

/// Demo steering: turn toward the nearest hostile and shoot, back off when
/// one gets too close
pub fn autopilot(state: &GameState) -> TickInput {
    let Some(player) = state.player() else {
        return TickInput::default();
    };
    let Some(heading) = player.as_player().filter(|p| p.alive).map(|p| p.heading) else {
        return TickInput::default();
    };

    let nearest = state
        .registry
        .iter(Kind::Obstacle)
        .min_by(|a, b| {
            a.pos
                .distance_squared(player.pos)
                .partial_cmp(&b.pos.distance_squared(player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(target) = nearest else {
        return TickInput::default();
    };

    let to_target = target.pos - player.pos;
    let distance = to_target.length() - target.radius;
    let aim = to_target.to_angle();

    if distance < AUTOPILOT_DANGER && player.as_player().is_some_and(|p| p.vulnerable) {
        return TickInput {
            intent: Intent {
                angle: aim + std::f32::consts::PI,
                intensity: 1.0,
            },
            fire: false,
        };
    }

    // Just above the deadzone: turn without drifting much
    let aligned = crate::normalize_angle(aim - heading).abs() < AUTOPILOT_AIM_TOLERANCE;
    TickInput {
        intent: Intent {
            angle: aim,
            intensity: INTENT_DEADZONE * 1.5,
        },
        fire: aligned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_keys_combine_into_diagonal() {
        let mut input = InputAdapter::new();
        input.key_down(Key::Right);
        input.key_down(Key::Down);
        let intent = input.intent();
        assert!((intent.angle - FRAC_PI_4).abs() < 1e-5);
        assert_eq!(intent.intensity, 1.0);

        input.key_up(Key::Right);
        input.key_up(Key::Down);
        assert_eq!(input.intent().intensity, 0.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputAdapter::new();
        input.key_down(Key::Left);
        input.key_down(Key::Right);
        assert_eq!(input.intent().intensity, 0.0);
    }

    #[test]
    fn test_joystick_offset_scales_and_clamps() {
        let mut input = InputAdapter::new();
        input.joystick_from_offset(0.0, -30.0, 30.0);
        assert!((input.intent().angle + FRAC_PI_2).abs() < 1e-5);
        assert_eq!(input.intent().intensity, 1.0);

        input.joystick_from_offset(-15.0, 0.0, 30.0);
        assert!((input.intent().angle - PI).abs() < 1e-5);
        assert!((input.intent().intensity - 0.5).abs() < 1e-5);

        input.joystick_from_offset(100.0, 0.0, 30.0);
        assert_eq!(input.intent().intensity, 1.0);

        input.joystick_end();
        assert_eq!(input.intent().intensity, 0.0);
    }

    #[test]
    fn test_non_finite_joystick_releases_stick() {
        let mut input = InputAdapter::new();
        input.joystick_move(1.0, 0.8);
        input.joystick_move(f32::NAN, 0.8);
        assert_eq!(input.intent(), Intent { angle: 1.0, intensity: 0.0 });

        input.joystick_move(0.5, f32::INFINITY);
        assert_eq!(input.intent(), Intent { angle: 1.0, intensity: 0.0 });

        input.joystick_move(f32::NEG_INFINITY, 1.0);
        assert!(input.intent().angle.is_finite());
    }

    #[test]
    fn test_last_write_wins() {
        let mut input = InputAdapter::new();
        input.key_down(Key::Up);
        input.joystick_move(0.0, 0.4);
        assert_eq!(input.snapshot().intent, Intent { angle: 0.0, intensity: 0.4 });
    }

    #[test]
    fn test_fire_sources_are_merged() {
        let mut input = InputAdapter::new();
        input.fire_down();
        input.key_down(Key::Fire);
        input.fire_up();
        assert!(input.snapshot().fire, "key still held");
        input.key_up(Key::Fire);
        assert!(!input.snapshot().fire);
    }

    #[test]
    fn test_touch_drag_steers() {
        let mut input = InputAdapter::new();
        input.touch_move(10.0, 10.0);
        assert_eq!(input.intent().intensity, 0.0, "no anchor yet");

        input.touch_start(100.0, 100.0);
        input.touch_move(100.0, 100.0 + TOUCH_MAX_DRAG);
        assert!((input.intent().angle - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(input.intent().intensity, 1.0);
        input.touch_end();
        assert_eq!(input.intent().intensity, 0.0);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_name(" "), Some(Key::Fire));
        assert_eq!(Key::from_name("q"), None);
    }
}
