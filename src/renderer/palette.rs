//! Color palette resolved from the mission's cosmetic tables
//!
//! Style and visual tables carry CSS-ish color strings (`"cyan"`, `"#444"`,
//! `"rgb(40, 60, 100)"`). Anything unparseable falls back to the built-in
//! color for that role.

use super::vertex::colors;
use crate::mission::MinigameKind;
use crate::settings::{StyleSettings, VisualSettings};

/// Parse a CSS-style color string into linear RGBA
pub fn parse_color(s: &str) -> Option<[f32; 4]> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(body) = s.strip_prefix("rgb(").and_then(|b| b.strip_suffix(')')) {
        let parts: Vec<f32> = body
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .ok()?;
        if let [r, g, b] = parts[..] {
            return Some([r / 255.0, g / 255.0, b / 255.0, 1.0].map(|c| c.clamp(0.0, 1.0)));
        }
        return None;
    }
    named(&s.to_lowercase())
}

fn parse_hex(hex: &str) -> Option<[f32; 4]> {
    let digit = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    let (r, g, b) = match hex.len() {
        3 => (digit(0, 1)? * 17, digit(1, 1)? * 17, digit(2, 1)? * 17),
        6 => (digit(0, 2)?, digit(2, 2)?, digit(4, 2)?),
        _ => return None,
    };
    Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
}

fn named(name: &str) -> Option<[f32; 4]> {
    let rgb: (u8, u8, u8) = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "grey" | "gray" => (128, 128, 128),
        "lightgrey" | "lightgray" => (211, 211, 211),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "darkblue" => (0, 0, 139),
        "cyan" => (0, 255, 255),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "gold" => (255, 215, 0),
        "purple" => (128, 0, 128),
        _ => return None,
    };
    Some([rgb.0 as f32 / 255.0, rgb.1 as f32 / 255.0, rgb.2 as f32 / 255.0, 1.0])
}

/// Colors for each drawable role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: [f32; 4],
    /// Starfield dots or grid lines
    pub backdrop: [f32; 4],
    pub player: [f32; 4],
    pub obstacle: [f32; 4],
    pub projectile: [f32; 4],
    pub base: [f32; 4],
}

impl Palette {
    pub fn resolve(kind: MinigameKind, style: &StyleSettings, visual: &VisualSettings) -> Self {
        // First key present and parseable wins
        let pick_style = |keys: &[&str]| keys.iter().find_map(|k| style.get(k).and_then(parse_color));

        let backdrop_default = match kind {
            MinigameKind::Asteroids => colors::STAR,
            _ => colors::GRID,
        };
        let obstacle_default = match kind {
            MinigameKind::Asteroids => colors::OBSTACLE,
            _ => colors::ENEMY,
        };

        Self {
            background: pick_style(&["backgroundColor"])
                .or_else(|| visual.get("skyColor").and_then(parse_color))
                .map(|c| dim(c, 0.25))
                .unwrap_or(colors::BACKGROUND),
            backdrop: visual
                .get("primaryColor")
                .and_then(parse_color)
                .map(|c| dim(c, 0.5))
                .unwrap_or(backdrop_default),
            player: pick_style(&["playerShipColor", "towerColor", "characterColor"]).unwrap_or(colors::PLAYER),
            obstacle: pick_style(&["asteroidColor", "enemyColor"]).unwrap_or(obstacle_default),
            projectile: pick_style(&["laserColor", "projectileColor"]).unwrap_or(colors::PROJECTILE),
            base: pick_style(&["baseColor"]).unwrap_or(colors::BASE),
        }
    }
}

/// Scale RGB toward black, keeping alpha
fn dim(c: [f32; 4], factor: f32) -> [f32; 4] {
    [c[0] * factor, c[1] * factor, c[2] * factor, c[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_color("#ff0000"), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(parse_color("#444"), parse_color("#444444"));
        assert_eq!(parse_color("rgb(255, 0, 255)"), Some([1.0, 0.0, 1.0, 1.0]));
        assert_eq!(parse_color("Cyan"), Some([0.0, 1.0, 1.0, 1.0]));
        assert_eq!(parse_color("adventurer_sprite"), None);
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("rgb(1, 2)"), None);
    }

    #[test]
    fn test_style_overrides_defaults() {
        let style = StyleSettings(
            [("asteroidColor".to_string(), "grey".to_string())]
                .into_iter()
                .collect(),
        );
        let palette = Palette::resolve(MinigameKind::Asteroids, &style, &VisualSettings::default());
        assert_eq!(palette.obstacle, named("grey").unwrap_or_default());
        assert_eq!(palette.player, colors::PLAYER);
    }

    #[test]
    fn test_unparseable_falls_back() {
        let style = StyleSettings(
            [("enemyColor".to_string(), "zombie_sprite".to_string())]
                .into_iter()
                .collect(),
        );
        let palette = Palette::resolve(MinigameKind::Survival, &style, &VisualSettings::default());
        assert_eq!(palette.obstacle, colors::ENEMY);
    }
}
