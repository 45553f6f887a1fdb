//! Frame building
//!
//! Turns a `GameState` into one flat triangle list per frame. Presenting the
//! vertices (GPU, canvas, nothing at all) is up to the `RenderSurface`.

pub mod background;
pub mod palette;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use background::{BackdropStyle, Background};
pub use palette::Palette;
pub use vertex::Vertex;

use crate::mission::MinigameKind;
use crate::settings::{Settings, StyleSettings, VisualSettings};
use crate::sim::{EntityKind, GameState, Kind};

/// One frame of draw data
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub clear_color: [f32; 4],
    pub vertices: Vec<Vertex>,
    /// Playfield size the vertices are laid out in
    pub size: Vec2,
}

/// Presents built frames
pub trait RenderSurface {
    fn present(&mut self, frame: &Frame);

    /// Called when the engine detaches
    fn release(&mut self) {}
}

/// Surface that drops every frame (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullSurface {
    pub frames: u64,
}

impl RenderSurface for NullSurface {
    fn present(&mut self, _frame: &Frame) {
        self.frames += 1;
    }
}

pub struct Renderer {
    palette: Palette,
    background: Background,
    size: Vec2,
}

impl Renderer {
    pub fn new(
        kind: MinigameKind,
        style: &StyleSettings,
        visual: &VisualSettings,
        settings: &Settings,
        size: Vec2,
        seed: u64,
    ) -> Self {
        let palette = Palette::resolve(kind, style, visual);
        let backdrop = match kind {
            MinigameKind::Asteroids => BackdropStyle::Starfield,
            MinigameKind::TowerDefense | MinigameKind::Survival => BackdropStyle::Grid,
        };
        Self {
            palette,
            background: Background::new(
                backdrop,
                seed,
                settings.quality.star_density(),
                palette.backdrop,
                size,
            ),
            size,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
        self.background.regenerate(self.size);
    }

    pub fn build_frame(&self, state: &GameState) -> Frame {
        let mut vertices = self.background.vertices().to_vec();
        let palette = &self.palette;

        if let (Some(base), Some(health)) = (state.base, state.objective.base_health()) {
            let fill = if health.max > 0 {
                health.current as f32 / health.max as f32
            } else {
                0.0
            };
            let color = if fill < 0.35 {
                vertex::colors::BASE_DAMAGED
            } else {
                palette.base
            };
            vertices.extend(shapes::circle(base.pos, base.radius * 0.6, color, 24));
            vertices.extend(shapes::ring(base.pos, base.radius - 4.0, base.radius, color, 32, fill));
        }

        state.registry.for_each(Kind::Obstacle, |e| {
            if let EntityKind::Obstacle(o) = &e.kind {
                vertices.extend(shapes::polygon_outline(
                    e.pos,
                    e.radius,
                    o.sides,
                    o.rotation,
                    2.0,
                    palette.obstacle,
                ));
            }
        });

        state.registry.for_each(Kind::Projectile, |e| {
            if let EntityKind::Projectile(p) = &e.kind {
                let tail = e.pos - e.vel.normalize_or_zero() * p.length;
                vertices.extend(shapes::segment(tail, e.pos, e.radius, palette.projectile));
            }
        });

        if let Some(player) = state.player() {
            if let Some(p) = player.as_player().filter(|p| p.alive) {
                // Blink while the spawn grace lasts
                let blinking = !p.vulnerable && p.vulnerable_at.is_finite() && (state.time_ticks / 8) % 2 == 1;
                if !blinking {
                    vertices.extend(shapes::ship(player.pos, player.radius, p.heading, palette.player));
                }
            }
        }

        state.registry.for_each(Kind::Particle, |e| {
            if let EntityKind::Particle(p) = &e.kind {
                let mut color = p.color;
                color[3] *= p.alpha();
                vertices.extend(shapes::circle(e.pos, e.radius, color, 6));
            }
        });

        Frame {
            clear_color: palette.background,
            vertices,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::Mission;
    use crate::tuning::Tuning;

    #[test]
    fn test_frame_contains_player_and_background() {
        let size = Vec2::new(800.0, 600.0);
        let state = GameState::new(
            &Mission::new(MinigameKind::TowerDefense, 5, 10, 1),
            &Tuning::default(),
            &Settings::default(),
            size,
            1,
        )
        .unwrap();
        let renderer = Renderer::new(
            MinigameKind::TowerDefense,
            &StyleSettings::default(),
            &VisualSettings::default(),
            &Settings::default(),
            size,
            1,
        );
        let background = renderer.background.vertices().len();
        let frame = renderer.build_frame(&state);
        assert!(frame.vertices.len() > background);
        assert_eq!(frame.size, size);
        assert_eq!(frame.vertices.len() % 3, 0);
    }

    #[test]
    fn test_resize_rebuilds_background() {
        let mut renderer = Renderer::new(
            MinigameKind::Asteroids,
            &StyleSettings::default(),
            &VisualSettings::default(),
            &Settings::default(),
            Vec2::new(800.0, 600.0),
            1,
        );
        let before = renderer.background.vertices().len();
        renderer.resize(400.0, 300.0);
        assert!(renderer.background.vertices().len() < before);
    }
}
