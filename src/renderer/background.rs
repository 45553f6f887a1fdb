//! Static backdrop geometry
//!
//! Space missions get a seeded starfield, ground missions a grid. Both are
//! rebuilt only when the playfield size changes.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shapes;
use super::vertex::Vertex;

/// Playfield area per star at full density (px²)
const AREA_PER_STAR: f32 = 2500.0;
const GRID_SPACING: f32 = 40.0;
const GRID_LINE_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackdropStyle {
    Starfield,
    Grid,
}

#[derive(Debug, Clone)]
pub struct Background {
    style: BackdropStyle,
    seed: u64,
    density: f32,
    color: [f32; 4],
    vertices: Vec<Vertex>,
}

impl Background {
    pub fn new(style: BackdropStyle, seed: u64, density: f32, color: [f32; 4], size: Vec2) -> Self {
        let mut background = Self {
            style,
            seed,
            density,
            color,
            vertices: Vec::new(),
        };
        background.regenerate(size);
        background
    }

    pub fn style(&self) -> BackdropStyle {
        self.style
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn regenerate(&mut self, size: Vec2) {
        self.vertices = match self.style {
            BackdropStyle::Starfield => starfield(self.seed, self.density, self.color, size),
            BackdropStyle::Grid => grid(self.color, size),
        };
    }
}

fn starfield(seed: u64, density: f32, color: [f32; 4], size: Vec2) -> Vec<Vertex> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let count = ((size.x * size.y / AREA_PER_STAR) * density.clamp(0.0, 1.0)) as usize;
    let mut vertices = Vec::with_capacity(count * 6);

    for _ in 0..count {
        let pos = Vec2::new(rng.random::<f32>() * size.x, rng.random::<f32>() * size.y);
        let half = rng.random_range(0.5..1.5f32);
        // Dimmer stars read as farther away
        let brightness = rng.random_range(0.3..1.0f32);
        let star = [color[0], color[1], color[2], color[3] * brightness];
        vertices.extend(shapes::rect(pos - Vec2::splat(half), pos + Vec2::splat(half), star));
    }
    vertices
}

fn grid(color: [f32; 4], size: Vec2) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let mut x = GRID_SPACING;
    while x < size.x {
        vertices.extend(shapes::segment(
            Vec2::new(x, 0.0),
            Vec2::new(x, size.y),
            GRID_LINE_WIDTH,
            color,
        ));
        x += GRID_SPACING;
    }
    let mut y = GRID_SPACING;
    while y < size.y {
        vertices.extend(shapes::segment(
            Vec2::new(0.0, y),
            Vec2::new(size.x, y),
            GRID_LINE_WIDTH,
            color,
        ));
        y += GRID_SPACING;
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starfield_is_seeded_and_scales() {
        let a = Background::new(BackdropStyle::Starfield, 5, 1.0, [1.0; 4], Vec2::new(800.0, 600.0));
        let b = Background::new(BackdropStyle::Starfield, 5, 1.0, [1.0; 4], Vec2::new(800.0, 600.0));
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.vertices().len(), 192 * 6);

        let mut c = a.clone();
        c.regenerate(Vec2::new(400.0, 300.0));
        assert_eq!(c.vertices().len(), 48 * 6);
    }

    #[test]
    fn test_grid_lines_inside_playfield() {
        let bg = Background::new(BackdropStyle::Grid, 0, 1.0, [1.0; 4], Vec2::new(100.0, 100.0));
        // Two vertical and two horizontal interior lines
        assert_eq!(bg.vertices().len(), 4 * 6);
        for v in bg.vertices() {
            assert!(v.position[0] >= -1.0 && v.position[0] <= 101.0);
            assert!(v.position[1] >= -1.0 && v.position[1] <= 101.0);
        }
    }
}
