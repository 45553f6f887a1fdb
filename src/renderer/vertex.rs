//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Raw bytes of a vertex slice, ready for upload to a GPU buffer
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Default colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const STAR: [f32; 4] = [0.8, 0.85, 1.0, 1.0];
    pub const GRID: [f32; 4] = [0.12, 0.16, 0.2, 1.0];
    pub const PLAYER: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const PLAYER_HIT: [f32; 4] = [1.0, 0.3, 0.2, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.7, 0.65, 0.6, 1.0];
    pub const ENEMY: [f32; 4] = [0.9, 0.3, 0.35, 1.0];
    pub const PROJECTILE: [f32; 4] = [1.0, 1.0, 0.6, 1.0];
    pub const BASE: [f32; 4] = [0.3, 0.6, 1.0, 1.0];
    pub const BASE_DAMAGED: [f32; 4] = [1.0, 0.45, 0.2, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let verts = [Vertex::new(1.0, 2.0, colors::STAR); 3];
        assert_eq!(as_bytes(&verts).len(), 72);
    }
}
