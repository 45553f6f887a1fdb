//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list so a frame is one flat vertex
//! buffer.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

fn push_quad(vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(b.x, b.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));

    vertices.push(Vertex::new(c.x, c.y, color));
    vertices.push(Vertex::new(b.x, b.y, color));
    vertices.push(Vertex::new(d.x, d.y, color));
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle), optionally only the first
/// `fill` fraction of it (health gauges)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
    fill: f32,
) -> Vec<Vertex> {
    let fill = fill.clamp(0.0, 1.0);
    let drawn = ((segments as f32 * fill).ceil() as u32).min(segments);
    let mut vertices = Vec::with_capacity((drawn * 6) as usize);
    // Gauges start at 12 o'clock
    let start = -PI / 2.0;

    for i in 0..drawn {
        let theta1 = start + (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = start + (((i + 1) as f32 / segments as f32).min(fill)) * 2.0 * PI;

        let inner1 = center + Vec2::from_angle(theta1) * inner_radius;
        let outer1 = center + Vec2::from_angle(theta1) * outer_radius;
        let inner2 = center + Vec2::from_angle(theta2) * inner_radius;
        let outer2 = center + Vec2::from_angle(theta2) * outer_radius;

        push_quad(&mut vertices, inner1, outer1, inner2, outer2, color);
    }

    vertices
}

/// Outline of a regular polygon (rocks, enemies) rotated by `rotation`
pub fn polygon_outline(
    center: Vec2,
    radius: f32,
    sides: u8,
    rotation: f32,
    thickness: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let sides = sides.max(3) as u32;
    let mut vertices = Vec::with_capacity((sides * 6) as usize);
    let inner = (radius - thickness).max(0.0);

    for i in 0..sides {
        let theta1 = rotation + (i as f32 / sides as f32) * 2.0 * PI;
        let theta2 = rotation + ((i + 1) as f32 / sides as f32) * 2.0 * PI;

        push_quad(
            &mut vertices,
            center + Vec2::from_angle(theta1) * inner,
            center + Vec2::from_angle(theta1) * radius,
            center + Vec2::from_angle(theta2) * inner,
            center + Vec2::from_angle(theta2) * radius,
            color,
        );
    }

    vertices
}

/// Thick line segment from `a` to `b`
pub fn segment(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let mut vertices = Vec::with_capacity(6);
    push_quad(&mut vertices, a + perp, a - perp, b + perp, b - perp, color);
    vertices
}

/// Arrowhead ship pointing along `heading`
pub fn ship(center: Vec2, radius: f32, heading: f32, color: [f32; 4]) -> Vec<Vertex> {
    let nose = center + Vec2::from_angle(heading) * radius;
    let left = center + Vec2::from_angle(heading + 2.5) * radius;
    let right = center + Vec2::from_angle(heading - 2.5) * radius;
    // Notched tail
    let tail = center - Vec2::from_angle(heading) * (radius * 0.4);

    vec![
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(left.x, left.y, color),
        Vertex::new(tail.x, tail.y, color),
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(tail.x, tail.y, color),
        Vertex::new(right.x, right.y, color),
    ]
}

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        min,
        Vec2::new(max.x, min.y),
        Vec2::new(min.x, max.y),
        max,
        color,
    );
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 5.0, [1.0; 4], 12).len(), 36);
        // Degenerate segment counts are raised to a triangle
        assert_eq!(circle(Vec2::ZERO, 5.0, [1.0; 4], 1).len(), 9);
    }

    #[test]
    fn test_polygon_points_stay_on_radius() {
        let verts = polygon_outline(Vec2::new(10.0, 10.0), 20.0, 6, 0.3, 2.0, [1.0; 4]);
        assert_eq!(verts.len(), 36);
        for v in verts {
            let d = Vec2::from(v.position).distance(Vec2::new(10.0, 10.0));
            assert!(d <= 20.0 + 1e-3);
            assert!(d >= 18.0 - 1e-3);
        }
    }

    #[test]
    fn test_partial_ring() {
        assert_eq!(ring(Vec2::ZERO, 5.0, 8.0, [1.0; 4], 32, 1.0).len(), 32 * 6);
        assert_eq!(ring(Vec2::ZERO, 5.0, 8.0, [1.0; 4], 32, 0.5).len(), 16 * 6);
        assert!(ring(Vec2::ZERO, 5.0, 8.0, [1.0; 4], 32, 0.0).is_empty());
    }

    #[test]
    fn test_ship_nose_leads() {
        let verts = ship(Vec2::ZERO, 10.0, 0.0, [1.0; 4]);
        assert_eq!(verts[0].position, [10.0, 0.0]);
    }
}
