//! Shape generation for 2D primitives
//!
//! Everything is emitted as plain triangle lists in arena pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::heading;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    radial_gradient(center, radius, color, color, segments)
}

/// Filled circle fading from `inner` at the center to `outer` at the rim
pub fn radial_gradient(
    center: Vec2,
    radius: f32,
    inner: [f32; 4],
    outer: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, inner));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            outer,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            outer,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = center + heading(theta1) * inner_radius;
        let outer1 = center + heading(theta1) * outer_radius;
        let inner2 = center + heading(theta2) * inner_radius;
        let outer2 = center + heading(theta2) * outer_radius;

        vertices.extend(quad(inner1, outer1, outer2, inner2, color));
    }

    vertices
}

/// Irregular blob: one vertex per offset, each at `radius * offset` from
/// the center, rotated by `rotation`
pub fn blob(
    center: Vec2,
    radius: f32,
    rotation: f32,
    offsets: &[f32],
    inner: [f32; 4],
    outer: [f32; 4],
) -> Vec<Vertex> {
    let count = offsets.len();
    if count < 3 {
        return radial_gradient(center, radius, inner, outer, 12);
    }

    let point = |i: usize| {
        let theta = rotation + (i as f32 / count as f32) * 2.0 * PI;
        center + heading(theta) * (radius * offsets[i % count])
    };

    let mut vertices = Vec::with_capacity(count * 3);
    for i in 0..count {
        let a = point(i);
        let b = point(i + 1);
        vertices.push(Vertex::new(center.x, center.y, inner));
        vertices.push(Vertex::new(a.x, a.y, outer));
        vertices.push(Vertex::new(b.x, b.y, outer));
    }
    vertices
}

/// Outline of the same blob, `width` pixels thick
pub fn blob_outline(
    center: Vec2,
    radius: f32,
    rotation: f32,
    offsets: &[f32],
    width: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let count = offsets.len();
    if count < 3 {
        return ring(center, radius - width, radius, color, 12);
    }

    let point = |i: usize, extra: f32| {
        let theta = rotation + (i as f32 / count as f32) * 2.0 * PI;
        center + heading(theta) * (radius * offsets[i % count] + extra)
    };

    let mut vertices = Vec::with_capacity(count * 6);
    for i in 0..count {
        vertices.extend(quad(
            point(i, -width),
            point(i, 0.0),
            point(i + 1, 0.0),
            point(i + 1, -width),
            color,
        ));
    }
    vertices
}

/// Two triangles covering the quad `a b c d` (in winding order)
pub fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
        Vertex::new(a.x, a.y, color),
    ]
}

/// Rectangle centered on `center`, `length` along `angle`, `width` across
pub fn oriented_rect(center: Vec2, angle: f32, length: f32, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let along = heading(angle) * (length / 2.0);
    let across = heading(angle + PI / 2.0) * (width / 2.0);
    quad(
        center - along - across,
        center + along - across,
        center + along + across,
        center - along + across,
        color,
    )
}

/// Segment from `from` to `to`, `width` pixels thick
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let delta = to - from;
    let angle = delta.y.atan2(delta.x);
    oriented_rect((from + to) / 2.0, angle, delta.length(), width, color)
}

/// Four-pointed star
pub fn spark(center: Vec2, radius: f32, rotation: f32, color: [f32; 4]) -> Vec<Vertex> {
    let waist = radius * 0.3;
    let mut vertices = Vec::with_capacity(24);
    for i in 0..4 {
        let theta = rotation + i as f32 * PI / 2.0;
        let tip = center + heading(theta) * radius;
        let left = center + heading(theta + PI / 4.0) * waist;
        let right = center + heading(theta - PI / 4.0) * waist;
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(right.x, right.y, color));
        vertices.push(Vertex::new(tip.x, tip.y, color));
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(tip.x, tip.y, color));
        vertices.push(Vertex::new(left.x, left.y, color));
    }
    vertices
}

/// Isosceles triangle pointing along `angle` from `base_center`
pub fn cone(base_center: Vec2, angle: f32, length: f32, base_width: f32, tip_color: [f32; 4], base_color: [f32; 4]) -> [Vertex; 3] {
    let tip = base_center + heading(angle) * length;
    let across = heading(angle + PI / 2.0) * (base_width / 2.0);
    let left = base_center + across;
    let right = base_center - across;
    [
        Vertex::new(left.x, left.y, base_color),
        Vertex::new(right.x, right.y, base_color),
        Vertex::new(tip.x, tip.y, tip_color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 5.0, WHITE, 16).len(), 48);
        assert_eq!(ring(Vec2::ZERO, 4.0, 5.0, WHITE, 16).len(), 96);
    }

    #[test]
    fn test_circle_stays_within_radius() {
        for v in circle(Vec2::new(10.0, 10.0), 5.0, WHITE, 24) {
            let p = Vec2::from(v.position);
            assert!(p.distance(Vec2::new(10.0, 10.0)) <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_blob_follows_offsets() {
        let offsets = [1.0, 0.5, 1.0, 0.5];
        let vertices = blob(Vec2::ZERO, 10.0, 0.0, &offsets, WHITE, WHITE);
        assert_eq!(vertices.len(), 12);
        // Second vertex of the first triangle sits at offset 0 along +x
        let first = Vec2::from(vertices[1].position);
        assert!((first - Vec2::new(10.0, 0.0)).length() < 1e-4);
        let second = Vec2::from(vertices[2].position);
        assert!((second - Vec2::new(0.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn test_blob_falls_back_to_circle() {
        assert_eq!(blob(Vec2::ZERO, 10.0, 0.0, &[], WHITE, WHITE).len(), 36);
    }

    #[test]
    fn test_line_length() {
        let vertices = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, WHITE);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert!(xs.iter().all(|&x| (-1e-4..=10.0 + 1e-4).contains(&x)));
        assert!(ys.iter().all(|&y| y.abs() <= 1.0 + 1e-4));
    }

    #[test]
    fn test_spark_points() {
        let vertices = spark(Vec2::ZERO, 4.0, 0.0, WHITE);
        assert_eq!(vertices.len(), 24);
        let farthest = vertices
            .iter()
            .map(|v| Vec2::from(v.position).length())
            .fold(0.0f32, f32::max);
        assert!((farthest - 4.0).abs() < 1e-4);
    }
}
