//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Two triangles covering an axis-aligned rectangle
pub fn quad(out: &mut Vec<Vertex>, rect: Rect, color: [f32; 4]) {
    let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
    out.extend_from_slice(&[
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]);
}

/// Quad with a vertical gradient (top color to bottom color)
pub fn gradient_quad(out: &mut Vec<Vertex>, rect: Rect, top: [f32; 4], bottom: [f32; 4]) {
    let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
    out.extend_from_slice(&[
        Vertex::new(x0, y0, top),
        Vertex::new(x1, y0, top),
        Vertex::new(x0, y1, bottom),
        Vertex::new(x0, y1, bottom),
        Vertex::new(x1, y0, top),
        Vertex::new(x1, y1, bottom),
    ]);
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Hollow circle (exit portal, projectile halo)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    out.reserve((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let (s1, c1) = theta1.sin_cos();
        let (s2, c2) = theta2.sin_cos();
        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        out.push(Vertex::new(inner1.x, inner1.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(inner2.x, inner2.y, color));

        out.push(Vertex::new(inner2.x, inner2.y, color));
        out.push(Vertex::new(outer1.x, outer1.y, color));
        out.push(Vertex::new(outer2.x, outer2.y, color));
    }
}

/// Row of upward triangles filling a rectangle (spike strips)
pub fn spikes(out: &mut Vec<Vertex>, rect: Rect, color: [f32; 4]) {
    let teeth = (rect.w / 10.0).floor().max(1.0) as u32;
    let tooth = rect.w / teeth as f32;
    for i in 0..teeth {
        let x = rect.x + i as f32 * tooth;
        out.push(Vertex::new(x, rect.bottom(), color));
        out.push(Vertex::new(x + tooth / 2.0, rect.y, color));
        out.push(Vertex::new(x + tooth, rect.bottom(), color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        let mut out = Vec::new();
        quad(&mut out, Rect::new(0.0, 0.0, 10.0, 10.0), [1.0; 4]);
        assert_eq!(out.len(), 6);
        circle(&mut out, Vec2::ZERO, 5.0, [1.0; 4], 12);
        assert_eq!(out.len(), 6 + 36);
        ring(&mut out, Vec2::ZERO, 4.0, 5.0, [1.0; 4], 8);
        assert_eq!(out.len(), 6 + 36 + 48);
    }

    #[test]
    fn test_spike_teeth_stay_in_rect() {
        let mut out = Vec::new();
        let rect = Rect::new(40.0, 100.0, 80.0, 20.0);
        spikes(&mut out, rect, [1.0; 4]);
        assert_eq!(out.len(), 8 * 3);
        for v in &out {
            assert!(v.position[0] >= rect.x - 1e-3 && v.position[0] <= rect.right() + 1e-3);
            assert!(v.position[1] >= rect.y && v.position[1] <= rect.bottom());
        }
    }

    #[test]
    fn test_circle_radius() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::new(10.0, 10.0), 3.0, [1.0; 4], 16);
        for v in out.iter().skip(1).step_by(3) {
            let d = Vec2::new(v.position[0] - 10.0, v.position[1] - 10.0).length();
            assert!((d - 3.0).abs() < 1e-4);
        }
    }
}
