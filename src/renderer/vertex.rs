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

/// Expand a 0xRRGGBB palette entry to linear-ish RGBA floats
pub fn rgba(color: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha.clamp(0.0, 1.0)]
}

/// Byte view for uploading to a GPU buffer
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba() {
        assert_eq!(rgba(0xFF0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgba(0x00FF00, 2.0)[3], 1.0);
    }

    #[test]
    fn test_vertex_layout() {
        let v = [Vertex::new(1.0, 2.0, [0.0; 4]); 3];
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(as_bytes(&v).len(), 72);
    }
}
