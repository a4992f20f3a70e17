use bytemuck::{Pod, Zeroable};

use crate::coords::{PixelPos, PixelRect};
use crate::paint::Color;

use super::tessellate::triangulate;

/// Vertex layout (24 bytes):
///
///  offset  0  pos    [f32; 2]   loc 0
///  offset  8  color  [f32; 4]   loc 1
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PolyVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl PolyVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PolyVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed triangle list accumulated over one frame.
///
/// Positions are window pixels; colors are stored as given and converted for
/// the target format at upload time.
#[derive(Debug, Default)]
pub struct PolygonBatch {
    vertices: Vec<PolyVertex>,
    indices: Vec<u32>,
    scratch: Vec<[f32; 2]>,
    local: Vec<u32>,
}

impl PolygonBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tessellates and appends a filled polygon. Returns the triangle count.
    pub fn push_polygon(&mut self, points: &[PixelPos], color: Color) -> usize {
        self.scratch.clear();
        self.scratch.extend(points.iter().map(|p| p.to_f32()));

        self.local.clear();
        let tris = triangulate(&self.scratch, &mut self.local);
        if tris == 0 {
            return 0;
        }

        let base = self.vertices.len() as u32;
        let color = color.to_array();
        self.vertices
            .extend(self.scratch.iter().map(|&pos| PolyVertex { pos, color }));
        self.indices.extend(self.local.iter().map(|i| base + i));
        tris
    }

    /// Appends an axis-aligned filled rectangle covering `rect`.
    pub fn push_rect(&mut self, rect: PixelRect, color: Color) {
        let r = rect.normalized();
        if r.is_empty() {
            return;
        }
        let (x0, y0) = (r.x as f32, r.y as f32);
        let x1 = (i64::from(r.x) + i64::from(r.w)) as f32;
        let y1 = (i64::from(r.y) + i64::from(r.h)) as f32;
        let color = color.to_array();

        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            PolyVertex { pos: [x0, y0], color },
            PolyVertex { pos: [x1, y0], color },
            PolyVertex { pos: [x1, y1], color },
            PolyVertex { pos: [x0, y1], color },
        ]);
        self.indices
            .extend([0, 1, 2, 0, 2, 3].iter().map(|i| base + i));
    }

    /// Appends a one-pixel outline whose outer edge is `rect`.
    pub fn push_rect_outline(&mut self, rect: PixelRect, color: Color) {
        let r = rect.normalized();
        if r.is_empty() {
            return;
        }
        if r.w <= 2 || r.h <= 2 {
            self.push_rect(r, color);
            return;
        }
        self.push_rect(PixelRect::new(r.x, r.y, r.w, 1), color);
        self.push_rect(PixelRect::new(r.x, r.y.saturating_add(r.h - 1), r.w, 1), color);
        self.push_rect(PixelRect::new(r.x, r.y.saturating_add(1), 1, r.h - 2), color);
        self.push_rect(PixelRect::new(r.x.saturating_add(r.w - 1), r.y.saturating_add(1), 1, r.h - 2), color);
    }

    pub fn vertices(&self) -> &[PolyVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Drops all geometry, keeping allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: i32, y: i32, s: i32) -> [PixelPos; 4] {
        [
            PixelPos::new(x, y),
            PixelPos::new(x + s, y),
            PixelPos::new(x + s, y + s),
            PixelPos::new(x, y + s),
        ]
    }

    #[test]
    fn second_polygon_indices_are_rebased() {
        let mut b = PolygonBatch::new();
        assert_eq!(b.push_polygon(&square(0, 0, 10), Color::BLACK), 2);
        assert_eq!(b.push_polygon(&square(20, 20, 10), Color::WHITE), 2);
        assert_eq!(b.vertices().len(), 8);
        assert_eq!(b.triangle_count(), 4);
        assert!(b.indices()[6..].iter().all(|&i| (4..8).contains(&i)));
    }

    #[test]
    fn vertices_carry_color_and_position() {
        let mut b = PolygonBatch::new();
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        b.push_polygon(&square(5, 6, 2), red);
        assert_eq!(b.vertices()[0], PolyVertex { pos: [5.0, 6.0], color: [1.0, 0.0, 0.0, 1.0] });
    }

    #[test]
    fn degenerate_polygon_adds_nothing() {
        let mut b = PolygonBatch::new();
        let line = [PixelPos::new(0, 0), PixelPos::new(5, 5), PixelPos::new(10, 10)];
        assert_eq!(b.push_polygon(&line, Color::BLACK), 0);
        assert!(b.is_empty());
        assert!(b.vertices().is_empty());
    }

    #[test]
    fn outline_is_four_strips() {
        let mut b = PolygonBatch::new();
        b.push_rect_outline(PixelRect::new(0, 0, 1000, 500), Color::BLACK);
        assert_eq!(b.triangle_count(), 8);

        let xs: Vec<f32> = b.vertices().iter().map(|v| v.pos[0]).collect();
        assert!(xs.iter().all(|&x| (0.0..=1000.0).contains(&x)));
    }

    #[test]
    fn thin_outline_collapses_to_fill() {
        let mut b = PolygonBatch::new();
        b.push_rect_outline(PixelRect::new(0, 0, 2, 40), Color::BLACK);
        assert_eq!(b.triangle_count(), 2);
    }

    #[test]
    fn rect_reaching_past_i32_max_does_not_overflow() {
        let mut b = PolygonBatch::new();
        b.push_rect_outline(PixelRect::new(i32::MAX - 10, i32::MAX - 10, 100, 100), Color::BLACK);
        assert_eq!(b.triangle_count(), 8);
        assert!(b.vertices().iter().all(|v| v.pos[0] >= (i32::MAX - 10) as f32));
    }

    #[test]
    fn clear_empties_geometry() {
        let mut b = PolygonBatch::new();
        b.push_polygon(&square(0, 0, 4), Color::BLACK);
        b.clear();
        assert!(b.is_empty());
        assert!(b.vertices().is_empty());
    }
}
