use glam::Vec2;

use crate::core::OverlayVertex;

/// Queued text, rasterized by the host's glyph renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSection {
    pub text: String,
    /// Top-left corner in viewport pixels
    pub screen_position: Vec2,
    pub color: [f32; 4],
    pub scale: f32,
    pub z: f32,
}

/// Geometry and text accumulated during one overlay pass.
#[derive(Debug, Default, Clone)]
pub struct NametagBatch {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
    pub texts: Vec<TextSection>,
}

impl NametagBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an axis-aligned filled rectangle as two triangles.
    pub fn add_rect(&mut self, min: Vec2, max: Vec2, z: f32, color: [f32; 4]) {
        let base_idx = self.vertices.len() as u32;

        self.vertices.push(OverlayVertex::new(min.x, min.y, z, color));
        self.vertices.push(OverlayVertex::new(max.x, min.y, z, color));
        self.vertices.push(OverlayVertex::new(max.x, max.y, z, color));
        self.vertices.push(OverlayVertex::new(min.x, max.y, z, color));

        self.indices.extend_from_slice(&[
            base_idx,
            base_idx + 1,
            base_idx + 2,
            base_idx,
            base_idx + 2,
            base_idx + 3,
        ]);
    }

    /// Adds the four edges of a rectangle outline, drawn inside `min..max`.
    pub fn add_outline(&mut self, min: Vec2, max: Vec2, thickness: f32, z: f32, color: [f32; 4]) {
        // Top, bottom, left, right
        self.add_rect(min, Vec2::new(max.x, min.y + thickness), z, color);
        self.add_rect(Vec2::new(min.x, max.y - thickness), max, z, color);
        self.add_rect(
            Vec2::new(min.x, min.y + thickness),
            Vec2::new(min.x + thickness, max.y - thickness),
            z,
            color,
        );
        self.add_rect(
            Vec2::new(max.x - thickness, min.y + thickness),
            Vec2::new(max.x, max.y - thickness),
            z,
            color,
        );
    }

    pub fn queue_text(&mut self, section: TextSection) {
        self.texts.push(section);
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.texts.is_empty()
    }

    /// Vertex data ready for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Destination of committed batches.
///
/// `submit` may be called while a panic is unwinding and must not panic
/// itself.
pub trait RenderTarget {
    fn submit(&mut self, batch: NametagBatch);
}

/// Keeps every submitted batch. Useful for headless runs.
#[derive(Debug, Default)]
pub struct CollectingTarget {
    pub batches: Vec<NametagBatch>,
}

impl RenderTarget for CollectingTarget {
    fn submit(&mut self, batch: NametagBatch) {
        self.batches.push(batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_emits_quad() {
        let mut batch = NametagBatch::new();
        batch.add_rect(Vec2::ZERO, Vec2::new(10.0, 5.0), 0.25, [1.0; 4]);

        assert_eq!(batch.vertices.len(), 4);
        assert_eq!(batch.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(batch.vertices.iter().all(|v| v.position[2] == 0.25));
        assert_eq!(
            batch.vertex_bytes().len(),
            4 * std::mem::size_of::<OverlayVertex>()
        );
    }

    #[test]
    fn test_outline_indices_continue_after_existing_geometry() {
        let mut batch = NametagBatch::new();
        batch.add_rect(Vec2::ZERO, Vec2::ONE, 0.0, [0.0; 4]);
        batch.add_outline(Vec2::ZERO, Vec2::new(20.0, 10.0), 1.0, 0.0, [0.0; 4]);

        assert_eq!(batch.vertices.len(), 20);
        assert_eq!(batch.indices.len(), 30);
        assert_eq!(*batch.indices.iter().max().unwrap(), 19);
    }
}
