use glam::{Vec2, Vec3, Vec4};

use crate::core::FrameContext;

/// Maps a world position to screen space for the current frame.
pub trait Projector {
    /// Returns `(x, y, depth)` with x/y in viewport pixels (y down), or `None`
    /// when the point cannot be placed on screen.
    fn project(&self, world_pos: Vec3, frame: &FrameContext, viewport: Vec2) -> Option<Vec3>;
}

/// Perspective projection with divide-by-w, OpenGL clip conventions.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorldToScreen;

impl WorldToScreen {
    pub fn calculate_screen_pos(world_pos: Vec3, frame: &FrameContext, viewport: Vec2) -> Option<Vec3> {
        let relative = world_pos - frame.camera_position;
        let clip_pos =
            frame.projection * frame.model_view * Vec4::new(relative.x, relative.y, relative.z, 1.0);

        // Behind the camera
        if clip_pos.w <= 0.0 {
            return None;
        }

        let ndc = clip_pos.truncate() / clip_pos.w;
        if !ndc.is_finite() || ndc.z.abs() > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) / 2.0 * viewport.x;
        let screen_y = (1.0 - ndc.y) / 2.0 * viewport.y;

        Some(Vec3::new(screen_x, screen_y, ndc.z))
    }
}

impl Projector for WorldToScreen {
    fn project(&self, world_pos: Vec3, frame: &FrameContext, viewport: Vec2) -> Option<Vec3> {
        Self::calculate_screen_pos(world_pos, frame, viewport)
    }
}
