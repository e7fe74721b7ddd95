//! Per-frame render events and the matrices captured from them.
//!
//! The world pass produces a [`FrameContext`]; the host keeps it in a
//! [`FrameDispatcher`] and hands it to the overlay pass of the same frame.

use glam::{Mat4, Vec2, Vec3};

/// Transform stack as pushed and popped by the world renderer.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
        }
    }

    pub fn with_base(base: Mat4) -> Self {
        Self { stack: vec![base] }
    }

    pub fn push(&mut self) {
        let top = *self.peek();
        self.stack.push(top);
    }

    /// Pops the top entry. The base entry is never removed.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub fn peek(&self) -> &Mat4 {
        // Never empty: the base entry is kept by `pop`
        &self.stack[self.stack.len() - 1]
    }

    pub fn multiply(&mut self, matrix: Mat4) {
        let last = self.stack.len() - 1;
        self.stack[last] *= matrix;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.multiply(Mat4::from_translation(offset));
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Fired once per frame after the world geometry has been drawn.
#[derive(Debug, Clone, Copy)]
pub struct WorldRenderEvent<'a> {
    pub matrix_stack: &'a MatrixStack,
    pub projection: Mat4,
    /// Model-view matrices are camera-relative, so projection needs this
    pub camera_position: Vec3,
}

/// Fired once per frame when 2D overlays are drawn.
#[derive(Debug, Clone, Copy)]
pub struct OverlayRenderEvent {
    /// Fraction of the way between the previous and current tick (0..1)
    pub tick_delta: f32,
    /// Scaled GUI size in pixels
    pub viewport: Vec2,
}

/// Matrices captured from a world render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub model_view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
}

impl FrameContext {
    pub fn capture(event: &WorldRenderEvent<'_>) -> Self {
        Self {
            model_view: *event.matrix_stack.peek(),
            projection: event.projection,
            camera_position: event.camera_position,
        }
    }
}

/// Host-side slot carrying the world pass' context into the overlay pass.
#[derive(Debug, Default)]
pub struct FrameDispatcher {
    current: Option<FrameContext>,
    frames: u64,
}

impl FrameDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the context of the world pass. Replaces any earlier capture.
    pub fn world_rendered(&mut self, context: FrameContext) {
        self.current = Some(context);
    }

    pub fn current(&self) -> Option<&FrameContext> {
        self.current.as_ref()
    }

    pub fn end_frame(&mut self) {
        self.current = None;
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
