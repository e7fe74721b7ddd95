//! Core data structures for the overlay
//! Contains entities, per-frame render context, and vertex types.

pub mod entity;
pub mod frame;
pub mod vertex;

// Re-export commonly used types
pub use entity::{Entity, EntityId, EntityKind, EntityList, EntityProvider};
pub use frame::{FrameContext, FrameDispatcher, MatrixStack, OverlayRenderEvent, WorldRenderEvent};
pub use vertex::OverlayVertex;
