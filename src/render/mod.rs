//! Rendering-related modules
//! Contains screen projection, font metrics, and the overlay draw batch.

pub mod batch;
pub mod font;
pub mod projection;

// Re-export commonly used types
pub use batch::{CollectingTarget, NametagBatch, RenderTarget, TextSection};
pub use font::{FontRenderer, SegmentFont};
pub use projection::{Projector, WorldToScreen};
