// Core module with entities, frame context and vertex types
pub mod core;

// Render module with projection, font metrics and the draw batch
pub mod render;

// Nametags overlay module
pub mod nametags;

// Other modules
pub mod constants;
pub mod error;
pub mod settings;

// Re-exports
pub use constants::*;
pub use crate::core::{
    Entity, EntityId, EntityKind, EntityList, EntityProvider, FrameContext, FrameDispatcher,
    MatrixStack, OverlayRenderEvent, OverlayVertex, WorldRenderEvent,
};
pub use error::{NametagError, SettingsError};
pub use nametags::{NametagInfo, NametagRenderer, NametagsModule, TargetFilter, VisibilityRule};
pub use render::{
    CollectingTarget, FontRenderer, NametagBatch, Projector, RenderTarget, SegmentFont,
    TextSection, WorldToScreen,
};
pub use settings::{NametagSettings, TargetSettings, load_settings, save_settings};
