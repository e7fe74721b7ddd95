use thiserror::Error;

/// Failures raised while building a frame's nametags.
#[derive(Error, Debug)]
pub enum NametagError {
    /// Font could not lay out a piece of text
    #[error("Font error: {0}")]
    Font(String),

    /// Nametag geometry came out non-finite (bad position or scale)
    #[error("Invalid nametag geometry at ({x}, {y})")]
    InvalidGeometry { x: f32, y: f32 },
}

/// Settings persistence and validation errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Not a nametag settings file")]
    BadHeader,

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),

    #[error("Scale {0} is outside the allowed range {1}..={2}")]
    ScaleOutOfRange(f32, f32, f32),

    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}
