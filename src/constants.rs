// Nametag placement
pub const NAMETAG_HEAD_OFFSET: f32 = 0.55;
pub const NAMETAG_PADDING: f32 = 2.0;
pub const NAMETAG_BORDER_WIDTH: f32 = 1.0;

// Colors (RGBA)
pub const NAMETAG_BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
pub const NAMETAG_BORDER: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const NAMETAG_TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// Settings defaults and bounds
pub const DEFAULT_NAMETAG_SCALE: f32 = 2.0;
pub const MIN_NAMETAG_SCALE: f32 = 1.0;
pub const MAX_NAMETAG_SCALE: f32 = 4.0;

// Segment font metrics (unscaled, in GUI pixels)
pub const GLYPH_ADVANCE: f32 = 6.0;
pub const SPACE_ADVANCE: f32 = 4.0;
pub const GLYPH_HEIGHT: f32 = 9.0;

pub const SETTINGS_FILE: &str = "nametags.bin";
