use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_NAMETAG_SCALE, MAX_NAMETAG_SCALE, MIN_NAMETAG_SCALE, SETTINGS_FILE};
use crate::error::SettingsError;

const MAGIC_HEADER: &[u8; 4] = b"NTGS";
/// Bumped whenever `NametagSettings` changes shape; bincode has no field names
pub const SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NametagSettings {
    pub enabled: bool,
    pub health: bool,
    pub ping: bool,
    pub distance: bool,
    pub border: bool,
    scale: f32,
    pub targets: TargetSettings,
}

impl Default for NametagSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            health: true,
            ping: true,
            distance: false,
            border: true,
            scale: DEFAULT_NAMETAG_SCALE,
            targets: TargetSettings::default(),
        }
    }
}

impl NametagSettings {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) -> Result<(), SettingsError> {
        check_scale(scale)?;
        self.scale = scale;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        check_scale(self.scale)
    }

    /// Option list for the host's settings screen.
    pub fn options(&self) -> Vec<OptionDescriptor> {
        vec![
            OptionDescriptor::boolean("Health", self.health, true),
            OptionDescriptor::boolean("Ping", self.ping, true),
            OptionDescriptor::boolean("Distance", self.distance, false),
            OptionDescriptor::boolean("Border", self.border, true),
            OptionDescriptor {
                name: "Scale",
                value: OptionValue::Float {
                    value: self.scale,
                    default: DEFAULT_NAMETAG_SCALE,
                    min: MIN_NAMETAG_SCALE,
                    max: MAX_NAMETAG_SCALE,
                },
            },
        ]
    }
}

fn check_scale(scale: f32) -> Result<(), SettingsError> {
    if (MIN_NAMETAG_SCALE..=MAX_NAMETAG_SCALE).contains(&scale) {
        Ok(())
    } else {
        Err(SettingsError::ScaleOutOfRange(
            scale,
            MIN_NAMETAG_SCALE,
            MAX_NAMETAG_SCALE,
        ))
    }
}

/// Which entities get a nametag.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TargetSettings {
    pub players: bool,
    pub mobs: bool,
    pub animals: bool,
    pub invisible: bool,
    pub teammates: bool,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            players: true,
            mobs: false,
            animals: false,
            invisible: false,
            teammates: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionValue {
    Bool { value: bool, default: bool },
    Float { value: f32, default: f32, min: f32, max: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionDescriptor {
    pub name: &'static str,
    pub value: OptionValue,
}

impl OptionDescriptor {
    fn boolean(name: &'static str, value: bool, default: bool) -> Self {
        Self {
            name,
            value: OptionValue::Bool { value, default },
        }
    }
}

/// Default settings location in the platform config directory.
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    let dirs = directories::ProjectDirs::from("", "", "nametags").ok_or(SettingsError::NoConfigDir)?;
    Ok(dirs.config_dir().join(SETTINGS_FILE))
}

pub fn save_settings(path: &Path, settings: &NametagSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(MAGIC_HEADER)?;
    writer.write_all(&SETTINGS_VERSION.to_le_bytes())?;
    bincode::serialize_into(&mut writer, settings)?;
    writer.flush()?;
    Ok(())
}

pub fn load_settings(path: &Path) -> Result<NametagSettings, SettingsError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC_HEADER {
        return Err(SettingsError::BadHeader);
    }
    let mut version_bytes = [0u8; 4];
    reader.read_exact(&mut version_bytes)?;
    let version = u32::from_le_bytes(version_bytes);
    if version != SETTINGS_VERSION {
        return Err(SettingsError::UnsupportedVersion(version));
    }

    let settings: NametagSettings = bincode::deserialize_from(&mut reader)?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings, falling back to defaults when the file is missing or unreadable.
pub fn load_or_default(path: &Path) -> NametagSettings {
    match load_settings(path) {
        Ok(settings) => settings,
        Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No settings at {}, using defaults", path.display());
            NametagSettings::default()
        }
        Err(e) => {
            tracing::warn!("Failed to load settings from {}: {}", path.display(), e);
            NametagSettings::default()
        }
    }
}
