use glam::Vec3;

use crate::core::Entity;
use crate::settings::NametagSettings;

/// What a single nametag shows this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct NametagInfo {
    pub name: String,
    /// Rounded hit points
    pub health: Option<u32>,
    pub health_fraction: f32,
    /// Latency in milliseconds
    pub ping: Option<u32>,
    /// Meters from the camera
    pub distance: Option<f32>,
}

impl NametagInfo {
    pub fn create_for_entity(entity: &Entity, viewer: Vec3, settings: &NametagSettings) -> Self {
        let health = settings
            .health
            .then(|| entity.health.max(0.0).round() as u32);
        let ping = if settings.ping { entity.ping } else { None };
        let distance = settings
            .distance
            .then(|| entity.position.distance(viewer));

        Self {
            name: entity.name.clone(),
            health,
            health_fraction: entity.health_fraction(),
            ping,
            distance,
        }
    }

    /// Distance, name and ping, e.g. `12m Steve 45ms`. Drawn in the plain
    /// text color; health follows in its own color.
    pub fn label(&self) -> String {
        let mut text = String::new();
        if let Some(distance) = self.distance {
            text.push_str(&format!("{:.0}m ", distance));
        }
        text.push_str(&self.name);
        if let Some(ping) = self.ping {
            text.push_str(&format!(" {}ms", ping));
        }
        text
    }

    pub fn health_text(&self) -> Option<String> {
        self.health.map(|health| format!("{}HP", health))
    }

    /// Green when healthy, yellow when hurt, red when low.
    pub fn health_color(&self) -> [f32; 4] {
        if self.health_fraction > 0.66 {
            [0.33, 1.0, 0.33, 1.0]
        } else if self.health_fraction > 0.33 {
            [1.0, 1.0, 0.33, 1.0]
        } else {
            [1.0, 0.33, 0.33, 1.0]
        }
    }
}
