use glam::Vec3;

use crate::constants::NAMETAG_HEAD_OFFSET;
use crate::nametags::visibility::VisibilityRule;

pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Mob,
    Animal,
    Item,
}

/// Snapshot of a world entity as the overlay sees it.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub position: Vec3,
    /// Position at the previous simulation tick
    pub prev_position: Vec3,
    pub eye_height: f32,
    pub health: f32,
    pub max_health: f32,
    /// Latency from the player list, players only
    pub ping: Option<u32>,
    pub invisible: bool,
    pub dead: bool,
    pub team: Option<String>,
    /// The player this client controls
    pub local: bool,
}

impl Entity {
    pub fn player(id: EntityId, name: impl Into<String>, position: Vec3) -> Self {
        Self {
            id,
            name: name.into(),
            kind: EntityKind::Player,
            position,
            prev_position: position,
            eye_height: 1.62,
            health: 20.0,
            max_health: 20.0,
            ping: None,
            invisible: false,
            dead: false,
            team: None,
            local: false,
        }
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_ping(mut self, ping: u32) -> Self {
        self.ping = Some(ping);
        self
    }

    pub fn with_health(mut self, health: f32, max_health: f32) -> Self {
        self.health = health;
        self.max_health = max_health;
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Moves the entity, keeping the old position for interpolation.
    pub fn move_to(&mut self, position: Vec3) {
        self.prev_position = self.position;
        self.position = position;
    }

    pub fn interpolate_current_position(&self, tick_delta: f32) -> Vec3 {
        self.prev_position
            .lerp(self.position, tick_delta.clamp(0.0, 1.0))
    }

    /// World-space point just above the head where the nametag is anchored.
    pub fn nametag_anchor(&self, tick_delta: f32) -> Vec3 {
        self.interpolate_current_position(tick_delta)
            + Vec3::new(0.0, self.eye_height + NAMETAG_HEAD_OFFSET, 0.0)
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// Supplies the entities that are candidates for highlighting this frame.
pub trait EntityProvider {
    fn find_rendered_entities<'a>(&'a self, rule: &dyn VisibilityRule) -> Vec<&'a Entity>;

    /// The player this client controls, if it is in the world
    fn local_player(&self) -> Option<&Entity>;
}

/// In-memory entity list, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct EntityList {
    entities: Vec<Entity>,
}

impl EntityList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<Entity> for EntityList {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

impl EntityProvider for EntityList {
    fn find_rendered_entities<'a>(&'a self, rule: &dyn VisibilityRule) -> Vec<&'a Entity> {
        self.entities
            .iter()
            .filter(|entity| rule.should_be_shown(entity))
            .collect()
    }

    fn local_player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.local)
    }
}
