use crate::core::{Entity, EntityKind, EntityProvider};
use crate::settings::TargetSettings;

/// Decides whether an entity is shown by overlays at all.
pub trait VisibilityRule {
    fn should_be_shown(&self, entity: &Entity) -> bool;
}

/// Target selection driven by the user's target settings.
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    pub targets: TargetSettings,
    /// Team of the local player, for teammate filtering
    pub local_team: Option<String>,
}

impl TargetFilter {
    pub fn new(targets: TargetSettings) -> Self {
        Self {
            targets,
            local_team: None,
        }
    }

    /// Filter for the current world, teamed with its local player.
    pub fn for_world(targets: &TargetSettings, world: &dyn EntityProvider) -> Self {
        Self {
            targets: targets.clone(),
            local_team: world.local_player().and_then(|player| player.team.clone()),
        }
    }

    pub fn with_local_team(mut self, team: impl Into<String>) -> Self {
        self.local_team = Some(team.into());
        self
    }

    fn is_teammate(&self, entity: &Entity) -> bool {
        match (&self.local_team, &entity.team) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }
}

impl VisibilityRule for TargetFilter {
    fn should_be_shown(&self, entity: &Entity) -> bool {
        if entity.local || entity.dead {
            return false;
        }
        if entity.invisible && !self.targets.invisible {
            return false;
        }
        if !self.targets.teammates && self.is_teammate(entity) {
            return false;
        }

        match entity.kind {
            EntityKind::Player => self.targets.players,
            EntityKind::Mob => self.targets.mobs,
            EntityKind::Animal => self.targets.animals,
            EntityKind::Item => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityList;
    use glam::Vec3;

    fn player(name: &str) -> Entity {
        Entity::player(1, name, Vec3::ZERO)
    }

    #[test]
    fn test_default_shows_other_players_only() {
        let filter = TargetFilter::default();

        assert!(filter.should_be_shown(&player("Steve")));
        assert!(!filter.should_be_shown(&player("Zombie").with_kind(EntityKind::Mob)));
        assert!(!filter.should_be_shown(&player("Pig").with_kind(EntityKind::Animal)));
        assert!(!filter.should_be_shown(&player("Sword").with_kind(EntityKind::Item)));
    }

    #[test]
    fn test_local_and_dead_entities_hidden() {
        let filter = TargetFilter::default();

        let mut me = player("Me");
        me.local = true;
        assert!(!filter.should_be_shown(&me));

        let mut dead = player("Ghost");
        dead.dead = true;
        assert!(!filter.should_be_shown(&dead));
    }

    #[test]
    fn test_invisible_requires_setting() {
        let mut sneaky = player("Sneaky");
        sneaky.invisible = true;

        assert!(!TargetFilter::default().should_be_shown(&sneaky));

        let targets = TargetSettings {
            invisible: true,
            ..TargetSettings::default()
        };
        assert!(TargetFilter::new(targets).should_be_shown(&sneaky));
    }

    #[test]
    fn test_teammates_can_be_hidden() {
        let targets = TargetSettings {
            teammates: false,
            ..TargetSettings::default()
        };
        let filter = TargetFilter::new(targets).with_local_team("red");

        assert!(!filter.should_be_shown(&player("Ally").with_team("red")));
        assert!(filter.should_be_shown(&player("Enemy").with_team("blue")));
        assert!(filter.should_be_shown(&player("Loner")));
    }

    #[test]
    fn test_local_team_taken_from_world() {
        let mut me = player("Me").with_team("red");
        me.local = true;
        let world: EntityList = [me, player("Ally").with_team("red")].into_iter().collect();

        let filter = TargetFilter::for_world(&TargetSettings::default(), &world);
        assert_eq!(filter.local_team.as_deref(), Some("red"));

        let alone = TargetFilter::for_world(&TargetSettings::default(), &EntityList::new());
        assert!(alone.local_team.is_none());
    }
}
