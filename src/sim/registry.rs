//! Entity registry
//!
//! Owns every live agent in the session. Handles are generation-checked
//! (`slotmap`), so a handle to a destroyed entity can never alias a newer one:
//! lookups return `None` and mutations fail with [`SimError::StaleReference`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use super::state::{Enemy, HealthBar, Player, Projectile, UpgradeStation};
use crate::error::{SimError, SimResult};

new_key_type! {
    /// Generation-checked entity handle
    pub struct EntityId;
}

/// Entity category, used for filtered iteration and counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
    HealthBar,
    UpgradeStation,
}

/// Kind-specific attributes, fixed at creation
#[derive(Debug, Clone)]
pub enum Body {
    Player(Player),
    Enemy(Enemy),
    Projectile(Projectile),
    HealthBar(HealthBar),
    UpgradeStation(UpgradeStation),
}

/// A registered entity
#[derive(Debug, Clone)]
pub struct Entity {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision bounds (circle radius) for the physics collaborator
    pub radius: f32,
    pub body: Body,
}

impl Entity {
    pub fn new(pos: Vec2, radius: f32, body: Body) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            body,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.body {
            Body::Player(_) => EntityKind::Player,
            Body::Enemy(_) => EntityKind::Enemy,
            Body::Projectile(_) => EntityKind::Projectile,
            Body::HealthBar(_) => EntityKind::HealthBar,
            Body::UpgradeStation(_) => EntityKind::UpgradeStation,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.body {
            Body::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.body {
            Body::Player(p) => Some(p),
            _ => None,
        }
    }
}

/// Registry of active entities
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: SlotMap<EntityId, Entity>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new entity and return its handle
    pub fn spawn(&mut self, pos: Vec2, radius: f32, body: Body) -> EntityId {
        self.entities.insert(Entity::new(pos, radius, body))
    }

    /// Destroy an entity. Destroying an enemy also releases its health bar.
    pub fn destroy(&mut self, id: EntityId) -> SimResult<Entity> {
        let entity = self
            .entities
            .remove(id)
            .ok_or(SimError::StaleReference(id))?;

        if let Body::Enemy(enemy) = &entity.body {
            if let Some(bar) = enemy.health_bar {
                self.entities.remove(bar);
            }
        }
        Ok(entity)
    }

    /// Destroy every entity of a kind
    pub fn destroy_all(&mut self, kind: EntityKind) -> usize {
        let ids = self.ids(kind);
        let count = ids.len();
        for id in ids {
            let _ = self.destroy(id);
        }
        count
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> SimResult<&mut Entity> {
        self.entities
            .get_mut(id)
            .ok_or(SimError::StaleReference(id))
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.get(id).map(Entity::kind)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.get(id).and_then(Entity::as_enemy)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> SimResult<&mut Enemy> {
        match &mut self.get_mut(id)?.body {
            Body::Enemy(enemy) => Ok(enemy),
            _ => Err(SimError::WrongKind(id, "enemy")),
        }
    }

    pub fn player_mut(&mut self, id: EntityId) -> SimResult<&mut Player> {
        match &mut self.get_mut(id)?.body {
            Body::Player(player) => Ok(player),
            _ => Err(SimError::WrongKind(id, "player")),
        }
    }

    pub fn health_bar_mut(&mut self, id: EntityId) -> SimResult<&mut HealthBar> {
        match &mut self.get_mut(id)?.body {
            Body::HealthBar(bar) => Ok(bar),
            _ => Err(SimError::WrongKind(id, "health bar")),
        }
    }

    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) -> SimResult<()> {
        self.get_mut(id)?.vel = vel;
        Ok(())
    }

    pub fn set_position(&mut self, id: EntityId, pos: Vec2) -> SimResult<()> {
        self.get_mut(id)?.pos = pos;
        Ok(())
    }

    /// Visit every active entity of a kind. Destruction is impossible while the
    /// closure holds the registry borrow; collect ids with [`Registry::ids`] and
    /// destroy afterwards instead.
    pub fn for_each_active<F>(&mut self, kind: EntityKind, mut f: F)
    where
        F: FnMut(EntityId, &mut Entity),
    {
        for (id, entity) in self.entities.iter_mut() {
            if entity.kind() == kind {
                f(id, entity);
            }
        }
    }

    pub fn count_active(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind() == kind).count()
    }

    /// Handles of every active entity of a kind, in stable slot order
    pub fn ids(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.kind() == kind)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EnemyKind, Health};

    fn enemy_with_bar(registry: &mut Registry) -> (EntityId, EntityId) {
        let enemy = registry.spawn(
            Vec2::new(10.0, 10.0),
            12.0,
            Body::Enemy(Enemy {
                kind: EnemyKind::Regular,
                health: Some(Health::full(4)),
                round: 1,
                health_bar: None,
            }),
        );
        let bar = registry.spawn(
            Vec2::new(10.0, 0.0),
            0.0,
            Body::HealthBar(HealthBar {
                owner: enemy,
                ratio: 1.0,
            }),
        );
        registry.enemy_mut(enemy).unwrap().health_bar = Some(bar);
        (enemy, bar)
    }

    #[test]
    fn test_destroy_enemy_releases_health_bar() {
        let mut registry = Registry::new();
        let (enemy, bar) = enemy_with_bar(&mut registry);
        assert_eq!(registry.count_active(EntityKind::HealthBar), 1);

        registry.destroy(enemy).unwrap();
        assert!(!registry.contains(enemy));
        assert!(!registry.contains(bar));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut registry = Registry::new();
        let (enemy, _) = enemy_with_bar(&mut registry);
        registry.destroy(enemy).unwrap();

        assert!(matches!(registry.destroy(enemy), Err(SimError::StaleReference(id)) if id == enemy));
        assert!(matches!(
            registry.set_velocity(enemy, Vec2::ONE),
            Err(SimError::StaleReference(_))
        ));
        assert!(registry.get(enemy).is_none());

        // A new entity reusing the slot must not be reachable via the old handle
        let (fresh, _) = enemy_with_bar(&mut registry);
        assert_ne!(fresh, enemy);
        assert!(registry.enemy(enemy).is_none());
    }

    #[test]
    fn test_wrong_kind_access() {
        let mut registry = Registry::new();
        let (_, bar) = enemy_with_bar(&mut registry);
        assert!(matches!(
            registry.enemy_mut(bar),
            Err(SimError::WrongKind(_, "enemy"))
        ));
    }

    #[test]
    fn test_count_and_iterate_by_kind() {
        let mut registry = Registry::new();
        for _ in 0..3 {
            enemy_with_bar(&mut registry);
        }
        assert_eq!(registry.count_active(EntityKind::Enemy), 3);

        let mut visited = 0;
        registry.for_each_active(EntityKind::Enemy, |_, entity| {
            entity.vel = Vec2::X;
            visited += 1;
        });
        assert_eq!(visited, 3);
        assert!(
            registry
                .iter()
                .filter(|(_, e)| e.kind() == EntityKind::Enemy)
                .all(|(_, e)| e.vel == Vec2::X)
        );

        assert_eq!(registry.destroy_all(EntityKind::Enemy), 3);
        assert!(registry.is_empty());
    }
}
