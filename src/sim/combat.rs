//! Combat resolution
//!
//! The physics collaborator reports raw overlapping pairs; they are classified
//! into [`Contact`]s here and resolved synchronously against the session.

use serde::{Deserialize, Serialize};

use super::economy;
use super::gate;
use super::registry::{EntityId, EntityKind, Registry};
use super::round;
use super::state::{GameEvent, SessionState};
use crate::error::{SimError, SimResult};

/// Unordered pair of overlapping entities, as reported by physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPair {
    pub a: EntityId,
    pub b: EntityId,
}

impl ContactPair {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        Self { a, b }
    }
}

/// A contact the combat rules care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    ProjectileEnemy { projectile: EntityId, enemy: EntityId },
    PlayerEnemy { enemy: EntityId },
    PlayerStation,
}

impl Contact {
    /// Classify a raw pair. Order-independent; `None` for pairs with no rule
    /// (enemy/enemy, projectile/player, ...) or stale handles.
    pub fn classify(registry: &Registry, pair: ContactPair) -> Option<Contact> {
        let ka = registry.kind_of(pair.a)?;
        let kb = registry.kind_of(pair.b)?;
        let (first, second, kind_first, kind_second) = if ka <= kb {
            (pair.a, pair.b, ka, kb)
        } else {
            (pair.b, pair.a, kb, ka)
        };

        match (kind_first, kind_second) {
            (EntityKind::Enemy, EntityKind::Projectile) => Some(Contact::ProjectileEnemy {
                projectile: second,
                enemy: first,
            }),
            (EntityKind::Player, EntityKind::Enemy) => Some(Contact::PlayerEnemy { enemy: second }),
            (EntityKind::Player, EntityKind::UpgradeStation) => Some(Contact::PlayerStation),
            _ => None,
        }
    }
}

/// What a projectile hit did to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Damaged { remaining: i32 },
    Killed,
    /// Target had no health record; removed without score
    Removed,
}

/// Resolve a projectile striking an enemy.
///
/// Fails with [`SimError::StaleReference`] (and changes nothing) if either side
/// was already destroyed earlier in the tick.
pub fn on_projectile_hit_enemy(
    state: &mut SessionState,
    projectile: EntityId,
    enemy: EntityId,
    events: &mut Vec<GameEvent>,
) -> SimResult<HitOutcome> {
    if !state.registry.contains(projectile) {
        return Err(SimError::StaleReference(projectile));
    }
    // Validates the enemy before consuming the projectile
    let (health, bar, boss) = {
        let e = state.registry.enemy_mut(enemy)?;
        (e.health, e.health_bar, e.kind.is_boss())
    };
    state.registry.destroy(projectile)?;

    let outcome = match health {
        Some(mut health) => {
            let damage = economy::damage_per_hit(state);
            let depleted = health.apply_damage(damage);
            state.registry.enemy_mut(enemy)?.health = Some(health);
            state.add_score(state.settings.hit_score);

            let ratio = health.ratio();
            if let Some(bar) = bar {
                if let Ok(bar) = state.registry.health_bar_mut(bar) {
                    bar.ratio = ratio;
                }
            }
            events.push(GameEvent::EnemyDamaged {
                id: enemy,
                remaining: health.current,
                ratio,
            });

            if depleted {
                state.registry.destroy(enemy)?;
                state.add_score(state.settings.kill_score);
                log::debug!("Enemy {enemy:?} killed (boss: {boss})");
                events.push(GameEvent::EnemyKilled { id: enemy, boss });
                HitOutcome::Killed
            } else {
                log::debug!("Enemy {enemy:?} hit for {damage}, {} left", health.current);
                HitOutcome::Damaged {
                    remaining: health.current,
                }
            }
        }
        None => {
            log::warn!("Enemy {enemy:?} has no health record; removing");
            state.registry.destroy(enemy)?;
            events.push(GameEvent::EnemyKilled { id: enemy, boss });
            HitOutcome::Removed
        }
    };

    if outcome != HitOutcome::Removed {
        events.push(GameEvent::ScoreChanged { score: state.score });
    }
    round::advance_if_cleared(state, events);
    Ok(outcome)
}

/// Touching any enemy is fatal
pub fn on_player_hit_enemy(state: &mut SessionState, events: &mut Vec<GameEvent>) {
    gate::trigger(state, events);
}

/// Standing on the station attempts the upgrade purchase
pub fn on_player_overlaps_upgrade_station(
    state: &mut SessionState,
    events: &mut Vec<GameEvent>,
) -> bool {
    economy::try_purchase_upgrade(state, events)
}

/// Resolve one contact. Nothing resolves once the game is over.
pub fn resolve(state: &mut SessionState, contact: Contact, events: &mut Vec<GameEvent>) {
    if state.game_over {
        return;
    }
    match contact {
        Contact::ProjectileEnemy { projectile, enemy } => {
            if let Err(e) = on_projectile_hit_enemy(state, projectile, enemy, events) {
                log::trace!("Skipped projectile contact: {e}");
            }
        }
        Contact::PlayerEnemy { .. } => on_player_hit_enemy(state, events),
        Contact::PlayerStation => {
            on_player_overlaps_upgrade_station(state, events);
        }
    }
}

/// Classify and resolve every reported pair, in order
pub fn resolve_contacts(state: &mut SessionState, pairs: &[ContactPair], events: &mut Vec<GameEvent>) {
    for &pair in pairs {
        if state.game_over {
            break;
        }
        if let Some(contact) = Contact::classify(&state.registry, pair) {
            resolve(state, contact, events);
        }
    }
}
