//! Round population
//!
//! Enemies are placed by rejection sampling inside the spawn rectangle,
//! keeping at least `min_spawn_distance` from the player. Sampling is capped;
//! when the cap is hit the farthest candidate seen is used instead.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::registry::{Body, EntityId, EntityKind, Registry};
use super::state::{Enemy, EnemyKind, Health, HealthBar};
use crate::distance;
use crate::error::{SimError, SimResult};
use crate::settings::Settings;

/// Rounds that get a boss on top of the regular wave
pub fn is_boss_round(round: u32, settings: &Settings) -> bool {
    round.checked_rem(settings.boss_round_interval) == Some(0)
}

/// Draw one spawn point at least `min_spawn_distance` away from `player_pos`.
///
/// Fails with [`SimError::SpawnPlacementExhausted`] after `max_spawn_attempts`
/// rejected draws; the error carries the farthest candidate.
pub fn sample_spawn_position(
    rng: &mut Pcg32,
    settings: &Settings,
    player_pos: Vec2,
) -> SimResult<Vec2> {
    let min = settings.spawn_min();
    let max = settings.spawn_max();
    let mut best = min;
    let mut best_dist = f32::NEG_INFINITY;

    for _ in 0..settings.max_spawn_attempts {
        let candidate = Vec2::new(
            rng.random_range(min.x..=max.x),
            rng.random_range(min.y..=max.y),
        );
        let d = distance(candidate, player_pos);
        if d >= settings.min_spawn_distance {
            return Ok(candidate);
        }
        if d > best_dist {
            best = candidate;
            best_dist = d;
        }
    }

    Err(SimError::SpawnPlacementExhausted {
        attempts: settings.max_spawn_attempts,
        best,
    })
}

/// Spawn point with the exhausted-sampling fallback applied
fn place(rng: &mut Pcg32, settings: &Settings, player_pos: Vec2) -> Vec2 {
    sample_spawn_position(rng, settings, player_pos).unwrap_or_else(|err| {
        log::warn!("{err}; placing at farthest candidate");
        match err {
            SimError::SpawnPlacementExhausted { best, .. } => best,
            _ => settings.spawn_min(),
        }
    })
}

/// Register an enemy and its health bar
pub fn spawn_enemy(
    registry: &mut Registry,
    settings: &Settings,
    kind: EnemyKind,
    round: u32,
    pos: Vec2,
) -> EntityId {
    let health = Health::full(kind.max_health(round, settings));
    let id = registry.spawn(
        pos,
        kind.radius(),
        Body::Enemy(Enemy {
            kind,
            health: Some(health),
            round,
            health_bar: None,
        }),
    );
    let bar = registry.spawn(
        pos - Vec2::new(0.0, settings.health_bar_offset),
        0.0,
        Body::HealthBar(HealthBar {
            owner: id,
            ratio: health.ratio(),
        }),
    );
    if let Ok(enemy) = registry.enemy_mut(id) {
        enemy.health_bar = Some(bar);
    }
    id
}

/// Replace the current enemy population with the wave for `round`.
///
/// Returns the new enemy handles, regular enemies first, boss (if any) last.
pub fn spawn_round(
    registry: &mut Registry,
    rng: &mut Pcg32,
    settings: &Settings,
    round: u32,
    player_pos: Vec2,
) -> Vec<EntityId> {
    let cleared = registry.destroy_all(EntityKind::Enemy);
    if cleared > 0 {
        log::debug!("Cleared {cleared} leftover enemies before round {round}");
    }

    let mut spawned = Vec::with_capacity(settings.enemies_per_round as usize + 1);
    for _ in 0..settings.enemies_per_round {
        let pos = place(rng, settings, player_pos);
        spawned.push(spawn_enemy(registry, settings, EnemyKind::Regular, round, pos));
    }

    if is_boss_round(round, settings) {
        let pos = place(rng, settings, player_pos);
        spawned.push(spawn_enemy(registry, settings, EnemyKind::Boss, round, pos));
        log::info!(
            "Round {round}: boss spawned with {} hp",
            EnemyKind::Boss.max_health(round, settings)
        );
    }

    log::info!("Round {round}: {} enemies", spawned.len());
    spawned
}
