//! Game balance settings
//!
//! Every tunable the simulation reads lives here. Defaults mirror
//! [`crate::consts`]; a JSON file may override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Game settings/balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Spawn points are sampled from the arena shrunk by this margin
    pub spawn_margin: f32,

    // === Spawning ===
    pub min_spawn_distance: f32,
    pub max_spawn_attempts: u32,
    pub enemies_per_round: u32,
    pub boss_round_interval: u32,
    pub zombie_health: i32,
    pub boss_health: i32,

    // === Economy ===
    pub wall_weapon_price: u64,
    pub hit_score: u64,
    pub kill_score: u64,

    // === Weapon ===
    pub fire_cooldown_ms: f64,
    pub upgraded_fire_cooldown_ms: f64,
    pub base_damage: i32,
    pub upgraded_damage: i32,

    // === Movement ===
    pub chase_speed: f32,
    pub projectile_speed: f32,
    pub player_speed: f32,

    // === Layout ===
    pub player_start: (f32, f32),
    pub upgrade_station_pos: (f32, f32),
    pub health_bar_offset: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            spawn_margin: SPAWN_MARGIN,

            min_spawn_distance: MIN_SPAWN_DISTANCE,
            max_spawn_attempts: MAX_SPAWN_ATTEMPTS,
            enemies_per_round: ENEMIES_PER_ROUND,
            boss_round_interval: BOSS_ROUND_INTERVAL,
            zombie_health: ZOMBIE_HEALTH,
            boss_health: BOSS_HEALTH,

            wall_weapon_price: WALL_WEAPON_PRICE,
            hit_score: HIT_SCORE,
            kill_score: KILL_SCORE,

            fire_cooldown_ms: FIRE_COOLDOWN_MS,
            upgraded_fire_cooldown_ms: UPGRADED_FIRE_COOLDOWN_MS,
            base_damage: BASE_DAMAGE,
            upgraded_damage: UPGRADED_DAMAGE,

            chase_speed: CHASE_SPEED,
            projectile_speed: PROJECTILE_SPEED,
            player_speed: PLAYER_SPEED,

            player_start: PLAYER_START,
            upgrade_station_pos: UPGRADE_STATION_POS,
            health_bar_offset: HEALTH_BAR_OFFSET,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |msg: &str| Err(SimError::InvalidSettings(msg.to_string()));

        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return invalid("arena dimensions must be positive");
        }
        if self.spawn_margin < 0.0
            || self.spawn_margin * 2.0 > self.arena_width
            || self.spawn_margin * 2.0 > self.arena_height
        {
            return invalid("spawn margin leaves no spawn area");
        }
        if self.min_spawn_distance < 0.0 {
            return invalid("min_spawn_distance must not be negative");
        }
        if self.max_spawn_attempts == 0 {
            return invalid("max_spawn_attempts must be at least 1");
        }
        if self.enemies_per_round == 0 {
            return invalid("enemies_per_round must be at least 1");
        }
        if self.boss_round_interval == 0 {
            return invalid("boss_round_interval must be at least 1");
        }
        if self.zombie_health < 0 || self.boss_health < 0 {
            return invalid("base health must not be negative");
        }
        if self.fire_cooldown_ms <= 0.0 || self.upgraded_fire_cooldown_ms <= 0.0 {
            return invalid("fire cooldowns must be positive");
        }
        if self.base_damage <= 0 || self.upgraded_damage <= 0 {
            return invalid("damage must be positive");
        }
        Ok(())
    }

    pub fn arena_min(&self) -> Vec2 {
        Vec2::ZERO
    }

    pub fn arena_max(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Lower corner of the spawn rectangle
    pub fn spawn_min(&self) -> Vec2 {
        Vec2::splat(self.spawn_margin)
    }

    /// Upper corner of the spawn rectangle
    pub fn spawn_max(&self) -> Vec2 {
        self.arena_max() - Vec2::splat(self.spawn_margin)
    }

    pub fn player_start(&self) -> Vec2 {
        Vec2::from(self.player_start)
    }

    pub fn upgrade_station_pos(&self) -> Vec2 {
        Vec2::from(self.upgrade_station_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.spawn_min(), Vec2::new(100.0, 100.0));
        assert_eq!(settings.spawn_max(), Vec2::new(700.0, 500.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "wall_weapon_price": 500 }"#).unwrap();
        assert_eq!(settings.wall_weapon_price, 500);
        assert_eq!(settings.min_spawn_distance, MIN_SPAWN_DISTANCE);
    }

    #[test]
    fn test_rejects_oversized_margin() {
        let result = Settings::from_json(r#"{ "spawn_margin": 350 }"#);
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_rejects_empty_rounds() {
        let result = Settings::from_json(r#"{ "enemies_per_round": 0 }"#);
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Settings::from_json("{"), Err(SimError::Json(_))));
    }
}
