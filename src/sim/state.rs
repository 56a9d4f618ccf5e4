//! Session state and core simulation types
//!
//! Everything a running session owns lives in [`SessionState`]: the entity
//! registry, the seeded RNG, and the scalar progression values (round,
//! score, upgrade, game over).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::registry::{Body, EntityId, EntityKind, Registry};
use super::spawn;
use crate::consts::*;
use crate::error::SimResult;
use crate::settings::Settings;

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub alive: bool,
}

/// Enemy variant; decides the health scaling formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Regular,
    Boss,
}

impl EnemyKind {
    /// Max health of this variant when spawned in `round`
    pub fn max_health(self, round: u32, settings: &Settings) -> i32 {
        let round = i32::try_from(round).unwrap_or(i32::MAX);
        match self {
            EnemyKind::Regular => settings.zombie_health.saturating_add(round),
            EnemyKind::Boss => settings.boss_health.saturating_add(round.saturating_mul(2)),
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            EnemyKind::Regular => ENEMY_RADIUS,
            EnemyKind::Boss => BOSS_RADIUS,
        }
    }

    pub fn is_boss(self) -> bool {
        self == EnemyKind::Boss
    }
}

/// Current/max hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Fraction of health left, in `[0, 1]`
    pub fn ratio(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }

    /// Subtract damage, clamping at zero. Returns true if this hit depleted it.
    pub fn apply_damage(&mut self, damage: i32) -> bool {
        debug_assert!(damage > 0, "damage must be positive");
        debug_assert!(self.current > 0, "damaging an already depleted enemy");
        self.current = (self.current - damage.max(0)).max(0);
        self.current == 0
    }
}

/// A chasing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// `None` only for malformed entities; such enemies die to any hit
    pub health: Option<Health>,
    /// Round this enemy was spawned for
    pub round: u32,
    pub health_bar: Option<EntityId>,
}

/// A fired shot; travels in a straight line until it hits or leaves the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub dir: Vec2,
    pub speed: f32,
}

/// Health display attached to an enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthBar {
    pub owner: EntityId,
    pub ratio: f32,
}

/// Wall-mounted weapon the player can buy by walking into it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeStation {
    pub price: u64,
}

/// Events emitted for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ProjectileFired { id: EntityId },
    EnemyDamaged { id: EntityId, remaining: i32, ratio: f32 },
    EnemyKilled { id: EntityId, boss: bool },
    ScoreChanged { score: u64 },
    RoundAdvanced { round: u32 },
    BossSpawned { id: EntityId, round: u32 },
    UpgradePurchased { score: u64 },
    GameOver { round: u32, score: u64 },
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct SessionState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub registry: Registry,
    pub player: EntityId,
    /// Removed once the upgrade has been bought
    pub station: Option<EntityId>,
    /// Current round (1-based, only ever increases)
    pub round: u32,
    /// Score doubles as currency
    pub score: u64,
    pub has_wall_weapon: bool,
    /// Terminal; only a restart clears it
    pub game_over: bool,
    /// Earliest time (ms) strictly after which the next shot may fire
    pub last_fired: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SessionState {
    /// Start a session with default balance
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Settings::default())
    }

    /// Start a session with custom balance; rejects settings that fail
    /// [`Settings::validate`]
    pub fn with_settings(seed: u64, settings: Settings) -> SimResult<Self> {
        settings.validate()?;
        Ok(Self::build(seed, settings))
    }

    /// Place the player and upgrade station, spawn round 1.
    /// `settings` must already be valid.
    fn build(seed: u64, settings: Settings) -> Self {
        let mut registry = Registry::new();
        let player_pos = settings.player_start();
        let player = registry.spawn(player_pos, PLAYER_RADIUS, Body::Player(Player { alive: true }));
        let station = registry.spawn(
            settings.upgrade_station_pos(),
            STATION_RADIUS,
            Body::UpgradeStation(UpgradeStation {
                price: settings.wall_weapon_price,
            }),
        );

        let mut state = Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            registry,
            player,
            station: Some(station),
            round: 1,
            score: 0,
            has_wall_weapon: false,
            game_over: false,
            last_fired: 0.0,
            time_ticks: 0,
        };

        spawn::spawn_round(
            &mut state.registry,
            &mut state.rng,
            &state.settings,
            state.round,
            player_pos,
        );
        log::info!("Session started (seed {seed})");
        state
    }

    /// Full session restart; the only way out of game over
    pub fn restart(&mut self, seed: u64) {
        *self = Self::build(seed, self.settings.clone());
    }

    pub fn player_pos(&self) -> Vec2 {
        self.registry
            .get(self.player)
            .map(|e| e.pos)
            .unwrap_or_else(|| self.settings.player_start())
    }

    pub fn player_alive(&self) -> bool {
        self.registry
            .get(self.player)
            .and_then(|e| e.as_player())
            .is_some_and(|p| p.alive)
    }

    pub fn enemy_count(&self) -> usize {
        self.registry.count_active(EntityKind::Enemy)
    }

    pub fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }
}
