//! Round Survivor - a single-screen round-based arcade survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, combat, rounds, economy)
//! - `settings`: Data-driven game balance, loadable from JSON
//! - `error`: Error taxonomy shared by the simulation and configuration
//!
//! Rendering, input polling and rigid-body physics are external collaborators:
//! the core reads a [`sim::TickInput`] per frame, consumes contacts reported by a
//! [`sim::Physics`] implementation and hands [`sim::Snapshot`]s back.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (logical units)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Inset from the arena edge used when sampling enemy spawn points
    pub const SPAWN_MARGIN: f32 = 100.0;

    /// Enemies may never appear closer than this to the player
    pub const MIN_SPAWN_DISTANCE: f32 = 200.0;
    /// Rejection-sampling cap before falling back to the farthest candidate
    pub const MAX_SPAWN_ATTEMPTS: u32 = 64;

    /// Base health values; both scale with the round number
    pub const ZOMBIE_HEALTH: i32 = 3;
    pub const BOSS_HEALTH: i32 = 20;
    pub const ENEMIES_PER_ROUND: u32 = 10;
    /// A boss joins every Nth round
    pub const BOSS_ROUND_INTERVAL: u32 = 10;

    /// Economy
    pub const WALL_WEAPON_PRICE: u64 = 1000;
    pub const HIT_SCORE: u64 = 10;
    pub const KILL_SCORE: u64 = 100;

    /// Weapon
    pub const FIRE_COOLDOWN_MS: f64 = 200.0;
    pub const UPGRADED_FIRE_COOLDOWN_MS: f64 = 100.0;
    pub const BASE_DAMAGE: i32 = 1;
    pub const UPGRADED_DAMAGE: i32 = 2;

    /// Speeds (units per second)
    pub const CHASE_SPEED: f32 = 50.0;
    pub const PROJECTILE_SPEED: f32 = 600.0;
    pub const PLAYER_SPEED: f32 = 160.0;

    /// Fixed positions
    pub const PLAYER_START: (f32, f32) = (400.0, 300.0);
    pub const UPGRADE_STATION_POS: (f32, f32) = (700.0, 500.0);
    /// Health bars float this far above their enemy
    pub const HEALTH_BAR_OFFSET: f32 = 10.0;

    /// Collision bounds handed to the physics collaborator (circle radii)
    pub const PLAYER_RADIUS: f32 = 12.0;
    pub const ENEMY_RADIUS: f32 = 12.0;
    pub const BOSS_RADIUS: f32 = 16.0;
    pub const PROJECTILE_RADIUS: f32 = 3.0;
    pub const STATION_RADIUS: f32 = 18.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Clamp a point into the axis-aligned rectangle `[min, max]`
#[inline]
pub fn clamp_to_rect(p: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    p.clamp(min, max)
}

/// True if `p` lies inside the rectangle `[min, max]` (inclusive)
#[inline]
pub fn in_rect(p: Vec2, min: Vec2, max: Vec2) -> bool {
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}
