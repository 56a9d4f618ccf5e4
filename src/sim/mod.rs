//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (slot order in the registry)
//! - No rendering, input polling or physics dependencies

pub mod combat;
pub mod economy;
pub mod gate;
pub mod registry;
pub mod round;
pub mod spawn;
pub mod state;
pub mod tick;

pub use combat::{Contact, ContactPair, HitOutcome};
pub use economy::try_purchase_upgrade;
pub use registry::{Body, Entity, EntityId, EntityKind, Registry};
pub use spawn::spawn_round;
pub use state::{
    Enemy, EnemyKind, GameEvent, Health, HealthBar, Player, Projectile, SessionState,
    UpgradeStation,
};
pub use tick::{EntitySnapshot, Hud, Physics, Snapshot, TickInput, snapshot, tick};
