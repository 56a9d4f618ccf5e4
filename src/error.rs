//! Error taxonomy
//!
//! The simulation is closed, so the list is short. Invariant faults
//! (negative health, round mis-tracking) are not errors: they are
//! `debug_assert!`ed and clamped.

use glam::Vec2;
use thiserror::Error;

use crate::sim::EntityId;

#[derive(Debug, Error)]
pub enum SimError {
    /// Operation targeted an entity that has already been destroyed
    #[error("stale entity reference {0:?}")]
    StaleReference(EntityId),

    /// Entity exists but is not of the kind the operation expects
    #[error("entity {0:?} is not a {1}")]
    WrongKind(EntityId, &'static str),

    #[error("insufficient funds: score {score} < price {price}")]
    InsufficientFunds { score: u64, price: u64 },

    #[error("upgrade already owned")]
    AlreadyOwned,

    /// Bounded rejection sampling found no position far enough from the player.
    /// `best` is the farthest candidate seen, used as the fallback placement.
    #[error("spawn placement exhausted after {attempts} attempts (best candidate {best})")]
    SpawnPlacementExhausted { attempts: u32, best: Vec2 },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings io: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
