//! Score-as-currency and the one-time wall weapon upgrade

use super::state::{GameEvent, SessionState};
use crate::error::{SimError, SimResult};

/// Damage dealt per projectile hit
pub fn damage_per_hit(state: &SessionState) -> i32 {
    if state.has_wall_weapon {
        state.settings.upgraded_damage
    } else {
        state.settings.base_damage
    }
}

/// Minimum time between shots (ms)
pub fn fire_cooldown_ms(state: &SessionState) -> f64 {
    if state.has_wall_weapon {
        state.settings.upgraded_fire_cooldown_ms
    } else {
        state.settings.fire_cooldown_ms
    }
}

/// Buy the wall weapon. Deducts the price, sets the upgrade flag and removes
/// the station from the arena.
pub fn purchase(state: &mut SessionState, events: &mut Vec<GameEvent>) -> SimResult<()> {
    if state.has_wall_weapon {
        return Err(SimError::AlreadyOwned);
    }
    let price = state.settings.wall_weapon_price;
    if state.score < price {
        return Err(SimError::InsufficientFunds {
            score: state.score,
            price,
        });
    }

    state.score -= price;
    state.has_wall_weapon = true;
    if let Some(station) = state.station.take() {
        let _ = state.registry.destroy(station);
    }

    log::info!("Wall weapon purchased for {price}, score now {}", state.score);
    events.push(GameEvent::UpgradePurchased { score: state.score });
    events.push(GameEvent::ScoreChanged { score: state.score });
    Ok(())
}

/// Attempt the purchase; refusals are silent and leave state untouched
pub fn try_purchase_upgrade(state: &mut SessionState, events: &mut Vec<GameEvent>) -> bool {
    match purchase(state, events) {
        Ok(()) => true,
        Err(e) => {
            log::trace!("Upgrade purchase refused: {e}");
            false
        }
    }
}
