//! Round progression
//!
//! A single `Active(round)` state. The only transition, `round -> round + 1`,
//! fires when the enemy population reaches exactly zero.

use super::registry::EntityKind;
use super::spawn::{self, is_boss_round};
use super::state::{GameEvent, SessionState};

/// Advance to the next round if the current one is cleared.
///
/// Returns the new round number, or `None` while enemies remain.
pub fn advance_if_cleared(state: &mut SessionState, events: &mut Vec<GameEvent>) -> Option<u32> {
    if state.registry.count_active(EntityKind::Enemy) != 0 {
        return None;
    }

    state.round = state.round.saturating_add(1);
    let round = state.round;
    let player_pos = state.player_pos();
    let spawned = spawn::spawn_round(
        &mut state.registry,
        &mut state.rng,
        &state.settings,
        round,
        player_pos,
    );

    log::info!("Round {round} begins");
    events.push(GameEvent::RoundAdvanced { round });
    if is_boss_round(round, &state.settings) {
        if let Some(&boss) = spawned.last() {
            events.push(GameEvent::BossSpawned { id: boss, round });
        }
    }
    Some(round)
}
