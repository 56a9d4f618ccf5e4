//! Game-over gate
//!
//! One-way switch. Once tripped, [`super::tick`] skips all simulation work
//! until the session is restarted.

use glam::Vec2;

use super::registry::Body;
use super::state::{GameEvent, SessionState};

/// Freeze the session. Calling it again changes nothing.
pub fn trigger(state: &mut SessionState, events: &mut Vec<GameEvent>) {
    if state.game_over {
        return;
    }
    state.game_over = true;

    if let Ok(player) = state.registry.player_mut(state.player) {
        player.alive = false;
    }

    // Halt every body in place, like pausing the physics world
    for (_, entity) in state.registry.iter_mut() {
        entity.vel = Vec2::ZERO;
        if let Body::Projectile(p) = &mut entity.body {
            p.speed = 0.0;
        }
    }

    log::info!("Game over in round {} with score {}", state.round, state.score);
    events.push(GameEvent::GameOver {
        round: state.round,
        score: state.score,
    });
}
