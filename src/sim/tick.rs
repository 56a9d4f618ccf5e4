//! Per-frame simulation tick
//!
//! Order within one tick:
//! 1. input intents (movement, firing) and enemy chase velocities
//! 2. physics collaborator step (motion + overlap reporting)
//! 3. arena bounds (player clamp, projectile despawn)
//! 4. contact resolution, including any round advance and respawn
//! 5. health bar position sync

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::combat::{self, ContactPair};
use super::economy;
use super::registry::{Body, EntityId, EntityKind, Registry};
use super::state::{GameEvent, Projectile, SessionState};
use crate::consts::PROJECTILE_RADIUS;
use crate::{clamp_to_rect, in_rect};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Movement direction, each axis in {-1, 0, 1}
    pub move_dir: IVec2,
    /// Fire trigger held
    pub fire: bool,
    /// Aim point in arena coordinates
    pub pointer: Vec2,
    /// Monotonic clock (ms)
    pub time_ms: f64,
}

/// External 2D physics: integrates motion and reports overlaps.
/// The core never computes geometric intersection itself.
pub trait Physics {
    fn step(&mut self, registry: &mut Registry, dt: f32) -> Vec<ContactPair>;
}

/// Advance the session by one frame. Does nothing once the game is over.
pub fn tick<P: Physics + ?Sized>(
    state: &mut SessionState,
    input: &TickInput,
    dt: f32,
    physics: &mut P,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.game_over {
        return events;
    }

    state.time_ticks += 1;

    apply_input(state, input, &mut events);
    update_chase(state);

    let pairs = physics.step(&mut state.registry, dt);
    enforce_bounds(state);
    combat::resolve_contacts(state, &pairs, &mut events);

    sync_health_bars(state);
    events
}

/// Player velocity from the move intent, then a shot if the cooldown allows
pub fn apply_input(state: &mut SessionState, input: &TickInput, events: &mut Vec<GameEvent>) {
    if state.game_over {
        return;
    }

    let dir = input.move_dir.clamp(IVec2::NEG_ONE, IVec2::ONE).as_vec2();
    let _ = state
        .registry
        .set_velocity(state.player, dir * state.settings.player_speed);

    if input.fire && input.time_ms > state.last_fired {
        if let Some(id) = fire_projectile(state, input.pointer) {
            state.last_fired = input.time_ms + economy::fire_cooldown_ms(state);
            events.push(GameEvent::ProjectileFired { id });
        }
    }
}

/// Launch a projectile from the player toward `target`.
/// Aiming at the player's own position fires nothing.
fn fire_projectile(state: &mut SessionState, target: Vec2) -> Option<EntityId> {
    let origin = state.player_pos();
    let dir = (target - origin).normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }

    let speed = state.settings.projectile_speed;
    let id = state.registry.spawn(
        origin,
        PROJECTILE_RADIUS,
        Body::Projectile(Projectile { dir, speed }),
    );
    let _ = state.registry.set_velocity(id, dir * speed);
    Some(id)
}

/// Point every enemy at the player
pub fn update_chase(state: &mut SessionState) {
    if state.game_over {
        return;
    }
    let target = state.player_pos();
    let speed = state.settings.chase_speed;
    state
        .registry
        .for_each_active(EntityKind::Enemy, |_, enemy| {
            enemy.vel = (target - enemy.pos).normalize_or_zero() * speed;
        });
}

/// Keep the player inside the arena; drop projectiles that left it
pub fn enforce_bounds(state: &mut SessionState) {
    let min = state.settings.arena_min();
    let max = state.settings.arena_max();

    if let Ok(player) = state.registry.get_mut(state.player) {
        player.pos = clamp_to_rect(player.pos, min, max);
    }

    let escaped: Vec<EntityId> = state
        .registry
        .iter()
        .filter(|(_, e)| e.kind() == EntityKind::Projectile && !in_rect(e.pos, min, max))
        .map(|(id, _)| id)
        .collect();
    for id in escaped {
        let _ = state.registry.destroy(id);
    }
}

/// Move each health bar above its owner
pub fn sync_health_bars(state: &mut SessionState) {
    let offset = Vec2::new(0.0, state.settings.health_bar_offset);
    let updates: Vec<(EntityId, Option<Vec2>)> = state
        .registry
        .iter()
        .filter_map(|(id, e)| match &e.body {
            Body::HealthBar(bar) => Some((id, state.registry.get(bar.owner).map(|o| o.pos))),
            _ => None,
        })
        .collect();

    for (bar, owner_pos) in updates {
        match owner_pos {
            Some(pos) => {
                let _ = state.registry.set_position(bar, pos - offset);
            }
            None => {
                log::warn!("Health bar {bar:?} outlived its enemy; removing");
                let _ = state.registry.destroy(bar);
            }
        }
    }
}

/// Render-facing view of one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub health_ratio: Option<f32>,
    pub boss: bool,
}

/// HUD scalars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub round: u32,
    pub score: u64,
    pub has_wall_weapon: bool,
}

/// Everything the presentation layer needs to draw a frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub entities: Vec<EntitySnapshot>,
    pub hud: Hud,
    pub game_over: bool,
}

pub fn snapshot(state: &SessionState) -> Snapshot {
    let entities = state
        .registry
        .iter()
        .map(|(id, e)| {
            let (health_ratio, boss) = match &e.body {
                Body::Enemy(enemy) => (enemy.health.map(|h| h.ratio()), enemy.kind.is_boss()),
                Body::HealthBar(bar) => (Some(bar.ratio), false),
                _ => (None, false),
            };
            EntitySnapshot {
                id,
                kind: e.kind(),
                pos: e.pos,
                health_ratio,
                boss,
            }
        })
        .collect();

    Snapshot {
        entities,
        hud: Hud {
            round: state.round,
            score: state.score,
            has_wall_weapon: state.has_wall_weapon,
        },
        game_over: state.game_over,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Moves bodies by velocity and replays a queue of scripted contacts
    #[derive(Default)]
    struct ScriptedPhysics {
        queued: Vec<Vec<ContactPair>>,
    }

    impl Physics for ScriptedPhysics {
        fn step(&mut self, registry: &mut Registry, dt: f32) -> Vec<ContactPair> {
            for (_, e) in registry.iter_mut() {
                e.pos += e.vel * dt;
            }
            if self.queued.is_empty() {
                Vec::new()
            } else {
                self.queued.remove(0)
            }
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn fire_at(time_ms: f64) -> TickInput {
        TickInput {
            fire: true,
            pointer: Vec2::new(800.0, 300.0),
            time_ms,
            ..Default::default()
        }
    }

    #[test]
    fn test_movement_intent() {
        let mut state = SessionState::new(1);
        let mut physics = ScriptedPhysics::default();
        let input = TickInput {
            move_dir: IVec2::new(1, -1),
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut physics);

        let player = state.registry.get(state.player).unwrap();
        assert_eq!(player.vel, Vec2::new(160.0, -160.0));
        assert!(player.pos.x > 400.0 && player.pos.y < 300.0);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut state = SessionState::new(1);
        let mut physics = ScriptedPhysics::default();

        let events = tick(&mut state, &fire_at(16.0), DT, &mut physics);
        assert!(matches!(events.as_slice(), [GameEvent::ProjectileFired { .. }]));
        assert_eq!(state.last_fired, 216.0);

        // Inside the window: nothing
        assert!(tick(&mut state, &fire_at(100.0), DT, &mut physics).is_empty());
        assert!(tick(&mut state, &fire_at(216.0), DT, &mut physics).is_empty());
        // Strictly after: fires again
        assert_eq!(tick(&mut state, &fire_at(217.0), DT, &mut physics).len(), 1);
        assert_eq!(state.registry.count_active(EntityKind::Projectile), 2);
    }

    #[test]
    fn test_upgraded_cooldown() {
        let mut state = SessionState::new(1);
        state.has_wall_weapon = true;
        let mut physics = ScriptedPhysics::default();
        tick(&mut state, &fire_at(16.0), DT, &mut physics);
        assert_eq!(state.last_fired, 116.0);
    }

    #[test]
    fn test_projectile_heads_for_pointer() {
        let mut state = SessionState::new(1);
        let mut physics = ScriptedPhysics::default();
        tick(&mut state, &fire_at(1.0), DT, &mut physics);

        let shot = state.registry.ids(EntityKind::Projectile)[0];
        assert_eq!(state.registry.get(shot).unwrap().vel, Vec2::new(600.0, 0.0));
    }

    #[test]
    fn test_pointer_on_player_fires_nothing() {
        let mut state = SessionState::new(1);
        let mut physics = ScriptedPhysics::default();
        let input = TickInput {
            fire: true,
            pointer: state.player_pos(),
            time_ms: 10.0,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0, &mut physics);
        assert_eq!(state.registry.count_active(EntityKind::Projectile), 0);
        assert_eq!(state.last_fired, 0.0);
    }

    #[test]
    fn test_projectiles_despawn_outside_arena() {
        let mut state = SessionState::new(1);
        let mut physics = ScriptedPhysics::default();
        tick(&mut state, &fire_at(1.0), DT, &mut physics);
        assert_eq!(state.registry.count_active(EntityKind::Projectile), 1);

        // 600 u/s from x=400 leaves the arena within a second
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT, &mut physics);
        }
        assert_eq!(state.registry.count_active(EntityKind::Projectile), 0);
    }

    #[test]
    fn test_player_clamped_to_arena() {
        let mut state = SessionState::new(1);
        let mut physics = ScriptedPhysics::default();
        let input = TickInput {
            move_dir: IVec2::new(-1, 0),
            ..Default::default()
        };
        // 160 u/s for 5s would reach x = -400 unclamped
        for _ in 0..300 {
            tick(&mut state, &input, DT, &mut physics);
            if state.game_over {
                break;
            }
        }
        assert!(state.player_pos().x >= 0.0);
    }

    #[test]
    fn test_enemies_chase_and_bars_follow() {
        let mut state = SessionState::new(1);
        let mut physics = ScriptedPhysics::default();
        tick(&mut state, &TickInput::default(), DT, &mut physics);

        let player = state.player_pos();
        for (_, e) in state.registry.iter() {
            match &e.body {
                Body::Enemy(_) => {
                    assert!((e.vel.length() - 50.0).abs() < 1e-3);
                    assert!(e.vel.dot(player - e.pos) > 0.0);
                }
                Body::HealthBar(bar) => {
                    let owner = state.registry.get(bar.owner).unwrap();
                    assert_eq!(e.pos, owner.pos - Vec2::new(0.0, 10.0));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_last_kill_respawns_with_synced_bars() {
        let mut state = SessionState::new(1);
        let enemies = state.registry.ids(EntityKind::Enemy);
        let (&last, rest) = enemies.split_last().unwrap();
        for &id in rest {
            state.registry.destroy(id).unwrap();
        }
        if let Some(health) = state.registry.enemy_mut(last).unwrap().health.as_mut() {
            health.current = 1;
        }

        let at = state.registry.get(last).unwrap().pos;
        let shot = state.registry.spawn(
            at,
            PROJECTILE_RADIUS,
            Body::Projectile(Projectile {
                dir: Vec2::X,
                speed: 0.0,
            }),
        );
        let mut physics = ScriptedPhysics {
            queued: vec![vec![ContactPair::new(shot, last)]],
        };
        let events = tick(&mut state, &TickInput::default(), DT, &mut physics);

        assert_eq!(state.round, 2);
        assert!(events.contains(&GameEvent::RoundAdvanced { round: 2 }));
        assert_eq!(state.enemy_count(), 10);
        assert_eq!(state.registry.count_active(EntityKind::HealthBar), 10);
        for (_, e) in state.registry.iter() {
            if let Body::HealthBar(bar) = &e.body {
                let owner = state.registry.get(bar.owner).unwrap();
                assert_eq!(e.pos, owner.pos - Vec2::new(0.0, 10.0));
            }
        }
    }

    #[test]
    fn test_game_over_freezes_ticks() {
        let mut state = SessionState::new(1);
        let enemy = state.registry.ids(EntityKind::Enemy)[0];
        let mut physics = ScriptedPhysics {
            queued: vec![vec![ContactPair::new(state.player, enemy)]],
        };
        let events = tick(&mut state, &TickInput::default(), DT, &mut physics);
        assert!(state.game_over);
        assert!(matches!(events.last(), Some(GameEvent::GameOver { round: 1, score: 0 })));

        let before: Vec<_> = state.registry.iter().map(|(id, e)| (id, e.pos, e.vel)).collect();
        let ticks = state.time_ticks;
        let input = TickInput {
            move_dir: IVec2::new(1, 1),
            fire: true,
            pointer: Vec2::ZERO,
            time_ms: 10_000.0,
        };
        for _ in 0..10 {
            assert!(tick(&mut state, &input, DT, &mut physics).is_empty());
        }
        let after: Vec<_> = state.registry.iter().map(|(id, e)| (id, e.pos, e.vel)).collect();
        assert_eq!(before, after);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.registry.count_active(EntityKind::Projectile), 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = SessionState::new(1);
        let snap = snapshot(&state);
        assert_eq!(snap.hud.round, 1);
        assert_eq!(snap.entities.len(), 1 + 1 + 10 + 10);
        assert!(
            snap.entities
                .iter()
                .filter(|e| e.kind == EntityKind::Enemy)
                .all(|e| e.health_ratio == Some(1.0))
        );
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"game_over\":false"));
    }
}
