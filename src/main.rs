//! Round Survivor headless runner
//!
//! Drives a session with a simple autoplay bot and a naive kinematic stand-in
//! for the physics collaborator, logging progress and printing the final
//! snapshot as JSON.
//!
//! Usage:
//!   RUST_LOG=info cargo run --release -- --seed 7 --seconds 120

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::{IVec2, Vec2};

use round_survivor::Settings;
use round_survivor::sim::{
    ContactPair, EntityId, EntityKind, GameEvent, Physics, Registry, SessionState, TickInput,
    snapshot, tick,
};

/// Frame time of the simulated presentation loop (60 Hz)
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "round-survivor")]
#[command(about = "Run a headless round survival session with an autoplay bot")]
struct Args {
    /// RNG seed for the session
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Simulated seconds before stopping (if still alive)
    #[arg(long, default_value_t = 300.0)]
    seconds: f32,
    /// Optional JSON settings file overriding the default balance
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Print the final snapshot as pretty JSON
    #[arg(long)]
    pretty: bool,
}

/// Euler integration plus circle-overlap contact reporting
struct KinematicArena;

impl Physics for KinematicArena {
    fn step(&mut self, registry: &mut Registry, dt: f32) -> Vec<ContactPair> {
        for (_, e) in registry.iter_mut() {
            e.pos += e.vel * dt;
        }

        let bodies: Vec<(EntityId, EntityKind, Vec2, f32)> = registry
            .iter()
            .filter(|(_, e)| e.kind() != EntityKind::HealthBar)
            .map(|(id, e)| (id, e.kind(), e.pos, e.radius))
            .collect();

        let mut pairs = Vec::new();
        for (i, &(a, ka, pa, ra)) in bodies.iter().enumerate() {
            for &(b, kb, pb, rb) in &bodies[i + 1..] {
                let relevant = matches!(
                    (ka.min(kb), ka.max(kb)),
                    (EntityKind::Enemy, EntityKind::Projectile)
                        | (EntityKind::Player, EntityKind::Enemy)
                        | (EntityKind::Player, EntityKind::UpgradeStation)
                );
                if relevant && pa.distance(pb) <= ra + rb {
                    pairs.push(ContactPair::new(a, b));
                }
            }
        }
        pairs
    }
}

/// Kite away from the nearest enemy, shoot at it, and go shopping when rich
fn autoplay(state: &SessionState, time_ms: f64) -> TickInput {
    let me = state.player_pos();
    let nearest = state
        .registry
        .iter()
        .filter(|(_, e)| e.kind() == EntityKind::Enemy)
        .map(|(_, e)| e.pos)
        .min_by(|a, b| a.distance(me).total_cmp(&b.distance(me)));

    let Some(threat) = nearest else {
        return TickInput {
            time_ms,
            ..Default::default()
        };
    };

    let shopping = !state.has_wall_weapon && state.score >= state.settings.wall_weapon_price;
    let heading = match state.station.and_then(|s| state.registry.get(s)) {
        Some(station) if shopping && threat.distance(me) > 80.0 => station.pos - me,
        _ if threat.distance(me) < 150.0 => me - threat,
        _ => state.settings.arena_max() * 0.5 - me,
    };

    let axis = |v: f32| if v > 4.0 { 1 } else if v < -4.0 { -1 } else { 0 };
    TickInput {
        move_dir: IVec2::new(axis(heading.x), axis(heading.y)),
        fire: true,
        pointer: threat,
        time_ms,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let mut state = SessionState::with_settings(args.seed, settings)?;
    let mut physics = KinematicArena;
    let frames = (args.seconds / FRAME_DT).ceil() as u64;

    for frame in 0..frames {
        let time_ms = frame as f64 * f64::from(FRAME_DT) * 1000.0;
        let input = autoplay(&state, time_ms);
        for event in tick(&mut state, &input, FRAME_DT, &mut physics) {
            match event {
                GameEvent::RoundAdvanced { round } => {
                    log::info!("t={:.1}s round {round}, score {}", time_ms / 1000.0, state.score)
                }
                GameEvent::UpgradePurchased { .. } => log::info!("Bought the wall weapon"),
                other => log::trace!("{other:?}"),
            }
        }
        if state.game_over {
            break;
        }
    }

    let snap = snapshot(&state);
    let json = if args.pretty {
        serde_json::to_string_pretty(&snap)?
    } else {
        serde_json::to_string(&snap)?
    };
    println!("{json}");
    println!(
        "Finished: round {}, score {}, upgrade {}, game over {}",
        snap.hud.round, snap.hud.score, snap.hud.has_wall_weapon, snap.game_over
    );
    Ok(())
}
