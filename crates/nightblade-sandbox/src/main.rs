//! Headless Duel Runner
//!
//! Runs a scripted player against a handful of enemies and logs what the
//! combat core reports. Useful for tuning configs and checking replays.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use nightblade_core::actor::PlayerInput;
use nightblade_core::events::GameEvent;
use nightblade_core::{CombatActor, GameConfig, Simulation};
use tracing_subscriber::EnvFilter;

/// Headless Duel Runner - scripted player vs configured enemies
#[derive(Parser, Debug)]
#[command(name = "nightblade-sandbox")]
#[command(about = "Run a scripted fight against the Nightblade combat core")]
struct Args {
    /// JSON config file (defaults to the built-in config)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override the config seed
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// Frames per simulated second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Enemy archetypes to spawn, alternating sides of the player
    #[arg(long, value_delimiter = ',', default_value = "skeleton,skeleton")]
    enemies: Vec<String>,

    /// Log every event, not just the headline ones
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut sim = Simulation::new(config).context("invalid config")?;
    let verbose = args.verbose;
    sim.subscribe(Box::new(move |record| match &record.event {
        GameEvent::HealthChanged { current, max } if verbose => {
            tracing::info!(tick = record.tick, source = ?record.source, current, max, "health");
        }
        GameEvent::EnemyDeath {
            experience_reward,
            enemy_name,
        } => {
            tracing::info!(tick = record.tick, enemy = %enemy_name, experience_reward, "enemy slain");
        }
        GameEvent::LevelUp { level } => {
            tracing::info!(tick = record.tick, level, "level up");
        }
        GameEvent::Death => {
            tracing::info!(tick = record.tick, source = ?record.source, "death");
        }
        event if verbose => {
            tracing::info!(tick = record.tick, source = ?record.source, %event, "event");
        }
        _ => {}
    }));

    for (i, archetype) in args.enemies.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let distance = 6.0 + 2.0 * i as f32;
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        sim.spawn_enemy(archetype, Vec2::new(side * distance, 0.0))
            .with_context(|| format!("cannot spawn enemy '{archetype}'"))?;
    }

    tracing::info!(
        seed = sim.seed(),
        enemies = args.enemies.len(),
        seconds = args.seconds,
        "starting fight"
    );

    #[allow(clippy::cast_precision_loss)]
    let frame_dt = 1.0 / args.fps.max(1) as f32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let frames = (args.seconds.max(0.0) / frame_dt).ceil() as u64;

    let mut event_count = 0;
    for _ in 0..frames {
        let input = scripted_input(&sim);
        sim.advance(frame_dt, input);
        event_count += sim.take_events().len();

        if sim.player().is_dead() || sim.arena().living_enemy_count() == 0 {
            break;
        }
    }

    let player = sim.player();
    let progression = sim.progression();
    println!("ticks:           {}", sim.tick());
    println!("physics steps:   {}", sim.physics_steps());
    println!("events:          {event_count}");
    println!(
        "player:          {:?} {}/{} hp",
        player.state(),
        player.health().current(),
        player.health().max()
    );
    println!(
        "level:           {} ({} xp, {:.0}% to next)",
        progression.level(),
        progression.experience(),
        progression.experience_progress() * 100.0
    );
    println!(
        "enemies alive:   {}/{}",
        sim.arena().living_enemy_count(),
        sim.arena().enemy_count()
    );

    Ok(())
}

/// Walks toward the closest living enemy and swings once it is in reach.
fn scripted_input(sim: &Simulation) -> PlayerInput {
    let player = sim.player();
    let position = player.body().position;
    let reach = sim.config().player.attack_range;

    let target = sim
        .arena()
        .enemies_sorted()
        .filter(|e| !e.is_dead())
        .map(|e| e.body().position)
        .min_by(|a, b| a.distance_squared(position).total_cmp(&b.distance_squared(position)));

    let Some(target) = target else {
        return PlayerInput::default();
    };
    let dx = target.x - position.x;
    let in_reach = position.distance(target) <= reach * 0.8;

    PlayerInput {
        move_x: if in_reach { 0.0 } else { dx.signum() },
        attack_pressed: in_reach && player.attack_ready(),
        ..PlayerInput::default()
    }
}
