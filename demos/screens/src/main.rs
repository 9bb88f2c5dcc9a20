//! `demo`: run one of the demo screens headless.
//!
//! ```text
//! demo --screen spaceship --ticks 600
//! RUST_LOG=screens=debug demo --screen animation --ticks 120 --realtime
//! ```

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use components::{Bullet, Monster};
use engine_app::{Engine, TickConfig, TickLoop};
use engine_component::Query;
use screens::{
    AnimationScreen, Autopilot, BuiltinScenes, CameraScreen, GameScreen, JsonSceneProvider,
    KeyboardState, MeshCache, SceneProvider, Screen, SpaceshipScreen,
};

/// Ticks run when neither the config nor the command line set a limit.
const DEFAULT_TICKS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScreenKind {
    Spaceship,
    Animation,
    Camera,
}

#[derive(Parser)]
#[command(name = "demo", about = "Run an ECS demo screen headless")]
struct Args {
    /// Screen to run
    #[arg(short, long, value_enum, default_value_t = ScreenKind::Spaceship)]
    screen: ScreenKind,

    /// Number of ticks to run (overrides the config)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Directory of `<name>.json` scene files (default: built-in scenes)
    #[arg(long)]
    scenes: Option<PathBuf>,

    /// JSON tick configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pace ticks to wall-clock time (also enabled by `realtime` in the config)
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TickConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TickConfig {
            realtime: false,
            ..TickConfig::default()
        },
    }
    .with_env_overrides()?;
    config.realtime |= args.realtime;
    if let Some(ticks) = args.ticks {
        config.max_ticks = ticks;
    }
    if config.max_ticks == 0 {
        config.max_ticks = DEFAULT_TICKS;
    }

    let scenes: Rc<dyn SceneProvider> = match &args.scenes {
        Some(dir) => Rc::new(JsonSceneProvider::new(dir)),
        None => Rc::new(BuiltinScenes),
    };
    let resources = Rc::new(MeshCache::new());
    let keyboard = Rc::new(KeyboardState::new());

    let mut engine = Engine::new();
    let screen: Box<dyn Screen> = match args.screen {
        ScreenKind::Spaceship => {
            engine.register(Autopilot::new(Rc::clone(&keyboard)))?;
            Box::new(SpaceshipScreen::new(scenes, resources.clone(), keyboard))
        }
        ScreenKind::Animation => Box::new(AnimationScreen::new(scenes, resources.clone())),
        ScreenKind::Camera => Box::new(CameraScreen::new(scenes, resources.clone())),
    };

    let mut game = GameScreen::new(screen);
    game.mount(&mut engine)?;
    info!(
        screen = game.name(),
        meshes = resources.len(),
        tick_rate = config.tick_rate,
        max_ticks = config.max_ticks,
        "demo starting"
    );

    let report_every = (config.tick_rate.round() as u64).max(1);
    let bullets = Query::of::<Bullet>();
    let monsters = Query::of::<Monster>();

    let mut tick_loop = TickLoop::new(engine, config);
    let ticks = tick_loop.run_with(|engine, report| {
        if report.tick_id % report_every != 0 {
            return;
        }
        let in_flight = engine
            .select(&bullets)
            .into_iter()
            .filter(|&b| engine.store().get::<Bullet>(b).is_ok_and(|b| b.fired))
            .count();
        info!(
            tick_id = report.tick_id,
            elapsed = engine.elapsed(),
            entities = engine.entity_count(),
            monsters = engine.select(&monsters).len(),
            bullets_in_flight = in_flight,
            spawned = report.spawned,
            removed = report.removed,
            "progress"
        );
    })?;

    let mut engine: Engine = tick_loop.into_engine();
    info!(ticks, elapsed = engine.elapsed(), entities = engine.entity_count(), "demo finished");
    game.unmount(&mut engine);
    Ok(())
}
