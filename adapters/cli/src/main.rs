#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Alien Maze experience.

mod catalogue;
mod config;
mod store;

use std::{path::PathBuf, time::Duration};

use alien_maze_core::{BestTimeStore, Event, MazeVariant, Timestamp};
use alien_maze_rendering::{Color, Presentation, RenderingBackend, Scene, WindowSize};
use alien_maze_rendering_macroquad::MacroquadBackend;
use alien_maze_system_session::{Session, TRAIL_MARKER_LIFETIME};
use alien_maze_world::{query, World};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    config::{FileConfig, Overrides, Settings, DEFAULT_CONFIG_PATH},
    store::FileBestTimeStore,
};

/// Traverse five alien mazes against the clock.
#[derive(Debug, Parser)]
#[command(name = "alien-maze", version, about)]
struct Cli {
    /// Maze family to play.
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
    /// TOML configuration file; `alien-maze.toml` is used when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// File the best time is persisted in.
    #[arg(long)]
    store: Option<PathBuf>,
    /// Render as fast as possible instead of synchronising with the display.
    #[arg(long)]
    no_vsync: bool,
    /// Print frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Command {
    /// Open the game window (default).
    Play,
    /// Print every level of the selected variant.
    Levels,
    /// Print the stored best time.
    Best,
    /// Forget the stored best time.
    ResetBest,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Grid,
    Path,
}

impl From<VariantArg> for MazeVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Grid => Self::Grid,
            VariantArg::Path => Self::Path,
        }
    }
}

/// Entry point for the Alien Maze command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::load_or_default(DEFAULT_CONFIG_PATH.as_ref())?,
    };
    let settings = config.resolve(Overrides {
        variant: cli.variant.map(MazeVariant::from),
        store_path: cli.store,
        no_vsync: cli.no_vsync,
        show_fps: cli.show_fps,
    });

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => play(settings),
        Command::Levels => print_levels(&settings),
        Command::Best => print_best(&settings),
        Command::ResetBest => reset_best(&settings),
    }
}

fn open_store(settings: &Settings) -> FileBestTimeStore {
    FileBestTimeStore::new(settings.store_path.clone(), settings.storage_key.clone())
}

fn play(settings: Settings) -> Result<()> {
    let world = World::new(settings.variant).context("failed to build the level catalogue")?;
    let banner = query::welcome_banner(&world);
    log::info!("{banner}");
    log::info!(
        "playing {} levels of the {} variant, best time stored under '{}'",
        query::level_count(&world),
        settings.variant,
        settings.storage_key
    );

    let store = open_store(&settings);
    let mut scene = Scene::new(banner, TRAIL_MARKER_LIFETIME);
    let mut events = Vec::new();
    let mut session = Session::new(world, store, Timestamp::ZERO, &mut scene, &mut events)
        .context("failed to start the session")?;
    log_events(&events);

    let window_size = WindowSize::new(settings.window_width, settings.window_height)
        .context("invalid window size")?;
    let presentation = Presentation::new(
        settings.window_title,
        window_size,
        Color::from_rgb_u8(8, 8, 16),
        scene,
    );

    let mut clock = Duration::ZERO;
    MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps)
        .run(presentation, move |dt, input, scene| {
            clock = clock.saturating_add(dt);
            let now = Timestamp::from_duration(clock);
            scene.advance(dt);

            if input.acknowledge && scene.dismiss_notification() {
                session.acknowledge(now);
            }

            events.clear();
            let _ = session.tick(input.movement, now, scene, &mut events);
            log_events(&events);
        })
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::PlayerMoved { .. } => log::trace!("{event:?}"),
            _ => log::debug!("{event:?}"),
        }
    }
}

fn print_levels(settings: &Settings) -> Result<()> {
    let world = World::new(settings.variant).context("failed to build the level catalogue")?;
    println!("{}", query::welcome_banner(&world));
    for level in query::levels(&world) {
        println!();
        print!("{}", catalogue::render_level(level));
    }
    Ok(())
}

fn print_best(settings: &Settings) -> Result<()> {
    let store = open_store(settings);
    let best = store.load().with_context(|| {
        format!(
            "failed to read best time from {}",
            store.path().display()
        )
    })?;
    match best {
        Some(seconds) => println!("{}: {seconds:.1}s", store.key()),
        None => println!("{}: no best time recorded", store.key()),
    }
    Ok(())
}

fn reset_best(settings: &Settings) -> Result<()> {
    let mut store = open_store(settings);
    let removed = store
        .remove()
        .with_context(|| format!("failed to update {}", store.path().display()))?;
    if removed {
        println!("{}: best time cleared", store.key());
    } else {
        println!("{}: no best time recorded", store.key());
    }
    Ok(())
}
