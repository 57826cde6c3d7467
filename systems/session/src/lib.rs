#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-frame game session tying movement, progression and presentation together.

mod trail;

use std::time::Duration;

use alien_maze_core::{
    BestTimeStore, Event, Hud, Level, LevelId, MazeVariant, MovementInput, Notification,
    Notifier, Point, Renderer, Timestamp, WorldError,
};
use alien_maze_system_movement::MovementController;
use alien_maze_system_progression::{LevelProgressionEngine, Transition};
use alien_maze_world::{query, World};

use trail::TrailLedger;

/// Maximum number of trail markers alive at once.
pub const TRAIL_CAPACITY: usize = 50;

/// Time after which a trail marker is evicted regardless of capacity.
pub const TRAIL_MARKER_LIFETIME: Duration = Duration::from_secs(2);

/// Owns all mutable game state and advances it once per rendered frame.
#[derive(Debug)]
pub struct Session<S> {
    world: World,
    movement: MovementController,
    progression: LevelProgressionEngine<S>,
    trail: TrailLedger,
    awaiting_acknowledgement: bool,
}

impl<S> Session<S>
where
    S: BestTimeStore,
{
    /// Starts a run at the first level and presents it.
    pub fn new<P>(
        world: World,
        store: S,
        now: Timestamp,
        presenter: &mut P,
        out: &mut Vec<Event>,
    ) -> Result<Self, WorldError>
    where
        P: Renderer + Hud + ?Sized,
    {
        let first = query::level(&world, LevelId::FIRST).ok_or(WorldError::NoLevels)?;
        let movement = MovementController::new(first);
        let progression = LevelProgressionEngine::new(query::level_count(&world), store, now);
        present_level(first, presenter, out);

        let session = Self {
            world,
            movement,
            progression,
            trail: TrailLedger::new(TRAIL_CAPACITY, TRAIL_MARKER_LIFETIME),
            awaiting_acknowledgement: false,
        };
        presenter.show_status(&session.progression.hud_status(now));
        Ok(session)
    }

    /// Advances the game by one frame.
    ///
    /// While a notification awaits acknowledgement the state is frozen and
    /// only the frame is redrawn.
    pub fn tick<P>(
        &mut self,
        input: MovementInput,
        now: Timestamp,
        presenter: &mut P,
        out: &mut Vec<Event>,
    ) -> Transition
    where
        P: Renderer + Hud + Notifier + ?Sized,
    {
        if self.awaiting_acknowledgement {
            presenter.render_frame();
            return Transition::Stay;
        }

        let Some(level) = query::level(&self.world, self.progression.current_level()) else {
            presenter.render_frame();
            return Transition::Stay;
        };
        let trail_enabled = level.variant() == MazeVariant::Path;

        if trail_enabled {
            self.trail.expire(now, presenter);
        }

        let before = self.movement.position();
        let position = self.movement.step(input, level, out);
        if position != before {
            if trail_enabled {
                self.trail.emit(position, now, presenter);
            }
            presenter.set_player_visual_position(position);
        }

        let transition = self.progression.check_exit(position, level, now, out);
        let next = transition
            .next_level()
            .and_then(|id| query::level(&self.world, id));
        let notification = notification_for(&transition, self.progression.level_count());
        if let (Some(next), Some(notification)) = (next, notification) {
            self.movement.begin_level(next);
            self.trail.clear(presenter);
            present_level(next, presenter, out);
            presenter.notify(notification);
            self.awaiting_acknowledgement = true;
        }

        presenter.show_status(&self.progression.hud_status(now));
        presenter.render_frame();
        transition
    }

    /// Dismisses the pending notification and restarts the level clock.
    pub fn acknowledge(&mut self, now: Timestamp) {
        if self.awaiting_acknowledgement {
            self.awaiting_acknowledgement = false;
            self.progression.acknowledge(now);
        }
    }

    /// Reports whether a notification blocks the session.
    #[must_use]
    pub const fn is_awaiting_acknowledgement(&self) -> bool {
        self.awaiting_acknowledgement
    }

    /// Level that is currently active.
    #[must_use]
    pub fn current_level(&self) -> LevelId {
        self.progression.current_level()
    }

    /// Current player position.
    #[must_use]
    pub const fn player_position(&self) -> Point {
        self.movement.position()
    }

    /// Number of trail markers currently alive.
    #[must_use]
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Level catalogue the session plays through.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Progression engine driving the run.
    #[must_use]
    pub const fn progression(&self) -> &LevelProgressionEngine<S> {
        &self.progression
    }
}

fn notification_for(transition: &Transition, level_count: u32) -> Option<Notification> {
    match *transition {
        Transition::Stay => None,
        Transition::LevelComplete {
            completed, next, ..
        } => Some(Notification::LevelComplete {
            completed_number: completed.number(),
            next_number: next.number(),
        }),
        Transition::RunComplete { elapsed_seconds } => Some(Notification::RunComplete {
            level_count,
            elapsed_seconds,
        }),
    }
}

fn present_level<P>(level: &Level, presenter: &mut P, out: &mut Vec<Event>)
where
    P: Renderer + ?Sized,
{
    presenter.rebuild_maze(level);
    presenter.set_exit_visual_position(level.exit());
    presenter.set_player_visual_position(level.start());
    log::info!("level {} started", level.id().number());
    out.push(Event::LevelStarted {
        level: level.id(),
        start: level.start(),
        exit: level.exit(),
    });
}
