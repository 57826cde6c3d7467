#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level progression system tracking the active level, the level clock and
//! the best completion time.

mod store;

pub use store::MemoryBestTimeStore;

use alien_maze_core::{BestTimeStore, Event, HudStatus, Level, LevelId, Point, Timestamp};

/// Observable state of the progression machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressionState {
    /// The player is traversing the provided level.
    Playing(LevelId),
    /// A level was just finished; the provided level is the one now active.
    LevelComplete(LevelId),
    /// The last level was just finished and the run wrapped to the first level.
    RunComplete,
}

impl ProgressionState {
    /// Level that is active in this state.
    #[must_use]
    pub const fn active_level(self) -> LevelId {
        match self {
            Self::Playing(level) | Self::LevelComplete(level) => level,
            Self::RunComplete => LevelId::FIRST,
        }
    }
}

/// Outcome of a single exit check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// The player has not reached the exit.
    Stay,
    /// A level other than the last one was finished.
    LevelComplete {
        /// Level that was finished.
        completed: LevelId,
        /// Level that became active.
        next: LevelId,
        /// Seconds spent on the finished level.
        elapsed_seconds: f64,
    },
    /// The last level was finished and the index wrapped to zero.
    RunComplete {
        /// Seconds spent on the final level.
        elapsed_seconds: f64,
    },
}

impl Transition {
    /// Level that became active because of this transition, if any.
    #[must_use]
    pub const fn next_level(&self) -> Option<LevelId> {
        match self {
            Self::Stay => None,
            Self::LevelComplete { next, .. } => Some(*next),
            Self::RunComplete { .. } => Some(LevelId::FIRST),
        }
    }
}

/// Mutable bookkeeping of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunState {
    current_level: LevelId,
    started_at: Timestamp,
    best_seconds: Option<f64>,
}

impl RunState {
    /// Index of the active level.
    #[must_use]
    pub const fn current_level(&self) -> LevelId {
        self.current_level
    }

    /// Moment the active level's clock started.
    #[must_use]
    pub const fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Best completion time recorded so far.
    #[must_use]
    pub const fn best_seconds(&self) -> Option<f64> {
        self.best_seconds
    }

    fn elapsed_seconds(&self, now: Timestamp) -> f64 {
        now.saturating_since(self.started_at).as_secs_f64()
    }
}

/// Advances through the fixed level sequence whenever the player reaches an exit.
#[derive(Debug)]
pub struct LevelProgressionEngine<S> {
    level_count: u32,
    state: ProgressionState,
    run: RunState,
    store: S,
}

impl<S> LevelProgressionEngine<S>
where
    S: BestTimeStore,
{
    /// Starts a run at the first level, loading the best time from `store`.
    ///
    /// A store that cannot be read is treated as holding no best time.
    #[must_use]
    pub fn new(level_count: usize, store: S, now: Timestamp) -> Self {
        let best_seconds = match store.load() {
            Ok(best) => best,
            Err(error) => {
                log::warn!("ignoring unreadable best time: {error}");
                None
            }
        };
        let level_count = u32::try_from(level_count).unwrap_or(u32::MAX).max(1);

        Self {
            level_count,
            state: ProgressionState::Playing(LevelId::FIRST),
            run: RunState {
                current_level: LevelId::FIRST,
                started_at: now,
                best_seconds,
            },
            store,
        }
    }

    /// Current state of the machine.
    #[must_use]
    pub const fn state(&self) -> ProgressionState {
        self.state
    }

    /// Read-only view of the run bookkeeping.
    #[must_use]
    pub const fn run(&self) -> &RunState {
        &self.run
    }

    /// Index of the active level.
    #[must_use]
    pub const fn current_level(&self) -> LevelId {
        self.run.current_level
    }

    /// Number of levels in the cycle.
    #[must_use]
    pub const fn level_count(&self) -> u32 {
        self.level_count
    }

    /// Store the best time is persisted into.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Checks whether the player reached the exit of `level` and advances if so.
    ///
    /// `level` must be the active level. Completion states from the previous
    /// check fall back to `Playing` before the player is tested.
    pub fn check_exit(
        &mut self,
        player: Point,
        level: &Level,
        now: Timestamp,
        out: &mut Vec<Event>,
    ) -> Transition {
        self.state = ProgressionState::Playing(self.run.current_level);

        if !level.exit_reached(player) {
            return Transition::Stay;
        }

        let elapsed_seconds = self.run.elapsed_seconds(now);
        self.record_time(elapsed_seconds, out);

        let completed = self.run.current_level;
        let next_index = completed.get().saturating_add(1);
        self.run.started_at = now;

        if next_index >= self.level_count {
            self.run.current_level = LevelId::FIRST;
            self.state = ProgressionState::RunComplete;
            log::info!("run complete, final level took {elapsed_seconds:.1}s");
            out.push(Event::RunCompleted { elapsed_seconds });
            Transition::RunComplete { elapsed_seconds }
        } else {
            let next = LevelId::new(next_index);
            self.run.current_level = next;
            self.state = ProgressionState::LevelComplete(next);
            log::info!(
                "level {} complete in {elapsed_seconds:.1}s",
                completed.number()
            );
            out.push(Event::LevelCompleted {
                completed,
                next,
                elapsed_seconds,
            });
            Transition::LevelComplete {
                completed,
                next,
                elapsed_seconds,
            }
        }
    }

    /// Restarts the level clock once the player dismissed a notification.
    pub fn acknowledge(&mut self, now: Timestamp) {
        self.run.started_at = now;
        self.state = ProgressionState::Playing(self.run.current_level);
    }

    /// Values the heads-up display shows at `now`.
    #[must_use]
    pub fn hud_status(&self, now: Timestamp) -> HudStatus {
        HudStatus {
            level_number: self.run.current_level.number(),
            elapsed_seconds: self.run.elapsed_seconds(now),
            best_seconds: self.run.best_seconds,
        }
    }

    fn record_time(&mut self, elapsed_seconds: f64, out: &mut Vec<Event>) {
        let improved = self
            .run
            .best_seconds
            .map_or(true, |best| elapsed_seconds < best);
        if !improved {
            return;
        }

        self.run.best_seconds = Some(elapsed_seconds);
        log::info!("new best time {elapsed_seconds:.1}s");
        if let Err(error) = self.store.save(elapsed_seconds) {
            log::warn!("failed to persist best time: {error}");
        }
        out.push(Event::BestTimeImproved {
            seconds: elapsed_seconds,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alien_maze_core::PathMaze;
    use std::time::Duration;

    fn path_level(index: u32) -> Level {
        let path = PathMaze::new(vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0)])
            .expect("valid path");
        Level::path(LevelId::new(index), path)
    }

    fn at(seconds: u64) -> Timestamp {
        Timestamp::from_duration(Duration::from_secs(seconds))
    }

    #[test]
    fn starts_playing_the_first_level() {
        let engine = LevelProgressionEngine::new(5, MemoryBestTimeStore::default(), at(3));

        assert_eq!(engine.state(), ProgressionState::Playing(LevelId::FIRST));
        assert_eq!(engine.run().started_at(), at(3));
        assert_eq!(engine.run().best_seconds(), None);
    }

    #[test]
    fn stays_while_outside_the_exit() {
        let mut engine = LevelProgressionEngine::new(5, MemoryBestTimeStore::default(), at(0));
        let mut events = Vec::new();

        let transition =
            engine.check_exit(Point::new(2.4, 0.0), &path_level(0), at(4), &mut events);

        assert_eq!(transition, Transition::Stay);
        assert!(events.is_empty());
        assert_eq!(engine.current_level(), LevelId::FIRST);
    }

    #[test]
    fn completion_state_falls_back_to_playing() {
        let mut engine = LevelProgressionEngine::new(5, MemoryBestTimeStore::default(), at(0));
        let mut events = Vec::new();

        let _ = engine.check_exit(Point::new(3.0, 0.0), &path_level(0), at(2), &mut events);
        assert_eq!(
            engine.state(),
            ProgressionState::LevelComplete(LevelId::new(1))
        );

        let _ = engine.check_exit(Point::new(0.0, 0.0), &path_level(1), at(3), &mut events);
        assert_eq!(engine.state(), ProgressionState::Playing(LevelId::new(1)));
    }

    #[test]
    fn hud_reports_one_based_level_and_elapsed_time() {
        let engine = LevelProgressionEngine::new(
            5,
            MemoryBestTimeStore::with_best(12.25),
            Timestamp::from_secs_f64(1.0),
        );

        let status = engine.hud_status(Timestamp::from_secs_f64(3.5));

        assert_eq!(status.level_number, 1);
        assert!((status.elapsed_seconds - 2.5).abs() < 1e-9);
        assert_eq!(status.best_seconds, Some(12.25));
    }

    #[test]
    fn transitions_report_the_next_level() {
        assert_eq!(Transition::Stay.next_level(), None);
        assert_eq!(
            Transition::RunComplete {
                elapsed_seconds: 1.0
            }
            .next_level(),
            Some(LevelId::FIRST)
        );
    }
}
