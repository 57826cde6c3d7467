#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Alien Maze engine.
//!
//! This crate defines the vocabulary that connects the immutable level
//! catalogue, the pure movement and progression systems, and the adapters that
//! present the game. Levels are described by [`Level`] values wrapping a
//! [`MazeShape`]; systems report what happened during a tick through [`Event`]
//! values and drive presentation exclusively through the [`Renderer`], [`Hud`]
//! and [`Notifier`] collaborator traits. Persistence of the single best-time
//! scalar goes through [`BestTimeStore`].

mod level;
mod maze;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use level::{ExitProximity, Level, LevelId};
pub use maze::{CellKind, GridCell, GridMaze, MazeShape, PathMaze};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Alien Maze.";

/// Displacement applied per animation frame while a direction is held in grid levels.
///
/// Speeds are per frame, so the effective speed follows the host's frame rate.
pub const GRID_MOVE_SPEED: f32 = 0.1;

/// Displacement applied per animation frame while a direction is held in path levels.
pub const PATH_MOVE_SPEED: f32 = 0.15;

/// Per-axis distance below which a grid-level player counts as standing on the exit.
pub const GRID_EXIT_TOLERANCE: f32 = 0.3;

/// Euclidean distance below which a path-level player counts as standing on the exit.
pub const PATH_EXIT_RADIUS: f32 = 0.5;

/// Continuous position on the maze floor.
///
/// The floor is the horizontal `x`/`z` plane of the top-down scene.
/// Grid levels map `x` onto rows and `z` onto columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    z: f32,
}

impl Point {
    /// Creates a new floor position.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Coordinate along the x axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Coordinate along the z axis.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Returns the position displaced by the provided per-axis offsets.
    #[must_use]
    pub fn offset(self, dx: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    /// Reports whether both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }
}

/// Maze representation family shared by every level of a game variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MazeVariant {
    /// Levels built from rectangular wall/open grids with collision.
    #[default]
    Grid,
    /// Levels built from decorative waypoint paths without collision.
    Path,
}

impl MazeVariant {
    /// Default key under which the variant stores its best time.
    #[must_use]
    pub const fn default_storage_key(self) -> &'static str {
        match self {
            Self::Grid => "alienMazeBest",
            Self::Path => "alienPathBest",
        }
    }
}

impl fmt::Display for MazeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => write!(f, "grid"),
            Self::Path => write!(f, "path"),
        }
    }
}

/// Monotonic instant supplied by the host, measured from process start.
///
/// The engine never reads a clock itself; adapters pass timestamps into every
/// tick so simulations stay deterministic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// Instant at which the host started.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Creates a timestamp from the duration elapsed since the host started.
    #[must_use]
    pub const fn from_duration(since_start: Duration) -> Self {
        Self(since_start)
    }

    /// Creates a timestamp from fractional seconds, clamping invalid input to zero.
    #[must_use]
    pub fn from_secs_f64(seconds: f64) -> Self {
        if seconds.is_finite() && seconds > 0.0 {
            Self(Duration::from_secs_f64(seconds))
        } else {
            Self::ZERO
        }
    }

    /// Duration elapsed since the host started.
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    /// Duration between an earlier timestamp and this one, zero if `earlier` is later.
    #[must_use]
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

/// Direction associated with a held movement key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    /// Toward decreasing z.
    Up,
    /// Toward increasing z.
    Down,
    /// Toward decreasing x.
    Left,
    /// Toward increasing x.
    Right,
}

/// Physical keys bound to movement. Every heading has two aliases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementKey {
    /// `W`, alias of [`MovementKey::ArrowUp`].
    W,
    /// `A`, alias of [`MovementKey::ArrowLeft`].
    A,
    /// `S`, alias of [`MovementKey::ArrowDown`].
    S,
    /// `D`, alias of [`MovementKey::ArrowRight`].
    D,
    /// Up arrow.
    ArrowUp,
    /// Left arrow.
    ArrowLeft,
    /// Down arrow.
    ArrowDown,
    /// Right arrow.
    ArrowRight,
}

impl MovementKey {
    /// Every bound movement key.
    pub const ALL: [Self; 8] = [
        Self::W,
        Self::A,
        Self::S,
        Self::D,
        Self::ArrowUp,
        Self::ArrowLeft,
        Self::ArrowDown,
        Self::ArrowRight,
    ];

    /// Heading triggered while the key is held.
    #[must_use]
    pub const fn heading(self) -> Heading {
        match self {
            Self::W | Self::ArrowUp => Heading::Up,
            Self::A | Self::ArrowLeft => Heading::Left,
            Self::S | Self::ArrowDown => Heading::Down,
            Self::D | Self::ArrowRight => Heading::Right,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::W => 0,
            Self::A => 1,
            Self::S => 2,
            Self::D => 3,
            Self::ArrowUp => 4,
            Self::ArrowLeft => 5,
            Self::ArrowDown => 6,
            Self::ArrowRight => 7,
        }
    }
}

/// Directional flags sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MovementInput {
    /// Whether an up alias is held.
    pub up: bool,
    /// Whether a down alias is held.
    pub down: bool,
    /// Whether a left alias is held.
    pub left: bool,
    /// Whether a right alias is held.
    pub right: bool,
}

impl MovementInput {
    /// Input with no direction held.
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Net direction along the x axis: `-1.0`, `0.0` or `1.0`.
    #[must_use]
    pub fn axis_x(&self) -> f32 {
        f32::from(u8::from(self.right)) - f32::from(u8::from(self.left))
    }

    /// Net direction along the z axis: `-1.0`, `0.0` or `1.0`.
    #[must_use]
    pub fn axis_z(&self) -> f32 {
        f32::from(u8::from(self.down)) - f32::from(u8::from(self.up))
    }

    /// Reports whether any direction is held.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// Held state of every movement key, updated by asynchronous key events.
///
/// Updates are last-write-wins. A heading stays active while any of its
/// aliases is held, so releasing `ArrowUp` while `W` is down keeps moving up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    held: [bool; 8],
}

impl KeyState {
    /// Records a key press (`true`) or release (`false`).
    pub fn set(&mut self, key: MovementKey, pressed: bool) {
        self.held[key.slot()] = pressed;
    }

    /// Reports whether the key is currently held.
    #[must_use]
    pub const fn is_held(&self, key: MovementKey) -> bool {
        self.held[key.slot()]
    }

    /// Releases every key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held = [false; 8];
    }

    /// Collapses the held keys into directional flags.
    #[must_use]
    pub fn movement_input(&self) -> MovementInput {
        let mut input = MovementInput::NONE;
        for key in MovementKey::ALL {
            if !self.is_held(key) {
                continue;
            }
            match key.heading() {
                Heading::Up => input.up = true,
                Heading::Down => input.down = true,
                Heading::Left => input.left = true,
                Heading::Right => input.right = true,
            }
        }
        input
    }
}

/// Facts reported by the systems after processing a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a level became active and the player was placed at its start.
    LevelStarted {
        /// Identifier of the level that became active.
        level: LevelId,
        /// Position the player was reset to.
        start: Point,
        /// Position of the level's exit.
        exit: Point,
    },
    /// Confirms that the player moved to a new position.
    PlayerMoved {
        /// Position before the step.
        from: Point,
        /// Position after the step.
        to: Point,
    },
    /// Reports that the player beat the best recorded time.
    BestTimeImproved {
        /// New best completion time in seconds.
        seconds: f64,
    },
    /// Reports that the player reached the exit of a level that was not the last one.
    LevelCompleted {
        /// Level that was just finished.
        completed: LevelId,
        /// Level that becomes active next.
        next: LevelId,
        /// Seconds spent on the finished level.
        elapsed_seconds: f64,
    },
    /// Reports that the last level was finished and the run wrapped to the first level.
    RunCompleted {
        /// Seconds spent on the final level.
        elapsed_seconds: f64,
    },
}

/// Values shown by the heads-up display every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudStatus {
    /// One-based number of the active level.
    pub level_number: u32,
    /// Seconds elapsed on the active level.
    pub elapsed_seconds: f64,
    /// Best recorded completion time, if any.
    pub best_seconds: Option<f64>,
}

impl HudStatus {
    /// Level number formatted for display.
    #[must_use]
    pub fn level_text(&self) -> String {
        self.level_number.to_string()
    }

    /// Elapsed time formatted with one decimal place.
    #[must_use]
    pub fn elapsed_text(&self) -> String {
        format!("{:.1}", self.elapsed_seconds)
    }

    /// Best time formatted with one decimal place, `"0.0"` when none is recorded.
    #[must_use]
    pub fn best_text(&self) -> String {
        format!("{:.1}", self.best_seconds.unwrap_or(0.0))
    }
}

/// Blocking acknowledgement requested from the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notification {
    /// A level other than the last one was finished.
    LevelComplete {
        /// One-based number of the finished level.
        completed_number: u32,
        /// One-based number of the level that starts next.
        next_number: u32,
    },
    /// The last level was finished and the run starts over.
    RunComplete {
        /// Number of levels in the run.
        level_count: u32,
        /// Seconds spent on the final level.
        elapsed_seconds: f64,
    },
}

impl Notification {
    /// Text shown to the player.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::LevelComplete {
                completed_number,
                next_number,
            } => format!("Level {completed_number} complete! Next up: level {next_number}."),
            Self::RunComplete {
                level_count,
                elapsed_seconds,
            } => format!(
                "You completed all {level_count} levels! Total time: {elapsed_seconds:.1}s"
            ),
        }
    }
}

/// Presentation collaborator responsible for all visuals.
///
/// The core calls into the renderer but never reads from it.
pub trait Renderer {
    /// Replaces every wall or obstacle visual with the provided level's maze.
    fn rebuild_maze(&mut self, level: &Level);

    /// Moves the player marker.
    fn set_player_visual_position(&mut self, position: Point);

    /// Moves the exit marker.
    fn set_exit_visual_position(&mut self, position: Point);

    /// Spawns a decorative trail marker. Only path levels emit trail markers.
    fn emit_trail_marker(&mut self, position: Point);

    /// Removes the oldest live trail marker.
    fn evict_oldest_trail_marker(&mut self);

    /// Draws the current scene.
    fn render_frame(&mut self);
}

/// Heads-up display collaborator refreshed every tick.
pub trait Hud {
    /// Presents the latest level number, timer and best time.
    fn show_status(&mut self, status: &HudStatus);
}

/// Collaborator that blocks presentation until the player acknowledges a message.
pub trait Notifier {
    /// Presents the notification. The core has already transitioned when this fires.
    fn notify(&mut self, notification: Notification);
}

/// Key-value store persisting the best completion time.
pub trait BestTimeStore {
    /// Reads the stored best time. `Ok(None)` means no entry exists.
    fn load(&self) -> Result<Option<f64>, StoreError>;

    /// Records a new best time.
    fn save(&mut self, seconds: f64) -> Result<(), StoreError>;
}

impl<T> BestTimeStore for Box<T>
where
    T: BestTimeStore + ?Sized,
{
    fn load(&self) -> Result<Option<f64>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, seconds: f64) -> Result<(), StoreError> {
        (**self).save(seconds)
    }
}

/// Failures raised by [`BestTimeStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing medium could not be read or written.
    #[error("best-time store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// An entry exists but does not hold a non-negative decimal number.
    #[error("stored best time '{value}' is not a valid number of seconds")]
    Corrupt {
        /// Raw stored value.
        value: String,
    },
    /// The store as a whole could not be parsed.
    #[error("best-time store is unreadable: {reason}")]
    Unreadable {
        /// Description of the parse failure.
        reason: String,
    },
}

impl StoreError {
    /// Parses a stored decimal string, rejecting negative or non-finite values.
    pub fn parse_seconds(value: &str) -> Result<f64, StoreError> {
        match value.trim().parse::<f64>() {
            Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
            _ => Err(StoreError::Corrupt {
                value: value.to_owned(),
            }),
        }
    }
}

/// Reasons a level definition is rejected at construction time.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LevelError {
    /// The grid contains no rows or no columns.
    #[error("grid maze has no cells")]
    EmptyGrid,
    /// A grid row differs in length from the first row.
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// Neither exit candidate cell is open, or the grid is too small to hold one.
    #[error("neither exit candidate of the {rows}x{columns} grid is open")]
    NoExitCell {
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        columns: u32,
    },
    /// The start position does not lie inside an open cell.
    #[error("start position ({x}, {z}) is not inside an open cell")]
    StartBlocked {
        /// Start coordinate along x.
        x: f32,
        /// Start coordinate along z.
        z: f32,
    },
    /// A path maze was given fewer than two waypoints.
    #[error("path maze needs at least two waypoints, found {found}")]
    PathTooShort {
        /// Number of waypoints provided.
        found: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("level coordinates must be finite")]
    NonFinite,
}

/// Reasons a level sequence cannot form a world.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum WorldError {
    /// The sequence holds no levels.
    #[error("level sequence is empty")]
    NoLevels,
    /// A level of the sequence failed validation.
    #[error("level {index} is invalid: {source}")]
    InvalidLevel {
        /// Zero-based position of the level within the sequence.
        index: usize,
        /// Validation failure.
        #[source]
        source: LevelError,
    },
    /// A level's identifier does not match its position in the sequence.
    #[error("level at position {index} is numbered {found}")]
    Misnumbered {
        /// Zero-based position of the level within the sequence.
        index: usize,
        /// Zero-based index carried by the level.
        found: u32,
    },
    /// Levels of different variants were mixed in one sequence.
    #[error("level {index} is a {found} level in a {expected} world")]
    MixedVariants {
        /// Zero-based position of the level within the sequence.
        index: usize,
        /// Variant of the first level.
        expected: MazeVariant,
        /// Variant of the offending level.
        found: MazeVariant,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_aliases_share_a_heading() {
        let mut keys = KeyState::default();
        keys.set(MovementKey::W, true);
        keys.set(MovementKey::ArrowUp, true);
        keys.set(MovementKey::ArrowUp, false);

        assert!(keys.movement_input().up, "W still holds the up heading");

        keys.set(MovementKey::W, false);
        assert!(keys.movement_input().is_idle());
    }

    #[test]
    fn opposing_directions_cancel_out() {
        let input = MovementInput {
            up: true,
            down: true,
            left: false,
            right: true,
        };

        assert_eq!(input.axis_z(), 0.0);
        assert_eq!(input.axis_x(), 1.0);
    }

    #[test]
    fn hud_formats_one_decimal_and_unset_best() {
        let status = HudStatus {
            level_number: 3,
            elapsed_seconds: 12.345,
            best_seconds: None,
        };

        assert_eq!(status.level_text(), "3");
        assert_eq!(status.elapsed_text(), "12.3");
        assert_eq!(status.best_text(), "0.0");

        let with_best = HudStatus {
            best_seconds: Some(7.06),
            ..status
        };
        assert_eq!(with_best.best_text(), "7.1");
    }

    #[test]
    fn notifications_name_levels_and_total_time() {
        let level = Notification::LevelComplete {
            completed_number: 1,
            next_number: 2,
        };
        assert!(level.message().starts_with("Level 1 complete!"));
        assert!(level.message().contains("level 2"));

        let run = Notification::RunComplete {
            level_count: 5,
            elapsed_seconds: 42.26,
        };
        assert_eq!(
            run.message(),
            "You completed all 5 levels! Total time: 42.3s"
        );
    }

    #[test]
    fn timestamps_saturate_when_reversed() {
        let earlier = Timestamp::from_secs_f64(2.0);
        let later = Timestamp::from_secs_f64(5.5);

        assert_eq!(later.saturating_since(earlier), Duration::from_millis(3_500));
        assert_eq!(earlier.saturating_since(later), Duration::ZERO);
        assert_eq!(Timestamp::from_secs_f64(f64::NAN), Timestamp::ZERO);
    }

    #[test]
    fn stored_seconds_must_be_non_negative_decimals() {
        assert_eq!(StoreError::parse_seconds(" 12.5 ").ok(), Some(12.5));
        assert!(matches!(
            StoreError::parse_seconds("fast"),
            Err(StoreError::Corrupt { .. })
        ));
        assert!(StoreError::parse_seconds("-1").is_err());
        assert!(StoreError::parse_seconds("inf").is_err());
    }
}
