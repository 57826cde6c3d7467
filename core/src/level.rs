//! Immutable level definitions.

use serde::{Deserialize, Serialize};

use crate::{
    GridMaze, LevelError, MazeShape, MazeVariant, PathMaze, Point, GRID_EXIT_TOLERANCE,
    GRID_MOVE_SPEED, PATH_EXIT_RADIUS, PATH_MOVE_SPEED,
};

/// Zero-based position of a level within the fixed level sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(u32);

impl LevelId {
    /// First level of every run.
    pub const FIRST: Self = Self(0);

    /// Creates a new level identifier with the provided index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// One-based number shown to players.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.0.saturating_add(1)
    }
}

/// Test deciding whether the player stands on the exit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExitProximity {
    /// Both per-axis distances must be below the tolerance.
    AxisAligned {
        /// Exclusive per-axis tolerance.
        tolerance: f32,
    },
    /// The Euclidean distance must be below the radius.
    Radial {
        /// Exclusive radius.
        radius: f32,
    },
}

impl ExitProximity {
    /// Reports whether `player` is close enough to `exit`.
    #[must_use]
    pub fn contains(self, exit: Point, player: Point) -> bool {
        match self {
            Self::AxisAligned { tolerance } => {
                (player.x() - exit.x()).abs() < tolerance
                    && (player.z() - exit.z()).abs() < tolerance
            }
            Self::Radial { radius } => player.distance(exit) < radius,
        }
    }
}

/// One level of the fixed sequence: a maze plus its start and exit positions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    id: LevelId,
    maze: MazeShape,
    start: Point,
    exit: Point,
    move_speed: f32,
}

impl Level {
    /// Position every grid level starts the player at.
    pub const GRID_START: Point = Point::new(1.0, 1.0);

    /// Builds a grid level starting at [`Level::GRID_START`].
    pub fn grid(id: LevelId, maze: GridMaze) -> Result<Self, LevelError> {
        Self::grid_with_start(id, maze, Self::GRID_START)
    }

    /// Builds a grid level with an explicit start position.
    ///
    /// The exit is derived once from the grid and placed at the centre of the
    /// exit cell. The start must lie inside an open cell.
    pub fn grid_with_start(id: LevelId, maze: GridMaze, start: Point) -> Result<Self, LevelError> {
        if !start.is_finite() {
            return Err(LevelError::NonFinite);
        }
        if !maze.is_open_at(start) {
            return Err(LevelError::StartBlocked {
                x: start.x(),
                z: start.z(),
            });
        }
        let exit = maze.exit_cell()?.center();

        Ok(Self {
            id,
            maze: MazeShape::Grid(maze),
            start,
            exit,
            move_speed: GRID_MOVE_SPEED,
        })
    }

    /// Builds a path level that starts at the first waypoint and exits at the last.
    #[must_use]
    pub fn path(id: LevelId, path: PathMaze) -> Self {
        let start = path.first();
        let exit = path.last();
        Self {
            id,
            maze: MazeShape::Path(path),
            start,
            exit,
            move_speed: PATH_MOVE_SPEED,
        }
    }

    /// Identifier of the level.
    #[must_use]
    pub const fn id(&self) -> LevelId {
        self.id
    }

    /// Maze backing the level.
    #[must_use]
    pub const fn maze(&self) -> &MazeShape {
        &self.maze
    }

    /// Position the player starts at.
    #[must_use]
    pub const fn start(&self) -> Point {
        self.start
    }

    /// Position of the exit.
    #[must_use]
    pub const fn exit(&self) -> Point {
        self.exit
    }

    /// Displacement applied per frame while a direction is held.
    #[must_use]
    pub const fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Variant family of the level's maze.
    #[must_use]
    pub const fn variant(&self) -> MazeVariant {
        self.maze.variant()
    }

    /// Decides whether the player may move from `current` to `candidate`.
    #[must_use]
    pub fn is_legal_move(&self, current: Point, candidate: Point) -> bool {
        self.maze.is_legal_move(current, candidate)
    }

    /// Exit test matching the maze's cell scale.
    #[must_use]
    pub const fn exit_proximity(&self) -> ExitProximity {
        match self.maze {
            MazeShape::Grid(_) => ExitProximity::AxisAligned {
                tolerance: GRID_EXIT_TOLERANCE,
            },
            MazeShape::Path(_) => ExitProximity::Radial {
                radius: PATH_EXIT_RADIUS,
            },
        }
    }

    /// Reports whether the player stands on the exit.
    #[must_use]
    pub fn exit_reached(&self, player: Point) -> bool {
        self.exit_proximity().contains(self.exit, player)
    }
}
