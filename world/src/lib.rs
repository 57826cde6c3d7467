#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level catalogue for Alien Maze.

mod levels;

use alien_maze_core::{Level, MazeVariant, WorldError, WELCOME_BANNER};

/// Ordered, immutable sequence of levels played in a run.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    variant: MazeVariant,
    levels: Vec<Level>,
}

impl World {
    /// Creates the built-in five-level world for the provided variant.
    pub fn new(variant: MazeVariant) -> Result<Self, WorldError> {
        let levels = match variant {
            MazeVariant::Grid => levels::grid_levels()?,
            MazeVariant::Path => levels::path_levels()?,
        };
        let world = Self::from_levels(levels)?;
        log::debug!(
            "built {} world with {} levels",
            world.variant,
            world.levels.len()
        );
        Ok(world)
    }

    /// Creates a world from an explicit level sequence.
    ///
    /// The sequence must be non-empty, numbered by position and made of a
    /// single maze variant.
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, WorldError> {
        let variant = levels.first().ok_or(WorldError::NoLevels)?.variant();

        for (index, level) in levels.iter().enumerate() {
            let position = u32::try_from(index).ok();
            if position != Some(level.id().get()) {
                return Err(WorldError::Misnumbered {
                    index,
                    found: level.id().get(),
                });
            }
            if level.variant() != variant {
                return Err(WorldError::MixedVariants {
                    index,
                    expected: variant,
                    found: level.variant(),
                });
            }
        }

        Ok(Self {
            banner: WELCOME_BANNER,
            variant,
            levels,
        })
    }
}

/// Read-only helpers for inspecting the world.
pub mod query {
    use alien_maze_core::{Level, LevelId, MazeVariant};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Maze variant shared by every level of the world.
    #[must_use]
    pub fn variant(world: &World) -> MazeVariant {
        world.variant
    }

    /// Number of levels in a run.
    #[must_use]
    pub fn level_count(world: &World) -> usize {
        world.levels.len()
    }

    /// Looks up a level by identifier.
    #[must_use]
    pub fn level(world: &World, id: LevelId) -> Option<&Level> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| world.levels.get(index))
    }

    /// Every level in play order.
    #[must_use]
    pub fn levels(world: &World) -> &[Level] {
        &world.levels
    }
}
