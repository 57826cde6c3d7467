//! Hard-coded level data for both maze variants.

use alien_maze_core::{GridMaze, Level, LevelId, PathMaze, Point, WorldError};

const GRID_LEVEL_1: &[&[u8]] = &[
    &[1, 1, 1, 1, 1, 1],
    &[1, 0, 0, 0, 0, 1],
    &[1, 0, 1, 1, 0, 1],
    &[1, 0, 0, 1, 0, 1],
    &[1, 0, 0, 0, 0, 1],
    &[1, 1, 1, 1, 1, 1],
];

const GRID_LEVEL_2: &[&[u8]] = &[
    &[1, 1, 1, 1, 1, 1, 1],
    &[1, 0, 0, 1, 0, 0, 1],
    &[1, 1, 0, 1, 0, 1, 1],
    &[1, 0, 0, 0, 0, 0, 1],
    &[1, 0, 1, 1, 1, 0, 1],
    &[1, 0, 0, 0, 0, 0, 1],
    &[1, 1, 1, 1, 1, 1, 1],
];

const GRID_LEVEL_3: &[&[u8]] = &[
    &[1, 1, 1, 1, 1, 1, 1, 1],
    &[1, 0, 1, 0, 0, 1, 0, 1],
    &[1, 0, 1, 0, 1, 1, 0, 1],
    &[1, 0, 0, 0, 0, 0, 0, 1],
    &[1, 1, 1, 1, 1, 0, 1, 1],
    &[1, 0, 0, 0, 0, 0, 0, 1],
    &[1, 0, 1, 1, 1, 1, 0, 1],
    &[1, 1, 1, 1, 1, 1, 1, 1],
];

const GRID_LEVEL_4: &[&[u8]] = &[
    &[1, 1, 1, 1, 1, 1, 1, 1, 1],
    &[1, 0, 0, 0, 1, 0, 0, 0, 1],
    &[1, 1, 1, 0, 1, 0, 1, 0, 1],
    &[1, 0, 0, 0, 0, 0, 1, 0, 1],
    &[1, 0, 1, 1, 1, 1, 1, 0, 1],
    &[1, 0, 0, 0, 0, 0, 0, 0, 1],
    &[1, 0, 1, 1, 1, 0, 1, 0, 1],
    &[1, 0, 0, 0, 0, 0, 1, 0, 1],
    &[1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const GRID_LEVEL_5: &[&[u8]] = &[
    &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    &[1, 0, 1, 0, 0, 1, 0, 1, 0, 0, 1],
    &[1, 0, 1, 0, 1, 1, 0, 1, 1, 0, 1],
    &[1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    &[1, 1, 1, 1, 1, 0, 1, 0, 1, 0, 1],
    &[1, 0, 0, 0, 1, 0, 1, 0, 0, 0, 1],
    &[1, 0, 1, 0, 1, 0, 1, 1, 1, 0, 1],
    &[1, 0, 1, 0, 0, 0, 0, 0, 1, 0, 1],
    &[1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1],
    &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const GRID_LEVELS: [&[&[u8]]; 5] = [
    GRID_LEVEL_1,
    GRID_LEVEL_2,
    GRID_LEVEL_3,
    GRID_LEVEL_4,
    GRID_LEVEL_5,
];

const PATH_LEVEL_1: &[(f32, f32)] = &[(1.0, 1.0), (6.0, 1.0), (6.0, 6.0)];

const PATH_LEVEL_2: &[(f32, f32)] = &[(1.0, 1.0), (1.0, 5.0), (4.0, 5.0), (4.0, 2.0), (8.0, 2.0)];

const PATH_LEVEL_3: &[(f32, f32)] = &[
    (1.0, 1.0),
    (5.0, 1.0),
    (5.0, 4.0),
    (2.0, 4.0),
    (2.0, 8.0),
    (8.0, 8.0),
];

const PATH_LEVEL_4: &[(f32, f32)] = &[
    (0.0, 0.0),
    (3.0, 0.0),
    (3.0, 3.0),
    (0.0, 3.0),
    (0.0, 6.0),
    (6.0, 6.0),
    (6.0, 1.0),
    (9.0, 1.0),
];

const PATH_LEVEL_5: &[(f32, f32)] = &[
    (0.0, 0.0),
    (10.0, 0.0),
    (10.0, 10.0),
    (0.0, 10.0),
    (0.0, 2.0),
    (8.0, 2.0),
    (8.0, 8.0),
    (2.0, 8.0),
    (2.0, 4.0),
    (6.0, 4.0),
    (6.0, 6.0),
    (4.0, 6.0),
];

const PATH_LEVELS: [&[(f32, f32)]; 5] = [
    PATH_LEVEL_1,
    PATH_LEVEL_2,
    PATH_LEVEL_3,
    PATH_LEVEL_4,
    PATH_LEVEL_5,
];

/// Builds the five grid levels in play order.
pub(crate) fn grid_levels() -> Result<Vec<Level>, WorldError> {
    GRID_LEVELS
        .iter()
        .enumerate()
        .map(|(index, &rows)| {
            let id = level_id(index);
            GridMaze::from_bits(rows)
                .and_then(|maze| Level::grid(id, maze))
                .map_err(|source| WorldError::InvalidLevel { index, source })
        })
        .collect()
}

/// Builds the five path levels in play order.
pub(crate) fn path_levels() -> Result<Vec<Level>, WorldError> {
    PATH_LEVELS
        .iter()
        .enumerate()
        .map(|(index, &waypoints)| {
            let points = waypoints
                .iter()
                .map(|&(x, z)| Point::new(x, z))
                .collect();
            PathMaze::new(points)
                .map(|path| Level::path(level_id(index), path))
                .map_err(|source| WorldError::InvalidLevel { index, source })
        })
        .collect()
}

fn level_id(index: usize) -> LevelId {
    LevelId::new(u32::try_from(index).unwrap_or(u32::MAX))
}
