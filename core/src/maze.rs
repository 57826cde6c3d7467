//! Maze shapes that back a level: collision grids and decorative paths.

use serde::{Deserialize, Serialize};

use crate::{LevelError, MazeVariant, Point};

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Solid cell the player cannot enter.
    Wall,
    /// Walkable cell.
    Open,
}

impl CellKind {
    /// Decodes the `0 = open`, anything else = wall convention of the level data.
    #[must_use]
    pub const fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Self::Open
        } else {
            Self::Wall
        }
    }

    /// Reports whether the player may occupy the cell.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    row: u32,
    column: u32,
}

impl GridCell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index, the floor of a position's x coordinate.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index, the floor of a position's z coordinate.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Floor position at the centre of the cell.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.row as f32 + 0.5, self.column as f32 + 0.5)
    }

    /// Cell containing the provided position, or `None` for negative or non-finite coordinates.
    #[must_use]
    pub fn containing(position: Point) -> Option<Self> {
        let row = position.x().floor();
        let column = position.z().floor();
        // Comparisons are false for NaN, which rejects it along with negatives.
        if !(row >= 0.0 && column >= 0.0) || !row.is_finite() || !column.is_finite() {
            return None;
        }
        Some(Self::new(row as u32, column as u32))
    }
}

/// Rectangular grid of wall and open cells with collision semantics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMaze {
    rows: u32,
    columns: u32,
    cells: Vec<CellKind>,
}

impl GridMaze {
    /// Builds a grid from rows of `0 = open` / `1 = wall` values.
    ///
    /// Every row must have the same length as the first one.
    pub fn from_bits<R>(rows: &[R]) -> Result<Self, LevelError>
    where
        R: AsRef<[u8]>,
    {
        let expected = rows.first().map_or(0, |row| row.as_ref().len());
        if expected == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != expected {
                return Err(LevelError::RaggedRow {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            cells.extend(row.iter().copied().map(CellKind::from_bit));
        }

        let row_count = u32::try_from(rows.len()).map_err(|_| LevelError::EmptyGrid)?;
        let column_count = u32::try_from(expected).map_err(|_| LevelError::EmptyGrid)?;

        Ok(Self {
            rows: row_count,
            columns: column_count,
            cells,
        })
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Contents of the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn cell(&self, cell: GridCell) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Contents of the cell containing the provided position.
    #[must_use]
    pub fn cell_at(&self, position: Point) -> Option<CellKind> {
        GridCell::containing(position).and_then(|cell| self.cell(cell))
    }

    /// Reports whether the position lies inside an in-bounds open cell.
    #[must_use]
    pub fn is_open_at(&self, position: Point) -> bool {
        self.cell_at(position).is_some_and(CellKind::is_open)
    }

    /// Derives the exit cell.
    ///
    /// The exit sits in the second-to-last row and second-to-last column when
    /// that cell is open, otherwise one column further left. There is no
    /// further fallback.
    pub fn exit_cell(&self) -> Result<GridCell, LevelError> {
        let no_exit = LevelError::NoExitCell {
            rows: self.rows,
            columns: self.columns,
        };
        let (Some(row), Some(column)) = (self.rows.checked_sub(2), self.columns.checked_sub(2))
        else {
            return Err(no_exit);
        };

        let preferred = GridCell::new(row, column);
        if self.cell(preferred).is_some_and(CellKind::is_open) {
            return Ok(preferred);
        }

        let fallback = column
            .checked_sub(1)
            .map(|column| GridCell::new(row, column))
            .filter(|cell| self.cell(*cell).is_some_and(CellKind::is_open));
        fallback.ok_or(no_exit)
    }

    /// Iterator over every wall cell in row-major order.
    pub fn wall_cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| !kind.is_open())
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(GridCell::new(index / columns, index % columns))
            })
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        if cell.row() < self.rows && cell.column() < self.columns {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Ordered waypoints describing decorative corridor segments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathMaze {
    waypoints: Vec<Point>,
}

impl PathMaze {
    /// Creates a path from at least two finite waypoints.
    pub fn new(waypoints: Vec<Point>) -> Result<Self, LevelError> {
        if waypoints.len() < 2 {
            return Err(LevelError::PathTooShort {
                found: waypoints.len(),
            });
        }
        if !waypoints.iter().all(|point| point.is_finite()) {
            return Err(LevelError::NonFinite);
        }
        Ok(Self { waypoints })
    }

    /// Waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    /// First waypoint, where the player starts.
    #[must_use]
    pub fn first(&self) -> Point {
        self.waypoints.first().copied().unwrap_or_default()
    }

    /// Last waypoint, where the exit sits.
    #[must_use]
    pub fn last(&self) -> Point {
        self.waypoints.last().copied().unwrap_or_default()
    }

    /// Iterator over consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.waypoints
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
    }
}

/// Maze backing a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MazeShape {
    /// Grid with collision.
    Grid(GridMaze),
    /// Decorative path without collision.
    Path(PathMaze),
}

impl MazeShape {
    /// Decides whether the player may move from `current` to `candidate`.
    ///
    /// Grids test the single cell containing the candidate, so diagonal steps
    /// are judged by their combined destination with no sliding along walls.
    /// Paths accept every move.
    #[must_use]
    pub fn is_legal_move(&self, _current: Point, candidate: Point) -> bool {
        match self {
            Self::Grid(grid) => grid.is_open_at(candidate),
            Self::Path(_) => true,
        }
    }

    /// Variant family of the shape.
    #[must_use]
    pub const fn variant(&self) -> MazeVariant {
        match self {
            Self::Grid(_) => MazeVariant::Grid,
            Self::Path(_) => MazeVariant::Path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST_LEVEL: [[u8; 6]; 6] = [
        [1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 1],
        [1, 0, 1, 1, 0, 1],
        [1, 0, 0, 1, 0, 1],
        [1, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1],
    ];

    fn first_level() -> GridMaze {
        GridMaze::from_bits(&FIRST_LEVEL).expect("valid grid")
    }

    #[test]
    fn legality_matches_every_cell_regardless_of_origin() {
        let shape = MazeShape::Grid(first_level());
        let origins = [Point::new(1.0, 1.0), Point::new(4.5, 4.5), Point::new(-3.0, 9.0)];

        for (row, cells) in FIRST_LEVEL.iter().enumerate() {
            for (column, bit) in cells.iter().enumerate() {
                let candidate = Point::new(row as f32 + 0.25, column as f32 + 0.75);
                for origin in origins {
                    assert_eq!(
                        shape.is_legal_move(origin, candidate),
                        *bit == 0,
                        "cell ({row}, {column}) from {origin:?}",
                    );
                }
            }
        }
    }

    #[test]
    fn stepping_into_the_border_is_rejected() {
        let shape = MazeShape::Grid(first_level());

        assert!(!shape.is_legal_move(Point::new(1.0, 1.0), Point::new(0.9, 1.0)));
        assert!(shape.is_legal_move(Point::new(1.0, 1.0), Point::new(1.1, 1.0)));
    }

    #[test]
    fn out_of_bounds_candidates_are_rejected() {
        let grid = first_level();

        assert!(!grid.is_open_at(Point::new(-0.1, 1.5)));
        assert!(!grid.is_open_at(Point::new(1.5, 6.0)));
        assert!(!grid.is_open_at(Point::new(f32::NAN, 1.5)));
        assert!(!grid.is_open_at(Point::new(1.5, f32::INFINITY)));
    }

    #[test]
    fn diagonal_moves_use_the_combined_destination_cell() {
        let grid = MazeShape::Grid(first_level());

        // (1.95, 1.95) -> (2.05, 2.05) lands in wall cell (2, 2) even though
        // (2, 1) and (1, 2) are both open.
        assert!(!grid.is_legal_move(Point::new(1.95, 1.95), Point::new(2.05, 2.05)));
    }

    #[test]
    fn paths_accept_every_move() {
        let path = PathMaze::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)])
            .expect("valid path");
        let shape = MazeShape::Path(path);

        assert!(shape.is_legal_move(Point::new(0.0, 0.0), Point::new(-100.0, 250.0)));
        assert!(shape.is_legal_move(Point::new(0.0, 0.0), Point::new(0.0, 0.0)));
    }

    #[test]
    fn exit_prefers_second_to_last_cell() {
        let grid = first_level();

        assert_eq!(grid.exit_cell(), Ok(GridCell::new(4, 4)));
        assert_eq!(grid.exit_cell(), grid.exit_cell());
        assert_eq!(GridCell::new(4, 4).center(), Point::new(4.5, 4.5));
    }

    #[test]
    fn exit_falls_back_one_column_left() {
        let grid = GridMaze::from_bits(&[
            [1u8, 1, 1, 1, 1],
            [1, 0, 0, 0, 1],
            [1, 0, 0, 1, 1],
            [1, 1, 1, 1, 1],
        ])
        .expect("valid grid");

        assert_eq!(grid.exit_cell(), Ok(GridCell::new(2, 2)));
    }

    #[test]
    fn exit_without_open_candidate_is_an_error() {
        let grid = GridMaze::from_bits(&[
            [1u8, 1, 1, 1],
            [1, 0, 0, 1],
            [1, 1, 1, 1],
            [1, 1, 1, 1],
        ])
        .expect("valid grid");

        assert_eq!(
            grid.exit_cell(),
            Err(LevelError::NoExitCell {
                rows: 4,
                columns: 4
            })
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows: [&[u8]; 2] = [&[1, 1, 1], &[1, 0]];

        assert_eq!(
            GridMaze::from_bits(&rows),
            Err(LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        let empty: [&[u8]; 0] = [];
        assert_eq!(GridMaze::from_bits(&empty), Err(LevelError::EmptyGrid));
    }

    #[test]
    fn wall_cells_enumerate_in_row_major_order() {
        let grid = GridMaze::from_bits(&[[1u8, 0], [0, 1]]).expect("valid grid");
        let walls: Vec<_> = grid.wall_cells().collect();

        assert_eq!(walls, vec![GridCell::new(0, 0), GridCell::new(1, 1)]);
    }

    #[test]
    fn short_paths_are_rejected() {
        assert_eq!(
            PathMaze::new(vec![Point::new(1.0, 1.0)]),
            Err(LevelError::PathTooShort { found: 1 })
        );
        assert_eq!(
            PathMaze::new(vec![Point::new(1.0, 1.0), Point::new(f32::NAN, 0.0)]),
            Err(LevelError::NonFinite)
        );
    }
}
