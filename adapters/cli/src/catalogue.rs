//! Plain-text rendering of the level catalogue for the `levels` command.

use alien_maze_core::{CellKind, GridCell, Level, MazeShape};

/// Renders one level as a heading followed by its layout.
///
/// Grid rows are printed top to bottom with `#` for walls, `.` for open
/// cells, `S` for the start cell and `E` for the exit cell.
pub(crate) fn render_level(level: &Level) -> String {
    let number = level.id().number();
    match level.maze() {
        MazeShape::Grid(grid) => {
            let start = GridCell::containing(level.start());
            let exit = GridCell::containing(level.exit());
            let mut out = format!(
                "Level {number} (grid, {}x{})\n",
                grid.rows(),
                grid.columns()
            );
            for row in 0..grid.rows() {
                let line: String = (0..grid.columns())
                    .map(|column| {
                        let cell = GridCell::new(row, column);
                        if Some(cell) == start {
                            'S'
                        } else if Some(cell) == exit {
                            'E'
                        } else {
                            match grid.cell(cell) {
                                Some(CellKind::Open) => '.',
                                _ => '#',
                            }
                        }
                    })
                    .collect();
                out.push_str(&line);
                out.push('\n');
            }
            out
        }
        MazeShape::Path(path) => {
            let route = path
                .waypoints()
                .iter()
                .map(|point| format!("({:.1}, {:.1})", point.x(), point.z()))
                .collect::<Vec<_>>()
                .join(" -> ");
            format!(
                "Level {number} (path, {} waypoints)\n{route}\n",
                path.waypoints().len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alien_maze_core::{LevelId, MazeVariant};
    use alien_maze_world::{query, World};

    #[test]
    fn grid_levels_mark_start_and_exit() {
        let world = World::new(MazeVariant::Grid).expect("grid world");
        let level = query::level(&world, LevelId::FIRST).expect("first level");

        assert_eq!(
            render_level(level),
            "Level 1 (grid, 6x6)\n\
             ######\n\
             #S...#\n\
             #.##.#\n\
             #..#.#\n\
             #...E#\n\
             ######\n"
        );
    }

    #[test]
    fn path_levels_list_their_route() {
        let world = World::new(MazeVariant::Path).expect("path world");
        let level = query::level(&world, LevelId::FIRST).expect("first level");

        assert_eq!(
            render_level(level),
            "Level 1 (path, 3 waypoints)\n(1.0, 1.0) -> (6.0, 1.0) -> (6.0, 6.0)\n"
        );
    }
}
