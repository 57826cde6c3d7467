#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system translating held directions into player displacement.
//!
//! Speed is a fixed displacement per tick rather than per second, so the
//! effective speed follows the frame rate of the host.

use alien_maze_core::{Event, Level, MovementInput, Point};

/// Owns the player position and advances it once per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementController {
    position: Point,
    speed: f32,
}

impl MovementController {
    /// Places the player at the level's start using the level's speed.
    #[must_use]
    pub fn new(level: &Level) -> Self {
        Self {
            position: level.start(),
            speed: level.move_speed(),
        }
    }

    /// Current player position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Displacement applied per tick along each held axis.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Resets the player to the start of a newly activated level.
    pub fn begin_level(&mut self, level: &Level) {
        self.position = level.start();
        self.speed = level.move_speed();
    }

    /// Teleports the player without consulting the maze.
    pub fn reset_to(&mut self, position: Point) {
        self.position = position;
    }

    /// Advances the player by one tick and returns the resulting position.
    ///
    /// Opposing directions cancel out. A move the level rejects leaves the
    /// position untouched and emits nothing.
    pub fn step(&mut self, input: MovementInput, level: &Level, out: &mut Vec<Event>) -> Point {
        if input.is_idle() {
            return self.position;
        }

        let dx = input.axis_x() * self.speed;
        let dz = input.axis_z() * self.speed;
        if dx == 0.0 && dz == 0.0 {
            return self.position;
        }

        let from = self.position;
        let candidate = from.offset(dx, dz);
        if !level.is_legal_move(from, candidate) {
            log::trace!(
                "rejected move to ({:.2}, {:.2})",
                candidate.x(),
                candidate.z()
            );
            return from;
        }

        self.position = candidate;
        out.push(Event::PlayerMoved {
            from,
            to: candidate,
        });
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alien_maze_core::{LevelId, PathMaze};

    fn open_path_level() -> Level {
        let path = PathMaze::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)])
            .expect("valid path");
        Level::path(LevelId::FIRST, path)
    }

    #[test]
    fn idle_input_keeps_position_and_emits_nothing() {
        let level = open_path_level();
        let mut controller = MovementController::new(&level);
        let mut events = Vec::new();

        let position = controller.step(MovementInput::NONE, &level, &mut events);

        assert_eq!(position, level.start());
        assert!(events.is_empty());
    }

    #[test]
    fn opposing_directions_cancel_out() {
        let level = open_path_level();
        let mut controller = MovementController::new(&level);
        let mut events = Vec::new();
        let input = MovementInput {
            left: true,
            right: true,
            ..MovementInput::NONE
        };

        let position = controller.step(input, &level, &mut events);

        assert_eq!(position, level.start());
        assert!(events.is_empty());
    }

    #[test]
    fn reset_to_ignores_walls() {
        let level = open_path_level();
        let mut controller = MovementController::new(&level);

        controller.reset_to(Point::new(-3.0, 7.0));

        assert_eq!(controller.position(), Point::new(-3.0, 7.0));
    }
}
