use std::{cell::Cell, rc::Rc, time::Duration};

use alien_maze_core::{
    BestTimeStore, Event, Level, LevelId, MazeVariant, Point, StoreError, Timestamp,
};
use alien_maze_system_progression::{
    LevelProgressionEngine, MemoryBestTimeStore, ProgressionState, Transition,
};
use alien_maze_world::{query, World};

fn at(seconds: f64) -> Timestamp {
    Timestamp::from_secs_f64(seconds)
}

fn grid_world() -> World {
    World::new(MazeVariant::Grid).expect("grid world")
}

fn level(world: &World, id: LevelId) -> &Level {
    query::level(world, id).expect("level in range")
}

/// Drives the engine through the active level, arriving `duration` seconds after `start`.
fn finish_level<S: BestTimeStore>(
    engine: &mut LevelProgressionEngine<S>,
    world: &World,
    start: f64,
    duration: f64,
    events: &mut Vec<Event>,
) -> Transition {
    engine.acknowledge(at(start));
    let active = level(world, engine.current_level());
    engine.check_exit(active.exit(), active, at(start + duration), events)
}

#[test]
fn reaching_the_first_exit_advances_to_the_second_level() {
    let world = grid_world();
    let first = level(&world, LevelId::FIRST);
    let mut engine = LevelProgressionEngine::new(5, MemoryBestTimeStore::default(), at(0.0));
    let mut events = Vec::new();

    // Exit centre is (4.5, 4.5); 0.25 away on both axes is inside the tolerance.
    let transition = engine.check_exit(Point::new(4.25, 4.75), first, at(7.5), &mut events);

    assert_eq!(
        transition,
        Transition::LevelComplete {
            completed: LevelId::FIRST,
            next: LevelId::new(1),
            elapsed_seconds: 7.5,
        }
    );
    assert_eq!(engine.current_level(), LevelId::new(1));
    assert_eq!(engine.run().started_at(), at(7.5));
    assert_eq!(
        events,
        vec![
            Event::BestTimeImproved { seconds: 7.5 },
            Event::LevelCompleted {
                completed: LevelId::FIRST,
                next: LevelId::new(1),
                elapsed_seconds: 7.5,
            },
        ]
    );
}

#[test]
fn progression_is_monotonic_and_cyclic() {
    let world = grid_world();
    let mut engine = LevelProgressionEngine::new(5, MemoryBestTimeStore::default(), at(0.0));
    let mut events = Vec::new();

    let mut visited = vec![engine.current_level().get()];
    for lap in 0..10 {
        let transition = finish_level(&mut engine, &world, f64::from(lap) * 10.0, 5.0, &mut events);
        assert_ne!(transition, Transition::Stay);
        visited.push(engine.current_level().get());
    }

    assert_eq!(visited, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4, 0]);
}

#[test]
fn finishing_the_last_level_completes_the_run() {
    let world = grid_world();
    let mut engine = LevelProgressionEngine::new(5, MemoryBestTimeStore::default(), at(0.0));
    let mut events = Vec::new();
    for lap in 0..4 {
        let _ = finish_level(&mut engine, &world, f64::from(lap) * 10.0, 3.0, &mut events);
    }
    assert_eq!(engine.current_level(), LevelId::new(4));
    events.clear();

    let transition = finish_level(&mut engine, &world, 100.0, 42.0, &mut events);

    assert_eq!(
        transition,
        Transition::RunComplete {
            elapsed_seconds: 42.0
        }
    );
    assert_eq!(engine.state(), ProgressionState::RunComplete);
    assert_eq!(engine.current_level(), LevelId::FIRST);
    assert_eq!(
        events,
        vec![Event::RunCompleted {
            elapsed_seconds: 42.0
        }]
    );
}

#[test]
fn best_time_only_ever_decreases_and_is_persisted_on_improvement() {
    let world = grid_world();
    let mut engine = LevelProgressionEngine::new(5, MemoryBestTimeStore::default(), at(0.0));
    let mut events = Vec::new();

    let durations = [9.0, 12.0, 4.0, 4.0, 6.5];
    let mut best_after_each = Vec::new();
    for (lap, duration) in durations.into_iter().enumerate() {
        let start = f64::from(u32::try_from(lap).expect("small lap")) * 100.0;
        let _ = finish_level(&mut engine, &world, start, duration, &mut events);
        best_after_each.push(engine.run().best_seconds());
    }

    assert_eq!(
        best_after_each,
        vec![Some(9.0), Some(9.0), Some(4.0), Some(4.0), Some(4.0)]
    );
    assert_eq!(engine.store().best(), Some(4.0));
    // First record plus one strict improvement; ties are not rewritten.
    assert_eq!(engine.store().saves(), 2);
}

#[test]
fn stored_best_is_loaded_at_start_up() {
    let world = grid_world();
    let mut engine = LevelProgressionEngine::new(5, MemoryBestTimeStore::with_best(3.0), at(0.0));
    let mut events = Vec::new();

    let _ = finish_level(&mut engine, &world, 0.0, 8.0, &mut events);

    assert_eq!(engine.run().best_seconds(), Some(3.0));
    assert_eq!(engine.store().saves(), 0);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::BestTimeImproved { .. })));
}

#[test]
fn acknowledging_restarts_the_clock() {
    let mut engine = LevelProgressionEngine::new(5, MemoryBestTimeStore::default(), at(0.0));

    engine.acknowledge(at(20.0));

    assert_eq!(engine.run().started_at(), at(20.0));
    assert!((engine.hud_status(at(21.5)).elapsed_seconds - 1.5).abs() < 1e-9);
}

/// Store whose reads fail and whose writes are counted but rejected.
#[derive(Debug, Default)]
struct BrokenStore {
    attempts: Rc<Cell<usize>>,
}

impl BestTimeStore for BrokenStore {
    fn load(&self) -> Result<Option<f64>, StoreError> {
        Err(StoreError::Corrupt {
            value: "not-a-number".to_owned(),
        })
    }

    fn save(&mut self, _seconds: f64) -> Result<(), StoreError> {
        self.attempts.set(self.attempts.get() + 1);
        Err(StoreError::Unreadable {
            reason: "read-only".to_owned(),
        })
    }
}

#[test]
fn store_failures_degrade_without_stopping_the_run() {
    let world = grid_world();
    let attempts = Rc::new(Cell::new(0));
    let store = BrokenStore {
        attempts: Rc::clone(&attempts),
    };
    let mut engine = LevelProgressionEngine::new(5, store, at(0.0));
    let mut events = Vec::new();

    assert_eq!(engine.run().best_seconds(), None);
    assert_eq!(engine.hud_status(at(0.0)).best_text(), "0.0");

    let transition = finish_level(&mut engine, &world, 0.0, 6.0, &mut events);

    assert!(matches!(transition, Transition::LevelComplete { .. }));
    assert_eq!(engine.run().best_seconds(), Some(6.0));
    assert_eq!(attempts.get(), 1);
}

#[test]
fn elapsed_time_uses_the_host_clock() {
    let world = grid_world();
    let first = level(&world, LevelId::FIRST);
    let start = Timestamp::from_duration(Duration::from_millis(250));
    let mut engine = LevelProgressionEngine::new(5, MemoryBestTimeStore::default(), start);
    let mut events = Vec::new();

    let transition = engine.check_exit(
        first.exit(),
        first,
        Timestamp::from_duration(Duration::from_millis(2_750)),
        &mut events,
    );

    assert!(matches!(
        transition,
        Transition::LevelComplete { elapsed_seconds, .. } if (elapsed_seconds - 2.5).abs() < 1e-9
    ));
}
