use std::time::Duration;

use autosnake_core::{Cell, Command, Config, Direction, Event, Phase};
use autosnake_world::{self as world, query, World};

fn config(initial_length: u32) -> Config {
    let mut config = Config::default();
    config.snake.initial_length = initial_length;
    config
}

fn apply(world: &mut World, config: &Config, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, config, command, &mut events).expect("command applies");
    events
}

fn tick(world: &mut World, config: &Config, millis: u64) -> Vec<Event> {
    apply(
        world,
        config,
        Command::Tick {
            now: Duration::from_millis(millis),
        },
    )
}

#[test]
fn death_sequence_dissolves_every_segment_then_resets() {
    let config = config(5);
    let mut world = World::new(&config).expect("world builds");
    let _ = tick(&mut world, &config, 0);
    let _ = apply(&mut world, &config, Command::ForceDeath);
    assert_eq!(query::phase(&world), Phase::Dying);

    let mut dissolved = Vec::new();
    let mut completed_at = None;
    let mut reset_at = None;
    for millis in (5..=6_000).step_by(5) {
        for event in tick(&mut world, &config, millis) {
            match event {
                Event::SegmentDissolved { cell, remaining } => {
                    assert_eq!(query::visible_segments(&world).len(), remaining);
                    dissolved.push((millis, cell, remaining));
                }
                Event::PhaseChanged {
                    phase: Phase::DeathComplete,
                } => completed_at = Some(millis),
                Event::WorldReset => reset_at = Some(millis),
                _ => {}
            }
        }
        if reset_at.is_some() {
            break;
        }
    }

    assert_eq!(
        dissolved,
        vec![
            (5, Cell::new(-4, 0, 0), 4),
            (505, Cell::new(-3, 0, 0), 3),
            (980, Cell::new(-2, 0, 0), 2),
            (1_430, Cell::new(-1, 0, 0), 1),
            (1_855, Cell::ORIGIN, 0),
        ]
    );
    assert_eq!(completed_at, Some(1_855));
    assert_eq!(reset_at, Some(4_855));

    assert_eq!(query::phase(&world), Phase::Alive);
    assert_eq!(query::visible_segments(&world).len(), 5);
    assert_eq!(query::snake_view(&world).head(), Cell::ORIGIN);
}

#[test]
fn death_complete_hides_the_snake_until_reset() {
    let config = config(1);
    let mut world = World::new(&config).expect("world builds");
    let _ = apply(&mut world, &config, Command::ForceDeath);
    let _ = tick(&mut world, &config, 250);

    assert_eq!(query::phase(&world), Phase::DeathComplete);
    assert!(query::visible_segments(&world).is_empty());

    let waiting = tick(&mut world, &config, 3_249);
    assert_eq!(
        waiting,
        vec![Event::TimeAdvanced {
            now: Duration::from_millis(3_249)
        }]
    );
    let stepped = apply(
        &mut world,
        &config,
        Command::StepSnake {
            direction: Direction::PositiveY,
        },
    );
    assert!(stepped.is_empty());

    let reset = tick(&mut world, &config, 3_250);
    assert!(reset.contains(&Event::WorldReset));
    assert_eq!(query::visible_segments(&world), &[Cell::ORIGIN]);
}

#[test]
fn reset_recreates_the_configured_snake() {
    let config = config(4);
    let mut world = World::new(&config).expect("world builds");
    for direction in [Direction::PositiveY, Direction::PositiveZ, Direction::NegativeX] {
        let _ = apply(&mut world, &config, Command::StepSnake { direction });
    }
    let _ = apply(&mut world, &config, Command::ForceGrowth);
    let _ = apply(
        &mut world,
        &config,
        Command::StepSnake {
            direction: Direction::NegativeX,
        },
    );

    let events = apply(&mut world, &config, Command::Reset);
    let food = query::food(&world);
    assert_eq!(
        events,
        vec![
            Event::WorldReset,
            Event::FoodSpawned { cell: food },
            Event::PhaseChanged {
                phase: Phase::Alive
            },
        ]
    );
    assert_eq!(
        query::visible_segments(&world),
        &[
            Cell::ORIGIN,
            Cell::new(-1, 0, 0),
            Cell::new(-2, 0, 0),
            Cell::new(-3, 0, 0)
        ]
    );
    assert!(!query::snake_view(&world).contains(food));
}

#[test]
fn scripted_session_replays_identically() {
    let config = config(3);
    let first = replay(&config);
    let second = replay(&config);
    assert_eq!(first, second, "replay diverged between runs");
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::SnakeMoved { .. })));
}

#[test]
fn seeds_select_independent_food_streams() {
    let mut left = config(1);
    left.gameplay.seed = 1;
    let mut right = config(1);
    right.gameplay.seed = 2;

    let foods = |config: &Config| {
        let mut world = World::new(config).expect("world builds");
        let mut cells = vec![query::food(&world)];
        for _ in 0..4 {
            let _ = apply(&mut world, config, Command::Reset);
            cells.push(query::food(&world));
        }
        cells
    };

    assert_eq!(foods(&left), foods(&left));
    assert_ne!(foods(&left), foods(&right));
}

fn replay(config: &Config) -> Vec<Event> {
    let mut world = World::new(config).expect("world builds");
    let mut log = Vec::new();
    let pattern = [
        Direction::PositiveX,
        Direction::PositiveY,
        Direction::PositiveZ,
        Direction::NegativeX,
        Direction::NegativeY,
        Direction::PositiveZ,
    ];

    for frame in 0..400_u64 {
        let events = tick(&mut world, config, frame * 16);
        let due = events
            .iter()
            .any(|event| matches!(event, Event::MoveDue { .. }));
        log.extend(events);
        if due {
            let index = usize::try_from(frame).expect("frame fits") % pattern.len();
            log.extend(apply(
                &mut world,
                config,
                Command::StepSnake {
                    direction: pattern[index],
                },
            ));
        }
    }
    log
}
