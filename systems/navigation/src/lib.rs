#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy navigation system that steers the snake toward the food.
//!
//! The planner looks a single step ahead. It keeps the current heading while
//! that heading still closes in on the food, and otherwise ranks the six unit
//! steps by how directly they approach it. It never reverses into the neck.

use autosnake_core::{Axis, Cell, Command, Direction, Event, SnakeView};

/// Pure system that answers move requests with step commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Navigator;

impl Navigator {
    /// Emits a single [`Command::StepSnake`] when the world announced a move.
    pub fn handle(
        &self,
        events: &[Event],
        snake: SnakeView<'_>,
        food: Cell,
        half_extent: i32,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::MoveDue { .. }))
        {
            return;
        }

        out.push(Command::StepSnake {
            direction: choose_direction(snake, food, half_extent),
        });
    }
}

/// Picks the next heading for the snake.
///
/// Returns the current direction when no candidate is both inside the arena
/// and off the body; the world then registers the resulting collision.
#[must_use]
pub fn choose_direction(snake: SnakeView<'_>, food: Cell, half_extent: i32) -> Direction {
    let head = snake.head();
    let current = snake.direction();
    let is_free = |cell: Cell| cell.in_bounds(half_extent) && !snake.contains(cell);

    let ahead = head.step(current);
    if is_free(ahead) && ahead.distance(food) < head.distance(food) {
        return current;
    }

    candidates(food - head, current)
        .into_iter()
        .find(|direction| is_free(head.step(*direction)))
        .unwrap_or(current)
}

/// Ranked steps toward `offset`, excluding the reverse of `current`.
fn candidates(offset: Cell, current: Direction) -> Vec<Direction> {
    let primary = Axis::ALL.into_iter().fold(Axis::X, |best, axis| {
        if offset.component(axis).unsigned_abs() > offset.component(best).unsigned_abs() {
            axis
        } else {
            best
        }
    });

    let mut ranked = vec![Direction::along(primary, offset.component(primary) > 0)];
    for axis in Axis::ALL.into_iter().filter(|axis| *axis != primary) {
        for positive in [true, false] {
            let direction = Direction::along(axis, positive);
            if !ranked.contains(&direction) {
                ranked.push(direction);
            }
        }
    }

    let reverse = current.opposite();
    ranked.retain(|direction| *direction != reverse);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_axis_prefers_largest_offset() {
        let ranked = candidates(Cell::new(1, -7, 3), Direction::PositiveX);
        assert_eq!(
            ranked,
            vec![
                Direction::NegativeY,
                Direction::PositiveX,
                Direction::PositiveZ,
                Direction::NegativeZ,
            ]
        );
    }

    #[test]
    fn ties_resolve_in_axis_order() {
        let ranked = candidates(Cell::new(0, 4, -4), Direction::PositiveY);
        assert_eq!(ranked[0], Direction::PositiveY);

        let ranked = candidates(Cell::new(-2, 2, 2), Direction::NegativeX);
        assert_eq!(ranked[0], Direction::NegativeX);
    }

    #[test]
    fn zero_offset_steps_negative() {
        let ranked = candidates(Cell::ORIGIN, Direction::PositiveY);
        assert_eq!(ranked[0], Direction::NegativeX);
    }

    #[test]
    fn reverse_is_never_ranked() {
        for current in Direction::ALL {
            let ranked = candidates(Cell::new(5, 5, 5), current);
            assert!(!ranked.contains(&current.opposite()));
            // Only the food-facing sign of the primary axis is ranked.
            assert!(!ranked.contains(&Direction::NegativeX));
            assert!(ranked.len() >= 4);
        }
    }
}
