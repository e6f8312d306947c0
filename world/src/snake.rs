//! Snake body bookkeeping.

use autosnake_core::{Cell, Direction};

/// Ordered body of the snake, head first.
///
/// Consecutive segments are one unit step apart by construction; moves are
/// not validated here, the world checks collisions after each step.
#[derive(Clone, Debug)]
pub(crate) struct Snake {
    body: Vec<Cell>,
    direction: Direction,
    growing: bool,
}

impl Snake {
    /// Creates a snake with its head at the origin heading toward `+x`.
    ///
    /// Additional segments trail behind the head along `-x`.
    pub(crate) fn new(length: usize) -> Self {
        let length = length.max(1);
        let body = (0..length)
            .map(|offset| Cell::new(-i32::try_from(offset).unwrap_or(i32::MAX), 0, 0))
            .collect();
        Self {
            body,
            direction: Direction::PositiveX,
            growing: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_body(body: Vec<Cell>, direction: Direction) -> Self {
        assert!(!body.is_empty(), "snake body must not be empty");
        Self {
            body,
            direction,
            growing: false,
        }
    }

    pub(crate) fn head(&self) -> Cell {
        self.body[0]
    }

    pub(crate) fn body(&self) -> &[Cell] {
        &self.body
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    /// Takes a single step, optionally turning first.
    ///
    /// The tail is kept exactly once after [`Snake::grow`] was requested.
    pub(crate) fn advance(&mut self, turn: Option<Direction>) {
        if let Some(direction) = turn {
            self.direction = direction;
        }

        let new_head = self.head().step(self.direction);
        self.body.insert(0, new_head);
        if self.growing {
            self.growing = false;
        } else {
            let _ = self.body.pop();
        }
    }

    /// Keeps the tail on the next step.
    pub(crate) fn grow(&mut self) {
        self.growing = true;
    }

    /// Reports whether the head left the arena or overlaps the rest of the body.
    pub(crate) fn check_collision(&self, half_extent: i32) -> bool {
        let head = self.head();
        !head.in_bounds(half_extent) || self.body[1..].contains(&head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snake_trails_behind_origin() {
        let snake = Snake::new(3);
        assert_eq!(
            snake.body(),
            &[Cell::ORIGIN, Cell::new(-1, 0, 0), Cell::new(-2, 0, 0)]
        );
        assert_eq!(snake.direction(), Direction::PositiveX);
    }

    #[test]
    fn advance_keeps_length_without_growth() {
        let mut snake = Snake::new(4);
        for turn in [None, Some(Direction::PositiveY), Some(Direction::NegativeZ), None] {
            let before = snake.len();
            snake.advance(turn);
            assert_eq!(snake.len(), before);
        }
        assert_eq!(snake.head(), Cell::new(1, 1, -2));
    }

    #[test]
    fn growth_is_consumed_by_a_single_step() {
        let mut snake = Snake::new(1);
        snake.grow();
        snake.advance(None);
        assert_eq!(snake.body(), &[Cell::new(1, 0, 0), Cell::ORIGIN]);

        snake.advance(None);
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn reoccupying_the_neck_is_a_collision() {
        let mut snake = Snake::from_body(
            vec![Cell::ORIGIN, Cell::new(1, 0, 0), Cell::new(2, 0, 0)],
            Direction::NegativeX,
        );
        snake.advance(Some(Direction::PositiveX));
        assert_eq!(snake.head(), Cell::new(1, 0, 0));
        assert!(snake.check_collision(24));
    }

    #[test]
    fn leaving_the_arena_is_a_collision() {
        let mut snake = Snake::from_body(vec![Cell::new(0, 0, 2)], Direction::PositiveZ);
        assert!(!snake.check_collision(2));
        snake.advance(None);
        assert!(snake.check_collision(2));
    }

    #[test]
    fn a_lone_head_never_collides_with_itself() {
        let snake = Snake::new(1);
        assert!(!snake.check_collision(1));
    }
}
