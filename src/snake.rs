use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width())
            && self.y < i32::from(bounds.height())
    }

    /// Returns the neighbouring cell one step towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake body plus heading and the single-slot turn buffer.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Direction,
}

impl Snake {
    /// Creates a one-cell snake at `start` with the provided direction.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_front(start);

        Self {
            body,
            direction,
            pending_direction: direction,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: direction,
        }
    }

    /// Queues a turn for the next tick, overwriting any earlier request.
    ///
    /// Reversals of the current heading are dropped. Returns whether the
    /// request was stored.
    pub fn set_pending_direction(&mut self, requested: Direction) -> bool {
        if !direction_change_is_valid(self.direction, requested) {
            return false;
        }

        self.pending_direction = requested;
        true
    }

    /// Commits the queued turn and returns the cell the head would enter.
    pub fn turn_and_peek(&mut self) -> Position {
        self.direction = self.pending_direction;
        self.head().step(self.direction)
    }

    /// Returns true if moving the head into `next` hits the body.
    ///
    /// The tail cell only counts while growing, since otherwise it is vacated
    /// in the same step.
    #[must_use]
    pub fn would_collide(&self, next: Position, growing: bool) -> bool {
        let considered = if growing {
            self.body.len()
        } else {
            self.body.len() - 1
        };

        self.body.iter().take(considered).any(|segment| *segment == next)
    }

    /// Moves the head into `next`, keeping the tail when `grow` is set.
    pub fn advance(&mut self, next: Position, grow: bool) {
        self.body.push_front(next);
        if !grow {
            let _ = self.body.pop_back();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the direction the next tick will commit.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::input::Direction;

    use super::{Position, Snake};

    #[test]
    fn snake_moves_one_cell_per_tick() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);

        let next = snake.turn_and_peek();
        snake.advance(next, false);

        assert_eq!(snake.head(), Position { x: 6, y: 5 });
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn snake_growth_keeps_previous_tail() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);

        let next = snake.turn_and_peek();
        snake.advance(next, true);

        assert_eq!(snake.len(), 2);
        assert!(snake.occupies(Position { x: 5, y: 5 }));
    }

    #[test]
    fn pending_direction_rejects_reverse() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Up);

        assert!(!snake.set_pending_direction(Direction::Down));
        assert_eq!(snake.pending_direction(), Direction::Up);

        let next = snake.turn_and_peek();
        assert_eq!(next, Position { x: 5, y: 4 });
    }

    #[test]
    fn pending_direction_last_request_wins() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Down);

        assert!(snake.set_pending_direction(Direction::Right));
        assert!(snake.set_pending_direction(Direction::Left));

        let next = snake.turn_and_peek();
        assert_eq!(next, Position { x: 4, y: 5 });
        assert_eq!(snake.direction(), Direction::Left);
    }

    #[test]
    fn reversal_is_judged_against_heading_not_pending_turn() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Down);

        // Right is queued, but Left only reverses the queued turn, not the heading.
        snake.set_pending_direction(Direction::Right);
        assert!(snake.set_pending_direction(Direction::Left));
        assert!(!snake.set_pending_direction(Direction::Up));
        assert_eq!(snake.pending_direction(), Direction::Left);
    }

    #[test]
    fn vacated_tail_is_not_a_collision() {
        // Square loop: head at (1,0) moving Down into (1,1), which is the tail.
        let snake = Snake::from_segments(
            vec![
                Position { x: 1, y: 0 },
                Position { x: 0, y: 0 },
                Position { x: 0, y: 1 },
                Position { x: 1, y: 1 },
            ],
            Direction::Down,
        );

        assert!(!snake.would_collide(Position { x: 1, y: 1 }, false));
        assert!(snake.would_collide(Position { x: 1, y: 1 }, true));
        assert!(snake.would_collide(Position { x: 0, y: 1 }, false));
    }
}
