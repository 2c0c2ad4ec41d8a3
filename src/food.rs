use rand::Rng;

use crate::config::{GridSize, MAX_FOOD_SPAWN_ATTEMPTS};
use crate::snake::{Position, Snake};

/// Picks a cell the snake does not occupy.
///
/// Samples uniformly up to [`MAX_FOOD_SPAWN_ATTEMPTS`] times, then falls back
/// to the first free cell in row-major scan order. Returns `None` only when the
/// snake covers the whole grid.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    spawn_position_with_attempts(rng, bounds, snake, MAX_FOOD_SPAWN_ATTEMPTS)
}

fn spawn_position_with_attempts<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
    attempts: usize,
) -> Option<Position> {
    if snake.len() >= bounds.total_cells() {
        return None;
    }

    for _ in 0..attempts {
        let candidate = Position {
            x: rng.gen_range(0..i32::from(bounds.width())),
            y: rng.gen_range(0..i32::from(bounds.height())),
        };
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }

    first_free_cell(bounds, snake)
}

fn first_free_cell(bounds: GridSize, snake: &Snake) -> Option<Position> {
    (0..i32::from(bounds.height()))
        .flat_map(|y| (0..i32::from(bounds.width())).map(move |x| Position { x, y }))
        .find(|position| !snake.occupies(*position))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{spawn_position, spawn_position_with_attempts};

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::from_segments(
            vec![
                Position { x: 0, y: 0 },
                Position { x: 1, y: 0 },
                Position { x: 2, y: 0 },
            ],
            Direction::Right,
        );
        let bounds = GridSize::new(8, 6).expect("valid grid");

        for _ in 0..100 {
            let food_position =
                spawn_position(&mut rng, bounds, &snake).expect("grid has free cells");
            assert!(!snake.occupies(food_position));
            assert!(food_position.is_within_bounds(bounds));
        }
    }

    #[test]
    fn exhausted_attempts_fall_back_to_scan_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let snake = Snake::from_segments(
            vec![
                Position { x: 0, y: 0 },
                Position { x: 1, y: 0 },
                Position { x: 0, y: 1 },
            ],
            Direction::Right,
        );
        let bounds = GridSize::new(2, 2).expect("valid grid");

        let position = spawn_position_with_attempts(&mut rng, bounds, &snake, 0);

        assert_eq!(position, Some(Position { x: 1, y: 1 }));
    }

    #[test]
    fn full_grid_has_no_food_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = Snake::from_segments(
            vec![
                Position { x: 0, y: 0 },
                Position { x: 1, y: 0 },
                Position { x: 1, y: 1 },
                Position { x: 0, y: 1 },
            ],
            Direction::Down,
        );
        let bounds = GridSize::new(2, 2).expect("valid grid");

        assert_eq!(spawn_position(&mut rng, bounds, &snake), None);
    }
}
