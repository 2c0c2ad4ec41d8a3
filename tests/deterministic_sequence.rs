use relax_snake::config::GridSize;
use relax_snake::game::{DeathReason, GamePhase, GameState, TickEvent};
use relax_snake::input::Direction;
use relax_snake::score::{Leaderboard, MemoryStore, ScoreEntry};
use relax_snake::session::Session;
use relax_snake::snake::{Position, Snake};

fn ten_by_ten(seed: u64) -> GameState {
    GameState::new_with_seed(GridSize::new(10, 10).expect("valid grid"), seed)
}

#[test]
fn eating_food_grows_and_respawns_food() {
    let mut state = ten_by_ten(42);
    state.snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);
    state.food = Some(Position { x: 6, y: 5 });

    assert_eq!(state.tick(), TickEvent::Grew { score: 1 });

    let body: Vec<Position> = state.snake.segments().copied().collect();
    assert_eq!(body, vec![Position { x: 6, y: 5 }, Position { x: 5, y: 5 }]);
    assert_eq!(state.score, 1);
    let food = state.food.expect("food respawns");
    assert!(!state.snake.occupies(food));
}

#[test]
fn leaving_the_grid_ends_the_game_without_moving() {
    let mut state = ten_by_ten(43);
    state.snake = Snake::new(Position { x: 9, y: 5 }, Direction::Right);
    state.food = Some(Position { x: 0, y: 0 });

    assert_eq!(
        state.tick(),
        TickEvent::Terminal {
            score: 0,
            reason: DeathReason::WallCollision
        }
    );
    assert_eq!(state.phase, GamePhase::Over);
    let body: Vec<Position> = state.snake.segments().copied().collect();
    assert_eq!(body, vec![Position { x: 9, y: 5 }]);
    assert_eq!(state.score, 0);
}

#[test]
fn plain_move_drops_the_tail() {
    let mut state = ten_by_ten(44);
    state.snake = Snake::from_segments(
        vec![
            Position { x: 5, y: 5 },
            Position { x: 5, y: 6 },
            Position { x: 5, y: 7 },
        ],
        Direction::Up,
    );
    state.food = Some(Position { x: 0, y: 0 });

    assert_eq!(state.tick(), TickEvent::Moved);

    let body: Vec<Position> = state.snake.segments().copied().collect();
    assert_eq!(
        body,
        vec![
            Position { x: 5, y: 4 },
            Position { x: 5, y: 5 },
            Position { x: 5, y: 6 },
        ]
    );
}

#[test]
fn tied_score_on_a_full_leaderboard_is_dropped() {
    let entries = (0..10)
        .map(|index| ScoreEntry::new(format!("p{index}"), 12 - index.min(9)))
        .collect();
    let stored = Leaderboard::from_entries(entries);
    assert_eq!(stored.entries().last().map(|entry| entry.score), Some(3));

    let mut state = ten_by_ten(45);
    state.snake = Snake::new(Position { x: 0, y: 0 }, Direction::Left);
    state.score = 3;
    let mut session = Session::new(state, MemoryStore::with_leaderboard(stored.clone()), "late");

    assert!(matches!(session.tick(), TickEvent::Terminal { score: 3, .. }));

    assert_eq!(session.last_rank(), None);
    assert_eq!(session.leaderboard(), &stored);
    assert_eq!(session.store().save_count, 1);
}

#[test]
fn reversal_requests_never_change_the_pending_turn() {
    let mut state = ten_by_ten(46);
    state.snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);

    assert!(!state.set_pending_direction(Direction::Left));
    assert_eq!(state.snake.pending_direction(), Direction::Right);

    for direction in [Direction::Up, Direction::Down, Direction::Right] {
        assert!(state.set_pending_direction(direction));
        assert_eq!(state.snake.pending_direction(), direction);
    }
}

#[test]
fn scripted_game_keeps_invariants_until_restart() {
    let mut state = ten_by_ten(47);
    let turns = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];
    let mut eaten = 0;

    for step in 0..400 {
        if step % 3 == 0 {
            state.set_pending_direction(turns[(step / 3) % turns.len()]);
        }

        let before = state.score;
        match state.tick() {
            TickEvent::Grew { score } => {
                eaten += 1;
                assert_eq!(score, before + 1);
            }
            TickEvent::Terminal { .. } | TickEvent::Idle => break,
            TickEvent::Moved => assert_eq!(state.score, before),
        }

        let body: Vec<Position> = state.snake.segments().copied().collect();
        for (index, segment) in body.iter().enumerate() {
            assert!(!body[index + 1..].contains(segment), "snake overlaps itself");
        }
        if let Some(food) = state.food {
            assert!(!state.snake.occupies(food), "food spawned on the snake");
        }
    }

    assert_eq!(state.score, eaten);

    state.restart();
    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!(state.score, 0);
    let food = state.food.expect("restart places food");
    assert!(!state.snake.occupies(food));
}
