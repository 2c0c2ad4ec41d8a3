use tracing::{info, warn};

use crate::config::{DEFAULT_PLAYER_NAME, GridSize};
use crate::game::{GamePhase, GameState, Snapshot, TickEvent};
use crate::input::Direction;
use crate::score::{Leaderboard, ScoreEntry, ScoreError, ScoreStore};

/// One play session: the simulation plus the leaderboard it feeds.
///
/// The leaderboard is loaded once on construction and written back in full
/// after every game over.
#[derive(Debug)]
pub struct Session<S: ScoreStore> {
    state: GameState,
    store: S,
    leaderboard: Leaderboard,
    player_name: String,
    recorded: bool,
    last_rank: Option<usize>,
}

impl<S: ScoreStore> Session<S> {
    pub fn new(state: GameState, mut store: S, player_name: impl Into<String>) -> Self {
        let leaderboard = store.load();

        Self {
            state,
            store,
            leaderboard,
            player_name: player_name.into(),
            recorded: false,
            last_rank: None,
        }
    }

    /// Advances the game one tick, recording the score when it ends.
    pub fn tick(&mut self) -> TickEvent {
        let event = self.state.tick();
        if let TickEvent::Terminal { .. } = event {
            let name = self.player_name.clone();
            self.on_terminal(&name);
        }
        event
    }

    pub fn set_pending_direction(&mut self, requested: Direction) -> bool {
        self.state.set_pending_direction(requested)
    }

    /// Records the finished game under `name`.
    ///
    /// Only the first call after a game over has an effect; later calls and
    /// calls while running return `None`. Returns the zero-based rank the
    /// score reached, if it made the board.
    pub fn on_terminal(&mut self, name: &str) -> Option<usize> {
        if self.state.phase != GamePhase::Over || self.recorded {
            return None;
        }
        self.recorded = true;

        let entry = ScoreEntry::new(display_name(name), self.state.score);
        self.last_rank = self.leaderboard.insert(entry);

        if let Err(error) = self.store.save(&self.leaderboard) {
            warn!(%error, "failed to save leaderboard");
        }

        self.last_rank
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.recorded = false;
        self.last_rank = None;
    }

    /// Restarts on `grid`; grid changes never apply mid-game.
    pub fn restart_with_grid(&mut self, grid: GridSize) {
        self.state.restart_with_grid(grid);
        self.recorded = false;
        self.last_rank = None;
    }

    /// Empties the leaderboard and persists the empty list.
    pub fn reset_scores(&mut self) -> Result<(), ScoreError> {
        self.leaderboard.clear();
        self.last_rank = None;
        self.store.save(&self.leaderboard)?;
        info!("leaderboard reset");
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable simulation access, e.g. to stage a position in tests.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Rank reached by the most recently finished game.
    #[must_use]
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        display_name(&self.player_name)
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Trims `name`, substituting the default for blank input.
#[must_use]
pub fn display_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME
    } else {
        trimmed
    }
}
