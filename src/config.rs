use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Logical grid dimensions passed through the game as a named type.
///
/// Width is the column count and height the row count. Both are always at
/// least [`MIN_GRID_SIDE`], so a one-cell snake leaves room for food.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    width: u16,
    height: u16,
}

impl GridSize {
    /// Creates a validated grid.
    pub fn new(width: u16, height: u16) -> Result<Self, ConfigError> {
        if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall { width, height });
        }

        Ok(Self { width, height })
    }

    /// Derives the largest grid that fits a terminal area of `columns` x `lines`.
    ///
    /// Reserves the border and HUD rows, then clamps to the minimum grid side so
    /// a tiny terminal still yields a playable (if clipped) board.
    #[must_use]
    pub fn for_terminal_area(columns: u16, lines: u16) -> Self {
        let width = columns.saturating_sub(BORDER_CELLS);
        let height = lines.saturating_sub(BORDER_CELLS + HUD_ROWS);

        Self {
            width: width.max(MIN_GRID_SIDE),
            height: height.max(MIN_GRID_SIDE),
        }
    }

    #[must_use]
    pub const fn width(self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(self) -> u16 {
        self.height
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Invalid runtime configuration.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small, each side must be at least 2 cells")]
    GridTooSmall { width: u16, height: u16 },
    #[error("tick period {0} ms is outside the allowed range 50..=1000 ms")]
    TickOutOfRange(u64),
    #[error("--width and --height must be given together")]
    PartialGrid,
}

/// Validates a tick period in milliseconds.
pub fn tick_interval(millis: u64) -> Result<Duration, ConfigError> {
    if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&millis) {
        return Err(ConfigError::TickOutOfRange(millis));
    }

    Ok(Duration::from_millis(millis))
}

/// Per-user directory holding the score file and the log.
#[must_use]
pub fn data_dir() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base
}

const APP_DIR_NAME: &str = "relax-snake";

/// Smallest allowed grid side.
pub const MIN_GRID_SIDE: u16 = 2;

/// Border cells consumed on each axis (one per side).
pub const BORDER_CELLS: u16 = 2;

/// Terminal rows reserved for the HUD below the board.
pub const HUD_ROWS: u16 = 1;

/// Default tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Maximum tick interval in milliseconds.
pub const MAX_TICK_INTERVAL_MS: u64 = 1000;

/// Frame period of the render loop, independent of the tick period.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Number of entries kept on the leaderboard.
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Random food placement attempts before falling back to a scan.
pub const MAX_FOOD_SPAWN_ATTEMPTS: usize = 64;

/// Name recorded when the player left theirs blank.
pub const DEFAULT_PLAYER_NAME: &str = "Anon";

#[cfg(test)]
mod tests {
    use super::{ConfigError, GridSize, tick_interval};

    #[test]
    fn grid_rejects_sides_below_two() {
        assert_eq!(
            GridSize::new(1, 10),
            Err(ConfigError::GridTooSmall {
                width: 1,
                height: 10
            })
        );
        assert!(GridSize::new(1, 1).is_err());
        assert!(GridSize::new(2, 2).is_ok());
    }

    #[test]
    fn terminal_area_reserves_border_and_hud() {
        let grid = GridSize::for_terminal_area(80, 24);

        assert_eq!(grid, GridSize::new(78, 21).expect("valid grid"));
    }

    #[test]
    fn tiny_terminal_area_clamps_to_minimum_grid() {
        let grid = GridSize::for_terminal_area(1, 1);

        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn tick_interval_bounds_are_inclusive() {
        assert!(tick_interval(50).is_ok());
        assert!(tick_interval(1000).is_ok());
        assert_eq!(tick_interval(49), Err(ConfigError::TickOutOfRange(49)));
    }
}
