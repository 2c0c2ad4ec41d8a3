use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use relax_snake::config::{
    self, ConfigError, DEFAULT_TICK_INTERVAL_MS, FRAME_INTERVAL_MS, GridSize,
};
use relax_snake::game::{GamePhase, GameState};
use relax_snake::input::{GameInput, InputHandler};
use relax_snake::renderer::{self, FrameInfo};
use relax_snake::score::{JsonFileStore, MemoryStore, ScoreStore};
use relax_snake::session::Session;
use relax_snake::terminal_runtime::TerminalSession;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_NAME: &str = "relax-snake.log";

#[derive(Debug, Parser)]
#[command(version, about = "Relax Mode: snake in your terminal")]
struct Cli {
    /// Name recorded on the leaderboard (blank records as "Anon").
    #[arg(long, default_value = "")]
    name: String,

    /// Milliseconds between simulation ticks.
    #[arg(long = "tick-ms", default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    tick_ms: u64,

    /// Fixed grid width in cells; the terminal size is used when omitted.
    #[arg(long)]
    width: Option<u16>,

    /// Fixed grid height in cells; the terminal size is used when omitted.
    #[arg(long)]
    height: Option<u16>,

    /// Leaderboard file location.
    #[arg(long = "scores-file")]
    scores_file: Option<PathBuf>,

    /// Keep this session's scores in memory only.
    #[arg(long = "no-save")]
    no_save: bool,

    /// Log file location.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Seed for reproducible food placement.
    #[arg(long)]
    seed: Option<u64>,
}

/// Validated runtime settings.
#[derive(Debug)]
struct Settings {
    player_name: String,
    tick_interval: Duration,
    fixed_grid: Option<GridSize>,
    scores_file: Option<PathBuf>,
    no_save: bool,
    log_file: PathBuf,
    seed: Option<u64>,
}

impl Settings {
    fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let fixed_grid = match (cli.width, cli.height) {
            (Some(width), Some(height)) => Some(GridSize::new(width, height)?),
            (None, None) => None,
            _ => return Err(ConfigError::PartialGrid),
        };

        Ok(Self {
            player_name: cli.name,
            tick_interval: config::tick_interval(cli.tick_ms)?,
            fixed_grid,
            scores_file: cli.scores_file,
            no_save: cli.no_save,
            log_file: cli
                .log_file
                .unwrap_or_else(|| config::data_dir().join(LOG_FILE_NAME)),
            seed: cli.seed,
        })
    }
}

fn main() -> ExitCode {
    let settings = match Settings::from_cli(Cli::parse()) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("relax-snake: {error}");
            return ExitCode::from(2);
        }
    };

    init_logging(&settings.log_file);

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("relax-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> io::Result<()> {
    let mut tui = TerminalSession::enter()?;
    let grid = grid_for(settings, &tui)?;

    let state = match settings.seed {
        Some(seed) => GameState::new_with_seed(grid, seed),
        None => GameState::new(grid),
    };
    let store = open_store(settings.scores_file.as_deref(), settings.no_save);
    let mut session = Session::new(state, store, settings.player_name.as_str());
    info!(
        width = grid.width(),
        height = grid.height(),
        tick = ?settings.tick_interval,
        "session started"
    );

    let mut input = InputHandler::new(Duration::from_millis(FRAME_INTERVAL_MS));
    let mut last_tick = Instant::now();

    loop {
        let snapshot = session.snapshot();
        tui.terminal_mut().draw(|frame| {
            renderer::render(
                frame,
                &snapshot,
                FrameInfo {
                    player_name: session.player_name(),
                    leaderboard: session.leaderboard(),
                    last_rank: session.last_rank(),
                },
            );
        })?;

        if let Some(game_input) = input.poll_input()? {
            if game_input == GameInput::Quit {
                break;
            }

            if handle_input(&mut session, settings, &tui, game_input)? {
                last_tick = Instant::now();
            }
        }

        if last_tick.elapsed() >= settings.tick_interval {
            session.tick();
            last_tick = Instant::now();
        }
    }

    info!("session ended");
    Ok(())
}

/// Applies one input. Returns true when a new game started.
fn handle_input<S: ScoreStore>(
    session: &mut Session<S>,
    settings: &Settings,
    tui: &TerminalSession,
    input: GameInput,
) -> io::Result<bool> {
    let over = session.state().phase == GamePhase::Over;

    match input {
        GameInput::Direction(direction) => {
            session.set_pending_direction(direction);
        }
        GameInput::Confirm if over => {
            session.restart_with_grid(grid_for(settings, tui)?);
            return Ok(true);
        }
        GameInput::ResetScores if over => {
            if let Err(error) = session.reset_scores() {
                warn!(%error, "failed to reset leaderboard");
            }
        }
        GameInput::Confirm | GameInput::ResetScores | GameInput::Quit => {}
    }

    Ok(false)
}

/// Opens the leaderboard file, or an in-memory copy of it with `--no-save`.
fn open_store(scores_file: Option<&Path>, no_save: bool) -> Box<dyn ScoreStore> {
    let mut file_store =
        scores_file.map_or_else(JsonFileStore::at_default_location, JsonFileStore::new);
    info!(path = %file_store.path().display(), no_save, "using score file");

    if no_save {
        Box::new(MemoryStore::with_leaderboard(file_store.load()))
    } else {
        Box::new(file_store)
    }
}

fn grid_for(settings: &Settings, tui: &TerminalSession) -> io::Result<GridSize> {
    match settings.fixed_grid {
        Some(grid) => Ok(grid),
        None => tui.fitting_grid(),
    }
}

/// Logs to a file so output never lands on the game screen. Logging stays off
/// when the file cannot be opened.
fn init_logging(path: &Path) {
    let Ok(file) = open_log_file(path) else {
        return;
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("relax_snake=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use relax_snake::score::{Leaderboard, ScoreEntry, ScoreStore};

    use super::open_store;

    #[test]
    fn no_save_store_survives_a_corrupt_file_and_leaves_it_alone() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("relax-snake-main-{nanos}"));
        fs::create_dir_all(&dir).expect("test directory should be creatable");
        let path = dir.join("scores.json");
        fs::write(&path, "not-json").expect("test file write should succeed");

        let mut store = open_store(Some(path.as_path()), true);
        assert!(store.load().is_empty());

        store
            .save(&Leaderboard::from_entries(vec![ScoreEntry::new("ada", 3)]))
            .expect("memory store never fails");
        let raw = fs::read_to_string(&path).expect("score file should still exist");
        assert_eq!(raw, "not-json");

        let _ = fs::remove_dir_all(&dir);
    }
}
