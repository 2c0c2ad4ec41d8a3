use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{GridSize, HUD_ROWS};
use crate::game::{GamePhase, Snapshot};
use crate::input::Direction;
use crate::score::Leaderboard;
use crate::snake::Position;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::render_game_over_menu;

const GLYPH_FOOD: &str = "●";
const GLYPH_SNAKE_BODY: &str = "█";
const GLYPH_SNAKE_HEAD_UP: &str = "▲";
const GLYPH_SNAKE_HEAD_DOWN: &str = "▼";
const GLYPH_SNAKE_HEAD_LEFT: &str = "◀";
const GLYPH_SNAKE_HEAD_RIGHT: &str = "▶";

/// Everything drawn besides the simulation itself.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo<'a> {
    pub player_name: &'a str,
    pub leaderboard: &'a Leaderboard,
    /// Rank reached by the game that just ended.
    pub last_rank: Option<usize>,
}

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, info: FrameInfo<'_>) {
    let [board_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(HUD_ROWS)]).areas(frame.area());

    let play_area = board_rect(board_area, snapshot.grid);
    let block = Block::bordered().border_style(Style::new().fg(Color::LightBlue));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, snapshot);
    render_snake(frame, inner, snapshot);

    render_hud(
        frame,
        hud_area,
        &HudInfo {
            player_name: info.player_name,
            score: snapshot.score,
            length: snapshot.snake.len(),
            best: info.leaderboard.best(),
        },
    );

    if snapshot.phase == GamePhase::Over {
        render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            snapshot.death_reason,
            info.leaderboard,
            info.last_rank,
        );
    }
}

/// Bordered rectangle sized to the grid, anchored top-left and clipped to `area`.
fn board_rect(area: Rect, grid: GridSize) -> Rect {
    Rect {
        x: area.x,
        y: area.y,
        width: grid.width().saturating_add(2).min(area.width),
        height: grid.height().saturating_add(2).min(area.height),
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(Color::Red));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let buffer = frame.buffer_mut();

    // Tail first so the head wins if a dead snake's head overlaps its body.
    for (index, segment) in snapshot.snake.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                head_glyph(snapshot.direction),
                Style::new()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(Color::Green));
        }
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
