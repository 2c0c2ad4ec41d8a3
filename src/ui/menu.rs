use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::game::DeathReason;
use crate::score::Leaderboard;
use crate::ui::hud::truncate_to_width;

const LEADERBOARD_NAME_WIDTH: usize = 14;

/// Draws the game-over screen with the top scores as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    death_reason: Option<DeathReason>,
    leaderboard: &Leaderboard,
    last_rank: Option<usize>,
) {
    let popup = centered_popup(area, 80, 90);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from("GAME OVER").style(
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(format!("Score: {score}")),
        Line::from(match death_reason {
            Some(DeathReason::WallCollision) => "Cause: hit wall",
            Some(DeathReason::SelfCollision) => "Cause: hit yourself",
            Some(DeathReason::BoardFull) => "The board is full!",
            None => "",
        }),
        Line::from(""),
        Line::from("Top 10 Scores:").style(Style::default().add_modifier(Modifier::BOLD)),
    ];

    if leaderboard.is_empty() {
        lines.push(Line::from("(none yet)").style(Style::default().fg(Color::DarkGray)));
    }
    lines.extend(leaderboard_lines(leaderboard, last_rank));

    lines.push(Line::from(""));
    lines.push(Line::from("[Enter]/[Space] Restart   [R] Reset scores   [Q] Exit"));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" relax mode ")),
        popup,
    );
}

fn leaderboard_lines(leaderboard: &Leaderboard, last_rank: Option<usize>) -> Vec<Line<'static>> {
    leaderboard
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let text = format!(
                "{:>2}. {}: {}",
                index + 1,
                truncate_to_width(&entry.name, LEADERBOARD_NAME_WIDTH),
                entry.score
            );
            if Some(index) == last_rank {
                Line::from(text).style(Style::default().fg(Color::Yellow))
            } else {
                Line::from(text)
            }
        })
        .collect()
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
