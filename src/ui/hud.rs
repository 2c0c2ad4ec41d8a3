use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

const NAME_MAX_WIDTH: usize = 16;

/// Values displayed by the HUD row.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    pub player_name: &'a str,
    pub score: u32,
    pub length: usize,
    pub best: Option<u32>,
}

/// Renders the single-line HUD: player, score, length and best score.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, info: &HudInfo<'_>) {
    let value = Style::default().fg(Color::White);
    let muted = Style::default().fg(Color::DarkGray);
    let best = info.best.map_or_else(|| "-".to_owned(), |best| best.to_string());

    let line = Line::from(vec![
        Span::styled(truncate_to_width(info.player_name, NAME_MAX_WIDTH), value),
        Span::styled("  Score: ", muted),
        Span::styled(info.score.to_string(), value),
        Span::styled("  Length: ", muted),
        Span::styled(info.length.to_string(), value),
        Span::styled("  Best: ", muted),
        Span::styled(best, value),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Left), area);
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut with `…`.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_owned();
    }

    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let width = c.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        out.push(c);
    }
    out.push('…');
    out
}
