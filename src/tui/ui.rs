//! Frame layout. Panels render top to bottom; the middle band splits into
//! history and live feed side by side.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::app::{App, MIN_COLS, MIN_ROWS};
use super::widgets;

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();
    if size.width < MIN_COLS || size.height < MIN_ROWS {
        draw_too_small(f, size);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Min(15),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(1),
    ])
    .split(size);

    widgets::header::render(f, chunks[0], app);
    widgets::totals::render(f, chunks[1], app);
    widgets::miners::render(f, chunks[2], app);

    let middle =
        Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(chunks[3]);
    widgets::history::render(f, middle[0], app);
    widgets::feed::render(f, middle[1], app);

    widgets::journal::render(f, chunks[4], app);
    draw_footer(f, chunks[5], app);
}

fn draw_too_small(f: &mut Frame, size: Rect) {
    let msg = vec![
        Line::from(Span::styled(
            "Terminal too small",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Need at least {MIN_COLS}x{MIN_ROWS}, have {}x{}",
            size.width, size.height
        )),
    ];
    f.render_widget(
        Paragraph::new(msg).alignment(ratatui::layout::Alignment::Center),
        size,
    );
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let line = if app.prompt.is_open() {
        Line::from(vec![
            Span::styled(
                format!(" {}: {}_", app.prompt.label(), app.prompt.buffer),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  [Enter] submit  [Esc] cancel",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        Line::from(Span::styled(
            " [q]uit  [r]efresh  [a]dd miner  [d]elete miner  [i] ask AI",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}
