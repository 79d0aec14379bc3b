//! History panel: fleet hashrate and temperature sparklines on the left,
//! the latest-sample spotlight on the right.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Sparkline};
use ratatui::Frame;

use crate::charts::NO_SAMPLES_NOTE;
use crate::tui::app::App;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = match &app.state.history {
        Some(h) if h.from_local_log => " HISTORY (local log) ",
        _ => " HISTORY ",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let halves =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).split(inner);
    render_sparklines(f, halves[0], app);
    render_spotlight(f, halves[1], app);
}

fn render_sparklines(f: &mut Frame, area: Rect, app: &App) {
    if app.series.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                NO_SAMPLES_NOTE,
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
        return;
    }

    let halves =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);
    let width = area.width as usize;

    // Sparkline draws the first `width` values, so feed it the tail.
    let hash: Vec<u64> = app
        .series
        .iter()
        .map(|p| (p.total_hashrate * 100.0) as u64)
        .collect();
    let hash = &hash[hash.len().saturating_sub(width)..];
    let last = app.series.last();
    f.render_widget(
        Sparkline::default()
            .block(Block::default().borders(Borders::NONE).title(format!(
                "TH/s {:.2}",
                last.map(|p| p.total_hashrate).unwrap_or_default()
            )))
            .style(Style::default().fg(Color::Cyan))
            .data(hash),
        halves[0],
    );

    let temp: Vec<u64> = app
        .series
        .iter()
        .map(|p| (p.avg_temp * 10.0) as u64)
        .collect();
    let temp = &temp[temp.len().saturating_sub(width)..];
    f.render_widget(
        Sparkline::default()
            .block(Block::default().borders(Borders::NONE).title(format!(
                "\u{b0}C {:.1}",
                last.map(|p| p.avg_temp).unwrap_or_default()
            )))
            .style(Style::default().fg(Color::Yellow))
            .data(temp),
        halves[1],
    );
}

fn render_spotlight(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::with_capacity(app.spotlight.len() + 2);
    if app.spotlight.is_empty() {
        lines.push(Line::from(Span::styled(
            NO_SAMPLES_NOTE,
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for entry in &app.spotlight {
            let color = if entry.alive {
                Color::Green
            } else {
                Color::DarkGray
            };
            lines.push(Line::from(Span::styled(
                entry.line(),
                Style::default().fg(color),
            )));
        }
    }
    if !app.chart_meta.is_empty() {
        lines.push(Line::from(Span::styled(
            app.chart_meta.clone(),
            Style::default().fg(Color::Cyan),
        )));
    }
    if let Some(err) = &app.state.history_error {
        lines.push(Line::from(Span::styled(
            format!("\u{26a0} {err}"),
            Style::default().fg(Color::Yellow),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}
