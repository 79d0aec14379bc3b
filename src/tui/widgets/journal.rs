//! Event journal: the rolling action/alert log plus poll health counters.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::store::JournalLevel;
use crate::tui::app::App;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut block = Block::default().borders(Borders::ALL).title(" EVENTS ");
    let c = app.state.counters;
    if c.poll_failures + c.stale_discards + c.feed_reconnects > 0 {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(
                    " fail {} \u{b7} stale {} \u{b7} reconnects {} ",
                    c.poll_failures, c.stale_discards, c.feed_reconnects
                ),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Right),
        );
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = inner.height as usize;
    let width = inner.width as usize;
    let journal = &app.state.journal;
    let tail = &journal[journal.len().saturating_sub(visible)..];

    let lines: Vec<Line> = tail
        .iter()
        .map(|entry| {
            let color = match entry.level {
                JournalLevel::Info => Color::White,
                JournalLevel::Warn => Color::Yellow,
                JournalLevel::Error => Color::Red,
            };
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", entry.at.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    truncate_with_ellipsis(&entry.line, width.saturating_sub(11)),
                    Style::default().fg(color),
                ),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

/// Cuts on char boundaries; journal lines can carry `\u{20bf}` and friends.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_width.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lines_pass_through() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
    }

    #[test]
    fn long_lines_get_an_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello\u{2026}");
    }

    #[test]
    fn truncation_is_char_safe() {
        let s = "\u{20bf} price \u{2191} moved";
        let out = truncate_with_ellipsis(s, 9);
        assert_eq!(out.chars().count(), 9);
        assert!(out.ends_with('\u{2026}'));
    }

    #[test]
    fn zero_width_yields_empty() {
        assert_eq!(truncate_with_ellipsis("abc", 0), "");
    }
}
