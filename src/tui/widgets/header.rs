//! Top banner: title, BTC ticker, feed status, spin marker and a clock.

use chrono::Local;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::App;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans = vec![
        Span::styled(
            " HASHWATCH ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    spans.extend(price_spans(app));
    spans.push(Span::raw("  "));
    spans.push(feed_span(app));
    if app.spin_active {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "\u{27f3} SPIN",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), inner);

    let clock = Local::now().format("%H:%M:%S").to_string();
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            clock,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right),
        inner,
    );
}

/// Price quote plus the 24h move with a direction arrow. The quote keeps the
/// blue style while the day is flat or up and flips red on a down day.
fn price_spans(app: &App) -> Vec<Span<'static>> {
    let Some(quote) = &app.state.price else {
        let style = if app.state.price_error.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        return vec![
            Span::styled("BTC: ...", style),
            Span::raw(" "),
            Span::styled("...%", Style::default().fg(Color::DarkGray)),
        ];
    };

    let quote_color = match quote.change_24h {
        Some(change) if change < 0.0 => Color::Red,
        _ => Color::Blue,
    };
    let mut spans = vec![Span::styled(
        format!("\u{20bf} ${}", fmt_usd(quote.usd)),
        Style::default().fg(quote_color).add_modifier(Modifier::BOLD),
    )];
    // The plain price endpoint has no 24h change to show.
    if let Some(change) = quote.change_24h {
        let arrow = if change > 0.0 {
            "\u{2191}"
        } else if change < 0.0 {
            "\u{2193}"
        } else {
            "\u{2192}"
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{change:+.2}% {arrow} 24H"),
            Style::default().fg(quote_color),
        ));
    }
    spans
}

fn feed_span(app: &App) -> Span<'static> {
    if !app.feed_enabled {
        Span::styled("feed off", Style::default().fg(Color::DarkGray))
    } else if app.state.feed_connected {
        Span::styled("\u{25cf} live", Style::default().fg(Color::Green))
    } else {
        Span::styled("\u{25cb} polling", Style::default().fg(Color::Yellow))
    }
}

/// `97234.5` becomes `97,234.50`.
pub fn fmt_usd(value: f64) -> String {
    let fixed = format!("{value:.2}");
    match fixed.split_once('.') {
        Some((whole, frac)) => format!("{}.{frac}", group_thousands(whole)),
        None => group_thousands(&fixed),
    }
}

pub fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 3 == offset % 3 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{sign}{out}")
}
