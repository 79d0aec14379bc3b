//! Fleet-wide roll-up: efficiency gauge, share counters and the power bill.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::App;
use crate::tui::widgets::header::group_thousands;

const EFF_BAR_WIDTH: usize = 14;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let totals = &app.totals;
    let cost = &app.power_cost;

    let eff_color = if totals.efficiency_percent >= 80.0 {
        Color::Green
    } else if totals.efficiency_percent >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    };

    let top = Line::from(vec![
        Span::raw(" EFF "),
        Span::styled(
            fill_bar(totals.efficiency_percent / 100.0, EFF_BAR_WIDTH),
            Style::default().fg(eff_color),
        ),
        Span::styled(
            format!(" {:.1}%", totals.efficiency_percent),
            Style::default().fg(eff_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  AVG {:.2} J/TH  RIGS {}  PWR {:.0} W",
            totals.avg_efficiency, totals.miners, totals.total_power
        )),
    ]);

    let bottom = Line::from(vec![
        Span::raw(format!(" HASH {:.2} TH/s", totals.total_hashrate)),
        Span::raw("  ACC "),
        Span::styled(
            group_thousands(&totals.total_accepted.to_string()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  REJ "),
        Span::styled(
            group_thousands(&totals.total_rejected.to_string()),
            Style::default().fg(if totals.total_rejected > 0 {
                Color::Yellow
            } else {
                Color::DarkGray
            }),
        ),
        Span::raw("  STALE "),
        Span::styled(
            group_thousands(&totals.total_stale.to_string()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!(
            "  COST ${:.2}/day ${:.2}/mo ${:.2}/yr",
            cost.cost_daily, cost.cost_monthly, cost.cost_annual
        )),
    ]);

    let panel = Paragraph::new(vec![top, bottom])
        .block(Block::default().borders(Borders::ALL).title(" FLEET "));
    f.render_widget(panel, area);
}

/// Fixed-width block gauge, full cells for the filled share.
pub fn fill_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * width as f64).round() as usize;
    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push('\u{2588}');
    }
    for _ in filled..width {
        bar.push('\u{2591}');
    }
    bar
}
