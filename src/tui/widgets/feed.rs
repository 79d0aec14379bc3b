//! Live feed panel: reference rig telemetry, network health, pool numbers
//! and the per-chip temperature strip.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::models::ChipStatus;
use crate::tui::app::App;
use crate::tui::widgets::header::group_thousands;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mode = if !app.feed_enabled {
        "off"
    } else if app.state.feed_connected {
        "live"
    } else {
        "polling"
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" LIVE FEED ({mode}) "));
    if let Some(at) = app.state.live.last_update {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" upd {} ", at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Right),
        );
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    let live = &app.state.live;
    if live.asic.is_none() && live.network.is_none() && live.luxor.is_none() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "Waiting for live feed...",
                Style::default().fg(Color::DarkGray),
            )),
            inner,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    if let Some(asic) = &live.asic {
        lines.push(section_line(
            "ASIC",
            format!(
                "{:.2} TH/s \u{b7} {:.1}\u{b0}C \u{b7} fan {} \u{b7} {:.0} W",
                asic.hashrate, asic.temperature, asic.fan_speed, asic.power_usage
            ),
        ));
        lines.push(Line::from(format!(
            "     acc {} rej {} hw {} \u{b7} pool {}",
            group_thousands(&asic.accepted_shares.to_string()),
            asic.rejected_shares,
            asic.hw_errors,
            asic.pool_status
        )));
    }
    if let Some(net) = &live.network {
        lines.push(section_line(
            "NET ",
            format!(
                "{:.0} ms \u{b7} loss {:.1}% \u{b7} \u{2191}{:.1} \u{2193}{:.1} Mbps \u{b7} {}",
                net.latency, net.packet_loss, net.bandwidth_up, net.bandwidth_down,
                net.connection_status
            ),
        ));
    }
    if let Some(pool) = &live.luxor {
        lines.push(section_line(
            "POOL",
            format!(
                "{:.2} TH/s 1h \u{b7} {:.2} TH/s 24h \u{b7} {} workers",
                pool.hashrate_1h, pool.hashrate_24h, pool.workers_online
            ),
        ));
        lines.push(Line::from(format!(
            "     eff {:.1}% \u{b7} {:.8} BTC/24h",
            pool.efficiency, pool.revenue_24h
        )));
    }
    if !live.chip_temps.is_empty() {
        lines.push(chip_strip(app));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn section_line(tag: &str, body: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{tag} "),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(body),
    ])
}

/// One span per chip, colored by the backend's thermal grade.
fn chip_strip(app: &App) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "CHIP ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    for chip in &app.state.live.chip_temps {
        let color = match chip.status {
            ChipStatus::Normal => Color::Green,
            ChipStatus::Warning => Color::Yellow,
            ChipStatus::Critical => Color::Red,
            ChipStatus::Unknown => Color::DarkGray,
        };
        spans.push(Span::styled(
            format!("{}:{:.0}\u{b0} ", chip.chip_id, chip.temperature),
            Style::default().fg(color),
        ));
    }
    Line::from(spans)
}
