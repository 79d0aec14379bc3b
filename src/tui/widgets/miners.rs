//! Miner card grid: one bordered card per rig, three to a row, with open
//! slots padded out as placeholder cards.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::aggregate::{celsius_to_fahrenheit, format_uptime, gauge_ratio, placeholder_slots};
use crate::models::{MinerSnapshot, StatusClass};
use crate::tui::app::App;
use crate::tui::widgets::header::group_thousands;
use crate::tui::widgets::totals::fill_bar;

pub const CARD_HEIGHT: u16 = 8;
const CARDS_PER_ROW: usize = 3;
const GAUGE_WIDTH: usize = 12;

/// Shown when the fleet endpoint has never answered.
pub const UNREACHABLE_NOTE: &str = "Unable to reach /miner-data. Check that the fleet backend is \
                                    running and that LAN access rules allow this client.";

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let (alive, total) = match &app.state.fleet {
        Some(fleet) => (fleet.values().filter(|m| m.alive).count(), fleet.len()),
        None => (0, 0),
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" MINERS ({alive}/{total}) "));
    if app.state.fleet.is_some() && app.state.fleet_error.is_some() {
        block = block.title_bottom(
            Line::from(Span::styled(
                " refresh failing, data may be stale ",
                Style::default().fg(Color::Yellow),
            ))
            .alignment(Alignment::Right),
        );
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(fleet) = &app.state.fleet else {
        render_empty(f, inner, app);
        return;
    };

    let placeholders = placeholder_slots(fleet.len(), app.grid_slots);
    let cards = fleet.len() + placeholders;
    if cards == 0 {
        return;
    }
    let nrows = cards.div_ceil(CARDS_PER_ROW);
    let rows = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); nrows]).split(inner);

    let mut miners = fleet.iter();
    for cell in grid_cells(&rows, nrows).into_iter().take(cards) {
        match miners.next() {
            Some((name, miner)) => render_card(f, cell, app, name, miner),
            None => render_placeholder(f, cell),
        }
    }
}

fn grid_cells(rows: &[Rect], nrows: usize) -> Vec<Rect> {
    let mut cells = Vec::with_capacity(nrows * CARDS_PER_ROW);
    for row in rows.iter().take(nrows) {
        let cols = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(*row);
        cells.extend(cols.iter().copied());
    }
    cells
}

/// No fleet data at all: either still waiting on the first fetch or the
/// endpoint is down.
fn render_empty(f: &mut Frame, area: Rect, app: &App) {
    let lines = match &app.state.fleet_error {
        Some(err) => vec![
            Line::from(Span::styled(
                UNREACHABLE_NOTE,
                Style::default().fg(Color::Red),
            )),
            Line::from(""),
            Line::from(Span::styled(
                err.clone(),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "Waiting for miner data...",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_card(f: &mut Frame, area: Rect, app: &App, name: &str, m: &MinerSnapshot) {
    let class = m.status_class();
    let border = match class {
        StatusClass::Ok => Color::Green,
        StatusClass::Hot => Color::Red,
        StatusClass::Reject => Color::Yellow,
        StatusClass::Offline => Color::DarkGray,
    };

    let mut badges = String::new();
    if app.highlights.top_hashrate.as_deref() == Some(name) {
        badges.push_str(" \u{2b50}");
    }
    if app.highlights.best_efficiency.as_deref() == Some(name) {
        badges.push_str(" \u{26a1}");
    }
    if app.highlights.best_efficiency_bg02.as_deref() == Some(name) {
        badges.push_str(" \u{2726}");
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {name} ({}){badges} ", m.kind),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(
            m.status_label().to_string(),
            Style::default().fg(border),
        )),
        Line::from(vec![
            Span::styled(
                format!("{:.3} TH/s", m.display_hashrate()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" \u{b7} {:.2} J/TH", m.efficiency)),
        ]),
        Line::from(vec![
            Span::styled(
                fill_bar(
                    gauge_ratio(m.hashrate_1m, app.gauge_max_hashrate),
                    GAUGE_WIDTH,
                ),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(format!(
                " {:.1}\u{b0}C/{:.1}\u{b0}F",
                m.temp,
                celsius_to_fahrenheit(m.temp)
            )),
        ]),
        Line::from(chip_line(m)),
        Line::from(format!(
            "acc {} rej {} pwr {:.0} W",
            group_thousands(&m.shares_accepted.to_string()),
            m.shares_rejected,
            m.power
        )),
        Line::from(detail_line(m)),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn chip_line(m: &MinerSnapshot) -> String {
    let chip = m.display_chip_temp();
    let mut line = format!(
        "chip {chip:.1}\u{b0}C/{:.1}\u{b0}F",
        celsius_to_fahrenheit(chip)
    );
    if m.fan_rpm != 0.0 {
        line.push_str(&format!(" \u{b7} fan {:.0} RPM", m.fan_rpm));
    }
    line
}

/// Last card line: uptime plus whichever extras this firmware reports.
fn detail_line(m: &MinerSnapshot) -> String {
    let mut line = format!("up {}", format_uptime(m.uptime));
    if m.shows_asic_temps() {
        let temps: Vec<String> = m.asic_temps.iter().map(|t| format!("{t:.0}")).collect();
        line.push_str(&format!(" \u{b7} asic {}\u{b0}C", temps.join("/")));
    } else {
        if m.frequency != 0.0 {
            line.push_str(&format!(" \u{b7} {:.0} MHz", m.frequency));
        }
        if m.voltage != 0.0 {
            line.push_str(&format!(" \u{b7} {:.1} V", m.voltage));
        }
    }
    line
}

fn render_placeholder(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "OPEN MINER SLOT",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Deploy next rig",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}
