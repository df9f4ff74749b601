// src/ui.rs - Rendering for the dashboard and symbol-detail pages.
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use monitor_dashboard::picker::CATALOG;
use monitor_dashboard::types::{HealthState, RegressionTrend, Signal, SignalKind};

use crate::app::{App, AppPage, InputMode, PickerRow};

pub fn ui(f: &mut Frame, app: &App) {
    match app.page {
        AppPage::Dashboard => ui_dashboard(f, app),
        AppPage::SymbolDetail => ui_detail(f, app),
    }
}

fn kind_color(kind: SignalKind) -> Color {
    match kind {
        SignalKind::Bull => Color::Green,
        SignalKind::Bear => Color::Red,
    }
}

fn trend_color(trend: RegressionTrend) -> Color {
    match trend {
        RegressionTrend::Uptrend => Color::Green,
        RegressionTrend::Downtrend => Color::Red,
        RegressionTrend::Unknown => Color::DarkGray,
    }
}

fn health_color(state: HealthState) -> Color {
    match state {
        HealthState::Ok => Color::Green,
        HealthState::Error => Color::Red,
        HealthState::Unknown => Color::Yellow,
    }
}

fn ui_dashboard(f: &mut Frame, app: &App) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header + banner
            Constraint::Length(5), // Status cards
            Constraint::Length(7), // Symbol tiles
            Constraint::Min(8),    // Signals table + picker
            Constraint::Length(3), // Help
        ])
        .split(size);

    render_header(f, app, chunks[0], "Trading Monitor");
    render_status_cards(f, app, chunks[1]);
    render_symbol_tiles(f, app, chunks[2]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(60), Constraint::Length(36)])
        .split(chunks[3]);

    render_signals_table(f, app, main_chunks[0]);
    render_picker_panel(f, app, main_chunks[1]);
    render_dashboard_help(f, app, chunks[4]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect, title: &str) {
    let state = &app.dashboard.state;

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("| {} ", app.dashboard.base_url())),
        Span::raw(format!("| {} ", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))),
        Span::raw(format!("| refresh #{} ", state.update_count)),
    ])];

    match state.banner() {
        Some(message) => lines.push(Line::from(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))),
        None => lines.push(Line::from(Span::styled(
            " all good ",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let header = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_status_cards(f: &mut Frame, app: &App, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let state = &app.dashboard.state;
    let health = state.health.get();
    let monitor = state.monitor.get();

    let health_card = Paragraph::new(vec![
        Line::from(Span::styled(
            health.status.text(),
            Style::default()
                .fg(health_color(health.status))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("MT5: {}", health.mt5_status)),
    ])
    .block(Block::default().borders(Borders::ALL).title("API Health"));
    f.render_widget(health_card, cards[0]);

    let (monitor_text, monitor_color) = if monitor.active {
        ("ACTIVE", Color::Green)
    } else {
        ("STOPPED", Color::DarkGray)
    };
    let monitor_card = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                monitor_text,
                Style::default().fg(monitor_color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {} symbols", monitor.symbols.len())),
        ]),
        Line::from(format!(
            "since: {}",
            monitor.start_time.as_deref().unwrap_or("-")
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("Monitor"));
    f.render_widget(monitor_card, cards[1]);

    let signal_count: usize = state.signals.get().values().map(Vec::len).sum();
    let session_card = Paragraph::new(vec![
        Line::from(format!("signals: {}", signal_count)),
        Line::from(format!("cached details: {}", state.details.len())),
    ])
    .block(Block::default().borders(Borders::ALL).title("Session"));
    f.render_widget(session_card, cards[2]);
}

fn render_symbol_tiles(f: &mut Frame, app: &App, area: Rect) {
    let state = &app.dashboard.state;
    let monitor = state.monitor.get();
    let signals = state.signals.get();

    let rows: Vec<Row> = monitor
        .symbols
        .iter()
        .enumerate()
        .map(|(i, symbol)| {
            let latest = signals.get(symbol).and_then(|s| s.first());
            let (kind_cell, time_cell, price_cell) = match latest {
                Some(signal) => (
                    Cell::from(signal.kind.text())
                        .style(Style::default().fg(kind_color(signal.kind))),
                    Cell::from(signal.time.clone()),
                    Cell::from(format!("{:.5}", signal.price)),
                ),
                None => (
                    Cell::from("-").style(Style::default().fg(Color::DarkGray)),
                    Cell::from("-"),
                    Cell::from("-"),
                ),
            };

            let style = if i == app.selected_tile {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(symbol.clone()),
                kind_cell,
                time_cell,
                price_cell,
            ])
            .style(style)
        })
        .collect();

    let title = if monitor.active {
        "Monitored Symbols (Enter = details)"
    } else {
        "Monitored Symbols (monitor stopped)"
    };

    let table = Table::new(rows)
        .header(
            Row::new(vec!["Symbol", "Last Signal", "Time", "Price"]).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .widths(&[
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(22),
            Constraint::Length(12),
        ])
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

fn render_signals_table(f: &mut Frame, app: &App, area: Rect) {
    let signals = app.dashboard.state.signals.get();

    // Flatten to one history table, newest first. Per-symbol sequences are
    // already most-recent-first; the ISO timestamps sort lexicographically.
    let mut flat: Vec<(&String, &Signal)> = signals
        .iter()
        .flat_map(|(symbol, list)| list.iter().map(move |s| (symbol, s)))
        .collect();
    flat.sort_by(|a, b| b.1.time.cmp(&a.1.time));

    let rows: Vec<Row> = flat
        .iter()
        .map(|(symbol, signal)| {
            Row::new(vec![
                Cell::from(signal.time.clone()),
                Cell::from(symbol.as_str()),
                Cell::from(signal.kind.text())
                    .style(Style::default().fg(kind_color(signal.kind))),
                Cell::from(format!("{:.5}", signal.price)),
                Cell::from(format!("{:.5}", signal.stop_loss)),
                Cell::from(format!("{:.2}", signal.position_size)),
                Cell::from(signal.regression_trend.text())
                    .style(Style::default().fg(trend_color(signal.regression_trend))),
                Cell::from(signal.levels.join(", ")),
            ])
        })
        .collect();

    let table = Table::new(rows)
        .header(
            Row::new(vec![
                "Time", "Symbol", "Type", "Price", "Stop", "Size", "Trend", "Levels",
            ])
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .widths(&[
            Constraint::Length(20),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Min(16),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Signal History"),
        );
    f.render_widget(table, area);
}

fn render_picker_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(4)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    for (row_index, row) in app.picker_rows().into_iter().enumerate() {
        let cursor_here = row_index == app.picker_cursor;
        let line = match row {
            PickerRow::Group(group_index) => {
                let marker = if app.picker.is_group_expanded(group_index) {
                    "▼"
                } else {
                    "▶"
                };
                Line::from(Span::styled(
                    format!("{} {}", marker, CATALOG[group_index].name),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            }
            PickerRow::Symbol(_, symbol) => {
                let checked = app.picker.is_selected(symbol);
                let box_mark = if checked { "[x]" } else { "[ ]" };
                let style = if checked {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(format!("  {} {}", box_mark, symbol), style))
            }
        };

        let mut line = line;
        if cursor_here {
            line.patch_style(Style::default().bg(Color::DarkGray));
        }
        lines.push(line);
    }

    let list = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Symbols"))
        .wrap(Wrap { trim: false });
    f.render_widget(list, chunks[0]);

    let entry_line = match app.input_mode {
        InputMode::CustomEntry => Line::from(vec![
            Span::raw("add: "),
            Span::styled(
                format!("{}_", app.picker.custom_entry()),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        InputMode::Normal => Line::from(Span::styled(
            "press a to add custom symbol",
            Style::default().fg(Color::DarkGray),
        )),
    };
    let value = Paragraph::new(vec![
        Line::from(format!("list: {}", app.picker.text())),
        entry_line,
    ])
    .block(Block::default().borders(Borders::ALL).title("Watch-list"))
    .wrap(Wrap { trim: false });
    f.render_widget(value, chunks[1]);
}

fn render_dashboard_help(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.input_mode {
        InputMode::CustomEntry => "type symbol | Enter: add | Esc: cancel | Backspace: delete",
        InputMode::Normal => {
            "q: quit | r: refresh | s: start | x: stop | ↑↓: picker | Space: toggle | a: add | Tab: tiles | Enter: details"
        }
    };
    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn ui_detail(f: &mut Frame, app: &App) {
    let size = f.size();
    let symbol = app.detail_symbol.as_deref().unwrap_or("-");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(size);

    render_header(f, app, chunks[0], &format!("Symbol Detail - {}", symbol));

    let Some(detail) = app.dashboard.state.details.peek(symbol) else {
        let empty = Paragraph::new("No cached data for this symbol yet. Press r to retry.")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title("Detail"));
        f.render_widget(empty, chunks[1]);
        render_detail_help(f, chunks[2]);
        return;
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(halves[0]);

    // Price + recommendation card.
    let mut summary = vec![Line::from(format!(
        "price: {}",
        detail
            .price
            .price
            .map(|p| format!("{:.5}", p))
            .unwrap_or_else(|| "-".to_string())
    ))];
    match &detail.analysis.trade_recommendation {
        Some(rec) => {
            let dir_color = if rec.direction == "BUY" {
                Color::Green
            } else {
                Color::Red
            };
            summary.push(Line::from(vec![
                Span::styled(
                    rec.direction.clone(),
                    Style::default().fg(dir_color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    " @ {:.5}  SL {:.5}  size {:.2}",
                    rec.entry_price, rec.stop_loss, rec.position_size
                )),
            ]));
            summary.push(Line::from(vec![
                Span::raw(format!("risk: {:.2}  trend: ", rec.risk_amount)),
                Span::styled(
                    rec.regression_trend.text(),
                    Style::default().fg(trend_color(rec.regression_trend)),
                ),
            ]));
        }
        None => summary.push(Line::from(Span::styled(
            "no trade recommendation",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    let summary_card = Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title("Analysis"));
    f.render_widget(summary_card, left[0]);

    // Levels table.
    let level_rows: Vec<Row> = detail
        .levels
        .levels
        .iter()
        .map(|(name, value)| {
            Row::new(vec![Cell::from(name.clone()), Cell::from(format!("{:.5}", value))])
        })
        .collect();
    let levels_table = Table::new(level_rows)
        .header(
            Row::new(vec!["Level", "Price"]).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .widths(&[Constraint::Min(18), Constraint::Length(12)])
        .block(Block::default().borders(Borders::ALL).title("Levels"));
    f.render_widget(levels_table, left[1]);

    // Recent candles, newest last as the backend returns them.
    let candle_rows: Vec<Row> = detail
        .chart
        .data
        .iter()
        .rev()
        .take(20)
        .map(|bar| {
            let bullish = bar.close >= bar.open;
            let color = if bullish { Color::Green } else { Color::Red };
            Row::new(vec![
                Cell::from(bar.time.clone()),
                Cell::from(format!("{:.5}", bar.open)),
                Cell::from(format!("{:.5}", bar.high)),
                Cell::from(format!("{:.5}", bar.low)),
                Cell::from(format!("{:.5}", bar.close)).style(Style::default().fg(color)),
            ])
        })
        .collect();
    let candles_table = Table::new(candle_rows)
        .header(
            Row::new(vec!["Time", "Open", "High", "Low", "Close"]).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .widths(&[
            Constraint::Length(20),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Candles ({})", detail.chart.timeframe)),
        );
    f.render_widget(candles_table, halves[1]);

    render_detail_help(f, chunks[2]);
}

fn render_detail_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new("d: back to dashboard | r: refresh detail | q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}
