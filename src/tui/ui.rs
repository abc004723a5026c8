use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::alert::Alert;
use crate::style::{Palette, Rgb};
use crate::tui::app::App;
use crate::view::{Body, Grid, Role, Screen};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let screen = app.view.render(&app.state, area.width);
    let palette = &app.view.style().palette;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Search input
            Constraint::Min(3),    // Spinner or grid
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(frame, &screen, palette, chunks[0]);
    draw_input(frame, app, &screen, palette, chunks[1]);
    match &screen.body {
        Body::Loading => draw_spinner(frame, app.spinner_frame, palette, chunks[2]),
        Body::Grid(grid) => draw_grid(frame, grid, app.scroll, palette, chunks[2]),
    }
    draw_status_bar(frame, app, &screen, chunks[3]);

    if let Some(alert) = &app.alert {
        draw_alert(frame, alert, area);
    }
}

fn draw_header(frame: &mut Frame, screen: &Screen, palette: &Palette, area: Rect) {
    let header = Paragraph::new(screen.header.as_str())
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Black)
                .bg(color(palette.form_background))
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(header, area);
}

fn draw_input(frame: &mut Frame, app: &App, screen: &Screen, palette: &Palette, area: Rect) {
    let (shown, is_placeholder) = screen.input.shown();
    let text_style = if is_placeholder {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(palette.border)))
        .style(Style::default().bg(color(palette.form_background)));
    let input = Paragraph::new(Span::styled(shown, text_style)).block(block);
    frame.render_widget(input, area);

    if app.alert.is_none() {
        let x = area.x + 1 + app.input.cursor_offset();
        frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_spinner(frame: &mut Frame, tick: usize, palette: &Palette, area: Rect) {
    let glyph = SPINNER[tick % SPINNER.len()];
    let lines = vec![Line::default(), Line::from(glyph)];
    let spinner = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(color(palette.spinner))
                .bg(color(palette.background)),
        );
    frame.render_widget(spinner, area);
}

fn draw_grid(frame: &mut Frame, grid: &Grid, scroll: u16, palette: &Palette, area: Rect) {
    let card = Style::default().bg(color(palette.card_background));
    let lines: Vec<Line> = grid
        .layout_lines()
        .into_iter()
        .map(|segments| {
            let spans: Vec<Span> = segments
                .into_iter()
                .map(|segment| {
                    let style = match segment.role {
                        Role::Gap => Style::default(),
                        Role::Frame => card.fg(Color::DarkGray),
                        Role::Title => card.fg(Color::Black).add_modifier(Modifier::BOLD),
                        Role::Description => card.fg(color(palette.description)),
                    };
                    Span::styled(segment.text, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let max_scroll = (lines.len() as u16).saturating_sub(area.height);
    let body = Paragraph::new(lines)
        .style(Style::default().bg(color(palette.background)))
        .scroll((scroll.min(max_scroll), 0));
    frame.render_widget(body, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, screen: &Screen, area: Rect) {
    let mut parts = Vec::new();
    if let Body::Grid(grid) = &screen.body {
        parts.push(format!("{} resultados", grid.card_count()));
    }
    if let Some(at) = app.state.last_settled_at {
        parts.push(format!("actualizado {}", at.with_timezone(&Local).format("%H:%M:%S")));
    }
    parts.push("Esc salir".to_string());

    let status = Paragraph::new(format!(" {}", parts.join("  ·  ")))
        .style(Style::default().fg(Color::White).bg(Color::Rgb(40, 40, 50)));
    frame.render_widget(status, area);
}

fn draw_alert(frame: &mut Frame, alert: &Alert, area: Rect) {
    let width = 48.min(area.width.saturating_sub(4)).max(10);
    let height = 7.min(area.height);
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    let block = Block::default()
        .title(format!(" {} ", alert.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let text = vec![
        Line::from(alert.message.as_str()),
        Line::default(),
        Line::from(Span::styled("[ OK ]", Style::default().add_modifier(Modifier::BOLD))),
    ];
    let dialog = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup);
    frame.render_widget(dialog, popup);
}
