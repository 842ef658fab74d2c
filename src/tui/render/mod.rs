//! TUI rendering
//!
//! The screen has the layer list on the left, the keys available at the
//! current position of the menu on the right, a breadcrumb line and a status
//! bar. The help text is drawn on top when the workspace asks for it.

mod colors;

use karte::app::{App, Layer};
use karte::host::RenderMode;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use std::time::Instant;

/// Render the full application UI
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[0]);

    render_layers(frame, app, panes[0]);
    render_options(frame, app, panes[1]);
    render_breadcrumb(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if app.workspace.help_visible() {
        render_help_overlay(frame, app);
    }
}

fn layer_item(index: usize, layer: &Layer, active: bool) -> ListItem<'static> {
    let marker = if active { "▶ " } else { "  " };
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(colors::TEXT_PRIMARY)),
        Span::styled(
            format!("{index} "),
            Style::default().fg(colors::TEXT_DIM),
        ),
        Span::styled("■ ", Style::default().fg(colors::layer(layer.style.color))),
        Span::styled(
            format!("{} feature(s)", layer.features.len()),
            Style::default().fg(colors::TEXT_PRIMARY),
        ),
    ];
    if let Some(distance) = layer.cluster {
        spans.push(Span::styled(
            format!(" [cluster {distance}]"),
            Style::default().fg(colors::TEXT_DIM),
        ));
    }
    if layer.clipping {
        spans.push(Span::styled(" [clip]", Style::default().fg(colors::TEXT_DIM)));
    }
    if layer.style.image.is_some() {
        spans.push(Span::styled(
            format!(" [image x{:.2}]", layer.style.image_scale),
            Style::default().fg(colors::TEXT_DIM),
        ));
    }

    let style = if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    ListItem::new(Line::from(spans)).style(style)
}

fn render_layers(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let active = app.workspace.active().map(|layer| layer.id);
    let items: Vec<ListItem<'_>> = app
        .workspace
        .layers()
        .iter()
        .enumerate()
        .map(|(i, layer)| layer_item(i + 1, layer, Some(layer.id) == active))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Layers ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::BORDER)),
    );
    frame.render_widget(list, area);
}

fn render_options(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let menu = app.menu();
    let keys = menu.keys();
    let mut lines = Vec::new();

    if let Some(modal) = menu.active_modal() {
        lines.push(Line::from(Span::styled(
            modal.label(),
            Style::default()
                .fg(colors::MODAL)
                .add_modifier(Modifier::BOLD),
        )));
        if !modal.description().is_empty() {
            lines.push(Line::from(Span::styled(
                modal.description().to_string(),
                Style::default().fg(colors::TEXT_DIM),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{}: done  {}: abort", keys.execute, keys.navigate_up),
            Style::default().fg(colors::TEXT_MUTED),
        )));
    } else {
        for (key, label) in menu.current_options() {
            lines.push(Line::from(vec![
                Span::styled(format!(" {key}  "), Style::default().fg(colors::KEY)),
                Span::styled(label, Style::default().fg(colors::TEXT_PRIMARY)),
            ]));
        }
        if !menu.stack().is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{}: back", keys.navigate_up),
                Style::default().fg(colors::TEXT_MUTED),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Keys ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::BORDER)),
    );
    frame.render_widget(paragraph, area);
}

/// Breadcrumb text for the current navigation
fn breadcrumb(app: &App) -> String {
    let navigation = &app.navigation;
    let mut text = String::from("menu");
    for key in &navigation.path {
        text.push_str(" › ");
        text.push(*key);
    }
    if let Some(modal) = &navigation.modal {
        text.push_str(&format!(" [{modal}]"));
    }
    if let Some(input) = &navigation.pending_input {
        text.push_str(&format!(" {input}_"));
    }
    text
}

fn render_breadcrumb(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {}", breadcrumb(app)),
        Style::default().fg(colors::TEXT_PRIMARY),
    )));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let indicator = match app.flash_at(Instant::now()) {
        Some(true) => Span::styled(" ● ", Style::default().fg(colors::SUCCESS)),
        Some(false) => Span::styled(
            " ● ",
            Style::default()
                .fg(colors::FAILURE)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(" ○ ", Style::default().fg(colors::TEXT_MUTED)),
    };
    let message = app.status_message.as_deref().map_or_else(
        || format!("h: help | {}: back | Ctrl+c: quit", app.config.keys.navigate_up),
        ToString::to_string,
    );
    let left = Line::from(vec![
        indicator,
        Span::styled(message, Style::default().fg(colors::TEXT_DIM)),
    ]);

    let render_mode = match app.workspace.render_mode() {
        RenderMode::Fast => "fast",
        RenderMode::Precise => "precise",
    };
    let right_text = format!(
        " drop: {} | tiles: {} | render: {render_mode} ",
        app.workspace.drop_mode(),
        app.workspace.tile_source().name
    );
    let right_width = u16::try_from(right_text.chars().count())
        .unwrap_or(0)
        .min(area.width);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);

    frame.render_widget(
        Paragraph::new(left).style(Style::default().bg(colors::SURFACE)),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right_text,
            Style::default().fg(colors::TEXT_DIM),
        )))
        .style(Style::default().bg(colors::SURFACE))
        .alignment(Alignment::Right),
        chunks[1],
    );
}

/// Create a centered rect with percentage width and absolute height
fn centered_rect_absolute(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical_padding = area.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(vertical_padding),
            Constraint::Length(height),
            Constraint::Length(vertical_padding),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn render_help_overlay(frame: &mut Frame<'_>, app: &App) {
    let mut lines: Vec<Line<'_>> = app
        .menu()
        .help()
        .lines()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors::TEXT_PRIMARY))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Any key closes",
        Style::default().fg(colors::TEXT_MUTED),
    )));

    let max_height = frame.area().height.saturating_sub(2);
    let height = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(max_height);
    let area = centered_rect_absolute(70, height, frame.area());

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::BORDER)),
        )
        .style(Style::default().bg(colors::MODAL_BG));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
