use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};
use ratatui::Frame;

pub mod layout;
pub mod tabs;

use crate::app::{App, StatusLevel};
use crate::domain::{Column, DashboardTab};
use crate::window::Window;

pub fn draw(f: &mut Frame, app: &mut App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    tabs::draw_tab_bar(f, areas.tabs, app);
    draw_list_panel(f, areas.list, app);
    draw_status_line(f, areas.status_line, app);
    draw_hints(f, areas.hints, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let left = Text::from(vec![
        Line::from(Span::styled(
            "Assessment Analytics",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Monitor candidates, assessments, and client activity in one place.",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(Paragraph::new(left), chunks[0]);

    let mut updated = vec![
        Span::styled("Last updated: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.last_updated_text()),
    ];
    if app.is_refreshing() {
        updated.push(Span::raw("  "));
        updated.push(Span::styled(
            "Refreshing…",
            Style::default().fg(Color::Yellow),
        ));
    }
    let right = Text::from(vec![
        Line::from(updated),
        Line::from(vec![
            Span::styled("Source ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.source_label.clone()),
        ]),
    ]);
    f.render_widget(Paragraph::new(right).alignment(Alignment::Right), chunks[1]);
}

fn draw_list_panel(f: &mut Frame, area: Rect, app: &mut App) {
    let tab = app.current_tab;
    let (has_data, error) = match app.current_state() {
        Some(state) => (state.data.is_some(), state.error.clone()),
        None => (false, None),
    };
    let list_areas = layout::list_areas(area, has_data && error.is_some());
    app.set_viewport_height(u32::from(list_areas.rows.height));

    let title = if has_data {
        format!(" {} ({}) ", tab.title(), app.current_rows().len())
    } else {
        format!(" {} ", tab.title())
    };
    f.render_widget(layout::list_block().title(title), area);

    let loading = app.current_state().is_some_and(|state| state.loading);
    if !has_data {
        let message = match error {
            Some(err) if !loading => Line::from(Span::styled(
                format!("Failed to load {}: {err}  (r to retry)", tab.noun()),
                Style::default().fg(Color::Red),
            )),
            _ => Line::from(Span::styled(
                format!("Loading {}…", tab.noun()),
                Style::default().fg(Color::DarkGray),
            )),
        };
        draw_centered(f, list_areas.inner, message);
        return;
    }

    if let (Some(banner), Some(err)) = (list_areas.banner, error.as_ref()) {
        let line = Line::from(vec![
            Span::styled(
                " ! ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" Failed to load {}: {err}  (r to retry)", tab.noun()),
                Style::default().fg(Color::Red),
            ),
        ]);
        f.render_widget(Paragraph::new(line), banner);
    }

    if app.current_rows().is_empty() {
        draw_centered(
            f,
            list_areas.rows,
            Line::from(Span::styled(
                format!("No {} found.", tab.noun()),
                Style::default().fg(Color::DarkGray),
            )),
        );
        return;
    }

    let widths = column_widths(tab.columns(), list_areas.columns);
    let header: Vec<String> = tab.columns().iter().map(|c| c.title.to_string()).collect();
    f.render_widget(
        Paragraph::new(cells_line(
            &header,
            &widths,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )),
        list_areas.columns,
    );

    let window = app.window();
    draw_rows(f, list_areas.rows, app, &window, &widths);

    let mut scrollbar_state = ScrollbarState::new(window.total_height as usize)
        .position(app.scroll_offset() as usize)
        .viewport_content_length(list_areas.rows.height as usize);
    f.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None),
        area.inner(&Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Render only the rows inside the window, clipping partially visible ones
fn draw_rows(f: &mut Frame, area: Rect, app: &App, window: &Window, widths: &[u16]) {
    let item_height = app.list.row_height;
    let scroll = app.scroll_offset();
    let viewport = i64::from(area.height);
    let rows = window.slice(app.current_rows());

    for (index, record) in window.range().zip(rows) {
        let top = window.row_top(index, item_height, scroll);
        let bottom = top.saturating_add(i64::from(item_height.get()));
        if bottom <= 0 || top >= viewport {
            continue;
        }
        let clipped_top = top.max(0);
        let clipped_bottom = bottom.min(viewport);
        let rect = Rect {
            x: area.x,
            y: area.y + clipped_top as u16,
            width: area.width,
            height: (clipped_bottom - clipped_top) as u16,
        };

        let style = if index % 2 == 0 {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray).bg(Color::Rgb(24, 24, 32))
        };
        f.render_widget(Block::default().style(style), rect);
        if top >= 0 {
            let line_rect = Rect { height: 1, ..rect };
            f.render_widget(
                Paragraph::new(cells_line(&record.cells(), widths, style)),
                line_rect,
            );
        }
    }
}

fn column_widths(columns: &[Column], area: Rect) -> Vec<u16> {
    let total: u32 = columns.iter().map(|c| u32::from(c.weight)).sum();
    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|c| Constraint::Ratio(u32::from(c.weight), total.max(1)))
        .collect();
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .iter()
        .map(|rect| rect.width)
        .collect()
}

fn cells_line(cells: &[String], widths: &[u16], style: Style) -> Line<'static> {
    let spans: Vec<Span> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| Span::styled(fit(cell, *width as usize), style))
        .collect();
    Line::from(spans)
}

/// Pad or truncate to exactly `width` columns, keeping one column of gap
fn fit(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let room = width.saturating_sub(1);
    let mut out: String = if value.chars().count() > room {
        let keep = room.saturating_sub(1);
        let mut truncated: String = value.chars().take(keep).collect();
        if room > 0 {
            truncated.push('…');
        }
        truncated
    } else {
        value.to_string()
    };
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}

fn draw_centered(f: &mut Frame, area: Rect, line: Line<'static>) {
    if area.height == 0 {
        return;
    }
    let target = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), target);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.status_text() {
        Some((text, level)) => {
            let color = match level {
                StatusLevel::Info => Color::Cyan,
                StatusLevel::Warn => Color::Yellow,
                StatusLevel::Error => Color::Red,
            };
            Line::from(Span::styled(text.to_string(), Style::default().fg(color)))
        }
        None => {
            let window = app.window();
            let rows = app.current_rows().len();
            let shown = if window.is_empty() {
                "--".to_string()
            } else {
                format!("{}-{}", window.start_index + 1, window.end_index)
            };
            Line::from(vec![
                Span::styled("Rows ", Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{rows}  ")),
                Span::styled("Rendered ", Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{shown}  ")),
                Span::styled("Offset ", Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{}/{}", app.scroll_offset(), app.max_scroll())),
            ])
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_hints(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::LightCyan);
    let dim = Style::default().fg(Color::DarkGray);
    let refresh = if app.is_refreshing() { dim } else { key };
    let line = Line::from(vec![
        Span::styled("1-3", key),
        Span::raw(" tab  "),
        Span::styled("j/k", key),
        Span::raw(" scroll  "),
        Span::styled("PgUp/PgDn", key),
        Span::raw(" page  "),
        Span::styled("g/G", key),
        Span::raw(" top/bottom  "),
        Span::styled("r", refresh),
        Span::raw(" refresh  "),
        Span::styled("?", key),
        Span::raw(" help  "),
        Span::styled("q", key),
        Span::raw(" quit"),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(60, 60, area);
    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from("Tabs"),
        Line::from("  1 / 2 / 3       Jump to tab"),
        Line::from("  Tab / Shift-Tab Next / previous tab"),
        Line::from("  [ / ]           Previous / next tab"),
        Line::from("  Mouse click     Select tab"),
        Line::from(""),
        Line::from("Scrolling"),
        Line::from("  j / k, arrows   One row"),
        Line::from("  PgUp / PgDn     One page"),
        Line::from("  Ctrl-u / Ctrl-d Half page"),
        Line::from("  g / Home        Top"),
        Line::from("  G / End         Bottom"),
        Line::from("  Mouse wheel     Three rows"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  r               Refresh active tab"),
        Line::from("  ?               Toggle help"),
        Line::from("  q / Esc         Quit"),
        Line::from(""),
    ];
    for tab in DashboardTab::ALL {
        let summary = match app.state(tab) {
            Some(state) if state.loading => "loading".to_string(),
            Some(state) if state.error.is_some() => "failed".to_string(),
            Some(state) => match state.data.as_ref() {
                Some(rows) => format!("{} rows", rows.len()),
                None => "not loaded".to_string(),
            },
            None => "not loaded".to_string(),
        };
        lines.push(Line::from(format!("  {:<12} {summary}", tab.title())));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
