//! Data section: time range selection and the event table.

use super::formatters::{
    format_coordinate, format_depth, format_local_time, format_magnitude, format_number, truncate,
};
use super::ThemeColors;
use crate::app::{App, MAX_TABLE_ROWS};
use crate::feed::{FeedRequest, Timeframe};
use crate::map::marker_tier;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table,
    },
    Frame,
};

const TIME_WIDTH: u16 = 19;
const MAG_WIDTH: u16 = 5;
const DEPTH_WIDTH: u16 = 10;
const COORD_WIDTH: u16 = 9;

pub(super) fn draw_data_section(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(area);

    draw_time_range(f, app, chunks[0], colors);
    draw_table(f, app, chunks[1], colors);
}

fn draw_time_range(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let mut buttons = Vec::new();
    for timeframe in Timeframe::ALL {
        let active = app.view.request == FeedRequest::Summary(timeframe);
        let style = if active {
            Style::default()
                .fg(colors.cursor_fg)
                .bg(colors.cursor_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text)
        };
        buttons.push(Span::styled(format!(" {} ", timeframe.label()), style));
        buttons.push(Span::raw(" "));
    }

    let custom_style = if matches!(app.view.request, FeedRequest::Day(_)) {
        Style::default()
            .fg(colors.cursor_fg)
            .bg(colors.cursor_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.text)
    };
    buttons.push(Span::styled(" Custom Date (d) ", custom_style));

    let lines = vec![
        Line::from(buttons),
        Line::from(""),
        Line::from(vec![
            Span::styled("ℹ Showing ", Style::default().fg(colors.label)),
            Span::styled(
                app.view.request.describe().to_lowercase(),
                Style::default().fg(colors.value),
            ),
        ]),
        Line::from(Span::styled(
            "Note: Historical data limited to past 30 days",
            Style::default().fg(colors.border),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Time Range Selection ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .style(Style::default().bg(colors.bg)),
    );
    f.render_widget(paragraph, area);
}

fn draw_table(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let rows_data = app.table_rows();
    let filtered_total = app.filtered().len();

    // Account for border and header
    let visible_rows = (area.height as usize).saturating_sub(3);
    let start_row = app.table_scroll.min(rows_data.len().saturating_sub(1));
    let end_row = (start_row + visible_rows).min(rows_data.len());

    let fixed = TIME_WIDTH + MAG_WIDTH + DEPTH_WIDTH + 2 * COORD_WIDTH + 6 + 2;
    let place_width = area.width.saturating_sub(fixed).max(10);

    let rows: Vec<Row<'_>> = rows_data[start_row..end_row]
        .iter()
        .map(|feature| {
            let (lat, lon) = match feature.position {
                Some(p) => (format_coordinate(p.latitude), format_coordinate(p.longitude)),
                None => ("-".to_string(), "-".to_string()),
            };
            let depth = feature.numeric_depth();
            let tier = marker_tier(depth);

            Row::new(vec![
                Cell::from(format_local_time(feature.time_ms))
                    .style(Style::default().fg(colors.label)),
                Cell::from(truncate(&feature.place, place_width as usize))
                    .style(Style::default().fg(colors.text)),
                Cell::from(format!("{:>5}", format_magnitude(feature.magnitude)))
                    .style(Style::default().fg(colors.value)),
                Cell::from(format!("{:>10}", format_depth(depth)))
                    .style(Style::default().fg(tier.color())),
                Cell::from(format!("{:>9}", lat)).style(Style::default().fg(colors.value)),
                Cell::from(format!("{:>9}", lon)).style(Style::default().fg(colors.value)),
            ])
        })
        .collect();

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Place"),
        Cell::from("  Mag"),
        Cell::from("Depth (km)"),
        Cell::from("      Lat"),
        Cell::from("      Lon"),
    ])
    .style(
        Style::default()
            .fg(colors.heading)
            .add_modifier(Modifier::BOLD),
    );

    let widths = [
        Constraint::Length(TIME_WIDTH),
        Constraint::Length(place_width),
        Constraint::Length(MAG_WIDTH),
        Constraint::Length(DEPTH_WIDTH),
        Constraint::Length(COORD_WIDTH),
        Constraint::Length(COORD_WIDTH),
    ];

    let title = format!(
        " Earthquakes | showing {} of {} (max {}) ",
        format_number(rows_data.len()),
        format_number(filtered_total),
        MAX_TABLE_ROWS
    );

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .title(title)
                .title_style(Style::default().fg(colors.heading))
                .style(Style::default().bg(colors.bg)),
        )
        .style(Style::default().fg(colors.text));

    f.render_widget(table, area);

    if rows_data.len() > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(rows_data.len().saturating_sub(visible_rows)).position(start_row);
        f.render_stateful_widget(
            Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("^"))
                .end_symbol(Some("v")),
            area,
            &mut scrollbar_state,
        );
    }
}
