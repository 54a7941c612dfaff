//! Map section: controls, legend, live statistics and the world map.

use super::formatters::{format_number, truncate};
use super::ThemeColors;
use crate::app::App;
use crate::map::Marker;
use crate::stats::{DepthBucket, SIGNIFICANT_MAGNITUDE};
use std::borrow::Cow;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Map, MapResolution},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

/// Map degrees per marker radius unit at zoom 1.
const DEGREES_PER_RADIUS_UNIT: f64 = 0.6;

const CONTROLS_WIDTH: u16 = 34;

pub(super) fn draw_map_section(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(CONTROLS_WIDTH), Constraint::Min(20)])
        .split(area);

    let panels = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Min(6),
        ])
        .split(columns[0]);

    draw_controls(f, app, panels[0], colors);
    draw_legend(f, panels[1], colors);
    draw_live_stats(f, app, panels[2], colors);

    let markers = app.markers();
    draw_world(f, app, &markers, columns[1], colors);

    if app.show_popup {
        if let Some(marker) = markers.get(app.selected_marker) {
            draw_popup(f, marker, columns[1], colors);
        }
    }
}

fn panel<'a>(title: &'a str, colors: &ThemeColors) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.bg))
}

fn label_value<'a>(
    label: impl Into<Cow<'a, str>>,
    value: String,
    colors: &ThemeColors,
) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(colors.label)),
        Span::styled(value, Style::default().fg(colors.value)),
    ])
}

fn draw_controls(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    // Slider drawn as a 16 cell bar over 0.0-8.0
    let filled = (app.view.min_magnitude * 2.0).round() as usize;
    let slider = format!("{}{}", "█".repeat(filled), "░".repeat(16usize.saturating_sub(filled)));

    let refresh = if app.view.loading {
        Span::styled("Loading...", Style::default().fg(colors.warning))
    } else {
        Span::styled("r: Update Data", Style::default().fg(colors.text))
    };

    let lines = vec![
        label_value("Time Range: ", app.view.request.describe(), colors),
        Line::from(vec![
            Span::styled("Min Mag: ", Style::default().fg(colors.label)),
            Span::styled(slider, Style::default().fg(colors.heading)),
            Span::styled(
                format!(" {:.1}", app.view.min_magnitude),
                Style::default()
                    .fg(colors.value)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(refresh),
        Line::from(Span::styled(
            format!("Zoom x{}", app.viewport.zoom),
            Style::default().fg(colors.text),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(panel(" Earthquake Monitor ", colors));
    f.render_widget(paragraph, area);
}

fn draw_legend(f: &mut Frame<'_>, area: Rect, colors: &ThemeColors) {
    let lines: Vec<Line<'_>> = DepthBucket::ALL
        .iter()
        .map(|bucket| {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(bucket.color())),
                Span::styled(bucket.label(), Style::default().fg(colors.text)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(panel(" Depth (km) ", colors));
    f.render_widget(paragraph, area);
}

fn draw_live_stats(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let summary = app.summary();
    let lines = vec![
        label_value("Total Earthquakes: ", format_number(summary.total), colors),
        label_value(
            "Filtered Results:  ",
            format_number(summary.filtered_count),
            colors,
        ),
        label_value(
            "Largest Magnitude: ",
            format!("{:.1}", summary.max_magnitude),
            colors,
        ),
        label_value(
            format!("Significant (≥{:.1}): ", SIGNIFICANT_MAGNITUDE),
            format_number(summary.significant_count),
            colors,
        ),
    ];

    let paragraph = Paragraph::new(lines).block(panel(" Live Statistics ", colors));
    f.render_widget(paragraph, area);
}

fn draw_world(f: &mut Frame<'_>, app: &App, markers: &[Marker<'_>], area: Rect, colors: &ThemeColors) {
    let viewport = app.viewport;
    let scale = DEGREES_PER_RADIUS_UNIT / viewport.zoom;
    let selected = if markers.is_empty() {
        None
    } else {
        markers.get(app.selected_marker)
    };

    let title = format!(
        " World Map | {} of {} shown ",
        format_number(markers.len()),
        format_number(app.snapshot.len())
    );

    let canvas = Canvas::default()
        .block(panel(&title, colors))
        .background_color(colors.bg)
        .marker(symbols::Marker::Braille)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(|ctx| {
            ctx.draw(&Map {
                color: colors.land,
                resolution: MapResolution::High,
            });
            ctx.layer();

            for marker in markers {
                ctx.draw(&Circle {
                    x: marker.longitude,
                    y: marker.latitude,
                    radius: marker.radius * scale,
                    color: marker.color(),
                });
            }

            if let Some(marker) = selected {
                ctx.layer();
                ctx.print(
                    marker.longitude,
                    marker.latitude,
                    Span::styled(
                        "◉",
                        Style::default()
                            .fg(colors.cursor_bg)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn draw_popup(f: &mut Frame<'_>, marker: &Marker<'_>, area: Rect, colors: &ThemeColors) {
    let popup = marker.popup();
    let width = 46u16.min(area.width);
    let height = if popup.tsunami { 8 } else { 7 };

    // Lower right corner of the map, inside its border.
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(height + 1),
        width,
        height: height.min(area.height),
    };

    let inner_width = width.saturating_sub(2) as usize;
    let mut lines = vec![
        Line::from(Span::styled(
            truncate(&popup.title, inner_width),
            Style::default()
                .fg(colors.heading)
                .add_modifier(Modifier::BOLD),
        )),
        label_value("Magnitude: ", popup.magnitude, colors),
        label_value("Depth: ", popup.depth, colors),
        label_value("Time: ", popup.time, colors),
    ];
    if popup.tsunami {
        lines.push(Line::from(Span::styled(
            "⚠ Tsunami Alert",
            Style::default()
                .fg(colors.error)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Enter/Esc: close | c: center",
        Style::default().fg(colors.border),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(marker.color()))
                .style(Style::default().bg(colors.bg)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}
