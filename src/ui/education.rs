//! Education panel: reference text plus statistics for the loaded snapshot.

use super::formatters::format_number;
use super::ThemeColors;
use crate::app::{App, EducationTab};
use crate::stats::Summary;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

pub(super) fn draw_education(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let summary = app.summary();
    let stats_height = if summary.has_numeric_data() { 6 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(stats_height),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    if summary.has_numeric_data() {
        draw_stats(f, &summary, chunks[0], colors);
    }

    let titles = EducationTab::ALL.iter().map(|t| format!(" {} ", t.title()));
    let selected = EducationTab::ALL
        .iter()
        .position(|t| *t == app.education_tab)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(colors.text).bg(colors.bg))
        .highlight_style(
            Style::default()
                .fg(colors.cursor_fg)
                .bg(colors.cursor_bg)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[1]);

    let paragraph = Paragraph::new(tab_content(app.education_tab, colors))
        .block(
            Block::default()
                .title(" Earthquake Education ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .style(Style::default().bg(colors.bg)),
        )
        .style(Style::default().fg(colors.text))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, chunks[2]);
}

fn draw_stats(f: &mut Frame<'_>, summary: &Summary, area: Rect, colors: &ThemeColors) {
    let cell = |label: &'static str, value: String| -> Vec<Span<'static>> {
        vec![
            Span::styled(
                format!("{:>8} ", value),
                Style::default()
                    .fg(colors.value)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{:<22}", label), Style::default().fg(colors.label)),
        ]
    };

    let row = |a: Vec<Span<'static>>, b: Vec<Span<'static>>, c: Vec<Span<'static>>| {
        Line::from([a, b, c].concat())
    };

    let buckets = summary.depth_buckets;
    let lines = vec![
        row(
            cell("Total Earthquakes", format_number(summary.total)),
            cell("Largest Magnitude", format!("{:.1}", summary.max_magnitude)),
            cell(
                "Average Magnitude",
                format!("{:.1}", summary.display_average_magnitude()),
            ),
        ),
        row(
            cell("Shallow Quakes", format_number(buckets.shallow)),
            cell("Intermediate Quakes", format_number(buckets.intermediate)),
            cell("Deep Quakes", format_number(buckets.deep)),
        ),
        row(
            cell("Deepest (km)", format!("{:.1}", summary.max_depth)),
            cell(
                "Average Depth (km)",
                format!("{:.1}", summary.display_average_depth()),
            ),
            cell("Significant (≥4.0)", format_number(summary.significant_count)),
        ),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Current Data Statistics ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .style(Style::default().bg(colors.bg)),
    );
    f.render_widget(paragraph, area);
}

fn heading(text: &'static str, colors: &ThemeColors) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(colors.heading)
            .add_modifier(Modifier::BOLD),
    ))
}

fn item(term: &'static str, text: &'static str, colors: &ThemeColors) -> Line<'static> {
    Line::from(vec![
        Span::raw("  • "),
        Span::styled(
            term,
            Style::default()
                .fg(colors.label)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::raw(text),
    ])
}

fn bullet(text: &'static str) -> Line<'static> {
    Line::from(format!("  • {}", text))
}

fn tab_content(tab: EducationTab, colors: &ThemeColors) -> Vec<Line<'static>> {
    match tab {
        EducationTab::Basics => vec![
            heading("What are Earthquakes?", colors),
            Line::from(
                "Earthquakes are sudden movements of the Earth's crust caused by the release of \
                 energy stored in rocks. They occur when tectonic plates move against each other.",
            ),
            Line::from(""),
            heading("Magnitude Scale", colors),
            item("0-2.9:", "Micro - Usually not felt", colors),
            item("3.0-3.9:", "Minor - Often felt, rarely causes damage", colors),
            item("4.0-4.9:", "Light - Noticeable shaking, minimal damage", colors),
            item("5.0-5.9:", "Moderate - Can cause damage to buildings", colors),
            item("6.0-6.9:", "Strong - Can cause serious damage", colors),
            item("7.0+:", "Major/Great - Can cause widespread damage", colors),
        ],
        EducationTab::Depth => vec![
            heading("Why Depth Matters", colors),
            Line::from(
                "The depth of an earthquake affects how much shaking is felt at the surface and \
                 how much damage it can cause.",
            ),
            Line::from(""),
            heading("Depth Categories", colors),
            item(
                "Shallow (0-50 km):",
                "Most dangerous - strong surface shaking",
                colors,
            ),
            item(
                "Intermediate (50-100 km):",
                "Moderate surface effects",
                colors,
            ),
            item(
                "Deep (100+ km):",
                "Less surface shaking, felt over wider area",
                colors,
            ),
            Line::from(""),
            Line::from(
                "Shallow earthquakes are generally more destructive because the seismic waves \
                 don't have as much distance to travel and lose energy.",
            ),
        ],
        EducationTab::Safety => vec![
            heading("During an Earthquake", colors),
            item("Drop:", "Get on hands and knees", colors),
            item("Cover:", "Take shelter under a desk or table", colors),
            item(
                "Hold On:",
                "Hold onto your shelter and protect your head",
                colors,
            ),
            Line::from(""),
            heading("Preparation Tips", colors),
            bullet("Create an emergency kit with water, food, and supplies"),
            bullet("Identify safe spots in each room"),
            bullet("Practice earthquake drills"),
            bullet("Secure heavy furniture and appliances"),
            bullet("Know how to turn off gas, water, and electricity"),
        ],
    }
}
