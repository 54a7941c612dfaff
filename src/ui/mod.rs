//! User interface rendering.

mod education;
pub mod formatters;
mod map_view;
mod table;
mod theme;

use crate::app::{App, Section};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

pub use theme::ThemeColors;

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &App) {
    let colors = ThemeColors::from_theme(&app.theme);

    // Header, content, status bar and key map bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, app, chunks[0], &colors);

    let content = match app.view.error {
        Some(ref message) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(chunks[1]);
            draw_error_banner(f, parts[0], message, &colors);
            parts[1]
        },
        None => chunks[1],
    };

    match app.section {
        Section::Map => map_view::draw_map_section(f, app, content, &colors),
        Section::Education => education::draw_education(f, app, content, &colors),
        Section::Data => table::draw_data_section(f, app, content, &colors),
    }

    draw_status(f, app, chunks[2], &colors);
    draw_keymap(f, app, chunks[3], &colors);

    // Overlays
    if app.view.loading {
        draw_loading(f, &colors);
    }
    if app.date_input.is_active() {
        draw_date_input(f, app, &colors);
    }
}

fn draw_header(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14),
            Constraint::Min(10),
            Constraint::Length(32),
        ])
        .split(area);

    let logo = Paragraph::new(Span::styled(
        " SeismoScope ",
        Style::default()
            .fg(colors.heading)
            .add_modifier(Modifier::BOLD),
    ))
    .style(Style::default().bg(colors.status_bg));
    f.render_widget(logo, parts[0]);

    let titles = [Section::Map, Section::Education, Section::Data]
        .iter()
        .map(|s| format!("{} {}", s.index() + 1, s.name()));
    let tabs = Tabs::new(titles)
        .select(app.section.index())
        .style(Style::default().fg(colors.text).bg(colors.status_bg))
        .highlight_style(
            Style::default()
                .fg(colors.cursor_fg)
                .bg(colors.cursor_bg)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, parts[1]);

    let updated = match app.last_updated {
        Some(ts) => format!("Updated {} ", ts.format("%H:%M:%S")),
        None => "No data yet ".to_string(),
    };
    let info = Paragraph::new(updated)
        .alignment(Alignment::Right)
        .style(Style::default().fg(colors.label).bg(colors.status_bg));
    f.render_widget(info, parts[2]);
}

fn draw_error_banner(f: &mut Frame<'_>, area: Rect, message: &str, colors: &ThemeColors) {
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(
            "⚠ ",
            Style::default()
                .fg(colors.error)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(message.to_string(), Style::default().fg(colors.error)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.error))
            .style(Style::default().bg(colors.bg)),
    )
    .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn draw_status(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let text = if app.date_input.is_active() {
        format!("Date: {}", app.date_input.buffer())
    } else {
        app.status.clone()
    };

    let paragraph =
        Paragraph::new(text).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    f.render_widget(paragraph, area);
}

fn draw_keymap(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let keymap_text = if app.date_input.is_active() {
        "Enter:load date | Esc:cancel | Type YYYY-MM-DD"
    } else {
        match app.section {
            Section::Map => {
                "q:quit | Tab:section | r:refresh | t:timeframe | d:date | +-:min mag | jk:select | Enter:popup | arrows:pan | z/Z:zoom"
            },
            Section::Education => "q:quit | Tab:section | h/l:topic | r:refresh | t:timeframe | T:theme",
            Section::Data => {
                "q:quit | Tab:section | jk:scroll | ^d/^u:page | +-:min mag | t:timeframe | d:date"
            },
        }
    };

    let paragraph =
        Paragraph::new(keymap_text).style(Style::default().fg(colors.text).bg(colors.bg));

    f.render_widget(paragraph, area);
}

fn draw_loading(f: &mut Frame<'_>, colors: &ThemeColors) {
    let area = centered_box(36, 3, f.area());
    let paragraph = Paragraph::new(Span::styled(
        "Loading earthquake data...",
        Style::default()
            .fg(colors.warning)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.warning))
            .style(Style::default().bg(colors.bg)),
    );

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn draw_date_input(f: &mut Frame<'_>, app: &App, colors: &ThemeColors) {
    let area = centered_box(44, 5, f.area());
    let lines = vec![
        Line::from(vec![
            Span::styled("Select specific date: ", Style::default().fg(colors.label)),
            Span::styled(
                format!("{}_", app.date_input.buffer()),
                Style::default()
                    .fg(colors.value)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Note: Historical data limited to past 30 days",
            Style::default().fg(colors.text),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Custom Date ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.heading))
            .style(Style::default().bg(colors.bg)),
    );

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

/// A fixed-size box centered in `r`, shrunk to fit.
pub(crate) fn centered_box(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::error::Result;
    use crate::feed::{Feature, FeedRequest, FeedSource, FetchOutcome};
    use crate::stats::tests::quake;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct Empty;

    impl FeedSource for Empty {
        fn fetch(&self, _request: &FeedRequest) -> Result<Vec<Feature>> {
            Ok(Vec::new())
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new(AppConfig::default(), Arc::new(Empty));
        app.refresh();
        let mut tsunami = quake("t", Some(7.4), Some(20.0));
        tsunami.tsunami = true;
        app.apply_outcome(FetchOutcome {
            generation: 1,
            request: FeedRequest::default(),
            result: Ok(vec![
                tsunami,
                quake("b", Some(2.1), Some(80.0)),
                quake("c", Some(6.8), Some(150.0)),
            ]),
        });
        app
    }

    fn render(app: &App) -> String {
        let backend = TestBackend::new(140, 45);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn every_section_renders() {
        let mut app = loaded_app();

        let screen = render(&app);
        assert!(screen.contains("Live Statistics"));
        assert!(screen.contains("Significant"));

        app.set_section(Section::Education);
        let screen = render(&app);
        assert!(screen.contains("Magnitude Scale"));
        assert!(screen.contains("Current Data Statistics"));

        app.set_section(Section::Data);
        let screen = render(&app);
        assert!(screen.contains("Place c"));
        assert!(screen.contains("Time Range Selection"));
    }

    #[test]
    fn popup_shows_tsunami_alert() {
        let mut app = loaded_app();
        app.toggle_popup();
        let screen = render(&app);
        assert!(screen.contains("Place t"));
        assert!(screen.contains("Tsunami Alert"));
    }

    #[test]
    fn error_banner_and_loading_overlay() {
        let mut app = loaded_app();
        app.view.error = Some(crate::error::FETCH_FAILED_MESSAGE.to_string());
        app.view.loading = true;
        let screen = render(&app);
        assert!(screen.contains("Failed to fetch earthquake data"));
        assert!(screen.contains("Loading earthquake data..."));
    }

    #[test]
    fn centered_box_fits_small_areas() {
        let area = Rect::new(0, 0, 10, 2);
        let rect = centered_box(40, 5, area);
        assert_eq!(rect, Rect::new(0, 0, 10, 2));
    }
}
