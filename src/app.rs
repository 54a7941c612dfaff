//! Application state and logic.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};

use crate::feed::{Feature, FeedRequest, FeedSource, FetchOutcome, FetchWorker, Timeframe};
use crate::map::{self, Marker, Viewport};
use crate::stats::{self, Summary};

/// Lowest selectable minimum magnitude.
pub const MIN_MAGNITUDE_LOWER: f64 = 0.0;

/// Highest selectable minimum magnitude.
pub const MIN_MAGNITUDE_UPPER: f64 = 8.0;

/// Slider step.
pub const MIN_MAGNITUDE_STEP: f64 = 0.1;

/// Rows shown in the data table.
pub const MAX_TABLE_ROWS: usize = 100;

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// Interactive map with controls and live statistics.
    #[default]
    Map,
    /// Reference text and current statistics.
    Education,
    /// Tabular listing.
    Data,
}

impl Section {
    /// Get the next section in the cycle.
    pub fn next(self) -> Self {
        match self {
            Section::Map => Section::Education,
            Section::Education => Section::Data,
            Section::Data => Section::Map,
        }
    }

    /// Tab title.
    pub fn name(self) -> &'static str {
        match self {
            Section::Map => "Map",
            Section::Education => "Education",
            Section::Data => "Data",
        }
    }

    /// Position in the tab bar.
    pub fn index(self) -> usize {
        match self {
            Section::Map => 0,
            Section::Education => 1,
            Section::Data => 2,
        }
    }
}

/// Education panel tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EducationTab {
    /// What earthquakes are and the magnitude scale.
    #[default]
    Basics,
    /// Depth categories.
    Depth,
    /// Safety guidance.
    Safety,
}

impl EducationTab {
    /// All tabs in display order.
    pub const ALL: [EducationTab; 3] = [
        EducationTab::Basics,
        EducationTab::Depth,
        EducationTab::Safety,
    ];

    /// Get the next tab in the cycle.
    pub fn next(self) -> Self {
        match self {
            EducationTab::Basics => EducationTab::Depth,
            EducationTab::Depth => EducationTab::Safety,
            EducationTab::Safety => EducationTab::Basics,
        }
    }

    /// Get the previous tab in the cycle.
    pub fn prev(self) -> Self {
        match self {
            EducationTab::Basics => EducationTab::Safety,
            EducationTab::Depth => EducationTab::Basics,
            EducationTab::Safety => EducationTab::Depth,
        }
    }

    /// Tab title.
    pub fn title(self) -> &'static str {
        match self {
            EducationTab::Basics => "Earthquake Basics",
            EducationTab::Depth => "Earthquake Depth",
            EducationTab::Safety => "Earthquake Safety",
        }
    }
}

/// Startup settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppConfig {
    /// First feed to load.
    pub request: FeedRequest,
    /// Initial minimum magnitude.
    pub min_magnitude: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            request: FeedRequest::default(),
            min_magnitude: MIN_MAGNITUDE_LOWER,
        }
    }
}

/// User-controlled selection plus fetch status.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Active feed selection.
    pub request: FeedRequest,
    /// Minimum magnitude threshold.
    pub min_magnitude: f64,
    /// A fetch for the active selection is outstanding.
    pub loading: bool,
    /// Banner text for the last failure.
    pub error: Option<String>,
}

/// Single-line editor for the custom date.
#[derive(Debug, Default)]
pub struct DateInput {
    is_active: bool,
    buffer: String,
}

impl DateInput {
    /// Check if the editor is open.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Open the editor.
    pub fn start(&mut self) {
        self.is_active = true;
        self.buffer.clear();
    }

    /// Add a character. Only digits and dashes are accepted.
    pub fn input(&mut self, c: char) {
        if (c.is_ascii_digit() || c == '-') && self.buffer.len() < 10 {
            self.buffer.push(c);
        }
    }

    /// Remove the last character.
    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Close the editor and hand back its contents.
    pub fn submit(&mut self) -> String {
        self.is_active = false;
        std::mem::take(&mut self.buffer)
    }

    /// Close the editor discarding its contents.
    pub fn cancel(&mut self) {
        self.is_active = false;
        self.buffer.clear();
    }

    /// Current contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Selection and fetch status.
    pub view: ViewState,
    /// Last successfully fetched snapshot.
    pub snapshot: Vec<Feature>,
    /// Visible section.
    pub section: Section,
    /// Visible education tab.
    pub education_tab: EducationTab,
    /// Custom date editor.
    pub date_input: DateInput,
    /// Index into the current markers.
    pub selected_marker: usize,
    /// Whether the marker popup is open.
    pub show_popup: bool,
    /// Visible map region.
    pub viewport: Viewport,
    /// First visible table row.
    pub table_scroll: usize,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
    /// When the snapshot was last replaced.
    pub last_updated: Option<DateTime<Local>>,
    worker: FetchWorker,
    generation: u64,
}

impl App {
    /// Create a new application instance. No fetch is issued yet.
    pub fn new(config: AppConfig, source: Arc<dyn FeedSource>) -> Self {
        Self {
            view: ViewState {
                request: config.request,
                min_magnitude: clamp_magnitude(config.min_magnitude),
                loading: false,
                error: None,
            },
            snapshot: Vec::new(),
            section: Section::Map,
            education_tab: EducationTab::Basics,
            date_input: DateInput::default(),
            selected_marker: 0,
            show_popup: false,
            viewport: Viewport::default(),
            table_scroll: 0,
            status: "Ready".to_string(),
            theme: Theme::GruvboxDark,
            last_updated: None,
            worker: FetchWorker::new(source),
            generation: 0,
        }
    }

    /// Fetch the active selection again. Ignored while a fetch is outstanding.
    pub fn refresh(&mut self) {
        if self.view.loading {
            self.status = "Already loading...".to_string();
            return;
        }
        self.issue_fetch();
    }

    /// Switch to `request` and fetch it, superseding any outstanding fetch.
    pub fn select_request(&mut self, request: FeedRequest) {
        self.view.request = request;
        self.issue_fetch();
    }

    /// Move to the next rolling timeframe.
    pub fn cycle_timeframe(&mut self) {
        let next = match self.view.request {
            FeedRequest::Summary(timeframe) => timeframe.next(),
            FeedRequest::Day(_) => Timeframe::default(),
        };
        self.select_request(FeedRequest::Summary(next));
    }

    /// Apply the date typed into the editor.
    pub fn submit_date(&mut self, today: NaiveDate) {
        let input = self.date_input.submit();
        match FeedRequest::parse_day(&input, today) {
            Ok(request) => self.select_request(request),
            Err(e) => {
                tracing::warn!("Rejected custom date: {}", e);
                self.view.error = Some(e.user_message());
                self.status = "Invalid date".to_string();
            },
        }
    }

    fn issue_fetch(&mut self) {
        self.generation += 1;
        self.view.loading = true;
        self.view.error = None;
        self.status = format!("Loading {}...", self.view.request.describe().to_lowercase());
        tracing::info!(
            "Fetching {:?} (generation {})",
            self.view.request,
            self.generation
        );
        self.worker.spawn(self.view.request, self.generation);
    }

    /// Apply every fetch that has completed since the last frame.
    pub fn poll_fetches(&mut self) {
        while let Some(outcome) = self.worker.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    /// Apply one completed fetch. Returns false when it was stale and dropped.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                "Discarding stale fetch {} (latest is {})",
                outcome.generation,
                self.generation
            );
            return false;
        }

        self.view.loading = false;
        match outcome.result {
            Ok(features) => {
                tracing::info!("Loaded {} earthquakes", features.len());
                self.status = format!("Loaded {} earthquakes", features.len());
                self.snapshot = features;
                self.view.error = None;
                self.last_updated = Some(Local::now());
                self.clamp_selection();
            },
            Err(e) => {
                tracing::error!("Error fetching earthquake data: {}", e);
                self.view.error = Some(e.user_message());
                self.status = "Fetch failed (press r to retry)".to_string();
            },
        }
        true
    }

    /// Nudge the minimum magnitude, staying within the slider range.
    pub fn adjust_min_magnitude(&mut self, delta: f64) {
        self.set_min_magnitude(self.view.min_magnitude + delta);
    }

    /// Set the minimum magnitude, snapped to the slider step and clamped.
    pub fn set_min_magnitude(&mut self, value: f64) {
        self.view.min_magnitude = clamp_magnitude(value);
        self.status = format!("Min magnitude: {:.1}", self.view.min_magnitude);
        self.clamp_selection();
    }

    /// Statistics for the current snapshot and threshold.
    pub fn summary(&self) -> Summary {
        Summary::compute(&self.snapshot, self.view.min_magnitude)
    }

    /// Events passing the threshold.
    pub fn filtered(&self) -> Vec<&Feature> {
        stats::filter_by_magnitude(&self.snapshot, self.view.min_magnitude)
    }

    /// Rows for the data table, capped at [`MAX_TABLE_ROWS`].
    pub fn table_rows(&self) -> Vec<&Feature> {
        let mut rows = self.filtered();
        rows.truncate(MAX_TABLE_ROWS);
        rows
    }

    /// Map markers for the filtered events.
    pub fn markers(&self) -> Vec<Marker<'_>> {
        map::build_markers(&self.snapshot, self.view.min_magnitude)
    }

    /// Currently selected marker.
    pub fn current_marker(&self) -> Option<Marker<'_>> {
        self.markers().into_iter().nth(self.selected_marker)
    }

    /// Select the next marker, wrapping around.
    pub fn next_marker(&mut self) {
        let count = self.markers().len();
        if count > 0 {
            self.selected_marker = (self.selected_marker + 1) % count;
        }
    }

    /// Select the previous marker, wrapping around.
    pub fn prev_marker(&mut self) {
        let count = self.markers().len();
        if count > 0 {
            self.selected_marker = if self.selected_marker == 0 {
                count - 1
            } else {
                self.selected_marker - 1
            };
        }
    }

    /// Open or close the popup for the selected marker.
    pub fn toggle_popup(&mut self) {
        if self.show_popup {
            self.show_popup = false;
        } else if self.current_marker().is_some() {
            self.show_popup = true;
        } else {
            self.status = "No earthquakes to inspect".to_string();
        }
    }

    /// Center the map on the selected marker and zoom in one step.
    pub fn focus_selected(&mut self) {
        let target = self
            .current_marker()
            .map(|m| (m.latitude, m.longitude));
        match target {
            Some((lat, lon)) => {
                if self.viewport.zoom < 4.0 {
                    self.viewport.zoom_in();
                }
                self.viewport.center_on(lat, lon);
            },
            None => self.status = "No earthquakes to inspect".to_string(),
        }
    }

    /// Scroll the table down.
    pub fn scroll_table_down(&mut self, amount: usize) {
        let max = self.table_rows().len().saturating_sub(1);
        self.table_scroll = (self.table_scroll + amount).min(max);
    }

    /// Scroll the table up.
    pub fn scroll_table_up(&mut self, amount: usize) {
        self.table_scroll = self.table_scroll.saturating_sub(amount);
    }

    /// Show a section.
    pub fn set_section(&mut self, section: Section) {
        self.section = section;
        self.show_popup = false;
    }

    /// Cycle to the next section.
    pub fn next_section(&mut self) {
        self.set_section(self.section.next());
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }

    /// Close any open overlays.
    pub fn close_overlay(&mut self) {
        self.show_popup = false;
        self.date_input.cancel();
    }

    fn clamp_selection(&mut self) {
        let markers = self.markers().len();
        if self.selected_marker >= markers {
            self.selected_marker = 0;
            self.show_popup = false;
        }
        let rows = self.table_rows().len();
        if self.table_scroll >= rows {
            self.table_scroll = rows.saturating_sub(1);
        }
    }
}

fn clamp_magnitude(value: f64) -> f64 {
    let snapped = (value / MIN_MAGNITUDE_STEP).round() / 10.0;
    snapped.clamp(MIN_MAGNITUDE_LOWER, MIN_MAGNITUDE_UPPER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SeismoError, FETCH_FAILED_MESSAGE};
    use crate::stats::tests::quake;
    use std::time::Duration;

    struct StaticSource(Vec<Feature>);

    impl FeedSource for StaticSource {
        fn fetch(&self, _request: &FeedRequest) -> Result<Vec<Feature>> {
            Ok(self.0.clone())
        }
    }

    fn app() -> App {
        App::new(AppConfig::default(), Arc::new(StaticSource(Vec::new())))
    }

    fn outcome(generation: u64, result: Result<Vec<Feature>>) -> FetchOutcome {
        FetchOutcome {
            generation,
            request: FeedRequest::default(),
            result,
        }
    }

    fn scenario() -> Vec<Feature> {
        vec![
            quake("a", Some(5.2), Some(30.0)),
            quake("b", Some(2.1), Some(80.0)),
            quake("c", Some(6.8), Some(150.0)),
        ]
    }

    #[test]
    fn background_fetch_replaces_snapshot() {
        let mut app = App::new(AppConfig::default(), Arc::new(StaticSource(scenario())));
        app.refresh();
        assert!(app.view.loading);

        let done = app.worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(app.apply_outcome(done));
        assert!(!app.view.loading);
        assert_eq!(app.snapshot.len(), 3);
        assert!(app.last_updated.is_some());
    }

    #[test]
    fn http_failure_keeps_previous_snapshot() {
        let mut app = app();
        app.refresh();
        app.apply_outcome(outcome(1, Ok(scenario())));

        app.refresh();
        assert!(app.view.loading);
        app.apply_outcome(outcome(2, Err(SeismoError::HttpStatus { status: 503 })));

        assert!(!app.view.loading);
        assert_eq!(app.view.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
        assert_eq!(app.snapshot, scenario());
    }

    #[test]
    fn stale_outcomes_are_dropped() {
        let mut app = app();
        app.select_request(FeedRequest::Summary(Timeframe::AllWeek));
        app.select_request(FeedRequest::Summary(Timeframe::AllHour));

        // The older request resolves first while the newer one is outstanding.
        assert!(!app.apply_outcome(outcome(1, Ok(vec![quake("old", Some(1.0), None)]))));
        assert!(app.view.loading);
        assert!(app.snapshot.is_empty());

        assert!(app.apply_outcome(outcome(2, Ok(scenario()))));
        // And once more after the newer one has landed.
        assert!(!app.apply_outcome(outcome(1, Ok(Vec::new()))));
        assert_eq!(app.snapshot.len(), 3);
        assert_eq!(app.view.request, FeedRequest::Summary(Timeframe::AllHour));
    }

    #[test]
    fn refresh_is_ignored_while_loading() {
        let mut app = app();
        app.refresh();
        app.refresh();
        assert_eq!(app.generation, 1);
    }

    #[test]
    fn threshold_changes_keep_total() {
        let mut app = app();
        app.refresh();
        app.apply_outcome(outcome(1, Ok(scenario())));

        app.set_min_magnitude(4.0);
        assert_eq!(app.filtered().len(), 2);
        assert_eq!(app.markers().len(), 2);

        app.view.min_magnitude = 8.1;
        let summary = app.summary();
        assert!(app.filtered().is_empty());
        assert_eq!(summary.filtered_count, 0);
        assert_eq!(summary.total, 3);
    }

    #[test]
    fn min_magnitude_is_clamped_and_snapped() {
        let mut app = app();
        for _ in 0..3 {
            app.adjust_min_magnitude(MIN_MAGNITUDE_STEP);
        }
        assert_eq!(app.view.min_magnitude, 0.3);

        app.adjust_min_magnitude(-5.0);
        assert_eq!(app.view.min_magnitude, 0.0);
        app.set_min_magnitude(12.0);
        assert_eq!(app.view.min_magnitude, 8.0);
    }

    #[test]
    fn invalid_custom_date_sets_error_without_fetching() {
        let mut app = app();
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

        app.date_input.start();
        for c in "2024-01-01".chars() {
            app.date_input.input(c);
        }
        app.submit_date(today);

        assert_eq!(app.generation, 0);
        assert!(app.view.error.as_deref().unwrap().contains("outside"));
        assert!(!app.date_input.is_active());
    }

    #[test]
    fn valid_custom_date_switches_request() {
        let mut app = app();
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

        app.date_input.start();
        for c in "2024-05-1x8".chars() {
            app.date_input.input(c);
        }
        assert_eq!(app.date_input.buffer(), "2024-05-18");
        app.submit_date(today);

        let expected = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();
        assert_eq!(app.view.request, FeedRequest::Day(expected));
        assert!(app.view.loading);

        app.cycle_timeframe();
        assert_eq!(app.view.request, FeedRequest::Summary(Timeframe::AllDay));
    }

    #[test]
    fn marker_selection_wraps_and_resets() {
        let mut app = app();
        app.refresh();
        app.apply_outcome(outcome(1, Ok(scenario())));

        app.prev_marker();
        assert_eq!(app.selected_marker, 2);
        app.next_marker();
        assert_eq!(app.selected_marker, 0);

        app.selected_marker = 2;
        app.toggle_popup();
        assert!(app.show_popup);
        assert_eq!(app.current_marker().unwrap().feature.id, "c");

        // Raising the threshold removes the selected marker.
        app.set_min_magnitude(7.0);
        assert_eq!(app.selected_marker, 0);
        assert!(!app.show_popup);
    }

    #[test]
    fn table_is_capped() {
        let mut app = app();
        let many: Vec<_> = (0..250)
            .map(|i| quake(&i.to_string(), Some(3.0), Some(10.0)))
            .collect();
        app.refresh();
        app.apply_outcome(outcome(1, Ok(many)));

        assert_eq!(app.table_rows().len(), MAX_TABLE_ROWS);
        app.scroll_table_down(1000);
        assert_eq!(app.table_scroll, MAX_TABLE_ROWS - 1);
        app.scroll_table_up(10);
        assert_eq!(app.table_scroll, MAX_TABLE_ROWS - 11);
    }
}
