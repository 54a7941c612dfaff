//! Earthquake feed retrieval.
//!
//! This module knows which USGS endpoint serves a given selection, how to
//! decode the GeoJSON it returns, and how to run a retrieval off the UI
//! thread.

mod client;
mod model;
mod worker;

pub use client::{parse_feed, FeedClient, FeedSource};
pub use model::{Feature, Position};
pub use worker::{FetchOutcome, FetchWorker};

use crate::error::{Result, SeismoError};
use chrono::{Days, NaiveDate};
use std::fmt;

/// Default feed host.
pub const DEFAULT_FEED_URL: &str = "https://earthquake.usgs.gov";

/// How far back a custom single-date selection may reach.
pub const CUSTOM_DATE_WINDOW_DAYS: u64 = 30;

/// Rolling window served by the summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    /// Past hour.
    AllHour,
    /// Past day.
    #[default]
    AllDay,
    /// Past week.
    AllWeek,
    /// Past month.
    AllMonth,
}

impl Timeframe {
    /// Every timeframe, in selector order.
    pub const ALL: [Timeframe; 4] = [
        Timeframe::AllHour,
        Timeframe::AllDay,
        Timeframe::AllWeek,
        Timeframe::AllMonth,
    ];

    /// Key used in the feed path.
    pub fn key(self) -> &'static str {
        match self {
            Timeframe::AllHour => "all_hour",
            Timeframe::AllDay => "all_day",
            Timeframe::AllWeek => "all_week",
            Timeframe::AllMonth => "all_month",
        }
    }

    /// Short selector label.
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::AllHour => "Past Hour",
            Timeframe::AllDay => "Past Day",
            Timeframe::AllWeek => "Past Week",
            Timeframe::AllMonth => "Past Month",
        }
    }

    /// Longer description for the info line.
    pub fn description(self) -> &'static str {
        match self {
            Timeframe::AllHour => "Most recent earthquakes",
            Timeframe::AllDay => "Last 24 hours",
            Timeframe::AllWeek => "Last 7 days",
            Timeframe::AllMonth => "Last 30 days",
        }
    }

    /// Get the next timeframe in the cycle.
    pub fn next(self) -> Self {
        match self {
            Timeframe::AllHour => Timeframe::AllDay,
            Timeframe::AllDay => Timeframe::AllWeek,
            Timeframe::AllWeek => Timeframe::AllMonth,
            Timeframe::AllMonth => Timeframe::AllHour,
        }
    }

    /// Look a timeframe up by its feed key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What a single fetch should retrieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedRequest {
    /// One of the rolling summary feeds.
    Summary(Timeframe),
    /// Every event on one calendar day (UTC).
    Day(NaiveDate),
}

impl Default for FeedRequest {
    fn default() -> Self {
        FeedRequest::Summary(Timeframe::default())
    }
}

impl FeedRequest {
    /// Build a single-day request, checking it against the allowed window.
    pub fn day(date: NaiveDate, today: NaiveDate) -> Result<Self> {
        let (earliest, latest) = custom_date_bounds(today);
        if date < earliest || date > latest {
            return Err(SeismoError::DateOutOfRange {
                date,
                earliest,
                latest,
            });
        }
        Ok(FeedRequest::Day(date))
    }

    /// Parse `YYYY-MM-DD` into a single-day request.
    pub fn parse_day(input: &str, today: NaiveDate) -> Result<Self> {
        let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map_err(|_| SeismoError::invalid_date(input))?;
        Self::day(date, today)
    }

    /// Full URL for this request against `base`.
    pub fn url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        match self {
            FeedRequest::Summary(timeframe) => {
                format!("{}/earthquakes/feed/v1.0/summary/{}.geojson", base, timeframe.key())
            },
            FeedRequest::Day(date) => {
                let end = date.checked_add_days(Days::new(1)).unwrap_or(*date);
                format!(
                    "{}/fdsnws/event/1/query?format=geojson&starttime={}&endtime={}",
                    base,
                    date.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d")
                )
            },
        }
    }

    /// Human readable description for the info line.
    pub fn describe(&self) -> String {
        match self {
            FeedRequest::Summary(timeframe) => timeframe.description().to_string(),
            FeedRequest::Day(date) => format!("Earthquakes from {}", date.format("%Y-%m-%d")),
        }
    }
}

/// Oldest and newest date a custom selection may use.
pub fn custom_date_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let earliest = today
        .checked_sub_days(Days::new(CUSTOM_DATE_WINDOW_DAYS))
        .unwrap_or(today);
    (earliest, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summary_urls_use_the_feed_key() {
        let url = FeedRequest::Summary(Timeframe::AllWeek).url(DEFAULT_FEED_URL);
        assert_eq!(
            url,
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson"
        );

        let url = FeedRequest::Summary(Timeframe::AllHour).url("http://127.0.0.1:9000/");
        assert_eq!(
            url,
            "http://127.0.0.1:9000/earthquakes/feed/v1.0/summary/all_hour.geojson"
        );
    }

    #[test]
    fn day_url_spans_one_day() {
        let today = date(2024, 3, 10);
        let request = FeedRequest::day(date(2024, 2, 29), today).unwrap();
        assert_eq!(
            request.url(DEFAULT_FEED_URL),
            "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&starttime=2024-02-29&endtime=2024-03-01"
        );
    }

    #[test]
    fn custom_dates_are_limited_to_thirty_days() {
        let today = date(2024, 3, 31);
        assert!(FeedRequest::day(date(2024, 3, 1), today).is_ok());
        assert!(FeedRequest::day(today, today).is_ok());

        let err = FeedRequest::day(date(2024, 2, 29), today).unwrap_err();
        assert!(matches!(err, SeismoError::DateOutOfRange { .. }));

        let err = FeedRequest::day(date(2024, 4, 1), today).unwrap_err();
        assert!(matches!(err, SeismoError::DateOutOfRange { .. }));
    }

    #[test]
    fn parse_day_rejects_garbage() {
        let today = date(2024, 3, 31);
        assert_eq!(
            FeedRequest::parse_day(" 2024-03-15 ", today).unwrap(),
            FeedRequest::Day(date(2024, 3, 15))
        );
        assert!(matches!(
            FeedRequest::parse_day("15/03/2024", today),
            Err(SeismoError::InvalidDate { .. })
        ));
    }

    #[test]
    fn timeframe_keys_round_trip_and_cycle() {
        for timeframe in Timeframe::ALL {
            assert_eq!(Timeframe::from_key(timeframe.key()), Some(timeframe));
        }
        assert_eq!(Timeframe::from_key("custom"), None);
        assert_eq!(Timeframe::AllMonth.next(), Timeframe::AllHour);
        assert_eq!(Timeframe::default(), Timeframe::AllDay);
    }
}
