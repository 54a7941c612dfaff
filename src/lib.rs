//! SeismoScope - a terminal dashboard for the live USGS earthquake feed.
//!
//! SeismoScope polls one of the public GeoJSON summary feeds, plots the events
//! on a world map colored by depth and sized by magnitude, and offers a
//! minimum-magnitude filter, summary statistics, an education panel and a
//! tabular listing.
//!
//! # Features
//!
//! - Past hour / day / week / month feeds, or any single day in the last 30
//! - Non-blocking fetches; stale responses never overwrite newer ones
//! - Live statistics: totals, largest and average magnitude, depth buckets
//! - Braille world map with per-event popups
//! - Gruvbox color themes
//!
//! # Example
//!
//! ```ignore
//! use seismoscope::feed::{FeedClient, FeedRequest, FeedSource, Timeframe};
//! use seismoscope::stats::Summary;
//! use std::time::Duration;
//!
//! let client = FeedClient::new(Duration::from_secs(30))?;
//! let snapshot = client.fetch(&FeedRequest::Summary(Timeframe::AllDay))?;
//! let summary = Summary::compute(&snapshot, 2.5);
//! println!("{} of {} events at M2.5+", summary.filtered_count, summary.total);
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod error;
pub mod feed;
pub mod map;
pub mod stats;
pub mod ui;

pub use error::{Result, SeismoError};
