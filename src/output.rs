//! Output formatting for feeds and arrival indexes.
//!
//! Supports pretty-printing, JSON serialization, and the one-line-per-stop
//! listing used by the `stops` command.

use anyhow::Result;
use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info};

use crate::arrivals::{ArrivalIndex, StopArrivals};
use crate::error::Error;
use crate::model::Feed;
use crate::timestamp::Timestamp;

/// Counts describing one feed snapshot.
#[derive(Debug, Default, Serialize)]
pub struct FeedSummary {
    pub version: String,
    pub generated_at: Option<String>,
    pub total_entities: usize,
    pub trip_updates: usize,
    pub stop_time_updates: usize,
    pub with_arrival: usize,
    pub routes: Vec<String>,
}

impl FeedSummary {
    /// `generated_at` is the header timestamp in `tz`.
    pub fn from_feed(feed: &Feed, tz: Tz) -> Self {
        let mut s = FeedSummary {
            version: feed.header.version.clone(),
            generated_at: Some(feed.header.timestamp.in_timezone(tz).to_rfc3339()),
            total_entities: feed.entities.len(),
            ..Default::default()
        };

        for trip_update in feed.trip_updates() {
            s.trip_updates += 1;
            s.stop_time_updates += trip_update.stop_time_updates.len();
            s.with_arrival += trip_update
                .stop_time_updates
                .iter()
                .filter(|u| u.arrival.is_some())
                .count();
        }

        s.routes = feed.extract().routes().map(str::to_string).collect();
        s
    }
}

/// Logs any value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a feed summary.
pub fn print_summary(summary: &FeedSummary) {
    info!(
        version = %summary.version,
        generated_at = summary.generated_at.as_deref().unwrap_or("-"),
        total_entities = summary.total_entities,
        trip_updates = summary.trip_updates,
        stop_time_updates = summary.stop_time_updates,
        with_arrival = summary.with_arrival,
        routes = %summary.routes.join(","),
        "Feed summary"
    );
}

/// Serializes a value as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Parses a strftime format, rejecting specifiers chrono cannot render.
pub fn parse_time_format(format: &str) -> Result<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(Error::Config(format!("'{format}' is not a valid time format")).into());
    }
    Ok(items)
}

/// One `STOP_ID t1 t2 ...` line per stop, in stop-id order.
///
/// Only arrivals at or after `after` are listed, at most `limit` per stop,
/// each rendered in `tz` with the strftime `format`. Stops left without times
/// are omitted.
///
/// # Errors
///
/// Returns [`Error::Config`] if `format` is not a valid strftime string.
pub fn stop_lines(
    stops: &StopArrivals,
    tz: Tz,
    format: &str,
    limit: usize,
    after: Option<Timestamp>,
) -> Result<Vec<String>> {
    let items = parse_time_format(format)?;

    Ok(stops
        .iter()
        .filter_map(|(stop_id, arrivals)| {
            let times: Vec<String> = arrivals
                .iter()
                .filter(|t| after.is_none_or(|after| **t >= after))
                .take(limit)
                .map(|t| t.in_timezone(tz).format_with_items(items.iter()).to_string())
                .collect();

            if times.is_empty() {
                None
            } else {
                Some(format!("{} {}", stop_id, times.join(" ")))
            }
        })
        .collect())
}

/// [`stop_lines`] for one route of an index; empty when the route has no
/// arrivals.
pub fn route_stop_lines(
    index: &ArrivalIndex,
    route_id: &str,
    tz: Tz,
    format: &str,
    limit: usize,
    after: Option<Timestamp>,
) -> Result<Vec<String>> {
    match index.route(route_id) {
        Some(stops) => stop_lines(stops, tz, format, limit, after),
        None => {
            parse_time_format(format)?;
            Ok(Vec::new())
        }
    }
}
