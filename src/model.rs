//! Validated, application-facing model of a decoded trip-update feed.
//!
//! The generated protobuf types keep every field optional. [`Feed`] is built
//! from them in one pass and rejects the whole payload if any field this crate
//! relies on is missing or malformed, so a `Feed` that exists is complete.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::arrivals::ArrivalIndex;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::{FeedSelector, HttpClient, fetch_bytes};
use crate::gtfs_rt;
use crate::parser::parse_feed;
use crate::routes::canonical_route_id;
use crate::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedHeader {
    pub version: String,
    pub timestamp: Timestamp,
}

/// One scheduled vehicle run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub trip_id: String,
    /// `HH:MM:SS`; hours run past 23 for service after midnight.
    pub start_time: String,
    /// `YYYYMMDD`
    pub start_date: u32,
    pub route_id: String,
}

impl Trip {
    pub fn canonical_route_id(&self) -> &str {
        canonical_route_id(&self.route_id)
    }
}

/// Travel direction encoded in the last letter of a stop id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    North,
    South,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopTimeUpdate {
    /// Stop code with its direction suffix, e.g. `702N`.
    pub stop_id: String,
    pub arrival: Option<Timestamp>,
    pub departure: Option<Timestamp>,
}

impl StopTimeUpdate {
    pub fn direction(&self) -> Option<Direction> {
        match self.stop_id.chars().last() {
            Some('N') => Some(Direction::North),
            Some('S') => Some(Direction::South),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripUpdate {
    pub trip: Trip,
    /// Feed order.
    pub stop_time_updates: Vec<StopTimeUpdate>,
}

/// A feed record. Only trip updates are modelled; alerts and vehicle
/// positions leave `trip_update` empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: String,
    pub trip_update: Option<TripUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    pub header: FeedHeader,
    pub entities: Vec<Entity>,
}

impl Feed {
    /// Builds the model from an already decoded message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for the first field that is missing or
    /// malformed. No partial feed is produced.
    pub fn from_message(message: &gtfs_rt::FeedMessage) -> Result<Self> {
        let header = FeedHeader::from_message(&message.header)?;
        let entities = message
            .entity
            .iter()
            .map(Entity::from_message)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            entities = entities.len(),
            trip_updates = entities.iter().filter(|e| e.trip_update.is_some()).count(),
            "Feed model built"
        );

        Ok(Feed { header, entities })
    }

    /// Decodes `bytes` and builds the model.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_message(&parse_feed(bytes)?)
    }

    /// Fetches the feed named by `selector` and builds the model.
    #[tracing::instrument(skip_all, fields(selector = %selector))]
    pub async fn get<C: HttpClient + ?Sized>(
        client: &C,
        selector: &FeedSelector,
        config: &Config,
    ) -> Result<Self> {
        let url = selector.url(&config.base_url)?;
        let bytes = fetch_bytes(client, &url, config.retries).await?;
        Self::from_bytes(&bytes)
    }

    pub fn trip_updates(&self) -> impl Iterator<Item = &TripUpdate> {
        self.entities.iter().filter_map(|e| e.trip_update.as_ref())
    }

    /// Groups every predicted arrival by canonical route and stop.
    pub fn extract(&self) -> ArrivalIndex {
        ArrivalIndex::from_feed(self)
    }
}

impl FeedHeader {
    fn from_message(header: &gtfs_rt::FeedHeader) -> Result<Self> {
        let timestamp = header
            .timestamp
            .ok_or_else(|| Error::validation("header.timestamp", "missing"))
            .and_then(Timestamp::from_epoch_unsigned)?;

        Ok(FeedHeader {
            version: header.gtfs_realtime_version.clone(),
            timestamp,
        })
    }
}

impl Entity {
    fn from_message(entity: &gtfs_rt::FeedEntity) -> Result<Self> {
        let trip_update = entity
            .trip_update
            .as_ref()
            .map(TripUpdate::from_message)
            .transpose()?;

        Ok(Entity {
            id: entity.id.clone(),
            trip_update,
        })
    }
}

impl TripUpdate {
    fn from_message(update: &gtfs_rt::TripUpdate) -> Result<Self> {
        let trip = Trip::from_message(&update.trip)?;
        let stop_time_updates = update
            .stop_time_update
            .iter()
            .map(StopTimeUpdate::from_message)
            .collect::<Result<Vec<_>>>()?;

        Ok(TripUpdate {
            trip,
            stop_time_updates,
        })
    }
}

impl Trip {
    fn from_message(trip: &gtfs_rt::TripDescriptor) -> Result<Self> {
        let start_time = required("trip.start_time", &trip.start_time)?;
        validate_start_time(start_time)?;
        let start_date = parse_start_date(required("trip.start_date", &trip.start_date)?)?;

        Ok(Trip {
            trip_id: required("trip.trip_id", &trip.trip_id)?.to_string(),
            start_time: start_time.to_string(),
            start_date,
            route_id: required("trip.route_id", &trip.route_id)?.to_string(),
        })
    }
}

impl StopTimeUpdate {
    fn from_message(update: &gtfs_rt::trip_update::StopTimeUpdate) -> Result<Self> {
        let event_time = |event: &Option<gtfs_rt::trip_update::StopTimeEvent>| {
            event
                .as_ref()
                .and_then(|e| e.time)
                .map(Timestamp::from_epoch)
                .transpose()
        };

        Ok(StopTimeUpdate {
            stop_id: required("stop_time_update.stop_id", &update.stop_id)?.to_string(),
            arrival: event_time(&update.arrival)?,
            departure: event_time(&update.departure)?,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::validation(field, "missing"))
}

fn validate_start_time(value: &str) -> Result<()> {
    let invalid = || Error::validation("trip.start_time", format!("'{value}' is not HH:MM:SS"));

    let parts: Vec<&str> = value.split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return Err(invalid());
    };

    let field = |s: &str, max: u32| -> Result<()> {
        if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        match s.parse::<u32>() {
            Ok(n) if n <= max => Ok(()),
            _ => Err(invalid()),
        }
    };

    field(*hours, 47)?;
    field(*minutes, 59)?;
    field(*seconds, 59)
}

fn parse_start_date(value: &str) -> Result<u32> {
    let invalid = || Error::validation("trip.start_date", format!("'{value}' is not YYYYMMDD"));

    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| invalid())?;
    value.parse().map_err(|_| invalid())
}
