//! Per-route, per-stop index of upcoming arrivals.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::Serialize;
use tracing::debug;

use crate::model::Feed;
use crate::timestamp::Timestamp;

/// Stop id (direction included) to arrival times, earliest first.
pub type StopArrivals = BTreeMap<String, Vec<Timestamp>>;

/// Canonical route id → stop id → arrivals in ascending order.
///
/// Built fresh by [`Feed::extract`]; routes and stops without arrivals have
/// no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArrivalIndex(BTreeMap<String, StopArrivals>);

impl ArrivalIndex {
    pub fn from_feed(feed: &Feed) -> Self {
        let mut routes: BTreeMap<String, StopArrivals> = BTreeMap::new();

        for trip_update in feed.trip_updates() {
            let route_id = trip_update.trip.canonical_route_id();

            for update in &trip_update.stop_time_updates {
                let Some(arrival) = update.arrival else {
                    continue;
                };

                routes
                    .entry(route_id.to_string())
                    .or_default()
                    .entry(update.stop_id.clone())
                    .or_default()
                    .push(arrival);
            }
        }

        // stable: equal times keep feed order
        for stops in routes.values_mut() {
            for arrivals in stops.values_mut() {
                arrivals.sort();
            }
        }

        debug!(routes = routes.len(), "Arrival index extracted");
        ArrivalIndex(routes)
    }

    /// Stops served by `route_id`.
    pub fn route(&self, route_id: &str) -> Option<&StopArrivals> {
        self.0.get(route_id)
    }

    pub fn arrivals(&self, route_id: &str, stop_id: &str) -> Option<&[Timestamp]> {
        self.route(route_id)
            .and_then(|stops| stops.get(stop_id))
            .map(Vec::as_slice)
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StopArrivals)> {
        self.0.iter().map(|(route, stops)| (route.as_str(), stops))
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, StopArrivals> {
        self.0
    }
}

impl Index<&str> for ArrivalIndex {
    type Output = StopArrivals;

    /// # Panics
    ///
    /// Panics if `route_id` is not in the index.
    fn index(&self, route_id: &str) -> &StopArrivals {
        &self.0[route_id]
    }
}
