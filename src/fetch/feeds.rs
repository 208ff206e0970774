//! MTA GTFS-RT feed URL mapping.
//!
//! Subway trip updates are split into feed groups, each covering a handful of
//! routes. A group's URL is the base URL followed by the group suffix:
//! `https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds/nyct%2Fgtfs{suffix}`

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::routes::canonical_route_id;

/// Base URL for MTA GTFS-RT feeds.
pub const MTA_FEED_BASE_URL: &str =
    "https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds/nyct%2Fgtfs";

/// Returns the feed URL suffix serving a canonical route id.
pub fn feed_suffix_for_route(route: &str) -> Option<&'static str> {
    match route {
        // IRT: 1, 2, 3, 4, 5, 6, 42 St shuttle
        "1" | "2" | "3" | "4" | "5" | "6" | "GS" => Some(""),
        // IND: A, C, E, Rockaway and Franklin shuttles
        "A" | "C" | "E" | "H" | "FS" => Some("-ace"),
        "B" | "D" | "F" | "M" => Some("-bdfm"),
        "G" => Some("-g"),
        "J" | "Z" => Some("-jz"),
        "N" | "Q" | "R" | "W" => Some("-nqrw"),
        "L" => Some("-l"),
        "7" => Some("-7"),
        // Staten Island Railway
        "SI" => Some("-si"),
        _ => None,
    }
}

/// Returns the feed URL suffix for a numeric feed id from the old
/// `datamine.mta.info` endpoints.
pub fn feed_suffix_for_legacy_id(id: u32) -> Option<&'static str> {
    match id {
        1 => Some(""),
        26 => Some("-ace"),
        21 => Some("-bdfm"),
        31 => Some("-g"),
        36 => Some("-jz"),
        16 => Some("-nqrw"),
        2 => Some("-l"),
        51 => Some("-7"),
        11 => Some("-si"),
        _ => None,
    }
}

/// Identifies which feed to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSelector {
    /// The feed group serving a canonical route id.
    Route(String),
    /// A legacy numeric feed id.
    FeedId(u32),
    /// A literal URL, used as is.
    Url(String),
}

impl FeedSelector {
    /// The URL to request, with group suffixes appended to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFeed`] for a route or feed id that no feed
    /// group serves.
    pub fn url(&self, base_url: &str) -> Result<String, Error> {
        let suffix = match self {
            FeedSelector::Url(url) => return Ok(url.clone()),
            FeedSelector::Route(route) => feed_suffix_for_route(route),
            FeedSelector::FeedId(id) => feed_suffix_for_legacy_id(*id),
        };
        suffix
            .map(|suffix| format!("{base_url}{suffix}"))
            .ok_or_else(|| Error::UnknownFeed(self.to_string()))
    }
}

impl FromStr for FeedSelector {
    type Err = Error;

    /// Parses a URL, a route id (case insensitive, variants allowed) or a
    /// legacy feed id. Route ids win over feed ids, so `2` is the 2 train.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(FeedSelector::Url(s.to_string()));
        }

        let upper = s.to_ascii_uppercase();
        let route = canonical_route_id(&upper);
        if feed_suffix_for_route(route).is_some() {
            return Ok(FeedSelector::Route(route.to_string()));
        }

        match s.parse::<u32>() {
            Ok(id) if feed_suffix_for_legacy_id(id).is_some() => Ok(FeedSelector::FeedId(id)),
            _ => Err(Error::UnknownFeed(s.to_string())),
        }
    }
}

impl fmt::Display for FeedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSelector::Route(route) => write!(f, "route {route}"),
            FeedSelector::FeedId(id) => write!(f, "feed {id}"),
            FeedSelector::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_for(selector: &str) -> String {
        selector
            .parse::<FeedSelector>()
            .unwrap()
            .url(MTA_FEED_BASE_URL)
            .unwrap()
    }

    #[test]
    fn test_feed_suffix_for_known_routes() {
        assert_eq!(feed_suffix_for_route("1"), Some(""));
        assert_eq!(feed_suffix_for_route("A"), Some("-ace"));
        assert_eq!(feed_suffix_for_route("N"), Some("-nqrw"));
        assert_eq!(feed_suffix_for_route("L"), Some("-l"));
        assert_eq!(feed_suffix_for_route("7"), Some("-7"));
        assert_eq!(feed_suffix_for_route("X"), None);
    }

    #[test]
    fn test_every_legacy_id_matches_a_route_group() {
        for id in [1, 2, 11, 16, 21, 26, 31, 36, 51] {
            let suffix = feed_suffix_for_legacy_id(id).unwrap();
            assert!(
                ["1", "A", "B", "G", "J", "N", "L", "7", "SI"]
                    .iter()
                    .any(|route| feed_suffix_for_route(route) == Some(suffix)),
                "feed {id}"
            );
        }
    }

    #[test]
    fn test_parse_route_selectors() {
        assert_eq!("a".parse::<FeedSelector>().unwrap(), FeedSelector::Route("A".into()));
        assert_eq!("5X".parse::<FeedSelector>().unwrap(), FeedSelector::Route("5".into()));
        assert_eq!(" ss ".parse::<FeedSelector>().unwrap(), FeedSelector::Route("SI".into()));
        // route wins over the legacy L feed id
        assert_eq!("2".parse::<FeedSelector>().unwrap(), FeedSelector::Route("2".into()));
    }

    #[test]
    fn test_parse_legacy_and_url_selectors() {
        assert_eq!("16".parse::<FeedSelector>().unwrap(), FeedSelector::FeedId(16));
        assert_eq!(
            "https://example.com/feed.pb".parse::<FeedSelector>().unwrap(),
            FeedSelector::Url("https://example.com/feed.pb".into())
        );
    }

    #[test]
    fn test_parse_unknown_selector() {
        assert!(matches!("99".parse::<FeedSelector>(), Err(Error::UnknownFeed(_))));
        assert!(matches!("X".parse::<FeedSelector>(), Err(Error::UnknownFeed(_))));
    }

    #[test]
    fn test_urls() {
        assert_eq!(url_for("1"), MTA_FEED_BASE_URL);
        assert_eq!(url_for("Q"), format!("{MTA_FEED_BASE_URL}-nqrw"));
        assert_eq!(url_for("7x"), format!("{MTA_FEED_BASE_URL}-7"));
        assert_eq!(url_for("26"), format!("{MTA_FEED_BASE_URL}-ace"));
        assert_eq!(url_for("http://localhost/x.pb"), "http://localhost/x.pb");
    }

    #[test]
    fn test_unserved_selectors_have_no_url() {
        assert!(matches!(
            FeedSelector::Route("X".into()).url(MTA_FEED_BASE_URL),
            Err(Error::UnknownFeed(_))
        ));
        assert!(matches!(
            FeedSelector::FeedId(99).url(MTA_FEED_BASE_URL),
            Err(Error::UnknownFeed(_))
        ));
        // variants are looked up as given, not canonicalized
        assert!(FeedSelector::Route("5X".into()).url(MTA_FEED_BASE_URL).is_err());
    }
}
