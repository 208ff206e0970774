//! UTC-anchored instants read from the feed, with a local-time projection.

use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Error, Result};

/// Home timezone of the subway system, used by [`Timestamp::local`].
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// An instant in the feed, stored in UTC.
///
/// Feeds carry seconds since the Unix epoch. Zero (a common placeholder) and
/// negative values are accepted as long as they map to a calendar instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Builds a timestamp from epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `secs` is outside the range chrono can
    /// represent.
    pub fn from_epoch(secs: i64) -> Result<Self> {
        DateTime::from_timestamp(secs, 0)
            .map(Timestamp)
            .ok_or_else(|| Error::validation("timestamp", format!("{secs} is out of range")))
    }

    /// Same as [`Timestamp::from_epoch`] for the unsigned values used in feed
    /// headers.
    pub fn from_epoch_unsigned(secs: u64) -> Result<Self> {
        let secs = i64::try_from(secs)
            .map_err(|_| Error::validation("timestamp", format!("{secs} is out of range")))?;
        Self::from_epoch(secs)
    }

    /// The instant in UTC.
    pub fn time(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// The instant projected into [`DEFAULT_TIMEZONE`].
    pub fn local(&self) -> DateTime<Tz> {
        self.in_timezone(DEFAULT_TIMEZONE)
    }

    pub fn in_timezone(&self, tz: Tz) -> DateTime<Tz> {
        self.0.with_timezone(&tz)
    }
}

impl TryFrom<i64> for Timestamp {
    type Error = Error;

    fn try_from(secs: i64) -> Result<Self> {
        Self::from_epoch(secs)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Timestamp(time)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_epoch_zero_is_unix_epoch() {
        let ts = Timestamp::from_epoch(0).unwrap();
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(ts.time(), epoch);
        assert_eq!(ts.local(), epoch.with_timezone(&DEFAULT_TIMEZONE));
    }

    #[test]
    fn test_local_projection_keeps_instant() {
        for secs in [0, 1, 1_563_917_160, 1_700_000_000, 4_102_444_800] {
            let ts = Timestamp::from_epoch(secs).unwrap();
            let local = ts.local();

            assert_eq!(ts.epoch_seconds(), secs);
            assert_eq!(local.timestamp(), secs);
            assert_eq!(local.with_timezone(&Utc), ts.time());
        }
    }

    #[test]
    fn test_local_projection_offset() {
        // 2019-07-23 21:26:00 UTC is 17:26 EDT
        let ts = Timestamp::from_epoch(1_563_917_160).unwrap();
        assert_eq!(ts.local().format("%H:%M").to_string(), "17:26");

        let utc = ts.in_timezone(chrono_tz::UTC);
        assert_eq!(utc.format("%H:%M").to_string(), "21:26");
    }

    #[test]
    fn test_negative_epoch_is_accepted() {
        let ts = Timestamp::from_epoch(-1).unwrap();
        assert_eq!(ts.time(), Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_out_of_range_epoch() {
        assert!(matches!(
            Timestamp::from_epoch(i64::MAX),
            Err(Error::Validation { field: "timestamp", .. })
        ));
        assert!(Timestamp::from_epoch_unsigned(u64::MAX).is_err());
    }

    #[test]
    fn test_ordering_follows_instant() {
        let early = Timestamp::from_epoch(10).unwrap();
        let late = Timestamp::try_from(20_i64).unwrap();
        assert!(early < late);
    }

    #[test]
    fn test_serializes_as_rfc3339() {
        let ts = Timestamp::from_epoch(0).unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"1970-01-01T00:00:00Z\"");
    }
}
